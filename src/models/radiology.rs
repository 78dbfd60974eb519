use serde::{Deserialize, Serialize};

/// Radiologist-style reading of an uploaded X-ray or ultrasound image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadiologyResult {
    pub findings: Vec<String>,
    pub conditions: Vec<String>,
    pub recommended_tests: Vec<String>,
    pub impression: String,
    #[serde(default)]
    pub fallback_fields: Vec<String>,
}
