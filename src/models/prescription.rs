use serde::{Deserialize, Serialize};

/// Medicines and context read off a scanned prescription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionRecord {
    pub medicines: Vec<Medicine>,
    pub diagnosis: String,
    pub doctor_advice: String,
    #[serde(default)]
    pub fallback_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medicine {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    /// Cheaper or generic substitute suggested by the model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative: Option<String>,
    /// Approximate market price, kept verbatim (currency symbol included).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default)]
    pub is_fallback: bool,
}
