//! Lenient-parsing policy: default sub-field values and sentinel texts.
//!
//! These are product choices, not parsing rules, so they are data. The
//! `Default` values are the ones the web client has always shown.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ExtractionError;
use crate::models::Level;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsePolicy {
    /// Confidence level for a condition line without an explicit level.
    pub default_confidence: Level,
    /// Urgency for a test line without an explicit urgency.
    pub default_urgency: Level,
    /// Reasoning attached to a condition that carries none of its own.
    pub implicit_reasoning: String,
    pub sentinels: Sentinels,
}

/// Texts used when a section yields nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sentinels {
    pub condition_name: String,
    pub condition_level: Level,
    pub condition_reasoning: String,
    pub test_name: String,
    pub test_urgency: Level,
    pub treatment_action: String,
    pub warning_sign: String,
    pub reasoning: String,
    pub medicine_name: String,
    pub prescription_diagnosis: String,
    pub doctor_advice: String,
    pub radiology_finding: String,
    pub radiology_condition: String,
    pub radiology_test: String,
    pub radiology_impression: String,
}

impl Default for ParsePolicy {
    fn default() -> Self {
        Self {
            default_confidence: Level::Medium,
            default_urgency: Level::Medium,
            implicit_reasoning: "Based on symptom analysis".into(),
            sentinels: Sentinels::default(),
        }
    }
}

impl Default for Sentinels {
    fn default() -> Self {
        Self {
            condition_name: "Further evaluation needed".into(),
            condition_level: Level::Low,
            condition_reasoning: "Unable to determine specific condition from provided symptoms"
                .into(),
            test_name: "Consult healthcare provider for appropriate testing".into(),
            test_urgency: Level::Medium,
            treatment_action: "Consult healthcare provider for appropriate treatment".into(),
            warning_sign: "Seek immediate medical attention if symptoms worsen".into(),
            reasoning: "Medical reasoning based on symptom presentation and clinical knowledge"
                .into(),
            medicine_name: "No medicines could be identified".into(),
            prescription_diagnosis: "Not specified in prescription".into(),
            doctor_advice: "No specific advice provided".into(),
            radiology_finding: "No significant abnormalities detected on initial review".into(),
            radiology_condition: "Normal chest X-ray appearance".into(),
            radiology_test: "Clinical correlation recommended".into(),
            radiology_impression:
                "Radiological findings require clinical correlation for complete assessment".into(),
        }
    }
}

impl ParsePolicy {
    /// Load overrides from a JSON file. Fields not present keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ExtractionError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ExtractionError::Policy(format!("{}: {e}", path.display())))?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ExtractionError> {
        serde_json::from_str(json).map_err(|e| ExtractionError::Policy(e.to_string()))
    }
}
