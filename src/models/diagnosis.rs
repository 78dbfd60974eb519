use serde::{Deserialize, Serialize};

use super::enums::Level;

/// Structured guidance recovered from a symptom analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisRecord {
    pub conditions: Vec<Condition>,
    pub tests: Vec<Test>,
    pub treatments: Vec<Treatment>,
    pub warning_signs: Vec<String>,
    pub reasoning: Vec<String>,
    /// Fields that were backfilled rather than extracted.
    #[serde(default)]
    pub fallback_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub name: String,
    pub confidence: Confidence,
    pub reasoning: String,
    #[serde(default)]
    pub is_fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    pub level: Level,
    /// Only set when the model wrote an explicit percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Test {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    pub urgency: Level,
    #[serde(default)]
    pub is_fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Treatment {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default)]
    pub is_fallback: bool,
}
