use serde::{Deserialize, Serialize};

use super::diagnosis::DiagnosisRecord;
use super::enums::Domain;
use super::prescription::PrescriptionRecord;
use super::radiology::RadiologyResult;

/// The typed result of parsing one model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "domain", rename_all = "snake_case")]
pub enum DomainRecord {
    Diagnosis(DiagnosisRecord),
    Prescription(PrescriptionRecord),
    Radiology(RadiologyResult),
}

/// Number of backfillable fields per record kind.
const DIAGNOSIS_FIELDS: usize = 5;
const PRESCRIPTION_FIELDS: usize = 3;
const RADIOLOGY_FIELDS: usize = 4;

impl DomainRecord {
    pub fn domain(&self) -> Domain {
        match self {
            Self::Diagnosis(_) => Domain::Diagnosis,
            Self::Prescription(_) => Domain::Prescription,
            Self::Radiology(_) => Domain::Radiology,
        }
    }

    pub fn fallback_fields(&self) -> &[String] {
        match self {
            Self::Diagnosis(r) => &r.fallback_fields,
            Self::Prescription(r) => &r.fallback_fields,
            Self::Radiology(r) => &r.fallback_fields,
        }
    }

    /// True when nothing at all was recovered from the response.
    pub fn is_fully_fallback(&self) -> bool {
        let total = match self {
            Self::Diagnosis(_) => DIAGNOSIS_FIELDS,
            Self::Prescription(_) => PRESCRIPTION_FIELDS,
            Self::Radiology(_) => RADIOLOGY_FIELDS,
        };
        self.fallback_fields().len() == total
    }

    /// One-line description used when the record is persisted.
    pub fn summary(&self) -> String {
        match self {
            Self::Diagnosis(r) => {
                let names: Vec<&str> = r
                    .conditions
                    .iter()
                    .filter(|c| !c.is_fallback)
                    .map(|c| c.name.as_str())
                    .collect();
                if names.is_empty() {
                    "Symptom analysis: no specific condition identified".to_string()
                } else {
                    format!("Symptom analysis: {}", names.join(", "))
                }
            }
            Self::Prescription(r) => {
                let count = r.medicines.iter().filter(|m| !m.is_fallback).count();
                let mut summary = format!("Analysis of {count} medicines");
                if !r.fallback_fields.iter().any(|f| f == "diagnosis") {
                    summary.push_str(&format!(" for {}", r.diagnosis));
                }
                summary
            }
            Self::Radiology(r) => format!("Radiology: {}", r.impression),
        }
    }
}
