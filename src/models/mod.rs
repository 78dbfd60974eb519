pub mod enums;
pub mod diagnosis;
pub mod prescription;
pub mod radiology;
pub mod record;

pub use enums::{Domain, Level};
pub use diagnosis::{Condition, Confidence, DiagnosisRecord, Test, Treatment};
pub use prescription::{Medicine, PrescriptionRecord};
pub use radiology::RadiologyResult;
pub use record::DomainRecord;
