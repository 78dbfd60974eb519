pub mod memory;
pub mod json_dir;

pub use memory::InMemoryStore;
pub use json_dir::JsonDirStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Domain, DomainRecord};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid collection name: {0}")]
    InvalidCollection(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// A parsed record as persisted for later review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAnalysis {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub domain: Domain,
    pub summary: String,
    pub record: DomainRecord,
}

impl StoredAnalysis {
    pub fn new(record: DomainRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            domain: record.domain(),
            summary: record.summary(),
            record,
        }
    }
}

/// Document store for completed analyses, keyed by collection path.
pub trait PersistenceStore: Send + Sync {
    fn save(&self, collection: &str, analysis: &StoredAnalysis) -> Result<(), StorageError>;

    /// Everything saved under `collection`, oldest first.
    fn list(&self, collection: &str) -> Result<Vec<StoredAnalysis>, StorageError>;
}

/// Collection holding analyses of one domain.
pub fn collection_for(domain: Domain) -> String {
    format!("analyses/{}", domain.as_str())
}

/// A collection path is one or more `/`-separated segments of ASCII
/// letters, digits, `_` or `-`.
pub fn validate_collection(collection: &str) -> Result<(), StorageError> {
    let valid = !collection.is_empty()
        && collection.split('/').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        });
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidCollection(collection.to_string()))
    }
}

/// Persist `record` under its domain's collection.
pub fn save_analysis(
    store: &dyn PersistenceStore,
    record: &DomainRecord,
) -> Result<StoredAnalysis, StorageError> {
    let analysis = StoredAnalysis::new(record.clone());
    let collection = collection_for(analysis.domain);
    match store.save(&collection, &analysis) {
        Ok(()) => {
            tracing::info!(id = %analysis.id, collection = %collection, "Analysis stored");
            Ok(analysis)
        }
        Err(e) => {
            tracing::warn!(collection = %collection, error = %e, "Failed to store analysis");
            Err(e)
        }
    }
}

/// The newest `limit` analyses across `domains`, newest first.
pub fn recent_analyses(
    store: &dyn PersistenceStore,
    domains: &[Domain],
    limit: usize,
) -> Result<Vec<StoredAnalysis>, StorageError> {
    let mut analyses = Vec::new();
    for &domain in domains {
        analyses.extend(store.list(&collection_for(domain))?);
    }
    analyses.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    analyses.truncate(limit);

    tracing::debug!(domains = domains.len(), found = analyses.len(), "Recent analyses listed");
    Ok(analyses)
}
