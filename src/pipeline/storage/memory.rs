use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{validate_collection, PersistenceStore, StorageError, StoredAnalysis};

/// Process-local store. Contents are lost when it is dropped.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: Mutex<BTreeMap<String, Vec<StoredAnalysis>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StorageError {
    StorageError::Io(std::io::Error::other("in-memory store lock poisoned"))
}

impl PersistenceStore for InMemoryStore {
    fn save(&self, collection: &str, analysis: &StoredAnalysis) -> Result<(), StorageError> {
        validate_collection(collection)?;
        let mut collections = self.collections.lock().map_err(|_| poisoned())?;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(analysis.clone());
        Ok(())
    }

    fn list(&self, collection: &str) -> Result<Vec<StoredAnalysis>, StorageError> {
        validate_collection(collection)?;
        let collections = self.collections.lock().map_err(|_| poisoned())?;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Domain;
    use crate::pipeline::extraction::parse;

    #[test]
    fn saves_in_insertion_order() {
        let store = InMemoryStore::new();
        let first = StoredAnalysis::new(parse(Domain::Diagnosis, "✅ Conditions:\n• Flu"));
        let second = StoredAnalysis::new(parse(Domain::Diagnosis, "✅ Conditions:\n• Cold"));
        store.save("analyses/diagnosis", &first).unwrap();
        store.save("analyses/diagnosis", &second).unwrap();
        assert_eq!(store.list("analyses/diagnosis").unwrap(), vec![first, second]);
    }

    #[test]
    fn rejects_invalid_collection() {
        let store = InMemoryStore::new();
        let analysis = StoredAnalysis::new(parse(Domain::Radiology, ""));
        assert!(matches!(
            store.save("../x", &analysis),
            Err(StorageError::InvalidCollection(_))
        ));
    }
}
