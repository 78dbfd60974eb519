use std::path::{Path, PathBuf};

use super::{validate_collection, PersistenceStore, StorageError, StoredAnalysis};

/// One pretty-printed JSON file per analysis:
/// `<root>/<collection>/<id>.json`.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, collection: &str) -> Result<PathBuf, StorageError> {
        validate_collection(collection)?;
        Ok(collection.split('/').fold(self.root.clone(), |dir, segment| dir.join(segment)))
    }
}

impl PersistenceStore for JsonDirStore {
    fn save(&self, collection: &str, analysis: &StoredAnalysis) -> Result<(), StorageError> {
        let dir = self.collection_dir(collection)?;
        std::fs::create_dir_all(&dir)?;

        let json = serde_json::to_string_pretty(analysis)?;
        let path = dir.join(format!("{}.json", analysis.id));
        std::fs::write(&path, json)?;

        tracing::debug!(path = %path.display(), "Analysis written");
        Ok(())
    }

    fn list(&self, collection: &str) -> Result<Vec<StoredAnalysis>, StorageError> {
        let dir = self.collection_dir(collection)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut analyses = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let content = std::fs::read_to_string(&path)?;
            analyses.push(serde_json::from_str::<StoredAnalysis>(&content)?);
        }
        analyses.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(analyses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Domain;
    use crate::pipeline::storage::recent_analyses;
    use crate::pipeline::extraction::parse;

    #[test]
    fn save_writes_file_per_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        let analysis = StoredAnalysis::new(parse(Domain::Prescription, "🧾 Medicines:\n• Zinc"));
        store.save("analyses/prescription", &analysis).unwrap();

        let path = dir
            .path()
            .join("analyses")
            .join("prescription")
            .join(format!("{}.json", analysis.id));
        assert!(path.exists());
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains('\n'), "expected pretty JSON");
    }

    #[test]
    fn list_returns_saved_analyses_oldest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        let mut first = StoredAnalysis::new(parse(Domain::Diagnosis, "✅ Conditions:\n• Flu"));
        let second = StoredAnalysis::new(parse(Domain::Diagnosis, "✅ Conditions:\n• Cold"));
        first.created_at = second.created_at - chrono::Duration::seconds(5);

        store.save("analyses/diagnosis", &second).unwrap();
        store.save("analyses/diagnosis", &first).unwrap();
        std::fs::write(dir.path().join("analyses/diagnosis/notes.txt"), "ignored").unwrap();

        assert_eq!(store.list("analyses/diagnosis").unwrap(), vec![first, second]);
    }

    #[test]
    fn recent_analyses_merges_domains_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        let now = chrono::Utc::now();

        let mut oldest = StoredAnalysis::new(parse(Domain::Diagnosis, "✅ Conditions:\n• Flu"));
        oldest.created_at = now - chrono::Duration::minutes(30);
        let mut middle = StoredAnalysis::new(parse(Domain::Prescription, "🧾 Medicines:\n• Zinc"));
        middle.created_at = now - chrono::Duration::minutes(20);
        let mut newest = StoredAnalysis::new(parse(Domain::Radiology, ""));
        newest.created_at = now - chrono::Duration::minutes(10);

        store.save("analyses/diagnosis", &oldest).unwrap();
        store.save("analyses/radiology", &newest).unwrap();
        store.save("analyses/prescription", &middle).unwrap();

        let recent = recent_analyses(&store, &Domain::ALL, 2).unwrap();
        assert_eq!(recent, vec![newest.clone(), middle.clone()]);

        let all = recent_analyses(&store, &Domain::ALL, 10).unwrap();
        let domains: Vec<Domain> = all.iter().map(|a| a.domain).collect();
        assert_eq!(domains, vec![Domain::Radiology, Domain::Prescription, Domain::Diagnosis]);
    }

    #[test]
    fn missing_collection_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        assert!(store.list("analyses/radiology").unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        let collection_dir = dir.path().join("analyses").join("radiology");
        std::fs::create_dir_all(&collection_dir).unwrap();
        std::fs::write(collection_dir.join("bad.json"), "{").unwrap();
        assert!(matches!(
            store.list("analyses/radiology"),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn path_traversal_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        let analysis = StoredAnalysis::new(parse(Domain::Radiology, ""));
        assert!(matches!(
            store.save("../outside", &analysis),
            Err(StorageError::InvalidCollection(_))
        ));
    }
}
