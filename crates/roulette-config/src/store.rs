use anyhow::{anyhow, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Flat-file JSON document store.
///
/// Each named document is loaded whole and replaced whole; a missing
/// document reads as the type's default value, never an error. The
/// single-user assumption means no locking: `update` expresses the
/// read-modify-write unit and last-writer-wins is the accepted semantics
/// for concurrent writers.
#[derive(Clone)]
pub struct DocumentStore {
    dir: PathBuf,
}

impl DocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn document_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn load<T>(&self, name: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.document_path(name);

        if !path.exists() {
            debug!("Document miss: {} (file does not exist)", name);
            return Ok(T::default());
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<T>(&content) {
                Ok(data) => Ok(data),
                Err(e) => {
                    warn!(
                        "Document corruption detected for {}: {}. Falling back to default.",
                        name, e
                    );
                    Ok(T::default())
                }
            },
            Err(e) => {
                warn!("Failed to read document {}: {}", name, e);
                Ok(T::default())
            }
        }
    }

    pub fn save<T>(&self, name: &str, data: &T) -> Result<()>
    where
        T: Serialize,
    {
        let path = self.document_path(name);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(data)
            .map_err(|e| anyhow!("Failed to serialize document {}: {}", name, e))?;
        std::fs::write(&path, json)
            .map_err(|e| anyhow!("Failed to write document {}: {}", name, e))?;
        debug!("Document saved: {}", name);
        Ok(())
    }

    /// Atomic read-modify-write unit: load the document (or its default),
    /// apply the mutation, write the whole document back. Returns the
    /// written value.
    pub fn update<T, F>(&self, name: &str, mutate: F) -> Result<T>
    where
        T: DeserializeOwned + Serialize + Default,
        F: FnOnce(&mut T),
    {
        let mut data: T = self.load(name)?;
        mutate(&mut data);
        self.save(name, &data)?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_document_is_default() {
        let dir = tempdir().unwrap();
        let store = DocumentStore::new(dir.path()).unwrap();
        let loaded: Vec<String> = store.load("watchlist").unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = DocumentStore::new(dir.path()).unwrap();

        store
            .save("watchlist", &vec!["a".to_string(), "b".to_string()])
            .unwrap();
        let loaded: Vec<String> = store.load("watchlist").unwrap();
        assert_eq!(loaded, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_corrupt_document_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let store = DocumentStore::new(dir.path()).unwrap();
        std::fs::write(dir.path().join("history.json"), "{not json").unwrap();

        let loaded: Vec<String> = store.load("history").unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_update_reads_mutates_writes() {
        let dir = tempdir().unwrap();
        let store = DocumentStore::new(dir.path()).unwrap();

        store
            .update("counters", |items: &mut Vec<u32>| items.push(1))
            .unwrap();
        let result = store
            .update("counters", |items: &mut Vec<u32>| items.push(2))
            .unwrap();

        assert_eq!(result, vec![1, 2]);
        let loaded: Vec<u32> = store.load("counters").unwrap();
        assert_eq!(loaded, vec![1, 2]);
    }
}
