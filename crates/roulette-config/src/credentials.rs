use anyhow::Result;
use roulette_models::Credential;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use toml;

#[derive(Debug, Serialize, Deserialize, Default)]
struct CredentialsData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

/// Flat TOML key-value store for secrets, kept apart from config.toml so the
/// config file can be shared without leaking tokens.
pub struct CredentialStore {
    path: PathBuf,
    credentials: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let creds_data: CredentialsData = toml::from_str(&content)?;
            self.credentials = creds_data.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let creds_data = CredentialsData {
            data: self.credentials.clone(),
        };
        let content = toml::to_string_pretty(&creds_data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.credentials.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.credentials.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.credentials.remove(key);
    }

    // Convenience methods for the Plex access token
    pub fn get_plex_token(&self) -> Option<Credential> {
        self.get("plex_token").map(Credential::new)
    }

    pub fn set_plex_token(&mut self, credential: &Credential) {
        self.set("plex_token".to_string(), credential.as_str().to_string());
    }

    pub fn clear_plex_token(&mut self) {
        self.remove("plex_token");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_credential_store_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let mut store = CredentialStore::new(path.clone());
        store.set_plex_token(&Credential::new("test_token"));
        store.save().unwrap();

        let mut loaded_store = CredentialStore::new(path);
        loaded_store.load().unwrap();
        assert_eq!(
            loaded_store.get_plex_token(),
            Some(Credential::new("test_token"))
        );
    }

    #[test]
    fn test_credential_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CredentialStore::new(dir.path().join("credentials.toml"));
        store.load().unwrap();
        assert_eq!(store.get_plex_token(), None);
    }

    #[test]
    fn test_clear_plex_token() {
        let mut store = CredentialStore::new(PathBuf::from("/tmp/test"));
        store.set_plex_token(&Credential::new("abc"));
        assert!(store.get_plex_token().is_some());
        store.clear_plex_token();
        assert_eq!(store.get_plex_token(), None);
    }
}
