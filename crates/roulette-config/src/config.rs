use roulette_models::{LibrarySection, ServerDescriptor};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fallback history namespace when no username is configured.
pub const DEFAULT_USER: &str = "default";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URI of the server picks are drawn from. Defaults to the first
    /// discovered server after login.
    #[serde(default)]
    pub server_url: Option<String>,
    /// All servers discovered at last authentication; replaced wholesale on
    /// re-login.
    #[serde(default)]
    pub servers: Vec<ServerDescriptor>,
    /// Library sections cached from the selected server.
    #[serde(default)]
    pub libraries: Vec<LibrarySection>,
    /// Title of the movie library to draw from, e.g. "Movies".
    #[serde(default)]
    pub movies_library: Option<String>,
    /// Title of the TV library to draw from, e.g. "TV Shows".
    #[serde(default)]
    pub tvshows_library: Option<String>,
    /// Global toggle for recording picks into history.
    #[serde(default = "default_true")]
    pub enable_history: bool,
    /// Namespace key for the pick history document.
    #[serde(default)]
    pub username: Option<String>,
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn new() -> Self {
        Self {
            enable_history: true,
            ..Default::default()
        }
    }

    /// History namespace for the current deployment.
    pub fn history_user(&self) -> &str {
        self.username.as_deref().unwrap_or(DEFAULT_USER)
    }

    /// The server descriptor matching the selected server URL.
    pub fn selected_server(&self) -> Option<&ServerDescriptor> {
        let url = self.server_url.as_deref()?;
        self.servers.iter().find(|s| s.base_uri == url)
    }

    /// Whether at least one library has been selected for spinning.
    pub fn has_library_selected(&self) -> bool {
        self.movies_library.is_some() || self.tvshows_library.is_some()
    }

    /// Drop everything tied to the Plex account: servers, libraries, and
    /// library selections. The credential itself lives in the credential
    /// store and is cleared separately.
    pub fn sign_out(&mut self) {
        self.server_url = None;
        self.servers.clear();
        self.libraries.clear();
        self.movies_library = None;
        self.tvshows_library = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roulette_models::LibraryKind;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let config = AppConfig {
            server_url: Some("http://192.168.1.10:32400".to_string()),
            servers: vec![ServerDescriptor {
                name: "Den".to_string(),
                base_uri: "http://192.168.1.10:32400".to_string(),
                access_token: "srv-token".to_string(),
            }],
            libraries: vec![LibrarySection {
                key: "1".to_string(),
                title: "Movies".to_string(),
                kind: LibraryKind::Movie,
            }],
            movies_library: Some("Movies".to_string()),
            tvshows_library: None,
            enable_history: false,
            username: Some("alex".to_string()),
        };
        config.save_to_file(&path).unwrap();

        let loaded = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.server_url.as_deref(), Some("http://192.168.1.10:32400"));
        assert_eq!(loaded.movies_library.as_deref(), Some("Movies"));
        assert!(!loaded.enable_history);
        assert_eq!(loaded.history_user(), "alex");
    }

    #[test]
    fn test_missing_config_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = AppConfig::load_from_file(&dir.path().join("config.toml")).unwrap();
        assert!(loaded.enable_history);
        assert_eq!(loaded.history_user(), DEFAULT_USER);
        assert!(!loaded.has_library_selected());
    }

    #[test]
    fn test_selected_server() {
        let mut config = AppConfig::new();
        config.servers = vec![
            ServerDescriptor {
                name: "Den".to_string(),
                base_uri: "http://a:32400".to_string(),
                access_token: "t1".to_string(),
            },
            ServerDescriptor {
                name: "Attic".to_string(),
                base_uri: "http://b:32400".to_string(),
                access_token: "t2".to_string(),
            },
        ];
        config.server_url = Some("http://b:32400".to_string());
        assert_eq!(config.selected_server().unwrap().name, "Attic");

        config.server_url = Some("http://c:32400".to_string());
        assert!(config.selected_server().is_none());
    }

    #[test]
    fn test_sign_out_clears_plex_state() {
        let mut config = AppConfig::new();
        config.server_url = Some("http://a:32400".to_string());
        config.movies_library = Some("Movies".to_string());
        config.username = Some("alex".to_string());
        config.sign_out();

        assert!(config.server_url.is_none());
        assert!(config.servers.is_empty());
        assert!(config.libraries.is_empty());
        assert!(!config.has_library_selected());
        // Local account settings survive a Plex sign-out
        assert_eq!(config.history_user(), "alex");
    }
}
