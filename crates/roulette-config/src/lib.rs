pub mod config;
pub mod credentials;
pub mod paths;
pub mod store;

pub use config::AppConfig;
pub use credentials::CredentialStore;
pub use paths::{container_base_path, PathManager};
pub use store::DocumentStore;
