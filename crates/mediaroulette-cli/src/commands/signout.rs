use crate::output::Output;
use color_eyre::Result;
use roulette_config::{AppConfig, CredentialStore, PathManager};

pub fn run_signout(output: &Output) -> Result<()> {
    let path_manager = PathManager::default();

    let mut store = CredentialStore::new(path_manager.credentials_file());
    store
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials: {}", e))?;
    let had_token = store.get_plex_token().is_some();
    store.clear_plex_token();
    store
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials: {}", e))?;

    let config_file = path_manager.config_file();
    let mut config = AppConfig::load_from_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config: {}", e))?;
    config.sign_out();
    config
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config: {}", e))?;

    if had_token {
        output.success("Signed out. History and watchlist are kept locally.");
    } else {
        output.println("No account was signed in; cleared any stale server state.");
    }
    Ok(())
}
