use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use roulette_config::{AppConfig, DocumentStore, PathManager};
use roulette_core::{HistoryRepository, RouletteEngine};
use roulette_models::resolve_library_key;

pub async fn run_genres(output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config = AppConfig::load_from_file(&path_manager.config_file())
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config: {}", e))?;

    let Some(server) = config.selected_server().cloned() else {
        output.error("No server configured. Run `mediaroulette login` first.");
        return Ok(());
    };

    let movie_key = config
        .movies_library
        .as_deref()
        .and_then(|title| resolve_library_key(&config.libraries, title));
    let show_key = config
        .tvshows_library
        .as_deref()
        .and_then(|title| resolve_library_key(&config.libraries, title));

    if movie_key.is_none() && show_key.is_none() {
        output.error("No library selected. Run `mediaroulette settings` to choose one.");
        return Ok(());
    }

    let documents = DocumentStore::new(path_manager.documents_dir())
        .map_err(|e| color_eyre::eyre::eyre!("Failed to open document store: {}", e))?;
    // History never records from a genre listing; the engine is only used
    // for its catalog access here
    let engine = RouletteEngine::new(server, HistoryRepository::new(documents), false, "");

    let genres = engine
        .available_genres(movie_key.as_deref(), show_key.as_deref())
        .await;

    if genres.is_empty() {
        output.warn("No genre tags found in the configured libraries.");
        return Ok(());
    }

    match output.format() {
        OutputFormat::Human => {
            for genre in &genres {
                output.println(genre);
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&serde_json::to_value(&genres)?);
        }
    }
    Ok(())
}
