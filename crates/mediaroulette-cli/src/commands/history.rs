use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL, Table};
use roulette_config::{AppConfig, DocumentStore, PathManager};
use roulette_core::HistoryRepository;

fn open_repository() -> Result<(HistoryRepository, String)> {
    let path_manager = PathManager::default();
    let config = AppConfig::load_from_file(&path_manager.config_file())
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config: {}", e))?;
    let documents = DocumentStore::new(path_manager.documents_dir())
        .map_err(|e| color_eyre::eyre::eyre!("Failed to open document store: {}", e))?;
    Ok((
        HistoryRepository::new(documents),
        config.history_user().to_string(),
    ))
}

pub fn run_show(output: &Output) -> Result<()> {
    let (repository, user) = open_repository()?;
    let entries = repository
        .list(&user)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load history: {}", e))?;

    if entries.is_empty() {
        output.println("No picks recorded yet.");
        return Ok(());
    }

    match output.format() {
        OutputFormat::Human => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(["#", "Title", "Year", "Kind", "Rating"]);
            for (i, entry) in entries.iter().enumerate() {
                table.add_row([
                    (i + 1).to_string(),
                    entry.title.clone(),
                    entry.year.map(|y| y.to_string()).unwrap_or_default(),
                    entry.media_kind.clone(),
                    entry.rating.clone(),
                ]);
            }
            output.println(table.to_string());
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&serde_json::to_value(&entries)?);
        }
    }
    Ok(())
}

pub fn run_clear(output: &Output) -> Result<()> {
    let (repository, user) = open_repository()?;
    repository
        .clear(&user)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to clear history: {}", e))?;
    output.success(format!("Cleared pick history for {}", user));
    Ok(())
}
