use crate::output::{Output, OutputFormat};
use clap::ValueEnum;
use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL, Table};
use roulette_config::{DocumentStore, PathManager};
use roulette_core::{ExportFormat, WatchlistRepository};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormatArg {
    Csv,
    Json,
}

fn open_repository() -> Result<WatchlistRepository> {
    let path_manager = PathManager::default();
    let documents = DocumentStore::new(path_manager.documents_dir())
        .map_err(|e| color_eyre::eyre::eyre!("Failed to open document store: {}", e))?;
    Ok(WatchlistRepository::new(documents))
}

pub fn run_show(output: &Output) -> Result<()> {
    let repository = open_repository()?;
    let entries = repository
        .list()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load watchlist: {}", e))?;

    if entries.is_empty() {
        output.println("The watchlist is empty. Spin and save something first.");
        return Ok(());
    }

    match output.format() {
        OutputFormat::Human => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(["Title", "Year", "Kind", "Rating", "Runtime", "Genres"]);
            for entry in &entries {
                table.add_row([
                    entry.title.clone(),
                    entry.year.map(|y| y.to_string()).unwrap_or_default(),
                    entry.media_kind.clone(),
                    entry.rating.clone(),
                    entry.runtime.clone(),
                    entry.genres.clone(),
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

pub fn run_remove(title: &str, year: Option<u32>, output: &Output) -> Result<()> {
    let repository = open_repository()?;
    let removed = repository
        .remove(title, year)
        .map_err(|e| color_eyre::eyre::eyre!("Cannot remove \"{}\": {}", title, e))?;

    if removed {
        output.success(format!("Removed \"{}\" from the watchlist", title));
    } else {
        output.warn(format!(
            "No watchlist entry matches \"{}\"{}",
            title,
            year.map(|y| format!(" ({})", y)).unwrap_or_default()
        ));
    }
    Ok(())
}

pub fn run_export(format: ExportFormatArg, file: Option<PathBuf>, output: &Output) -> Result<()> {
    let repository = open_repository()?;
    let format = match format {
        ExportFormatArg::Csv => ExportFormat::Csv,
        ExportFormatArg::Json => ExportFormat::Json,
    };
    let rendered = repository
        .export(format)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to export watchlist: {}", e))?;

    match file {
        Some(path) => {
            std::fs::write(&path, rendered).map_err(|e| {
                color_eyre::eyre::eyre!("Failed to write {}: {}", path.display(), e)
            })?;
            output.success(format!("Watchlist exported to {}", path.display()));
        }
        None => {
            // Raw payload on stdout so it can be piped
            print!("{}", rendered);
        }
    }
    Ok(())
}
