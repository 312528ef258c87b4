use crate::commands::prompts;
use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use roulette_config::{AppConfig, PathManager};
use roulette_models::{LibraryKind, LibrarySection};
use roulette_plex::list_library_sections;
use serde_json::json;

#[derive(Default)]
pub struct SettingsChanges {
    pub server_url: Option<String>,
    pub movies_library: Option<String>,
    pub tvshows_library: Option<String>,
    pub username: Option<String>,
    pub enable_history: Option<bool>,
}

impl SettingsChanges {
    fn is_empty(&self) -> bool {
        self.server_url.is_none()
            && self.movies_library.is_none()
            && self.tvshows_library.is_none()
            && self.username.is_none()
            && self.enable_history.is_none()
    }
}

pub async fn run_settings(changes: SettingsChanges, show: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();
    let mut config = AppConfig::load_from_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config: {}", e))?;

    if show || (changes.is_empty() && !prompts::is_interactive()) {
        print_settings(&config, output);
        return Ok(());
    }

    if changes.is_empty() {
        run_wizard(&mut config, output).await?;
    } else {
        apply_changes(&mut config, changes, output);
    }

    config
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config: {}", e))?;
    output.success("Settings saved");
    Ok(())
}

fn print_settings(config: &AppConfig, output: &Output) {
    match output.format() {
        OutputFormat::Human => {
            let none = "(not set)".to_string();
            output.println(format!(
                "Server:          {}",
                config.server_url.clone().unwrap_or_else(|| none.clone())
            ));
            output.println(format!(
                "Movie library:   {}",
                config
                    .movies_library
                    .clone()
                    .unwrap_or_else(|| none.clone())
            ));
            output.println(format!(
                "TV library:      {}",
                config
                    .tvshows_library
                    .clone()
                    .unwrap_or_else(|| none.clone())
            ));
            output.println(format!("History user:    {}", config.history_user()));
            output.println(format!(
                "Record history:  {}",
                if config.enable_history { "yes" } else { "no" }
            ));
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "server_url": config.server_url,
                "movies_library": config.movies_library,
                "tvshows_library": config.tvshows_library,
                "username": config.history_user(),
                "enable_history": config.enable_history,
            }));
        }
    }
}

fn apply_changes(config: &mut AppConfig, changes: SettingsChanges, output: &Output) {
    if let Some(url) = changes.server_url {
        if !config.servers.iter().any(|s| s.base_uri == url) {
            output.warn(format!(
                "{} is not among the discovered servers; keeping it anyway",
                url
            ));
        }
        config.server_url = Some(url);
    }
    if let Some(title) = changes.movies_library {
        warn_unknown_library(config, &title, output);
        config.movies_library = Some(title);
    }
    if let Some(title) = changes.tvshows_library {
        warn_unknown_library(config, &title, output);
        config.tvshows_library = Some(title);
    }
    if let Some(username) = changes.username {
        config.username = if username.is_empty() {
            None
        } else {
            Some(username)
        };
    }
    if let Some(enabled) = changes.enable_history {
        config.enable_history = enabled;
    }
}

fn warn_unknown_library(config: &AppConfig, title: &str, output: &Output) {
    if !config.libraries.iter().any(|l| l.title == title) {
        output.warn(format!(
            "No library named \"{}\" was found at the last refresh (titles are case-sensitive)",
            title
        ));
    }
}

async fn run_wizard(config: &mut AppConfig, output: &Output) -> Result<()> {
    if config.servers.is_empty() {
        output.error("No servers discovered yet. Run `mediaroulette login` first.");
        return Ok(());
    }

    let labels: Vec<String> = config
        .servers
        .iter()
        .map(|s| format!("{} ({})", s.name, s.base_uri))
        .collect();
    let current = config
        .servers
        .iter()
        .position(|s| Some(s.base_uri.as_str()) == config.server_url.as_deref())
        .unwrap_or(0);
    let selected = prompts::prompt_select("Which server should picks come from?", &labels, current)?;
    config.server_url = Some(config.servers[selected].base_uri.clone());

    // Refresh the section list from the chosen server so the library menus
    // reflect what is actually there
    let server = config.servers[selected].clone();
    match list_library_sections(&server).await {
        Ok(sections) => config.libraries = sections,
        Err(e) => output.warn(format!(
            "Could not refresh libraries ({}); using the cached list",
            e
        )),
    }

    config.movies_library = pick_library(
        &config.libraries,
        LibraryKind::Movie,
        "Which movie library?",
        config.movies_library.as_deref(),
    )?;
    config.tvshows_library = pick_library(
        &config.libraries,
        LibraryKind::Show,
        "Which TV library?",
        config.tvshows_library.as_deref(),
    )?;

    let username = prompts::prompt_string(
        "Username for pick history (empty for the shared default)",
        config.username.as_deref(),
    )?;
    config.username = if username.trim().is_empty() {
        None
    } else {
        Some(username.trim().to_string())
    };

    config.enable_history =
        prompts::prompt_yes_no("Record picks in history?", config.enable_history)?;

    Ok(())
}

fn pick_library(
    sections: &[LibrarySection],
    kind: LibraryKind,
    prompt: &str,
    current: Option<&str>,
) -> Result<Option<String>> {
    let titles: Vec<String> = sections
        .iter()
        .filter(|s| s.kind == kind)
        .map(|s| s.title.clone())
        .collect();
    if titles.is_empty() {
        return Ok(None);
    }

    let mut options = titles.clone();
    options.push("(none)".to_string());
    let default = current
        .and_then(|title| titles.iter().position(|t| t == title))
        .unwrap_or(0);

    let selected = prompts::prompt_select(prompt, &options, default)?;
    if selected == titles.len() {
        Ok(None)
    } else {
        Ok(Some(titles[selected].clone()))
    }
}
