use crate::output::Output;
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use roulette_config::{AppConfig, CredentialStore, PathManager};
use roulette_core::SessionState;
use roulette_models::Credential;
use roulette_plex::{discover_servers, list_library_sections, PinClient, PollStatus};
use std::time::Duration;
use tracing::info;

const POLL_INTERVAL: Duration = Duration::from_secs(2);

pub async fn run_login(output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    path_manager
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create directories: {}", e))?;

    let pin_client = PinClient::new()?;
    let request = pin_client.initiate().await?;

    output.println(format!(
        "Open {} and enter this code: {}",
        "https://plex.tv/link".underline(),
        request.code.bold()
    ));

    let mut session = SessionState::new();
    session.pending_auth = Some(request);

    let spinner = if !output.is_quiet() {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Waiting for approval...");
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };

    // The session holds the pairing request for as long as polling is
    // worthwhile; a terminal answer (or local staleness) clears it
    let credential = loop {
        let Some(pending) = session.pending_auth.clone() else {
            return Ok(());
        };

        if pending.is_stale() {
            session.pending_auth = None;
            if let Some(pb) = &spinner {
                pb.finish_and_clear();
            }
            output.error("The pairing code expired before it was approved. Run login again.");
            return Ok(());
        }

        tokio::time::sleep(POLL_INTERVAL).await;

        match pin_client.poll(pending.id).await? {
            PollStatus::Pending => continue,
            PollStatus::Expired => {
                session.pending_auth = None;
                if let Some(pb) = &spinner {
                    pb.finish_and_clear();
                }
                output.error("The pairing code expired before it was approved. Run login again.");
                return Ok(());
            }
            PollStatus::Authorized(credential) => {
                session.pending_auth = None;
                if let Some(pb) = &spinner {
                    pb.finish_and_clear();
                }
                break credential;
            }
        }
    };

    info!("Device pairing approved");
    output.success("Signed in to Plex");

    save_credential(&path_manager, &credential)?;
    refresh_account_state(&path_manager, &credential, output).await
}

fn save_credential(path_manager: &PathManager, credential: &Credential) -> Result<()> {
    let mut store = CredentialStore::new(path_manager.credentials_file());
    store
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials: {}", e))?;
    store.set_plex_token(credential);
    store
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials: {}", e))?;
    Ok(())
}

/// Discover servers and libraries for the fresh token and persist them.
/// A previously selected server is kept if it is still reachable under the
/// new account; otherwise the first discovered server becomes the default.
async fn refresh_account_state(
    path_manager: &PathManager,
    credential: &Credential,
    output: &Output,
) -> Result<()> {
    let servers = discover_servers(credential).await?;
    if servers.is_empty() {
        output.warn("No media servers are visible to this account");
        return Ok(());
    }

    let config_file = path_manager.config_file();
    let mut config = AppConfig::load_from_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config: {}", e))?;

    let keep_selected = config
        .server_url
        .as_deref()
        .map(|url| servers.iter().any(|s| s.base_uri == url))
        .unwrap_or(false);
    if !keep_selected {
        config.server_url = Some(servers[0].base_uri.clone());
    }
    config.servers = servers;

    if let Some(server) = config.selected_server().cloned() {
        match list_library_sections(&server).await {
            Ok(sections) => {
                output.success(format!(
                    "Found server \"{}\" with {} libraries",
                    server.name,
                    sections.len()
                ));
                config.libraries = sections;
            }
            Err(e) => {
                output.warn(format!(
                    "Could not list libraries on \"{}\": {}. Run settings to retry.",
                    server.name, e
                ));
            }
        }
    }

    config
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config: {}", e))?;

    if !config.has_library_selected() {
        output.println("Next: run `mediaroulette settings` to choose your libraries.");
    }
    Ok(())
}
