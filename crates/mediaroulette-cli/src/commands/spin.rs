use crate::commands::prompts;
use crate::output::{Output, OutputFormat};
use clap::ValueEnum;
use color_eyre::Result;
use owo_colors::OwoColorize;
use roulette_config::{AppConfig, DocumentStore, PathManager};
use roulette_core::{HistoryRepository, RouletteEngine, SessionState, WatchlistRepository};
use roulette_models::{resolve_library_key, MediaKindFilter, PickResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MediaKindArg {
    Movie,
    Show,
    Both,
}

pub struct SpinRequest {
    pub media_kind: MediaKindArg,
    pub genre: Option<String>,
    pub rating: Option<String>,
    pub keyword: Option<String>,
    pub unwatched: bool,
    pub recent: bool,
    pub three: bool,
    pub save: bool,
}

pub async fn run_spin(request: SpinRequest, output: &Output) -> Result<()> {
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

    let mut session = SessionState::new();
    session.filters.media_kind = match request.media_kind {
        MediaKindArg::Movie => MediaKindFilter::Movie,
        MediaKindArg::Show => MediaKindFilter::Show,
        MediaKindArg::Both => MediaKindFilter::Both,
    };
    session.filters.genre = request.genre;
    session.filters.rating = request.rating;
    session.filters.keyword = request.keyword;
    session.filters.unwatched_only = request.unwatched;
    session.filters.recent_only = request.recent;
    session.filters.sample_size = if request.three { 3 } else { 1 };

    let documents = DocumentStore::new(path_manager.documents_dir())
        .map_err(|e| color_eyre::eyre::eyre!("Failed to open document store: {}", e))?;
    let watchlist = WatchlistRepository::new(documents.clone());
    let engine = RouletteEngine::new(
        server,
        HistoryRepository::new(documents),
        config.enable_history,
        config.history_user(),
    );

    let interactive = prompts::is_interactive()
        && output.format() == OutputFormat::Human
        && !output.is_quiet();

    loop {
        let picks = engine
            .spin(
                &session.filters,
                movie_key.as_deref(),
                show_key.as_deref(),
            )
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Spin failed: {}", e))?;

        if picks.is_empty() {
            output.warn("Nothing in your libraries matches these filters. Try loosening them.");
            return Ok(());
        }

        match output.format() {
            OutputFormat::Human => {
                for pick in &picks {
                    print_pick(pick, output);
                }
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                output.json(&serde_json::to_value(&picks)?);
            }
        }

        session.last_results = picks;

        if request.save {
            save_all(&watchlist, &session.last_results, output)?;
        } else if interactive {
            offer_watchlist_add(&watchlist, &session.last_results, output)?;
        }

        if interactive && prompts::prompt_yes_no("Spin again with the same filters?", false)? {
            continue;
        }
        return Ok(());
    }
}

fn print_pick(pick: &PickResult, output: &Output) {
    let year = pick
        .year
        .map(|y| format!(" ({})", y))
        .unwrap_or_default();
    output.println(format!(
        "\n{}{} — {}",
        pick.title.bold(),
        year,
        pick.media_kind
    ));

    let mut facts = vec![pick.rating.clone(), runtime_fact(&pick.runtime)];
    if !pick.genres.is_empty() {
        facts.insert(0, pick.genres.clone());
    }
    if let Some(audience) = &pick.audience_rating {
        facts.push(format!("★ {}", audience));
    }
    output.println(format!("  {}", facts.join(" · ")));
    output.println(format!("  {}", pick.summary));
    output.println(format!("  {}", pick.link.underline()));
}

/// "170 min" for numeric runtimes; the placeholder passes through untouched.
fn runtime_fact(runtime: &str) -> String {
    if runtime == "N/A" {
        runtime.to_string()
    } else {
        format!("{} min", runtime)
    }
}

fn save_all(watchlist: &WatchlistRepository, picks: &[PickResult], output: &Output) -> Result<()> {
    for pick in picks {
        let added = watchlist
            .add(pick.clone())
            .map_err(|e| color_eyre::eyre::eyre!("Failed to update watchlist: {}", e))?;
        if added {
            output.success(format!("Added \"{}\" to the watchlist", pick.title));
        } else {
            output.println(format!("\"{}\" is already on the watchlist", pick.title));
        }
    }
    Ok(())
}

fn offer_watchlist_add(
    watchlist: &WatchlistRepository,
    picks: &[PickResult],
    output: &Output,
) -> Result<()> {
    let labels: Vec<String> = picks
        .iter()
        .map(|p| match p.year {
            Some(year) => format!("{} ({})", p.title, year),
            None => p.title.clone(),
        })
        .collect();

    let selected = if picks.len() == 1 {
        if prompts::prompt_yes_no("Add it to your watchlist?", false)? {
            vec![0]
        } else {
            Vec::new()
        }
    } else {
        prompts::prompt_multi_select("Add any of these to your watchlist?", &labels)?
    };

    for index in selected {
        let added = watchlist
            .add(picks[index].clone())
            .map_err(|e| color_eyre::eyre::eyre!("Failed to update watchlist: {}", e))?;
        if added {
            output.success(format!("Added \"{}\" to the watchlist", picks[index].title));
        } else {
            output.println(format!(
                "\"{}\" is already on the watchlist",
                picks[index].title
            ));
        }
    }
    Ok(())
}
