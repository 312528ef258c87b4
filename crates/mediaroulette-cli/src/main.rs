use clap::{ArgAction, Parser, Subcommand};
use commands::spin::MediaKindArg;
use commands::{genres, history, login, settings, signout, spin, watchlist};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "mediaroulette")]
#[command(about = "MediaRoulette - Can't decide what to watch? Spin the wheel")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Link this device to a Plex account
    #[command(long_about = "Start the Plex device-pairing flow. A short code is displayed; enter it at https://plex.tv/link from any signed-in browser. Once approved, servers and libraries are discovered and saved.")]
    Login,

    /// Spin the roulette and get something to watch
    #[command(long_about = "Pick one (or three) random items from your configured libraries, honoring any filters. Every filter is optional; an unfiltered spin draws from everything.")]
    Spin {
        /// Restrict the draw to movies, shows, or both
        #[arg(long, value_enum, default_value = "both")]
        media_kind: MediaKindArg,

        /// Genre filter; compound labels like "Action/Adventure" match either part
        #[arg(long)]
        genre: Option<String>,

        /// Content rating filter (exact match, e.g. PG-13, TV-MA)
        #[arg(long, value_parser = clap::builder::PossibleValuesParser::new(
            roulette_models::RATING_OPTIONS.iter().copied()
        ))]
        rating: Option<String>,

        /// Keyword to look for in item summaries
        #[arg(long)]
        keyword: Option<String>,

        /// Only draw from unwatched items
        #[arg(long, action = ArgAction::SetTrue)]
        unwatched: bool,

        /// Only draw from items released in the last five years
        #[arg(long, action = ArgAction::SetTrue)]
        recent: bool,

        /// Draw three distinct picks instead of one
        #[arg(long, action = ArgAction::SetTrue)]
        three: bool,

        /// Add every pick to the watchlist without asking
        #[arg(long, action = ArgAction::SetTrue)]
        save: bool,
    },

    /// List the genres available across the configured libraries
    Genres,

    /// Manage the watchlist
    Watchlist {
        #[command(subcommand)]
        cmd: WatchlistCommands,
    },

    /// Show or clear the pick history
    History {
        #[command(subcommand)]
        cmd: HistoryCommands,
    },

    /// View or change server, library, and account settings
    #[command(long_about = "View or change settings. With no flags, runs an interactive wizard to pick the server and libraries. Individual flags change one setting non-interactively.")]
    Settings {
        /// Select the server by its base URL
        #[arg(long, value_name = "URL")]
        server_url: Option<String>,

        /// Title of the movie library to draw from
        #[arg(long, value_name = "TITLE")]
        movies_library: Option<String>,

        /// Title of the TV library to draw from
        #[arg(long, value_name = "TITLE")]
        tvshows_library: Option<String>,

        /// Username that namespaces the pick history
        #[arg(long)]
        username: Option<String>,

        /// Enable or disable pick history recording
        #[arg(long, value_name = "BOOL")]
        enable_history: Option<bool>,

        /// Print the current settings and exit
        #[arg(long, action = ArgAction::SetTrue)]
        show: bool,
    },

    /// Sign out and forget the Plex account
    Signout,
}

#[derive(Subcommand)]
enum WatchlistCommands {
    /// List watchlist entries
    Show,

    /// Remove an entry by title (and year, when titles collide)
    Remove {
        title: String,

        #[arg(long)]
        year: Option<u32>,
    },

    /// Export the watchlist
    Export {
        /// Export format
        #[arg(long, value_enum, default_value = "csv")]
        format: watchlist::ExportFormatArg,

        /// Write to this file instead of stdout
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// List the recorded picks, oldest first
    Show,

    /// Forget the current user's pick history
    Clear,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet, cli.log_file.clone())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Login => login::run_login(&output).await,
        Commands::Spin {
            media_kind,
            genre,
            rating,
            keyword,
            unwatched,
            recent,
            three,
            save,
        } => {
            let request = spin::SpinRequest {
                media_kind,
                genre,
                rating,
                keyword,
                unwatched,
                recent,
                three,
                save,
            };
            spin::run_spin(request, &output).await
        }
        Commands::Genres => genres::run_genres(&output).await,
        Commands::Watchlist { cmd } => match cmd {
            WatchlistCommands::Show => watchlist::run_show(&output),
            WatchlistCommands::Remove { title, year } => {
                watchlist::run_remove(&title, year, &output)
            }
            WatchlistCommands::Export { format, file } => {
                watchlist::run_export(format, file, &output)
            }
        },
        Commands::History { cmd } => match cmd {
            HistoryCommands::Show => history::run_show(&output),
            HistoryCommands::Clear => history::run_clear(&output),
        },
        Commands::Settings {
            server_url,
            movies_library,
            tvshows_library,
            username,
            enable_history,
            show,
        } => {
            let changes = settings::SettingsChanges {
                server_url,
                movies_library,
                tvshows_library,
                username,
                enable_history,
            };
            settings::run_settings(changes, show, &output).await
        }
        Commands::Signout => signout::run_signout(&output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_spin_rating_is_restricted_to_known_codes() {
        assert!(Cli::try_parse_from(["mediaroulette", "spin", "--rating", "PG-99"]).is_err());

        let cli = Cli::try_parse_from(["mediaroulette", "spin", "--rating", "PG-13"]).unwrap();
        match cli.command {
            Commands::Spin { rating, .. } => assert_eq!(rating.as_deref(), Some("PG-13")),
            _ => panic!("expected a spin command"),
        }
    }
}
