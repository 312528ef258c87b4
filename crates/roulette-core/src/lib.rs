pub mod filter;
pub mod history;
pub mod pipeline;
pub mod project;
pub mod sample;
pub mod session;
pub mod watchlist;

pub use history::HistoryRepository;
pub use pipeline::{collect_genres, RouletteEngine};
pub use session::SessionState;
pub use watchlist::{ExportFormat, WatchlistRepository};
