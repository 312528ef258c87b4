pub mod genres;
pub mod history;
pub mod login;
pub mod prompts;
pub mod settings;
pub mod signout;
pub mod spin;
pub mod watchlist;
