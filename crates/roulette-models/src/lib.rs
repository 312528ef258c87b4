pub mod auth;
pub mod catalog;
pub mod criteria;
pub mod pick;
pub mod server;

pub use auth::{Credential, PendingAuthRequest};
pub use catalog::{CatalogItem, MediaKind};
pub use criteria::{FilterCriteria, MediaKindFilter, RATING_OPTIONS};
pub use pick::PickResult;
pub use server::{resolve_library_key, LibraryKind, LibrarySection, ServerDescriptor};
