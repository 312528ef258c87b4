use serde::{Deserialize, Serialize};

/// One discovered media server.
///
/// Immutable once discovered; the whole set is replaced on
/// re-authentication. The base URI is the single connection chosen during
/// discovery, locally-reachable URIs preferred over remote ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDescriptor {
    pub name: String,
    pub base_uri: String,
    pub access_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LibraryKind {
    Movie,
    Show,
    Other,
}

impl LibraryKind {
    pub fn from_plex_type(type_: &str) -> Self {
        match type_ {
            "movie" => LibraryKind::Movie,
            "show" => LibraryKind::Show,
            _ => LibraryKind::Other,
        }
    }
}

/// One library section enumerated from a server, used to resolve a
/// human-readable library name (e.g. "Movies") to its fetch key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibrarySection {
    pub key: String,
    pub title: String,
    pub kind: LibraryKind,
}

/// Exact case-sensitive match of a library title to its section key.
/// `None` is a normal outcome: the user simply has not selected a library
/// of that kind yet.
pub fn resolve_library_key(sections: &[LibrarySection], title: &str) -> Option<String> {
    sections
        .iter()
        .find(|s| s.title == title)
        .map(|s| s.key.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> Vec<LibrarySection> {
        vec![
            LibrarySection {
                key: "1".to_string(),
                title: "Movies".to_string(),
                kind: LibraryKind::Movie,
            },
            LibrarySection {
                key: "2".to_string(),
                title: "TV Shows".to_string(),
                kind: LibraryKind::Show,
            },
        ]
    }

    #[test]
    fn test_resolve_library_key_exact_match() {
        let sections = sections();
        assert_eq!(resolve_library_key(&sections, "Movies"), Some("1".to_string()));
        assert_eq!(resolve_library_key(&sections, "TV Shows"), Some("2".to_string()));
    }

    #[test]
    fn test_resolve_library_key_is_case_sensitive() {
        let sections = sections();
        assert_eq!(resolve_library_key(&sections, "movies"), None);
        assert_eq!(resolve_library_key(&sections, "Anime"), None);
    }

    #[test]
    fn test_library_kind_from_plex_type() {
        assert_eq!(LibraryKind::from_plex_type("movie"), LibraryKind::Movie);
        assert_eq!(LibraryKind::from_plex_type("show"), LibraryKind::Show);
        assert_eq!(LibraryKind::from_plex_type("artist"), LibraryKind::Other);
    }
}
