use std::path::Path;

use crate::error::LuharError;

/// Name of the cookie that carries the logged-in username.
pub const SESSION_COOKIE: &str = "username";

/// Environment variable holding a cookie string that overrides the jar file.
pub const SESSION_ENV: &str = "LUHAR_SESSION";

/// Read-only view of the externally-set session marker.
///
/// The marker is a plain cookie string (`name=value; other=value`). It carries
/// no signature and no expiry, so anyone able to write it can impersonate any
/// user. Login happens elsewhere; this type never writes a username.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionMarker {
    username: Option<String>,
}

impl SessionMarker {
    /// A marker with nobody logged in.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Parse a cookie header string.
    pub fn from_header(header: &str) -> Self {
        Self {
            username: parse_cookie(header, SESSION_COOKIE),
        }
    }

    /// Load the marker from a cookie jar file. A missing or unreadable file
    /// means nobody is logged in.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_header(contents.trim()),
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to read session marker");
                }
                Self::anonymous()
            }
        }
    }

    /// [`SESSION_ENV`] if set, otherwise the jar file at `path`.
    pub fn from_env_or_file(path: &Path) -> Self {
        match std::env::var(SESSION_ENV) {
            Ok(header) => Self::from_header(header.trim()),
            Err(_) => Self::load(path),
        }
    }

    /// Remove the marker file (logout). Already-absent files are fine.
    pub fn clear(path: &Path) -> Result<(), LuharError> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.username.is_some()
    }
}

/// Look up a cookie value by name.
///
/// Only an unambiguous match counts: a name that appears more than once yields
/// `None`, as does an empty value.
pub fn parse_cookie(header: &str, name: &str) -> Option<String> {
    let mut found = None;
    for pair in header.split(';') {
        let Some((key, value)) = pair.trim().split_once('=') else {
            continue;
        };
        if key.trim() == name {
            if found.is_some() {
                return None;
            }
            found = Some(value.trim().to_string());
        }
    }
    found.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cookie_single() {
        assert_eq!(parse_cookie("username=alice", "username").as_deref(), Some("alice"));
    }

    #[test]
    fn test_parse_cookie_among_others() {
        let header = "session_id=abc123; username=bob; theme=dark";
        assert_eq!(parse_cookie(header, "username").as_deref(), Some("bob"));
        assert_eq!(parse_cookie(header, "session_id").as_deref(), Some("abc123"));
    }

    #[test]
    fn test_parse_cookie_missing_or_ambiguous() {
        assert_eq!(parse_cookie("theme=dark", "username"), None);
        assert_eq!(parse_cookie("username=a; username=b", "username"), None);
        assert_eq!(parse_cookie("username=", "username"), None);
        assert_eq!(parse_cookie("", "username"), None);
    }

    #[test]
    fn test_parse_cookie_does_not_match_suffix() {
        assert_eq!(parse_cookie("old_username=carol", "username"), None);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies");
        std::fs::write(&path, "username=dave\n").unwrap();

        let marker = SessionMarker::load(&path);
        assert_eq!(marker.username(), Some("dave"));

        SessionMarker::clear(&path).unwrap();
        assert!(!SessionMarker::load(&path).is_logged_in());
        // Clearing twice is not an error.
        SessionMarker::clear(&path).unwrap();
    }
}
