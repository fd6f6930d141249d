use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the named per-user movie lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListKind {
    Watchlist,
    Favorites,
    Watched,
}

impl ListKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Watchlist => "Watchlist",
            Self::Favorites => "Favorites",
            Self::Watched => "Watched",
        }
    }

    /// Database key (lowercase, matches the persisted list names).
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Watchlist => "watchlist",
            Self::Favorites => "favorites",
            Self::Watched => "watched",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "watchlist" => Some(Self::Watchlist),
            "favorites" => Some(Self::Favorites),
            "watched" => Some(Self::Watched),
            _ => None,
        }
    }

    pub const ALL: &[ListKind] = &[Self::Watchlist, Self::Favorites, Self::Watched];
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything stored in a per-user list, keyed by movie ID.
pub trait ListItem {
    fn item_id(&self) -> u64;
}

/// A watchlist or favorites entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRecord {
    pub id: u64,
    pub title: String,
}

impl ListRecord {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

impl ListItem for ListRecord {
    fn item_id(&self) -> u64 {
        self.id
    }
}

/// A watched-progress entry. Progress is a percentage in `0..=100`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchedRecord {
    pub id: u64,
    pub title: String,
    pub progress: u8,
    pub last_watched: DateTime<Utc>,
}

impl ListItem for WatchedRecord {
    fn item_id(&self) -> u64 {
        self.id
    }
}

/// Result of a replace-or-append write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
}

/// Result of an add-if-absent write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}
