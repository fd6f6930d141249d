use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::LuharError;
use crate::models::{AddOutcome, ListItem, ListKind, ListRecord, Upsert, WatchedRecord};

const SCHEMA_V1: &str = include_str!("../../../migrations/001_initial.sql");

/// Who a stored value belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Namespace {
    User(String),
    Global,
}

impl Namespace {
    pub fn user(name: impl Into<String>) -> Self {
        Self::User(name.into())
    }

    fn columns(&self) -> (&'static str, &str) {
        match self {
            Self::User(name) => ("user", name.as_str()),
            Self::Global => ("global", ""),
        }
    }
}

/// What a stored value is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    List(ListKind),
    Avatar,
    NightMode,
}

impl KeyKind {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::List(kind) => kind.as_db_str(),
            Self::Avatar => "avatar",
            Self::NightMode => "night_mode",
        }
    }
}

/// Structured storage key. Usernames live in their own column, so no
/// username can collide with another user's keys or with global keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreKey {
    pub namespace: Namespace,
    pub kind: KeyKind,
}

impl StoreKey {
    pub fn list(user: &str, kind: ListKind) -> Self {
        Self {
            namespace: Namespace::user(user),
            kind: KeyKind::List(kind),
        }
    }

    pub fn avatar(user: &str) -> Self {
        Self {
            namespace: Namespace::user(user),
            kind: KeyKind::Avatar,
        }
    }

    pub fn night_mode() -> Self {
        Self {
            namespace: Namespace::Global,
            kind: KeyKind::NightMode,
        }
    }
}

/// SQLite-backed key/value storage for per-user lists and preferences.
///
/// Lists are stored whole, as JSON arrays, and rewritten on every change.
/// Nothing is locked across read and write, so two processes updating the
/// same list race and the last write wins.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open (or create) the database at the given path and run migrations.
    pub fn open(path: &Path) -> Result<Self, LuharError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, LuharError> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    // ── Raw values ──────────────────────────────────────────────

    /// Get the raw stored string for a key.
    pub fn get_value(&self, key: &StoreKey) -> Result<Option<String>, LuharError> {
        let (scope, owner) = key.namespace.columns();
        self.conn
            .query_row(
                "SELECT value FROM kv_entry WHERE scope = ?1 AND owner = ?2 AND key = ?3",
                params![scope, owner, key.kind.as_db_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Store a raw string, replacing any previous value.
    pub fn set_value(&self, key: &StoreKey, value: &str) -> Result<(), LuharError> {
        let (scope, owner) = key.namespace.columns();
        self.conn.execute(
            "INSERT INTO kv_entry (scope, owner, key, value, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(scope, owner, key) DO UPDATE SET
               value = excluded.value,
               updated_at = excluded.updated_at",
            params![
                scope,
                owner,
                key.kind.as_db_str(),
                value,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// Delete a key. Returns whether anything was stored under it.
    pub fn remove_value(&self, key: &StoreKey) -> Result<bool, LuharError> {
        let (scope, owner) = key.namespace.columns();
        let removed = self.conn.execute(
            "DELETE FROM kv_entry WHERE scope = ?1 AND owner = ?2 AND key = ?3",
            params![scope, owner, key.kind.as_db_str()],
        )?;
        Ok(removed > 0)
    }

    // ── User lists ──────────────────────────────────────────────

    /// Load a user's list. Absent or unparseable data reads as empty.
    pub fn list_for<T: DeserializeOwned>(
        &self,
        user: &str,
        list: ListKind,
    ) -> Result<Vec<T>, LuharError> {
        let Some(raw) = self.get_value(&StoreKey::list(user, list))? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!(user, list = list.as_db_str(), error = %e, "Discarding malformed list");
                Ok(Vec::new())
            }
        }
    }

    fn save_list<T: Serialize>(
        &self,
        user: &str,
        list: ListKind,
        items: &[T],
    ) -> Result<(), LuharError> {
        let json = serde_json::to_string(items)?;
        self.set_value(&StoreKey::list(user, list), &json)
    }

    /// Replace the item with the same ID, or append it.
    pub fn upsert<T>(&self, user: &str, list: ListKind, item: T) -> Result<Upsert, LuharError>
    where
        T: ListItem + Serialize + DeserializeOwned,
    {
        let mut items: Vec<T> = self.list_for(user, list)?;
        let outcome = match items.iter().position(|i| i.item_id() == item.item_id()) {
            Some(idx) => {
                items[idx] = item;
                Upsert::Replaced
            }
            None => {
                items.push(item);
                Upsert::Inserted
            }
        };
        self.save_list(user, list, &items)?;
        Ok(outcome)
    }

    /// Append the item unless one with the same ID is already present.
    /// Nothing is written when it is.
    pub fn add_if_absent<T>(
        &self,
        user: &str,
        list: ListKind,
        item: T,
    ) -> Result<AddOutcome, LuharError>
    where
        T: ListItem + Serialize + DeserializeOwned,
    {
        let mut items: Vec<T> = self.list_for(user, list)?;
        if items.iter().any(|i| i.item_id() == item.item_id()) {
            return Ok(AddOutcome::AlreadyPresent);
        }
        items.push(item);
        self.save_list(user, list, &items)?;
        Ok(AddOutcome::Added)
    }

    /// Remove the item with the given ID. Returns whether one was removed.
    ///
    /// Works on the raw JSON so any list kind can be filtered without knowing
    /// its record type.
    pub fn remove(&self, user: &str, list: ListKind, id: u64) -> Result<bool, LuharError> {
        let mut items: Vec<serde_json::Value> = self.list_for(user, list)?;
        let before = items.len();
        items.retain(|v| v.get("id").and_then(|x| x.as_u64()) != Some(id));
        let removed = items.len() != before;
        if removed {
            self.save_list(user, list, &items)?;
        }
        Ok(removed)
    }

    /// Watchlist or favorites entries.
    pub fn records(&self, user: &str, list: ListKind) -> Result<Vec<ListRecord>, LuharError> {
        self.list_for(user, list)
    }

    /// Delete all of a user's lists (logout).
    pub fn clear_user_lists(&self, user: &str) -> Result<(), LuharError> {
        for kind in ListKind::ALL {
            self.remove_value(&StoreKey::list(user, *kind))?;
        }
        Ok(())
    }

    // ── Watched progress ────────────────────────────────────────

    /// Record watch progress for a movie, stamping the current time.
    ///
    /// Progress above 100 is clamped.
    pub fn mark_watched(
        &self,
        user: &str,
        id: u64,
        title: &str,
        progress: u8,
    ) -> Result<Upsert, LuharError> {
        self.mark_watched_at(user, id, title, progress, Utc::now())
    }

    /// [`mark_watched`](Self::mark_watched) with an explicit timestamp.
    pub fn mark_watched_at(
        &self,
        user: &str,
        id: u64,
        title: &str,
        progress: u8,
        at: DateTime<Utc>,
    ) -> Result<Upsert, LuharError> {
        let record = WatchedRecord {
            id,
            title: title.to_string(),
            progress: progress.min(100),
            last_watched: at,
        };
        self.upsert(user, ListKind::Watched, record)
    }

    /// All watched records for a user, in insertion order.
    pub fn watched(&self, user: &str) -> Result<Vec<WatchedRecord>, LuharError> {
        self.list_for(user, ListKind::Watched)
    }

    /// Watch progress for a movie, 0 if it was never marked.
    pub fn watched_progress(&self, user: &str, id: u64) -> Result<u8, LuharError> {
        Ok(self
            .watched(user)?
            .into_iter()
            .find(|r| r.id == id)
            .map(|r| r.progress)
            .unwrap_or(0))
    }

    // ── Preferences ─────────────────────────────────────────────

    pub fn avatar(&self, user: &str) -> Result<Option<String>, LuharError> {
        self.get_value(&StoreKey::avatar(user))
    }

    pub fn set_avatar(&self, user: &str, avatar: &str) -> Result<(), LuharError> {
        self.set_value(&StoreKey::avatar(user), avatar)
    }
}

// ── Migrations ──────────────────────────────────────────────────

/// Run schema migrations using `PRAGMA user_version` for version tracking.
fn run_migrations(conn: &Connection) -> Result<(), LuharError> {
    let version: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .unwrap_or(0);

    if version < 1 {
        conn.execute_batch(SCHEMA_V1)?;
        conn.pragma_update(None, "user_version", 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_missing_list_is_empty() {
        let db = Storage::open_memory().unwrap();
        let items: Vec<ListRecord> = db.list_for("alice", ListKind::Watchlist).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_malformed_list_is_empty() {
        let db = Storage::open_memory().unwrap();
        db.set_value(&StoreKey::list("alice", ListKind::Watchlist), "{not json")
            .unwrap();
        let items = db.records("alice", ListKind::Watchlist).unwrap();
        assert!(items.is_empty());

        // A write after a malformed read starts over cleanly.
        db.add_if_absent("alice", ListKind::Watchlist, ListRecord::new(1, "A"))
            .unwrap();
        assert_eq!(db.records("alice", ListKind::Watchlist).unwrap().len(), 1);
    }

    #[test]
    fn test_add_if_absent_is_idempotent() {
        let db = Storage::open_memory().unwrap();
        let first = db
            .add_if_absent("alice", ListKind::Watchlist, ListRecord::new(42, "X"))
            .unwrap();
        let second = db
            .add_if_absent("alice", ListKind::Watchlist, ListRecord::new(42, "X"))
            .unwrap();

        assert_eq!(first, AddOutcome::Added);
        assert_eq!(second, AddOutcome::AlreadyPresent);
        let items = db.records("alice", ListKind::Watchlist).unwrap();
        assert_eq!(items, vec![ListRecord::new(42, "X")]);
    }

    #[test]
    fn test_upsert_replaces_by_id_and_keeps_order() {
        let db = Storage::open_memory().unwrap();
        db.upsert("alice", ListKind::Favorites, ListRecord::new(1, "One"))
            .unwrap();
        db.upsert("alice", ListKind::Favorites, ListRecord::new(2, "Two"))
            .unwrap();
        let outcome = db
            .upsert("alice", ListKind::Favorites, ListRecord::new(1, "Uno"))
            .unwrap();

        assert_eq!(outcome, Upsert::Replaced);
        let items = db.records("alice", ListKind::Favorites).unwrap();
        assert_eq!(items, vec![ListRecord::new(1, "Uno"), ListRecord::new(2, "Two")]);
    }

    #[test]
    fn test_remove() {
        let db = Storage::open_memory().unwrap();
        db.upsert("alice", ListKind::Watchlist, ListRecord::new(1, "One"))
            .unwrap();
        db.upsert("alice", ListKind::Watchlist, ListRecord::new(2, "Two"))
            .unwrap();

        assert!(db.remove("alice", ListKind::Watchlist, 1).unwrap());
        assert!(!db.remove("alice", ListKind::Watchlist, 1).unwrap());
        assert_eq!(
            db.records("alice", ListKind::Watchlist).unwrap(),
            vec![ListRecord::new(2, "Two")]
        );
    }

    #[test]
    fn test_remove_from_missing_list_writes_nothing() {
        let db = Storage::open_memory().unwrap();
        assert!(!db.remove("bob", ListKind::Favorites, 7).unwrap());
        assert_eq!(
            db.get_value(&StoreKey::list("bob", ListKind::Favorites)).unwrap(),
            None
        );
    }

    #[test]
    fn test_watched_upsert_updates_single_record() {
        let db = Storage::open_memory().unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap();

        let first = db.mark_watched_at("alice", 42, "X", 30, t1).unwrap();
        let second = db.mark_watched_at("alice", 42, "X", 80, t2).unwrap();

        assert_eq!(first, Upsert::Inserted);
        assert_eq!(second, Upsert::Replaced);
        let watched = db.watched("alice").unwrap();
        assert_eq!(watched.len(), 1);
        assert_eq!(watched[0].progress, 80);
        assert_eq!(watched[0].last_watched, t2);
        assert_eq!(db.watched_progress("alice", 42).unwrap(), 80);
        assert_eq!(db.watched_progress("alice", 7).unwrap(), 0);
    }

    #[test]
    fn test_watched_progress_is_clamped() {
        let db = Storage::open_memory().unwrap();
        db.mark_watched("alice", 1, "Over", 250).unwrap();
        assert_eq!(db.watched_progress("alice", 1).unwrap(), 100);
    }

    #[test]
    fn test_users_are_isolated() {
        let db = Storage::open_memory().unwrap();
        db.upsert("a_watchlist", ListKind::Watchlist, ListRecord::new(1, "One"))
            .unwrap();
        db.upsert("a", ListKind::Watchlist, ListRecord::new(2, "Two"))
            .unwrap();

        assert_eq!(db.records("a", ListKind::Watchlist).unwrap().len(), 1);
        assert_eq!(
            db.records("a_watchlist", ListKind::Watchlist).unwrap()[0].id,
            1
        );
    }

    #[test]
    fn test_clear_user_lists() {
        let db = Storage::open_memory().unwrap();
        db.upsert("alice", ListKind::Watchlist, ListRecord::new(1, "One"))
            .unwrap();
        db.mark_watched("alice", 1, "One", 50).unwrap();
        db.set_avatar("alice", "https://example.com/a.png").unwrap();
        db.upsert("bob", ListKind::Watchlist, ListRecord::new(1, "One"))
            .unwrap();

        db.clear_user_lists("alice").unwrap();

        assert!(db.records("alice", ListKind::Watchlist).unwrap().is_empty());
        assert!(db.watched("alice").unwrap().is_empty());
        assert!(db.avatar("alice").unwrap().is_some());
        assert_eq!(db.records("bob", ListKind::Watchlist).unwrap().len(), 1);
    }

    #[test]
    fn test_global_and_user_keys_do_not_collide() {
        let db = Storage::open_memory().unwrap();
        db.set_value(&StoreKey::night_mode(), "enabled").unwrap();
        assert_eq!(db.avatar("").unwrap(), None);
        assert!(db.remove_value(&StoreKey::night_mode()).unwrap());
        assert!(!db.remove_value(&StoreKey::night_mode()).unwrap());
    }
}
