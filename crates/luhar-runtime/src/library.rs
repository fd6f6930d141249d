//! Per-user list actions, avatar and theme preferences.
//!
//! Every user-facing action returns a [`Notification`]. Expected refusals
//! (logged out, duplicate entry, bad upload) are error notifications, not
//! `Err`; `Err` is reserved for storage failures.

use std::path::{Path, PathBuf};

use luhar_core::avatar;
use luhar_core::error::LuharError;
use luhar_core::identity::SessionMarker;
use luhar_core::models::{AddOutcome, ListKind, ListRecord, Upsert, WatchedRecord};
use luhar_core::preferences::NightMode;
use luhar_core::storage::Storage;

use crate::notify::Notification;
use crate::render::RenderContext;
use crate::RuntimeError;

pub const LOGIN_REQUIRED: &str = "Please log in to use this feature.";
pub const LOGIN_REQUIRED_WATCHED: &str = "Please log in to track watched movies.";
pub const LOGIN_REQUIRED_AVATAR: &str = "Please log in to change your avatar.";

/// The signed-in user's library, backed by the key/value store.
pub struct Library {
    storage: Storage,
    session: SessionMarker,
    session_path: PathBuf,
}

impl Library {
    /// Reads the session marker from `session_path`.
    pub fn open(storage: Storage, session_path: impl Into<PathBuf>) -> Self {
        let session_path = session_path.into();
        let session = SessionMarker::from_env_or_file(&session_path);
        Self::with_session(storage, session, session_path)
    }

    pub fn with_session(storage: Storage, session: SessionMarker, session_path: impl Into<PathBuf>) -> Self {
        Self {
            storage,
            session,
            session_path: session_path.into(),
        }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn session(&self) -> &SessionMarker {
        &self.session
    }

    pub fn username(&self) -> Option<&str> {
        self.session.username()
    }

    // ── Watchlist / favorites ───────────────────────────────────

    pub fn add_to_watchlist(&self, id: u64, title: &str) -> Result<Notification, RuntimeError> {
        self.add_to(ListKind::Watchlist, "watchlist", id, title)
    }

    pub fn add_to_favorites(&self, id: u64, title: &str) -> Result<Notification, RuntimeError> {
        self.add_to(ListKind::Favorites, "favorites", id, title)
    }

    fn add_to(
        &self,
        list: ListKind,
        noun: &str,
        id: u64,
        title: &str,
    ) -> Result<Notification, RuntimeError> {
        let Some(user) = self.username() else {
            return Ok(Notification::error(LOGIN_REQUIRED));
        };
        let outcome = self
            .storage
            .add_if_absent(user, list, ListRecord::new(id, title))?;
        Ok(match outcome {
            AddOutcome::Added => {
                tracing::info!(user, id, list = list.as_db_str(), "Added to list");
                Notification::success(format!("{title} added to your {noun}!"))
            }
            AddOutcome::AlreadyPresent => {
                Notification::error(format!("{title} is already in your {noun}."))
            }
        })
    }

    pub fn remove_from_watchlist(&self, id: u64, title: &str) -> Result<Notification, RuntimeError> {
        self.remove_from(ListKind::Watchlist, "watchlist", id, title)
    }

    pub fn remove_from_favorites(&self, id: u64, title: &str) -> Result<Notification, RuntimeError> {
        self.remove_from(ListKind::Favorites, "favorites", id, title)
    }

    pub fn remove_from_watched(&self, id: u64, title: &str) -> Result<Notification, RuntimeError> {
        self.remove_from(ListKind::Watched, "watched list", id, title)
    }

    fn remove_from(
        &self,
        list: ListKind,
        noun: &str,
        id: u64,
        title: &str,
    ) -> Result<Notification, RuntimeError> {
        let Some(user) = self.username() else {
            return Ok(Notification::error(LOGIN_REQUIRED));
        };
        if self.storage.remove(user, list, id)? {
            Ok(Notification::success(format!("{title} removed from {noun}")))
        } else {
            Ok(Notification::info(format!("{title} is not in your {noun}.")))
        }
    }

    // ── Watched ─────────────────────────────────────────────────

    /// Record progress (percent, clamped to 100) for a movie.
    pub fn mark_watched(
        &self,
        id: u64,
        title: &str,
        progress: u8,
    ) -> Result<Notification, RuntimeError> {
        let Some(user) = self.username() else {
            return Ok(Notification::error(LOGIN_REQUIRED_WATCHED));
        };
        let progress = progress.min(100);
        Ok(match self.storage.mark_watched(user, id, title, progress)? {
            Upsert::Replaced => {
                Notification::success(format!("{title} progress updated to {progress}%"))
            }
            Upsert::Inserted => Notification::success(format!("{title} added to watched list")),
        })
    }

    pub fn watched_progress(&self, id: u64) -> Result<u8, RuntimeError> {
        match self.username() {
            Some(user) => Ok(self.storage.watched_progress(user, id)?),
            None => Ok(0),
        }
    }

    // ── Listing ─────────────────────────────────────────────────

    pub fn records(&self, list: ListKind) -> Result<Vec<ListRecord>, RuntimeError> {
        let user = self.username().ok_or(RuntimeError::NotLoggedIn)?;
        Ok(self.storage.records(user, list)?)
    }

    pub fn watched(&self) -> Result<Vec<WatchedRecord>, RuntimeError> {
        let user = self.username().ok_or(RuntimeError::NotLoggedIn)?;
        Ok(self.storage.watched(user)?)
    }

    /// Render inputs for the current user. Logged-out users get the plain
    /// context.
    pub fn render_context(&self, base: RenderContext) -> Result<RenderContext, RuntimeError> {
        match self.username() {
            Some(user) => Ok(base.with_user(self.storage.watched(user)?)),
            None => Ok(base),
        }
    }

    // ── Session ─────────────────────────────────────────────────

    /// Drop the user's lists and the session marker.
    pub fn logout(&mut self) -> Result<Notification, RuntimeError> {
        let Some(user) = self.session.username().map(str::to_string) else {
            return Ok(Notification::info("You are not logged in."));
        };
        self.storage.clear_user_lists(&user)?;
        SessionMarker::clear(&self.session_path)?;
        self.session = SessionMarker::anonymous();
        tracing::info!(user, "Logged out");
        Ok(Notification::success("Logged out."))
    }

    // ── Avatar ──────────────────────────────────────────────────

    /// Stored avatar, else the default derived from the username.
    /// `None` when logged out.
    pub fn current_avatar(&self) -> Result<Option<String>, RuntimeError> {
        let Some(user) = self.username() else {
            return Ok(None);
        };
        let stored = self.storage.avatar(user)?;
        Ok(Some(
            stored.unwrap_or_else(|| avatar::default_avatar_url(user)),
        ))
    }

    /// Use a local image file as the avatar. The file is referenced by URL,
    /// not copied.
    pub fn set_avatar_from_file(&self, path: &Path) -> Result<Notification, RuntimeError> {
        let Some(user) = self.username() else {
            return Ok(Notification::error(LOGIN_REQUIRED_AVATAR));
        };
        let size = match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => meta.len(),
            _ => {
                return Ok(Notification::error(
                    "Error reading the image file. Please try another image.",
                ))
            }
        };
        if let Err(message) = avatar::validate_upload(path, size) {
            return Ok(Notification::error(message));
        }
        let absolute = std::fs::canonicalize(path).map_err(LuharError::from)?;
        let Ok(file_url) = url::Url::from_file_path(&absolute) else {
            return Ok(Notification::error(
                "Error reading the image file. Please try another image.",
            ));
        };
        self.storage.set_avatar(user, file_url.as_str())?;
        Ok(Notification::success("Avatar updated successfully!"))
    }

    /// Pick one of the preset avatars at random.
    pub fn choose_preset_avatar(&self) -> Result<Notification, RuntimeError> {
        let Some(user) = self.username() else {
            return Ok(Notification::error(LOGIN_REQUIRED_AVATAR));
        };
        self.storage.set_avatar(user, avatar::random_preset())?;
        Ok(Notification::success("Default avatar selected!"))
    }

    // ── Theme ───────────────────────────────────────────────────

    pub fn night_mode(&self) -> Result<NightMode, RuntimeError> {
        Ok(NightMode::load(&self.storage)?)
    }

    pub fn toggle_night_mode(&self) -> Result<NightMode, RuntimeError> {
        let mode = NightMode::toggle(&self.storage)?;
        tracing::debug!(mode = %mode, "Night mode toggled");
        Ok(mode)
    }
}
