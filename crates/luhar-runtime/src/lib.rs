pub mod controller;
pub mod initial;
pub mod library;
pub mod notify;
pub mod render;

use luhar_api::admin::AdminClient;
use luhar_api::images::ImageUrls;
use luhar_api::tmdb::TmdbClient;
use luhar_core::config::AppConfig;
use luhar_core::error::LuharError;
use luhar_core::storage::Storage;

pub use controller::{ListPage, ListRequest, ViewController};
pub use initial::InitialView;
pub use library::Library;
pub use notify::{Notification, NotificationKind};
pub use render::RenderContext;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("storage error: {0}")]
    Storage(#[from] LuharError),
    /// Network or non-2xx failure from the movie API.
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("Please enter a movie title to search.")]
    EmptyQuery,
    #[error("genre list has not been loaded")]
    GenresNotLoaded,
    #[error("unknown genre: {0}")]
    UnknownGenre(String),
    #[error("Please log in to use this feature.")]
    NotLoggedIn,
}

/// Everything a front-end needs, wired from the user's config.
pub struct Runtime {
    pub config: AppConfig,
    pub controller: ViewController<TmdbClient>,
    pub library: Library,
    pub admin: AdminClient,
}

impl Runtime {
    pub fn from_parts(config: AppConfig, storage: Storage) -> Self {
        if config.api.api_key.is_empty() {
            tracing::warn!(
                "No TMDB API key configured; set api.api_key or {}",
                luhar_core::config::API_KEY_ENV
            );
        }
        let catalog = TmdbClient::new(&config.api.base_url, &config.api.api_key);
        let controller = ViewController::new(catalog).with_max_visible(config.ui.max_visible_pages);
        let library = Library::open(storage, config.session_path());
        let admin = AdminClient::new(&config.admin.base_url, config.admin.session_cookie.clone());

        Self {
            config,
            controller,
            library,
            admin,
        }
    }

    /// Render inputs for the logged-in user (if any).
    pub fn render_context(&self) -> Result<RenderContext, RuntimeError> {
        let images = ImageUrls::new(&self.config.images.base_url, &self.config.images.placeholder_url);
        let base = RenderContext::new(images, &self.config.share.site_origin, &self.config.share.site_name);
        self.library.render_context(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_from_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.session.cookie_file = Some(dir.path().join("session"));
        config.ui.max_visible_pages = 7;

        let runtime = Runtime::from_parts(config, Storage::open_memory().unwrap());
        assert!(!runtime.library.session().is_logged_in());
        assert_eq!(runtime.controller.window().len(), 1);

        let ctx = runtime.render_context().unwrap();
        assert!(!ctx.logged_in);
        assert_eq!(ctx.site_name, "LUHAR");
    }

    #[test]
    fn test_error_messages_are_user_facing() {
        assert_eq!(
            RuntimeError::NotLoggedIn.to_string(),
            "Please log in to use this feature."
        );
    }
}
