//! Pick the first view from a page URL's query string.

use url::form_urlencoded;

/// What to show on startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitialView {
    /// The default list (popular, page 1).
    Home,
    Search(String),
    Movie(u64),
}

impl InitialView {
    /// Accepts a full URL (`http://host/index.html?movie=5`), a bare query
    /// (`?search=x` or `search=x`), or an empty string.
    ///
    /// A non-empty `search` wins over `movie`. A `movie` value that is not
    /// a number is ignored.
    pub fn from_url(input: &str) -> Self {
        let query = match input.split_once('?') {
            Some((_, q)) => q,
            None if input.contains('=') => input,
            None => "",
        };
        let query = query.split('#').next().unwrap_or_default();

        let mut search = None;
        let mut movie = None;
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "search" if search.is_none() => search = Some(value.into_owned()),
                "movie" if movie.is_none() => movie = Some(value.into_owned()),
                _ => {}
            }
        }

        if let Some(term) = search.filter(|s| !s.trim().is_empty()) {
            return Self::Search(term);
        }
        match movie.as_deref().map(str::parse::<u64>) {
            Some(Ok(id)) => Self::Movie(id),
            Some(Err(_)) => {
                tracing::debug!(movie = movie.as_deref(), "Ignoring non-numeric movie id");
                Self::Home
            }
            None => Self::Home,
        }
    }
}
