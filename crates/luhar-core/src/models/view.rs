use serde::{Deserialize, Serialize};

/// The active movie list source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Popular,
    TopRated,
    Trending,
    Search,
    Genre,
}

impl Category {
    pub const ALL: &[Category] = &[
        Self::Popular,
        Self::TopRated,
        Self::Trending,
        Self::Search,
        Self::Genre,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::TopRated => "top_rated",
            Self::Trending => "trending",
            Self::Search => "search",
            Self::Genre => "genre",
        }
    }

    /// Parse a category name. Unrecognized names fall back to `Popular`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "popular" => Self::Popular,
            "top_rated" => Self::TopRated,
            "trending" => Self::Trending,
            "search" => Self::Search,
            "genre" => Self::Genre,
            other => {
                tracing::debug!(category = other, "Unknown category, using popular");
                Self::Popular
            }
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Navigation state of the movie list.
///
/// `search_query` only means something for [`Category::Search`] and
/// `genre_id` only for [`Category::Genre`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub current_page: u32,
    pub total_pages: u32,
    pub category: Category,
    pub search_query: String,
    pub genre_id: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            category: Category::Popular,
            search_query: String::new(),
            genre_id: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_known() {
        assert_eq!(Category::from_name("top_rated"), Category::TopRated);
        assert_eq!(Category::from_name("Top-Rated"), Category::TopRated);
        assert_eq!(Category::from_name("trending"), Category::Trending);
    }

    #[test]
    fn test_from_name_unknown_defaults_to_popular() {
        assert_eq!(Category::from_name("upcoming"), Category::Popular);
        assert_eq!(Category::from_name(""), Category::Popular);
    }

    #[test]
    fn test_default_state() {
        let state = ViewState::default();
        assert_eq!(state.current_page, 1);
        assert_eq!(state.total_pages, 1);
        assert_eq!(state.category, Category::Popular);
    }
}
