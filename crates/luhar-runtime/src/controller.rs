//! Movie list navigation.
//!
//! [`ViewController`] owns the [`ViewState`]. Every navigation builds the
//! next state, fetches it, and only commits once the page arrived; a failed
//! fetch leaves page, category and `total_pages` as they were, so repeating
//! the navigation retries it.

use luhar_api::tmdb::types::{Genre, MovieSummary};
use luhar_api::traits::{ListEndpoint, MovieCatalog, MovieDetailBundle, PersonBundle};
use luhar_core::models::{Category, ViewState};
use luhar_core::pagination::{clamp_total_pages, compute_window, PaginationWindow, MAX_VISIBLE_PAGES};

use crate::RuntimeError;

/// The list request a view state maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub endpoint: ListEndpoint,
    pub title: String,
}

/// One fetched page of a movie list.
#[derive(Debug, Clone)]
pub struct ListPage {
    pub title: String,
    pub movies: Vec<MovieSummary>,
    pub window: PaginationWindow,
}

pub struct ViewController<C> {
    catalog: C,
    state: ViewState,
    genres: Option<Vec<Genre>>,
    max_visible: u32,
}

impl<C: MovieCatalog> ViewController<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            state: ViewState::default(),
            genres: None,
            max_visible: MAX_VISIBLE_PAGES,
        }
    }

    /// Override the number of page buttons (at least 1).
    pub fn with_max_visible(mut self, max_visible: u32) -> Self {
        self.max_visible = max_visible.max(1);
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn genres(&self) -> Option<&[Genre]> {
        self.genres.as_deref()
    }

    /// The pager window for the current state.
    pub fn window(&self) -> PaginationWindow {
        compute_window(self.state.current_page, self.state.total_pages, self.max_visible)
    }

    // ── Navigation ──────────────────────────────────────────────

    /// Switch to `category` at page 1 and fetch it.
    ///
    /// `param` is the search query for [`Category::Search`] and the genre id
    /// for [`Category::Genre`]; other categories ignore it.
    pub async fn set_category(
        &mut self,
        category: Category,
        param: &str,
    ) -> Result<ListPage, RuntimeError> {
        let mut next = ViewState {
            current_page: 1,
            total_pages: self.state.total_pages,
            category,
            search_query: self.state.search_query.clone(),
            genre_id: self.state.genre_id.clone(),
        };
        match category {
            Category::Search => next.search_query = param.to_string(),
            Category::Genre => next.genre_id = param.to_string(),
            _ => {}
        }

        let request = self.request_for(&next)?;
        tracing::debug!(category = %category, "Switching category");
        self.fetch(next, request).await
    }

    /// Search by title. Blank queries are rejected without a request.
    pub async fn search(&mut self, query: &str) -> Result<ListPage, RuntimeError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RuntimeError::EmptyQuery);
        }
        self.set_category(Category::Search, query).await
    }

    /// Show one genre. An empty id goes back to the popular list.
    pub async fn select_genre(&mut self, genre_id: &str) -> Result<ListPage, RuntimeError> {
        if genre_id.trim().is_empty() {
            return self.set_category(Category::Popular, "").await;
        }
        if self.genres.is_none() {
            self.load_genres().await?;
        }
        self.set_category(Category::Genre, genre_id.trim()).await
    }

    /// Jump to `page`. Out-of-range pages are ignored (`Ok(None)`).
    pub async fn go_to_page(&mut self, page: u32) -> Result<Option<ListPage>, RuntimeError> {
        if page < 1 || page > self.state.total_pages {
            tracing::debug!(page, total = self.state.total_pages, "Ignoring out-of-range page");
            return Ok(None);
        }
        let request = self.request_for(&self.state)?;
        let next = ViewState {
            current_page: page,
            ..self.state.clone()
        };
        self.fetch(next, request).await.map(Some)
    }

    pub async fn next_page(&mut self) -> Result<Option<ListPage>, RuntimeError> {
        self.go_to_page(self.state.current_page.saturating_add(1)).await
    }

    pub async fn prev_page(&mut self) -> Result<Option<ListPage>, RuntimeError> {
        self.go_to_page(self.state.current_page.saturating_sub(1)).await
    }

    /// Re-issue the request for the current state.
    pub async fn reload(&mut self) -> Result<ListPage, RuntimeError> {
        let request = self.request_for(&self.state)?;
        self.fetch(self.state.clone(), request).await
    }

    /// Back to the first page of the popular list.
    pub async fn go_home(&mut self) -> Result<ListPage, RuntimeError> {
        self.set_category(Category::Popular, "").await
    }

    // ── Genres ──────────────────────────────────────────────────

    /// Fetch and cache the genre list used for genre titles.
    pub async fn load_genres(&mut self) -> Result<&[Genre], RuntimeError> {
        let genres = self
            .catalog
            .genres()
            .await
            .map_err(|e| RuntimeError::Fetch(e.to_string()))?;
        tracing::debug!(count = genres.len(), "Loaded genres");
        Ok(self.genres.insert(genres).as_slice())
    }

    // ── Requests ────────────────────────────────────────────────

    /// The request the current state maps to.
    pub fn request_for_category(&self) -> Result<ListRequest, RuntimeError> {
        self.request_for(&self.state)
    }

    fn request_for(&self, state: &ViewState) -> Result<ListRequest, RuntimeError> {
        let request = match state.category {
            Category::Popular => ListRequest {
                endpoint: ListEndpoint::Popular,
                title: "Popular Movies".into(),
            },
            Category::TopRated => ListRequest {
                endpoint: ListEndpoint::TopRated,
                title: "Top Rated Movies".into(),
            },
            Category::Trending => ListRequest {
                endpoint: ListEndpoint::Trending,
                title: "Trending Movies".into(),
            },
            Category::Search => ListRequest {
                endpoint: ListEndpoint::Search {
                    query: state.search_query.clone(),
                },
                title: format!("Search Results for \"{}\"", state.search_query),
            },
            Category::Genre => {
                let genres = self.genres.as_ref().ok_or(RuntimeError::GenresNotLoaded)?;
                let name = genres
                    .iter()
                    .find(|g| g.id.to_string() == state.genre_id)
                    .map(|g| g.name.as_str())
                    .ok_or_else(|| RuntimeError::UnknownGenre(state.genre_id.clone()))?;
                ListRequest {
                    endpoint: ListEndpoint::Discover {
                        genre_id: state.genre_id.clone(),
                    },
                    title: format!("{name} Movies"),
                }
            }
        };
        Ok(request)
    }

    async fn fetch(
        &mut self,
        mut next: ViewState,
        request: ListRequest,
    ) -> Result<ListPage, RuntimeError> {
        let page = next.current_page;
        let result = self
            .catalog
            .movie_list(&request.endpoint, page)
            .await
            .map_err(|e| {
                tracing::warn!(page, error = %e, "Failed to load movies");
                RuntimeError::Fetch(e.to_string())
            })?;

        next.total_pages = clamp_total_pages(result.total_pages);
        next.current_page = next.current_page.min(next.total_pages);
        self.state = next;
        Ok(ListPage {
            title: request.title,
            movies: result.results,
            window: self.window(),
        })
    }

    // ── Details ─────────────────────────────────────────────────

    /// Movie details with credits, release dates, recommendations and videos.
    /// Leaves the list state alone.
    pub async fn open_movie(&self, movie_id: u64) -> Result<MovieDetailBundle, RuntimeError> {
        tracing::debug!(movie_id, "Opening movie");
        self.catalog.movie_detail(movie_id).await.map_err(|e| {
            tracing::warn!(movie_id, error = %e, "Failed to load movie details");
            RuntimeError::Fetch(e.to_string())
        })
    }

    /// Person details with movie credits.
    pub async fn open_person(
        &self,
        person_id: u64,
        name: &str,
    ) -> Result<PersonBundle, RuntimeError> {
        tracing::debug!(person_id, name, "Opening person");
        self.catalog.person_detail(person_id).await.map_err(|e| {
            tracing::warn!(person_id, error = %e, "Failed to load person details");
            RuntimeError::Fetch(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use luhar_api::tmdb::types::{MoviePage, Person};

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("stub failure")]
    struct StubError;

    /// Records every list request and answers with a fixed page count.
    #[derive(Default)]
    struct StubCatalog {
        total_pages: Mutex<u32>,
        fail: Mutex<bool>,
        calls: Mutex<Vec<(ListEndpoint, u32)>>,
    }

    impl StubCatalog {
        fn with_pages(total_pages: u32) -> Self {
            Self {
                total_pages: Mutex::new(total_pages),
                ..Default::default()
            }
        }

        fn set_pages(&self, total_pages: u32) {
            *self.total_pages.lock().unwrap() = total_pages;
        }

        fn set_failing(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }

        fn last_call(&self) -> (ListEndpoint, u32) {
            self.calls.lock().unwrap().last().cloned().unwrap()
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl MovieCatalog for StubCatalog {
        type Error = StubError;

        async fn movie_list(
            &self,
            endpoint: &ListEndpoint,
            page: u32,
        ) -> Result<MoviePage, StubError> {
            self.calls.lock().unwrap().push((endpoint.clone(), page));
            if *self.fail.lock().unwrap() {
                return Err(StubError);
            }
            let total_pages = *self.total_pages.lock().unwrap();
            Ok(MoviePage {
                page,
                results: vec![MovieSummary {
                    id: u64::from(page),
                    title: format!("Movie {page}"),
                    ..Default::default()
                }],
                total_pages,
                total_results: total_pages * 20,
            })
        }

        async fn movie_detail(&self, movie_id: u64) -> Result<MovieDetailBundle, StubError> {
            if *self.fail.lock().unwrap() {
                return Err(StubError);
            }
            let mut bundle = MovieDetailBundle::default();
            bundle.movie.id = movie_id;
            Ok(bundle)
        }

        async fn person_detail(&self, person_id: u64) -> Result<PersonBundle, StubError> {
            Ok(PersonBundle {
                person: Person {
                    id: person_id,
                    name: "Someone".into(),
                    ..Default::default()
                },
                ..Default::default()
            })
        }

        async fn genres(&self) -> Result<Vec<Genre>, StubError> {
            Ok(vec![
                Genre {
                    id: 28,
                    name: "Action".into(),
                },
                Genre {
                    id: 35,
                    name: "Comedy".into(),
                },
            ])
        }
    }

    #[tokio::test]
    async fn test_initial_state() {
        let ctl = ViewController::new(StubCatalog::with_pages(10));
        assert_eq!(ctl.state(), &ViewState::default());
        let req = ctl.request_for_category().unwrap();
        assert_eq!(req.endpoint, ListEndpoint::Popular);
        assert_eq!(req.title, "Popular Movies");
    }

    #[tokio::test]
    async fn test_category_switch_resets_page_before_request() {
        let mut ctl = ViewController::new(StubCatalog::with_pages(10));
        ctl.go_home().await.unwrap();
        ctl.go_to_page(4).await.unwrap();
        assert_eq!(ctl.state().current_page, 4);

        let page = ctl.set_category(Category::TopRated, "").await.unwrap();
        assert_eq!(ctl.catalog().last_call(), (ListEndpoint::TopRated, 1));
        assert_eq!(ctl.state().current_page, 1);
        assert_eq!(page.title, "Top Rated Movies");

        ctl.go_to_page(6).await.unwrap();
        let page = ctl.search("heat").await.unwrap();
        assert_eq!(
            ctl.catalog().last_call(),
            (
                ListEndpoint::Search {
                    query: "heat".into()
                },
                1
            )
        );
        assert_eq!(ctl.state().current_page, 1);
        assert_eq!(page.window.current, 1);
    }

    #[tokio::test]
    async fn test_shrinking_total_pulls_current_page_back() {
        let mut ctl = ViewController::new(StubCatalog::with_pages(10));
        ctl.go_home().await.unwrap();
        ctl.go_to_page(8).await.unwrap();

        ctl.catalog().set_pages(3);
        let page = ctl.reload().await.unwrap();
        assert_eq!(ctl.state().total_pages, 3);
        assert_eq!(ctl.state().current_page, 3);
        assert_eq!(page.window.current, 3);

        let page = ctl.prev_page().await.unwrap().unwrap();
        assert_eq!(ctl.catalog().last_call(), (ListEndpoint::Popular, 2));
        assert_eq!(page.window.current, 2);
    }

    #[tokio::test]
    async fn test_total_pages_clamped_before_window() {
        let mut ctl = ViewController::new(StubCatalog::with_pages(1000));
        let page = ctl.go_home().await.unwrap();
        assert_eq!(ctl.state().total_pages, 500);
        assert_eq!(page.window.total, 500);
        assert_eq!((page.window.start, page.window.end), (1, 5));
        assert!(page.window.trailing_ellipsis());

        // Page 501 does not exist after clamping.
        assert!(ctl.go_to_page(501).await.unwrap().is_none());
        assert!(ctl.go_to_page(500).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_zero_reported_pages_clamps_to_one() {
        let mut ctl = ViewController::new(StubCatalog::with_pages(0));
        let page = ctl.go_home().await.unwrap();
        assert_eq!(ctl.state().total_pages, 1);
        assert!(!page.window.is_visible());
    }

    #[tokio::test]
    async fn test_out_of_range_pages_are_ignored() {
        let mut ctl = ViewController::new(StubCatalog::with_pages(3));
        ctl.go_home().await.unwrap();
        let calls = ctl.catalog().call_count();

        assert!(ctl.go_to_page(0).await.unwrap().is_none());
        assert!(ctl.go_to_page(4).await.unwrap().is_none());
        assert!(ctl.prev_page().await.unwrap().is_none());
        assert_eq!(ctl.catalog().call_count(), calls);

        ctl.next_page().await.unwrap();
        ctl.next_page().await.unwrap();
        assert_eq!(ctl.state().current_page, 3);
        assert!(ctl.next_page().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_trims_and_rejects_blank() {
        let mut ctl = ViewController::new(StubCatalog::with_pages(2));
        let err = ctl.search("   ").await.unwrap_err();
        assert!(matches!(err, RuntimeError::EmptyQuery));
        assert_eq!(ctl.catalog().call_count(), 0);
        assert_eq!(err.to_string(), "Please enter a movie title to search.");

        let page = ctl.search("  alien ").await.unwrap();
        assert_eq!(page.title, "Search Results for \"alien\"");
        assert_eq!(
            ctl.catalog().last_call(),
            (
                ListEndpoint::Search {
                    query: "alien".into()
                },
                1
            )
        );
        assert_eq!(ctl.state().category, Category::Search);
    }

    #[tokio::test]
    async fn test_genre_selection() {
        let mut ctl = ViewController::new(StubCatalog::with_pages(2));
        let page = ctl.select_genre("35").await.unwrap();
        assert_eq!(page.title, "Comedy Movies");
        assert_eq!(
            ctl.catalog().last_call(),
            (
                ListEndpoint::Discover {
                    genre_id: "35".into()
                },
                1
            )
        );

        let page = ctl.select_genre("").await.unwrap();
        assert_eq!(page.title, "Popular Movies");
        assert_eq!(ctl.state().category, Category::Popular);
    }

    #[tokio::test]
    async fn test_unknown_genre_keeps_previous_view() {
        let mut ctl = ViewController::new(StubCatalog::with_pages(2));
        ctl.set_category(Category::Trending, "").await.unwrap();
        let err = ctl.select_genre("99999").await.unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownGenre(ref id) if id == "99999"));
        assert_eq!(ctl.state().category, Category::Trending);
    }

    #[tokio::test]
    async fn test_genre_requires_loaded_genres() {
        let mut ctl = ViewController::new(StubCatalog::with_pages(2));
        let err = ctl.set_category(Category::Genre, "28").await.unwrap_err();
        assert!(matches!(err, RuntimeError::GenresNotLoaded));

        ctl.load_genres().await.unwrap();
        assert_eq!(ctl.genres().map(|g| g.len()), Some(2));
        ctl.set_category(Category::Genre, "28").await.unwrap();
        assert_eq!(ctl.request_for_category().unwrap().title, "Action Movies");
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_state_unchanged() {
        let mut ctl = ViewController::new(StubCatalog::with_pages(8));
        ctl.go_home().await.unwrap();
        ctl.go_to_page(2).await.unwrap();
        ctl.catalog().set_failing(true);

        let err = ctl.go_to_page(3).await.unwrap_err();
        assert!(matches!(err, RuntimeError::Fetch(_)));
        let err = ctl.set_category(Category::TopRated, "").await.unwrap_err();
        assert!(matches!(err, RuntimeError::Fetch(_)));
        assert_eq!(ctl.state().current_page, 2);
        assert_eq!(ctl.state().category, Category::Popular);
        assert_eq!(ctl.state().total_pages, 8);

        // Repeating the navigation retries it.
        ctl.catalog().set_failing(false);
        let page = ctl.go_to_page(3).await.unwrap().unwrap();
        assert_eq!(ctl.catalog().last_call(), (ListEndpoint::Popular, 3));
        assert_eq!(page.window.current, 3);
        assert!(ctl.reload().await.is_ok());
    }

    #[tokio::test]
    async fn test_window_respects_max_visible() {
        let mut ctl = ViewController::new(StubCatalog::with_pages(20)).with_max_visible(3);
        ctl.go_home().await.unwrap();
        let page = ctl.go_to_page(10).await.unwrap().unwrap();
        assert_eq!((page.window.start, page.window.end), (9, 11));
    }

    #[tokio::test]
    async fn test_open_details() {
        let ctl = ViewController::new(StubCatalog::with_pages(1));
        assert_eq!(ctl.open_movie(603).await.unwrap().movie.id, 603);
        assert_eq!(ctl.open_person(6384, "Keanu").await.unwrap().person.id, 6384);

        ctl.catalog().set_failing(true);
        assert!(matches!(
            ctl.open_movie(603).await.unwrap_err(),
            RuntimeError::Fetch(_)
        ));
    }
}
