//! Trait definitions for movie catalog services.
//!
//! The view controller only talks to [`MovieCatalog`], so it can be driven
//! by the TMDB client or by an in-memory stub.

use std::future::Future;

use crate::tmdb::types::{Genre, MovieDetail, MoviePage, Person, PersonCredits, Video};

/// Which movie list to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEndpoint {
    Popular,
    TopRated,
    Trending,
    Search { query: String },
    Discover { genre_id: String },
}

impl ListEndpoint {
    /// Path relative to the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Popular => "/movie/popular",
            Self::TopRated => "/movie/top_rated",
            Self::Trending => "/trending/movie/week",
            Self::Search { .. } => "/search/movie",
            Self::Discover { .. } => "/discover/movie",
        }
    }

    /// Endpoint-specific query parameters (the page is added by the caller).
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Search { query } => vec![("query", query.clone())],
            Self::Discover { genre_id } => vec![("with_genres", genre_id.clone())],
            _ => Vec::new(),
        }
    }
}

/// A movie together with its videos, fetched concurrently.
#[derive(Debug, Clone, Default)]
pub struct MovieDetailBundle {
    pub movie: MovieDetail,
    pub videos: Vec<Video>,
}

/// A person together with their movie credits.
#[derive(Debug, Clone, Default)]
pub struct PersonBundle {
    pub person: Person,
    pub credits: PersonCredits,
}

/// A read-only movie database.
pub trait MovieCatalog: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// One page of a movie list. Pages are 1-based.
    fn movie_list(
        &self,
        endpoint: &ListEndpoint,
        page: u32,
    ) -> impl Future<Output = Result<MoviePage, Self::Error>> + Send;

    /// Full movie details plus trailers. Fails if either request fails.
    fn movie_detail(
        &self,
        movie_id: u64,
    ) -> impl Future<Output = Result<MovieDetailBundle, Self::Error>> + Send;

    /// Person details plus movie credits. Fails if either request fails.
    fn person_detail(
        &self,
        person_id: u64,
    ) -> impl Future<Output = Result<PersonBundle, Self::Error>> + Send;

    /// The movie genre list.
    fn genres(&self) -> impl Future<Output = Result<Vec<Genre>, Self::Error>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(ListEndpoint::Popular.path(), "/movie/popular");
        assert_eq!(ListEndpoint::TopRated.path(), "/movie/top_rated");
        assert_eq!(ListEndpoint::Trending.path(), "/trending/movie/week");
        assert!(ListEndpoint::Popular.query().is_empty());
    }

    #[test]
    fn test_endpoint_query_params() {
        let search = ListEndpoint::Search {
            query: "star wars".into(),
        };
        assert_eq!(search.path(), "/search/movie");
        assert_eq!(search.query(), vec![("query", "star wars".to_string())]);

        let discover = ListEndpoint::Discover {
            genre_id: "28".into(),
        };
        assert_eq!(discover.path(), "/discover/movie");
        assert_eq!(discover.query(), vec![("with_genres", "28".to_string())]);
    }
}
