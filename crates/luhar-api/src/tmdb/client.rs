use reqwest::Client;
use serde::de::DeserializeOwned;

use super::error::TmdbError;
use super::types::{Genre, GenreList, MovieDetail, MoviePage, Person, PersonCredits, VideoList};
use crate::traits::{ListEndpoint, MovieCatalog, MovieDetailBundle, PersonBundle};

/// Extra sub-resources bundled with a movie detail request.
const DETAIL_APPEND: &str = "credits,release_dates,recommendations";

/// TMDB API v3 client. Authenticates with an `api_key` query parameter.
pub struct TmdbClient {
    base_url: String,
    api_key: String,
    http: Client,
}

impl TmdbClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            http: Client::new(),
        }
    }

    /// Check the HTTP response for errors and return the body text on failure.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, TmdbError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "TMDB API error");
            Err(TmdbError::Api {
                status,
                message: body,
            })
        }
    }

    /// GET `path` with the api key plus `params`, decoding the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, TmdbError> {
        tracing::debug!(path, "TMDB request");
        let resp = self
            .http
            .get(format!("{}{path}", self.base_url))
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        resp.json()
            .await
            .map_err(|e| TmdbError::Parse(e.to_string()))
    }
}

impl MovieCatalog for TmdbClient {
    type Error = TmdbError;

    async fn movie_list(&self, endpoint: &ListEndpoint, page: u32) -> Result<MoviePage, TmdbError> {
        let mut params = endpoint.query();
        params.push(("page", page.to_string()));
        self.get_json(endpoint.path(), &params).await
    }

    async fn movie_detail(&self, movie_id: u64) -> Result<MovieDetailBundle, TmdbError> {
        let detail_path = format!("/movie/{movie_id}");
        let videos_path = format!("/movie/{movie_id}/videos");
        let append = [("append_to_response", DETAIL_APPEND.to_string())];

        let (movie, videos) = futures::future::try_join(
            self.get_json::<MovieDetail>(&detail_path, &append),
            self.get_json::<VideoList>(&videos_path, &[]),
        )
        .await?;

        Ok(MovieDetailBundle {
            movie,
            videos: videos.results,
        })
    }

    async fn person_detail(&self, person_id: u64) -> Result<PersonBundle, TmdbError> {
        let person_path = format!("/person/{person_id}");
        let credits_path = format!("/person/{person_id}/movie_credits");

        let (person, credits) = futures::future::try_join(
            self.get_json::<Person>(&person_path, &[]),
            self.get_json::<PersonCredits>(&credits_path, &[]),
        )
        .await?;

        Ok(PersonBundle { person, credits })
    }

    async fn genres(&self) -> Result<Vec<Genre>, TmdbError> {
        let list: GenreList = self.get_json("/genre/movie/list", &[]).await?;
        Ok(list.genres)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = TmdbClient::new("https://api.themoviedb.org/3/", "key");
        assert_eq!(client.base_url, "https://api.themoviedb.org/3");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        let client = TmdbClient::new("http://127.0.0.1:9", "key");
        let err = client.genres().await.unwrap_err();
        assert!(matches!(err, TmdbError::Http(_)));
    }
}
