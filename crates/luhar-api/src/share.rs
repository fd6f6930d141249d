//! Social share links for a movie.

use serde::Serialize;
use url::form_urlencoded;

const FACEBOOK_SHARER: &str = "https://www.facebook.com/sharer/sharer.php";
const TWITTER_INTENT: &str = "https://twitter.com/intent/tweet";
const WHATSAPP_SEND: &str = "https://wa.me/";

/// Every share target for one movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLinks {
    pub movie: String,
    pub facebook: String,
    pub twitter: String,
    pub whatsapp: String,
}

impl ShareLinks {
    pub fn build(origin: &str, site_name: &str, movie_id: u64, title: &str) -> Self {
        let movie = movie_link(origin, movie_id);
        Self {
            facebook: facebook_link(&movie),
            twitter: twitter_link(&movie, title, site_name),
            whatsapp: whatsapp_link(&movie, title, site_name),
            movie,
        }
    }
}

/// Deep link that opens the site straight onto a movie.
pub fn movie_link(origin: &str, movie_id: u64) -> String {
    format!("{}/index.html?movie={movie_id}", origin.trim_end_matches('/'))
}

pub fn facebook_link(movie_url: &str) -> String {
    format!("{FACEBOOK_SHARER}?u={}", encode(movie_url))
}

pub fn twitter_link(movie_url: &str, title: &str, site_name: &str) -> String {
    let text = format!("Check out {title} on {site_name}!");
    format!("{TWITTER_INTENT}?url={}&text={}", encode(movie_url), encode(&text))
}

pub fn whatsapp_link(movie_url: &str, title: &str, site_name: &str) -> String {
    let text = format!("Check out {title} on {site_name}: {movie_url}");
    format!("{WHATSAPP_SEND}?text={}", encode(&text))
}

fn encode(s: &str) -> String {
    form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_link() {
        assert_eq!(
            movie_link("http://localhost:8080/", 603),
            "http://localhost:8080/index.html?movie=603"
        );
    }

    #[test]
    fn test_share_links_are_encoded() {
        let links = ShareLinks::build("http://localhost:8080", "LUHAR", 603, "The Matrix");
        assert_eq!(
            links.facebook,
            "https://www.facebook.com/sharer/sharer.php?u=http%3A%2F%2Flocalhost%3A8080%2Findex.html%3Fmovie%3D603"
        );
        assert_eq!(
            links.twitter,
            "https://twitter.com/intent/tweet?url=http%3A%2F%2Flocalhost%3A8080%2Findex.html%3Fmovie%3D603\
             &text=Check+out+The+Matrix+on+LUHAR%21"
        );
        assert!(links.whatsapp.starts_with("https://wa.me/?text=Check+out+The+Matrix+on+LUHAR%3A+http"));
    }

    #[test]
    fn test_title_with_ampersand_does_not_break_query() {
        let link = twitter_link("http://x/index.html?movie=1", "Fast & Furious", "LUHAR");
        assert!(link.contains("Fast+%26+Furious"));
        assert_eq!(link.matches('&').count(), 1);
    }
}
