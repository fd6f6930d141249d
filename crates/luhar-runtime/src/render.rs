//! Shape API payloads into display-ready view models.
//!
//! Everything here is pure: user-specific bits (login state, watch progress)
//! come in through [`RenderContext`].

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use luhar_api::images::{ImageSize, ImageUrls};
use luhar_api::share::ShareLinks;
use luhar_api::tmdb::types::{MovieDetail, MovieSummary, PersonCredits, Video};
use luhar_api::traits::{MovieDetailBundle, PersonBundle};
use luhar_core::models::WatchedRecord;
use luhar_core::pagination::{PagerItem, PaginationWindow};

use crate::controller::ListPage;

pub const NO_RESULTS: &str = "No movies found.";
pub const LIST_ERROR: &str = "Error loading movies. Please try again.";
pub const DETAIL_ERROR: &str = "Error loading movie details. Please try again.";
pub const PERSON_ERROR: &str = "Error loading person details. Please try again.";

const NOT_AVAILABLE: &str = "N/A";
const CAST_LIMIT: usize = 10;
const RECOMMENDATION_LIMIT: usize = 5;
const FILMOGRAPHY_JOBS: &[&str] = &["Director", "Writer", "Producer"];
const UNDATED: &str = "1900-01-01";
const YOUTUBE_EMBED: &str = "https://www.youtube.com/embed";

/// Inputs shared by every renderer.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub images: ImageUrls,
    pub site_origin: String,
    pub site_name: String,
    pub logged_in: bool,
    watched: HashMap<u64, u8>,
}

impl RenderContext {
    pub fn new(images: ImageUrls, site_origin: impl Into<String>, site_name: impl Into<String>) -> Self {
        Self {
            images,
            site_origin: site_origin.into(),
            site_name: site_name.into(),
            logged_in: false,
            watched: HashMap::new(),
        }
    }

    /// Attach the logged-in user's watch progress.
    pub fn with_user(mut self, watched: impl IntoIterator<Item = WatchedRecord>) -> Self {
        self.logged_in = true;
        self.watched = watched.into_iter().map(|r| (r.id, r.progress)).collect();
        self
    }

    pub fn progress(&self, movie_id: u64) -> u8 {
        self.watched.get(&movie_id).copied().unwrap_or(0)
    }
}

// ── Lists ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieCard {
    pub id: u64,
    pub title: String,
    pub poster_url: String,
    pub poster_fallback: String,
    pub rating: String,
    pub release_date: String,
    /// Only set when the movie has been (partly) watched.
    pub watched_progress: Option<u8>,
    /// Watchlist/favorite buttons are live only for logged-in users.
    pub actions_enabled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListView {
    pub title: String,
    pub cards: Vec<MovieCard>,
    pub empty_message: Option<&'static str>,
    #[serde(skip)]
    pub window: PaginationWindow,
    #[serde(skip)]
    pub pager: Vec<PagerItem>,
}

pub fn movie_card(movie: &MovieSummary, ctx: &RenderContext) -> MovieCard {
    let progress = ctx.progress(movie.id);
    MovieCard {
        id: movie.id,
        title: movie.title.clone(),
        poster_url: ctx.images.url(ImageSize::W500, movie.poster_path.as_deref()),
        poster_fallback: ctx.images.error_fallback(ImageSize::W500),
        rating: format!("{:.1} / 10", movie.vote_average),
        release_date: non_empty(movie.release_date.as_deref()).unwrap_or("Unknown date").to_string(),
        watched_progress: (progress > 0).then_some(progress),
        actions_enabled: ctx.logged_in,
    }
}

pub fn list_view(page: &ListPage, ctx: &RenderContext) -> ListView {
    let cards: Vec<MovieCard> = page.movies.iter().map(|m| movie_card(m, ctx)).collect();
    ListView {
        title: page.title.clone(),
        empty_message: cards.is_empty().then_some(NO_RESULTS),
        cards,
        window: page.window,
        pager: page.window.items(),
    }
}

// ── Movie detail ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastCard {
    pub id: u64,
    pub name: String,
    pub character: String,
    pub profile_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub id: u64,
    pub title: String,
    pub poster_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Director {
    pub id: u64,
    pub name: String,
}

/// Watch-progress controls. `None` on the detail view means logged out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchedControls {
    pub progress: u8,
    pub label: &'static str,
    pub removable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieDetailView {
    pub id: u64,
    pub title: String,
    pub tagline: Option<String>,
    pub overview: String,
    pub poster_url: String,
    pub backdrop_url: Option<String>,
    pub release_date: String,
    pub rating: String,
    pub genres: String,
    pub runtime: String,
    pub certification: String,
    pub director: Option<Director>,
    pub budget: String,
    pub revenue: String,
    pub production_companies: String,
    pub languages: String,
    pub cast: Vec<CastCard>,
    pub recommendations: Vec<Recommendation>,
    pub trailer_url: Option<String>,
    pub watched: Option<WatchedControls>,
    pub share: ShareLinks,
}

pub fn movie_detail_view(bundle: &MovieDetailBundle, ctx: &RenderContext) -> MovieDetailView {
    let movie = &bundle.movie;
    let credits = movie.credits.as_ref();

    let cast: Vec<CastCard> = credits
        .map(|c| {
            c.cast
                .iter()
                .take(CAST_LIMIT)
                .map(|m| CastCard {
                    id: m.id,
                    name: m.name.clone(),
                    character: non_empty(m.character.as_deref()).unwrap_or("Unknown").to_string(),
                    profile_url: ctx.images.url(ImageSize::W92, m.profile_path.as_deref()),
                })
                .collect()
        })
        .unwrap_or_default();

    let director = credits.and_then(|c| {
        c.crew
            .iter()
            .find(|m| m.job.as_deref() == Some("Director"))
            .map(|m| Director {
                id: m.id,
                name: m.name.clone(),
            })
    });

    let recommendations: Vec<Recommendation> = movie
        .recommendations
        .as_ref()
        .map(|r| {
            r.results
                .iter()
                .take(RECOMMENDATION_LIMIT)
                .map(|m| Recommendation {
                    id: m.id,
                    title: m.title.clone(),
                    poster_url: ctx.images.url(ImageSize::W185, m.poster_path.as_deref()),
                })
                .collect()
        })
        .unwrap_or_default();

    let rating = match movie.vote_average {
        Some(avg) => format!("{avg:.1} / 10 ({} votes)", movie.vote_count.unwrap_or(0)),
        None => format!("{NOT_AVAILABLE} / 10 ({} votes)", movie.vote_count.unwrap_or(0)),
    };

    MovieDetailView {
        id: movie.id,
        title: movie.title.clone(),
        tagline: non_empty(movie.tagline.as_deref()).map(str::to_string),
        overview: non_empty(movie.overview.as_deref())
            .unwrap_or("No overview available.")
            .to_string(),
        poster_url: ctx.images.url(ImageSize::W500, movie.poster_path.as_deref()),
        backdrop_url: ctx.images.optional(ImageSize::W1280, movie.backdrop_path.as_deref()),
        release_date: non_empty(movie.release_date.as_deref()).unwrap_or("Unknown").to_string(),
        rating,
        genres: join_or_na(movie.genres.iter().map(|g| g.name.as_str())),
        runtime: match movie.runtime {
            Some(mins) if mins > 0 => format!("{mins} minutes"),
            _ => NOT_AVAILABLE.to_string(),
        },
        certification: us_certification(movie),
        director,
        budget: format_money(movie.budget),
        revenue: format_money(movie.revenue),
        production_companies: join_or_na(movie.production_companies.iter().map(|c| c.name.as_str())),
        languages: join_or_na(
            movie
                .spoken_languages
                .iter()
                .filter_map(|l| l.english_name.as_deref()),
        ),
        cast,
        recommendations,
        trailer_url: trailer_url(&bundle.videos),
        watched: ctx.logged_in.then(|| watched_controls(ctx.progress(movie.id))),
        share: ShareLinks::build(&ctx.site_origin, &ctx.site_name, movie.id, &movie.title),
    }
}

/// Certification from the first US release date, else "N/A".
pub fn us_certification(movie: &MovieDetail) -> String {
    movie
        .release_dates
        .as_ref()
        .and_then(|rd| rd.results.iter().find(|r| r.iso_3166_1 == "US"))
        .and_then(|us| us.release_dates.first())
        .and_then(|d| non_empty(d.certification.as_deref()))
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

/// First YouTube trailer, as an embeddable URL.
pub fn trailer_url(videos: &[Video]) -> Option<String> {
    videos
        .iter()
        .find(|v| v.video_type == "Trailer" && v.site == "YouTube")
        .map(|v| format!("{YOUTUBE_EMBED}/{}", v.key))
}

pub fn watched_controls(progress: u8) -> WatchedControls {
    WatchedControls {
        progress,
        label: if progress > 0 {
            "Update Watched"
        } else {
            "Mark as Watched"
        },
        removable: progress > 0,
    }
}

/// `$1,234,567`, or "N/A" for zero.
pub fn format_money(amount: u64) -> String {
    if amount == 0 {
        return NOT_AVAILABLE.to_string();
    }
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ── People ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilmographyEntry {
    pub id: u64,
    pub title: String,
    pub role: String,
    pub year: String,
    pub poster_url: String,
    #[serde(skip)]
    sort_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonView {
    pub id: u64,
    pub name: String,
    pub profile_url: String,
    pub born: Option<String>,
    pub known_for: String,
    pub biography: String,
    pub filmography: Vec<FilmographyEntry>,
}

pub fn person_view(bundle: &PersonBundle, ctx: &RenderContext) -> PersonView {
    let person = &bundle.person;
    let born = non_empty(person.birthday.as_deref()).map(|birthday| {
        match non_empty(person.place_of_birth.as_deref()) {
            Some(place) => format!("Born: {birthday} in {place}"),
            None => format!("Born: {birthday}"),
        }
    });

    PersonView {
        id: person.id,
        name: person.name.clone(),
        profile_url: ctx.images.url(ImageSize::W300, person.profile_path.as_deref()),
        born,
        known_for: non_empty(person.known_for_department.as_deref())
            .unwrap_or(NOT_AVAILABLE)
            .to_string(),
        biography: non_empty(person.biography.as_deref())
            .unwrap_or("No biography available.")
            .to_string(),
        filmography: filmography(&bundle.credits, &ctx.images),
    }
}

/// Acting credits plus directing/writing/producing credits, newest first.
/// Equal dates keep their original order (cast before crew).
pub fn filmography(credits: &PersonCredits, images: &ImageUrls) -> Vec<FilmographyEntry> {
    let cast = credits.cast.iter().map(|c| {
        let role = match non_empty(c.character.as_deref()) {
            Some(character) => format!("Actor ({character})"),
            None => "Actor".to_string(),
        };
        entry(
            c.id,
            c.title.as_deref().or(c.name.as_deref()),
            role,
            c.release_date.as_deref(),
            c.first_air_date.as_deref(),
            c.poster_path.as_deref(),
            images,
        )
    });

    let crew = credits
        .crew
        .iter()
        .filter(|c| {
            c.job
                .as_deref()
                .is_some_and(|job| FILMOGRAPHY_JOBS.contains(&job))
        })
        .map(|c| {
            entry(
                c.id,
                c.title.as_deref().or(c.name.as_deref()),
                c.job.clone().unwrap_or_default(),
                c.release_date.as_deref(),
                c.first_air_date.as_deref(),
                c.poster_path.as_deref(),
                images,
            )
        });

    let mut all: Vec<FilmographyEntry> = cast.chain(crew).collect();
    all.sort_by(|a, b| b.sort_date.cmp(&a.sort_date));
    all
}

fn entry(
    id: u64,
    title: Option<&str>,
    role: String,
    release_date: Option<&str>,
    first_air_date: Option<&str>,
    poster_path: Option<&str>,
    images: &ImageUrls,
) -> FilmographyEntry {
    let release_date = non_empty(release_date);
    let date = release_date.or(non_empty(first_air_date)).unwrap_or(UNDATED);
    let year = release_date
        .and_then(parse_date)
        .map(|d| d.year().to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    FilmographyEntry {
        id,
        title: title.unwrap_or_default().to_string(),
        role,
        year,
        poster_url: images.url(ImageSize::W185, poster_path),
        sort_date: parse_date(date).unwrap_or(NaiveDate::MIN),
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

fn join_or_na<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    let joined = parts.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        joined
    }
}
