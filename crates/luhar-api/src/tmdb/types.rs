use serde::{Deserialize, Serialize};

// ── List responses ──────────────────────────────────────────────

/// One page of a movie list (popular, search, discover, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoviePage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<MovieSummary>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f32,
    pub overview: Option<String>,
}

// ── Movie detail ────────────────────────────────────────────────

/// `GET /movie/{id}?append_to_response=credits,release_dates,recommendations`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f32>,
    pub vote_count: Option<u32>,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub budget: u64,
    #[serde(default)]
    pub revenue: u64,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub production_companies: Vec<NamedEntity>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    pub credits: Option<Credits>,
    pub release_dates: Option<ReleaseDates>,
    pub recommendations: Option<MoviePage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamedEntity {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpokenLanguage {
    pub iso_639_1: Option<String>,
    pub english_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    pub job: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseDates {
    #[serde(default)]
    pub results: Vec<CountryReleases>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountryReleases {
    pub iso_3166_1: String,
    #[serde(default)]
    pub release_dates: Vec<ReleaseDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseDate {
    pub certification: Option<String>,
    pub release_date: Option<String>,
}

/// `GET /movie/{id}/videos`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoList {
    #[serde(default)]
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Video {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
    pub name: Option<String>,
}

// ── People ──────────────────────────────────────────────────────

/// `GET /person/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Person {
    pub id: u64,
    pub name: String,
    pub biography: Option<String>,
    pub birthday: Option<String>,
    pub place_of_birth: Option<String>,
    pub known_for_department: Option<String>,
    pub profile_path: Option<String>,
}

/// `GET /person/{id}/movie_credits`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonCredits {
    #[serde(default)]
    pub cast: Vec<PersonCastCredit>,
    #[serde(default)]
    pub crew: Vec<PersonCrewCredit>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonCastCredit {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub character: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub poster_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonCrewCredit {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub job: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub poster_path: Option<String>,
}

// ── Genres ──────────────────────────────────────────────────────

/// `GET /genre/movie/list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}
