use serde::{Deserialize, Serialize};

/// A movie as rendered in list views (search results, latest, trending tiles)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    /// TMDB movie id
    pub id: i64,
    pub title: String,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: f64,
}

/// Full movie record for the detail view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    pub id: i64,
    pub title: String,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: f64,
    pub runtime: Option<i32>,
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// One page of a TMDB list response (search, discover)
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage {
    pub results: Vec<TmdbMovie>,
}

/// Raw movie entry from TMDB list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
}

impl From<TmdbMovie> for MovieSummary {
    fn from(movie: TmdbMovie) -> Self {
        MovieSummary {
            id: movie.id,
            title: movie.title,
            poster_path: movie.poster_path,
            // TMDB sends empty strings for unreleased titles
            overview: movie.overview.filter(|o| !o.is_empty()),
            release_date: movie.release_date.filter(|d| !d.is_empty()),
            vote_average: movie.vote_average,
        }
    }
}

/// Raw response from the TMDB movie details endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub runtime: Option<i32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

impl From<TmdbMovieDetails> for MovieDetail {
    fn from(details: TmdbMovieDetails) -> Self {
        MovieDetail {
            id: details.id,
            title: details.title,
            poster_path: details.poster_path,
            overview: details.overview.filter(|o| !o.is_empty()),
            release_date: details.release_date.filter(|d| !d.is_empty()),
            vote_average: details.vote_average,
            runtime: details.runtime,
            genres: details.genres,
        }
    }
}
