mod movie;
mod search_counter;

pub use movie::{Genre, MovieDetail, MovieSummary, TmdbMovie, TmdbMovieDetails, TmdbPage};
pub use search_counter::SearchCounterRecord;
