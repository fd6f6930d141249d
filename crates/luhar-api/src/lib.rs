pub mod admin;
pub mod images;
pub mod share;
pub mod tmdb;
pub mod traits;
