pub mod avatar;
pub mod config;
pub mod error;
pub mod identity;
pub mod models;
pub mod pagination;
pub mod preferences;
pub mod storage;
