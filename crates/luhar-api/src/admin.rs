pub mod client;
pub mod error;
pub mod types;

pub use client::AdminClient;
pub use error::AdminError;
pub use types::{AdminUser, RoleFilter, SuspensionFilter, UserFilter};
