mod list;
mod view;

pub use list::{AddOutcome, ListItem, ListKind, ListRecord, Upsert, WatchedRecord};
pub use view::{Category, ViewState};
