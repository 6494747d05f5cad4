// History Store: persistence for completed session summaries.
// Fail-closed over a local JSON blob: storage trouble degrades to empty
// data, never to an error surfaced at the user.

pub mod handlers;
pub mod stats;
pub mod store;

pub use store::{HistoryStore, MAX_RECORDS};
