// User profiles and the in-memory store the matcher reads from.

pub mod models;
pub mod store;

pub use models::{ProfileMatch, UserProfile};
pub use store::ProfileStore;
