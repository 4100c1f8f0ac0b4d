// Personalizer: match content to clustered user profiles by cosine similarity.
//
// This is the library root. `matching` holds the core lookup; the other
// modules supply the profile store it reads and the flow around it.

pub mod config;
pub mod logging;
pub mod matching;
pub mod personalize;
pub mod profiles;

#[cfg(feature = "sqlite")]
pub mod db;

pub use matching::{MatchError, ProfileMatcher};
pub use profiles::{ProfileMatch, ProfileStore, UserProfile};
