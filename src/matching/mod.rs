// Profile matching: cosine similarity against a cluster of stored profiles.

pub mod error;
pub mod matcher;
pub mod similarity;

pub use error::MatchError;
pub use matcher::ProfileMatcher;
