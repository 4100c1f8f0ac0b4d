// Profile data models.
//
// Profiles are built by an external process (clustering over user behavior)
// and handed to us as plain data. Nothing in this crate mutates a profile
// after it's stored.

use serde::{Deserialize, Serialize};

/// A stored user profile: the cluster it belongs to, the tone its members
/// respond to, and the embedding that represents it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub cluster_id: String,
    /// Writing register this profile prefers, e.g. "formal" or "casual"
    pub preferred_tone: String,
    pub embedding: Vec<f64>,
}

impl UserProfile {
    pub fn new(
        cluster_id: impl Into<String>,
        preferred_tone: impl Into<String>,
        embedding: Vec<f64>,
    ) -> Self {
        Self {
            cluster_id: cluster_id.into(),
            preferred_tone: preferred_tone.into(),
            embedding,
        }
    }

    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }
}

/// A profile scored against a content vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileMatch<'a> {
    pub profile: &'a UserProfile,
    /// Position of the profile within its cluster's stored order
    pub index: usize,
    /// Cosine similarity to the query, in [-1, 1]
    pub similarity: f64,
}
