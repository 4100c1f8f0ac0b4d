// PersonalizationEngine: orchestrates personalization for one piece of content.
//
// Given a draft and the cluster the reader belongs to, this:
// 1. Embeds the draft
// 2. Finds the closest stored profile in the reader's cluster
// 3. Rewrites the draft in that profile's preferred tone
//
// A failing step is logged and returned to the caller unchanged. Matcher
// failures stay typed: `err.downcast_ref::<MatchError>()` recovers them.

use anyhow::Result;
use tracing::{error, info};

use super::traits::{Embedder, ToneAdjuster};
use crate::config::{Config, DEFAULT_TOP_K};
use crate::matching::ProfileMatcher;
use crate::profiles::models::{ProfileMatch, UserProfile};
use crate::profiles::store::ProfileStore;

/// Output of a successful personalization.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonalizedContent {
    pub content: String,
    /// Tone of the matched profile
    pub tone: String,
    pub cluster_id: String,
    /// Cosine similarity between the draft and the matched profile
    pub similarity: f64,
}

pub struct PersonalizationEngine<'a> {
    matcher: ProfileMatcher<'a>,
    embedder: &'a dyn Embedder,
    tone: &'a dyn ToneAdjuster,
    /// How many profiles `candidates` returns
    top_k: usize,
}

impl<'a> PersonalizationEngine<'a> {
    pub fn new(
        store: &'a ProfileStore,
        embedder: &'a dyn Embedder,
        tone: &'a dyn ToneAdjuster,
    ) -> Self {
        Self {
            matcher: ProfileMatcher::new(store),
            embedder,
            tone,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Take the candidate count from the configuration (PERSONALIZER_TOP_K).
    pub fn with_config(mut self, config: &Config) -> Self {
        self.top_k = config.top_k;
        self
    }

    /// The `top_k` closest profiles for `content`, most similar first.
    ///
    /// The first entry is always the profile `personalize` would pick.
    pub async fn candidates(&self, content: &str, cluster_id: &str) -> Result<Vec<ProfileMatch<'a>>> {
        let embedding = self.embedder.embed(content).await.inspect_err(|e| {
            error!(cluster_id, error = %e, "Embedding generation failed");
        })?;

        let ranked = self
            .matcher
            .rank_matches(&embedding, cluster_id, self.top_k)
            .inspect_err(|e| {
                error!(cluster_id, error = %e, "Profile ranking failed");
            })?;

        Ok(ranked)
    }

    /// Personalize `content` for a reader in `cluster_id`.
    pub async fn personalize(&self, content: &str, cluster_id: &str) -> Result<PersonalizedContent> {
        let embedding = self.embedder.embed(content).await.inspect_err(|e| {
            error!(cluster_id, error = %e, "Embedding generation failed");
        })?;

        let matched = self
            .matcher
            .best_match(&embedding, cluster_id)
            .inspect_err(|e| {
                error!(cluster_id, error = %e, "Profile matching failed");
            })?;

        let tone = matched.profile.preferred_tone.as_str();
        let adjusted = self.tone.adjust(tone, content).await.inspect_err(|e| {
            error!(cluster_id, tone, error = %e, "Tone adjustment failed");
        })?;

        info!(
            cluster_id,
            tone,
            similarity = format!("{:.3}", matched.similarity),
            "Personalized content"
        );

        Ok(PersonalizedContent {
            content: adjusted,
            tone: tone.to_string(),
            cluster_id: cluster_id.to_string(),
            similarity: matched.similarity,
        })
    }

    /// Personalize for a specific reader, using the reader's cluster.
    pub async fn personalize_for(
        &self,
        content: &str,
        reader: &UserProfile,
    ) -> Result<PersonalizedContent> {
        self.personalize(content, &reader.cluster_id).await
    }
}
