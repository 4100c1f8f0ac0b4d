// ProfileMatcher: finds the stored profile closest to a piece of content.
//
// Given the content's embedding and the cluster the requesting user belongs
// to, every profile in that cluster is scored by cosine similarity and the
// best one wins. Ties go to the profile stored first, so the same store and
// the same query always produce the same answer.
//
// All preconditions are checked before any scoring happens. A bad cluster
// never yields a partial or arbitrary result.

use tracing::debug;

use super::error::{MatchError, Result};
use super::similarity::{cosine_similarity, is_zero, mean_embedding};
use crate::profiles::models::{ProfileMatch, UserProfile};
use crate::profiles::store::ProfileStore;

/// Read-only matcher over a borrowed profile store snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ProfileMatcher<'a> {
    store: &'a ProfileStore,
}

impl<'a> ProfileMatcher<'a> {
    pub fn new(store: &'a ProfileStore) -> Self {
        Self { store }
    }

    /// Return the profile in `cluster_id` most similar to `content_vector`.
    ///
    /// # Errors
    ///
    /// `UnknownCluster`, `EmptyCluster`, `DimensionMismatch`, `NonFinite` or
    /// `ZeroVector`, checked in that order.
    pub fn find_best_match(
        &self,
        content_vector: &[f64],
        cluster_id: &str,
    ) -> Result<&'a UserProfile> {
        self.best_match(content_vector, cluster_id)
            .map(|m| m.profile)
    }

    /// Like `find_best_match`, but also reports the winning similarity and
    /// the profile's position in the cluster.
    pub fn best_match(&self, content_vector: &[f64], cluster_id: &str) -> Result<ProfileMatch<'a>> {
        let scored = self.score_cluster(content_vector, cluster_id)?;

        // Strict `>` keeps the earliest profile on ties
        let mut best = scored[0];
        for candidate in &scored[1..] {
            if candidate.similarity > best.similarity {
                best = *candidate;
            }
        }

        debug!(
            cluster_id,
            candidates = scored.len(),
            index = best.index,
            tone = best.profile.preferred_tone.as_str(),
            similarity = best.similarity,
            "Matched profile"
        );

        Ok(best)
    }

    /// Up to `top_k` profiles from the cluster, most similar first.
    ///
    /// Ordering among equal similarities follows stored order. A `top_k` of
    /// zero returns an empty list once the inputs have been validated.
    pub fn rank_matches(
        &self,
        content_vector: &[f64],
        cluster_id: &str,
        top_k: usize,
    ) -> Result<Vec<ProfileMatch<'a>>> {
        let mut scored = self.score_cluster(content_vector, cluster_id)?;

        // sort_by is stable, and scaled cosine of finite inputs is never NaN
        scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        scored.truncate(top_k);

        Ok(scored)
    }

    /// Mean embedding of every profile in the cluster.
    pub fn cluster_centroid(&self, cluster_id: &str) -> Result<Vec<f64>> {
        let profiles = self.non_empty_cluster(cluster_id)?;

        let expected = profiles[0].dimension();
        if let Some((index, p)) = profiles
            .iter()
            .enumerate()
            .find(|(_, p)| p.dimension() != expected)
        {
            return Err(MatchError::DimensionMismatch {
                cluster_id: cluster_id.to_string(),
                index,
                expected,
                actual: p.dimension(),
            });
        }

        let embeddings: Vec<&[f64]> = profiles.iter().map(|p| p.embedding.as_slice()).collect();
        // Dimensions were checked above, so the mean is always defined
        Ok(mean_embedding(&embeddings).unwrap_or_default())
    }

    fn non_empty_cluster(&self, cluster_id: &str) -> Result<&'a [UserProfile]> {
        let profiles = self
            .store
            .cluster(cluster_id)
            .ok_or_else(|| MatchError::UnknownCluster(cluster_id.to_string()))?;

        if profiles.is_empty() {
            return Err(MatchError::EmptyCluster(cluster_id.to_string()));
        }

        Ok(profiles)
    }

    /// Validate the query against the cluster and score every profile.
    /// The returned list is non-empty and in stored order.
    fn score_cluster(
        &self,
        content_vector: &[f64],
        cluster_id: &str,
    ) -> Result<Vec<ProfileMatch<'a>>> {
        let profiles = self.non_empty_cluster(cluster_id)?;
        let expected = content_vector.len();

        for (index, profile) in profiles.iter().enumerate() {
            if profile.dimension() != expected {
                return Err(MatchError::DimensionMismatch {
                    cluster_id: cluster_id.to_string(),
                    index,
                    expected,
                    actual: profile.dimension(),
                });
            }
        }

        if !content_vector.iter().all(|x| x.is_finite()) {
            return Err(MatchError::NonFinite {
                cluster_id: cluster_id.to_string(),
                index: None,
            });
        }
        if let Some(index) = profiles
            .iter()
            .position(|p| !p.embedding.iter().all(|x| x.is_finite()))
        {
            return Err(MatchError::NonFinite {
                cluster_id: cluster_id.to_string(),
                index: Some(index),
            });
        }

        if is_zero(content_vector) {
            return Err(MatchError::ZeroVector {
                cluster_id: cluster_id.to_string(),
                index: None,
            });
        }

        let mut scored = Vec::with_capacity(profiles.len());
        for (index, profile) in profiles.iter().enumerate() {
            // Lengths agree and the query is finite and non-zero, so None means an all-zero profile
            let similarity = cosine_similarity(content_vector, &profile.embedding).ok_or_else(
                || MatchError::ZeroVector {
                    cluster_id: cluster_id.to_string(),
                    index: Some(index),
                },
            )?;

            scored.push(ProfileMatch {
                profile,
                index,
                similarity,
            });
        }

        Ok(scored)
    }
}
