// Matcher error taxonomy.
//
// Every variant names the precondition the caller violated. The matcher is a
// pure computation, so none of these are transient and none are retried.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MatchError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("Unknown profile cluster: {0}")]
    UnknownCluster(String),

    #[error("Profile cluster {0} has no profiles")]
    EmptyCluster(String),

    /// `index` is the position of the first offending profile in the cluster.
    #[error(
        "Embedding dimension mismatch in cluster {cluster_id} at profile {index}: \
         query has {expected} dimensions, profile has {actual}"
    )]
    DimensionMismatch {
        cluster_id: String,
        index: usize,
        expected: usize,
        actual: usize,
    },

    /// `index` is `None` when the query vector itself has zero norm.
    #[error("{}", zero_vector_message(.cluster_id, .index))]
    ZeroVector {
        cluster_id: String,
        index: Option<usize>,
    },

    /// `index` is `None` when the non-finite value is in the query vector.
    #[error("{}", non_finite_message(.cluster_id, .index))]
    NonFinite {
        cluster_id: String,
        index: Option<usize>,
    },
}

fn zero_vector_message(cluster_id: &str, index: &Option<usize>) -> String {
    match index {
        None => "Cosine similarity is undefined: query vector has zero norm".to_string(),
        Some(i) => format!(
            "Cosine similarity is undefined: profile {i} in cluster {cluster_id} has a zero-norm embedding"
        ),
    }
}

fn non_finite_message(cluster_id: &str, index: &Option<usize>) -> String {
    match index {
        None => "Query vector contains a NaN or infinite component".to_string(),
        Some(i) => format!(
            "Profile {i} in cluster {cluster_id} has a NaN or infinite embedding component"
        ),
    }
}
