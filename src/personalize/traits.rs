// Model seams for personalization.
//
// Embedding text and rewriting it in a given tone both need a model runtime,
// which lives outside this crate. These traits are the swap points: a local
// ONNX embedder, a hosted API, or a test fake all plug in the same way.

use anyhow::Result;
use async_trait::async_trait;

/// Turns text into an embedding comparable with stored profile embeddings.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f64>>;

    /// Embed multiple texts, returning vectors in the same order.
    /// Default implementation calls `embed` sequentially; providers
    /// can override for batching if they support it.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }
}

/// Rewrites content in a profile's preferred tone.
#[async_trait]
pub trait ToneAdjuster: Send + Sync {
    async fn adjust(&self, tone: &str, content: &str) -> Result<String>;
}

/// Tone adjuster that returns the content unchanged.
///
/// Useful when only the matched tone is needed and the rewrite happens
/// elsewhere.
pub struct PassthroughTone;

#[async_trait]
impl ToneAdjuster for PassthroughTone {
    async fn adjust(&self, _tone: &str, content: &str) -> Result<String> {
        Ok(content.to_string())
    }
}
