// Personalization: embed content, match it to a profile, rewrite its tone.

pub mod engine;
pub mod traits;

pub use engine::{PersonalizationEngine, PersonalizedContent};
pub use traits::{Embedder, PassthroughTone, ToneAdjuster};
