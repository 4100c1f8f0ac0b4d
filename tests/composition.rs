// Composition tests: verifying that the pieces chain together correctly.
//
// These tests exercise the data flow between modules:
//   JSON / database -> ProfileStore -> ProfileMatcher -> PersonalizationEngine
// with a fake embedder standing in for the external model.

use anyhow::Result;
use async_trait::async_trait;

use personalizer::personalize::{Embedder, PersonalizationEngine, ToneAdjuster};
use personalizer::{logging, MatchError, ProfileMatcher, ProfileStore, UserProfile};

/// Embeds text by counting a few marker words, one dimension per marker.
struct MarkerEmbedder;

#[async_trait]
impl Embedder for MarkerEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f64>> {
        let lower = text.to_lowercase();
        Ok(["revenue", "recipe", "lol"]
            .iter()
            .map(|marker| lower.matches(marker).count() as f64)
            .collect())
    }
}

struct PrefixTone;

#[async_trait]
impl ToneAdjuster for PrefixTone {
    async fn adjust(&self, tone: &str, content: &str) -> Result<String> {
        let prefix = match tone {
            "formal" => "Dear reader,",
            "playful" => "Hey!",
            _ => "",
        };
        Ok(format!("{prefix} {content}").trim().to_string())
    }
}

const PROFILES_JSON: &str = r#"{
    "Technology": [
        {"preferred_tone": "formal", "embedding": [1.0, 0.0, 0.1]},
        {"preferred_tone": "playful", "embedding": [0.1, 0.0, 1.0]}
    ],
    "Food": [
        {"preferred_tone": "warm", "embedding": [0.0, 1.0, 0.2]}
    ]
}"#;

// ============================================================
// Chain: JSON -> Store -> Engine
// ============================================================

#[tokio::test]
async fn json_store_drives_personalization() {
    logging::init(logging::DEFAULT_FILTER);

    let store = ProfileStore::from_json(PROFILES_JSON).unwrap();
    let engine = PersonalizationEngine::new(&store, &MarkerEmbedder, &PrefixTone);

    let out = engine
        .personalize("Revenue grew and revenue forecasts rose", "Technology")
        .await
        .unwrap();
    assert_eq!(out.tone, "formal");
    assert!(out.content.starts_with("Dear reader,"));

    let out = engine.personalize("lol this gadget lol", "Technology").await.unwrap();
    assert_eq!(out.tone, "playful");
    assert_eq!(out.content, "Hey! lol this gadget lol");

    let out = engine.personalize("A new recipe", "Food").await.unwrap();
    assert_eq!(out.tone, "warm");
    assert_eq!(out.content, "A new recipe");
}

#[tokio::test]
async fn content_without_markers_is_a_zero_vector() {
    let store = ProfileStore::from_json(PROFILES_JSON).unwrap();
    let engine = PersonalizationEngine::new(&store, &MarkerEmbedder, &PrefixTone);

    let err = engine
        .personalize("nothing relevant here", "Technology")
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<MatchError>(),
        Some(MatchError::ZeroVector { index: None, .. })
    ));
}

#[tokio::test]
async fn engine_and_matcher_agree() {
    let store = ProfileStore::from_json(PROFILES_JSON).unwrap();
    let engine = PersonalizationEngine::new(&store, &MarkerEmbedder, &PrefixTone);
    let matcher = ProfileMatcher::new(&store);

    let text = "revenue lol lol";
    let embedding = MarkerEmbedder.embed(text).await.unwrap();
    let direct = matcher.best_match(&embedding, "Technology").unwrap();
    let out = engine.personalize(text, "Technology").await.unwrap();

    assert_eq!(out.tone, direct.profile.preferred_tone);
    assert_eq!(out.similarity, direct.similarity);
}

#[test]
fn centroid_sits_between_cluster_profiles() {
    let store = ProfileStore::from_json(PROFILES_JSON).unwrap();
    let matcher = ProfileMatcher::new(&store);

    let centroid = matcher.cluster_centroid("Technology").unwrap();
    assert_eq!(centroid.len(), 3);
    assert!((centroid[0] - 0.55).abs() < 1e-12);
    assert!((centroid[2] - 0.55).abs() < 1e-12);

    // The centroid is equally close to both profiles, so the first wins
    let best = matcher.find_best_match(&centroid, "Technology").unwrap();
    assert_eq!(best.preferred_tone, "formal");
}

// ============================================================
// Chain: Database -> Store -> Matcher
// ============================================================

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn database_roundtrip_drives_personalization() {
    use personalizer::db;

    let conn = rusqlite::Connection::open_in_memory().unwrap();
    db::schema::create_tables(&conn).unwrap();

    let seeded = ProfileStore::from_json(PROFILES_JSON).unwrap();
    db::queries::save_store(&conn, &seeded).unwrap();
    db::queries::insert_profile(
        &conn,
        &UserProfile::new("Technology", "terse", vec![1.0, 0.0, 0.1]),
    )
    .unwrap();

    let store = db::queries::load_store(&conn).unwrap();
    assert_eq!(store.len(), 4);

    // "terse" duplicates "formal" but was inserted later, so "formal" wins
    let engine = PersonalizationEngine::new(&store, &MarkerEmbedder, &PrefixTone);
    let out = engine.personalize("revenue", "Technology").await.unwrap();
    assert_eq!(out.tone, "formal");

    let ranked = ProfileMatcher::new(&store)
        .rank_matches(&[1.0, 0.0, 0.0], "Technology", 2)
        .unwrap();
    let tones: Vec<&str> = ranked.iter().map(|m| m.profile.preferred_tone.as_str()).collect();
    assert_eq!(tones, vec!["formal", "terse"]);
}
