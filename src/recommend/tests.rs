use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::{Map, json};

use super::candidate::Candidate;
use super::error::RecommendError;
use super::pipeline::{Recommender, RecommenderConfig, build_batch, distinct_partner_names};
use crate::constants::{CacheStatus, UNKNOWN};
use crate::embedding::{Embedder, MockEmbedder};
use crate::llm::MockLlm;
use crate::moderation::ForbiddenWordFilter;
use crate::repository::{MockRepository, Recommendation, StoreRecord};
use crate::vectordb::{
    DocumentPoint, MockVectorSearchClient, SearchHit, VectorSearchClient, WriteConsistency,
};

const DIM: usize = 8;

type MockRecommender = Recommender<
    Arc<MockEmbedder>,
    Arc<MockVectorSearchClient>,
    Arc<MockLlm>,
    Arc<MockRepository>,
>;

struct Harness {
    embedder: Arc<MockEmbedder>,
    vectordb: Arc<MockVectorSearchClient>,
    llm: Arc<MockLlm>,
    repo: Arc<MockRepository>,
    recommender: MockRecommender,
}

async fn harness(llm: MockLlm, repo: MockRepository) -> Harness {
    let embedder = Arc::new(MockEmbedder::new(DIM));
    let vectordb = Arc::new(MockVectorSearchClient::new());
    let llm = Arc::new(llm);
    let repo = Arc::new(repo);

    let recommender = Recommender::new(
        embedder.clone(),
        vectordb.clone(),
        llm.clone(),
        repo.clone(),
        ForbiddenWordFilter::default(),
        RecommenderConfig::default(),
    );
    recommender.ensure_collections().await.unwrap();

    Harness {
        embedder,
        vectordb,
        llm,
        repo,
        recommender,
    }
}

fn store(partner: &str, category: &str) -> StoreRecord {
    StoreRecord {
        store_id: 0,
        store_name: format!("{partner} main branch"),
        partner_name: partner.to_string(),
        partner_image_url: Some(format!("https://img.example/{partner}.png")),
        category: category.to_string(),
        lat: 37.5,
        lng: 127.0,
    }
}

fn benefit_hit(benefit_id: i64, partner_id: i64, name: &str, partner: &str) -> SearchHit {
    let mut metadata = Map::new();
    metadata.insert("benefitId".to_string(), json!(benefit_id));
    metadata.insert("partnerId".to_string(), json!(partner_id));
    metadata.insert("benefitName".to_string(), json!(name));
    metadata.insert("partnerName".to_string(), json!(partner));
    SearchHit {
        score: 0.9,
        text: format!("{name} description"),
        metadata,
    }
}

async fn seed_benefit_doc(h: &Harness, benefit_id: i64, partner_id: i64, name: &str) {
    let vector = h.embedder.embed(name).await.unwrap();
    let point = DocumentPoint::new(format!("b{benefit_id}"), vector, name)
        .with_metadata("benefitId", json!(benefit_id))
        .with_metadata("partnerId", json!(partner_id))
        .with_metadata("benefitName", json!(name))
        .with_metadata("partnerName", json!(format!("Partner{partner_id}")));
    h.vectordb
        .upsert_points("perkflow_benefits", vec![point], WriteConsistency::Strong)
        .await
        .unwrap();
}

// --- question flow -------------------------------------------------------

#[tokio::test]
async fn forbidden_question_fails_before_any_search() {
    let h = harness(
        MockLlm::new(Some("CAFE")),
        MockRepository::new().with_store(store("NiceCafe", "CAFE")),
    )
    .await;

    let err = h
        .recommender
        .recommend_by_question("best casino nearby", 37.5, 127.0)
        .await
        .unwrap_err();

    assert!(matches!(err, RecommendError::ForbiddenWord));
    assert_eq!(h.embedder.call_count(), 0);
    assert_eq!(h.vectordb.search_count(), 0);
    assert_eq!(h.llm.categorize_count(), 0);
}

#[tokio::test]
async fn empty_hits_call_the_classifier_exactly_once() {
    let h = harness(
        MockLlm::new(Some("CAFE")),
        MockRepository::new().with_store(store("NiceCafe", "CAFE")),
    )
    .await;

    let response = h
        .recommender
        .recommend_by_question("somewhere for an espresso?", 37.5, 127.0)
        .await
        .unwrap();

    assert_eq!(h.llm.categorize_count(), 1);
    assert_eq!(response.partners.len(), 1);
    assert_eq!(response.partners[0].partner_name, "NiceCafe");
}

#[tokio::test]
async fn corpus_category_skips_the_classifier() {
    let h = harness(
        MockLlm::new(Some("WRONG")),
        MockRepository::new().with_store(store("BurgerBarn", "FOOD")),
    )
    .await;

    h.recommender
        .index_question("cheap pizza places", "FOOD")
        .await
        .unwrap();

    let response = h
        .recommender
        .recommend_by_question("cheap pizza places", 37.5, 127.0)
        .await
        .unwrap();

    assert_eq!(h.llm.categorize_count(), 0);
    assert_eq!(response.partners[0].partner_name, "BurgerBarn");
    assert_eq!(
        response.partners[0].image_url.as_deref(),
        Some("https://img.example/BurgerBarn.png")
    );
}

#[tokio::test]
async fn blank_corpus_category_falls_back_to_the_classifier() {
    let h = harness(
        MockLlm::new(Some("FOOD")),
        MockRepository::new().with_store(store("BurgerBarn", "FOOD")),
    )
    .await;

    h.recommender
        .index_question("cheap pizza places", "   ")
        .await
        .unwrap();

    h.recommender
        .recommend_by_question("cheap pizza places", 37.5, 127.0)
        .await
        .unwrap();

    assert_eq!(h.llm.categorize_count(), 1);
}

#[tokio::test]
async fn blank_category_everywhere_is_no_category_found() {
    let h = harness(MockLlm::new(None), MockRepository::new()).await;

    h.recommender
        .index_question("cheap pizza places", "")
        .await
        .unwrap();

    let err = h
        .recommender
        .recommend_by_question("cheap pizza places", 37.5, 127.0)
        .await
        .unwrap_err();

    assert!(matches!(err, RecommendError::NoCategoryFound));
    assert_eq!(h.llm.categorize_count(), 1);
}

#[tokio::test]
async fn empty_store_result_is_no_store_found() {
    let h = harness(MockLlm::new(Some("TRAVEL")), MockRepository::new()).await;

    let err = h
        .recommender
        .recommend_by_question("weekend getaway deals?", 37.5, 127.0)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RecommendError::NoStoreFound { category } if category == "TRAVEL"
    ));
}

#[tokio::test]
async fn partner_names_dedupe_cap_and_keep_first_seen_order() {
    let stores: Vec<StoreRecord> = ["A", "B", "A", "C", "D", "B", "E", "F"]
        .iter()
        .map(|p| store(p, "FOOD"))
        .collect();

    let names = distinct_partner_names(&stores, 5);
    assert_eq!(names, vec!["A", "B", "C", "D", "E"]);
}

// --- user flow -----------------------------------------------------------

#[tokio::test]
async fn fresh_user_gets_one_rank_one_recommendation() {
    let h = harness(
        MockLlm::new(None),
        MockRepository::new().with_user(42).with_benefits(&[1, 2]),
    )
    .await;

    seed_benefit_doc(&h, 1, 10, "Latte Discount").await;
    seed_benefit_doc(&h, 2, 11, "Movie Night Pass").await;

    let (batch, status) = h.recommender.recommend(42, 3).await.unwrap();

    assert_eq!(status, CacheStatus::Miss);
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].rank, 1);
    assert!(batch[0].benefit_ids.len() <= 3);
    assert_eq!(batch[0].benefit_ids.len(), 2);
    assert!(batch[0].reason.contains("recommend"));
    assert_eq!(h.repo.saved_count(), 1);
}

#[tokio::test]
async fn second_call_within_the_window_hits_the_cache() {
    let h = harness(
        MockLlm::new(None),
        MockRepository::new().with_user(42).with_benefits(&[1]),
    )
    .await;

    seed_benefit_doc(&h, 1, 10, "Latte Discount").await;

    let (first, status) = h.recommender.recommend(42, 3).await.unwrap();
    assert_eq!(status, CacheStatus::Miss);
    assert_eq!(h.vectordb.search_count(), 1);

    let (second, status) = h.recommender.recommend(42, 3).await.unwrap();
    assert_eq!(status, CacheStatus::Hit);
    assert_eq!(second, first);
    // No new vector search on the cached path.
    assert_eq!(h.vectordb.search_count(), 1);
}

#[tokio::test]
async fn stale_batch_outside_the_window_is_recomputed() {
    let repo = MockRepository::new()
        .with_user(42)
        .with_benefits(&[1])
        .with_saved(Recommendation {
            id: 1,
            user_id: 42,
            rank: 1,
            partner_name: "Old".to_string(),
            reason: "old".to_string(),
            image_url: String::new(),
            benefit_ids: vec![1],
            created_date: (Utc::now() - Duration::days(3)).date_naive(),
            created_at: Utc::now() - Duration::days(3),
        });
    let h = harness(MockLlm::new(None), repo).await;

    seed_benefit_doc(&h, 1, 10, "Latte Discount").await;

    let (_, status) = h.recommender.recommend(42, 3).await.unwrap();
    assert_eq!(status, CacheStatus::Miss);
    assert_eq!(h.vectordb.search_count(), 1);
}

#[tokio::test]
async fn unknown_user_fails_at_persist_time() {
    let h = harness(MockLlm::new(None), MockRepository::new()).await;

    let err = h.recommender.recommend(404, 3).await.unwrap_err();
    assert!(matches!(err, RecommendError::UserNotFound { user_id: 404 }));
}

// --- candidate mapping ---------------------------------------------------

#[test]
fn hits_without_required_ids_are_dropped_silently() {
    let mut incomplete = benefit_hit(1, 10, "Latte Discount", "NiceCafe");
    incomplete.metadata.remove("partnerId");
    assert!(Candidate::from_hit(&incomplete).is_none());

    let mut incomplete = benefit_hit(1, 10, "Latte Discount", "NiceCafe");
    incomplete.metadata.remove("benefitId");
    assert!(Candidate::from_hit(&incomplete).is_none());
}

#[test]
fn candidate_ids_accept_numeric_strings() {
    let mut hit = benefit_hit(0, 0, "Latte Discount", "NiceCafe");
    hit.metadata.insert("benefitId".to_string(), json!("17"));
    hit.metadata.insert("partnerId".to_string(), json!("9"));

    let candidate = Candidate::from_hit(&hit).unwrap();
    assert_eq!(candidate.benefit_id, 17);
    assert_eq!(candidate.partner_id, 9);
}

#[test]
fn missing_optional_metadata_gets_typed_defaults() {
    let mut metadata = Map::new();
    metadata.insert("benefitId".to_string(), json!(1));
    metadata.insert("partnerId".to_string(), json!(2));
    let hit = SearchHit {
        score: 0.4,
        text: "raw document text".to_string(),
        metadata,
    };

    let candidate = Candidate::from_hit(&hit).unwrap();
    assert_eq!(candidate.benefit_name, "raw document text");
    assert_eq!(candidate.partner_name, UNKNOWN);
    assert_eq!(candidate.category, UNKNOWN);
    assert_eq!(candidate.description, "");
    assert_eq!(candidate.context, "");
}

#[test]
fn present_but_blank_metadata_stays_blank() {
    let mut hit = benefit_hit(1, 2, "Latte Discount", "NiceCafe");
    hit.metadata.insert("partnerName".to_string(), json!(""));

    let candidate = Candidate::from_hit(&hit).unwrap();
    assert_eq!(candidate.partner_name, "");
}

// --- batch construction --------------------------------------------------

#[test]
fn build_batch_takes_first_top_k_in_store_order() {
    let candidates: Vec<Candidate> = (1..=8)
        .map(|i| {
            Candidate::from_hit(&benefit_hit(i, i + 100, &format!("Benefit{i}"), "P")).unwrap()
        })
        .collect();

    let batch = build_batch(&candidates, 3);
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].rank, 1);
    assert_eq!(batch[0].benefit_ids, vec![1, 2, 3]);
}

#[test]
fn build_batch_reason_names_cap_at_five() {
    let candidates: Vec<Candidate> = (1..=8)
        .map(|i| {
            Candidate::from_hit(&benefit_hit(i, i + 100, &format!("Benefit{i}"), "P")).unwrap()
        })
        .collect();

    let batch = build_batch(&candidates, 8);
    assert_eq!(batch[0].benefit_ids.len(), 8);
    assert!(batch[0].reason.contains("Benefit5"));
    assert!(!batch[0].reason.contains("Benefit6"));
}

#[test]
fn build_batch_representative_partner_falls_back() {
    let mut hit = benefit_hit(1, 2, "Latte Discount", "NiceCafe");
    hit.metadata.insert("partnerName".to_string(), json!("  "));
    let candidates = vec![Candidate::from_hit(&hit).unwrap()];

    let batch = build_batch(&candidates, 1);
    assert_eq!(batch[0].partner_name, "Latte Discount");
}

#[test]
fn build_batch_with_no_candidates_is_unknown() {
    let batch = build_batch(&[], 3);
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].partner_name, UNKNOWN);
    assert!(batch[0].benefit_ids.is_empty());
}

// --- indexing ------------------------------------------------------------

#[tokio::test]
async fn index_question_stores_one_point() {
    let h = harness(MockLlm::new(None), MockRepository::new()).await;

    h.recommender
        .index_question("do I get cinema discounts?", "CULTURE")
        .await
        .unwrap();

    assert_eq!(h.vectordb.point_count("perkflow_questions"), Some(1));
}
