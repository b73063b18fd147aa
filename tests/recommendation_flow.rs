//! End-to-end pipeline tests over the mock backends.

use std::sync::Arc;

use serde_json::json;

use perkflow::constants::CacheStatus;
use perkflow::embedding::{Embedder, MockEmbedder};
use perkflow::llm::MockLlm;
use perkflow::moderation::ForbiddenWordFilter;
use perkflow::recommend::{Recommender, RecommenderConfig};
use perkflow::repository::{MockRepository, StoreRecord};
use perkflow::vectordb::{
    DocumentPoint, MockVectorSearchClient, VectorSearchClient, WriteConsistency,
};

const DIM: usize = 8;

fn store(partner: &str, category: &str) -> StoreRecord {
    StoreRecord {
        store_id: 0,
        store_name: format!("{partner} flagship"),
        partner_name: partner.to_string(),
        partner_image_url: Some(format!("https://img.example/{partner}.png")),
        category: category.to_string(),
        lat: 37.5,
        lng: 127.0,
    }
}

type SharedRecommender = Recommender<
    Arc<MockEmbedder>,
    Arc<MockVectorSearchClient>,
    Arc<MockLlm>,
    Arc<MockRepository>,
>;

async fn build_recommender(
    llm: MockLlm,
    repo: Arc<MockRepository>,
) -> (SharedRecommender, Arc<MockEmbedder>, Arc<MockVectorSearchClient>) {
    let embedder = Arc::new(MockEmbedder::new(DIM));
    let vectordb = Arc::new(MockVectorSearchClient::new());

    let recommender = Recommender::new(
        embedder.clone(),
        vectordb.clone(),
        Arc::new(llm),
        repo,
        ForbiddenWordFilter::default(),
        RecommenderConfig::default(),
    );
    recommender.ensure_collections().await.unwrap();

    (recommender, embedder, vectordb)
}

#[tokio::test]
async fn question_flow_end_to_end_with_a_seeded_corpus() {
    let repo = Arc::new(
        MockRepository::new()
            .with_store(store("NiceCafe", "CAFE"))
            .with_store(store("BeanHouse", "CAFE"))
            .with_store(store("NiceCafe", "CAFE")),
    );

    let (recommender, _, _) =
        build_recommender(MockLlm::new(Some("SHOULD_NOT_RUN")), repo).await;

    // Seed the corpus so the classifier is never needed.
    recommender
        .index_question("quiet place for an americano", "CAFE")
        .await
        .unwrap();

    let response = recommender
        .recommend_by_question("quiet place for an americano", 37.5, 127.0)
        .await
        .unwrap();

    let names: Vec<&str> = response
        .partners
        .iter()
        .map(|p| p.partner_name.as_str())
        .collect();
    assert_eq!(names, vec!["NiceCafe", "BeanHouse"]);
    assert!(!response.reason.is_empty());
}

#[tokio::test]
async fn user_flow_refreshes_then_serves_from_cache() {
    let repo = Arc::new(MockRepository::new().with_user(7).with_benefits(&[1, 2]));
    let (recommender, embedder, vectordb) = build_recommender(MockLlm::new(None), repo).await;

    for (id, name) in [(1, "Latte Discount"), (2, "Bagel Bundle")] {
        let vector = embedder.embed(name).await.unwrap();
        let point = DocumentPoint::new(format!("b{id}"), vector, name)
            .with_metadata("benefitId", json!(id))
            .with_metadata("partnerId", json!(id + 100))
            .with_metadata("benefitName", json!(name))
            .with_metadata("partnerName", json!("NiceCafe"));
        vectordb
            .upsert_points("perkflow_benefits", vec![point], WriteConsistency::Strong)
            .await
            .unwrap();
    }

    let (fresh, status) = recommender.recommend(7, 2).await.unwrap();
    assert_eq!(status, CacheStatus::Miss);
    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh[0].rank, 1);
    assert_eq!(fresh[0].benefit_ids.len(), 2);

    let (cached, status) = recommender.recommend(7, 2).await.unwrap();
    assert_eq!(status, CacheStatus::Hit);
    assert_eq!(cached, fresh);
    assert_eq!(vectordb.search_count(), 1);
}

#[tokio::test]
async fn concurrent_cache_misses_converge_on_one_batch() {
    // Two pipeline instances sharing one repository, as two server
    // processes would share one database.
    let repo = Arc::new(MockRepository::new().with_user(7).with_benefits(&[1]));

    let (left, left_embedder, left_vectordb) =
        build_recommender(MockLlm::new(None), repo.clone()).await;
    let (right, _, right_vectordb) = build_recommender(MockLlm::new(None), repo.clone()).await;

    let vector = left_embedder.embed("Latte Discount").await.unwrap();
    let point = DocumentPoint::new("b1", vector, "Latte Discount")
        .with_metadata("benefitId", json!(1))
        .with_metadata("partnerId", json!(101))
        .with_metadata("benefitName", json!("Latte Discount"))
        .with_metadata("partnerName", json!("NiceCafe"));
    for vectordb in [&left_vectordb, &right_vectordb] {
        vectordb
            .upsert_points(
                "perkflow_benefits",
                vec![point.clone()],
                WriteConsistency::Strong,
            )
            .await
            .unwrap();
    }

    let (left_result, right_result) = tokio::join!(left.recommend(7, 1), right.recommend(7, 1));
    let (left_batch, _) = left_result.unwrap();
    let (right_batch, _) = right_result.unwrap();

    // Whoever lost the insert race read back the winner's rows.
    assert_eq!(left_batch, right_batch);
    assert_eq!(repo.saved_count(), 1);
}
