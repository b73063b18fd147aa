use chrono::{Duration, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::candidate::Candidate;
use super::error::RecommendError;
use crate::config::Config;
use crate::constants::{
    CacheStatus, MAX_PARTNER_SUMMARIES, MAX_REASON_NAMES, POOL_FACTOR, POOL_MIN, UNKNOWN,
};
use crate::embedding::Embedder;
use crate::llm::LlmClient;
use crate::moderation::ForbiddenWordFilter;
use crate::repository::{
    NewRecommendation, Recommendation, RecommendationRepository, StoreDirectory,
};
use crate::vectordb::{
    DocumentPoint, PAYLOAD_CATEGORY_KEY, SearchHit, VectorSearchClient, WriteConsistency,
};

/// Pipeline settings carved out of [`Config`].
#[derive(Debug, Clone)]
pub struct RecommenderConfig {
    pub question_collection: String,
    pub benefit_collection: String,
    /// Rolling window within which a persisted batch stays fresh.
    pub freshness: Duration,
}

impl RecommenderConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            question_collection: config.question_collection.clone(),
            benefit_collection: config.benefit_collection.clone(),
            freshness: Duration::hours(config.freshness_hours),
        }
    }
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Response of the question-driven flow.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionRecommendation {
    pub reason: String,
    pub partners: Vec<PartnerSummary>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PartnerSummary {
    pub partner_name: String,
    pub image_url: Option<String>,
}

/// Orchestrates both recommendation flows over the external seams:
/// embedder, vector store, LLM, and the relational repository.
pub struct Recommender<E, V, L, R> {
    embedder: E,
    vectordb: V,
    llm: L,
    repo: R,
    filter: ForbiddenWordFilter,
    config: RecommenderConfig,
}

impl<E, V, L, R> Recommender<E, V, L, R>
where
    E: Embedder,
    V: VectorSearchClient,
    L: LlmClient,
    R: RecommendationRepository + StoreDirectory,
{
    pub fn new(
        embedder: E,
        vectordb: V,
        llm: L,
        repo: R,
        filter: ForbiddenWordFilter,
        config: RecommenderConfig,
    ) -> Self {
        Self {
            embedder,
            vectordb,
            llm,
            repo,
            filter,
            config,
        }
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Creates both Qdrant collections if missing. Called once at startup.
    pub async fn ensure_collections(&self) -> Result<(), RecommendError> {
        let dim = self.embedder.embedding_dim() as u64;
        self.vectordb
            .ensure_collection(&self.config.question_collection, dim)
            .await?;
        self.vectordb
            .ensure_collection(&self.config.benefit_collection, dim)
            .await?;
        Ok(())
    }

    /// Ad-hoc question → category → nearby partners → LLM explanation.
    #[instrument(skip(self, question))]
    pub async fn recommend_by_question(
        &self,
        question: &str,
        lat: f64,
        lng: f64,
    ) -> Result<QuestionRecommendation, RecommendError> {
        // Censor before any embedding or search happens.
        let censored = self.filter.censor(question);
        if ForbiddenWordFilter::is_rejected(&censored) {
            warn!("question rejected by forbidden-word filter");
            return Err(RecommendError::ForbiddenWord);
        }

        let vector = self.embedder.embed(question).await?;
        let hits = self
            .vectordb
            .search(&self.config.question_collection, vector, 1)
            .await?;

        let category = self.resolve_category(question, &hits).await?;
        debug!(category = %category, "category resolved");

        let stores = self.repo.find_nearby(lat, lng, &category).await?;
        if stores.is_empty() {
            return Err(RecommendError::NoStoreFound { category });
        }

        let partner_names = distinct_partner_names(&stores, MAX_PARTNER_SUMMARIES);

        let reason = self
            .llm
            .generate_reasons(question, &category, &partner_names)
            .await?;

        let partners = partner_names
            .into_iter()
            .map(|name| {
                let image_url = stores
                    .iter()
                    .find(|s| s.partner_name == name)
                    .and_then(|s| s.partner_image_url.clone());
                PartnerSummary {
                    partner_name: name,
                    image_url,
                }
            })
            .collect();

        Ok(QuestionRecommendation { reason, partners })
    }

    /// Per-user refresh with the one-day freshness cache.
    #[instrument(skip(self))]
    pub async fn recommend(
        &self,
        user_id: i64,
        top_k: usize,
    ) -> Result<(Vec<Recommendation>, CacheStatus), RecommendError> {
        let now = Utc::now();
        let threshold = now - self.config.freshness;

        if let Some(date) = self
            .repo
            .latest_recommendation_date(user_id, threshold)
            .await?
        {
            let saved = self.repo.find_batch(user_id, date).await?;
            if !saved.is_empty() {
                info!(created_date = %date, "returning cached recommendation batch");
                return Ok((saved, CacheStatus::Hit));
            }
        }

        let feature = self.repo.load_user_feature(user_id).await?;
        let query = feature.to_query_text();

        let top_n = top_k.saturating_mul(POOL_FACTOR).max(POOL_MIN);
        let vector = self.embedder.embed(&query).await?;
        let hits = self
            .vectordb
            .search(&self.config.benefit_collection, vector, top_n as u64)
            .await?;

        let candidates: Vec<Candidate> = hits.iter().filter_map(Candidate::from_hit).collect();
        debug!(
            hits = hits.len(),
            candidates = candidates.len(),
            "candidates mapped from vector hits"
        );

        let batch = build_batch(&candidates, top_k);
        let saved = self
            .repo
            .save_batch(user_id, batch, now.date_naive())
            .await?;

        info!(recommendations = saved.len(), "recommendation batch persisted");
        Ok((saved, CacheStatus::Miss))
    }

    /// Adds a question + category document to the corpus so future
    /// questions resolve without the LLM classifier.
    #[instrument(skip(self, question))]
    pub async fn index_question(
        &self,
        question: &str,
        category: &str,
    ) -> Result<(), RecommendError> {
        let vector = self.embedder.embed(question).await?;
        let point = DocumentPoint::new(Uuid::new_v4().to_string(), vector, question)
            .with_metadata(PAYLOAD_CATEGORY_KEY, json!(category));

        self.vectordb
            .upsert_points(
                &self.config.question_collection,
                vec![point],
                WriteConsistency::Strong,
            )
            .await?;

        Ok(())
    }

    /// Category from the top hit's metadata, else the LLM classifier.
    /// Only the single top-ranked hit is ever consulted.
    async fn resolve_category(
        &self,
        question: &str,
        hits: &[SearchHit],
    ) -> Result<String, RecommendError> {
        if let Some(top) = hits.first() {
            if let Some(category) = top
                .meta_str(PAYLOAD_CATEGORY_KEY)
                .map(str::trim)
                .filter(|c| !c.is_empty())
            {
                return Ok(category.to_string());
            }
        }

        match self.llm.categorize(question).await? {
            Some(category) if !category.trim().is_empty() => Ok(category),
            _ => Err(RecommendError::NoCategoryFound),
        }
    }
}

/// First `limit` distinct partner names, first-occurrence order.
pub(crate) fn distinct_partner_names(
    stores: &[crate::repository::StoreRecord],
    limit: usize,
) -> Vec<String> {
    let mut names = Vec::new();
    for store in stores {
        if !names.contains(&store.partner_name) {
            names.push(store.partner_name.clone());
            if names.len() == limit {
                break;
            }
        }
    }
    names
}

/// Takes the first `top_k` candidates in store order and folds them into a
/// single rank-1 recommendation. The store's similarity ordering is trusted
/// as-is; `Candidate::score` is carried for a future reranker.
pub(crate) fn build_batch(candidates: &[Candidate], top_k: usize) -> Vec<NewRecommendation> {
    let top = &candidates[..candidates.len().min(top_k)];

    let names: Vec<&str> = top
        .iter()
        .map(Candidate::display_name)
        .filter(|name| !name.trim().is_empty())
        .take(MAX_REASON_NAMES)
        .collect();

    let reason = if names.is_empty() {
        "We found benefit candidates matching your preference profile.".to_string()
    } else {
        format!(
            "Based on your preferences, we recommend {}.",
            names.join(", ")
        )
    };

    let partner_name = top
        .first()
        .map(|c| {
            if !c.partner_name.trim().is_empty() {
                c.partner_name.clone()
            } else if !c.benefit_name.trim().is_empty() {
                c.benefit_name.clone()
            } else {
                UNKNOWN.to_string()
            }
        })
        .unwrap_or_else(|| UNKNOWN.to_string());

    let benefit_ids = top.iter().map(|c| c.benefit_id).collect();

    vec![NewRecommendation {
        rank: 1,
        partner_name,
        reason,
        image_url: String::new(),
        benefit_ids,
    }]
}
