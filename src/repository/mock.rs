use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use chrono::{DateTime, NaiveDate, Utc};

use super::error::RepositoryError;
use super::model::{NewRecommendation, Recommendation, StoreRecord};
use super::{RecommendationRepository, StoreDirectory};
use crate::recommend::feature::UserFeature;

/// In-memory repository double mirroring the Postgres semantics, including
/// the one-batch-per-day conflict rule.
#[derive(Default)]
pub struct MockRepository {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashSet<i64>,
    benefits: HashSet<i64>,
    features: HashMap<i64, UserFeature>,
    stores: Vec<StoreRecord>,
    saved: Vec<Recommendation>,
    next_id: i64,
}

impl MockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user_id: i64) -> Self {
        self.inner.write().unwrap().users.insert(user_id);
        self
    }

    pub fn with_benefits(self, benefit_ids: &[i64]) -> Self {
        self.inner.write().unwrap().benefits.extend(benefit_ids);
        self
    }

    pub fn with_feature(self, feature: UserFeature) -> Self {
        self.inner
            .write()
            .unwrap()
            .features
            .insert(feature.user_id, feature);
        self
    }

    pub fn with_store(self, store: StoreRecord) -> Self {
        self.inner.write().unwrap().stores.push(store);
        self
    }

    /// Seeds an already-persisted recommendation (for cache-hit scenarios).
    pub fn with_saved(self, recommendation: Recommendation) -> Self {
        {
            let mut inner = self.inner.write().unwrap();
            inner.next_id = inner.next_id.max(recommendation.id);
            inner.saved.push(recommendation);
        }
        self
    }

    /// Total persisted rows (across all users and dates).
    pub fn saved_count(&self) -> usize {
        self.inner.read().unwrap().saved.len()
    }

    fn lock_err(context: &'static str) -> RepositoryError {
        RepositoryError::QueryFailed {
            context,
            message: "lock poisoned".to_string(),
        }
    }
}

impl RecommendationRepository for MockRepository {
    async fn latest_recommendation_date(
        &self,
        user_id: i64,
        newer_than: DateTime<Utc>,
    ) -> Result<Option<NaiveDate>, RepositoryError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| Self::lock_err("latest_recommendation_date"))?;

        Ok(inner
            .saved
            .iter()
            .filter(|r| r.user_id == user_id && r.created_at > newer_than)
            .map(|r| r.created_date)
            .max())
    }

    async fn find_batch(
        &self,
        user_id: i64,
        created_date: NaiveDate,
    ) -> Result<Vec<Recommendation>, RepositoryError> {
        let inner = self.inner.read().map_err(|_| Self::lock_err("find_batch"))?;

        let mut batch: Vec<Recommendation> = inner
            .saved
            .iter()
            .filter(|r| r.user_id == user_id && r.created_date == created_date)
            .cloned()
            .collect();
        batch.sort_by_key(|r| r.rank);

        Ok(batch)
    }

    async fn save_batch(
        &self,
        user_id: i64,
        batch: Vec<NewRecommendation>,
        created_date: NaiveDate,
    ) -> Result<Vec<Recommendation>, RepositoryError> {
        {
            let mut inner = self.inner.write().map_err(|_| Self::lock_err("save_batch"))?;

            if !inner.users.contains(&user_id) {
                return Err(RepositoryError::UserNotFound { user_id });
            }

            for rec in &batch {
                for benefit_id in &rec.benefit_ids {
                    if !inner.benefits.contains(benefit_id) {
                        return Err(RepositoryError::UnknownBenefit {
                            benefit_id: *benefit_id,
                        });
                    }
                }
            }

            for rec in batch {
                let conflict = inner.saved.iter().any(|existing| {
                    existing.user_id == user_id
                        && existing.created_date == created_date
                        && existing.rank == rec.rank
                });
                if conflict {
                    continue;
                }

                inner.next_id += 1;
                let id = inner.next_id;
                inner.saved.push(Recommendation {
                    id,
                    user_id,
                    rank: rec.rank,
                    partner_name: rec.partner_name,
                    reason: rec.reason,
                    image_url: rec.image_url,
                    benefit_ids: rec.benefit_ids,
                    created_date,
                    created_at: Utc::now(),
                });
            }
        }

        self.find_batch(user_id, created_date).await
    }

    async fn load_user_feature(&self, user_id: i64) -> Result<UserFeature, RepositoryError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| Self::lock_err("load_user_feature"))?;

        Ok(inner
            .features
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| UserFeature::empty(user_id)))
    }
}

impl StoreDirectory for MockRepository {
    async fn find_nearby(
        &self,
        lat: f64,
        lng: f64,
        category: &str,
    ) -> Result<Vec<StoreRecord>, RepositoryError> {
        let inner = self.inner.read().map_err(|_| Self::lock_err("find_nearby"))?;

        let mut stores: Vec<StoreRecord> = inner
            .stores
            .iter()
            .filter(|s| s.category == category)
            .cloned()
            .collect();

        stores.sort_by(|a, b| {
            let da = (a.lat - lat).powi(2) + (a.lng - lng).powi(2);
            let db = (b.lat - lat).powi(2) + (b.lng - lng).powi(2);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(stores)
    }
}
