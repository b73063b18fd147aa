//! Relational persistence: users, benefits, partner stores, and the
//! recommendation table that doubles as the freshness cache.

pub mod error;
pub mod model;
pub mod postgres;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use error::RepositoryError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockRepository;
pub use model::{NewRecommendation, Recommendation, StoreRecord};
pub use postgres::PgRepository;

use chrono::{DateTime, NaiveDate, Utc};

use crate::recommend::feature::UserFeature;

/// Recommendation batch reads/writes plus user-profile loading.
pub trait RecommendationRepository: Send + Sync {
    /// Most recent batch date for `user_id` with `created_at` strictly newer
    /// than `newer_than`, if any.
    fn latest_recommendation_date(
        &self,
        user_id: i64,
        newer_than: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<Option<NaiveDate>, RepositoryError>> + Send;

    /// All recommendations saved for `user_id` on `created_date`, rank order.
    fn find_batch(
        &self,
        user_id: i64,
        created_date: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Vec<Recommendation>, RepositoryError>> + Send;

    /// Persists a batch dated `created_date` and returns the stored rows.
    ///
    /// The user must exist and every benefit id must resolve. Rows that
    /// collide with an existing `(user_id, created_date, rank)` are left in
    /// place; the returned batch is whatever the table holds for that date
    /// afterwards, so concurrent writers converge on one result.
    fn save_batch(
        &self,
        user_id: i64,
        batch: Vec<NewRecommendation>,
        created_date: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Vec<Recommendation>, RepositoryError>> + Send;

    /// Loads the user's preference profile; absent data yields an empty
    /// profile (identity is enforced at save time, not here).
    fn load_user_feature(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<UserFeature, RepositoryError>> + Send;
}

/// Partner store lookup around a coordinate.
pub trait StoreDirectory: Send + Sync {
    /// Stores in `category` ordered by distance from `(lat, lng)`.
    fn find_nearby(
        &self,
        lat: f64,
        lng: f64,
        category: &str,
    ) -> impl std::future::Future<Output = Result<Vec<StoreRecord>, RepositoryError>> + Send;
}

impl<T: RecommendationRepository> RecommendationRepository for std::sync::Arc<T> {
    async fn latest_recommendation_date(
        &self,
        user_id: i64,
        newer_than: DateTime<Utc>,
    ) -> Result<Option<NaiveDate>, RepositoryError> {
        (**self).latest_recommendation_date(user_id, newer_than).await
    }

    async fn find_batch(
        &self,
        user_id: i64,
        created_date: NaiveDate,
    ) -> Result<Vec<Recommendation>, RepositoryError> {
        (**self).find_batch(user_id, created_date).await
    }

    async fn save_batch(
        &self,
        user_id: i64,
        batch: Vec<NewRecommendation>,
        created_date: NaiveDate,
    ) -> Result<Vec<Recommendation>, RepositoryError> {
        (**self).save_batch(user_id, batch, created_date).await
    }

    async fn load_user_feature(&self, user_id: i64) -> Result<UserFeature, RepositoryError> {
        (**self).load_user_feature(user_id).await
    }
}

impl<T: StoreDirectory> StoreDirectory for std::sync::Arc<T> {
    async fn find_nearby(
        &self,
        lat: f64,
        lng: f64,
        category: &str,
    ) -> Result<Vec<StoreRecord>, RepositoryError> {
        (**self).find_nearby(lat, lng, category).await
    }
}
