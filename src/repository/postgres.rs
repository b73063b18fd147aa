use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::error::RepositoryError;
use super::model::{NewRecommendation, Recommendation, StoreRecord};
use super::{RecommendationRepository, StoreDirectory};
use crate::recommend::feature::UserFeature;

/// Result cap for proximity lookups; downstream selection only ever
/// consumes the first few distinct partners.
const NEARBY_STORE_LIMIT: i64 = 50;

#[derive(Clone)]
/// Postgres-backed repository.
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `url`.
    pub async fn connect(url: &str) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed {
                message: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    /// Applies embedded migrations.
    pub async fn run_migrations(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::MigrationFailed {
                message: e.to_string(),
            })
    }

    /// Returns the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn user_exists(&self, user_id: i64) -> Result<bool, RepositoryError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::query("user_exists", e))
    }

    async fn check_benefit_ids(&self, benefit_ids: &[i64]) -> Result<(), RepositoryError> {
        if benefit_ids.is_empty() {
            return Ok(());
        }

        let known: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM benefits WHERE id = ANY($1)")
                .bind(benefit_ids)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| RepositoryError::query("check_benefit_ids", e))?;

        for id in benefit_ids {
            if !known.contains(id) {
                return Err(RepositoryError::UnknownBenefit { benefit_id: *id });
            }
        }

        Ok(())
    }
}

impl RecommendationRepository for PgRepository {
    async fn latest_recommendation_date(
        &self,
        user_id: i64,
        newer_than: DateTime<Utc>,
    ) -> Result<Option<NaiveDate>, RepositoryError> {
        sqlx::query_scalar::<_, Option<NaiveDate>>(
            "SELECT MAX(created_date) FROM recommendations \
             WHERE user_id = $1 AND created_at > $2",
        )
        .bind(user_id)
        .bind(newer_than)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::query("latest_recommendation_date", e))
    }

    async fn find_batch(
        &self,
        user_id: i64,
        created_date: NaiveDate,
    ) -> Result<Vec<Recommendation>, RepositoryError> {
        sqlx::query_as::<_, Recommendation>(
            "SELECT id, user_id, rank, partner_name, reason, image_url, benefit_ids, \
                    created_date, created_at \
             FROM recommendations \
             WHERE user_id = $1 AND created_date = $2 \
             ORDER BY rank ASC",
        )
        .bind(user_id)
        .bind(created_date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::query("find_batch", e))
    }

    async fn save_batch(
        &self,
        user_id: i64,
        batch: Vec<NewRecommendation>,
        created_date: NaiveDate,
    ) -> Result<Vec<Recommendation>, RepositoryError> {
        if !self.user_exists(user_id).await? {
            return Err(RepositoryError::UserNotFound { user_id });
        }

        for rec in &batch {
            self.check_benefit_ids(&rec.benefit_ids).await?;
        }

        // UNIQUE (user_id, created_date, rank) closes the duplicate-batch
        // race: losing writers insert nothing and read back the winner.
        for rec in &batch {
            sqlx::query(
                "INSERT INTO recommendations \
                     (user_id, rank, partner_name, reason, image_url, benefit_ids, created_date) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) \
                 ON CONFLICT (user_id, created_date, rank) DO NOTHING",
            )
            .bind(user_id)
            .bind(rec.rank)
            .bind(&rec.partner_name)
            .bind(&rec.reason)
            .bind(&rec.image_url)
            .bind(&rec.benefit_ids)
            .bind(created_date)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::query("save_batch", e))?;
        }

        self.find_batch(user_id, created_date).await
    }

    async fn load_user_feature(&self, user_id: i64) -> Result<UserFeature, RepositoryError> {
        let membership_grade: Option<String> =
            sqlx::query_scalar("SELECT membership_grade FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::query("load_user_feature", e))?;

        let Some(membership_grade) = membership_grade else {
            return Ok(UserFeature::empty(user_id));
        };

        let preferred_categories: Vec<String> = sqlx::query_scalar(
            "SELECT category FROM user_preferred_categories \
             WHERE user_id = $1 ORDER BY priority ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::query("load_preferred_categories", e))?;

        let recent_partners: Vec<String> = sqlx::query_scalar(
            "SELECT p.name FROM benefit_usages u \
             JOIN benefits b ON b.id = u.benefit_id \
             JOIN partners p ON p.id = b.partner_id \
             WHERE u.user_id = $1 \
             GROUP BY p.name \
             ORDER BY MAX(u.used_at) DESC \
             LIMIT 5",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::query("load_recent_partners", e))?;

        Ok(UserFeature {
            user_id,
            membership_grade,
            preferred_categories,
            recent_partners,
        })
    }
}

impl StoreDirectory for PgRepository {
    async fn find_nearby(
        &self,
        lat: f64,
        lng: f64,
        category: &str,
    ) -> Result<Vec<StoreRecord>, RepositoryError> {
        // Planar distance ordering; good enough at city scale.
        sqlx::query_as::<_, StoreRecord>(
            "SELECT s.id AS store_id, s.name AS store_name, p.name AS partner_name, \
                    p.image_url AS partner_image_url, p.category, s.lat, s.lng \
             FROM stores s \
             JOIN partners p ON p.id = s.partner_id \
             WHERE p.category = $3 \
             ORDER BY (s.lat - $1) * (s.lat - $1) + (s.lng - $2) * (s.lng - $2) ASC \
             LIMIT $4",
        )
        .bind(lat)
        .bind(lng)
        .bind(category)
        .bind(NEARBY_STORE_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::query("find_nearby", e))
    }
}
