use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A persisted recommendation row. Append-only; superseded by newer batches,
/// never mutated.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct Recommendation {
    pub id: i64,
    pub user_id: i64,
    pub rank: i32,
    pub partner_name: String,
    pub reason: String,
    pub image_url: String,
    pub benefit_ids: Vec<i64>,
    pub created_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A recommendation produced by the pipeline, before persistence assigns
/// identity and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecommendation {
    pub rank: i32,
    pub partner_name: String,
    pub reason: String,
    pub image_url: String,
    pub benefit_ids: Vec<i64>,
}

/// A partner store returned by proximity lookup.
#[derive(Debug, Clone, FromRow)]
pub struct StoreRecord {
    pub store_id: i64,
    pub store_name: String,
    pub partner_name: String,
    pub partner_image_url: Option<String>,
    pub category: String,
    pub lat: f64,
    pub lng: f64,
}
