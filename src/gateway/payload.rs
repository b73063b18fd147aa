use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::repository::Recommendation;

/// Body of `POST /v1/recommendations/question`.
#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
    pub lat: f64,
    pub lng: f64,
}

/// Body of `POST /v1/questions` (admin corpus indexing).
#[derive(Debug, Deserialize)]
pub struct IndexQuestionRequest {
    pub question: String,
    pub category: String,
}

#[derive(Debug, Serialize)]
pub struct IndexQuestionResponse {
    pub status: &'static str,
}

/// Query string of `GET /v1/users/{user_id}/recommendations`.
#[derive(Debug, Deserialize)]
pub struct RecommendParams {
    pub top_k: Option<usize>,
}

/// Response of the user-driven flow.
#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<RecommendationDto>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationDto {
    pub rank: i32,
    pub partner_name: String,
    pub reason: String,
    pub image_url: String,
    pub benefit_ids: Vec<i64>,
    pub created_date: NaiveDate,
}

impl From<&Recommendation> for RecommendationDto {
    fn from(rec: &Recommendation) -> Self {
        Self {
            rank: rec.rank,
            partner_name: rec.partner_name.clone(),
            reason: rec.reason.clone(),
            image_url: rec.image_url.clone(),
            benefit_ids: rec.benefit_ids.clone(),
            created_date: rec.created_date,
        }
    }
}

impl RecommendationsResponse {
    pub fn from_batch(batch: &[Recommendation]) -> Self {
        Self {
            recommendations: batch.iter().map(RecommendationDto::from).collect(),
        }
    }
}
