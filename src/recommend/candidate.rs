use crate::constants::UNKNOWN;
use crate::vectordb::SearchHit;

pub const META_BENEFIT_ID: &str = "benefitId";
pub const META_PARTNER_ID: &str = "partnerId";
pub const META_BENEFIT_NAME: &str = "benefitName";
pub const META_PARTNER_NAME: &str = "partnerName";
pub const META_CATEGORY: &str = "category";
pub const META_DESCRIPTION: &str = "description";
pub const META_CONTEXT: &str = "context";

/// A retrieved benefit, alive only between search and ranking.
///
/// Construct through [`Candidate::from_hit`]; that is the single place
/// vector-store metadata is validated and defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub benefit_id: i64,
    pub partner_id: i64,
    pub benefit_name: String,
    pub partner_name: String,
    pub category: String,
    pub description: String,
    pub context: String,
    /// Similarity score from the vector store; retained for a future
    /// reranker, unused by the current order-trusting selection.
    pub score: f32,
}

impl Candidate {
    /// Maps a search hit to a candidate.
    ///
    /// Returns `None` when `benefitId` or `partnerId` is missing or
    /// non-numeric; such hits are dropped silently. Missing optional
    /// metadata gets typed defaults: the hit's raw text for the benefit
    /// name, [`UNKNOWN`] for partner name and category, empty strings for
    /// description and context. A key that is present but blank stays
    /// blank.
    pub fn from_hit(hit: &SearchHit) -> Option<Self> {
        let benefit_id = hit.meta_i64(META_BENEFIT_ID)?;
        let partner_id = hit.meta_i64(META_PARTNER_ID)?;

        Some(Self {
            benefit_id,
            partner_id,
            benefit_name: hit
                .meta_str(META_BENEFIT_NAME)
                .unwrap_or(&hit.text)
                .to_string(),
            partner_name: hit.meta_str(META_PARTNER_NAME).unwrap_or(UNKNOWN).to_string(),
            category: hit.meta_str(META_CATEGORY).unwrap_or(UNKNOWN).to_string(),
            description: hit.meta_str(META_DESCRIPTION).unwrap_or_default().to_string(),
            context: hit.meta_str(META_CONTEXT).unwrap_or_default().to_string(),
            score: hit.score,
        })
    }

    /// Name shown in reason text: the benefit name, else the partner name.
    pub fn display_name(&self) -> &str {
        if self.benefit_name.trim().is_empty() {
            &self.partner_name
        } else {
            &self.benefit_name
        }
    }
}
