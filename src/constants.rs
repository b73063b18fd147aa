//! Cross-cutting, shared constants.
//!
//! Placeholder strings and selection limits live here rather than inline in
//! the pipeline so every module agrees on them.

/// Placeholder for partner/category metadata absent from a vector hit.
pub const UNKNOWN: &str = "UNKNOWN";

/// Default number of recommendations requested per refresh.
pub const DEFAULT_TOP_K: usize = 5;

/// Candidate pool sizing for the user-driven flow: `max(top_k * POOL_FACTOR, POOL_MIN)`.
pub const POOL_FACTOR: usize = 5;
pub const POOL_MIN: usize = 50;

/// Distinct partner names surfaced by the question flow.
pub const MAX_PARTNER_SUMMARIES: usize = 5;

/// Display names joined into a recommendation reason.
pub const MAX_REASON_NAMES: usize = 5;

/// Hours a persisted recommendation batch stays fresh.
pub const DEFAULT_FRESHNESS_HOURS: i64 = 24;

/// Embedding width of the default model (`text-embedding-3-small`).
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

pub const PERKFLOW_CACHE_HEADER: &str = "X-Perkflow-Cache";
pub const PERKFLOW_STATUS_HEALTHY: &str = "healthy";
pub const PERKFLOW_STATUS_READY: &str = "ready";
pub const PERKFLOW_STATUS_ERROR: &str = "error";

/// Whether a recommendation batch came from the freshness cache or was
/// recomputed. Surfaced to clients via [`PERKFLOW_CACHE_HEADER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    #[inline]
    pub fn as_header_value(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheStatus::Hit)
    }
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_header_value())
    }
}
