use serde::Serialize;

/// Immutable per-request snapshot of a user's preference profile.
///
/// Built by the repository from membership data and benefit-usage history;
/// consumed only through [`UserFeature::to_query_text`].
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserFeature {
    pub user_id: i64,
    pub membership_grade: String,
    /// Categories the user opted into, highest priority first.
    pub preferred_categories: Vec<String>,
    /// Partner names from recent benefit usage, most recent first.
    pub recent_partners: Vec<String>,
}

impl UserFeature {
    /// Profile for a user with no stored preference data.
    pub fn empty(user_id: i64) -> Self {
        Self {
            user_id,
            membership_grade: String::new(),
            preferred_categories: Vec::new(),
            recent_partners: Vec::new(),
        }
    }

    /// Serializes the profile into the text embedded for candidate search.
    pub fn to_query_text(&self) -> String {
        let mut parts = Vec::new();

        if !self.membership_grade.is_empty() {
            parts.push(format!("membership grade {}", self.membership_grade));
        }
        if !self.preferred_categories.is_empty() {
            parts.push(format!(
                "prefers {}",
                self.preferred_categories.join(", ")
            ));
        }
        if !self.recent_partners.is_empty() {
            parts.push(format!("recently used {}", self.recent_partners.join(", ")));
        }

        parts.join("; ")
    }
}
