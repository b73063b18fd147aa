use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by repository operations.
pub enum RepositoryError {
    /// Could not open the connection pool.
    #[error("database connection failed: {message}")]
    ConnectionFailed {
        /// Error message.
        message: String,
    },

    /// Schema migration failed.
    #[error("database migration failed: {message}")]
    MigrationFailed {
        /// Error message.
        message: String,
    },

    /// A query failed.
    #[error("query '{context}' failed: {message}")]
    QueryFailed {
        /// What the query was doing.
        context: &'static str,
        /// Error message.
        message: String,
    },

    /// The user id does not resolve to a row.
    #[error("user not found: {user_id}")]
    UserNotFound {
        /// Offending user id.
        user_id: i64,
    },

    /// A benefit id referenced by a recommendation does not exist.
    #[error("unknown benefit id: {benefit_id}")]
    UnknownBenefit {
        /// Offending benefit id.
        benefit_id: i64,
    },
}

impl RepositoryError {
    pub(crate) fn query(context: &'static str, error: sqlx::Error) -> Self {
        Self::QueryFailed {
            context,
            message: error.to_string(),
        }
    }
}
