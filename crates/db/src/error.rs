//! Store error taxonomy.
//!
//! The only failures this layer produces are constraint violations local to a
//! single write, plus not-found and API-level location rejections. Recovery
//! policy (retry, merge, abort the surrounding game action) belongs to the
//! caller; the store never retries.

/// Convenience alias for repository return values.
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A reference points at a nonexistent row (PostgreSQL 23503).
    #[error("foreign key violation on {constraint}")]
    ForeignKeyViolation { constraint: String },

    /// A duplicate collided with a unique constraint (PostgreSQL 23505).
    #[error("unique violation on {constraint}")]
    UniqueViolation { constraint: String },

    /// A CHECK constraint rejected the write (PostgreSQL 23514).
    #[error("check violation on {constraint}")]
    CheckViolation { constraint: String },

    /// Rejected before touching SQL: bad slot coordinates, a non-container
    /// target, an occupied hand, and the like.
    #[error("invalid location: {0}")]
    InvalidLocation(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn invalid_location(msg: impl Into<String>) -> Self {
        StoreError::InvalidLocation(msg.into())
    }
}

impl From<sqlx::Error> for StoreError {
    /// Classify constraint violations by PostgreSQL error code; everything
    /// else passes through as an opaque database error.
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some("23503") => return StoreError::ForeignKeyViolation { constraint },
                Some("23505") => return StoreError::UniqueViolation { constraint },
                Some("23514") => return StoreError::CheckViolation { constraint },
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}
