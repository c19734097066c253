use thiserror::Error;

// Postgres SQLSTATE codes the booking path cares about.
const UNIQUE_VIOLATION: &str = "23505";
const EXCLUSION_VIOLATION: &str = "23P01";
const SERIALIZATION_FAILURE: &str = "40001";

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("record not found")]
    NotFound,

    /// Unique or exclusion constraint violation. For appointments this is the
    /// storage layer rejecting an overlapping booked interval.
    #[error("conflicting record")]
    Conflict,

    /// Serialization failure under contention; safe to retry with backoff.
    #[error("transaction serialization failure")]
    Serialization,

    #[error("database connection error: {0}")]
    Connection(String),
}

impl DatabaseError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, DatabaseError::Conflict)
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DatabaseError::Serialization | DatabaseError::Connection(_)
        )
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                DatabaseError::Connection(err.to_string())
            }
            sqlx::Error::Database(db) => match db.code().as_deref() {
                Some(UNIQUE_VIOLATION) | Some(EXCLUSION_VIOLATION) => DatabaseError::Conflict,
                Some(SERIALIZATION_FAILURE) => DatabaseError::Serialization,
                _ => DatabaseError::Sqlx(err),
            },
            _ => DatabaseError::Sqlx(err),
        }
    }
}
