use std::fmt;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// SQLSTATE raised by unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

/// Error types for store operations
#[derive(Debug)]
pub enum Error {
    /// Validation error - invalid input data
    ValidationError(String),

    /// Not found error - the referenced row doesn't exist
    NotFoundError(String),

    /// Conflict error - a unique key is already taken
    ConflictError(String),

    /// Connection error - database unreachable or authentication failure
    ConnectionError(String),

    /// Database error - SQL errors, constraint violations
    DatabaseError(String),

    /// Pool error - connection pool issues
    PoolError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Error::NotFoundError(msg) => write!(f, "Not found: {}", msg),
            Error::ConflictError(msg) => write!(f, "Conflict: {}", msg),
            Error::ConnectionError(msg) => write!(f, "Connection error: {}", msg),
            Error::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            Error::PoolError(msg) => write!(f, "Pool error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Convert tokio-postgres errors to store errors
impl From<tokio_postgres::Error> for Error {
    fn from(err: tokio_postgres::Error) -> Self {
        if let Some(db_error) = err.as_db_error() {
            let message = db_error.message();

            if db_error.code().code() == UNIQUE_VIOLATION {
                let constraint = db_error.constraint().unwrap_or("unique key");
                return Error::ConflictError(format!("{} ({})", message, constraint));
            }

            return Error::DatabaseError(format!("{}: {}", db_error.code().code(), message));
        }

        Error::DatabaseError(format!("{:?}", err))
    }
}

/// Convert deadpool errors to store errors
impl From<deadpool_postgres::PoolError> for Error {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Error::PoolError(err.to_string())
    }
}

/// Convert deadpool build errors to store errors
impl From<deadpool_postgres::BuildError> for Error {
    fn from(err: deadpool_postgres::BuildError) -> Self {
        Error::ConnectionError(err.to_string())
    }
}

/// Convert JSON errors to store errors
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ValidationError(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind() {
        assert_eq!(
            Error::NotFoundError("word 42".to_string()).to_string(),
            "Not found: word 42"
        );
        assert_eq!(
            Error::ConflictError("username".to_string()).to_string(),
            "Conflict: username"
        );
    }
}
