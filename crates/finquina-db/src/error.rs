//! Error types for the data layer.
//!
//! [`ConnectionError`] covers everything that can go wrong before a pool
//! exists: resolving and validating the connection string, connecting,
//! and migrating. [`DbError`] covers store operations once the handle
//! is built, including calls made against an offline database.

use finquina_types::ParseEnumError;

/// Errors raised while establishing the database connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// None of the connection-string environment variables is set.
    #[error("no database URL configured (checked {checked})")]
    MissingUrl {
        /// Comma-separated list of the variables that were checked.
        checked: String,
    },

    /// The connection string is not a parseable URL.
    #[error("invalid database URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The URL scheme is not `postgres` or `postgresql`.
    #[error("unsupported database URL scheme `{0}`; expected postgres:// or postgresql://")]
    UnsupportedScheme(String),

    /// The URL has no host.
    #[error("database URL has no host")]
    MissingHost,

    /// The password contains a reserved character that must be
    /// percent-encoded.
    #[error("database password contains an unencoded `{0}`; percent-encode it in the URL")]
    UnencodedPassword(char),

    /// A numeric or boolean setting could not be parsed.
    #[error("invalid value for {name}: {value}")]
    InvalidSetting {
        /// Environment variable name.
        name: &'static str,
        /// The raw value.
        value: String,
    },

    /// The pool could not connect.
    #[error("could not connect to PostgreSQL: {0}")]
    Connect(#[from] sqlx::Error),

    /// Embedded migrations failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// The database is running in offline mode.
    #[error("database unavailable: {0}")]
    Unavailable(String),

    /// A stored text value does not map onto its enum.
    #[error("corrupt row: {0}")]
    Decode(#[from] ParseEnumError),
}

impl DbError {
    /// Whether this error comes from running without a database.
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
