use serde::Serialize;

/// App-wide error type. Every fallible function returns `Result<T, AppError>`.
/// Serializes cleanly so the dashboard gets structured error messages.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    /// A CSV upload lacks required header columns. Holds the missing names.
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Invalid password")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    AlreadyExists,

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Trigger error: {0}")]
    Trigger(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable discriminator, shared with the serialized form.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database",
            AppError::Pool(_) => "pool",
            AppError::Io(_) => "io",
            AppError::Serde(_) => "serde",
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation",
            AppError::MissingColumns(_) => "missing_columns",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::AlreadyExists => "already_exists",
            AppError::Auth(_) => "auth",
            AppError::Trigger(_) => "trigger",
            AppError::Config(_) => "config",
            AppError::Internal(_) => "internal",
        }
    }
}

/// We serialize as `{ error: "...", kind: "..." }` for frontend consumption.
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("AppError", 2)?;
        s.serialize_field("error", &self.to_string())?;
        s.serialize_field("kind", self.kind())?;
        s.end()
    }
}
