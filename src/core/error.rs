use thiserror::Error;

/// Centralized error types for the application
///
/// Storage, provider and validation failures are all converted to this enum.
/// Read paths collapse it to defaults at the view boundary; write paths and
/// test sends surface it to the caller.
///
/// # Example
///
/// ```no_run
/// use shopdesk::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Database connection pool errors
    #[error("Database pool error: {0}")]
    DatabasePool(#[from] r2d2::Error),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP status code errors without a readable body
    #[error("HTTP request failed with status: {0}")]
    HttpStatus(reqwest::StatusCode),

    /// Error reported by a third-party provider (message from its response)
    #[error("{0}")]
    Provider(String),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Blocking task failed to complete
    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or invalid session
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Anyhow errors (for general error handling)
    #[error("Application error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    /// Message suitable for showing to the user.
    ///
    /// Provider and validation errors carry their own text; everything else
    /// keeps the prefixed form.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Provider(msg) | AppError::Validation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
