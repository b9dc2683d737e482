use crate::models::ListKind;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Transport failure: network unreachable, connection reset, timeout.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Non-2xx response whose body could not be parsed into anything useful.
    #[error("server returned status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Server answered with `success: false` or an error payload.
    #[error("API error: {0}")]
    Api(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A list add was refused; `message` carries the server message if any.
    #[error("could not add to {list}: {message}")]
    AddFailed { list: ListKind, message: String },

    /// A list remove failed after the optimistic local update was rolled back.
    #[error("could not remove from {list}: {message}")]
    RemoveFailed { list: ListKind, message: String },
}

impl AppError {
    /// Message suitable for surfacing to the user: the server-provided text
    /// for API rejections, the transport error text otherwise.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api(msg) => msg.clone(),
            AppError::AddFailed { message, .. } | AppError::RemoveFailed { message, .. } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
