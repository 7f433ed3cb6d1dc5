//! Error types shared by every API call and form.

/// Message shown when the refresh path fails after a 401.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";

/// Failure of a request made through [`crate::http::HttpClient`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request could not be sent or the response never arrived.
    #[error("Network Error: {0}")]
    Network(String),
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    /// A 401 could not be recovered by refreshing the access token.
    #[error("{}", SESSION_EXPIRED_MESSAGE)]
    SessionExpired,
    /// A 2xx body did not match the expected shape.
    #[error("Decode Error: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text suitable for a toast.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Network error. Please check your connection.".to_string(),
            Self::Http { message, .. } => message.clone(),
            Self::SessionExpired => SESSION_EXPIRED_MESSAGE.to_string(),
            Self::Decode(_) => "Unexpected response from server.".to_string(),
        }
    }

    /// HTTP status attached to the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::SessionExpired => Some(401),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }

    #[must_use]
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

/// Client-side field check that blocks a form submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a valid email.")]
    InvalidEmail,
    #[error("Password is required.")]
    MissingPassword,
    #[error("Password must be at least {0} characters.")]
    PasswordTooShort(usize),
    #[error("Name is required.")]
    MissingName,
    #[error("Title is required.")]
    MissingTitle,
    #[error("Due date must be a valid date (YYYY-MM-DD).")]
    InvalidDueDate,
}
