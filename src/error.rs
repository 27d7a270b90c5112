use thiserror::Error;

/// Short code the server sends when a signup hits an existing email.
pub const CODE_USER_ALREADY_EXISTS: &str = "error_user_already_exists";

/// Failures surfaced by the account operations.
///
/// `Transport` and `Server` come out of the request layer; `NoActiveSession`
/// and `Validation` are raised locally, before any request is issued.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No response, a connection failure, or a body that could not be
    /// decoded. Retrying the whole operation is always safe.
    #[error("transport error: {0}")]
    Transport(String),

    /// Well-formed rejection from the server, carrying its short error code.
    #[error("server rejected request: {0}")]
    Server(String),

    /// A profile operation was issued while no credential is held.
    #[error("no active session")]
    NoActiveSession,

    /// Input rejected before any request was made.
    #[error("invalid input: {0}")]
    Validation(String),
}

impl AuthError {
    /// Text suitable for display. Known server codes get a specific message,
    /// unknown ones a generic fallback; operations still carry the raw code.
    pub fn user_message(&self) -> &str {
        match self {
            AuthError::Server(code) if code == CODE_USER_ALREADY_EXISTS => {
                "User with email already exists"
            }
            AuthError::Server(_) => "Something went wrong",
            AuthError::Transport(_) => "Could not reach the server",
            AuthError::NoActiveSession => "Not logged in",
            AuthError::Validation(reason) => reason,
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Transport(err.to_string())
    }
}

/// Result type alias for the account operations.
pub type AuthResult<T> = Result<T, AuthError>;
