use thiserror::Error;

use crate::gateway::GatewayError;

/// Session-level error taxonomy.
///
/// Nothing here is fatal: every variant leaves the session parked in a well-defined
/// phase, and `retryable()` tells the caller whether repeating the same operation from
/// that phase can succeed. The `Display` text is the single human-readable message the
/// UI layer shows.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A required input was missing before any network call was attempted.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The gateway rejected or failed the resume upload.
    #[error("Resume upload failed: {0}")]
    Upload(#[source] GatewayError),

    /// The gateway rejected or failed question generation.
    #[error("Question generation failed: {0}")]
    Generation(#[source] GatewayError),

    /// The gateway call succeeded but the response text parsed to zero questions.
    /// Treated as a failure, never as a successful empty interview.
    #[error("No questions were generated")]
    NoQuestionsGenerated,

    /// Another gateway request for this session is still pending.
    #[error("A request is already in flight for this session")]
    RequestInFlight,
}

impl SessionError {
    /// Whether the caller may retry the same operation from the current phase.
    pub fn retryable(&self) -> bool {
        match self {
            SessionError::Upload(_)
            | SessionError::Generation(_)
            | SessionError::NoQuestionsGenerated => true,
            SessionError::Validation(_) | SessionError::RequestInFlight => false,
        }
    }
}
