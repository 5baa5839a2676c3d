//! Gateway: the single point of entry for all backend calls in the client.
//!
//! ARCHITECTURAL RULE: no other module may talk to the backend directly. The session
//! controller holds a `dyn InterviewGateway` and knows nothing about transport; tests
//! substitute a mock, production wires in [`HttpGateway`].

use async_trait::async_trait;
use thiserror::Error;

pub mod http;

pub use http::HttpGateway;

/// A resume file ready for upload: display name plus raw bytes.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// The backend's record of a successfully parsed resume.
#[derive(Debug, Clone)]
pub struct UploadedResume {
    pub file_name: String,
    /// Text the backend extracted from the resume; shown to the candidate for
    /// confirmation, not consumed by the core.
    pub resume_data: String,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The call returned 2xx but the body was missing an expected field.
    #[error("Malformed response body: {0}")]
    MalformedBody(String),
}

/// The two backend operations the session controller depends on.
///
/// `generate_questions` returns the generator's raw text untouched; the question-block
/// parser is the single place that text is validated.
#[async_trait]
pub trait InterviewGateway: Send + Sync {
    /// Uploads a resume for parsing and returns the backend's record of it.
    async fn submit_resume(&self, file: &ResumeFile) -> Result<UploadedResume, GatewayError>;

    /// Requests interview questions for the given user and job, returning the raw
    /// questions text from the generator.
    async fn generate_questions(
        &self,
        user_id: &str,
        job_description: &str,
        job_requirements: &str,
    ) -> Result<String, GatewayError>;
}
