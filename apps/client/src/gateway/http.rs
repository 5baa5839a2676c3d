//! HTTP implementation of the gateway contract.
//!
//! Wire shapes match the backend exactly: `POST /parse_resume` takes the file under a
//! multipart field named `files`, `POST /generate_questions_with_resume` takes a JSON
//! body. Both responses are validated with serde here, at the boundary; callers only
//! ever see the typed results.

use async_trait::async_trait;
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{GatewayError, InterviewGateway, ResumeFile, UploadedResume};

#[derive(Debug, Serialize)]
struct GenerateQuestionsRequest<'a> {
    user_id: &'a str,
    job_description: &'a str,
    job_requirements: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResumeResponse {
    #[allow(dead_code)]
    message: String,
    data: Vec<ResumeEntry>,
}

#[derive(Debug, Deserialize)]
struct ResumeEntry {
    file_name: String,
    resume_data: String,
}

#[derive(Debug, Deserialize)]
struct QuestionsResponse {
    #[allow(dead_code)]
    message: String,
    questions: String,
}

/// Reqwest-backed gateway. The client is built once with a timeout; one instance is
/// shared for the life of the process.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Converts a non-2xx response into `GatewayError::Api` with whatever body text
    /// the backend sent.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "gateway call failed: {message}");
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl InterviewGateway for HttpGateway {
    async fn submit_resume(&self, file: &ResumeFile) -> Result<UploadedResume, GatewayError> {
        let part = multipart::Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        let form = multipart::Form::new().part("files", part);

        let response = self
            .client
            .post(format!("{}/parse_resume", self.base_url))
            .multipart(form)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let body: ResumeResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedBody(format!("resume response: {e}")))?;

        let entry = body.data.into_iter().next().ok_or_else(|| {
            GatewayError::MalformedBody("resume response 'data' array is empty".to_string())
        })?;

        debug!(file_name = %entry.file_name, "resume parsed by backend");
        Ok(UploadedResume {
            file_name: entry.file_name,
            resume_data: entry.resume_data,
        })
    }

    async fn generate_questions(
        &self,
        user_id: &str,
        job_description: &str,
        job_requirements: &str,
    ) -> Result<String, GatewayError> {
        let request = GenerateQuestionsRequest {
            user_id,
            job_description,
            job_requirements,
        };

        let response = self
            .client
            .post(format!("{}/generate_questions_with_resume", self.base_url))
            .json(&request)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let body: QuestionsResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedBody(format!("questions response: {e}")))?;

        debug!(len = body.questions.len(), "raw questions text received");
        Ok(body.questions)
    }
}
