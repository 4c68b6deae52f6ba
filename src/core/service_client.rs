// src/core/service_client.rs
//! HTTP client for the content generation service

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{error, info, trace};

use crate::errors::{AppError, GenerationError};
use crate::types::{
    ContentType, GenerationErrorBody, GenerationRequest, GenerationResponse, HealthResponse,
    JobPosting, Profile,
};

const GENERATE_ENDPOINT: &str = "/generate";
const HEALTH_ENDPOINT: &str = "/health";

/// Content generation collaborator. Request and response are opaque to the
/// core; failures come back unchanged as `GenerationError`.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError>;

    async fn health(&self) -> Result<HealthResponse, GenerationError>;
}

pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl ServiceClient {
    pub fn new(base_url: &str, timeout_seconds: u64) -> anyhow::Result<Self> {
        use anyhow::Context;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<T, R>(&self, endpoint: &str, payload: &T) -> Result<R, GenerationError>
    where
        T: serde::Serialize + Sync,
        R: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        trace!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| GenerationError::Unreachable(format!("{}: {}", url, e)))?;

        Self::read_json(response).await
    }

    async fn get<R>(&self, endpoint: &str) -> Result<R, GenerationError>
    where
        R: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        trace!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GenerationError::Unreachable(format!("{}: {}", url, e)))?;

        Self::read_json(response).await
    }

    async fn read_json<R>(response: reqwest::Response) -> Result<R, GenerationError>
    where
        R: serde::de::DeserializeOwned,
    {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::InvalidResponse(format!("Failed to read body: {}", e)))?;

        if !status.is_success() {
            error!("Generation service error response ({}): {}", status, body);
            return Err(error_from_body(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| GenerationError::InvalidResponse(e.to_string()))
    }
}

/// Service failure message: the `{error, detail}` body when present,
/// otherwise the status and raw text.
pub fn error_from_body(status: StatusCode, body: &str) -> GenerationError {
    match serde_json::from_str::<GenerationErrorBody>(body) {
        Ok(parsed) => GenerationError::Failed(parsed.message()),
        Err(_) if body.trim().is_empty() => {
            GenerationError::Failed(format!("Content generation failed with HTTP {}", status))
        }
        Err(_) => GenerationError::Failed(format!(
            "Content generation failed with HTTP {}: {}",
            status,
            body.trim()
        )),
    }
}

#[async_trait]
impl ContentGenerator for ServiceClient {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        self.post_json(GENERATE_ENDPOINT, request).await
    }

    async fn health(&self) -> Result<HealthResponse, GenerationError> {
        self.get(HEALTH_ENDPOINT).await
    }
}

/// Build the request for `content_type`, refusing inputs the service cannot use.
pub fn build_request(
    profile: &Profile,
    job: &JobPosting,
    content_type: ContentType,
) -> Result<GenerationRequest, AppError> {
    if job.description.trim().is_empty() {
        return Err(AppError::Validation(
            "A job description is required to generate content".to_string(),
        ));
    }

    let questions = job
        .questions
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string);

    if content_type == ContentType::Questions && questions.is_none() {
        return Err(AppError::Validation(
            "Application questions are required for questions content".to_string(),
        ));
    }

    Ok(GenerationRequest {
        profile: profile.clone(),
        job_description: job.description.trim().to_string(),
        content_type,
        questions,
    })
}

/// Validate, call the generator once, and pass its result through.
pub async fn generate_content(
    generator: &dyn ContentGenerator,
    profile: &Profile,
    job: &JobPosting,
    content_type: ContentType,
) -> Result<GenerationResponse, AppError> {
    let request = build_request(profile, job, content_type)?;
    info!(
        "Requesting {} for {} ({} chars of job description)",
        content_type,
        profile.full_name,
        request.job_description.chars().count()
    );

    let response = generator.generate(&request).await?;
    info!(
        "Generated {} chars in {:.2}s",
        response.generated_content.chars().count(),
        response.processing_time
    );
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// Records requests and replays a fixed outcome.
    struct MockGenerator {
        outcome: Result<String, String>,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl MockGenerator {
        fn ok(content: &str) -> Self {
            Self {
                outcome: Ok(content.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                outcome: Err(message.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ContentGenerator for MockGenerator {
        async fn generate(
            &self,
            request: &GenerationRequest,
        ) -> Result<GenerationResponse, GenerationError> {
            self.requests.lock().unwrap().push(request.clone());
            match &self.outcome {
                Ok(content) => Ok(GenerationResponse {
                    generated_content: content.clone(),
                    processing_time: 0.5,
                    token_usage: None,
                    metadata: BTreeMap::new(),
                }),
                Err(message) => Err(GenerationError::Failed(message.clone())),
            }
        }

        async fn health(&self) -> Result<HealthResponse, GenerationError> {
            Ok(HealthResponse {
                status: "healthy".to_string(),
                version: "1.0.0".to_string(),
                timestamp: "2026-01-01T00:00:00".to_string(),
            })
        }
    }

    fn profile() -> Profile {
        Profile {
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn cover_letter_request_is_passed_through() {
        let generator = MockGenerator::ok("Dear hiring manager");
        let job = JobPosting::new("  Build distributed systems in Rust.  ");

        let response = generate_content(&generator, &profile(), &job, ContentType::CoverLetter)
            .await
            .unwrap();
        assert_eq!(response.generated_content, "Dear hiring manager");

        let requests = generator.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].job_description, "Build distributed systems in Rust.");
        assert_eq!(requests[0].questions, None);
        assert_eq!(requests[0].profile.full_name, "Jane Doe");
    }

    #[tokio::test]
    async fn questions_require_question_text() {
        let generator = MockGenerator::ok("unused");
        let job = JobPosting::new("Build things");
        let err = generate_content(&generator, &profile(), &job, ContentType::Questions)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert!(generator.requests.lock().unwrap().is_empty());

        let job = JobPosting::new("Build things").with_questions(&["Why us?".to_string()]);
        let response = generate_content(&generator, &profile(), &job, ContentType::Questions).await;
        assert!(response.is_ok());
        assert_eq!(
            generator.requests.lock().unwrap()[0].questions.as_deref(),
            Some("Why us?")
        );
    }

    #[tokio::test]
    async fn empty_job_description_is_rejected() {
        let generator = MockGenerator::ok("unused");
        let err = generate_content(&generator, &profile(), &JobPosting::new("  "), ContentType::CoverLetter)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn generator_failure_passes_through_unchanged() {
        let generator = MockGenerator::failing("Content generation failed: quota exceeded");
        let err = generate_content(&generator, &profile(), &JobPosting::new("Build things"), ContentType::CoverLetter)
            .await
            .unwrap_err();
        match err {
            AppError::Generation(GenerationError::Failed(message)) => {
                assert_eq!(message, "Content generation failed: quota exceeded")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn error_body_is_parsed_when_structured() {
        let body = r#"{"error": "Content generation failed", "detail": "model overloaded", "success": false}"#;
        let err: AppError = error_from_body(StatusCode::INTERNAL_SERVER_ERROR, body).into();
        assert_eq!(
            err.status_message(),
            "[GENERATION_ERROR] Content generation failed: model overloaded"
        );
    }

    #[test]
    fn unstructured_error_body_keeps_status() {
        match error_from_body(StatusCode::BAD_GATEWAY, "upstream down\n") {
            GenerationError::Failed(message) => assert_eq!(
                message,
                "Content generation failed with HTTP 502 Bad Gateway: upstream down"
            ),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let client = ServiceClient::new("http://127.0.0.1:8000/", 5).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
    }
}
