use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{AnalysisRequest, InferenceResponse, KeywordService};
use crate::config::ServiceConfig;
use crate::error::{ClientError, DEFAULT_SERVICE_FAILURE};

/// Error envelope the service sends for rejected uploads
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Multipart client for the keyword ranking endpoint
pub struct HttpInferenceClient {
    endpoint: String,
    health_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpInferenceClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ClientError> {
        let endpoint = config
            .endpoint_url()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;
        let health_url = config
            .health_url()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.into(),
            health_url: health_url.into(),
            timeout_secs: config.timeout_seconds,
            client,
        })
    }

    async fn build_form(&self, request: &AnalysisRequest) -> Result<Form, ClientError> {
        let video_data = request.video.read_bytes().await?;

        let part = Part::bytes(video_data)
            .file_name(request.video.file_name.clone())
            .mime_str(&request.video.mime_type)
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Form::new()
            .part("file", part)
            .text("seed_keywords", request.seeds.as_form_value().to_string()))
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error) -> ClientError {
        if error.is_timeout() {
            ClientError::Timeout {
                url: self.endpoint.clone(),
                timeout_secs: self.timeout_secs,
            }
        } else if error.is_decode() {
            ClientError::MalformedResponse(error.to_string())
        } else {
            ClientError::Network {
                url: self.endpoint.clone(),
                message: error.to_string(),
            }
        }
    }
}

/// Turn a response status and body into the parsed result or the service's error.
///
/// An `error` field wins even on a 2xx status, since the service reports
/// rejected uploads that way.
pub(crate) fn interpret_response(status: u16, body: &str) -> Result<InferenceResponse, ClientError> {
    if let Ok(ErrorBody { error: Some(message) }) = serde_json::from_str::<ErrorBody>(body) {
        return Err(ClientError::Service { status, message });
    }

    if !(200..300).contains(&status) {
        return Err(ClientError::Service {
            status,
            message: DEFAULT_SERVICE_FAILURE.to_string(),
        });
    }

    // Parsed straight from the text so association order survives
    serde_json::from_str(body).map_err(|e| ClientError::MalformedResponse(e.to_string()))
}

#[async_trait]
impl KeywordService for HttpInferenceClient {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<InferenceResponse, ClientError> {
        info!(
            "📤 Uploading {} ({:.1} MB) with seeds [{}]",
            request.video.file_name,
            request.video.size as f64 / 1_000_000.0,
            request.seeds.parsed().join(", ")
        );

        let form = self.build_form(request).await?;

        debug!("Sending multipart request to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.convert_reqwest_error(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.convert_reqwest_error(&e))?;

        debug!("Inference service answered {} ({} bytes)", status, body.len());

        match interpret_response(status.as_u16(), &body) {
            Ok(result) => {
                info!(
                    "✅ Received {} ranked keywords and {} association lists",
                    result.keyword_ranking.len(),
                    result.wikidata_keywords.len()
                );
                Ok(result)
            }
            Err(e) => {
                warn!("Inference request failed: {}", e);
                Err(e)
            }
        }
    }

    async fn is_available(&self) -> bool {
        match self.client.get(&self.health_url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_body() {
        let body = r#"{"keyword_ranking": [{"keyword": "seo", "normalized_score": 1.0}]}"#;
        let response = interpret_response(200, body).unwrap();
        assert_eq!(response.keyword_ranking.len(), 1);
        assert!(response.wikidata_keywords.is_empty());
    }

    #[test]
    fn test_success_body_keeps_association_order() {
        let body = r#"{
            "keyword_ranking": [{"keyword": "traffic", "normalized_score": 0.5}],
            "wikidata_keywords": {
                "traffic": ["visitors"],
                "seo": ["ranking"],
                "content": ["blog"]
            }
        }"#;
        let response = interpret_response(200, body).unwrap();

        let seeds: Vec<&str> = response.wikidata_keywords.iter().map(|(seed, _)| seed).collect();
        assert_eq!(seeds, vec!["traffic", "seo", "content"]);
    }

    #[test]
    fn test_error_field_on_ok_status() {
        let body = r#"{"error": "Invalid file type. Only video files are allowed."}"#;
        match interpret_response(200, body) {
            Err(ClientError::Service { status, message }) => {
                assert_eq!(status, 200);
                assert_eq!(message, "Invalid file type. Only video files are allowed.");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_error_status_without_message_uses_default() {
        match interpret_response(500, "Internal Server Error") {
            Err(ClientError::Service { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, DEFAULT_SERVICE_FAILURE);
            }
            other => panic!("unexpected: {:?}", other),
        }

        // FastAPI validation errors carry `detail`, not `error`
        let err = interpret_response(422, r#"{"detail": [{"msg": "field required"}]}"#).unwrap_err();
        assert_eq!(err.to_string(), DEFAULT_SERVICE_FAILURE);
    }

    #[test]
    fn test_malformed_success_body() {
        assert!(matches!(
            interpret_response(200, "<html>"),
            Err(ClientError::MalformedResponse(_))
        ));
        assert!(matches!(
            interpret_response(200, r#"{"wikidata_keywords": ["not", "a", "map"]}"#),
            Err(ClientError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_client_rejects_bad_base_url() {
        let mut config = crate::config::Config::default().service;
        config.base_url = "not a url".to_string();
        assert!(matches!(
            HttpInferenceClient::new(&config),
            Err(ClientError::Configuration(_))
        ));
    }
}
