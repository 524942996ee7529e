//! HTTP client for OpenAI-compatible chat endpoints

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::instrument;

use super::messages::{ChatCompletion, ChatRequest};
use super::parser::parse_chat_completion;
use crate::config::Settings;
use crate::error::{TallyError, TallyResult};
use crate::types::ModelConfig;

/// Something that can answer a chat request for a configured model
#[async_trait]
pub trait ChatEndpoint: Send + Sync {
    /// Send one request
    ///
    /// A non-200 reply is `TallyError::Http` with `status_code` set and the
    /// response body as message; transport failures are `TallyError::Http`
    /// without a status; an unusable body is `TallyError::Llm`.
    async fn complete(
        &self,
        model: &ModelConfig,
        request: &ChatRequest,
    ) -> TallyResult<ChatCompletion>;
}

/// reqwest-backed [`ChatEndpoint`]
#[derive(Debug, Clone)]
pub struct OpenAiCompatClient {
    http_client: Client,
}

impl OpenAiCompatClient {
    /// Build a client using the connect timeout from settings
    pub fn new(settings: &Settings) -> TallyResult<Self> {
        let http_client = Client::builder()
            .connect_timeout(settings.connect_timeout())
            .build()?;
        Ok(Self { http_client })
    }

    /// Wrap an existing reqwest client
    pub fn with_client(http_client: Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl ChatEndpoint for OpenAiCompatClient {
    #[instrument(skip(self, model, request), fields(model = %model.name), level = "debug")]
    async fn complete(
        &self,
        model: &ModelConfig,
        request: &ChatRequest,
    ) -> TallyResult<ChatCompletion> {
        let url = model.completions_url();

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&model.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TallyError::http_status(status.as_u16(), error_text));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TallyError::llm(format!("Failed to parse response body: {}", e)))?;

        parse_chat_completion(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client() -> OpenAiCompatClient {
        let http_client = Client::builder()
            .no_proxy()
            .build()
            .expect("Failed to create HTTP client");
        OpenAiCompatClient::with_client(http_client)
    }

    fn test_model(base_url: &str) -> ModelConfig {
        ModelConfig::new("local", base_url, "test-api-key", "gpt-4o-mini")
    }

    fn test_request() -> ChatRequest {
        ChatRequest::for_question("gpt-4o-mini", "system", "What is 6*7?", 1024)
    }

    #[tokio::test]
    async fn test_complete_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-api-key"))
            .and(body_partial_json(json!({
                "model": "gpt-4o-mini",
                "temperature": 0.0,
                "max_tokens": 1024
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "answer: 42"}}],
                "usage": {"total_tokens": 17}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let completion = test_client()
            .complete(&test_model(&mock_server.uri()), &test_request())
            .await
            .unwrap();

        assert_eq!(completion.content, "answer: 42");
        assert_eq!(completion.total_tokens, 17);
    }

    #[tokio::test]
    async fn test_non_200_carries_status_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&mock_server)
            .await;

        let err = test_client()
            .complete(&test_model(&mock_server.uri()), &test_request())
            .await
            .unwrap_err();

        match err {
            TallyError::Http {
                status_code,
                message,
                ..
            } => {
                assert_eq!(status_code, Some(429));
                assert_eq!(message, "rate limited");
            }
            other => panic!("Expected HTTP error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_llm_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let err = test_client()
            .complete(&test_model(&mock_server.uri()), &test_request())
            .await
            .unwrap_err();
        assert!(matches!(err, TallyError::Llm { .. }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error_without_status() {
        // Port 9 (discard) is not expected to accept HTTP connections locally.
        let err = test_client()
            .complete(&test_model("http://127.0.0.1:9"), &test_request())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TallyError::Http {
                status_code: None,
                ..
            }
        ));
    }
}
