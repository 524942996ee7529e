//! Execution of a single sample

use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tally_core::llm::{ChatCompletion, ChatEndpoint, ChatRequest};
use tally_core::types::{ModelConfig, RunId, Sample, SampleResult};
use tally_core::{TallyError, TallyResult};
use tally_store::ResultSink;
use tracing::{debug, warn};

use super::RunnerConfig;
use crate::extract::{AnswerExtractor, instruction_followed};
use crate::score::is_correct;

/// Sends one sample to the model, scores it and persists the result
///
/// Request failures never escape: they become the result's raw output and
/// the sample scores as incorrect.
pub struct SampleRunner {
    endpoint: Arc<dyn ChatEndpoint>,
    sink: Arc<dyn ResultSink>,
    extractor: AnswerExtractor,
    config: RunnerConfig,
}

impl SampleRunner {
    pub fn new(
        endpoint: Arc<dyn ChatEndpoint>,
        sink: Arc<dyn ResultSink>,
        config: RunnerConfig,
    ) -> Self {
        Self {
            endpoint,
            sink,
            extractor: AnswerExtractor::new(),
            config,
        }
    }

    /// Run the sample and persist its result before returning it
    pub async fn run(&self, run_id: RunId, sample: &Sample, model: &ModelConfig) -> SampleResult {
        let request = ChatRequest::for_question(
            &model.model_identifier,
            &self.config.system_prompt,
            &sample.question,
            self.config.max_tokens,
        );

        let start = Instant::now();
        let outcome = self.request(model, &request).await;
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        let (raw_output, tokens_used, request_failed) = match outcome {
            Ok(completion) => (completion.content, completion.total_tokens, false),
            Err(e) => {
                debug!(run_id = %run_id, line = sample.line, error = %e, "Sample request failed");
                (describe_failure(&e), 0, true)
            }
        };

        let extracted_answer = self.extractor.extract(&raw_output);
        let result = SampleResult {
            run_id,
            line: sample.line,
            question: sample.question.clone(),
            ground_truth: sample.ground_truth.clone(),
            instruction_followed: instruction_followed(&raw_output),
            is_correct: !request_failed && is_correct(&extracted_answer, &sample.ground_truth),
            extracted_answer,
            raw_output: Some(raw_output),
            request_failed,
            latency_ms,
            tokens_used,
            completed_at: Utc::now(),
        };

        if let Err(e) = self.sink.append(&result).await {
            warn!(run_id = %run_id, line = sample.line, error = %e, "Failed to persist sample result");
        }

        result
    }

    async fn request(
        &self,
        model: &ModelConfig,
        request: &ChatRequest,
    ) -> TallyResult<ChatCompletion> {
        match self.config.request_timeout() {
            Some(limit) => tokio::time::timeout(limit, self.endpoint.complete(model, request))
                .await
                .map_err(|_| {
                    TallyError::timeout("chat completion request", limit.as_secs())
                })?,
            None => self.endpoint.complete(model, request).await,
        }
    }
}

/// Text recorded as raw output when a request fails
fn describe_failure(error: &TallyError) -> String {
    match error {
        TallyError::Http {
            status_code: Some(status),
            message,
            ..
        } => format!("Error: {} - {}", status, message),
        TallyError::Timeout { seconds, .. } => {
            format!("Exception: request timed out after {}s", seconds)
        }
        other => format!("Exception: {}", other),
    }
}
