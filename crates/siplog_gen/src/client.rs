//! Provider invocation.
//!
//! One HTTP POST per call, chat-completions shape, structured-JSON response
//! mode, bearer auth. A cancellation deadline wraps the whole round trip:
//! when it elapses the in-flight request future is dropped, which aborts the
//! connection, and the call fails with `Timeout`. Retries are not done here;
//! retry/fallback policy belongs to the orchestrator.

use async_trait::async_trait;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::config::GenerationConfig;
use crate::error::GenerateError;

/// A single provider round trip: prompts in, raw response envelope out.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    async fn invoke(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        credential: &str,
    ) -> Result<serde_json::Value, GenerateError>;
}

/// Provider error envelope on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Run `fut` under the cancellation deadline, mapping elapse to `Timeout`.
async fn bounded<T, F>(deadline: Duration, timeout_secs: u64, fut: F) -> Result<T, GenerateError>
where
    F: Future<Output = Result<T, GenerateError>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(GenerateError::Timeout(timeout_secs)),
    }
}

/// Real HTTP client against the configured chat-completions endpoint.
pub struct HttpProviderClient {
    config: GenerationConfig,
    http: reqwest::Client,
}

impl HttpProviderClient {
    /// The reqwest client carries no timeout of its own; the deadline is
    /// applied per call so the error kind stays distinct from transport
    /// failures.
    pub fn new(config: GenerationConfig) -> Result<Self, GenerateError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| GenerateError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    async fn send(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        credential: &str,
    ) -> Result<serde_json::Value, GenerateError> {
        let request_body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt},
            ],
            "temperature": self.config.temperature,
            "response_format": {"type": "json_object"},
        });

        debug!("provider request: model={} endpoint={}", self.config.model, self.config.endpoint);

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(credential)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerateError::Timeout(self.config.timeout_secs)
                } else {
                    GenerateError::Transport(format!("request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorEnvelope>()
                .await
                .ok()
                .and_then(|envelope| envelope.error)
                .and_then(|body| body.message)
                .unwrap_or_else(|| "provider request failed".to_string());
            return Err(GenerateError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| GenerateError::Parse(format!("provider envelope is not valid JSON: {e}")))
    }
}

#[async_trait]
impl ProviderClient for HttpProviderClient {
    async fn invoke(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        credential: &str,
    ) -> Result<serde_json::Value, GenerateError> {
        let deadline = Duration::from_secs(self.config.timeout_secs);
        bounded(
            deadline,
            self.config.timeout_secs,
            self.send(system_prompt, user_prompt, credential),
        )
        .await
    }
}

/// Scripted provider for tests: replays queued responses and counts calls.
pub struct FakeProviderClient {
    responses: std::sync::Mutex<Vec<Result<serde_json::Value, GenerateError>>>,
    call_count: std::sync::Mutex<usize>,
}

impl FakeProviderClient {
    pub fn new(responses: Vec<Result<serde_json::Value, GenerateError>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses),
            call_count: std::sync::Mutex::new(0),
        }
    }

    /// Always answers with the same success envelope.
    pub fn always_ok(envelope: serde_json::Value) -> Self {
        Self::new(vec![Ok(envelope)])
    }

    /// Always answers with the same error.
    pub fn always_err(error: GenerateError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl ProviderClient for FakeProviderClient {
    async fn invoke(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        _credential: &str,
    ) -> Result<serde_json::Value, GenerateError> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(GenerateError::Transport("fake client exhausted".to_string()));
        }
        if responses.len() == 1 {
            // Keep replaying the last scripted response.
            responses[0].clone()
        } else {
            responses.remove(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_maps_elapse_to_timeout() {
        let slow = async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<u32, GenerateError>(1)
        };
        let result = bounded(Duration::from_millis(10), 20, slow).await;
        assert_eq!(result, Err(GenerateError::Timeout(20)));
    }

    #[tokio::test]
    async fn test_bounded_passes_through_fast_results() {
        let fast = async { Ok::<u32, GenerateError>(7) };
        assert_eq!(bounded(Duration::from_secs(1), 20, fast).await, Ok(7));

        let failing = async { Err::<u32, _>(GenerateError::MissingCredential) };
        assert_eq!(
            bounded(Duration::from_secs(1), 20, failing).await,
            Err(GenerateError::MissingCredential)
        );
    }

    #[tokio::test]
    async fn test_fake_client_replays_and_counts() {
        let client = FakeProviderClient::new(vec![
            Ok(serde_json::json!({"n": 1})),
            Err(GenerateError::Timeout(20)),
        ]);

        let first = client.invoke("s", "u", "c").await.unwrap();
        assert_eq!(first["n"], 1);
        assert!(client.invoke("s", "u", "c").await.is_err());
        // Single remaining response keeps replaying.
        assert!(client.invoke("s", "u", "c").await.is_err());
        assert_eq!(client.call_count(), 3);
    }
}
