use crate::config::ProviderConfig;
use crate::domain::model::Prompt;
use crate::domain::ports::TextProvider;
use crate::utils::error::{ForecastError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct RawChatResponse {
    choices: Option<Vec<RawChoice>>,
    usage: Option<RawUsage>,
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize, Debug)]
struct RawChoice {
    message: Option<RawMessage>,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RawMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RawUsage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    message: String,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct ChatCompletionsClient {
    client: Client,
    config: ProviderConfig,
    url: String,
}

impl ChatCompletionsClient {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("astro-forecast/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .build()?;
        let url = completions_url(&config.endpoint);

        Ok(Self {
            client,
            config,
            url,
        })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn map_transport_error(&self, error: reqwest::Error) -> ForecastError {
        if error.is_timeout() {
            ForecastError::TimeoutError {
                seconds: self.config.request_timeout.as_secs(),
            }
        } else {
            ForecastError::HttpError(error)
        }
    }
}

#[async_trait]
impl TextProvider for ChatCompletionsClient {
    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &self.config.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt.as_str(),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            stream: false,
        };

        tracing::debug!(
            "Provider request: url={}, model={}, category={}, max_tokens={}, temp={}",
            self.url,
            body.model,
            prompt.category,
            body.max_tokens,
            body.temperature
        );
        let start = Instant::now();

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        tracing::debug!(
            "Provider response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        parse_completion(status, &text)
    }
}

fn completions_url(endpoint: &str) -> String {
    format!("{}/chat/completions", endpoint.trim_end_matches('/'))
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "no response body".to_string()
            } else {
                trimmed.to_string()
            }
        })
}

fn parse_completion(status: StatusCode, body: &str) -> Result<String> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ForecastError::AuthenticationError {
            status: status.as_u16(),
            message: error_message(body),
        });
    }

    if !status.is_success() {
        return Err(ForecastError::ProviderResponseError {
            status: status.as_u16(),
            message: error_message(body),
        });
    }

    let parsed: RawChatResponse =
        serde_json::from_str(body).map_err(|e| ForecastError::MalformedResponseError {
            message: e.to_string(),
        })?;

    if let Some(err) = parsed.error {
        return Err(ForecastError::ProviderResponseError {
            status: status.as_u16(),
            message: err.message,
        });
    }

    if let Some(usage) = &parsed.usage {
        tracing::debug!(
            "Token usage: prompt={}, completion={}",
            usage.prompt_tokens.unwrap_or(0),
            usage.completion_tokens.unwrap_or(0)
        );
    }

    let choice = parsed
        .choices
        .and_then(|choices| choices.into_iter().next())
        .ok_or(ForecastError::EmptyResponseError)?;

    if let Some(reason) = choice.finish_reason.as_deref() {
        if reason == "length" {
            return Err(ForecastError::TruncatedResponseError {
                finish_reason: reason.to_string(),
            });
        }
    }

    choice
        .message
        .and_then(|m| m.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(ForecastError::EmptyResponseError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url_trims_trailing_slash() {
        assert_eq!(
            completions_url("https://api.deepseek.com"),
            "https://api.deepseek.com/chat/completions"
        );
        assert_eq!(
            completions_url("https://api.deepseek.com/v1/"),
            "https://api.deepseek.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_parse_completion_success() {
        let body = r#"{
            "choices": [{"message": {"role": "assistant", "content": "ကံကောင်းမည်"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 20}
        }"#;
        assert_eq!(parse_completion(StatusCode::OK, body).unwrap(), "ကံကောင်းမည်");
    }

    #[test]
    fn test_parse_completion_error_statuses() {
        let auth = parse_completion(
            StatusCode::UNAUTHORIZED,
            r#"{"error": {"message": "Authentication Fails"}}"#,
        )
        .unwrap_err();
        assert!(matches!(
            auth,
            ForecastError::AuthenticationError { status: 401, ref message } if message == "Authentication Fails"
        ));

        let server = parse_completion(StatusCode::INTERNAL_SERVER_ERROR, "").unwrap_err();
        assert!(matches!(
            server,
            ForecastError::ProviderResponseError { status: 500, ref message } if message == "no response body"
        ));
    }

    #[test]
    fn test_parse_completion_bad_bodies() {
        assert!(matches!(
            parse_completion(StatusCode::OK, "not json").unwrap_err(),
            ForecastError::MalformedResponseError { .. }
        ));
        assert!(matches!(
            parse_completion(StatusCode::OK, r#"{"choices": []}"#).unwrap_err(),
            ForecastError::EmptyResponseError
        ));
        assert!(matches!(
            parse_completion(
                StatusCode::OK,
                r#"{"choices": [{"message": {"content": "   "}, "finish_reason": "stop"}]}"#
            )
            .unwrap_err(),
            ForecastError::EmptyResponseError
        ));
        assert!(matches!(
            parse_completion(
                StatusCode::OK,
                r#"{"choices": [{"message": {"content": "partial"}, "finish_reason": "length"}]}"#
            )
            .unwrap_err(),
            ForecastError::TruncatedResponseError { .. }
        ));
        assert!(matches!(
            parse_completion(StatusCode::OK, r#"{"error": {"message": "quota exceeded"}}"#)
                .unwrap_err(),
            ForecastError::ProviderResponseError { .. }
        ));
    }
}
