use serde::{Deserialize, Serialize};

use super::types::{ImageAttachment, LanguageModelClient};
use super::UpstreamError;
use crate::config;

/// Connection settings for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub text_model: String,
    pub vision_model: String,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: config::DEFAULT_BASE_URL.to_string(),
            text_model: config::DEFAULT_TEXT_MODEL.to_string(),
            vision_model: config::DEFAULT_VISION_MODEL.to_string(),
            timeout_secs: config::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GeminiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source. Blank values count as unset; an
    /// unparseable timeout keeps the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let timeout_secs = match get(config::ENV_TIMEOUT_SECS) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Ignoring invalid {}", config::ENV_TIMEOUT_SECS);
                defaults.timeout_secs
            }),
            None => defaults.timeout_secs,
        };

        Self {
            api_key: get(config::ENV_API_KEY),
            base_url: get(config::ENV_BASE_URL).unwrap_or(defaults.base_url),
            text_model: get(config::ENV_TEXT_MODEL).unwrap_or(defaults.text_model),
            vision_model: get(config::ENV_VISION_MODEL).unwrap_or(defaults.vision_model),
            timeout_secs,
        }
    }
}

/// Gemini HTTP client (blocking).
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self, UpstreamError> {
        let api_key = config.api_key.clone().ok_or(UpstreamError::MissingApiKey)?;
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs: config.timeout_secs,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/{}:generateContent", self.base_url, model)
    }
}

/// Request body for `generateContent`.
#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

fn build_request<'a>(prompt: &'a str, attachment: Option<&'a ImageAttachment>) -> GenerateRequest<'a> {
    let mut parts = vec![Part::Text { text: prompt }];
    if let Some(image) = attachment {
        parts.push(Part::Inline {
            inline_data: InlineData {
                mime_type: &image.mime_type,
                data: &image.data_base64,
            },
        });
    }
    GenerateRequest {
        contents: vec![Content { parts }],
    }
}

/// Response body from `generateContent`. Only the fields read are modelled.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Map an HTTP status and body to the model's text or an upstream error.
pub fn interpret_response(
    status: u16,
    body: &str,
    retry_after: Option<u64>,
) -> Result<String, UpstreamError> {
    if status == 429 {
        return Err(UpstreamError::RateLimited { retry_after });
    }
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .and_then(|e| e.error.message)
            .unwrap_or_else(|| format!("API error: HTTP {status}"));
        return Err(UpstreamError::Api { status, message });
    }

    let parsed: GenerateResponse = serde_json::from_str(body).map_err(|e| UpstreamError::Api {
        status,
        message: format!("unreadable response: {e}"),
    })?;

    if let Some(reason) = parsed.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(UpstreamError::ContentBlocked(reason));
    }

    parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .filter(|t| !t.is_empty())
        .ok_or(UpstreamError::EmptyCandidate)
}

impl LanguageModelClient for GeminiClient {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        attachment: Option<&ImageAttachment>,
    ) -> Result<String, UpstreamError> {
        let body = build_request(prompt, attachment);

        let response = self
            .client
            .post(self.endpoint(model))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .map_err(|e| {
                let err = if e.is_timeout() {
                    UpstreamError::Transport(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
                } else if e.is_connect() {
                    UpstreamError::Transport(format!("Cannot reach {}", self.base_url))
                } else {
                    UpstreamError::Transport(e.without_url().to_string())
                };
                tracing::warn!(model, error = %err, "Model request failed");
                err
            })?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());
        let text = response
            .text()
            .map_err(|e| UpstreamError::Transport(e.without_url().to_string()))?;

        interpret_response(status, &text, retry_after).inspect_err(|err| {
            tracing::warn!(model, status, error = %err, "Model returned an error");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    #[test]
    fn config_defaults_without_env() {
        let config = GeminiConfig::from_lookup(lookup(&[]));
        assert_eq!(config, GeminiConfig::default());
        assert_eq!(config.text_model, "gemini-2.0-flash");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn config_reads_overrides() {
        let config = GeminiConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k-123"),
            ("AETHER_TEXT_MODEL", "gemini-pro"),
            ("AETHER_TIMEOUT_SECS", "15"),
            ("AETHER_VISION_MODEL", "  "),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("k-123"));
        assert_eq!(config.text_model, "gemini-pro");
        assert_eq!(config.vision_model, "gemini-2.0-flash");
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    fn invalid_timeout_keeps_default() {
        let config = GeminiConfig::from_lookup(lookup(&[("AETHER_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn client_requires_api_key() {
        assert!(matches!(
            GeminiClient::new(&GeminiConfig::default()),
            Err(UpstreamError::MissingApiKey)
        ));
    }

    #[test]
    fn client_trims_trailing_slash() {
        let config = GeminiConfig {
            api_key: Some("k".into()),
            base_url: "http://localhost:8080/models/".into(),
            ..GeminiConfig::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint("gemini-2.0-flash"),
            "http://localhost:8080/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn request_body_shape() {
        let image = ImageAttachment {
            mime_type: "image/png".into(),
            data_base64: "aGVsbG8=".into(),
        };
        let json = serde_json::to_value(build_request("Describe", Some(&image))).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Describe");
        assert_eq!(json["contents"][0]["parts"][1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(json["contents"][0]["parts"][1]["inlineData"]["data"], "aGVsbG8=");

        let json = serde_json::to_value(build_request("Hi", None)).unwrap();
        assert_eq!(json["contents"][0]["parts"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn success_returns_first_candidate_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"✅ Conditions:"}]}}]}"#;
        assert_eq!(interpret_response(200, body, None).unwrap(), "✅ Conditions:");
    }

    #[test]
    fn blocked_prompt() {
        let body = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        assert_eq!(
            interpret_response(200, body, None),
            Err(UpstreamError::ContentBlocked("SAFETY".into()))
        );
    }

    #[test]
    fn missing_candidate_text() {
        for body in [
            r#"{}"#,
            r#"{"candidates":[]}"#,
            r#"{"candidates":[{"content":{"parts":[]}}]}"#,
            r#"{"candidates":[{"content":{"parts":[{"text":""}]}}]}"#,
        ] {
            assert_eq!(
                interpret_response(200, body, None),
                Err(UpstreamError::EmptyCandidate),
                "{body}"
            );
        }
    }

    #[test]
    fn rate_limit_keeps_retry_after() {
        assert_eq!(
            interpret_response(429, "", Some(30)),
            Err(UpstreamError::RateLimited { retry_after: Some(30) })
        );
    }

    #[test]
    fn api_error_uses_provider_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid"}}"#;
        assert_eq!(
            interpret_response(400, body, None),
            Err(UpstreamError::Api { status: 400, message: "API key not valid".into() })
        );
        assert_eq!(
            interpret_response(503, "<html>", None),
            Err(UpstreamError::Api { status: 503, message: "API error: HTTP 503".into() })
        );
    }
}
