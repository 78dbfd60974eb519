use std::sync::LazyLock;

use base64::Engine;
use regex::Regex;

use super::UpstreamError;

static DATA_URL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^data:(image/(?:jpeg|png|jpg));base64,").unwrap());

/// Trait for generative language-model backends.
/// Allows mocking in tests and swapping providers.
pub trait LanguageModelClient: Send + Sync {
    /// Run one completion and return the model's full text answer.
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        attachment: Option<&ImageAttachment>,
    ) -> Result<String, UpstreamError>;
}

/// An inline image sent alongside a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub mime_type: String,
    /// Base64 of the image bytes, no data-URL prefix.
    pub data_base64: String,
}

impl ImageAttachment {
    /// From a browser-style data URL (`data:image/png;base64,...`). Plain
    /// base64 without the prefix is taken as JPEG.
    pub fn from_data_url(data_url: &str) -> Result<Self, UpstreamError> {
        let data_url = data_url.trim();
        let (mime_type, data) = match DATA_URL_PREFIX.captures(data_url) {
            Some(caps) => {
                let prefix_len = caps.get(0).map_or(0, |m| m.end());
                let mime = caps.get(1).map_or("image/jpeg", |m| m.as_str());
                (mime.replace("image/jpg", "image/jpeg"), &data_url[prefix_len..])
            }
            None => ("image/jpeg".to_string(), data_url),
        };
        if data.is_empty() {
            return Err(UpstreamError::InvalidAttachment("image data is empty".into()));
        }
        base64::engine::general_purpose::STANDARD
            .decode(data)
            .map_err(|e| UpstreamError::InvalidAttachment(format!("not base64: {e}")))?;
        Ok(Self {
            mime_type,
            data_base64: data.to_string(),
        })
    }

    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Result<Self, UpstreamError> {
        if bytes.is_empty() {
            return Err(UpstreamError::InvalidAttachment("image data is empty".into()));
        }
        if !mime_type.starts_with("image/") {
            return Err(UpstreamError::InvalidAttachment(format!(
                "unsupported type {mime_type}"
            )));
        }
        Ok(Self {
            mime_type: mime_type.to_string(),
            data_base64: base64::engine::general_purpose::STANDARD.encode(bytes),
        })
    }
}
