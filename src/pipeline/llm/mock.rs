use std::sync::Mutex;

use super::types::{ImageAttachment, LanguageModelClient};
use super::UpstreamError;

/// A prompt as received by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub model: String,
    pub prompt: String,
    pub attachment_mime: Option<String>,
}

/// Mock language model for testing. Returns a canned answer or error and
/// records every call.
pub struct MockLanguageModel {
    outcome: Result<String, UpstreamError>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockLanguageModel {
    pub fn new(response: &str) -> Self {
        Self {
            outcome: Ok(response.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: UpstreamError) -> Self {
        Self {
            outcome: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl LanguageModelClient for MockLanguageModel {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        attachment: Option<&ImageAttachment>,
    ) -> Result<String, UpstreamError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                model: model.to_string(),
                prompt: prompt.to_string(),
                attachment_mime: attachment.map(|a| a.mime_type.clone()),
            });
        }
        self.outcome.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_configured_response() {
        let client = MockLanguageModel::new("test response");
        let result = client.generate("model", "prompt", None).unwrap();
        assert_eq!(result, "test response");
    }

    #[test]
    fn mock_returns_configured_error() {
        let client = MockLanguageModel::failing(UpstreamError::EmptyCandidate);
        assert_eq!(
            client.generate("model", "prompt", None),
            Err(UpstreamError::EmptyCandidate)
        );
    }

    #[test]
    fn mock_records_calls_in_order() {
        let client = MockLanguageModel::new("");
        let image = ImageAttachment {
            mime_type: "image/png".into(),
            data_base64: "aGk=".into(),
        };
        client.generate("text-model", "first", None).unwrap();
        client.generate("vision-model", "second", Some(&image)).unwrap();

        let calls = client.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].prompt, "first");
        assert_eq!(calls[0].attachment_mime, None);
        assert_eq!(calls[1].model, "vision-model");
        assert_eq!(calls[1].attachment_mime.as_deref(), Some("image/png"));
    }
}
