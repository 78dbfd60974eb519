//! Caller-side analysis flow: build the prompt, ask the model, parse the
//! answer. Upstream failures propagate unchanged; parsing never fails.

use std::time::Instant;

use thiserror::Error;

use crate::config;
use crate::models::{Domain, DomainRecord};
use crate::pipeline::extraction::{parse_with_policy, ExtractionError, ParsePolicy};
use crate::pipeline::llm::prompt::{
    assistant_prompt, prescription_prompt, radiology_prompt, symptom_prompt,
};
use crate::pipeline::llm::{ImageAttachment, LanguageModelClient, PatientProfile, SymptomFocus, UpstreamError};
use crate::pipeline::storage::StorageError;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub struct Analyzer<'a> {
    client: &'a dyn LanguageModelClient,
    policy: ParsePolicy,
    text_model: String,
    vision_model: String,
}

impl<'a> Analyzer<'a> {
    pub fn new(client: &'a dyn LanguageModelClient) -> Self {
        Self {
            client,
            policy: ParsePolicy::default(),
            text_model: config::DEFAULT_TEXT_MODEL.to_string(),
            vision_model: config::DEFAULT_VISION_MODEL.to_string(),
        }
    }

    pub fn with_policy(mut self, policy: ParsePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_models(mut self, text_model: &str, vision_model: &str) -> Self {
        self.text_model = text_model.to_string();
        self.vision_model = vision_model.to_string();
        self
    }

    /// Full symptom analysis: conditions, tests, treatments, warnings and reasoning.
    pub fn analyze_symptoms(&self, profile: &PatientProfile) -> Result<DomainRecord, AnalysisError> {
        self.analyze_symptoms_with(profile, SymptomFocus::Comprehensive)
    }

    /// Symptom analysis restricted to `focus`. Sections not requested come
    /// back as sentinels.
    pub fn analyze_symptoms_with(
        &self,
        profile: &PatientProfile,
        focus: SymptomFocus,
    ) -> Result<DomainRecord, AnalysisError> {
        if profile.symptoms.trim().is_empty() {
            return Err(AnalysisError::InvalidInput("symptoms are required".into()));
        }
        let prompt = symptom_prompt(profile, focus);
        self.run(Domain::Diagnosis, &self.text_model, &prompt, None)
    }

    pub fn analyze_prescription(&self, image: &ImageAttachment) -> Result<DomainRecord, AnalysisError> {
        self.run(Domain::Prescription, &self.vision_model, &prescription_prompt(), Some(image))
    }

    pub fn analyze_radiology(
        &self,
        image: &ImageAttachment,
        context: Option<&str>,
    ) -> Result<DomainRecord, AnalysisError> {
        let prompt = radiology_prompt(context);
        self.run(Domain::Radiology, &self.vision_model, &prompt, Some(image))
    }

    /// Free-form assistant chat. The answer is returned as written.
    pub fn ask(&self, question: &str) -> Result<String, AnalysisError> {
        if question.trim().is_empty() {
            return Err(AnalysisError::InvalidInput("question is empty".into()));
        }
        let _span = tracing::info_span!("ask", model = %self.text_model).entered();
        Ok(self.client.generate(&self.text_model, &assistant_prompt(question), None)?)
    }

    fn run(
        &self,
        domain: Domain,
        model: &str,
        prompt: &str,
        image: Option<&ImageAttachment>,
    ) -> Result<DomainRecord, AnalysisError> {
        let _span = tracing::info_span!("analyze", domain = %domain, model = %model).entered();
        let start = Instant::now();

        let text = self.client.generate(model, prompt, image).inspect_err(|e| {
            tracing::warn!(error = %e, transient = e.is_transient(), "Analysis failed upstream");
        })?;
        let record = parse_with_policy(domain, &text, &self.policy);

        tracing::info!(
            response_chars = text.chars().count(),
            fallback_fields = record.fallback_fields().len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Analysis complete"
        );
        Ok(record)
    }
}
