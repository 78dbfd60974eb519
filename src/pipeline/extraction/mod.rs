pub mod normalize;
pub mod grammar;
pub mod section;
pub mod lines;
pub mod fallback;
pub mod policy;
pub mod adapters;

pub use adapters::{adapter_for, DomainAdapter};
pub use normalize::normalize_response;
pub use policy::{ParsePolicy, Sentinels};
pub use section::{extract_section, extract_section_body, Section};

use std::sync::LazyLock;

use thiserror::Error;

use crate::models::{Domain, DomainRecord};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Unknown analysis domain: {0}")]
    UnknownDomain(String),

    #[error("Invalid level: {0}")]
    InvalidLevel(String),

    #[error("Parse policy error: {0}")]
    Policy(String),
}

static DEFAULT_POLICY: LazyLock<ParsePolicy> = LazyLock::new(ParsePolicy::default);

/// A completed model answer tagged with the analysis that requested it.
/// Consumed by parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub domain: Domain,
    pub text: String,
}

impl RawResponse {
    pub fn new(domain: Domain, text: impl Into<String>) -> Self {
        Self {
            domain,
            text: text.into(),
        }
    }

    pub fn parse(self) -> DomainRecord {
        parse(self.domain, &self.text)
    }

    pub fn parse_with_policy(self, policy: &ParsePolicy) -> DomainRecord {
        parse_with_policy(self.domain, &self.text, policy)
    }
}

/// Turn a model answer into a fully populated typed record.
///
/// Total: any text yields a record whose list fields are non-empty and whose
/// scalar fields are set, backfilled from the default policy where nothing
/// could be extracted.
pub fn parse(domain: Domain, text: &str) -> DomainRecord {
    parse_with_policy(domain, text, &DEFAULT_POLICY)
}

/// [`parse`] with product-specific defaults and sentinel texts.
pub fn parse_with_policy(domain: Domain, text: &str, policy: &ParsePolicy) -> DomainRecord {
    let _span = tracing::info_span!("parse", domain = %domain).entered();
    let text = normalize_response(text);
    let record = adapter_for(domain).parse(&text, policy);

    let fallback_fields = record.fallback_fields();
    if fallback_fields.is_empty() {
        tracing::debug!("All sections extracted");
    } else {
        tracing::debug!(fallback = ?fallback_fields, "Sections backfilled");
    }
    record
}

/// Parse raw bytes. Bytes that are not UTF-8 are rejected, distinct from
/// a response that simply contained nothing recognisable.
pub fn parse_bytes(domain: Domain, bytes: &[u8]) -> Result<DomainRecord, ExtractionError> {
    parse_bytes_with_policy(domain, bytes, &DEFAULT_POLICY)
}

pub fn parse_bytes_with_policy(
    domain: Domain,
    bytes: &[u8],
    policy: &ParsePolicy,
) -> Result<DomainRecord, ExtractionError> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        tracing::warn!(domain = %domain, "Response is not valid UTF-8");
        ExtractionError::MalformedInput(format!("response is not valid UTF-8: {e}"))
    })?;
    Ok(parse_with_policy(domain, text, policy))
}

/// Parse with a domain given as a string tag (`"diagnosis"`, ...).
pub fn parse_tagged(domain: &str, text: &str) -> Result<DomainRecord, ExtractionError> {
    Ok(parse(domain.parse()?, text))
}
