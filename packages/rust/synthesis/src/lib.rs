//! Intelligence brief synthesis via an external text-generation service.
//!
//! One research request per company, with conservative sampling so the
//! service follows the JSON contract. The synthesizer never fails: every
//! failure mode — unreachable endpoint, timeout, bad status, garbled body,
//! missing identity keys — degrades to the deterministic fallback brief,
//! and the outcome carries a source tag so callers can tell which path
//! produced it without branching on errors.

mod prompt;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use dealbrief_shared::{DealBriefError, IntelligenceBrief, Result, SynthesisSettings};

pub use prompt::{RESEARCH_SCHEMA, build_research_prompt};

/// User-Agent string for synthesis requests.
const USER_AGENT: &str = concat!("DealBrief/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// Where a brief came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BriefSource {
    /// Parsed from a response of the external research service.
    Ai,
    /// The deterministic synthetic fallback.
    Fallback,
}

/// The always-successful outcome of a synthesis attempt.
#[derive(Debug, Clone)]
pub struct SynthesizedBrief {
    /// A structurally complete brief, whichever path produced it.
    pub brief: IntelligenceBrief,
    /// Which path produced it.
    pub source: BriefSource,
}

fn fallback_brief(company_name: &str) -> SynthesizedBrief {
    SynthesizedBrief {
        brief: IntelligenceBrief::fallback(company_name),
        source: BriefSource::Fallback,
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Runtime configuration for the synthesizer.
#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    /// Chat-completions endpoint URL.
    pub endpoint: String,
    /// Bearer credential. `None` skips the network entirely and every brief
    /// comes from the fallback generator.
    pub api_key: Option<String>,
    /// Model to request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Response token budget.
    pub max_tokens: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl SynthesisConfig {
    /// Build a runtime config from the `[synthesis]` settings section plus a
    /// resolved credential.
    pub fn from_settings(settings: &SynthesisSettings, api_key: Option<String>) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            api_key,
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            timeout_secs: settings.timeout_secs,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

// ---------------------------------------------------------------------------
// Synthesizer
// ---------------------------------------------------------------------------

/// Brief synthesizer over an external chat-completions service.
///
/// Constructed with explicit configuration (no global client state) so
/// tests can point it at a mock server.
pub struct Synthesizer {
    config: SynthesisConfig,
    client: reqwest::Client,
}

impl Synthesizer {
    /// Create a synthesizer. The HTTP client owns the request timeout, so a
    /// hung request can never stall a caller past the configured bound.
    pub fn new(config: SynthesisConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DealBriefError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Synthesize an intelligence brief for one company. Never fails.
    #[instrument(skip_all, fields(company = %company_name))]
    pub async fn synthesize(
        &self,
        company_name: &str,
        website: &str,
        context: &str,
    ) -> SynthesizedBrief {
        let Some(api_key) = &self.config.api_key else {
            info!("no research API key configured, using fallback brief");
            return fallback_brief(company_name);
        };

        let prompt = prompt::build_research_prompt(company_name, website, context);
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = match self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                warn!(timeout_secs = self.config.timeout_secs, "research request timed out");
                return fallback_brief(company_name);
            }
            Err(e) => {
                warn!(error = %e, "research request failed");
                return fallback_brief(company_name);
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "research service returned non-success status");
            return fallback_brief(company_name);
        }

        let body: ChatResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "research response body was not valid JSON");
                return fallback_brief(company_name);
            }
        };

        let Some(content) = body.choices.into_iter().next().map(|c| c.message.content) else {
            warn!("research response contained no choices");
            return fallback_brief(company_name);
        };

        match resolve_brief(&content) {
            Ok(brief) => {
                info!(brief_company = %brief.company_name, "research brief parsed");
                SynthesizedBrief {
                    brief,
                    source: BriefSource::Ai,
                }
            }
            Err(reason) => {
                warn!(%reason, "falling back to synthetic brief");
                fallback_brief(company_name)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Response resolution
// ---------------------------------------------------------------------------

/// Identity keys that must be present in a parsed response. Missing nested
/// keys are tolerated (they default to empty); missing identity means the
/// service did not answer the question asked.
const REQUIRED_KEYS: [&str; 3] = ["companyName", "tagline", "executiveSummary"];

/// Resolve the free-form response content into a brief, or a reason string
/// describing why the fallback must be used.
fn resolve_brief(content: &str) -> std::result::Result<IntelligenceBrief, String> {
    let json_str =
        extract_json_object(content).ok_or_else(|| "no JSON object in response".to_string())?;

    let value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| format!("response JSON failed to parse: {e}"))?;

    for key in REQUIRED_KEYS {
        if value.get(key).is_none() {
            return Err(format!("response JSON missing required key {key:?}"));
        }
    }

    serde_json::from_value(value).map_err(|e| format!("response JSON has wrong shape: {e}"))
}

/// Extract the first top-level JSON object from free-form text.
///
/// The service is instructed to respond with bare JSON but may still wrap it
/// in prose; taking the span from the first `{` to the last `}` recovers the
/// object in that case.
fn extract_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&content[start..=end])
}
