//! LLM-assisted intent extraction.
//!
//! The external completion capability sits behind one narrow interface: free
//! text in, a small constrained structure (or a failure) out. Providers are
//! interchangeable at startup; every failure mode is non-fatal and the caller
//! falls back to a non-AI strategy. One attempt per query, never retried.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::LlmConfig;
use crate::strategy::SkillAsk;

/// Bounds applied to whatever the model returns. Anything outside them is
/// trimmed, not rejected: a partially-usable intent still beats a fallback.
const MAX_LIST_ENTRIES: usize = 8;
const MAX_NAME_CHARS: usize = 64;

const DEFAULT_REQUIRED_WEIGHT: f32 = 1.0;
const DEFAULT_PREFERRED_WEIGHT: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestedStrategy {
    Ownership,
    Skill,
    Label,
    Fulltext,
}

/// Structured understanding of a query, used to parametrize a retrieval
/// strategy.
#[derive(Debug, Clone)]
pub struct QueryIntent {
    pub summary: String,
    pub domains: Vec<String>,
    pub required_skills: Vec<SkillAsk>,
    pub preferred_skills: Vec<SkillAsk>,
    pub suggested_strategy: SuggestedStrategy,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("intent extraction disabled")]
    Disabled,
    #[error("extraction request timed out")]
    Timeout,
    #[error("extraction request failed: {0}")]
    Http(String),
    #[error("malformed extraction response: {0}")]
    Malformed(String),
}

pub trait IntentProvider: Send + Sync {
    fn extract(&self, query: &str) -> Result<QueryIntent, ExtractError>;
    fn name(&self) -> &'static str;
}

/// Select the provider once at startup from config.
pub fn provider_from_config(config: &LlmConfig) -> Box<dyn IntentProvider> {
    if !config.enabled {
        return Box::new(DisabledProvider);
    }
    match OpenAiCompatProvider::new(config) {
        Ok(provider) => Box::new(provider),
        Err(err) => {
            tracing::warn!("intent provider unavailable, extraction disabled: {err}");
            Box::new(DisabledProvider)
        }
    }
}

/// No-op provider: always fails fast so the finder takes its fallback path
/// without waiting on anything.
pub struct DisabledProvider;

impl IntentProvider for DisabledProvider {
    fn extract(&self, _query: &str) -> Result<QueryIntent, ExtractError> {
        Err(ExtractError::Disabled)
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

const SYSTEM_PROMPT: &str = "You help employees find the right people in their organization. \
Extract from the user's query: the relevant domains, required and preferred skills with \
importance weights (0.0-1.0), and the best search strategy. \
Respond with ONLY valid JSON in exactly this shape:\n\
{\"intent\": \"one sentence\", \"domains\": [\"...\"], \
\"required_skills\": [{\"name\": \"...\", \"weight\": 1.0}], \
\"preferred_skills\": [{\"name\": \"...\", \"weight\": 0.5}], \
\"search_strategy\": \"ownership|skill|label|fulltext\"}";

/// OpenAI-compatible chat-completions provider. Covers the cloud API and
/// local inference servers that speak the same wire format.
pub struct OpenAiCompatProvider {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    client: reqwest::blocking::Client,
}

impl OpenAiCompatProvider {
    pub fn new(config: &LlmConfig) -> Result<Self, ExtractError> {
        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ExtractError::Http(err.to_string()))?;
        Ok(Self {
            endpoint: format!("{}/chat/completions", config.endpoint.trim_end_matches('/')),
            model: config.model.clone(),
            api_key: config.api_key.clone().filter(|key| !key.is_empty()),
            temperature: config.temperature,
            client,
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: String,
}

impl IntentProvider for OpenAiCompatProvider {
    fn extract(&self, query: &str) -> Result<QueryIntent, ExtractError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: query,
                },
            ],
            temperature: self.temperature,
        };

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().map_err(|err| {
            if err.is_timeout() {
                ExtractError::Timeout
            } else {
                ExtractError::Http(err.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(ExtractError::Http(format!(
                "status {}",
                response.status()
            )));
        }

        let body: ChatResponse = response
            .json()
            .map_err(|err| ExtractError::Malformed(err.to_string()))?;
        let content = body
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| ExtractError::Malformed("empty choices".to_string()))?;

        parse_intent(content)
    }

    fn name(&self) -> &'static str {
        "openai_compat"
    }
}

#[derive(Debug, Deserialize)]
struct RawIntent {
    #[serde(default)]
    intent: String,
    #[serde(default)]
    domains: Vec<String>,
    #[serde(default)]
    required_skills: Vec<RawSkill>,
    #[serde(default)]
    preferred_skills: Vec<RawSkill>,
    #[serde(default)]
    search_strategy: Option<SuggestedStrategy>,
}

#[derive(Debug, Deserialize)]
struct RawSkill {
    #[serde(default)]
    name: String,
    #[serde(default)]
    weight: Option<f32>,
}

/// Parse the model's reply into a bounded [`QueryIntent`]. Tolerates markdown
/// code fences around the JSON; anything else malformed is an error.
pub fn parse_intent(content: &str) -> Result<QueryIntent, ExtractError> {
    let json = strip_code_fences(content);
    let raw: RawIntent = serde_json::from_str(json.trim())
        .map_err(|err| ExtractError::Malformed(err.to_string()))?;

    Ok(QueryIntent {
        summary: truncate(raw.intent.trim(), 240),
        domains: sanitize_names(raw.domains),
        required_skills: sanitize_skills(raw.required_skills, DEFAULT_REQUIRED_WEIGHT),
        preferred_skills: sanitize_skills(raw.preferred_skills, DEFAULT_PREFERRED_WEIGHT),
        suggested_strategy: raw.search_strategy.unwrap_or(SuggestedStrategy::Fulltext),
    })
}

fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    if let Some(rest) = trimmed.strip_prefix("```json") {
        rest.split("```").next().unwrap_or(rest)
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest.split("```").next().unwrap_or(rest)
    } else {
        trimmed
    }
}

fn sanitize_names(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .map(|name| truncate(name.trim(), MAX_NAME_CHARS))
        .filter(|name| !name.is_empty())
        .take(MAX_LIST_ENTRIES)
        .collect()
}

fn sanitize_skills(skills: Vec<RawSkill>, default_weight: f32) -> Vec<SkillAsk> {
    skills
        .into_iter()
        .filter(|skill| !skill.name.trim().is_empty())
        .take(MAX_LIST_ENTRIES)
        .map(|skill| {
            SkillAsk::new(
                truncate(skill.name.trim(), MAX_NAME_CHARS),
                skill.weight.unwrap_or(default_weight),
            )
        })
        .collect()
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_json() {
        let intent = parse_intent(
            r#"{"intent": "find billing help", "domains": ["billing"],
                "required_skills": [{"name": "billing", "weight": 0.9}],
                "preferred_skills": [], "search_strategy": "skill"}"#,
        )
        .unwrap();
        assert_eq!(intent.summary, "find billing help");
        assert_eq!(intent.domains, vec!["billing"]);
        assert_eq!(intent.required_skills.len(), 1);
        assert_eq!(intent.suggested_strategy, SuggestedStrategy::Skill);
    }

    #[test]
    fn parses_fenced_json() {
        let content = "```json\n{\"intent\": \"x\", \"domains\": []}\n```";
        let intent = parse_intent(content).unwrap();
        assert_eq!(intent.summary, "x");
        assert_eq!(intent.suggested_strategy, SuggestedStrategy::Fulltext);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            parse_intent("the right person is probably Dave"),
            Err(ExtractError::Malformed(_))
        ));
    }

    #[test]
    fn lists_are_bounded_and_weights_clamped() {
        let domains: Vec<String> = (0..20).map(|i| format!("\"d{i}\"")).collect();
        let content = format!(
            r#"{{"intent": "x", "domains": [{}],
                "required_skills": [{{"name": "{}", "weight": 7.5}}]}}"#,
            domains.join(","),
            "n".repeat(200),
        );
        let intent = parse_intent(&content).unwrap();
        assert_eq!(intent.domains.len(), 8);
        assert_eq!(intent.required_skills[0].weight, 1.0);
        assert_eq!(intent.required_skills[0].name.chars().count(), 64);
    }

    #[test]
    fn missing_weights_get_defaults() {
        let intent = parse_intent(
            r#"{"intent": "x",
                "required_skills": [{"name": "security"}],
                "preferred_skills": [{"name": "audit"}]}"#,
        )
        .unwrap();
        assert_eq!(intent.required_skills[0].weight, 1.0);
        assert_eq!(intent.preferred_skills[0].weight, 0.5);
    }

    #[test]
    fn disabled_provider_fails_fast() {
        assert!(matches!(
            DisabledProvider.extract("anything"),
            Err(ExtractError::Disabled)
        ));
    }
}
