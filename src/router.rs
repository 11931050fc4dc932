//! Query classifier.
//!
//! Assigns each raw query exactly one category by evaluating a fixed, ordered
//! rule list top-to-bottom, first match wins. Rules are declarative values so
//! new categories can be added without touching dispatch logic. Pure: no side
//! effects, total over all inputs.

use std::sync::LazyLock;

use regex::Regex;

use crate::storage::directory::LabelField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryCategory {
    DirectLookup,
    Conversational,
    SimpleSearch,
    Ambiguous,
    ComplexIntent,
}

/// Parameters a rule extracted from the query text, consumed by the strategy
/// the category dispatches to.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    Email(String),
    Label { field: LabelField, value: String },
    None,
}

#[derive(Debug, Clone)]
pub struct Route {
    pub category: QueryCategory,
    pub confidence: f32,
    pub extracted: Extracted,
    pub reasoning: &'static str,
}

/// One entry in the ordered rule table.
trait RouteRule: Send + Sync {
    fn evaluate(&self, raw: &str, lower: &str) -> Option<Route>;
    fn name(&self) -> &'static str;
}

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("email regex")
});

const CONVERSATIONAL_PHRASES: &[&str] = &[
    "hi", "hello", "hey", "thanks", "thank you", "thx", "bye", "goodbye", "yes", "no", "ok",
    "okay",
];

// Minimal stop-word list used only for the short-query check. Kept small on
// purpose: stripping content-adjacent words like "help" would misclassify
// real requests as ambiguous.
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "i", "me", "my", "you", "your", "is", "are", "in", "of", "to", "for", "on",
    "at", "with", "and", "or",
];

const AMBIGUOUS_TOKEN_THRESHOLD: usize = 3;

struct DirectLookupRule;

impl RouteRule for DirectLookupRule {
    fn evaluate(&self, raw: &str, _lower: &str) -> Option<Route> {
        let email = EMAIL_RE.find(raw)?;
        Some(Route {
            category: QueryCategory::DirectLookup,
            confidence: 1.0,
            extracted: Extracted::Email(email.as_str().to_string()),
            reasoning: "email address detected, direct lookup",
        })
    }

    fn name(&self) -> &'static str {
        "direct_lookup"
    }
}

struct ConversationalRule;

impl RouteRule for ConversationalRule {
    fn evaluate(&self, _raw: &str, lower: &str) -> Option<Route> {
        // Whole-message match only, after trimming surrounding punctuation.
        let stripped = lower.trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace());
        if CONVERSATIONAL_PHRASES.contains(&stripped) {
            Some(Route {
                category: QueryCategory::Conversational,
                confidence: 0.9,
                extracted: Extracted::None,
                reasoning: "conversational phrase",
            })
        } else {
            None
        }
    }

    fn name(&self) -> &'static str {
        "conversational"
    }
}

/// One simple-search template: a capture pattern bound to the label field it
/// searches.
struct Template {
    pattern: &'static LazyLock<Regex>,
    field: LabelField,
    /// Trailing characters removed from the captured span ("engineers" is
    /// searched as "engineer").
    strip_plural: bool,
}

static TEAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:find|show|get|who)\b.*?\b(?:in|from)\s+(?:the\s+)?(.+?)\s+(?:team|department|group|unit)\s*\??$",
    )
    .expect("team template")
});

static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:find|show|get|who)\b.*?\b(?:in|from|at)\s+(?:the\s+)?(.+?)\s+(?:office|location|site)\s*\??$",
    )
    .expect("location template")
});

static WHO_IS_IN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^who\s+is\s+in\s+(?:the\s+)?(.+?)\s*\??$").expect("who-is-in"));

static ROLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^show\s+me\s+(?:all\s+)?(?:the\s+)?(.+?)s\s*\??$").expect("role template")
});

static TEMPLATES: LazyLock<Vec<Template>> = LazyLock::new(|| {
    vec![
        Template {
            pattern: &TEAM_RE,
            field: LabelField::Team,
            strip_plural: false,
        },
        Template {
            pattern: &LOCATION_RE,
            field: LabelField::Location,
            strip_plural: false,
        },
        Template {
            pattern: &WHO_IS_IN_RE,
            field: LabelField::Team,
            strip_plural: false,
        },
        Template {
            pattern: &ROLE_RE,
            field: LabelField::Title,
            strip_plural: true,
        },
    ]
});

struct SimpleSearchRule;

impl RouteRule for SimpleSearchRule {
    fn evaluate(&self, _raw: &str, lower: &str) -> Option<Route> {
        for template in TEMPLATES.iter() {
            if let Some(caps) = template.pattern.captures(lower) {
                let mut value = caps.get(1)?.as_str().trim().to_string();
                if template.strip_plural {
                    value = value.trim_end_matches('s').to_string();
                }
                if value.is_empty() {
                    continue;
                }
                return Some(Route {
                    category: QueryCategory::SimpleSearch,
                    confidence: 0.8,
                    extracted: Extracted::Label {
                        field: template.field,
                        value,
                    },
                    reasoning: "simple search template matched",
                });
            }
        }
        None
    }

    fn name(&self) -> &'static str {
        "simple_search"
    }
}

struct ShortQueryRule;

impl RouteRule for ShortQueryRule {
    fn evaluate(&self, _raw: &str, lower: &str) -> Option<Route> {
        let content_tokens = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty() && !STOP_WORDS.contains(token))
            .count();
        if content_tokens < AMBIGUOUS_TOKEN_THRESHOLD {
            Some(Route {
                category: QueryCategory::Ambiguous,
                confidence: 0.3,
                extracted: Extracted::None,
                reasoning: "query too short, clarification needed",
            })
        } else {
            None
        }
    }

    fn name(&self) -> &'static str {
        "short_query"
    }
}

pub struct QueryRouter {
    rules: Vec<Box<dyn RouteRule>>,
}

impl Default for QueryRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryRouter {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(DirectLookupRule),
                Box::new(ConversationalRule),
                Box::new(SimpleSearchRule),
                Box::new(ShortQueryRule),
            ],
        }
    }

    /// Classify a query. Total: every input maps to exactly one category.
    pub fn classify(&self, query: &str) -> Route {
        let lower = query.trim().to_lowercase();
        for rule in &self.rules {
            if let Some(route) = rule.evaluate(query, &lower) {
                tracing::debug!(
                    rule = rule.name(),
                    confidence = route.confidence,
                    reason = route.reasoning,
                    "routed"
                );
                return route;
            }
        }
        let route = Route {
            category: QueryCategory::ComplexIntent,
            confidence: 0.7,
            extracted: Extracted::None,
            reasoning: "no direct pattern, semantic understanding needed",
        };
        tracing::debug!(
            rule = "default",
            confidence = route.confidence,
            reason = route.reasoning,
            "routed"
        );
        route
    }
}
