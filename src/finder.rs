//! The finder agent: validate → classify → dispatch → rank → respond.
//!
//! Every condition except an empty query or an unreachable store degrades to
//! a lower-confidence but well-formed response.

use uuid::Uuid;

use crate::config::Config;
use crate::error::{EfError, Result};
use crate::intent::{ExtractError, IntentProvider, QueryIntent, SuggestedStrategy};
use crate::model::{ConfidenceLabel, FinderResponse, ScoredCandidate};
use crate::ranking;
use crate::router::{Extracted, QueryCategory, QueryRouter, Route};
use crate::storage::directory::LabelField;
use crate::storage::{Database, DirectoryStore};
use crate::strategy::{
    ExactEmail, FulltextSearch, LabelPattern, OwnershipLookup, RawMatch, SkillAsk, SkillQuery,
    SkillWeighted, Strategy,
};

/// Domain vocabulary: maps a domain to the keywords that signal it. Used by
/// the rule-based intent parse when no extractor result is available.
const DOMAIN_KEYWORDS: &[(&str, &[&str])] = &[
    ("provisioning", &["provision", "provisioning", "setup", "configure", "deployment"]),
    ("network", &["network", "networking", "infrastructure", "connectivity", "wan", "lan"]),
    ("security", &["security", "secure", "compliance", "risk", "audit", "governance"]),
    ("billing", &["billing", "invoice", "payment", "charge", "revenue"]),
    ("support", &["support", "helpdesk", "issue", "problem", "troubleshoot", "fix"]),
    ("sales", &["sales", "sell", "customer", "client", "account", "commercial"]),
    ("product", &["product", "feature", "roadmap", "requirement"]),
    ("engineering", &["engineer", "develop", "build", "code", "technical", "software"]),
    ("data", &["data", "analytics", "reporting", "insight"]),
    ("project", &["project", "programme", "initiative", "delivery"]),
];

/// Known responsibility areas and the phrases that trigger an ownership
/// lookup for them.
const RESPONSIBILITY_AREAS: &[(&str, &[&str])] = &[
    ("bia provisioning", &["bia", "business impact analysis", "provisioning"]),
    ("network setup", &["network setup", "network infrastructure"]),
    ("compliance", &["compliance", "risk", "audit", "governance"]),
    ("customer support", &["customer support", "helpdesk", "service desk"]),
    ("billing operations", &["billing", "invoice", "payment"]),
];

/// Role labels recommended per domain (role before person).
const DOMAIN_ROLES: &[(&str, &[&str])] = &[
    ("provisioning", &["Provisioning Specialist", "Network Engineer", "Technical Lead"]),
    ("network", &["Network Engineer", "Infrastructure Specialist", "Network Architect"]),
    ("security", &["Security Specialist", "Compliance Officer", "Risk Manager"]),
    ("billing", &["Billing Specialist", "Revenue Operations", "Finance Analyst"]),
    ("support", &["Support Engineer", "Customer Support Lead", "Service Desk"]),
    ("sales", &["Sales Engineer", "Account Manager", "Commercial Lead"]),
    ("product", &["Product Manager", "Product Owner", "Product Lead"]),
    ("engineering", &["Software Engineer", "Technical Lead", "Engineering Manager"]),
    ("data", &["Data Analyst", "BI Specialist", "Analytics Lead"]),
    ("project", &["Project Manager", "Programme Manager", "Delivery Lead"]),
];

const MAX_ROLE_LABELS: usize = 5;
const DOMAIN_SKILL_WEIGHT: f32 = 0.8;

pub struct EmployeeFinder<'a> {
    store: DirectoryStore<'a>,
    router: QueryRouter,
    provider: &'a dyn IntentProvider,
    config: &'a Config,
}

/// What the dispatch phase produced, before ranking.
struct Dispatch {
    lists: Vec<Vec<RawMatch>>,
    domains: Vec<String>,
    responsibilities: Vec<String>,
    summary_override: Option<String>,
    /// The extractor was configured but failed; cap confidence and say so.
    extractor_fell_back: bool,
}

impl Dispatch {
    fn empty() -> Self {
        Self {
            lists: Vec::new(),
            domains: Vec::new(),
            responsibilities: Vec::new(),
            summary_override: None,
            extractor_fell_back: false,
        }
    }
}

impl<'a> EmployeeFinder<'a> {
    pub fn new(db: &'a Database, provider: &'a dyn IntentProvider, config: &'a Config) -> Self {
        Self {
            store: DirectoryStore::new(db),
            router: QueryRouter::new(),
            provider,
            config,
        }
    }

    /// Process one query end to end.
    pub fn process_query(
        &self,
        query: &str,
        session_id: Option<&str>,
    ) -> Result<FinderResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(EfError::InvalidInput("query text is empty".to_string()));
        }
        let session_id = session_id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let route = self.router.classify(query);
        tracing::info!(
            category = ?route.category,
            confidence = route.confidence,
            reason = route.reasoning,
            session = %session_id,
            "query classified"
        );

        let dispatch = self.dispatch(query, &route)?;

        let ranked = ranking::rank(dispatch.lists, self.config.finder.max_recommendations);
        let candidates = ranking::enrich(ranked, &self.store)?;

        let mut label = ranking::confidence_label(&candidates, route.confidence);
        if dispatch.extractor_fell_back {
            label = label.capped_at(ConfidenceLabel::Medium);
        }

        let understanding_summary = dispatch.summary_override.clone().unwrap_or_else(|| {
            understanding_summary(query, &dispatch.domains, &dispatch.responsibilities)
        });
        let recommended_role_labels = role_labels(&dispatch.domains);
        let next_step_hints = next_step_hints(&candidates, &route, dispatch.extractor_fell_back);

        Ok(FinderResponse {
            understanding_summary,
            recommended_role_labels,
            disclaimer: disclaimer(label),
            candidates,
            confidence_label: label,
            next_step_hints,
            session_id,
        })
    }

    fn dispatch(&self, query: &str, route: &Route) -> Result<Dispatch> {
        match route.category {
            QueryCategory::DirectLookup => {
                let Extracted::Email(email) = &route.extracted else {
                    return Ok(Dispatch::empty());
                };
                let mut dispatch = Dispatch::empty();
                dispatch.lists.push(
                    ExactEmail {
                        email: email.clone(),
                    }
                    .execute(&self.store)?,
                );
                dispatch.summary_override =
                    Some(format!("Looking up the directory entry for {email}."));
                Ok(dispatch)
            }
            QueryCategory::SimpleSearch => {
                let Extracted::Label { field, value } = &route.extracted else {
                    return Ok(Dispatch::empty());
                };
                let mut dispatch = Dispatch::empty();
                dispatch.lists.push(
                    LabelPattern {
                        field: *field,
                        value: value.clone(),
                    }
                    .execute(&self.store)?,
                );
                dispatch.summary_override = Some(format!(
                    "Searching the directory for people matching '{value}'."
                ));
                Ok(dispatch)
            }
            QueryCategory::Conversational => self.dispatch_conversational(query),
            QueryCategory::Ambiguous => self.dispatch_ambiguous(query),
            QueryCategory::ComplexIntent => self.dispatch_complex(query),
        }
    }

    fn dispatch_conversational(&self, query: &str) -> Result<Dispatch> {
        match self.try_extract(query) {
            Some(Ok(intent)) => self.search_with_intent(query, intent),
            Some(Err(())) => {
                let mut dispatch = Dispatch::empty();
                dispatch.extractor_fell_back = true;
                dispatch.summary_override = Some(greeting_summary());
                Ok(dispatch)
            }
            None => {
                let mut dispatch = Dispatch::empty();
                dispatch.summary_override = Some(greeting_summary());
                Ok(dispatch)
            }
        }
    }

    fn dispatch_ambiguous(&self, query: &str) -> Result<Dispatch> {
        match self.try_extract(query) {
            Some(Ok(intent)) => self.search_with_intent(query, intent),
            extractor_outcome => {
                let mut dispatch = Dispatch::empty();
                dispatch.extractor_fell_back = matches!(extractor_outcome, Some(Err(())));
                // Thin queries still get a best-effort keyword pass.
                dispatch.lists.push(
                    FulltextSearch {
                        query: query.to_string(),
                        limit: self.config.finder.max_recommendations,
                    }
                    .execute(&self.store)?,
                );
                dispatch.summary_override = Some(
                    "Your query is quite brief. Here is a best-effort match; adding detail \
                     about the area or expertise you need will sharpen the results."
                        .to_string(),
                );
                Ok(dispatch)
            }
        }
    }

    fn dispatch_complex(&self, query: &str) -> Result<Dispatch> {
        match self.try_extract(query) {
            Some(Ok(intent)) => self.search_with_intent(query, intent),
            Some(Err(())) => {
                let mut dispatch = self.search_with_rules(query)?;
                dispatch.extractor_fell_back = true;
                Ok(dispatch)
            }
            None => self.search_with_rules(query),
        }
    }

    /// One extraction attempt. `None` when no extractor is configured,
    /// `Some(Err(()))` when a configured extractor failed (timeout, HTTP,
    /// malformed schema), which is never retried.
    fn try_extract(&self, query: &str) -> Option<std::result::Result<QueryIntent, ()>> {
        match self.provider.extract(query) {
            Ok(intent) => Some(Ok(intent)),
            Err(ExtractError::Disabled) => None,
            Err(err) => {
                tracing::warn!(provider = self.provider.name(), "intent extraction failed: {err}");
                Some(Err(()))
            }
        }
    }

    /// Search parametrized by a successfully extracted intent.
    fn search_with_intent(&self, query: &str, intent: QueryIntent) -> Result<Dispatch> {
        let mut dispatch = Dispatch::empty();
        dispatch.domains = intent.domains.clone();
        if !intent.summary.is_empty() {
            dispatch.summary_override = Some(intent.summary.clone());
        }

        match intent.suggested_strategy {
            SuggestedStrategy::Ownership => {
                for domain in &intent.domains {
                    dispatch.lists.push(
                        OwnershipLookup {
                            phrase: domain.clone(),
                        }
                        .execute(&self.store)?,
                    );
                    dispatch.responsibilities.push(domain.clone());
                }
            }
            SuggestedStrategy::Label => {
                if let Some(domain) = intent.domains.first() {
                    dispatch.lists.push(
                        LabelPattern {
                            field: LabelField::Team,
                            value: domain.clone(),
                        }
                        .execute(&self.store)?,
                    );
                }
            }
            SuggestedStrategy::Skill | SuggestedStrategy::Fulltext => {}
        }

        let skill_query = SkillQuery {
            required: intent.required_skills,
            preferred: intent.preferred_skills,
            target: None,
        };
        if !skill_query.is_empty() {
            dispatch
                .lists
                .push(SkillWeighted { query: skill_query }.execute(&self.store)?);
        }

        self.fulltext_backstop(query, &mut dispatch)?;
        Ok(dispatch)
    }

    /// Search driven by the fixed keyword tables: ownership first, then
    /// skills by domain, then the full-text backstop.
    fn search_with_rules(&self, query: &str) -> Result<Dispatch> {
        let mut dispatch = Dispatch::empty();
        let lower = query.to_lowercase();

        for (area, triggers) in RESPONSIBILITY_AREAS {
            if triggers.iter().any(|trigger| lower.contains(trigger)) {
                dispatch.responsibilities.push((*area).to_string());
                dispatch.lists.push(
                    OwnershipLookup {
                        phrase: (*area).to_string(),
                    }
                    .execute(&self.store)?,
                );
            }
        }

        let domains: Vec<String> = DOMAIN_KEYWORDS
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|keyword| lower.contains(keyword)))
            .map(|(domain, _)| (*domain).to_string())
            .collect();

        if !domains.is_empty() {
            let skill_query = SkillQuery {
                required: domains
                    .iter()
                    .map(|domain| SkillAsk::new(domain.clone(), DOMAIN_SKILL_WEIGHT))
                    .collect(),
                preferred: Vec::new(),
                target: None,
            };
            dispatch
                .lists
                .push(SkillWeighted { query: skill_query }.execute(&self.store)?);
        }
        dispatch.domains = domains;

        self.fulltext_backstop(query, &mut dispatch)?;
        Ok(dispatch)
    }

    fn fulltext_backstop(&self, query: &str, dispatch: &mut Dispatch) -> Result<()> {
        let found: usize = dispatch.lists.iter().map(Vec::len).sum();
        if found < self.config.finder.fulltext_backstop_below {
            dispatch.lists.push(
                FulltextSearch {
                    query: query.to_string(),
                    limit: self.config.finder.max_recommendations,
                }
                .execute(&self.store)?,
            );
        }
        Ok(())
    }
}

fn greeting_summary() -> String {
    "Happy to help you find the right people. Tell me what you need help with, \
     for example an area like provisioning or billing, or a skill you are looking for."
        .to_string()
}

fn understanding_summary(query: &str, domains: &[String], responsibilities: &[String]) -> String {
    if !responsibilities.is_empty() {
        format!(
            "You're looking for help with {}. Let me find the right people for this.",
            responsibilities.join(", ")
        )
    } else if !domains.is_empty() {
        format!(
            "You need expertise in {}. I'll connect you with the relevant team members.",
            domains.join(", ")
        )
    } else {
        format!("I understand you need help with: '{query}'. Here are the most relevant contacts.")
    }
}

fn role_labels(domains: &[String]) -> Vec<String> {
    let mut labels = Vec::new();
    for domain in domains {
        if let Some((_, roles)) = DOMAIN_ROLES.iter().find(|(name, _)| name == domain) {
            for role in *roles {
                let role = (*role).to_string();
                if !labels.contains(&role) {
                    labels.push(role);
                }
            }
        }
    }
    labels.truncate(MAX_ROLE_LABELS);
    labels
}

fn next_step_hints(
    candidates: &[ScoredCandidate],
    route: &Route,
    extractor_fell_back: bool,
) -> Vec<String> {
    let mut hints = Vec::new();

    if extractor_fell_back {
        hints.push(
            "Automated understanding was limited for this query; results are keyword-based."
                .to_string(),
        );
    }

    if candidates.is_empty() {
        hints.push("Try broadening your query or using different keywords.".to_string());
        if route.category == QueryCategory::Ambiguous {
            hints.push(
                "Mention the specific area (like provisioning, billing, support) or the \
                 expertise you need."
                    .to_string(),
            );
        }
        hints.push("Your people leader can also point you to the right team.".to_string());
    } else {
        hints.push("Review the recommended contacts and reach out to the top match first.".to_string());
        if candidates
            .iter()
            .any(|c| c.escalation_contact.is_some())
        {
            hints.push("If you get no response, escalate to the listed people leader.".to_string());
        }
    }

    hints
}

fn disclaimer(label: ConfidenceLabel) -> String {
    let base = "This recommendation is based on current role, team ownership, and recorded skills. ";
    match label {
        ConfidenceLabel::High => {
            format!("{base}The suggested contacts are highly likely to help with your query.")
        }
        ConfidenceLabel::Medium => format!(
            "{base}If this doesn't fully resolve your query, try a more specific search or \
             escalate via the listed people leader."
        ),
        ConfidenceLabel::Low => format!(
            "{base}Match confidence is lower than usual; please verify with the contact or \
             refine your query."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_labels_dedup_and_cap() {
        let labels = role_labels(&[
            "network".to_string(),
            "provisioning".to_string(),
            "security".to_string(),
        ]);
        assert_eq!(labels.len(), MAX_ROLE_LABELS);
        // "Network Engineer" appears under both network and provisioning.
        assert_eq!(
            labels.iter().filter(|l| l.as_str() == "Network Engineer").count(),
            1
        );
    }

    #[test]
    fn summary_prefers_responsibilities_over_domains() {
        let summary = understanding_summary(
            "q",
            &["billing".to_string()],
            &["billing operations".to_string()],
        );
        assert!(summary.contains("billing operations"));
    }
}
