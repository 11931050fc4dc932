//! Domain types shared across the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A directory entry. Email is unique and immutable once assigned; the
/// `people_leader_id` self-reference is only ever resolved one hop at read
/// time (cycle prevention is a write-time concern of the import layer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub formal_name: String,
    pub email_address: String,
    pub position_title: String,
    pub function: Option<String>,
    pub business_unit: Option<String>,
    pub team: Option<String>,
    pub location: Option<String>,
    pub people_leader_id: Option<i64>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Ordered 4-level skill mastery scale. The ordering is load-bearing:
/// scoring compares actual vs target level directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Proficiency {
    Awareness = 1,
    Skilled = 2,
    Advanced = 3,
    Expert = 4,
}

impl Proficiency {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "awareness" => Some(Self::Awareness),
            "skilled" => Some(Self::Skilled),
            "advanced" => Some(Self::Advanced),
            "expert" => Some(Self::Expert),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Awareness => "awareness",
            Self::Skilled => "skilled",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }

    /// Levels short of `target`, 0 when at or above it.
    pub fn shortfall(self, target: Self) -> u8 {
        (target as i8 - self as i8).max(0) as u8
    }
}

/// One employee × skill association as read from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillRecord {
    pub employee_id: i64,
    pub skill_name: String,
    pub proficiency: Proficiency,
    pub is_verified: bool,
}

/// Kind of responsibility assignment. Ordering is the display/tie-break
/// order: primary before backup before escalation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnershipKind {
    Primary,
    Backup,
    Escalation,
}

impl OwnershipKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "primary" => Some(Self::Primary),
            "backup" => Some(Self::Backup),
            "escalation" => Some(Self::Escalation),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Backup => "backup",
            Self::Escalation => "escalation",
        }
    }
}

/// An active ownership row joined with its employee.
#[derive(Debug, Clone)]
pub struct OwnershipRecord {
    pub employee: Employee,
    pub responsibility_area: String,
    pub kind: OwnershipKind,
}

/// Coarse reliability summary shown to the user. Never alters ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLabel {
    High,
    Medium,
    Low,
}

impl ConfidenceLabel {
    /// Clamp to at most `ceiling` (used when the intent extractor failed and
    /// the response was produced by a fallback strategy).
    pub fn capped_at(self, ceiling: Self) -> Self {
        // High < Medium < Low in declaration order, so "worse" is max.
        if rank(self) >= rank(ceiling) { self } else { ceiling }
    }
}

fn rank(label: ConfidenceLabel) -> u8 {
    match label {
        ConfidenceLabel::High => 0,
        ConfidenceLabel::Medium => 1,
        ConfidenceLabel::Low => 2,
    }
}

/// Ephemeral per-query result row. Created by the ranking engine, serialized
/// into the response, then discarded.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate {
    pub employee: Employee,
    /// Bounded to [0, 1].
    pub score: f32,
    pub reasons: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ownership_kind: Option<OwnershipKind>,
    /// Immediate manager, one hop only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalation_contact: Option<Employee>,
}

/// Complete response for one query. Always well-formed: the only conditions
/// that terminate a query without one are InvalidInput and StoreUnavailable.
#[derive(Debug, Clone, Serialize)]
pub struct FinderResponse {
    pub understanding_summary: String,
    pub recommended_role_labels: Vec<String>,
    pub candidates: Vec<ScoredCandidate>,
    pub confidence_label: ConfidenceLabel,
    pub next_step_hints: Vec<String>,
    pub disclaimer: String,
    pub session_id: String,
}
