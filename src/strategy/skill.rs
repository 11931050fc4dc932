//! Skill-weighted scoring.
//!
//! For each active employee:
//!
//! ```text
//! raw   = sum( effective_weight * match_value * verification_bonus )
//!         - MISSING_REQUIRED_PENALTY per required skill with zero record
//! raw   = raw * (COVERAGE_FLOOR + (1 - COVERAGE_FLOOR) * required_coverage)
//! score = clamp(raw / max_possible, 0, 1)
//! ```
//!
//! The coverage multiplier keeps an employee missing several required skills
//! from outscoring a fully-covered one on preferred-skill depth alone.

use std::collections::HashMap;

use crate::error::Result;
use crate::model::{Proficiency, SkillRecord};
use crate::storage::DirectoryStore;
use crate::strategy::{RawMatch, Strategy};

pub const VERIFIED_BONUS: f32 = 1.08;
pub const PREFERRED_MULTIPLIER: f32 = 0.33;
pub const MISSING_REQUIRED_PENALTY: f32 = 0.25;
pub const COVERAGE_FLOOR: f32 = 0.7;

/// One requested skill with its caller-supplied importance in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct SkillAsk {
    pub name: String,
    pub weight: f32,
}

impl SkillAsk {
    pub fn new(name: impl Into<String>, weight: f32) -> Self {
        Self {
            name: name.into(),
            weight: weight.clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SkillQuery {
    pub required: Vec<SkillAsk>,
    pub preferred: Vec<SkillAsk>,
    pub target: Option<Proficiency>,
}

impl SkillQuery {
    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.preferred.is_empty()
    }

    fn target(&self) -> Proficiency {
        self.target.unwrap_or(Proficiency::Skilled)
    }
}

pub struct SkillWeighted {
    pub query: SkillQuery,
}

impl Strategy for SkillWeighted {
    fn execute(&self, store: &DirectoryStore<'_>) -> Result<Vec<RawMatch>> {
        if self.query.is_empty() {
            return Ok(Vec::new());
        }

        let employees = store.active_employees()?;
        let matrix = skill_matrix(store.skill_records()?);
        let empty = HashMap::new();

        let mut matches = Vec::new();
        for employee in employees {
            let skills = matrix.get(&employee.id).unwrap_or(&empty);
            let outcome = score_employee(&self.query, skills);
            if outcome.score > 0.0 {
                let mut m = RawMatch {
                    employee,
                    raw_score: outcome.score,
                    reasons: outcome.reasons,
                    ownership: None,
                };
                if m.reasons.is_empty() {
                    m.reasons.push("Skill profile match".to_string());
                }
                matches.push(m);
            }
        }
        Ok(matches)
    }

    fn name(&self) -> &'static str {
        "skill_weighted"
    }
}

fn skill_matrix(records: Vec<SkillRecord>) -> HashMap<i64, HashMap<String, SkillRecord>> {
    let mut matrix: HashMap<i64, HashMap<String, SkillRecord>> = HashMap::new();
    for record in records {
        matrix
            .entry(record.employee_id)
            .or_default()
            .insert(record.skill_name.to_lowercase(), record);
    }
    matrix
}

struct ScoreOutcome {
    score: f32,
    reasons: Vec<String>,
}

/// Fractional credit below target: one level short 0.5, two 0.25, more 0.
fn match_value(actual: Proficiency, target: Proficiency) -> f32 {
    match actual.shortfall(target) {
        0 => 1.0,
        1 => 0.5,
        2 => 0.25,
        _ => 0.0,
    }
}

/// Score one employee's skill map against the query. Exposed to the property
/// tests, which exercise monotonicity and the coverage penalty directly.
pub fn score_employee_skills(
    query: &SkillQuery,
    skills: &HashMap<String, SkillRecord>,
) -> f32 {
    score_employee(query, skills).score
}

fn score_employee(query: &SkillQuery, skills: &HashMap<String, SkillRecord>) -> ScoreOutcome {
    let target = query.target();
    let mut raw = 0.0f32;
    let mut max_possible = 0.0f32;
    let mut required_met = 0usize;
    let mut missing_required = 0usize;
    let mut reasons = Vec::new();

    for ask in &query.required {
        max_possible += ask.weight * VERIFIED_BONUS;
        match skills.get(&ask.name.to_lowercase()) {
            Some(record) => {
                let mv = match_value(record.proficiency, target);
                let bonus = if record.is_verified { VERIFIED_BONUS } else { 1.0 };
                raw += ask.weight * mv * bonus;
                if record.proficiency >= target {
                    required_met += 1;
                }
                reasons.push(skill_reason(record));
            }
            None => missing_required += 1,
        }
    }

    for ask in &query.preferred {
        let weight = ask.weight * PREFERRED_MULTIPLIER;
        max_possible += weight * VERIFIED_BONUS;
        if let Some(record) = skills.get(&ask.name.to_lowercase()) {
            let mv = match_value(record.proficiency, target);
            let bonus = if record.is_verified { VERIFIED_BONUS } else { 1.0 };
            raw += weight * mv * bonus;
            reasons.push(skill_reason(record));
        }
    }

    raw -= MISSING_REQUIRED_PENALTY * missing_required as f32;

    let coverage = if query.required.is_empty() {
        1.0
    } else {
        required_met as f32 / query.required.len() as f32
    };
    raw *= COVERAGE_FLOOR + (1.0 - COVERAGE_FLOOR) * coverage;

    let score = if max_possible > 0.0 {
        (raw / max_possible).clamp(0.0, 1.0)
    } else {
        0.0
    };

    ScoreOutcome { score, reasons }
}

fn skill_reason(record: &SkillRecord) -> String {
    if record.is_verified {
        format!(
            "Has {} skill: {} (verified)",
            record.proficiency.as_str(),
            record.skill_name
        )
    } else {
        format!(
            "Has {} skill: {}",
            record.proficiency.as_str(),
            record.skill_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, level: Proficiency, verified: bool) -> (String, SkillRecord) {
        (
            name.to_lowercase(),
            SkillRecord {
                employee_id: 1,
                skill_name: name.to_string(),
                proficiency: level,
                is_verified: verified,
            },
        )
    }

    fn query(required: &[(&str, f32)], preferred: &[(&str, f32)]) -> SkillQuery {
        SkillQuery {
            required: required
                .iter()
                .map(|(name, weight)| SkillAsk::new(*name, *weight))
                .collect(),
            preferred: preferred
                .iter()
                .map(|(name, weight)| SkillAsk::new(*name, *weight))
                .collect(),
            target: Some(Proficiency::Skilled),
        }
    }

    #[test]
    fn full_match_verified_scores_one() {
        let q = query(&[("networking", 1.0)], &[]);
        let skills =
            HashMap::from([record("networking", Proficiency::Expert, true)]);
        let score = score_employee_skills(&q, &skills);
        assert!((score - 1.0).abs() < 1e-6, "score was {score}");
    }

    #[test]
    fn unverified_scores_below_verified() {
        let q = query(&[("networking", 1.0)], &[]);
        let verified = HashMap::from([record("networking", Proficiency::Expert, true)]);
        let unverified = HashMap::from([record("networking", Proficiency::Expert, false)]);
        assert!(
            score_employee_skills(&q, &verified) > score_employee_skills(&q, &unverified)
        );
    }

    #[test]
    fn shortfall_discounts_apply() {
        let q = SkillQuery {
            required: vec![SkillAsk::new("networking", 1.0)],
            preferred: vec![],
            target: Some(Proficiency::Advanced),
        };
        let one_short = HashMap::from([record("networking", Proficiency::Skilled, false)]);
        let two_short = HashMap::from([record("networking", Proficiency::Awareness, false)]);
        let met = HashMap::from([record("networking", Proficiency::Advanced, false)]);

        let s_met = score_employee_skills(&q, &met);
        let s_one = score_employee_skills(&q, &one_short);
        let s_two = score_employee_skills(&q, &two_short);
        assert!(s_met > s_one && s_one > s_two && s_two > 0.0);
    }

    #[test]
    fn missing_all_required_loses_to_full_coverage() {
        // Both have the same preferred overlap; one is missing every
        // required skill.
        let q = query(&[("security", 1.0), ("compliance", 1.0)], &[("audit", 0.5)]);
        let covered = HashMap::from([
            record("security", Proficiency::Skilled, false),
            record("compliance", Proficiency::Skilled, false),
            record("audit", Proficiency::Expert, true),
        ]);
        let uncovered = HashMap::from([record("audit", Proficiency::Expert, true)]);

        let s_covered = score_employee_skills(&q, &covered);
        let s_uncovered = score_employee_skills(&q, &uncovered);
        assert!(s_covered > s_uncovered, "{s_covered} vs {s_uncovered}");
    }

    #[test]
    fn preferred_only_query_scores_without_coverage_penalty() {
        let q = query(&[], &[("reporting", 1.0)]);
        let skills = HashMap::from([record("reporting", Proficiency::Skilled, false)]);
        let score = score_employee_skills(&q, &skills);
        assert!(score > 0.0);
    }

    #[test]
    fn no_records_scores_zero() {
        let q = query(&[("security", 1.0)], &[]);
        assert_eq!(score_employee_skills(&q, &HashMap::new()), 0.0);
    }

    #[test]
    fn empty_query_skipped() {
        let db = crate::storage::Database::open_in_memory().unwrap();
        let store = DirectoryStore::new(&db);
        let strategy = SkillWeighted {
            query: SkillQuery::default(),
        };
        assert!(strategy.execute(&store).unwrap().is_empty());
    }
}
