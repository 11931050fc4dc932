//! Scoring & ranking engine.
//!
//! Normalizes heterogeneous strategy outputs into one scored-candidate list:
//! merge by employee (max score, distinct reasons, strongest ownership kind),
//! order with fixed tie-breaks, bound to top N, then enrich each survivor
//! with its escalation contact.

use std::collections::HashMap;

use crate::error::Result;
use crate::model::{ConfidenceLabel, OwnershipKind, ScoredCandidate};
use crate::storage::DirectoryStore;
use crate::strategy::RawMatch;

pub const DEFAULT_TOP_N: usize = 10;

// Documented label thresholds (boundary-tested): high needs a strong top
// score AND a confident routing; medium needs a moderate top score OR a
// primary owner in the set.
pub const HIGH_SCORE_FLOOR: f32 = 0.8;
pub const HIGH_ROUTING_FLOOR: f32 = 0.8;
pub const MEDIUM_SCORE_FLOOR: f32 = 0.5;

/// Merge one or more strategy outputs and order them deterministically.
///
/// The same employee surfaced by two strategies keeps the maximum raw score,
/// never the sum: two strategies often surface the same underlying fact.
/// Reasons concatenate, distinct only.
pub fn rank(lists: Vec<Vec<RawMatch>>, top_n: usize) -> Vec<RawMatch> {
    let mut merged: HashMap<i64, RawMatch> = HashMap::new();
    for raw in lists.into_iter().flatten() {
        match merged.get_mut(&raw.employee.id) {
            Some(existing) => {
                existing.raw_score = existing.raw_score.max(raw.raw_score);
                for reason in raw.reasons {
                    if !existing.reasons.contains(&reason) {
                        existing.reasons.push(reason);
                    }
                }
                existing.ownership = best_ownership(existing.ownership, raw.ownership);
            }
            None => {
                merged.insert(raw.employee.id, raw);
            }
        }
    }

    let mut ordered: Vec<RawMatch> = merged.into_values().collect();
    ordered.sort_by(|a, b| {
        b.raw_score
            .total_cmp(&a.raw_score)
            .then_with(|| ownership_rank(a.ownership).cmp(&ownership_rank(b.ownership)))
            .then_with(|| a.employee.formal_name.cmp(&b.employee.formal_name))
            // Distinct employees can share a name; id keeps the order total.
            .then_with(|| a.employee.id.cmp(&b.employee.id))
    });
    ordered.truncate(top_n);
    ordered
}

/// Attach the immediate manager of each candidate as an escalation contact.
/// One hop only; an absent manager just leaves the field empty.
pub fn enrich(ordered: Vec<RawMatch>, store: &DirectoryStore<'_>) -> Result<Vec<ScoredCandidate>> {
    let mut candidates = Vec::with_capacity(ordered.len());
    for raw in ordered {
        let escalation_contact = store.manager_of(&raw.employee)?;
        candidates.push(ScoredCandidate {
            score: raw.raw_score.clamp(0.0, 1.0),
            employee: raw.employee,
            reasons: raw.reasons,
            ownership_kind: raw.ownership,
            escalation_contact,
        });
    }
    Ok(candidates)
}

/// Derive the coarse reliability label from the top score and the router's
/// classification confidence. Exposed alongside results, never reorders them.
pub fn confidence_label(
    candidates: &[ScoredCandidate],
    routing_confidence: f32,
) -> ConfidenceLabel {
    let Some(top) = candidates.first() else {
        return ConfidenceLabel::Low;
    };
    let has_primary = candidates
        .iter()
        .any(|c| c.ownership_kind == Some(OwnershipKind::Primary));

    if top.score >= HIGH_SCORE_FLOOR && routing_confidence >= HIGH_ROUTING_FLOOR {
        ConfidenceLabel::High
    } else if top.score >= MEDIUM_SCORE_FLOOR || has_primary {
        ConfidenceLabel::Medium
    } else {
        ConfidenceLabel::Low
    }
}

fn ownership_rank(kind: Option<OwnershipKind>) -> u8 {
    match kind {
        Some(OwnershipKind::Primary) => 0,
        Some(OwnershipKind::Backup) => 1,
        Some(OwnershipKind::Escalation) => 2,
        None => 3,
    }
}

fn best_ownership(
    a: Option<OwnershipKind>,
    b: Option<OwnershipKind>,
) -> Option<OwnershipKind> {
    if ownership_rank(a) <= ownership_rank(b) {
        a
    } else {
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Employee;

    fn employee(id: i64, name: &str) -> Employee {
        Employee {
            id,
            formal_name: name.to_string(),
            email_address: format!("{}@company.co", name.to_lowercase().replace(' ', ".")),
            position_title: "Analyst".to_string(),
            function: None,
            business_unit: None,
            team: None,
            location: None,
            people_leader_id: None,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn raw(id: i64, name: &str, score: f32, reason: &str) -> RawMatch {
        RawMatch::new(employee(id, name), score, reason)
    }

    #[test]
    fn merge_keeps_max_score_not_sum() {
        let lists = vec![
            vec![raw(1, "Alice", 0.9, "Primary owner of: billing")],
            vec![raw(1, "Alice", 0.4, "Keyword match in profile")],
        ];
        let ranked = rank(lists, DEFAULT_TOP_N);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].raw_score, 0.9);
        assert_eq!(ranked[0].reasons.len(), 2);
    }

    #[test]
    fn merge_drops_duplicate_reasons() {
        let lists = vec![
            vec![raw(1, "Alice", 0.8, "Keyword match in profile")],
            vec![raw(1, "Alice", 0.8, "Keyword match in profile")],
        ];
        let ranked = rank(lists, DEFAULT_TOP_N);
        assert_eq!(ranked[0].reasons, vec!["Keyword match in profile"]);
    }

    #[test]
    fn primary_before_backup_on_equal_score() {
        let mut primary = raw(1, "Zoe", 0.7, "Primary owner of: compliance");
        primary.ownership = Some(OwnershipKind::Primary);
        let mut backup = raw(2, "Adam", 0.7, "Backup owner of: compliance");
        backup.ownership = Some(OwnershipKind::Backup);

        // Adam sorts first alphabetically; ownership must win the tie-break.
        let ranked = rank(vec![vec![backup, primary]], DEFAULT_TOP_N);
        assert_eq!(ranked[0].employee.formal_name, "Zoe");
        assert_eq!(ranked[1].employee.formal_name, "Adam");
    }

    #[test]
    fn equal_everything_falls_back_to_name() {
        let ranked = rank(
            vec![vec![raw(2, "Bob", 0.8, "x"), raw(1, "Alice", 0.8, "x")]],
            DEFAULT_TOP_N,
        );
        assert_eq!(ranked[0].employee.formal_name, "Alice");
    }

    #[test]
    fn ranking_is_deterministic_across_runs() {
        let build = || {
            vec![vec![
                raw(3, "Cara", 0.5, "a"),
                raw(1, "Alice", 0.5, "b"),
                raw(2, "Bob", 0.9, "c"),
            ]]
        };
        let first: Vec<i64> = rank(build(), DEFAULT_TOP_N)
            .iter()
            .map(|m| m.employee.id)
            .collect();
        let second: Vec<i64> = rank(build(), DEFAULT_TOP_N)
            .iter()
            .map(|m| m.employee.id)
            .collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![2, 1, 3]);
    }

    #[test]
    fn namesakes_order_by_id() {
        // Same name, score, and ownership kind; only the id differs.
        let lists = vec![vec![
            raw(7, "Alex Reed", 0.8, "x"),
            raw(3, "Alex Reed", 0.8, "y"),
        ]];
        let first: Vec<i64> = rank(lists.clone(), DEFAULT_TOP_N)
            .iter()
            .map(|m| m.employee.id)
            .collect();
        let second: Vec<i64> = rank(lists, DEFAULT_TOP_N)
            .iter()
            .map(|m| m.employee.id)
            .collect();
        assert_eq!(first, vec![3, 7]);
        assert_eq!(first, second);
    }

    #[test]
    fn truncates_to_top_n() {
        let list: Vec<RawMatch> = (0..20)
            .map(|i| raw(i, &format!("Person {i:02}"), 0.5, "x"))
            .collect();
        assert_eq!(rank(vec![list], 10).len(), 10);
    }

    #[test]
    fn merged_ownership_keeps_strongest_kind() {
        let mut backup = raw(1, "Alice", 0.6, "Backup owner of: billing");
        backup.ownership = Some(OwnershipKind::Backup);
        let mut primary = raw(1, "Alice", 0.9, "Primary owner of: payments");
        primary.ownership = Some(OwnershipKind::Primary);

        let ranked = rank(vec![vec![backup], vec![primary]], DEFAULT_TOP_N);
        assert_eq!(ranked[0].ownership, Some(OwnershipKind::Primary));
    }

    fn candidate(score: f32, kind: Option<OwnershipKind>) -> ScoredCandidate {
        ScoredCandidate {
            employee: employee(1, "Alice"),
            score,
            reasons: vec![],
            ownership_kind: kind,
            escalation_contact: None,
        }
    }

    #[test]
    fn label_boundaries() {
        // Exactly at both floors: high.
        assert_eq!(
            confidence_label(&[candidate(0.8, None)], 0.8),
            ConfidenceLabel::High
        );
        // Strong score, weak routing: medium.
        assert_eq!(
            confidence_label(&[candidate(0.9, None)], 0.7),
            ConfidenceLabel::Medium
        );
        // At the medium floor.
        assert_eq!(
            confidence_label(&[candidate(0.5, None)], 0.3),
            ConfidenceLabel::Medium
        );
        // Below medium floor but a primary owner present.
        assert_eq!(
            confidence_label(&[candidate(0.4, Some(OwnershipKind::Primary))], 0.3),
            ConfidenceLabel::Medium
        );
        // Weak everything.
        assert_eq!(
            confidence_label(&[candidate(0.4, None)], 0.3),
            ConfidenceLabel::Low
        );
        // Empty result set.
        assert_eq!(confidence_label(&[], 1.0), ConfidenceLabel::Low);
    }
}
