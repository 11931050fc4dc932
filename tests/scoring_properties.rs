//! Property tests over the skill scoring math and the ranking merge.

use std::collections::HashMap;

use proptest::prelude::*;

use ef::model::{Employee, Proficiency, SkillRecord};
use ef::ranking;
use ef::strategy::skill::score_employee_skills;
use ef::strategy::{RawMatch, SkillAsk, SkillQuery};

fn proficiency_strategy() -> impl Strategy<Value = Proficiency> {
    prop_oneof![
        Just(Proficiency::Awareness),
        Just(Proficiency::Skilled),
        Just(Proficiency::Advanced),
        Just(Proficiency::Expert),
    ]
}

fn record(name: &str, proficiency: Proficiency, verified: bool) -> SkillRecord {
    SkillRecord {
        employee_id: 1,
        skill_name: name.to_string(),
        proficiency,
        is_verified: verified,
    }
}

fn skills(records: Vec<SkillRecord>) -> HashMap<String, SkillRecord> {
    records
        .into_iter()
        .map(|r| (r.skill_name.to_lowercase(), r))
        .collect()
}

fn employee(id: i64, name: &str) -> Employee {
    Employee {
        id,
        formal_name: name.to_string(),
        email_address: format!("{id}@company.co"),
        position_title: "Engineer".to_string(),
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

proptest! {
    /// Scores always land inside the unit interval.
    #[test]
    fn score_is_bounded(
        weight in 0.0f32..=1.0,
        proficiency in proficiency_strategy(),
        verified in any::<bool>(),
    ) {
        let query = SkillQuery {
            required: vec![SkillAsk::new("rust", weight)],
            preferred: vec![],
            target: None,
        };
        let score = score_employee_skills(&query, &skills(vec![record("rust", proficiency, verified)]));
        prop_assert!((0.0..=1.0).contains(&score));
    }

    /// A verified record never scores below the identical unverified one.
    #[test]
    fn verification_never_hurts(
        weight in 0.1f32..=1.0,
        proficiency in proficiency_strategy(),
    ) {
        let query = SkillQuery {
            required: vec![SkillAsk::new("rust", weight)],
            preferred: vec![],
            target: None,
        };
        let verified = score_employee_skills(&query, &skills(vec![record("rust", proficiency, true)]));
        let unverified = score_employee_skills(&query, &skills(vec![record("rust", proficiency, false)]));
        prop_assert!(verified >= unverified);
    }

    /// Higher proficiency never scores lower, at any target level.
    #[test]
    fn proficiency_is_monotonic(
        weight in 0.1f32..=1.0,
        target in proficiency_strategy(),
    ) {
        let query = SkillQuery {
            required: vec![SkillAsk::new("rust", weight)],
            preferred: vec![],
            target: Some(target),
        };
        let levels = [
            Proficiency::Awareness,
            Proficiency::Skilled,
            Proficiency::Advanced,
            Proficiency::Expert,
        ];
        let scores: Vec<f32> = levels
            .iter()
            .map(|&p| score_employee_skills(&query, &skills(vec![record("rust", p, false)])))
            .collect();
        for pair in scores.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
    }

    /// Someone covering every required skill beats someone missing one of
    /// them, regardless of preferred-skill depth on the other side.
    #[test]
    fn full_required_coverage_wins(preferred_weight in 0.0f32..=1.0) {
        let query = SkillQuery {
            required: vec![
                SkillAsk::new("rust", 1.0),
                SkillAsk::new("sql", 1.0),
            ],
            preferred: vec![SkillAsk::new("docs", preferred_weight)],
            target: None,
        };
        let covered = score_employee_skills(&query, &skills(vec![
            record("rust", Proficiency::Skilled, false),
            record("sql", Proficiency::Skilled, false),
        ]));
        let partial = score_employee_skills(&query, &skills(vec![
            record("rust", Proficiency::Expert, true),
            record("docs", Proficiency::Expert, true),
        ]));
        prop_assert!(covered > partial);
    }

    /// Merging duplicate candidates keeps the maximum score, never a sum.
    #[test]
    fn merge_keeps_max_score(
        a in 0.0f32..=1.0,
        b in 0.0f32..=1.0,
    ) {
        let lists = vec![
            vec![RawMatch::new(employee(1, "Ada"), a, "first")],
            vec![RawMatch::new(employee(1, "Ada"), b, "second")],
        ];
        let ranked = ranking::rank(lists, 10);
        prop_assert_eq!(ranked.len(), 1);
        prop_assert_eq!(ranked[0].raw_score, a.max(b));
    }

    /// Ranking is deterministic up to input order of the candidate lists.
    #[test]
    fn rank_ignores_list_order(scores in prop::collection::vec(0.0f32..=1.0, 1..6)) {
        let forward: Vec<Vec<RawMatch>> = scores
            .iter()
            .enumerate()
            .map(|(i, &s)| vec![RawMatch::new(employee(i as i64, &format!("E{i:02}")), s, "match")])
            .collect();
        let mut reversed = forward.clone();
        reversed.reverse();

        let a: Vec<i64> = ranking::rank(forward, 10).iter().map(|m| m.employee.id).collect();
        let b: Vec<i64> = ranking::rank(reversed, 10).iter().map(|m| m.employee.id).collect();
        prop_assert_eq!(a, b);
    }

    /// Truncation respects the requested bound.
    #[test]
    fn rank_respects_top_n(count in 1usize..20, top_n in 1usize..10) {
        let lists: Vec<Vec<RawMatch>> = (0..count)
            .map(|i| vec![RawMatch::new(employee(i as i64, &format!("E{i:02}")), 0.5, "match")])
            .collect();
        prop_assert!(ranking::rank(lists, top_n).len() <= top_n);
    }
}
