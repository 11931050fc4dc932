//! End-to-end scenarios through the finder against a seeded store.

use ef::config::Config;
use ef::finder::EmployeeFinder;
use ef::intent::DisabledProvider;
use ef::model::{ConfidenceLabel, OwnershipKind};
use ef::test_utils::fixture_database;

fn config() -> Config {
    Config::default()
}

#[test]
fn email_query_returns_exactly_that_employee() {
    let db = fixture_database().unwrap();
    let cfg = config();
    let finder = EmployeeFinder::new(&db, &DisabledProvider, &cfg);

    let response = finder.process_query("alice.j@company.co", None).unwrap();

    assert_eq!(response.candidates.len(), 1);
    let top = &response.candidates[0];
    assert_eq!(top.employee.formal_name, "Alice Johnson");
    assert_eq!(top.score, 1.0);
    assert_eq!(top.reasons, vec!["Exact email match"]);
    assert_eq!(response.confidence_label, ConfidenceLabel::High);
}

#[test]
fn email_query_attaches_escalation_contact() {
    let db = fixture_database().unwrap();
    let cfg = config();
    let finder = EmployeeFinder::new(&db, &DisabledProvider, &cfg);

    let response = finder.process_query("alice.j@company.co", None).unwrap();
    let contact = response.candidates[0].escalation_contact.as_ref().unwrap();
    assert_eq!(contact.formal_name, "Morgan Vale");
}

#[test]
fn unknown_email_is_not_an_error() {
    let db = fixture_database().unwrap();
    let cfg = config();
    let finder = EmployeeFinder::new(&db, &DisabledProvider, &cfg);

    let response = finder.process_query("ghost@company.co", None).unwrap();
    assert!(response.candidates.is_empty());
    assert!(!response.next_step_hints.is_empty());
    assert_eq!(response.confidence_label, ConfidenceLabel::Low);
}

#[test]
fn billing_team_query_finds_exactly_the_billing_employees() {
    let db = fixture_database().unwrap();
    let cfg = config();
    let finder = EmployeeFinder::new(&db, &DisabledProvider, &cfg);

    let response = finder
        .process_query("Find someone in billing team", None)
        .unwrap();

    assert_eq!(response.candidates.len(), 3);
    let names: Vec<&str> = response
        .candidates
        .iter()
        .map(|c| c.employee.formal_name.as_str())
        .collect();
    // Alphabetical by name, all at the fixed pattern score.
    assert_eq!(names, vec!["Dana Brook", "Evan Cole", "Fiona Adams"]);
    assert!(response.candidates.iter().all(|c| c.score == 0.8));
}

#[test]
fn ownership_query_orders_primary_before_backup() {
    let db = fixture_database().unwrap();
    let cfg = config();
    let finder = EmployeeFinder::new(&db, &DisabledProvider, &cfg);

    let response = finder
        .process_query("I need help with BIA provisioning", None)
        .unwrap();

    assert_eq!(response.candidates.len(), 2);
    let primary = &response.candidates[0];
    let backup = &response.candidates[1];

    assert_eq!(primary.employee.formal_name, "Ben Okafor");
    assert_eq!(primary.score, 0.9);
    assert_eq!(primary.ownership_kind, Some(OwnershipKind::Primary));
    assert!(primary
        .reasons
        .contains(&"Primary owner of: bia provisioning".to_string()));

    assert_eq!(backup.employee.formal_name, "Alice Johnson");
    assert_eq!(backup.score, 0.6);
    assert_eq!(backup.ownership_kind, Some(OwnershipKind::Backup));
}

#[test]
fn conversational_query_is_well_formed_with_hints() {
    let db = fixture_database().unwrap();
    let cfg = config();
    let finder = EmployeeFinder::new(&db, &DisabledProvider, &cfg);

    let response = finder.process_query("Thanks!", None).unwrap();
    assert!(response.candidates.is_empty());
    assert!(!response.next_step_hints.is_empty());
    assert!(!response.understanding_summary.is_empty());
}

#[test]
fn ambiguous_query_prompts_for_detail() {
    let db = fixture_database().unwrap();
    let cfg = config();
    let finder = EmployeeFinder::new(&db, &DisabledProvider, &cfg);

    let response = finder.process_query("billing help", None).unwrap();
    assert!(!response.next_step_hints.is_empty());
    assert_ne!(response.confidence_label, ConfidenceLabel::High);
}

#[test]
fn empty_query_is_rejected_before_classification() {
    let db = fixture_database().unwrap();
    let cfg = config();
    let finder = EmployeeFinder::new(&db, &DisabledProvider, &cfg);

    assert!(matches!(
        finder.process_query("   ", None),
        Err(ef::EfError::InvalidInput(_))
    ));
}

#[test]
fn session_id_round_trips_and_defaults() {
    let db = fixture_database().unwrap();
    let cfg = config();
    let finder = EmployeeFinder::new(&db, &DisabledProvider, &cfg);

    let response = finder
        .process_query("alice.j@company.co", Some("session-42"))
        .unwrap();
    assert_eq!(response.session_id, "session-42");

    let response = finder.process_query("alice.j@company.co", None).unwrap();
    assert!(!response.session_id.is_empty());
}

#[test]
fn complex_query_recommends_roles_before_people() {
    let db = fixture_database().unwrap();
    let cfg = config();
    let finder = EmployeeFinder::new(&db, &DisabledProvider, &cfg);

    let response = finder
        .process_query("who can help me configure the new network infrastructure", None)
        .unwrap();
    assert!(response
        .recommended_role_labels
        .contains(&"Network Engineer".to_string()));
    assert!(response.recommended_role_labels.len() <= 5);
}

#[test]
fn responses_are_deterministic_for_the_same_query() {
    let db = fixture_database().unwrap();
    let cfg = config();
    let finder = EmployeeFinder::new(&db, &DisabledProvider, &cfg);

    let run = || {
        finder
            .process_query("Find someone in billing team", None)
            .unwrap()
            .candidates
            .iter()
            .map(|c| (c.employee.id, c.score.to_bits()))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}
