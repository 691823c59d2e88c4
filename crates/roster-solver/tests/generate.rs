//! Integration tests for week generation from a roster source

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use roster_core::source::InMemorySource;
use roster_core::wire::GenerateRequest;
use roster_core::{RosterError, SolveStatus, SourceError, ValidationError};
use roster_solver::{RosterOptimizer, SolverOptions};

const STORE: &str = r#"{
    "venues": [{
        "id": "bistro",
        "name": "Bistro",
        "templates": [
            { "weekday": 1, "shiftBlocks": [
                { "start": "09:00", "end": "17:00", "role": "chef", "count": 2 }
            ] },
            { "weekday": 6, "shiftBlocks": [
                { "start": "18:00", "end": "23:00", "role": "waiter", "count": 1 }
            ] }
        ],
        "staff": [
            { "id": "ana", "name": "Ana", "roles": ["chef"] },
            { "id": "bob", "name": "Bob", "roles": ["chef", "waiter"] },
            { "id": "cy", "name": "Cy", "roles": ["waiter"], "active": false }
        ],
        "availability": [
            { "staffId": "ana", "weekly": [ { "weekday": 1, "start": "08:00", "end": "18:00" } ] },
            { "staffId": "bob", "weekly": [
                { "weekday": 1, "start": "08:00", "end": "18:00" },
                { "weekday": 6, "start": "17:00", "end": "23:30" }
            ] },
            { "staffId": "dee", "weekly": [] }
        ]
    }]
}"#;

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
}

fn optimizer() -> RosterOptimizer {
    RosterOptimizer::with_options(SolverOptions::default().max_seconds(5.0))
}

#[test]
fn generates_and_fills_the_week() {
    let source = InMemorySource::from_json_str(STORE).unwrap();
    let request = GenerateRequest::new("bistro", monday());

    let roster = optimizer().generate(&source, &request).unwrap();

    let ids: Vec<&str> = roster.problem.slots.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "bistro_20250106_09:00_chef_0",
            "bistro_20250106_09:00_chef_1",
            "bistro_20250111_18:00_waiter_0",
        ]
    );
    assert_eq!(roster.outcome.status, SolveStatus::Optimal);
    assert!(roster.outcome.unfilled.is_empty());
    assert_eq!(
        roster.warnings,
        vec!["availability for unknown staff 'dee' ignored".to_string()]
    );

    // bob is the only active waiter but also needed as chef on Monday;
    // the Saturday shift does not overlap, so he can take both.
    let response = roster.to_response();
    let saturday = &response.shifts[2];
    assert_eq!(saturday.staff_id.as_deref(), Some("bob"));
    assert_eq!(saturday.staff_name.as_deref(), Some("Bob"));
    assert_eq!(saturday.venue_name, "Bistro");
    assert!(!saturday.locked);
}

#[test]
fn generated_locks_use_stable_ids() {
    let source = InMemorySource::from_json_str(STORE).unwrap();
    let mut request = GenerateRequest::new("bistro", monday());
    request
        .locked_assignments
        .insert("bistro_20250106_09:00_chef_0".into(), "bob".into());

    let roster = optimizer().generate(&source, &request).unwrap();

    assert_eq!(
        roster
            .outcome
            .assignee_of("bistro_20250106_09:00_chef_0")
            .and_then(|a| a.staff_id()),
        Some("bob")
    );
    assert!(roster.to_response().shifts[0].locked);
}

#[test]
fn unknown_venue_is_an_error() {
    let source = InMemorySource::from_json_str(STORE).unwrap();
    let request = GenerateRequest::new("diner", monday());

    let err = optimizer().generate(&source, &request).unwrap_err();

    assert!(matches!(
        err,
        RosterError::Source(SourceError::VenueNotFound(ref v)) if v == "diner"
    ));
}

#[test]
fn week_start_must_be_monday() {
    let source = InMemorySource::from_json_str(STORE).unwrap();
    let request = GenerateRequest::new("bistro", NaiveDate::from_ymd_opt(2025, 1, 8).unwrap());

    let err = optimizer().generate(&source, &request).unwrap_err();

    assert!(matches!(
        err,
        RosterError::Validation(ValidationError::WeekStartNotMonday(_))
    ));
}

#[test]
fn response_serializes_flat() {
    let source = InMemorySource::from_json_str(STORE).unwrap();
    let roster = optimizer()
        .generate(&source, &GenerateRequest::new("bistro", monday()))
        .unwrap();

    let json = serde_json::to_value(roster.to_response()).unwrap();

    assert_eq!(json["venueId"], "bistro");
    assert_eq!(json["venueName"], "Bistro");
    assert_eq!(json["shifts"][0]["venueName"], "Bistro");
    assert_eq!(json["weekStart"], "2025-01-06");
    assert_eq!(json["status"], "optimal");
    assert_eq!(json["shifts"].as_array().unwrap().len(), 3);
    assert!(json["assignments"].is_object());
    assert_eq!(json["warnings"][0], "availability for unknown staff 'dee' ignored");
}
