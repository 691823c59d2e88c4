//! Integration tests for request validation
//!
//! Malformed requests must be rejected before any model is built, with the
//! offending slot, staff member or field named in the error.

use roster_core::wire::OptimizeRequest;
use roster_core::{ValidationError, UNFILLED_ID};

fn request(staff: &str, slots: &str) -> OptimizeRequest {
    let json = format!(r#"{{ "staff": [{staff}], "shiftSlots": [{slots}] }}"#);
    serde_json::from_str(&json).unwrap()
}

const CHEF: &str = r#"{ "id": "ana", "name": "Ana", "roles": ["chef"] }"#;
const MONDAY_SLOT: &str = r#"{ "slotId": "s1", "venueId": "bistro", "weekday": 1,
    "date": "2025-01-06", "start": "09:00", "end": "17:00", "role": "chef" }"#;

#[test]
fn well_formed_request_validates() {
    let problem = request(CHEF, MONDAY_SLOT).into_problem().unwrap();
    assert_eq!(problem.slots.len(), 1);
    assert_eq!(problem.staff.len(), 1);
}

#[test]
fn duplicate_slot_ids_are_rejected() {
    let slots = format!("{MONDAY_SLOT}, {MONDAY_SLOT}");
    assert_eq!(
        request(CHEF, &slots).into_problem(),
        Err(ValidationError::DuplicateSlot("s1".into()))
    );
}

#[test]
fn duplicate_staff_ids_are_rejected() {
    let staff = format!("{CHEF}, {CHEF}");
    assert_eq!(
        request(&staff, MONDAY_SLOT).into_problem(),
        Err(ValidationError::DuplicateStaff("ana".into()))
    );
}

#[test]
fn sentinel_id_is_reserved() {
    let staff = CHEF.replace("\"ana\"", &format!("\"{UNFILLED_ID}\""));
    assert_eq!(
        request(&staff, MONDAY_SLOT).into_problem(),
        Err(ValidationError::ReservedStaffId(UNFILLED_ID.into()))
    );
}

#[test]
fn overnight_slots_are_rejected() {
    let slot = MONDAY_SLOT
        .replace("\"09:00\"", "\"22:00\"")
        .replace("\"17:00\"", "\"02:00\"");
    let err = request(CHEF, &slot).into_problem().unwrap_err();
    assert_eq!(
        err.to_string(),
        "slot 's1': start 22:00 must be before end 02:00"
    );
}

#[test]
fn sunday_is_seven() {
    let slot = MONDAY_SLOT
        .replace("\"weekday\": 1", "\"weekday\": 7")
        .replace("2025-01-06", "2025-01-12");
    assert!(request(CHEF, &slot).into_problem().is_ok());

    let zero = MONDAY_SLOT.replace("\"weekday\": 1", "\"weekday\": 0");
    assert!(matches!(
        request(CHEF, &zero).into_problem(),
        Err(ValidationError::InvalidWeekday { value: 0, .. })
    ));
}

#[test]
fn exception_window_must_move_forward() {
    let staff = r#"{ "id": "ana", "name": "Ana", "roles": ["chef"],
        "exceptions": [{ "date": "2025-01-06", "available": true, "start": "18:00", "end": "09:00" }] }"#;
    let err = request(staff, MONDAY_SLOT).into_problem().unwrap_err();
    assert!(matches!(err, ValidationError::EmptyInterval { .. }));
    assert!(err.to_string().contains("staff 'ana' exceptions[0]"));
}
