//! # roster-core
//!
//! Core domain model and traits for the roster optimizer.
//!
//! This crate provides:
//! - Domain types: `ShiftTemplate`, `ShiftSlot`, `StaffMember`, `RosterProblem`
//! - Result types: `RosterOutcome`, `SlotAssignment`, `InputIssue`
//! - Core traits: `Optimizer` (engine seam) and `source::RosterSource` (store seam)
//! - The JSON wire format (`wire`) and weekday/time normalization (`time`)
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::{NaiveDate, NaiveTime};
//! use roster_core::{RosterProblem, ShiftSlot, StaffMember};
//!
//! let monday = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
//! let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
//! let five = NaiveTime::from_hms_opt(17, 0, 0).unwrap();
//!
//! let problem = RosterProblem::new(
//!     vec![ShiftSlot::new("s1", "bistro", monday, nine, five, "chef")],
//!     vec![StaffMember::new("ana").name("Ana").role("chef")],
//! )
//! .with_prior("s1", "ana");
//!
//! assert!(problem.validate().is_ok());
//! ```

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

pub mod source;
pub mod time;
pub mod wire;

use crate::time::check_interval;

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique identifier for a staff member
pub type StaffId = String;

/// Unique identifier for a shift slot
pub type SlotId = String;

/// Unique identifier for a venue
pub type VenueId = String;

/// Role a staff member can be qualified for
pub type RoleId = String;

/// Wire spelling of the unfilled sentinel; never a valid staff id
pub const UNFILLED_ID: &str = "UNFILLED";

// ============================================================================
// Templates
// ============================================================================

/// One block of a weekday template, expanding into `count` identical slots
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftBlock {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub role: RoleId,
    /// Required headcount (>= 1)
    pub count: u32,
}

impl ShiftBlock {
    pub fn new(start: NaiveTime, end: NaiveTime, role: impl Into<String>) -> Self {
        Self {
            start,
            end,
            role: role.into(),
            count: 1,
        }
    }

    /// Set the required headcount
    pub fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }
}

/// Recurring shift requirements for one weekday
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftTemplate {
    pub weekday: Weekday,
    pub blocks: Vec<ShiftBlock>,
}

impl ShiftTemplate {
    pub fn new(weekday: Weekday) -> Self {
        Self {
            weekday,
            blocks: Vec::new(),
        }
    }

    /// Append a shift block
    pub fn block(mut self, block: ShiftBlock) -> Self {
        self.blocks.push(block);
        self
    }
}

// ============================================================================
// Slots
// ============================================================================

/// A concrete, dated unit of work
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftSlot {
    pub id: SlotId,
    pub venue_id: VenueId,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub role: RoleId,
}

impl ShiftSlot {
    pub fn new(
        id: impl Into<String>,
        venue_id: impl Into<String>,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            venue_id: venue_id.into(),
            date,
            start,
            end,
            role: role.into(),
        }
    }

    /// Weekday of the slot, always derived from its date
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// Two slots overlap when they share a date and their intervals intersect
    pub fn overlaps(&self, other: &ShiftSlot) -> bool {
        self.date == other.date && self.start < other.end && other.start < self.end
    }

    /// Check that the slot lies inside `[start, end]`
    pub fn fits_within(&self, start: NaiveTime, end: NaiveTime) -> bool {
        start <= self.start && end >= self.end
    }
}

// ============================================================================
// Staff
// ============================================================================

/// Recurring weekly availability
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub weekday: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl AvailabilityWindow {
    pub fn new(weekday: Weekday, start: NaiveTime, end: NaiveTime) -> Self {
        Self { weekday, start, end }
    }

    /// Whether this window fully contains the slot
    pub fn covers(&self, slot: &ShiftSlot) -> bool {
        self.weekday == slot.weekday() && self.start <= slot.start && self.end >= slot.end
    }
}

/// Date-specific override of the weekly windows
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityException {
    pub date: NaiveDate,
    pub available: bool,
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
}

impl AvailabilityException {
    /// Not available at all on `date`
    pub fn unavailable(date: NaiveDate) -> Self {
        Self {
            date,
            available: false,
            start: None,
            end: None,
        }
    }

    /// Available all day on `date`, regardless of weekly windows
    pub fn available(date: NaiveDate) -> Self {
        Self {
            date,
            available: true,
            start: None,
            end: None,
        }
    }

    /// Available only within `[start, end]` on `date`
    pub fn available_between(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            date,
            available: true,
            start: Some(start),
            end: Some(end),
        }
    }

    /// The window the exception narrows the day to. Both bounds are needed;
    /// with either one missing the whole day is available.
    pub fn window(&self) -> Option<(NaiveTime, NaiveTime)> {
        self.start.zip(self.end)
    }

    pub fn has_window(&self) -> bool {
        self.window().is_some()
    }
}

/// A person who can be rostered
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    /// Display name
    pub name: String,
    pub roles: BTreeSet<RoleId>,
    /// Inactive staff are never eligible
    pub active: bool,
    pub weekly: Vec<AvailabilityWindow>,
    pub exceptions: Vec<AvailabilityException>,
}

impl StaffMember {
    /// Create an active staff member with the given ID
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            roles: BTreeSet::new(),
            active: true,
            weekly: Vec::new(),
            exceptions: Vec::new(),
        }
    }

    /// Set the display name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add a qualified role
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    pub fn roles(mut self, roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        for role in roles {
            self.roles.insert(role.into());
        }
        self
    }

    /// Mark as inactive
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Add a weekly availability window
    pub fn window(mut self, window: AvailabilityWindow) -> Self {
        self.weekly.push(window);
        self
    }

    /// Add a date exception
    pub fn exception(mut self, exception: AvailabilityException) -> Self {
        self.exceptions.push(exception);
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// First exception recorded for `date`; later ones for the same date are shadowed
    pub fn exception_for(&self, date: NaiveDate) -> Option<&AvailabilityException> {
        self.exceptions.iter().find(|e| e.date == date)
    }
}

// ============================================================================
// Assignments
// ============================================================================

/// Who holds a slot: a staff member or the unfilled sentinel
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Assignee {
    Staff(StaffId),
    Unfilled,
}

impl Assignee {
    /// Parse a wire id; `UNFILLED` maps to the sentinel
    pub fn from_id(id: &str) -> Self {
        if id == UNFILLED_ID {
            Assignee::Unfilled
        } else {
            Assignee::Staff(id.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Assignee::Staff(id) => id,
            Assignee::Unfilled => UNFILLED_ID,
        }
    }

    pub fn staff_id(&self) -> Option<&str> {
        match self {
            Assignee::Staff(id) => Some(id),
            Assignee::Unfilled => None,
        }
    }

    pub fn is_unfilled(&self) -> bool {
        matches!(self, Assignee::Unfilled)
    }
}

impl std::fmt::Display for Assignee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for Assignee {
    fn from(id: String) -> Self {
        Assignee::from_id(&id)
    }
}

impl From<Assignee> for String {
    fn from(assignee: Assignee) -> Self {
        assignee.as_str().to_string()
    }
}

/// A pin that must hold in any solution
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedAssignment {
    pub slot_id: SlotId,
    pub assignee: Assignee,
}

/// Assignment from the last approved schedule; only biases the objective
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorAssignment {
    pub slot_id: SlotId,
    pub staff_id: StaffId,
}

// ============================================================================
// Problem
// ============================================================================

/// Everything one solve consumes. Immutable once handed to the engine.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterProblem {
    pub slots: Vec<ShiftSlot>,
    pub staff: Vec<StaffMember>,
    pub locks: Vec<LockedAssignment>,
    pub priors: Vec<PriorAssignment>,
}

impl RosterProblem {
    pub fn new(slots: Vec<ShiftSlot>, staff: Vec<StaffMember>) -> Self {
        Self {
            slots,
            staff,
            locks: Vec::new(),
            priors: Vec::new(),
        }
    }

    /// Pin a slot to a staff id (or `UNFILLED`)
    pub fn with_lock(mut self, slot_id: impl Into<String>, assignee: impl Into<String>) -> Self {
        self.locks.push(LockedAssignment {
            slot_id: slot_id.into(),
            assignee: Assignee::from(assignee.into()),
        });
        self
    }

    /// Record the last approved assignee of a slot
    pub fn with_prior(mut self, slot_id: impl Into<String>, staff_id: impl Into<String>) -> Self {
        self.priors.push(PriorAssignment {
            slot_id: slot_id.into(),
            staff_id: staff_id.into(),
        });
        self
    }

    pub fn get_slot(&self, id: &str) -> Option<&ShiftSlot> {
        self.slots.iter().find(|s| s.id == id)
    }

    pub fn get_staff(&self, id: &str) -> Option<&StaffMember> {
        self.staff.iter().find(|s| s.id == id)
    }

    /// Structural checks that must pass before a model is built
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut slot_ids = HashSet::new();
        for slot in &self.slots {
            if slot.id.is_empty() {
                return Err(ValidationError::Empty {
                    field: "slot id".into(),
                });
            }
            if !slot_ids.insert(slot.id.as_str()) {
                return Err(ValidationError::DuplicateSlot(slot.id.clone()));
            }
            check_interval(&format!("slot '{}'", slot.id), slot.start, slot.end)?;
        }

        let mut staff_ids = HashSet::new();
        for staff in &self.staff {
            if staff.id.is_empty() {
                return Err(ValidationError::Empty {
                    field: "staff id".into(),
                });
            }
            if staff.id == UNFILLED_ID {
                return Err(ValidationError::ReservedStaffId(staff.id.clone()));
            }
            if !staff_ids.insert(staff.id.as_str()) {
                return Err(ValidationError::DuplicateStaff(staff.id.clone()));
            }
            for (i, window) in staff.weekly.iter().enumerate() {
                check_interval(
                    &format!("staff '{}' weekly[{}]", staff.id, i),
                    window.start,
                    window.end,
                )?;
            }
            for (i, exception) in staff.exceptions.iter().enumerate() {
                if let (Some(start), Some(end)) = (exception.start, exception.end) {
                    check_interval(
                        &format!("staff '{}' exceptions[{}]", staff.id, i),
                        start,
                        end,
                    )?;
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Outcome (Result)
// ============================================================================

/// How the search ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// Proven optimal
    Optimal,
    /// Best solution found before the time bound
    Feasible,
    /// The hard constraints cannot all hold
    Infeasible,
    /// Time bound reached without any solution
    Unknown,
}

impl SolveStatus {
    /// A solution exists and was extracted
    pub fn has_solution(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Feasible => "feasible",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Final decision for one slot
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub slot_id: SlotId,
    pub assignee: Assignee,
    /// Explanation for humans; never parsed back
    pub reason: String,
}

/// Lock or prior entries that could not be applied as written
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputIssueKind {
    LockUnknownSlot,
    LockUnknownStaff,
    LockIneligible,
    PriorUnknownSlot,
    PriorUnknownStaff,
    PriorIneligible,
    PriorDuplicate,
}

impl InputIssueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InputIssueKind::LockUnknownSlot => "lock_unknown_slot",
            InputIssueKind::LockUnknownStaff => "lock_unknown_staff",
            InputIssueKind::LockIneligible => "lock_ineligible",
            InputIssueKind::PriorUnknownSlot => "prior_unknown_slot",
            InputIssueKind::PriorUnknownStaff => "prior_unknown_staff",
            InputIssueKind::PriorIneligible => "prior_ineligible",
            InputIssueKind::PriorDuplicate => "prior_duplicate",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputIssue {
    pub kind: InputIssueKind,
    pub slot_id: SlotId,
    pub staff_id: StaffId,
    pub detail: String,
}

impl std::fmt::Display for InputIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (slot '{}', staff '{}'): {}",
            self.kind.as_str(),
            self.slot_id,
            self.staff_id,
            self.detail
        )
    }
}

/// Size and quality figures of one run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveStats {
    /// Objective value of the returned solution
    pub objective: Option<i64>,
    pub variables: usize,
    pub constraints: usize,
    /// Slots whose prior assignee was not kept
    pub stability_changes: usize,
    pub elapsed_ms: u64,
}

/// The result of optimizing a roster
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterOutcome {
    pub status: SolveStatus,
    /// One entry per slot, in input slot order
    pub assignments: Vec<SlotAssignment>,
    /// Ids of unfilled slots, in input slot order
    pub unfilled: Vec<SlotId>,
    pub issues: Vec<InputIssue>,
    pub stats: SolveStats,
}

impl RosterOutcome {
    pub fn assignment(&self, slot_id: &str) -> Option<&SlotAssignment> {
        self.assignments.iter().find(|a| a.slot_id == slot_id)
    }

    pub fn assignee_of(&self, slot_id: &str) -> Option<&Assignee> {
        self.assignment(slot_id).map(|a| &a.assignee)
    }

    pub fn filled_count(&self) -> usize {
        self.assignments.len() - self.unfilled.len()
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Core optimization abstraction
pub trait Optimizer: Send + Sync {
    /// Assign staff to every slot of the problem
    fn optimize(&self, problem: &RosterProblem) -> Result<RosterOutcome, RosterError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Malformed input, detected before any model is built
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid time '{value}' in {field}: expected HH:MM")]
    InvalidTime { field: String, value: String },

    #[error("invalid date '{value}' in {field}: expected YYYY-MM-DD")]
    InvalidDate { field: String, value: String },

    #[error("invalid weekday {value} in {field}: expected 1 (Monday) to 7 (Sunday)")]
    InvalidWeekday { field: String, value: i64 },

    #[error("slot '{slot_id}': weekday {weekday} does not match date {date} (weekday {actual})")]
    WeekdayMismatch {
        slot_id: SlotId,
        weekday: i64,
        date: NaiveDate,
        actual: u8,
    },

    #[error("{field}: start {start} must be before end {end}")]
    EmptyInterval {
        field: String,
        start: String,
        end: String,
    },

    #[error("duplicate slot id '{0}'")]
    DuplicateSlot(SlotId),

    #[error("duplicate staff id '{0}'")]
    DuplicateStaff(StaffId),

    #[error("staff id '{0}' is reserved for the unfilled sentinel")]
    ReservedStaffId(StaffId),

    #[error("{field}: headcount must be at least 1")]
    ZeroHeadcount { field: String },

    #[error("week start {0} is not a Monday")]
    WeekStartNotMonday(NaiveDate),

    #[error("{field} must not be empty")]
    Empty { field: String },
}

/// Failure to read templates, staff or availability from a store
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("venue not found: {0}")]
    VenueNotFound(VenueId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed store: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Errors that stop a run before a result exists
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("roster source: {0}")]
    Source(#[from] SourceError),

    #[error("invalid objective weights: {0}")]
    InvalidWeights(String),

    #[error(
        "model too large: objective bound {bound} exceeds the solver range \
         ({slots} slots, {stability_terms} stability terms)"
    )]
    ModelTooLarge {
        bound: i64,
        slots: usize,
        stability_terms: usize,
    },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn slot_weekday_follows_date() {
        let slot = ShiftSlot::new("s", "v", date(2025, 1, 6), t(9, 0), t(17, 0), "chef");
        assert_eq!(slot.weekday(), Weekday::Mon);
    }

    #[test]
    fn overlap_needs_same_date_and_intersection() {
        let monday = date(2025, 1, 6);
        let a = ShiftSlot::new("a", "v", monday, t(9, 0), t(17, 0), "chef");
        let b = ShiftSlot::new("b", "v", monday, t(16, 0), t(22, 0), "chef");
        let c = ShiftSlot::new("c", "v", monday, t(17, 0), t(23, 0), "chef");
        let d = ShiftSlot::new("d", "v", date(2025, 1, 7), t(9, 0), t(17, 0), "chef");

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c), "back-to-back shifts do not overlap");
        assert!(!a.overlaps(&d));
    }

    #[test]
    fn window_covers_only_contained_slots() {
        let monday = date(2025, 1, 6);
        let window = AvailabilityWindow::new(Weekday::Mon, t(8, 0), t(18, 0));
        let inside = ShiftSlot::new("a", "v", monday, t(9, 0), t(17, 0), "chef");
        let spills = ShiftSlot::new("b", "v", monday, t(17, 0), t(19, 0), "chef");
        let tuesday = ShiftSlot::new("c", "v", date(2025, 1, 7), t(9, 0), t(17, 0), "chef");

        assert!(window.covers(&inside));
        assert!(!window.covers(&spills));
        assert!(!window.covers(&tuesday));
    }

    #[test]
    fn assignee_wire_spelling() {
        assert_eq!(Assignee::from_id("UNFILLED"), Assignee::Unfilled);
        assert_eq!(Assignee::from_id("ana"), Assignee::Staff("ana".into()));
        assert_eq!(Assignee::Unfilled.to_string(), "UNFILLED");
        assert_eq!(
            serde_json::to_string(&Assignee::Staff("ana".into())).unwrap(),
            "\"ana\""
        );
    }

    #[test]
    fn validate_rejects_duplicate_slots() {
        let monday = date(2025, 1, 6);
        let problem = RosterProblem::new(
            vec![
                ShiftSlot::new("s", "v", monday, t(9, 0), t(17, 0), "chef"),
                ShiftSlot::new("s", "v", monday, t(9, 0), t(17, 0), "chef"),
            ],
            vec![],
        );
        assert_eq!(
            problem.validate(),
            Err(ValidationError::DuplicateSlot("s".into()))
        );
    }

    #[test]
    fn validate_rejects_reserved_staff_id() {
        let problem = RosterProblem::new(vec![], vec![StaffMember::new(UNFILLED_ID)]);
        assert!(matches!(
            problem.validate(),
            Err(ValidationError::ReservedStaffId(_))
        ));
    }

    #[test]
    fn validate_rejects_backwards_window() {
        let staff = StaffMember::new("ana").window(AvailabilityWindow::new(
            Weekday::Mon,
            t(18, 0),
            t(8, 0),
        ));
        let err = RosterProblem::new(vec![], vec![staff])
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("staff 'ana' weekly[0]"));
    }

    #[test]
    fn staff_builder() {
        let staff = StaffMember::new("ana")
            .name("Ana Ruiz")
            .roles(["chef", "waiter"])
            .exception(AvailabilityException::unavailable(date(2025, 1, 6)))
            .exception(AvailabilityException::available(date(2025, 1, 6)));

        assert_eq!(staff.name, "Ana Ruiz");
        assert!(staff.has_role("waiter"));
        assert!(staff.active);
        // first exception for a date wins
        assert!(!staff.exception_for(date(2025, 1, 6)).unwrap().available);
        assert!(staff.exception_for(date(2025, 1, 7)).is_none());
    }

    #[test]
    fn fits_within_inclusive_bounds() {
        let slot = ShiftSlot::new("s", "v", date(2025, 1, 6), t(9, 0), t(17, 0), "chef");
        assert!(slot.fits_within(t(9, 0), t(17, 0)));
        assert!(!slot.fits_within(t(10, 0), t(17, 0)));
        assert!(!slot.fits_within(t(8, 0), t(16, 0)));
    }

    #[test]
    fn half_open_exception_has_no_window() {
        let monday = date(2025, 1, 6);
        let start_only = AvailabilityException {
            date: monday,
            available: true,
            start: Some(t(12, 0)),
            end: None,
        };
        assert!(!start_only.has_window());
        assert_eq!(
            AvailabilityException::available_between(monday, t(9, 0), t(17, 0)).window(),
            Some((t(9, 0), t(17, 0)))
        );
    }
}
