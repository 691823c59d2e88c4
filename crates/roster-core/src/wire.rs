//! JSON wire format for the optimize and generate surfaces.
//!
//! Times and dates travel as strings and are parsed here, so a malformed
//! field is reported with the slot or staff it belongs to instead of as a
//! bare deserializer position.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::time::{format_time, iso_number, parse_date, parse_time, weekday_from_iso};
use crate::{
    Assignee, AvailabilityException, AvailabilityWindow, InputIssue, LockedAssignment,
    PriorAssignment, RosterOutcome, RosterProblem, ShiftSlot, SlotId, SolveStatus, StaffId,
    StaffMember, ValidationError, VenueId,
};

// ============================================================================
// Request DTOs
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowDto {
    /// 1 = Monday .. 7 = Sunday
    pub weekday: i64,
    pub start: String,
    pub end: String,
}

impl WindowDto {
    pub fn to_window(&self, field: &str) -> Result<AvailabilityWindow, ValidationError> {
        Ok(AvailabilityWindow::new(
            weekday_from_iso(&format!("{field}.weekday"), self.weekday)?,
            parse_time(&format!("{field}.start"), &self.start)?,
            parse_time(&format!("{field}.end"), &self.end)?,
        ))
    }
}

impl From<&AvailabilityWindow> for WindowDto {
    fn from(w: &AvailabilityWindow) -> Self {
        Self {
            weekday: i64::from(iso_number(w.weekday)),
            start: format_time(w.start),
            end: format_time(w.end),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDto {
    pub date: String,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

impl ExceptionDto {
    pub fn to_exception(&self, field: &str) -> Result<AvailabilityException, ValidationError> {
        let start = self
            .start
            .as_deref()
            .map(|s| parse_time(&format!("{field}.start"), s))
            .transpose()?;
        let end = self
            .end
            .as_deref()
            .map(|s| parse_time(&format!("{field}.end"), s))
            .transpose()?;
        Ok(AvailabilityException {
            date: parse_date(&format!("{field}.date"), &self.date)?,
            available: self.available,
            start,
            end,
        })
    }
}

impl From<&AvailabilityException> for ExceptionDto {
    fn from(e: &AvailabilityException) -> Self {
        Self {
            date: e.date.to_string(),
            available: e.available,
            start: e.start.map(format_time),
            end: e.end.map(format_time),
        }
    }
}

fn default_active() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffDto {
    pub id: StaffId,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub weekly: Vec<WindowDto>,
    #[serde(default)]
    pub exceptions: Vec<ExceptionDto>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl StaffDto {
    pub fn to_staff(&self) -> Result<StaffMember, ValidationError> {
        let field = format!("staff[{}]", self.id);
        let mut staff = StaffMember::new(self.id.clone())
            .name(self.name.clone())
            .roles(self.roles.iter().cloned());
        staff.active = self.active;
        for (i, window) in self.weekly.iter().enumerate() {
            staff
                .weekly
                .push(window.to_window(&format!("{field}.weekly[{i}]"))?);
        }
        for (i, exception) in self.exceptions.iter().enumerate() {
            staff
                .exceptions
                .push(exception.to_exception(&format!("{field}.exceptions[{i}]"))?);
        }
        Ok(staff)
    }
}

impl From<&StaffMember> for StaffDto {
    fn from(s: &StaffMember) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            roles: s.roles.iter().cloned().collect(),
            weekly: s.weekly.iter().map(WindowDto::from).collect(),
            exceptions: s.exceptions.iter().map(ExceptionDto::from).collect(),
            active: s.active,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftSlotDto {
    pub slot_id: SlotId,
    pub venue_id: VenueId,
    /// 1 = Monday .. 7 = Sunday; must agree with `date`
    pub weekday: i64,
    pub date: String,
    pub start: String,
    pub end: String,
    pub role: String,
}

impl ShiftSlotDto {
    pub fn to_slot(&self) -> Result<ShiftSlot, ValidationError> {
        let field = format!("shiftSlots[{}]", self.slot_id);
        let weekday = weekday_from_iso(&format!("{field}.weekday"), self.weekday)?;
        let date = parse_date(&format!("{field}.date"), &self.date)?;
        if date.weekday() != weekday {
            return Err(ValidationError::WeekdayMismatch {
                slot_id: self.slot_id.clone(),
                weekday: self.weekday,
                date,
                actual: iso_number(date.weekday()),
            });
        }
        Ok(ShiftSlot::new(
            self.slot_id.clone(),
            self.venue_id.clone(),
            date,
            parse_time(&format!("{field}.start"), &self.start)?,
            parse_time(&format!("{field}.end"), &self.end)?,
            self.role.clone(),
        ))
    }
}

impl From<&ShiftSlot> for ShiftSlotDto {
    fn from(s: &ShiftSlot) -> Self {
        Self {
            slot_id: s.id.clone(),
            venue_id: s.venue_id.clone(),
            weekday: i64::from(iso_number(s.weekday())),
            date: s.date.to_string(),
            start: format_time(s.start),
            end: format_time(s.end),
            role: s.role.clone(),
        }
    }
}

/// Body of an optimize call
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    #[serde(default)]
    pub staff: Vec<StaffDto>,
    #[serde(default)]
    pub shift_slots: Vec<ShiftSlotDto>,
    #[serde(default)]
    pub locked_assignments: BTreeMap<SlotId, StaffId>,
    #[serde(default)]
    pub last_approved_assignments: BTreeMap<SlotId, StaffId>,
}

impl OptimizeRequest {
    /// Parse every field and run the structural checks
    pub fn into_problem(self) -> Result<RosterProblem, ValidationError> {
        let slots = self
            .shift_slots
            .iter()
            .map(ShiftSlotDto::to_slot)
            .collect::<Result<Vec<_>, _>>()?;
        let staff = self
            .staff
            .iter()
            .map(StaffDto::to_staff)
            .collect::<Result<Vec<_>, _>>()?;

        let problem = RosterProblem {
            slots,
            staff,
            locks: locks_from_map(&self.locked_assignments),
            priors: priors_from_map(&self.last_approved_assignments),
        };
        problem.validate()?;
        Ok(problem)
    }
}

pub fn locks_from_map(map: &BTreeMap<SlotId, StaffId>) -> Vec<LockedAssignment> {
    map.iter()
        .map(|(slot_id, staff_id)| LockedAssignment {
            slot_id: slot_id.clone(),
            assignee: Assignee::from_id(staff_id),
        })
        .collect()
}

pub fn priors_from_map(map: &BTreeMap<SlotId, StaffId>) -> Vec<PriorAssignment> {
    map.iter()
        .map(|(slot_id, staff_id)| PriorAssignment {
            slot_id: slot_id.clone(),
            staff_id: staff_id.clone(),
        })
        .collect()
}

/// Body of a generate call: slots come from the venue's stored templates
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub venue_id: VenueId,
    /// Monday of the target week, `YYYY-MM-DD`
    pub week_start: String,
    #[serde(default)]
    pub locked_assignments: BTreeMap<SlotId, StaffId>,
    #[serde(default)]
    pub last_approved_assignments: BTreeMap<SlotId, StaffId>,
}

impl GenerateRequest {
    pub fn new(venue_id: impl Into<String>, week_start: NaiveDate) -> Self {
        Self {
            venue_id: venue_id.into(),
            week_start: week_start.to_string(),
            locked_assignments: BTreeMap::new(),
            last_approved_assignments: BTreeMap::new(),
        }
    }

    pub fn week_start(&self) -> Result<NaiveDate, ValidationError> {
        parse_date("weekStart", &self.week_start)
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotReason {
    pub slot_id: SlotId,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    /// slot id -> staff id or `UNFILLED`
    pub assignments: BTreeMap<SlotId, String>,
    pub unfilled: Vec<SlotId>,
    pub reasons: Vec<SlotReason>,
    pub status: SolveStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<InputIssue>,
}

impl From<&RosterOutcome> for OptimizeResponse {
    fn from(outcome: &RosterOutcome) -> Self {
        Self {
            assignments: outcome
                .assignments
                .iter()
                .map(|a| (a.slot_id.clone(), a.assignee.as_str().to_string()))
                .collect(),
            unfilled: outcome.unfilled.clone(),
            reasons: outcome
                .assignments
                .iter()
                .map(|a| SlotReason {
                    slot_id: a.slot_id.clone(),
                    reason: a.reason.clone(),
                })
                .collect(),
            status: outcome.status,
            issues: outcome.issues.clone(),
        }
    }
}

/// One generated shift with its assignee, for roster views
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterShiftDto {
    pub slot_id: SlotId,
    pub venue_id: VenueId,
    pub venue_name: String,
    pub date: String,
    pub start: String,
    pub end: String,
    pub role: String,
    pub staff_id: Option<StaffId>,
    pub staff_name: Option<String>,
    pub locked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub venue_id: VenueId,
    pub venue_name: String,
    pub week_start: String,
    pub shifts: Vec<RosterShiftDto>,
    #[serde(flatten)]
    pub result: OptimizeResponse,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl GenerateResponse {
    pub fn new(
        venue_id: impl Into<String>,
        venue_name: impl Into<String>,
        week_start: NaiveDate,
        problem: &RosterProblem,
        outcome: &RosterOutcome,
        warnings: Vec<String>,
    ) -> Self {
        let venue_name = venue_name.into();
        let names: HashMap<&str, &str> = problem
            .staff
            .iter()
            .map(|s| (s.id.as_str(), s.name.as_str()))
            .collect();

        let shifts = problem
            .slots
            .iter()
            .map(|slot| {
                let staff_id = outcome
                    .assignee_of(&slot.id)
                    .and_then(Assignee::staff_id)
                    .map(str::to_string);
                let staff_name = staff_id
                    .as_deref()
                    .and_then(|id| names.get(id))
                    .map(|n| (*n).to_string());
                RosterShiftDto {
                    slot_id: slot.id.clone(),
                    venue_id: slot.venue_id.clone(),
                    venue_name: venue_name.clone(),
                    date: slot.date.to_string(),
                    start: format_time(slot.start),
                    end: format_time(slot.end),
                    role: slot.role.clone(),
                    staff_id,
                    staff_name,
                    locked: problem.locks.iter().any(|l| l.slot_id == slot.id),
                }
            })
            .collect();

        Self {
            venue_id: venue_id.into(),
            venue_name,
            week_start: week_start.to_string(),
            shifts,
            result: OptimizeResponse::from(outcome),
            warnings,
        }
    }
}
