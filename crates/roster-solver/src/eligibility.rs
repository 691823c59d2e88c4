//! Eligibility resolution
//!
//! Decides whether a staff member may work a slot, and keeps the reason
//! either way so the extractor can explain the outcome without re-deriving it.
//!
//! Rules, in order:
//! 1. Inactive staff are never eligible.
//! 2. The slot's role must be one of the staff member's roles.
//! 3. The first exception for the slot's date overrides the weekly windows:
//!    unavailable excludes the day, a window must contain the slot, and an
//!    exception without both bounds means the whole day.
//! 4. Otherwise a weekly window on the slot's weekday must contain the slot.
//!    Staff without any weekly window follow [`AvailabilityDefault`].

use chrono::{NaiveDate, NaiveTime, Weekday};
use std::fmt;

use roster_core::time::format_time;
use roster_core::{AvailabilityWindow, RoleId, ShiftSlot, StaffMember};

pub use crate::options::AvailabilityDefault;

/// Why a staff member is available for a slot
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AvailabilityBasis {
    /// Contained in a recurring weekly window
    WeeklyWindow(AvailabilityWindow),
    /// Contained in a date exception's window
    ExceptionWindow {
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    },
    /// A date exception marks the whole day available
    ExceptionAllDay(NaiveDate),
    /// No weekly windows recorded and the default policy is available
    NoRestrictions,
}

impl fmt::Display for AvailabilityBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvailabilityBasis::WeeklyWindow(w) => write!(
                f,
                "available {} {}-{} (weekly)",
                w.weekday,
                format_time(w.start),
                format_time(w.end)
            ),
            AvailabilityBasis::ExceptionWindow { date, start, end } => write!(
                f,
                "available {} {}-{} (date exception)",
                date,
                format_time(*start),
                format_time(*end)
            ),
            AvailabilityBasis::ExceptionAllDay(date) => {
                write!(f, "available all day on {} (date exception)", date)
            }
            AvailabilityBasis::NoRestrictions => {
                write!(f, "no weekly availability restrictions")
            }
        }
    }
}

/// Why a staff member cannot work a slot
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IneligibleReason {
    Inactive,
    MissingRole(RoleId),
    MarkedUnavailable(NaiveDate),
    OutsideExceptionWindow(NaiveDate),
    OutsideWeeklyWindows {
        weekday: Weekday,
        start: NaiveTime,
        end: NaiveTime,
    },
    NoWeeklyAvailability,
}

impl fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IneligibleReason::Inactive => write!(f, "inactive"),
            IneligibleReason::MissingRole(role) => write!(f, "lacks role '{}'", role),
            IneligibleReason::MarkedUnavailable(date) => {
                write!(f, "marked unavailable on {}", date)
            }
            IneligibleReason::OutsideExceptionWindow(date) => {
                write!(f, "outside the hours available on {}", date)
            }
            IneligibleReason::OutsideWeeklyWindows { weekday, start, end } => write!(
                f,
                "no weekly window covers {} {}-{}",
                weekday,
                format_time(*start),
                format_time(*end)
            ),
            IneligibleReason::NoWeeklyAvailability => write!(f, "no weekly availability recorded"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Eligibility {
    Eligible(AvailabilityBasis),
    Ineligible(IneligibleReason),
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible(_))
    }
}

/// Resolve eligibility of `staff` for `slot`
pub fn resolve(staff: &StaffMember, slot: &ShiftSlot, default: AvailabilityDefault) -> Eligibility {
    if !staff.active {
        return Eligibility::Ineligible(IneligibleReason::Inactive);
    }
    if !staff.has_role(&slot.role) {
        return Eligibility::Ineligible(IneligibleReason::MissingRole(slot.role.clone()));
    }

    if let Some(exception) = staff.exception_for(slot.date) {
        if !exception.available {
            return Eligibility::Ineligible(IneligibleReason::MarkedUnavailable(slot.date));
        }
        let Some((start, end)) = exception.window() else {
            return Eligibility::Eligible(AvailabilityBasis::ExceptionAllDay(slot.date));
        };
        return if slot.fits_within(start, end) {
            Eligibility::Eligible(AvailabilityBasis::ExceptionWindow {
                date: slot.date,
                start,
                end,
            })
        } else {
            Eligibility::Ineligible(IneligibleReason::OutsideExceptionWindow(slot.date))
        };
    }

    if staff.weekly.is_empty() {
        return match default {
            AvailabilityDefault::Available => Eligibility::Eligible(AvailabilityBasis::NoRestrictions),
            AvailabilityDefault::Unavailable => {
                Eligibility::Ineligible(IneligibleReason::NoWeeklyAvailability)
            }
        };
    }

    match staff.weekly.iter().find(|w| w.covers(slot)) {
        Some(window) => Eligibility::Eligible(AvailabilityBasis::WeeklyWindow(window.clone())),
        None => Eligibility::Ineligible(IneligibleReason::OutsideWeeklyWindows {
            weekday: slot.weekday(),
            start: slot.start,
            end: slot.end,
        }),
    }
}

/// Boolean projection of [`resolve`]
pub fn eligible(staff: &StaffMember, slot: &ShiftSlot, default: AvailabilityDefault) -> bool {
    resolve(staff, slot, default).is_eligible()
}
