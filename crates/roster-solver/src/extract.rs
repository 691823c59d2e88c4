//! Result and reason extraction

use roster_core::{Assignee, RosterProblem, SlotAssignment, SolveStatus};

use crate::model::{AssignmentModel, LockState, SlotVars};

/// Read the assignee of every slot from solved variable values.
///
/// Returns the assignments in slot order and the number of slots whose last
/// approved assignee was not kept.
pub fn extract(problem: &RosterProblem, model: &AssignmentModel, values: &[bool]) -> (Vec<SlotAssignment>, usize) {
    let chosen: Vec<Option<usize>> = model
        .slots
        .iter()
        .map(|vars| {
            vars.candidates
                .iter()
                .find(|c| values[c.var.0])
                .map(|c| c.staff)
        })
        .collect();

    let mut changes = 0;
    let assignments = problem
        .slots
        .iter()
        .zip(&model.slots)
        .enumerate()
        .map(|(slot_idx, (slot, vars))| {
            if let Some(prior) = &vars.prior {
                if values[prior.changed.0] {
                    changes += 1;
                }
            }
            match chosen[slot_idx] {
                Some(staff_idx) => {
                    let staff = &problem.staff[staff_idx];
                    SlotAssignment {
                        slot_id: slot.id.clone(),
                        assignee: Assignee::Staff(staff.id.clone()),
                        reason: assigned_reason(problem, vars, staff_idx, &slot.role),
                    }
                }
                None => SlotAssignment {
                    slot_id: slot.id.clone(),
                    assignee: Assignee::Unfilled,
                    reason: unfilled_reason(problem, &chosen, vars, slot_idx),
                },
            }
        })
        .collect();

    (assignments, changes)
}

fn assigned_reason(problem: &RosterProblem, vars: &SlotVars, staff_idx: usize, role: &str) -> String {
    let staff = &problem.staff[staff_idx];
    let mut reason = format!("Assigned to {} ({}): role '{}' matched", staff.name, staff.id, role);
    if let Some(candidate) = vars.candidate(staff_idx) {
        reason.push_str(&format!(", {}", candidate.basis));
    }
    if vars
        .locks
        .iter()
        .any(|l| matches!(l, LockState::Staff { staff } if *staff == staff_idx))
    {
        reason.push_str("; locked");
    }
    if let Some(prior) = &vars.prior {
        match &prior.target {
            Assignee::Staff(id) if *id == staff.id => {
                reason.push_str("; unchanged from last approved schedule");
            }
            Assignee::Staff(id) => {
                reason.push_str(&format!("; replaces {} from last approved schedule", id));
            }
            Assignee::Unfilled => reason.push_str("; was unfilled in last approved schedule"),
        }
    }
    reason
}

fn unfilled_reason(problem: &RosterProblem, chosen: &[Option<usize>], vars: &SlotVars, slot_idx: usize) -> String {
    for lock in &vars.locks {
        match lock {
            LockState::Ineligible { staff_id, reason } => {
                return format!(
                    "Unfilled: locked to staff '{}' who is not eligible ({})",
                    staff_id, reason
                );
            }
            LockState::Unfilled => return "Unfilled: locked as unfilled".to_string(),
            LockState::Staff { .. } => {}
        }
    }

    let slot = &problem.slots[slot_idx];
    if vars.candidates.is_empty() {
        return format!("Unfilled: no eligible staff available for role '{}'", slot.role);
    }

    // Eligible candidates already working an overlapping slot
    let busy = vars
        .candidates
        .iter()
        .filter(|c| {
            chosen.iter().enumerate().any(|(other, held)| {
                other != slot_idx
                    && *held == Some(c.staff)
                    && problem.slots[other].overlaps(slot)
            })
        })
        .count();

    if busy == vars.candidates.len() {
        format!(
            "Unfilled: no eligible staff available for role '{}'; {} candidate(s) already assigned to overlapping shifts",
            slot.role, busy
        )
    } else {
        format!(
            "Unfilled: {} eligible candidate(s) could not be placed",
            vars.candidates.len() - busy
        )
    }
}

/// Every slot unfilled; used when the search produced no solution
pub fn fallback(problem: &RosterProblem, status: SolveStatus, time_limit_secs: f64) -> Vec<SlotAssignment> {
    let reason = format!(
        "No feasible solution found ({}, time bound {}s)",
        status, time_limit_secs
    );
    problem
        .slots
        .iter()
        .map(|slot| SlotAssignment {
            slot_id: slot.id.clone(),
            assignee: Assignee::Unfilled,
            reason: reason.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::build_model;
    use crate::options::SolverOptions;
    use chrono::{NaiveDate, NaiveTime, Weekday};
    use pretty_assertions::assert_eq;
    use roster_core::{AvailabilityWindow, ShiftSlot, StaffMember};

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn problem() -> RosterProblem {
        let monday = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        RosterProblem::new(
            vec![
                ShiftSlot::new("a", "v", monday, t(9), t(17), "chef"),
                ShiftSlot::new("b", "v", monday, t(9), t(17), "chef"),
            ],
            vec![StaffMember::new("ana")
                .name("Ana")
                .role("chef")
                .window(AvailabilityWindow::new(Weekday::Mon, t(8), t(18)))],
        )
    }

    #[test]
    fn reasons_name_staff_role_and_basis() {
        let problem = problem();
        let (model, _) = build_model(&problem, &SolverOptions::default());
        // ana on a, b unfilled: [ana@a, U(a), ana@b, U(b)]
        let (assignments, changes) = extract(&problem, &model, &[true, false, false, true]);

        assert_eq!(changes, 0);
        assert_eq!(
            assignments[0].reason,
            "Assigned to Ana (ana): role 'chef' matched, available Mon 08:00-18:00 (weekly)"
        );
        assert_eq!(assignments[1].assignee, Assignee::Unfilled);
        assert_eq!(
            assignments[1].reason,
            "Unfilled: no eligible staff available for role 'chef'; 1 candidate(s) already assigned to overlapping shifts"
        );
    }

    #[test]
    fn locked_and_prior_notes() {
        let problem = problem().with_lock("a", "ana").with_prior("a", "ana");
        let (mut model, _) = build_model(&problem, &SolverOptions::default());
        crate::objective::compose(&mut model, &problem, &Default::default()).unwrap();
        // changed(a) is the last variable
        let (assignments, changes) = extract(&problem, &model, &[true, false, false, true, false]);

        assert_eq!(changes, 0);
        assert!(assignments[0].reason.ends_with("; locked; unchanged from last approved schedule"));
    }

    #[test]
    fn fallback_marks_everything_unfilled() {
        let assignments = fallback(&problem(), SolveStatus::Infeasible, 10.0);
        assert!(assignments.iter().all(|a| a.assignee.is_unfilled()));
        assert_eq!(
            assignments[0].reason,
            "No feasible solution found (infeasible, time bound 10s)"
        );
    }
}
