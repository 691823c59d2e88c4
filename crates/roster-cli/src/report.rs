//! Text reports and exit codes
//!
//! ## Exit Code Semantics
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Success: a roster was produced (unfilled slots allowed) |
//! | 1 | Failure: invalid input, or with `--strict` any unfilled slot or fallback |

use std::fmt::Write;
use std::process;

use roster_core::{RosterOutcome, RosterProblem};
use roster_solver::model::AssignmentModel;

/// Exit codes for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: a roster was produced
    Success = 0,
    /// Failure: invalid input or, under `--strict`, an incomplete roster
    Failure = 1,
}

impl ExitCode {
    /// Decide the exit code of a run.
    ///
    /// Without `strict` every produced roster counts as success, including
    /// the all-unfilled fallback.
    pub fn from_outcome(outcome: &RosterOutcome, strict: bool) -> Self {
        if strict && (!outcome.status.has_solution() || !outcome.unfilled.is_empty()) {
            ExitCode::Failure
        } else {
            ExitCode::Success
        }
    }

    /// Worst of two codes
    pub fn combine(self, other: ExitCode) -> Self {
        if self.is_failure() || other.is_failure() {
            ExitCode::Failure
        } else {
            ExitCode::Success
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }

    pub fn is_failure(self) -> bool {
        matches!(self, ExitCode::Failure)
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code as u8)
    }
}

/// One-screen summary of a run, written to stderr
pub fn render_summary(label: &str, outcome: &RosterOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}: {}", label, outcome.status);
    let _ = writeln!(
        out,
        "  filled {}/{}, stability changes {}",
        outcome.filled_count(),
        outcome.assignments.len(),
        outcome.stats.stability_changes
    );
    for slot_id in &outcome.unfilled {
        let reason = outcome
            .assignment(slot_id)
            .map(|a| a.reason.as_str())
            .unwrap_or_default();
        let _ = writeln!(out, "  unfilled {}: {}", slot_id, reason);
    }
    for issue in &outcome.issues {
        let _ = writeln!(out, "  issue {}", issue);
    }
    out
}

/// Report of `roster check`: sizes, issues, and slots nobody can work
pub fn render_check(label: &str, problem: &RosterProblem, model: &AssignmentModel, issues: &[roster_core::InputIssue]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}: {} slots, {} staff, {} locks, {} last approved",
        label,
        problem.slots.len(),
        problem.staff.len(),
        problem.locks.len(),
        problem.priors.len()
    );
    let _ = writeln!(
        out,
        "  model: {} variables, {} constraints",
        model.num_vars(),
        model.constraints.len()
    );
    for (slot, vars) in problem.slots.iter().zip(&model.slots) {
        if vars.candidates.is_empty() {
            let _ = writeln!(out, "  no eligible staff for {} (role '{}')", slot.id, slot.role);
        }
    }
    for issue in issues {
        let _ = writeln!(out, "  issue {}", issue);
    }
    out
}
