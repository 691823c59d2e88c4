//! # roster-solver
//!
//! Constraint-based staff assignment for weekly rosters.
//!
//! This crate provides:
//! - Slot expansion from weekday templates (`expand`)
//! - Eligibility resolution by role and availability (`eligibility`)
//! - A declarative 0/1 assignment model (`model`) and its objective (`objective`)
//! - Optimal search with the Pumpkin CP solver (`invoke`)
//! - Per-slot assignments with readable reasons (`extract`)
//!
//! ## Example
//!
//! ```rust
//! use chrono::{NaiveDate, NaiveTime};
//! use roster_core::{Assignee, RosterProblem, ShiftSlot, StaffMember};
//! use roster_solver::RosterOptimizer;
//!
//! let monday = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
//! let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
//! let five = NaiveTime::from_hms_opt(17, 0, 0).unwrap();
//!
//! let problem = RosterProblem::new(
//!     vec![ShiftSlot::new("s1", "bistro", monday, nine, five, "chef")],
//!     vec![StaffMember::new("ana").name("Ana").role("chef")],
//! );
//!
//! let outcome = RosterOptimizer::new().optimize(&problem).unwrap();
//! assert_eq!(outcome.assignee_of("s1"), Some(&Assignee::Staff("ana".into())));
//! ```

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use roster_core::source::{merge_availability, RosterSource};
use roster_core::wire::{locks_from_map, priors_from_map, GenerateRequest, GenerateResponse, OptimizeRequest};
use roster_core::{
    InputIssue, Optimizer, RosterError, RosterOutcome, RosterProblem, SolveStats, VenueId,
};

use crate::invoke::SolveOutcome;
use crate::model::AssignmentModel;

pub mod eligibility;
pub mod expand;
pub mod extract;
pub mod invoke;
pub mod model;
pub mod objective;
pub mod options;

pub use eligibility::{eligible, resolve, AvailabilityBasis, Eligibility, IneligibleReason};
pub use expand::expand_week;
pub use options::{AvailabilityDefault, ObjectiveWeights, SolverOptions, UnfilledMode};

/// Roster optimizer running the full pipeline per call
#[derive(Clone, Debug, Default)]
pub struct RosterOptimizer {
    options: SolverOptions,
}

/// A week generated from a venue's stored configuration
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedRoster {
    pub venue_id: VenueId,
    pub venue_name: String,
    pub week_start: NaiveDate,
    pub problem: RosterProblem,
    pub outcome: RosterOutcome,
    /// Problems with the stored data that did not stop the run
    pub warnings: Vec<String>,
}

impl GeneratedRoster {
    pub fn to_response(&self) -> GenerateResponse {
        GenerateResponse::new(
            self.venue_id.clone(),
            self.venue_name.clone(),
            self.week_start,
            &self.problem,
            &self.outcome,
            self.warnings.clone(),
        )
    }
}

impl RosterOptimizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SolverOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Assign staff to every slot of a problem
    pub fn optimize(&self, problem: &RosterProblem) -> Result<RosterOutcome, RosterError> {
        problem.validate()?;

        let (mut model, mut issues) = model::build_model(problem, &self.options);
        let (objective, prior_issues) = objective::compose(&mut model, problem, &self.options.weights)?;
        issues.extend(prior_issues);
        for issue in &issues {
            warn!(kind = issue.kind.as_str(), slot = %issue.slot_id, staff = %issue.staff_id, "{}", issue.detail);
        }
        debug!(
            slots = problem.slots.len(),
            staff = problem.staff.len(),
            variables = model.num_vars(),
            constraints = model.constraints.len(),
            stability_terms = objective.stability_terms,
            "model built"
        );

        let solved = invoke::solve(&model, &objective, self.options.time_limit());
        Ok(self.finish(problem, &model, issues, solved))
    }

    /// Turn a search result into an outcome, falling back to all-unfilled
    /// when the search produced no solution
    fn finish(
        &self,
        problem: &RosterProblem,
        model: &AssignmentModel,
        issues: Vec<InputIssue>,
        solved: SolveOutcome,
    ) -> RosterOutcome {
        let (assignments, stability_changes) = match &solved.values {
            Some(values) if solved.status.has_solution() => extract::extract(problem, model, values),
            _ => {
                warn!(
                    status = %solved.status,
                    slots = problem.slots.len(),
                    "no feasible roster, every slot left unfilled"
                );
                let assignments =
                    extract::fallback(problem, solved.status, self.options.effective_seconds());
                (assignments, 0)
            }
        };

        let unfilled: Vec<_> = assignments
            .iter()
            .filter(|a| a.assignee.is_unfilled())
            .map(|a| a.slot_id.clone())
            .collect();

        let outcome = RosterOutcome {
            status: solved.status,
            stats: SolveStats {
                objective: solved.objective,
                variables: model.num_vars(),
                constraints: model.constraints.len(),
                stability_changes,
                elapsed_ms: solved.elapsed.as_millis() as u64,
            },
            unfilled,
            assignments,
            issues,
        };

        info!(
            status = %outcome.status,
            filled = outcome.filled_count(),
            unfilled = outcome.unfilled.len(),
            changes = stability_changes,
            elapsed_ms = outcome.stats.elapsed_ms,
            "roster optimized"
        );
        outcome
    }

    /// Validate a wire request and optimize it
    pub fn optimize_request(&self, request: OptimizeRequest) -> Result<RosterOutcome, RosterError> {
        let problem = request.into_problem()?;
        self.optimize(&problem)
    }

    /// Build the week from a source's templates, staff and availability, then optimize
    pub fn generate<S: RosterSource + ?Sized>(
        &self,
        source: &S,
        request: &GenerateRequest,
    ) -> Result<GeneratedRoster, RosterError> {
        let week_start = request.week_start()?;
        let venue_id = request.venue_id.as_str();

        let venue_name = source.venue_name(venue_id)?;
        let templates = source.templates(venue_id)?;
        let slots = expand::expand_week(venue_id, week_start, &templates)?;
        let (staff, warnings) = merge_availability(source.staff(venue_id)?, source.availability(venue_id)?);
        for warning in &warnings {
            warn!(venue = venue_id, "{}", warning);
        }
        debug!(venue = venue_id, %week_start, slots = slots.len(), staff = staff.len(), "week expanded");

        let problem = RosterProblem {
            slots,
            staff,
            locks: locks_from_map(&request.locked_assignments),
            priors: priors_from_map(&request.last_approved_assignments),
        };
        let outcome = self.optimize(&problem)?;

        Ok(GeneratedRoster {
            venue_id: request.venue_id.clone(),
            venue_name,
            week_start,
            problem,
            outcome,
            warnings,
        })
    }

    /// Optimize independent problems in parallel, results in input order
    pub fn optimize_batch(&self, problems: &[RosterProblem]) -> Vec<Result<RosterOutcome, RosterError>> {
        problems.par_iter().map(|problem| self.optimize(problem)).collect()
    }
}

impl Optimizer for RosterOptimizer {
    fn optimize(&self, problem: &RosterProblem) -> Result<RosterOutcome, RosterError> {
        RosterOptimizer::optimize(self, problem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optimizer_creation() {
        let optimizer = RosterOptimizer::new();
        assert_eq!(optimizer.options().unfilled_mode, UnfilledMode::Sentinel);
    }

    #[test]
    fn empty_problem_is_optimal() {
        let outcome = RosterOptimizer::new()
            .optimize(&RosterProblem::default())
            .unwrap();
        assert_eq!(outcome.status, roster_core::SolveStatus::Optimal);
        assert!(outcome.assignments.is_empty());
        assert!(outcome.unfilled.is_empty());
    }

    #[test]
    fn timeout_without_solution_falls_back() {
        use chrono::{NaiveDate, NaiveTime};
        use roster_core::{ShiftSlot, SolveStatus, StaffMember};
        use std::time::Duration;

        let monday = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let five = NaiveTime::from_hms_opt(17, 0, 0).unwrap();
        let problem = RosterProblem::new(
            vec![
                ShiftSlot::new("a", "bistro", monday, nine, five, "chef"),
                ShiftSlot::new("b", "bistro", monday, nine, five, "chef"),
            ],
            vec![StaffMember::new("ana").role("chef")],
        );
        let optimizer = RosterOptimizer::with_options(SolverOptions::default().max_seconds(2.0));
        let (model, issues) = model::build_model(&problem, optimizer.options());

        let outcome = optimizer.finish(
            &problem,
            &model,
            issues,
            SolveOutcome {
                status: SolveStatus::Unknown,
                values: None,
                objective: None,
                elapsed: Duration::from_secs(2),
            },
        );

        assert_eq!(outcome.status, SolveStatus::Unknown);
        assert_eq!(outcome.unfilled, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(outcome.stats.stability_changes, 0);
        assert_eq!(outcome.stats.elapsed_ms, 2000);
        assert!(outcome.assignments.iter().all(|a| a.assignee.is_unfilled()));
        assert_eq!(
            outcome.assignment("b").unwrap().reason,
            "No feasible solution found (unknown, time bound 2s)"
        );
    }

    #[test]
    fn optimizer_is_usable_as_trait_object() {
        let optimizer: Box<dyn Optimizer> = Box::new(RosterOptimizer::new());
        assert!(optimizer.optimize(&RosterProblem::default()).is_ok());
    }
}
