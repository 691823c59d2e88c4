//! Solver invocation
//!
//! Translates an [`AssignmentModel`] into the Pumpkin constraint solver and
//! minimizes the objective under a wall-clock budget.
//!
//! - **Variables**: one integer in `[0, 1]` per model variable
//! - **Constraints**: every linear row posted as `greater_than_or_equals`
//! - **Objective**: an integer `z` tied to the weighted sum by `Σ w·x - z = 0`
//!
//! A new solver is built for every call.

use pumpkin_solver::constraints as cp;
use pumpkin_solver::optimisation::linear_sat_unsat::LinearSatUnsat;
use pumpkin_solver::optimisation::OptimisationDirection;
use pumpkin_solver::results::{OptimisationResult, ProblemSolution};
use pumpkin_solver::termination::TimeBudget;
use pumpkin_solver::variables::TransformableVariable;
use pumpkin_solver::Solver;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use roster_core::SolveStatus;

use crate::model::AssignmentModel;
use crate::objective::Objective;

/// What the search produced
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    /// Value of every model variable; `None` without a solution
    pub values: Option<Vec<bool>>,
    pub objective: Option<i64>,
    pub elapsed: Duration,
}

impl SolveOutcome {
    fn without_solution(status: SolveStatus, started: Instant) -> Self {
        Self {
            status,
            values: None,
            objective: None,
            elapsed: started.elapsed(),
        }
    }
}

/// Minimize `objective` over `model` within `time_limit`.
pub fn solve(model: &AssignmentModel, objective: &Objective, time_limit: Duration) -> SolveOutcome {
    let started = Instant::now();

    // Constraints without variables never reach the solver
    if let Some(constant) = model
        .constraints
        .iter()
        .find(|c| c.is_constant() && !c.is_satisfied_by(&[]))
    {
        warn!(constraint = %constant.kind, "constraint can never hold");
        return SolveOutcome::without_solution(SolveStatus::Infeasible, started);
    }

    if model.vars.is_empty() {
        return SolveOutcome {
            status: SolveStatus::Optimal,
            values: Some(Vec::new()),
            objective: Some(0),
            elapsed: started.elapsed(),
        };
    }

    let mut solver = Solver::default();
    let vars: Vec<_> = model
        .vars
        .iter()
        .map(|_| solver.new_bounded_integer(0, 1))
        .collect();
    let constraint_tag = solver.new_constraint_tag();

    for constraint in model.constraints.iter().filter(|c| !c.is_constant()) {
        for (terms, rhs) in constraint.as_at_least_rows() {
            let scaled = terms
                .iter()
                .map(|&(var, coef)| vars[var.0].scaled(coef))
                .collect::<Vec<_>>();
            let posted = solver
                .add_constraint(cp::greater_than_or_equals(scaled, rhs, constraint_tag))
                .post();
            if posted.is_err() {
                warn!(constraint = %constraint.kind, "constraint conflicts at the root");
                return SolveOutcome::without_solution(SolveStatus::Infeasible, started);
            }
        }
    }

    // z = Σ w·x, posted as two inequalities
    let objective_var = solver.new_bounded_integer(0, objective.upper_bound as i32);
    let mut sum = objective
        .terms
        .iter()
        .map(|&(var, weight)| vars[var.0].scaled(weight as i32))
        .collect::<Vec<_>>();
    sum.push(objective_var.scaled(-1));
    let negated = objective
        .terms
        .iter()
        .map(|&(var, weight)| vars[var.0].scaled(-(weight as i32)))
        .chain(std::iter::once(objective_var.scaled(1)))
        .collect::<Vec<_>>();
    for row in [sum, negated] {
        if solver
            .add_constraint(cp::greater_than_or_equals(row, 0, constraint_tag))
            .post()
            .is_err()
        {
            warn!("objective link conflicts at the root");
            return SolveOutcome::without_solution(SolveStatus::Infeasible, started);
        }
    }

    debug!(
        variables = vars.len(),
        rows = model.constraints.len(),
        upper_bound = objective.upper_bound,
        time_limit_ms = time_limit.as_millis() as u64,
        "starting search"
    );

    let mut brancher = solver.default_brancher();
    let mut termination = TimeBudget::starting_now(time_limit);

    fn noop_callback<B>(_: &Solver, _: pumpkin_solver::results::SolutionReference, _: &B) {}
    let result = solver.optimise(
        &mut brancher,
        &mut termination,
        LinearSatUnsat::new(OptimisationDirection::Minimise, objective_var, noop_callback),
    );

    let (status, values) = match result {
        OptimisationResult::Optimal(solution) => (
            SolveStatus::Optimal,
            vars.iter()
                .map(|&var| solution.get_integer_value(var) == 1)
                .collect::<Vec<_>>(),
        ),
        OptimisationResult::Satisfiable(solution) => (
            SolveStatus::Feasible,
            vars.iter()
                .map(|&var| solution.get_integer_value(var) == 1)
                .collect::<Vec<_>>(),
        ),
        OptimisationResult::Unsatisfiable => {
            return SolveOutcome::without_solution(SolveStatus::Infeasible, started);
        }
        OptimisationResult::Unknown => {
            return SolveOutcome::without_solution(SolveStatus::Unknown, started);
        }
    };

    SolveOutcome {
        status,
        objective: Some(objective.evaluate(&values)),
        values: Some(values),
        elapsed: started.elapsed(),
    }
}
