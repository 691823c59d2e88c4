//! Assignment model
//!
//! A solver-independent description of the roster as 0/1 variables and
//! linear constraints. Every constraint carries the slot and staff it came
//! from, so an infeasible run can be traced back to its input.
//!
//! - **Variables**: one per eligible (staff, slot) pair, plus one unfilled
//!   sentinel per slot in [`UnfilledMode::Sentinel`]
//! - **Coverage**: `Σ x[staff, slot] + unfilled[slot] = 1`
//! - **Locks**: the locked variable is pinned to 1
//! - **No double booking**: `x[staff, a] + x[staff, b] <= 1` for slots that
//!   overlap on the same date
//!
//! Ineligible pairs get no variable at all.

use std::collections::HashMap;
use std::fmt;

use roster_core::{
    Assignee, InputIssue, InputIssueKind, RosterProblem, SlotId, StaffId, UNFILLED_ID,
};

use crate::eligibility::{resolve, AvailabilityBasis, Eligibility, IneligibleReason};
use crate::options::SolverOptions;

pub use crate::options::UnfilledMode;

/// Index into [`AssignmentModel::vars`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub usize);

/// What a 0/1 variable stands for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarKind {
    /// Staff member (index into problem staff) works slot (index into problem slots)
    Assign { slot: usize, staff: usize },
    /// Slot stays unfilled
    Unfilled { slot: usize },
    /// Slot's last approved assignee is not kept
    Changed { slot: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    Eq,
    Le,
    Ge,
}

/// Origin of a constraint
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstraintKind {
    Coverage { slot_id: SlotId },
    Lock { slot_id: SlotId, assignee: Assignee },
    NoOverlap {
        staff_id: StaffId,
        first: SlotId,
        second: SlotId,
    },
    ChangeLink { slot_id: SlotId, target: Assignee },
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::Coverage { slot_id } => write!(f, "coverage of slot '{}'", slot_id),
            ConstraintKind::Lock { slot_id, assignee } => {
                write!(f, "lock of slot '{}' to '{}'", slot_id, assignee)
            }
            ConstraintKind::NoOverlap {
                staff_id,
                first,
                second,
            } => write!(
                f,
                "staff '{}' on overlapping slots '{}' and '{}'",
                staff_id, first, second
            ),
            ConstraintKind::ChangeLink { slot_id, target } => {
                write!(f, "stability of slot '{}' (last approved '{}')", slot_id, target)
            }
        }
    }
}

/// `Σ coef * var  (relation)  rhs`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearConstraint {
    pub terms: Vec<(VarId, i32)>,
    pub relation: Relation,
    pub rhs: i32,
    pub kind: ConstraintKind,
}

impl LinearConstraint {
    pub fn new(terms: Vec<(VarId, i32)>, relation: Relation, rhs: i32, kind: ConstraintKind) -> Self {
        Self {
            terms,
            relation,
            rhs,
            kind,
        }
    }

    /// Restate as rows of the form `Σ coef * var >= rhs`
    pub fn as_at_least_rows(&self) -> Vec<(Vec<(VarId, i32)>, i32)> {
        let negated = || {
            self.terms
                .iter()
                .map(|&(var, coef)| (var, -coef))
                .collect::<Vec<_>>()
        };
        match self.relation {
            Relation::Ge => vec![(self.terms.clone(), self.rhs)],
            Relation::Le => vec![(negated(), -self.rhs)],
            Relation::Eq => vec![(self.terms.clone(), self.rhs), (negated(), -self.rhs)],
        }
    }

    pub fn is_satisfied_by(&self, values: &[bool]) -> bool {
        let lhs: i64 = self
            .terms
            .iter()
            .map(|&(var, coef)| if values[var.0] { i64::from(coef) } else { 0 })
            .sum();
        let rhs = i64::from(self.rhs);
        match self.relation {
            Relation::Eq => lhs == rhs,
            Relation::Le => lhs <= rhs,
            Relation::Ge => lhs >= rhs,
        }
    }

    /// A constraint without variables is either always or never satisfied
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }
}

/// An eligible staff member of a slot and its variable
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub staff: usize,
    pub var: VarId,
    pub basis: AvailabilityBasis,
}

/// How a lock on a slot was encoded
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LockState {
    /// Pinned to an eligible staff member
    Staff { staff: usize },
    /// Locked to a staff member who cannot work the slot
    Ineligible {
        staff_id: StaffId,
        reason: IneligibleReason,
    },
    /// Locked to the unfilled sentinel
    Unfilled,
}

/// Stability link of a slot to its last approved assignee
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriorLink {
    pub target: Assignee,
    pub changed: VarId,
}

/// Variables and decisions of one slot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlotVars {
    pub candidates: Vec<Candidate>,
    pub unfilled: Option<VarId>,
    /// Staff that failed eligibility, with the reason
    pub rejected: Vec<(usize, IneligibleReason)>,
    pub locks: Vec<LockState>,
    pub prior: Option<PriorLink>,
}

impl SlotVars {
    pub fn candidate(&self, staff: usize) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.staff == staff)
    }

    pub fn rejection(&self, staff: usize) -> Option<&IneligibleReason> {
        self.rejected
            .iter()
            .find(|(s, _)| *s == staff)
            .map(|(_, reason)| reason)
    }

    /// Variable that makes `assignee` hold this slot, if any
    pub fn var_for(&self, assignee: &Assignee, staff_index: &HashMap<StaffId, usize>) -> Option<VarId> {
        match assignee {
            Assignee::Unfilled => self.unfilled,
            Assignee::Staff(id) => staff_index
                .get(id)
                .and_then(|&staff| self.candidate(staff))
                .map(|c| c.var),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssignmentModel {
    pub vars: Vec<VarKind>,
    pub constraints: Vec<LinearConstraint>,
    /// One entry per problem slot, same order
    pub slots: Vec<SlotVars>,
    pub slot_index: HashMap<SlotId, usize>,
    pub staff_index: HashMap<StaffId, usize>,
    pub unfilled_mode: UnfilledMode,
}

impl AssignmentModel {
    pub fn new_var(&mut self, kind: VarKind) -> VarId {
        self.vars.push(kind);
        VarId(self.vars.len() - 1)
    }

    pub fn add(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    /// Number of unfilled sentinel variables
    pub fn num_sentinels(&self) -> usize {
        self.slots.iter().filter(|s| s.unfilled.is_some()).count()
    }

    /// Constraints violated by an assignment of values
    pub fn violations(&self, values: &[bool]) -> Vec<&LinearConstraint> {
        self.constraints
            .iter()
            .filter(|c| !c.is_satisfied_by(values))
            .collect()
    }
}

fn pin(var: VarId, kind: ConstraintKind) -> LinearConstraint {
    LinearConstraint::new(vec![(var, 1)], Relation::Eq, 1, kind)
}

/// `0 >= 1`: makes the model infeasible while keeping the reason visible
fn unsatisfiable(kind: ConstraintKind) -> LinearConstraint {
    LinearConstraint::new(Vec::new(), Relation::Ge, 1, kind)
}

/// Build the assignment model of a validated problem.
///
/// Locks that cannot be applied as written come back as issues. Priors are
/// left to the objective composer.
pub fn build_model(problem: &RosterProblem, options: &SolverOptions) -> (AssignmentModel, Vec<InputIssue>) {
    let mut model = AssignmentModel {
        unfilled_mode: options.unfilled_mode,
        ..AssignmentModel::default()
    };
    model.slot_index = problem
        .slots
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id.clone(), i))
        .collect();
    model.staff_index = problem
        .staff
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id.clone(), i))
        .collect();

    // Eligibility is resolved once per pair; the outcome is kept for reasons
    for (slot_idx, slot) in problem.slots.iter().enumerate() {
        let mut vars = SlotVars::default();
        for (staff_idx, staff) in problem.staff.iter().enumerate() {
            match resolve(staff, slot, options.availability_default) {
                Eligibility::Eligible(basis) => {
                    let var = model.new_var(VarKind::Assign {
                        slot: slot_idx,
                        staff: staff_idx,
                    });
                    vars.candidates.push(Candidate {
                        staff: staff_idx,
                        var,
                        basis,
                    });
                }
                Eligibility::Ineligible(reason) => vars.rejected.push((staff_idx, reason)),
            }
        }
        if options.unfilled_mode == UnfilledMode::Sentinel {
            vars.unfilled = Some(model.new_var(VarKind::Unfilled { slot: slot_idx }));
        }

        let terms = vars
            .candidates
            .iter()
            .map(|c| c.var)
            .chain(vars.unfilled)
            .map(|var| (var, 1))
            .collect();
        model.add(LinearConstraint::new(
            terms,
            Relation::Eq,
            1,
            ConstraintKind::Coverage {
                slot_id: slot.id.clone(),
            },
        ));
        model.slots.push(vars);
    }

    let issues = encode_locks(&mut model, problem);

    if !options.allow_overlap {
        encode_no_overlap(&mut model, problem);
    }

    (model, issues)
}

fn encode_locks(model: &mut AssignmentModel, problem: &RosterProblem) -> Vec<InputIssue> {
    let mut issues = Vec::new();

    for lock in &problem.locks {
        let Some(&slot_idx) = model.slot_index.get(&lock.slot_id) else {
            issues.push(InputIssue {
                kind: InputIssueKind::LockUnknownSlot,
                slot_id: lock.slot_id.clone(),
                staff_id: lock.assignee.as_str().to_string(),
                detail: "lock names a slot that is not part of this roster".into(),
            });
            continue;
        };
        let kind = ConstraintKind::Lock {
            slot_id: lock.slot_id.clone(),
            assignee: lock.assignee.clone(),
        };

        let staff_id = match &lock.assignee {
            Assignee::Unfilled => {
                let constraint = match model.slots[slot_idx].unfilled {
                    Some(var) => pin(var, kind),
                    None => unsatisfiable(kind),
                };
                model.add(constraint);
                model.slots[slot_idx].locks.push(LockState::Unfilled);
                continue;
            }
            Assignee::Staff(id) => id,
        };

        let Some(&staff_idx) = model.staff_index.get(staff_id) else {
            issues.push(InputIssue {
                kind: InputIssueKind::LockUnknownStaff,
                slot_id: lock.slot_id.clone(),
                staff_id: staff_id.clone(),
                detail: "lock names an unknown staff member".into(),
            });
            continue;
        };

        let vars = &model.slots[slot_idx];
        if let Some(candidate) = vars.candidate(staff_idx) {
            let var = candidate.var;
            model.add(pin(var, kind));
            model.slots[slot_idx]
                .locks
                .push(LockState::Staff { staff: staff_idx });
            continue;
        }

        // Locked to someone who cannot work the slot
        let reason = vars
            .rejection(staff_idx)
            .cloned()
            .unwrap_or(IneligibleReason::Inactive);
        let constraint = match vars.unfilled {
            Some(var) => pin(var, kind),
            None => unsatisfiable(kind),
        };
        issues.push(InputIssue {
            kind: InputIssueKind::LockIneligible,
            slot_id: lock.slot_id.clone(),
            staff_id: staff_id.clone(),
            detail: if vars.unfilled.is_some() {
                format!("staff is not eligible ({}); slot kept as {}", reason, UNFILLED_ID)
            } else {
                format!("staff is not eligible ({}); lock cannot hold", reason)
            },
        });
        model.add(constraint);
        model.slots[slot_idx].locks.push(LockState::Ineligible {
            staff_id: staff_id.clone(),
            reason,
        });
    }

    issues
}

fn encode_no_overlap(model: &mut AssignmentModel, problem: &RosterProblem) {
    // Candidate variables per staff member, in slot order
    let mut per_staff: Vec<Vec<(usize, VarId)>> = vec![Vec::new(); problem.staff.len()];
    for (slot_idx, vars) in model.slots.iter().enumerate() {
        for candidate in &vars.candidates {
            per_staff[candidate.staff].push((slot_idx, candidate.var));
        }
    }

    for (staff_idx, held) in per_staff.iter().enumerate() {
        for (i, &(a, var_a)) in held.iter().enumerate() {
            for &(b, var_b) in &held[i + 1..] {
                let (first, second) = (&problem.slots[a], &problem.slots[b]);
                if !first.overlaps(second) {
                    continue;
                }
                model.add(LinearConstraint::new(
                    vec![(var_a, 1), (var_b, 1)],
                    Relation::Le,
                    1,
                    ConstraintKind::NoOverlap {
                        staff_id: problem.staff[staff_idx].id.clone(),
                        first: first.id.clone(),
                        second: second.id.clone(),
                    },
                ));
            }
        }
    }
}
