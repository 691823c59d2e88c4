//! Objective composition
//!
//! Minimize `w_unfilled * Σ unfilled + w_change * Σ changed` in one pass.
//! The unfilled weight is raised when needed so that a single unfilled slot
//! always costs more than every stability change together.

use std::collections::HashSet;

use roster_core::{Assignee, InputIssue, InputIssueKind, RosterError, RosterProblem};

use crate::model::{AssignmentModel, ConstraintKind, LinearConstraint, PriorLink, Relation, VarId, VarKind};
use crate::options::ObjectiveWeights;

/// Weighted sum to minimize
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Objective {
    pub terms: Vec<(VarId, i64)>,
    /// Largest value the sum can take
    pub upper_bound: i64,
    /// Effective weight of one unfilled slot
    pub unfilled_weight: i64,
    pub change_weight: i64,
    /// Slots with a usable last approved assignee
    pub stability_terms: usize,
}

impl Objective {
    /// Objective value of an assignment of values
    pub fn evaluate(&self, values: &[bool]) -> i64 {
        self.terms
            .iter()
            .filter(|(var, _)| values[var.0])
            .map(|(_, weight)| weight)
            .sum()
    }
}

/// Link usable priors into the model and build the objective.
pub fn compose(
    model: &mut AssignmentModel,
    problem: &RosterProblem,
    weights: &ObjectiveWeights,
) -> Result<(Objective, Vec<InputIssue>), RosterError> {
    if weights.unfilled < 0 || weights.change < 0 {
        return Err(RosterError::InvalidWeights(format!(
            "weights must not be negative (unfilled {}, change {})",
            weights.unfilled, weights.change
        )));
    }

    let issues = link_priors(model, problem);

    let stability_terms = model.slots.iter().filter(|s| s.prior.is_some()).count();
    let sentinels = model.num_sentinels();
    let too_large = |bound: i64| RosterError::ModelTooLarge {
        bound,
        slots: problem.slots.len(),
        stability_terms,
    };

    let total_change = weights
        .change
        .checked_mul(stability_terms as i64)
        .ok_or_else(|| too_large(i64::MAX))?;
    let unfilled_weight = weights.unfilled.max(total_change.saturating_add(1));
    let upper_bound = unfilled_weight
        .checked_mul(sentinels as i64)
        .and_then(|u| u.checked_add(total_change))
        .ok_or_else(|| too_large(i64::MAX))?;
    if upper_bound > i64::from(i32::MAX) {
        return Err(too_large(upper_bound));
    }

    let mut terms = Vec::new();
    for slot in &model.slots {
        if let Some(var) = slot.unfilled {
            terms.push((var, unfilled_weight));
        }
        if let Some(prior) = &slot.prior {
            if weights.change > 0 {
                terms.push((prior.changed, weights.change));
            }
        }
    }

    Ok((
        Objective {
            terms,
            upper_bound,
            unfilled_weight,
            change_weight: weights.change,
            stability_terms,
        },
        issues,
    ))
}

fn link_priors(model: &mut AssignmentModel, problem: &RosterProblem) -> Vec<InputIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for prior in &problem.priors {
        let issue = |kind, detail: String| InputIssue {
            kind,
            slot_id: prior.slot_id.clone(),
            staff_id: prior.staff_id.clone(),
            detail,
        };

        let Some(&slot_idx) = model.slot_index.get(&prior.slot_id) else {
            issues.push(issue(
                InputIssueKind::PriorUnknownSlot,
                "last approved assignment names a slot that is not part of this roster".into(),
            ));
            continue;
        };
        // First entry for a slot claims it
        if !seen.insert(slot_idx) {
            issues.push(issue(
                InputIssueKind::PriorDuplicate,
                "slot already has a last approved assignment".into(),
            ));
            continue;
        }

        let target = Assignee::from_id(&prior.staff_id);
        if let Assignee::Staff(id) = &target {
            let Some(&staff_idx) = model.staff_index.get(id) else {
                issues.push(issue(
                    InputIssueKind::PriorUnknownStaff,
                    "last approved assignment names an unknown staff member".into(),
                ));
                continue;
            };
            if let Some(reason) = model.slots[slot_idx].rejection(staff_idx) {
                let detail = format!("staff is no longer eligible ({})", reason);
                issues.push(issue(InputIssueKind::PriorIneligible, detail));
                continue;
            }
        }

        let Some(held) = model.slots[slot_idx].var_for(&target, &model.staff_index) else {
            // Only reachable for an unfilled prior without a sentinel
            issues.push(issue(
                InputIssueKind::PriorIneligible,
                "slot cannot stay unfilled in this mode".into(),
            ));
            continue;
        };

        let changed = model.new_var(VarKind::Changed { slot: slot_idx });
        model.add(LinearConstraint::new(
            vec![(changed, 1), (held, 1)],
            Relation::Eq,
            1,
            ConstraintKind::ChangeLink {
                slot_id: prior.slot_id.clone(),
                target: target.clone(),
            },
        ));
        model.slots[slot_idx].prior = Some(PriorLink { target, changed });
    }

    issues
}
