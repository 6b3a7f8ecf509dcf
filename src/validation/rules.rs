//! Lint rules for workflow graphs using Validation.

use crate::core::StepId;
use crate::effects::{Target, Workflow};
use crate::validation::issue::GraphIssue;
use std::collections::{HashSet, VecDeque};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Result of linting a workflow.
pub type GraphValidation = Validation<(), NonEmptyVec<GraphIssue>>;

/// Lint a workflow, accumulating ALL issues.
///
/// Returns `Validation::Success(())` for a clean graph, otherwise
/// `Validation::Failure` with every issue found.
pub fn validate<Env: Clone + Send + Sync + 'static>(workflow: &Workflow<Env>) -> GraphValidation {
    let checks: Vec<GraphValidation> = dangling_targets(workflow)
        .into_iter()
        .chain(shadowed_transitions(workflow))
        .chain(unreachable_steps(workflow))
        .map(|issue| Validation::fail(issue))
        .collect();

    if checks.is_empty() {
        return Validation::success(());
    }
    Validation::all_vec(checks).map(|_| ())
}

/// Every issue in the workflow as a plain list.
pub fn issues<Env: Clone + Send + Sync + 'static>(workflow: &Workflow<Env>) -> Vec<GraphIssue> {
    match validate(workflow) {
        Validation::Success(_) => Vec::new(),
        Validation::Failure(errors) => errors.iter().cloned().collect(),
    }
}

fn dangling_targets<Env: Clone + Send + Sync + 'static>(
    workflow: &Workflow<Env>,
) -> Vec<GraphIssue> {
    let mut found = Vec::new();
    for step in workflow.steps() {
        for transition in step.transitions() {
            if let Target::Step(target) = transition.target() {
                if workflow.step_from_name(target).is_none() {
                    found.push(GraphIssue::DanglingTarget {
                        step: step.name().to_string(),
                        event: transition.on().to_string(),
                        target: target.clone(),
                    });
                }
            }
        }
    }
    found
}

fn shadowed_transitions<Env: Clone + Send + Sync + 'static>(
    workflow: &Workflow<Env>,
) -> Vec<GraphIssue> {
    let mut found = Vec::new();
    for step in workflow.steps() {
        let mut unguarded = HashSet::new();
        for (index, transition) in step.transitions().iter().enumerate() {
            if unguarded.contains(transition.on()) {
                found.push(GraphIssue::ShadowedTransition {
                    step: step.name().to_string(),
                    event: transition.on().to_string(),
                    index,
                });
            } else if !transition.is_guarded() {
                unguarded.insert(transition.on());
            }
        }
    }
    found
}

fn unreachable_steps<Env: Clone + Send + Sync + 'static>(
    workflow: &Workflow<Env>,
) -> Vec<GraphIssue> {
    let Some(start) = workflow.start() else {
        return Vec::new();
    };

    let mut visited: HashSet<StepId> = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(id) = queue.pop_front() {
        let Some(step) = workflow.step(id) else {
            continue;
        };
        for transition in step.transitions() {
            if let Target::Step(target) = transition.target() {
                if let Some(next) = workflow.step_from_name(target) {
                    if visited.insert(next.id()) {
                        queue.push_back(next.id());
                    }
                }
            }
        }
    }

    let error_step = workflow.error_step().map(|step| step.id());
    workflow
        .steps()
        .iter()
        .filter(|step| !visited.contains(&step.id()) && Some(step.id()) != error_step)
        .map(|step| GraphIssue::Unreachable {
            step: step.name().to_string(),
        })
        .collect()
}
