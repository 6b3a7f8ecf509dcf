//! Builder API for ergonomic workflow construction.
//!
//! This module provides fluent builders for assembling a workflow graph
//! once, up front. The resulting [`Workflow`](crate::effects::Workflow)
//! cannot be reshaped afterwards.

pub mod error;
pub mod machine;
pub mod step;
pub mod transition;

pub use error::BuildError;
pub use machine::WorkflowBuilder;
pub use step::StepBuilder;
pub use transition::TransitionBuilder;

/// Create an unconditional transition.
///
/// # Example
///
/// ```
/// use switchyard::builder::{simple_transition, StepBuilder, WorkflowBuilder};
///
/// let workflow = WorkflowBuilder::<()>::new()
///     .step(StepBuilder::new("Start").transition(simple_transition("Next", "End")))
///     .step(StepBuilder::new("End"))
///     .build()
///     .unwrap();
///
/// assert_eq!(workflow.single_valid_transition_to("End", &()).unwrap().on(), "Next");
/// ```
pub fn simple_transition<Env>(on: &str, then: &str) -> TransitionBuilder<Env> {
    TransitionBuilder::new().on(on).then(then)
}

/// Create a transition with a guard predicate.
///
/// # Example
///
/// ```
/// use switchyard::builder::{guarded_transition, StepBuilder, WorkflowBuilder};
///
/// let workflow = WorkflowBuilder::<u32>::new()
///     .step(StepBuilder::new("Start").transition(guarded_transition("Next", "End", |n: &u32| *n > 1)))
///     .step(StepBuilder::new("End"))
///     .build()
///     .unwrap();
///
/// assert!(workflow.single_valid_transition_to("End", &0).is_none());
/// assert!(workflow.single_valid_transition_to("End", &2).is_some());
/// ```
pub fn guarded_transition<Env, F>(on: &str, then: &str, guard: F) -> TransitionBuilder<Env>
where
    F: Fn(&Env) -> bool + Send + Sync + 'static,
{
    TransitionBuilder::new().on(on).when(guard).then(then)
}
