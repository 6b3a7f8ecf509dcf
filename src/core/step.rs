//! Workflow steps: the named nodes of the graph.
//!
//! A step owns its outgoing transitions in registration order. The order
//! matters: when several transitions share an event name, the first one
//! whose guard passes wins.

use crate::effects::Transition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a step inside its owning workflow.
///
/// Step ids are only meaningful for the workflow that issued them. They are
/// assigned in registration order, so the first registered step is `StepId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StepId(pub(crate) usize);

impl StepId {
    /// Position of the step in registration order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Presentation status of a step.
///
/// The engine never reads this; it is carried for whatever renders the
/// workflow (tabs, progress bars, icons).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    #[default]
    ToDo,
    InProgress,
    Done,
    Warning,
    Blocked,
}

/// A named node in the workflow graph.
///
/// # Example
///
/// ```rust
/// use switchyard::builder::{StepBuilder, TransitionBuilder, WorkflowBuilder};
/// use switchyard::core::StepStatus;
///
/// let workflow = WorkflowBuilder::<()>::new()
///     .step(
///         StepBuilder::new("Draft")
///             .transition(TransitionBuilder::new().on("Publish").then("Live")),
///     )
///     .step(StepBuilder::new("Live").status(StepStatus::Done))
///     .build()
///     .unwrap();
///
/// let draft = workflow.step_from_name("Draft").unwrap();
/// assert_eq!(draft.name(), "Draft");
/// assert_eq!(draft.transitions().len(), 1);
/// assert_eq!(draft.status(), StepStatus::ToDo);
/// ```
pub struct Step<Env> {
    pub(crate) id: StepId,
    pub(crate) name: String,
    pub(crate) hidden: bool,
    pub(crate) status: StepStatus,
    pub(crate) transitions: Vec<Transition<Env>>,
}

impl<Env> Step<Env> {
    pub fn id(&self) -> StepId {
        self.id
    }

    /// Unique name of the step within its workflow.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hidden steps are not shown as tabs. Error and dialog steps are
    /// usually hidden.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn status(&self) -> StepStatus {
        self.status
    }

    /// Outgoing transitions in registration order.
    pub fn transitions(&self) -> &[Transition<Env>] {
        &self.transitions
    }

    /// Transitions whose event name equals `event`, in registration order.
    pub fn transitions_on<'a>(&'a self, event: &'a str) -> impl Iterator<Item = &'a Transition<Env>> {
        self.transitions.iter().filter(move |t| t.on() == event)
    }
}

impl<Env> fmt::Debug for Step<Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("hidden", &self.hidden)
            .field("status", &self.status)
            .field("transitions", &self.transitions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{StepBuilder, TransitionBuilder, WorkflowBuilder};

    fn two_step_workflow() -> crate::effects::Workflow<()> {
        WorkflowBuilder::new()
            .step(
                StepBuilder::new("Start")
                    .transition(TransitionBuilder::new().on("Next").when(|_| false).then("End"))
                    .transition(TransitionBuilder::new().on("Skip").then("End"))
                    .transition(TransitionBuilder::new().on("Next").then("End")),
            )
            .step(StepBuilder::new("End").hidden())
            .build()
            .unwrap()
    }

    #[test]
    fn ids_follow_registration_order() {
        let workflow = two_step_workflow();
        assert_eq!(workflow.step_from_name("Start").unwrap().id().index(), 0);
        assert_eq!(workflow.step_from_name("End").unwrap().id().index(), 1);
    }

    #[test]
    fn transitions_on_preserves_order() {
        let workflow = two_step_workflow();
        let start = workflow.step_from_name("Start").unwrap();

        let next: Vec<_> = start.transitions_on("Next").collect();
        assert_eq!(next.len(), 2);
        assert!(next[0].is_guarded());
        assert!(!next[1].is_guarded());
        assert_eq!(start.transitions_on("Missing").count(), 0);
    }

    #[test]
    fn hidden_flag_and_default_status() {
        let workflow = two_step_workflow();
        let end = workflow.step_from_name("End").unwrap();
        assert!(end.is_hidden());
        assert_eq!(end.status(), StepStatus::ToDo);
    }

    #[test]
    fn status_serializes_correctly() {
        let json = serde_json::to_string(&StepStatus::InProgress).unwrap();
        let status: StepStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(status, StepStatus::InProgress);
    }
}
