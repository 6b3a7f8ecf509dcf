//! Build errors for workflow, step and transition builders.

use thiserror::Error;

/// Errors that can occur when assembling a workflow graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("No steps defined. Add at least one step")]
    NoSteps,

    #[error("Step '{0}' is defined more than once")]
    DuplicateStep(String),

    #[error("Transition on step '{step}' has no event name. Call .on(event)")]
    MissingEvent { step: String },

    #[error("Transition '{event}' on step '{step}' has no target. Call .then(step) or .terminates()")]
    MissingTarget { step: String, event: String },

    #[error("Step '{step}' declares a transition on the reserved event '$back'")]
    ReservedEvent { step: String },

    #[error("Transition '{event}' on step '{step}' targets the reserved name '$back'")]
    ReservedTarget { step: String, event: String },

    #[error("Start step '{0}' is not defined")]
    UnknownStartStep(String),

    #[error("Error step '{0}' is not defined")]
    UnknownErrorStep(String),

    #[error("No guard bound under the name '{0}'")]
    UnknownGuard(String),

    #[error("No action bound under the name '{0}'")]
    UnknownAction(String),
}
