//! Defects a graph lint can report.

use thiserror::Error;

/// A defect in a workflow graph.
///
/// None of these stop a workflow from running; each describes a transition
/// or step that will never behave as its author probably intended.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphIssue {
    #[error("Transition '{event}' on step '{step}' targets undefined step '{target}'")]
    DanglingTarget {
        step: String,
        event: String,
        target: String,
    },

    #[error("Transition #{index} '{event}' on step '{step}' follows an unguarded transition with the same event and can never be taken")]
    ShadowedTransition {
        step: String,
        event: String,
        index: usize,
    },

    #[error("Step '{step}' cannot be reached from the start step")]
    Unreachable { step: String },
}
