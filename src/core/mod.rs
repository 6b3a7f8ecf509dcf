//! Graph model of a workflow.
//!
//! This module contains the passive parts of the engine:
//! - Steps (the named nodes) and their presentation status
//! - Guard predicates evaluated against the caller's environment
//! - The journal of step changes
//!
//! Nothing here performs effects; dispatch lives in [`crate::effects`].

mod guard;
mod journal;
mod step;

pub use guard::Guard;
pub use journal::{Journal, TransitionRecord};
pub use step::{Step, StepId, StepStatus};
