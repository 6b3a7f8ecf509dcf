//! Event dispatch with effectful transition actions.
//!
//! This module is the engine around the passive graph model in
//! [`crate::core`]: it selects transitions, runs their actions and moves the
//! active step.
//!
//! # Key Concepts
//!
//! - **Transitions**: named edges with an optional guard and an optional action
//! - **Workflow**: owns the steps, tracks the active and previous step, fires events
//! - **Actions**: Stillwater effects built fresh for every fire, given a progress callback
//!
//! Actions are stored as factories returning `BoxedEffect`, one allocation
//! per fire. Use the free-standing constructors `pure()`, `fail()` and
//! `from_fn()` to build them.

mod machine;
mod transition;

pub use machine::{FireOutcome, Fault, Observer, Workflow, WorkflowError};
pub use transition::{
    Progress, Target, Transition, TransitionAction, TransitionError, TransitionKey, BACK, END,
};
