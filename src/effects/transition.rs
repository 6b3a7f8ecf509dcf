//! Transition types with effectful actions.

use crate::core::{Guard, StepId};
use std::fmt;
use std::sync::Arc;
use stillwater::effect::BoxedEffect;

/// Reserved event name that returns to the previously active step.
pub const BACK: &str = "$back";

/// Reserved target name meaning "leave the workflow with no active step".
pub const END: &str = "$end";

/// Errors raised by guards and actions while a transition is being taken.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransitionError {
    #[error("Guard evaluation failed: {0}")]
    GuardFailed(String),

    #[error("Transition action failed: {0}")]
    ActionFailed(String),
}

/// Callback an action uses to report intermediate status.
pub type Progress = Arc<dyn Fn(&str) + Send + Sync>;

/// Factory producing a fresh action effect each time the transition is taken.
pub type TransitionAction<Env> =
    Arc<dyn Fn(Progress) -> BoxedEffect<(), TransitionError, Env> + Send + Sync>;

/// Where a transition leads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// The step with this name
    Step(String),
    /// No step: the workflow ends with no active step
    End,
}

impl Target {
    pub fn name(&self) -> &str {
        match self {
            Target::Step(name) => name,
            Target::End => END,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Address of a transition: its source step and its position there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransitionKey {
    pub step: StepId,
    pub index: usize,
}

/// A directed edge from a step, taken when its event is fired and its guard
/// passes.
pub struct Transition<Env> {
    pub(crate) key: TransitionKey,
    pub(crate) on: String,
    pub(crate) guard: Option<Guard<Env>>,
    pub(crate) action: Option<TransitionAction<Env>>,
    pub(crate) target: Target,
}

impl<Env> Transition<Env> {
    pub fn key(&self) -> TransitionKey {
        self.key
    }

    /// Step this transition leaves from.
    pub fn source(&self) -> StepId {
        self.key.step
    }

    /// Event name that triggers this transition.
    pub fn on(&self) -> &str {
        &self.on
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn is_guarded(&self) -> bool {
        self.guard.is_some()
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    /// Evaluate the guard; an absent guard always permits.
    pub fn permits(&self, env: &Env) -> Result<bool, TransitionError> {
        match &self.guard {
            Some(guard) => guard.check(env),
            None => Ok(true),
        }
    }

    /// Check whether this transition leads to the step called `name`.
    pub fn leads_to(&self, name: &str) -> bool {
        matches!(&self.target, Target::Step(target) if target == name)
    }
}

impl<Env> fmt::Debug for Transition<Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("key", &self.key)
            .field("on", &self.on)
            .field("guarded", &self.guard.is_some())
            .field("action", &self.action.is_some())
            .field("target", &self.target)
            .finish()
    }
}
