//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::Guard;
use crate::effects::{
    Progress, Target, Transition, TransitionAction, TransitionError, TransitionKey, BACK, END,
};
use std::sync::Arc;
use stillwater::effect::BoxedEffect;

/// Builder for constructing transitions with a fluent API.
pub struct TransitionBuilder<Env> {
    on: Option<String>,
    guard: Option<Guard<Env>>,
    action: Option<TransitionAction<Env>>,
    target: Option<Target>,
}

impl<Env> TransitionBuilder<Env> {
    pub fn new() -> Self {
        Self {
            on: None,
            guard: None,
            action: None,
            target: None,
        }
    }

    /// Set the event name (required).
    pub fn on(mut self, event: impl Into<String>) -> Self {
        self.on = Some(event.into());
        self
    }

    /// Set the target step by name (required unless `.terminates()`).
    ///
    /// The reserved name `"$end"` is the same as calling `.terminates()`.
    pub fn then(mut self, step: impl Into<String>) -> Self {
        let step = step.into();
        self.target = Some(if step == END {
            Target::End
        } else {
            Target::Step(step)
        });
        self
    }

    /// Make the transition end the workflow, leaving no active step.
    pub fn terminates(mut self) -> Self {
        self.target = Some(Target::End);
        self
    }

    /// Add a guard (optional).
    pub fn guard(mut self, guard: Guard<Env>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a guard using a closure (optional).
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Env) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Add a guard whose evaluation may fail (optional).
    pub fn when_fallible<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Env) -> Result<bool, TransitionError> + Send + Sync + 'static,
    {
        self.guard = Some(Guard::fallible(predicate));
        self
    }

    /// Set the action run while the transition is taken (optional).
    pub fn action<F>(mut self, factory: F) -> Self
    where
        F: Fn(Progress) -> BoxedEffect<(), TransitionError, Env> + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(factory));
        self
    }

    /// Set an already shared action (optional).
    pub fn shared_action(mut self, action: TransitionAction<Env>) -> Self {
        self.action = Some(action);
        self
    }

    pub(crate) fn build(self, step: &str, key: TransitionKey) -> Result<Transition<Env>, BuildError> {
        let on = self.on.ok_or_else(|| BuildError::MissingEvent {
            step: step.to_string(),
        })?;
        if on == BACK {
            return Err(BuildError::ReservedEvent {
                step: step.to_string(),
            });
        }

        let target = self.target.ok_or_else(|| BuildError::MissingTarget {
            step: step.to_string(),
            event: on.clone(),
        })?;
        if matches!(&target, Target::Step(name) if name == BACK) {
            return Err(BuildError::ReservedTarget {
                step: step.to_string(),
                event: on,
            });
        }

        Ok(Transition {
            key,
            on,
            guard: self.guard,
            action: self.action,
            target,
        })
    }
}

impl<Env> Default for TransitionBuilder<Env> {
    fn default() -> Self {
        Self::new()
    }
}
