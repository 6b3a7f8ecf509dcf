//! Named guards and actions referenced by definitions.

use crate::builder::BuildError;
use crate::core::Guard;
use crate::effects::{Progress, TransitionAction, TransitionError};
use std::collections::HashMap;
use std::sync::Arc;
use stillwater::effect::BoxedEffect;

/// Registry mapping names used in a [`WorkflowDefinition`] to closures.
///
/// [`WorkflowDefinition`]: crate::definition::WorkflowDefinition
pub struct Bindings<Env> {
    guards: HashMap<String, Guard<Env>>,
    actions: HashMap<String, TransitionAction<Env>>,
}

impl<Env> Bindings<Env> {
    pub fn new() -> Self {
        Self {
            guards: HashMap::new(),
            actions: HashMap::new(),
        }
    }

    pub fn guard<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Env) -> bool + Send + Sync + 'static,
    {
        self.guards.insert(name.into(), Guard::new(predicate));
        self
    }

    pub fn fallible_guard<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Env) -> Result<bool, TransitionError> + Send + Sync + 'static,
    {
        self.guards.insert(name.into(), Guard::fallible(predicate));
        self
    }

    pub fn action<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(Progress) -> BoxedEffect<(), TransitionError, Env> + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), Arc::new(factory));
        self
    }

    pub(crate) fn guard_named(&self, name: &str) -> Result<Guard<Env>, BuildError> {
        self.guards
            .get(name)
            .cloned()
            .ok_or_else(|| BuildError::UnknownGuard(name.to_string()))
    }

    pub(crate) fn action_named(&self, name: &str) -> Result<TransitionAction<Env>, BuildError> {
        self.actions
            .get(name)
            .map(Arc::clone)
            .ok_or_else(|| BuildError::UnknownAction(name.to_string()))
    }
}

impl<Env> Default for Bindings<Env> {
    fn default() -> Self {
        Self::new()
    }
}
