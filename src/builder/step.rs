//! Builder for constructing steps.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::core::{Step, StepId, StepStatus};
use crate::effects::TransitionKey;

/// Builder for a single step and its outgoing transitions.
///
/// Transitions keep the order in which they are added.
pub struct StepBuilder<Env> {
    pub(crate) name: String,
    hidden: bool,
    status: StepStatus,
    transitions: Vec<TransitionBuilder<Env>>,
}

impl<Env> StepBuilder<Env> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hidden: false,
            status: StepStatus::default(),
            transitions: Vec::new(),
        }
    }

    /// Keep the step out of tab strips; typical for error and dialog steps.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn status(mut self, status: StepStatus) -> Self {
        self.status = status;
        self
    }

    /// Append an outgoing transition.
    pub fn transition(mut self, builder: TransitionBuilder<Env>) -> Self {
        self.transitions.push(builder);
        self
    }

    pub(crate) fn build(self, id: StepId) -> Result<Step<Env>, BuildError> {
        let transitions = self
            .transitions
            .into_iter()
            .enumerate()
            .map(|(index, builder)| builder.build(&self.name, TransitionKey { step: id, index }))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Step {
            id,
            name: self.name,
            hidden: self.hidden,
            status: self.status,
            transitions,
        })
    }
}
