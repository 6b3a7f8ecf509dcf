//! Declarative workflow definitions.
//!
//! A definition describes the graph as data: step names, event names and
//! target names. Guards and actions are referred to by name and bound to
//! closures through [`Bindings`] when the definition is assembled, so the
//! same definition file can drive workflows over different environments.
//!
//! # Example
//!
//! ```rust
//! use switchyard::definition::{Bindings, WorkflowDefinition};
//!
//! let definition = WorkflowDefinition::from_json(r#"{
//!     "steps": [
//!         { "name": "Form", "transitions": [
//!             { "on": "Submit", "when": "complete", "then": "Done" }
//!         ] },
//!         { "name": "Done" }
//!     ]
//! }"#).unwrap();
//!
//! let bindings = Bindings::new().guard("complete", |filled: &bool| *filled);
//! let workflow = definition.build(&bindings).unwrap();
//!
//! assert!(workflow.is_active("Form"));
//! assert!(workflow.is_enabled("Done", &true));
//! ```

mod bindings;

pub use bindings::Bindings;

use crate::builder::{BuildError, StepBuilder, TransitionBuilder, WorkflowBuilder};
use crate::core::StepStatus;
use crate::effects::Workflow;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading a definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Definition could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Serializable description of a whole workflow graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub steps: Vec<StepDefinition>,

    /// Initially active step; defaults to the first step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    /// Step entered when a guard or action fails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_step: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub name: String,

    #[serde(default)]
    pub hidden: bool,

    #[serde(default)]
    pub status: StepStatus,

    #[serde(default)]
    pub transitions: Vec<TransitionDefinition>,
}

/// One transition. `then` may be `"$end"` to end the workflow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionDefinition {
    pub on: String,

    /// Name of a guard in the bindings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,

    /// Name of an action in the bindings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    pub then: String,
}

impl WorkflowDefinition {
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, DefinitionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Turn the definition into a builder, resolving guard and action names.
    ///
    /// The builder can still be customized (observers, progress sinks)
    /// before it is built.
    pub fn assemble<Env: Clone + Send + Sync + 'static>(
        &self,
        bindings: &Bindings<Env>,
    ) -> Result<WorkflowBuilder<Env>, BuildError> {
        let mut builder = WorkflowBuilder::new();

        for step in &self.steps {
            let mut step_builder = StepBuilder::new(step.name.as_str()).status(step.status);
            if step.hidden {
                step_builder = step_builder.hidden();
            }

            for transition in &step.transitions {
                step_builder = step_builder.transition(transition.assemble(bindings)?);
            }
            builder = builder.step(step_builder);
        }

        if let Some(start) = &self.start {
            builder = builder.start(start.as_str());
        }
        if let Some(error_step) = &self.error_step {
            builder = builder.error_step(error_step.as_str());
        }
        Ok(builder)
    }

    /// Assemble and build in one go.
    pub fn build<Env: Clone + Send + Sync + 'static>(
        &self,
        bindings: &Bindings<Env>,
    ) -> Result<Workflow<Env>, BuildError> {
        self.assemble(bindings)?.build()
    }
}

impl TransitionDefinition {
    fn assemble<Env>(&self, bindings: &Bindings<Env>) -> Result<TransitionBuilder<Env>, BuildError> {
        let mut builder = TransitionBuilder::new()
            .on(self.on.as_str())
            .then(self.then.as_str());

        if let Some(name) = &self.when {
            builder = builder.guard(bindings.guard_named(name)?);
        }
        if let Some(name) = &self.action {
            builder = builder.shared_action(bindings.action_named(name)?);
        }
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::END;

    const APPROVAL: &str = r#"{
        "steps": [
            { "name": "FillingForm", "transitions": [
                { "on": "Submit", "when": "form_complete", "then": "Approving" }
            ] },
            { "name": "Approving", "status": "InProgress", "transitions": [
                { "on": "Approve", "action": "record", "then": "Done" },
                { "on": "Cancel", "then": "$end" }
            ] },
            { "name": "Done" },
            { "name": "Oops", "hidden": true }
        ],
        "error_step": "Oops"
    }"#;

    #[test]
    fn parses_json_definition() {
        let definition = WorkflowDefinition::from_json(APPROVAL).unwrap();

        assert_eq!(definition.steps.len(), 4);
        assert_eq!(definition.error_step.as_deref(), Some("Oops"));
        assert!(definition.steps[3].hidden);
        assert_eq!(definition.steps[1].status, StepStatus::InProgress);
        assert_eq!(definition.steps[1].transitions[1].then, END);
    }

    #[test]
    fn builds_with_bindings() {
        use stillwater::prelude::*;

        let definition = WorkflowDefinition::from_json(APPROVAL).unwrap();
        let bindings = Bindings::new()
            .guard("form_complete", |filled: &bool| *filled)
            .action("record", |_progress| pure(()).boxed());

        let workflow = definition.build(&bindings).unwrap();

        assert!(workflow.is_active("FillingForm"));
        assert_eq!(workflow.error_step().unwrap().name(), "Oops");
        assert!(workflow.step_from_name("Oops").unwrap().is_hidden());
        assert!(workflow.valid_transitions("Submit", &false).is_empty());
        assert_eq!(workflow.valid_transitions("Submit", &true).len(), 1);
    }

    #[test]
    fn unknown_guard_name_fails() {
        let definition = WorkflowDefinition::from_json(APPROVAL).unwrap();
        let bindings: Bindings<bool> = Bindings::new();

        let err = definition.build(&bindings).unwrap_err();
        assert_eq!(err, BuildError::UnknownGuard("form_complete".to_string()));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = WorkflowDefinition::from_json(r#"{ "steps": [ { "hidden": true } ] }"#).unwrap_err();
        assert!(matches!(err, DefinitionError::Parse(_)));
    }

    #[test]
    fn definition_survives_json_roundtrip() {
        let definition = WorkflowDefinition::from_json(APPROVAL).unwrap();
        let restored = WorkflowDefinition::from_json(&definition.to_json().unwrap()).unwrap();
        assert_eq!(definition, restored);
    }
}
