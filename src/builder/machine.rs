//! Builder for constructing workflows.

use crate::builder::error::BuildError;
use crate::builder::step::StepBuilder;
use crate::core::{Step, StepId, TransitionRecord};
use crate::effects::{Observer, Progress, Target, Workflow};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

/// Builder for constructing workflows with a fluent API.
///
/// # Example
///
/// ```rust
/// use switchyard::builder::{StepBuilder, TransitionBuilder, WorkflowBuilder};
///
/// let workflow = WorkflowBuilder::<()>::new()
///     .step(StepBuilder::new("Login").transition(TransitionBuilder::new().on("Submit").then("Home")))
///     .step(StepBuilder::new("Home"))
///     .step(StepBuilder::new("Error").hidden())
///     .error_step("Error")
///     .build()
///     .unwrap();
///
/// assert!(workflow.is_active("Login"));
/// ```
pub struct WorkflowBuilder<Env> {
    steps: Vec<StepBuilder<Env>>,
    start: Option<String>,
    error_step: Option<String>,
    observer: Option<Observer>,
    progress: Option<Progress>,
}

impl<Env: Clone + Send + Sync + 'static> WorkflowBuilder<Env> {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            start: None,
            error_step: None,
            observer: None,
            progress: None,
        }
    }

    /// Register a step. Registration order is significant: without an
    /// explicit `.start()`, the first step becomes active.
    pub fn step(mut self, step: StepBuilder<Env>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(mut self, steps: Vec<StepBuilder<Env>>) -> Self {
        self.steps.extend(steps);
        self
    }

    /// Choose the initially active step.
    pub fn start(mut self, name: impl Into<String>) -> Self {
        self.start = Some(name.into());
        self
    }

    /// Step to move to when a guard or action fails.
    pub fn error_step(mut self, name: impl Into<String>) -> Self {
        self.error_step = Some(name.into());
        self
    }

    /// Observe every change of the active step.
    pub fn on_change<F>(mut self, observer: F) -> Self
    where
        F: Fn(&TransitionRecord) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Receive progress messages reported by transition actions.
    pub fn on_progress<F>(mut self, sink: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(sink));
        self
    }

    /// Build the workflow.
    ///
    /// Fails on structural defects. Transitions whose target names no step
    /// are allowed; they are logged here and stay inert at fire time.
    pub fn build(self) -> Result<Workflow<Env>, BuildError> {
        if self.steps.is_empty() {
            return Err(BuildError::NoSteps);
        }

        {
            let mut seen = HashSet::new();
            for step in &self.steps {
                if !seen.insert(step.name.as_str()) {
                    return Err(BuildError::DuplicateStep(step.name.clone()));
                }
            }
        }

        let steps = self
            .steps
            .into_iter()
            .enumerate()
            .map(|(index, builder)| builder.build(StepId(index)))
            .collect::<Result<Vec<_>, _>>()?;

        let start = self
            .start
            .map(|name| find(&steps, &name).ok_or(BuildError::UnknownStartStep(name)))
            .transpose()?;
        let error_step = self
            .error_step
            .map(|name| find(&steps, &name).ok_or(BuildError::UnknownErrorStep(name)))
            .transpose()?;

        for step in &steps {
            for transition in step.transitions() {
                if let Target::Step(target) = transition.target() {
                    if find(&steps, target).is_none() {
                        warn!(
                            step = step.name(),
                            event = transition.on(),
                            target = %target,
                            "transition targets an undefined step"
                        );
                    }
                }
            }
        }

        Ok(Workflow::from_parts(
            steps,
            start,
            error_step,
            self.observer,
            self.progress,
        ))
    }
}

fn find<Env>(steps: &[Step<Env>], name: &str) -> Option<StepId> {
    steps.iter().find(|step| step.name() == name).map(|step| step.id())
}

impl<Env: Clone + Send + Sync + 'static> Default for WorkflowBuilder<Env> {
    fn default() -> Self {
        Self::new()
    }
}
