//! Workflow that dispatches named events through guarded transitions.

use crate::core::{Journal, Step, StepId, StepStatus, TransitionRecord};
use crate::effects::transition::{
    Progress, Target, Transition, TransitionError, TransitionKey, BACK,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use stillwater::effect::Effect;
use tracing::{debug, info, warn};

/// Callback notified after every change of the active step.
pub type Observer = Arc<dyn Fn(&TransitionRecord) + Send + Sync>;

/// What a call to [`Workflow::fire`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FireOutcome {
    /// A transition was taken. `to` is `None` when it ended the workflow.
    Moved { from: StepId, to: Option<StepId> },

    /// `$back` restored the previous step (possibly none).
    Back { to: Option<StepId> },

    /// No transition with this event name passed its guard.
    Ignored,

    /// A transition was selected and its action ran, but its target names
    /// no known step. The active step is unchanged.
    Unresolved { target: String },

    /// A guard or action failed and the workflow moved to its error step.
    Faulted { error_step: StepId },
}

/// A failure caught while firing, kept while the error step is active.
#[derive(Clone, Debug, PartialEq)]
pub struct Fault {
    pub event: String,
    /// Step that was active when the failure happened
    pub step: String,
    pub error: TransitionError,
    pub caught_at: DateTime<Utc>,
}

/// Errors returned to callers of the workflow.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorkflowError {
    #[error("Transition on '{event}' from step '{step}' failed: {source}")]
    Fault {
        event: String,
        step: String,
        #[source]
        source: TransitionError,
    },

    #[error("Step '{0}' not found")]
    UnknownStep(String),
}

/// A graph of named steps with one active step at a time.
///
/// Steps are owned by the workflow and addressed by [`StepId`]; transitions
/// name their targets, which are resolved lazily and memoized per transition.
/// The graph cannot change after [`WorkflowBuilder::build`]; a different
/// graph needs a new workflow.
///
/// Only one `fire` may be in flight at a time. `fire` takes `&mut self`, so
/// sharing a workflow between tasks requires an external lock or a queue.
///
/// [`WorkflowBuilder::build`]: crate::builder::WorkflowBuilder::build
pub struct Workflow<Env> {
    steps: Vec<Step<Env>>,
    names: HashMap<String, StepId>,
    start: Option<StepId>,
    active: Option<StepId>,
    previous: Option<StepId>,
    error_step: Option<StepId>,
    caught: Option<Fault>,
    targets: HashMap<TransitionKey, StepId>,
    journal: Journal,
    observer: Option<Observer>,
    progress: Option<Progress>,
}

impl<Env: Clone + Send + Sync + 'static> Workflow<Env> {
    pub(crate) fn from_parts(
        steps: Vec<Step<Env>>,
        start: Option<StepId>,
        error_step: Option<StepId>,
        observer: Option<Observer>,
        progress: Option<Progress>,
    ) -> Self {
        let names = steps
            .iter()
            .map(|step| (step.name.clone(), step.id))
            .collect();
        let start = start.or_else(|| steps.first().map(|step| step.id));

        Self {
            steps,
            names,
            start,
            active: start,
            previous: None,
            error_step,
            caught: None,
            targets: HashMap::new(),
            journal: Journal::new(),
            observer,
            progress,
        }
    }

    /// Find a step by its exact name.
    pub fn step_from_name(&self, name: &str) -> Option<&Step<Env>> {
        self.names.get(name).and_then(|id| self.step(*id))
    }

    pub fn step(&self, id: StepId) -> Option<&Step<Env>> {
        self.steps.get(id.0)
    }

    /// All steps in registration order.
    pub fn steps(&self) -> &[Step<Env>] {
        &self.steps
    }

    /// Zero-based registration position of the named step.
    pub fn index_of_step(&self, name: &str) -> Option<usize> {
        self.names.get(name).map(|id| id.index())
    }

    /// Step that was active when the workflow was built.
    pub fn start(&self) -> Option<StepId> {
        self.start
    }

    pub fn active(&self) -> Option<StepId> {
        self.active
    }

    /// The active step, or `None` once the workflow has ended.
    pub fn active_step(&self) -> Option<&Step<Env>> {
        self.active.and_then(|id| self.step(id))
    }

    /// The step `$back` would return to.
    pub fn previous_step(&self) -> Option<&Step<Env>> {
        self.previous.and_then(|id| self.step(id))
    }

    pub fn error_step(&self) -> Option<&Step<Env>> {
        self.error_step.and_then(|id| self.step(id))
    }

    /// The failure that moved the workflow to its error step. Cleared by the
    /// next call to `fire`.
    pub fn caught_fault(&self) -> Option<&Fault> {
        self.caught.as_ref()
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Hand the recorded changes to the caller and start a fresh journal.
    pub fn take_journal(&mut self) -> Journal {
        std::mem::take(&mut self.journal)
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active_step().is_some_and(|step| step.name == name)
    }

    /// Transitions of the active step carrying this event name, in
    /// registration order. Empty when there is no active step.
    pub fn events_from_name<'a>(
        &'a self,
        event: &'a str,
    ) -> impl Iterator<Item = &'a Transition<Env>> + 'a {
        self.active_step()
            .into_iter()
            .flat_map(move |step| step.transitions_on(event))
    }

    /// Transitions of the active step with this event name whose guards
    /// currently pass. A guard that fails to evaluate counts as not passing.
    pub fn valid_transitions<'a>(&'a self, event: &'a str, env: &Env) -> Vec<&'a Transition<Env>> {
        self.events_from_name(event)
            .filter(|transition| passes(transition, env))
            .collect()
    }

    /// Resolve the target step of a transition, memoizing a successful
    /// lookup. A target that names no step is looked up again next time.
    pub fn next_step(&mut self, key: TransitionKey) -> Option<StepId> {
        if let Some(id) = self.targets.get(&key) {
            return Some(*id);
        }

        let name = match self.transition(key).map(|t| &t.target) {
            Some(Target::Step(name)) => name,
            _ => return None,
        };
        let id = *self.names.get(name)?;
        self.targets.insert(key, id);
        Some(id)
    }

    /// The single transition from the active step that leads to `target`
    /// and whose guard currently passes.
    ///
    /// Returns `None` both when no transition qualifies and when several do:
    /// an ambiguous route is not something a caller should take on its own.
    /// A name that matches no step is never reachable, even when a transition
    /// points at it.
    pub fn single_valid_transition_to(&self, target: &str, env: &Env) -> Option<&Transition<Env>> {
        let target = self.step_from_name(target)?.name();
        let step = self.active_step()?;
        let mut candidates = step
            .transitions
            .iter()
            .filter(|transition| transition.leads_to(target) && passes(transition, env));

        match (candidates.next(), candidates.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    /// A step is enabled when it is active or uniquely reachable from the
    /// active step.
    pub fn is_enabled(&self, name: &str, env: &Env) -> bool {
        self.is_active(name) || self.single_valid_transition_to(name, env).is_some()
    }

    pub fn set_status(&mut self, name: &str, status: StepStatus) -> Result<(), WorkflowError> {
        let id = *self
            .names
            .get(name)
            .ok_or_else(|| WorkflowError::UnknownStep(name.to_string()))?;
        self.steps[id.0].status = status;
        Ok(())
    }

    /// Fire the event of the single valid transition leading to `name`.
    ///
    /// Does nothing when the step is not uniquely reachable.
    pub async fn fire_default(&mut self, name: &str, env: &Env) -> Result<FireOutcome, WorkflowError> {
        let event = self
            .single_valid_transition_to(name, env)
            .map(|transition| transition.on.clone());

        match event {
            Some(event) => self.fire(&event, env).await,
            None => Ok(FireOutcome::Ignored),
        }
    }

    /// Dispatch a named event against the active step.
    ///
    /// The first transition with this event name whose guard passes is
    /// taken: its action runs to completion, then the active step moves to
    /// its target. `$back` bypasses the transitions and restores the
    /// previous step; observers and the journal only hear about it when the
    /// active step actually changes.
    ///
    /// A failing guard or action moves the workflow to its error step when
    /// one is configured. Without one, the failure is returned and the
    /// workflow is left exactly as it was.
    pub async fn fire(&mut self, event: &str, env: &Env) -> Result<FireOutcome, WorkflowError> {
        self.caught = None;

        if event == BACK {
            let from = self.active;
            self.active = self.previous;
            if from != self.active {
                self.record_change(event, from, self.active);
            }
            return Ok(FireOutcome::Back { to: self.active });
        }

        let Some(from) = self.active else {
            debug!(event, "no active step, event ignored");
            return Ok(FireOutcome::Ignored);
        };

        match self.take(from, event, env).await {
            Ok(outcome) => Ok(outcome),
            Err(error) => self.divert(event, from, error),
        }
    }

    async fn take(
        &mut self,
        from: StepId,
        event: &str,
        env: &Env,
    ) -> Result<FireOutcome, TransitionError> {
        let Some(key) = self.select(event, env)? else {
            debug!(event, step = self.name_of(from), "no transition permitted");
            return Ok(FireOutcome::Ignored);
        };

        let action = self.transition(key).and_then(|t| t.action.clone());
        if let Some(action) = action {
            let progress = self.progress_for(event);
            (action)(progress).run(env).await?;
        }

        match self.transition(key).map(|t| t.target.clone()) {
            Some(Target::End) => {
                self.move_to(event, from, None);
                Ok(FireOutcome::Moved { from, to: None })
            }
            Some(Target::Step(target)) => match self.next_step(key) {
                Some(to) => {
                    self.move_to(event, from, Some(to));
                    Ok(FireOutcome::Moved { from, to: Some(to) })
                }
                None => {
                    warn!(event, target = %target, "transition target names no step");
                    Ok(FireOutcome::Unresolved { target })
                }
            },
            None => Ok(FireOutcome::Ignored),
        }
    }

    /// First transition for `event` whose guard passes.
    fn select(&self, event: &str, env: &Env) -> Result<Option<TransitionKey>, TransitionError> {
        for transition in self.events_from_name(event) {
            if transition.permits(env)? {
                return Ok(Some(transition.key));
            }
        }
        Ok(None)
    }

    fn divert(
        &mut self,
        event: &str,
        from: StepId,
        error: TransitionError,
    ) -> Result<FireOutcome, WorkflowError> {
        let step = self.name_of(from).to_string();

        let Some(error_step) = self.error_step else {
            warn!(event, step = %step, %error, "transition failed, no error step configured");
            return Err(WorkflowError::Fault {
                event: event.to_string(),
                step,
                source: error,
            });
        };

        warn!(event, step = %step, %error, "transition failed, diverting to error step");
        self.caught = Some(Fault {
            event: event.to_string(),
            step,
            error,
            caught_at: Utc::now(),
        });
        self.move_to(event, from, Some(error_step));
        Ok(FireOutcome::Faulted { error_step })
    }

    fn move_to(&mut self, event: &str, from: StepId, to: Option<StepId>) {
        self.previous = Some(from);
        self.active = to;
        self.record_change(event, Some(from), to);
    }

    fn record_change(&mut self, event: &str, from: Option<StepId>, to: Option<StepId>) {
        let record = TransitionRecord::new(
            event,
            from.map(|id| self.name_of(id).to_string()),
            to.map(|id| self.name_of(id).to_string()),
        );
        info!(
            event,
            from = record.from.as_deref().unwrap_or("-"),
            to = record.to.as_deref().unwrap_or("-"),
            "active step changed"
        );

        if let Some(observer) = &self.observer {
            observer(&record);
        }
        self.journal.record(record);
    }

    fn progress_for(&self, event: &str) -> Progress {
        let sink = self.progress.clone();
        let event = event.to_string();
        Arc::new(move |status: &str| {
            debug!(event = %event, status, "transition progress");
            if let Some(sink) = &sink {
                sink(status);
            }
        })
    }

    fn transition(&self, key: TransitionKey) -> Option<&Transition<Env>> {
        self.step(key.step)?.transitions.get(key.index)
    }

    fn name_of(&self, id: StepId) -> &str {
        self.step(id).map(|step| step.name()).unwrap_or_default()
    }
}

fn passes<Env>(transition: &Transition<Env>, env: &Env) -> bool {
    match transition.permits(env) {
        Ok(permitted) => permitted,
        Err(error) => {
            warn!(event = transition.on(), %error, "guard failed during query");
            false
        }
    }
}

impl<Env> fmt::Debug for Workflow<Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workflow")
            .field("steps", &self.steps)
            .field("active", &self.active)
            .field("previous", &self.previous)
            .field("error_step", &self.error_step)
            .field("caught", &self.caught)
            .finish_non_exhaustive()
    }
}
