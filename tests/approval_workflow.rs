//! End-to-end scenarios for a two-signature test-approval workflow.

use std::sync::{Arc, Mutex};
use stillwater::prelude::*;
use switchyard::builder::{StepBuilder, TransitionBuilder, WorkflowBuilder};
use switchyard::effects::{FireOutcome, TransitionError, Workflow, WorkflowError, BACK};

#[derive(Default)]
struct TestModel {
    test_run_id: Option<u64>,
    first_approver: Option<String>,
    second_approver: Option<String>,
    completion_result: Option<String>,
}

#[derive(Clone, Default)]
struct Approval {
    model: Arc<Mutex<TestModel>>,
    login: Arc<Mutex<(String, String)>>,
}

impl Approval {
    fn sign_in(&self, user: &str, password: &str) {
        *self.login.lock().unwrap() = (user.to_string(), password.to_string());
    }

    fn authenticated_user(&self) -> Option<String> {
        let login = self.login.lock().unwrap();
        let (user, password) = &*login;
        (!user.trim().is_empty() && user == password).then(|| user.to_lowercase())
    }
}

fn approval_workflow() -> Workflow<Approval> {
    let authenticate = |then: &str, second: bool| {
        TransitionBuilder::new()
            .on("Authenticate")
            .when(|env: &Approval| env.authenticated_user().is_some())
            .action(move |progress| {
                from_fn(move |env: &Approval| {
                    let user = env
                        .authenticated_user()
                        .ok_or_else(|| TransitionError::ActionFailed("signer vanished".into()))?;
                    let mut model = env.model.lock().unwrap();
                    if second {
                        model.second_approver = Some(user);
                        progress("generating test output");
                        model.completion_result = Some("Displaying test output!".into());
                    } else {
                        model.first_approver = Some(user);
                    }
                    Ok(())
                })
                .boxed()
            })
            .then(then)
    };
    let restart = || {
        TransitionBuilder::new()
            .on("Start")
            .action(|_progress| {
                from_fn(|env: &Approval| {
                    *env.model.lock().unwrap() = TestModel::default();
                    Ok(())
                })
                .boxed()
            })
            .then("FillingForm")
    };
    let terminate = || TransitionBuilder::new().on("Terminate").terminates();

    WorkflowBuilder::new()
        .step(
            StepBuilder::new("FillingForm")
                .transition(
                    TransitionBuilder::new()
                        .on("Submit")
                        .when(|env: &Approval| env.model.lock().unwrap().test_run_id.is_some())
                        .then("AuthFirst"),
                )
                .transition(terminate()),
        )
        .step(
            StepBuilder::new("AuthFirst")
                .transition(authenticate("AuthSecond", false))
                .transition(restart())
                .transition(terminate()),
        )
        .step(
            StepBuilder::new("AuthSecond")
                .transition(authenticate("ShowingOutcome", true))
                .transition(restart())
                .transition(terminate()),
        )
        .step(StepBuilder::new("ShowingOutcome").transition(terminate()))
        .build()
        .unwrap()
}

async fn authenticate(workflow: &mut Workflow<Approval>, env: &Approval, user: &str, password: &str) {
    env.sign_in(user, password);
    workflow.fire("Authenticate", env).await.unwrap();
}

#[tokio::test]
async fn runs_main_sequence() {
    let mut workflow = approval_workflow();
    let env = Approval::default();

    workflow.fire("Submit", &env).await.unwrap();
    assert!(workflow.is_active("FillingForm"));

    env.model.lock().unwrap().test_run_id = Some(1);
    workflow.fire("Submit", &env).await.unwrap();
    assert!(workflow.is_active("AuthFirst"));

    authenticate(&mut workflow, &env, "fred", "fred").await;
    assert!(workflow.is_active("AuthSecond"));

    authenticate(&mut workflow, &env, "joe", "joe").await;
    assert!(workflow.is_active("ShowingOutcome"));
    {
        let model = env.model.lock().unwrap();
        assert_eq!(model.first_approver.as_deref(), Some("fred"));
        assert_eq!(model.second_approver.as_deref(), Some("joe"));
        assert_eq!(model.completion_result.as_deref(), Some("Displaying test output!"));
    }

    workflow.fire("Terminate", &env).await.unwrap();
    assert!(workflow.active_step().is_none());
    assert_eq!(
        workflow.journal().path(),
        vec![
            Some("FillingForm"),
            Some("AuthFirst"),
            Some("AuthSecond"),
            Some("ShowingOutcome"),
            None
        ]
    );
}

#[tokio::test]
async fn failed_first_authentication_stays_put() {
    let mut workflow = approval_workflow();
    let env = Approval::default();
    env.model.lock().unwrap().test_run_id = Some(1);

    workflow.fire("Submit", &env).await.unwrap();
    authenticate(&mut workflow, &env, "fred", "badpass").await;

    assert!(workflow.is_active("AuthFirst"));
    assert!(env.model.lock().unwrap().first_approver.is_none());
}

#[tokio::test]
async fn start_resets_input_form() {
    let mut workflow = approval_workflow();
    let env = Approval::default();
    env.model.lock().unwrap().test_run_id = Some(1);

    workflow.fire("Submit", &env).await.unwrap();
    authenticate(&mut workflow, &env, "fred", "fred").await;
    workflow.fire("Start", &env).await.unwrap();

    assert!(workflow.is_active("FillingForm"));
    assert!(env.model.lock().unwrap().test_run_id.is_none());
}

#[tokio::test]
async fn terminates_prematurely() {
    let mut workflow = approval_workflow();
    let env = Approval::default();
    env.model.lock().unwrap().test_run_id = Some(1);

    workflow.fire("Submit", &env).await.unwrap();
    authenticate(&mut workflow, &env, "fred", "fred").await;
    let outcome = workflow.fire("Terminate", &env).await.unwrap();

    assert!(matches!(outcome, FireOutcome::Moved { to: None, .. }));
    assert!(workflow.active_step().is_none());
}

#[tokio::test]
async fn tabs_enable_only_unique_routes() {
    let workflow = approval_workflow();
    let env = Approval::default();

    assert!(workflow.is_enabled("FillingForm", &env));
    assert!(!workflow.is_enabled("AuthFirst", &env));

    env.model.lock().unwrap().test_run_id = Some(7);
    assert!(workflow.is_enabled("AuthFirst", &env));
    assert!(!workflow.is_enabled("ShowingOutcome", &env));
}

#[tokio::test]
async fn progress_reaches_sink() {
    let messages = Arc::new(Mutex::new(Vec::<String>::new()));
    let sink = Arc::clone(&messages);

    let mut workflow: Workflow<()> = WorkflowBuilder::new()
        .step(
            StepBuilder::new("Uploading").transition(
                TransitionBuilder::new()
                    .on("Upload")
                    .action(|progress| {
                        from_fn(move |_: &()| {
                            progress("connecting");
                            progress("sent 3 of 3");
                            Ok(())
                        })
                        .boxed()
                    })
                    .then("Uploaded"),
            ),
        )
        .step(StepBuilder::new("Uploaded"))
        .on_progress(move |status| sink.lock().unwrap().push(status.to_string()))
        .build()
        .unwrap();

    workflow.fire("Upload", &()).await.unwrap();

    assert!(workflow.is_active("Uploaded"));
    assert_eq!(*messages.lock().unwrap(), vec!["connecting", "sent 3 of 3"]);
}

fn faulty_workflow(with_error_step: bool) -> Workflow<()> {
    let builder = WorkflowBuilder::new()
        .step(StepBuilder::new("Start").transition(TransitionBuilder::new().on("Go").then("Ready")))
        .step(
            StepBuilder::new("Ready").transition(
                TransitionBuilder::new()
                    .on("Save")
                    .action(|_progress| fail(TransitionError::ActionFailed("storage offline".into())).boxed())
                    .then("Saved"),
            ),
        )
        .step(StepBuilder::new("Saved"))
        .step(StepBuilder::new("ErrorDialog").hidden());

    let builder = if with_error_step {
        builder.error_step("ErrorDialog")
    } else {
        builder
    };
    builder.build().unwrap()
}

#[tokio::test]
async fn failing_action_moves_to_error_step_once() {
    let mut workflow = faulty_workflow(true);
    workflow.fire("Go", &()).await.unwrap();

    let outcome = workflow.fire("Save", &()).await.unwrap();

    let error_step = workflow.step_from_name("ErrorDialog").unwrap().id();
    assert_eq!(outcome, FireOutcome::Faulted { error_step });
    assert!(workflow.is_active("ErrorDialog"));
    assert_eq!(workflow.previous_step().unwrap().name(), "Ready");

    let fault = workflow.caught_fault().unwrap();
    assert_eq!(fault.event, "Save");
    assert_eq!(fault.step, "Ready");
    assert_eq!(fault.error, TransitionError::ActionFailed("storage offline".into()));

    // Events the error step does not declare leave it untouched.
    workflow.fire("Save", &()).await.unwrap();
    assert!(workflow.is_active("ErrorDialog"));
    assert!(workflow.caught_fault().is_none());

    workflow.fire(BACK, &()).await.unwrap();
    assert!(workflow.is_active("Ready"));
}

#[tokio::test]
async fn back_from_error_step_clears_fault() {
    let mut workflow = faulty_workflow(true);
    workflow.fire("Go", &()).await.unwrap();
    workflow.fire("Save", &()).await.unwrap();
    assert!(workflow.caught_fault().is_some());

    let outcome = workflow.fire(BACK, &()).await.unwrap();

    let ready = workflow.step_from_name("Ready").unwrap().id();
    assert_eq!(outcome, FireOutcome::Back { to: Some(ready) });
    assert!(workflow.caught_fault().is_none());
}

#[tokio::test]
async fn failing_action_without_error_step_propagates() {
    let mut workflow = faulty_workflow(false);
    workflow.fire("Go", &()).await.unwrap();

    let err = workflow.fire("Save", &()).await.unwrap_err();

    match err {
        WorkflowError::Fault { event, step, source } => {
            assert_eq!(event, "Save");
            assert_eq!(step, "Ready");
            assert_eq!(source, TransitionError::ActionFailed("storage offline".into()));
        }
        other => panic!("Expected fault, got {other:?}"),
    }
    assert!(workflow.is_active("Ready"));
    assert_eq!(workflow.previous_step().unwrap().name(), "Start");
}
