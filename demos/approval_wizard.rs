//! Approval Wizard
//!
//! This demo loads a workflow definition from JSON, binds its named guards
//! and actions, and walks a test-approval wizard through to the end.
//!
//! Key concepts:
//! - Declarative graph definitions
//! - Guards reading a shared model, actions mutating it
//! - Progress reporting from actions
//! - The error step and `$back`
//!
//! Run with: RUST_LOG=switchyard=debug cargo run --example approval_wizard

use std::sync::{Arc, Mutex};
use stillwater::prelude::*;
use switchyard::definition::{Bindings, WorkflowDefinition};
use switchyard::effects::{TransitionError, BACK};
use switchyard::validation::issues;
use tracing_subscriber::EnvFilter;

const DEFINITION: &str = r#"{
    "steps": [
        { "name": "FillingForm", "transitions": [
            { "on": "Submit", "when": "form_complete", "then": "Signing" }
        ] },
        { "name": "Signing", "transitions": [
            { "on": "Sign", "when": "signed_in", "action": "record_signature", "then": "ShowingOutcome" },
            { "on": "Publish", "action": "publish", "then": "ShowingOutcome" }
        ] },
        { "name": "ShowingOutcome", "transitions": [
            { "on": "Terminate", "then": "$end" }
        ] },
        { "name": "ErrorDialog", "hidden": true }
    ],
    "error_step": "ErrorDialog"
}"#;

#[derive(Clone, Default)]
struct Wizard {
    test_run_id: Arc<Mutex<Option<u64>>>,
    signer: Arc<Mutex<Option<String>>>,
    approver: Arc<Mutex<Option<String>>>,
}

fn bindings() -> Bindings<Wizard> {
    Bindings::new()
        .guard("form_complete", |w: &Wizard| w.test_run_id.lock().unwrap().is_some())
        .guard("signed_in", |w: &Wizard| w.signer.lock().unwrap().is_some())
        .action("record_signature", |progress| {
            from_fn(move |w: &Wizard| {
                progress("checking signature");
                let signer = w.signer.lock().unwrap().clone();
                *w.approver.lock().unwrap() = signer;
                progress("signature recorded");
                Ok(())
            })
            .boxed()
        })
        .action("publish", |_progress| {
            fail(TransitionError::ActionFailed("results server unreachable".into())).boxed()
        })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Approval Wizard Demo ===\n");

    let definition = WorkflowDefinition::from_json(DEFINITION)?;
    let mut workflow = definition
        .assemble(&bindings())?
        .on_change(|record| {
            println!(
                "  {} : {} -> {}",
                record.event,
                record.from.as_deref().unwrap_or("(none)"),
                record.to.as_deref().unwrap_or("(none)")
            )
        })
        .on_progress(|status| println!("  ... {status}"))
        .build()?;

    println!("Lint issues: {:?}\n", issues(&workflow));

    let wizard = Wizard::default();

    println!("Submitting an empty form:");
    workflow.fire("Submit", &wizard).await?;

    *wizard.test_run_id.lock().unwrap() = Some(1);
    println!("Submitting a completed form:");
    workflow.fire("Submit", &wizard).await?;

    println!("Publishing before signing:");
    workflow.fire("Publish", &wizard).await?;
    if let Some(fault) = workflow.caught_fault() {
        println!("  caught: {}", fault.error);
    }
    workflow.fire(BACK, &wizard).await?;

    *wizard.signer.lock().unwrap() = Some("fred".into());
    println!("Signing:");
    workflow.fire("Sign", &wizard).await?;
    println!("Approved by: {:?}", wizard.approver.lock().unwrap());

    workflow.fire("Terminate", &wizard).await?;
    println!("Finished, active step: {:?}", workflow.active_step().map(|s| s.name()));

    println!("\n=== Demo Complete ===");
    Ok(())
}
