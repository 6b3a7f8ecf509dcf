//! Switchyard: a declarative workflow engine
//!
//! A workflow is a graph of named steps connected by named transitions.
//! Callers drive it from the outside by firing events; the engine picks the
//! first transition for that event whose guard passes, runs its action, and
//! moves the active step to the transition's target.
//!
//! # Core Concepts
//!
//! - **Step**: a named node; exactly one is active unless the workflow ended
//! - **Transition**: an event name, an optional guard, an optional action and a target
//! - **Guard**: a predicate over the caller's environment, evaluated at fire time
//! - **Action**: a Stillwater effect run before the active step moves
//! - **`$back`**: a reserved event returning to the single previous step
//! - **Error step**: where the workflow goes when a guard or action fails
//!
//! # Example
//!
//! ```rust
//! use switchyard::builder::{StepBuilder, TransitionBuilder, WorkflowBuilder};
//! use switchyard::effects::BACK;
//!
//! # tokio_test();
//! # fn tokio_test() {
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let mut workflow = WorkflowBuilder::<u32>::new()
//!     .step(
//!         StepBuilder::new("Form")
//!             .transition(TransitionBuilder::new().on("Submit").when(|id: &u32| *id > 0).then("Review")),
//!     )
//!     .step(StepBuilder::new("Review").transition(TransitionBuilder::new().on("Close").terminates()))
//!     .build()
//!     .unwrap();
//!
//! workflow.fire("Submit", &0).await.unwrap();
//! assert!(workflow.is_active("Form"));
//!
//! workflow.fire("Submit", &42).await.unwrap();
//! assert!(workflow.is_active("Review"));
//!
//! workflow.fire(BACK, &42).await.unwrap();
//! assert!(workflow.is_active("Form"));
//! # });
//! # }
//! ```

pub mod builder;
pub mod core;
pub mod definition;
pub mod effects;
pub mod validation;

// Re-export commonly used types
pub use crate::builder::{BuildError, StepBuilder, TransitionBuilder, WorkflowBuilder};
pub use crate::core::{Guard, Step, StepId, StepStatus};
pub use crate::effects::{FireOutcome, Transition, TransitionError, Workflow, WorkflowError, BACK};
