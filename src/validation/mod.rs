//! Validation-based lint for workflow graphs.
//!
//! Building a workflow only rejects structural defects. Graphs that build
//! can still contain transitions that never fire or steps nobody can reach.
//! This module finds them using Stillwater's `Validation` type, which
//! accumulates ALL issues instead of stopping at the first one.
//!
//! # Example
//!
//! ```rust
//! use switchyard::builder::{StepBuilder, TransitionBuilder, WorkflowBuilder};
//! use switchyard::validation::{issues, GraphIssue};
//!
//! let workflow = WorkflowBuilder::<()>::new()
//!     .step(StepBuilder::new("Start").transition(TransitionBuilder::new().on("Go").then("Finish")))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     issues(&workflow),
//!     vec![GraphIssue::DanglingTarget {
//!         step: "Start".into(),
//!         event: "Go".into(),
//!         target: "Finish".into(),
//!     }]
//! );
//! ```

pub mod issue;
pub mod rules;

pub use issue::GraphIssue;
pub use rules::{issues, validate, GraphValidation};
