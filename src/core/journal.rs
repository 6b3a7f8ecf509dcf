//! Audit trail of step changes.
//!
//! Every time `fire` moves the active step, the move is appended here. The
//! journal is a log for observers and diagnostics; it is never consulted when
//! resolving `$back`, which only ever looks at the single previous step.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single change of the active step.
///
/// `from` and `to` are step names; `None` stands for "no active step"
/// (the workflow was terminated, or `$back` had nothing to return to).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Event that caused the change
    pub event: String,
    /// Step that was active before the change
    pub from: Option<String>,
    /// Step that is active after the change
    pub to: Option<String>,
    /// When the change happened
    pub timestamp: DateTime<Utc>,
}

impl TransitionRecord {
    pub fn new(event: impl Into<String>, from: Option<String>, to: Option<String>) -> Self {
        Self {
            event: event.into(),
            from,
            to,
            timestamp: Utc::now(),
        }
    }
}

/// Ordered log of step changes.
///
/// # Example
///
/// ```rust
/// use switchyard::core::{Journal, TransitionRecord};
///
/// let mut journal = Journal::new();
/// journal.record(TransitionRecord::new("Submit", Some("Form".into()), Some("Review".into())));
/// journal.record(TransitionRecord::new("Approve", Some("Review".into()), Some("Done".into())));
///
/// let path = journal.path();
/// assert_eq!(path, vec![Some("Form"), Some("Review"), Some("Done")]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Journal {
    records: Vec<TransitionRecord>,
}

impl Journal {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a change. Records are kept until the journal is cleared, so
    /// long-lived workflows should drain it with `Workflow::take_journal`.
    pub fn record(&mut self, record: TransitionRecord) {
        self.records.push(record);
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Steps visited in order: the first record's origin, then the
    /// destination of every record.
    pub fn path(&self) -> Vec<Option<&str>> {
        let mut path = Vec::new();
        if let Some(first) = self.records.first() {
            path.push(first.from.as_deref());
        }
        for record in &self.records {
            path.push(record.to.as_deref());
        }
        path
    }

    /// Time elapsed between the first and last recorded change.
    ///
    /// Returns `None` for an empty journal.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.first(), self.records.last()) {
            last.timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok()
        } else {
            None
        }
    }

    pub fn records(&self) -> &[TransitionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
