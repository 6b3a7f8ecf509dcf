//! Guard predicates for controlling transitions.
//!
//! Guards are evaluated at fire time against the caller's environment.
//! They should be side-effect free; the engine may evaluate the same guard
//! several times while answering reachability queries.

use crate::effects::TransitionError;
use std::fmt;
use std::sync::Arc;

type Predicate<Env> = Arc<dyn Fn(&Env) -> Result<bool, TransitionError> + Send + Sync>;

/// Predicate that decides whether a transition may be taken.
///
/// # Example
///
/// ```rust
/// use switchyard::core::Guard;
///
/// struct Form {
///     test_run_id: Option<u32>,
/// }
///
/// let complete = Guard::new(|form: &Form| form.test_run_id.is_some());
///
/// assert!(complete.check(&Form { test_run_id: Some(1) }).unwrap());
/// assert!(!complete.check(&Form { test_run_id: None }).unwrap());
/// ```
pub struct Guard<Env> {
    predicate: Predicate<Env>,
}

impl<Env> Guard<Env> {
    /// Create a guard from an infallible predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Env) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(move |env| Ok(predicate(env))),
        }
    }

    /// Create a guard whose evaluation can fail.
    ///
    /// An error raised here is treated exactly like a failing action: the
    /// workflow diverts to its error step, or reports the fault to the caller.
    ///
    /// ```rust
    /// use switchyard::core::Guard;
    /// use switchyard::effects::TransitionError;
    ///
    /// let parse = Guard::fallible(|raw: &String| {
    ///     raw.parse::<u32>()
    ///         .map(|n| n > 0)
    ///         .map_err(|e| TransitionError::GuardFailed(e.to_string()))
    /// });
    ///
    /// assert!(parse.check(&"7".to_string()).unwrap());
    /// assert!(parse.check(&"seven".to_string()).is_err());
    /// ```
    pub fn fallible<F>(predicate: F) -> Self
    where
        F: Fn(&Env) -> Result<bool, TransitionError> + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    pub fn check(&self, env: &Env) -> Result<bool, TransitionError> {
        (self.predicate)(env)
    }
}

impl<Env> Clone for Guard<Env> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<Env> fmt::Debug for Guard<Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}
