//! Guard predicates for controlling state transitions.
//!
//! A guard is a zero-argument boolean query of external state. It is read
//! every time the engine evaluates the transition it gates, so it should be
//! cheap and must not block.

use std::fmt;

/// Zero-argument predicate that gates a single transition.
///
/// Guards usually close over shared state owned by the host application,
/// such as an `Arc<AtomicBool>` flipped by another thread.
///
/// # Example
///
/// ```rust
/// use gatefsm::core::Guard;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// let ready = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&ready);
/// let guard = Guard::new(move || flag.load(Ordering::SeqCst));
///
/// assert!(!guard.check());
/// ready.store(true, Ordering::SeqCst);
/// assert!(guard.check());
/// ```
pub struct Guard {
    predicate: Box<dyn Fn() -> bool + Send>,
}

impl Guard {
    /// Create a guard from a predicate closure.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn() -> bool + Send + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Guard that always passes.
    ///
    /// ```rust
    /// use gatefsm::core::Guard;
    ///
    /// assert!(Guard::always().check());
    /// ```
    pub fn always() -> Self {
        Self::new(|| true)
    }

    /// Guard that never passes.
    pub fn never() -> Self {
        Self::new(|| false)
    }

    /// Evaluate the predicate.
    pub fn check(&self) -> bool {
        (self.predicate)()
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}
