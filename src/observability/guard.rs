//! Panic containment with a thread-local record of the running algorithm.
//!
//! Comparisons run algorithms on rayon worker threads; the record is per
//! thread so concurrent runs do not overwrite each other.

use crate::errors::{Error, Result};
use std::any::Any;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};

thread_local! {
    static CURRENT_ALGORITHM: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Restores the previous record on drop.
struct AlgorithmGuard {
    previous: Option<String>,
}

impl AlgorithmGuard {
    fn enter(name: &str) -> Self {
        let previous = CURRENT_ALGORITHM.with(|c| c.replace(Some(name.to_string())));
        Self { previous }
    }
}

impl Drop for AlgorithmGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT_ALGORITHM.with(|c| *c.borrow_mut() = previous);
    }
}

/// Name of the algorithm currently running on this thread, if any.
pub fn current_algorithm() -> Option<String> {
    CURRENT_ALGORITHM.with(|c| c.borrow().clone())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run `f` on behalf of `algorithm`, turning a panic into [`Error::Execution`].
pub fn guard_panics<T, F>(algorithm: &str, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let _guard = AlgorithmGuard::enter(algorithm);
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!("{} panicked: {}", algorithm, message);
            Err(Error::execution(format!("{} panicked: {}", algorithm, message)))
        }
    }
}
