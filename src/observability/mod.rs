//! Logging setup and panic containment for algorithm runs.
//!
//! ## Usage
//!
//! Install the subscriber once at startup:
//!
//! ```ignore
//! use apidrift::observability::init_logging;
//!
//! fn main() {
//!     init_logging(cli.verbose);
//!     // ... rest of application
//! }
//! ```
//!
//! Run algorithm code so that a panic becomes an error:
//!
//! ```rust
//! use apidrift::observability::guard_panics;
//!
//! let result: apidrift::errors::Result<()> = guard_panics("tfidf", || panic!("bad input"));
//! assert!(result.unwrap_err().to_string().contains("bad input"));
//! ```

mod guard;
mod logging;

pub use guard::{current_algorithm, guard_panics};
pub use logging::{filter_directive, init_logging, LOG_ENV};
