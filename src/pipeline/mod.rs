//! Pipeline entry points.
//!
//! - `change`: fingerprinting and change detection
//! - `run_watch`: one full check of the listing page

pub mod change;
pub mod watch;

pub use change::{Change, detect, fingerprint};
pub use watch::{RunOutcome, run_watch};
