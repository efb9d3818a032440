//! GitSync CRD Definitions
//!
//! The `GitSync` Kubernetes custom resource and the status model a
//! reconciler drives on every pass: a lifecycle phase plus a sorted,
//! deduplicated set of timestamped conditions.
//!
//! # Example
//!
//! ```
//! use gitsync_crds::{GitSyncPhase, GitSyncStatus, SystemClock};
//!
//! let mut status = GitSyncStatus::default();
//! status.init_conditions(&SystemClock);
//! status.mark_failed("GitError", "clone failed", &SystemClock);
//! assert_eq!(status.phase, GitSyncPhase::Failed);
//!
//! status.mark_running(&SystemClock);
//! assert!(status.is_configured());
//! ```

pub mod clock;
pub mod conditions;
pub mod error;
pub mod gitsync;
pub mod status;

pub use clock::*;
pub use conditions::*;
pub use error::*;
pub use gitsync::*;
pub use status::*;
