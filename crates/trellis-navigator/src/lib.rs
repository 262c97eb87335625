//! Trellis Navigator
//!
//! This crate provides the step traversal state machine for Trellis.
//! Given the step just presented and the result tree accumulated so far,
//! the [`Navigator`] computes the next (or previous) step, honoring branch
//! rules, tracking the path actually taken, and signalling completion.
//!
//! Key properties:
//! - the step graph is immutable after construction, with one exception:
//!   the head overview step lives in a separately-owned mutable cell
//! - forward transitions are idempotent in their result-tree delta
//! - backward navigation replays the forward path exactly; branch
//!   predicates are never re-evaluated going backward
//!
//! A runtime [`Task`] owns a navigator plus task-level metadata and is
//! built fresh from a validated definition for every run.

mod error;
mod navigator;
mod task;

pub use error::NavigationError;
pub use navigator::{Navigator, NavigatorState};
pub use task::Task;
