//! Trellis Transform
//!
//! This crate decouples task acquisition from navigation: a
//! [`TaskTransformer`] fetches and deserializes a runtime task by
//! identifier, whether the definition lives in a bundled resource
//! directory, a cache, or behind a network call.
//!
//! Delivery is single-shot by construction: the async fetch resolves to
//! exactly one `Result<Task, FetchError>`, and the detached
//! [`spawn_fetch`] handle delivers through a oneshot channel. Cancellation
//! is not a first-class operation: a caller that no longer wants an
//! in-flight fetch drops the handle or ignores the outcome after checking
//! the handle's task identifier for relevance.

mod error;
mod fs;
mod pending;
mod transformer;

pub use error::FetchError;
pub use fs::FsTaskTransformer;
pub use pending::{PendingTask, spawn_fetch};
pub use transformer::TaskTransformer;
