//! Trellis Result
//!
//! This crate contains the result tree data model for Trellis task runs.
//! Every navigable step produces exactly one typed result; results are
//! aggregated into a hierarchical tree rooted at a [`TaskResult`].
//!
//! Result variants:
//! - [`AnswerResult`]: generic answer container for a single step
//! - [`CollectionResult`]: ordered, identifier-keyed set of child results
//! - [`FileResult`]: pointer to an on-device byte stream (sensor recording)
//! - [`TaskResult`]: root aggregate for one task run
//!
//! These types are pure data plus structural queries. Traversal lives in
//! `trellis-navigator`; archiving of file-backed results lives in
//! `trellis-archive`.

mod answer;
mod collection;
mod file;
mod merge;
mod result;
mod schema;
mod task;

pub use answer::AnswerResult;
pub use collection::CollectionResult;
pub use file::FileResult;
pub use merge::merge;
pub use result::StepResult;
pub use schema::SchemaInfo;
pub use task::TaskResult;
