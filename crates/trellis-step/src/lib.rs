//! Trellis Step
//!
//! This crate contains the serializable task/step definition types for
//! Trellis. These types represent a task definition before it is validated
//! and handed to the navigator for traversal.
//!
//! Definitions can be loaded from:
//! - JSON files (bundled resources, the CLI)
//! - Remote task repositories (via `trellis-transform`)
//!
//! The step set is a closed, tag-dispatched variant set with an explicit
//! [`StepType::Custom`] fallback so documents containing downstream-defined
//! step types still parse and navigate.

mod error;
mod permission;
mod rule;
mod step;
mod task_def;

pub use error::DefinitionError;
pub use permission::{AuthorizationStatus, Permission};
pub use rule::{BranchRule, RulePredicate};
pub use step::{AnswerDataType, StepDef, StepType};
pub use task_def::TaskDef;

// Result-format versioning tag, re-exported for definition authors.
pub use trellis_result::SchemaInfo;
