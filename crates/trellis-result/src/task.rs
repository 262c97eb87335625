use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::result::StepResult;
use crate::schema::SchemaInfo;

/// Root aggregate for one task run.
///
/// `step_history` reflects the order steps were actually visited; skipped
/// branches never appear. Once a result is appended it persists in memory
/// for the remainder of the run regardless of later step failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
  pub identifier: String,

  /// Unique identifier for this run of the task.
  pub run_id: String,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub schema_info: Option<SchemaInfo>,

  pub start_date: DateTime<Utc>,

  pub end_date: DateTime<Utc>,

  #[serde(default)]
  pub step_history: Vec<StepResult>,
}

impl TaskResult {
  /// Create an empty task result for a new run.
  pub fn new(identifier: impl Into<String>, schema_info: Option<SchemaInfo>) -> Self {
    let now = Utc::now();
    Self {
      identifier: identifier.into(),
      run_id: uuid::Uuid::new_v4().to_string(),
      schema_info,
      start_date: now,
      end_date: now,
      step_history: Vec::new(),
    }
  }

  /// Look up the result recorded for a step identifier.
  pub fn find_result(&self, identifier: &str) -> Option<&StepResult> {
    self
      .step_history
      .iter()
      .find(|r| r.identifier() == identifier)
  }

  /// Whether a result has been recorded for a step identifier.
  pub fn has_result(&self, identifier: &str) -> bool {
    self.find_result(identifier).is_some()
  }

  /// The most recently appended step result.
  pub fn last_result(&self) -> Option<&StepResult> {
    self.step_history.last()
  }

  /// Insert or replace a step result, preserving visit order.
  ///
  /// A result with an identifier already in the history replaces the prior
  /// entry in place via [`merge`]; a new identifier is appended.
  ///
  /// [`merge`]: crate::merge
  pub fn append_step_history(&mut self, result: StepResult) {
    match self
      .step_history
      .iter_mut()
      .find(|r| r.identifier() == result.identifier())
    {
      Some(existing) => *existing = crate::merge(existing, &result),
      None => self.step_history.push(result),
    }
    self.end_date = Utc::now();
  }
}
