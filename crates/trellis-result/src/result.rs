use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::answer::AnswerResult;
use crate::collection::CollectionResult;
use crate::file::FileResult;
use crate::task::TaskResult;

/// The result recorded for one navigable unit of a task.
///
/// A closed, tag-dispatched variant set: downstream step types map onto one
/// of these variants rather than introducing new result shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepResult {
  Answer(AnswerResult),
  Collection(CollectionResult),
  File(FileResult),
  Task(TaskResult),
}

impl StepResult {
  /// The identifier of the step this result belongs to.
  pub fn identifier(&self) -> &str {
    match self {
      StepResult::Answer(r) => &r.identifier,
      StepResult::Collection(r) => &r.identifier,
      StepResult::File(r) => &r.identifier,
      StepResult::Task(r) => &r.identifier,
    }
  }

  /// Variant name as it appears in the serialized `type` tag.
  pub fn variant(&self) -> &'static str {
    match self {
      StepResult::Answer(_) => "answer",
      StepResult::Collection(_) => "collection",
      StepResult::File(_) => "file",
      StepResult::Task(_) => "task",
    }
  }

  pub fn start_date(&self) -> DateTime<Utc> {
    match self {
      StepResult::Answer(r) => r.start_date,
      StepResult::Collection(r) => r.start_date,
      StepResult::File(r) => r.start_date,
      StepResult::Task(r) => r.start_date,
    }
  }

  pub fn end_date(&self) -> DateTime<Utc> {
    match self {
      StepResult::Answer(r) => r.end_date,
      StepResult::Collection(r) => r.end_date,
      StepResult::File(r) => r.end_date,
      StepResult::Task(r) => r.end_date,
    }
  }

  /// The answer value, when this is an answer result.
  pub fn answer_value(&self) -> Option<&serde_json::Value> {
    match self {
      StepResult::Answer(r) => r.value.as_ref(),
      _ => None,
    }
  }

  /// Borrow as a collection result, if that is the variant.
  pub fn as_collection(&self) -> Option<&CollectionResult> {
    match self {
      StepResult::Collection(r) => Some(r),
      _ => None,
    }
  }

  /// Borrow as a file result, if that is the variant.
  pub fn as_file(&self) -> Option<&FileResult> {
    match self {
      StepResult::File(r) => Some(r),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn serializes_with_type_tag() {
    let result = StepResult::Answer(AnswerResult::with_value("q1", json!("yes")));
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["type"], "answer");
    assert_eq!(value["identifier"], "q1");
    assert_eq!(value["value"], "yes");
  }

  #[test]
  fn nested_collection_round_trips() {
    let mut collection = CollectionResult::new("form");
    collection.set_child(StepResult::Answer(AnswerResult::new("q1")));
    let result = StepResult::Collection(collection);

    let json = serde_json::to_string(&result).unwrap();
    let decoded: StepResult = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, result);
  }
}
