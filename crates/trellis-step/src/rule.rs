use serde::{Deserialize, Serialize};
use trellis_result::StepResult;

/// Explicit step-to-step branch rule.
///
/// Keyed by the identifier of the step just answered (`after`); when the
/// predicate matches the most recent result for that step, traversal jumps
/// to `skip_to` instead of the next step in declared order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchRule {
  /// Identifier of the source step this rule fires after.
  pub after: String,

  /// Identifier of the target step to jump to.
  pub skip_to: String,

  #[serde(default)]
  pub predicate: RulePredicate,
}

impl BranchRule {
  /// Whether this rule targets its own source step.
  ///
  /// Such a rule would loop forever; the navigator refuses it at traversal.
  pub fn is_self_referential(&self) -> bool {
    self.after == self.skip_to
  }
}

/// Predicate over the most recent result recorded for a rule's source step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "when", rename_all = "snake_case")]
pub enum RulePredicate {
  /// Fires whenever a result exists for the source step.
  #[default]
  Always,
  /// Fires when the participant recorded an answer.
  Answered,
  /// Fires when the step was visited but no answer was recorded.
  NotAnswered,
  /// Fires when the recorded answer equals the given value.
  Equals { value: serde_json::Value },
  /// Fires when an answer was recorded and differs from the given value.
  NotEquals { value: serde_json::Value },
}

impl RulePredicate {
  /// Evaluate against the most recent result for the source step.
  ///
  /// A predicate referencing an identifier that was never instantiated
  /// (e.g. a skipped step named by a later rule) evaluates to `false` by
  /// convention.
  pub fn evaluate(&self, result: Option<&StepResult>) -> bool {
    let Some(result) = result else {
      return false;
    };
    let answer = result.answer_value();
    match self {
      RulePredicate::Always => true,
      RulePredicate::Answered => answer.is_some(),
      RulePredicate::NotAnswered => answer.is_none(),
      RulePredicate::Equals { value } => answer == Some(value),
      RulePredicate::NotEquals { value } => answer.is_some_and(|a| a != value),
    }
  }
}
