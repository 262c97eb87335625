use tracing::warn;

use crate::result::StepResult;

/// Replace a prior result for an identifier with an updated one.
///
/// Used when a participant revisits a step and changes an answer. Merging
/// never changes the identifier or the result variant: an update whose
/// identifier or variant does not match `existing` is discarded with a
/// non-fatal integrity warning and `existing` is returned unchanged.
///
/// Merging a collection replaces only the children named by the update,
/// preserving children the update does not cover; child order stays in
/// first-registration order regardless of the update's order.
///
/// Idempotent: `merge(r, &merge(r, u)) == merge(r, u)`.
pub fn merge(existing: &StepResult, update: &StepResult) -> StepResult {
  if existing.identifier() != update.identifier() {
    warn!(
      existing = existing.identifier(),
      update = update.identifier(),
      "discarding result update with mismatched identifier"
    );
    return existing.clone();
  }

  match (existing, update) {
    (StepResult::Collection(current), StepResult::Collection(incoming)) => {
      let mut merged = current.clone();
      for child in &incoming.children {
        match merged.find_child(child.identifier()) {
          Some(prior) => {
            let replacement = merge(prior, child);
            merged.set_child(replacement);
          }
          None => merged.set_child(child.clone()),
        }
      }
      merged.end_date = incoming.end_date;
      StepResult::Collection(merged)
    }
    (StepResult::Answer(_), StepResult::Answer(_))
    | (StepResult::File(_), StepResult::File(_))
    | (StepResult::Task(_), StepResult::Task(_)) => update.clone(),
    _ => {
      warn!(
        identifier = existing.identifier(),
        existing = existing.variant(),
        update = update.variant(),
        "discarding result update with mismatched variant"
      );
      existing.clone()
    }
  }
}
