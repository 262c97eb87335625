use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;
use trellis_result::TaskResult;
use trellis_step::{BranchRule, StepDef};

use crate::error::NavigationError;

/// Where a run currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigatorState {
  BeforeStart,
  AtStep(String),
  Completed,
  Abandoned,
}

/// The step traversal state machine.
///
/// Owns an immutable ordered step list plus branch rules, a stack of
/// visited identifiers (the path actually taken), and the single mutable
/// overview cell. Transition calls are not safe for concurrent invocation;
/// the caller serializes them, as they mutate the passed-in task result.
#[derive(Debug)]
pub struct Navigator {
  steps: Vec<StepDef>,
  index: HashMap<String, usize>,
  rules: HashMap<String, Vec<BranchRule>>,
  /// Mutable cell for the head overview step, when the task has one.
  /// Edits through the cell are observed by the first forward transition.
  overview: Option<Arc<Mutex<StepDef>>>,
  history: Vec<String>,
  state: NavigatorState,
}

impl Navigator {
  /// Build a navigator over an ordered step list and branch rules.
  ///
  /// When the head step is an overview step it is moved into the mutable
  /// overview cell; all other steps are immutable for the navigator's
  /// lifetime.
  pub fn new(steps: Vec<StepDef>, rules: Vec<BranchRule>) -> Self {
    let index = steps
      .iter()
      .enumerate()
      .map(|(i, s)| (s.identifier.clone(), i))
      .collect();

    let mut rule_map: HashMap<String, Vec<BranchRule>> = HashMap::new();
    for rule in rules {
      rule_map.entry(rule.after.clone()).or_default().push(rule);
    }

    let overview = steps
      .first()
      .filter(|s| s.is_overview())
      .map(|s| Arc::new(Mutex::new(s.clone())));

    Self {
      steps,
      index,
      rules: rule_map,
      overview,
      history: Vec::new(),
      state: NavigatorState::BeforeStart,
    }
  }

  /// Current traversal state.
  pub fn state(&self) -> &NavigatorState {
    &self.state
  }

  /// The ordered step list as declared.
  pub fn steps(&self) -> &[StepDef] {
    &self.steps
  }

  /// Identifiers of the steps visited so far, in order.
  pub fn history(&self) -> &[String] {
    &self.history
  }

  /// The mutable overview cell, when the head step is an overview step.
  ///
  /// The hosting application may edit the cell's content (title, subtitle,
  /// permission icons) after construction and before the first forward
  /// transition. No other step type is mutable.
  pub fn overview_step(&self) -> Option<Arc<Mutex<StepDef>>> {
    self.overview.clone()
  }

  /// Mark the run abandoned. Further forward transitions signal exit.
  pub fn abandon(&mut self) {
    self.state = NavigatorState::Abandoned;
  }

  /// Compute the step after `previous` and record its fresh result.
  ///
  /// `None` for `previous` asks for the first step. Returns `Ok(None)` on
  /// completion (or when the run was abandoned). The task result is only
  /// mutated to append a freshly instantiated result for the returned step
  /// when none exists yet, so repeating a call with the same inputs leaves
  /// the result tree unchanged.
  pub fn step_after(
    &mut self,
    previous: Option<&str>,
    result: &mut TaskResult,
  ) -> Result<Option<StepDef>, NavigationError> {
    if self.state == NavigatorState::Abandoned {
      return Ok(None);
    }

    let next = self.resolve_next(previous, result)?;

    let Some(idx) = next else {
      debug!(task = %result.identifier, "traversal complete");
      self.state = NavigatorState::Completed;
      return Ok(None);
    };

    let step = self.step_snapshot(idx);
    debug!(
      task = %result.identifier,
      previous = previous.unwrap_or("<start>"),
      next = %step.identifier,
      "forward transition"
    );

    if !result.has_result(&step.identifier) {
      result.append_step_history(step.instantiate_result());
    }
    if self.history.last().map(String::as_str) != Some(step.identifier.as_str()) {
      self.history.push(step.identifier.clone());
    }
    self.state = NavigatorState::AtStep(step.identifier.clone());

    Ok(Some(step))
  }

  /// Compute the step before `current` by replaying the path taken.
  ///
  /// Pops the history stack back to the preceding visit; branch predicates
  /// are never re-evaluated. Returns `Ok(None)` when `current` is the head
  /// of the path (or was never visited).
  pub fn step_before(&mut self, current: &str) -> Result<Option<StepDef>, NavigationError> {
    let _ = self.lookup(current)?;

    let Some(pos) = self.history.iter().rposition(|id| id == current) else {
      return Ok(None);
    };
    if pos == 0 {
      return Ok(None);
    }

    let prev_id = self.history[pos - 1].clone();
    // Drop the current visit; stepping forward again re-records it.
    self.history.truncate(pos);

    let idx = self.lookup(&prev_id)?;
    self.state = NavigatorState::AtStep(prev_id);
    Ok(Some(self.step_snapshot(idx)))
  }

  /// Whether a forward transition from `previous` would yield a step.
  ///
  /// Peeking: never mutates the result tree or the history.
  pub fn has_step_after(
    &self,
    previous: Option<&str>,
    result: &TaskResult,
  ) -> Result<bool, NavigationError> {
    Ok(self.resolve_next(previous, result)?.is_some())
  }

  /// Whether backward navigation from `current` would yield a step.
  pub fn has_step_before(&self, current: &str) -> Result<bool, NavigationError> {
    let _ = self.lookup(current)?;
    Ok(
      self
        .history
        .iter()
        .rposition(|id| id == current)
        .is_some_and(|pos| pos > 0),
    )
  }

  /// Resolve the index of the step following `previous`, or `None` for
  /// completion. Pure over the step graph and the accumulated result.
  ///
  /// Resolution order: explicit branch rule for `previous` whose predicate
  /// matches the most recent result, then declared order, then completion
  /// when the declared index runs out.
  fn resolve_next(
    &self,
    previous: Option<&str>,
    result: &TaskResult,
  ) -> Result<Option<usize>, NavigationError> {
    let Some(previous) = previous else {
      return Ok(if self.steps.is_empty() { None } else { Some(0) });
    };

    let prev_idx = self.lookup(previous)?;

    if let Some(rules) = self.rules.get(previous) {
      let recent = result.find_result(previous);
      if let Some(rule) = rules.iter().find(|r| r.predicate.evaluate(recent)) {
        if rule.is_self_referential() {
          return Err(NavigationError::InvalidBranch {
            identifier: previous.to_string(),
          });
        }
        return self.lookup(&rule.skip_to).map(Some);
      }
    }

    let next_idx = prev_idx + 1;
    Ok((next_idx < self.steps.len()).then_some(next_idx))
  }

  fn lookup(&self, identifier: &str) -> Result<usize, NavigationError> {
    self
      .index
      .get(identifier)
      .copied()
      .ok_or_else(|| NavigationError::StepNotFound {
        identifier: identifier.to_string(),
      })
  }

  /// Snapshot a step by index, reading the overview cell for the head step
  /// so in-place edits are observed.
  fn step_snapshot(&self, idx: usize) -> StepDef {
    if idx == 0
      && let Some(cell) = &self.overview
    {
      return cell.lock().expect("overview cell poisoned").clone();
    }
    self.steps[idx].clone()
  }
}
