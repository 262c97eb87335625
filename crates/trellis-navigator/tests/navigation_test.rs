//! Traversal tests over linear and branching step graphs.

use serde_json::json;
use trellis_navigator::{Navigator, NavigatorState, Task};
use trellis_result::{AnswerResult, StepResult, TaskResult};
use trellis_step::{BranchRule, RulePredicate, StepDef, StepType, TaskDef};

fn instruction(id: &str) -> StepDef {
  StepDef::new(id, StepType::Instruction)
}

fn question(id: &str) -> StepDef {
  StepDef::new(
    id,
    StepType::Question {
      data_type: None,
      optional: false,
    },
  )
}

fn equals_rule(after: &str, skip_to: &str, value: serde_json::Value) -> BranchRule {
  BranchRule {
    after: after.to_string(),
    skip_to: skip_to.to_string(),
    predicate: RulePredicate::Equals { value },
  }
}

fn record_answer(result: &mut TaskResult, id: &str, value: serde_json::Value) {
  result.append_step_history(StepResult::Answer(AnswerResult::with_value(id, value)));
}

/// Walk forward from the start until completion, recording the visit order.
fn walk_to_completion(nav: &mut Navigator, result: &mut TaskResult) -> Vec<String> {
  let mut visited = Vec::new();
  let mut current: Option<String> = None;
  loop {
    let step = nav
      .step_after(current.as_deref(), result)
      .expect("traversal failed");
    match step {
      Some(step) => {
        visited.push(step.identifier.clone());
        current = Some(step.identifier);
      }
      None => return visited,
    }
  }
}

#[test]
fn linear_graph_visits_each_step_once_in_declared_order() {
  let ids = ["a", "b", "c", "d", "e"];
  let steps = ids.iter().map(|id| instruction(id)).collect();
  let mut nav = Navigator::new(steps, vec![]);
  let mut result = TaskResult::new("linear", None);

  let visited = walk_to_completion(&mut nav, &mut result);
  assert_eq!(visited, ids);
  assert_eq!(*nav.state(), NavigatorState::Completed);

  // One result per step, in visit order.
  let recorded: Vec<&str> = result.step_history.iter().map(|r| r.identifier()).collect();
  assert_eq!(recorded, ids);
}

#[test]
fn branch_rule_skips_ahead_and_skipped_steps_leave_no_result() {
  // if answer = "A" at step1, go to step3; else fall through to step2.
  let mut nav = Navigator::new(
    vec![question("step1"), instruction("step2"), instruction("step3")],
    vec![equals_rule("step1", "step3", json!("A"))],
  );
  let mut result = TaskResult::new("branching", None);

  let first = nav.step_after(None, &mut result).unwrap().unwrap();
  assert_eq!(first.identifier, "step1");
  record_answer(&mut result, "step1", json!("A"));

  let next = nav.step_after(Some("step1"), &mut result).unwrap().unwrap();
  assert_eq!(next.identifier, "step3");

  assert!(!result.has_result("step2"));
  assert_eq!(nav.history(), &["step1".to_string(), "step3".to_string()]);
}

#[test]
fn unmatched_predicate_falls_back_to_declared_order() {
  let mut nav = Navigator::new(
    vec![question("step1"), instruction("step2"), instruction("step3")],
    vec![equals_rule("step1", "step3", json!("A"))],
  );
  let mut result = TaskResult::new("branching", None);

  nav.step_after(None, &mut result).unwrap();
  record_answer(&mut result, "step1", json!("B"));

  let next = nav.step_after(Some("step1"), &mut result).unwrap().unwrap();
  assert_eq!(next.identifier, "step2");
}

#[test]
fn backward_navigation_replays_the_path_taken_not_a_rederived_one() {
  let mut nav = Navigator::new(
    vec![question("step1"), instruction("step2"), instruction("step3")],
    vec![equals_rule("step1", "step3", json!("A"))],
  );
  let mut result = TaskResult::new("branching", None);

  nav.step_after(None, &mut result).unwrap();
  record_answer(&mut result, "step1", json!("A"));
  nav.step_after(Some("step1"), &mut result).unwrap();

  // Forward path was [step1, step3]; going back from step3 must return
  // step1, never step2, even though the answer could have changed since.
  record_answer(&mut result, "step1", json!("B"));
  let back = nav.step_before("step3").unwrap().unwrap();
  assert_eq!(back.identifier, "step1");
}

#[test]
fn backward_then_forward_rejoins_the_graph() {
  let mut nav = Navigator::new(vec![instruction("a"), instruction("b")], vec![]);
  let mut result = TaskResult::new("linear", None);

  nav.step_after(None, &mut result).unwrap();
  nav.step_after(Some("a"), &mut result).unwrap();
  assert_eq!(nav.history(), &["a".to_string(), "b".to_string()]);

  let back = nav.step_before("b").unwrap().unwrap();
  assert_eq!(back.identifier, "a");
  assert_eq!(nav.history(), &["a".to_string()]);

  let forward = nav.step_after(Some("a"), &mut result).unwrap().unwrap();
  assert_eq!(forward.identifier, "b");
  assert_eq!(nav.history(), &["a".to_string(), "b".to_string()]);

  // Revisiting appended nothing new.
  let recorded: Vec<&str> = result.step_history.iter().map(|r| r.identifier()).collect();
  assert_eq!(recorded, vec!["a", "b"]);
}

#[test]
fn backward_from_the_head_of_the_path_exits() {
  let mut nav = Navigator::new(vec![instruction("a"), instruction("b")], vec![]);
  let mut result = TaskResult::new("linear", None);

  nav.step_after(None, &mut result).unwrap();
  assert_eq!(nav.step_before("a").unwrap(), None);
}

#[test]
fn backward_with_an_unknown_identifier_is_step_not_found() {
  let mut nav = Navigator::new(vec![instruction("a")], vec![]);
  assert!(nav.step_before("ghost").is_err());
}

#[test]
fn peeking_does_not_mutate_result_or_history() {
  let nav = {
    let mut nav = Navigator::new(vec![instruction("a"), instruction("b")], vec![]);
    let mut result = TaskResult::new("linear", None);
    nav.step_after(None, &mut result).unwrap();
    nav
  };
  let result = TaskResult::new("linear", None);

  assert!(nav.has_step_after(Some("a"), &result).unwrap());
  assert!(!nav.has_step_after(Some("b"), &result).unwrap());
  assert!(!nav.has_step_before("a").unwrap());
  assert_eq!(nav.history(), &["a".to_string()]);
}

#[test]
fn rule_referencing_a_never_instantiated_step_does_not_fire() {
  // The rule on step2 predicates over step2's own result, which exists,
  // but a rule keyed by a never-visited source simply never comes up;
  // what can reference missing results is the predicate itself. Here the
  // Always predicate still evaluates false with no result recorded.
  let mut nav = Navigator::new(
    vec![instruction("step1"), instruction("step2"), instruction("step3")],
    vec![BranchRule {
      after: "step1".to_string(),
      skip_to: "step3".to_string(),
      predicate: RulePredicate::Always,
    }],
  );
  let mut result = TaskResult::new("conv", None);

  // Ask for the step after step1 without step1 ever being visited: no
  // result for step1 exists, so the predicate evaluates false and
  // traversal falls back to declared order.
  let next = nav.step_after(Some("step1"), &mut result).unwrap().unwrap();
  assert_eq!(next.identifier, "step2");
}

#[test]
fn task_first_step_delegates_to_the_navigator() {
  let def: TaskDef = serde_json::from_value(json!({
    "identifier": "demo",
    "steps": [
      { "identifier": "intro", "type": "instruction" },
      { "identifier": "end", "type": "completion" }
    ]
  }))
  .unwrap();
  let mut task = Task::from_def(def).unwrap();
  let mut result = task.instantiate_result();

  let first = task.first_step(&mut result).unwrap().unwrap();
  assert_eq!(first.identifier, "intro");
  assert_eq!(
    *task.navigator_ref().state(),
    NavigatorState::AtStep("intro".to_string())
  );
}
