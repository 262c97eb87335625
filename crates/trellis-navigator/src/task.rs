use std::sync::{Arc, Mutex};

use trellis_result::{SchemaInfo, TaskResult};
use trellis_step::{DefinitionError, StepDef, TaskDef};

use crate::error::NavigationError;
use crate::navigator::Navigator;

/// A runtime task: identifier, schema info, and an owned navigator.
///
/// Constructed by a task transformer's fetch, lives for the duration of one
/// run, and is discarded after completion or abandonment. A fresh task is
/// fetched for each run.
#[derive(Debug)]
pub struct Task {
  pub identifier: String,
  pub schema_info: Option<SchemaInfo>,
  navigator: Navigator,
}

impl Task {
  /// Build a task from a validated definition.
  pub fn from_def(def: TaskDef) -> Result<Self, DefinitionError> {
    def.validate()?;
    Ok(Self {
      identifier: def.identifier,
      schema_info: def.schema_info,
      navigator: Navigator::new(def.steps, def.rules),
    })
  }

  /// The owned navigator.
  pub fn navigator(&mut self) -> &mut Navigator {
    &mut self.navigator
  }

  /// Read-only access to the navigator, for peeking queries.
  pub fn navigator_ref(&self) -> &Navigator {
    &self.navigator
  }

  /// Create the empty root result for a new run of this task.
  pub fn instantiate_result(&self) -> TaskResult {
    TaskResult::new(&self.identifier, self.schema_info.clone())
  }

  /// The first step of the task, recording its fresh result.
  ///
  /// Delegates to the navigator's forward transition with no previous step.
  pub fn first_step(
    &mut self,
    result: &mut TaskResult,
  ) -> Result<Option<StepDef>, NavigationError> {
    self.navigator.step_after(None, result)
  }

  /// The mutable overview cell, when the task opens with an overview step.
  pub fn overview_step(&self) -> Option<Arc<Mutex<StepDef>>> {
    self.navigator.overview_step()
  }
}
