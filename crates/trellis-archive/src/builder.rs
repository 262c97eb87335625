use std::collections::HashSet;
use std::path::Path;

use tracing::{info, warn};
use trellis_result::{FileResult, StepResult, TaskResult};

use crate::error::ArchiveError;
use crate::manifest::{ArchiveEntry, build_archive_data};

/// Collects archive entries for one task run.
///
/// Each file result is archived exactly once, keyed by step path plus
/// identifier; a second archive of the same key is a usage error.
#[derive(Default)]
pub struct ArchiveBuilder {
  entries: Vec<ArchiveEntry>,
  archived: HashSet<(String, String)>,
}

impl ArchiveBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Archive one file result under the given step path.
  ///
  /// Returns `Ok(true)` when an entry was added and `Ok(false)` when the
  /// result had no backing file.
  pub async fn archive(
    &mut self,
    result: &FileResult,
    step_path: &str,
  ) -> Result<bool, ArchiveError> {
    let key = (step_path.to_string(), result.identifier.clone());
    if self.archived.contains(&key) {
      return Err(ArchiveError::AlreadyArchived {
        step_path: step_path.to_string(),
        identifier: result.identifier.clone(),
      });
    }

    match build_archive_data(result, step_path).await? {
      Some(entry) => {
        self.archived.insert(key);
        self.entries.push(entry);
        Ok(true)
      }
      None => Ok(false),
    }
  }

  /// The entries collected so far.
  pub fn entries(&self) -> &[ArchiveEntry] {
    &self.entries
  }

  pub fn into_entries(self) -> Vec<ArchiveEntry> {
    self.entries
  }

  /// Write every entry's bytes plus a `manifest.json` index into `dir`.
  pub async fn write_to_dir(&self, dir: &Path) -> Result<(), ArchiveError> {
    tokio::fs::create_dir_all(dir).await?;

    for entry in &self.entries {
      tokio::fs::write(dir.join(&entry.manifest.filename), &entry.data).await?;
    }

    let manifests: Vec<_> = self.entries.iter().map(|e| &e.manifest).collect();
    let index = serde_json::to_vec_pretty(&manifests).expect("manifest serialization is infallible");
    tokio::fs::write(dir.join("manifest.json"), index).await?;

    info!(dir = %dir.display(), entries = self.entries.len(), "wrote archive bundle");
    Ok(())
  }
}

/// Walk a task result tree and archive every file result, best-effort.
///
/// Step paths are `task/collection/.../identifier` fragments. One failed
/// file result is logged and skipped so the rest of the run still
/// archives; the per-result errors are returned for reporting.
pub async fn archive_task_result(
  builder: &mut ArchiveBuilder,
  result: &TaskResult,
) -> Vec<ArchiveError> {
  let mut found: Vec<(String, &FileResult)> = Vec::new();
  for step_result in &result.step_history {
    collect_file_results(&result.identifier, step_result, &mut found);
  }

  let mut errors = Vec::new();
  for (step_path, file_result) in found {
    if let Err(e) = builder.archive(file_result, &step_path).await {
      warn!(
        identifier = %file_result.identifier,
        step_path = %step_path,
        error = %e,
        "skipping unarchivable file result"
      );
      errors.push(e);
    }
  }
  errors
}

fn collect_file_results<'a>(
  parent_path: &str,
  result: &'a StepResult,
  found: &mut Vec<(String, &'a FileResult)>,
) {
  match result {
    StepResult::File(file) => found.push((parent_path.to_string(), file)),
    StepResult::Collection(collection) => {
      let path = format!("{parent_path}/{}", collection.identifier);
      for child in &collection.children {
        collect_file_results(&path, child, found);
      }
    }
    StepResult::Task(task) => {
      let path = format!("{parent_path}/{}", task.identifier);
      for child in &task.step_history {
        collect_file_results(&path, child, found);
      }
    }
    StepResult::Answer(_) => {}
  }
}
