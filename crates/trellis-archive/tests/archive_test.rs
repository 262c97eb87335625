//! Recording and archiving tests over real temp files.

use std::path::PathBuf;

use trellis_archive::{ArchiveBuilder, ArchiveError, FileRecorder, archive_task_result, build_archive_data};
use trellis_result::{CollectionResult, FileResult, StepResult, TaskResult};

async fn record(dir: &std::path::Path, identifier: &str, samples: &[&[u8]]) -> FileResult {
  let mut recorder = FileRecorder::create(dir, identifier, Some("application/json"))
    .await
    .unwrap();
  for sample in samples {
    recorder.append(sample).await.unwrap();
  }
  recorder.seal().await.unwrap()
}

#[tokio::test]
async fn recorder_lifecycle_produces_a_sealed_file_result() {
  let dir = tempfile::tempdir().unwrap();
  let result = record(dir.path(), "motion", &[b"[1,", b"2,", b"3]"]).await;

  assert_eq!(result.sample_count, 3);
  assert_eq!(result.relative_path.as_deref(), Some("motion.json"));
  assert_eq!(result.content_type.as_deref(), Some("application/json"));
  assert!(result.start_uptime.is_some());

  let bytes = std::fs::read(result.url.as_ref().unwrap()).unwrap();
  assert_eq!(bytes, b"[1,2,3]");
}

#[tokio::test]
async fn manifest_uses_relative_path_never_the_absolute_url() {
  let dir = tempfile::tempdir().unwrap();
  let result = record(dir.path(), "motion", &[b"{}"]).await;

  let entry = build_archive_data(&result, "tremor/motion")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(entry.manifest.filename, "motion.json");
  assert_eq!(entry.manifest.step_path, "tremor/motion");
  assert_eq!(entry.manifest.identifier, "motion");
  assert_eq!(entry.data.as_ref(), b"{}");

  let json = serde_json::to_string(&entry.manifest).unwrap();
  assert!(!json.contains(dir.path().to_str().unwrap()));
}

#[tokio::test]
async fn results_without_a_backing_file_archive_as_nothing() {
  let result = FileResult::new("motion");
  let entry = build_archive_data(&result, "tremor").await.unwrap();
  assert!(entry.is_none());

  let mut builder = ArchiveBuilder::new();
  let added = builder.archive(&result, "tremor").await.unwrap();
  assert!(!added);
  assert!(builder.entries().is_empty());
}

#[tokio::test]
async fn missing_backing_file_is_a_read_failure() {
  let mut result = FileResult::new("motion");
  result.url = Some(PathBuf::from("/nonexistent/motion.json"));
  result.relative_path = Some("motion.json".to_string());

  let err = build_archive_data(&result, "tremor").await.unwrap_err();
  assert!(matches!(err, ArchiveError::ReadFailure { .. }));
}

#[tokio::test]
async fn archiving_the_same_result_twice_is_a_usage_error() {
  let dir = tempfile::tempdir().unwrap();
  let result = record(dir.path(), "motion", &[b"{}"]).await;

  let mut builder = ArchiveBuilder::new();
  assert!(builder.archive(&result, "tremor").await.unwrap());

  let err = builder.archive(&result, "tremor").await.unwrap_err();
  assert!(matches!(err, ArchiveError::AlreadyArchived { .. }));
  assert_eq!(builder.entries().len(), 1);
}

#[tokio::test]
async fn task_archiving_is_best_effort_across_bad_file_results() {
  let dir = tempfile::tempdir().unwrap();
  let good = record(dir.path(), "walk", &[b"abc"]).await;

  let mut bad = FileResult::new("balance");
  bad.url = Some(dir.path().join("gone.json"));
  bad.relative_path = Some("gone.json".to_string());

  let mut task = TaskResult::new("gait", None);
  task.append_step_history(StepResult::File(good));
  task.append_step_history(StepResult::File(bad));

  let mut builder = ArchiveBuilder::new();
  let errors = archive_task_result(&mut builder, &task).await;

  assert_eq!(errors.len(), 1);
  assert!(matches!(errors[0], ArchiveError::ReadFailure { .. }));
  assert_eq!(builder.entries().len(), 1);
  assert_eq!(builder.entries()[0].manifest.identifier, "walk");
  assert_eq!(builder.entries()[0].manifest.step_path, "gait");
}

#[tokio::test]
async fn nested_collection_file_results_carry_the_step_path() {
  let dir = tempfile::tempdir().unwrap();
  let file = record(dir.path(), "audio", &[b"xyz"]).await;

  let mut collection = CollectionResult::new("speech");
  collection.set_child(StepResult::File(file));

  let mut task = TaskResult::new("voice", None);
  task.append_step_history(StepResult::Collection(collection));

  let mut builder = ArchiveBuilder::new();
  let errors = archive_task_result(&mut builder, &task).await;
  assert!(errors.is_empty());
  assert_eq!(builder.entries()[0].manifest.step_path, "voice/speech");
}

#[tokio::test]
async fn archive_bundle_writes_bytes_and_manifest_index() {
  let dir = tempfile::tempdir().unwrap();
  let out = tempfile::tempdir().unwrap();
  let result = record(dir.path(), "motion", &[b"[1]"]).await;

  let mut builder = ArchiveBuilder::new();
  builder.archive(&result, "tremor").await.unwrap();
  builder.write_to_dir(out.path()).await.unwrap();

  let bytes = std::fs::read(out.path().join("motion.json")).unwrap();
  assert_eq!(bytes, b"[1]");

  let index = std::fs::read_to_string(out.path().join("manifest.json")).unwrap();
  assert!(index.contains("\"motion.json\""));
  assert!(!index.contains(dir.path().to_str().unwrap()));
}
