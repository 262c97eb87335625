use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use trellis_archive::{ArchiveBuilder, FileRecorder, archive_task_result};
use trellis_navigator::Task;
use trellis_result::{AnswerResult, CollectionResult, StepResult};
use trellis_step::StepType;
use trellis_transform::{FsTaskTransformer, TaskTransformer};

/// Trellis - a navigation and result engine for guided research tasks
#[derive(Parser)]
#[command(name = "trellis")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.trellis)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Run a task definition to completion, reading answers from stdin
  Run {
    /// Path to the task definition file (JSON)
    task_file: PathBuf,

    /// Directory to write the archive bundle into
    #[arg(long)]
    archive_dir: Option<PathBuf>,
  },

  /// Print the ordered step list and branch rules of a task definition
  Inspect {
    /// Path to the task definition file (JSON)
    task_file: PathBuf,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let data_dir = cli.data_dir.unwrap_or_else(|| {
    dirs::home_dir()
      .expect("could not determine home directory")
      .join(".trellis")
  });

  match cli.command {
    Some(Commands::Run {
      task_file,
      archive_dir,
    }) => {
      let rt = tokio::runtime::Runtime::new()?;
      rt.block_on(async { run_task(task_file, archive_dir, data_dir).await })?;
    }
    Some(Commands::Inspect { task_file }) => {
      inspect_task(task_file)?;
    }
    None => {
      println!("trellis - use --help to see available commands");
    }
  }

  Ok(())
}

/// Fetch the task named by the file path through the filesystem transformer.
async fn fetch_task(task_file: &PathBuf) -> Result<Task> {
  let root = task_file
    .parent()
    .context("task file has no parent directory")?;
  let identifier = task_file
    .file_stem()
    .and_then(|s| s.to_str())
    .context("task file has no usable file stem")?;

  let transformer = FsTaskTransformer::new(root);
  let task = transformer
    .fetch_task(identifier, None)
    .await
    .with_context(|| format!("failed to fetch task '{identifier}'"))?;
  Ok(task)
}

async fn run_task(
  task_file: PathBuf,
  archive_dir: Option<PathBuf>,
  data_dir: PathBuf,
) -> Result<()> {
  let mut task = fetch_task(&task_file).await?;
  eprintln!("Loaded task: {}", task.identifier);

  let answers = read_answers_from_stdin()?;
  let mut result = task.instantiate_result();
  let recordings_dir = data_dir.join("recordings").join(&result.run_id);

  let mut current: Option<String> = None;
  loop {
    let step = task
      .navigator()
      .step_after(current.as_deref(), &mut result)
      .context("traversal failed")?;
    let Some(step) = step else {
      break;
    };

    let permissions = step.required_permissions();
    if !permissions.is_empty() {
      eprintln!("Step '{}' requires: {:?}", step.identifier, permissions);
    }

    if let Some(answer) = answers.get(&step.identifier) {
      let update = answer_result(&step.identifier, &step.step_type, answer, &recordings_dir)
        .await
        .with_context(|| format!("failed to record answer for step '{}'", step.identifier))?;
      result.append_step_history(update);
    }

    current = Some(step.identifier.clone());
  }

  result.end_date = chrono::Utc::now();
  eprintln!("Run completed: {}", result.run_id);

  let archive_dir = archive_dir.unwrap_or_else(|| data_dir.join("archives").join(&result.run_id));
  let mut builder = ArchiveBuilder::new();
  let errors = archive_task_result(&mut builder, &result).await;
  for error in &errors {
    eprintln!("Archive warning: {error}");
  }
  if !builder.entries().is_empty() {
    builder
      .write_to_dir(&archive_dir)
      .await
      .with_context(|| format!("failed to write archive bundle: {}", archive_dir.display()))?;
    eprintln!(
      "Archived {} file result(s) to {}",
      builder.entries().len(),
      archive_dir.display()
    );
  }

  println!("{}", serde_json::to_string_pretty(&result)?);
  Ok(())
}

/// Build the updated result for an answered step.
///
/// Forms accept an object keyed by child identifier; recording steps
/// accept a string whose bytes are recorded and sealed into a file result.
async fn answer_result(
  identifier: &str,
  step_type: &StepType,
  answer: &serde_json::Value,
  recordings_dir: &std::path::Path,
) -> Result<StepResult> {
  match step_type {
    StepType::Form { .. } => {
      let Some(children) = answer.as_object() else {
        bail!("form answer for '{identifier}' must be an object keyed by child identifier");
      };
      let child_results = children
        .iter()
        .map(|(id, value)| StepResult::Answer(AnswerResult::with_value(id, value.clone())))
        .collect();
      Ok(StepResult::Collection(CollectionResult::with_children(
        identifier,
        child_results,
      )))
    }
    StepType::Recording { content_type, .. } => {
      let Some(bytes) = answer.as_str() else {
        bail!("recording answer for '{identifier}' must be a string of sample bytes");
      };
      let mut recorder =
        FileRecorder::create(recordings_dir, identifier, content_type.as_deref()).await?;
      recorder.append(bytes.as_bytes()).await?;
      Ok(StepResult::File(recorder.seal().await?))
    }
    _ => Ok(StepResult::Answer(AnswerResult::with_value(
      identifier,
      answer.clone(),
    ))),
  }
}

fn inspect_task(task_file: PathBuf) -> Result<()> {
  let content = std::fs::read_to_string(&task_file)
    .with_context(|| format!("failed to read task file: {}", task_file.display()))?;
  let def = trellis_step::TaskDef::from_json(&content)
    .with_context(|| format!("failed to parse task file: {}", task_file.display()))?;

  println!("task: {}", def.identifier);
  if let Some(schema) = &def.schema_info {
    println!("schema revision: {}", schema.revision);
  }
  if let Some(minutes) = def.estimated_minutes {
    println!("estimated minutes: {minutes}");
  }

  println!("steps:");
  for step in &def.steps {
    let children = step.children();
    if children.is_empty() {
      println!("  {}", step.identifier);
    } else {
      let ids: Vec<&str> = children.iter().map(|c| c.identifier.as_str()).collect();
      println!("  {} [{}]", step.identifier, ids.join(", "));
    }
  }

  if !def.rules.is_empty() {
    println!("rules:");
    for rule in &def.rules {
      println!(
        "  {} -> {} ({:?})",
        rule.after, rule.skip_to, rule.predicate
      );
    }
  }

  Ok(())
}

fn read_answers_from_stdin() -> Result<serde_json::Map<String, serde_json::Value>> {
  use std::io::IsTerminal;

  if io::stdin().is_terminal() {
    // No stdin pipe, run with no answers
    return Ok(serde_json::Map::new());
  }

  let mut input = String::new();
  io::stdin()
    .read_to_string(&mut input)
    .context("failed to read answers from stdin")?;

  if input.trim().is_empty() {
    return Ok(serde_json::Map::new());
  }

  let value: serde_json::Value =
    serde_json::from_str(&input).context("failed to parse answers JSON from stdin")?;
  match value {
    serde_json::Value::Object(map) => Ok(map),
    _ => bail!("answers must be a JSON object keyed by step identifier"),
  }
}
