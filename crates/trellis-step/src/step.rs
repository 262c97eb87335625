use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;
use trellis_result::{AnswerResult, CollectionResult, FileResult, StepResult};

use crate::permission::Permission;

/// One navigable unit of a task.
///
/// The identifier is unique within its containing step list and stable
/// across runs. Title/subtitle/detail/footnote are presentation-adjacent
/// metadata; the core never renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDef {
  pub identifier: String,

  #[serde(flatten)]
  pub step_type: StepType,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub subtitle: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub detail: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub footnote: Option<String>,
}

/// Expected data type of a question's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerDataType {
  String,
  Integer,
  Decimal,
  Boolean,
  Date,
}

/// The closed set of step variants, tag-dispatched on `type`.
///
/// Unknown tags deserialize into [`StepType::Custom`] with the raw document
/// retained, so task definitions carrying downstream-defined step types
/// survive a round trip and still navigate (producing a plain answer
/// result). A document whose tag *is* known but whose body is malformed is
/// a parse error, not a custom step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepType {
  /// Display-only instruction screen.
  Instruction,
  /// Single question producing an answer result.
  Question {
    data_type: Option<AnswerDataType>,
    optional: bool,
  },
  /// Composite step whose result is a collection keyed by child identifiers.
  Form { children: Vec<StepDef> },
  /// Mutable task-overview screen; at most one, at the head of the task.
  Overview {
    permissions: Vec<Permission>,
    icons: Vec<String>,
  },
  /// Sensor/file recording step producing a file result.
  Recording {
    content_type: Option<String>,
    permissions: Vec<Permission>,
    duration_s: Option<f64>,
  },
  /// Terminal completion screen.
  Completion,
  /// Extension fallback: a step type this crate does not know about.
  Custom {
    type_name: String,
    value: serde_json::Value,
  },
}

/// Serde proxy covering the known tags.
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum KnownStepType {
  Instruction,
  Question {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data_type: Option<AnswerDataType>,
    #[serde(default)]
    optional: bool,
  },
  Form {
    children: Vec<StepDef>,
  },
  Overview {
    #[serde(default)]
    permissions: Vec<Permission>,
    #[serde(default)]
    icons: Vec<String>,
  },
  Recording {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
    #[serde(default)]
    permissions: Vec<Permission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration_s: Option<f64>,
  },
  Completion,
}

const KNOWN_TAGS: &[&str] = &[
  "instruction",
  "question",
  "form",
  "overview",
  "recording",
  "completion",
];

impl From<KnownStepType> for StepType {
  fn from(known: KnownStepType) -> Self {
    match known {
      KnownStepType::Instruction => StepType::Instruction,
      KnownStepType::Question {
        data_type,
        optional,
      } => StepType::Question {
        data_type,
        optional,
      },
      KnownStepType::Form { children } => StepType::Form { children },
      KnownStepType::Overview { permissions, icons } => StepType::Overview { permissions, icons },
      KnownStepType::Recording {
        content_type,
        permissions,
        duration_s,
      } => StepType::Recording {
        content_type,
        permissions,
        duration_s,
      },
      KnownStepType::Completion => StepType::Completion,
    }
  }
}

impl StepType {
  /// Map onto the known-tag proxy; `None` for custom steps.
  fn known(&self) -> Option<KnownStepType> {
    match self {
      StepType::Instruction => Some(KnownStepType::Instruction),
      StepType::Question {
        data_type,
        optional,
      } => Some(KnownStepType::Question {
        data_type: *data_type,
        optional: *optional,
      }),
      StepType::Form { children } => Some(KnownStepType::Form {
        children: children.clone(),
      }),
      StepType::Overview { permissions, icons } => Some(KnownStepType::Overview {
        permissions: permissions.clone(),
        icons: icons.clone(),
      }),
      StepType::Recording {
        content_type,
        permissions,
        duration_s,
      } => Some(KnownStepType::Recording {
        content_type: content_type.clone(),
        permissions: permissions.clone(),
        duration_s: *duration_s,
      }),
      StepType::Completion => Some(KnownStepType::Completion),
      StepType::Custom { .. } => None,
    }
  }
}

impl Serialize for StepType {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self.known() {
      Some(known) => known.serialize(serializer),
      None => {
        let StepType::Custom { value, .. } = self else {
          unreachable!("non-custom step types map onto the known proxy");
        };
        value.serialize(serializer)
      }
    }
  }
}

impl<'de> Deserialize<'de> for StepType {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    let tag = value
      .get("type")
      .and_then(serde_json::Value::as_str)
      .ok_or_else(|| D::Error::missing_field("type"))?;

    if KNOWN_TAGS.contains(&tag) {
      serde_json::from_value::<KnownStepType>(value)
        .map(StepType::from)
        .map_err(D::Error::custom)
    } else {
      Ok(StepType::Custom {
        type_name: tag.to_string(),
        value,
      })
    }
  }
}

impl StepDef {
  /// Create a step with no presentation metadata.
  pub fn new(identifier: impl Into<String>, step_type: StepType) -> Self {
    Self {
      identifier: identifier.into(),
      step_type,
      title: None,
      subtitle: None,
      detail: None,
      footnote: None,
    }
  }

  /// Whether this is the mutable overview step variant.
  pub fn is_overview(&self) -> bool {
    matches!(self.step_type, StepType::Overview { .. })
  }

  /// Device capabilities this step requires before it can be presented.
  pub fn required_permissions(&self) -> &[Permission] {
    match &self.step_type {
      StepType::Overview { permissions, .. } => permissions,
      StepType::Recording { permissions, .. } => permissions,
      _ => &[],
    }
  }

  /// The ordered child steps, for composite steps.
  pub fn children(&self) -> &[StepDef] {
    match &self.step_type {
      StepType::Form { children } => children,
      _ => &[],
    }
  }

  /// Produce one fresh result for this step.
  ///
  /// Never fails. A form recursively instantiates each child and wraps them
  /// in a collection result keyed by the form's own identifier. A custom
  /// step that claims children cannot produce well-typed child results, so
  /// an empty collection is substituted and an integrity warning reported;
  /// traversal is never aborted over it.
  pub fn instantiate_result(&self) -> StepResult {
    match &self.step_type {
      StepType::Form { children } => {
        let child_results = children.iter().map(StepDef::instantiate_result).collect();
        StepResult::Collection(CollectionResult::with_children(
          &self.identifier,
          child_results,
        ))
      }
      StepType::Recording { content_type, .. } => {
        let mut result = FileResult::new(&self.identifier);
        result.content_type = content_type.clone();
        StepResult::File(result)
      }
      StepType::Custom { type_name, value } if value.get("children").is_some() => {
        warn!(
          identifier = %self.identifier,
          step_type = %type_name,
          "custom step claims children; substituting an empty collection result"
        );
        StepResult::Collection(CollectionResult::new(&self.identifier))
      }
      _ => StepResult::Answer(AnswerResult::new(&self.identifier)),
    }
  }
}
