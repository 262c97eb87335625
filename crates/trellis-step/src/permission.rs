use serde::{Deserialize, Serialize};

/// Device capability a step may require before it can be presented.
///
/// Authorization itself is an external boundary: the host queries its
/// platform wrapper and reports back an [`AuthorizationStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
  Camera,
  Microphone,
  Motion,
  Location,
  PhotoLibrary,
}

/// Authorization state reported by the host's permission provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
  Authorized,
  NotDetermined,
  Restricted,
  Denied,
}

impl AuthorizationStatus {
  /// Whether this status must be surfaced as a user-visible blocking
  /// condition rather than silently skipped.
  pub fn is_blocking(&self) -> bool {
    matches!(
      self,
      AuthorizationStatus::Restricted | AuthorizationStatus::Denied
    )
  }
}
