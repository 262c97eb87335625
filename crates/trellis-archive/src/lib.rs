//! Trellis Archive
//!
//! This crate handles the file-backed side of a task run: recording bytes
//! for file results and relocating them into an archive bundle once the
//! run completes.
//!
//! A [`FileRecorder`] owns the on-disk byte stream while a recording step
//! is open (create → append samples → seal into a `FileResult`). After the
//! run, [`build_archive_data`] pairs a file result's bytes with an
//! [`ArchiveManifest`]; the [`ArchiveBuilder`] collects entries and
//! enforces that each file result is archived exactly once. Archiving a
//! whole task result is best-effort: one unreadable file result never
//! aborts archiving of the rest.

mod builder;
mod error;
mod manifest;
mod recorder;

pub use builder::{ArchiveBuilder, archive_task_result};
pub use error::ArchiveError;
pub use manifest::{ArchiveEntry, ArchiveManifest, build_archive_data};
pub use recorder::FileRecorder;
