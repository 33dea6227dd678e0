//! State and source types for the submission pipeline

use crate::api::types::PredictionResult;
use crate::validate::FileDescriptor;
use std::path::PathBuf;
use std::sync::Arc;

/// Where the selected file's bytes come from at submit time
///
/// The source is retained across a failed attempt so a retry needs no
/// re-selection.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// Bytes already in memory
    Memory(Arc<Vec<u8>>),
    /// Read from the filesystem when the submission starts
    Path(PathBuf),
}

/// The one active state of an upload controller
#[derive(Debug, Clone, PartialEq)]
pub enum UploadState {
    /// No file selected
    Idle,
    /// A validated file is ready to submit
    FileSelected(FileDescriptor),
    /// A submission is outstanding; progress is simulated, 0..100
    Submitting { file: FileDescriptor, progress: f64 },
    /// Terminal: the classifier returned a result
    Succeeded(PredictionResult),
    /// Terminal: the submission failed; retry is allowed
    Failed { file: FileDescriptor, error: String },
}

impl UploadState {
    pub fn is_idle(&self) -> bool {
        matches!(self, UploadState::Idle)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, UploadState::Submitting { .. })
    }

    /// Whether this state has no further automatic transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadState::Succeeded(_) | UploadState::Failed { .. })
    }

    /// Simulated progress while submitting
    pub fn progress(&self) -> Option<f64> {
        match self {
            UploadState::Submitting { progress, .. } => Some(*progress),
            _ => None,
        }
    }

    /// The file this state refers to, if any
    pub fn file(&self) -> Option<&FileDescriptor> {
        match self {
            UploadState::FileSelected(file)
            | UploadState::Submitting { file, .. }
            | UploadState::Failed { file, .. } => Some(file),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            UploadState::Succeeded(result) => Some(result),
            _ => None,
        }
    }
}

/// Callback notified on every state transition
pub type Observer = Arc<dyn Fn(&UploadState) + Send + Sync>;
