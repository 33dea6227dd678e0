//! Local file acceptance validation
//!
//! Validation is pure and runs entirely on file metadata: nothing here
//! touches the network or the session. A rejected file never leaves the
//! client.

use bytesize::ByteSize;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Audio container formats accepted by the classifier
pub const AUDIO_EXTENSIONS: [&str; 7] = [".wav", ".flac", ".mp3", ".ogg", ".m4a", ".aac", ".wma"];

/// Video container formats accepted by the classifier; the backend extracts
/// the audio track before analysis
pub const VIDEO_EXTENSIONS: [&str; 7] = [".mp4", ".mkv", ".avi", ".mov", ".webm", ".wmv", ".flv"];

/// Upload size limit enforced by the backend (boundary inclusive)
pub const MAX_SIZE_BYTES: u64 = 50 * 1024 * 1024;

static DEFAULT_ALLOWED: Lazy<BTreeSet<String>> = Lazy::new(|| {
    AUDIO_EXTENSIONS
        .iter()
        .chain(VIDEO_EXTENSIONS.iter())
        .map(|e| e.to_string())
        .collect()
});

/// Metadata of a candidate file, captured once at selection time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub name: String,
    pub size_bytes: u64,
    /// Lowercased suffix after the last `.`, including the dot
    pub extension: Option<String>,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        let name = name.into();
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| format!(".{}", ext.to_lowercase()));
        Self {
            name,
            size_bytes,
            extension,
        }
    }

    /// Build a descriptor from filesystem metadata
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let size_bytes = std::fs::metadata(path)?.len();
        Ok(Self::new(name, size_bytes))
    }

    /// Whether the descriptor names a video container
    pub fn is_video(&self) -> bool {
        match &self.extension {
            Some(ext) => VIDEO_EXTENSIONS.contains(&ext.as_str()),
            None => false,
        }
    }
}

/// Why a file was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectReason {
    NoFileSelected,
    UnsupportedFormat,
    TooLarge,
    EmptyFile,
}

/// Outcome of validating a candidate file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted,
    Rejected {
        reason: RejectReason,
        message: String,
    },
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted)
    }

    /// Rejection message, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            ValidationOutcome::Accepted => None,
            ValidationOutcome::Rejected { message, .. } => Some(message),
        }
    }
}

/// Acceptance rules for candidate files
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Allowed extensions, lowercased, with leading dots
    pub allowed_extensions: BTreeSet<String>,
    pub max_size_bytes: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: DEFAULT_ALLOWED.clone(),
            max_size_bytes: MAX_SIZE_BYTES,
        }
    }
}

impl ValidationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept audio formats only
    pub fn audio_only() -> Self {
        Self {
            allowed_extensions: AUDIO_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            max_size_bytes: MAX_SIZE_BYTES,
        }
    }

    /// Accept video formats only
    pub fn video_only() -> Self {
        Self {
            allowed_extensions: VIDEO_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            max_size_bytes: MAX_SIZE_BYTES,
        }
    }

    /// Add an allowed extension (with or without the leading dot)
    pub fn allowed_extension<S: AsRef<str>>(mut self, ext: S) -> Self {
        let ext = ext.as_ref().trim_start_matches('.').to_lowercase();
        self.allowed_extensions.insert(format!(".{}", ext));
        self
    }

    /// Set the maximum accepted size in bytes
    pub fn max_size_bytes(mut self, max: u64) -> Self {
        self.max_size_bytes = max;
        self
    }

    fn allowed_list(&self) -> String {
        self.allowed_extensions
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Decide whether a candidate file may be submitted
///
/// Rules are evaluated in order and the first match wins. The function is
/// deterministic, has no side effects, and always returns an outcome.
pub fn validate(file: Option<&FileDescriptor>, config: &ValidationConfig) -> ValidationOutcome {
    let file = match file {
        Some(file) => file,
        None => {
            return ValidationOutcome::Rejected {
                reason: RejectReason::NoFileSelected,
                message: "Please select a file.".to_string(),
            }
        }
    };

    let supported = file
        .extension
        .as_ref()
        .map(|ext| config.allowed_extensions.contains(ext))
        .unwrap_or(false);
    if !supported {
        let shown = file.extension.as_deref().unwrap_or("");
        return ValidationOutcome::Rejected {
            reason: RejectReason::UnsupportedFormat,
            message: format!(
                "Unsupported format \"{}\". Allowed: {}",
                shown,
                config.allowed_list()
            ),
        };
    }

    if file.size_bytes > config.max_size_bytes {
        let observed_mb = file.size_bytes as f64 / (1024.0 * 1024.0);
        return ValidationOutcome::Rejected {
            reason: RejectReason::TooLarge,
            message: format!(
                "File too large ({:.1} MB). Max: {}.",
                observed_mb,
                ByteSize(config.max_size_bytes).display().iec()
            ),
        };
    }

    if file.size_bytes == 0 {
        return ValidationOutcome::Rejected {
            reason: RejectReason::EmptyFile,
            message: "File is empty.".to_string(),
        };
    }

    ValidationOutcome::Accepted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(outcome: &ValidationOutcome) -> Option<RejectReason> {
        match outcome {
            ValidationOutcome::Accepted => None,
            ValidationOutcome::Rejected { reason, .. } => Some(*reason),
        }
    }

    #[test]
    fn test_descriptor_extension() {
        let file = FileDescriptor::new("Interview.WAV", 1024);
        assert_eq!(file.extension.as_deref(), Some(".wav"));

        let file = FileDescriptor::new("archive.tar.gz", 1024);
        assert_eq!(file.extension.as_deref(), Some(".gz"));

        let file = FileDescriptor::new("noextension", 1024);
        assert_eq!(file.extension, None);
    }

    #[test]
    fn test_no_file_selected() {
        let outcome = validate(None, &ValidationConfig::default());
        assert_eq!(reason(&outcome), Some(RejectReason::NoFileSelected));
        assert_eq!(outcome.message(), Some("Please select a file."));
    }

    #[test]
    fn test_unsupported_format_regardless_of_size() {
        let config = ValidationConfig::default();

        for size in [0, 1024, 200 * 1024 * 1024] {
            let file = FileDescriptor::new("document.pdf", size);
            let outcome = validate(Some(&file), &config);
            assert_eq!(reason(&outcome), Some(RejectReason::UnsupportedFormat));
        }

        // The message lists the allowed set.
        let file = FileDescriptor::new("document.pdf", 1024);
        let outcome = validate(Some(&file), &config);
        assert!(outcome.message().unwrap().contains(".wav"));
        assert!(outcome.message().unwrap().contains(".mp4"));
    }

    #[test]
    fn test_size_boundary_inclusive() {
        let config = ValidationConfig::default();

        let at_limit = FileDescriptor::new("clip.wav", MAX_SIZE_BYTES);
        assert!(validate(Some(&at_limit), &config).is_accepted());

        let over = FileDescriptor::new("clip.wav", MAX_SIZE_BYTES + 1);
        let outcome = validate(Some(&over), &config);
        assert_eq!(reason(&outcome), Some(RejectReason::TooLarge));
        assert!(outcome.message().unwrap().contains("50.0 MB"));
    }

    #[test]
    fn test_empty_file() {
        let file = FileDescriptor::new("silence.mp3", 0);
        let outcome = validate(Some(&file), &ValidationConfig::default());
        assert_eq!(reason(&outcome), Some(RejectReason::EmptyFile));
    }

    #[test]
    fn test_rule_order_format_before_size() {
        // An oversized file with a bad extension reports the format first.
        let file = FileDescriptor::new("huge.iso", 200 * 1024 * 1024);
        let outcome = validate(Some(&file), &ValidationConfig::default());
        assert_eq!(reason(&outcome), Some(RejectReason::UnsupportedFormat));
    }

    #[test]
    fn test_case_insensitive_extension() {
        let file = FileDescriptor::new("Recording.MP3", 1024);
        assert!(validate(Some(&file), &ValidationConfig::default()).is_accepted());
    }

    #[test]
    fn test_custom_config() {
        let config = ValidationConfig::audio_only();
        let video = FileDescriptor::new("clip.mp4", 1024);
        assert!(!validate(Some(&video), &config).is_accepted());

        let config = config.allowed_extension("opus").max_size_bytes(1024);
        let opus = FileDescriptor::new("voice.opus", 512);
        assert!(validate(Some(&opus), &config).is_accepted());

        let too_big = FileDescriptor::new("voice.opus", 2048);
        assert!(!validate(Some(&too_big), &config).is_accepted());
    }

    #[test]
    fn test_is_video() {
        assert!(FileDescriptor::new("clip.mkv", 1).is_video());
        assert!(!FileDescriptor::new("clip.wav", 1).is_video());
        assert!(!FileDescriptor::new("clip", 1).is_video());
    }
}
