//! Client library for the Deepfake Audio Detection API
//!
//! The crate covers the client side of a media-authenticity classifier:
//! local file acceptance validation, the authenticated request/response
//! contract (bearer tokens, session expiry), simulated progress feedback
//! for long-running inference calls, and an observable upload state
//! machine the rendering layer can subscribe to.
//!
//! ```rust,no_run
//! use spoofdetect::{ApiClient, ClientConfig, SessionStore, UploadController};
//!
//! # async fn run() -> spoofdetect::Result<()> {
//! let sessions = SessionStore::new();
//! let api = ApiClient::new(ClientConfig::new(), sessions)?;
//! api.login("alice", "secret").await?;
//!
//! let controller = UploadController::new(api);
//! controller.select_path("clip.wav".as_ref())?;
//! let state = controller.submit().await?;
//! if let Some(result) = state.result() {
//!     println!("{}: {} ({:.1}%)", result.filename, result.label, result.confidence);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod progress;
pub mod session;
pub mod upload;
pub mod validate;

pub use api::{ApiClient, HistoryEntry, Label, PredictionResult};

pub use config::ClientConfig;

pub use error::{DetectError, Result};

pub use progress::{phase_label, ProgressHandle, ProgressSimulator};

pub use session::{Session, SessionBackend, SessionStore, User};

pub use upload::{FileSource, UploadController, UploadState};

pub use validate::{
    validate, FileDescriptor, RejectReason, ValidationConfig, ValidationOutcome,
    AUDIO_EXTENSIONS, MAX_SIZE_BYTES, VIDEO_EXTENSIONS,
};
