//! The submit-and-observe workflow
//!
//! [`UploadController`] orchestrates validation, the progress simulator and
//! the API client into a single state machine; the rendering layer is a
//! pure subscriber of its transitions.

pub mod controller;
pub mod types;

pub use controller::UploadController;
pub use types::{FileSource, Observer, UploadState};
