//! HTTP access to the detection API
//!
//! Every outbound call goes through [`ApiClient`], which attaches the
//! session's bearer token and classifies authentication failures.

pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::{HistoryEntry, Label, PredictionResult};
