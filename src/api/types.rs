//! Wire types for the detection API

use crate::session::User;
use serde::{Deserialize, Serialize};

/// Verdict of the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Real,
    Fake,
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Real => write!(f, "REAL"),
            Label::Fake => write!(f, "FAKE"),
        }
    }
}

/// Classification result for a single submitted file
///
/// Probabilities are percentages; `real_probability` and `fake_probability`
/// sum to 100 up to rounding, and the label is `Fake` exactly when
/// `fake_probability >= 50`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub filename: String,
    pub label: Label,
    /// Confidence in the reported label, 0..100
    pub confidence: f64,
    pub real_probability: f64,
    pub fake_probability: f64,
    /// Raw sigmoid output of the model, 0..1
    pub raw_score: f64,
}

impl PredictionResult {
    /// Label implied by the reported probabilities
    pub fn derived_label(&self) -> Label {
        if self.fake_probability >= 50.0 {
            Label::Fake
        } else {
            Label::Real
        }
    }

    /// Whether the reported label matches the probabilities
    pub fn is_consistent(&self) -> bool {
        self.label == self.derived_label()
            && (self.real_probability + self.fake_probability - 100.0).abs() < 0.5
    }
}

/// One entry of the user's prediction history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub filename: String,
    pub label: Label,
    pub confidence: f64,
    pub real_probability: f64,
    pub fake_probability: f64,
    /// Server-side timestamp, in the backend's own format
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HistoryResponse {
    pub predictions: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
