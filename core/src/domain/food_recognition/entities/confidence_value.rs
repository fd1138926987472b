use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const MAX_CONFIDENCE: f64 = 100.0;
pub const DEFAULT_CONFIDENCE: f64 = 75.0;

/// Entries below this overall confidence get a "please double-check" warning.
pub const REVIEW_THRESHOLD: f64 = 50.0;
/// Fields below this confidence are highlighted in the editor.
pub const HIGHLIGHT_THRESHOLD: f64 = 70.0;

/// A numeric field paired with how much the model trusts it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConfidenceValue {
    pub value: f64,
    pub confidence: f64,
}

impl ConfidenceValue {
    pub fn new(value: f64, confidence: f64) -> Self {
        Self {
            value,
            confidence: clamp_confidence(confidence),
        }
    }

    pub fn with_value(self, value: f64) -> Self {
        Self { value, ..self }
    }

    pub fn level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_score(self.confidence)
    }

    pub fn is_highlighted(&self) -> bool {
        self.confidence < HIGHLIGHT_THRESHOLD
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    /// The one place confidence scores are banded.
    pub fn from_score(confidence: f64) -> Self {
        if confidence >= 80.0 {
            ConfidenceLevel::High
        } else if confidence >= 50.0 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

pub fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        return DEFAULT_CONFIDENCE;
    }
    confidence.clamp(0.0, MAX_CONFIDENCE)
}
