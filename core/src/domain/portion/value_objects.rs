use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const SLIDER_MIN_PERCENT: u32 = 50;
pub const SLIDER_MAX_PERCENT: u32 = 200;
pub const SLIDER_STEP_PERCENT: u32 = 25;

/// Quick portion buttons, relative to the weight the model first estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PortionPreset {
    Half,
    ThreeQuarters,
    Full,
    OneAndAQuarter,
    OneAndAHalf,
    Double,
}

impl PortionPreset {
    pub const ALL: [PortionPreset; 6] = [
        PortionPreset::Half,
        PortionPreset::ThreeQuarters,
        PortionPreset::Full,
        PortionPreset::OneAndAQuarter,
        PortionPreset::OneAndAHalf,
        PortionPreset::Double,
    ];

    pub fn percent(&self) -> u32 {
        match self {
            PortionPreset::Half => 50,
            PortionPreset::ThreeQuarters => 75,
            PortionPreset::Full => 100,
            PortionPreset::OneAndAQuarter => 125,
            PortionPreset::OneAndAHalf => 150,
            PortionPreset::Double => 200,
        }
    }

    pub fn from_percent(percent: u32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.percent() == percent)
    }

    pub fn label(&self) -> String {
        format!("{}%", self.percent())
    }

    /// `round(original * percent / 100)`, always from the original estimate.
    pub fn weight_for(&self, original_weight: f64) -> f64 {
        weight_for_percent(original_weight, self.percent())
    }
}

pub fn weight_for_percent(original_weight: f64, percent: u32) -> f64 {
    (original_weight * f64::from(percent) / 100.0).round()
}

/// Current weight as a whole percentage of the original; `None` when the
/// original weight is zero.
pub fn percentage_of_original(current_weight: f64, original_weight: f64) -> Option<i64> {
    if !original_weight.is_finite() || original_weight <= 0.0 || !current_weight.is_finite() {
        return None;
    }
    Some((current_weight / original_weight * 100.0).round() as i64)
}

/// Clamps a free slider position to [50, 200] and snaps it to 25% steps.
pub fn snap_percentage(raw_percent: f64) -> u32 {
    let min = f64::from(SLIDER_MIN_PERCENT);
    let max = f64::from(SLIDER_MAX_PERCENT);
    let step = f64::from(SLIDER_STEP_PERCENT);

    let clamped = if raw_percent.is_nan() {
        100.0
    } else {
        raw_percent.clamp(min, max)
    };

    ((clamped / step).round() * step).clamp(min, max) as u32
}
