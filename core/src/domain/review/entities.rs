use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::food_recognition::entities::{FoodEntry, NutritionField};

/// Delay between a delete request and the entry leaving the list.
pub const DELETE_DELAY: Duration = Duration::from_millis(300);
/// How long the "removed, undo?" notification stays visible.
pub const UNDO_WINDOW: Duration = Duration::from_secs(3);
/// Upper bound accepted for any manually entered number.
pub const MAX_FIELD_VALUE: f64 = 10_000.0;

/// A single manual edit on one entry.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryUpdate {
    FoodName(String),
    Value { field: NutritionField, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NudgeDirection {
    Up,
    Down,
}

impl NudgeDirection {
    pub fn signum(&self) -> f64 {
        match self {
            NudgeDirection::Up => 1.0,
            NudgeDirection::Down => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Active,
    PendingRemoval,
}

/// A delete that has been requested but not yet applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRemoval {
    pub entry_id: Uuid,
    /// Index the entry had when the delete was requested; also the undo key.
    pub index: usize,
    pub due_at: Instant,
}

/// Entry that left the list during a [`tick`](super::ReviewSession::tick).
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedEntry {
    pub index: usize,
    pub entry: FoodEntry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UndoNotification {
    pub index: usize,
    pub food_name: String,
    pub expires_at: Instant,
}

impl UndoNotification {
    pub fn is_visible(&self, now: Instant) -> bool {
        now < self.expires_at
    }

    pub fn message(&self) -> String {
        format!("已删除「{}」", self.food_name)
    }
}

/// Live sums over the entries currently in the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl NutritionTotals {
    pub fn of<'a>(entries: impl IntoIterator<Item = &'a FoodEntry>) -> Self {
        entries
            .into_iter()
            .fold(NutritionTotals::default(), |totals, entry| NutritionTotals {
                calories: totals.calories + entry.calories.value,
                protein_g: totals.protein_g + entry.protein_g.value,
                carbs_g: totals.carbs_g + entry.carbs_g.value,
                fat_g: totals.fat_g + entry.fat_g.value,
            })
    }
}
