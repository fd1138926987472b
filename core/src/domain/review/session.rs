use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    common::entities::app_errors::CoreError,
    food_recognition::entities::{FoodEntry, NutritionField, RecognitionResult},
    portion::{
        scaling::{rescale_entry, rescale_from_original},
        value_objects::{PortionPreset, percentage_of_original, snap_percentage, weight_for_percent},
    },
};

use super::entities::{
    DELETE_DELAY, EntryState, EntryUpdate, MAX_FIELD_VALUE, NudgeDirection, NutritionTotals,
    PendingRemoval, RemovedEntry, UNDO_WINDOW, UndoNotification,
};

/// Editable list of food entries for one recognition, from the moment the
/// model answers until the user saves or leaves.
///
/// Time never advances on its own: callers pass `now` to [`delete`](Self::delete)
/// and [`tick`](Self::tick), which applies removals whose delay has elapsed.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    entries: Vec<FoodEntry>,
    originals: HashMap<Uuid, FoodEntry>,
    pending: Vec<PendingRemoval>,
    undo_buffer: HashMap<usize, FoodEntry>,
    notification: Option<UndoNotification>,
    cascading_edits: bool,
    delete_delay: Duration,
    undo_window: Duration,
}

impl Default for ReviewSession {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl From<RecognitionResult> for ReviewSession {
    fn from(result: RecognitionResult) -> Self {
        Self::new(result.foods)
    }
}

impl ReviewSession {
    pub fn new(entries: Vec<FoodEntry>) -> Self {
        let originals = entries
            .iter()
            .map(|entry| (entry.id, entry.clone()))
            .collect();

        Self {
            entries,
            originals,
            pending: Vec::new(),
            undo_buffer: HashMap::new(),
            notification: None,
            cascading_edits: true,
            delete_delay: DELETE_DELAY,
            undo_window: UNDO_WINDOW,
        }
    }

    pub fn with_cascading_edits(mut self, enabled: bool) -> Self {
        self.cascading_edits = enabled;
        self
    }

    pub fn with_timings(mut self, delete_delay: Duration, undo_window: Duration) -> Self {
        self.delete_delay = delete_delay;
        self.undo_window = undo_window;
        self
    }

    pub fn cascading_edits(&self) -> bool {
        self.cascading_edits
    }

    pub fn set_cascading_edits(&mut self, enabled: bool) {
        self.cascading_edits = enabled;
    }

    pub fn entries(&self) -> &[FoodEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&FoodEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry as first recognized, before any manual edit.
    pub fn original(&self, index: usize) -> Option<&FoodEntry> {
        self.entry(index)
            .and_then(|entry| self.originals.get(&entry.id))
    }

    pub fn state(&self, index: usize) -> Option<EntryState> {
        let entry = self.entry(index)?;
        if self.pending.iter().any(|p| p.entry_id == entry.id) {
            Some(EntryState::PendingRemoval)
        } else {
            Some(EntryState::Active)
        }
    }

    pub fn pending_removals(&self) -> &[PendingRemoval] {
        &self.pending
    }

    /// Indices that can still be undone, in ascending order.
    pub fn undoable_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.undo_buffer.keys().copied().collect();
        indices.sort_unstable();
        indices
    }

    /// Appends a food the model missed. Returns its index.
    pub fn add_entry(&mut self, entry: FoodEntry) -> usize {
        self.originals.insert(entry.id, entry.clone());
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Replaces the name or one numeric value. A weight set here does not
    /// cascade; use [`set_weight`](Self::set_weight) for that.
    pub fn update(&mut self, index: usize, update: EntryUpdate) -> Result<(), CoreError> {
        match update {
            EntryUpdate::FoodName(name) => {
                self.entry_mut(index)?.food_name = name;
            }
            EntryUpdate::Value { field, value } => {
                validate_value(field, value)?;
                self.entry_mut(index)?.set_value(field, value);
            }
        }
        Ok(())
    }

    /// Weight change from the weight input. With cascading edits enabled the
    /// calories and macros follow proportionally.
    pub fn set_weight(&mut self, index: usize, new_weight: f64) -> Result<(), CoreError> {
        validate_value(NutritionField::Weight, new_weight)?;
        let cascading = self.cascading_edits;
        let entry = self.entry_mut(index)?;

        if cascading {
            rescale_entry(entry, new_weight)
                .inspect_err(|e| debug!(index, "Weight change refused: {}", e))
        } else {
            entry.set_value(NutritionField::Weight, new_weight);
            Ok(())
        }
    }

    pub fn apply_preset(&mut self, index: usize, preset: PortionPreset) -> Result<(), CoreError> {
        self.resize_from_original(index, preset.percent())
    }

    /// Moves the portion slider; returns the snapped percentage actually used.
    pub fn apply_slider(&mut self, index: usize, raw_percent: f64) -> Result<u32, CoreError> {
        let percent = snap_percentage(raw_percent);
        self.resize_from_original(index, percent)?;
        Ok(percent)
    }

    pub fn percentage_of_original(&self, index: usize) -> Option<i64> {
        let current = self.entry(index)?.estimated_weight_g.value;
        let original = self.original(index)?.estimated_weight_g.value;
        percentage_of_original(current, original)
    }

    /// Arrow-key step: 10 for grams and kcal, 1 for macros. Returns the new value.
    pub fn nudge(
        &mut self,
        index: usize,
        field: NutritionField,
        direction: NudgeDirection,
    ) -> Result<f64, CoreError> {
        let current = self
            .entry(index)
            .ok_or(CoreError::EntryNotFound(index))?
            .field(field)
            .value;
        let step = if field.decimals() == 0 { 10.0 } else { 1.0 };
        let value = (current + step * direction.signum()).clamp(0.0, MAX_FIELD_VALUE);

        if field == NutritionField::Weight {
            self.set_weight(index, value)?;
        } else {
            self.update(index, EntryUpdate::Value { field, value })?;
        }
        Ok(value)
    }

    /// Marks the entry for removal after the delete delay. Deleting an entry
    /// that is already pending re-arms its timer.
    pub fn delete(&mut self, index: usize, now: Instant) -> Result<(), CoreError> {
        let entry_id = self
            .entry(index)
            .ok_or(CoreError::EntryNotFound(index))?
            .id;

        let before = self.pending.len();
        self.pending.retain(|p| p.entry_id != entry_id);
        if self.pending.len() != before {
            debug!(index, "Superseding pending removal");
        }

        self.pending.push(PendingRemoval {
            entry_id,
            index,
            due_at: now + self.delete_delay,
        });
        Ok(())
    }

    /// Applies every removal that is due and expires the notification.
    pub fn tick(&mut self, now: Instant) -> Vec<RemovedEntry> {
        let (due, waiting): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|p| p.due_at <= now);
        self.pending = waiting;

        let removed = self.remove_all(due);

        if self
            .notification
            .as_ref()
            .is_some_and(|notification| !notification.is_visible(now))
        {
            self.notification = None;
        }

        removed
    }

    /// Applies all pending removals regardless of their delay.
    pub fn flush_pending(&mut self) -> Vec<RemovedEntry> {
        let due = std::mem::take(&mut self.pending);
        self.remove_all(due)
    }

    /// Stops the pending delete of the entry currently at `index`. Returns
    /// whether a removal was waiting.
    pub fn cancel_delete(&mut self, index: usize) -> bool {
        let Some(entry_id) = self.entry(index).map(|entry| entry.id) else {
            return false;
        };

        let before = self.pending.len();
        self.pending.retain(|p| p.entry_id != entry_id);
        self.pending.len() != before
    }

    /// Reinserts the entry removed from `index` (at the end of the list) and
    /// dismisses the notification. Returns whether anything was restored.
    pub fn undo(&mut self, index: usize) -> bool {
        let Some(entry) = self.undo_buffer.remove(&index) else {
            return false;
        };

        self.entries.push(entry);
        self.notification = None;
        true
    }

    pub fn notification(&self, now: Instant) -> Option<&UndoNotification> {
        self.notification
            .as_ref()
            .filter(|notification| notification.is_visible(now))
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    pub fn total_calories(&self) -> f64 {
        self.entries.iter().map(|entry| entry.calories.value).sum()
    }

    pub fn totals(&self) -> NutritionTotals {
        NutritionTotals::of(&self.entries)
    }

    /// Drops everything; called after a successful save or when leaving the screen.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.originals.clear();
        self.pending.clear();
        self.undo_buffer.clear();
        self.notification = None;
    }

    fn entry_mut(&mut self, index: usize) -> Result<&mut FoodEntry, CoreError> {
        self.entries
            .get_mut(index)
            .ok_or(CoreError::EntryNotFound(index))
    }

    fn resize_from_original(&mut self, index: usize, percent: u32) -> Result<(), CoreError> {
        let entry = self.entry(index).ok_or(CoreError::EntryNotFound(index))?;
        let original = self
            .originals
            .get(&entry.id)
            .cloned()
            .unwrap_or_else(|| entry.clone());
        let new_weight = weight_for_percent(original.estimated_weight_g.value, percent);
        validate_value(NutritionField::Weight, new_weight)?;

        let cascading = self.cascading_edits;
        let entry = self.entry_mut(index)?;
        if cascading {
            rescale_from_original(entry, &original, new_weight)
        } else {
            entry.set_value(NutritionField::Weight, new_weight);
            Ok(())
        }
    }

    fn remove_all(&mut self, mut due: Vec<PendingRemoval>) -> Vec<RemovedEntry> {
        due.sort_by_key(|p| p.due_at);

        let mut removed = Vec::with_capacity(due.len());
        for pending in due {
            let Some(position) = self.entries.iter().position(|e| e.id == pending.entry_id) else {
                continue;
            };
            let entry = self.entries.remove(position);

            if self
                .undo_buffer
                .insert(pending.index, entry.clone())
                .is_some()
            {
                debug!(index = pending.index, "Undo slot overwritten");
            }

            self.notification = Some(UndoNotification {
                index: pending.index,
                food_name: entry.food_name.clone(),
                expires_at: pending.due_at + self.undo_window,
            });
            removed.push(RemovedEntry {
                index: pending.index,
                entry,
            });
        }
        removed
    }
}

fn validate_value(field: NutritionField, value: f64) -> Result<(), CoreError> {
    if value.is_finite() && (0.0..=MAX_FIELD_VALUE).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::InvalidFieldValue {
            field: field.key().to_string(),
            value,
        })
    }
}
