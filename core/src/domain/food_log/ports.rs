use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError,
    food_log::entities::{FoodLibraryEntry, FoodLogRecord},
};

/// Storage for confirmed meals. Implemented outside this crate.
#[cfg_attr(test, mockall::automock)]
pub trait FoodLogRepository: Send + Sync {
    fn insert_records(
        &self,
        records: Vec<FoodLogRecord>,
    ) -> impl Future<Output = Result<Vec<FoodLogRecord>, CoreError>> + Send;

    /// Insert or replace the library row keyed by `(user_id, food_name)`.
    fn upsert_library_entry(
        &self,
        entry: FoodLibraryEntry,
    ) -> impl Future<Output = Result<FoodLibraryEntry, CoreError>> + Send;
}
