use tracing::{info, instrument, warn};

use crate::domain::{
    common::entities::app_errors::CoreError,
    food_log::{
        entities::{FoodLibraryEntry, FoodLogRecord},
        ports::FoodLogRepository,
        value_objects::{SaveReviewInput, SavedMeal},
    },
    review::session::ReviewSession,
};

/// Helper function to persist a reviewed meal
///
/// Pending deletes are applied first. The session is cleared only once the
/// log records are stored; library upserts are best effort.
#[instrument(skip(repository, session), fields(user_id = %input.user_id, meal_type = %input.meal_type))]
pub async fn save_review<R>(
    repository: &R,
    session: &mut ReviewSession,
    input: SaveReviewInput,
) -> Result<SavedMeal, CoreError>
where
    R: FoodLogRepository,
{
    // 1. Settle deletes the user already asked for
    session.flush_pending();
    if session.is_empty() {
        return Err(CoreError::InvalidInput("没有可保存的食物".to_string()));
    }

    // 2. Store the log records
    let records: Vec<FoodLogRecord> = session
        .entries()
        .iter()
        .map(|entry| {
            FoodLogRecord::from_entry(input.user_id, entry, input.meal_type, input.entry_date)
        })
        .collect();
    let total_calories = session.total_calories();
    let records = repository.insert_records(records).await?;

    // 3. Refresh the food library
    let mut library_entries_updated = 0;
    for entry in session.entries() {
        let Some(library_entry) = FoodLibraryEntry::from_entry(input.user_id, entry) else {
            warn!(food_name = %entry.food_name, "Skipping library entry without weight");
            continue;
        };

        match repository.upsert_library_entry(library_entry).await {
            Ok(_) => library_entries_updated += 1,
            Err(e) => warn!(food_name = %entry.food_name, "Library upsert failed: {}", e),
        }
    }

    // 4. The review is done
    session.clear();
    info!(records = records.len(), total_calories, "Meal saved");

    Ok(SavedMeal {
        records,
        library_entries_updated,
        total_calories,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;
    use crate::domain::{
        food_log::{entities::MealType, ports::MockFoodLogRepository},
        food_recognition::entities::{ConfidenceValue, FoodEntry, FoodEntryConfig},
    };

    fn food(name: &str, weight: f64, calories: f64) -> FoodEntry {
        FoodEntry::new(FoodEntryConfig {
            food_name: name.to_string(),
            confidence: 80.0,
            estimated_weight_g: ConfidenceValue::new(weight, 80.0),
            calories: ConfidenceValue::new(calories, 80.0),
            protein_g: ConfidenceValue::new(4.0, 80.0),
            carbs_g: ConfidenceValue::new(20.0, 80.0),
            fat_g: ConfidenceValue::new(2.0, 80.0),
        })
    }

    fn input() -> SaveReviewInput {
        SaveReviewInput {
            user_id: Uuid::new_v4(),
            meal_type: MealType::Dinner,
            entry_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        }
    }

    fn echoing_repository(expected_records: usize, expected_upserts: usize) -> MockFoodLogRepository {
        let mut repository = MockFoodLogRepository::new();
        repository
            .expect_insert_records()
            .withf(move |records| records.len() == expected_records)
            .times(1)
            .returning(|records| Box::pin(async move { Ok(records) }));
        repository
            .expect_upsert_library_entry()
            .times(expected_upserts)
            .returning(|entry| Box::pin(async move { Ok(entry) }));
        repository
    }

    #[tokio::test]
    async fn test_save_maps_entries_and_clears_session() {
        let repository = echoing_repository(2, 2);
        let mut session = ReviewSession::new(vec![food("米饭", 200.0, 260.0), food("鸡蛋", 50.0, 72.0)]);
        let input = input();

        let saved = save_review(&repository, &mut session, input.clone())
            .await
            .unwrap();

        assert_eq!(saved.records.len(), 2);
        assert_eq!(saved.total_calories, 332.0);
        assert_eq!(saved.library_entries_updated, 2);
        assert!(saved.records.iter().all(|r| r.meal_type == MealType::Dinner));
        assert!(saved.records.iter().all(|r| r.user_id == input.user_id));
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn test_pending_deletes_are_not_saved() {
        let repository = echoing_repository(1, 1);
        let mut session = ReviewSession::new(vec![food("米饭", 200.0, 260.0), food("可乐", 330.0, 140.0)]);
        session.delete(1, Instant::now()).unwrap();

        let saved = save_review(&repository, &mut session, input()).await.unwrap();

        assert_eq!(saved.records[0].food_name, "米饭");
        assert_eq!(saved.total_calories, 260.0);
    }

    #[tokio::test]
    async fn test_zero_weight_skips_library_upsert() {
        let repository = echoing_repository(2, 1);
        let mut session = ReviewSession::new(vec![food("米饭", 200.0, 260.0), food("酱汁", 0.0, 40.0)]);

        let saved = save_review(&repository, &mut session, input()).await.unwrap();

        assert_eq!(saved.records.len(), 2);
        assert_eq!(saved.library_entries_updated, 1);
    }

    #[tokio::test]
    async fn test_failed_insert_keeps_the_session() {
        let mut repository = MockFoodLogRepository::new();
        repository.expect_insert_records().times(1).returning(|_| {
            Box::pin(async { Err(CoreError::Repository("connection reset".to_string())) })
        });
        repository.expect_upsert_library_entry().never();
        let mut session = ReviewSession::new(vec![food("米饭", 200.0, 260.0)]);

        let result = save_review(&repository, &mut session, input()).await;

        assert!(matches!(result, Err(CoreError::Repository(_))));
        assert_eq!(session.len(), 1);
    }

    #[tokio::test]
    async fn test_library_failure_does_not_fail_the_save() {
        let mut repository = MockFoodLogRepository::new();
        repository
            .expect_insert_records()
            .returning(|records| Box::pin(async move { Ok(records) }));
        repository.expect_upsert_library_entry().times(1).returning(|_| {
            Box::pin(async { Err(CoreError::Repository("duplicate key".to_string())) })
        });
        let mut session = ReviewSession::new(vec![food("米饭", 200.0, 260.0)]);

        let saved = save_review(&repository, &mut session, input()).await.unwrap();

        assert_eq!(saved.library_entries_updated, 0);
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn test_empty_session_is_rejected() {
        let mut repository = MockFoodLogRepository::new();
        repository.expect_insert_records().never();
        let mut session = ReviewSession::default();

        let result = save_review(&repository, &mut session, input()).await;

        assert!(matches!(result, Err(CoreError::InvalidInput(_))));
    }
}
