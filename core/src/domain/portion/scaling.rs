use crate::domain::{
    common::entities::app_errors::CoreError,
    food_recognition::entities::{FoodEntry, NutritionField},
};

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

pub fn round1(value: f64) -> f64 {
    round_to(value, 1)
}

/// Weight-dependent values of `source` rescaled by `new_weight / old_weight`.
///
/// Calories are rounded to whole kcal, macros to one decimal. Fails with
/// [`CoreError::ScalingGuard`] instead of producing NaN or infinity.
pub fn scaled_values(
    source: &FoodEntry,
    old_weight: f64,
    new_weight: f64,
) -> Result<Vec<(NutritionField, f64)>, CoreError> {
    let valid = |weight: f64| weight.is_finite() && weight > 0.0;
    if !valid(old_weight) || !valid(new_weight) {
        return Err(CoreError::ScalingGuard {
            old_weight,
            new_weight,
        });
    }

    let ratio = new_weight / old_weight;

    Ok(NutritionField::WEIGHT_DEPENDENT
        .iter()
        .map(|field| {
            let scaled = source.field(*field).value * ratio;
            (*field, round_to(scaled, field.decimals()))
        })
        .collect())
}

/// Sets a new weight and cascades it to calories and macros. Confidences are
/// untouched; on error the entry is left as it was.
pub fn rescale_entry(entry: &mut FoodEntry, new_weight: f64) -> Result<(), CoreError> {
    let old_weight = entry.estimated_weight_g.value;
    let values = scaled_values(entry, old_weight, new_weight)?;

    apply(entry, new_weight, values);
    Ok(())
}

/// Like [`rescale_entry`] but derives the values from the originally
/// recognized entry, so earlier manual edits do not skew the result.
pub fn rescale_from_original(
    entry: &mut FoodEntry,
    original: &FoodEntry,
    new_weight: f64,
) -> Result<(), CoreError> {
    let values = scaled_values(original, original.estimated_weight_g.value, new_weight)?;

    apply(entry, new_weight, values);
    Ok(())
}

fn apply(entry: &mut FoodEntry, new_weight: f64, values: Vec<(NutritionField, f64)>) {
    entry.set_value(NutritionField::Weight, new_weight);
    for (field, value) in values {
        entry.set_value(field, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::food_recognition::entities::{ConfidenceValue, FoodEntryConfig};

    fn entry(weight: f64, calories: f64, protein: f64, carbs: f64, fat: f64) -> FoodEntry {
        FoodEntry::new(FoodEntryConfig {
            food_name: "米饭".to_string(),
            confidence: 85.0,
            estimated_weight_g: ConfidenceValue::new(weight, 80.0),
            calories: ConfidenceValue::new(calories, 85.0),
            protein_g: ConfidenceValue::new(protein, 80.0),
            carbs_g: ConfidenceValue::new(carbs, 85.0),
            fat_g: ConfidenceValue::new(fat, 75.0),
        })
    }

    #[test]
    fn test_halving_the_weight_halves_calories() {
        let mut rice = entry(200.0, 260.0, 5.0, 56.0, 0.5);
        rescale_entry(&mut rice, 100.0).unwrap();

        assert_eq!(rice.estimated_weight_g.value, 100.0);
        assert_eq!(rice.calories.value, 130.0);
        assert_eq!(rice.protein_g.value, 2.5);
        assert_eq!(rice.carbs_g.value, 28.0);
        assert_eq!(rice.fat_g.value, 0.3);
    }

    #[test]
    fn test_confidences_survive_scaling() {
        let mut rice = entry(200.0, 260.0, 5.0, 56.0, 0.5);
        let before = rice.clone();
        rescale_entry(&mut rice, 333.0).unwrap();

        for field in NutritionField::ALL {
            assert_eq!(rice.field(field).confidence, before.field(field).confidence);
        }
        assert_eq!(rice.confidence, before.confidence);
        assert_eq!(rice.id, before.id);
    }

    #[test]
    fn test_rounding_rules() {
        let mut soup = entry(300.0, 101.0, 3.33, 7.77, 1.01);
        rescale_entry(&mut soup, 200.0).unwrap();

        assert_eq!(soup.calories.value, 67.0);
        assert_eq!(soup.protein_g.value, 2.2);
        assert_eq!(soup.carbs_g.value, 5.2);
        assert_eq!(soup.fat_g.value, 0.7);
    }

    #[test]
    fn test_zero_old_weight_is_refused() {
        let mut unknown = entry(0.0, 120.0, 4.0, 20.0, 2.0);
        let before = unknown.clone();

        let result = rescale_entry(&mut unknown, 150.0);

        assert!(matches!(result, Err(CoreError::ScalingGuard { .. })));
        assert_eq!(unknown, before);
        assert!(unknown.calories.value.is_finite());
    }

    #[test]
    fn test_non_positive_new_weight_is_refused() {
        let mut rice = entry(200.0, 260.0, 5.0, 56.0, 0.5);
        assert!(rescale_entry(&mut rice, 0.0).is_err());
        assert!(rescale_entry(&mut rice, -10.0).is_err());
        assert!(rescale_entry(&mut rice, f64::NAN).is_err());
        assert_eq!(rice.calories.value, 260.0);
    }

    #[test]
    fn test_scaling_there_and_back_stays_within_rounding() {
        let weights = [1.0, 7.0, 55.0, 100.0, 133.0, 200.0, 480.0, 999.0];
        for &old_weight in &weights {
            for &new_weight in &weights {
                let mut food = entry(old_weight, 261.0, 12.3, 45.6, 7.8);
                let original = food.clone();

                rescale_entry(&mut food, new_weight).unwrap();
                rescale_entry(&mut food, old_weight).unwrap();

                let ratio = (old_weight / new_weight).max(1.0);
                assert!(
                    (food.calories.value - original.calories.value).abs() <= 0.5 * ratio + 0.5,
                    "{old_weight} -> {new_weight}: {}",
                    food.calories.value
                );
                for field in [NutritionField::Protein, NutritionField::Carbs, NutritionField::Fat] {
                    assert!(
                        (food.field(field).value - original.field(field).value).abs()
                            <= 0.05 * ratio + 0.05 + 1e-9,
                        "{old_weight} -> {new_weight}: {:?}",
                        field
                    );
                }
            }
        }
    }

    #[test]
    fn test_round_trip_for_moderate_ratios_is_within_one_kcal() {
        for new_weight in [100.0, 130.0, 150.0, 175.0, 250.0, 300.0, 400.0] {
            let mut rice = entry(200.0, 261.0, 5.3, 56.7, 0.9);
            rescale_entry(&mut rice, new_weight).unwrap();
            rescale_entry(&mut rice, 200.0).unwrap();

            assert!(
                (rice.calories.value - 261.0).abs() <= 1.0,
                "200 -> {new_weight}: {}",
                rice.calories.value
            );
            assert!((rice.protein_g.value - 5.3).abs() <= 0.1 + 1e-9, "200 -> {new_weight}");
            assert!((rice.carbs_g.value - 56.7).abs() <= 0.1 + 1e-9, "200 -> {new_weight}");
            assert!((rice.fat_g.value - 0.9).abs() <= 0.1 + 1e-9, "200 -> {new_weight}");
        }
    }

    #[test]
    fn test_rescale_from_original_ignores_manual_edits() {
        let original = entry(200.0, 260.0, 5.0, 56.0, 0.5);
        let mut edited = original.clone();
        edited.set_value(NutritionField::Calories, 999.0);
        edited.set_value(NutritionField::Weight, 250.0);

        rescale_from_original(&mut edited, &original, 200.0).unwrap();

        assert_eq!(edited.calories.value, 260.0);
        assert_eq!(edited.estimated_weight_g.value, 200.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2.25, 0), 2.0);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round1(0.25), 0.3);
        assert_eq!(round_to(12.346, 2), 12.35);
    }
}
