//! Daily energy and macronutrient targets derived from current attributes.
//!
//! Basal metabolic rate follows the Mifflin–St Jeor equation. Total daily
//! energy expenditure assumes a moderate activity factor and is shifted by a
//! fixed surplus or deficit for gain and lose goals. Protein scales with
//! body weight, fat takes a fixed share of energy, and carbohydrates fill the
//! remainder.

use serde::Serialize;

use super::profile::{CurrentAttributes, Goal};

const ACTIVITY_FACTOR: f64 = 1.55;
const GOAL_ADJUSTMENT_KCAL: f64 = 500.0;
const FAT_ENERGY_SHARE: f64 = 0.30;
const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
const KCAL_PER_GRAM_CARBOHYDRATE: f64 = 4.0;
const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Daily intake targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionGoals {
    pub calories_kcal: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbohydrate_g: f64,
}

impl NutritionGoals {
    /// Compute targets for a user's current attributes.
    ///
    /// # Examples
    /// ```
    /// use atomfit::domain::{
    ///     Age, CurrentAttributes, Goal, HeightCm, NutritionGoals, ProfileAttributes, UserId,
    ///     WeightKg,
    /// };
    ///
    /// let current = CurrentAttributes {
    ///     user_id: UserId::random(),
    ///     attributes: ProfileAttributes {
    ///         is_male: true,
    ///         height: HeightCm::new(180).unwrap(),
    ///         goal: Goal::Maintain,
    ///         weight_goal: WeightKg::new(80.0).unwrap(),
    ///         age: Age::new(30).unwrap(),
    ///     },
    ///     current_weight: WeightKg::new(80.0).unwrap(),
    /// };
    /// let goals = NutritionGoals::for_attributes(&current);
    /// assert!((goals.calories_kcal - 2759.0).abs() < 1e-9);
    /// ```
    pub fn for_attributes(current: &CurrentAttributes) -> Self {
        let attributes = &current.attributes;
        let weight = current.current_weight.get();
        let sex_offset = if attributes.is_male { 5.0 } else { -161.0 };
        let bmr = 10.0 * weight + 6.25 * f64::from(attributes.height.get())
            - 5.0 * f64::from(attributes.age.get())
            + sex_offset;

        let maintenance = bmr * ACTIVITY_FACTOR;
        let (calories_kcal, protein_per_kg) = match attributes.goal {
            Goal::Lose => (maintenance - GOAL_ADJUSTMENT_KCAL, 1.8),
            Goal::Gain => (maintenance + GOAL_ADJUSTMENT_KCAL, 2.2),
            Goal::Maintain => (maintenance, 2.0),
        };

        let protein_g = protein_per_kg * weight;
        let fat_kcal = calories_kcal * FAT_ENERGY_SHARE;
        let remaining_kcal = calories_kcal - protein_g * KCAL_PER_GRAM_PROTEIN - fat_kcal;

        Self {
            calories_kcal,
            protein_g,
            fat_g: fat_kcal / KCAL_PER_GRAM_FAT,
            carbohydrate_g: remaining_kcal / KCAL_PER_GRAM_CARBOHYDRATE,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{Age, HeightCm, ProfileAttributes, UserId, WeightKg};
    use rstest::rstest;

    fn current(is_male: bool, goal: Goal) -> CurrentAttributes {
        CurrentAttributes {
            user_id: UserId::random(),
            attributes: ProfileAttributes {
                is_male,
                height: HeightCm::new(170).expect("valid height"),
                goal,
                weight_goal: WeightKg::new(65.0).expect("valid weight"),
                age: Age::new(40).expect("valid age"),
            },
            current_weight: WeightKg::new(70.0).expect("valid weight"),
        }
    }

    fn approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    // BMR (male): 700 + 1062.5 - 200 + 5 = 1567.5; x1.55 = 2429.625.
    #[rstest]
    #[case(Goal::Maintain, 2429.625, 140.0)]
    #[case(Goal::Lose, 1929.625, 126.0)]
    #[case(Goal::Gain, 2929.625, 154.0)]
    fn goal_shifts_energy_and_protein(
        #[case] goal: Goal,
        #[case] calories: f64,
        #[case] protein: f64,
    ) {
        let goals = NutritionGoals::for_attributes(&current(true, goal));
        approx(goals.calories_kcal, calories);
        approx(goals.protein_g, protein);
        approx(goals.fat_g, calories * 0.30 / 9.0);
        approx(
            goals.carbohydrate_g,
            (calories - protein * 4.0 - calories * 0.30) / 4.0,
        );
    }

    #[rstest]
    fn female_offset_lowers_bmr() {
        let male = NutritionGoals::for_attributes(&current(true, Goal::Maintain));
        let female = NutritionGoals::for_attributes(&current(false, Goal::Maintain));
        approx(male.calories_kcal - female.calories_kcal, 166.0 * 1.55);
    }
}
