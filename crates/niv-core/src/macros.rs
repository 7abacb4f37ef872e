//! Macro totals, weight-derived targets and progress accounting.

use std::{iter::Sum, ops::Add};

use serde::{Deserialize, Serialize};

use crate::meal::Meal;

// ─── Target coefficients ─────────────────────────────────────────────────────

/// Grams of protein per kilogram of body weight.
pub const PROTEIN_PER_KG: f64 = 2.0;
/// Grams of carbohydrate per kilogram of body weight.
pub const CARBS_PER_KG: f64 = 1.5;
/// Grams of fat per kilogram of body weight.
pub const FAT_PER_KG: f64 = 0.8;
/// Kilocalories per kilogram of body weight.
pub const CALORIES_PER_KG: f64 = 24.0;

// ─── MacroTotals ─────────────────────────────────────────────────────────────

/// Protein, carbs and fat in grams plus energy in kilocalories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTotals {
  pub protein:  f64,
  pub carbs:    f64,
  pub fat:      f64,
  pub calories: f64,
}

impl MacroTotals {
  /// Daily targets as fixed linear multiples of body weight in kilograms.
  pub fn target_for_weight(weight_kg: f64) -> Self {
    Self {
      protein:  weight_kg * PROTEIN_PER_KG,
      carbs:    weight_kg * CARBS_PER_KG,
      fat:      weight_kg * FAT_PER_KG,
      calories: weight_kg * CALORIES_PER_KG,
    }
  }

  /// The macros contributed by one meal.
  pub fn of_meal(meal: &Meal) -> Self {
    Self {
      protein:  meal.protein,
      carbs:    meal.carbs,
      fat:      meal.fat,
      calories: meal.calories,
    }
  }
}

impl Add for MacroTotals {
  type Output = Self;

  fn add(self, rhs: Self) -> Self {
    Self {
      protein:  self.protein + rhs.protein,
      carbs:    self.carbs + rhs.carbs,
      fat:      self.fat + rhs.fat,
      calories: self.calories + rhs.calories,
    }
  }
}

impl<'a> Sum<&'a Meal> for MacroTotals {
  fn sum<I: Iterator<Item = &'a Meal>>(iter: I) -> Self {
    iter.map(Self::of_meal).fold(Self::default(), Add::add)
  }
}

// ─── Progress ────────────────────────────────────────────────────────────────

/// Consumed totals set against the daily target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyProgress {
  pub consumed: MacroTotals,
  pub target:   MacroTotals,
}

impl DailyProgress {
  /// Calories still available today; never negative.
  pub fn remaining_calories(&self) -> f64 {
    (self.target.calories - self.consumed.calories).max(0.0)
  }
}

/// Share of `target` reached by `value`, as a percentage capped at 100.
///
/// A zero (or negative) target yields 0 rather than dividing by zero.
pub fn percent_of_target(value: f64, target: f64) -> f64 {
  if target <= 0.0 {
    return 0.0;
  }
  (value / target * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::meal::MealType;

  fn meal(calories: f64) -> Meal {
    Meal {
      id: format!("m-{calories}"),
      name: "test".into(),
      meal_type: MealType::Lunch,
      protein: 10.0,
      carbs: 20.0,
      fat: 5.0,
      calories,
      description: String::new(),
      image_url: String::new(),
    }
  }

  #[test]
  fn targets_scale_linearly_with_weight() {
    for w in [1.0, 55.5, 90.0, 140.0] {
      let t = MacroTotals::target_for_weight(w);
      assert_eq!(t.calories, 24.0 * w);
      assert_eq!(t.protein, 2.0 * w);
      assert_eq!(t.carbs, 1.5 * w);
      assert_eq!(t.fat, 0.8 * w);
    }
  }

  #[test]
  fn sum_of_meals_is_exact() {
    let meals = [meal(300.0), meal(500.0), meal(0.0), meal(200.0)];
    let total: MacroTotals = meals.iter().sum();
    assert_eq!(total.calories, 1000.0);
    assert_eq!(total.protein, 40.0);
    assert_eq!(total.carbs, 80.0);
    assert_eq!(total.fat, 20.0);
  }

  #[test]
  fn empty_sum_is_zero() {
    let total: MacroTotals = std::iter::empty::<&Meal>().sum();
    assert_eq!(total, MacroTotals::default());
  }

  #[test]
  fn remaining_calories_floor_at_zero() {
    let target = MacroTotals::target_for_weight(50.0);
    let over = DailyProgress {
      consumed: MacroTotals { calories: 5000.0, ..Default::default() },
      target,
    };
    assert_eq!(over.remaining_calories(), 0.0);

    let under = DailyProgress {
      consumed: MacroTotals { calories: 200.0, ..Default::default() },
      target,
    };
    assert_eq!(under.remaining_calories(), 1000.0);
  }

  #[test]
  fn percent_is_capped() {
    assert_eq!(percent_of_target(50.0, 200.0), 25.0);
    assert_eq!(percent_of_target(300.0, 200.0), 100.0);
    assert_eq!(percent_of_target(10.0, 0.0), 0.0);
  }
}
