//! The daily plan: one meal per slot, chosen from a candidate pool.
//!
//! Consumed totals are never cached. [`DailyPlan::consumed`] sums whatever
//! meals currently occupy the slots, so a single-slot replacement can never
//! leave the totals out of step with the displayed meals.

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
  macros::{DailyProgress, MacroTotals},
  meal::{Meal, MealType},
};

// ─── DailyPlan ───────────────────────────────────────────────────────────────

/// At most one meal per slot; slots may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyPlan {
  slots: [Option<Meal>; 4],
}

impl DailyPlan {
  /// The meal occupying `slot`, if any.
  pub fn get(&self, slot: MealType) -> Option<&Meal> {
    self.slots[slot.index()].as_ref()
  }

  /// Put `meal` into `slot`, returning the meal it displaced.
  /// The other three slots are left untouched.
  pub fn replace(&mut self, slot: MealType, meal: Meal) -> Option<Meal> {
    self.slots[slot.index()].replace(meal)
  }

  /// Slots in display order with their (possibly empty) meal.
  pub fn iter(&self) -> impl Iterator<Item = (MealType, Option<&Meal>)> {
    MealType::ALL.into_iter().map(|t| (t, self.get(t)))
  }

  /// Only the occupied slots.
  pub fn meals(&self) -> impl Iterator<Item = &Meal> {
    self.slots.iter().flatten()
  }

  /// Number of occupied slots (0–4).
  pub fn populated(&self) -> usize { self.meals().count() }

  pub fn is_empty(&self) -> bool { self.populated() == 0 }

  /// Exact sum over the currently selected meals.
  pub fn consumed(&self) -> MacroTotals { self.meals().sum() }
}

// ─── Selection ───────────────────────────────────────────────────────────────

/// Pick one candidate uniformly at random per slot.
///
/// A slot with no candidate of its type stays empty. The distribution of the
/// pool across slots is not checked; whatever the generator returned is used.
pub fn select_daily_plan<R>(candidates: &[Meal], rng: &mut R) -> DailyPlan
where
  R: Rng + ?Sized,
{
  let mut plan = DailyPlan::default();
  for slot in MealType::ALL {
    let options: Vec<&Meal> =
      candidates.iter().filter(|m| m.meal_type == slot).collect();
    match options.choose(rng) {
      Some(meal) => {
        plan.replace(slot, (*meal).clone());
      }
      None => debug!(slot = %slot, "no candidate for slot"),
    }
  }
  plan
}

// ─── DayState ────────────────────────────────────────────────────────────────

/// Everything the dashboard and planner show for the current day.
///
/// The target is a snapshot taken when the last full plan fetch completed, so
/// editing the weight does not move it until the next refresh.
#[derive(Debug, Clone, Default)]
pub struct DayState {
  /// The full pool returned by the last generation call.
  pub candidates: Vec<Meal>,
  pub plan:       DailyPlan,
  pub target:     MacroTotals,
}

impl DayState {
  /// A fresh day whose target reflects `weight_kg` and whose plan is empty.
  pub fn new(weight_kg: f64) -> Self {
    Self {
      target: MacroTotals::target_for_weight(weight_kg),
      ..Self::default()
    }
  }

  /// Apply the result of a full regeneration: store the pool, select a new
  /// plan and re-derive the target from `weight_kg`.
  pub fn apply_candidates<R>(
    &mut self,
    candidates: Vec<Meal>,
    weight_kg: f64,
    rng: &mut R,
  ) where
    R: Rng + ?Sized,
  {
    self.plan = select_daily_plan(&candidates, rng);
    self.candidates = candidates;
    self.target = MacroTotals::target_for_weight(weight_kg);
  }

  /// Apply the result of a single-slot replacement. `None` (a failed
  /// request) leaves the plan unchanged. Returns whether the plan changed.
  pub fn apply_replacement(
    &mut self,
    slot: MealType,
    replacement: Option<Meal>,
  ) -> bool {
    match replacement {
      Some(meal) => {
        self.plan.replace(slot, meal);
        true
      }
      None => false,
    }
  }

  /// Consumed (live) against target (snapshot).
  pub fn progress(&self) -> DailyProgress {
    DailyProgress {
      consumed: self.plan.consumed(),
      target:   self.target,
    }
  }
}

#[cfg(test)]
mod tests {
  use rand::{SeedableRng, rngs::StdRng};

  use super::*;

  fn meal(id: &str, meal_type: MealType, calories: f64) -> Meal {
    Meal {
      id: id.into(),
      name: format!("meal {id}"),
      meal_type,
      protein: 1.0,
      carbs: 2.0,
      fat: 3.0,
      calories,
      description: String::new(),
      image_url: format!("https://img.example/{id}"),
    }
  }

  fn pool() -> Vec<Meal> {
    let mut out = Vec::new();
    for slot in MealType::ALL {
      for i in 0..5 {
        out.push(meal(&format!("{}-{i}", slot.index()), slot, 100.0 + i as f64));
      }
    }
    out
  }

  #[test]
  fn consumed_sums_populated_slots() {
    let mut plan = DailyPlan::default();
    plan.replace(MealType::Breakfast, meal("b", MealType::Breakfast, 300.0));
    plan.replace(MealType::Lunch, meal("l", MealType::Lunch, 500.0));
    plan.replace(MealType::Dinner, meal("d", MealType::Dinner, 0.0));
    plan.replace(MealType::Snack, meal("s", MealType::Snack, 200.0));
    assert_eq!(plan.populated(), 4);
    assert_eq!(plan.consumed().calories, 1000.0);
  }

  #[test]
  fn consumed_with_partial_plan() {
    let mut plan = DailyPlan::default();
    assert_eq!(plan.consumed(), MacroTotals::default());
    plan.replace(MealType::Dinner, meal("d", MealType::Dinner, 420.0));
    assert_eq!(plan.populated(), 1);
    assert_eq!(plan.consumed().calories, 420.0);
  }

  #[test]
  fn selection_fills_every_slot_with_matching_type() {
    let mut rng = StdRng::seed_from_u64(7);
    let plan = select_daily_plan(&pool(), &mut rng);
    for (slot, m) in plan.iter() {
      let m = m.expect("slot filled");
      assert_eq!(m.meal_type, slot);
    }
  }

  #[test]
  fn selection_is_deterministic_for_a_seed() {
    let candidates = pool();
    let a = select_daily_plan(&candidates, &mut StdRng::seed_from_u64(42));
    let b = select_daily_plan(&candidates, &mut StdRng::seed_from_u64(42));
    assert_eq!(a, b);
  }

  #[test]
  fn missing_type_leaves_slot_empty() {
    let candidates: Vec<Meal> = pool()
      .into_iter()
      .filter(|m| m.meal_type != MealType::Snack)
      .collect();
    let plan = select_daily_plan(&candidates, &mut StdRng::seed_from_u64(1));
    assert!(plan.get(MealType::Snack).is_none());
    assert_eq!(plan.populated(), 3);
  }

  #[test]
  fn empty_pool_yields_empty_plan() {
    let plan = select_daily_plan(&[], &mut StdRng::seed_from_u64(1));
    assert!(plan.is_empty());
    assert_eq!(plan.consumed().calories, 0.0);
  }

  #[test]
  fn replacing_lunch_leaves_other_slots_identical() {
    let mut plan =
      select_daily_plan(&pool(), &mut StdRng::seed_from_u64(3));
    let before = plan.clone();

    let new_lunch = meal("fresh", MealType::Lunch, 999.0);
    let old = plan.replace(MealType::Lunch, new_lunch.clone());

    assert_eq!(old.as_ref(), before.get(MealType::Lunch));
    assert_eq!(plan.get(MealType::Lunch), Some(&new_lunch));
    assert_ne!(plan.get(MealType::Lunch), before.get(MealType::Lunch));
    for slot in [MealType::Breakfast, MealType::Dinner, MealType::Snack] {
      assert_eq!(plan.get(slot), before.get(slot));
    }
  }

  #[test]
  fn day_state_recomputes_consumed_after_replacement() {
    let mut day = DayState::new(80.0);
    day.apply_candidates(pool(), 80.0, &mut StdRng::seed_from_u64(9));
    let before = day.progress().consumed.calories;
    let old_lunch = day.plan.get(MealType::Lunch).unwrap().calories;

    let changed = day.apply_replacement(
      MealType::Lunch,
      Some(meal("x", MealType::Lunch, old_lunch + 250.0)),
    );

    assert!(changed);
    assert_eq!(day.progress().consumed.calories, before + 250.0);
  }

  #[test]
  fn failed_replacement_keeps_plan() {
    let mut day = DayState::new(80.0);
    day.apply_candidates(pool(), 80.0, &mut StdRng::seed_from_u64(9));
    let before = day.plan.clone();
    assert!(!day.apply_replacement(MealType::Dinner, None));
    assert_eq!(day.plan, before);
  }

  #[test]
  fn target_is_snapshotted_at_full_refresh() {
    let mut day = DayState::new(90.0);
    assert_eq!(day.target.calories, 90.0 * 24.0);

    day.apply_candidates(Vec::new(), 70.0, &mut StdRng::seed_from_u64(0));
    assert_eq!(day.progress().target.calories, 70.0 * 24.0);
    assert!(day.plan.is_empty());
  }
}
