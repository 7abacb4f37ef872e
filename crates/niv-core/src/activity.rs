//! Static exercise catalog, search, and the mocked wearable sync.
//!
//! The catalog is compiled in and never fetched, so there is no loading
//! state: a search either returns matches or an empty list.

use std::time::Duration;

use serde::Serialize;

// ─── Intensity ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
  Intense,
  Moderate,
  Light,
}

impl Intensity {
  pub fn label(self) -> &'static str {
    match self {
      Self::Intense => "עצים",
      Self::Moderate => "בינוני",
      Self::Light => "קליל",
    }
  }

  /// Display color as a hex RGB string.
  pub fn color(self) -> &'static str {
    match self {
      Self::Intense => "#ef4444",
      Self::Moderate => "#22c55e",
      Self::Light => "#3b82f6",
    }
  }
}

// ─── Activity ────────────────────────────────────────────────────────────────

/// One catalog entry. Entirely constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Activity {
  pub name:      &'static str,
  /// Estimated kilocalories burned over `duration`.
  pub burn_kcal: u32,
  pub duration:  &'static str,
  pub intensity: Intensity,
}

impl Activity {
  const fn new(
    name: &'static str,
    burn_kcal: u32,
    duration: &'static str,
    intensity: Intensity,
  ) -> Self {
    Self { name, burn_kcal, duration, intensity }
  }

  pub fn color(&self) -> &'static str { self.intensity.color() }
}

const HOUR: &str = "שעה";

pub const CATALOG: &[Activity] = &[
  Activity::new("ריצה מהירה (12 קמ\"ש)", 1050, HOUR, Intensity::Intense),
  Activity::new("אימון HIIT אגרסיבי", 850, "45 דק'", Intensity::Intense),
  Activity::new("קיקבוקסינג / איגרוף", 800, HOUR, Intensity::Intense),
  Activity::new("קרוספיט (WOD)", 950, HOUR, Intensity::Intense),
  Activity::new("כדורסל (משחק תחרותי)", 750, HOUR, Intensity::Intense),
  Activity::new("ספינינג עצים", 900, HOUR, Intensity::Intense),
  Activity::new("הליכה מהירה (6 קמ\"ש)", 450, HOUR, Intensity::Moderate),
  Activity::new("אימון כוח משקולות", 400, HOUR, Intensity::Moderate),
  Activity::new("שחייה (קצב רציף)", 550, HOUR, Intensity::Moderate),
  Activity::new("טניס (משחק יחידים)", 600, HOUR, Intensity::Moderate),
  Activity::new("מכשיר חתירה", 650, HOUR, Intensity::Moderate),
  Activity::new("יוגה ויניאסה", 250, HOUR, Intensity::Light),
  Activity::new("פילאטיס מכשירים", 280, HOUR, Intensity::Light),
  Activity::new("הליכה נינוחה", 300, HOUR, Intensity::Light),
];

/// Case-insensitive substring match on the activity name. An empty query
/// returns the whole catalog.
pub fn search(query: &str) -> Vec<&'static Activity> {
  let needle = query.to_lowercase();
  CATALOG
    .iter()
    .filter(|a| a.name.to_lowercase().contains(&needle))
    .collect()
}

// ─── Wearable sync (simulated) ───────────────────────────────────────────────

/// How long the simulated watch sync takes.
pub const WEARABLE_SYNC_DELAY: Duration = Duration::from_secs(2);

/// An activity reported by the (mocked) wearable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WearableActivity {
  pub name:     String,
  pub calories: u32,
  /// Free-text date label as shown to the user.
  pub date:     String,
}

/// The fixed record every simulated sync produces.
pub fn simulated_wearable_activity() -> WearableActivity {
  WearableActivity {
    name:     "ריצת בוקר - Garmin".into(),
    calories: 645,
    date:     "היום, 07:30".into(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn catalog_has_fourteen_entries() {
    assert_eq!(CATALOG.len(), 14);
  }

  #[test]
  fn search_running_matches_substring_only() {
    let hits = search("ריצה");
    let expected: Vec<_> =
      CATALOG.iter().filter(|a| a.name.contains("ריצה")).collect();
    assert_eq!(hits, expected);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].burn_kcal, 1050);
  }

  #[test]
  fn search_is_case_insensitive() {
    let lower = search("hiit");
    let upper = search("HIIT");
    assert_eq!(lower.len(), 1);
    assert_eq!(lower, upper);

    assert_eq!(search("wod").len(), 1);
  }

  #[test]
  fn unmatched_query_is_empty() {
    assert!(search("סקי").is_empty());
    assert!(search("zzz").is_empty());
  }

  #[test]
  fn empty_query_returns_everything() {
    assert_eq!(search("").len(), CATALOG.len());
  }

  #[test]
  fn walking_matches_both_paces() {
    let hits = search("הליכה");
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|a| a.intensity != Intensity::Intense));
  }

  #[test]
  fn intensity_colors() {
    assert_eq!(CATALOG[0].color(), "#ef4444");
    assert_eq!(Intensity::Moderate.color(), "#22c55e");
    assert_eq!(Intensity::Light.color(), "#3b82f6");
  }

  #[test]
  fn simulated_sync_record_is_fixed() {
    let a = simulated_wearable_activity();
    assert_eq!(a.calories, 645);
    assert!(a.name.contains("Garmin"));
    assert_eq!(WEARABLE_SYNC_DELAY, Duration::from_secs(2));
  }
}
