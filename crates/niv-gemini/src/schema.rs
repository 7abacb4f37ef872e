//! Prompts and response schemas sent with each request.
//!
//! Schemas use the Gemini OpenAPI subset (upper-case type names). The meal
//! schema's `type` enum carries the Hebrew slot labels so the response
//! deserialises straight into [`MealType`].

use niv_core::meal::MealType;
use serde_json::{Value, json};

const MEAL_REQUIRED: [&str; 9] = [
  "id",
  "name",
  "type",
  "calories",
  "protein",
  "carbs",
  "fat",
  "description",
  "imagePrompt",
];

/// One meal object whose `type` is limited to `slots`.
pub fn meal_object(slots: &[MealType]) -> Value {
  let labels: Vec<&str> = slots.iter().map(|s| s.label()).collect();
  json!({
    "type": "OBJECT",
    "properties": {
      "id":          { "type": "STRING" },
      "name":        { "type": "STRING" },
      "type":        { "type": "STRING", "enum": labels },
      "calories":    { "type": "NUMBER" },
      "protein":     { "type": "NUMBER" },
      "carbs":       { "type": "NUMBER" },
      "fat":         { "type": "NUMBER" },
      "description": { "type": "STRING" },
      "imagePrompt": { "type": "STRING" }
    },
    "required": MEAL_REQUIRED,
  })
}

/// An array of meals across all four slots.
pub fn meal_pool() -> Value {
  json!({
    "type": "ARRAY",
    "items": meal_object(&MealType::ALL),
  })
}

pub fn scan_result() -> Value {
  json!({
    "type": "OBJECT",
    "properties": {
      "score":       { "type": "NUMBER" },
      "analysis":    { "type": "STRING" },
      "productName": { "type": "STRING" }
    },
    "required": ["score", "analysis", "productName"],
  })
}

// ─── Prompts ─────────────────────────────────────────────────────────────────

pub fn pool_prompt(goal: &str, weight_kg: f64) -> String {
  format!(
    "הכן 20 הצעות למנות \"פיטנס נגיש\" למשתמש במשקל {weight_kg} ק\"ג שנמצא בשלב {goal}.\n\
     המנות צריכות להיות קלות מאוד להכנה, עתירות חלבון ומותאמות בקלוריות למשקל של {weight_kg} ק\"ג.\n\
     לכל מנה הוסף שדה 'imagePrompt' באנגלית המתאר אותה באופן מגרה וריאליסטי לצילום אוכל מקצועי.\n\
     חלוקה: 5 לארוחת בוקר, 5 לצהריים, 5 לערב ו-5 נשנושים.\n\
     החזר JSON בלבד."
  )
}

pub fn replacement_prompt(slot: MealType, goal: &str, weight_kg: f64) -> String {
  format!(
    "הצע מנה אחת קלה מאוד להכנה מסוג {slot} לאדם ב{goal} במשקל {weight_kg} ק\"ג.\n\
     הוסף שדה 'imagePrompt' באנגלית עם תיאור ויזואלי מגרה.\n\
     החזר אובייקט JSON יחיד בלבד."
  )
}

pub const ANALYSIS_PROMPT: &str = "נתח את המוצר שבתמונה וקבע עד כמה הוא מתאים לחיטוב.\n\
  החזר JSON בפורמט: { \"score\": number, \"analysis\": \"string\", \"productName\": \"string\" }";

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn replacement_schema_restricts_type_enum() {
    let schema = meal_object(&[MealType::Dinner]);
    assert_eq!(schema["properties"]["type"]["enum"], json!(["ארוחת ערב"]));
    assert_eq!(schema["required"].as_array().unwrap().len(), 9);
  }

  #[test]
  fn pool_schema_lists_all_slots() {
    let schema = meal_pool();
    assert_eq!(schema["type"], "ARRAY");
    assert_eq!(
      schema["items"]["properties"]["type"]["enum"]
        .as_array()
        .unwrap()
        .len(),
      4
    );
  }

  #[test]
  fn prompts_mention_weight_and_goal() {
    let p = pool_prompt("חיטוב", 88.0);
    assert!(p.contains("88"));
    assert!(p.contains("חיטוב"));

    let r = replacement_prompt(MealType::Snack, "חיטוב", 70.5);
    assert!(r.contains("נשנוש"));
    assert!(r.contains("70.5"));
  }
}
