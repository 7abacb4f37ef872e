use std::time::Duration;

use niv_core::{
  generator::{MealGenerator, ProductAnalyzer},
  meal::MealType,
  scanner::ScanResult,
};
use rand::{SeedableRng, rngs::StdRng};
use serde_json::{Value, json};
use wiremock::{
  Mock, MockServer, ResponseTemplate,
  matchers::{header, method, path},
};

use crate::{
  Error, GeminiClient, GeminiConfig,
  encode::{decode_pool, decode_replacement, decode_scan},
  image_url,
  wire::GenerateContentResponse,
};

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn rng() -> StdRng { StdRng::seed_from_u64(7) }

fn seed_of(url: &str) -> u32 {
  url
    .rsplit("seed=")
    .next()
    .and_then(|s| s.parse().ok())
    .expect("seed param")
}

const POOL_JSON: &str = r#"[
  {"id":"b1","name":"שקשוקה","type":"ארוחת בוקר","calories":320,"protein":22,"carbs":12,"fat":18,"description":"ביצים ברוטב","imagePrompt":"shakshuka in a pan"},
  {"id":"l1","name":"חזה עוף","type":"ארוחת צהריים","calories":480,"protein":45,"carbs":40,"fat":10,"description":"עם אורז","imagePrompt":"grilled chicken breast"},
  {"id":"s1","name":"יוגורט","type":"נשנוש","calories":150,"protein":15,"carbs":10,"fat":3}
]"#;

// ─── Image URLs ──────────────────────────────────────────────────────────────

#[test]
fn image_url_encodes_description_and_params() {
  let url = image_url("grilled salmon & rice", &mut rng());
  assert!(url.starts_with("https://image.pollinations.ai/prompt/Professional%20food%20photography%20of%20grilled%20salmon%20%26%20rice"));
  assert!(url.contains("?width=1024&height=1024&nologo=true&seed="));
  assert!(seed_of(&url) < 10_000);
}

#[test]
fn image_url_blank_prompt_uses_fallback() {
  let url = image_url("   ", &mut rng());
  assert!(url.starts_with("https://image.pollinations.ai/prompt/healthy-meal?"));
}

#[test]
fn image_url_seeds_vary_between_calls() {
  let mut rng = rng();
  let seeds: Vec<u32> = (0..8).map(|_| seed_of(&image_url("oats", &mut rng))).collect();
  assert!(seeds.iter().any(|s| *s != seeds[0]));
}

// ─── Decoding ────────────────────────────────────────────────────────────────

#[test]
fn decode_pool_maps_types_and_images() {
  let meals = decode_pool(POOL_JSON, &mut rng()).unwrap();
  assert_eq!(meals.len(), 3);
  assert_eq!(meals[0].meal_type, MealType::Breakfast);
  assert_eq!(meals[1].meal_type, MealType::Lunch);
  assert_eq!(meals[2].meal_type, MealType::Snack);
  assert!(meals[0].image_url.contains("shakshuka%20in%20a%20pan"));
  // Missing prompt and description fall back rather than failing.
  assert!(meals[2].image_url.contains("/healthy-meal?"));
  assert_eq!(meals[2].description, "");
}

#[test]
fn decode_pool_rejects_malformed_output() {
  assert!(matches!(decode_pool("not json", &mut rng()), Err(Error::Json(_))));
  let unknown_type = r#"[{"id":"x","name":"x","type":"brunch","calories":1,"protein":1,"carbs":1,"fat":1}]"#;
  assert!(decode_pool(unknown_type, &mut rng()).is_err());
}

#[test]
fn decode_replacement_forces_requested_slot() {
  let text = r#"{"id":"d9","name":"סלט טונה","type":"ארוחת צהריים","calories":400,"protein":35,"carbs":20,"fat":15,"description":"","imagePrompt":"tuna salad"}"#;
  let meal = decode_replacement(text, MealType::Dinner, &mut rng()).unwrap();
  assert_eq!(meal.meal_type, MealType::Dinner);
  assert_eq!(meal.name, "סלט טונה");
}

#[test]
fn decode_scan_clamps_score() {
  let result = decode_scan(r#"{"score":104.6,"analysis":"עתיר חלבון","productName":"חטיף חלבון"}"#).unwrap();
  assert_eq!(result, ScanResult::new(100.0, "עתיר חלבון", "חטיף חלבון"));
}

#[test]
fn response_text_joins_first_candidate_parts() {
  let resp: GenerateContentResponse = serde_json::from_str(
    r#"{"candidates":[{"content":{"parts":[{"text":"[1,"},{"text":"2]"}]}},{"content":{"parts":[{"text":"ignored"}]}}]}"#,
  )
  .unwrap();
  assert_eq!(resp.text().as_deref(), Some("[1,2]"));

  let empty: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
  assert_eq!(empty.text(), None);
}

// ─── Client ──────────────────────────────────────────────────────────────────

fn client(api_key: Option<&str>, base_url: &str) -> GeminiClient {
  GeminiClient::new(GeminiConfig {
    api_key: api_key.map(str::to_owned),
    base_url: base_url.to_owned(),
    timeout: Duration::from_secs(2),
    ..Default::default()
  })
  .unwrap()
  .with_seed(1)
}

#[tokio::test]
async fn missing_api_key_short_circuits() {
  // Unroutable base URL: any attempted request would fail loudly.
  let client = client(None, "http://127.0.0.1:9");
  assert!(!client.has_api_key());

  assert!(client.generate_candidates("חיטוב", 90.0).await.is_empty());
  assert_eq!(client.replacement_meal(MealType::Lunch, "חיטוב", 90.0).await, None);
  assert_eq!(client.analyze_product("AAAA").await.unwrap(), ScanResult::unavailable());
  assert!(matches!(
    client.try_generate_candidates("חיטוב", 90.0).await,
    Err(Error::MissingApiKey)
  ));
}

#[tokio::test]
async fn blank_api_key_counts_as_missing() {
  let client = client(Some("  "), "http://127.0.0.1:9");
  assert!(!client.has_api_key());
}

#[tokio::test]
async fn network_failure_yields_empty_results() {
  let client = client(Some("test-key"), "http://127.0.0.1:9");

  assert!(client.generate_candidates("חיטוב", 90.0).await.is_empty());
  assert_eq!(client.replacement_meal(MealType::Snack, "חיטוב", 90.0).await, None);
  assert!(matches!(client.analyze_product("AAAA").await, Err(Error::Http(_))));
}

#[tokio::test]
async fn transport_errors_do_not_leak_the_api_key() {
  let client = client(Some("SUPER-SECRET-KEY"), "http://127.0.0.1:9");

  let err = client.try_generate_candidates("חיטוב", 90.0).await.unwrap_err();
  assert!(matches!(err, Error::Http(_)));
  assert!(!err.to_string().contains("SUPER-SECRET-KEY"), "{err}");
  assert!(!format!("{err:?}").contains("SUPER-SECRET-KEY"));

  let err = client.analyze_product("AAAA").await.unwrap_err();
  assert!(!err.to_string().contains("SUPER-SECRET-KEY"), "{err}");
}

// ─── HTTP responses ──────────────────────────────────────────────────────────

const ENDPOINT: &str = "/models/gemini-3-flash-preview:generateContent";

/// A successful `generateContent` body whose model output is `text`.
fn model_reply(text: &str) -> Value {
  json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
}

async fn mock_endpoint(server: &MockServer, response: ResponseTemplate) {
  Mock::given(method("POST"))
    .and(path(ENDPOINT))
    .and(header("x-goog-api-key", "test-key"))
    .respond_with(response)
    .mount(server)
    .await;
}

/// Body of the single request the server received.
async fn sent_body(server: &MockServer) -> Value {
  let requests = server.received_requests().await.unwrap();
  assert_eq!(requests.len(), 1);
  assert_eq!(requests[0].url.query(), None);
  serde_json::from_slice(&requests[0].body).unwrap()
}

#[tokio::test]
async fn candidates_are_decoded_from_model_output() {
  let server = MockServer::start().await;
  mock_endpoint(&server, ResponseTemplate::new(200).set_body_json(model_reply(POOL_JSON))).await;
  let client = client(Some("test-key"), &server.uri());

  let meals = client.generate_candidates("חיטוב", 90.0).await;
  assert_eq!(meals.len(), 3);
  assert_eq!(meals[0].name, "שקשוקה");
  assert_eq!(meals[1].meal_type, MealType::Lunch);
  assert!(meals[0].image_url.starts_with("https://image.pollinations.ai/prompt/"));
  assert!(meals[0].image_url.contains("shakshuka%20in%20a%20pan"));

  let body = sent_body(&server).await;
  assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
  assert_eq!(body["generationConfig"]["responseSchema"]["type"], "ARRAY");
  let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
  assert!(prompt.contains("90"));
  assert!(prompt.contains("חיטוב"));
}

#[tokio::test]
async fn replacement_is_limited_to_the_requested_slot() {
  let server = MockServer::start().await;
  let reply = r#"{"id":"d9","name":"סלט טונה","type":"ארוחת צהריים","calories":400,"protein":35,"carbs":20,"fat":15,"description":"","imagePrompt":"tuna salad"}"#;
  mock_endpoint(&server, ResponseTemplate::new(200).set_body_json(model_reply(reply))).await;
  let client = client(Some("test-key"), &server.uri());

  let meal = client
    .replacement_meal(MealType::Dinner, "חיטוב", 80.0)
    .await
    .expect("replacement");
  assert_eq!(meal.meal_type, MealType::Dinner);
  assert!(meal.image_url.contains("tuna%20salad"));

  let body = sent_body(&server).await;
  let schema = &body["generationConfig"]["responseSchema"];
  assert_eq!(schema["type"], "OBJECT");
  assert_eq!(
    schema["properties"]["type"]["enum"],
    json!([MealType::Dinner.label()])
  );
}

#[tokio::test]
async fn product_analysis_sends_inline_jpeg_and_clamps_score() {
  let server = MockServer::start().await;
  let reply = r#"{"score":104.6,"analysis":"עתיר חלבון","productName":"חטיף חלבון"}"#;
  mock_endpoint(&server, ResponseTemplate::new(200).set_body_json(model_reply(reply))).await;
  let client = client(Some("test-key"), &server.uri());

  let result = client.analyze_product("/9j/AAAA").await.unwrap();
  assert_eq!(result.score, 100);
  assert_eq!(result.product_name, "חטיף חלבון");

  let body = sent_body(&server).await;
  let parts = &body["contents"][0]["parts"];
  assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
  assert_eq!(parts[0]["inlineData"]["data"], "/9j/AAAA");
  assert!(parts[1]["text"].is_string());
  assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
}

#[tokio::test]
async fn error_status_carries_the_api_message() {
  let server = MockServer::start().await;
  mock_endpoint(
    &server,
    ResponseTemplate::new(429).set_body_json(json!({ "error": { "message": "quota exceeded" } })),
  )
  .await;
  let client = client(Some("test-key"), &server.uri());

  match client.try_generate_candidates("חיטוב", 90.0).await {
    Err(Error::Api { status, message }) => {
      assert_eq!(status, 429);
      assert_eq!(message, "quota exceeded");
    }
    other => panic!("unexpected result {other:?}"),
  }
  // The swallowing boundary turns it into an empty pool.
  assert!(client.generate_candidates("חיטוב", 90.0).await.is_empty());
}

#[tokio::test]
async fn error_status_with_plain_body_keeps_the_body() {
  let server = MockServer::start().await;
  mock_endpoint(&server, ResponseTemplate::new(500).set_body_string("upstream down")).await;
  let client = client(Some("test-key"), &server.uri());

  match client.try_analyze_product("AAAA").await {
    Err(Error::Api { status, message }) => {
      assert_eq!(status, 500);
      assert_eq!(message, "upstream down");
    }
    other => panic!("unexpected result {other:?}"),
  }
}

#[tokio::test]
async fn error_body_on_success_status_is_an_api_error() {
  let server = MockServer::start().await;
  mock_endpoint(
    &server,
    ResponseTemplate::new(200).set_body_json(json!({ "error": { "message": "blocked" } })),
  )
  .await;
  let client = client(Some("test-key"), &server.uri());

  assert!(matches!(
    client.try_replacement_meal(MealType::Lunch, "חיטוב", 90.0).await,
    Err(Error::Api { status: 200, message }) if message == "blocked"
  ));
}

#[tokio::test]
async fn no_candidates_is_an_empty_response() {
  let server = MockServer::start().await;
  mock_endpoint(&server, ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] }))).await;
  let client = client(Some("test-key"), &server.uri());

  assert!(matches!(
    client.try_generate_candidates("חיטוב", 90.0).await,
    Err(Error::EmptyResponse)
  ));
  assert_eq!(client.replacement_meal(MealType::Snack, "חיטוב", 90.0).await, None);
}
