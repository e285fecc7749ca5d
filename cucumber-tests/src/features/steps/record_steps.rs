use crate::features::world::FormstoreWorld;
use cucumber::gherkin::Step;
use cucumber::{given, then};
use serde_json::Value;

/// Records from a list body, bare (`[...]`) or wrapped (`{"todos": [...]}`)
fn records_in(body: &Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items.clone(),
        other => other["todos"].as_array().cloned().unwrap_or_default(),
    }
}

/// Record from an item body, bare or wrapped in `{"todo": {...}}`
fn record_in(body: &Value) -> &Value {
    match body.get("todo") {
        Some(inner) => inner,
        None => body,
    }
}

#[given(expr = "a {word} record created with:")]
async fn given_record(world: &mut FormstoreWorld, step: &Step, variant: String) {
    let raw = step.docstring.as_deref().expect("step needs a JSON docstring");
    let body: Value = serde_json::from_str(raw).expect("docstring is not valid JSON");
    world
        .make_request("POST", &format!("/api/{}", variant), Some(body))
        .await
        .expect("create request failed");

    let resp = world.response();
    assert_eq!(resp.status, 201, "❌ create failed: {}", resp.body);
    let id = record_in(&resp.body)["id"].as_i64();
    assert!(id.is_some(), "❌ created record has no id: {}", resp.body);
    world.last_id = id;
}

#[then(expr = "the {word} list should contain {int} record(s)")]
async fn then_list_count(world: &mut FormstoreWorld, variant: String, count: usize) {
    world
        .make_request("GET", &format!("/api/{}", variant), None)
        .await
        .expect("list request failed");
    let resp = world.response();
    assert_eq!(resp.status, 200);
    assert_eq!(records_in(&resp.body).len(), count, "❌ list: {}", resp.body);
}

#[then(expr = "the response should list {int} record(s)")]
async fn then_response_count(world: &mut FormstoreWorld, count: usize) {
    let body = &world.response().body;
    assert_eq!(records_in(body).len(), count, "❌ list: {}", body);
}

#[then(expr = "the first listed record should have {string} equal to {string}")]
async fn then_first_record(world: &mut FormstoreWorld, field: String, expected: String) {
    let records = records_in(&world.response().body);
    let first = records.first().expect("list is empty");
    assert_eq!(first[field.as_str()].as_str(), Some(expected.as_str()), "❌ record: {}", first);
}

#[then(expr = "the returned record should have {string} equal to {string}")]
async fn then_returned_record(world: &mut FormstoreWorld, field: String, expected: String) {
    let record = record_in(&world.response().body);
    assert_eq!(record[field.as_str()].as_str(), Some(expected.as_str()), "❌ record: {}", record);
}

#[then(expr = "the field {string} should be flagged")]
async fn then_field_flagged(world: &mut FormstoreWorld, field: String) {
    let body = &world.response().body;
    assert!(body["fieldErrors"][field.as_str()].is_string(), "❌ {} not flagged: {}", field, body);
}
