use crate::features::world::FormstoreWorld;
use cucumber::gherkin::Step;
use cucumber::{given, then, when};

/// Live server on an ephemeral port, with todo8, todo9 and todo10 mounted
#[given(expr = "a formstore server")]
async fn given_server(world: &mut FormstoreWorld) {
    world.start_server().await.expect("Failed to start server");
    println!("✅ Server started at {}", world.base_url.as_deref().unwrap_or("?"));
}

/// `{id}` in a path stands for the id of the last created record
fn expand(world: &FormstoreWorld, path: &str) -> String {
    match world.last_id {
        Some(id) => path.replace("{id}", &id.to_string()),
        None => path.to_string(),
    }
}

#[when(expr = "I send {word} to {string}")]
async fn when_send(world: &mut FormstoreWorld, method: String, path: String) {
    let path = expand(world, &path);
    world.make_request(&method, &path, None).await.expect("request failed");
}

#[when(expr = "I send {word} to {string} with body:")]
async fn when_send_with_body(world: &mut FormstoreWorld, step: &Step, method: String, path: String) {
    let raw = step.docstring.as_deref().expect("step needs a JSON docstring");
    let body: serde_json::Value = serde_json::from_str(raw).expect("docstring is not valid JSON");
    let path = expand(world, &path);
    world.make_request(&method, &path, Some(body)).await.expect("request failed");
}

#[then(expr = "the response status should be {int}")]
async fn then_status(world: &mut FormstoreWorld, status: u16) {
    let resp = world.response();
    assert_eq!(resp.status, status, "❌ unexpected status, body: {}", resp.body);
}

#[then(expr = "the Allow header should be {string}")]
async fn then_allow(world: &mut FormstoreWorld, allow: String) {
    assert_eq!(world.response().allow.as_deref(), Some(allow.as_str()));
}

#[then(expr = "the response field {string} should be {string}")]
async fn then_field(world: &mut FormstoreWorld, field: String, expected: String) {
    let body = &world.response().body;
    assert_eq!(body[field.as_str()].as_str(), Some(expected.as_str()), "❌ body: {}", body);
}
