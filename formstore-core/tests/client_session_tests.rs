//! End-to-end tests: RecordClient and FormSession against a live server
//!
//! Each test binds its own server on 127.0.0.1:0 with a fresh database.

use formstore_core::client::{ClientError, FormMode, FormSession, RecordClient, SubmitError};
use formstore_core::config::FormstoreConfig;
use formstore_core::form::{DraftState, RawInput};
use formstore_core::schema::{variants, FieldValue, RecordSchema, Values};
use formstore_core::FormstoreServerBuilder;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;

struct TestServer {
    base_url: String,
    _dir: TempDir,
}

async fn start_server() -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let mut config = FormstoreConfig::default();
    config.storage.database = dir.path().join("formstore.db").to_string_lossy().into_owned();

    let server = FormstoreServerBuilder::with_config(config).build().await.unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server.serve_with_listener(listener));

    TestServer { base_url: format!("http://{}", addr), _dir: dir }
}

fn client(server: &TestServer, schema: RecordSchema) -> RecordClient {
    RecordClient::new(&server.base_url, Arc::new(schema))
}

fn values(schema: &RecordSchema, pairs: &[(&str, FieldValue)]) -> Values {
    let mut values = schema.defaults();
    for (name, value) in pairs {
        values.insert(name.to_string(), value.clone());
    }
    values
}

#[tokio::test]
async fn client_crud_round_trip_todo9() {
    let server = start_server().await;
    let schema = variants::todo9().unwrap();
    let client = client(&server, schema.clone());

    let payload = values(&schema, &[("title", "A".into()), ("content", "B".into()), ("foodApple", true.into())]);
    let created = client.create(&payload).await.unwrap();
    assert_eq!(created.values, payload);

    let listed = client.list(None).await.unwrap();
    assert_eq!(listed, vec![created.clone()]);
    assert_eq!(client.get(created.id).await.unwrap(), created);

    let changed = values(&schema, &[("title", "A2".into()), ("content", "B".into())]);
    let updated = client.update(created.id, &changed).await.unwrap();
    assert_eq!(updated.text("title"), "A2");
    assert!(!updated.flag("foodApple"));

    client.delete(created.id).await.unwrap();
    assert!(matches!(client.get(created.id).await, Err(ClientError::NotFound(_))));
    assert!(matches!(client.delete(created.id).await, Err(ClientError::NotFound(_))));
}

#[tokio::test]
async fn client_maps_validation_errors() {
    let server = start_server().await;
    let schema = variants::todo10().unwrap();
    let client = client(&server, schema.clone());

    let payload = values(&schema, &[("date_publish", "31/12/2024".into())]);
    match client.create(&payload).await {
        Err(ClientError::Validation(errors)) => {
            assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["content", "title"]);
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(client.list(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn client_filters_with_variant_search_param() {
    let server = start_server().await;
    let schema = variants::todo10().unwrap();
    let client = client(&server, schema.clone());

    for (title, content) in [("buy milk", "x"), ("walk", "around the lake"), ("50% off", "sale & more")] {
        client.create(&values(&schema, &[("title", title.into()), ("content", content.into())])).await.unwrap();
    }

    let lake = client.list(Some("lake")).await.unwrap();
    assert_eq!(lake.len(), 1);
    assert_eq!(lake[0].text("title"), "walk");

    let sale = client.list(Some("& more")).await.unwrap();
    assert_eq!(sale.len(), 1);

    let all = client.list(None).await.unwrap();
    assert_eq!(all.iter().map(|r| r.text("title")).collect::<Vec<_>>(), vec!["50% off", "walk", "buy milk"]);
}

#[tokio::test]
async fn session_create_edit_delete_cycle() {
    let server = start_server().await;
    let mut session = FormSession::new(client(&server, variants::todo8().unwrap()));

    session.open_create();
    assert!(session.is_dialog_open());
    session.set_field("title", RawInput::text("Write report")).unwrap();
    session.set_field("status", RawInput::select("pending")).unwrap();
    let created = session.submit().await.unwrap();

    assert!(!session.is_dialog_open());
    assert_eq!(session.draft().state(), DraftState::Empty);
    assert_eq!(session.records().len(), 1);
    assert_eq!(session.records()[0].text("status"), "pending");

    session.open_edit(&created);
    assert_eq!(session.mode(), FormMode::Edit(created.id));
    assert_eq!(session.draft().value("title"), Some(&FieldValue::from("Write report")));
    session.set_field("status", RawInput::select("completed")).unwrap();
    let updated = session.submit().await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(session.records()[0].text("status"), "completed");

    assert!(!session.delete(created.id, |_| false).await.unwrap());
    assert_eq!(session.records().len(), 1);
    assert!(session.delete(created.id, |id| id == created.id).await.unwrap());
    assert!(session.records().is_empty());
}

#[tokio::test]
async fn session_filter_survives_submit_refresh() {
    let server = start_server().await;
    let schema = variants::todo10().unwrap();
    let seed = client(&server, schema.clone());
    for (title, content) in [("buy milk", "x"), ("walk", "around the lake")] {
        seed.create(&values(&schema, &[("title", title.into()), ("content", content.into())])).await.unwrap();
    }

    let mut session = FormSession::new(client(&server, schema));
    session.set_filter(Some("milk".to_string()));
    assert!(session.refresh().await);
    assert_eq!(session.records().iter().map(|r| r.text("title")).collect::<Vec<_>>(), vec!["buy milk"]);

    session.open_create();
    session.set_field("title", RawInput::text("oat milk")).unwrap();
    session.set_field("content", RawInput::textarea("carton")).unwrap();
    session.set_field("date_publish", RawInput::date("2024/01/05")).unwrap();
    session.submit().await.unwrap();

    // the refresh after submit still applies the filter
    assert_eq!(session.filter(), Some("milk"));
    assert_eq!(session.records().iter().map(|r| r.text("title")).collect::<Vec<_>>(), vec!["oat milk", "buy milk"]);

    session.set_filter(Some(String::new()));
    assert_eq!(session.filter(), None);
    assert!(session.refresh().await);
    assert_eq!(session.records().len(), 3);
}

#[tokio::test]
async fn session_keeps_draft_on_local_validation_failure() {
    let server = start_server().await;
    let mut session = FormSession::new(client(&server, variants::todo9().unwrap()));

    session.open_create();
    session.set_field("content", RawInput::textarea("body")).unwrap();
    match session.submit().await {
        Err(SubmitError::Invalid(errors)) => assert!(errors.contains_key("title")),
        other => panic!("expected local validation failure, got {:?}", other.map(|r| r.id)),
    }
    assert!(session.is_dialog_open());
    assert_eq!(session.draft().value("content"), Some(&FieldValue::from("body")));
    assert!(session.draft().errors().contains_key("title"));
}

#[tokio::test]
async fn session_survives_unreachable_server() {
    // bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = RecordClient::new(format!("http://{}", addr), Arc::new(variants::todo9().unwrap()));
    let mut session = FormSession::new(client);

    assert!(!session.refresh().await);
    assert!(session.last_error().is_some());
    assert!(session.records().is_empty());

    session.open_create();
    session.set_field("title", RawInput::text("t")).unwrap();
    session.set_field("content", RawInput::text("c")).unwrap();
    assert!(matches!(session.submit().await, Err(SubmitError::Client(ClientError::Transport(_)))));

    assert_eq!(session.draft().state(), DraftState::Failed);
    assert!(session.draft().failure().is_some());
    assert_eq!(session.draft().value("title"), Some(&FieldValue::from("t")));
    assert!(session.is_dialog_open());
}
