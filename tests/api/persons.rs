//! CRUD round trips over `/persons`.

use phonebook::{open_store, StoreBackend};
use serde_json::{json, Value};

use crate::support::{spawn_app, start_server};

#[tokio::test]
async fn ada_lovelace_lifecycle() {
    let (base, _) = spawn_app().await;
    let client = reqwest::Client::new();

    // Create
    let resp = client
        .post(format!("{base}/persons"))
        .json(&json!({ "name": "Ada Lovelace", "number": "12345" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(
        created,
        json!({ "id": id, "name": "Ada Lovelace", "number": "12345" })
    );

    // List
    let resp = client.get(format!("{base}/persons")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let listed: Value = resp.json().await.unwrap();
    assert_eq!(listed, json!([created]));

    // Update
    let resp = client
        .put(format!("{base}/persons/{id}"))
        .json(&json!({ "name": "Ada Lovelace", "number": "99999" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(
        updated,
        json!({ "id": id, "name": "Ada Lovelace", "number": "99999" })
    );

    // Delete
    let resp = client
        .delete(format!("{base}/persons/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);
    assert!(resp.text().await.unwrap().is_empty());

    // Gone
    let resp = client
        .get(format!("{base}/persons/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn post_then_get_by_returned_id() {
    let (base, _) = spawn_app().await;
    let client = reqwest::Client::new();

    for (name, number) in [("Grace Hopper", "040-123"), ("Alan Turing", "0"), ("Émilie", "1 2 3")] {
        let created: Value = client
            .post(format!("{base}/persons"))
            .json(&json!({ "name": name, "number": number }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap();

        let resp = client
            .get(format!("{base}/persons/{id}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let fetched: Value = resp.json().await.unwrap();
        assert_eq!(fetched["name"], name);
        assert_eq!(fetched["number"], number);
    }
}

#[tokio::test]
async fn missing_field_is_rejected_without_store_change() {
    let (base, store) = spawn_app().await;
    let client = reqwest::Client::new();

    for body in [
        json!({ "number": "12345" }),
        json!({ "name": "Ada Lovelace" }),
        json!({ "name": "", "number": "12345" }),
        json!({}),
    ] {
        let resp = client
            .post(format!("{base}/persons"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);

        let error: Value = resp.json().await.unwrap();
        assert_eq!(error, json!({ "error": "name or number missing" }));
    }

    assert_eq!(store.count().unwrap(), 0);
}

#[tokio::test]
async fn client_supplied_id_is_ignored() {
    let (base, _) = spawn_app().await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{base}/persons"))
        .json(&json!({ "id": 424242, "name": "Ada", "number": "1" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_ne!(created["id"], json!(424242));
    assert!(created["id"].is_string());
}

#[tokio::test]
async fn put_unknown_id_is_404_and_creates_nothing() {
    let (base, store) = spawn_app().await;
    let client = reqwest::Client::new();

    let resp = client
        .put(format!("{base}/persons/6b1f1c2e-1d5a-4c8e-9a7e-2f0d3b4c5a6e"))
        .json(&json!({ "name": "Ada", "number": "1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(store.count().unwrap(), 0);
}

#[tokio::test]
async fn put_with_partial_body_keeps_other_field() {
    let (base, _) = spawn_app().await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{base}/persons"))
        .json(&json!({ "name": "Ada", "number": "1" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap();

    let updated: Value = client
        .put(format!("{base}/persons/{id}"))
        .json(&json!({ "number": "2" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated, json!({ "id": id, "name": "Ada", "number": "2" }));
}

#[tokio::test]
async fn repeated_delete_is_404() {
    let (base, _) = spawn_app().await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{base}/persons"))
        .json(&json!({ "name": "Ada", "number": "1" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap();

    let first = client
        .delete(format!("{base}/persons/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), 204);

    let second = client
        .delete(format!("{base}/persons/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), 404);
    let error: Value = second.json().await.unwrap();
    assert_eq!(error, json!({ "error": "person not found" }));
}

#[tokio::test]
async fn duplicate_name_keeps_first_record() {
    let (base, _) = spawn_app().await;
    let client = reqwest::Client::new();

    let first = client
        .post(format!("{base}/persons"))
        .json(&json!({ "name": "Ada", "number": "1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), 201);

    let second = client
        .post(format!("{base}/persons"))
        .json(&json!({ "name": "Ada", "number": "2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), 400);
    let error: Value = second.json().await.unwrap();
    assert_eq!(error, json!({ "error": "name must be unique" }));

    let listed: Value = client
        .get(format!("{base}/persons"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["number"], "1");
}

#[tokio::test]
async fn info_reports_count() {
    let (base, _) = spawn_app().await;
    let client = reqwest::Client::new();

    for (name, number) in [("Ada", "1"), ("Grace", "2")] {
        client
            .post(format!("{base}/persons"))
            .json(&json!({ "name": name, "number": number }))
            .send()
            .await
            .unwrap();
    }

    let resp = client.get(format!("{base}/info")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Phonebook has info for 2 people"));
}

#[tokio::test]
async fn concurrent_creates_against_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let backend = StoreBackend::File(dir.path().join("phonebook.json"));
    let base = start_server(open_store(&backend).unwrap(), None).await;
    let client = reqwest::Client::new();

    let mut tasks = Vec::new();
    for i in 0..16 {
        let client = client.clone();
        let url = format!("{base}/persons");
        tasks.push(tokio::spawn(async move {
            client
                .post(url)
                .json(&json!({ "name": format!("Contact {i}"), "number": i.to_string() }))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap(), 201);
    }

    let listed: Value = client
        .get(format!("{base}/persons"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 16);

    let reopened = open_store(&backend).unwrap();
    assert_eq!(reopened.count().unwrap(), 16);
}
