//! Serving a prebuilt frontend bundle next to the API.

use std::fs;

use phonebook::{open_store, StoreBackend};
use serde_json::{json, Value};

use crate::support::start_server;

#[tokio::test]
async fn bundle_is_served_with_index_fallback() {
    let dist = tempfile::tempdir().unwrap();
    fs::write(dist.path().join("index.html"), "<div id=\"root\"></div>").unwrap();
    fs::write(dist.path().join("app.js"), "console.log('phonebook')").unwrap();

    let store = open_store(&StoreBackend::Memory).unwrap();
    let base = start_server(store, Some(dist.path())).await;
    let client = reqwest::Client::new();

    let asset = client.get(format!("{base}/app.js")).send().await.unwrap();
    assert_eq!(asset.status(), 200);
    assert_eq!(asset.text().await.unwrap(), "console.log('phonebook')");

    for path in ["/", "/contacts/42"] {
        let page = client.get(format!("{base}{path}")).send().await.unwrap();
        assert_eq!(page.status(), 200, "{path}");
        assert_eq!(page.text().await.unwrap(), "<div id=\"root\"></div>");
    }

    // API routes still win over the bundle
    let listed: Value = client
        .get(format!("{base}/persons"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed, json!([]));
}
