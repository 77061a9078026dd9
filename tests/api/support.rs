//! Server bootstrap shared by the API tests.

use std::path::Path;
use std::sync::Arc;

use phonebook::{open_store, router, ContactStore, StoreBackend};

/// Bind to port 0 and return the base URL.
pub async fn start_server(store: Arc<dyn ContactStore>, static_dir: Option<&Path>) -> String {
    let app = router(store, static_dir);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Server over a fresh in-memory store. Returns the base URL and the store.
pub async fn spawn_app() -> (String, Arc<dyn ContactStore>) {
    let store = open_store(&StoreBackend::Memory).unwrap();
    let base = start_server(store.clone(), None).await;
    (base, store)
}
