//! HTTP API over a [`ContactStore`].
//!
//! Requires the `http` feature. Uses axum for routing and tower-http for
//! CORS, request tracing, panic recovery and static files.
//!
//! ## Routes
//!
//! - `GET /persons`: every contact.
//! - `GET /persons/:id`: one contact.
//! - `POST /persons`: create; 201 with the stored record.
//! - `PUT /persons/:id`: partial or full update.
//! - `DELETE /persons/:id`: 204.
//! - `GET /info`: HTML count and timestamp.
//!
//! With a static directory configured, every other route serves the frontend
//! bundle and falls back to its `index.html`. Without one, `GET /` answers
//! with a short banner and anything else is `404 {"error":"unknown endpoint"}`.
//! A known path called with the wrong method is
//! `405 {"error":"method not allowed"}`.
//!
//! ## Example
//!
//! ```ignore
//! use phonebook::{api, contact::open_store, config::StoreBackend};
//!
//! let store = open_store(&StoreBackend::Memory)?;
//! let app = api::router(store, None);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3001").await?;
//! axum::serve(listener, app).await?;
//! ```

mod error;
mod handlers;

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{header::CONTENT_TYPE, Method};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Config;
use crate::contact::ContactStore;

pub use error::ApiError;

/// Shared handler state. The store is opened once and reused by every request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContactStore>,
}

/// Build the application router.
pub fn router(store: Arc<dyn ContactStore>, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route(
            "/persons",
            get(handlers::list_persons)
                .post(handlers::create_person)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/persons/:id",
            get(handlers::get_person)
                .put(handlers::update_person)
                .delete(handlers::delete_person)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/info",
            get(handlers::info).fallback(handlers::method_not_allowed),
        );

    let app = match static_dir {
        Some(dir) => {
            let index = ServeFile::new(dir.join("index.html"));
            api.fallback_service(ServeDir::new(dir).fallback(index))
        }
        None => api
            .route("/", get(handlers::root))
            .fallback(handlers::unknown_endpoint),
    };

    app.layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(AppState { store })
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60))
}

/// Bind `0.0.0.0:<port>` and serve until Ctrl+C or SIGTERM.
pub async fn start_server(config: &Config, store: Arc<dyn ContactStore>) -> io::Result<()> {
    let app = router(store, config.static_dir.as_deref());

    let address = format!("0.0.0.0:{}", config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
