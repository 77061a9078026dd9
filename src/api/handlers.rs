//! Route handlers. Each one runs a single store operation and lets
//! [`ApiError`] shape any failure.
//!
//! Store calls are synchronous and may touch the disk, so they run on the
//! blocking pool through [`with_store`].

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::Html;
use axum::Json;
use chrono::Utc;
use tracing::debug;

use super::error::ApiError;
use super::AppState;
use crate::contact::{
    validate_new, validate_patch, Contact, ContactError, ContactPayload, ContactStore,
};

async fn with_store<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&dyn ContactStore) -> Result<T, ContactError> + Send + 'static,
    T: Send + 'static,
{
    let store = state.store.clone();
    let result = tokio::task::spawn_blocking(move || op(store.as_ref())).await?;
    Ok(result?)
}

/// `GET /persons`
pub(super) async fn list_persons(
    State(state): State<AppState>,
) -> Result<Json<Vec<Contact>>, ApiError> {
    let contacts = with_store(&state, |store| store.list()).await?;
    debug!(count = contacts.len(), "Listing contacts");
    Ok(Json(contacts))
}

/// `GET /persons/:id`
pub(super) async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Contact>, ApiError> {
    Ok(Json(with_store(&state, move |store| store.get_by_id(&id)).await?))
}

/// `POST /persons`: 201 with the stored record.
pub(super) async fn create_person(
    State(state): State<AppState>,
    payload: Result<Json<ContactPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    let Json(payload) = payload?;
    let contact = validate_new(&payload)?;
    let created = with_store(&state, move |store| store.create(contact)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /persons/:id`: fields left out of the body keep their value.
pub(super) async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ContactPayload>, JsonRejection>,
) -> Result<Json<Contact>, ApiError> {
    let Json(payload) = payload?;
    let patch = validate_patch(&payload)?;
    let updated = with_store(&state, move |store| store.update_by_id(&id, patch)).await?;
    Ok(Json(updated))
}

/// `DELETE /persons/:id`: 204, empty body.
pub(super) async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    with_store(&state, move |store| store.delete_by_id(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /info`
pub(super) async fn info(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let count = with_store(&state, |store| store.count()).await?;
    Ok(Html(format!(
        "<p>Phonebook has info for {} people</p>\n<p>{}</p>",
        count,
        Utc::now().to_rfc2822()
    )))
}

/// `GET /` when no frontend bundle is served.
pub(super) async fn root() -> Html<&'static str> {
    Html("<h1>Phonebook API is running</h1><p>Use <code>/persons</code> to get data</p>")
}

pub(super) async fn unknown_endpoint(uri: Uri) -> ApiError {
    debug!(%uri, "No route matched");
    ApiError::UnknownEndpoint
}

pub(super) async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    debug!(%method, %uri, "Method not allowed");
    ApiError::MethodNotAllowed
}
