//! REST surface over the same handlers the sidecar uses.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, Context};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use rusqlite::Connection;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{self, ApiError, ApiResult};
use crate::export::EmailPayload;
use crate::model::{Lesson, ResourceLink};
use crate::schema::FieldIssue;

#[derive(Clone)]
pub struct HttpState {
    db: Arc<Mutex<Connection>>,
}

impl HttpState {
    pub fn new(conn: Connection) -> Self {
        HttpState {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    fn conn(&self) -> ApiResult<MutexGuard<'_, Connection>> {
        self.db
            .lock()
            .map_err(|_| ApiError::Io(anyhow!("database lock poisoned")))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "http request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

fn json_body(body: &Bytes) -> ApiResult<Value> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::Invalid(vec![FieldIssue::new("body", e.to_string())]))
}

async fn list_lessons(State(state): State<HttpState>) -> ApiResult<Json<Vec<Lesson>>> {
    let conn = state.conn()?;
    Ok(Json(api::list_lessons(&conn)?))
}

async fn create_lesson(
    State(state): State<HttpState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Lesson>)> {
    let body = json_body(&body)?;
    let conn = state.conn()?;
    Ok((StatusCode::CREATED, Json(api::create_lesson(&conn, &body)?)))
}

async fn get_lesson(
    State(state): State<HttpState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Lesson>> {
    let conn = state.conn()?;
    Ok(Json(api::get_lesson(&conn, &id)?))
}

async fn update_lesson(
    State(state): State<HttpState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Lesson>> {
    let body = json_body(&body)?;
    let conn = state.conn()?;
    Ok(Json(api::update_lesson(&conn, &id, &body)?))
}

async fn delete_lesson(
    State(state): State<HttpState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let conn = state.conn()?;
    api::delete_lesson(&conn, &id)?;
    Ok(Json(json!({ "ok": true })))
}

async fn create_resource(
    State(state): State<HttpState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<ResourceLink>)> {
    let body = json_body(&body)?;
    let conn = state.conn()?;
    Ok((StatusCode::CREATED, Json(api::create_resource(&conn, &body)?)))
}

async fn delete_resource(
    State(state): State<HttpState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let conn = state.conn()?;
    api::delete_resource(&conn, &id)?;
    Ok(Json(json!({ "ok": true })))
}

async fn export_html(
    State(state): State<HttpState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let conn = state.conn()?;
    let download = api::export_html(&conn, &id)?;
    let disposition = format!("attachment; filename=\"{}\"", download.filename);
    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        download.html,
    )
        .into_response())
}

async fn export_email(
    State(state): State<HttpState>,
    Path(id): Path<String>,
) -> ApiResult<Json<EmailPayload>> {
    let conn = state.conn()?;
    Ok(Json(api::export_email(&conn, &id)?))
}

pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/api/lessons", get(list_lessons).post(create_lesson))
        .route(
            "/api/lessons/{id}",
            get(get_lesson).put(update_lesson).delete(delete_lesson),
        )
        .route("/api/lessons/{id}/export.html", get(export_html))
        .route("/api/lessons/{id}/email", get(export_email))
        .route("/api/resource-links", post(create_resource))
        .route("/api/resource-links/{id}", delete(delete_resource))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(conn: Connection, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(HttpState::new(conn));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(addr = %listener.local_addr()?, "http api listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
