//! Transport-independent request handlers: validate, call the store, map errors.
//!
//! Both the sidecar protocol and the HTTP surface go through these
//! functions, so the two agree on validation, status codes and logging.

use rusqlite::Connection;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::export::{self, EmailPayload, HtmlDownload};
use crate::model::{Lesson, ResourceLink};
use crate::schema::{self, FieldIssue, INVALID_DATA};
use crate::setup;
use crate::store::{self, StoreError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", INVALID_DATA)]
    Invalid(Vec<FieldIssue>),
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
    #[error("select a workspace first")]
    NoWorkspace,
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("{0:#}")]
    Io(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Invalid(_) => "bad_params",
            ApiError::NotFound { .. } => "not_found",
            ApiError::NoWorkspace => "no_workspace",
            ApiError::Database(_) => "db_query_failed",
            ApiError::Io(_) => "io_failed",
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            ApiError::Invalid(_) => 400,
            ApiError::NotFound { .. } => 404,
            ApiError::NoWorkspace => 409,
            ApiError::Database(_) | ApiError::Io(_) => 500,
        }
    }

    pub fn details(&self) -> Option<Value> {
        match self {
            ApiError::Invalid(issues) => Some(json!({ "issues": issues })),
            ApiError::NotFound { entity } => Some(json!({ "entity": entity })),
            _ => None,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { entity } => ApiError::NotFound { entity },
            StoreError::Sqlite(e) => ApiError::Database(e),
        }
    }
}

fn invalid(issues: Vec<FieldIssue>) -> ApiError {
    debug!(?issues, "rejected request body");
    ApiError::Invalid(issues)
}

pub fn list_lessons(conn: &Connection) -> ApiResult<Vec<Lesson>> {
    Ok(store::list_lessons(conn)?)
}

pub fn get_lesson(conn: &Connection, lesson_id: &str) -> ApiResult<Lesson> {
    Ok(store::get_lesson(conn, lesson_id)?)
}

pub fn create_lesson(conn: &Connection, body: &Value) -> ApiResult<Lesson> {
    let fields = schema::parse_lesson_body(body).map_err(invalid)?;
    let lesson = store::create_lesson(conn, &fields)?;
    info!(lesson_id = %lesson.id, date = %lesson.date, "lesson created");
    Ok(lesson)
}

pub fn update_lesson(conn: &Connection, lesson_id: &str, body: &Value) -> ApiResult<Lesson> {
    let fields = schema::parse_lesson_body(body).map_err(invalid)?;
    let lesson = store::update_lesson(conn, lesson_id, &fields)?;
    info!(lesson_id = %lesson.id, "lesson updated");
    Ok(lesson)
}

pub fn delete_lesson(conn: &Connection, lesson_id: &str) -> ApiResult<()> {
    store::delete_lesson(conn, lesson_id)?;
    info!(lesson_id, "lesson deleted");
    Ok(())
}

pub fn create_resource(conn: &Connection, body: &Value) -> ApiResult<ResourceLink> {
    let fields = schema::parse_resource_body(body).map_err(invalid)?;
    let resource = store::create_resource(conn, &fields)?;
    info!(resource_id = %resource.id, lesson_id = %resource.lesson_id, "resource link added");
    Ok(resource)
}

pub fn delete_resource(conn: &Connection, resource_id: &str) -> ApiResult<()> {
    store::delete_resource(conn, resource_id)?;
    info!(resource_id, "resource link deleted");
    Ok(())
}

pub fn export_html(conn: &Connection, lesson_id: &str) -> ApiResult<HtmlDownload> {
    let lesson = store::get_lesson(conn, lesson_id)?;
    let labels = setup::load_export_labels(conn)?;
    let download = export::html_download(&lesson, &labels);
    debug!(lesson_id, filename = %download.filename, "rendered html export");
    Ok(download)
}

pub fn export_email(conn: &Connection, lesson_id: &str) -> ApiResult<EmailPayload> {
    let lesson = store::get_lesson(conn, lesson_id)?;
    let labels = setup::load_export_labels(conn)?;
    Ok(export::email_payload(&lesson, &labels))
}
