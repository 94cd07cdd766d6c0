//! Row accessors for lessons and their resource links.

mod lessons;
mod resources;

use chrono::{SecondsFormat, Utc};
use thiserror::Error;

pub use lessons::{create_lesson, delete_lesson, get_lesson, list_lessons, update_lesson};
pub use resources::{create_resource, delete_resource};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

fn now_ts() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
