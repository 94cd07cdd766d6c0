//! Client-side state for the lesson editor screen.
//!
//! [`LessonManager`] keeps the lesson list, the selected lesson and its
//! editable draft. Every mutation goes to the server through [`LessonApi`]
//! and is followed by a full reload of the list.

use std::fmt;
use std::path::Path;

use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::warn;

use crate::editor::EMPTY_DOCUMENT;
use crate::export::{self, EmailPayload, ExportLabels, HtmlDownload};
use crate::ipc::{self, AppState, Request};
use crate::model::{Lesson, ResourceLink};
use crate::schema::trim_input;

pub const NEW_LESSON_TITLE: &str = "Nueva clase";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{code}: {message}")]
    Server { code: String, message: String },
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Server operations the editor screen relies on.
pub trait LessonApi {
    fn list_lessons(&mut self) -> Result<Vec<Lesson>, ClientError>;
    fn create_lesson(&mut self, draft: &LessonDraft) -> Result<Lesson, ClientError>;
    fn update_lesson(&mut self, lesson_id: &str, draft: &LessonDraft) -> Result<Lesson, ClientError>;
    fn delete_lesson(&mut self, lesson_id: &str) -> Result<(), ClientError>;
    fn create_resource(
        &mut self,
        lesson_id: &str,
        name: &str,
        url: &str,
    ) -> Result<ResourceLink, ClientError>;
    fn delete_resource(&mut self, resource_id: &str) -> Result<(), ClientError>;
    fn export_labels(&mut self) -> Result<ExportLabels, ClientError>;
}

/// Drives the sidecar router in-process, speaking the same envelope as stdin/stdout.
pub struct LocalApi {
    state: AppState,
    next_id: u64,
}

impl LocalApi {
    pub fn new(state: AppState) -> Self {
        LocalApi { state, next_id: 0 }
    }

    pub fn open(workspace: &Path) -> anyhow::Result<Self> {
        let mut state = AppState::default();
        state.open_workspace(workspace)?;
        Ok(Self::new(state))
    }

    fn call(&mut self, method: &str, params: Value) -> Result<Value, ClientError> {
        self.next_id += 1;
        let req = Request {
            id: self.next_id.to_string(),
            method: method.to_string(),
            params,
        };
        let mut resp = ipc::handle_request(&mut self.state, req);
        if resp.get("ok").and_then(|v| v.as_bool()) == Some(true) {
            return Ok(resp["result"].take());
        }
        let error = &resp["error"];
        Err(ClientError::Server {
            code: error["code"].as_str().unwrap_or("unknown").to_string(),
            message: error["message"].as_str().unwrap_or_default().to_string(),
        })
    }

    fn call_field<T: DeserializeOwned>(
        &mut self,
        method: &str,
        params: Value,
        field: &str,
    ) -> Result<T, ClientError> {
        let mut result = self.call(method, params)?;
        Ok(serde_json::from_value(result[field].take())?)
    }
}

impl LessonApi for LocalApi {
    fn list_lessons(&mut self) -> Result<Vec<Lesson>, ClientError> {
        self.call_field("lessons.list", json!({}), "lessons")
    }

    fn create_lesson(&mut self, draft: &LessonDraft) -> Result<Lesson, ClientError> {
        self.call_field("lessons.create", json!({ "input": draft }), "lesson")
    }

    fn update_lesson(&mut self, lesson_id: &str, draft: &LessonDraft) -> Result<Lesson, ClientError> {
        self.call_field(
            "lessons.update",
            json!({ "lessonId": lesson_id, "input": draft }),
            "lesson",
        )
    }

    fn delete_lesson(&mut self, lesson_id: &str) -> Result<(), ClientError> {
        self.call("lessons.delete", json!({ "lessonId": lesson_id }))
            .map(|_| ())
    }

    fn create_resource(
        &mut self,
        lesson_id: &str,
        name: &str,
        url: &str,
    ) -> Result<ResourceLink, ClientError> {
        self.call_field(
            "resources.create",
            json!({ "input": { "lessonId": lesson_id, "name": name, "url": url } }),
            "resource",
        )
    }

    fn delete_resource(&mut self, resource_id: &str) -> Result<(), ClientError> {
        self.call("resources.delete", json!({ "resourceId": resource_id }))
            .map(|_| ())
    }

    fn export_labels(&mut self) -> Result<ExportLabels, ClientError> {
        self.call_field("setup.get", json!({}), "export")
    }
}

/// Where "copy email" puts its payload.
pub trait Clipboard {
    /// Whether text and HTML can be written as one rich item.
    fn supports_rich(&self) -> bool;
    fn write_rich(&mut self, text: &str, html: &str) -> anyhow::Result<()>;
    fn write_text(&mut self, text: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDraft {
    pub date: String,
    pub title: String,
    pub content_html: String,
}

impl LessonDraft {
    pub fn empty(today: NaiveDate) -> Self {
        LessonDraft {
            date: today.format("%Y-%m-%d").to_string(),
            title: String::new(),
            content_html: EMPTY_DOCUMENT.to_string(),
        }
    }
}

impl From<&Lesson> for LessonDraft {
    fn from(lesson: &Lesson) -> Self {
        LessonDraft {
            date: lesson.date.format("%Y-%m-%d").to_string(),
            title: lesson.title.clone(),
            content_html: lesson.content_html.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    LessonCreated,
    CreateFailed,
    DateAndTitleRequired,
    LessonSaved,
    SaveFailed,
    LessonDeleted,
    DeleteFailed,
    NameAndUrlRequired,
    CheckResourceUrl,
    ResourceAdded,
    ResourceRemoved,
    RemoveResourceFailed,
    EmailCopied,
    ClipboardFailed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Status::LessonCreated => "Clase creada.",
            Status::CreateFailed => "No se pudo crear la clase.",
            Status::DateAndTitleRequired => "Fecha y título son obligatorios.",
            Status::LessonSaved => "Clase guardada.",
            Status::SaveFailed => "No se pudo guardar.",
            Status::LessonDeleted => "Clase eliminada.",
            Status::DeleteFailed => "No se pudo eliminar.",
            Status::NameAndUrlRequired => "Nombre y URL son obligatorios.",
            Status::CheckResourceUrl => "Revisa la URL del recurso.",
            Status::ResourceAdded => "Recurso añadido.",
            Status::ResourceRemoved => "Recurso eliminado.",
            Status::RemoveResourceFailed => "No se pudo borrar el recurso.",
            Status::EmailCopied => "Email copiado al portapapeles.",
            Status::ClipboardFailed => "No se pudo copiar al portapapeles.",
        };
        f.write_str(msg)
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub struct LessonManager<A: LessonApi> {
    api: A,
    lessons: Vec<Lesson>,
    selected_id: Option<String>,
    draft: LessonDraft,
    pub resource_name: String,
    pub resource_url: String,
    status: Option<Status>,
}

impl<A: LessonApi> LessonManager<A> {
    pub fn new(api: A) -> Self {
        LessonManager {
            api,
            lessons: Vec::new(),
            selected_id: None,
            draft: LessonDraft::empty(today()),
            resource_name: String::new(),
            resource_url: String::new(),
            status: None,
        }
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn selected(&self) -> Option<&Lesson> {
        let id = self.selected_id.as_deref()?;
        self.lessons.iter().find(|l| l.id == id)
    }

    pub fn draft(&self) -> &LessonDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut LessonDraft {
        &mut self.draft
    }

    pub fn status(&self) -> Option<Status> {
        self.status
    }

    /// Makes `lesson_id` current and loads its fields into the draft.
    pub fn select(&mut self, lesson_id: &str) {
        self.selected_id = Some(lesson_id.to_string());
        if let Some(draft) = self.selected().map(LessonDraft::from) {
            self.draft = draft;
        }
    }

    pub fn load_lessons(&mut self) {
        let data = match self.api.list_lessons() {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "failed to load lessons");
                return;
            }
        };
        self.lessons = data;

        if let Some(current) = self.selected().map(LessonDraft::from) {
            self.draft = current;
        } else if let Some(first) = self.lessons.first() {
            self.selected_id = Some(first.id.clone());
            self.draft = LessonDraft::from(first);
        }
        if self.lessons.is_empty() {
            self.selected_id = None;
            self.draft = LessonDraft::empty(today());
        }
    }

    pub fn create_lesson(&mut self) {
        self.create_lesson_on(today());
    }

    pub fn create_lesson_on(&mut self, date: NaiveDate) {
        let draft = LessonDraft {
            title: NEW_LESSON_TITLE.to_string(),
            ..LessonDraft::empty(date)
        };
        let created = match self.api.create_lesson(&draft) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "failed to create lesson");
                self.status = Some(Status::CreateFailed);
                return;
            }
        };
        self.load_lessons();
        self.select(&created.id);
        self.status = Some(Status::LessonCreated);
    }

    pub fn save_lesson(&mut self) {
        let Some(lesson_id) = self.selected_id.clone() else {
            return;
        };
        if self.draft.date.is_empty() || trim_input(&self.draft.title).is_empty() {
            self.status = Some(Status::DateAndTitleRequired);
            return;
        }
        if let Err(e) = self.api.update_lesson(&lesson_id, &self.draft) {
            warn!(lesson_id = %lesson_id, error = %e, "failed to save lesson");
            self.status = Some(Status::SaveFailed);
            return;
        }
        self.status = Some(Status::LessonSaved);
        self.load_lessons();
    }

    /// Deletes the selected lesson once `confirm` agrees.
    pub fn delete_lesson(&mut self, confirm: impl FnOnce() -> bool) {
        let Some(lesson_id) = self.selected_id.clone() else {
            return;
        };
        if !confirm() {
            return;
        }
        if let Err(e) = self.api.delete_lesson(&lesson_id) {
            warn!(lesson_id = %lesson_id, error = %e, "failed to delete lesson");
            self.status = Some(Status::DeleteFailed);
            return;
        }
        self.status = Some(Status::LessonDeleted);
        self.load_lessons();
    }

    pub fn add_resource(&mut self) {
        let Some(lesson_id) = self.selected_id.clone() else {
            return;
        };
        if trim_input(&self.resource_name).is_empty() || trim_input(&self.resource_url).is_empty() {
            self.status = Some(Status::NameAndUrlRequired);
            return;
        }
        if let Err(e) = self
            .api
            .create_resource(&lesson_id, &self.resource_name, &self.resource_url)
        {
            warn!(lesson_id = %lesson_id, error = %e, "failed to add resource");
            self.status = Some(Status::CheckResourceUrl);
            return;
        }
        self.resource_name.clear();
        self.resource_url.clear();
        self.load_lessons();
        self.status = Some(Status::ResourceAdded);
    }

    pub fn remove_resource(&mut self, resource_id: &str) {
        if let Err(e) = self.api.delete_resource(resource_id) {
            warn!(resource_id, error = %e, "failed to remove resource");
            self.status = Some(Status::RemoveResourceFailed);
            return;
        }
        self.load_lessons();
        self.status = Some(Status::ResourceRemoved);
    }

    fn export_labels(&mut self) -> ExportLabels {
        self.api.export_labels().unwrap_or_else(|e| {
            warn!(error = %e, "falling back to default export labels");
            ExportLabels::default()
        })
    }

    pub fn email_payload(&mut self) -> Option<EmailPayload> {
        let labels = self.export_labels();
        self.selected().map(|l| export::email_payload(l, &labels))
    }

    pub fn copy_email(&mut self, clipboard: &mut dyn Clipboard) {
        let Some(payload) = self.email_payload() else {
            return;
        };
        let written = if clipboard.supports_rich() {
            clipboard.write_rich(&payload.text, &payload.html)
        } else {
            clipboard.write_text(&payload.fallback)
        };
        self.status = Some(match written {
            Ok(()) => Status::EmailCopied,
            Err(e) => {
                warn!(error = %e, "clipboard write failed");
                Status::ClipboardFailed
            }
        });
    }

    pub fn download_html(&mut self) -> Option<HtmlDownload> {
        let labels = self.export_labels();
        self.selected().map(|l| export::html_download(l, &labels))
    }
}
