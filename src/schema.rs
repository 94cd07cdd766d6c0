//! Request body schemas for lessons and resource links.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::editor;

/// Message shown for any schema violation.
pub const INVALID_DATA: &str = "Datos inválidos.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonFields {
    pub date: NaiveDate,
    pub title: String,
    pub content_html: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFields {
    pub lesson_id: String,
    pub name: String,
    pub url: String,
}

/// Trims whitespace and byte-order marks from both ends of form input.
pub fn trim_input(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Strict `YYYY-MM-DD` naming a real calendar day.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let b = s.as_bytes();
    if b.len() != 10 || b[4] != b'-' || b[7] != b'-' {
        return None;
    }
    let digits_ok = b
        .iter()
        .enumerate()
        .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn body_object<'a>(body: &'a Value) -> Result<&'a Map<String, Value>, Vec<FieldIssue>> {
    body.as_object()
        .ok_or_else(|| vec![FieldIssue::new("body", "must be a JSON object")])
}

fn required_string<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
    issues: &mut Vec<FieldIssue>,
) -> Option<&'a str> {
    match obj.get(field) {
        None => {
            issues.push(FieldIssue::new(field, "is required"));
            None
        }
        Some(v) => match v.as_str() {
            Some(s) => Some(s),
            None => {
                issues.push(FieldIssue::new(field, "must be string"));
                None
            }
        },
    }
}

fn trimmed_non_empty(
    obj: &Map<String, Value>,
    field: &'static str,
    issues: &mut Vec<FieldIssue>,
) -> Option<String> {
    let s = trim_input(required_string(obj, field, issues)?);
    if s.is_empty() {
        issues.push(FieldIssue::new(field, "must not be empty"));
        return None;
    }
    Some(s.to_string())
}

/// Body of a lesson create or update. Both share one schema.
pub fn parse_lesson_body(body: &Value) -> Result<LessonFields, Vec<FieldIssue>> {
    let obj = body_object(body)?;
    let mut issues = Vec::new();

    let date = required_string(obj, "date", &mut issues).and_then(|s| {
        let parsed = parse_iso_date(s);
        if parsed.is_none() {
            issues.push(FieldIssue::new("date", "must be a YYYY-MM-DD date"));
        }
        parsed
    });
    let title = trimmed_non_empty(obj, "title", &mut issues);
    let content_html = match obj.get("contentHtml") {
        None => Some(editor::EMPTY_DOCUMENT.to_string()),
        Some(v) => match v.as_str() {
            Some(s) => Some(editor::normalize_content(s)),
            None => {
                issues.push(FieldIssue::new("contentHtml", "must be string"));
                None
            }
        },
    };

    match (date, title, content_html) {
        (Some(date), Some(title), Some(content_html)) if issues.is_empty() => Ok(LessonFields {
            date,
            title,
            content_html,
        }),
        _ => Err(issues),
    }
}

pub fn parse_resource_body(body: &Value) -> Result<ResourceFields, Vec<FieldIssue>> {
    let obj = body_object(body)?;
    let mut issues = Vec::new();

    let lesson_id = required_string(obj, "lessonId", &mut issues).and_then(|s| {
        if s.is_empty() {
            issues.push(FieldIssue::new("lessonId", "must not be empty"));
            return None;
        }
        Some(s.to_string())
    });
    let name = trimmed_non_empty(obj, "name", &mut issues);
    let url = required_string(obj, "url", &mut issues).and_then(|s| {
        let s = trim_input(s);
        match url::Url::parse(s) {
            Ok(_) => Some(s.to_string()),
            Err(e) => {
                issues.push(FieldIssue::new("url", format!("invalid url: {}", e)));
                None
            }
        }
    });

    match (lesson_id, name, url) {
        (Some(lesson_id), Some(name), Some(url)) if issues.is_empty() => Ok(ResourceFields {
            lesson_id,
            name,
            url,
        }),
        _ => Err(issues),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn iso_dates_are_strict() {
        assert!(parse_iso_date("2026-02-28").is_some());
        assert!(parse_iso_date("2026-02-30").is_none());
        assert!(parse_iso_date("2026-2-3").is_none());
        assert!(parse_iso_date("2026-02-03T00:00:00Z").is_none());
        assert!(parse_iso_date("+2026-0203").is_none());
    }

    #[test]
    fn lesson_body_trims_title_and_defaults_content() {
        let fields = parse_lesson_body(&json!({ "date": "2026-03-01", "title": "  Redes  " }))
            .expect("valid body");
        assert_eq!(fields.title, "Redes");
        assert_eq!(fields.content_html, "<p></p>");
        assert_eq!(fields.date, NaiveDate::from_ymd_opt(2026, 3, 1).expect("date"));
    }

    #[test]
    fn lesson_body_reports_every_issue() {
        let issues = parse_lesson_body(&json!({ "date": "01/03/2026", "title": "   ", "contentHtml": 3 }))
            .expect_err("invalid body");
        let fields: Vec<_> = issues.iter().map(|i| i.field).collect();
        assert_eq!(fields, vec!["date", "title", "contentHtml"]);

        let issues = parse_lesson_body(&json!(["not", "an", "object"])).expect_err("invalid body");
        assert_eq!(issues[0].field, "body");
    }

    #[test]
    fn byte_order_marks_count_as_blank() {
        let issues = parse_lesson_body(&json!({ "date": "2026-03-01", "title": "\u{FEFF} " }))
            .expect_err("blank title");
        assert_eq!(issues[0].field, "title");

        let ok = parse_resource_body(&json!({
            "lessonId": "abc",
            "name": "\u{FEFF}Slides\u{FEFF}",
            "url": "\u{FEFF}https://example.com/deck"
        }))
        .expect("valid body");
        assert_eq!(ok.name, "Slides");
        assert_eq!(ok.url, "https://example.com/deck");
    }

    #[test]
    fn resource_body_requires_absolute_url() {
        let ok = parse_resource_body(&json!({
            "lessonId": "abc",
            "name": " Slides ",
            "url": " https://example.com/deck "
        }))
        .expect("valid body");
        assert_eq!(ok.name, "Slides");
        assert_eq!(ok.url, "https://example.com/deck");

        let issues = parse_resource_body(&json!({ "lessonId": "", "name": "x", "url": "example.com" }))
            .expect_err("invalid body");
        let fields: Vec<_> = issues.iter().map(|i| i.field).collect();
        assert_eq!(fields, vec!["lessonId", "url"]);
    }
}
