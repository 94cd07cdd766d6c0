use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Lesson;
use crate::schema::parse_iso_date;

const RULE: &str =
    r#"<hr style="margin: 1.5rem 0; border: none; border-top: 1px solid #e2e8f0;" />"#;

/// Wording used in exported documents and emails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportLabels {
    pub lang: String,
    pub subject_prefix: String,
    pub date_label: String,
    pub resources_heading: String,
    pub no_resources: String,
}

impl Default for ExportLabels {
    fn default() -> Self {
        ExportLabels {
            lang: "es".into(),
            subject_prefix: "Domingos IA".into(),
            date_label: "Fecha".into(),
            resources_heading: "Recursos".into(),
            no_resources: "Sin recursos.".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlDownload {
    pub filename: String,
    pub html: String,
}

/// Clipboard content for pasting a lesson into an email client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailPayload {
    pub subject: String,
    pub html: String,
    pub text: String,
    /// Plain-text clipboard content where rich clipboard items are unavailable.
    pub fallback: String,
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// UTC calendar day of an RFC 3339 timestamp, or a bare `YYYY-MM-DD`.
pub fn to_date_input_value(iso: &str) -> Option<NaiveDate> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(iso) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }
    parse_iso_date(iso)
}

fn ymd(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn download_filename(lesson: &Lesson) -> String {
    let mut slug = String::new();
    let mut in_gap = false;
    for c in lesson.title.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
            in_gap = false;
        } else if !in_gap {
            slug.push('-');
            in_gap = true;
        }
    }
    format!("{}-{}.html", ymd(lesson.date), slug)
}

pub fn lesson_document(lesson: &Lesson, labels: &ExportLabels) -> String {
    let title = escape_html(&lesson.title);
    let resources_section = if lesson.resources.is_empty() {
        format!("<p><em>{}</em></p>", escape_html(&labels.no_resources))
    } else {
        let items: String = lesson
            .resources
            .iter()
            .map(|r| {
                format!(
                    "<li><a href=\"{}\">{}</a> — {}</li>",
                    escape_html(&r.url),
                    escape_html(&r.name),
                    escape_html(&r.url)
                )
            })
            .collect();
        format!(
            "<h2>{}</h2><ul>{}</ul>",
            escape_html(&labels.resources_heading),
            items
        )
    };

    format!(
        r#"<!doctype html>
<html lang="{lang}">
<head>
<meta charset="UTF-8" />
<meta name="viewport" content="width=device-width, initial-scale=1.0" />
<title>{title}</title>
</head>
<body style="font-family: Arial, sans-serif; max-width: 840px; margin: 2rem auto; line-height: 1.6; color: #0f172a; padding: 0 1rem;">
  <h1 style="margin-bottom: 0.25rem;">{title}</h1>
  <p style="margin-top:0; color:#475569;"><strong>{date_label}:</strong> {date}</p>
  {rule}
  {content}
  {rule}
  {resources}
</body>
</html>"#,
        lang = escape_html(&labels.lang),
        title = title,
        date_label = escape_html(&labels.date_label),
        date = ymd(lesson.date),
        rule = RULE,
        content = lesson.content_html,
        resources = resources_section,
    )
}

pub fn html_download(lesson: &Lesson, labels: &ExportLabels) -> HtmlDownload {
    HtmlDownload {
        filename: download_filename(lesson),
        html: lesson_document(lesson, labels),
    }
}

pub fn email_payload(lesson: &Lesson, labels: &ExportLabels) -> EmailPayload {
    let subject = format!(
        "{}: {} - {}",
        labels.subject_prefix,
        ymd(lesson.date),
        lesson.title
    );

    let resources_html = if lesson.resources.is_empty() {
        String::new()
    } else {
        let items: String = lesson
            .resources
            .iter()
            .map(|r| {
                format!(
                    "<li><a href=\"{}\">{}</a></li>",
                    escape_html(&r.url),
                    escape_html(&r.name)
                )
            })
            .collect();
        format!(
            "<h3>{}</h3><ul>{}</ul>",
            escape_html(&labels.resources_heading),
            items
        )
    };
    let html = format!(
        "<h2>{}</h2>{}{}",
        escape_html(&lesson.title),
        lesson.content_html,
        resources_html
    );

    let links: Vec<String> = lesson
        .resources
        .iter()
        .map(|r| format!("{}: {}", r.name, r.url))
        .collect();
    let text = format!("{}\n\n{}", subject, links.join("\n"));
    let fallback = format!("{}\n\n{}", subject, html);

    EmailPayload {
        subject,
        html,
        text,
        fallback,
    }
}
