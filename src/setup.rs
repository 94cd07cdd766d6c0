//! Per-workspace setup sections stored in the settings table.

use rusqlite::Connection;
use serde_json::{json, Map, Value};

use crate::db;
use crate::export::ExportLabels;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetupSection {
    Export,
}

impl SetupSection {
    pub const ALL: [SetupSection; 1] = [SetupSection::Export];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "export" => Some(Self::Export),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Export => "export",
        }
    }

    fn key(self) -> &'static str {
        match self {
            Self::Export => "setup.export",
        }
    }
}

fn default_section(section: SetupSection) -> Value {
    match section {
        SetupSection::Export => {
            serde_json::to_value(ExportLabels::default()).unwrap_or_else(|_| json!({}))
        }
    }
}

fn parse_string_max(v: &Value, key: &str, max_len: usize) -> Result<String, String> {
    let s = v.as_str().ok_or_else(|| format!("{} must be string", key))?;
    let s = s.trim();
    if s.chars().count() > max_len {
        return Err(format!("{} length must be <= {}", key, max_len));
    }
    Ok(s.to_string())
}

fn parse_non_empty_max(v: &Value, key: &str, max_len: usize) -> Result<String, String> {
    let s = parse_string_max(v, key, max_len)?;
    if s.is_empty() {
        return Err(format!("{} must not be empty", key));
    }
    Ok(s)
}

pub fn merge_section_patch(
    section: SetupSection,
    current: &mut Value,
    patch: &Map<String, Value>,
) -> Result<(), String> {
    let obj = current
        .as_object_mut()
        .ok_or_else(|| "internal setup object must be a JSON object".to_string())?;
    for (k, v) in patch {
        match section {
            SetupSection::Export => match k.as_str() {
                "lang" => {
                    let lang = parse_non_empty_max(v, k, 16)?.to_ascii_lowercase();
                    if !lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                        return Err("lang must be a language tag like es or en-GB".into());
                    }
                    obj.insert(k.clone(), Value::String(lang));
                }
                "subjectPrefix" => {
                    obj.insert(k.clone(), Value::String(parse_string_max(v, k, 80)?));
                }
                "dateLabel" | "resourcesHeading" => {
                    obj.insert(k.clone(), Value::String(parse_non_empty_max(v, k, 40)?));
                }
                "noResources" => {
                    obj.insert(k.clone(), Value::String(parse_string_max(v, k, 120)?));
                }
                _ => return Err(format!("unknown export field: {}", k)),
            },
        }
    }
    Ok(())
}

pub fn load_section(conn: &Connection, section: SetupSection) -> anyhow::Result<Value> {
    let mut current = default_section(section);
    if let Some(saved) = db::settings_get_json(conn, section.key())? {
        if let Some(saved_obj) = saved.as_object() {
            // Malformed saved values fall back to defaults field by field.
            for (k, v) in saved_obj {
                let mut one = Map::new();
                one.insert(k.clone(), v.clone());
                let _ = merge_section_patch(section, &mut current, &one);
            }
        }
    }
    Ok(current)
}

pub fn update_section(
    conn: &Connection,
    section: SetupSection,
    patch: &Map<String, Value>,
) -> Result<Value, SetupError> {
    let mut current = load_section(conn, section).map_err(SetupError::Storage)?;
    merge_section_patch(section, &mut current, patch).map_err(SetupError::Invalid)?;
    db::settings_set_json(conn, section.key(), &current).map_err(SetupError::Storage)?;
    Ok(current)
}

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Storage(anyhow::Error),
}

pub fn load_export_labels(conn: &Connection) -> anyhow::Result<ExportLabels> {
    let section = load_section(conn, SetupSection::Export)?;
    Ok(serde_json::from_value(section)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_labels_default_then_patch() {
        let dir = tempfile::tempdir().expect("tempdir");
        let conn = db::open_db(dir.path()).expect("open db");
        assert_eq!(load_export_labels(&conn).expect("labels"), ExportLabels::default());

        let patch = json!({ "lang": "EN", "subjectPrefix": " Sunday AI ", "noResources": "" });
        update_section(&conn, SetupSection::Export, patch.as_object().expect("object"))
            .expect("update");
        let labels = load_export_labels(&conn).expect("labels");
        assert_eq!(labels.lang, "en");
        assert_eq!(labels.subject_prefix, "Sunday AI");
        assert_eq!(labels.no_resources, "");
        assert_eq!(labels.date_label, "Fecha");
    }

    #[test]
    fn rejects_unknown_and_empty_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let conn = db::open_db(dir.path()).expect("open db");
        let bad = json!({ "dateLabel": "  " });
        assert!(matches!(
            update_section(&conn, SetupSection::Export, bad.as_object().expect("object")),
            Err(SetupError::Invalid(_))
        ));
        let unknown = json!({ "fontScale": 100 });
        assert!(matches!(
            update_section(&conn, SetupSection::Export, unknown.as_object().expect("object")),
            Err(SetupError::Invalid(_))
        ));
    }
}
