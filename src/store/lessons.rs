use std::collections::HashMap;

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::resources::{resource_from_row, resources_for_lesson, RESOURCE_COLUMNS};
use super::{now_ts, StoreError, StoreResult};
use crate::model::{Lesson, ResourceLink};
use crate::schema::LessonFields;

const LESSON_COLUMNS: &str = "id, lesson_date, title, content_html, created_at, updated_at";

fn lesson_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Lesson> {
    Ok(Lesson {
        id: row.get(0)?,
        date: row.get(1)?,
        title: row.get(2)?,
        content_html: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
        resources: Vec::new(),
    })
}

/// All lessons, newest date first, each with its resources in insertion order.
pub fn list_lessons(conn: &Connection) -> StoreResult<Vec<Lesson>> {
    let mut by_lesson: HashMap<String, Vec<ResourceLink>> = HashMap::new();
    {
        let sql = format!(
            "SELECT {} FROM resource_links ORDER BY created_at ASC, rowid ASC",
            RESOURCE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], resource_from_row)?;
        for r in rows {
            let r = r?;
            by_lesson.entry(r.lesson_id.clone()).or_default().push(r);
        }
    }

    let sql = format!(
        "SELECT {} FROM lessons ORDER BY lesson_date DESC, created_at DESC, rowid DESC",
        LESSON_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut lessons = stmt
        .query_map([], lesson_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    for lesson in lessons.iter_mut() {
        lesson.resources = by_lesson.remove(&lesson.id).unwrap_or_default();
    }
    Ok(lessons)
}

pub fn get_lesson(conn: &Connection, lesson_id: &str) -> StoreResult<Lesson> {
    let sql = format!("SELECT {} FROM lessons WHERE id = ?", LESSON_COLUMNS);
    let lesson = conn
        .query_row(&sql, params![lesson_id], lesson_from_row)
        .optional()?;
    let Some(mut lesson) = lesson else {
        return Err(StoreError::NotFound { entity: "lesson" });
    };
    lesson.resources = resources_for_lesson(conn, lesson_id)?;
    Ok(lesson)
}

pub fn create_lesson(conn: &Connection, fields: &LessonFields) -> StoreResult<Lesson> {
    let lesson_id = Uuid::new_v4().to_string();
    let ts = now_ts();
    conn.execute(
        "INSERT INTO lessons(id, lesson_date, title, content_html, created_at, updated_at)
         VALUES(?, ?, ?, ?, ?, ?)",
        params![
            lesson_id,
            fields.date,
            fields.title,
            fields.content_html,
            ts,
            ts
        ],
    )?;
    Ok(Lesson {
        id: lesson_id,
        date: fields.date,
        title: fields.title.clone(),
        content_html: fields.content_html.clone(),
        created_at: ts.clone(),
        updated_at: ts,
        resources: Vec::new(),
    })
}

/// Replaces date, title and content of an existing lesson.
pub fn update_lesson(conn: &Connection, lesson_id: &str, fields: &LessonFields) -> StoreResult<Lesson> {
    let changed = conn.execute(
        "UPDATE lessons SET lesson_date = ?, title = ?, content_html = ?, updated_at = ?
         WHERE id = ?",
        params![
            fields.date,
            fields.title,
            fields.content_html,
            now_ts(),
            lesson_id
        ],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound { entity: "lesson" });
    }
    get_lesson(conn, lesson_id)
}

pub fn delete_lesson(conn: &Connection, lesson_id: &str) -> StoreResult<()> {
    // resource_links rows go with it through ON DELETE CASCADE.
    let changed = conn.execute("DELETE FROM lessons WHERE id = ?", params![lesson_id])?;
    if changed == 0 {
        return Err(StoreError::NotFound { entity: "lesson" });
    }
    Ok(())
}
