use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{now_ts, StoreError, StoreResult};
use crate::model::ResourceLink;
use crate::schema::ResourceFields;

pub(super) const RESOURCE_COLUMNS: &str = "id, lesson_id, name, url, created_at";

pub(super) fn resource_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ResourceLink> {
    Ok(ResourceLink {
        id: row.get(0)?,
        lesson_id: row.get(1)?,
        name: row.get(2)?,
        url: row.get(3)?,
        created_at: row.get(4)?,
    })
}

pub(super) fn resources_for_lesson(conn: &Connection, lesson_id: &str) -> StoreResult<Vec<ResourceLink>> {
    let sql = format!(
        "SELECT {} FROM resource_links WHERE lesson_id = ? ORDER BY created_at ASC, rowid ASC",
        RESOURCE_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![lesson_id], resource_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn create_resource(conn: &Connection, fields: &ResourceFields) -> StoreResult<ResourceLink> {
    let lesson_exists = conn
        .query_row(
            "SELECT 1 FROM lessons WHERE id = ?",
            params![fields.lesson_id],
            |_r| Ok(()),
        )
        .optional()?
        .is_some();
    if !lesson_exists {
        return Err(StoreError::NotFound { entity: "lesson" });
    }

    let resource = ResourceLink {
        id: Uuid::new_v4().to_string(),
        lesson_id: fields.lesson_id.clone(),
        name: fields.name.clone(),
        url: fields.url.clone(),
        created_at: now_ts(),
    };
    conn.execute(
        "INSERT INTO resource_links(id, lesson_id, name, url, created_at) VALUES(?, ?, ?, ?, ?)",
        params![
            resource.id,
            resource.lesson_id,
            resource.name,
            resource.url,
            resource.created_at
        ],
    )?;
    Ok(resource)
}

pub fn delete_resource(conn: &Connection, resource_id: &str) -> StoreResult<()> {
    let changed = conn.execute(
        "DELETE FROM resource_links WHERE id = ?",
        params![resource_id],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound { entity: "resource" });
    }
    Ok(())
}
