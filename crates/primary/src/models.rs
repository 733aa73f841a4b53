//! Database models mapping to the primary schema.

use relink_core::{PrimaryResourceRecord, ResourceId};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Row of the `resources` table.
#[derive(Debug, Clone, FromRow)]
pub struct ResourceRow {
    pub id: ResourceId,
    pub title: String,
    pub resource_url: String,
    pub short_url: Option<String>,
    pub active: bool,
    pub is_primary: bool,
    pub updated_at: OffsetDateTime,
}

impl From<ResourceRow> for PrimaryResourceRecord {
    fn from(row: ResourceRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            resource_url: row.resource_url,
            short_url: row.short_url,
            active: row.active,
            primary: row.is_primary,
            updated_at: row.updated_at,
        }
    }
}
