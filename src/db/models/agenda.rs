use serde::Serialize;
use sqlx::types::Uuid;
use time::OffsetDateTime;

/// An agenda joined with its owning business's timezone. The engine only
/// reads agendas; creating and editing them belongs to the CRUD layer.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Agenda {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    /// IANA timezone of the owning business; None falls back to the
    /// configured default.
    pub timezone: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// One open interval of an agenda's weekly hours as stored. A weekday with no
/// rows is closed.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AgendaHoursRow {
    pub weekday: i16,
    pub start_minute: i16,
    pub end_minute: i16,
}
