use serde::Serialize;
use sqlx::types::Uuid;
use time::OffsetDateTime;

/// A bookable service. Its duration feeds slot length when an availability
/// query names a service instead of an explicit duration.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub duration_minutes: i32,
    pub price_cents: i64,
    pub active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
