use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

/// A booking client, keyed by phone number. One row is shared by every
/// appointment booked with the same phone.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Client details carried on a booking request. Phone is the lookup key and
/// is immutable once a client exists; name and email are refreshed on every
/// booking.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClientDetails {
    #[validate(length(min = 1, message = "client name is required"))]
    pub name: String,
    #[validate(length(min = 5, message = "client phone is required"))]
    pub phone: String,
    #[validate(email(message = "client email is malformed"))]
    pub email: Option<String>,
}
