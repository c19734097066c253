use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use time::{format_description::BorrowedFormatItem, macros::format_description, Date};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::booking::AvailabilityQuery;
use crate::db::{Appointment, BookingRequest};
use crate::error::AppError;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsPayload {
    pub agenda_id: Uuid,
    /// Calendar day in the business timezone, "YYYY-MM-DD".
    pub appointment_date: String,
    pub duration: Option<u16>,
    #[serde(default)]
    pub buffer: u16,
    pub service_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsResponse {
    pub slots_available: Vec<String>,
}

pub async fn available_slots(
    State(state): State<AppState>,
    Json(payload): Json<SlotsPayload>,
) -> Result<Json<SlotsResponse>, AppError> {
    let date = Date::parse(&payload.appointment_date, DATE_FORMAT).map_err(|_| {
        AppError::Validation(format!(
            "invalid appointmentDate {:?}, expected YYYY-MM-DD",
            payload.appointment_date
        ))
    })?;

    let query = AvailabilityQuery {
        agenda_id: payload.agenda_id,
        date,
        duration_minutes: payload.duration,
        buffer_minutes: payload.buffer,
        service_id: payload.service_id,
    };

    let slots = state.booking.available_slots(&query).await?;
    Ok(Json(SlotsResponse {
        slots_available: slots,
    }))
}

pub async fn create_appointment(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let appointment = state.booking.book(&request).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

pub async fn cancel_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = state.booking.cancel(id).await?;
    Ok(Json(appointment))
}

pub async fn complete_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = state.booking.complete(id).await?;
    Ok(Json(appointment))
}
