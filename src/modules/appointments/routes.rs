use axum::{
    routing::{patch, post},
    Router,
};

use super::handlers::{
    available_slots, cancel_appointment, complete_appointment, create_appointment,
};
use crate::app_state::AppState;

pub fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route("/slots", post(available_slots))
        .route("/", post(create_appointment))
        .route("/{id}/status/cancel", patch(cancel_appointment))
        .route("/{id}/status/complete", patch(complete_appointment))
}
