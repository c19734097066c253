use sqlx::{PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::models::{Appointment, AppointmentStatus, BookingRequest};
use crate::db::DatabaseError;

pub struct AppointmentRepository;

impl AppointmentRepository {
    pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<Appointment>, DatabaseError> {
        let appointment = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(appointment)
    }

    /// Booked appointments starting inside `[from, to)`, ascending. Cancelled
    /// and completed rows never block availability, so they are filtered here.
    pub async fn booked_between(
        pool: &PgPool,
        agenda_id: Uuid,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<Appointment>, DatabaseError> {
        let appointments = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT * FROM appointments
            WHERE agenda_id = $1
              AND status = $2
              AND start_time >= $3
              AND start_time < $4
            ORDER BY start_time
            "#,
        )
        .bind(agenda_id)
        .bind(AppointmentStatus::Booked)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;

        Ok(appointments)
    }

    /// Inserts a booked appointment inside the caller's transaction. The
    /// appointments_no_overlap exclusion constraint settles concurrent inserts
    /// for overlapping intervals; the loser surfaces as
    /// `DatabaseError::Conflict`.
    pub async fn insert_booked(
        tx: &mut Transaction<'_, Postgres>,
        request: &BookingRequest,
        client_id: Uuid,
    ) -> Result<Appointment, DatabaseError> {
        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments
                (agenda_id, client_id, service_id, employee_id, start_time, end_time, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(request.agenda_id)
        .bind(client_id)
        .bind(request.service_id)
        .bind(request.employee_id)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(AppointmentStatus::Booked)
        .fetch_one(&mut **tx)
        .await?;

        Ok(appointment)
    }

    /// Moves a booked appointment into a terminal state. Returns None when no
    /// row was updated, i.e. the appointment is missing or already terminal;
    /// the caller decides which it was.
    pub async fn try_transition(
        pool: &PgPool,
        id: Uuid,
        next: AppointmentStatus,
    ) -> Result<Option<Appointment>, DatabaseError> {
        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments
            SET status = $2, updated_at = now()
            WHERE id = $1 AND status = $3
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(next)
        .bind(AppointmentStatus::Booked)
        .fetch_optional(pool)
        .await?;

        Ok(appointment)
    }
}
