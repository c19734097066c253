use chrono_tz::Tz;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;
use validator::Validate;

use crate::db::repositories::{
    AgendaRepository, AppointmentRepository, ClientRepository, ServiceRepository,
};
use crate::db::{Agenda, Appointment, AppointmentStatus, BookingRequest, DatabaseError};
use crate::error::AppError;
use crate::scheduling::clock::{
    format_clock_time, local_date, local_day_bounds, resolve_timezone, wall_clock_minutes,
    weekday_index, MINUTES_PER_DAY,
};
use crate::scheduling::{compute_slots, BusyInterval, HourRange, WeeklySchedule};

/// An availability query for one agenda and calendar day. Slot length is an
/// explicit duration or derived from a service; buffer is extra minutes held
/// after the service before the next slot may start.
#[derive(Debug, Clone)]
pub struct AvailabilityQuery {
    pub agenda_id: Uuid,
    pub date: Date,
    pub duration_minutes: Option<u16>,
    pub buffer_minutes: u16,
    pub service_id: Option<Uuid>,
}

/// The availability and booking engine. Holds the storage handle explicitly;
/// handlers receive it through application state, never through a global.
///
/// Availability is always re-derived from live appointment rows, but the
/// no-double-booking guarantee itself lives in the appointments exclusion
/// constraint: concurrent requests may both pass the in-process check and the
/// storage layer then serializes them.
#[derive(Clone)]
pub struct BookingService {
    pool: PgPool,
    default_timezone: Tz,
}

impl BookingService {
    pub fn new(pool: PgPool, default_timezone: Tz) -> Self {
        Self {
            pool,
            default_timezone,
        }
    }

    /// Ordered "HH:MM" start times bookable on the given day. A closed day
    /// or fully booked day yields an empty list, not an error.
    pub async fn available_slots(&self, query: &AvailabilityQuery) -> Result<Vec<String>, AppError> {
        let agenda = self.require_agenda(query.agenda_id).await?;
        let tz = resolve_timezone(agenda.timezone.as_deref(), self.default_timezone)?;
        let duration = self.resolve_duration(query).await?;
        check_slot_length(duration, query.buffer_minutes)?;

        let schedule = self.weekly_schedule(query.agenda_id).await?;
        let weekday = weekday_index(query.date);

        let (day_start, day_end) = local_day_bounds(query.date, tz)?;
        let appointments =
            AppointmentRepository::booked_between(&self.pool, query.agenda_id, day_start, day_end)
                .await?;
        let busy = project_busy(&appointments, tz)?;

        let slots = compute_slots(&schedule, weekday, &busy, duration, query.buffer_minutes);
        slots
            .into_iter()
            .map(|minute| format_clock_time(minute).map_err(AppError::from))
            .collect()
    }

    /// Books an appointment: validates the request, confirms the interval is
    /// still free against live data, then upserts the client and inserts the
    /// appointment in one transaction. Losing a concurrent race surfaces as
    /// `SlotUnavailable`; the caller re-fetches availability and retries with
    /// a different slot.
    pub async fn book(&self, request: &BookingRequest) -> Result<Appointment, AppError> {
        request.validate()?;
        if request.start_time >= request.end_time {
            return Err(AppError::Validation(
                "startTime must be before endTime".into(),
            ));
        }

        let agenda = self.require_agenda(request.agenda_id).await?;
        let tz = resolve_timezone(agenda.timezone.as_deref(), self.default_timezone)?;
        let schedule = self.weekly_schedule(request.agenda_id).await?;

        // Advisory fast-fail against live data. Two concurrent requests can
        // still both pass; the exclusion constraint settles that race.
        let date = local_date(request.start_time, tz)?;
        let weekday = weekday_index(date);
        let (start_minute, end_minute) =
            project_interval(request.start_time, request.end_time, tz)?;

        let within_hours = schedule
            .hours_for(weekday)
            .iter()
            .any(|range| range.covers(start_minute, end_minute));
        if !within_hours {
            return Err(AppError::SlotUnavailable(
                "requested time is outside opening hours".into(),
            ));
        }

        let (day_start, day_end) = local_day_bounds(date, tz)?;
        let appointments =
            AppointmentRepository::booked_between(&self.pool, request.agenda_id, day_start, day_end)
                .await?;
        let busy = project_busy(&appointments, tz)?;
        if busy.iter().any(|b| b.overlaps(start_minute, end_minute)) {
            return Err(AppError::SlotUnavailable(
                "requested slot is already booked".into(),
            ));
        }

        // Client upsert and appointment insert commit or roll back together.
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;
        let client = ClientRepository::upsert_by_phone(&mut tx, &request.client).await?;
        let appointment = AppointmentRepository::insert_booked(&mut tx, request, client.id)
            .await
            .map_err(|err| {
                if err.is_conflict() {
                    AppError::SlotUnavailable("slot was taken by a concurrent booking".into())
                } else {
                    AppError::Database(err)
                }
            })?;
        tx.commit().await.map_err(DatabaseError::from)?;

        tracing::info!(
            appointment_id = %appointment.id,
            agenda_id = %appointment.agenda_id,
            client_id = %client.id,
            "appointment booked"
        );
        Ok(appointment)
    }

    /// Cancels a booked appointment. The interval becomes bookable again
    /// immediately: cancelled rows fall out of both the exclusion constraint
    /// and the availability projection.
    pub async fn cancel(&self, id: Uuid) -> Result<Appointment, AppError> {
        self.transition(id, AppointmentStatus::Cancelled).await
    }

    /// Marks a booked appointment completed.
    pub async fn complete(&self, id: Uuid) -> Result<Appointment, AppError> {
        self.transition(id, AppointmentStatus::Completed).await
    }

    async fn transition(
        &self,
        id: Uuid,
        next: AppointmentStatus,
    ) -> Result<Appointment, AppError> {
        if let Some(appointment) =
            AppointmentRepository::try_transition(&self.pool, id, next).await?
        {
            tracing::info!(appointment_id = %id, status = ?next, "appointment transitioned");
            return Ok(appointment);
        }

        // Nothing was updated: either the id is unknown or the appointment
        // already reached a terminal state.
        match AppointmentRepository::find(&self.pool, id).await? {
            None => Err(AppError::NotFound(format!("appointment {id}"))),
            Some(existing) => Err(AppError::Conflict(format!(
                "appointment is {} and cannot become {}",
                existing.status, next
            ))),
        }
    }

    async fn require_agenda(&self, agenda_id: Uuid) -> Result<Agenda, AppError> {
        AgendaRepository::find(&self.pool, agenda_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("agenda {agenda_id}")))
    }

    async fn weekly_schedule(&self, agenda_id: Uuid) -> Result<WeeklySchedule, AppError> {
        let rows = AgendaRepository::hours(&self.pool, agenda_id).await?;
        // Bounds are enforced by CHECK constraints on agenda_hours.
        let schedule = WeeklySchedule::from_entries(
            rows.iter()
                .map(|row| {
                    HourRange::new(row.start_minute as u16, row.end_minute as u16)
                        .map(|range| (row.weekday as u8, range))
                })
                .collect::<Result<Vec<_>, _>>()?,
        )?;
        Ok(schedule)
    }

    async fn resolve_duration(&self, query: &AvailabilityQuery) -> Result<u16, AppError> {
        if let Some(duration) = query.duration_minutes {
            return Ok(duration);
        }
        let service_id = query.service_id.ok_or_else(|| {
            AppError::Validation("either duration or serviceId is required".into())
        })?;
        let service = ServiceRepository::find(&self.pool, service_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("service {service_id}")))?;
        u16::try_from(service.duration_minutes)
            .map_err(|_| AppError::Internal("stored service duration is out of range".into()))
    }
}

fn check_slot_length(duration: u16, buffer: u16) -> Result<(), AppError> {
    if duration == 0 {
        return Err(AppError::Validation("duration must be positive".into()));
    }
    if u32::from(duration) + u32::from(buffer) > u32::from(MINUTES_PER_DAY) {
        return Err(AppError::Validation(
            "duration plus buffer exceeds one day".into(),
        ));
    }
    Ok(())
}

/// Projects one appointment interval into local wall-clock minutes. An
/// interval running past local midnight clamps to end of day so it keeps
/// blocking the evening slots it actually covers.
fn project_interval(
    start: time::OffsetDateTime,
    end: time::OffsetDateTime,
    tz: Tz,
) -> Result<(u16, u16), AppError> {
    let start_minute = wall_clock_minutes(start, tz)?;
    let mut end_minute = wall_clock_minutes(end, tz)?;
    if end_minute <= start_minute {
        end_minute = MINUTES_PER_DAY;
    }
    Ok((start_minute, end_minute))
}

fn project_busy(appointments: &[Appointment], tz: Tz) -> Result<Vec<BusyInterval>, AppError> {
    appointments
        .iter()
        .map(|appointment| {
            let (start_minute, end_minute) =
                project_interval(appointment.start_time, appointment.end_time, tz)?;
            Ok(BusyInterval {
                start_minute,
                end_minute,
            })
        })
        .collect()
}
