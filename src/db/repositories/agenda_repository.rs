use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{Agenda, AgendaHoursRow};
use crate::db::DatabaseError;

pub struct AgendaRepository;

impl AgendaRepository {
    /// Fetches an agenda joined with its business's timezone.
    pub async fn find(pool: &PgPool, agenda_id: Uuid) -> Result<Option<Agenda>, DatabaseError> {
        let agenda = sqlx::query_as::<_, Agenda>(
            r#"
            SELECT a.id, a.business_id, a.name, b.timezone, a.created_at
            FROM agendas a
            JOIN businesses b ON b.id = a.business_id
            WHERE a.id = $1
            "#,
        )
        .bind(agenda_id)
        .fetch_optional(pool)
        .await?;

        Ok(agenda)
    }

    /// The agenda's weekly hours rows, ordered by weekday then start.
    pub async fn hours(pool: &PgPool, agenda_id: Uuid) -> Result<Vec<AgendaHoursRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, AgendaHoursRow>(
            r#"
            SELECT weekday, start_minute, end_minute
            FROM agenda_hours
            WHERE agenda_id = $1
            ORDER BY weekday, start_minute
            "#,
        )
        .bind(agenda_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}
