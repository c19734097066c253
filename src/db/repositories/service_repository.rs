use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::Service;
use crate::db::DatabaseError;

pub struct ServiceRepository;

impl ServiceRepository {
    pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<Service>, DatabaseError> {
        let service = sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(service)
    }
}
