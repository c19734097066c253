use sqlx::{Postgres, Transaction};

use crate::db::models::{Client, ClientDetails};
use crate::db::DatabaseError;

pub struct ClientRepository;

impl ClientRepository {
    /// Resolves a client by phone inside the booking transaction: the first
    /// booking creates the row, later bookings with the same phone refresh
    /// name and email. Phone never changes once set, it is the lookup key.
    pub async fn upsert_by_phone(
        tx: &mut Transaction<'_, Postgres>,
        details: &ClientDetails,
    ) -> Result<Client, DatabaseError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (name, phone, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (phone) DO UPDATE
            SET name = EXCLUDED.name,
                email = EXCLUDED.email,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(&details.name)
        .bind(&details.phone)
        .bind(&details.email)
        .fetch_one(&mut **tx)
        .await?;

        Ok(client)
    }
}
