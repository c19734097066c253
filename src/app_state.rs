use sqlx::PgPool;

use crate::booking::BookingService;
use crate::config;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub env: config::Config,
    pub booking: BookingService,
}

impl AppState {
    pub fn new(db: PgPool, env: config::Config, booking: BookingService) -> Self {
        Self { db, env, booking }
    }
}
