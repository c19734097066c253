use anyhow::Context;
use chrono_tz::Tz;
use dotenv::dotenv;
use tracing::info;

use agendly::{app, app_state::AppState, booking::BookingService, config, db, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = config::init()?;
    telemetry::init()?;

    let default_timezone: Tz = config
        .app
        .default_timezone
        .parse()
        .map_err(|err| anyhow::anyhow!("Invalid DEFAULT_TIMEZONE: {err}"))?;

    let pool = db::init_pool().await?;
    let booking = BookingService::new(pool.clone(), default_timezone);
    let state = AppState::new(pool, config.clone(), booking);

    let addr = config.server_addr();
    let app = app::create_router(state);

    info!("{} listening on {}", config.app.name, addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Failed to serve application")?;

    Ok(())
}
