//! Storage-backed booking properties. These need a running Postgres with the
//! btree_gist extension available, pointed to by DATABASE_URL, so they are
//! ignored by default:
//!
//!     DATABASE_URL=postgres://... cargo test -- --ignored

use agendly::booking::{AvailabilityQuery, BookingService};
use agendly::db::{BookingRequest, ClientDetails};
use agendly::error::AppError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use time::macros::{date, datetime};
use time::OffsetDateTime;
use uuid::Uuid;

const TIMEZONE: &str = "Europe/Dublin";

async fn setup() -> (PgPool, BookingService, Uuid) {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&url)
        .await
        .expect("failed to connect");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations failed");

    let business_id: Uuid = sqlx::query_scalar(
        "INSERT INTO businesses (name, timezone) VALUES ($1, $2) RETURNING id",
    )
    .bind("Test Studio")
    .bind(TIMEZONE)
    .fetch_one(&pool)
    .await
    .unwrap();

    let agenda_id: Uuid = sqlx::query_scalar(
        "INSERT INTO agendas (business_id, name) VALUES ($1, $2) RETURNING id",
    )
    .bind(business_id)
    .bind("Main agenda")
    .fetch_one(&pool)
    .await
    .unwrap();

    // Open 09:00-17:00 every day of the week.
    for weekday in 0..7i16 {
        sqlx::query(
            "INSERT INTO agenda_hours (agenda_id, weekday, start_minute, end_minute)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(agenda_id)
        .bind(weekday)
        .bind(540i16)
        .bind(1020i16)
        .execute(&pool)
        .await
        .unwrap();
    }

    let service = BookingService::new(pool.clone(), chrono_tz::Europe::Dublin);
    (pool, service, agenda_id)
}

fn request(
    agenda_id: Uuid,
    start: OffsetDateTime,
    end: OffsetDateTime,
    name: &str,
    phone: &str,
) -> BookingRequest {
    BookingRequest {
        agenda_id,
        start_time: start,
        end_time: end,
        service_id: None,
        employee_id: None,
        client: ClientDetails {
            name: name.to_string(),
            phone: phone.to_string(),
            email: None,
        },
    }
}

fn slots_query(agenda_id: Uuid, date: time::Date) -> AvailabilityQuery {
    AvailabilityQuery {
        agenda_id,
        date,
        duration_minutes: Some(30),
        buffer_minutes: 0,
        service_id: None,
    }
}

#[tokio::test]
#[ignore = "requires a running Postgres with btree_gist"]
async fn concurrent_overlapping_bookings_admit_at_most_one() {
    let (_pool, service, agenda_id) = setup().await;

    // Dublin is UTC+1 in June: 10:00 UTC is 11:00 local, inside 09:00-17:00.
    let start = datetime!(2031-06-02 10:00 UTC);
    let end = datetime!(2031-06-02 10:30 UTC);

    let mut handles = Vec::new();
    for i in 0..5 {
        let service = service.clone();
        let req = request(
            agenda_id,
            start,
            end,
            &format!("Caller {i}"),
            &format!("+35387000000{i}"),
        );
        handles.push(tokio::spawn(async move { service.book(&req).await }));
    }

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(AppError::SlotUnavailable(_)) => conflicts += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 4);
}

#[tokio::test]
#[ignore = "requires a running Postgres with btree_gist"]
async fn booked_interval_disappears_and_cancellation_restores_it() {
    let (_pool, service, agenda_id) = setup().await;

    let day = date!(2031-06-03);
    // 10:00-10:30 local is 09:00-09:30 UTC in June.
    let req = request(
        agenda_id,
        datetime!(2031-06-03 09:00 UTC),
        datetime!(2031-06-03 09:30 UTC),
        "Ana",
        "+353871111111",
    );

    let before = service.available_slots(&slots_query(agenda_id, day)).await.unwrap();
    assert!(before.contains(&"10:00".to_string()));

    let appointment = service.book(&req).await.unwrap();

    let during = service.available_slots(&slots_query(agenda_id, day)).await.unwrap();
    assert!(!during.contains(&"10:00".to_string()));
    assert!(during.contains(&"09:30".to_string()));
    assert!(during.contains(&"10:30".to_string()));

    // Booking the occupied interval again is refused up front.
    let retry = request(
        agenda_id,
        req.start_time,
        req.end_time,
        "Bea",
        "+353872222222",
    );
    assert!(matches!(
        service.book(&retry).await,
        Err(AppError::SlotUnavailable(_))
    ));

    service.cancel(appointment.id).await.unwrap();

    let after = service.available_slots(&slots_query(agenda_id, day)).await.unwrap();
    assert!(after.contains(&"10:00".to_string()));

    // The freed interval is immediately bookable again.
    service.book(&retry).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running Postgres with btree_gist"]
async fn repeat_bookings_reuse_the_client_row_by_phone() {
    let (pool, service, agenda_id) = setup().await;

    let phone = "+353873333333";
    let first = request(
        agenda_id,
        datetime!(2031-06-04 09:00 UTC),
        datetime!(2031-06-04 09:30 UTC),
        "Carla",
        phone,
    );
    let second = request(
        agenda_id,
        datetime!(2031-06-04 11:00 UTC),
        datetime!(2031-06-04 11:30 UTC),
        "Carla Silva",
        phone,
    );

    let a = service.book(&first).await.unwrap();
    let b = service.book(&second).await.unwrap();

    assert_ne!(a.id, b.id);
    assert_eq!(a.client_id, b.client_id);

    let (count, name): (i64, String) = sqlx::query_as(
        "SELECT count(*) OVER (), name FROM clients WHERE phone = $1",
    )
    .bind(phone)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
    assert_eq!(name, "Carla Silva");
}

#[tokio::test]
#[ignore = "requires a running Postgres with btree_gist"]
async fn terminal_appointments_refuse_further_transitions() {
    let (_pool, service, agenda_id) = setup().await;

    let req = request(
        agenda_id,
        datetime!(2031-06-05 09:00 UTC),
        datetime!(2031-06-05 09:30 UTC),
        "Dan",
        "+353874444444",
    );
    let appointment = service.book(&req).await.unwrap();

    service.complete(appointment.id).await.unwrap();
    assert!(matches!(
        service.cancel(appointment.id).await,
        Err(AppError::Conflict(_))
    ));
    assert!(matches!(
        service.cancel(Uuid::now_v7()).await,
        Err(AppError::NotFound(_))
    ));
}
