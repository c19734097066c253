use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;
use thiserror::Error;
use time::{Date, OffsetDateTime};

/// Minutes in a day; clock values live in `0..MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u16 = 1440;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    #[error("invalid clock time {0:?}, expected \"HH:MM\"")]
    InvalidFormat(String),

    #[error("minute offset {0} is outside 0..1440")]
    OutOfRange(i64),

    #[error("unknown timezone {0:?}")]
    UnknownTimezone(String),

    #[error("instant is not representable in the target timezone")]
    UnrepresentableInstant,
}

/// Parses "HH:MM" into minutes since midnight.
pub fn parse_clock_time(s: &str) -> Result<u16, ClockError> {
    let invalid = || ClockError::InvalidFormat(s.to_string());

    let (hours, minutes) = s.split_once(':').ok_or_else(invalid)?;
    if minutes.contains(':') {
        return Err(invalid());
    }

    let hours: u16 = hours.parse().map_err(|_| invalid())?;
    let minutes: u16 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    Ok(hours * 60 + minutes)
}

/// Formats minutes since midnight as zero-padded "HH:MM".
pub fn format_clock_time(minutes: u16) -> Result<String, ClockError> {
    if minutes >= MINUTES_PER_DAY {
        return Err(ClockError::OutOfRange(i64::from(minutes)));
    }
    Ok(format!("{:02}:{:02}", minutes / 60, minutes % 60))
}

/// Resolves an optional IANA timezone name, falling back to `default`.
pub fn resolve_timezone(name: Option<&str>, default: Tz) -> Result<Tz, ClockError> {
    match name {
        Some(name) => name
            .parse()
            .map_err(|_| ClockError::UnknownTimezone(name.to_string())),
        None => Ok(default),
    }
}

fn to_local(instant: OffsetDateTime, tz: Tz) -> Result<chrono::DateTime<Tz>, ClockError> {
    let utc = chrono::DateTime::from_timestamp(instant.unix_timestamp(), 0)
        .ok_or(ClockError::UnrepresentableInstant)?;
    Ok(utc.with_timezone(&tz))
}

/// Projects an absolute instant into wall-clock minutes since midnight in the
/// given timezone. Stored appointment bounds go through here before any
/// overlap comparison; around a DST transition the projection is what decides
/// which slots an appointment actually blocks.
pub fn wall_clock_minutes(instant: OffsetDateTime, tz: Tz) -> Result<u16, ClockError> {
    let local = to_local(instant, tz)?;
    Ok((local.hour() * 60 + local.minute()) as u16)
}

/// The calendar date an instant falls on in the given timezone.
pub fn local_date(instant: OffsetDateTime, tz: Tz) -> Result<Date, ClockError> {
    let local = to_local(instant, tz)?;
    Date::from_calendar_date(
        local.year(),
        time::Month::try_from(local.month() as u8).map_err(|_| ClockError::UnrepresentableInstant)?,
        local.day() as u8,
    )
    .map_err(|_| ClockError::UnrepresentableInstant)
}

/// Weekday index with 0 = Sunday .. 6 = Saturday.
pub fn weekday_index(date: Date) -> u8 {
    date.weekday().number_days_from_sunday()
}

/// The UTC instants bounding the given calendar day in the given timezone,
/// as a half-open `[start, end)` pair. Used to select which stored
/// appointments belong to a business-local day.
pub fn local_day_bounds(date: Date, tz: Tz) -> Result<(OffsetDateTime, OffsetDateTime), ClockError> {
    let naive = NaiveDate::from_ymd_opt(
        date.year(),
        u32::from(u8::from(date.month())),
        u32::from(date.day()),
    )
    .ok_or(ClockError::UnrepresentableInstant)?;

    let start = local_midnight(naive, tz)?;
    let end = local_midnight(naive + Duration::days(1), tz)?;
    Ok((
        OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|_| ClockError::UnrepresentableInstant)?,
        OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|_| ClockError::UnrepresentableInstant)?,
    ))
}

fn local_midnight(date: NaiveDate, tz: Tz) -> Result<chrono::DateTime<Tz>, ClockError> {
    let midnight = NaiveDateTime::new(date, NaiveTime::MIN);
    // Midnight itself can fall inside a DST gap; probe forward in one-hour
    // steps until the wall clock exists.
    for shift in 0..3 {
        let probe = midnight + Duration::hours(shift);
        if let Some(resolved) = tz.from_local_datetime(&probe).earliest() {
            return Ok(resolved);
        }
    }
    Err(ClockError::UnrepresentableInstant)
}
