use super::schedule::WeeklySchedule;

/// Candidate start times advance on a fixed half-hour grid regardless of
/// service duration, so offered starts stay aligned to :00/:30.
pub const SLOT_GRID_MINUTES: u16 = 30;

/// An occupied `[start, end)` interval in local wall-clock minutes, projected
/// from a booked appointment's absolute bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusyInterval {
    pub start_minute: u16,
    pub end_minute: u16,
}

impl BusyInterval {
    /// Standard half-open overlap; touching endpoints do not conflict.
    pub fn overlaps(&self, start: u16, end: u16) -> bool {
        start < self.end_minute && end > self.start_minute
    }
}

/// Computes the ordered bookable start times (minutes since midnight) for one
/// weekday. Pure; the caller supplies the day's busy intervals.
///
/// Each candidate is offered iff `[candidate, candidate + duration + buffer)`
/// fits entirely inside a single open range and overlaps no busy interval.
/// Gaps between ranges on a multi-range day therefore behave as closed.
/// Candidates are only tested against the fixed busy set, never against each
/// other: the result is a menu of independently valid options, not a
/// partition. An empty result means no availability, not an error.
pub fn compute_slots(
    schedule: &WeeklySchedule,
    weekday: u8,
    busy: &[BusyInterval],
    duration_minutes: u16,
    buffer_minutes: u16,
) -> Vec<u16> {
    let Some((opening, closing)) = schedule.operating_window(weekday) else {
        return Vec::new();
    };
    let hours = schedule.hours_for(weekday);

    let mut slots = Vec::new();
    let mut candidate = opening;
    while candidate < closing {
        let candidate_end = candidate + duration_minutes + buffer_minutes;
        let fits = hours.iter().any(|r| r.covers(candidate, candidate_end));
        if fits && !busy.iter().any(|b| b.overlaps(candidate, candidate_end)) {
            slots.push(candidate);
        }
        candidate += SLOT_GRID_MINUTES;
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::clock::{format_clock_time, parse_clock_time};
    use crate::scheduling::schedule::HourRange;

    fn schedule(entries: &[(u8, &str, &str)]) -> WeeklySchedule {
        WeeklySchedule::from_entries(entries.iter().map(|(day, start, end)| {
            (
                *day,
                HourRange::new(
                    parse_clock_time(start).unwrap(),
                    parse_clock_time(end).unwrap(),
                )
                .unwrap(),
            )
        }))
        .unwrap()
    }

    fn busy(start: &str, end: &str) -> BusyInterval {
        BusyInterval {
            start_minute: parse_clock_time(start).unwrap(),
            end_minute: parse_clock_time(end).unwrap(),
        }
    }

    fn as_clock(slots: &[u16]) -> Vec<String> {
        slots
            .iter()
            .map(|m| format_clock_time(*m).unwrap())
            .collect()
    }

    #[test]
    fn suppresses_slots_conflicting_with_a_booked_appointment() {
        // Monday 09:00-17:00, one appointment 10:00-10:30, 30-minute service.
        let schedule = schedule(&[(1, "09:00", "17:00")]);
        let slots = compute_slots(&schedule, 1, &[busy("10:00", "10:30")], 30, 0);
        let clocks = as_clock(&slots);
        assert_eq!(&clocks[..4], &["09:00", "09:30", "10:30", "11:00"]);
        assert_eq!(clocks.last().unwrap(), "16:30");
        assert!(!clocks.contains(&"10:00".to_string()));
        assert_eq!(clocks.len(), 15);
    }

    #[test]
    fn closed_day_yields_empty_not_error() {
        let schedule = schedule(&[(1, "09:00", "17:00")]);
        assert!(compute_slots(&schedule, 0, &[], 30, 0).is_empty());
    }

    #[test]
    fn buffer_counts_against_closing_time() {
        // duration=45, buffer=15: 16:00 + 60 = 17:00 fits, 16:30 does not.
        let schedule = schedule(&[(1, "09:00", "17:00")]);
        let slots = compute_slots(&schedule, 1, &[], 45, 15);
        let clocks = as_clock(&slots);
        assert_eq!(clocks.last().unwrap(), "16:00");
        assert!(!clocks.contains(&"16:30".to_string()));
    }

    #[test]
    fn touching_appointment_endpoints_do_not_conflict() {
        let schedule = schedule(&[(1, "09:00", "12:00")]);
        let slots = compute_slots(&schedule, 1, &[busy("09:30", "10:00")], 30, 0);
        // 09:00-09:30 touches the busy start, 10:00-10:30 touches its end.
        assert_eq!(as_clock(&slots), vec!["09:00", "10:00", "10:30", "11:00", "11:30"]);
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = busy("09:00", "10:00");
        let b = busy("09:30", "10:30");
        let c = busy("10:00", "11:00");
        assert!(a.overlaps(b.start_minute, b.end_minute));
        assert!(b.overlaps(a.start_minute, a.end_minute));
        assert!(!a.overlaps(c.start_minute, c.end_minute));
        assert!(!c.overlaps(a.start_minute, a.end_minute));
    }

    #[test]
    fn gap_between_ranges_is_closed() {
        // Split day 09:00-12:00 / 14:00-17:00: nothing may straddle or sit in
        // the lunch gap, but candidates are still generated across it.
        let schedule = schedule(&[(1, "09:00", "12:00"), (1, "14:00", "17:00")]);
        let slots = compute_slots(&schedule, 1, &[], 60, 0);
        let clocks = as_clock(&slots);
        assert!(clocks.contains(&"11:00".to_string()));
        assert!(!clocks.contains(&"11:30".to_string()));
        assert!(!clocks.contains(&"12:00".to_string()));
        assert!(!clocks.contains(&"13:30".to_string()));
        assert!(clocks.contains(&"14:00".to_string()));
        assert_eq!(clocks.last().unwrap(), "16:00");
    }

    #[test]
    fn overlapping_existing_appointments_are_tolerated() {
        // Existing appointments are never checked against each other.
        let schedule = schedule(&[(1, "09:00", "11:00")]);
        let slots = compute_slots(
            &schedule,
            1,
            &[busy("09:00", "10:00"), busy("09:30", "10:30")],
            30,
            0,
        );
        assert_eq!(as_clock(&slots), vec!["10:30"]);
    }

    #[test]
    fn fully_booked_day_is_empty() {
        let schedule = schedule(&[(1, "09:00", "10:00")]);
        let slots = compute_slots(&schedule, 1, &[busy("09:00", "10:00")], 30, 0);
        assert!(slots.is_empty());
    }
}
