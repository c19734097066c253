use thiserror::Error;

use super::clock::MINUTES_PER_DAY;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("weekday {0} is outside 0..=6")]
    InvalidWeekday(u8),

    #[error("hour range {start_minute}..{end_minute} is empty or out of bounds")]
    InvalidRange { start_minute: u16, end_minute: u16 },

    #[error("hour ranges overlap on weekday {0}")]
    OverlappingRanges(u8),
}

/// A half-open `[start, end)` open interval within one day, minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourRange {
    pub start_minute: u16,
    pub end_minute: u16,
}

impl HourRange {
    pub fn new(start_minute: u16, end_minute: u16) -> Result<Self, ScheduleError> {
        if start_minute >= end_minute || end_minute > MINUTES_PER_DAY {
            return Err(ScheduleError::InvalidRange {
                start_minute,
                end_minute,
            });
        }
        Ok(Self {
            start_minute,
            end_minute,
        })
    }

    /// Whether `[start, end)` lies entirely inside this open range.
    pub fn covers(&self, start: u16, end: u16) -> bool {
        start >= self.start_minute && end <= self.end_minute
    }
}

/// A business's recurring operating hours, one ordered list of open intervals
/// per weekday (0 = Sunday .. 6 = Saturday). A weekday with no ranges is
/// closed. Replaced wholesale when an agenda's hours are edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: [Vec<HourRange>; 7],
}

impl WeeklySchedule {
    /// Builds a schedule from (weekday, range) entries. Ranges are sorted per
    /// day; overlapping ranges on the same day are rejected. Touching ranges
    /// are allowed since intervals are half-open.
    pub fn from_entries<I>(entries: I) -> Result<Self, ScheduleError>
    where
        I: IntoIterator<Item = (u8, HourRange)>,
    {
        let mut days: [Vec<HourRange>; 7] = Default::default();
        for (weekday, range) in entries {
            let day = days
                .get_mut(usize::from(weekday))
                .ok_or(ScheduleError::InvalidWeekday(weekday))?;
            day.push(range);
        }
        for (weekday, day) in days.iter_mut().enumerate() {
            day.sort_by_key(|r| r.start_minute);
            for pair in day.windows(2) {
                if pair[1].start_minute < pair[0].end_minute {
                    return Err(ScheduleError::OverlappingRanges(weekday as u8));
                }
            }
        }
        Ok(Self { days })
    }

    /// The open intervals for a weekday, ascending; empty when closed.
    pub fn hours_for(&self, weekday: u8) -> &[HourRange] {
        self.days
            .get(usize::from(weekday))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `[first open, last close)` for the weekday, or None when closed.
    pub fn operating_window(&self, weekday: u8) -> Option<(u16, u16)> {
        let hours = self.hours_for(weekday);
        let first = hours.first()?;
        let last = hours.last()?;
        Some((first.start_minute, last.end_minute))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: u16, end: u16) -> HourRange {
        HourRange::new(start, end).unwrap()
    }

    #[test]
    fn empty_weekday_is_closed() {
        let schedule = WeeklySchedule::from_entries([(1, range(540, 1020))]).unwrap();
        assert!(schedule.hours_for(0).is_empty());
        assert_eq!(schedule.operating_window(0), None);
        assert_eq!(schedule.operating_window(1), Some((540, 1020)));
    }

    #[test]
    fn ranges_are_sorted_within_a_day() {
        let schedule =
            WeeklySchedule::from_entries([(2, range(840, 1080)), (2, range(540, 720))]).unwrap();
        assert_eq!(
            schedule.hours_for(2),
            &[range(540, 720), range(840, 1080)]
        );
        assert_eq!(schedule.operating_window(2), Some((540, 1080)));
    }

    #[test]
    fn touching_ranges_are_allowed_but_overlap_is_not() {
        assert!(WeeklySchedule::from_entries([(3, range(540, 720)), (3, range(720, 1020))]).is_ok());
        assert_eq!(
            WeeklySchedule::from_entries([(3, range(540, 721)), (3, range(720, 1020))]),
            Err(ScheduleError::OverlappingRanges(3))
        );
    }

    #[test]
    fn rejects_degenerate_ranges_and_weekdays() {
        assert!(HourRange::new(600, 600).is_err());
        assert!(HourRange::new(600, 540).is_err());
        assert!(HourRange::new(600, 1441).is_err());
        assert_eq!(
            WeeklySchedule::from_entries([(7, range(540, 600))]),
            Err(ScheduleError::InvalidWeekday(7))
        );
    }
}
