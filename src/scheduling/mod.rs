pub mod clock;
pub mod schedule;
pub mod slots;

pub use clock::ClockError;
pub use schedule::{HourRange, ScheduleError, WeeklySchedule};
pub use slots::{compute_slots, BusyInterval, SLOT_GRID_MINUTES};
