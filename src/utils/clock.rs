use chrono::{Local, NaiveDate, NaiveDateTime};

/// Represents an entity responsible for providing dates across application. This allows "today"
/// defaults to be tested.
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Wall clock in the local timezone. Attendance is recorded in local time, so UTC is of no use here.
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
