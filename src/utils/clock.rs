use chrono::{DateTime, Local};

/// Represents an entity responsible for providing the current local time.
/// This allows the watch loop to be driven by a fixed clock in tests.
pub trait Clock: Sync + Send + 'static {
    fn now(&self) -> DateTime<Local>;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
