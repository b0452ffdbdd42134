use chrono::{NaiveDate, Utc};

// Mocking out time so that it is possible to run tests that depend on time.
pub trait ISys: Send + Sync {
    /// The current timestamp in millis
    fn get_timestamp_millis(&self) -> i64;
    /// The current calendar date with the time of day stripped
    fn date_today(&self) -> NaiveDate;
}

/// System that gets the real time and is used when not testing
pub struct RealSys {}
impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn date_today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}
