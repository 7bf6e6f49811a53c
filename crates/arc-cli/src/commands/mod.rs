pub mod discover;
pub mod dispatch;
pub mod history;
pub mod quota;
pub mod research;
pub mod schema;
pub mod select;
pub mod telemetry;

use chrono::{NaiveDate, Utc};

/// Explicit run date or today (UTC).
pub(crate) fn run_date(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Utc::now().date_naive())
}
