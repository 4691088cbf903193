pub mod analytics;
pub mod business;
pub mod page;

pub use analytics::{Analytics, AnalyticsRecord, SourceCount};
pub use business::{Business, BusinessRecord, BusinessUpdate, NewBusiness, PaymentStatus};
pub use page::{
    DayHours, Holiday, HolidayStatus, NewPage, Page, PageRecord, PageUpdate, RegularHours, Weekday,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Convert a stored Unix timestamp to a UTC datetime, defaulting to now if invalid
pub fn to_datetime(timestamp: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp, 0).unwrap_or_else(Utc::now)
}

/// Deserialize a field that distinguishes "absent" from "explicitly null"
///
/// Use with `#[serde(default, deserialize_with = "explicit")]`:
/// absent -> `None`, `null` -> `Some(None)`, value -> `Some(Some(v))`.
pub(crate) fn explicit<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Deserialize `null` the same as an absent field
///
/// Use with `#[serde(default, deserialize_with = "null_as_default")]`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Reject `null` for a field that cannot be cleared
pub(crate) fn non_null<T>(
    field: &'static str,
    value: &Option<Option<T>>,
    errors: &mut validator::ValidationErrors,
) {
    if matches!(value, Some(None)) {
        let mut error = validator::ValidationError::new("null");
        error.message = Some(format!("{field} cannot be null").into());
        errors.add(field, error);
    }
}
