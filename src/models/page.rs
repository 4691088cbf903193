use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use super::{explicit, non_null, null_as_default, to_datetime};
use crate::constants::ERR_INVALID_TIME;

/// How a business operates on a holiday
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidayStatus {
    Closed,
    /// Open with reduced or extended hours; the only status that carries times
    Special,
    Normal,
}

/// A single calendar-date override of the regular hours
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub name: String,
    pub date: NaiveDate,
    pub status: HolidayStatus,
    #[serde(default)]
    pub open_time: Option<String>,
    #[serde(default)]
    pub close_time: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Holiday {
    /// Check the entry and drop times that its status does not use
    pub fn normalize(mut self) -> Result<Self, String> {
        if self.name.trim().is_empty() {
            return Err("Holiday name must not be empty".to_string());
        }

        match self.status {
            HolidayStatus::Special => {
                let (Some(open), Some(close)) = (&self.open_time, &self.close_time) else {
                    return Err(format!(
                        "Holiday '{}' has special hours but no open/close time",
                        self.name
                    ));
                };
                if !is_clock_time(open) || !is_clock_time(close) {
                    return Err(ERR_INVALID_TIME.to_string());
                }
            }
            HolidayStatus::Closed | HolidayStatus::Normal => {
                self.open_time = None;
                self.close_time = None;
            }
        }

        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    pub open: String,
    pub close: String,
}

/// Regular weekly opening hours; days without an entry are unspecified
pub type RegularHours = BTreeMap<Weekday, DayHours>;

fn is_clock_time(value: &str) -> bool {
    NaiveTime::parse_from_str(value, "%H:%M").is_ok()
}

fn validate_regular_hours(hours: &RegularHours) -> Result<(), ValidationError> {
    for day in hours.values() {
        if !is_clock_time(&day.open) || !is_clock_time(&day.close) {
            let mut error = ValidationError::new("time");
            error.message = Some(ERR_INVALID_TIME.into());
            return Err(error);
        }
    }
    Ok(())
}

fn normalize_holidays(holidays: Vec<Holiday>) -> Result<Vec<Holiday>, String> {
    holidays.into_iter().map(Holiday::normalize).collect()
}

/// Page record stored in redb; its key is the owning business id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub holidays: Vec<Holiday>,
    pub regular_hours: RegularHours,
    pub custom_css: Option<String>,
    pub updated_at: i64,
}

impl PageRecord {
    pub fn new(input: NewPage, now: i64) -> Result<Self, String> {
        Ok(Self {
            holidays: normalize_holidays(input.holidays)?,
            regular_hours: input.regular_hours,
            custom_css: None,
            updated_at: now,
        })
    }

    /// Apply only the fields present in `update`
    pub fn apply(&mut self, update: PageUpdate, now: i64) -> Result<(), String> {
        if let Some(Some(holidays)) = update.holidays {
            self.holidays = normalize_holidays(holidays)?;
        }
        if let Some(Some(regular_hours)) = update.regular_hours {
            self.regular_hours = regular_hours;
        }
        if let Some(custom_css) = update.custom_css {
            self.custom_css = custom_css;
        }
        self.updated_at = now;
        Ok(())
    }
}

/// Page model for API responses
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub id: Uuid,
    pub business_id: Uuid,
    pub holidays: Vec<Holiday>,
    pub regular_hours: RegularHours,
    pub custom_css: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Page {
    /// Pages share their id with the owning business
    pub fn from_record(id: Uuid, record: PageRecord) -> Self {
        Self {
            id,
            business_id: id,
            holidays: record.holidays,
            regular_hours: record.regular_hours,
            custom_css: record.custom_css,
            updated_at: to_datetime(record.updated_at),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewPage {
    pub business_id: Uuid,
    pub holidays: Vec<Holiday>,
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(custom(function = "validate_regular_hours"))]
    pub regular_hours: RegularHours,
}

/// Partial page update
///
/// `null` clears `custom_css` and is rejected for holidays and regular hours.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageUpdate {
    #[serde(default, deserialize_with = "explicit")]
    pub holidays: Option<Option<Vec<Holiday>>>,
    #[serde(default, deserialize_with = "explicit")]
    pub regular_hours: Option<Option<RegularHours>>,
    #[serde(default, deserialize_with = "explicit")]
    pub custom_css: Option<Option<String>>,
}

impl Validate for PageUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        non_null("holidays", &self.holidays, &mut errors);
        non_null("regular_hours", &self.regular_hours, &mut errors);

        if let Some(Some(hours)) = &self.regular_hours {
            if let Err(error) = validate_regular_hours(hours) {
                errors.add("regular_hours", error);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holiday(status: HolidayStatus, open: Option<&str>, close: Option<&str>) -> Holiday {
        Holiday {
            name: "Christmas Day".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 12, 25).unwrap(),
            status,
            open_time: open.map(String::from),
            close_time: close.map(String::from),
            notes: None,
        }
    }

    #[test]
    fn test_special_requires_times() {
        assert!(holiday(HolidayStatus::Special, Some("10:00"), Some("14:00"))
            .normalize()
            .is_ok());
        assert!(holiday(HolidayStatus::Special, Some("10:00"), None)
            .normalize()
            .is_err());
        assert!(holiday(HolidayStatus::Special, Some("10am"), Some("2pm"))
            .normalize()
            .is_err());
    }

    #[test]
    fn test_closed_drops_times() {
        let normalized = holiday(HolidayStatus::Closed, Some("09:00"), Some("17:00"))
            .normalize()
            .unwrap();
        assert!(normalized.open_time.is_none());
        assert!(normalized.close_time.is_none());
    }

    #[test]
    fn test_holiday_from_frontend_json() {
        let holiday: Holiday = serde_json::from_str(
            r#"{"name": "New Year's Day", "date": "2027-01-01", "status": "closed"}"#,
        )
        .unwrap();
        assert_eq!(holiday.status, HolidayStatus::Closed);
        assert!(holiday.notes.is_none());

        let bad = serde_json::from_str::<Holiday>(
            r#"{"name": "New Year's Day", "date": "2027-01-01", "status": "open"}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_regular_hours_keys_are_weekdays() {
        let hours: RegularHours = serde_json::from_str(
            r#"{"monday": {"open": "09:00", "close": "17:00"}, "sunday": {"open": "10:00", "close": "14:00"}}"#,
        )
        .unwrap();
        assert_eq!(hours.len(), 2);
        assert_eq!(hours[&Weekday::Monday].close, "17:00");

        assert!(serde_json::from_str::<RegularHours>(r#"{"funday": {"open": "09:00", "close": "17:00"}}"#).is_err());
    }

    #[test]
    fn test_update_keeps_absent_fields() {
        let mut record = PageRecord::new(
            NewPage {
                business_id: Uuid::new_v4(),
                holidays: vec![holiday(HolidayStatus::Closed, None, None)],
                regular_hours: RegularHours::new(),
            },
            1_700_000_000,
        )
        .unwrap();

        let update: PageUpdate = serde_json::from_str(r#"{"custom_css": "body { color: red; }"}"#).unwrap();
        record.apply(update, 1_700_000_100).unwrap();

        assert_eq!(record.holidays.len(), 1);
        assert_eq!(record.custom_css.as_deref(), Some("body { color: red; }"));
        assert_eq!(record.updated_at, 1_700_000_100);

        let clear: PageUpdate = serde_json::from_str(r#"{"custom_css": null}"#).unwrap();
        record.apply(clear, 1_700_000_200).unwrap();
        assert!(record.custom_css.is_none());
        assert_eq!(record.holidays.len(), 1);
    }

    #[test]
    fn test_null_holidays_rejected() {
        let update: PageUpdate = serde_json::from_str(r#"{"holidays": null}"#).unwrap();
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_record_survives_bincode() {
        let config = bincode::config::standard();
        let mut regular_hours = RegularHours::new();
        regular_hours.insert(
            Weekday::Friday,
            DayHours {
                open: "08:00".to_string(),
                close: "18:00".to_string(),
            },
        );
        let record = PageRecord {
            holidays: vec![holiday(HolidayStatus::Special, Some("10:00"), Some("14:00"))],
            regular_hours,
            custom_css: None,
            updated_at: 1_700_000_000,
        };

        let bytes = bincode::serde::encode_to_vec(&record, config).unwrap();
        let (decoded, _): (PageRecord, _) =
            bincode::serde::decode_from_slice(&bytes, config).unwrap();

        assert_eq!(decoded, record);
    }
}
