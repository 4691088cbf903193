use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::to_datetime;

/// Views from one source on one UTC calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCount {
    pub date: NaiveDate,
    pub source: String,
    pub count: u64,
}

/// Analytics record stored in redb; its key is the page id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsRecord {
    pub views: u64,
    pub last_viewed: Option<i64>,
    /// At most one entry per (date, source)
    pub sources: Vec<SourceCount>,
}

impl AnalyticsRecord {
    /// Count one view from `source` at `now`
    pub fn record_view(&mut self, source: &str, now: DateTime<Utc>) {
        self.views += 1;
        self.last_viewed = Some(now.timestamp());

        let today = now.date_naive();
        match self
            .sources
            .iter_mut()
            .find(|entry| entry.date == today && entry.source == source)
        {
            Some(entry) => entry.count += 1,
            None => self.sources.push(SourceCount {
                date: today,
                source: source.to_string(),
                count: 1,
            }),
        }
    }
}

/// Analytics model for API responses
#[derive(Debug, Clone, Serialize)]
pub struct Analytics {
    pub id: Uuid,
    pub page_id: Uuid,
    pub views: u64,
    pub last_viewed: Option<DateTime<Utc>>,
    pub sources: Vec<SourceCount>,
}

impl Analytics {
    /// Analytics share their id with the page they count
    pub fn from_record(page_id: Uuid, record: AnalyticsRecord) -> Self {
        Self {
            id: page_id,
            page_id,
            views: record.views,
            last_viewed: record.last_viewed.map(to_datetime),
            sources: record.sources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 12, 24, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_same_source_same_day_accumulates() {
        let mut record = AnalyticsRecord::default();
        for i in 0..5 {
            record.record_view("direct", morning() + Duration::minutes(i));
        }

        assert_eq!(record.views, 5);
        assert_eq!(
            record.sources,
            vec![SourceCount {
                date: morning().date_naive(),
                source: "direct".to_string(),
                count: 5,
            }]
        );
        assert_eq!(
            record.last_viewed,
            Some((morning() + Duration::minutes(4)).timestamp())
        );
    }

    #[test]
    fn test_distinct_sources_get_distinct_entries() {
        let mut record = AnalyticsRecord::default();
        record.record_view("direct", morning());
        record.record_view("facebook", morning());
        record.record_view("direct", morning());

        assert_eq!(record.views, 3);
        assert_eq!(record.sources.len(), 2);
        assert_eq!(record.sources[0].count, 2);
        assert_eq!(record.sources[1].source, "facebook");
        assert_eq!(record.sources[1].count, 1);
    }

    #[test]
    fn test_new_day_starts_new_entry() {
        let mut record = AnalyticsRecord::default();
        record.record_view("direct", morning());
        record.record_view("direct", morning() + Duration::days(1));

        assert_eq!(record.sources.len(), 2);
        assert!(record.sources.iter().all(|entry| entry.count == 1));
    }

    #[test]
    fn test_day_boundary_is_utc() {
        let mut record = AnalyticsRecord::default();
        let late = Utc.with_ymd_and_hms(2026, 12, 24, 23, 59, 59).unwrap();
        record.record_view("direct", late);
        record.record_view("direct", late + Duration::seconds(1));

        assert_eq!(record.sources.len(), 2);
        assert_eq!(
            record.sources[1].date,
            NaiveDate::from_ymd_opt(2026, 12, 25).unwrap()
        );
    }
}
