//! Client of the external holiday calendar.
//!
//! The feed answers with a JSON list of dated holidays. Both the compact
//! shape (`date`, `name`, `national`) and the common public-API shape
//! (`holiday_date`, `holiday_name`, `is_national_holiday`) are accepted.

use std::time::Duration;

use chrono::NaiveDate;
use engine::{Holiday, HolidayCategory};
use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Deserialize)]
struct FeedEntry {
    #[serde(alias = "holiday_date")]
    date: NaiveDate,
    #[serde(alias = "holiday_name")]
    name: String,
    #[serde(alias = "is_national_holiday", default = "national_by_default")]
    national: bool,
}

fn national_by_default() -> bool {
    true
}

/// Converts feed entries, ordered by date; on a repeated date the first
/// entry wins.
fn into_holidays(entries: Vec<FeedEntry>) -> Vec<Holiday> {
    let mut holidays: Vec<Holiday> = entries
        .into_iter()
        .map(|entry| {
            let category = if entry.national {
                HolidayCategory::National
            } else {
                HolidayCategory::MassLeave
            };
            Holiday::new(
                format!("holiday-{}", entry.date),
                entry.date,
                entry.name.trim(),
                category,
            )
        })
        .collect();
    holidays.sort_by_key(|holiday| holiday.date);
    holidays.dedup_by_key(|holiday| holiday.date);
    holidays
}

#[derive(Debug, Clone)]
pub struct HolidayFeed {
    url: String,
    http: reqwest::Client,
}

impl HolidayFeed {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            http: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    /// Current calendar from the feed.
    pub async fn fetch(&self) -> Result<Vec<Holiday>> {
        let entries: Vec<FeedEntry> = self
            .http
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(into_holidays(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_feed_shapes_are_accepted() {
        let body = r#"[
            {"holiday_date": "2026-08-17", "holiday_name": " Hari Kemerdekaan ", "is_national_holiday": true},
            {"date": "2026-03-19", "name": "Cuti Bersama Nyepi", "national": false},
            {"date": "2026-01-01", "name": "Tahun Baru"}
        ]"#;
        let entries: Vec<FeedEntry> = serde_json::from_str(body).unwrap();
        let holidays = into_holidays(entries);

        let dates: Vec<String> = holidays.iter().map(|h| h.date.to_string()).collect();
        assert_eq!(dates, ["2026-01-01", "2026-03-19", "2026-08-17"]);
        assert_eq!(holidays[0].category, HolidayCategory::National);
        assert_eq!(holidays[1].category, HolidayCategory::MassLeave);
        assert_eq!(holidays[2].name, "Hari Kemerdekaan");
        assert_eq!(holidays[2].id, "holiday-2026-08-17");
        assert_eq!(holidays[2].year(), 2026);
    }

    #[test]
    fn repeated_dates_collapse() {
        let body = r#"[
            {"date": "2026-12-25", "name": "Natal"},
            {"date": "2026-12-25", "name": "Christmas"}
        ]"#;
        let holidays = into_holidays(serde_json::from_str(body).unwrap());
        assert_eq!(holidays.len(), 1);
        assert_eq!(holidays[0].name, "Natal");
    }
}
