//! Holidays and member leaves: the calendar inputs of plan computation.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HolidayCategory {
    National,
    MassLeave,
}

/// A public holiday. `year` is derived from `date`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawHoliday")]
pub struct Holiday {
    pub id: String,
    pub date: NaiveDate,
    pub name: String,
    pub category: HolidayCategory,
    year: i32,
}

#[derive(Deserialize)]
struct RawHoliday {
    id: String,
    date: NaiveDate,
    name: String,
    category: HolidayCategory,
}

impl From<RawHoliday> for Holiday {
    fn from(raw: RawHoliday) -> Self {
        Holiday::new(raw.id, raw.date, raw.name, raw.category)
    }
}

impl Holiday {
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        name: impl Into<String>,
        category: HolidayCategory,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            name: name.into(),
            category,
            year: date.year(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }
}

/// A member's leave, inclusive on both ends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leave {
    pub id: String,
    pub member_id: String,
    /// Name at the time the leave was recorded.
    pub member_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Leave {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}
