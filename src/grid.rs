use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};

use crate::config::WeekStart;
use crate::datemath;

/// Week-aligned span of day cells covering one month plus leading and
/// trailing filler days from the adjacent months. `end` is exclusive and
/// `end - start == cell_count` days, always a multiple of 7.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub cell_count: usize,
    pub first_of_month: NaiveDate,
    pub last_of_month: NaiveDate,
}

impl GridRange {
    /// Derives the visible grid for a reference month.
    pub fn for_month(year: i32, month: u32, week_start: WeekStart) -> Self {
        let first_of_month = NaiveDate::from_ymd_opt(year, month, 1).expect("valid date");
        let last_of_month =
            first_of_month + Duration::days(days_in_month(year, month) as i64 - 1);

        let leading = weekday_index(first_of_month, week_start) as i64;
        let start = first_of_month - Duration::days(leading);

        let trailing = 6 - weekday_index(last_of_month, week_start) as i64;
        let end = last_of_month + Duration::days(trailing + 1);

        let cell_count = (end - start).num_days() as usize;

        Self {
            start,
            end,
            cell_count,
            first_of_month,
            last_of_month,
        }
    }

    /// Local midnight at the start of the range.
    pub fn start_dt(&self) -> DateTime<Local> {
        datemath::local_midnight(self.start)
    }

    /// Local midnight at the exclusive end of the range.
    pub fn end_dt(&self) -> DateTime<Local> {
        datemath::local_midnight(self.end)
    }

    /// The grid's days in cell order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take(self.cell_count)
    }
}

/// 0-based position of a day within its week under the given convention.
fn weekday_index(d: NaiveDate, week_start: WeekStart) -> u32 {
    match week_start {
        WeekStart::Monday => d.weekday().num_days_from_monday(),
        WeekStart::Sunday => d.weekday().num_days_from_sunday(),
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("valid date")
    .signed_duration_since(NaiveDate::from_ymd_opt(year, month, 1).expect("valid date"))
    .num_days() as u32
}
