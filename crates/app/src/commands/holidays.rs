//! `holidays`

use std::fmt;

use chrono::NaiveDate;
use clubsched_core::HolidayCalendar;
use clubsched_domain::Result;
use serde::Serialize;

use crate::context::AppContext;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HolidayEntry {
    pub date: NaiveDate,
    pub name: String,
}

/// Holidays of one year, in date order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HolidayListing {
    pub year: i32,
    pub holidays: Vec<HolidayEntry>,
}

impl fmt::Display for HolidayListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} holiday(s)", self.year, self.holidays.len())?;
        for holiday in &self.holidays {
            write!(f, "\n  {}  {}", holiday.date, holiday.name)?;
        }
        Ok(())
    }
}

pub async fn list(ctx: &AppContext, year: i32) -> Result<HolidayListing> {
    let set = ctx.calendar.holidays(year).await?;
    let holidays = set
        .iter()
        .map(|(date, name)| HolidayEntry { date, name: name.to_string() })
        .collect();
    Ok(HolidayListing { year, holidays })
}
