//! Explicit handling of unknown holiday status.

use chrono::NaiveDate;
use clubsched_domain::{HolidayFallback, HolidayFetchError};
use tracing::warn;

use super::ports::HolidayCalendar;

/// Answer for a date whose holiday status is unknown.
///
/// `Defer` hands the error back; `FailOpen` treats the date as an ordinary
/// day; `FailClosed` treats it as a holiday.
pub fn apply_fallback(
    err: HolidayFetchError,
    fallback: HolidayFallback,
) -> Result<bool, HolidayFetchError> {
    match fallback {
        HolidayFallback::Defer => Err(err),
        HolidayFallback::FailOpen => Ok(false),
        HolidayFallback::FailClosed => Ok(true),
    }
}

/// Whether `date` is a holiday, falling back to `fallback` when the
/// calendar cannot tell.
pub async fn resolve_is_holiday(
    calendar: &dyn HolidayCalendar,
    date: NaiveDate,
    fallback: HolidayFallback,
) -> Result<bool, HolidayFetchError> {
    match calendar.is_holiday(date).await {
        Ok(is_holiday) => Ok(is_holiday),
        Err(err) => {
            warn!(%date, error = %err, policy = %fallback, "holiday status unknown");
            apply_fallback(err, fallback)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use clubsched_domain::{FetchFailure, Holiday, HolidaySet};

    use super::*;

    struct FixedCalendar(Option<Arc<HolidaySet>>);

    #[async_trait]
    impl HolidayCalendar for FixedCalendar {
        async fn holidays(&self, year: i32) -> Result<Arc<HolidaySet>, HolidayFetchError> {
            self.0
                .clone()
                .ok_or_else(|| HolidayFetchError::new(year, FetchFailure::Timeout))
        }
    }

    fn new_year_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn calendar_with_new_year() -> FixedCalendar {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let set = HolidaySet::new(
            2024,
            vec![Holiday::new(new_year_2024(), "New Year's Day")],
            now,
            now + chrono::Duration::days(1),
        );
        FixedCalendar(Some(Arc::new(set)))
    }

    #[tokio::test]
    async fn known_status_ignores_policy() {
        let calendar = calendar_with_new_year();
        for policy in [HolidayFallback::Defer, HolidayFallback::FailOpen, HolidayFallback::FailClosed]
        {
            assert!(resolve_is_holiday(&calendar, new_year_2024(), policy).await.unwrap());
        }
    }

    #[tokio::test]
    async fn defer_propagates_fetch_error() {
        let calendar = FixedCalendar(None);
        let err = resolve_is_holiday(&calendar, new_year_2024(), HolidayFallback::Defer)
            .await
            .unwrap_err();
        assert_eq!(err.year, 2024);
        assert_eq!(err.failure, FetchFailure::Timeout);
    }

    #[tokio::test]
    async fn fail_open_treats_unknown_as_ordinary_day() {
        let calendar = FixedCalendar(None);
        let result =
            resolve_is_holiday(&calendar, new_year_2024(), HolidayFallback::FailOpen).await;
        assert_eq!(result, Ok(false));
    }

    #[tokio::test]
    async fn fail_closed_treats_unknown_as_holiday() {
        let calendar = FixedCalendar(None);
        let result =
            resolve_is_holiday(&calendar, new_year_2024(), HolidayFallback::FailClosed).await;
        assert_eq!(result, Ok(true));
    }
}
