//! Holiday table sources

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Datelike;
use clubsched_core::HolidayProvider;
use clubsched_domain::constants::YEAR_PLACEHOLDER;
use clubsched_domain::{
    parse_iso_holiday_map, ClubSchedError, FetchFailure, Holiday, HolidayConfig, HolidayFetchError,
};
use reqwest::Method;
use tracing::{info, instrument};

use crate::errors::fetch_failure_from_http;
use crate::http::HttpClient;

/// Fetches holiday tables from a JSON feed of `{"YYYY-MM-DD": "name"}`.
#[derive(Clone)]
pub struct HttpHolidayProvider {
    http: HttpClient,
    endpoint: String,
}

impl HttpHolidayProvider {
    /// `endpoint` must contain the `{year}` placeholder.
    pub fn new(endpoint: impl Into<String>, http: HttpClient) -> Result<Self, ClubSchedError> {
        let endpoint = endpoint.into();
        if !endpoint.contains(YEAR_PLACEHOLDER) {
            return Err(ClubSchedError::Config(format!(
                "holiday endpoint must contain {YEAR_PLACEHOLDER}: {endpoint}"
            )));
        }
        Ok(Self { http, endpoint })
    }

    pub fn from_config(config: &HolidayConfig) -> Result<Self, ClubSchedError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .max_attempts(config.max_attempts)
            .base_backoff(Duration::from_millis(config.backoff_millis))
            .user_agent(concat!("clubsched/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::new(config.endpoint.clone(), http)
    }

    pub fn url_for(&self, year: i32) -> String {
        self.endpoint.replace(YEAR_PLACEHOLDER, &year.to_string())
    }
}

#[async_trait]
impl HolidayProvider for HttpHolidayProvider {
    #[instrument(skip(self))]
    async fn fetch_holidays(&self, year: i32) -> Result<Vec<Holiday>, HolidayFetchError> {
        let url = self.url_for(year);
        let fail = |failure| HolidayFetchError::new(year, failure);

        let response = self
            .http
            .execute(self.http.request(Method::GET, url.as_str()))
            .await
            .map_err(|err| fail(fetch_failure_from_http(&err)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fail(FetchFailure::Status(status.as_u16())));
        }

        let entries: HashMap<String, String> =
            response.json().await.map_err(|err| fail(fetch_failure_from_http(&err)))?;
        let holidays = parse_iso_holiday_map(year, entries).map_err(fail)?;

        info!(year, count = holidays.len(), "fetched holiday table");
        Ok(holidays)
    }
}

/// Fixed in-process holiday table.
///
/// Years without entries answer with an empty table, never an error.
#[derive(Debug, Clone, Default)]
pub struct StaticHolidayProvider {
    years: HashMap<i32, Vec<Holiday>>,
}

impl StaticHolidayProvider {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_holidays(holidays: impl IntoIterator<Item = Holiday>) -> Self {
        let mut years: HashMap<i32, Vec<Holiday>> = HashMap::new();
        for holiday in holidays {
            years.entry(holiday.date.year()).or_default().push(holiday);
        }
        for list in years.values_mut() {
            list.sort_by_key(|h| h.date);
        }
        Self { years }
    }
}

#[async_trait]
impl HolidayProvider for StaticHolidayProvider {
    async fn fetch_holidays(&self, year: i32) -> Result<Vec<Holiday>, HolidayFetchError> {
        Ok(self.years.get(&year).cloned().unwrap_or_default())
    }
}
