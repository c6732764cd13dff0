//! Recurrence patterns: the declarative rules events are generated from.
//!
//! A [`RecurrencePattern`] can only be obtained through validation, either
//! [`RecurrencePattern::new`] or deserialisation (which goes through the same
//! constructor). Weekly and monthly rules are an explicit [`Recurrence`] sum
//! type; the flat `kind` / `dayOfWeek` / `weekOfMonth` shape only exists on
//! the wire as [`PatternRecord`].

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::MAX_WEEK_OF_MONTH;
use crate::errors::{PatternField, ValidationError};
use crate::impl_domain_status_conversions;
use crate::types::calendar::{weekday_from_index, weekday_index, TimeOfDay};

/// What kind of club event a pattern produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Practice,
    Game,
    Other,
}

impl_domain_status_conversions!(EventType {
    Practice => "practice",
    Game => "game",
    Other => "other",
});

/// Discriminant of [`Recurrence`], as stored in pattern records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    Weekly,
    Monthly,
}

impl_domain_status_conversions!(RecurrenceKind {
    Weekly => "weekly",
    Monthly => "monthly",
});

/// The recurrence rule of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recurrence {
    /// Every week on `weekday`.
    Weekly { weekday: Weekday },
    /// The `week_of_month`-th `weekday` of every month (1-based, at most 4).
    Monthly { weekday: Weekday, week_of_month: u8 },
}

impl Recurrence {
    pub fn kind(&self) -> RecurrenceKind {
        match self {
            Self::Weekly { .. } => RecurrenceKind::Weekly,
            Self::Monthly { .. } => RecurrenceKind::Monthly,
        }
    }

    pub fn weekday(&self) -> Weekday {
        match *self {
            Self::Weekly { weekday } | Self::Monthly { weekday, .. } => weekday,
        }
    }

    pub fn week_of_month(&self) -> Option<u8> {
        match *self {
            Self::Weekly { .. } => None,
            Self::Monthly { week_of_month, .. } => Some(week_of_month),
        }
    }
}

/// Flat, unvalidated pattern as written by administrators and stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternRecord {
    /// Stable identifier; a fresh one is assigned when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub event_type: EventType,
    pub kind: RecurrenceKind,
    pub day_of_week: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_of_month: Option<i64>,
    #[serde(default)]
    pub skip_holidays: bool,
    pub valid_from: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Id of the pattern version this one replaced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supersedes: Option<String>,
}

fn default_active() -> bool {
    true
}

/// A validated, immutable recurrence pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PatternRecord", into = "PatternRecord")]
pub struct RecurrencePattern {
    id: String,
    title: String,
    location: String,
    description: Option<String>,
    start_time: TimeOfDay,
    end_time: TimeOfDay,
    event_type: EventType,
    recurrence: Recurrence,
    skip_holidays: bool,
    valid_from: NaiveDate,
    valid_until: Option<NaiveDate>,
    is_active: bool,
    supersedes: Option<String>,
}

impl RecurrencePattern {
    /// Validate a record into a pattern.
    ///
    /// Rejects, naming the offending field: a blank id or title, a
    /// `dayOfWeek` outside `0..=6`, a `weekOfMonth` that is missing for a
    /// monthly pattern, present for a weekly one or outside `1..=4`,
    /// malformed times, an end time not after the start time, and
    /// `validUntil` before `validFrom`.
    pub fn new(record: PatternRecord) -> Result<Self, ValidationError> {
        let id = match record.id {
            Some(id) if id.trim().is_empty() => {
                return Err(ValidationError::new(PatternField::Id, "must not be blank"));
            }
            Some(id) => id,
            None => Uuid::new_v4().to_string(),
        };

        let title = record.title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::new(PatternField::Title, "must not be blank"));
        }

        let weekday = u8::try_from(record.day_of_week)
            .ok()
            .and_then(weekday_from_index)
            .ok_or_else(|| {
                ValidationError::new(
                    PatternField::DayOfWeek,
                    format!("must be between 0 (Sunday) and 6, got {}", record.day_of_week),
                )
            })?;

        let recurrence = match (record.kind, record.week_of_month) {
            (RecurrenceKind::Weekly, None) => Recurrence::Weekly { weekday },
            (RecurrenceKind::Weekly, Some(_)) => {
                return Err(ValidationError::new(
                    PatternField::WeekOfMonth,
                    "only allowed for monthly patterns",
                ));
            }
            (RecurrenceKind::Monthly, None) => {
                return Err(ValidationError::new(
                    PatternField::WeekOfMonth,
                    "required for monthly patterns",
                ));
            }
            (RecurrenceKind::Monthly, Some(week)) => {
                let week_of_month = u8::try_from(week)
                    .ok()
                    .filter(|w| (1..=MAX_WEEK_OF_MONTH).contains(w))
                    .ok_or_else(|| {
                        ValidationError::new(
                            PatternField::WeekOfMonth,
                            format!("must be between 1 and {MAX_WEEK_OF_MONTH}, got {week}"),
                        )
                    })?;
                Recurrence::Monthly { weekday, week_of_month }
            }
        };

        let start_time = TimeOfDay::parse(&record.start_time)
            .map_err(|msg| ValidationError::new(PatternField::StartTime, msg))?;
        let end_time = TimeOfDay::parse(&record.end_time)
            .map_err(|msg| ValidationError::new(PatternField::EndTime, msg))?;
        if end_time <= start_time {
            return Err(ValidationError::new(
                PatternField::EndTime,
                format!("must be after start time {start_time}"),
            ));
        }

        if let Some(until) = record.valid_until {
            if until < record.valid_from {
                return Err(ValidationError::new(
                    PatternField::ValidUntil,
                    format!("{until} is before validFrom {}", record.valid_from),
                ));
            }
        }

        Ok(Self {
            id,
            title,
            location: record.location,
            description: record.description.filter(|d| !d.trim().is_empty()),
            start_time,
            end_time,
            event_type: record.event_type,
            recurrence,
            skip_holidays: record.skip_holidays,
            valid_from: record.valid_from,
            valid_until: record.valid_until,
            is_active: record.is_active,
            supersedes: record.supersedes,
        })
    }

    /// Validate an edited record as the next version of this pattern.
    ///
    /// The new version gets a fresh id, points back at `self` through
    /// `supersedes` and is active; `self` is left untouched.
    pub fn revise(&self, mut record: PatternRecord) -> Result<Self, ValidationError> {
        record.id = Some(Uuid::new_v4().to_string());
        record.supersedes = Some(self.id.clone());
        record.is_active = true;
        Self::new(record)
    }

    /// Copy of this pattern with `is_active` cleared, kept for history.
    pub fn deactivated(&self) -> Self {
        Self { is_active: false, ..self.clone() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn start_time(&self) -> TimeOfDay {
        self.start_time
    }

    pub fn end_time(&self) -> TimeOfDay {
        self.end_time
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn recurrence(&self) -> Recurrence {
        self.recurrence
    }

    pub fn skip_holidays(&self) -> bool {
        self.skip_holidays
    }

    pub fn valid_from(&self) -> NaiveDate {
        self.valid_from
    }

    pub fn valid_until(&self) -> Option<NaiveDate> {
        self.valid_until
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn supersedes(&self) -> Option<&str> {
        self.supersedes.as_deref()
    }

    /// Whether `date` lies inside `[validFrom, validUntil]`.
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        date >= self.valid_from && self.valid_until.map_or(true, |until| date <= until)
    }

    /// Flat record form, the inverse of [`RecurrencePattern::new`].
    pub fn to_record(&self) -> PatternRecord {
        PatternRecord::from(self.clone())
    }
}

impl TryFrom<PatternRecord> for RecurrencePattern {
    type Error = ValidationError;

    fn try_from(record: PatternRecord) -> Result<Self, Self::Error> {
        Self::new(record)
    }
}

impl From<RecurrencePattern> for PatternRecord {
    fn from(pattern: RecurrencePattern) -> Self {
        Self {
            id: Some(pattern.id),
            title: pattern.title,
            location: pattern.location,
            description: pattern.description,
            start_time: pattern.start_time.to_string(),
            end_time: pattern.end_time.to_string(),
            event_type: pattern.event_type,
            kind: pattern.recurrence.kind(),
            day_of_week: i64::from(weekday_index(pattern.recurrence.weekday())),
            week_of_month: pattern.recurrence.week_of_month().map(i64::from),
            skip_holidays: pattern.skip_holidays,
            valid_from: pattern.valid_from,
            valid_until: pattern.valid_until,
            is_active: pattern.is_active,
            supersedes: pattern.supersedes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekly_record() -> PatternRecord {
        PatternRecord {
            id: Some("tue-practice".into()),
            title: "Tuesday practice".into(),
            location: "Main gym".into(),
            description: None,
            start_time: "18:00".into(),
            end_time: "20:00".into(),
            event_type: EventType::Practice,
            kind: RecurrenceKind::Weekly,
            day_of_week: 2,
            week_of_month: None,
            skip_holidays: false,
            valid_from: date(2024, 1, 1),
            valid_until: None,
            is_active: true,
            supersedes: None,
        }
    }

    fn rejected_field(record: PatternRecord) -> PatternField {
        RecurrencePattern::new(record).unwrap_err().field
    }

    #[test]
    fn valid_weekly_pattern_builds() {
        let pattern = RecurrencePattern::new(weekly_record()).unwrap();
        assert_eq!(pattern.id(), "tue-practice");
        assert_eq!(pattern.recurrence(), Recurrence::Weekly { weekday: Weekday::Tue });
        assert_eq!(pattern.start_time().to_string(), "18:00");
    }

    #[test]
    fn valid_monthly_pattern_builds() {
        let record = PatternRecord {
            kind: RecurrenceKind::Monthly,
            day_of_week: 1,
            week_of_month: Some(3),
            ..weekly_record()
        };
        let pattern = RecurrencePattern::new(record).unwrap();
        assert_eq!(
            pattern.recurrence(),
            Recurrence::Monthly { weekday: Weekday::Mon, week_of_month: 3 }
        );
    }

    #[test]
    fn missing_id_gets_generated() {
        let pattern = RecurrencePattern::new(PatternRecord { id: None, ..weekly_record() }).unwrap();
        assert!(Uuid::parse_str(pattern.id()).is_ok());
    }

    #[test]
    fn week_of_month_must_match_kind() {
        let weekly_with_week = PatternRecord { week_of_month: Some(1), ..weekly_record() };
        assert_eq!(rejected_field(weekly_with_week), PatternField::WeekOfMonth);

        let monthly_without_week =
            PatternRecord { kind: RecurrenceKind::Monthly, ..weekly_record() };
        assert_eq!(rejected_field(monthly_without_week), PatternField::WeekOfMonth);

        for week in [0, 5, -1] {
            let out_of_range = PatternRecord {
                kind: RecurrenceKind::Monthly,
                week_of_month: Some(week),
                ..weekly_record()
            };
            assert_eq!(rejected_field(out_of_range), PatternField::WeekOfMonth);
        }
    }

    #[test]
    fn day_of_week_out_of_range_is_rejected() {
        for day in [-1, 7, 300] {
            let record = PatternRecord { day_of_week: day, ..weekly_record() };
            assert_eq!(rejected_field(record), PatternField::DayOfWeek);
        }
    }

    #[test]
    fn validity_window_must_be_ordered() {
        let record = PatternRecord {
            valid_from: date(2024, 5, 1),
            valid_until: Some(date(2024, 4, 30)),
            ..weekly_record()
        };
        assert_eq!(rejected_field(record), PatternField::ValidUntil);

        let same_day = PatternRecord {
            valid_from: date(2024, 5, 1),
            valid_until: Some(date(2024, 5, 1)),
            ..weekly_record()
        };
        assert!(RecurrencePattern::new(same_day).is_ok());
    }

    #[test]
    fn times_are_validated() {
        let bad_start = PatternRecord { start_time: "6pm".into(), ..weekly_record() };
        assert_eq!(rejected_field(bad_start), PatternField::StartTime);

        let inverted = PatternRecord { end_time: "17:00".into(), ..weekly_record() };
        assert_eq!(rejected_field(inverted), PatternField::EndTime);
    }

    #[test]
    fn blank_title_is_rejected() {
        let record = PatternRecord { title: "   ".into(), ..weekly_record() };
        assert_eq!(rejected_field(record), PatternField::Title);
    }

    #[test]
    fn deserialization_validates() {
        let json = r#"{
            "id": "first-monday",
            "title": "Committee meeting",
            "location": "Clubhouse",
            "startTime": "19:00",
            "endTime": "21:00",
            "eventType": "other",
            "kind": "monthly",
            "dayOfWeek": 1,
            "weekOfMonth": 1,
            "skipHolidays": true,
            "validFrom": "2024-01-01"
        }"#;
        let pattern: RecurrencePattern = serde_json::from_str(json).unwrap();
        assert!(pattern.is_active());
        assert!(pattern.skip_holidays());

        let invalid = json.replace(r#""weekOfMonth": 1,"#, "");
        let err = serde_json::from_str::<RecurrencePattern>(&invalid).unwrap_err();
        assert!(err.to_string().contains("weekOfMonth"));
    }

    #[test]
    fn record_round_trip_preserves_fields() {
        let pattern = RecurrencePattern::new(weekly_record()).unwrap();
        let again = RecurrencePattern::new(pattern.to_record()).unwrap();
        assert_eq!(pattern, again);
    }

    #[test]
    fn revise_creates_a_new_version() {
        let original = RecurrencePattern::new(weekly_record()).unwrap();
        let edited = PatternRecord { start_time: "18:30".into(), ..original.to_record() };

        let revised = original.revise(edited).unwrap();

        assert_ne!(revised.id(), original.id());
        assert_eq!(revised.supersedes(), Some(original.id()));
        assert_eq!(revised.start_time().to_string(), "18:30");
        assert_eq!(original.start_time().to_string(), "18:00");
    }

    #[test]
    fn validity_window_is_inclusive() {
        let record = PatternRecord {
            valid_from: date(2024, 4, 10),
            valid_until: Some(date(2024, 4, 20)),
            ..weekly_record()
        };
        let pattern = RecurrencePattern::new(record).unwrap();
        assert!(!pattern.is_valid_on(date(2024, 4, 9)));
        assert!(pattern.is_valid_on(date(2024, 4, 10)));
        assert!(pattern.is_valid_on(date(2024, 4, 20)));
        assert!(!pattern.is_valid_on(date(2024, 4, 21)));
    }
}
