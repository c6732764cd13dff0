use chrono::NaiveDate;
use clubsched_domain::{EventType, PatternRecord, RecurrenceKind, RecurrencePattern};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Weekly record on `day_of_week` (0 = Sunday).
pub fn weekly(id: &str, day_of_week: i64) -> PatternRecord {
    PatternRecord {
        id: Some(id.to_string()),
        title: format!("{id} practice"),
        location: "School gym".into(),
        description: None,
        start_time: "18:00".into(),
        end_time: "20:00".into(),
        event_type: EventType::Practice,
        kind: RecurrenceKind::Weekly,
        day_of_week,
        week_of_month: None,
        skip_holidays: false,
        valid_from: date(2020, 1, 1),
        valid_until: None,
        is_active: true,
        supersedes: None,
    }
}

/// Monthly record on the `week_of_month`-th `day_of_week`.
pub fn monthly(id: &str, day_of_week: i64, week_of_month: i64) -> PatternRecord {
    PatternRecord {
        kind: RecurrenceKind::Monthly,
        week_of_month: Some(week_of_month),
        event_type: EventType::Game,
        title: format!("{id} match"),
        ..weekly(id, day_of_week)
    }
}

pub fn skipping_holidays(mut record: PatternRecord) -> PatternRecord {
    record.skip_holidays = true;
    record
}

pub fn pattern(record: PatternRecord) -> RecurrencePattern {
    RecurrencePattern::new(record).unwrap()
}
