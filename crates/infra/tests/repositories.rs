//! Pattern and event storage, run against both backends.

mod support;

use std::sync::Arc;

use clubsched_core::{EventRepository, PatternRepository};
use clubsched_domain::{ClubSchedError, GeneratedEventInstance, StorageBackend};
use clubsched_infra::{DbManager, Repositories};
use support::*;
use tempfile::TempDir;

/// Both backends; the temp dir guard keeps the SQLite file alive.
fn backends() -> Vec<(Repositories, Option<TempDir>)> {
    let (db, dir) = temp_db();
    vec![(Repositories::sqlite(db), Some(dir)), (Repositories::memory(), None)]
}

fn instances(pattern_id: &str, days: &[u32]) -> Vec<GeneratedEventInstance> {
    let pattern = weekly(pattern_id, 1);
    days.iter()
        .map(|&day| GeneratedEventInstance::from_pattern(&pattern, date(2024, 1, day)))
        .collect()
}

#[tokio::test]
async fn saved_pattern_round_trips() {
    for (repos, _guard) in backends() {
        let patterns = repos.patterns();
        let pattern = skipping_holidays(monthly("league", 6, 2));

        patterns.save_pattern(&pattern).await.unwrap();

        let loaded = patterns.get_pattern("league").await.unwrap();
        assert_eq!(loaded, Some(pattern), "backend {}", repos.backend());
        assert_eq!(patterns.get_pattern("missing").await.unwrap(), None);
    }
}

#[tokio::test]
async fn saving_again_updates_in_place() {
    for (repos, _guard) in backends() {
        let patterns = repos.patterns();
        patterns.save_pattern(&weekly("monday", 1)).await.unwrap();

        let mut record = weekly("monday", 1).to_record();
        record.title = "Monday practice (new gym)".into();
        let updated = clubsched_domain::RecurrencePattern::new(record).unwrap();
        patterns.save_pattern(&updated).await.unwrap();

        let all = patterns.list_patterns().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title(), "Monday practice (new gym)");
    }
}

#[tokio::test]
async fn active_listing_excludes_deactivated_patterns() {
    for (repos, _guard) in backends() {
        let patterns = repos.patterns();
        patterns.save_pattern(&weekly("a-monday", 1)).await.unwrap();
        patterns.save_pattern(&weekly("b-thursday", 4)).await.unwrap();

        patterns.deactivate_pattern("a-monday").await.unwrap();

        let active: Vec<_> =
            patterns.list_active_patterns().await.unwrap().iter().map(|p| p.id().to_string()).collect();
        assert_eq!(active, vec!["b-thursday"]);
        let all: Vec<_> =
            patterns.list_patterns().await.unwrap().iter().map(|p| p.id().to_string()).collect();
        assert_eq!(all, vec!["a-monday", "b-thursday"]);
    }
}

#[tokio::test]
async fn deactivating_unknown_pattern_is_not_found() {
    for (repos, _guard) in backends() {
        let err = repos.patterns().deactivate_pattern("ghost").await.unwrap_err();
        assert!(matches!(err, ClubSchedError::NotFound(_)), "backend {}", repos.backend());
    }
}

#[tokio::test]
async fn replace_pattern_retires_previous_version() {
    for (repos, _guard) in backends() {
        let patterns = repos.patterns();
        let original = weekly("monday", 1);
        patterns.save_pattern(&original).await.unwrap();

        let mut draft = original.to_record();
        draft.start_time = "19:00".into();
        draft.end_time = "21:00".into();
        let revised = original.revise(draft).unwrap();
        patterns.replace_pattern(&revised).await.unwrap();

        let old = patterns.get_pattern("monday").await.unwrap().unwrap();
        assert!(!old.is_active());
        let active = patterns.list_active_patterns().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id(), revised.id());
        assert_eq!(active[0].supersedes(), Some("monday"));
    }
}

#[tokio::test]
async fn replace_with_unknown_predecessor_stores_nothing() {
    for (repos, _guard) in backends() {
        let patterns = repos.patterns();
        let orphan = weekly("ghost", 1).revise(weekly_record("draft", 2)).unwrap();

        let err = patterns.replace_pattern(&orphan).await.unwrap_err();

        assert!(matches!(err, ClubSchedError::NotFound(_)));
        assert!(patterns.list_patterns().await.unwrap().is_empty(), "backend {}", repos.backend());
    }
}

#[tokio::test]
async fn insert_patterns_stores_a_new_batch() {
    for (repos, _guard) in backends() {
        let patterns = repos.patterns();

        patterns.insert_patterns(&[weekly("a", 1), weekly("b", 2)]).await.unwrap();

        assert_eq!(patterns.list_patterns().await.unwrap().len(), 2, "backend {}", repos.backend());
    }
}

#[tokio::test]
async fn insert_patterns_rejects_existing_id_and_keeps_nothing() {
    for (repos, _guard) in backends() {
        let patterns = repos.patterns();
        patterns.save_pattern(&weekly("p1", 2)).await.unwrap();
        patterns.deactivate_pattern("p1").await.unwrap();

        let err = patterns.insert_patterns(&[weekly("fresh", 1), weekly("p1", 3)]).await.unwrap_err();

        assert!(matches!(err, ClubSchedError::InvalidInput(_)), "backend {}", repos.backend());
        assert_eq!(patterns.get_pattern("fresh").await.unwrap(), None);
        let kept = patterns.get_pattern("p1").await.unwrap().unwrap();
        assert_eq!(kept.recurrence().weekday(), chrono::Weekday::Tue);
        assert!(!kept.is_active());
    }
}

#[tokio::test]
async fn insert_patterns_rejects_repeated_id_in_batch() {
    for (repos, _guard) in backends() {
        let patterns = repos.patterns();

        let err = patterns.insert_patterns(&[weekly("twin", 1), weekly("twin", 4)]).await.unwrap_err();

        assert!(matches!(err, ClubSchedError::InvalidInput(_)));
        assert!(patterns.list_patterns().await.unwrap().is_empty(), "backend {}", repos.backend());
    }
}

#[tokio::test]
async fn upsert_ignores_already_stored_instances() {
    for (repos, _guard) in backends() {
        let events = repos.events();

        let first = events.upsert_events(&instances("monday", &[1, 8, 15])).await.unwrap();
        let second = events.upsert_events(&instances("monday", &[8, 15, 22])).await.unwrap();

        assert_eq!(first, 3);
        assert_eq!(second, 1, "backend {}", repos.backend());
        let stored = events.list_events_in_range(date(2024, 1, 1), date(2024, 1, 31)).await.unwrap();
        assert_eq!(stored.len(), 4);
    }
}

#[tokio::test]
async fn range_listing_is_inclusive_and_ordered() {
    for (repos, _guard) in backends() {
        let events = repos.events();
        let mut batch = instances("monday", &[22, 1, 15]);
        batch.extend(instances("another", &[15]));
        events.upsert_events(&batch).await.unwrap();

        let listed = events.list_events_in_range(date(2024, 1, 1), date(2024, 1, 15)).await.unwrap();

        let dates: Vec<_> = listed.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 15), date(2024, 1, 15)]);
        assert_eq!(listed[0], batch[1]);
    }
}

#[tokio::test]
async fn inverted_range_is_rejected() {
    for (repos, _guard) in backends() {
        let err = repos
            .events()
            .list_events_in_range(date(2024, 2, 1), date(2024, 1, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ClubSchedError::InvalidInput(_)));
    }
}

#[tokio::test]
async fn empty_upsert_is_a_no_op() {
    for (repos, _guard) in backends() {
        assert_eq!(repos.events().upsert_events(&[]).await.unwrap(), 0);
    }
}

#[tokio::test]
async fn sqlite_data_survives_reopening() {
    let (db, dir) = temp_db();
    let path = db.path().to_path_buf();
    {
        let repos = Repositories::sqlite(db);
        repos.patterns().save_pattern(&weekly("monday", 1)).await.unwrap();
        repos.events().upsert_events(&instances("monday", &[1])).await.unwrap();
    }

    let reopened = DbManager::new(&path, 1).unwrap();
    reopened.run_migrations().unwrap();
    let repos = Repositories::sqlite(Arc::new(reopened));

    assert!(repos.patterns().get_pattern("monday").await.unwrap().is_some());
    let events = repos.events().list_events_in_range(date(2024, 1, 1), date(2024, 1, 1)).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(repos.backend(), StorageBackend::Sqlite);
    repos.health_check().unwrap();
    drop(dir);
}
