//! In-memory implementations of the storage ports.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use clubsched_core::{EventRepository, PatternRepository};
use clubsched_domain::{ClubSchedError, GeneratedEventInstance, RecurrencePattern, Result};
use parking_lot::RwLock;

/// Pattern store, optionally failing every batch insert.
#[derive(Default)]
pub struct MockPatternRepository {
    patterns: RwLock<BTreeMap<String, RecurrencePattern>>,
    fail_inserts: bool,
}

impl MockPatternRepository {
    pub fn failing_inserts() -> Self {
        Self { fail_inserts: true, ..Self::default() }
    }

    pub fn with_patterns(patterns: impl IntoIterator<Item = RecurrencePattern>) -> Self {
        let repo = Self::default();
        {
            let mut map = repo.patterns.write();
            for p in patterns {
                map.insert(p.id().to_string(), p);
            }
        }
        repo
    }
}

#[async_trait]
impl PatternRepository for MockPatternRepository {
    async fn list_active_patterns(&self) -> Result<Vec<RecurrencePattern>> {
        Ok(self.patterns.read().values().filter(|p| p.is_active()).cloned().collect())
    }

    async fn list_patterns(&self) -> Result<Vec<RecurrencePattern>> {
        Ok(self.patterns.read().values().cloned().collect())
    }

    async fn get_pattern(&self, id: &str) -> Result<Option<RecurrencePattern>> {
        Ok(self.patterns.read().get(id).cloned())
    }

    async fn save_pattern(&self, pattern: &RecurrencePattern) -> Result<()> {
        self.patterns.write().insert(pattern.id().to_string(), pattern.clone());
        Ok(())
    }

    async fn insert_patterns(&self, batch: &[RecurrencePattern]) -> Result<()> {
        if self.fail_inserts {
            return Err(ClubSchedError::Database("database is locked".into()));
        }
        let mut map = self.patterns.write();
        if let Some(existing) = batch.iter().find(|p| map.contains_key(p.id())) {
            return Err(ClubSchedError::InvalidInput(format!(
                "pattern {} already exists",
                existing.id()
            )));
        }
        for p in batch {
            map.insert(p.id().to_string(), p.clone());
        }
        Ok(())
    }

    async fn deactivate_pattern(&self, id: &str) -> Result<()> {
        let mut map = self.patterns.write();
        let current = map
            .get(id)
            .ok_or_else(|| ClubSchedError::NotFound(format!("pattern {id}")))?
            .deactivated();
        map.insert(id.to_string(), current);
        Ok(())
    }
}

/// Event store that ignores duplicate ids, optionally failing every write.
#[derive(Default)]
pub struct MockEventRepository {
    events: RwLock<BTreeMap<String, GeneratedEventInstance>>,
    fail_writes: bool,
}

impl MockEventRepository {
    pub fn failing() -> Self {
        Self { fail_writes: true, ..Self::default() }
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }
}

#[async_trait]
impl EventRepository for MockEventRepository {
    async fn upsert_events(&self, events: &[GeneratedEventInstance]) -> Result<usize> {
        if self.fail_writes {
            return Err(ClubSchedError::Database("disk full".into()));
        }
        let mut map = self.events.write();
        let mut inserted = 0;
        for event in events {
            let key = event.id.to_string();
            if !map.contains_key(&key) {
                map.insert(key, event.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn list_events_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<GeneratedEventInstance>> {
        let mut events: Vec<_> = self
            .events
            .read()
            .values()
            .filter(|e| e.date >= start && e.date <= end)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.date);
        Ok(events)
    }
}
