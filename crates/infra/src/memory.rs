//! In-memory repositories
//!
//! Same semantics as the SQLite adapters, kept in `parking_lot` maps. Used
//! by the memory storage backend and as a fast test double.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use clubsched_core::{EventRepository, PatternRepository};
use clubsched_domain::{ClubSchedError, GeneratedEventInstance, RecurrencePattern, Result};
use parking_lot::RwLock;
use uuid::Uuid;

/// Pattern store keyed by id
#[derive(Debug, Default)]
pub struct InMemoryPatternRepository {
    patterns: RwLock<BTreeMap<String, RecurrencePattern>>,
}

impl InMemoryPatternRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PatternRepository for InMemoryPatternRepository {
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
        let mut patterns = self.patterns.write();
        let mut incoming = HashSet::new();
        for pattern in batch {
            if patterns.contains_key(pattern.id()) || !incoming.insert(pattern.id()) {
                return Err(ClubSchedError::InvalidInput(format!(
                    "pattern {} already exists",
                    pattern.id()
                )));
            }
        }
        for pattern in batch {
            patterns.insert(pattern.id().to_string(), pattern.clone());
        }
        Ok(())
    }

    async fn deactivate_pattern(&self, id: &str) -> Result<()> {
        let mut patterns = self.patterns.write();
        let pattern = patterns
            .get_mut(id)
            .ok_or_else(|| ClubSchedError::NotFound(format!("pattern {id}")))?;
        *pattern = pattern.deactivated();
        Ok(())
    }

    async fn replace_pattern(&self, revised: &RecurrencePattern) -> Result<()> {
        let mut patterns = self.patterns.write();
        if let Some(previous) = revised.supersedes() {
            let old = patterns
                .get_mut(previous)
                .ok_or_else(|| ClubSchedError::NotFound(format!("pattern {previous}")))?;
            *old = old.deactivated();
        }
        patterns.insert(revised.id().to_string(), revised.clone());
        Ok(())
    }
}

/// Event store keyed by instance id; duplicates are ignored
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    events: RwLock<BTreeMap<Uuid, GeneratedEventInstance>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn upsert_events(&self, events: &[GeneratedEventInstance]) -> Result<usize> {
        let mut stored = self.events.write();
        let mut inserted = 0;
        for event in events {
            if !stored.contains_key(&event.id) {
                stored.insert(event.id, event.clone());
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
        if end < start {
            return Err(ClubSchedError::InvalidInput(format!(
                "range end {end} is before start {start}"
            )));
        }
        let mut events: Vec<_> = self
            .events
            .read()
            .values()
            .filter(|e| (start..=end).contains(&e.date))
            .cloned()
            .collect();
        events.sort_by_key(|e| (e.date, e.start_time, e.id));
        Ok(events)
    }
}
