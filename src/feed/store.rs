//! The ordered, id-unique collection of records currently displayed.

use crate::api::{EventId, EventRecord};

/// Element order is exactly batch-arrival order: the reset batch first, then
/// each appended batch in sequence. The store never re-sorts.
#[derive(Debug)]
pub struct FeedStore {
    events: Vec<EventRecord>,
    has_more: bool,
}

impl FeedStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            has_more: true,
        }
    }

    /// Replace the whole list with a page-1 batch.
    pub fn reset(&mut self, records: Vec<EventRecord>) {
        self.events.clear();
        for record in records {
            if self.contains(record.id) {
                tracing::debug!(id = record.id, "dropping duplicate id in reset batch");
                continue;
            }
            self.events.push(record);
        }
    }

    /// Append a page>1 batch in the order received, skipping ids already
    /// present so the uniqueness invariant holds even when server pages
    /// overlap. Returns how many records were actually added.
    pub fn append(&mut self, records: Vec<EventRecord>) -> usize {
        let before = self.events.len();
        for record in records {
            if self.contains(record.id) {
                tracing::debug!(id = record.id, "skipping already-listed id in append batch");
                continue;
            }
            self.events.push(record);
        }
        self.events.len() - before
    }

    pub fn remove_by_id(&mut self, id: EventId) -> bool {
        let before = self.events.len();
        self.events.retain(|event| event.id != id);
        self.events.len() != before
    }

    /// Apply a patch to the record with the given id. Returns false when the
    /// id is no longer listed (e.g. a fetch replaced the list in between).
    pub fn mutate_by_id(&mut self, id: EventId, patch: impl FnOnce(&mut EventRecord)) -> bool {
        match self.events.iter_mut().find(|event| event.id == id) {
            Some(event) => {
                patch(event);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: EventId) -> Option<&EventRecord> {
        self.events.iter().find(|event| event.id == id)
    }

    pub fn contains(&self, id: EventId) -> bool {
        self.events.iter().any(|event| event.id == id)
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn set_has_more(&mut self, has_more: bool) {
        self.has_more = has_more;
    }
}

impl Default for FeedStore {
    fn default() -> Self {
        Self::new()
    }
}
