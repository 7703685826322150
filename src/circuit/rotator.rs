//! Round-robin rotation over the study circuit
//!
//! The cursor is never stored. The slot to study is whichever one carries
//! [`StudyStatus::Next`], found by scanning, so inserts, deletes and reorders
//! between sessions shift who comes next without any bookkeeping.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::{CircuitItem, MoveDirection, StudyStatus};

/// Ordered study circuit with a single NEXT marker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CircuitRotator {
    items: Vec<CircuitItem>,
}

impl CircuitRotator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a rotator from stored slots, repairing the status flags
    pub fn from_items(items: Vec<CircuitItem>) -> Self {
        let mut rotator = Self { items };
        rotator.normalize();
        rotator
    }

    /// Build a fresh circuit where the first subject is up next
    pub fn from_subjects<I, S>(subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rotator = Self::new();
        for subject in subjects {
            rotator.add(subject);
        }
        rotator
    }

    pub fn items(&self) -> &[CircuitItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&CircuitItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn index_of(&self, id: Uuid) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    fn next_index(&self) -> Option<usize> {
        self.items.iter().position(CircuitItem::is_next)
    }

    /// Index of the slot to study: the NEXT slot, or the first one if none is marked
    fn current_index(&self) -> Option<usize> {
        match self.next_index() {
            Some(index) => Some(index),
            None if self.items.is_empty() => None,
            None => Some(0),
        }
    }

    /// The slot to study now
    pub fn current(&self) -> Option<&CircuitItem> {
        self.current_index().map(|index| &self.items[index])
    }

    /// The slot that will follow the current one, wrapping around
    pub fn following(&self) -> Option<&CircuitItem> {
        let index = self.current_index()?;
        self.items.get((index + 1) % self.items.len())
    }

    /// Append a subject. It becomes NEXT only when the circuit was empty.
    pub fn add(&mut self, subject_name: impl Into<String>) -> Uuid {
        let status = if self.items.is_empty() {
            StudyStatus::Next
        } else {
            StudyStatus::Pending
        };
        let item = CircuitItem::new(subject_name.into(), status);
        let id = item.id;
        self.items.push(item);
        id
    }

    /// Insert a pending, never-studied copy right after `id`
    pub fn duplicate(&mut self, id: Uuid) -> Option<Uuid> {
        let index = self.index_of(id)?;
        let copy = self.items[index].duplicate();
        let copy_id = copy.id;
        self.items.insert(index + 1, copy);
        Some(copy_id)
    }

    /// Remove a slot. Returns false when the id is unknown or the slot is the
    /// last one left; the circuit never becomes empty through this call.
    pub fn delete(&mut self, id: Uuid) -> bool {
        if self.items.len() <= 1 {
            log::debug!("Refusing to delete the last circuit slot {}", id);
            return false;
        }
        let Some(index) = self.index_of(id) else {
            return false;
        };

        self.items.remove(index);
        if self.next_index().is_none() {
            if let Some(first) = self.items.first_mut() {
                first.status = StudyStatus::Next;
            }
        }
        true
    }

    /// Swap a slot with its neighbour. Moving the first slot up or the last
    /// slot down does nothing.
    pub fn move_item(&mut self, id: Uuid, direction: MoveDirection) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let target = match direction {
            MoveDirection::Up if index > 0 => index - 1,
            MoveDirection::Down if index + 1 < self.items.len() => index + 1,
            _ => return false,
        };
        self.items.swap(index, target);
        true
    }

    /// Zero every counter and restart the rotation at the first slot
    pub fn reset(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.study_count = 0;
            item.status = if index == 0 {
                StudyStatus::Next
            } else {
                StudyStatus::Pending
            };
        }
    }

    /// Mark `completed_id` as studied and move NEXT to the slot after it.
    ///
    /// Whatever was LAST_STUDIED goes back to PENDING, the completed slot
    /// becomes LAST_STUDIED with its counter bumped, and the slot at
    /// `(index + 1) % len` becomes the only NEXT. In a single-slot circuit the
    /// completed slot is immediately NEXT again.
    pub fn advance(&mut self, completed_id: Uuid) -> bool {
        let Some(index) = self.index_of(completed_id) else {
            return false;
        };

        for item in &mut self.items {
            if item.status == StudyStatus::LastStudied {
                item.status = StudyStatus::Pending;
            }
        }

        let completed = &mut self.items[index];
        completed.status = StudyStatus::LastStudied;
        completed.study_count = completed.study_count.saturating_add(1);

        let next = (index + 1) % self.items.len();
        for (i, item) in self.items.iter_mut().enumerate() {
            if i == next {
                item.status = StudyStatus::Next;
            } else if item.status == StudyStatus::Next {
                item.status = StudyStatus::Pending;
            }
        }
        true
    }

    /// Advance past the current slot and return its id
    pub fn complete_current(&mut self) -> Option<Uuid> {
        let id = self.current()?.id;
        self.advance(id);
        Some(id)
    }

    /// Repair status flags coming from an older or hand-edited snapshot:
    /// keep the first NEXT and the first LAST_STUDIED, and promote the first
    /// slot when nothing is marked NEXT.
    pub fn normalize(&mut self) {
        let mut seen_next = false;
        let mut seen_last = false;
        for item in &mut self.items {
            match item.status {
                StudyStatus::Next if seen_next => item.status = StudyStatus::Pending,
                StudyStatus::Next => seen_next = true,
                StudyStatus::LastStudied if seen_last => item.status = StudyStatus::Pending,
                StudyStatus::LastStudied => seen_last = true,
                StudyStatus::Pending => {}
            }
        }

        if !seen_next {
            if let Some(first) = self.items.first_mut() {
                first.status = StudyStatus::Next;
            }
        }
    }
}
