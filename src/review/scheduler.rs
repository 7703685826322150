//! Review card collection and due queue

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::algorithm::{self, MAX_STAGE};
use super::models::{Difficulty, ReviewCard, ReviewStats};

/// All review cards of a profile, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewScheduler {
    cards: Vec<ReviewCard>,
}

impl ReviewScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: Vec<ReviewCard>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[ReviewCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&ReviewCard> {
        self.cards.iter().find(|card| card.id == id)
    }

    fn get_mut(&mut self, id: Uuid) -> Option<&mut ReviewCard> {
        self.cards.iter_mut().find(|card| card.id == id)
    }

    /// Add a stage 1 card that is due immediately
    pub fn add_card(
        &mut self,
        subject: impl Into<String>,
        topic: impl Into<String>,
        notes: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Uuid {
        let card = ReviewCard::new(subject.into(), topic.into(), notes.into(), now);
        let id = card.id;
        self.cards.push(card);
        id
    }

    /// Record a review rated by difficulty
    pub fn grade(&mut self, id: Uuid, difficulty: Difficulty, now: DateTime<Utc>) -> bool {
        self.set_stage(id, difficulty.stage(), now)
    }

    /// Record a review with an explicit stage, clamped to `1..=4`
    pub fn set_stage(&mut self, id: Uuid, stage: u8, now: DateTime<Utc>) -> bool {
        let Some(card) = self.get_mut(id) else {
            return false;
        };
        card.stage = stage.clamp(1, MAX_STAGE);
        card.last_review_date = now;
        true
    }

    /// Record a review that moves the card one stage up
    pub fn promote(&mut self, id: Uuid, now: DateTime<Utc>) -> bool {
        let Some(card) = self.get_mut(id) else {
            return false;
        };
        card.stage = algorithm::promoted_stage(card.stage);
        card.last_review_date = now;
        true
    }

    pub fn delete_card(&mut self, id: Uuid) -> bool {
        let before = self.cards.len();
        self.cards.retain(|card| card.id != id);
        self.cards.len() != before
    }

    /// Cards due at `now`, optionally for one subject, in insertion order.
    ///
    /// Every call walks the current cards again, so the result can be
    /// requested as often as needed.
    pub fn due_cards<'a>(
        &'a self,
        now: DateTime<Utc>,
        subject: Option<&'a str>,
    ) -> impl Iterator<Item = &'a ReviewCard> + 'a {
        self.cards.iter().filter(move |card| {
            subject.map_or(true, |s| card.subject == s) && algorithm::is_due(card, now)
        })
    }

    pub fn due_count(&self, now: DateTime<Utc>) -> usize {
        self.due_cards(now, None).count()
    }

    pub fn progress_fraction(&self, card: &ReviewCard, now: DateTime<Utc>) -> f64 {
        algorithm::progress_fraction(card, now)
    }

    pub fn hours_left(&self, card: &ReviewCard, now: DateTime<Utc>) -> f64 {
        algorithm::hours_left(card, now)
    }

    /// Distinct subjects in first-seen order
    pub fn subjects(&self) -> Vec<&str> {
        let mut subjects: Vec<&str> = Vec::new();
        for card in &self.cards {
            if !subjects.contains(&card.subject.as_str()) {
                subjects.push(&card.subject);
            }
        }
        subjects
    }

    /// Cards grouped by subject, optionally only those at `stage`
    pub fn grouped_by_subject(&self, stage: Option<u8>) -> BTreeMap<&str, Vec<&ReviewCard>> {
        let mut groups: BTreeMap<&str, Vec<&ReviewCard>> = BTreeMap::new();
        for card in self
            .cards
            .iter()
            .filter(|card| stage.map_or(true, |s| card.stage == s))
        {
            groups.entry(card.subject.as_str()).or_default().push(card);
        }
        groups
    }

    pub fn stats(&self, now: DateTime<Utc>) -> ReviewStats {
        let mut stats = ReviewStats {
            total_cards: self.cards.len(),
            due_cards: self.due_count(now),
            ..ReviewStats::default()
        };
        for card in &self.cards {
            let slot = match card.stage {
                1..=MAX_STAGE => card.stage as usize,
                _ => 0,
            };
            stats.cards_by_stage[slot] += 1;
        }
        stats
    }
}
