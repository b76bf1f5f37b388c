use crate::data::Card;
use crate::direction::{Classification, Direction};
use log::{debug, info};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub card_id: String,
    pub classification: Classification,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommitTicket {
    pub index: usize,
    pub card_id: String,
    pub price: f64,
    pub direction: Direction,
    pub classification: Classification,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryEntry {
    pub card_id: String,
    pub price: f64,
    pub classification: Classification,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub entries: Vec<SummaryEntry>,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    cards: Vec<Card>,
    cursor: usize,
    committed: BTreeSet<usize>,
    history: Vec<HistoryEntry>,
    generation: u64,
    hint_seen: bool,
}

impl Session {
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            cards,
            cursor: 0,
            committed: BTreeSet::new(),
            history: Vec::new(),
            generation: 0,
            hint_seen: false,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn committed_count(&self) -> usize {
        self.committed.len()
    }

    pub fn is_committed(&self, index: usize) -> bool {
        self.committed.contains(&index)
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.cards.len()
    }

    pub fn accepts_input(&self, index: usize) -> bool {
        index == self.cursor && !self.is_finished() && !self.is_committed(index)
    }

    pub fn current(&self) -> Option<&Card> {
        self.cards.get(self.cursor)
    }

    pub fn progress(&self) -> (usize, usize) {
        let total = self.cards.len();
        ((self.cursor + 1).min(total), total)
    }

    pub fn hint_seen(&self) -> bool {
        self.hint_seen
    }

    pub fn mark_hint_seen(&mut self) {
        self.hint_seen = true;
    }

    /// Returns `None` without touching state when `index` is already committed
    /// or is not the card at the cursor.
    pub fn commit(&mut self, index: usize, direction: Direction) -> Option<CommitTicket> {
        if self.is_committed(index) {
            debug!("Ignoring duplicate commit for card {}", index);
            return None;
        }
        if index != self.cursor {
            debug!("Ignoring commit for card {} while cursor is {}", index, self.cursor);
            return None;
        }
        let card = self.cards.get(index)?;

        let classification = direction.classification();
        let card_id = card.id.clone();
        let price = card.price;

        self.committed.insert(index);
        self.history.push(HistoryEntry {
            card_id: card_id.clone(),
            classification,
        });
        info!(
            "Committed card {} ({}) swiped {} as {}",
            index,
            card_id,
            direction.as_str(),
            classification.as_str()
        );

        Some(CommitTicket {
            index,
            card_id,
            price,
            direction,
            classification,
            generation: self.generation,
        })
    }

    // Stale tickets from before a restart are ignored.
    pub fn advance(&mut self, ticket: &CommitTicket) -> bool {
        if ticket.generation != self.generation
            || ticket.index != self.cursor
            || !self.is_committed(ticket.index)
        {
            return false;
        }
        self.cursor = ticket.index + 1;
        debug!("Advanced to card {} of {}", self.cursor, self.cards.len());
        true
    }

    pub fn restart(&mut self) {
        self.cursor = 0;
        self.committed.clear();
        self.history.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn summary(&self) -> Summary {
        let entries = self
            .history
            .iter()
            .map(|entry| SummaryEntry {
                card_id: entry.card_id.clone(),
                price: self
                    .cards
                    .iter()
                    .find(|card| card.id == entry.card_id)
                    .map(|card| card.price)
                    .unwrap_or_default(),
                classification: entry.classification,
                label: entry.classification.label(),
            })
            .collect();
        Summary { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(ids: &[&str]) -> Vec<Card> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| Card {
                id: id.to_string(),
                image_ref: format!("/img/{}.png", id),
                price: 10.0 * (i + 1) as f64,
            })
            .collect()
    }

    fn commit_and_advance(session: &mut Session, direction: Direction) -> CommitTicket {
        let ticket = session.commit(session.cursor(), direction).unwrap();
        assert!(session.advance(&ticket));
        ticket
    }

    #[test]
    fn commit_appends_history_and_keeps_cursor_until_advance() {
        let mut session = Session::new(cards(&["A", "B"]));
        let ticket = session.commit(0, Direction::Right).unwrap();

        assert_eq!(ticket.classification, Classification::Fair);
        assert_eq!(ticket.card_id, "A");
        assert_eq!(ticket.price, 10.0);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.history().len(), 1);
        assert!(!session.accepts_input(0));

        assert!(session.advance(&ticket));
        assert_eq!(session.cursor(), 1);
        assert!(session.accepts_input(1));
    }

    #[test]
    fn duplicate_commit_is_noop() {
        let mut session = Session::new(cards(&["A", "B"]));
        assert!(session.commit(0, Direction::Up).is_some());
        assert!(session.commit(0, Direction::Left).is_none());
        assert!(session.commit(0, Direction::Up).is_none());

        assert_eq!(session.history().len(), 1);
        assert_eq!(session.committed_count(), 1);
        assert_eq!(session.history()[0].classification, Classification::TooHigh);
    }

    #[test]
    fn history_len_tracks_committed_size() {
        let mut session = Session::new(cards(&["A", "B", "C"]));
        let attempts = [
            (0, Direction::Right),
            (0, Direction::Right),
            (1, Direction::Down),
            (2, Direction::Left),
        ];
        for (index, direction) in attempts {
            if let Some(ticket) = session.commit(index, direction) {
                session.advance(&ticket);
            }
            assert_eq!(session.history().len(), session.committed_count());
        }
        assert_eq!(session.committed_count(), 3);
    }

    #[test]
    fn commit_off_cursor_is_rejected() {
        let mut session = Session::new(cards(&["A", "B"]));
        assert!(session.commit(1, Direction::Right).is_none());
        assert!(session.commit(7, Direction::Right).is_none());
        assert!(session.history().is_empty());
    }

    #[test]
    fn advance_is_idempotent_and_cursor_never_decreases() {
        let mut session = Session::new(cards(&["A", "B", "C"]));
        let first = commit_and_advance(&mut session, Direction::Right);
        assert!(!session.advance(&first));
        assert_eq!(session.cursor(), 1);

        let mut last = session.cursor();
        for direction in [Direction::Down, Direction::Up] {
            commit_and_advance(&mut session, direction);
            assert!(session.cursor() >= last);
            last = session.cursor();
        }
        assert!(session.is_finished());
    }

    #[test]
    fn finishing_all_cards_gives_ordered_summary() {
        let mut session = Session::new(cards(&["A", "B", "C", "D"]));
        let directions = [Direction::Right, Direction::Left, Direction::Up, Direction::Down];
        for direction in directions {
            commit_and_advance(&mut session, direction);
        }

        assert!(session.is_finished());
        assert!(session.current().is_none());
        let summary = session.summary();
        assert_eq!(summary.total(), 4);
        let ids: Vec<&str> = summary.entries.iter().map(|e| e.card_id.as_str()).collect();
        assert_eq!(ids, ["A", "B", "C", "D"]);
        assert_eq!(summary.entries[1].label, "Not Interested");
        assert_eq!(summary.entries[3].classification, Classification::TooLow);
        assert_eq!(summary.entries[2].price, 30.0);
        assert!(!session.accepts_input(4));
    }

    #[test]
    fn restart_clears_progress_but_keeps_cards_and_hint() {
        let mut session = Session::new(cards(&["A", "B", "C"]));
        session.mark_hint_seen();
        commit_and_advance(&mut session, Direction::Right);
        commit_and_advance(&mut session, Direction::Up);

        session.restart();

        assert_eq!(session.cursor(), 0);
        assert!(session.history().is_empty());
        assert_eq!(session.committed_count(), 0);
        assert_eq!(session.cards().len(), 3);
        assert_eq!(session.cards()[2].id, "C");
        assert!(session.hint_seen());
    }

    #[test]
    fn stale_ticket_after_restart_does_not_advance() {
        let mut session = Session::new(cards(&["A", "B"]));
        let stale = session.commit(0, Direction::Right).unwrap();
        session.restart();

        let fresh = session.commit(0, Direction::Left).unwrap();
        assert!(!session.advance(&stale));
        assert_eq!(session.cursor(), 0);
        assert!(session.advance(&fresh));
        assert_eq!(session.cursor(), 1);
    }

    #[test]
    fn empty_queue_is_immediately_finished() {
        let mut session = Session::new(Vec::new());
        assert!(session.is_finished());
        assert!(session.commit(0, Direction::Right).is_none());
        assert_eq!(session.summary().total(), 0);
        assert_eq!(session.progress(), (0, 0));
    }

    #[test]
    fn progress_is_one_based() {
        let mut session = Session::new(cards(&["A", "B"]));
        assert_eq!(session.progress(), (1, 2));
        commit_and_advance(&mut session, Direction::Right);
        assert_eq!(session.progress(), (2, 2));
        commit_and_advance(&mut session, Direction::Right);
        assert_eq!(session.progress(), (2, 2));
    }
}
