mod common;

use common::params;
use dialogcards_core::{
    AttemptResult, CardId, CardPiles, DeckProvider, MemoryCard, MemoryDeck, Mode, ProgressTracker,
};

/// Deck that reports fixed pile sizes.
struct FixedPiles {
    pool: usize,
    sizes: Vec<usize>,
}

impl DeckProvider for FixedPiles {
    type Card = MemoryCard;

    fn create_selection(&mut self) -> Vec<CardId> {
        (0..self.pool).collect()
    }
    fn get_card(&mut self, id: CardId) -> MemoryCard {
        MemoryCard::new(id, dialogcards_core::Dialog::new("a", "b"))
    }
    fn size(&self) -> usize {
        self.pool
    }
    fn update_piles(&mut self, _results: &[AttemptResult]) -> Vec<usize> {
        self.sizes.clone()
    }
    fn pile_sizes(&self) -> Vec<usize> {
        self.sizes.clone()
    }
    fn piles(&self) -> CardPiles {
        Vec::new()
    }
    fn reset(&mut self) {}
}

#[test]
fn completion_arithmetic() {
    let mut deck = MemoryDeck::with_seed(&params(5, Mode::Repetition), 1);
    let mut t = ProgressTracker::new(Mode::Repetition);
    for (id, ok) in [(0, true), (1, true), (2, false), (3, true)] {
        t.record_attempt(id, ok);
    }

    let s = t.round_summary(&mut deck, false, 5);
    assert_eq!((s.right, s.wrong, s.not_shown), (3, 1, 1));
    assert_eq!(s.right + s.wrong + s.not_shown, 5);
    assert_eq!(s.completed, 0);
    assert!(!s.done);
    assert_eq!(s.pile_sizes, vec![2, 3, 0, 0, 0]);
}

#[test]
fn done_iff_terminal_pile_holds_the_pool() {
    let t = ProgressTracker::new(Mode::Repetition);

    let mut full = FixedPiles {
        pool: 3,
        sizes: vec![0, 0, 3],
    };
    let s = t.round_summary(&mut full, false, 3);
    assert_eq!(s.completed, 3);
    assert!(s.done);

    let mut partial = FixedPiles {
        pool: 3,
        sizes: vec![1, 0, 2],
    };
    let s = t.round_summary(&mut partial, false, 3);
    assert_eq!(s.completed, 2);
    assert!(!s.done);
}

#[test]
fn persist_only_reads_piles_without_folding() {
    let mut deck = MemoryDeck::with_seed(&params(4, Mode::Repetition), 1);
    let mut t = ProgressTracker::new(Mode::Repetition);
    t.record_attempt(0, true);
    t.record_attempt(1, true);

    let s = t.round_summary(&mut deck, true, 4);
    assert_eq!(s.pile_sizes, vec![4, 0, 0, 0, 0]);
    assert_eq!(deck.pile_sizes(), vec![4, 0, 0, 0, 0]);
    assert_eq!((s.right, s.wrong, s.not_shown), (2, 0, 2));
}

#[test]
fn attempts_outside_repetition_are_dropped() {
    let mut t = ProgressTracker::new(Mode::Normal);
    t.record_attempt(0, true);
    assert!(t.is_empty());
}

#[test]
fn clear_and_restore() {
    let mut t = ProgressTracker::new(Mode::Repetition);
    t.record_attempt(2, false);
    assert_eq!(t.results(), &[AttemptResult::new(2, false)]);
    t.clear();
    assert!(t.is_empty());
    t.restore(&[AttemptResult::new(1, true), AttemptResult::new(0, true)]);
    assert_eq!(t.len(), 2);
}

#[test]
fn one_result_per_card_and_round() {
    let mut t = ProgressTracker::new(Mode::Repetition);
    assert!(t.record_attempt(0, true));
    assert!(!t.record_attempt(0, false));
    assert_eq!(t.results(), &[AttemptResult::new(0, true)]);

    t.restore(&[
        AttemptResult::new(1, false),
        AttemptResult::new(1, true),
        AttemptResult::new(2, true),
    ]);
    assert_eq!(
        t.results(),
        &[AttemptResult::new(1, false), AttemptResult::new(2, true)]
    );
}
