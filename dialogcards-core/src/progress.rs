use crate::deck::DeckProvider;
use crate::{AttemptResult, CardId, Mode};
use tracing::debug;

/// Outcome of one round, measured against the whole pool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub right: usize,
    pub wrong: usize,
    pub not_shown: usize,
    pub completed: usize,
    pub done: bool,
    pub pile_sizes: Vec<usize>,
}

impl Summary {
    pub fn shown(&self) -> usize {
        self.right + self.wrong
    }
}

/// Graded answers of the running round.
#[derive(Clone, Debug, Default)]
pub struct ProgressTracker {
    mode: Mode,
    results: Vec<AttemptResult>,
}

impl ProgressTracker {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            results: Vec::new(),
        }
    }

    /// Appends a result. Dropped outside repetition mode and for a card
    /// that already has one this round; returns whether it was kept.
    pub fn record_attempt(&mut self, card_id: CardId, correct: bool) -> bool {
        if !self.mode.is_graded() || self.has_result(card_id) {
            return false;
        }
        self.results.push(AttemptResult::new(card_id, correct));
        true
    }

    pub fn has_result(&self, card_id: CardId) -> bool {
        self.results.iter().any(|r| r.card_id == card_id)
    }

    pub fn results(&self) -> &[AttemptResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn clear(&mut self) {
        self.results.clear();
    }

    /// Replaces the history under the same rules as `record_attempt`.
    pub fn restore(&mut self, results: &[AttemptResult]) {
        self.results.clear();
        for r in results {
            self.record_attempt(r.card_id, r.result);
        }
    }

    /// Folds the round into the deck's piles, or only reads them back when
    /// `persist_only` is set. Assumes the deck reports a terminal pile no
    /// larger than `pool_size`.
    pub fn round_summary<P: DeckProvider>(
        &self,
        deck: &mut P,
        persist_only: bool,
        pool_size: usize,
    ) -> Summary {
        let pile_sizes = if persist_only {
            deck.pile_sizes()
        } else {
            deck.update_piles(&self.results)
        };

        let right = self.results.iter().filter(|r| r.result).count();
        let wrong = self.results.len() - right;
        let not_shown = pool_size.saturating_sub(right + wrong);
        let completed = pile_sizes.last().copied().unwrap_or(0);
        let done = completed == pool_size;

        debug!(right, wrong, not_shown, completed, done, persist_only, "round summary");

        Summary {
            right,
            wrong,
            not_shown,
            completed,
            done,
            pile_sizes,
        }
    }
}
