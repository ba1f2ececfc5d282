use crate::deck::{CardHandle, DeckProvider};
use crate::{AttemptResult, Behaviour, CardId, CardPiles, Dialog, Mode, Params};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, warn};

/// Card pool with Leitner-style piles kept in memory.
pub struct MemoryDeck {
    dialogs: Vec<Dialog>,
    mode: Mode,
    behaviour: Behaviour,
    piles: CardPiles,
    rng: StdRng,
}

impl MemoryDeck {
    /// Builds the pool from the valid dialogs of `params`.
    pub fn new(params: &Params) -> Self {
        Self::with_rng(params, StdRng::from_os_rng())
    }

    pub fn with_seed(params: &Params, seed: u64) -> Self {
        Self::with_rng(params, StdRng::seed_from_u64(seed))
    }

    fn with_rng(params: &Params, rng: StdRng) -> Self {
        let dialogs = params.valid_dialogs();
        let piles = fresh_piles(dialogs.len(), params.behaviour.pile_count());
        Self {
            dialogs,
            mode: params.mode,
            behaviour: params.behaviour.clone(),
            piles,
            rng,
        }
    }

    /// Restores a pile snapshot; a snapshot that does not cover the pool exactly is dropped.
    pub fn with_piles(mut self, piles: Option<CardPiles>) -> Self {
        if let Some(piles) = piles {
            if self.piles_match(&piles) {
                self.piles = piles;
            } else {
                warn!(pool = self.dialogs.len(), "discarding card piles that do not match the pool");
            }
        }
        self
    }

    fn piles_match(&self, piles: &CardPiles) -> bool {
        if piles.len() != self.behaviour.pile_count() {
            return false;
        }
        let mut seen = vec![false; self.dialogs.len()];
        for id in piles.iter().flatten() {
            match seen.get_mut(*id) {
                Some(s) if !*s => *s = true,
                _ => return false,
            }
        }
        seen.into_iter().all(|s| s)
    }

    pub fn dialog(&self, id: CardId) -> Option<&Dialog> {
        self.dialogs.get(id)
    }

    pub fn pile_of(&self, id: CardId) -> Option<usize> {
        self.piles.iter().position(|p| p.contains(&id))
    }

    fn terminal(&self) -> usize {
        self.piles.len() - 1
    }

    fn selection_repetition(&mut self) -> Vec<CardId> {
        let last = self.terminal();
        let Some(first) = self.piles[..last].iter().position(|p| !p.is_empty()) else {
            return Vec::new();
        };
        let mut ids = self.piles[first].clone();
        if first + 1 < last {
            ids.extend(self.piles[first + 1].iter().copied());
        }
        ids.shuffle(&mut self.rng);
        ids
    }
}

fn fresh_piles(size: usize, count: usize) -> CardPiles {
    let mut piles = vec![Vec::new(); count];
    piles[0] = (0..size).collect();
    piles
}

impl DeckProvider for MemoryDeck {
    type Card = MemoryCard;

    fn create_selection(&mut self) -> Vec<CardId> {
        match self.mode {
            Mode::Normal => (0..self.dialogs.len()).collect(),
            Mode::Repetition => self.selection_repetition(),
        }
    }

    fn get_card(&mut self, id: CardId) -> MemoryCard {
        MemoryCard::new(id, self.dialogs[id].clone())
    }

    fn size(&self) -> usize {
        self.dialogs.len()
    }

    fn update_piles(&mut self, results: &[AttemptResult]) -> Vec<usize> {
        let last = self.terminal();
        for r in results {
            let Some(from) = self.pile_of(r.card_id) else {
                continue;
            };
            let to = match (r.result, self.behaviour.quick_progression) {
                (true, true) => last,
                (true, false) => (from + 1).min(last),
                (false, _) => 0,
            };
            self.piles[from].retain(|id| *id != r.card_id);
            self.piles[to].push(r.card_id);
        }
        let sizes = self.pile_sizes();
        debug!(?sizes, folded = results.len(), "piles updated");
        sizes
    }

    fn pile_sizes(&self) -> Vec<usize> {
        self.piles.iter().map(|p| p.len()).collect()
    }

    fn piles(&self) -> CardPiles {
        self.piles.clone()
    }

    fn reset(&mut self) {
        self.piles = fresh_piles(self.dialogs.len(), self.behaviour.pile_count());
    }
}

/// Render-free card: tracks the face shown and media playback.
#[derive(Clone, Debug)]
pub struct MemoryCard {
    id: CardId,
    dialog: Dialog,
    turned: bool,
    playing: bool,
    progress: Option<(usize, usize)>,
}

impl MemoryCard {
    pub fn new(id: CardId, dialog: Dialog) -> Self {
        Self {
            id,
            dialog,
            turned: false,
            playing: false,
            progress: None,
        }
    }

    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    /// Text of the face currently shown.
    pub fn text(&self) -> &str {
        let side = if self.turned {
            &self.dialog.back.text
        } else {
            &self.dialog.front.text
        };
        side.as_deref().unwrap_or("")
    }

    pub fn tip(&self) -> Option<&str> {
        if self.turned {
            self.dialog.back.tip.as_deref()
        } else {
            self.dialog.front.tip.as_deref()
        }
    }

    pub fn audio(&self) -> Option<&str> {
        if self.turned {
            self.dialog.back_audio()
        } else {
            self.dialog.front.audio.as_deref()
        }
    }

    /// Starts playback if the shown face has audio.
    pub fn play_media(&mut self) -> bool {
        self.playing = self.audio().is_some();
        self.playing
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Zero-based position and total, as last set by the controller.
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.progress
    }
}

impl CardHandle for MemoryCard {
    fn id(&self) -> CardId {
        self.id
    }

    fn stop_media(&mut self) {
        self.playing = false;
    }

    fn reset(&mut self) {
        self.turned = false;
        self.playing = false;
    }

    fn turn(&mut self) -> bool {
        self.playing = false;
        self.turned = !self.turned;
        self.turned
    }

    fn is_turned(&self) -> bool {
        self.turned
    }

    fn set_progress(&mut self, position: usize, total: usize) {
        self.progress = Some((position, total));
    }

    // No focus ring without a rendering surface.
    fn focus(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(n: usize, mode: Mode) -> Params {
        Params {
            mode,
            dialogs: (0..n).map(|i| Dialog::new(format!("f{i}"), format!("b{i}"))).collect(),
            ..Params::default()
        }
    }

    #[test]
    fn normal_selection_is_authoring_order() {
        let mut deck = MemoryDeck::with_seed(&params(4, Mode::Normal), 7);
        assert_eq!(deck.create_selection(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn correct_moves_up_one_pile_wrong_drops_to_zero() {
        let mut deck = MemoryDeck::with_seed(&params(3, Mode::Repetition), 7);
        let sizes = deck.update_piles(&[AttemptResult::new(0, true), AttemptResult::new(1, true)]);
        assert_eq!(sizes, vec![1, 2, 0, 0, 0]);
        let sizes = deck.update_piles(&[AttemptResult::new(0, false), AttemptResult::new(1, true)]);
        assert_eq!(sizes, vec![2, 0, 1, 0, 0]);
        assert_eq!(deck.pile_of(1), Some(2));
    }

    #[test]
    fn graduates_after_max_minus_one_correct() {
        let mut deck = MemoryDeck::with_seed(&params(1, Mode::Repetition), 7);
        for _ in 0..3 {
            deck.update_piles(&[AttemptResult::new(0, true)]);
        }
        assert_eq!(deck.pile_sizes().last(), Some(&0));
        deck.update_piles(&[AttemptResult::new(0, true)]);
        assert_eq!(deck.pile_sizes().last(), Some(&1));
        // Terminal pile is sticky.
        deck.update_piles(&[AttemptResult::new(0, true)]);
        assert_eq!(deck.pile_of(0), Some(4));
    }

    #[test]
    fn quick_progression_graduates_at_once() {
        let mut p = params(2, Mode::Repetition);
        p.behaviour.quick_progression = true;
        let mut deck = MemoryDeck::with_seed(&p, 7);
        let sizes = deck.update_piles(&[AttemptResult::new(1, true)]);
        assert_eq!(sizes, vec![1, 0, 0, 0, 1]);
    }

    #[test]
    fn repetition_selection_skips_graduated_cards() {
        let mut p = params(4, Mode::Repetition);
        p.behaviour.quick_progression = true;
        let mut deck = MemoryDeck::with_seed(&p, 7);
        deck.update_piles(&[AttemptResult::new(2, true)]);
        let mut sel = deck.create_selection();
        sel.sort();
        assert_eq!(sel, vec![0, 1, 3]);
    }

    #[test]
    fn repetition_selection_takes_two_lowest_piles() {
        let mut deck = MemoryDeck::with_seed(&params(4, Mode::Repetition), 7);
        // piles: [3], [0, 1], [2]
        deck.update_piles(&[
            AttemptResult::new(0, true),
            AttemptResult::new(1, true),
            AttemptResult::new(2, true),
        ]);
        deck.update_piles(&[AttemptResult::new(2, true)]);
        let mut sel = deck.create_selection();
        sel.sort();
        assert_eq!(sel, vec![0, 1, 3]);
    }

    #[test]
    fn all_graduated_selects_nothing() {
        let mut p = params(2, Mode::Repetition);
        p.behaviour.quick_progression = true;
        let mut deck = MemoryDeck::with_seed(&p, 7);
        deck.update_piles(&[AttemptResult::new(0, true), AttemptResult::new(1, true)]);
        assert!(deck.create_selection().is_empty());
        deck.reset();
        assert_eq!(deck.pile_sizes(), vec![2, 0, 0, 0, 0]);
    }

    #[test]
    fn mismatched_piles_are_discarded() {
        let p = params(3, Mode::Repetition);
        let deck = MemoryDeck::with_seed(&p, 7).with_piles(Some(vec![vec![0, 1]]));
        assert_eq!(deck.pile_sizes(), vec![3, 0, 0, 0, 0]);

        let snapshot = vec![vec![2], vec![0], vec![], vec![], vec![1]];
        let deck = MemoryDeck::with_seed(&p, 7).with_piles(Some(snapshot.clone()));
        assert_eq!(deck.piles(), snapshot);
    }

    #[test]
    fn card_turns_and_resets() {
        let mut card = MemoryCard::new(0, Dialog::new("Horse", "Hest"));
        assert_eq!(card.text(), "Horse");
        assert!(card.turn());
        assert_eq!(card.text(), "Hest");
        card.reset();
        assert!(!card.is_turned());
    }
}
