use crate::{AttemptResult, CardId, CardPiles};

pub mod memory;

pub use memory::{MemoryCard, MemoryDeck};

/// A materialized card as the controller sees it.
pub trait CardHandle {
    fn id(&self) -> CardId;
    /// Halts any audio or video the card is playing.
    fn stop_media(&mut self);
    /// Back to the front face.
    fn reset(&mut self);
    /// Flips the card and returns whether it now shows its back.
    fn turn(&mut self) -> bool;
    fn is_turned(&self) -> bool;
    /// `position` is zero-based.
    fn set_progress(&mut self, position: usize, total: usize);
    fn focus(&mut self);
}

/// Owner of the card pool and the proficiency piles.
pub trait DeckProvider {
    type Card: CardHandle;

    // Selection
    fn create_selection(&mut self) -> Vec<CardId>;
    fn get_card(&mut self, id: CardId) -> Self::Card;
    fn size(&self) -> usize;
    fn contains(&self, id: CardId) -> bool {
        id < self.size()
    }

    // Piles
    /// Folds a round's results into the piles; the last size is the terminal pile.
    fn update_piles(&mut self, results: &[AttemptResult]) -> Vec<usize>;
    fn pile_sizes(&self) -> Vec<usize>;
    fn piles(&self) -> CardPiles;
    fn reset(&mut self);
}
