//! Selection-order navigation over a progressively loaded card window.
//!
//! Three index spaces are kept apart here: positions in the round's
//! selection order, the order in which cards were materialized, and the
//! card currently shown. Cards live in an arena keyed by [`CardId`]; the
//! current card is always resolved through its id, never through a raw
//! index into the loaded list.

use crate::deck::{CardHandle, DeckProvider};
use crate::{
    AttemptResult, CardEvent, CardId, CoreError, Marker, NavigationView, Params, PersistedState,
    Phase, Position, ProgressTracker, SummaryPresenter, SummaryRecord, Viewport, INITIAL_LOAD,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;
use tracing::{debug, warn};

struct Slot<C> {
    card: C,
    marker: Marker,
}

pub struct Controller<P: DeckProvider> {
    deck: P,
    params: Params,
    previous: Option<PersistedState>,

    order: Vec<CardId>,
    positions: HashMap<CardId, Position>,
    loaded: Vec<CardId>,
    arena: HashMap<CardId, Slot<P::Card>>,
    current: usize,
    focused: Option<CardId>,

    round: u32,
    pool_size: usize,
    progress: ProgressTracker,
    phase: Phase,
    retry_enabled: bool,
    summary_pending: bool,
    last_summary: Option<SummaryRecord>,

    rng: StdRng,
    viewport: Box<dyn Viewport>,
    presenter: Box<dyn SummaryPresenter>,
}

impl<P: DeckProvider> Controller<P> {
    pub fn new(deck: P, params: Params) -> Self {
        let progress = ProgressTracker::new(params.mode);
        Self {
            deck,
            params,
            previous: None,
            order: Vec::new(),
            positions: HashMap::new(),
            loaded: Vec::new(),
            arena: HashMap::new(),
            current: 0,
            focused: None,
            round: 0,
            pool_size: 0,
            progress,
            phase: Phase::Cards,
            retry_enabled: false,
            summary_pending: false,
            last_summary: None,
            rng: StdRng::from_os_rng(),
            viewport: Box::new(()),
            presenter: Box::new(()),
        }
    }

    /// Resumes from a snapshot on the next `attach`. Piles are the deck's business.
    pub fn with_state(mut self, state: PersistedState) -> Self {
        self.previous = Some(state);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_viewport(mut self, viewport: Box<dyn Viewport>) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_presenter(mut self, presenter: Box<dyn SummaryPresenter>) -> Self {
        self.presenter = presenter;
        self
    }

    /// Builds the first round. An empty pool is reported once; the
    /// controller then stays attached with nothing to navigate.
    pub fn attach(&mut self) -> Result<(), CoreError> {
        if self.round != 0 {
            return Ok(());
        }
        let previous = self.previous.take();

        self.pool_size = self.deck.size();
        let resumed = self.build_selection(previous.as_ref());
        self.initial_window();
        self.round = previous
            .as_ref()
            .and_then(|s| s.round)
            .filter(|r| *r > 0)
            .unwrap_or(1);

        // History and position only mean something against the order they were saved with.
        let previous = previous.filter(|_| resumed);
        if let Some(state) = &previous {
            let known: Vec<AttemptResult> = state
                .results
                .iter()
                .filter(|r| self.positions.contains_key(&r.card_id))
                .cloned()
                .collect();
            self.progress.restore(&known);
        }

        if self.pool_size == 0 {
            self.resize();
            return Err(CoreError::EmptyDeck("no valid dialogs"));
        }

        if let Some(position) = previous.as_ref().and_then(|s| s.current_card_id) {
            self.goto(position);
            // A finished round that was saved before the next one started.
            if self.params.mode.is_graded()
                && !self.order.is_empty()
                && self.progress.len() == self.order.len()
            {
                self.show_summary(true);
            }
        }

        debug!(round = self.round, cards = self.order.len(), "attached");
        self.resize();
        self.focus_current();
        Ok(())
    }

    /// Returns whether the stored order was taken over.
    fn build_selection(&mut self, previous: Option<&PersistedState>) -> bool {
        let restored = match previous {
            Some(state) if state.order_fits(|id| self.deck.contains(id)) => state.card_ids.clone(),
            Some(state) if state.card_ids.is_some() => {
                warn!(
                    pool = self.pool_size,
                    "stored card order does not fit the pool, rebuilding without its history"
                );
                None
            }
            _ => None,
        };
        let resumed = restored.is_some();

        let order = match restored {
            Some(ids) => ids,
            None => {
                let mut ids = self.deck.create_selection();
                if self.params.behaviour.random_cards {
                    ids.shuffle(&mut self.rng);
                }
                ids
            }
        };

        self.positions = order.iter().enumerate().map(|(p, id)| (*id, p)).collect();
        self.order = order;
        resumed
    }

    fn initial_window(&mut self) {
        self.loaded.clear();
        self.arena.clear();
        self.current = 0;
        self.focused = None;
        for position in 0..self.order.len().min(INITIAL_LOAD) {
            self.load(position);
        }
        self.apply_markers(0);
    }

    /// Materializes the card at `position` unless it is already resident.
    fn load(&mut self, position: Position) {
        let id = self.order[position];
        if self.arena.contains_key(&id) {
            return;
        }

        let mut card = self.deck.get_card(id);
        card.set_progress(position, self.order.len());

        // Keep the loaded list in selection order: slot in before the first
        // resident card that comes later, which may sit at index 0.
        let successor = self
            .loaded
            .iter()
            .position(|other| self.positions.get(other).is_some_and(|p| *p > position));
        match successor {
            Some(index) => self.loaded.insert(index, id),
            None => self.loaded.push(id),
        }
        self.arena.insert(
            id,
            Slot {
                card,
                marker: Marker::Upcoming,
            },
        );
        debug!(card = id, position, resident = self.loaded.len(), "card loaded");
    }

    fn apply_markers(&mut self, target: Position) {
        for (id, slot) in self.arena.iter_mut() {
            let position = self.positions.get(id).copied().unwrap_or(Position::MAX);
            slot.marker = match position.cmp(&target) {
                std::cmp::Ordering::Less => Marker::Past,
                std::cmp::Ordering::Equal => Marker::Current,
                std::cmp::Ordering::Greater => Marker::Upcoming,
            };
        }
    }

    fn loaded_index(&self, id: CardId) -> Option<usize> {
        self.loaded.iter().position(|other| *other == id)
    }

    fn frozen(&self) -> bool {
        self.summary_pending || self.phase == Phase::Summary
    }

    /// Shows the card at `target`. Out-of-range targets, disabled backward
    /// moves and moves while the round is frozen are ignored.
    pub fn goto(&mut self, target: Position) {
        if target >= self.order.len() || self.frozen() {
            return;
        }
        if target < self.current_selection_index()
            && self.params.behaviour.disable_backwards_navigation
        {
            return;
        }

        if let Some(card) = self.current_card_mut() {
            card.stop_media();
        }

        let first = target.saturating_sub(1);
        let last = (target + 1).min(self.order.len() - 1);
        for position in first..=last {
            self.load(position);
        }

        let Some(index) = self.loaded_index(self.order[target]) else {
            return;
        };
        self.apply_markers(target);
        self.current = index;
        if target + 1 < self.order.len() {
            self.retry_enabled = false;
        }

        self.resize();
        self.focus_current();
    }

    /// Advances one position, recording `result` first when given.
    pub fn next(&mut self, result: Option<bool>) {
        if self.loaded.is_empty() || self.frozen() {
            return;
        }
        let Some(id) = self.current_id() else {
            return;
        };
        if let Some(correct) = result {
            self.progress.record_attempt(id, correct);
        }
        if let Some(card) = self.current_card_mut() {
            card.stop_media();
        }

        let position = self.current_selection_index();
        if position + 1 >= self.order.len() {
            if self.params.mode.is_graded() {
                self.summary_pending = true;
                self.resize();
            }
            return;
        }
        self.goto(position + 1);
    }

    pub fn prev(&mut self) {
        if let Some(target) = self.current_selection_index().checked_sub(1) {
            self.goto(target);
        }
    }

    /// Flips the current card and returns whether its back is now showing.
    pub fn turn(&mut self) -> Option<bool> {
        if self.phase == Phase::Summary {
            return None;
        }
        let turned = self.current_card_mut()?.turn();
        self.on_card_turned();
        Some(turned)
    }

    /// Reaction to a card having been flipped.
    pub fn on_card_turned(&mut self) {
        if self.params.behaviour.enable_retry
            && !self.order.is_empty()
            && self.current_selection_index() + 1 == self.order.len()
        {
            self.retry_enabled = true;
        }
        self.resize();
    }

    pub fn dispatch(&mut self, event: CardEvent) {
        match event {
            CardEvent::Turned => self.on_card_turned(),
            CardEvent::Advance(result) => self.next(result),
        }
    }

    /// Starts the round over at its first card with every card face up.
    pub fn reset(&mut self) {
        self.progress.clear();
        if let Some(card) = self.current_card_mut() {
            card.stop_media();
        }
        for slot in self.arena.values_mut() {
            slot.card.reset();
        }

        self.current = self
            .order
            .first()
            .and_then(|id| self.loaded_index(*id))
            .unwrap_or(0);
        self.apply_markers(0);
        self.retry_enabled = false;
        self.summary_pending = false;

        self.resize();
        self.focus_current();
    }

    /// Folds the round into the piles (or only reads them back when
    /// `persist_only`) and shows the summary. Only meaningful in repetition
    /// mode; a summary already on screen is returned unchanged.
    pub fn show_summary(&mut self, persist_only: bool) -> Option<SummaryRecord> {
        if !self.params.mode.is_graded() {
            return None;
        }
        if self.phase == Phase::Summary {
            return self.last_summary.clone();
        }

        let summary = self
            .progress
            .round_summary(&mut self.deck, persist_only, self.pool_size);
        let record = SummaryRecord::new(&summary, self.round, self.pool_size, &self.params);

        self.presenter.update(&record);
        self.presenter.show();
        self.phase = Phase::Summary;
        self.summary_pending = false;
        self.last_summary = Some(record.clone());

        self.resize();
        Some(record)
    }

    pub fn next_round(&mut self) {
        self.round += 1;
        self.presenter.hide();
        self.phase = Phase::Cards;

        self.reset();
        self.build_selection(None);
        self.initial_window();
        debug!(round = self.round, cards = self.order.len(), "round started");

        self.resize();
        self.focus_current();
    }

    /// Empties every pile and begins again at round 1.
    pub fn restart_repetition(&mut self) {
        self.deck.reset();
        self.round = 0;
        self.next_round();
    }

    /// Re-measures against the current state; safe to call at any time.
    pub fn resize(&mut self) {
        let view = self.view();
        self.viewport.remeasure(&view);
    }

    pub fn view(&self) -> NavigationView {
        let total = self.order.len();
        let position = self.current_selection_index();
        let navigable = !self.frozen() && total > 0;
        NavigationView {
            mode: self.params.mode,
            phase: self.phase,
            round: self.round,
            position,
            total,
            can_prev: navigable
                && position > 0
                && !self.params.behaviour.disable_backwards_navigation,
            can_next: navigable && position + 1 < total,
            retry_enabled: self.retry_enabled,
            cards_left: if self.summary_pending {
                0
            } else {
                total.saturating_sub(position)
            },
            summary_pending: self.summary_pending,
        }
    }

    fn focus_current(&mut self) {
        let id = self.current_id();
        if let Some(card) = self.current_card_mut() {
            card.focus();
        }
        self.focused = id;
    }

    pub fn current_state(&self) -> PersistedState {
        PersistedState {
            card_piles: Some(self.deck.piles()),
            card_ids: Some(self.order.clone()),
            round: Some(self.round),
            current_card_id: Some(self.current_selection_index()),
            results: self.progress.results().to_vec(),
        }
    }

    /// Position in the selection order of the card on display.
    pub fn current_selection_index(&self) -> Position {
        self.current_id()
            .and_then(|id| self.positions.get(&id))
            .copied()
            .unwrap_or(0)
    }

    pub fn current_id(&self) -> Option<CardId> {
        self.loaded.get(self.current).copied()
    }

    /// Index of the current card within the loaded list.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_card(&self) -> Option<&P::Card> {
        let id = self.current_id()?;
        self.arena.get(&id).map(|s| &s.card)
    }

    pub fn current_card_mut(&mut self) -> Option<&mut P::Card> {
        let id = self.current_id()?;
        self.arena.get_mut(&id).map(|s| &mut s.card)
    }

    pub fn card(&self, id: CardId) -> Option<&P::Card> {
        self.arena.get(&id).map(|s| &s.card)
    }

    pub fn marker(&self, id: CardId) -> Option<Marker> {
        self.arena.get(&id).map(|s| s.marker)
    }

    pub fn order(&self) -> &[CardId] {
        &self.order
    }

    /// Resident cards, in selection order.
    pub fn loaded(&self) -> &[CardId] {
        &self.loaded
    }

    pub fn focused(&self) -> Option<CardId> {
        self.focused
    }

    pub fn results(&self) -> &[AttemptResult] {
        self.progress.results()
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    pub fn summary_pending(&self) -> bool {
        self.summary_pending
    }

    pub fn retry_enabled(&self) -> bool {
        self.retry_enabled
    }

    pub fn last_summary(&self) -> Option<&SummaryRecord> {
        self.last_summary.as_ref()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn deck(&self) -> &P {
        &self.deck
    }
}
