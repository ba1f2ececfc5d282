use crate::{Mode, Phase, Position};

/// Snapshot handed to the host on every re-measure.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigationView {
    pub mode: Mode,
    pub phase: Phase,
    pub round: u32,
    pub position: Position,
    pub total: usize,
    pub can_prev: bool,
    pub can_next: bool,
    pub retry_enabled: bool,
    pub cards_left: usize,
    /// Last card answered in repetition mode; waiting for the summary.
    pub summary_pending: bool,
}

/// Host layout hook. Must tolerate being called repeatedly with the same view.
pub trait Viewport {
    fn remeasure(&mut self, view: &NavigationView);
}

impl Viewport for () {
    fn remeasure(&mut self, _view: &NavigationView) {}
}
