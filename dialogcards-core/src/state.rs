use crate::{AttemptResult, CardId, CardPiles, CoreError, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Resumable snapshot of a session. Every field may be missing in older saves.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    pub card_piles: Option<CardPiles>,
    pub card_ids: Option<Vec<CardId>>,
    pub round: Option<u32>,
    /// Selection index, not loaded-set index.
    pub current_card_id: Option<Position>,
    pub results: Vec<AttemptResult>,
}

impl PersistedState {
    pub fn from_json(s: &str) -> Result<Self, CoreError> {
        serde_json::from_str(s).map_err(|_| CoreError::Invalid("persisted state"))
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string(self).map_err(|_| CoreError::Invalid("persisted state"))
    }

    /// True when the stored order only names ids `known` accepts, each once.
    pub fn order_fits(&self, known: impl Fn(CardId) -> bool) -> bool {
        let Some(ids) = &self.card_ids else {
            return false;
        };
        let mut seen = HashSet::with_capacity(ids.len());
        ids.iter().all(|id| known(*id) && seen.insert(*id))
    }
}
