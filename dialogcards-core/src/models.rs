use serde::{Deserialize, Serialize};

/// Index of a dialog within the validated pool.
pub type CardId = usize;
/// Index into a round's selection order.
pub type Position = usize;
/// Card ids per proficiency pile, lowest pile first.
pub type CardPiles = Vec<Vec<CardId>>;

pub const MIN_PILES: usize = 2;
pub const INITIAL_LOAD: usize = 2;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Normal,
    Repetition,
}

impl Mode {
    pub fn is_graded(&self) -> bool {
        matches!(self, Mode::Repetition)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Front {
    pub text: Option<String>,
    pub image: Option<String>,
    pub audio: Option<String>,
    pub tip: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Back {
    pub text: Option<String>,
    pub image: Option<String>,
    pub audio: Option<String>,
    pub tip: Option<String>,
    pub use_image_from_front: bool,
    pub use_audio_from_front: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dialog {
    pub front: Front,
    pub back: Back,
}

fn present(v: &Option<String>) -> bool {
    v.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false)
}

impl Dialog {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: Front {
                text: Some(front.into()),
                ..Front::default()
            },
            back: Back {
                text: Some(back.into()),
                ..Back::default()
            },
        }
    }

    pub fn with_tip(mut self, tip: impl Into<String>) -> Self {
        self.front.tip = Some(tip.into());
        self
    }

    /// Image shown on the back, following `useImageFromFront`.
    pub fn back_image(&self) -> Option<&str> {
        if self.back.use_image_from_front {
            self.front.image.as_deref()
        } else {
            self.back.image.as_deref()
        }
    }

    pub fn back_audio(&self) -> Option<&str> {
        if self.back.use_audio_from_front {
            self.front.audio.as_deref()
        } else {
            self.back.audio.as_deref()
        }
    }

    pub fn has_front(&self) -> bool {
        present(&self.front.text) || present(&self.front.image) || present(&self.front.audio)
    }

    pub fn has_back(&self) -> bool {
        let image = self.back_image().map(|s| !s.trim().is_empty()).unwrap_or(false);
        let audio = self.back_audio().map(|s| !s.trim().is_empty()).unwrap_or(false);
        present(&self.back.text) || image || audio
    }

    pub fn is_valid(&self) -> bool {
        self.has_front() && self.has_back()
    }

    pub fn has_text(&self) -> bool {
        present(&self.front.text) || present(&self.back.text)
    }
}

/// One graded answer within a round.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttemptResult {
    pub card_id: CardId,
    pub result: bool,
}

impl AttemptResult {
    pub fn new(card_id: CardId, result: bool) -> Self {
        Self { card_id, result }
    }
}

/// Relative placement of a loaded card against the current one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    Past,
    Current,
    Upcoming,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Cards,
    Summary,
}

/// Events a card raises towards the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardEvent {
    Turned,
    Advance(Option<bool>),
}
