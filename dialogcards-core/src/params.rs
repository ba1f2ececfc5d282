use crate::{filter_valid_dialogs, CoreError, Dialog, Mode, MIN_PILES};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Behaviour {
    pub enable_retry: bool,
    pub disable_backwards_navigation: bool,
    pub random_cards: bool,
    pub max_proficiency: usize,
    pub quick_progression: bool,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            enable_retry: true,
            disable_backwards_navigation: false,
            random_cards: false,
            max_proficiency: 5,
            quick_progression: false,
        }
    }
}

impl Behaviour {
    /// Number of piles, including the terminal one.
    pub fn pile_count(&self) -> usize {
        self.max_proficiency.max(MIN_PILES)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Labels {
    pub next: String,
    pub prev: String,
    pub retry: String,
    pub answer: String,
    pub correct_answer: String,
    pub incorrect_answer: String,
    pub round: String,
    pub cards_left: String,
    pub next_round: String,
    pub start_over: String,
    pub show_summary: String,
    pub summary: String,
    pub summary_cards_right: String,
    pub summary_cards_wrong: String,
    pub summary_cards_not_shown: String,
    pub summary_overall_score: String,
    pub summary_cards_completed: String,
    pub summary_completed_rounds: String,
    pub summary_all_done: String,
    pub progress_text: String,
    pub card_front_label: String,
    pub card_back_label: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            next: "Next".into(),
            prev: "Previous".into(),
            retry: "Retry".into(),
            answer: "Turn".into(),
            correct_answer: "I got it right!".into(),
            incorrect_answer: "I got it wrong".into(),
            round: "Round @round".into(),
            cards_left: "Cards left: @number".into(),
            next_round: "Proceed to round @round".into(),
            start_over: "Start over".into(),
            show_summary: "Next".into(),
            summary: "Summary".into(),
            summary_cards_right: "Cards you got right:".into(),
            summary_cards_wrong: "Cards you got wrong:".into(),
            summary_cards_not_shown: "Cards in pool not shown:".into(),
            summary_overall_score: "Overall Score".into(),
            summary_cards_completed: "Cards you have completed learning:".into(),
            summary_completed_rounds: "Completed rounds:".into(),
            summary_all_done:
                "Well done! You got all @cards cards correct @max times in a row each!".into(),
            progress_text: "Card @card of @total".into(),
            card_front_label: "Card front".into(),
            card_back_label: "Card back".into(),
        }
    }
}

/// Replaces each `@placeholder` in `template` with its value.
pub fn fill(template: &str, vars: &[(&str, usize)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(key, &value.to_string())
    })
}

/// Authored content plus behaviour switches.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Params {
    pub title: String,
    pub description: String,
    pub mode: Mode,
    pub dialogs: Vec<Dialog>,
    pub behaviour: Behaviour,
    #[serde(flatten)]
    pub labels: Labels,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: "Sit in pairs and make up sentences where you include the expressions below."
                .into(),
            mode: Mode::Normal,
            dialogs: vec![Dialog::new("Horse", "Hest")],
            behaviour: Behaviour::default(),
            labels: Labels::default(),
        }
    }
}

impl Params {
    pub fn from_json(s: &str) -> Result<Self, CoreError> {
        serde_json::from_str(s).map_err(|_| CoreError::Invalid("content params"))
    }

    pub fn valid_dialogs(&self) -> Vec<Dialog> {
        filter_valid_dialogs(&self.dialogs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let p = Params::from_json(
            r#"{"mode":"repetition","behaviour":{"quickProgression":true},"cardsLeft":"Left: @number"}"#,
        )
        .unwrap();
        assert_eq!(p.mode, Mode::Repetition);
        assert!(p.behaviour.quick_progression);
        assert!(p.behaviour.enable_retry);
        assert_eq!(p.behaviour.max_proficiency, 5);
        assert_eq!(p.labels.cards_left, "Left: @number");
        assert_eq!(p.labels.round, "Round @round");
        assert_eq!(p.dialogs.len(), 1);
    }

    #[test]
    fn fill_replaces_placeholders() {
        let s = fill("Card @card of @total", &[("@card", 2), ("@total", 7)]);
        assert_eq!(s, "Card 2 of 7");
    }

    #[test]
    fn pile_count_has_floor() {
        let b = Behaviour {
            max_proficiency: 0,
            ..Behaviour::default()
        };
        assert_eq!(b.pile_count(), MIN_PILES);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(Params::from_json("{ not json").is_err());
    }
}
