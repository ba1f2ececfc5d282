use crate::{fill, Params, Summary};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryField {
    RoundCardsRight,
    RoundCardsWrong,
    RoundCardsNotShown,
    OverallCardsCompleted,
    OverallCompletedRounds,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Score {
    pub value: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryRow {
    pub field: SummaryField,
    pub score: Score,
}

/// What a summary screen gets to render.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryRecord {
    pub round: u32,
    pub results: Vec<SummaryRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SummaryRecord {
    pub fn new(summary: &Summary, round: u32, pool_size: usize, params: &Params) -> Self {
        let shown = summary.shown();
        let row = |field, value, max| SummaryRow {
            field,
            score: Score { value, max },
        };
        let results = vec![
            row(SummaryField::RoundCardsRight, summary.right, Some(shown)),
            row(SummaryField::RoundCardsWrong, summary.wrong, Some(shown)),
            row(SummaryField::RoundCardsNotShown, summary.not_shown, None),
            row(SummaryField::OverallCardsCompleted, summary.completed, Some(pool_size)),
            row(SummaryField::OverallCompletedRounds, round as usize, None),
        ];

        let (done, message) = if summary.done {
            let max = params.behaviour.max_proficiency.saturating_sub(1);
            let msg = fill(
                &params.labels.summary_all_done,
                &[("@cards", pool_size), ("@max", max)],
            );
            (Some(true), Some(msg))
        } else {
            (None, None)
        };

        Self {
            round,
            results,
            done,
            message,
        }
    }

    pub fn score(&self, field: SummaryField) -> Option<Score> {
        self.results.iter().find(|r| r.field == field).map(|r| r.score)
    }

    pub fn is_done(&self) -> bool {
        self.done.unwrap_or(false)
    }
}

/// Host surface that shows round statistics.
pub trait SummaryPresenter {
    fn update(&mut self, summary: &SummaryRecord);
    fn show(&mut self);
    fn hide(&mut self);
}

impl SummaryPresenter for () {
    fn update(&mut self, _summary: &SummaryRecord) {}
    fn show(&mut self) {}
    fn hide(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_and_done_message() {
        let s = Summary {
            right: 3,
            wrong: 0,
            not_shown: 0,
            completed: 3,
            done: true,
            pile_sizes: vec![0, 0, 0, 0, 3],
        };
        let rec = SummaryRecord::new(&s, 4, 3, &Params::default());
        assert_eq!(rec.results.len(), 5);
        assert_eq!(
            rec.score(SummaryField::RoundCardsRight),
            Some(Score { value: 3, max: Some(3) })
        );
        assert_eq!(
            rec.score(SummaryField::OverallCompletedRounds),
            Some(Score { value: 4, max: None })
        );
        assert!(rec.is_done());
        assert_eq!(
            rec.message.as_deref(),
            Some("Well done! You got all 3 cards correct 4 times in a row each!")
        );
    }

    #[test]
    fn serializes_without_optional_fields() {
        let rec = SummaryRecord::new(&Summary::default(), 1, 2, &Params::default());
        let v = serde_json::to_value(&rec).unwrap();
        assert!(v.get("done").is_none());
        assert_eq!(v["results"][0]["field"], "round-cards-right");
        assert!(v["results"][2]["score"].get("max").is_none());
    }
}
