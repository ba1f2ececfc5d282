use crate::cli::opts::PlayCmd;

use anyhow::Result;
use dialogcards_core::{
    fill, CardHandle, Controller, Labels, MemoryDeck, NavigationView, Params, PersistedState,
    Phase, SummaryField, SummaryPresenter, SummaryRecord, Viewport,
};
use dialogcards_json::StateStore;
use std::io::{stdin, stdout, Write};
use tracing::info;

/// Prints the status line whenever the navigation view changes.
pub struct TerminalViewport {
    labels: Labels,
    last: Option<NavigationView>,
}

impl TerminalViewport {
    pub fn new(labels: Labels) -> Self {
        Self { labels, last: None }
    }
}

pub fn status_line(labels: &Labels, view: &NavigationView) -> String {
    if view.mode.is_graded() {
        let round = fill(&labels.round, &[("@round", view.round as usize)]);
        let left = fill(&labels.cards_left, &[("@number", view.cards_left)]);
        format!("{round} | {left}")
    } else {
        fill(
            &labels.progress_text,
            &[("@card", view.position + 1), ("@total", view.total)],
        )
    }
}

impl Viewport for TerminalViewport {
    fn remeasure(&mut self, view: &NavigationView) {
        if self.last.as_ref() == Some(view) {
            return;
        }
        if view.phase == Phase::Cards && view.total > 0 {
            println!("\n[{}]", status_line(&self.labels, view));
        }
        self.last = Some(view.clone());
    }
}

pub struct TerminalSummary {
    labels: Labels,
    record: Option<SummaryRecord>,
}

impl TerminalSummary {
    pub fn new(labels: Labels) -> Self {
        Self {
            labels,
            record: None,
        }
    }

    fn label(&self, field: SummaryField) -> &str {
        match field {
            SummaryField::RoundCardsRight => &self.labels.summary_cards_right,
            SummaryField::RoundCardsWrong => &self.labels.summary_cards_wrong,
            SummaryField::RoundCardsNotShown => &self.labels.summary_cards_not_shown,
            SummaryField::OverallCardsCompleted => &self.labels.summary_cards_completed,
            SummaryField::OverallCompletedRounds => &self.labels.summary_completed_rounds,
        }
    }
}

impl SummaryPresenter for TerminalSummary {
    fn update(&mut self, summary: &SummaryRecord) {
        self.record = Some(summary.clone());
    }

    fn show(&mut self) {
        let Some(rec) = &self.record else {
            return;
        };
        println!("\n== {} ==", self.labels.summary);
        for row in &rec.results {
            if row.field == SummaryField::OverallCardsCompleted {
                println!("-- {} --", self.labels.summary_overall_score);
            }
            match row.score.max {
                Some(max) => println!("{} {}/{}", self.label(row.field), row.score.value, max),
                None => println!("{} {}", self.label(row.field), row.score.value),
            }
        }
        if let Some(msg) = &rec.message {
            println!("{msg}");
        }
    }

    fn hide(&mut self) {}
}

#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    Continue,
    Quit,
    Unknown,
}

/// Applies one line of user input to the controller.
pub fn apply(c: &mut Controller<MemoryDeck>, line: &str) -> Step {
    let mut parts = line.split_whitespace();
    let cmd = parts.next().unwrap_or("").to_lowercase();
    let graded = c.params().mode.is_graded();

    if c.phase() == Phase::Summary {
        let done = c.last_summary().map(|s| s.is_done()).unwrap_or(false);
        match cmd.as_str() {
            "n" | "next" if done => c.restart_repetition(),
            "n" | "next" => c.next_round(),
            "o" | "over" => c.restart_repetition(),
            "q" | "quit" => return Step::Quit,
            _ => return Step::Unknown,
        }
        return Step::Continue;
    }

    let turned = c.current_card().map(|card| card.is_turned()).unwrap_or(false);
    match cmd.as_str() {
        "t" | "turn" => {
            c.turn();
        }
        "a" | "audio" => {
            if let Some(card) = c.current_card_mut() {
                card.play_media();
            }
        }
        "n" | "next" if !graded => c.next(None),
        "p" | "prev" if !graded => c.prev(),
        "g" | "goto" if !graded => {
            let Some(target) = parts
                .next()
                .and_then(|s| s.parse::<usize>().ok())
                .and_then(|n| n.checked_sub(1))
            else {
                return Step::Unknown;
            };
            c.goto(target);
        }
        "r" | "retry" if !graded && c.retry_enabled() => c.reset(),
        "y" | "right" if graded && turned => c.next(Some(true)),
        "w" | "wrong" if graded && turned => c.next(Some(false)),
        "s" | "summary" if graded && c.summary_pending() => {
            c.show_summary(false);
        }
        "q" | "quit" => return Step::Quit,
        _ => return Step::Unknown,
    }
    Step::Continue
}

fn help(c: &Controller<MemoryDeck>) -> String {
    let l = &c.params().labels;
    if c.phase() == Phase::Summary {
        let next = fill(&l.next_round, &[("@round", c.round() as usize + 1)]);
        return format!("n = {next}, o = {}, q = quit", l.start_over);
    }
    if c.params().mode.is_graded() {
        if c.summary_pending() {
            return format!("s = {}, q = quit", l.show_summary);
        }
        format!(
            "t = {}, y = {}, w = {}, a = audio, q = quit",
            l.answer, l.correct_answer, l.incorrect_answer
        )
    } else {
        let mut s = format!("t = {}, n = {}, p = {}, g N = go to card, a = audio", l.answer, l.next, l.prev);
        if c.retry_enabled() {
            s.push_str(&format!(", r = {}", l.retry));
        }
        s.push_str(", q = quit");
        s
    }
}

fn print_card(c: &Controller<MemoryDeck>) {
    let Some(card) = c.current_card() else {
        return;
    };
    let l = &c.params().labels;
    let side = if card.is_turned() {
        &l.card_back_label
    } else {
        &l.card_front_label
    };
    println!("{side}: {}", card.text());
    if let Some(tip) = card.tip() {
        println!("  tip: {tip}");
    }
    if card.is_playing() {
        if let Some(audio) = card.audio() {
            println!("  playing {audio}");
        }
    }
}

fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    stdout().flush().ok();
    let mut s = String::new();
    if stdin().read_line(&mut s)? == 0 {
        return Ok(None);
    }
    Ok(Some(s))
}

pub fn run(
    params: Params,
    previous: Option<PersistedState>,
    cmd: &PlayCmd,
    store: Option<&StateStore>,
) -> Result<()> {
    let piles = previous.as_ref().and_then(|s| s.card_piles.clone());
    let deck = match cmd.seed {
        Some(seed) => MemoryDeck::with_seed(&params, seed),
        None => MemoryDeck::new(&params),
    }
    .with_piles(piles);

    let title = params.title.clone();
    let description = params.description.clone();
    let labels = params.labels.clone();
    let mut c = Controller::new(deck, params)
        .with_viewport(Box::new(TerminalViewport::new(labels.clone())))
        .with_presenter(Box::new(TerminalSummary::new(labels)));
    if let Some(seed) = cmd.seed {
        c = c.with_seed(seed.wrapping_add(1));
    }
    if let Some(state) = previous {
        c = c.with_state(state);
    }

    if !title.trim().is_empty() {
        println!("{title}");
    }
    println!("{description}");

    c.attach()?;

    loop {
        if c.phase() == Phase::Cards {
            print_card(&c);
        }
        let Some(line) = read_line("> ")? else {
            break;
        };
        match apply(&mut c, line.trim()) {
            Step::Quit => break,
            Step::Unknown => println!("{}", help(&c)),
            Step::Continue => {}
        }
    }

    if let Some(store) = store {
        store.save(&c.current_state())?;
        info!(round = c.round(), card = c.current_selection_index(), "session stored");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialogcards_core::{Dialog, Mode};

    fn controller(n: usize, mode: Mode) -> Controller<MemoryDeck> {
        let params = Params {
            mode,
            dialogs: (0..n).map(|i| Dialog::new(format!("f{i}"), format!("b{i}"))).collect(),
            ..Params::default()
        };
        let deck = MemoryDeck::with_seed(&params, 1);
        let mut c = Controller::new(deck, params).with_seed(2);
        c.attach().unwrap();
        c
    }

    #[test]
    fn browsing_commands() {
        let mut c = controller(4, Mode::Normal);
        assert_eq!(apply(&mut c, "n"), Step::Continue);
        assert_eq!(apply(&mut c, "g 4"), Step::Continue);
        assert_eq!(c.current_selection_index(), 3);
        assert_eq!(apply(&mut c, "p"), Step::Continue);
        assert_eq!(c.current_selection_index(), 2);
        assert_eq!(apply(&mut c, "g 0"), Step::Unknown);
        assert_eq!(apply(&mut c, "r"), Step::Unknown);
        assert_eq!(apply(&mut c, "y"), Step::Unknown);
        assert_eq!(apply(&mut c, "q"), Step::Quit);
    }

    #[test]
    fn retry_after_turning_last_card() {
        let mut c = controller(2, Mode::Normal);
        apply(&mut c, "n");
        apply(&mut c, "t");
        assert_eq!(apply(&mut c, "r"), Step::Continue);
        assert_eq!(c.current_selection_index(), 0);
    }

    #[test]
    fn grading_needs_a_turned_card() {
        let mut c = controller(2, Mode::Repetition);
        assert_eq!(apply(&mut c, "y"), Step::Unknown);
        apply(&mut c, "t");
        assert_eq!(apply(&mut c, "y"), Step::Continue);
        apply(&mut c, "t");
        apply(&mut c, "w");
        assert!(c.summary_pending());

        assert_eq!(apply(&mut c, "s"), Step::Continue);
        assert_eq!(c.phase(), Phase::Summary);
        assert_eq!(apply(&mut c, "n"), Step::Continue);
        assert_eq!(c.round(), 2);
        assert_eq!(c.phase(), Phase::Cards);
    }

    #[test]
    fn empty_content_is_an_error() {
        let cmd = PlayCmd {
            content: "empty.json".into(),
            mode: None,
            random: false,
            seed: Some(1),
            fresh: true,
            no_save: true,
        };
        let err = run(Params::default(), None, &cmd, None).unwrap_err();
        assert!(err.to_string().contains("empty deck"));
    }

    #[test]
    fn status_line_per_mode() {
        let labels = Labels::default();
        let view = NavigationView {
            mode: Mode::Normal,
            position: 1,
            total: 5,
            ..NavigationView::default()
        };
        assert_eq!(status_line(&labels, &view), "Card 2 of 5");

        let view = NavigationView {
            mode: Mode::Repetition,
            round: 2,
            cards_left: 3,
            ..NavigationView::default()
        };
        assert_eq!(status_line(&labels, &view), "Round 2 | Cards left: 3");
    }
}
