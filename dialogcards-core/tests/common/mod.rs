#![allow(dead_code)]

use dialogcards_core::{
    Controller, Dialog, MemoryDeck, Mode, NavigationView, Params, SummaryPresenter, SummaryRecord,
    Viewport,
};
use std::cell::RefCell;
use std::rc::Rc;

pub fn params(n: usize, mode: Mode) -> Params {
    Params {
        mode,
        dialogs: (0..n)
            .map(|i| Dialog::new(format!("front {i}"), format!("back {i}")))
            .collect(),
        ..Params::default()
    }
}

pub fn controller(n: usize, mode: Mode) -> Controller<MemoryDeck> {
    controller_with(params(n, mode))
}

pub fn controller_with(p: Params) -> Controller<MemoryDeck> {
    let deck = MemoryDeck::with_seed(&p, 11);
    let mut c = Controller::new(deck, p).with_seed(3);
    c.attach().unwrap();
    c
}

#[derive(Clone, Default)]
pub struct ViewLog(pub Rc<RefCell<Vec<NavigationView>>>);

impl Viewport for ViewLog {
    fn remeasure(&mut self, view: &NavigationView) {
        self.0.borrow_mut().push(view.clone());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shown {
    Update(SummaryRecord),
    Show,
    Hide,
}

#[derive(Clone, Default)]
pub struct PresenterLog(pub Rc<RefCell<Vec<Shown>>>);

impl SummaryPresenter for PresenterLog {
    fn update(&mut self, summary: &SummaryRecord) {
        self.0.borrow_mut().push(Shown::Update(summary.clone()));
    }
    fn show(&mut self) {
        self.0.borrow_mut().push(Shown::Show);
    }
    fn hide(&mut self) {
        self.0.borrow_mut().push(Shown::Hide);
    }
}
