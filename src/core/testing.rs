//=========================================================================
// Test Support
//=========================================================================
//
// Instrumented systems shared by the unit tests.
//
// Recorder appends "<label>:<hook>" to a shared journal for every
// lifecycle call, so tests can assert exact call order and counts.
//
//=========================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::context::{FrameContext, InitContext, Transitions};
use crate::core::system::System;

/// Shared, ordered record of lifecycle calls.
pub(crate) type Journal = Rc<RefCell<Vec<String>>>;

pub(crate) fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

/// Number of journal entries equal to `entry`.
pub(crate) fn count(journal: &Journal, entry: &str) -> usize {
    journal.borrow().iter().filter(|logged| *logged == entry).count()
}

//--- Recorder -------------------------------------------------------------

pub(crate) struct Recorder {
    label: String,
    journal: Journal,
}

impl Recorder {
    pub fn new(label: &str, journal: &Journal) -> Self {
        Self {
            label: label.to_string(),
            journal: Rc::clone(journal),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn relabel(&mut self, label: &str) {
        self.label = label.to_string();
    }

    fn record(&self, hook: &str) {
        self.journal.borrow_mut().push(format!("{}:{}", self.label, hook));
    }
}

impl System for Recorder {
    fn on_initialize(&mut self, _context: &InitContext<'_>) {
        self.record("init");
    }

    fn on_destroy(&mut self) {
        self.record("destroy");
    }

    fn on_activate(&mut self, _transitions: &mut Transitions<'_>) {
        self.record("activate");
    }

    fn on_post_activate(&mut self, _transitions: &mut Transitions<'_>) {
        self.record("post_activate");
    }

    fn on_deactivate(&mut self, _transitions: &mut Transitions<'_>) {
        self.record("deactivate");
    }

    fn on_update(&mut self, _frame: &mut FrameContext<'_>) {
        self.record("update");
    }

    fn on_post_update(&mut self, _frame: &mut FrameContext<'_>) {
        self.record("post_update");
    }
}

//--- Redirect -------------------------------------------------------------

/// Requests a transition to `target` whenever its state is entered.
pub(crate) struct Redirect {
    target: String,
}

impl Redirect {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
        }
    }
}

impl System for Redirect {
    fn on_activate(&mut self, transitions: &mut Transitions<'_>) {
        transitions.request_state_change(&self.target);
    }

    fn on_update(&mut self, _frame: &mut FrameContext<'_>) {}
}
