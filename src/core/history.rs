//! # History Stack
//!
//! Ordered record of previously displayed pages, enabling "back"
//! navigation. Append-only except for pop-from-top and full-clear.
//!
//! Invariant: the stack never holds two consecutive structurally-equal
//! entries. `append_if_new` enforces it at the only place pages enter the
//! stack, so "back" can never loop on the same page.

use std::fmt;

use log::debug;

use crate::core::compare::equals;
use crate::core::page::Page;

/// Attempted to pop with nothing on the stack. The engine prevents this by
/// ignoring `b` while the stack is empty; the error exists so misuse is
/// loud instead of silent.
#[derive(Debug, PartialEq, Eq)]
pub struct EmptyHistory;

impl fmt::Display for EmptyHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "navigation history is empty")
    }
}

impl std::error::Error for EmptyHistory {}

#[derive(Debug, Default)]
pub struct HistoryStack {
    entries: Vec<Page>,
}

impl HistoryStack {
    pub fn new() -> Self {
        HistoryStack { entries: Vec::new() }
    }

    pub fn push(&mut self, page: Page) {
        self.entries.push(page);
    }

    pub fn pop(&mut self) -> Result<Page, EmptyHistory> {
        self.entries.pop().ok_or(EmptyHistory)
    }

    /// Cleared whenever the engine returns home.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn peek_top(&self) -> Option<&Page> {
        self.entries.last()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Records the page being transitioned away from, unless the transition
    /// is a revisit (entered via back/retry) or the page is already on top.
    /// Returns whether a push occurred.
    pub fn append_if_new(&mut self, departing: &Page, was_revisited: bool) -> bool {
        if was_revisited {
            return false;
        }
        let duplicate_top = self
            .peek_top()
            .is_some_and(|top| equals(top, departing, &[]));
        if duplicate_top {
            return false;
        }
        debug!("history push: {:?} (depth {})", departing.name, self.entries.len() + 1);
        self.entries.push(departing.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::page::{Page, PageName};

    fn listing(names: &[&str]) -> Page {
        Page::listing(names.iter().map(|n| n.to_string()).collect())
    }

    #[test]
    fn pop_on_empty_fails() {
        let mut stack = HistoryStack::new();
        assert_eq!(stack.pop(), Err(EmptyHistory));
    }

    #[test]
    fn push_pop_round_trip() {
        let mut stack = HistoryStack::new();
        stack.push(Page::home());
        stack.push(listing(&["Aruba"]));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.pop().map(|p| p.name), Ok(PageName::ListAll));
        assert_eq!(stack.pop().map(|p| p.name), Ok(PageName::Home));
        assert!(stack.is_empty());
    }

    #[test]
    fn clear_empties_the_stack() {
        let mut stack = HistoryStack::new();
        stack.push(Page::home());
        stack.clear();
        assert!(stack.is_empty());
        assert!(stack.peek_top().is_none());
    }

    #[test]
    fn append_if_new_pushes_fresh_pages() {
        let mut stack = HistoryStack::new();
        assert!(stack.append_if_new(&Page::home(), false));
        assert!(stack.append_if_new(&listing(&["Chad"]), false));
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn append_if_new_suppresses_revisits() {
        let mut stack = HistoryStack::new();
        assert!(!stack.append_if_new(&Page::home(), true));
        assert!(stack.is_empty());
    }

    #[test]
    fn append_if_new_refuses_a_duplicate_top() {
        let mut stack = HistoryStack::new();
        assert!(stack.append_if_new(&listing(&["Chad", "Aruba"]), false));
        assert!(!stack.append_if_new(&listing(&["Chad", "Aruba"]), false));
        assert_eq!(stack.len(), 1);

        // A structurally different page still goes on.
        assert!(stack.append_if_new(&listing(&["Chad"]), false));
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn no_two_consecutive_entries_are_equal() {
        let mut stack = HistoryStack::new();
        let pages = [
            Page::home(),
            listing(&["Aruba"]),
            listing(&["Aruba"]),
            Page::search_menu(),
            Page::search_menu(),
            Page::home(),
        ];
        for page in &pages {
            stack.append_if_new(page, false);
        }
        for pair in stack.entries.windows(2) {
            assert!(!equals(&pair[0], &pair[1], &[]));
        }
    }
}
