//! Query state — current search text and sort option.
//!
//! Setters notify immediately. Debouncing belongs to the engine.

use super::SortOption;
use crate::engine::Change;
use crate::shared::Observable;
use tokio::sync::watch;

#[derive(Debug, Default)]
pub struct QueryState {
    search_text: Observable<String>,
    sort_option: Observable<SortOption>,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "the returned change must be handed to the engine"]
    pub fn set_search_text(&self, text: impl Into<String>) -> Change {
        self.search_text.replace(text.into());
        Change::SearchText
    }

    #[must_use = "the returned change must be handed to the engine"]
    pub fn set_sort_option(&self, option: SortOption) -> Change {
        self.sort_option.replace(option);
        Change::SortOption
    }

    pub fn search_text(&self) -> String {
        self.search_text.get()
    }

    pub fn sort_option(&self) -> SortOption {
        self.sort_option.get()
    }

    pub fn subscribe_search_text(&self) -> watch::Receiver<String> {
        self.search_text.subscribe()
    }

    pub fn subscribe_sort_option(&self) -> watch::Receiver<SortOption> {
        self.sort_option.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_notify_immediately() {
        let query = QueryState::new();
        let mut rx = query.subscribe_search_text();
        assert_eq!(query.set_search_text("eth"), Change::SearchText);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), "eth");

        assert_eq!(query.sort_option(), SortOption::Holdings);
        assert_eq!(query.set_sort_option(SortOption::Price), Change::SortOption);
        assert_eq!(query.sort_option(), SortOption::Price);
    }
}
