//! Dashboard runtime configuration.

use crate::engine::DEFAULT_SEARCH_DEBOUNCE;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Quiet period after the last search edit before the list is refiltered.
    pub search_debounce: Duration,
    /// Fetch assets and stats as soon as the runtime starts.
    pub refresh_on_start: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            refresh_on_start: true,
        }
    }
}

impl DashboardConfig {
    pub fn search_debounce(mut self, window: Duration) -> Self {
        self.search_debounce = window;
        self
    }

    pub fn refresh_on_start(mut self, enabled: bool) -> Self {
        self.refresh_on_start = enabled;
        self
    }
}
