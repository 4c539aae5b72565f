//! View-only options toggled from the keyboard.
//!
//! Stream-derived state lives in the controller; nothing here feeds back
//! into decoding or tracking. These options only change which slice of an
//! existing snapshot gets drawn.

use crate::view_state::Phase;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiOptions {
    /// Keep tables pinned to the newest row as records arrive.
    pub follow: bool,
    /// Steps back from the most recently entered phase page.
    pub page_back: usize,
    /// Manual table scroll offset, used when `follow` is off.
    pub scroll: usize,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            follow: true,
            page_back: 0,
            scroll: 0,
        }
    }
}

impl UiOptions {
    /// The phase page to draw: the latest visited phase, stepped back by
    /// `page_back` and clamped to the first one.
    pub fn page(&self, visited: &[Phase]) -> Phase {
        if visited.is_empty() {
            return Phase::Idle;
        }
        let latest = visited.len() - 1;
        visited[latest - self.page_back.min(latest)]
    }

    pub fn page_prev(&mut self) {
        // Clamped against the visited list at draw time.
        self.page_back = self.page_back.saturating_add(1);
    }

    pub fn page_next(&mut self) {
        self.page_back = self.page_back.saturating_sub(1);
    }

    pub fn toggle_follow(&mut self) {
        self.follow = !self.follow;
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
        self.follow = false;
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
        self.follow = false;
    }
}
