//! Scroll position of the terms dialog

/// Terms rows visible at once in the dialog
pub const TERMS_VISIBLE_ROWS: usize = 14;

/// Open terms dialog. Acceptance unlocks once the last line has been on
/// screen, and stays unlocked when scrolling back up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermsState {
    scroll: usize,
    line_count: usize,
    visible_rows: usize,
    reached_end: bool,
}

impl TermsState {
    pub fn new(line_count: usize, visible_rows: usize) -> Self {
        let mut state = Self {
            scroll: 0,
            line_count,
            visible_rows: visible_rows.max(1),
            reached_end: false,
        };
        state.note_position();
        state
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    /// Whether the accept key is live
    pub fn can_accept(&self) -> bool {
        self.reached_end
    }

    fn max_scroll(&self) -> usize {
        self.line_count.saturating_sub(self.visible_rows)
    }

    fn note_position(&mut self) {
        if self.scroll >= self.max_scroll() {
            self.reached_end = true;
        }
    }

    pub fn scroll_by(&mut self, rows: isize) {
        self.scroll = self
            .scroll
            .saturating_add_signed(rows)
            .min(self.max_scroll());
        self.note_position();
    }

    pub fn scroll_to_end(&mut self) {
        self.scroll = self.max_scroll();
        self.note_position();
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod scrolling {
        use super::*;

        #[test]
        fn test_long_terms_start_locked() {
            let terms = TermsState::new(40, 10);
            assert!(!terms.can_accept());
            assert_eq!(terms.scroll(), 0);
        }

        #[test]
        fn test_short_terms_are_accepted_without_scrolling() {
            assert!(TermsState::new(8, 10).can_accept());
            assert!(TermsState::new(10, 10).can_accept());
        }

        #[test]
        fn test_reaching_last_line_unlocks() {
            let mut terms = TermsState::new(40, 10);
            terms.scroll_by(29);
            assert!(!terms.can_accept());
            terms.scroll_by(1);
            assert!(terms.can_accept());
        }

        #[test]
        fn test_scroll_is_clamped() {
            let mut terms = TermsState::new(40, 10);
            terms.scroll_by(-5);
            assert_eq!(terms.scroll(), 0);
            terms.scroll_by(100);
            assert_eq!(terms.scroll(), 30);
        }

        #[test]
        fn test_unlock_survives_scrolling_back() {
            let mut terms = TermsState::new(40, 10);
            terms.scroll_to_end();
            terms.scroll_to_top();
            assert!(terms.can_accept());
        }
    }
}
