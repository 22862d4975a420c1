//! Question cursor for an attempt.
//!
//! Holds nothing but the cursor and the count; it knows nothing about
//! answers. Out-of-range moves are ignored rather than rejected loudly -
//! navigation buttons are expected to be pre-disabled at the boundaries,
//! but the contract stays defensive.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Navigator {
    cursor: usize,
    count: usize,
}

impl Navigator {
    /// Cursor starts at the first question.
    pub fn new(count: usize) -> Self {
        Self { cursor: 0, count }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Move to `index` if it is in bounds. Returns whether the cursor moved;
    /// an out-of-range request leaves it unchanged.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index < self.count {
            self.cursor = index;
            true
        } else {
            false
        }
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.cursor.saturating_add(1))
    }

    pub fn previous(&mut self) -> bool {
        match self.cursor.checked_sub(1) {
            Some(index) => self.go_to(index),
            None => false,
        }
    }
}
