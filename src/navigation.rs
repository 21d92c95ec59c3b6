use crate::enums::StepDirection;

use std::time::Duration;
use web_time::Instant;

/// Minimum spacing between accepted navigation transitions. Wheel events
/// arrive far faster than images can load; input inside the window is
/// dropped, never queued.
pub const NAVIGATION_INPUT_WINDOW: Duration = Duration::from_millis(40);

/// Navigation events as mapped from the user's wheel/key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationInput {
    Step(StepDirection),
    Reverse,
}

/// Current position inside an ordered stack of known length. The index is
/// clamped to `[0, len)` on every mutation and never wraps.
#[derive(Debug, Clone)]
pub struct NavigationState {
    index: usize,
    len: usize,
}

impl NavigationState {
    /// Start at the first stack position. `len` must be non-zero; resolution
    /// fails before navigation state exists for an empty stack.
    pub fn new(len: usize) -> Self {
        debug_assert!(len > 0);
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Move one position, clamped at the stack bounds. Returns the new index.
    pub fn step(&mut self, direction: StepDirection) -> usize {
        self.index = match direction {
            StepDirection::Forward => (self.index + 1).min(self.len - 1),
            StepDirection::Backward => self.index.saturating_sub(1),
        };
        self.index
    }

    /// Remap the index after the stack was reversed, so the same image stays
    /// current: position `i` becomes `len - 1 - i`.
    pub fn remap_reversed(&mut self) -> usize {
        self.index = self.len - 1 - self.index;
        self.index
    }
}

/// Admits at most one transition per time window; the sole concurrency guard
/// between user input and in-flight loads.
pub struct RateLimiter {
    window: Duration,
    last_admitted: Option<Instant>,
}

impl RateLimiter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_admitted: None,
        }
    }

    /// True when enough time has passed since the last admitted event.
    pub fn admit(&mut self) -> bool {
        let now = Instant::now();
        match self.last_admitted {
            Some(last) if now.duration_since(last) < self.window => false,
            _ => {
                self.last_admitted = Some(now);
                true
            }
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(NAVIGATION_INPUT_WINDOW)
    }
}
