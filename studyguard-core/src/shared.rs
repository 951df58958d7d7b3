//! State shared between the poll loop and the background threads
//!
//! Exactly two values cross thread boundaries:
//!
//! | Flag | Writer | Reader |
//! |------|--------|--------|
//! | uncomfortable | poll loop | indicator thread |
//! | show score | toggle thread | poll loop |
//!
//! Each is a single `AtomicBool`, so a reader never observes a torn value.
//! No other memory is published through either flag and a reader that sees
//! the old value for one more iteration is fine, hence `Relaxed` ordering.
//! The handle is passed to every task explicitly; there is no global state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::display::DisplayMode;

/// Flags shared by the three monitor tasks
#[derive(Debug, Default)]
pub struct SharedState {
    uncomfortable: AtomicBool,
    show_score: AtomicBool,
}

/// Cheaply cloneable handle to [`SharedState`]
pub type SharedHandle = Arc<SharedState>;

impl SharedState {
    /// Fresh state behind an `Arc`: comfortable, stats mode
    pub fn new_handle() -> SharedHandle {
        Arc::new(Self::default())
    }

    /// Whether the last poll raised any reason
    pub fn is_uncomfortable(&self) -> bool {
        self.uncomfortable.load(Ordering::Relaxed)
    }

    /// Publish the outcome of a poll
    pub fn set_uncomfortable(&self, uncomfortable: bool) {
        self.uncomfortable.store(uncomfortable, Ordering::Relaxed);
    }

    /// Mode the next poll renders
    pub fn display_mode(&self) -> DisplayMode {
        Self::mode_for(self.show_score.load(Ordering::Relaxed))
    }

    /// Select a mode directly
    pub fn set_display_mode(&self, mode: DisplayMode) {
        self.show_score.store(mode == DisplayMode::Score, Ordering::Relaxed);
    }

    /// Flip the mode and return the new one
    pub fn toggle_display_mode(&self) -> DisplayMode {
        let was_score = self.show_score.fetch_xor(true, Ordering::Relaxed);
        Self::mode_for(was_score).toggled()
    }

    fn mode_for(show_score: bool) -> DisplayMode {
        if show_score {
            DisplayMode::Score
        } else {
            DisplayMode::Stats
        }
    }
}

/// Cooperative stop signal for one background thread
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    /// A flag that is not raised yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag; every clone sees it
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether the flag was raised
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
