//! TUI module for the BuildTrack dashboard.
//!
//! Provides a terminal user interface built on ratatui and crossterm that
//! draws the logged-in user's widget grid and hosts edit mode: mouse drag
//! and resize, keyboard moves, the add-widget picker and the settings panel.

pub mod app;
pub mod event;
pub mod ui;

#[cfg(test)]
pub(crate) mod test_utils;
