//! Shared test utilities for TUI testing with ratatui TestBackend.
//!
//! Provides helper functions for creating test terminals, extracting buffer
//! content, and building an app over in-memory storage.

#![cfg(test)]

use crate::auth::{MockAuth, Session};
use crate::data::DemoData;
use crate::i18n::Translator;
use crate::layout::{GridBounds, LayoutManager};
use crate::tui::app::App;
use crate::widgets::WidgetRegistry;
use buildtrack_storage::MemoryStorage;
use chrono::NaiveDate;
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

/// Creates a Terminal with TestBackend at the specified dimensions.
pub fn test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).expect("failed to create test terminal")
}

/// Extracts all text from a specific row in the buffer as a single String.
pub fn row_text(buffer: &Buffer, row: u16) -> String {
    let area = buffer.area();
    if row >= area.height {
        return String::new();
    }
    (0..area.width)
        .map(|col| {
            buffer
                .cell((col, row))
                .map(|cell| cell.symbol())
                .unwrap_or(" ")
        })
        .collect()
}

/// Checks if a specific row contains the given substring.
pub fn row_contains(buffer: &Buffer, row: u16, text: &str) -> bool {
    row_text(buffer, row).contains(text)
}

/// Finds the first row index that contains the given text, or None if not found.
pub fn find_row_with_text(buffer: &Buffer, text: &str) -> Option<u16> {
    let area = buffer.area();
    (0..area.height).find(|&row| row_contains(buffer, row, text))
}

/// Session of the first demo user (Ana García, project manager).
pub fn demo_session() -> Session {
    let mut storage = MemoryStorage::new();
    MockAuth::login(&mut storage, "ana@buildtrack.test").expect("demo user")
}

/// App over fresh in-memory storage: default layout on the 12x24 grid,
/// English labels, demo data as of 2026-10-16.
pub fn make_app() -> App<MemoryStorage> {
    let session = demo_session();
    let manager = LayoutManager::load(
        MemoryStorage::new(),
        WidgetRegistry::new(),
        GridBounds::default(),
        &session.user_id,
    );
    let mut app = App::new(manager, session, Translator::default());
    app.data = DemoData::sample(NaiveDate::from_ymd_opt(2026, 10, 16).expect("date"));
    app
}
