//! Implements a struct that holds the state of the REST server.

use crate::{expense::ExpenseSnapshot, palette::Palette, session::ExpenseSession};

/// The state of the REST server.
///
/// The snapshot is shared by every request and never changes after start-up,
/// so no locking is needed.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// The expenses loaded at start-up.
    pub expenses: ExpenseSnapshot,

    /// The colours used for categories.
    pub palette: Palette,
}

impl AppState {
    /// Create a new [AppState] from a loaded snapshot and palette.
    pub fn new(expenses: ExpenseSnapshot, palette: Palette) -> Self {
        Self { expenses, palette }
    }

    /// Open a session over the shared snapshot for a single request.
    pub fn open_session(&self) -> ExpenseSession {
        ExpenseSession::new(self.expenses.clone(), self.palette.clone())
    }
}
