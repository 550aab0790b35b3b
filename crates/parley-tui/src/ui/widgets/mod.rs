//! Reusable widgets for the parley TUI.

pub mod status_bar;
pub mod text_input;

pub use status_bar::{KeyHint, StatusLine};
pub use text_input::TextInputState;
