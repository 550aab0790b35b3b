//! Theme and styling definitions for the parley TUI.

use ratatui::style::{Color, Modifier, Style};

/// Color palette for the TUI.
pub struct Palette;

impl Palette {
    // Base colors
    pub const BG: Color = Color::Rgb(24, 26, 32);
    pub const FG: Color = Color::Rgb(218, 222, 230);
    pub const DIM: Color = Color::Rgb(130, 138, 155);

    // Accent colors
    pub const ACCENT: Color = Color::Rgb(120, 180, 250);
    pub const USER: Color = Color::Rgb(150, 210, 150);

    // Status bar colors (high contrast)
    pub const STATUS_BG: Color = Color::Rgb(42, 46, 58);
    pub const STATUS_KEY_BG: Color = Color::Rgb(70, 95, 145);

    // Border colors
    pub const BORDER: Color = Color::Rgb(78, 82, 100);
    pub const BORDER_ACTIVE: Color = Color::Rgb(120, 180, 250);
}

/// Indicator symbols (ASCII, terminal-safe).
pub struct Symbols;

impl Symbols {
    pub const SPINNER: [&'static str; 4] = ["|", "/", "-", "\\"];
}

/// Common styles used throughout the TUI.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::BG)
    }

    /// Dimmed text for secondary information.
    pub fn dim() -> Style {
        Style::default().fg(Palette::DIM).bg(Palette::BG)
    }

    /// Highlighted/selected item.
    pub fn highlight() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Active/focused element.
    pub fn active() -> Style {
        Style::default().fg(Palette::ACCENT).bg(Palette::BG)
    }

    /// Speaker label for user messages.
    pub fn user() -> Style {
        Style::default()
            .fg(Palette::USER)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Title style.
    pub fn title() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint style (for status bar) - bright on dark for visibility.
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Palette::FG)
            .bg(Palette::STATUS_KEY_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint label style - readable on status bar background.
    pub fn key_label() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// Status bar background style.
    pub fn status_bar() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// Border style for inactive elements.
    pub fn border() -> Style {
        Style::default().fg(Palette::BORDER)
    }

    /// Border style for active/focused elements.
    pub fn border_active() -> Style {
        Style::default().fg(Palette::BORDER_ACTIVE)
    }
}
