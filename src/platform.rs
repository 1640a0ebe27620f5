//! Platform-specific configuration

use crossterm::event::KeyModifiers;

/// Modifier for form shortcuts.
/// Terminals on every platform deliver Ctrl, so it is used everywhere.
pub const SHORTCUT_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;

/// Submit the document type form
pub const SAVE_KEY: char = 's';

/// Switch from sign-in to sign-up
pub const REGISTER_KEY: char = 'r';

/// Save shortcut display for form help text
pub const SAVE_SHORTCUT: &str = "Ctrl+S";

/// Sign-up shortcut display
pub const REGISTER_SHORTCUT: &str = "Ctrl+R";

