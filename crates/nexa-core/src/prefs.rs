//! User preferences kept in the session store under reserved keys.

use crate::error::Result;
use crate::store::SessionStore;

/// Reserved key holding the color scheme. Never surfaced as a session.
pub const THEME_KEY: &str = "theme";

/// Color scheme preference. Stored as a bare string, not JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

/// Read the stored theme, falling back to the default for a missing or
/// unrecognized value.
pub fn load_theme(store: &impl SessionStore) -> Result<Theme> {
    Ok(store
        .get(THEME_KEY)?
        .as_deref()
        .and_then(Theme::parse)
        .unwrap_or_default())
}

/// Persist the theme under the reserved key.
pub fn save_theme(store: &impl SessionStore, theme: Theme) -> Result<()> {
    store.set(THEME_KEY, theme.as_str())
}
