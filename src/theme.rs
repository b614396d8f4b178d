//! Visual themes and their persisted selection.
//!
//! The only persisted state is the active theme key, stored under a single
//! `localStorage` key. Storage is best-effort: a missing or broken store
//! falls back to the default theme.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use std::cell::RefCell;

/// Storage key holding the active theme name.
pub const STORAGE_KEY: &str = "themeKey";

/// Errors from theme lookup and persistence.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ThemeError {
    /// No theme with this key.
    #[error("unknown theme {0:?}")]
    Unknown(String),
    /// The backing store refused the write.
    #[error("theme storage unavailable: {0}")]
    Storage(String),
}

/// Canvas palette for one theme. All values are CSS color strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub key: &'static str,
    pub canvas_bg: &'static str,
    pub grid_minor: &'static str,
    pub grid_major: &'static str,
    pub axis: &'static str,
    pub plot: &'static str,
    pub hud_bg: &'static str,
    pub hud_text: &'static str,
    pub muted: &'static str,
}

pub const VSCODE_DARK_PLUS: Theme = Theme {
    key: "vscode-dark-plus",
    canvas_bg: "#1e1e1e",
    grid_minor: "rgba(255,255,255,0.10)",
    grid_major: "rgba(255,255,255,0.25)",
    axis: "#569cd6",
    plot: "#ce9178",
    hud_bg: "rgba(0,0,0,0.70)",
    hud_text: "#e6e6e6",
    muted: "#b8c0dc",
};

pub const VSCODE_LIGHT_PLUS: Theme = Theme {
    key: "vscode-light-plus",
    canvas_bg: "#ffffff",
    grid_minor: "rgba(0,0,0,0.08)",
    grid_major: "rgba(0,0,0,0.20)",
    axis: "#0000ff",
    plot: "#a31515",
    hud_bg: "rgba(255,255,255,0.85)",
    hud_text: "#1f1f1f",
    muted: "#6a6a6a",
};

pub const MONOKAI: Theme = Theme {
    key: "monokai",
    canvas_bg: "#272822",
    grid_minor: "rgba(248,248,242,0.08)",
    grid_major: "rgba(248,248,242,0.22)",
    axis: "#66d9ef",
    plot: "#f92672",
    hud_bg: "rgba(0,0,0,0.65)",
    hud_text: "#f8f8f2",
    muted: "#a59f85",
};

pub const SOLARIZED_DARK: Theme = Theme {
    key: "solarized-dark",
    canvas_bg: "#002b36",
    grid_minor: "rgba(147,161,161,0.12)",
    grid_major: "rgba(147,161,161,0.28)",
    axis: "#268bd2",
    plot: "#cb4b16",
    hud_bg: "rgba(0,0,0,0.60)",
    hud_text: "#eee8d5",
    muted: "#93a1a1",
};

pub const SOLARIZED_LIGHT: Theme = Theme {
    key: "solarized-light",
    canvas_bg: "#fdf6e3",
    grid_minor: "rgba(88,110,117,0.10)",
    grid_major: "rgba(88,110,117,0.25)",
    axis: "#268bd2",
    plot: "#d33682",
    hud_bg: "rgba(238,232,213,0.90)",
    hud_text: "#073642",
    muted: "#657b83",
};

/// Every built-in theme; the first is the default.
pub const THEMES: [Theme; 5] = [VSCODE_DARK_PLUS, VSCODE_LIGHT_PLUS, MONOKAI, SOLARIZED_DARK, SOLARIZED_LIGHT];

impl Default for Theme {
    fn default() -> Self {
        VSCODE_DARK_PLUS
    }
}

impl Theme {
    /// Look up a built-in theme by key.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::Unknown`] for an unrecognised key.
    pub fn by_key(key: &str) -> Result<Theme, ThemeError> {
        THEMES
            .iter()
            .copied()
            .find(|t| t.key == key)
            .ok_or_else(|| ThemeError::Unknown(key.to_owned()))
    }
}

/// Where the active theme key is persisted.
pub trait ThemeStore {
    /// The stored key, if any.
    fn load(&self) -> Option<String>;

    /// Persist `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::Storage`] when the store rejects the write.
    fn save(&self, key: &str) -> Result<(), ThemeError>;
}

/// Theme store backed by `window.localStorage`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageThemeStore;

impl LocalStorageThemeStore {
    fn storage() -> Option<web_sys::Storage> {
        match web_sys::window()?.local_storage() {
            Ok(storage) => storage,
            Err(e) => {
                log::warn!("localStorage unavailable: {e:?}");
                None
            }
        }
    }
}

impl ThemeStore for LocalStorageThemeStore {
    fn load(&self) -> Option<String> {
        match Self::storage()?.get_item(STORAGE_KEY) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("failed to read {STORAGE_KEY}: {e:?}");
                None
            }
        }
    }

    fn save(&self, key: &str) -> Result<(), ThemeError> {
        let storage = Self::storage().ok_or_else(|| ThemeError::Storage("no localStorage".into()))?;
        storage
            .set_item(STORAGE_KEY, key)
            .map_err(|e| ThemeError::Storage(format!("{e:?}")))
    }
}

/// In-process theme store for tests and non-browser hosts.
#[derive(Debug, Default)]
pub struct MemoryThemeStore {
    value: RefCell<Option<String>>,
}

impl MemoryThemeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `key`.
    #[must_use]
    pub fn with_value(key: &str) -> Self {
        Self { value: RefCell::new(Some(key.to_owned())) }
    }
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Option<String> {
        self.value.borrow().clone()
    }

    fn save(&self, key: &str) -> Result<(), ThemeError> {
        *self.value.borrow_mut() = Some(key.to_owned());
        Ok(())
    }
}

/// The persisted theme, or the default when nothing valid is stored.
#[must_use]
pub fn load_theme(store: &dyn ThemeStore) -> Theme {
    let Some(key) = store.load() else {
        return Theme::default();
    };
    Theme::by_key(&key).unwrap_or_else(|e| {
        log::warn!("{e}; using {}", Theme::default().key);
        Theme::default()
    })
}

/// Switch to the theme named `key` and persist the choice.
///
/// The theme is returned even if persisting fails; that failure is logged.
///
/// # Errors
///
/// Returns [`ThemeError::Unknown`] for an unrecognised key.
pub fn select_theme(store: &dyn ThemeStore, key: &str) -> Result<Theme, ThemeError> {
    let theme = Theme::by_key(key)?;
    if let Err(e) = store.save(key) {
        log::warn!("{e}");
    }
    log::info!("theme set to {key}");
    Ok(theme)
}
