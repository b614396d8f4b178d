use super::*;

#[test]
fn default_theme_is_first() {
    assert_eq!(Theme::default(), THEMES[0]);
    assert_eq!(Theme::default().key, "vscode-dark-plus");
}

#[test]
fn theme_keys_are_unique() {
    for (i, a) in THEMES.iter().enumerate() {
        for b in &THEMES[i + 1..] {
            assert_ne!(a.key, b.key);
        }
    }
}

#[test]
fn by_key_finds_every_theme() {
    for t in THEMES {
        assert_eq!(Theme::by_key(t.key), Ok(t));
    }
}

#[test]
fn by_key_unknown() {
    assert_eq!(Theme::by_key("neon"), Err(ThemeError::Unknown("neon".into())));
}

#[test]
fn load_theme_from_empty_store_is_default() {
    assert_eq!(load_theme(&MemoryThemeStore::new()), Theme::default());
}

#[test]
fn load_theme_restores_saved_key() {
    let store = MemoryThemeStore::with_value("monokai");
    assert_eq!(load_theme(&store), MONOKAI);
}

#[test]
fn load_theme_unknown_key_falls_back() {
    let store = MemoryThemeStore::with_value("no-such-theme");
    assert_eq!(load_theme(&store), Theme::default());
}

#[test]
fn select_theme_persists() {
    let store = MemoryThemeStore::new();
    assert_eq!(select_theme(&store, "solarized-light"), Ok(SOLARIZED_LIGHT));
    assert_eq!(store.load().as_deref(), Some("solarized-light"));
    assert_eq!(load_theme(&store), SOLARIZED_LIGHT);
}

#[test]
fn select_unknown_theme_leaves_store() {
    let store = MemoryThemeStore::with_value("monokai");
    assert!(select_theme(&store, "neon").is_err());
    assert_eq!(store.load().as_deref(), Some("monokai"));
}

struct FailingStore;

impl ThemeStore for FailingStore {
    fn load(&self) -> Option<String> {
        None
    }

    fn save(&self, _key: &str) -> Result<(), ThemeError> {
        Err(ThemeError::Storage("quota exceeded".into()))
    }
}

#[test]
fn select_theme_survives_storage_failure() {
    assert_eq!(select_theme(&FailingStore, "monokai"), Ok(MONOKAI));
}

#[test]
fn storage_key_name() {
    assert_eq!(STORAGE_KEY, "themeKey");
}
