//! Run settings: language, browser, login server region and file locations.
//! Loaded from `exia.yaml` (or `EXIA_CONFIG`) with env overrides on top.

mod settings;

pub use settings::{
    load_settings, BrowserKind, Language, ServerRegion, Settings, SettingsError,
    DEFAULT_SETTINGS_PATH,
};
