use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_SETTINGS_PATH: &str = "exia.yaml";
pub const DEFAULT_API_BASE: &str = "https://api.blablalink.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Chinese,
}

impl Language {
    /// Accepts the menu numbers of the old interactive prompt as well as names.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "en" | "eng" | "english" => Some(Self::English),
            "2" | "zh" | "chs" | "chinese" => Some(Self::Chinese),
            _ => None,
        }
    }

    pub fn template_file(self) -> &'static str {
        match self {
            Self::English => "SearchIndexEng.json",
            Self::Chinese => "SearchIndexChs.json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Edge,
    Chrome,
}

/// Login server region as listed on the portal's region picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerRegion {
    /// HK / MC / TW
    Hmt,
    /// JP / KR / NA / SEA / Global
    #[default]
    Global,
}

impl ServerRegion {
    /// 1-based position of the region in the picker list.
    pub fn picker_index(self) -> usize {
        match self {
            Self::Hmt => 1,
            Self::Global => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub language: Language,
    pub browser: BrowserKind,
    pub server: ServerRegion,
    pub webdriver_url: Option<String>,
    pub headless: bool,
    pub accounts_path: PathBuf,
    pub template_dir: PathBuf,
    pub output_dir: PathBuf,
    pub api_base: String,
    pub export_json: bool,
    pub equipment_id_span: u64,
    pub error_list_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::English,
            browser: BrowserKind::Edge,
            server: ServerRegion::Global,
            webdriver_url: None,
            headless: false,
            accounts_path: PathBuf::from(crate::data::accounts::DEFAULT_ACCOUNTS_PATH),
            template_dir: PathBuf::from("."),
            output_dir: PathBuf::from("output"),
            api_base: DEFAULT_API_BASE.to_string(),
            export_json: false,
            equipment_id_span: 11,
            error_list_path: PathBuf::from("ErrorList.txt"),
        }
    }
}

impl Settings {
    pub fn template_path(&self) -> PathBuf {
        self.template_dir.join(self.language.template_file())
    }

    /// Applies `EXIA_*` environment overrides in place.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup("EXIA_LANGUAGE") {
            match Language::parse(&raw) {
                Some(language) => self.language = language,
                None => log::warn!("ignoring unknown EXIA_LANGUAGE '{raw}'"),
            }
        }
        if let Some(base) = lookup("EXIA_API_BASE") {
            self.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(dir) = lookup("EXIA_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup("EXIA_WEBDRIVER_URL") {
            self.webdriver_url = Some(url);
        }
        if let Some(path) = lookup("EXIA_ACCOUNTS") {
            self.accounts_path = PathBuf::from(path);
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse settings {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
}

/// Loads settings from a YAML file, falling back to defaults when the file is missing.
/// Environment overrides are applied on top either way.
pub fn load_settings(path: impl AsRef<Path>) -> Result<Settings, SettingsError> {
    let path = path.as_ref();
    let mut settings = if path.exists() {
        let raw = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })?
    } else {
        log::debug!("no settings at {}, using defaults", path.display());
        Settings::default()
    };
    settings.apply_env();
    Ok(settings)
}
