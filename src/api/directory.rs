//! Public character directory published on the tools CDN, one JSON file per locale.

use std::fs;
use std::path::{Path, PathBuf};

use crate::api::ApiError;

pub const DIRECTORY_CDN: &str = "https://sg-tools-cdn.blablalink.com/character";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryLocale {
    TraditionalChinese,
    English,
    Korean,
    Japanese,
}

impl DirectoryLocale {
    pub const ALL: [Self; 4] = [
        Self::TraditionalChinese,
        Self::English,
        Self::Korean,
        Self::Japanese,
    ];

    /// Path below [DIRECTORY_CDN].
    pub fn remote_path(self) -> &'static str {
        match self {
            Self::TraditionalChinese => "zh-TW/nikke_list_zh-TW.json",
            Self::English => "en/nikke_list_en.json",
            Self::Korean => "ko/nikke_list.json",
            Self::Japanese => "ja/nikke_list_ja.json",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::TraditionalChinese => "nikke_list_繁體中文.json",
            Self::English => "nikke_list_English.json",
            Self::Korean => "nikke_list_한국어.json",
            Self::Japanese => "nikke_list_日本語.json",
        }
    }
}

pub async fn fetch_directory(
    http: &reqwest::Client,
    cdn_base: &str,
    locale: DirectoryLocale,
) -> Result<serde_json::Value, ApiError> {
    let url = format!("{}/{}", cdn_base.trim_end_matches('/'), locale.remote_path());
    let response = http.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status {
            endpoint: url,
            status: status.as_u16(),
        });
    }
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|source| ApiError::Decode { endpoint: url, source })
}

/// Downloads every locale into `out_dir`, pretty-printed. Returns the written paths.
pub async fn download_directories(
    cdn_base: &str,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error + Send + Sync>> {
    let http = reqwest::Client::new();
    fs::create_dir_all(out_dir)?;
    let mut written = Vec::new();
    for locale in DirectoryLocale::ALL {
        let payload = fetch_directory(&http, cdn_base, locale).await?;
        let path = out_dir.join(locale.file_name());
        fs::write(&path, serde_json::to_string_pretty(&payload)?)?;
        log::info!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}
