use reqwest::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue, COOKIE};
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use crate::api::types::{EquipContents, EquipRecord, Envelope, PlayerInfo, PlayerRoster, RosterEntry};
use crate::session::SessionCredential;

pub const PLAYER_INFO_PATH: &str = "/api/ugc/direct/standalonesite/User/GetUserGamePlayerInfo";
pub const ROSTER_PATH: &str = "/api/game/proxy/Tools/GetPlayerNikkes";
pub const EQUIPMENT_PATH: &str = "/api/game/proxy/Tools/GetPlayerEquipContents";

const PORTAL_ORIGIN: &str = "https://www.blablalink.com";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36 Edg/134.0.0.0";
const COMMON_PARAMS: &str = r#"{"game_id":"16","area_id":"global","source":"pc_web","intl_game_id":"29080","language":"zh-TW","env":"prod","data_statistics_scene":"outer","data_statistics_page_id":"https://www.blablalink.com/","data_statistics_client_type":"pc_web","data_statistics_lang":"zh-TW"}"#;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("cookie is not a valid header value: {0}")]
    InvalidCookie(#[from] InvalidHeaderValue),
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },
    #[error("{endpoint} returned no data")]
    MissingData { endpoint: String },
    #[error("{endpoint} returned malformed JSON: {source}")]
    Decode {
        endpoint: String,
        source: serde_json::Error,
    },
}

/// Headers the portal's own web client sends; the backend rejects bare requests.
fn portal_headers(credential: &SessionCredential) -> Result<HeaderMap, ApiError> {
    let fixed: [(&'static str, &'static str); 13] = [
        ("accept", "application/json, text/plain, */*"),
        ("accept-language", "zh-CN,zh-TW;q=0.9,zh;q=0.8,en;q=0.7"),
        ("dnt", "1"),
        ("origin", PORTAL_ORIGIN),
        ("priority", "u=1, i"),
        ("referer", "https://www.blablalink.com/"),
        ("sec-ch-ua", r#""Chromium";v="134", "Not:A-Brand";v="24", "Microsoft Edge";v="134""#),
        ("sec-ch-ua-mobile", "?0"),
        ("sec-ch-ua-platform", r#""Windows""#),
        ("sec-fetch-dest", "empty"),
        ("sec-fetch-mode", "cors"),
        ("sec-fetch-site", "same-site"),
        ("x-channel-type", "2"),
    ];

    let mut headers = HeaderMap::new();
    for (name, value) in fixed {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    headers.insert(
        HeaderName::from_static("x-common-params"),
        HeaderValue::from_static(COMMON_PARAMS),
    );
    headers.insert(HeaderName::from_static("x-language"), HeaderValue::from_static("zh-TW"));
    let mut cookie = HeaderValue::from_str(credential.as_header())?;
    cookie.set_sensitive(true);
    headers.insert(COOKIE, cookie);
    Ok(headers)
}

/// Authenticated client for the portal backend, one per account.
#[derive(Debug, Clone)]
pub struct PortalClient {
    http: reqwest::Client,
    base: String,
}

impl PortalClient {
    pub fn new(api_base: &str, credential: &SessionCredential) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .default_headers(portal_headers(credential)?)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// POSTs a JSON body; `Ok(None)` when the backend answers `null` or omits `data`.
    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<Option<T>, ApiError> {
        let response = self
            .http
            .post(format!("{}{path}", self.base))
            .json(body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }
        let text = response.text().await?;
        let envelope: Option<Envelope<T>> =
            serde_json::from_str(&text).map_err(|source| ApiError::Decode {
                endpoint: path.to_string(),
                source,
            })?;
        if let Some(Envelope { code: Some(code), msg, .. }) = &envelope {
            if *code != 0 {
                log::debug!("{path} answered code {code}: {}", msg.as_deref().unwrap_or(""));
            }
        }
        Ok(envelope.and_then(|env| env.data))
    }

    async fn post_required<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ApiError> {
        self.post(path, body).await?.ok_or_else(|| ApiError::MissingData {
            endpoint: path.to_string(),
        })
    }

    /// In-game display name. Also serves as the session validity check.
    pub async fn role_name(&self) -> Result<String, ApiError> {
        let info: PlayerInfo = self.post_required(PLAYER_INFO_PATH, &json!({})).await?;
        if info.role_name.is_empty() {
            return Err(ApiError::MissingData {
                endpoint: PLAYER_INFO_PATH.to_string(),
            });
        }
        Ok(info.role_name)
    }

    pub async fn player_roster(&self) -> Result<Vec<RosterEntry>, ApiError> {
        let roster: PlayerRoster = self.post_required(ROSTER_PATH, &json!({})).await?;
        Ok(roster.player_nikkes)
    }

    /// Equipment snapshots for a range of character ids, oldest first.
    /// The endpoint intermittently answers `null`; one retry covers that.
    pub async fn equipment(&self, character_ids: &[u64]) -> Result<Vec<EquipRecord>, ApiError> {
        let body = json!({ "character_ids": character_ids });
        let contents: EquipContents = match self.post(EQUIPMENT_PATH, &body).await? {
            Some(contents) => contents,
            None => {
                log::debug!("empty equipment answer for {:?}, retrying", character_ids.first());
                self.post_required(EQUIPMENT_PATH, &body).await?
            }
        };
        Ok(contents.player_equip_contents)
    }
}

/// Consecutive equipment ids owned by one character: `id .. id + span`.
pub fn character_id_range(id: u64, span: u64) -> Vec<u64> {
    (id..id + span).collect()
}
