use std::fmt;

/// Cookies the backend needs; everything else a browser collects is dropped.
pub const IMPORTANT_COOKIES: [&str; 10] = [
    "OptanonAlertBoxClosed",
    "game_login_game",
    "game_openid",
    "game_channelid",
    "game_token",
    "game_gameid",
    "game_user_name",
    "game_uid",
    "game_adult_status",
    "OptanonConsent",
];

/// Cookie header value for backend calls. Treated as opaque.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredential(String);

impl SessionCredential {
    pub fn new(header: impl Into<String>) -> Self {
        Self(header.into())
    }

    /// Builds a credential from name/value pairs, keeping only [IMPORTANT_COOKIES].
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let kept: Vec<String> = pairs
            .into_iter()
            .filter(|(name, _)| IMPORTANT_COOKIES.contains(name))
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        Self(kept.join("; "))
    }

    pub fn as_header(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Keep token values out of logs.
impl fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionCredential({} bytes)", self.0.len())
    }
}

/// Splits a `name=value; name=value` string. Quoted values are unquoted,
/// fragments without `=` are skipped.
pub fn parse_cookie_pairs(raw: &str) -> Vec<(&str, &str)> {
    raw.split(';')
        .filter_map(|part| {
            let (name, value) = part.trim().split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            Some((name, value))
        })
        .collect()
}

/// Reduces a pasted cookie string to the important cookies, in input order.
pub fn filter_cookie_header(raw: &str) -> SessionCredential {
    SessionCredential::from_pairs(parse_cookie_pairs(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_keeps_important_cookies_in_input_order() {
        let raw = "_ga=GA1.1; game_uid=42; game_token=\"tok\"; tracking=x; game_openid=abc";
        let credential = filter_cookie_header(raw);
        assert_eq!(credential.as_header(), "game_uid=42; game_token=tok; game_openid=abc");
    }

    #[test]
    fn malformed_fragments_are_skipped() {
        let pairs = parse_cookie_pairs("garbage; =nothing; game_gameid=16;");
        assert_eq!(pairs, vec![("game_gameid", "16")]);
    }

    #[test]
    fn debug_does_not_leak_value() {
        let credential = SessionCredential::new("game_token=secret");
        assert!(!format!("{credential:?}").contains("secret"));
    }
}
