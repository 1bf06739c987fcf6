//! Accounts list (`LoginIndex.csv`): one row per account with name, e-mail,
//! password and an optional pre-captured cookie string.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use encoding_rs::{GB18030, UTF_8};
use thiserror::Error;

pub const DEFAULT_ACCOUNTS_PATH: &str = "LoginIndex.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRow {
    /// 1-based position in the list, used in progress and error reports.
    pub index: usize,
    pub name: String,
    pub email: Option<String>,
    pub password: Option<String>,
    pub cookies: Option<String>,
}

impl AccountRow {
    pub fn can_log_in(&self) -> bool {
        self.email.is_some() && self.password.is_some()
    }

    /// Rows with neither a cookie nor full credentials cannot be processed.
    pub fn is_usable(&self) -> bool {
        self.cookies.is_some() || self.can_log_in()
    }
}

#[derive(Debug, Error)]
pub enum AccountsError {
    #[error("failed to read accounts file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse accounts CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Empty, whitespace-only and `nan` cells count as missing.
pub fn is_missing(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan")
}

fn present(raw: Option<&str>) -> Option<String> {
    raw.filter(|v| !is_missing(v)).map(|v| v.trim().to_string())
}

pub fn load_accounts(path: impl AsRef<Path>) -> Result<Vec<AccountRow>, AccountsError> {
    let bytes = fs::read(path)?;
    parse_accounts(&bytes)
}

/// UTF-8 (BOM optional) when the bytes are valid UTF-8, GB18030 otherwise.
/// GB18030 is a superset of GBK, which Chinese-locale Excel writes.
pub fn decode_accounts(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        return text;
    }
    let (text, _, had_errors) = GB18030.decode(bytes);
    if had_errors {
        log::warn!("accounts file is neither UTF-8 nor GB18030; undecodable bytes replaced");
    }
    text
}

pub fn parse_accounts(bytes: &[u8]) -> Result<Vec<AccountRow>, AccountsError> {
    let text = decode_accounts(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let header: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let column = |name: &str| header.iter().position(|h| h.eq_ignore_ascii_case(name));
    let name_col = column("Name");
    let email_col = column("E-mail").or_else(|| column("Email"));
    let password_col = column("Password");
    let cookies_col = column("Cookies").or_else(|| column("Cookie"));

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let cell = |col: Option<usize>| col.and_then(|c| record.get(c));
        rows.push(AccountRow {
            index: i + 1,
            name: cell(name_col).map(str::trim).unwrap_or_default().to_string(),
            email: present(cell(email_col)),
            password: present(cell(password_col)),
            cookies: present(cell(cookies_col)),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_and_treats_nan_as_missing() {
        let csv = "\u{feff}Name,E-mail,Password,Cookies\n\
                   alpha,a@example.com,secret,\n\
                   beta,,,game_token=abc; game_uid=1\n\
                   gamma,nan,NaN,  \n";
        let rows = parse_accounts(csv.as_bytes()).expect("csv should parse");
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].index, 1);
        assert_eq!(rows[0].name, "alpha");
        assert!(rows[0].can_log_in());
        assert_eq!(rows[0].cookies, None);

        assert_eq!(rows[1].cookies.as_deref(), Some("game_token=abc; game_uid=1"));
        assert!(rows[1].is_usable());
        assert!(!rows[1].can_log_in());

        assert_eq!(rows[2].email, None);
        assert!(!rows[2].is_usable());
    }

    #[test]
    fn gbk_encoded_names_are_decoded() {
        let mut bytes = b"Name,E-mail,Password\n".to_vec();
        bytes.extend_from_slice(&[0xD6, 0xB8, 0xBB, 0xD3, 0xB9, 0xD9]);
        bytes.extend_from_slice(b",c@example.com,pw\n");
        let rows = parse_accounts(&bytes).expect("csv should parse");
        assert_eq!(rows[0].name, "指挥官");
        assert_eq!(rows[0].email.as_deref(), Some("c@example.com"));
    }

    #[test]
    fn utf8_wins_when_valid() {
        let text = decode_accounts("\u{feff}Name\n指挥官\n".as_bytes());
        assert_eq!(text, "Name\n指挥官\n");
    }

    #[test]
    fn missing_cookie_column_is_tolerated() {
        let rows = parse_accounts(b"Name,E-mail,Password\nsolo,s@example.com,pw\n")
            .expect("csv should parse");
        assert_eq!(rows[0].cookies, None);
        assert!(rows[0].is_usable());
    }
}
