//! Batch driver: one account at a time through session → fetch → aggregate →
//! render → write. A failing account is recorded and the batch moves on.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use crate::aggregate::{apply_equipment, build_account, compute_ael_scores};
use crate::api::{character_id_range, ApiError, PortalClient};
use crate::config::Settings;
use crate::data::{
    load_accounts, load_template, AccountRow, AccountSheet, AccountTemplate, AccountsError,
    TemplateError,
};
use crate::session::{filter_cookie_header, CookieLogin, SessionError};
use crate::sheet::{render_account, write_snapshot, write_xlsx, SheetError};

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Accounts(#[from] AccountsError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("failed to write error list: {0}")]
    ErrorList(#[from] std::io::Error),
}

/// Why a single account could not be exported.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("missing cookie and e-mail/password")]
    MissingInformation,
    #[error("login failed: {0}")]
    Session(#[from] SessionError),
    #[error("backend: {0}")]
    Api(#[from] ApiError),
    #[error("sheet: {0}")]
    Sheet(#[from] SheetError),
    #[error("json export: {0}")]
    Export(#[from] serde_json::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAccount {
    pub index: usize,
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub processed: usize,
    pub succeeded: usize,
    pub failures: Vec<FailedAccount>,
    pub written: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AccountOutput {
    pub role_name: String,
    pub files: Vec<PathBuf>,
}

/// Replaces characters that cannot appear in a file name.
pub fn file_stem_for(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if cleaned.is_empty() {
        "account".to_string()
    } else {
        cleaned
    }
}

/// Lines `"{index}: {name}"`, one per failed account.
pub fn write_error_list(path: &Path, failures: &[FailedAccount]) -> std::io::Result<()> {
    let body: String = failures
        .iter()
        .map(|f| format!("{}: {}\n", f.index, f.name))
        .collect();
    fs::write(path, body)
}

/// Authenticated client plus the account's display name. A supplied cookie is
/// tried first; a browser login follows once when it is rejected.
async fn open_session(
    settings: &Settings,
    account: &AccountRow,
    login: &dyn CookieLogin,
) -> Result<(PortalClient, String), AccountError> {
    let supplied = account
        .cookies
        .as_deref()
        .map(filter_cookie_header)
        .filter(|credential| !credential.is_empty());

    if let Some(credential) = supplied {
        let client = PortalClient::new(&settings.api_base, &credential)?;
        match client.role_name().await {
            Ok(role_name) => return Ok((client, role_name)),
            Err(err) if account.can_log_in() => {
                warn!("account {}: stored cookie rejected ({err}), logging in", account.index);
            }
            Err(err) => return Err(err.into()),
        }
    }

    if !account.can_log_in() {
        return Err(AccountError::MissingInformation);
    }
    let credential = login.login(account).await?;
    let client = PortalClient::new(&settings.api_base, &credential)?;
    let role_name = client.role_name().await?;
    Ok((client, role_name))
}

/// Fetches roster and equipment for an authenticated session and builds the account model.
pub async fn collect_account(
    client: &PortalClient,
    template: &AccountTemplate,
    settings: &Settings,
    role_name: &str,
) -> Result<AccountSheet, ApiError> {
    let roster = client.player_roster().await?;
    let mut sheet = build_account(template, &roster, settings.language, role_name);
    for character in sheet.characters_mut() {
        let ids = character_id_range(character.id, settings.equipment_id_span);
        let records = client.equipment(&ids).await?;
        apply_equipment(character, &records);
    }
    compute_ael_scores(&mut sheet);
    Ok(sheet)
}

/// Renders `sheet` into `out_dir`: workbook, grid snapshot and optionally the JSON model.
pub fn write_account(
    sheet: &AccountSheet,
    out_dir: &Path,
    export_json: bool,
) -> Result<Vec<PathBuf>, AccountError> {
    fs::create_dir_all(out_dir)?;
    let stem = file_stem_for(&sheet.name);
    let xlsx_path = out_dir.join(format!("{stem}.xlsx"));
    let grid = render_account(sheet);
    write_xlsx(&grid, &xlsx_path)?;
    let snapshot = write_snapshot(&grid, &xlsx_path)?;
    let mut files = vec![xlsx_path, snapshot];
    if export_json {
        let json_path = out_dir.join(format!("{stem}.json"));
        fs::write(&json_path, serde_json::to_string_pretty(sheet)?)?;
        files.push(json_path);
    }
    Ok(files)
}

/// Re-renders a JSON account export without touching the network.
pub fn render_export(json_path: &Path, out_dir: &Path) -> Result<Vec<PathBuf>, AccountError> {
    let text = fs::read_to_string(json_path)?;
    let sheet: AccountSheet = serde_json::from_str(&text)?;
    write_account(&sheet, out_dir, false)
}

pub async fn process_account(
    settings: &Settings,
    template: &AccountTemplate,
    account: &AccountRow,
    login: &dyn CookieLogin,
) -> Result<AccountOutput, AccountError> {
    if !account.is_usable() {
        return Err(AccountError::MissingInformation);
    }
    let (client, role_name) = open_session(settings, account, login).await?;
    info!("account {}: signed in as {role_name}", account.index);
    let sheet = collect_account(&client, template, settings, &role_name).await?;
    let files = write_account(&sheet, &settings.output_dir, settings.export_json)?;
    Ok(AccountOutput { role_name, files })
}

/// Processes `accounts` sequentially against an already loaded template.
pub async fn process_accounts(
    settings: &Settings,
    template: &AccountTemplate,
    accounts: &[AccountRow],
    login: &dyn CookieLogin,
) -> BatchReport {
    let total = accounts.len();
    let mut report = BatchReport::default();
    for account in accounts {
        report.processed += 1;
        info!("account ({}/{total}): {}", account.index, account.name);
        match process_account(settings, template, account, login).await {
            Ok(output) => {
                info!("account {}: saved {}", account.index, output.role_name);
                report.succeeded += 1;
                report.written.extend(output.files);
            }
            Err(err) => {
                warn!("account {} ({}) failed: {err}", account.index, account.name);
                report.failures.push(FailedAccount {
                    index: account.index,
                    name: account.name.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }
    report
}

/// Loads the accounts list and template named by `settings`, runs the batch and
/// writes the error list when any account failed.
pub async fn run_batch(
    settings: &Settings,
    login: &dyn CookieLogin,
) -> Result<BatchReport, RunnerError> {
    let accounts = load_accounts(&settings.accounts_path)?;
    let template = load_template(settings.template_path())?;
    info!(
        "{} accounts, {} template characters",
        accounts.len(),
        template.character_count()
    );

    let report = process_accounts(settings, &template, &accounts, login).await;
    if !report.failures.is_empty() {
        write_error_list(&settings.error_list_path, &report.failures)?;
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stems_drop_path_separators() {
        assert_eq!(file_stem_for("Rapi/Anis"), "Rapi_Anis");
        assert_eq!(file_stem_for(r"a\b:c"), "a_b_c");
        assert_eq!(file_stem_for("  指挥官  "), "指挥官");
        assert_eq!(file_stem_for(""), "account");
    }

    #[test]
    fn error_list_lines() {
        let dir = std::env::temp_dir().join(format!("exia-errlist-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("ErrorList.txt");
        let failures = vec![
            FailedAccount {
                index: 2,
                name: "Bob".to_string(),
                reason: "x".to_string(),
            },
            FailedAccount {
                index: 5,
                name: "Eve".to_string(),
                reason: "y".to_string(),
            },
        ];
        write_error_list(&path, &failures).expect("write");
        assert_eq!(fs::read_to_string(&path).expect("read"), "2: Bob\n5: Eve\n");
        let _ = fs::remove_dir_all(&dir);
    }
}
