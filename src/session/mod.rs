//! Session acquisition: an opaque cookie header, either reused from the accounts
//! list or harvested from a browser login.

mod browser;
mod cookies;

use async_trait::async_trait;
use thiserror::Error;

use crate::data::AccountRow;

pub use browser::{BrowserLogin, LOGIN_URL};
pub use cookies::{filter_cookie_header, parse_cookie_pairs, SessionCredential, IMPORTANT_COOKIES};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("account has no e-mail/password for a browser login")]
    MissingCredentials,
    #[error("webdriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),
    #[error("login cookies did not appear after {attempts} polls")]
    CookieTimeout { attempts: u32 },
}

/// Produces a fresh session for an account, typically by logging in.
#[async_trait]
pub trait CookieLogin: Send + Sync {
    async fn login(&self, account: &AccountRow) -> Result<SessionCredential, SessionError>;
}
