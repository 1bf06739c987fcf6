use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thirtyfour::prelude::*;

use crate::config::{BrowserKind, ServerRegion, Settings};
use crate::data::AccountRow;
use crate::session::{CookieLogin, SessionCredential, SessionError, IMPORTANT_COOKIES};

pub const LOGIN_URL: &str = "https://www.blablalink.com/login";

const CONSENT_BUTTON: &str = "#onetrust-accept-btn-handler";
const REGION_LIST: &str = r"body > div.w-full.outline-none.max-h-\[65vh\].max-w-\[var\(--max-pc-w\)\].right-0.mx-auto.overflow-x-hidden.overflow-y-auto.flex.flex-col.bg-\[var\(--op-fill-white\)\].rounded-t-\[8px\].fixed.left-0.bottom-0.z-50 > div.flex-1.overflow-y-auto.w-full.mr-\[4px\].mb-\[35px\] > ul";
const ACCOUNT_INPUT: &str = "#loginPwdForm_account";
const PASSWORD_INPUT: &str = "#loginPwdForm_password";
const SWITCH_TO_PASSWORD: &str = ".pass-switchLogin__oper";
const SUBMIT_BUTTON: &str = r#"//*[@id="loginPwdForm"]/div[3]/div/div/div/div/button"#;

const FORM_POLLS: u32 = 20;
const COOKIE_POLLS: u32 = 150;
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub const CHROMEDRIVER_URL: &str = "http://localhost:9515";
pub const MSEDGEDRIVER_URL: &str = "http://localhost:9515";

/// Runs `check` up to `attempts` times, sleeping `interval` after each miss.
/// Returns the first `Some`, or `None` once the attempts are spent.
async fn poll<T, F, Fut>(
    attempts: u32,
    interval: Duration,
    mut check: F,
) -> WebDriverResult<Option<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = WebDriverResult<Option<T>>>,
{
    for _ in 0..attempts {
        if let Some(found) = check().await? {
            return Ok(Some(found));
        }
        tokio::time::sleep(interval).await;
    }
    Ok(None)
}

/// Password login through a WebDriver-controlled browser.
#[derive(Debug, Clone)]
pub struct BrowserLogin {
    pub browser: BrowserKind,
    pub server: ServerRegion,
    pub headless: bool,
    pub webdriver_url: Option<String>,
    pub implicit_wait_secs: u64,
}

impl BrowserLogin {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            browser: settings.browser,
            server: settings.server,
            headless: settings.headless,
            webdriver_url: settings.webdriver_url.clone(),
            implicit_wait_secs: 3,
        }
    }

    async fn new_session(&self) -> WebDriverResult<WebDriver> {
        let driver = match self.browser {
            BrowserKind::Chrome => {
                let mut caps = DesiredCapabilities::chrome();
                if self.headless {
                    caps.set_headless()?;
                }
                let url = self.webdriver_url.as_deref().unwrap_or(CHROMEDRIVER_URL);
                WebDriver::new(url, caps).await?
            }
            BrowserKind::Edge => {
                let mut caps = DesiredCapabilities::edge();
                if self.headless {
                    caps.set_headless()?;
                }
                let url = self.webdriver_url.as_deref().unwrap_or(MSEDGEDRIVER_URL);
                WebDriver::new(url, caps).await?
            }
        };
        driver
            .set_implicit_wait_timeout(Duration::from_secs(self.implicit_wait_secs))
            .await?;
        Ok(driver)
    }

    fn region_selector(&self) -> String {
        format!("{REGION_LIST} > li:nth-child({})", self.server.picker_index())
    }

    async fn drive_login(
        &self,
        driver: &WebDriver,
        email: &str,
        password: &str,
    ) -> Result<SessionCredential, SessionError> {
        driver.goto(LOGIN_URL).await?;
        driver.find(By::Css(CONSENT_BUTTON)).await?.click().await?;
        driver
            .find(By::Css(self.region_selector()))
            .await?
            .click()
            .await?;

        // An empty find_all waits out the implicit timeout.
        driver.set_implicit_wait_timeout(Duration::ZERO).await?;
        let form = poll(FORM_POLLS, POLL_INTERVAL, || async move {
            let inputs = driver.find_all(By::Css(ACCOUNT_INPUT)).await?;
            Ok((!inputs.is_empty()).then_some(()))
        })
        .await;
        driver
            .set_implicit_wait_timeout(Duration::from_secs(self.implicit_wait_secs))
            .await?;
        if form?.is_none() {
            log::debug!("password form not shown, switching login mode");
            driver.find(By::Css(SWITCH_TO_PASSWORD)).await?.click().await?;
        }

        driver.find(By::Css(ACCOUNT_INPUT)).await?.send_keys(email).await?;
        driver.find(By::Css(PASSWORD_INPUT)).await?.send_keys(password).await?;
        driver.find(By::XPath(SUBMIT_BUTTON)).await?.click().await?;

        log::info!("waiting for login cookies");
        let credential = poll(COOKIE_POLLS, POLL_INTERVAL, || async move {
            let cookies = driver.get_all_cookies().await?;
            let present = |name: &str| cookies.iter().any(|c| c.name == name);
            Ok(IMPORTANT_COOKIES.iter().all(|name| present(name)).then(|| {
                SessionCredential::from_pairs(
                    cookies.iter().map(|c| (c.name.as_str(), c.value.as_str())),
                )
            }))
        })
        .await?;
        credential.ok_or(SessionError::CookieTimeout {
            attempts: COOKIE_POLLS,
        })
    }
}

#[async_trait]
impl CookieLogin for BrowserLogin {
    async fn login(&self, account: &AccountRow) -> Result<SessionCredential, SessionError> {
        let (Some(email), Some(password)) = (account.email.as_deref(), account.password.as_deref())
        else {
            return Err(SessionError::MissingCredentials);
        };

        let driver = self.new_session().await?;
        let outcome = self.drive_login(&driver, email, password).await;
        if let Err(err) = driver.quit().await {
            log::warn!("failed to close browser session: {err}");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_selector_targets_picker_entry() {
        let mut login = BrowserLogin::from_settings(&Settings::default());
        login.server = ServerRegion::Hmt;
        assert!(login.region_selector().ends_with("> ul > li:nth-child(1)"));
        login.server = ServerRegion::Global;
        assert!(login.region_selector().ends_with("> ul > li:nth-child(2)"));
    }

    #[test]
    fn both_drivers_default_to_the_standard_port() {
        assert_eq!(CHROMEDRIVER_URL, "http://localhost:9515");
        assert_eq!(MSEDGEDRIVER_URL, "http://localhost:9515");
    }

    #[tokio::test]
    async fn poll_stops_at_first_hit() {
        let mut calls = 0;
        let found = poll(20, Duration::from_millis(1), || {
            calls += 1;
            let seen = calls;
            async move { Ok((seen == 3).then_some(seen)) }
        })
        .await
        .expect("poll");
        assert_eq!(found, Some(3));
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn exhausted_form_poll_stays_within_its_budget() {
        let mut calls = 0;
        let started = std::time::Instant::now();
        let found: Option<()> = poll(FORM_POLLS, POLL_INTERVAL, || {
            calls += 1;
            async { Ok(None) }
        })
        .await
        .expect("poll");
        assert_eq!(found, None);
        assert_eq!(calls, FORM_POLLS);
        assert!(started.elapsed() < POLL_INTERVAL * FORM_POLLS + Duration::from_secs(2));
    }
}
