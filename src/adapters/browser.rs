// Headless Chrome fallback for the session bootstrap.
//
// The scam listing is rendered client-side, and on some visits the session
// cookie is only issued once the page scripts have run.

use crate::adapters::http::SESSION_COOKIE;
use crate::utils::error::{BlocklistError, Result};
use anyhow::Context;
use headless_chrome::{Browser, LaunchOptions};

fn read_session_cookie(url: &str) -> anyhow::Result<Option<String>> {
    let options = LaunchOptions {
        headless: true,
        sandbox: false,
        ..Default::default()
    };
    let browser = Browser::new(options)
        .context("Failed to launch headless Chrome. Is Chrome/Chromium installed?")?;

    let tab = browser.new_tab().context("Failed to create new browser tab")?;
    tab.navigate_to(url).context("Failed to navigate to URL")?;
    tab.wait_until_navigated()
        .context("Timed out waiting for page to load")?;

    let cookies = tab.get_cookies().context("Failed to read cookies")?;
    Ok(cookies
        .into_iter()
        .find(|c| c.name == SESSION_COOKIE)
        .map(|c| c.value))
}

pub async fn session_token(url: &str) -> Result<Option<String>> {
    let url = url.to_string();
    let outcome = tokio::task::spawn_blocking(move || read_session_cookie(&url))
        .await
        .map_err(|e| BlocklistError::BrowserError {
            message: e.to_string(),
        })?;

    outcome.map_err(|e| BlocklistError::BrowserError {
        message: format!("{:#}", e),
    })
}
