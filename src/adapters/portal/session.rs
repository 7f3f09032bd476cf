//! Portal login and vehicle search
//!
//! The portal is an ASP.NET WebForms site. One session is:
//!
//! 1. GET the landing page and capture the login form with its hidden state
//! 2. Post the credentials and confirm the welcome marker
//! 3. Capture the search form, set the search key and postback target
//! 4. Post the search and confirm the result marker
//!
//! Cookies set along the way live in the client's jar and are dropped with it.

use super::form::{find_form, find_login_form, FormMethod, HtmlForm};
use crate::adapters::http::ensure_success;
use crate::config::{PortalConfig, SecretString};
use crate::domain::{SourceError, Vrm};
use reqwest::Client;
use secrecy::ExposeSecret;
use url::Url;

const EVENT_TARGET: &str = "__EVENTTARGET";
const EVENT_ARGUMENT: &str = "__EVENTARGUMENT";

/// A fetched page and the URL it was finally served from
struct Page {
    url: Url,
    body: String,
}

/// Log in and search for `vrm`, returning the result page's HTML
///
/// # Errors
///
/// - [`SourceError::FormNotFound`] when a page lacks the expected form
/// - [`SourceError::LoginFailed`] when the welcome marker is missing
/// - [`SourceError::SearchFailed`] when the result marker is missing
/// - transport errors from the underlying client
pub async fn login_and_search(
    client: &Client,
    config: &PortalConfig,
    vrm: &Vrm,
    username: &str,
    password: &SecretString,
) -> Result<String, SourceError> {
    let form_config = &config.form;

    let landing = get_page(client, &config.base_url).await?;
    let mut login = find_login_form(&landing.body, &form_config.login_action)?;
    login.set(&form_config.username_field, username);
    login.set(
        &form_config.password_field,
        password.expose_secret().as_ref(),
    );

    let welcome = submit(client, &landing.url, &login, login.submission()).await?;
    if !welcome.body.contains(&form_config.welcome_marker) {
        return Err(SourceError::LoginFailed(
            "welcome marker not present after login".to_string(),
        ));
    }
    tracing::debug!(vrm = %vrm, "Portal login accepted");

    let mut search = find_form(&welcome.body, &form_config.search_form_selector)?;
    search.set(&form_config.search_field, vrm.as_str());
    search.set(EVENT_TARGET, &form_config.search_event_target);
    search.set(EVENT_ARGUMENT, "");

    let result = submit(client, &welcome.url, &search, search.postback()).await?;
    if !result.body.contains(&form_config.result_marker) {
        return Err(SourceError::SearchFailed(format!(
            "no vehicle result page for {vrm}"
        )));
    }

    Ok(result.body)
}

async fn get_page(client: &Client, url: &str) -> Result<Page, SourceError> {
    let response = ensure_success(client.get(url).send().await?)?;
    read_page(response).await
}

async fn submit(
    client: &Client,
    page_url: &Url,
    form: &HtmlForm,
    fields: Vec<(String, String)>,
) -> Result<Page, SourceError> {
    let target = resolve_action(page_url, form.action.as_deref())?;
    let request = match form.method {
        FormMethod::Post => client.post(target).form(&fields),
        FormMethod::Get => client.get(target).query(&fields),
    };
    let response = ensure_success(request.send().await?)?;
    read_page(response).await
}

async fn read_page(response: reqwest::Response) -> Result<Page, SourceError> {
    let url = response.url().clone();
    let body = response.text().await?;
    Ok(Page { url, body })
}

/// Resolve a form action against the page it came from
///
/// A missing or empty action posts back to the page itself.
fn resolve_action(page_url: &Url, action: Option<&str>) -> Result<Url, SourceError> {
    match action.map(str::trim).filter(|a| !a.is_empty()) {
        Some(action) => page_url
            .join(action)
            .map_err(|e| SourceError::InvalidResponse(format!("Bad form action '{action}': {e}"))),
        None => Ok(page_url.clone()),
    }
}
