//! reqwest client construction shared by the source adapters

use crate::domain::SourceError;
use reqwest::{Client, Response};
use std::time::Duration;

/// Redirects followed per request
const MAX_REDIRECTS: usize = 5;

/// Build a client with the adapter's timeout and user agent
///
/// `cookies` enables a per-client cookie jar; the portal needs one so its
/// login session carries over to the search post.
pub fn build_client(
    user_agent: &str,
    timeout: Duration,
    cookies: bool,
) -> Result<Client, SourceError> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .user_agent(user_agent)
        .cookie_store(cookies)
        .build()
        .map_err(|e| SourceError::ConnectionFailed(format!("Failed to build HTTP client: {e}")))
}

/// Fail on any non-2xx status, keeping the final URL for the error
pub fn ensure_success(response: Response) -> Result<Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(SourceError::HttpStatus {
            status: status.as_u16(),
            url: response.url().path().to_string(),
        })
    }
}
