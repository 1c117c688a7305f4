use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;

const APP_USER_AGENT: &str = concat!("Luximo/", env!("CARGO_PKG_VERSION"));

/// Shared client for catalog and artifact requests.
///
/// No timeout and no retry policy are configured: a failed request
/// surfaces to the caller as-is and the next update pass starts over.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(APP_USER_AGENT)
        .default_headers(default_headers)
        .build()
}
