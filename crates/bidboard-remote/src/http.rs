//! HTTP implementation of [`GameDataService`](crate::GameDataService)

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use url::Url;

use bidboard_core::prelude::*;
use bidboard_core::{BoardUpdate, RoundId};

use crate::protocol::{
    parse_bids_response, parse_declare_response, parse_error_envelope, DeclareReceipt,
    DeclareRequest,
};
use crate::service::GameDataService;

/// Connection settings for [`HttpGameDataService`].
#[derive(Debug, Clone)]
pub struct HttpServiceConfig {
    pub base_url: Url,
    pub bids_path: String,
    pub declare_path: String,
    /// Query parameter carrying the round id on both endpoints.
    pub round_query_param: String,
    /// Credential sent in `Authorization`. A bare token gets a `Bearer` scheme.
    pub token: Option<String>,
    /// Extra headers sent with every request.
    pub headers: BTreeMap<String, String>,
    pub timeout: Option<Duration>,
}

impl HttpServiceConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            bids_path: "/api/web/retrieve/bids".to_string(),
            declare_path: "/api/web/update/gameResult".to_string(),
            round_query_param: "id".to_string(),
            token: None,
            headers: BTreeMap::new(),
            timeout: None,
        }
    }
}

/// Game-data service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGameDataService {
    client: reqwest::Client,
    bids_url: Url,
    declare_url: Url,
    round_query_param: String,
}

impl HttpGameDataService {
    pub fn new(config: HttpServiceConfig) -> Result<Self> {
        let headers = default_headers(config.token.as_deref(), &config.headers)?;

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            bids_url: endpoint_url(&config.base_url, &config.bids_path)?,
            declare_url: endpoint_url(&config.base_url, &config.declare_path)?,
            round_query_param: config.round_query_param,
        })
    }

    fn url_for(&self, endpoint: &Url, round: &RoundId) -> Url {
        let mut url = endpoint.clone();
        url.query_pairs_mut()
            .append_pair(&self.round_query_param, round.as_str());
        url
    }
}

impl GameDataService for HttpGameDataService {
    async fn fetch_bids(&self, round: &RoundId) -> Result<BoardUpdate> {
        let url = self.url_for(&self.bids_url, round);
        trace!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error("bids request", &e))?;
        let body = read_body(response, "bids request").await?;
        parse_bids_response(&body)
    }

    async fn declare(&self, round: &RoundId, request: DeclareRequest) -> Result<DeclareReceipt> {
        let url = self.url_for(&self.declare_url, round);
        debug!(
            "PUT {} (number {}, amount {})",
            url, request.bid_number, request.bid_amount
        );

        let response = self
            .client
            .put(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error("declare request", &e))?;
        let body = read_body(response, "declare request").await?;
        parse_declare_response(&body)
    }
}

/// Join an endpoint path onto the base URL, keeping any base path prefix.
fn endpoint_url(base: &Url, path: &str) -> Result<Url> {
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| Error::config(format!("invalid endpoint URL {joined}: {e}")))
}

/// `Authorization` value for a configured token.
///
/// A token that already names a scheme (`Bearer abc`, `Basic xyz`) is sent
/// verbatim.
pub fn authorization_value(token: &str) -> String {
    let token = token.trim();
    if token.contains(char::is_whitespace) {
        token.to_string()
    } else {
        format!("Bearer {token}")
    }
}

fn default_headers(token: Option<&str>, extra: &BTreeMap<String, String>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    for (name, value) in extra {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::config(format!("invalid header name {name:?}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::config(format!("invalid value for header {name}: {e}")))?;
        headers.insert(name, value);
    }

    if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
        let mut value = HeaderValue::from_str(&authorization_value(token))
            .map_err(|e| Error::config(format!("invalid token: {e}")))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}

fn transport_error(what: &str, err: &reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::http(format!("{what} timed out"))
    } else if err.is_connect() {
        Error::http(format!("{what}: cannot connect: {err}"))
    } else {
        Error::http(format!("{what}: {err}"))
    }
}

/// Read the body and classify it with [`classify_response`].
async fn read_body(response: reqwest::Response, what: &str) -> Result<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(what, &e))?;
    classify_response(status, body, what)
}

/// Turn a non-2xx answer into an error; a 2xx body is passed on untouched.
///
/// A non-2xx answer that still carries an error envelope is a business
/// rejection; anything else is a transport failure naming the status.
/// Error envelopes on 2xx answers are left to the response parsers.
pub fn classify_response(status: StatusCode, body: String, what: &str) -> Result<String> {
    if status.is_success() {
        return Ok(body);
    }
    match parse_error_envelope(&body) {
        Some(message) => Err(Error::rejected(message)),
        None => Err(Error::http(format!("{what}: service answered {status}"))),
    }
}
