//! Document and stylesheet fetching.
//!
//! The rendering core never does I/O itself. It asks a [`Fetcher`] for bytes
//! before the pipeline starts. [`NetFetcher`] is the real implementation:
//! blocking HTTP(S) through reqwest, plus local files.

use std::collections::HashMap;
use std::fs;
use std::time::Duration;

use reqwest::StatusCode;

use crate::FetchError;
use crate::url::Url;

/// User-Agent header sent with all requests.
const USER_AGENT: &str = concat!("wren/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
const TIMEOUT: Duration = Duration::from_secs(30);

/// A fetched resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// Response headers with lowercased names. Empty for local files.
    pub headers: HashMap<String, String>,
    /// The body decoded as UTF-8 text.
    pub body: String,
}

impl Response {
    /// A response with no headers.
    #[must_use]
    pub fn from_body(body: impl Into<String>) -> Self {
        Self {
            headers: HashMap::new(),
            body: body.into(),
        }
    }
}

/// Something that can turn a URL into a [`Response`].
pub trait Fetcher {
    /// Fetch `url`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the resource cannot be retrieved.
    fn fetch(&self, url: &str) -> Result<Response, FetchError>;
}

/// Fetcher for `http://`, `https://` and `file://` URLs and bare file paths.
pub struct NetFetcher {
    client: reqwest::blocking::Client,
}

impl NetFetcher {
    /// Build a fetcher with a 30 second timeout.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Request`] if the HTTP client cannot be created.
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    fn fetch_http(&self, url: &str) -> Result<Response, FetchError> {
        let response = self.client.get(url).send()?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.trim().to_string()))
            })
            .collect();

        // The client is built without decompression support, so a compressed
        // body would arrive as garbage.
        if let Some(encoding) = headers.get("content-encoding") {
            if !encoding.eq_ignore_ascii_case("identity") {
                return Err(FetchError::UnsupportedEncoding(encoding.clone()));
            }
        }

        let body = response.text()?;
        Ok(Response { headers, body })
    }
}

impl Fetcher for NetFetcher {
    fn fetch(&self, url: &str) -> Result<Response, FetchError> {
        if !url.contains("://") {
            return read_file(url);
        }

        let parsed = Url::parse(url)?;
        match parsed.scheme.as_str() {
            "file" => read_file(&parsed.path),
            _ => self.fetch_http(url),
        }
    }
}

fn read_file(path: &str) -> Result<Response, FetchError> {
    fs::read_to_string(path)
        .map(Response::from_body)
        .map_err(|source| FetchError::Io {
            path: path.to_string(),
            source,
        })
}
