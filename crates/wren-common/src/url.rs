//! URL parsing and resolution.
//!
//! Only the shapes the renderer actually loads are understood:
//! `scheme://host[:port]/path` for http and https, and `file://` URLs.

use std::fmt;

use crate::FetchError;

/// Schemes the fetcher can load.
const SUPPORTED_SCHEMES: &[&str] = &["http", "https", "file"];

/// A parsed absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    /// Lowercase scheme, one of `http`, `https` or `file`.
    pub scheme: String,
    /// Host name, empty for `file` URLs.
    pub host: String,
    /// Port, defaulted from the scheme when the URL omits it.
    pub port: u16,
    /// Path including any query, always starting with `/`.
    pub path: String,
}

impl Url {
    /// Split an absolute URL into its parts.
    ///
    /// A URL without a path gets `/`. A `host:port` authority is split on the
    /// colon.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MalformedUrl`] if there is no `://` or the port
    /// is not a number, and [`FetchError::UnsupportedScheme`] for schemes
    /// other than http, https and file.
    pub fn parse(url: &str) -> Result<Self, FetchError> {
        let (scheme, rest) = url
            .split_once("://")
            .ok_or_else(|| FetchError::MalformedUrl(url.to_string()))?;
        let scheme = scheme.to_ascii_lowercase();
        if !SUPPORTED_SCHEMES.contains(&scheme.as_str()) {
            return Err(FetchError::UnsupportedScheme(scheme));
        }

        let (authority, path) = match rest.find('/') {
            Some(i) => (&rest[..i], rest[i..].to_string()),
            None => (rest, "/".to_string()),
        };

        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse()
                    .map_err(|_| FetchError::MalformedUrl(url.to_string()))?;
                (host.to_string(), port)
            }
            None => (authority.to_string(), default_port(&scheme)),
        };

        Ok(Self {
            scheme,
            host,
            port,
            path,
        })
    }

    /// `scheme://host[:port]`, with the port omitted when it is the scheme's
    /// default.
    #[must_use]
    pub fn origin(&self) -> String {
        if self.port == default_port(&self.scheme) {
            format!("{}://{}", self.scheme, self.host)
        } else {
            format!("{}://{}:{}", self.scheme, self.host, self.port)
        }
    }

    /// Resolve `href` against this URL. See [`resolve_url`].
    #[must_use]
    pub fn join(&self, href: &str) -> String {
        if href.contains("://") {
            return href.to_string();
        }
        if href.starts_with("//") {
            return format!("{}:{href}", self.scheme);
        }
        if href.starts_with('/') {
            return format!("{}{href}", self.origin());
        }

        // Relative path: drop the last segment of the base path, then one
        // more directory for each leading "../".
        let mut dir = self.path.rsplit_once('/').map_or("", |(dir, _)| dir);
        let mut href = href;
        loop {
            if let Some(rest) = href.strip_prefix("../") {
                href = rest;
                dir = dir.rsplit_once('/').map_or("", |(parent, _)| parent);
            } else if let Some(rest) = href.strip_prefix("./") {
                href = rest;
            } else {
                break;
            }
        }
        format!("{}{dir}/{href}", self.origin())
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.origin(), self.path)
    }
}

fn default_port(scheme: &str) -> u16 {
    match scheme {
        "https" => 443,
        "file" => 0,
        _ => 80,
    }
}

/// Resolve a possibly relative `href` against `base`.
///
/// - absolute URLs (containing `://`) are returned unchanged
/// - `//host/x` takes the base's scheme
/// - `/x` is joined to the base's origin
/// - anything else joins onto the base's directory, with each leading `../`
///   climbing one level
///
/// With no base, or a base that does not parse, `href` is returned unchanged.
#[must_use]
pub fn resolve_url(href: &str, base: Option<&str>) -> String {
    match base.map(Url::parse) {
        Some(Ok(base)) => base.join(href),
        _ => href.to_string(),
    }
}
