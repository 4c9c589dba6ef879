//! Error types shared across crates.

use thiserror::Error;

/// Failure to retrieve a document or stylesheet.
///
/// Fatal when loading the primary document; swallowed (with a warning) for
/// linked stylesheets.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL's scheme is not one the fetcher knows how to load.
    #[error("unsupported URL scheme '{0}'")]
    UnsupportedScheme(String),

    /// The URL could not be split into scheme, host and path.
    #[error("malformed URL '{0}'")]
    MalformedUrl(String),

    /// Reading a local file failed.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The server answered with something other than 200 OK.
    #[error("HTTP {status} fetching {url}")]
    Http {
        /// URL that was requested.
        url: String,
        /// Status code returned.
        status: u16,
    },

    /// The HTTP client failed before a response was received.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body uses an encoding the renderer cannot consume.
    #[error("unsupported content encoding '{0}'")]
    UnsupportedEncoding(String),
}
