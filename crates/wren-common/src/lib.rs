//! Common utilities for the wren renderer.
//!
//! This crate provides shared infrastructure used by the other crates:
//! - **Warning System** - deduplicated warnings routed through `log`
//! - **URLs** - parsing and relative-reference resolution
//! - **Fetching** - the [`net::Fetcher`] collaborator that loads documents
//!   and stylesheets over http(s) or from disk

pub mod error;
pub mod net;
pub mod url;
pub mod warning;

pub use error::FetchError;
pub use net::{Fetcher, NetFetcher, Response};
pub use url::{Url, resolve_url};
