//! Retrieval of the raw message text.
//!
//! The message is read from a local cache file when one exists. Otherwise it
//! is downloaded once and written verbatim to the cache path. There is no
//! retry: a failed download aborts the run.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while retrieving the message.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// The unprocessed message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage(String);

impl RawMessage {
    /// Wraps message text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the message text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters (not bytes) in the message.
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

/// Where a message was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageOrigin {
    /// The local cache file.
    Cache,
    /// The remote endpoint (the cache was written afterwards).
    Remote,
}

impl std::fmt::Display for MessageOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageOrigin::Cache => write!(f, "cache"),
            MessageOrigin::Remote => write!(f, "remote"),
        }
    }
}

/// A cache path paired with the URL to fall back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSource {
    pub cache_path: PathBuf,
    pub url: String,
}

impl MessageSource {
    pub fn new(cache_path: impl Into<PathBuf>, url: impl Into<String>) -> Self {
        Self {
            cache_path: cache_path.into(),
            url: url.into(),
        }
    }
}

/// Something that can GET a text body.
pub trait MessageTransport {
    /// Performs a single GET and returns the body on a success status.
    fn get_text(&self, url: &str) -> Result<String, FetchError>;
}

/// Blocking HTTP transport.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Creates a transport, optionally overriding the client's timeout.
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl MessageTransport for HttpTransport {
    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let request_error = |source: reqwest::Error| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let resp = self.client.get(url).send().map_err(request_error)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        resp.text().map_err(request_error)
    }
}

/// Reads the message from the cache, or downloads it and fills the cache.
pub fn fetch_message(
    source: &MessageSource,
    transport: &dyn MessageTransport,
) -> Result<(RawMessage, MessageOrigin), FetchError> {
    if source.cache_path.exists() {
        info!("{} found. Reading message from file...", source.cache_path.display());
        let text = fs::read_to_string(&source.cache_path)?;
        return Ok((RawMessage::new(text), MessageOrigin::Cache));
    }

    info!(
        "{} not found. Getting message from {}...",
        source.cache_path.display(),
        source.url
    );
    let message = download_to_cache(source, transport)?;
    Ok((message, MessageOrigin::Remote))
}

/// Downloads the message unconditionally and overwrites the cache.
pub fn refresh(
    source: &MessageSource,
    transport: &dyn MessageTransport,
) -> Result<RawMessage, FetchError> {
    info!("Refreshing {} from {}...", source.cache_path.display(), source.url);
    download_to_cache(source, transport)
}

fn download_to_cache(
    source: &MessageSource,
    transport: &dyn MessageTransport,
) -> Result<RawMessage, FetchError> {
    let text = transport.get_text(&source.url)?;
    write_cache(&source.cache_path, &text)?;
    Ok(RawMessage::new(text))
}

fn write_cache(path: &Path, text: &str) -> Result<(), FetchError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FakeTransport {
        body: Result<String, u16>,
        calls: Cell<usize>,
    }

    impl FakeTransport {
        fn ok(body: &str) -> Self {
            Self {
                body: Ok(body.to_string()),
                calls: Cell::new(0),
            }
        }

        fn status(code: u16) -> Self {
            Self {
                body: Err(code),
                calls: Cell::new(0),
            }
        }
    }

    impl MessageTransport for FakeTransport {
        fn get_text(&self, url: &str) -> Result<String, FetchError> {
            self.calls.set(self.calls.get() + 1);
            match &self.body {
                Ok(body) => Ok(body.clone()),
                Err(status) => Err(FetchError::Status {
                    url: url.to_string(),
                    status: *status,
                }),
            }
        }
    }

    #[test]
    fn test_cache_hit_skips_network() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("message.txt");
        fs::write(&cache, "0110").unwrap();

        let transport = FakeTransport::ok("1111");
        let source = MessageSource::new(&cache, "http://example.invalid/msg.txt");
        let (message, origin) = fetch_message(&source, &transport).unwrap();

        assert_eq!(message.as_str(), "0110");
        assert_eq!(origin, MessageOrigin::Cache);
        assert_eq!(transport.calls.get(), 0);
    }

    #[test]
    fn test_cache_miss_downloads_and_writes_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("nested").join("message.txt");

        let transport = FakeTransport::ok("1010");
        let source = MessageSource::new(&cache, "http://example.invalid/msg.txt");
        let (message, origin) = fetch_message(&source, &transport).unwrap();

        assert_eq!(message.as_str(), "1010");
        assert_eq!(origin, MessageOrigin::Remote);
        assert_eq!(transport.calls.get(), 1);
        assert_eq!(fs::read_to_string(&cache).unwrap(), "1010");

        // Second call is served from the cache
        let (again, origin) = fetch_message(&source, &transport).unwrap();
        assert_eq!(again, message);
        assert_eq!(origin, MessageOrigin::Cache);
        assert_eq!(transport.calls.get(), 1);
    }

    #[test]
    fn test_non_success_status_is_error_and_leaves_no_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("message.txt");

        let transport = FakeTransport::status(404);
        let source = MessageSource::new(&cache, "http://example.invalid/msg.txt");
        let result = fetch_message(&source, &transport);

        assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
        assert!(!cache.exists());
    }

    #[test]
    fn test_refresh_overwrites_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("message.txt");
        fs::write(&cache, "0000").unwrap();

        let transport = FakeTransport::ok("1111");
        let source = MessageSource::new(&cache, "http://example.invalid/msg.txt");
        let message = refresh(&source, &transport).unwrap();

        assert_eq!(message.as_str(), "1111");
        assert_eq!(fs::read_to_string(&cache).unwrap(), "1111");
        assert_eq!(transport.calls.get(), 1);
    }

    #[test]
    fn test_char_count_counts_characters() {
        let message = RawMessage::new("01é");
        assert_eq!(message.char_count(), 3);
    }
}
