//! Resource fetch capability used by the image loader.
//!
//! A fetch has exactly two terminal outcomes: a decoded image or a
//! [`LoadError`]. Fetchers report the outcome together with the latency after
//! which it should be delivered; the loader schedules the delivery on its
//! virtual clock, so a slow fetch can still be overtaken by a re-filter.
//!
//! Two implementations ship with the crate:
//!
//! - [`FsFetcher`] resolves catalog URLs against a local directory and decodes
//!   them with the `image` crate. Remote `http(s)` URLs fail as unsupported:
//!   the engine performs no network I/O.
//! - [`ScriptedFetcher`] returns preconfigured outcomes, for tests and for the
//!   headless preview.

use image::ImageReader;
use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Why a single item's image could not be loaded. Always recovered locally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Image not found: {0}")]
    NotFound(String),
    #[error("Image decode failed for {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("Unsupported image source: {0}")]
    Unsupported(String),
    #[error("Fetch failed: {0}")]
    Failed(String),
}

/// Minimal description of a successfully decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
}

/// Outcome of a fetch plus the delay before it is delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFetch {
    pub latency: Duration,
    pub outcome: Result<DecodedImage, LoadError>,
}

impl PendingFetch {
    pub fn immediate(outcome: Result<DecodedImage, LoadError>) -> Self {
        Self {
            latency: Duration::ZERO,
            outcome,
        }
    }
}

/// Capability to fetch and decode the image behind a catalog URL.
pub trait ImageFetcher {
    fn fetch(&mut self, url: &str) -> PendingFetch;
}

/// Loads images from a local directory.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn load(&self, url: &str) -> Result<DecodedImage, LoadError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return Err(LoadError::Unsupported(url.to_string()));
        }
        // Query strings carry CDN hints, not part of the file name
        let relative = Path::new(url.split('?').next().unwrap_or(url));
        // Plain relative paths only: no root, prefix or `..`
        let inside_root = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !inside_root {
            tracing::warn!(url, "image path escapes the image root");
            return Err(LoadError::NotFound(url.to_string()));
        }
        let path = self.root.join(relative);
        if !path.is_file() {
            return Err(LoadError::NotFound(url.to_string()));
        }
        let decode_error = |reason: String| LoadError::Decode {
            url: url.to_string(),
            reason,
        };
        let img = ImageReader::open(&path)
            .map_err(|e| decode_error(e.to_string()))?
            .decode()
            .map_err(|e| decode_error(e.to_string()))?;
        Ok(DecodedImage {
            width: img.width(),
            height: img.height(),
        })
    }
}

impl ImageFetcher for FsFetcher {
    fn fetch(&mut self, url: &str) -> PendingFetch {
        PendingFetch::immediate(self.load(url))
    }
}

/// Fetcher with per-URL scripted failures and latencies.
///
/// Every URL succeeds with a 1000x667 image unless marked as failing.
/// Requests are recorded in order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFetcher {
    failing: HashSet<String>,
    latencies: HashMap<String, Duration>,
    default_latency: Duration,
    requests: Vec<String>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every fetch of `url` fail.
    #[must_use]
    pub fn failing(mut self, url: impl Into<String>) -> Self {
        self.failing.insert(url.into());
        self
    }

    /// Deliver outcomes for `url` after `latency`.
    #[must_use]
    pub fn with_latency(mut self, url: impl Into<String>, latency: Duration) -> Self {
        self.latencies.insert(url.into(), latency);
        self
    }

    /// Latency for URLs without a specific one.
    #[must_use]
    pub fn with_default_latency(mut self, latency: Duration) -> Self {
        self.default_latency = latency;
        self
    }

    /// URLs requested so far, in request order.
    pub fn requests(&self) -> &[String] {
        &self.requests
    }
}

impl ImageFetcher for ScriptedFetcher {
    fn fetch(&mut self, url: &str) -> PendingFetch {
        self.requests.push(url.to_string());
        let outcome = if self.failing.contains(url) {
            Err(LoadError::Failed(url.to_string()))
        } else {
            Ok(DecodedImage {
                width: 1000,
                height: 667,
            })
        };
        PendingFetch {
            latency: self
                .latencies
                .get(url)
                .copied()
                .unwrap_or(self.default_latency),
            outcome,
        }
    }
}
