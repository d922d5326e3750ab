//! Catalog store: the ordered, read-only list of portfolio items.
//!
//! The catalog is loaded exactly once at startup and never mutated afterwards.
//! Catalog order is the canonical display order of the `all` view, and every
//! filtered view preserves it.
//!
//! ## Sources
//!
//! The stock catalog is compiled into the binary from `static/catalog.toml`.
//! A site directory may ship its own `catalog.toml`, which replaces the stock
//! one entirely (catalogs are not merged):
//!
//! ```toml
//! [[items]]
//! id = 1
//! title = "Mountain Majesty"
//! category = "nature"      # nature | urban
//! type = "photography"     # photography | digital
//! description = "Mountain landscapes at golden hour."
//! url = "https://images.example.com/mountain.jpg"
//! ```
//!
//! Duplicate ids and empty titles are rejected; unknown categories or types
//! fail to parse.

use crate::types::MediaItem;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

const BUILTIN_CATALOG: &str = include_str!("../static/catalog.toml");

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Duplicate catalog id: {0}")]
    DuplicateId(u32),
    #[error("Catalog item {0} has an empty title")]
    EmptyTitle(u32),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    items: Vec<MediaItem>,
}

/// Ordered, immutable sequence of [`MediaItem`]s with unique ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    items: Vec<MediaItem>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids and untitled items.
    pub fn new(items: Vec<MediaItem>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id) {
                return Err(CatalogError::DuplicateId(item.id));
            }
            if item.title.trim().is_empty() {
                return Err(CatalogError::EmptyTitle(item.id));
            }
        }
        Ok(Self { items })
    }

    /// The portfolio compiled into the binary.
    pub fn builtin() -> Self {
        Self::from_toml_str(BUILTIN_CATALOG).expect("builtin catalog must be valid")
    }

    /// Parse a catalog from `[[items]]` TOML.
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::new(file.items)
    }

    /// Every item, in catalog order.
    pub fn all(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn get(&self, id: u32) -> Option<&MediaItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Catalog position of the item with `id`.
    pub fn position(&self, id: u32) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Load `catalog.toml` from a site directory, falling back to the builtin catalog.
pub fn load_catalog(dir: &Path) -> Result<Catalog, CatalogError> {
    let path = dir.join("catalog.toml");
    if !path.exists() {
        return Ok(Catalog::builtin());
    }
    let content = fs::read_to_string(&path)?;
    Catalog::from_toml_str(&content)
}
