//! Shared value types used by every engine component.
//!
//! Everything here is immutable data: the catalog hands out clones of
//! [`MediaItem`], the filter engine returns them, and the lightbox snapshots
//! them. None of these types carry behavior beyond string conversion.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Subject category of a media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Nature,
    Urban,
}

impl Category {
    /// The filter string for this category (`"nature"`, `"urban"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Nature => "nature",
            Category::Urban => "urban",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Production technique of a media item (the `type` field in catalog files).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photography,
    Digital,
}

impl MediaKind {
    /// The filter string for this kind (`"photography"`, `"digital"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Photography => "photography",
            MediaKind::Digital => "digital",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single portfolio entry.
///
/// `id` is unique within a catalog and stable across filter changes; it is
/// what card activation events carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MediaItem {
    pub id: u32,
    pub title: String,
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub description: String,
    /// External resource locator of the full-size image.
    pub url: String,
}

/// A blog entry shown by the blog index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlogPost {
    pub title: String,
    /// Free-form category label as displayed on the post (e.g. "Photography Tips").
    pub category: String,
    /// Markdown excerpt shown on the post card.
    #[serde(default)]
    pub excerpt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}
