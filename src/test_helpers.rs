//! Shared test utilities for the simple-folio test suite.
//!
//! Provides item and catalog fixtures plus ready-wired engines backed by a
//! [`RecordingSurface`] and a [`ScriptedFetcher`].
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let catalog = three_item_catalog();
//! let url = catalog.get(2).unwrap().url.clone();
//! let mut engine = engine_with(catalog, ScriptedFetcher::new().failing(url));
//! engine.run_until_idle();
//! ```

use crate::blog;
use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::engine::GalleryEngine;
use crate::fetch::ScriptedFetcher;
use crate::render::RecordingSurface;
use crate::types::{Category, MediaItem, MediaKind};

/// Engine type every in-crate engine test uses.
pub type TestEngine = GalleryEngine<RecordingSurface, ScriptedFetcher>;

// =========================================================================
// Fixtures
// =========================================================================

/// A catalog item with a unique URL derived from its id.
pub fn item(id: u32, title: &str, category: Category, kind: MediaKind) -> MediaItem {
    MediaItem {
        id,
        title: title.to_string(),
        category,
        kind,
        description: format!("{title} description"),
        url: format!("images/{id}.jpg"),
    }
}

/// Items 1..=3: nature/photography, urban/digital, nature/photography.
pub fn three_item_catalog() -> Catalog {
    Catalog::new(vec![
        item(1, "First", Category::Nature, MediaKind::Photography),
        item(2, "Second", Category::Urban, MediaKind::Digital),
        item(3, "Third", Category::Nature, MediaKind::Photography),
    ])
    .unwrap()
}

// =========================================================================
// Engines
// =========================================================================

/// Default-config engine over the builtin catalog and posts.
pub fn builtin_engine(fetcher: ScriptedFetcher) -> TestEngine {
    GalleryEngine::new(
        EngineConfig::default(),
        Catalog::builtin(),
        blog::builtin_posts(),
        RecordingSurface::new(),
        fetcher,
    )
}

/// Default-config engine over `catalog`, without blog posts.
pub fn engine_with(catalog: Catalog, fetcher: ScriptedFetcher) -> TestEngine {
    GalleryEngine::new(
        EngineConfig::default(),
        catalog,
        Vec::new(),
        RecordingSurface::new(),
        fetcher,
    )
}
