//! # Simple Folio
//!
//! The interactive layer of a static portfolio site: a filterable media
//! gallery, staggered lazy image loading with failure fallback, a modal
//! lightbox, transient notifications, and the blog listing's category filter.
//!
//! The page itself is abstract. The engine keeps typed state and pushes HTML
//! fragments into named containers on a [`render::RenderSurface`]; it never
//! reads state back from the page.
//!
//! # Architecture: One Owner, One Clock
//!
//! ```text
//! Catalog ──→ Filter ──→ visible items ──→ Loader ──→ card image slots
//!                              │
//!                              └──→ Lightbox (snapshot of visible items)
//!
//! Blog ──→ Notifier ←── Loader failures
//!
//! GalleryEngine owns all of it plus a Scheduler on a virtual clock.
//! ```
//!
//! Deferred work (load timers, fetch outcomes, toast dismissals) is plain data
//! queued on the [`scheduler::Scheduler`]. Nothing runs until the engine
//! advances the clock, which makes every interleaving reproducible in tests.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `MediaItem`, `Category`, `MediaKind`, `BlogPost` value types |
//! | [`catalog`] | Catalog store: builtin catalog, `catalog.toml` loading, validation |
//! | [`filter`] | Filter keys, `apply_filter`, filter bar key derivation |
//! | [`scheduler`] | Deferred task queue on a virtual clock |
//! | [`fetch`] | Image fetch capability: filesystem and scripted fetchers |
//! | [`loader`] | Staggered image loading with an epoch guard |
//! | [`lightbox`] | Modal viewer state machine |
//! | [`notify`] | `Notifier` sink and the toast-rendering `NotificationCenter` |
//! | [`blog`] | Blog category filter (notifies on empty) and pagination |
//! | [`render`] | `RenderSurface` capability and the in-memory `RecordingSurface` |
//! | [`markup`] | Maud templates for every container |
//! | [`engine`] | `GalleryEngine`: wiring, input events, clock advancement |
//! | [`config`] | `config.toml` loading, validation, merging, stock config text |
//! | [`output`] | CLI output formatting for the `folio` binary |
//!
//! # Design Decisions
//!
//! ## Epochs Instead of Cancellation
//!
//! A filter change does not hunt down the previous run's timers. Each run gets
//! a new epoch and every loader task carries the epoch it was created under;
//! tasks from older epochs fire and do nothing. The same check guards fetch
//! outcomes, so a slow image can never land in a card it no longer belongs to.
//!
//! ## Effects Instead of Callbacks
//!
//! Components take the surface and scheduler as arguments and report what
//! happened as return values (`LoadEffect`, booleans). The engine decides what
//! follows, such as showing a warning toast for a failed image.
//!
//! ## Empty Results
//!
//! An empty gallery filter renders an empty grid and stays silent. An empty
//! blog filter tells the user. The two filters differ on purpose.

pub mod blog;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod fetch;
pub mod filter;
pub mod lightbox;
pub mod loader;
pub mod markup;
pub mod notify;
pub mod output;
pub mod render;
pub mod scheduler;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
