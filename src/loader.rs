//! Staggered, cancellable image loading for the visible gallery cards.
//!
//! Every filter change starts a new load *run* for exactly the new visible
//! set. The item at position `i` gets a start task due after
//! `base_delay + i * stagger`; when it fires, the image is fetched and the
//! outcome is delivered as a second task after the fetcher's latency.
//!
//! ## Epoch guard
//!
//! Each run has an [`Epoch`]. Both task kinds carry the epoch they were
//! created under, and [`ImageLoader::handle`] drops any task from an older
//! epoch without touching the surface. Superseded tasks are not removed from
//! the scheduler; they fire and become no-ops. This is what keeps a slow
//! image from an earlier filter from overwriting a card in the current one.
//!
//! ## Per-item state
//!
//! ```text
//! schedule_load → Pending ──ok──→ Loaded   (image rendered)
//!                        └─err──→ Failed   (fallback placeholder with title)
//! ```
//!
//! States belong to the current run only and are discarded on the next
//! [`ImageLoader::schedule_load`]. Failures are terminal until then; there
//! is no retry.

use crate::fetch::{DecodedImage, ImageFetcher, LoadError};
use crate::markup;
use crate::render::{Container, RenderSurface};
use crate::scheduler::Scheduler;
use crate::types::MediaItem;
use std::fmt;
use std::time::Duration;

/// Delay before the first card's image is requested.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);
/// Extra delay per card position.
pub const DEFAULT_STAGGER: Duration = Duration::from_millis(100);
/// Cards at or after this position use the `special` placeholder style.
pub const DEFAULT_SPECIAL_FROM: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub base_delay: Duration,
    pub stagger: Duration,
    pub special_from: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_delay: DEFAULT_BASE_DELAY,
            stagger: DEFAULT_STAGGER,
            special_from: DEFAULT_SPECIAL_FROM,
        }
    }
}

impl LoaderConfig {
    /// Start delay for the card at `position`.
    pub fn delay_for(&self, position: usize) -> Duration {
        self.base_delay + self.stagger * position as u32
    }
}

/// Generation counter of load runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Epoch(u64);

impl Epoch {
    fn next(self) -> Self {
        Epoch(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Loaded,
    Failed,
}

/// Deferred loader work.
#[derive(Debug, Clone, PartialEq)]
pub enum LoaderTask {
    /// Request the image of `item_id`.
    Start { epoch: Epoch, item_id: u32 },
    /// Deliver the fetch outcome for `item_id`.
    Resolve {
        epoch: Epoch,
        item_id: u32,
        outcome: Result<DecodedImage, LoadError>,
    },
}

impl LoaderTask {
    pub fn epoch(&self) -> Epoch {
        match self {
            LoaderTask::Start { epoch, .. } | LoaderTask::Resolve { epoch, .. } => *epoch,
        }
    }
}

/// What handling a task did, for the caller to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadEffect {
    /// Task belonged to a superseded run and was ignored.
    Stale,
    /// Fetch requested; outcome scheduled.
    Requested { item_id: u32 },
    Loaded { item_id: u32 },
    Failed { item: MediaItem, error: LoadError },
}

/// Counts of item states in the current run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub pending: usize,
    pub loaded: usize,
    pub failed: usize,
}

#[derive(Debug)]
struct Slot {
    item: MediaItem,
    position: usize,
    state: LoadState,
}

/// Owns the load states of the visible items.
#[derive(Debug, Default)]
pub struct ImageLoader {
    config: LoaderConfig,
    epoch: Epoch,
    slots: Vec<Slot>,
}

impl ImageLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            epoch: Epoch::default(),
            slots: Vec::new(),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Start a new run for `items`, superseding any run in progress.
    pub fn schedule_load<T: From<LoaderTask>>(
        &mut self,
        items: &[MediaItem],
        scheduler: &mut Scheduler<T>,
    ) -> Epoch {
        self.epoch = self.epoch.next();
        self.slots = items
            .iter()
            .enumerate()
            .map(|(position, item)| Slot {
                item: item.clone(),
                position,
                state: LoadState::Pending,
            })
            .collect();

        for slot in &self.slots {
            let task = LoaderTask::Start {
                epoch: self.epoch,
                item_id: slot.item.id,
            };
            scheduler.schedule(self.config.delay_for(slot.position), task.into());
        }
        tracing::debug!(epoch = %self.epoch, items = items.len(), "load run scheduled");
        self.epoch
    }

    /// Handle a fired loader task.
    pub fn handle<T: From<LoaderTask>>(
        &mut self,
        task: LoaderTask,
        fetcher: &mut impl ImageFetcher,
        surface: &mut impl RenderSurface,
        scheduler: &mut Scheduler<T>,
    ) -> LoadEffect {
        if task.epoch() != self.epoch {
            tracing::trace!(
                task_epoch = %task.epoch(),
                current = %self.epoch,
                "stale load task dropped"
            );
            return LoadEffect::Stale;
        }
        match task {
            LoaderTask::Start { epoch, item_id } => {
                let slot = self.slot(item_id);
                let pending = fetcher.fetch(&slot.item.url);
                let resolve = LoaderTask::Resolve {
                    epoch,
                    item_id,
                    outcome: pending.outcome,
                };
                scheduler.schedule(pending.latency, resolve.into());
                LoadEffect::Requested { item_id }
            }
            LoaderTask::Resolve {
                item_id, outcome, ..
            } => {
                let special_from = self.config.special_from;
                let slot = self.slot_mut(item_id);
                assert_eq!(
                    slot.state,
                    LoadState::Pending,
                    "item {item_id} resolved twice in one run"
                );
                let special = slot.position >= special_from;
                match outcome {
                    Ok(image) => {
                        slot.state = LoadState::Loaded;
                        surface.render(
                            Container::CardImage(item_id),
                            markup::loaded_image(&slot.item, image),
                        );
                        LoadEffect::Loaded { item_id }
                    }
                    Err(error) => {
                        slot.state = LoadState::Failed;
                        tracing::warn!(
                            item_id,
                            title = %slot.item.title,
                            %error,
                            "image failed to load"
                        );
                        surface.render(
                            Container::CardImage(item_id),
                            markup::failed_placeholder(&slot.item, special),
                        );
                        LoadEffect::Failed {
                            item: slot.item.clone(),
                            error,
                        }
                    }
                }
            }
        }
    }

    // Tasks of the current epoch only reference items of the current run.
    fn slot(&self, item_id: u32) -> &Slot {
        self.slots
            .iter()
            .find(|s| s.item.id == item_id)
            .unwrap_or_else(|| panic!("item {item_id} is not part of load run {}", self.epoch))
    }

    fn slot_mut(&mut self, item_id: u32) -> &mut Slot {
        let epoch = self.epoch;
        self.slots
            .iter_mut()
            .find(|s| s.item.id == item_id)
            .unwrap_or_else(|| panic!("item {item_id} is not part of load run {epoch}"))
    }

    /// Load state of a visible item; `None` for items outside the current run.
    pub fn state(&self, item_id: u32) -> Option<LoadState> {
        self.slots
            .iter()
            .find(|s| s.item.id == item_id)
            .map(|s| s.state)
    }

    pub fn summary(&self) -> LoadSummary {
        let mut summary = LoadSummary::default();
        for slot in &self.slots {
            match slot.state {
                LoadState::Pending => summary.pending += 1,
                LoadState::Loaded => summary.loaded += 1,
                LoadState::Failed => summary.failed += 1,
            }
        }
        summary
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }
}
