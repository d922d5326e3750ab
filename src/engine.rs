//! Gallery engine: one owner for every component and the clock they share.
//!
//! The engine is built in a single pass from an [`EngineConfig`], a
//! [`Catalog`], the blog posts, a [`RenderSurface`] and an [`ImageFetcher`].
//! Construction renders the filter bar, the `all` grid and the blog listing,
//! and schedules the first load run.
//!
//! ## Event flow
//!
//! ```text
//! InputEvent ──→ handle() ──→ filter / lightbox / blog / notifications
//!                                  │
//!                                  └──→ Scheduler<Task>  (loader timers,
//!                                          │               fetch outcomes,
//!                                          │               toast dismissals)
//! advance(by) ─────────────────────────────┘──→ dispatch in (due, order)
//! ```
//!
//! Everything runs on one logical thread. Time only moves in
//! [`GalleryEngine::advance`], so a test can step through a load run
//! millisecond by millisecond.
//!
//! Every user-visible effect is also appended to a [`TimelineEntry`] log,
//! which the `folio preview` command prints.

use crate::blog::BlogIndex;
use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::fetch::ImageFetcher;
use crate::filter::{self, FilterKey};
use crate::lightbox::{ClickTarget, Key, Lightbox};
use crate::loader::{ImageLoader, LoadEffect, LoaderTask};
use crate::markup;
use crate::notify::{
    DismissTask, NotificationCenter, NotificationId, NotificationKind, RecordingNotifier,
};
use crate::render::{Container, RenderSurface};
use crate::scheduler::Scheduler;
use crate::types::{BlogPost, MediaItem};
use std::time::Duration;

/// Deferred work owned by the engine's scheduler.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    Loader(LoaderTask),
    Dismiss(DismissTask),
}

impl From<LoaderTask> for Task {
    fn from(task: LoaderTask) -> Self {
        Task::Loader(task)
    }
}

impl From<DismissTask> for Task {
    fn from(task: DismissTask) -> Self {
        Task::Dismiss(task)
    }
}

/// User input delivered by the page.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A gallery filter button, by its `data-filter` value.
    FilterSelected(String),
    /// A gallery card, by item id.
    CardActivated(u32),
    KeyPressed(Key),
    LightboxClicked(ClickTarget),
    /// The close button of a toast.
    NotificationClosed(NotificationId),
    /// A blog sidebar category, as a filter key.
    BlogCategorySelected(String),
    /// A blog pagination button, 1-based.
    BlogPageSelected(u32),
}

/// Something the user would have seen happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    FilterApplied { key: String, visible: usize },
    ImageRequested { item_id: u32 },
    ImageLoaded { item_id: u32 },
    ImageFailed { item_id: u32, reason: String },
    LightboxOpened { item_id: u32 },
    LightboxMoved { item_id: u32 },
    LightboxClosed,
    Notified { id: NotificationId, kind: NotificationKind, message: String },
    NotificationDismissed { id: NotificationId },
    BlogFiltered { category: String, visible: usize },
    BlogPageSelected { page: u32 },
    Ignored { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub at: Duration,
    pub event: EngineEvent,
}

pub struct GalleryEngine<S, F> {
    config: EngineConfig,
    catalog: Catalog,
    filter_keys: Vec<FilterKey>,
    active_filter: FilterKey,
    visible: Vec<MediaItem>,
    loader: ImageLoader,
    lightbox: Lightbox,
    notifications: NotificationCenter,
    blog: BlogIndex,
    scheduler: Scheduler<Task>,
    surface: S,
    fetcher: F,
    timeline: Vec<TimelineEntry>,
}

impl<S: RenderSurface, F: ImageFetcher> GalleryEngine<S, F> {
    /// Wire every component and render the initial `all` view.
    pub fn new(
        config: EngineConfig,
        catalog: Catalog,
        posts: Vec<BlogPost>,
        surface: S,
        fetcher: F,
    ) -> Self {
        let mut engine = Self {
            filter_keys: filter::filter_keys(&catalog),
            active_filter: FilterKey::All,
            visible: Vec::new(),
            loader: ImageLoader::new(config.loader_config()),
            lightbox: Lightbox::new(config.lightbox.arrow_keys),
            notifications: NotificationCenter::new(config.dismiss_after()),
            blog: BlogIndex::new(posts, config.blog.pages),
            scheduler: Scheduler::new(),
            surface,
            fetcher,
            timeline: Vec::new(),
            catalog,
            config,
        };
        engine.blog.render(&mut engine.surface);
        engine.apply_filter(FilterKey::All);
        engine
    }

    /// Show the items matching `key` and start a new load run for them.
    pub fn apply_filter(&mut self, key: FilterKey) -> &[MediaItem] {
        self.visible = filter::apply_filter(self.catalog.all(), &key);
        tracing::info!(filter = %key, visible = self.visible.len(), "filter applied");

        self.surface.render(
            Container::FilterBar,
            markup::filter_bar(&self.filter_keys, &key),
        );
        self.surface.render(
            Container::Gallery,
            markup::gallery_grid(&self.visible, self.config.gallery.special_from),
        );
        self.loader.schedule_load(&self.visible, &mut self.scheduler);
        self.record(EngineEvent::FilterApplied {
            key: key.as_str().to_string(),
            visible: self.visible.len(),
        });
        self.active_filter = key;
        &self.visible
    }

    pub fn handle(&mut self, event: InputEvent) {
        tracing::debug!(?event, "input");
        match event {
            InputEvent::FilterSelected(raw) => {
                self.apply_filter(FilterKey::parse(&raw));
            }
            InputEvent::CardActivated(item_id) => self.open_card(item_id),
            InputEvent::KeyPressed(key) => {
                let before = self.lightbox_position();
                self.lightbox.handle_key(&key, &mut self.surface);
                self.record_lightbox_change(before);
            }
            InputEvent::LightboxClicked(target) => {
                let before = self.lightbox_position();
                self.lightbox.handle_click(target, &mut self.surface);
                self.record_lightbox_change(before);
            }
            InputEvent::NotificationClosed(id) => {
                if self
                    .notifications
                    .dismiss(id, &mut self.surface, &mut self.scheduler)
                {
                    self.record(EngineEvent::NotificationDismissed { id });
                }
            }
            InputEvent::BlogCategorySelected(category) => {
                let mut outbox = RecordingNotifier::default();
                let visible = self
                    .blog
                    .apply_category(&category, &mut self.surface, &mut outbox)
                    .len();
                self.record(EngineEvent::BlogFiltered { category, visible });
                self.flush(outbox);
            }
            InputEvent::BlogPageSelected(page) => {
                if !(1..=self.blog.pages()).contains(&page) {
                    self.ignore(format!("blog page {page} does not exist"));
                    return;
                }
                let mut outbox = RecordingNotifier::default();
                if self.blog.select_page(page, &mut self.surface, &mut outbox) {
                    self.record(EngineEvent::BlogPageSelected { page });
                }
                self.flush(outbox);
            }
        }
    }

    /// Run every task due within the next `by`, then move the clock forward.
    pub fn advance(&mut self, by: Duration) {
        let deadline = self.scheduler.now() + by;
        while let Some(task) = self.scheduler.pop_due(deadline) {
            self.dispatch(task);
        }
        self.scheduler.settle(deadline);
    }

    /// Advance until no task is left: every load resolved, every toast gone.
    pub fn run_until_idle(&mut self) {
        while let Some(due) = self.scheduler.next_due() {
            let by = due.saturating_sub(self.scheduler.now());
            self.advance(by);
        }
    }

    /// Show a toast through the engine's notification center.
    pub fn notify(&mut self, message: &str, kind: NotificationKind) -> NotificationId {
        let id = self
            .notifications
            .push(message, kind, &mut self.surface, &mut self.scheduler);
        self.record(EngineEvent::Notified {
            id,
            kind,
            message: message.to_string(),
        });
        id
    }

    fn dispatch(&mut self, task: Task) {
        match task {
            Task::Loader(task) => {
                let effect = self.loader.handle(
                    task,
                    &mut self.fetcher,
                    &mut self.surface,
                    &mut self.scheduler,
                );
                self.on_load_effect(effect);
            }
            Task::Dismiss(task) => {
                let visible_before = self.notifications.visible_count();
                self.notifications.expire(task, &mut self.surface);
                if self.notifications.visible_count() < visible_before {
                    self.record(EngineEvent::NotificationDismissed { id: task.0 });
                }
            }
        }
    }

    fn on_load_effect(&mut self, effect: LoadEffect) {
        match effect {
            LoadEffect::Stale => {}
            LoadEffect::Requested { item_id } => {
                self.record(EngineEvent::ImageRequested { item_id });
            }
            LoadEffect::Loaded { item_id } => {
                self.record(EngineEvent::ImageLoaded { item_id });
            }
            LoadEffect::Failed { item, error } => {
                self.record(EngineEvent::ImageFailed {
                    item_id: item.id,
                    reason: error.to_string(),
                });
                if self.config.loader.notify_failures {
                    let message = format!("Could not load \"{}\".", item.title);
                    self.notify(&message, NotificationKind::Warning);
                }
            }
        }
    }

    fn open_card(&mut self, item_id: u32) {
        let Some(index) = self.visible.iter().position(|item| item.id == item_id) else {
            self.ignore(format!("card {item_id} is not visible"));
            return;
        };
        // Opening over an open session replaces it
        if self.lightbox.is_open() {
            self.record(EngineEvent::LightboxClosed);
        }
        self.lightbox.open(self.visible.clone(), index, &mut self.surface);
        self.record(EngineEvent::LightboxOpened { item_id });
    }

    fn lightbox_position(&self) -> Option<(u32, usize)> {
        self.lightbox
            .session()
            .map(|s| (s.current().id, s.index()))
    }

    fn record_lightbox_change(&mut self, before: Option<(u32, usize)>) {
        match (before, self.lightbox_position()) {
            (Some(_), None) => self.record(EngineEvent::LightboxClosed),
            (Some((_, from)), Some((item_id, to))) if from != to => {
                self.record(EngineEvent::LightboxMoved { item_id })
            }
            _ => {}
        }
    }

    fn flush(&mut self, mut outbox: RecordingNotifier) {
        for (message, kind) in outbox.take() {
            self.notify(&message, kind);
        }
    }

    fn ignore(&mut self, reason: String) {
        tracing::warn!(%reason, "input ignored");
        self.record(EngineEvent::Ignored { reason });
    }

    fn record(&mut self, event: EngineEvent) {
        self.timeline.push(TimelineEntry {
            at: self.scheduler.now(),
            event,
        });
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn loader(&self) -> &ImageLoader {
        &self.loader
    }

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn blog(&self) -> &BlogIndex {
        &self.blog
    }

    /// Items currently shown in the grid, in catalog order.
    pub fn visible(&self) -> &[MediaItem] {
        &self.visible
    }

    pub fn active_filter(&self) -> &FilterKey {
        &self.active_filter
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn timeline(&self) -> &[TimelineEntry] {
        &self.timeline
    }

    /// Drain the timeline recorded so far. Long-running callers should drain
    /// it periodically; the engine never trims it on its own.
    pub fn take_timeline(&mut self) -> Vec<TimelineEntry> {
        std::mem::take(&mut self.timeline)
    }

    /// Consume the engine, returning its surface.
    pub fn into_surface(self) -> S {
        self.surface
    }
}
