//! Notification sink: transient, auto-dismissing user messages.
//!
//! Components report outcomes through the [`Notifier`] trait and never touch
//! toast rendering themselves. The engine collects those reports and shows
//! them through its [`NotificationCenter`], which renders each toast into its
//! own container, schedules its dismissal, and lets the user close it early.
//!
//! ## Lifecycle
//!
//! ```text
//! notify()  → Toast(id) rendered, dismissal task scheduled (default 5s)
//! dismiss() → Toast(id) cleared, dismissal task cancelled
//! expire()  → dismissal task fired: Toast(id) cleared if still visible
//! ```

use crate::markup;
use crate::render::{Container, RenderSurface};
use crate::scheduler::{Scheduler, TimerId};
use std::fmt;
use std::time::Duration;

/// Default time a toast stays visible.
pub const DEFAULT_DISMISS_AFTER: Duration = Duration::from_millis(5000);

/// Unique identifier for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

impl NotificationId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Visual kind of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    id: NotificationId,
    kind: NotificationKind,
    message: String,
    /// Virtual time at which it was shown.
    shown_at: Duration,
}

impl Notification {
    pub fn id(&self) -> NotificationId {
        self.id
    }

    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn shown_at(&self) -> Duration {
        self.shown_at
    }
}

/// Fire-and-forget message sink.
pub trait Notifier {
    fn notify(&mut self, message: &str, kind: NotificationKind);
}

/// Scheduled task: auto-dismiss a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DismissTask(pub NotificationId);

/// Owns the visible toasts and their dismissal timers.
#[derive(Debug)]
pub struct NotificationCenter {
    dismiss_after: Duration,
    next_id: u64,
    visible: Vec<(Notification, TimerId)>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_DISMISS_AFTER)
    }
}

impl NotificationCenter {
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            dismiss_after,
            next_id: 0,
            visible: Vec::new(),
        }
    }

    /// Show a toast and schedule its dismissal.
    pub fn push<T: From<DismissTask>>(
        &mut self,
        message: &str,
        kind: NotificationKind,
        surface: &mut impl RenderSurface,
        scheduler: &mut Scheduler<T>,
    ) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id += 1;
        let notification = Notification {
            id,
            kind,
            message: message.to_string(),
            shown_at: scheduler.now(),
        };
        surface.render(Container::Toast(id), markup::toast(&notification));
        let timer = scheduler.schedule(self.dismiss_after, DismissTask(id).into());
        tracing::debug!(id = id.get(), kind = %kind, text = message, "notification shown");
        self.visible.push((notification, timer));
        id
    }

    /// Close a toast early. Returns `false` if it was already gone.
    pub fn dismiss<T>(
        &mut self,
        id: NotificationId,
        surface: &mut impl RenderSurface,
        scheduler: &mut Scheduler<T>,
    ) -> bool {
        match self.take(id) {
            Some((_, timer)) => {
                scheduler.cancel(timer);
                surface.clear(Container::Toast(id));
                true
            }
            None => false,
        }
    }

    /// Handle a fired dismissal task.
    pub fn expire(&mut self, task: DismissTask, surface: &mut impl RenderSurface) {
        if self.take(task.0).is_some() {
            surface.clear(Container::Toast(task.0));
        }
    }

    fn take(&mut self, id: NotificationId) -> Option<(Notification, TimerId)> {
        let pos = self.visible.iter().position(|(n, _)| n.id == id)?;
        Some(self.visible.remove(pos))
    }

    /// Visible notifications, oldest first.
    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.visible.iter().map(|(n, _)| n)
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }
}

/// Notifier that only records what it was asked to show.
///
/// Also serves as an outbox: a component reports into it while the surface is
/// borrowed elsewhere, and the owner replays [`RecordingNotifier::take`] into
/// a [`NotificationCenter`] afterwards.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub sent: Vec<(String, NotificationKind)>,
}

impl RecordingNotifier {
    pub fn take(&mut self) -> Vec<(String, NotificationKind)> {
        std::mem::take(&mut self.sent)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, message: &str, kind: NotificationKind) {
        self.sent.push((message.to_string(), kind));
    }
}
