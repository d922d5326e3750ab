//! Lightbox controller: a modal viewer scoped to the visible gallery items.
//!
//! ```text
//!            open(items, index)
//!   Closed ─────────────────────→ Open ──next/previous──┐
//!     ↑                            │  ↑                 │
//!     └──── close / Escape /  ─────┘  └─────────────────┘
//!           backdrop / ×
//! ```
//!
//! Opening snapshots the visible sequence, so a re-filter while the lightbox
//! is open does not change what prev/next walk through. Navigation clamps at
//! both ends; there is no wraparound. Opening while already open closes the
//! previous session first.
//!
//! Background scrolling is locked on open and unlocked on every close, as a
//! plain boolean rather than a nesting count.
//!
//! Calling [`Lightbox::next`], [`Lightbox::previous`] or [`Lightbox::current`]
//! without an open session is a programming error and panics. Keyboard and
//! click events, which can legitimately arrive late, are ignored instead.

use crate::markup;
use crate::render::{Container, RenderSurface};
use crate::types::MediaItem;

/// Key press delivered by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Key::Escape,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            other => Key::Other(other.to_string()),
        }
    }
}

/// Element of the overlay that received a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The dimmed area around the content.
    Backdrop,
    CloseButton,
    PrevButton,
    NextButton,
    /// The image or caption itself.
    Content,
}

/// An open lightbox: a snapshot of the visible items and a cursor into it.
#[derive(Debug, Clone, PartialEq)]
pub struct LightboxSession {
    items: Vec<MediaItem>,
    index: usize,
}

impl LightboxSession {
    pub fn new(items: Vec<MediaItem>, index: usize) -> Self {
        assert!(
            index < items.len(),
            "lightbox index {index} out of bounds for {} items",
            items.len()
        );
        Self { items, index }
    }

    pub fn current(&self) -> &MediaItem {
        &self.items[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn at_start(&self) -> bool {
        self.index == 0
    }

    pub fn at_end(&self) -> bool {
        self.index + 1 == self.items.len()
    }
}

#[derive(Debug, Default)]
pub struct Lightbox {
    session: Option<LightboxSession>,
    arrow_keys: bool,
}

impl Lightbox {
    /// `arrow_keys` enables ArrowLeft/ArrowRight navigation in addition to Escape.
    pub fn new(arrow_keys: bool) -> Self {
        Self {
            session: None,
            arrow_keys,
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&LightboxSession> {
        self.session.as_ref()
    }

    pub fn current(&self) -> &MediaItem {
        self.open_session().current()
    }

    /// Open on `items[index]`, closing any session already open.
    pub fn open(&mut self, items: Vec<MediaItem>, index: usize, surface: &mut impl RenderSurface) {
        if self.is_open() {
            self.close(surface);
        }
        let session = LightboxSession::new(items, index);
        tracing::info!(
            item_id = session.current().id,
            index,
            total = session.len(),
            "lightbox opened"
        );
        surface.render(Container::Lightbox, markup::lightbox(&session));
        surface.set_scroll_locked(true);
        self.session = Some(session);
    }

    /// Step forward. At the last item this is a no-op and returns `false`.
    pub fn next(&mut self, surface: &mut impl RenderSurface) -> bool {
        let session = self.open_session_mut();
        if session.at_end() {
            return false;
        }
        session.index += 1;
        surface.render(Container::Lightbox, markup::lightbox(session));
        true
    }

    /// Step back. At the first item this is a no-op and returns `false`.
    pub fn previous(&mut self, surface: &mut impl RenderSurface) -> bool {
        let session = self.open_session_mut();
        if session.at_start() {
            return false;
        }
        session.index -= 1;
        surface.render(Container::Lightbox, markup::lightbox(session));
        true
    }

    /// Remove the overlay and restore scrolling. Returns whether a session was open.
    pub fn close(&mut self, surface: &mut impl RenderSurface) -> bool {
        let was_open = self.session.take().is_some();
        surface.clear(Container::Lightbox);
        surface.set_scroll_locked(false);
        if was_open {
            tracing::info!("lightbox closed");
        }
        was_open
    }

    /// Global key handler. Ignored while closed.
    pub fn handle_key(&mut self, key: &Key, surface: &mut impl RenderSurface) {
        if !self.is_open() {
            return;
        }
        match key {
            Key::Escape => {
                self.close(surface);
            }
            Key::ArrowLeft if self.arrow_keys => {
                self.previous(surface);
            }
            Key::ArrowRight if self.arrow_keys => {
                self.next(surface);
            }
            _ => {}
        }
    }

    /// Overlay click handler. Ignored while closed.
    pub fn handle_click(&mut self, target: ClickTarget, surface: &mut impl RenderSurface) {
        if !self.is_open() {
            return;
        }
        match target {
            ClickTarget::Backdrop | ClickTarget::CloseButton => {
                self.close(surface);
            }
            ClickTarget::PrevButton => {
                self.previous(surface);
            }
            ClickTarget::NextButton => {
                self.next(surface);
            }
            ClickTarget::Content => {}
        }
    }

    fn open_session(&self) -> &LightboxSession {
        self.session
            .as_ref()
            .expect("lightbox navigation requires an open session")
    }

    fn open_session_mut(&mut self) -> &mut LightboxSession {
        self.session
            .as_mut()
            .expect("lightbox navigation requires an open session")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Mutation, RecordingSurface};
    use crate::test_helpers::*;

    fn open_at(index: usize) -> (Lightbox, RecordingSurface) {
        let mut lightbox = Lightbox::new(false);
        let mut surface = RecordingSurface::new();
        lightbox.open(three_item_catalog().all().to_vec(), index, &mut surface);
        (lightbox, surface)
    }

    #[test]
    fn open_renders_overlay_and_locks_scroll() {
        let (lightbox, surface) = open_at(1);
        assert!(lightbox.is_open());
        assert_eq!(lightbox.current().id, 2);
        assert!(surface.scroll_locked());
        let html = surface.html(Container::Lightbox).unwrap();
        assert!(html.contains("Second"));
        assert!(html.contains("2 / 3"));
    }

    #[test]
    fn previous_at_start_is_noop() {
        let (mut lightbox, mut surface) = open_at(0);
        let before = surface.html(Container::Lightbox).unwrap().to_string();
        surface.clear_log();

        assert!(!lightbox.previous(&mut surface));
        assert_eq!(lightbox.session().unwrap().index(), 0);
        assert_eq!(surface.html(Container::Lightbox).unwrap(), before);
        assert!(surface.mutations().is_empty());
    }

    #[test]
    fn next_at_end_is_noop() {
        let (mut lightbox, mut surface) = open_at(2);
        surface.clear_log();
        assert!(!lightbox.next(&mut surface));
        assert_eq!(lightbox.session().unwrap().index(), 2);
        assert!(surface.mutations().is_empty());
    }

    #[test]
    fn next_and_previous_move_within_snapshot() {
        let (mut lightbox, mut surface) = open_at(0);
        assert!(lightbox.next(&mut surface));
        assert_eq!(lightbox.current().id, 2);
        assert!(lightbox.next(&mut surface));
        assert_eq!(lightbox.current().id, 3);
        assert!(lightbox.previous(&mut surface));
        assert_eq!(lightbox.current().id, 2);
        assert!(surface.html(Container::Lightbox).unwrap().contains("2 / 3"));
    }

    #[test]
    fn boundary_buttons_rendered_disabled() {
        let (_, surface) = open_at(0);
        let html = surface.html(Container::Lightbox).unwrap();
        assert!(html.contains(r#"class="lightbox-prev" aria-label="Previous" disabled"#));
        assert!(!html.contains(r#"aria-label="Next" disabled"#));
    }

    #[test]
    fn escape_closes_and_restores_scroll() {
        let (mut lightbox, mut surface) = open_at(1);
        lightbox.handle_key(&Key::Escape, &mut surface);
        assert!(!lightbox.is_open());
        assert!(!surface.scroll_locked());
        assert!(!surface.contains(Container::Lightbox));
    }

    #[test]
    fn backdrop_and_close_button_close_content_does_not() {
        let (mut lightbox, mut surface) = open_at(1);
        lightbox.handle_click(ClickTarget::Content, &mut surface);
        assert!(lightbox.is_open());
        lightbox.handle_click(ClickTarget::Backdrop, &mut surface);
        assert!(!lightbox.is_open());

        let (mut lightbox, mut surface) = open_at(1);
        lightbox.handle_click(ClickTarget::CloseButton, &mut surface);
        assert!(!lightbox.is_open());
    }

    #[test]
    fn arrow_keys_ignored_unless_enabled() {
        let (mut lightbox, mut surface) = open_at(1);
        lightbox.handle_key(&Key::ArrowRight, &mut surface);
        assert_eq!(lightbox.current().id, 2);

        let mut lightbox = Lightbox::new(true);
        lightbox.open(three_item_catalog().all().to_vec(), 1, &mut surface);
        lightbox.handle_key(&Key::ArrowRight, &mut surface);
        assert_eq!(lightbox.current().id, 3);
        lightbox.handle_key(&Key::ArrowRight, &mut surface);
        assert_eq!(lightbox.current().id, 3);
        lightbox.handle_key(&Key::ArrowLeft, &mut surface);
        assert_eq!(lightbox.current().id, 2);
    }

    #[test]
    fn events_while_closed_are_ignored() {
        let mut lightbox = Lightbox::new(true);
        let mut surface = RecordingSurface::new();
        lightbox.handle_key(&Key::Escape, &mut surface);
        lightbox.handle_click(ClickTarget::NextButton, &mut surface);
        assert!(surface.mutations().is_empty());
    }

    #[test]
    fn reopening_closes_previous_session_first() {
        let (mut lightbox, mut surface) = open_at(0);
        surface.clear_log();
        lightbox.open(three_item_catalog().all().to_vec(), 2, &mut surface);

        assert_eq!(lightbox.current().id, 3);
        assert_eq!(surface.mutations()[0], Mutation::Clear(Container::Lightbox));
        assert_eq!(surface.mutations()[1], Mutation::ScrollLocked(false));
        assert!(surface.scroll_locked());
    }

    #[test]
    fn close_restores_scroll_unconditionally() {
        let mut lightbox = Lightbox::new(false);
        let mut surface = RecordingSurface::new();
        surface.set_scroll_locked(true);
        assert!(!lightbox.close(&mut surface));
        assert!(!surface.scroll_locked());
    }

    #[test]
    fn key_from_dom_names() {
        assert_eq!(Key::from_dom("Escape"), Key::Escape);
        assert_eq!(Key::from_dom("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_dom("a"), Key::Other("a".to_string()));
    }

    #[test]
    #[should_panic(expected = "requires an open session")]
    fn next_while_closed_panics() {
        let mut lightbox = Lightbox::new(false);
        lightbox.next(&mut RecordingSurface::new());
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn open_with_invalid_index_panics() {
        let mut lightbox = Lightbox::new(false);
        lightbox.open(three_item_catalog().all().to_vec(), 3, &mut RecordingSurface::new());
    }
}
