//! Rendering surface capability.
//!
//! The engine never reads state back from the page: it keeps typed state and
//! pushes markup into named containers. A [`RenderSurface`] is whatever hosts
//! those containers: a browser bridge, a static snapshot writer, or the
//! in-memory [`RecordingSurface`] used by tests and the preview binary.

use crate::notify::NotificationId;
use maud::Markup;
use std::collections::BTreeMap;
use std::fmt;

/// Named mount point on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Container {
    /// Row of filter buttons.
    FilterBar,
    /// The card grid. Re-rendering it replaces every card.
    Gallery,
    /// Image slot inside the card of the item with this id.
    CardImage(u32),
    /// Modal overlay; present only while the lightbox is open.
    Lightbox,
    /// A single toast in the notification stack.
    Toast(NotificationId),
    /// Blog post listing.
    BlogPosts,
    /// Blog pagination controls.
    Pagination,
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Container::FilterBar => write!(f, "filter-bar"),
            Container::Gallery => write!(f, "gallery"),
            Container::CardImage(id) => write!(f, "card-image-{id}"),
            Container::Lightbox => write!(f, "lightbox"),
            Container::Toast(id) => write!(f, "toast-{id}"),
            Container::BlogPosts => write!(f, "blog-posts"),
            Container::Pagination => write!(f, "pagination"),
        }
    }
}

/// Generic render target.
pub trait RenderSurface {
    /// Replace the content of `container`, creating it if needed.
    fn render(&mut self, container: Container, content: Markup);
    /// Remove `container` and its content. Removing a missing container is a no-op.
    fn clear(&mut self, container: Container);
    /// Suppress (`true`) or restore (`false`) background page scrolling.
    fn set_scroll_locked(&mut self, locked: bool);
}

/// One change applied to a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Render { container: Container, html: String },
    Clear(Container),
    ScrollLocked(bool),
}

impl Mutation {
    /// The container this mutation touched, if any.
    pub fn container(&self) -> Option<Container> {
        match self {
            Mutation::Render { container, .. } | Mutation::Clear(container) => Some(*container),
            Mutation::ScrollLocked(_) => None,
        }
    }
}

/// In-memory surface that keeps the current page state and a mutation log.
///
/// Rendering the gallery drops every card image slot, mirroring how replacing
/// the grid's markup destroys the cards inside it.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    containers: BTreeMap<Container, String>,
    log: Vec<Mutation>,
    scroll_locked: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current HTML of `container`.
    pub fn html(&self, container: Container) -> Option<&str> {
        self.containers.get(&container).map(String::as_str)
    }

    pub fn contains(&self, container: Container) -> bool {
        self.containers.contains_key(&container)
    }

    /// Every mutation so far, oldest first.
    pub fn mutations(&self) -> &[Mutation] {
        &self.log
    }

    /// Number of mutations that touched `container`.
    pub fn mutation_count(&self, container: Container) -> usize {
        self.log
            .iter()
            .filter(|m| m.container() == Some(container))
            .count()
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// Containers currently mounted, in container order.
    pub fn mounted(&self) -> impl Iterator<Item = (&Container, &str)> {
        self.containers.iter().map(|(c, html)| (c, html.as_str()))
    }
}

impl RenderSurface for RecordingSurface {
    fn render(&mut self, container: Container, content: Markup) {
        if container == Container::Gallery {
            self.containers
                .retain(|c, _| !matches!(c, Container::CardImage(_)));
        }
        let html = content.into_string();
        self.containers.insert(container, html.clone());
        self.log.push(Mutation::Render { container, html });
    }

    fn clear(&mut self, container: Container) {
        if self.containers.remove(&container).is_some() {
            self.log.push(Mutation::Clear(container));
        }
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
        self.log.push(Mutation::ScrollLocked(locked));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maud::html;

    #[test]
    fn render_replaces_content_and_logs() {
        let mut surface = RecordingSurface::new();
        surface.render(Container::Lightbox, html! { p { "one" } });
        surface.render(Container::Lightbox, html! { p { "two" } });
        assert_eq!(surface.html(Container::Lightbox), Some("<p>two</p>"));
        assert_eq!(surface.mutation_count(Container::Lightbox), 2);
    }

    #[test]
    fn gallery_render_drops_card_slots() {
        let mut surface = RecordingSurface::new();
        surface.render(Container::CardImage(3), html! { img src="a.jpg"; });
        surface.render(Container::Gallery, html! { div { "grid" } });
        assert!(!surface.contains(Container::CardImage(3)));
        assert!(surface.contains(Container::Gallery));
    }

    #[test]
    fn clearing_missing_container_is_not_logged() {
        let mut surface = RecordingSurface::new();
        surface.clear(Container::Lightbox);
        assert!(surface.mutations().is_empty());
    }

    #[test]
    fn scroll_lock_is_tracked() {
        let mut surface = RecordingSurface::new();
        surface.set_scroll_locked(true);
        assert!(surface.scroll_locked());
        surface.set_scroll_locked(false);
        assert!(!surface.scroll_locked());
        assert_eq!(
            surface.mutations(),
            &[Mutation::ScrollLocked(true), Mutation::ScrollLocked(false)]
        );
    }

    #[test]
    fn container_display_names() {
        assert_eq!(Container::CardImage(7).to_string(), "card-image-7");
        assert_eq!(Container::FilterBar.to_string(), "filter-bar");
    }
}
