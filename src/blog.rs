//! Blog listing: category filter and pagination controls.
//!
//! The blog filter is a sibling of the gallery filter with one deliberate
//! difference: an empty result is reported to the user. Every call to
//! [`BlogIndex::apply_category`] that matches nothing sends exactly one
//! `info` notification. The gallery never does this.
//!
//! ## Matching
//!
//! Category keys come from the sidebar links, whose text reads like
//! `"Photography Tips (12)"`. [`category_key`] reduces that to its first word,
//! lowercased (`"photography"`). A post matches when its lowercased category
//! *contains* the key, so `"photo"` also matches `"Photography Tips"`.
//! The key `all` matches every post.
//!
//! ## Pagination
//!
//! Pagination is cosmetic: selecting another page marks it active and tells
//! the user more posts are loading. Selecting the active page does nothing.

use crate::filter::ALL;
use crate::markup;
use crate::notify::{NotificationKind, Notifier};
use crate::render::{Container, RenderSurface};
use crate::types::BlogPost;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

const BUILTIN_POSTS: &str = include_str!("../static/posts.toml");

/// Number of pagination buttons rendered under the listing.
pub const DEFAULT_PAGES: u32 = 3;

pub const NO_POSTS_MESSAGE: &str = "No posts found in this category.";
pub const LOADING_MORE_MESSAGE: &str = "Loading more posts...";

#[derive(Error, Debug)]
pub enum BlogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PostsFile {
    #[serde(default)]
    posts: Vec<BlogPost>,
}

/// The posts compiled into the binary.
pub fn builtin_posts() -> Vec<BlogPost> {
    posts_from_toml_str(BUILTIN_POSTS).expect("builtin posts must be valid")
}

pub fn posts_from_toml_str(content: &str) -> Result<Vec<BlogPost>, BlogError> {
    let file: PostsFile = toml::from_str(content)?;
    Ok(file.posts)
}

/// Load `posts.toml` from a site directory, falling back to the builtin posts.
pub fn load_posts(dir: &Path) -> Result<Vec<BlogPost>, BlogError> {
    let path = dir.join("posts.toml");
    if !path.exists() {
        return Ok(builtin_posts());
    }
    let content = fs::read_to_string(&path)?;
    posts_from_toml_str(&content)
}

/// Filter key for a sidebar link label: its first word, lowercased.
pub fn category_key(link_text: &str) -> String {
    link_text
        .split_whitespace()
        .next()
        .unwrap_or(ALL)
        .to_lowercase()
}

/// Posts whose category contains `category` (case-insensitive), in order.
pub fn filter_posts(posts: &[BlogPost], category: &str) -> Vec<BlogPost> {
    let key = category.to_lowercase();
    if key == ALL {
        return posts.to_vec();
    }
    posts
        .iter()
        .filter(|post| post.category.to_lowercase().contains(&key))
        .cloned()
        .collect()
}

/// The blog listing with its current category and page.
#[derive(Debug, Clone)]
pub struct BlogIndex {
    posts: Vec<BlogPost>,
    category: String,
    visible: Vec<BlogPost>,
    pages: u32,
    active_page: u32,
}

impl BlogIndex {
    pub fn new(posts: Vec<BlogPost>, pages: u32) -> Self {
        assert!(pages > 0, "blog pagination needs at least one page");
        Self {
            visible: posts.clone(),
            posts,
            category: ALL.to_string(),
            pages,
            active_page: 1,
        }
    }

    /// Render the full listing and page 1 as active.
    pub fn render(&self, surface: &mut impl RenderSurface) {
        surface.render(Container::BlogPosts, markup::blog_posts(&self.visible));
        surface.render(
            Container::Pagination,
            markup::pagination(self.pages, self.active_page),
        );
    }

    /// Show the posts matching `category`. Notifies once when nothing matches.
    pub fn apply_category(
        &mut self,
        category: &str,
        surface: &mut impl RenderSurface,
        notifier: &mut impl Notifier,
    ) -> &[BlogPost] {
        self.visible = filter_posts(&self.posts, category);
        self.category = category.to_lowercase();
        tracing::info!(category, visible = self.visible.len(), "blog category applied");
        surface.render(Container::BlogPosts, markup::blog_posts(&self.visible));
        if self.visible.is_empty() {
            notifier.notify(NO_POSTS_MESSAGE, NotificationKind::Info);
        }
        &self.visible
    }

    /// Activate page `page`. Returns `false` when it was already active.
    pub fn select_page(
        &mut self,
        page: u32,
        surface: &mut impl RenderSurface,
        notifier: &mut impl Notifier,
    ) -> bool {
        assert!(
            (1..=self.pages).contains(&page),
            "page {page} outside 1..={}",
            self.pages
        );
        if page == self.active_page {
            return false;
        }
        self.active_page = page;
        surface.render(Container::Pagination, markup::pagination(self.pages, page));
        notifier.notify(LOADING_MORE_MESSAGE, NotificationKind::Info);
        true
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn visible(&self) -> &[BlogPost] {
        &self.visible
    }

    pub fn active_page(&self) -> u32 {
        self.active_page
    }

    pub fn pages(&self) -> u32 {
        self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use crate::render::RecordingSurface;
    use tempfile::TempDir;

    fn titles(posts: &[BlogPost]) -> Vec<&str> {
        posts.iter().map(|p| p.title.as_str()).collect()
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    #[test]
    fn builtin_posts_parse() {
        let posts = builtin_posts();
        assert_eq!(posts.len(), 4);
        assert_eq!(posts[0].category, "Photography Tips");
    }

    #[test]
    fn all_matches_every_post() {
        let posts = builtin_posts();
        assert_eq!(filter_posts(&posts, "all").len(), 4);
        assert_eq!(filter_posts(&posts, "ALL").len(), 4);
    }

    #[test]
    fn category_match_is_case_insensitive_substring() {
        let posts = builtin_posts();
        assert_eq!(
            titles(&filter_posts(&posts, "photography")),
            vec!["Chasing Golden Hour in the Alps", "Long Exposures After Dark"]
        );
        assert_eq!(filter_posts(&posts, "Photo").len(), 2);
        assert_eq!(titles(&filter_posts(&posts, "travel")), vec!["Notes From the Arctic Circle"]);
    }

    #[test]
    fn no_match_is_empty() {
        assert!(filter_posts(&builtin_posts(), "space").is_empty());
    }

    #[test]
    fn category_key_takes_first_word() {
        assert_eq!(category_key("Photography Tips (12)"), "photography");
        assert_eq!(category_key("  Digital Art"), "digital");
        assert_eq!(category_key(""), "all");
    }

    // =========================================================================
    // BlogIndex
    // =========================================================================

    #[test]
    fn empty_result_notifies_exactly_once() {
        let mut index = BlogIndex::new(builtin_posts(), DEFAULT_PAGES);
        let mut surface = RecordingSurface::new();
        let mut notifier = RecordingNotifier::default();

        let visible = index.apply_category("space", &mut surface, &mut notifier);

        assert!(visible.is_empty());
        assert_eq!(
            notifier.sent,
            vec![(NO_POSTS_MESSAGE.to_string(), NotificationKind::Info)]
        );
        assert_eq!(
            surface.html(Container::BlogPosts),
            Some(r#"<div class="blog-posts"></div>"#)
        );
    }

    #[test]
    fn matching_category_does_not_notify() {
        let mut index = BlogIndex::new(builtin_posts(), DEFAULT_PAGES);
        let mut surface = RecordingSurface::new();
        let mut notifier = RecordingNotifier::default();

        index.apply_category("digital", &mut surface, &mut notifier);

        assert!(notifier.sent.is_empty());
        assert_eq!(index.category(), "digital");
        let html = surface.html(Container::BlogPosts).unwrap();
        assert!(html.contains("Painting Cities"));
        assert!(html.contains("<strong>Metropolis</strong>"));
    }

    #[test]
    fn each_empty_application_notifies() {
        let mut index = BlogIndex::new(builtin_posts(), DEFAULT_PAGES);
        let mut surface = RecordingSurface::new();
        let mut notifier = RecordingNotifier::default();
        index.apply_category("space", &mut surface, &mut notifier);
        index.apply_category("space", &mut surface, &mut notifier);
        assert_eq!(notifier.sent.len(), 2);
    }

    #[test]
    fn selecting_new_page_notifies_loading() {
        let mut index = BlogIndex::new(builtin_posts(), DEFAULT_PAGES);
        let mut surface = RecordingSurface::new();
        let mut notifier = RecordingNotifier::default();

        assert!(index.select_page(2, &mut surface, &mut notifier));
        assert_eq!(index.active_page(), 2);
        assert_eq!(
            notifier.sent,
            vec![(LOADING_MORE_MESSAGE.to_string(), NotificationKind::Info)]
        );
        assert!(
            surface
                .html(Container::Pagination)
                .unwrap()
                .contains(r#"class="pagination-btn active" data-page="2""#)
        );
    }

    #[test]
    fn selecting_active_page_is_noop() {
        let mut index = BlogIndex::new(builtin_posts(), DEFAULT_PAGES);
        let mut surface = RecordingSurface::new();
        let mut notifier = RecordingNotifier::default();

        assert!(!index.select_page(1, &mut surface, &mut notifier));
        assert!(notifier.sent.is_empty());
        assert!(surface.mutations().is_empty());
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn selecting_missing_page_panics() {
        let mut index = BlogIndex::new(builtin_posts(), 2);
        index.select_page(3, &mut RecordingSurface::new(), &mut RecordingNotifier::default());
    }

    #[test]
    fn render_shows_all_posts_and_first_page() {
        let index = BlogIndex::new(builtin_posts(), DEFAULT_PAGES);
        let mut surface = RecordingSurface::new();
        index.render(&mut surface);
        let html = surface.html(Container::BlogPosts).unwrap();
        assert_eq!(html.matches("blog-post-card").count(), 4);
        assert!(
            surface
                .html(Container::Pagination)
                .unwrap()
                .contains(r#"class="pagination-btn active" data-page="1""#)
        );
    }

    // =========================================================================
    // Loading
    // =========================================================================

    #[test]
    fn load_posts_falls_back_to_builtin() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(load_posts(tmp.path()).unwrap().len(), 4);
    }

    #[test]
    fn load_posts_reads_site_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("posts.toml"),
            r#"
[[posts]]
title = "Only"
category = "Gear Reviews"
"#,
        )
        .unwrap();
        let posts = load_posts(tmp.path()).unwrap();
        assert_eq!(titles(&posts), vec!["Only"]);
        assert!(posts[0].excerpt.is_empty());
        assert_eq!(posts[0].date, None);
    }

    #[test]
    fn load_posts_rejects_unknown_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("posts.toml"),
            "[[posts]]\ntitle = \"x\"\ncategory = \"y\"\nauthor = \"z\"\n",
        )
        .unwrap();
        assert!(matches!(load_posts(tmp.path()), Err(BlogError::Toml(_))));
    }
}
