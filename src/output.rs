//! CLI output formatting for the `folio` commands.
//!
//! # Information-First Display
//!
//! Every entity is shown by its semantic identity first (position and title),
//! with URLs and descriptions as indented context lines. The same item reads
//! the same way in `catalog` and in `preview`.
//!
//! # Output Format
//!
//! ## Catalog
//!
//! ```text
//! Catalog (filter: nature, 7 of 12)
//! 001 Mountain Majesty [photography • nature]
//!     Source: https://images.example.com/mountain.jpg
//!     Description: Majestic mountain landscapes captured...
//! ```
//!
//! ## Preview timeline
//!
//! ```text
//! [     0ms] filter all → 12 visible
//! [   500ms] requested #1
//! [   500ms] loaded #1
//! [   600ms] failed #2: Fetch failed: images/2.jpg
//! [   600ms] toast #0 warning: Could not load "Second".
//!
//! Loaded 11, failed 1, pending 0
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::config::EngineConfig;
use crate::engine::{EngineEvent, TimelineEntry};
use crate::filter::FilterKey;
use crate::loader::LoadSummary;
use crate::types::{BlogPost, MediaItem};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Item header: position, title, kind and category.
///
/// ```text
/// 001 Mountain Majesty [photography • nature]
/// ```
fn item_header(index: usize, item: &MediaItem) -> String {
    format!(
        "{} {} [{} • {}]",
        format_index(index),
        item.title,
        item.kind,
        item.category
    )
}

// ============================================================================
// Catalog
// ============================================================================

/// Format the (filtered) catalog listing.
pub fn format_catalog(items: &[MediaItem], key: &FilterKey, total: usize) -> Vec<String> {
    let mut lines = vec![format!(
        "Catalog (filter: {}, {} of {})",
        key,
        items.len(),
        total
    )];
    if items.is_empty() {
        lines.push(format!("{}(no items)", indent(1)));
        return lines;
    }
    for (i, item) in items.iter().enumerate() {
        lines.push(item_header(i + 1, item));
        lines.push(format!("{}Source: {}", indent(1), item.url));
        if !item.description.is_empty() {
            lines.push(format!(
                "{}Description: {}",
                indent(1),
                truncate_desc(&item.description, 40)
            ));
        }
    }
    lines
}

pub fn print_catalog(items: &[MediaItem], key: &FilterKey, total: usize) {
    for line in format_catalog(items, key, total) {
        println!("{}", line);
    }
}

// ============================================================================
// Preview
// ============================================================================

/// One timeline line, stamped with virtual milliseconds.
pub fn format_timeline_entry(entry: &TimelineEntry) -> String {
    let what = match &entry.event {
        EngineEvent::FilterApplied { key, visible } => {
            format!("filter {} → {} visible", key, visible)
        }
        EngineEvent::ImageRequested { item_id } => format!("requested #{}", item_id),
        EngineEvent::ImageLoaded { item_id } => format!("loaded #{}", item_id),
        EngineEvent::ImageFailed { item_id, reason } => {
            format!("failed #{}: {}", item_id, reason)
        }
        EngineEvent::LightboxOpened { item_id } => format!("lightbox open #{}", item_id),
        EngineEvent::LightboxMoved { item_id } => format!("lightbox → #{}", item_id),
        EngineEvent::LightboxClosed => "lightbox closed".to_string(),
        EngineEvent::Notified { id, kind, message } => {
            format!("toast #{} {}: {}", id, kind, message)
        }
        EngineEvent::NotificationDismissed { id } => format!("toast #{} dismissed", id),
        EngineEvent::BlogFiltered { category, visible } => {
            format!("blog {} → {} posts", category, visible)
        }
        EngineEvent::BlogPageSelected { page } => format!("blog page {}", page),
        EngineEvent::Ignored { reason } => format!("ignored: {}", reason),
    };
    format!("[{:>6}ms] {}", entry.at.as_millis(), what)
}

pub fn format_timeline(entries: &[TimelineEntry]) -> Vec<String> {
    entries.iter().map(format_timeline_entry).collect()
}

pub fn format_load_summary(summary: &LoadSummary) -> String {
    format!(
        "Loaded {}, failed {}, pending {}",
        summary.loaded, summary.failed, summary.pending
    )
}

/// Timeline, a blank line, then the load summary.
pub fn format_preview(entries: &[TimelineEntry], summary: &LoadSummary) -> Vec<String> {
    let mut lines = format_timeline(entries);
    lines.push(String::new());
    lines.push(format_load_summary(summary));
    lines
}

pub fn print_preview(entries: &[TimelineEntry], summary: &LoadSummary) {
    for line in format_preview(entries, summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Summary of a validated site directory.
pub fn format_check(config: &EngineConfig, items: &[MediaItem], posts: &[BlogPost]) -> Vec<String> {
    let loader = config.loader_config();
    vec![
        "Config".to_string(),
        format!(
            "{}loader: {}ms + {}ms per card, failure toasts {}",
            indent(1),
            loader.base_delay.as_millis(),
            loader.stagger.as_millis(),
            if config.loader.notify_failures { "on" } else { "off" }
        ),
        format!(
            "{}lightbox: arrow keys {}",
            indent(1),
            if config.lightbox.arrow_keys { "on" } else { "off" }
        ),
        format!(
            "{}notifications: {}ms",
            indent(1),
            config.notifications.dismiss_after_ms
        ),
        format!("Catalog: {} items", items.len()),
        format!("Blog: {} posts, {} pages", posts.len(), config.blog.pages),
    ]
}

pub fn print_check(config: &EngineConfig, items: &[MediaItem], posts: &[BlogPost]) {
    for line in format_check(config, items, posts) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationKind;
    use crate::test_helpers::*;
    use crate::types::{Category, MediaKind};
    use std::time::Duration;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn truncate_desc_short() {
        assert_eq!(truncate_desc("Short text", 40), "Short text");
    }

    #[test]
    fn truncate_desc_exact() {
        let text = "a".repeat(40);
        assert_eq!(truncate_desc(&text, 40), text);
    }

    #[test]
    fn truncate_desc_long() {
        let text = "a".repeat(50);
        let expected = format!("{}...", "a".repeat(40));
        assert_eq!(truncate_desc(&text, 40), expected);
    }

    #[test]
    fn truncate_desc_multibyte() {
        assert_eq!(truncate_desc("ééé", 2), "éé...");
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn item_header_shows_kind_and_category() {
        let it = item(4, "Harbor", Category::Urban, MediaKind::Photography);
        assert_eq!(item_header(2, &it), "002 Harbor [photography • urban]");
    }

    // =========================================================================
    // Catalog output
    // =========================================================================

    #[test]
    fn catalog_lists_items_with_context() {
        let catalog = three_item_catalog();
        let lines = format_catalog(catalog.all(), &FilterKey::All, catalog.len());
        assert_eq!(lines[0], "Catalog (filter: all, 3 of 3)");
        assert_eq!(lines[1], "001 First [photography • nature]");
        assert_eq!(lines[2], "    Source: images/1.jpg");
        assert_eq!(lines[3], "    Description: First description");
    }

    #[test]
    fn empty_catalog_says_so() {
        let lines = format_catalog(&[], &FilterKey::parse("space"), 12);
        assert_eq!(lines, vec!["Catalog (filter: space, 0 of 12)", "    (no items)"]);
    }

    // =========================================================================
    // Preview output
    // =========================================================================

    #[test]
    fn timeline_entry_is_stamped() {
        let entry = TimelineEntry {
            at: Duration::from_millis(600),
            event: EngineEvent::ImageFailed {
                item_id: 2,
                reason: "not found".to_string(),
            },
        };
        assert_eq!(format_timeline_entry(&entry), "[   600ms] failed #2: not found");
    }

    #[test]
    fn preview_ends_with_summary() {
        let mut engine = engine_with(three_item_catalog(), crate::fetch::ScriptedFetcher::new());
        engine.run_until_idle();
        let lines = format_preview(engine.timeline(), &engine.loader().summary());

        assert_eq!(lines[0], "[     0ms] filter all → 3 visible");
        assert_eq!(lines.last().unwrap(), "Loaded 3, failed 0, pending 0");
        assert_eq!(lines[lines.len() - 2], "");
    }

    #[test]
    fn toast_lines_show_kind() {
        let mut engine = engine_with(three_item_catalog(), crate::fetch::ScriptedFetcher::new());
        engine.notify("Hi", NotificationKind::Success);
        let lines = format_timeline(engine.timeline());
        assert_eq!(lines.last().unwrap(), "[     0ms] toast #0 success: Hi");
    }

    // =========================================================================
    // Check output
    // =========================================================================

    #[test]
    fn check_reports_defaults() {
        let catalog = three_item_catalog();
        let lines = format_check(&EngineConfig::default(), catalog.all(), &[]);
        assert!(
            lines.contains(&"    loader: 500ms + 100ms per card, failure toasts on".to_string())
        );
        assert!(lines.contains(&"Catalog: 3 items".to_string()));
        assert!(lines.contains(&"Blog: 0 posts, 3 pages".to_string()));
    }
}
