//! HTML fragments for every container the engine renders.
//!
//! Uses [maud](https://maud.lambda.xyz/) so interpolated titles and
//! descriptions are escaped. Each function renders one fragment; none of them
//! touch engine state. Class names follow the site stylesheet
//! (`portfolio-item`, `image-placeholder`, `lightbox-*`, `notification-*`).

use crate::fetch::DecodedImage;
use crate::filter::FilterKey;
use crate::lightbox::LightboxSession;
use crate::notify::Notification;
use crate::types::{BlogPost, MediaItem};
use maud::{Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};

/// Filter buttons, with the selected key marked `active`.
pub fn filter_bar(keys: &[FilterKey], active: &FilterKey) -> Markup {
    html! {
        nav.gallery-filters {
            @for key in keys {
                button.filter-btn.active[key == active] data-filter=(key.as_str()) {
                    (button_label(key.as_str()))
                }
            }
        }
    }
}

/// Capitalized button label (`"nature"` → `"Nature"`).
fn button_label(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The card grid. Each card's image slot starts with the loading placeholder.
///
/// An empty slice renders an empty grid, not an error message.
pub fn gallery_grid(items: &[MediaItem], special_from: usize) -> Markup {
    html! {
        div.gallery {
            @for (index, item) in items.iter().enumerate() {
                div.portfolio-item data-id=(item.id) data-category=(item.category.as_str()) data-type=(item.kind.as_str()) {
                    div.portfolio-image id={ "card-image-" (item.id) } {
                        (loading_placeholder(item, index >= special_from))
                    }
                    div.portfolio-info {
                        h3 { (item.title) }
                        div.category { (item.kind.as_str()) " • " (item.category.as_str()) }
                        p.description { (item.description) }
                    }
                }
            }
        }
    }
}

/// Shown while an image is pending.
pub fn loading_placeholder(item: &MediaItem, special: bool) -> Markup {
    html! {
        div.image-placeholder.special[special].loading {
            "Loading " (item.title) "..."
        }
    }
}

/// Shown after a load failure. Deliberately not `.loading`.
pub fn failed_placeholder(item: &MediaItem, special: bool) -> Markup {
    html! {
        div.image-placeholder.special[special].failed {
            "Failed to load image"
            br;
            small { (item.title) }
        }
    }
}

pub fn loaded_image(item: &MediaItem, image: DecodedImage) -> Markup {
    html! {
        img src=(item.url) alt=(item.title) width=(image.width) height=(image.height) loading="lazy";
    }
}

/// Modal overlay for the session's current item. Boundary controls are disabled.
pub fn lightbox(session: &LightboxSession) -> Markup {
    let item = session.current();
    let position = session.index() + 1;
    html! {
        div.lightbox role="dialog" aria-modal="true" {
            div.lightbox-content {
                img src=(item.url) alt=(item.title);
                div.lightbox-caption {
                    h3 { (item.title) }
                    p { (item.description) }
                    span.lightbox-counter { (position) " / " (session.len()) }
                }
                button.lightbox-close aria-label="Close" { "×" }
                button.lightbox-prev aria-label="Previous" disabled[session.at_start()] { "‹" }
                button.lightbox-next aria-label="Next" disabled[session.at_end()] { "›" }
            }
        }
    }
}

pub fn toast(notification: &Notification) -> Markup {
    html! {
        div class={ "notification notification-" (notification.kind().as_str()) } data-id=(notification.id().get()) {
            span { (notification.message()) }
            button.notification-close aria-label="Dismiss" { "×" }
        }
    }
}

/// Blog post cards; excerpts are markdown.
pub fn blog_posts(posts: &[BlogPost]) -> Markup {
    html! {
        div.blog-posts {
            @for post in posts {
                article.blog-post-card {
                    span.post-category { (post.category) }
                    h3 { (post.title) }
                    @if let Some(date) = &post.date {
                        time datetime=(date) { (date) }
                    }
                    @if !post.excerpt.is_empty() {
                        div.post-excerpt { (PreEscaped(markdown_to_html(&post.excerpt))) }
                    }
                }
            }
        }
    }
}

pub fn pagination(pages: u32, active: u32) -> Markup {
    html! {
        nav.pagination {
            @for page in 1..=pages {
                button.pagination-btn.active[page == active] data-page=(page) { (page) }
            }
        }
    }
}

fn markdown_to_html(source: &str) -> String {
    let parser = Parser::new(source);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}
