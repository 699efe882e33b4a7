//! Content views hosted inside the blog window

use dioxus::prelude::*;
use shared_types::{PostRecord, SortDirection};

use crate::api::fetch_posts;
use crate::route::Route;

/// Dig the display title out of the raw query-result properties.
///
/// The remote schema is user-defined; the title lives in whichever property
/// carries a `title` rich-text array.
pub fn post_title(post: &PostRecord) -> String {
    let from_properties = post.properties.as_object().and_then(|props| {
        props.values().find_map(|prop| {
            let fragments = prop.get("title")?.as_array()?;
            let title = fragments
                .iter()
                .filter_map(|f| f.get("plain_text").and_then(|v| v.as_str()))
                .collect::<Vec<_>>()
                .join("");
            if title.is_empty() {
                None
            } else {
                Some(title)
            }
        })
    });

    from_properties.unwrap_or_else(|| "(untitled)".to_string())
}

#[component]
pub fn MainPage() -> Element {
    rsx! {
        div {
            style: "display: flex; flex-direction: column; align-items: center; justify-content: center; height: 100%; gap: 1rem; padding: 1rem;",
            h1 { style: "margin: 0;", "Welcome" }
            p {
                style: "margin: 0; color: var(--text-muted, #9ca3af);",
                "A little desktop for a little blog."
            }
            Link {
                to: Route::PostList {},
                style: "color: var(--accent-bg, #3b82f6);",
                "Browse posts"
            }
        }
    }
}

#[component]
pub fn PostList() -> Element {
    let mut sort = use_signal(SortDirection::default);
    let posts = use_resource(move || async move { fetch_posts(sort()).await });

    rsx! {
        div {
            style: "display: flex; flex-direction: column; height: 100%; padding: 1rem; overflow-y: auto;",
            div {
                style: "display: flex; align-items: center; gap: 0.5rem; margin-bottom: 1rem;",
                h2 { style: "margin: 0; flex: 1;", "Posts" }
                button {
                    style: "padding: 0.25rem 0.75rem; background: var(--titlebar-bg, #1f2937); color: inherit; border: 1px solid var(--border-color, #374151); border-radius: 6px; cursor: pointer;",
                    onclick: move |_| {
                        let next = match sort() {
                            SortDirection::Descending => SortDirection::Ascending,
                            SortDirection::Ascending => SortDirection::Descending,
                        };
                        sort.set(next);
                    },
                    if sort() == SortDirection::Descending { "Newest first" } else { "Oldest first" }
                }
            }

            match &*posts.read_unchecked() {
                None => rsx! {
                    p { style: "color: var(--text-muted, #9ca3af);", "Loading posts..." }
                },
                Some(Err(e)) => rsx! {
                    p { style: "color: #f87171;", "Failed to load posts: {e}" }
                },
                Some(Ok(posts)) if posts.is_empty() => rsx! {
                    p { style: "color: var(--text-muted, #9ca3af);", "No posts yet." }
                },
                Some(Ok(posts)) => rsx! {
                    ul {
                        style: "list-style: none; margin: 0; padding: 0; display: flex; flex-direction: column; gap: 0.5rem;",
                        for (index, post) in posts.iter().enumerate() {
                            li {
                                key: "{post.id}",
                                Link {
                                    to: Route::PostDetail { index },
                                    style: "display: flex; justify-content: space-between; gap: 1rem; padding: 0.5rem 0.75rem; background: var(--titlebar-bg, #1f2937); border-radius: 8px; color: inherit; text-decoration: none;",
                                    span { {post_title(post)} }
                                    span {
                                        style: "color: var(--text-muted, #9ca3af); white-space: nowrap;",
                                        {post.created_time.format("%Y-%m-%d").to_string()}
                                    }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}

#[component]
pub fn PostDetail(index: usize) -> Element {
    let posts = use_resource(move || async move { fetch_posts(SortDirection::default()).await });

    rsx! {
        div {
            style: "display: flex; flex-direction: column; height: 100%; padding: 1rem; gap: 0.75rem; overflow-y: auto;",
            Link {
                to: Route::PostList {},
                style: "color: var(--accent-bg, #3b82f6); text-decoration: none;",
                "< Back to posts"
            }

            match &*posts.read_unchecked() {
                None => rsx! {
                    p { style: "color: var(--text-muted, #9ca3af);", "Loading post..." }
                },
                Some(Err(e)) => rsx! {
                    p { style: "color: #f87171;", "Failed to load post: {e}" }
                },
                Some(Ok(posts)) => match posts.get(index) {
                    None => rsx! {
                        p { style: "color: var(--text-muted, #9ca3af);", "Post not found." }
                    },
                    Some(post) => rsx! {
                        h2 { style: "margin: 0;", {post_title(post)} }
                        p {
                            style: "margin: 0; color: var(--text-muted, #9ca3af);",
                            {format!("Published {}", post.created_time.format("%Y-%m-%d"))}
                        }
                        if let Some(url) = post.url.clone() {
                            a {
                                href: "{url}",
                                target: "_blank",
                                style: "color: var(--accent-bg, #3b82f6);",
                                "Read on the source site"
                            }
                        }
                    },
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn post_with_properties(properties: serde_json::Value) -> PostRecord {
        PostRecord {
            id: "page-1".to_string(),
            created_time: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            last_edited_time: None,
            url: None,
            properties,
        }
    }

    #[test]
    fn test_post_title_joins_fragments() {
        let post = post_with_properties(serde_json::json!({
            "Name": {
                "title": [
                    {"plain_text": "Hello, "},
                    {"plain_text": "desktop"}
                ]
            }
        }));
        assert_eq!(post_title(&post), "Hello, desktop");
    }

    #[test]
    fn test_post_title_skips_non_title_properties() {
        let post = post_with_properties(serde_json::json!({
            "Tags": {"multi_select": []},
            "Headline": {"title": [{"plain_text": "Found it"}]}
        }));
        assert_eq!(post_title(&post), "Found it");
    }

    #[test]
    fn test_post_title_falls_back_when_absent() {
        let post = post_with_properties(serde_json::json!({}));
        assert_eq!(post_title(&post), "(untitled)");

        let post = post_with_properties(serde_json::Value::Null);
        assert_eq!(post_title(&post), "(untitled)");
    }
}
