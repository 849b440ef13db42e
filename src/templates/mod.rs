//! Built-in blog templates using the Tera template engine
//!
//! All templates are embedded in the binary. Values reaching the templates
//! are escaped when the view structs are built, so autoescaping is off.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

/// Stylesheet emitted as `css/style.css`
pub const STYLESHEET: &str = include_str!("blog/style.css");

/// Template renderer with the embedded blog theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("blog/layout.html")),
            ("index.html", include_str!("blog/index.html")),
            ("post.html", include_str!("blog/post.html")),
            ("not_found.html", include_str!("blog/not_found.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("blog/partials/header.html"),
            ),
            (
                "partials/post_info.html",
                include_str!("blog/partials/post_info.html"),
            ),
            (
                "partials/post_nav.html",
                include_str!("blog/partials/post_nav.html"),
            ),
            (
                "partials/pager.html",
                include_str!("blog/partials/pager.html"),
            ),
            (
                "partials/comments.html",
                include_str!("blog/partials/comments.html"),
            ),
            (
                "partials/exit_preview.html",
                include_str!("blog/partials/exit_preview.html"),
            ),
        ])?;

        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(tera::Value::String(crate::helpers::strip_html(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "...".to_string(),
    };

    Ok(tera::Value::String(crate::helpers::truncate(
        &s,
        length,
        Some(&omission),
    )))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub description: String,
    pub language: String,
    pub root: String,
    pub url: String,
    /// `<meta name="generator">` tag
    pub generator: String,
    /// `<link rel="stylesheet">` tag
    pub stylesheet: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub id: String,
    pub uid: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub author: String,
    pub banner: Option<String>,
    pub path: String,
    pub permalink: String,
    pub published: Option<String>,
    pub published_iso: Option<String>,
    /// "edited on" line, only when edited after publication
    pub edited: Option<String>,
    pub reading_time: String,
    pub sections: Vec<SectionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub heading: Option<String>,
    pub anchor: String,
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostListItem {
    pub title: String,
    pub subtitle: Option<String>,
    /// HTML of the first section, shown when there is no subtitle
    pub excerpt: String,
    pub author: String,
    pub path: String,
    pub published: Option<String>,
    pub published_iso: Option<String>,
    pub reading_time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationData {
    pub current: usize,
    pub total: usize,
    pub prev_link: Option<String>,
    pub next_link: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentsData {
    pub repo: String,
    pub issue_term: String,
    pub label: String,
    pub theme: String,
}
