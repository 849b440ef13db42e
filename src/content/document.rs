//! Blog post documents as fetched from the content source

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::reading_time::{self, ReadingEstimate};
use super::rich_text::{self, RichTextNode};

/// A blog post
///
/// Built per request from the CMS response and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Repository-unique document id
    pub id: String,

    /// URL slug
    pub uid: Option<String>,

    /// First publication date; `None` while the post is an unpublished draft
    pub first_publication_date: Option<DateTime<Utc>>,

    /// Date of the latest published edit
    pub last_publication_date: Option<DateTime<Utc>>,

    pub title: String,

    pub subtitle: Option<String>,

    pub author: String,

    /// Banner image URL
    pub banner: Option<String>,

    /// Sections in display order
    pub content: Vec<ContentBlock>,
}

impl Document {
    /// Create a document with only an identity and a title
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            uid: None,
            first_publication_date: None,
            last_publication_date: None,
            title: title.into(),
            subtitle: None,
            author: String::new(),
            banner: None,
            content: Vec::new(),
        }
    }

    /// Estimated reading time of the whole post
    pub fn reading_time(&self) -> ReadingEstimate {
        reading_time::estimate(&self.content)
    }

    /// Whether the post was edited after it was first published
    pub fn was_edited(&self) -> bool {
        match (self.first_publication_date, self.last_publication_date) {
            (Some(first), Some(last)) => last > first,
            _ => false,
        }
    }

    /// The id/uid/title view used for previous/next links
    pub fn summary(&self) -> PostSummary {
        PostSummary {
            id: self.id.clone(),
            uid: self.uid.clone(),
            title: self.title.clone(),
        }
    }
}

/// One section of a post: an optional heading and a rich-text body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub heading: Option<String>,
    pub body: Vec<RichTextNode>,
}

impl ContentBlock {
    pub fn new(heading: Option<&str>, body: Vec<RichTextNode>) -> Self {
        Self {
            heading: heading.map(str::to_string),
            body,
        }
    }

    /// Body flattened to plain text
    pub fn body_text(&self) -> String {
        rich_text::as_text(&self.body)
    }

    /// Body rendered to HTML
    pub fn body_html(&self) -> String {
        rich_text::as_html(&self.body)
    }

    /// Words in heading and body
    pub fn word_count(&self) -> usize {
        let heading = self
            .heading
            .as_deref()
            .map(reading_time::count_words)
            .unwrap_or(0);
        heading + reading_time::count_words(&self.body_text())
    }
}

/// Minimal view of a neighbouring post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: String,
    pub uid: Option<String>,
    pub title: String,
}
