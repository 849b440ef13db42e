//! Previous/next post resolution

use serde::Serialize;

use super::{Document, PostSummary};

/// The chronological neighbours of a post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdjacentPosts {
    /// Closest post published before the current one
    pub previous: Option<PostSummary>,
    /// Closest post published after the current one
    pub next: Option<PostSummary>,
}

/// Find the posts published immediately before and after `current_id`.
///
/// Neighbours are picked by first publication date, so the order of
/// `documents` does not matter. An unknown or unpublished current post, or a
/// post with no neighbours, yields empty sides.
pub fn resolve(current_id: &str, documents: &[Document]) -> AdjacentPosts {
    let Some(current) = documents.iter().find(|doc| doc.id == current_id) else {
        tracing::debug!("Post {} not among {} documents", current_id, documents.len());
        return AdjacentPosts::default();
    };
    let Some(published) = current.first_publication_date else {
        return AdjacentPosts::default();
    };

    let dated = || {
        documents
            .iter()
            .filter_map(|doc| doc.first_publication_date.map(|date| (date, doc)))
    };

    let previous = dated()
        .filter(|(date, _)| *date < published)
        .max_by_key(|(date, _)| *date)
        .map(|(_, doc)| doc.summary());

    let next = dated()
        .filter(|(date, _)| *date > published)
        .min_by_key(|(date, _)| *date)
        .map(|(_, doc)| doc.summary());

    AdjacentPosts { previous, next }
}

/// Like [`resolve`], but only posts with a uid count as neighbours.
///
/// A post without a uid has no page to link to, so it must not stand between
/// two linkable posts.
pub fn resolve_linkable(current_id: &str, documents: &[Document]) -> AdjacentPosts {
    if documents.iter().all(|doc| doc.uid.is_some()) {
        return resolve(current_id, documents);
    }

    let linkable: Vec<Document> = documents
        .iter()
        .filter(|doc| doc.uid.is_some())
        .cloned()
        .collect();
    resolve(current_id, &linkable)
}
