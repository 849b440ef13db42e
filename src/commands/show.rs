//! Show one post with its reading estimate and neighbours

use anyhow::Result;

use crate::content::{self, AdjacentPosts, Document, PostSummary};
use crate::Blog;

/// Fetch a post by uid and print its details
///
/// `reference` selects a content ref other than the master ref, such as a
/// preview or release ref.
pub async fn run(blog: &Blog, uid: &str, reference: Option<&str>) -> Result<()> {
    let client = blog.client()?;
    let post = client.get_by_uid(uid, reference).await?;
    let posts = client.all_posts().await?;
    let adjacent = content::resolve_linkable(&post.id, &posts);

    for line in describe(&post, &adjacent) {
        println!("{}", line);
    }

    Ok(())
}

fn describe(post: &Document, adjacent: &AdjacentPosts) -> Vec<String> {
    let mut lines = vec![
        format!("Title:        {}", post.title),
        format!("Id:           {}", post.id),
        format!("Uid:          {}", post.uid.as_deref().unwrap_or("-")),
    ];

    if !post.author.is_empty() {
        lines.push(format!("Author:       {}", post.author));
    }
    if let Some(date) = post.first_publication_date {
        lines.push(format!("Published:    {}", date.to_rfc3339()));
    }
    if post.was_edited() {
        if let Some(date) = post.last_publication_date {
            lines.push(format!("Edited:       {}", date.to_rfc3339()));
        }
    }

    let words: usize = post.content.iter().map(|block| block.word_count()).sum();
    lines.push(format!("Words:        {}", words));
    lines.push(format!("Reading time: {}", post.reading_time()));
    lines.push(format!("Previous:     {}", neighbour(adjacent.previous.as_ref())));
    lines.push(format!("Next:         {}", neighbour(adjacent.next.as_ref())));
    lines
}

fn neighbour(summary: Option<&PostSummary>) -> String {
    match summary {
        Some(post) => format!("{} [{}]", post.title, post.uid.as_deref().unwrap_or("-")),
        None => "-".to_string(),
    }
}
