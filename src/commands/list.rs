//! List published posts

use anyhow::Result;

use crate::content::Document;
use crate::helpers::Helpers;
use crate::Blog;

/// Print every published post in publication order
pub async fn run(blog: &Blog) -> Result<()> {
    let client = blog.client()?;
    let posts = client.all_posts().await?;
    let helpers = Helpers::new(blog.config.clone());

    println!("Posts ({}):", posts.len());
    for post in &posts {
        println!("  {}", post_line(&helpers, post));
    }

    Ok(())
}

/// One line of the post listing
fn post_line(helpers: &Helpers, post: &Document) -> String {
    let date = post
        .first_publication_date
        .map(|date| helpers.date(&date))
        .unwrap_or_else(|| "unpublished".to_string());

    format!(
        "{} - {} ({}) [{}]",
        date,
        post.title,
        post.reading_time(),
        post.uid.as_deref().unwrap_or("-")
    )
}
