//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::Blog;

/// Fetch every published post and generate the static site
pub async fn run(blog: &Blog) -> Result<()> {
    let start = std::time::Instant::now();

    let client = blog.client()?;
    let posts = client.all_posts().await?;
    tracing::info!("Loaded {} posts", posts.len());

    let generator = Generator::new(blog)?;
    generator.generate(&posts)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}
