//! Generator module - renders post and home pages with the built-in Tera templates
//!
//! The same rendering is used for static generation and by the server.

use anyhow::Result;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tera::Context;
use walkdir::WalkDir;

use crate::config::IssueTerm;
use crate::content::{self, ContentBlock, Document, PostSummary};
use crate::helpers::{self, html_escape, Helpers};
use crate::i18n::I18n;
use crate::templates::{
    CommentsData, ConfigData, NavPost, PaginationData, PostListItem, PostView, SectionView,
    TemplateRenderer, STYLESHEET,
};
use crate::Blog;

/// Page renderer and static site generator
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
    helpers: Helpers,
    i18n: I18n,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        let mut i18n = I18n::with_builtin(&blog.config.language);
        i18n.load_languages(&blog.language_dir)?;

        Ok(Self {
            blog: blog.clone(),
            renderer,
            helpers: Helpers::new(blog.config.clone()),
            i18n,
        })
    }

    /// Generate the entire site from the given posts
    pub fn generate(&self, posts: &[Document]) -> Result<()> {
        fs::create_dir_all(&self.blog.public_dir)?;

        self.write_file(Path::new("css/style.css"), STYLESHEET)?;

        // Static files override the built-in stylesheet
        self.copy_static_assets()?;

        let newest_first = sort_newest_first(posts);
        self.generate_index_pages(&newest_first)?;

        let (linkable, skipped): (Vec<Document>, Vec<Document>) =
            posts.iter().cloned().partition(|post| post.uid.is_some());
        for post in &skipped {
            tracing::warn!("Skipping post {} ({:?}): no uid", post.id, post.title);
        }

        let mut written = 0;
        for post in &linkable {
            let Some(uid) = post.uid.as_deref() else {
                continue;
            };

            let html = self.render_post(post, &linkable, false)?;
            let path = Path::new("post").join(uid).join("index.html");
            self.write_file(&path, &html)?;
            tracing::debug!("Generated post: {:?}", path);
            written += 1;
        }

        tracing::info!("Generated {} post pages", written);
        Ok(())
    }

    /// Values shared by every page
    fn base_context(&self, preview: bool) -> Context {
        let config = &self.blog.config;
        let config_data = ConfigData {
            title: html_escape(&config.title),
            description: html_escape(&config.description),
            language: html_escape(&config.language),
            root: self.helpers.url_for(""),
            url: config.url.clone(),
            generator: helpers::meta_generator(),
            stylesheet: self.helpers.css("style"),
        };

        let mut context = Context::new();
        context.insert("config", &config_data);
        context.insert("t", &self.i18n.get_all_translations());
        context.insert("preview", &preview);
        context
    }

    /// Render a post page; `all` is the post list searched for previous/next
    /// links. Posts without a uid are never linked.
    pub fn render_post(&self, post: &Document, all: &[Document], preview: bool) -> Result<String> {
        let adjacent = content::resolve_linkable(&post.id, all);
        let view = self.post_view(post);

        let mut context = self.base_context(preview);
        context.insert(
            "open_graph",
            &helpers::open_graph(
                &post.title,
                post.subtitle.as_deref().unwrap_or(""),
                &view.permalink,
                post.banner.as_deref(),
                &self.blog.config.title,
            ),
        );
        context.insert("prev_post", &adjacent.previous.as_ref().and_then(|p| self.nav_post(p)));
        context.insert("next_post", &adjacent.next.as_ref().and_then(|p| self.nav_post(p)));
        context.insert("comments", &self.comments_data(post));
        context.insert("post", &view);

        self.renderer.render("post.html", &context)
    }

    /// Render one home page; `posts` are the posts shown on it
    pub fn render_index(
        &self,
        posts: &[Document],
        current: usize,
        total: usize,
        preview: bool,
    ) -> Result<String> {
        let items: Vec<PostListItem> = posts
            .iter()
            .filter(|post| post.uid.is_some())
            .map(|post| self.list_item(post))
            .collect();

        let pagination = PaginationData {
            current,
            total,
            prev_link: (current > 1).then(|| self.helpers.page_path(current - 1)),
            next_link: (current < total).then(|| self.helpers.page_path(current + 1)),
        };

        let mut context = self.base_context(preview);
        context.insert("posts", &items);
        context.insert("pagination", &pagination);

        self.renderer.render("index.html", &context)
    }

    /// Render the "post not found" page
    pub fn render_not_found(&self, preview: bool) -> Result<String> {
        self.renderer
            .render("not_found.html", &self.base_context(preview))
    }

    /// Generate index pages with pagination
    fn generate_index_pages(&self, posts: &[Document]) -> Result<()> {
        let per_page = self.blog.config.per_page.max(1);
        let total_pages = posts.len().div_ceil(per_page).max(1);

        for page_num in 1..=total_pages {
            let start = (page_num - 1) * per_page;
            let end = (start + per_page).min(posts.len());
            let html = self.render_index(&posts[start..end], page_num, total_pages, false)?;

            let path = if page_num == 1 {
                Path::new("index.html").to_path_buf()
            } else {
                Path::new("page")
                    .join(page_num.to_string())
                    .join("index.html")
            };
            self.write_file(&path, &html)?;
        }

        tracing::debug!("Generated {} index pages", total_pages);
        Ok(())
    }

    fn post_view(&self, post: &Document) -> PostView {
        let uid = post.uid.clone().unwrap_or_default();
        let path = self.helpers.post_path(&uid);

        let sections = post
            .content
            .iter()
            .zip(section_anchors(&post.content))
            .map(|(block, anchor)| SectionView {
                heading: block.heading.as_deref().map(html_escape),
                anchor,
                html: block.body_html(),
            })
            .collect();

        let edited = if post.was_edited() {
            post.last_publication_date.map(|date| {
                html_escape(&self.i18n.format("edited_at", &self.helpers.updated(&date)))
            })
        } else {
            None
        };

        PostView {
            id: post.id.clone(),
            uid: html_escape(&uid),
            title: html_escape(&post.title),
            subtitle: post.subtitle.as_deref().map(html_escape),
            author: html_escape(&post.author),
            banner: post.banner.as_deref().map(html_escape),
            permalink: format!("{}{}", self.blog.config.url.trim_end_matches('/'), path),
            path,
            published: post
                .first_publication_date
                .map(|date| html_escape(&self.helpers.date(&date))),
            published_iso: post.first_publication_date.map(|date| helpers::date_xml(&date)),
            edited,
            reading_time: html_escape(&post.reading_time().to_string()),
            sections,
        }
    }

    fn list_item(&self, post: &Document) -> PostListItem {
        PostListItem {
            title: html_escape(&post.title),
            subtitle: post.subtitle.as_deref().map(html_escape),
            excerpt: post
                .content
                .first()
                .map(|block| block.body_html())
                .unwrap_or_default(),
            author: html_escape(&post.author),
            path: self.helpers.post_path(post.uid.as_deref().unwrap_or_default()),
            published: post
                .first_publication_date
                .map(|date| html_escape(&self.helpers.date(&date))),
            published_iso: post.first_publication_date.map(|date| helpers::date_xml(&date)),
            reading_time: html_escape(&post.reading_time().to_string()),
        }
    }

    /// Link to a neighbouring post; posts without a uid are not linkable
    fn nav_post(&self, summary: &PostSummary) -> Option<NavPost> {
        let uid = summary.uid.as_deref()?;
        Some(NavPost {
            title: html_escape(&summary.title),
            path: self.helpers.post_path(uid),
        })
    }

    fn comments_data(&self, post: &Document) -> Option<CommentsData> {
        let comments = &self.blog.config.comments;
        if !comments.is_active() {
            return None;
        }

        let issue_term = match comments.issue_term {
            IssueTerm::Uid => post.uid.clone().unwrap_or_else(|| post.id.clone()),
            IssueTerm::Pathname => "pathname".to_string(),
            IssueTerm::Url => "url".to_string(),
            IssueTerm::Title => "title".to_string(),
        };

        Some(CommentsData {
            repo: html_escape(&comments.repo),
            issue_term: html_escape(&issue_term),
            label: html_escape(&comments.label),
            theme: html_escape(&comments.theme),
        })
    }

    /// Write a file below the public directory
    fn write_file(&self, relative: &Path, content: &str) -> Result<()> {
        let output_path = self.blog.public_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
        }
        fs::write(&output_path, content)
            .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output_path, e))?;
        Ok(())
    }

    /// Copy static assets (images, stylesheets, etc.) to the public directory
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.blog.static_dir;
        if !static_dir.exists() {
            return Ok(());
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if path.is_file() {
                let relative = path.strip_prefix(static_dir)?;
                let dest = self.blog.public_dir.join(relative);

                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }

                fs::copy(path, &dest)?;
                copied += 1;
            }
        }

        tracing::debug!("Copied {} static files", copied);
        Ok(())
    }
}

/// One unique anchor per section: the slugified heading, `section-N` without
/// one, and a `-2`, `-3`... suffix on repeats
fn section_anchors(content: &[ContentBlock]) -> Vec<String> {
    let mut used = HashSet::new();

    content
        .iter()
        .enumerate()
        .map(|(i, block)| {
            let base = block
                .heading
                .as_deref()
                .map(slug::slugify)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| format!("section-{}", i + 1));

            let mut anchor = base.clone();
            let mut n = 1;
            while !used.insert(anchor.clone()) {
                n += 1;
                anchor = format!("{}-{}", base, n);
            }
            anchor
        })
        .collect()
}

/// Linkable posts ordered newest first; unpublished posts go last
fn sort_newest_first(posts: &[Document]) -> Vec<Document> {
    let mut sorted: Vec<Document> = posts.iter().filter(|p| p.uid.is_some()).cloned().collect();
    sorted.sort_by(|a, b| b.first_publication_date.cmp(&a.first_publication_date));
    sorted
}
