//! Blog server rendering pages from the CMS on each request
//!
//! Preview sessions are tracked with the `io.prismic.preview` cookie; while
//! it is set, content is read from the preview ref instead of the master ref.

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::cms::{CmsError, PrismicClient};
use crate::content::Document;
use crate::generator::Generator;
use crate::helpers::{self, decode_url, encode_url};
use crate::templates::STYLESHEET;
use crate::Blog;

/// Cookie holding the preview ref
pub const PREVIEW_COOKIE: &str = "io.prismic.preview";

/// Lifetime of a preview session in seconds
const PREVIEW_MAX_AGE: i64 = 30 * 60;

/// Server state
struct ServerState {
    blog: Blog,
    generator: Generator,
    client: PrismicClient,
}

#[derive(Debug, Deserialize)]
struct PreviewParams {
    token: Option<String>,
    #[serde(rename = "documentId")]
    document_id: Option<String>,
}

/// Start the blog server
pub async fn start(blog: &Blog, ip: &str, port: u16, open: bool) -> Result<()> {
    let state = Arc::new(ServerState {
        blog: blog.clone(),
        generator: Generator::new(blog)?,
        client: blog.client()?,
    });

    let app = router(state, &blog.config.root);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}{}", ip, port, blog.config.root);
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    // Open browser if requested
    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<ServerState>, root: &str) -> Router {
    let files = ServeDir::new(&state.blog.public_dir)
        .append_index_html_on_directories(true)
        .fallback(ServeDir::new(&state.blog.static_dir));

    let routes = Router::new()
        .route("/", get(home_handler))
        .route("/page/:page", get(page_handler))
        .route("/page/:page/", get(page_handler))
        .route("/post/:slug", get(post_handler))
        .route("/post/:slug/", get(post_handler))
        .route("/api/preview", get(preview_handler))
        .route("/api/exit-preview", get(exit_preview_handler))
        .route("/css/style.css", get(stylesheet_handler))
        .fallback_service(files)
        .with_state(state);

    let app = match mount_path(root) {
        Some(prefix) => Router::new().nest(&prefix, routes),
        None => routes,
    };

    app.layer(TraceLayer::new_for_http())
}

/// Prefix the routes are nested under, if the site is not served at `/`
fn mount_path(root: &str) -> Option<String> {
    let trimmed = root.trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("/{}", trimmed))
    }
}

async fn home_handler(State(state): State<Arc<ServerState>>, jar: CookieJar) -> Response {
    render_home(&state, 1, &jar).await
}

async fn page_handler(
    State(state): State<Arc<ServerState>>,
    Path(page): Path<String>,
    jar: CookieJar,
) -> Response {
    match page.parse::<usize>() {
        Ok(page) if page > 0 => render_home(&state, page, &jar).await,
        _ => state.not_found(preview_token(&jar).is_some()),
    }
}

async fn render_home(state: &ServerState, page: usize, jar: &CookieJar) -> Response {
    let preview = preview_token(jar);
    let per_page = state.blog.config.per_page.max(1);

    let listing = match state
        .client
        .list_posts(page, per_page, preview.as_deref())
        .await
    {
        Ok(listing) => listing,
        Err(e) => return state.cms_error(e, preview.is_some()),
    };

    let total = listing.total_pages.max(1);
    if page > total {
        return state.not_found(preview.is_some());
    }

    match state
        .generator
        .render_index(&listing.documents, page, total, preview.is_some())
    {
        Ok(html) => Html(html).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
    jar: CookieJar,
) -> Response {
    let preview = preview_token(&jar);
    let is_preview = preview.is_some();

    let post = match state.client.get_by_uid(&slug, preview.as_deref()).await {
        Ok(post) => post,
        Err(e) => return state.cms_error(e, is_preview),
    };

    // Neighbours always come from published content
    let posts = match state.client.all_posts().await {
        Ok(posts) => posts,
        Err(e) => return state.cms_error(e, is_preview),
    };

    match state.generator.render_post(&post, &posts, is_preview) {
        Ok(html) => Html(html).into_response(),
        Err(e) => internal_error(e),
    }
}

/// Start a preview session and redirect to the previewed document
async fn preview_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<PreviewParams>,
    jar: CookieJar,
) -> Response {
    let Some(token) = params.token.filter(|t| !t.trim().is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing preview token").into_response();
    };

    let location = match params.document_id {
        Some(id) => match state.client.get_by_id(&id, Some(token.as_str())).await {
            Ok(document) => document_location(&state.blog, &document),
            Err(e) => {
                tracing::warn!("Could not resolve preview document {}: {}", id, e);
                helpers::url_for(&state.blog.config, "")
            }
        },
        None => helpers::url_for(&state.blog.config, ""),
    };

    tracing::info!("Preview session started, redirecting to {}", location);
    (
        jar.add(preview_cookie(&token)),
        Redirect::temporary(&location),
    )
        .into_response()
}

/// End the preview session
async fn exit_preview_handler(State(state): State<Arc<ServerState>>, jar: CookieJar) -> Response {
    (
        jar.remove(Cookie::build(PREVIEW_COOKIE).path("/")),
        Redirect::temporary(&helpers::url_for(&state.blog.config, "")),
    )
        .into_response()
}

/// Serve `static/css/style.css` when present, else the built-in stylesheet
async fn stylesheet_handler(State(state): State<Arc<ServerState>>) -> Response {
    let custom = state.blog.static_dir.join("css/style.css");
    let body = match tokio::fs::read_to_string(&custom).await {
        Ok(content) => content,
        Err(_) => STYLESHEET.to_string(),
    };
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], body).into_response()
}

impl ServerState {
    fn not_found(&self, preview: bool) -> Response {
        match self.generator.render_not_found(preview) {
            Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
            Err(e) => internal_error(e),
        }
    }

    fn cms_error(&self, error: CmsError, preview: bool) -> Response {
        if error.is_not_found() {
            tracing::debug!("{}", error);
            return self.not_found(preview);
        }
        tracing::error!("CMS request failed: {}", error);
        (StatusCode::BAD_GATEWAY, "Content service unavailable").into_response()
    }
}

fn internal_error(error: anyhow::Error) -> Response {
    tracing::error!("Render failed: {:#}", error);
    (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
}

/// Post page of a document, or the home page when it has no uid
fn document_location(blog: &Blog, document: &Document) -> String {
    match document.uid.as_deref() {
        Some(uid) => helpers::post_path(&blog.config, uid),
        None => helpers::url_for(&blog.config, ""),
    }
}

/// Preview ref from the request cookies
fn preview_token(jar: &CookieJar) -> Option<String> {
    jar.get(PREVIEW_COOKIE)
        .map(|cookie| decode_url(cookie.value()))
        .filter(|token| !token.is_empty())
}

/// Session cookie carrying the preview ref, percent-encoded
fn preview_cookie(token: &str) -> Cookie<'static> {
    Cookie::build((PREVIEW_COOKIE, encode_url(token)))
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(PREVIEW_MAX_AGE))
        .build()
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::config::CmsConfig;
    use axum::http::{HeaderMap, HeaderValue};

    fn jar_with(cookie: &str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        CookieJar::from_headers(&headers)
    }

    /// Serve the blog router on an ephemeral port
    async fn spawn_blog(dir: &std::path::Path) -> String {
        let mut config = SiteConfig::default();
        config.cms = CmsConfig {
            endpoint: "http://127.0.0.1:9/api/v2".to_string(),
            ..CmsConfig::default()
        };
        let blog = Blog::from_config(dir, config);
        let state = Arc::new(ServerState {
            generator: Generator::new(&blog).unwrap(),
            client: blog.client().unwrap(),
            blog,
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state, "/")).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn http_client() -> reqwest::Client {
        reqwest::Client::builder()
            .no_proxy()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap()
    }

    #[test]
    fn test_preview_token_from_cookies() {
        assert_eq!(preview_token(&CookieJar::new()), None);

        let token = "https://blog.prismic.io/previews/XYZ?websitePreviewId=1";
        let jar = jar_with(&format!(
            "theme=dark; {}={}; other=1",
            PREVIEW_COOKIE,
            encode_url(token)
        ));
        assert_eq!(preview_token(&jar).as_deref(), Some(token));
    }

    #[test]
    fn test_empty_preview_cookie_is_ignored() {
        assert_eq!(preview_token(&jar_with("io.prismic.preview=")), None);
    }

    #[test]
    fn test_preview_cookie() {
        let cookie = preview_cookie("abc def");
        assert_eq!(cookie.name(), PREVIEW_COOKIE);
        assert_eq!(cookie.value(), "abc%20def");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(1800)));

        // Reading it back yields the original token
        let jar = CookieJar::new().add(cookie);
        assert_eq!(preview_token(&jar).as_deref(), Some("abc def"));
    }

    #[test]
    fn test_mount_path() {
        assert_eq!(mount_path("/"), None);
        assert_eq!(mount_path(""), None);
        assert_eq!(mount_path("/blog/"), Some("/blog".to_string()));
    }

    #[test]
    fn test_document_location() {
        let blog = Blog::from_config("/tmp/site", SiteConfig::default());
        let mut document = Document::new("X1", "Hello");
        assert_eq!(document_location(&blog, &document), "/");

        document.uid = Some("hello".to_string());
        assert_eq!(document_location(&blog, &document), "/post/hello/");
    }

    #[tokio::test]
    async fn test_preview_session_cookies() {
        let dir = tempfile::tempdir().unwrap();
        let base = spawn_blog(dir.path()).await;
        let client = http_client();

        let response = client
            .get(format!("{}/api/preview?token=abc", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION].to_str().unwrap(), "/");
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with("io.prismic.preview=abc"));
        assert!(set_cookie.contains("Max-Age=1800"));

        let response = client
            .get(format!("{}/api/preview", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = client
            .get(format!("{}/api/exit-preview", base))
            .header(header::COOKIE, "io.prismic.preview=abc")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with("io.prismic.preview="));
        assert!(set_cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_builtin_stylesheet_and_bad_page() {
        let dir = tempfile::tempdir().unwrap();
        let base = spawn_blog(dir.path()).await;
        let client = http_client();

        let response = client
            .get(format!("{}/css/style.css", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), STYLESHEET);

        let response = client
            .get(format!("{}/page/zero", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
