//! HTTP client for the Prismic content API.

pub mod api;
mod error;

use std::time::Duration;

pub use api::{at, SearchQuery, SearchResponse};
pub use error::{CmsError, Result};

use crate::config::CmsConfig;
use crate::content::Document;

const ORDER_OLDEST_FIRST: &str = "[document.first_publication_date]";
const ORDER_NEWEST_FIRST: &str = "[document.first_publication_date desc]";

/// One page of posts plus paging information
#[derive(Debug, Clone)]
pub struct PostPage {
    pub documents: Vec<Document>,
    pub page: usize,
    pub total_pages: usize,
}

/// HTTP client for a Prismic repository.
#[derive(Debug, Clone)]
pub struct PrismicClient {
    client: reqwest::Client,
    config: CmsConfig,
}

impl PrismicClient {
    /// Create a client for the configured repository.
    pub fn new(config: CmsConfig) -> Result<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(CmsError::InvalidInput(
                "cms.endpoint is not configured".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(concat!("prismic-blog/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &CmsConfig {
        &self.config
    }

    /// Build a URL below the API entry point.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    /// Fetch the ref of the published content.
    pub async fn master_ref(&self) -> Result<String> {
        let mut request = self.client.get(self.url(""));
        if let Some(token) = &self.config.access_token {
            request = request.query(&[("access_token", token)]);
        }
        let info: api::ApiInfo = self.handle_response(request.send().await?, "API").await?;
        info.master_ref()
            .map(str::to_string)
            .ok_or(CmsError::MissingMasterRef)
    }

    /// Use the preview ref when there is one, the master ref otherwise.
    pub async fn resolve_ref(&self, preview: Option<&str>) -> Result<String> {
        match preview {
            Some(reference) if !reference.is_empty() => Ok(reference.to_string()),
            _ => self.master_ref().await,
        }
    }

    /// Run a search against the given ref.
    async fn search_with_ref(&self, query: &SearchQuery, reference: &str) -> Result<SearchResponse> {
        let params = query.params(reference, self.config.access_token.as_deref());
        let response = self
            .client
            .get(self.url("/documents/search"))
            .query(&params)
            .send()
            .await?;
        self.handle_response(response, "documents").await
    }

    /// Run a search, optionally scoped to a preview ref.
    pub async fn search(&self, query: &SearchQuery, preview: Option<&str>) -> Result<SearchResponse> {
        let reference = self.resolve_ref(preview).await?;
        self.search_with_ref(query, &reference).await
    }

    async fn first_match(
        &self,
        predicate: String,
        preview: Option<&str>,
        resource: String,
    ) -> Result<Document> {
        let query = SearchQuery::new().predicate(predicate).page_size(1);
        let response = self.search(&query, preview).await?;
        response
            .results
            .into_iter()
            .next()
            .map(Document::from)
            .ok_or(CmsError::NotFound { resource })
    }

    /// Get a post by its URL slug.
    pub async fn get_by_uid(&self, uid: &str, preview: Option<&str>) -> Result<Document> {
        let document_type = &self.config.document_type;
        self.first_match(
            at(&format!("my.{}.uid", document_type), uid),
            preview,
            format!("{} \"{}\"", document_type, uid),
        )
        .await
    }

    /// Get a document by id.
    pub async fn get_by_id(&self, id: &str, preview: Option<&str>) -> Result<Document> {
        self.first_match(
            at("document.id", id),
            preview,
            format!("document {}", id),
        )
        .await
    }

    /// List one page of `per_page` posts, newest first.
    pub async fn list_posts(
        &self,
        page: usize,
        per_page: usize,
        preview: Option<&str>,
    ) -> Result<PostPage> {
        let query = SearchQuery::new()
            .predicate(at("document.type", &self.config.document_type))
            .orderings(ORDER_NEWEST_FIRST)
            .page(page)
            .page_size(per_page);
        let response = self.search(&query, preview).await?;

        Ok(PostPage {
            page: response.page,
            total_pages: response.total_pages,
            documents: response.results.into_iter().map(Document::from).collect(),
        })
    }

    /// Fetch every published post, in publication order.
    pub async fn all_posts(&self) -> Result<Vec<Document>> {
        let reference = self.master_ref().await?;
        let mut documents = Vec::new();
        let mut page = 1;

        loop {
            let query = SearchQuery::new()
                .predicate(at("document.type", &self.config.document_type))
                .orderings(ORDER_OLDEST_FIRST)
                .page(page)
                .page_size(self.config.page_size);
            let response = self.search_with_ref(&query, &reference).await?;
            let fetched = response.results.len();
            tracing::debug!(
                "Fetched page {}/{} ({} documents)",
                response.page,
                response.total_pages,
                fetched
            );

            documents.extend(response.results.into_iter().map(Document::from));

            if fetched == 0 || page >= response.total_pages {
                break;
            }
            page += 1;
        }

        tracing::info!("Fetched {} posts", documents.len());
        Ok(documents)
    }

    /// Decode a successful response or map the failure.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
        resource: &str,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(CmsError::from)
        } else if status.as_u16() == 404 {
            Err(CmsError::NotFound {
                resource: resource.to_string(),
            })
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(CmsError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }
}
