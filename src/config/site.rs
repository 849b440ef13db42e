//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Environment variable overriding `cms.endpoint`
pub const ENDPOINT_ENV: &str = "PRISMIC_API_ENDPOINT";
/// Environment variable overriding `cms.access_token`
pub const ACCESS_TOKEN_ENV: &str = "PRISMIC_ACCESS_TOKEN";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub timezone: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub public_dir: String,
    pub static_dir: String,
    pub language_dir: String,

    // Date / Time format
    pub date_format: String,
    pub updated_format: String,

    // Pagination
    pub per_page: usize,

    // Content source
    #[serde(default)]
    pub cms: CmsConfig,

    // Comment widget
    #[serde(default)]
    pub comments: CommentsConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "spacetraveling".to_string(),
            description: String::new(),
            author: String::new(),
            language: "en".to_string(),
            timezone: String::new(),

            url: "http://localhost:3000".to_string(),
            root: "/".to_string(),

            public_dir: "public".to_string(),
            static_dir: "static".to_string(),
            language_dir: "languages".to_string(),

            date_format: "DD MMM YYYY".to_string(),
            updated_format: "DD MMM YYYY, HH:mm".to_string(),

            per_page: 20,

            cms: CmsConfig::default(),
            comments: CommentsConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(config)
    }

    /// Apply `PRISMIC_API_ENDPOINT` / `PRISMIC_ACCESS_TOKEN` from the process environment
    pub fn apply_env(&mut self) {
        self.cms.apply_overrides(
            std::env::var(ENDPOINT_ENV).ok(),
            std::env::var(ACCESS_TOKEN_ENV).ok(),
        );
    }
}

/// Prismic repository settings handed to [`crate::cms::PrismicClient`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    /// API v2 entry point, e.g. `https://my-repo.cdn.prismic.io/api/v2`
    pub endpoint: String,
    pub access_token: Option<String>,
    /// Custom type of the blog posts
    pub document_type: String,
    pub page_size: usize,
    pub timeout_secs: u64,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            access_token: None,
            document_type: "posts".to_string(),
            page_size: 20,
            timeout_secs: 10,
        }
    }
}

impl CmsConfig {
    /// Override endpoint and token; empty values are ignored
    pub fn apply_overrides(&mut self, endpoint: Option<String>, access_token: Option<String>) {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            tracing::debug!("Using CMS endpoint from environment");
            self.endpoint = endpoint;
        }
        if let Some(token) = access_token.filter(|t| !t.trim().is_empty()) {
            self.access_token = Some(token);
        }
    }
}

/// How utterances maps a page to a GitHub issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueTerm {
    /// The post uid
    Uid,
    Pathname,
    Url,
    Title,
}

/// utterances comment widget configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentsConfig {
    pub enable: bool,
    /// GitHub repository in `owner/name` form
    pub repo: String,
    pub issue_term: IssueTerm,
    pub label: String,
    pub theme: String,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            enable: false,
            repo: String::new(),
            issue_term: IssueTerm::Uid,
            label: String::new(),
            theme: "github-dark".to_string(),
        }
    }
}

impl CommentsConfig {
    /// Whether the widget can be embedded at all
    pub fn is_active(&self) -> bool {
        self.enable && self.repo.contains('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "spacetraveling");
        assert_eq!(config.per_page, 20);
        assert_eq!(config.cms.document_type, "posts");
        assert_eq!(config.cms.page_size, 20);
        assert!(!config.comments.is_active());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
language: pt-BR
per_page: 5
cms:
  endpoint: https://blog.cdn.prismic.io/api/v2
  document_type: articles
comments:
  enable: true
  repo: owner/comments
  issue_term: pathname
analytics: UA-1
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.language, "pt-BR");
        assert_eq!(config.per_page, 5);
        assert_eq!(config.cms.endpoint, "https://blog.cdn.prismic.io/api/v2");
        assert_eq!(config.cms.document_type, "articles");
        assert_eq!(config.cms.timeout_secs, 10);
        assert!(config.comments.is_active());
        assert_eq!(config.comments.issue_term, IssueTerm::Pathname);
        assert_eq!(config.comments.theme, "github-dark");
        assert!(config.extra.contains_key("analytics"));
    }

    #[test]
    fn test_cms_overrides() {
        let mut cms = CmsConfig {
            endpoint: "https://a.cdn.prismic.io/api/v2".to_string(),
            ..CmsConfig::default()
        };

        cms.apply_overrides(Some(String::new()), Some("secret".to_string()));
        assert_eq!(cms.endpoint, "https://a.cdn.prismic.io/api/v2");
        assert_eq!(cms.access_token.as_deref(), Some("secret"));

        cms.apply_overrides(Some("https://b.cdn.prismic.io/api/v2".to_string()), None);
        assert_eq!(cms.endpoint, "https://b.cdn.prismic.io/api/v2");
        assert_eq!(cms.access_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "title: Loaded\nper_page: 3\n").unwrap();

        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.title, "Loaded");
        assert_eq!(config.per_page, 3);
        assert_eq!(config.cms.document_type, "posts");
    }
}
