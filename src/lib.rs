//! prismic-blog: a blog front end for a Prismic repository
//!
//! Posts are fetched from the Prismic REST API and rendered with embedded
//! Tera templates, either into a static site or on demand by the server.
//! Each post page shows an estimated reading time and links to the
//! neighbouring posts in publication order.

pub mod cms;
pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod i18n;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Static assets copied to the output
    pub static_dir: PathBuf,
    /// Language overrides
    pub language_dir: PathBuf,
}

impl Blog {
    /// Create a blog from a directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };
        config.apply_env();

        Ok(Self::from_config(base_dir, config))
    }

    /// Create a blog from an already loaded configuration
    pub fn from_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);
        let static_dir = base_dir.join(&config.static_dir);
        let language_dir = base_dir.join(&config.language_dir);

        Self {
            config,
            base_dir,
            public_dir,
            static_dir,
            language_dir,
        }
    }

    /// Client for the configured Prismic repository
    pub fn client(&self) -> Result<cms::PrismicClient> {
        Ok(cms::PrismicClient::new(self.config.cms.clone())?)
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_new_with_config_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "title: My Blog\npublic_dir: out\ncms:\n  endpoint: https://blog.cdn.prismic.io/api/v2\n",
        )
        .unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.config.title, "My Blog");
        assert_eq!(blog.public_dir, dir.path().join("out"));
        assert_eq!(blog.static_dir, dir.path().join("static"));
        assert!(blog.client().is_ok());
    }

    #[test]
    fn test_client_requires_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::from_config(dir.path(), config::SiteConfig::default());
        assert!(blog.client().is_err());
    }
}
