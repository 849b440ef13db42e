//! Helper functions for templates
//!
//! URL generation, date formatting and HTML snippets shared by the
//! generator and the server.

mod date;
mod html;
mod url;

use chrono::{DateTime, Utc};

pub use date::*;
pub use html::*;
pub use url::*;

use crate::config::SiteConfig;

/// Helpers bound to a site configuration
#[derive(Debug, Clone)]
pub struct Helpers {
    config: SiteConfig,
}

impl Helpers {
    /// Create a new helpers instance
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    /// Get url_for helper
    pub fn url_for(&self, path: &str) -> String {
        url_for(&self.config, path)
    }

    /// Get full_url_for helper
    pub fn full_url_for(&self, path: &str) -> String {
        full_url_for(&self.config, path)
    }

    /// Path of a post page
    pub fn post_path(&self, uid: &str) -> String {
        post_path(&self.config, uid)
    }

    /// Path of a home page
    pub fn page_path(&self, page: usize) -> String {
        page_path(&self.config, page)
    }

    /// Get css helper
    pub fn css(&self, path: &str) -> String {
        css(&self.config, path)
    }

    /// Format a publication date with `date_format`
    pub fn date(&self, date: &DateTime<Utc>) -> String {
        format_date_localized(
            date,
            &self.config.date_format,
            &self.config.timezone,
            &self.config.language,
        )
    }

    /// Format an edit date with `updated_format`
    pub fn updated(&self, date: &DateTime<Utc>) -> String {
        format_date_localized(
            date,
            &self.config.updated_format,
            &self.config.timezone,
            &self.config.language,
        )
    }
}
