//! Initialize a new blog directory

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::templates::STYLESHEET;

const CONFIG_TEMPLATE: &str = r#"# prismic-blog configuration

# Site
title: spacetraveling
description: ''
author: ''
language: en
timezone: ''

# URL
url: http://localhost:3000
root: /

# Directory
public_dir: public
static_dir: static
language_dir: languages

# Date / Time format
date_format: DD MMM YYYY
updated_format: DD MMM YYYY, HH:mm

# Pagination
per_page: 20

# Content source
# PRISMIC_API_ENDPOINT and PRISMIC_ACCESS_TOKEN override these values
cms:
  endpoint: ''
  access_token: ~
  document_type: posts
  page_size: 20
  timeout_secs: 10

# Comments (utterances)
comments:
  enable: false
  repo: ''
  issue_term: uid
  label: ''
  theme: github-dark
"#;

const LANGUAGE_TEMPLATE: &str = "# Overrides for the built-in strings, one file per language\n\
# next_post: Next post\n";

/// Initialize a new blog in the given directory
///
/// Existing files are left untouched.
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir.join("static/css"))?;
    fs::create_dir_all(target_dir.join("languages"))?;

    write_if_missing(&target_dir.join("_config.yml"), CONFIG_TEMPLATE)?;
    write_if_missing(&target_dir.join("static/css/style.css"), STYLESHEET)?;
    write_if_missing(&target_dir.join("languages/en.yml"), LANGUAGE_TEMPLATE)?;

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        tracing::warn!("{:?} already exists, skipping", path);
        return Ok(());
    }
    fs::write(path, content)?;
    tracing::debug!("Created {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    #[test]
    fn test_init_site() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("blog");
        init_site(&target).unwrap();

        assert!(target.join("static/css/style.css").exists());
        assert!(target.join("languages/en.yml").exists());

        let config = SiteConfig::load(target.join("_config.yml")).unwrap();
        assert_eq!(config.title, "spacetraveling");
        assert_eq!(config.cms.document_type, "posts");
        assert!(!config.comments.enable);
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("_config.yml"), "title: Mine\n").unwrap();
        init_site(dir.path()).unwrap();

        let content = fs::read_to_string(dir.path().join("_config.yml")).unwrap();
        assert_eq!(content, "title: Mine\n");
    }
}
