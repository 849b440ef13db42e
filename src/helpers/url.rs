//! URL helper functions

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;

/// Characters escaped in a path segment; unreserved URL characters pass through
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/css/style.css") // -> "/blog/css/style.css"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/post/hello/") // -> "https://example.com/blog/post/hello/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// Path of a post page
pub fn post_path(config: &SiteConfig, uid: &str) -> String {
    url_for(config, &format!("post/{}/", encode_url(uid)))
}

/// Path of a home page; page 1 is the root
pub fn page_path(config: &SiteConfig, page: usize) -> String {
    if page <= 1 {
        url_for(config, "")
    } else {
        url_for(config, &format!("page/{}/", page))
    }
}

/// Encode a URL path segment
pub fn encode_url(path: &str) -> String {
    percent_encoding::utf8_percent_encode(path, PATH_SEGMENT).to_string()
}

/// Decode a percent-encoded value
pub fn decode_url(value: &str) -> String {
    percent_encoding::percent_decode_str(value)
        .decode_utf8_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.url = "https://example.com".to_string();
        config.root = "/blog/".to_string();
        config
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/css/style.css"), "/blog/css/style.css");
        assert_eq!(url_for(&config, "about/"), "/blog/about/");
        assert_eq!(url_for(&config, ""), "/blog/");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/post/hello/"),
            "https://example.com/blog/post/hello/"
        );
    }

    #[test]
    fn test_post_and_page_paths() {
        let config = test_config();
        assert_eq!(post_path(&config, "criando-um-app"), "/blog/post/criando-um-app/");
        assert_eq!(post_path(&config, "a b/c"), "/blog/post/a%20b%2Fc/");
        assert_eq!(page_path(&config, 1), "/blog/");
        assert_eq!(page_path(&config, 3), "/blog/page/3/");
    }

    #[test]
    fn test_encode_roundtrip() {
        let token = "https://repo.prismic.io/previews/abc?websitePreviewId=1";
        assert_eq!(decode_url(&encode_url(token)), token);
    }
}
