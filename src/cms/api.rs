//! Prismic REST API v2 wire types and query building

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::content::{rich_text, ContentBlock, Document, RichTextNode};

/// Repository description returned by the API entry point
#[derive(Debug, Clone, Deserialize)]
pub struct ApiInfo {
    #[serde(default)]
    pub refs: Vec<ApiRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiRef {
    pub id: String,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "isMasterRef", default)]
    pub is_master_ref: bool,
}

impl ApiInfo {
    /// The ref serving published content
    pub fn master_ref(&self) -> Option<&str> {
        self.refs
            .iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference.as_str())
    }
}

/// One page of `documents/search` results
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default = "first_page")]
    pub page: usize,
    #[serde(default)]
    pub total_pages: usize,
    #[serde(default)]
    pub total_results_size: usize,
    #[serde(default)]
    pub results: Vec<RawDocument>,
}

fn first_page() -> usize {
    1
}

/// A document as returned by the API, before normalization
#[derive(Debug, Clone, Deserialize)]
pub struct RawDocument {
    pub id: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(rename = "type", default)]
    pub doc_type: String,
    #[serde(default, deserialize_with = "timestamp")]
    pub first_publication_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp")]
    pub last_publication_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data: Option<RawPostData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPostData {
    pub title: Option<TextField>,
    pub subtitle: Option<TextField>,
    pub author: Option<TextField>,
    pub banner: Option<RawImage>,
    pub content: Option<Vec<RawSection>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawImage {
    pub url: Option<String>,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSection {
    pub heading: Option<TextField>,
    pub body: Option<Vec<RichTextNode>>,
}

/// A field that may be modelled as key text or as rich text
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextField {
    Plain(String),
    Rich(Vec<RichTextNode>),
}

impl TextField {
    pub fn into_text(self) -> String {
        match self {
            TextField::Plain(text) => text,
            TextField::Rich(nodes) => rich_text::as_text(&nodes),
        }
    }
}

fn non_empty(field: Option<TextField>) -> Option<String> {
    field.map(TextField::into_text).filter(|s| !s.trim().is_empty())
}

impl From<RawDocument> for Document {
    fn from(raw: RawDocument) -> Self {
        let data = raw.data.unwrap_or_default();

        let content = data
            .content
            .unwrap_or_default()
            .into_iter()
            .map(|section| ContentBlock {
                heading: non_empty(section.heading),
                body: section.body.unwrap_or_default(),
            })
            .collect();

        Document {
            id: raw.id,
            uid: raw.uid.filter(|uid| !uid.is_empty()),
            first_publication_date: raw.first_publication_date,
            last_publication_date: raw.last_publication_date,
            title: data.title.map(TextField::into_text).unwrap_or_default(),
            subtitle: non_empty(data.subtitle),
            author: data.author.map(TextField::into_text).unwrap_or_default(),
            banner: data
                .banner
                .and_then(|banner| banner.url)
                .filter(|url| !url.is_empty()),
            content,
        }
    }
}

/// Parse a Prismic timestamp (`2021-03-25T19:25:28+0000` or RFC 3339)
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z"))
        .map(|date| date.with_timezone(&Utc))
        .map_err(|e| tracing::warn!("Ignoring invalid timestamp {:?}: {}", value, e))
        .ok()
}

fn timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(parse_timestamp))
}

/// `[at(path, "value")]` predicate
pub fn at(path: &str, value: &str) -> String {
    format!(r#"[at({}, "{}")]"#, path, value.replace('"', "\\\""))
}

/// Parameters of a `documents/search` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub predicates: Vec<String>,
    pub orderings: Option<String>,
    pub page: usize,
    pub page_size: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            predicates: Vec::new(),
            orderings: None,
            page: 1,
            page_size: 20,
        }
    }
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn predicate(mut self, predicate: String) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn orderings(mut self, orderings: &str) -> Self {
        self.orderings = Some(orderings.to_string());
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.clamp(1, 100);
        self
    }

    /// Query string pairs for the given ref
    pub fn params(&self, reference: &str, access_token: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = vec![("ref", reference.to_string())];
        if !self.predicates.is_empty() {
            params.push(("q", format!("[{}]", self.predicates.concat())));
        }
        if let Some(orderings) = &self.orderings {
            params.push(("orderings", orderings.clone()));
        }
        params.push(("pageSize", self.page_size.to_string()));
        params.push(("page", self.page.to_string()));
        if let Some(token) = access_token {
            params.push(("access_token", token.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SEARCH_FIXTURE: &str = r#"{
        "page": 1,
        "results_per_page": 20,
        "results_size": 2,
        "total_results_size": 2,
        "total_pages": 1,
        "next_page": null,
        "prev_page": null,
        "results": [
            {
                "id": "YF1a2BAAACMAx3kA",
                "uid": "como-utilizar-hooks",
                "type": "posts",
                "first_publication_date": "2021-03-15T19:25:28+0000",
                "last_publication_date": "2021-03-25T19:25:28+0000",
                "data": {
                    "title": "Como utilizar Hooks",
                    "subtitle": "Pensando em sincronização em vez de ciclos de vida",
                    "author": "Joseph Oliveira",
                    "banner": {"url": "https://images.prismic.io/banner.png", "alt": null},
                    "content": [
                        {
                            "heading": "Proin et varius",
                            "body": [
                                {"type": "paragraph", "text": "Lorem ipsum dolor", "spans": []},
                                {"type": "list-item", "text": "sit amet", "spans": [{"start": 0, "end": 3, "type": "strong"}]}
                            ]
                        },
                        {"heading": null, "body": null}
                    ]
                }
            },
            {
                "id": "YF2b3BAAACMAx4lB",
                "uid": null,
                "type": "posts",
                "first_publication_date": "not a date",
                "last_publication_date": null,
                "data": {"title": null, "author": "Danilo Vieira"}
            }
        ]
    }"#;

    #[test]
    fn test_search_response_normalization() {
        let response: SearchResponse = serde_json::from_str(SEARCH_FIXTURE).unwrap();
        assert_eq!(response.total_pages, 1);
        assert_eq!(response.results.len(), 2);

        let docs: Vec<Document> = response.results.into_iter().map(Document::from).collect();

        let first = &docs[0];
        assert_eq!(first.uid.as_deref(), Some("como-utilizar-hooks"));
        assert_eq!(first.title, "Como utilizar Hooks");
        assert_eq!(first.author, "Joseph Oliveira");
        assert_eq!(first.banner.as_deref(), Some("https://images.prismic.io/banner.png"));
        assert_eq!(
            first.first_publication_date,
            Some(Utc.with_ymd_and_hms(2021, 3, 15, 19, 25, 28).unwrap())
        );
        assert!(first.was_edited());
        assert_eq!(first.content.len(), 2);
        assert_eq!(first.content[0].heading.as_deref(), Some("Proin et varius"));
        assert_eq!(first.content[0].word_count(), 8);
        assert_eq!(first.content[1], ContentBlock::default());

        let second = &docs[1];
        assert_eq!(second.uid, None);
        assert_eq!(second.title, "");
        assert_eq!(second.first_publication_date, None);
        assert!(second.content.is_empty());
    }

    #[test]
    fn test_rich_text_title() {
        let json = r#"{"id": "x", "data": {"title": [{"type": "heading1", "text": "Rich title", "spans": []}]}}"#;
        let raw: RawDocument = serde_json::from_str(json).unwrap();
        let doc = Document::from(raw);
        assert_eq!(doc.title, "Rich title");
        assert!(doc.content.is_empty());
    }

    #[test]
    fn test_parse_timestamp() {
        let expected = Utc.with_ymd_and_hms(2021, 4, 3, 18, 23, 7).unwrap();
        assert_eq!(parse_timestamp("2021-04-03T18:23:07+0000"), Some(expected));
        assert_eq!(parse_timestamp("2021-04-03T15:23:07-03:00"), Some(expected));
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_master_ref() {
        let json = r#"{"refs": [
            {"id": "preview", "ref": "YF-preview", "label": "Draft", "isMasterRef": false},
            {"id": "master", "ref": "YF-master", "label": "Master", "isMasterRef": true}
        ], "types": {"posts": "Posts"}}"#;
        let info: ApiInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.master_ref(), Some("YF-master"));

        let empty: ApiInfo = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.master_ref(), None);
    }

    #[test]
    fn test_search_params() {
        let query = SearchQuery::new()
            .predicate(at("document.type", "posts"))
            .predicate(at("my.posts.uid", "hello"))
            .orderings("[document.first_publication_date desc]")
            .page(0)
            .page_size(500);

        let params = query.params("REF", Some("token"));
        assert_eq!(
            params,
            vec![
                ("ref", "REF".to_string()),
                (
                    "q",
                    r#"[[at(document.type, "posts")][at(my.posts.uid, "hello")]]"#.to_string()
                ),
                ("orderings", "[document.first_publication_date desc]".to_string()),
                ("pageSize", "100".to_string()),
                ("page", "1".to_string()),
                ("access_token", "token".to_string()),
            ]
        );
    }

    #[test]
    fn test_at_escapes_quotes() {
        assert_eq!(at("document.id", r#"a"b"#), r#"[at(document.id, "a\"b")]"#);
    }
}
