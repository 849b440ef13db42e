//! Prismic structured text: node kinds, plain-text flattening and HTML rendering

use serde::{Deserialize, Serialize};

use crate::helpers::html_escape;

/// One node of a rich-text field, tagged by its `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RichTextNode {
    #[serde(rename = "heading1")]
    Heading1(TextBlock),
    #[serde(rename = "heading2")]
    Heading2(TextBlock),
    #[serde(rename = "heading3")]
    Heading3(TextBlock),
    #[serde(rename = "heading4")]
    Heading4(TextBlock),
    #[serde(rename = "heading5")]
    Heading5(TextBlock),
    #[serde(rename = "heading6")]
    Heading6(TextBlock),
    #[serde(rename = "paragraph")]
    Paragraph(TextBlock),
    #[serde(rename = "preformatted")]
    Preformatted(TextBlock),
    #[serde(rename = "list-item")]
    ListItem(TextBlock),
    #[serde(rename = "o-list-item")]
    OListItem(TextBlock),
    #[serde(rename = "image")]
    Image(ImageBlock),
    #[serde(rename = "embed")]
    Embed(EmbedBlock),
    /// Node kinds this renderer does not know about
    #[serde(other)]
    Unknown,
}

/// Text plus inline formatting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub spans: Vec<Span>,
}

impl TextBlock {
    /// Unformatted text block
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedBlock {
    #[serde(default)]
    pub oembed: OEmbed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OEmbed {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub embed_url: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub provider_name: Option<String>,
}

/// Inline formatting over a `[start, end)` character range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Span {
    Strong {
        start: usize,
        end: usize,
    },
    Em {
        start: usize,
        end: usize,
    },
    Hyperlink {
        start: usize,
        end: usize,
        #[serde(default)]
        data: LinkData,
    },
    Label {
        start: usize,
        end: usize,
        #[serde(default)]
        data: LabelData,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkData {
    #[serde(default)]
    pub link_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Set when the link points at another document
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
}

impl LinkData {
    /// Resolved `href`; document links point at the post route
    pub fn href(&self) -> Option<String> {
        match (&self.url, &self.uid) {
            (Some(url), _) if !url.is_empty() => Some(url.clone()),
            (_, Some(uid)) if !uid.is_empty() => Some(format!("/post/{}/", uid)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelData {
    #[serde(default)]
    pub label: String,
}

impl Span {
    fn range(&self) -> Option<(usize, usize)> {
        match self {
            Span::Strong { start, end }
            | Span::Em { start, end }
            | Span::Hyperlink { start, end, .. }
            | Span::Label { start, end, .. } => Some((*start, *end)),
            Span::Unknown => None,
        }
    }

    fn open_tag(&self) -> String {
        match self {
            Span::Strong { .. } => "<strong>".to_string(),
            Span::Em { .. } => "<em>".to_string(),
            Span::Hyperlink { data, .. } => {
                let href = data.href().unwrap_or_default();
                match data.target.as_deref() {
                    Some(target) if !target.is_empty() => format!(
                        r#"<a href="{}" target="{}" rel="noopener">"#,
                        html_escape(&href),
                        html_escape(target)
                    ),
                    _ => format!(r#"<a href="{}">"#, html_escape(&href)),
                }
            }
            Span::Label { data, .. } => {
                format!(r#"<span class="{}">"#, html_escape(&data.label))
            }
            Span::Unknown => String::new(),
        }
    }

    fn close_tag(&self) -> &'static str {
        match self {
            Span::Strong { .. } => "</strong>",
            Span::Em { .. } => "</em>",
            Span::Hyperlink { .. } => "</a>",
            Span::Label { .. } => "</span>",
            Span::Unknown => "",
        }
    }
}

impl RichTextNode {
    fn text_block(&self) -> Option<&TextBlock> {
        match self {
            RichTextNode::Heading1(block)
            | RichTextNode::Heading2(block)
            | RichTextNode::Heading3(block)
            | RichTextNode::Heading4(block)
            | RichTextNode::Heading5(block)
            | RichTextNode::Heading6(block)
            | RichTextNode::Paragraph(block)
            | RichTextNode::Preformatted(block)
            | RichTextNode::ListItem(block)
            | RichTextNode::OListItem(block) => Some(block),
            RichTextNode::Image(_) | RichTextNode::Embed(_) | RichTextNode::Unknown => None,
        }
    }

    /// Plain text of this node, `None` for nodes that carry no text
    pub fn plain_text(&self) -> Option<&str> {
        self.text_block().map(|block| block.text.as_str())
    }

    fn heading_level(&self) -> Option<u8> {
        match self {
            RichTextNode::Heading1(_) => Some(1),
            RichTextNode::Heading2(_) => Some(2),
            RichTextNode::Heading3(_) => Some(3),
            RichTextNode::Heading4(_) => Some(4),
            RichTextNode::Heading5(_) => Some(5),
            RichTextNode::Heading6(_) => Some(6),
            _ => None,
        }
    }

    /// Enclosing list element for list items
    fn list_tag(&self) -> Option<&'static str> {
        match self {
            RichTextNode::ListItem(_) => Some("ul"),
            RichTextNode::OListItem(_) => Some("ol"),
            _ => None,
        }
    }

    /// Render this node alone (list items are not wrapped)
    pub fn to_html(&self) -> String {
        if let Some(level) = self.heading_level() {
            let inner = self.text_block().map(render_spans).unwrap_or_default();
            return format!("<h{level}>{inner}</h{level}>");
        }

        match self {
            RichTextNode::Paragraph(block) => format!("<p>{}</p>", render_spans(block)),
            RichTextNode::Preformatted(block) => format!("<pre>{}</pre>", render_spans(block)),
            RichTextNode::ListItem(block) | RichTextNode::OListItem(block) => {
                format!("<li>{}</li>", render_spans(block))
            }
            RichTextNode::Image(image) if !image.url.is_empty() => format!(
                r#"<p class="block-img"><img src="{}" alt="{}"></p>"#,
                html_escape(&image.url),
                html_escape(image.alt.as_deref().unwrap_or(""))
            ),
            RichTextNode::Embed(embed) => {
                let oembed = &embed.oembed;
                format!(
                    r#"<div data-oembed="{}" data-oembed-type="{}" data-oembed-provider="{}">{}</div>"#,
                    html_escape(oembed.embed_url.as_deref().unwrap_or("")),
                    html_escape(oembed.kind.as_deref().unwrap_or("")),
                    html_escape(oembed.provider_name.as_deref().unwrap_or("")),
                    oembed.html.as_deref().unwrap_or("")
                )
            }
            _ => String::new(),
        }
    }
}

/// Flatten a rich-text field to plain text, one space between text nodes
pub fn as_text(nodes: &[RichTextNode]) -> String {
    nodes
        .iter()
        .filter_map(RichTextNode::plain_text)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render a rich-text field to HTML, grouping consecutive list items
pub fn as_html(nodes: &[RichTextNode]) -> String {
    let mut html = String::new();
    let mut list: Option<&'static str> = None;

    for node in nodes {
        let wanted = node.list_tag();
        if wanted != list {
            if let Some(tag) = list {
                html.push_str(&format!("</{}>", tag));
            }
            if let Some(tag) = wanted {
                html.push_str(&format!("<{}>", tag));
            }
            list = wanted;
        }
        html.push_str(&node.to_html());
    }

    if let Some(tag) = list {
        html.push_str(&format!("</{}>", tag));
    }

    html
}

/// Apply spans to escaped text. Offsets count chars; overlapping spans are
/// closed and reopened so the output stays well nested.
fn render_spans(block: &TextBlock) -> String {
    let chars: Vec<char> = block.text.chars().collect();
    let len = chars.len();

    let mut ordered: Vec<(usize, usize, &Span)> = block
        .spans
        .iter()
        .filter_map(|span| {
            let (start, end) = span.range()?;
            let end = end.min(len);
            (start < end).then_some((start, end, span))
        })
        .collect();
    ordered.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

    let mut out = String::with_capacity(block.text.len());
    let mut open: Vec<(usize, &Span)> = Vec::new();
    let mut next = 0;

    for i in 0..=len {
        if open.iter().any(|(end, _)| *end <= i) {
            let mut reopen = Vec::new();
            while let Some((end, span)) = open.pop() {
                out.push_str(span.close_tag());
                if end > i {
                    reopen.push((end, span));
                }
                if !open.iter().any(|(end, _)| *end <= i) {
                    break;
                }
            }
            for (end, span) in reopen.into_iter().rev() {
                out.push_str(&span.open_tag());
                open.push((end, span));
            }
        }

        while next < ordered.len() && ordered[next].0 == i {
            let (_, end, span) = ordered[next];
            out.push_str(&span.open_tag());
            open.push((end, span));
            next += 1;
        }

        if let Some(c) = chars.get(i) {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#39;"),
                '\n' => out.push_str("<br />"),
                c => out.push(*c),
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(text: &str) -> RichTextNode {
        RichTextNode::Paragraph(TextBlock::plain(text))
    }

    #[test]
    fn test_deserialize_node_kinds() {
        let json = r#"[
            {"type": "heading2", "text": "Title", "spans": []},
            {"type": "paragraph", "text": "Hello world", "spans": [{"start": 0, "end": 5, "type": "strong"}]},
            {"type": "image", "url": "https://images.prismic.io/a.png", "alt": null, "dimensions": {"width": 10, "height": 20}},
            {"type": "embed", "oembed": {"type": "video", "html": "<iframe></iframe>", "embed_url": "https://youtu.be/x"}},
            {"type": "o-list-item", "text": "first"},
            {"type": "table", "rows": []}
        ]"#;
        let nodes: Vec<RichTextNode> = serde_json::from_str(json).unwrap();

        assert_eq!(nodes.len(), 6);
        assert_eq!(nodes[0], RichTextNode::Heading2(TextBlock::plain("Title")));
        assert!(matches!(&nodes[1], RichTextNode::Paragraph(b) if b.spans.len() == 1));
        assert!(matches!(&nodes[2], RichTextNode::Image(i) if i.dimensions.is_some()));
        assert!(matches!(&nodes[3], RichTextNode::Embed(e) if e.oembed.kind.as_deref() == Some("video")));
        assert_eq!(nodes[4], RichTextNode::OListItem(TextBlock::plain("first")));
        assert_eq!(nodes[5], RichTextNode::Unknown);
    }

    #[test]
    fn test_unknown_span_kind() {
        let json = r#"{"type": "paragraph", "text": "abc", "spans": [{"start": 0, "end": 1, "type": "sparkle"}]}"#;
        let node: RichTextNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.to_html(), "<p>abc</p>");
    }

    #[test]
    fn test_as_text_joins_with_space() {
        let nodes = vec![
            paragraph("a b"),
            RichTextNode::Image(ImageBlock::default()),
            paragraph("c"),
        ];
        assert_eq!(as_text(&nodes), "a b c");
        assert_eq!(as_text(&[]), "");
    }

    #[test]
    fn test_plain_text_per_kind() {
        assert_eq!(paragraph("x").plain_text(), Some("x"));
        assert_eq!(
            RichTextNode::Embed(EmbedBlock::default()).plain_text(),
            None
        );
        assert_eq!(RichTextNode::Unknown.plain_text(), None);
    }

    #[test]
    fn test_render_spans() {
        let node = RichTextNode::Paragraph(TextBlock {
            text: "Read the docs now".to_string(),
            spans: vec![
                Span::Em { start: 0, end: 4 },
                Span::Hyperlink {
                    start: 9,
                    end: 13,
                    data: LinkData {
                        url: Some("https://prismic.io".to_string()),
                        target: Some("_blank".to_string()),
                        ..LinkData::default()
                    },
                },
            ],
        });
        assert_eq!(
            node.to_html(),
            r#"<p><em>Read</em> the <a href="https://prismic.io" target="_blank" rel="noopener">docs</a> now</p>"#
        );
    }

    #[test]
    fn test_render_overlapping_spans() {
        let node = RichTextNode::Paragraph(TextBlock {
            text: "abcd".to_string(),
            spans: vec![Span::Strong { start: 0, end: 3 }, Span::Em { start: 1, end: 4 }],
        });
        assert_eq!(
            node.to_html(),
            "<p><strong>a<em>bc</em></strong><em>d</em></p>"
        );
    }

    #[test]
    fn test_render_escapes_text() {
        assert_eq!(paragraph("1 < 2 & 3").to_html(), "<p>1 &lt; 2 &amp; 3</p>");
    }

    #[test]
    fn test_document_link() {
        let data = LinkData {
            link_type: Some("Document".to_string()),
            uid: Some("hello".to_string()),
            ..LinkData::default()
        };
        assert_eq!(data.href().as_deref(), Some("/post/hello/"));
    }

    #[test]
    fn test_as_html_groups_lists() {
        let nodes = vec![
            RichTextNode::ListItem(TextBlock::plain("a")),
            RichTextNode::ListItem(TextBlock::plain("b")),
            RichTextNode::OListItem(TextBlock::plain("c")),
            paragraph("d"),
        ];
        assert_eq!(
            as_html(&nodes),
            "<ul><li>a</li><li>b</li></ul><ol><li>c</li></ol><p>d</p>"
        );
    }

    #[test]
    fn test_as_html_image_and_heading() {
        let nodes = vec![
            RichTextNode::Heading3(TextBlock::plain("Intro")),
            RichTextNode::Image(ImageBlock {
                url: "https://img/x.png".to_string(),
                alt: Some("A \"quote\"".to_string()),
                dimensions: None,
            }),
            RichTextNode::Image(ImageBlock::default()),
        ];
        assert_eq!(
            as_html(&nodes),
            r#"<h3>Intro</h3><p class="block-img"><img src="https://img/x.png" alt="A &quot;quote&quot;"></p>"#
        );
    }
}
