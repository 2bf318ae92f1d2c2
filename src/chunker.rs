//! HTML chunk splitting and merging
//!
//! Providers cap how many characters one network call may carry. When an HTML
//! payload exceeds an engine's limit the orchestrator splits it into chunks,
//! translates the chunks concurrently and reassembles them in order. Splitting
//! HTML safely is a job of its own, so it sits behind the [`HtmlChunker`]
//! trait; deployments can inject a DOM-aware implementation, and the bundled
//! [`TagBoundaryChunker`] covers the common case of markup made of a sequence
//! of top-level elements.

/// Chunk splitting/merging collaborator
///
/// Implementations must guarantee `merge(split(html, n)) == html` for markup
/// they can split, and must preserve chunk order on merge.
pub trait HtmlChunker: Send + Sync {
    /// Split `html` into chunks no larger than `max_chunk_size` where the
    /// markup's top-level structure allows it
    fn split(&self, html: &str, max_chunk_size: usize) -> Vec<String>;

    /// Reassemble chunks, preserving their order
    fn merge(&self, chunks: &[String]) -> String;
}

/// Elements that never have a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
    "source", "track", "wbr",
];

/// Splits at boundaries between top-level nodes
///
/// Scans tags to track nesting depth and cuts only where depth returns to
/// zero, so no chunk ever opens an element another chunk closes. A single
/// top-level node larger than the limit passes through whole rather than
/// being torn apart.
#[derive(Debug, Default, Clone, Copy)]
pub struct TagBoundaryChunker;

impl TagBoundaryChunker {
    pub fn new() -> Self {
        TagBoundaryChunker
    }

    /// Lowercased element name of a tag body like `"p class=\"x\""`
    fn tag_name(tag_body: &str) -> String {
        tag_body
            .trim_start_matches('/')
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase()
    }

    /// Slice `html` into its top-level nodes (elements, text runs, comments)
    fn top_level_nodes(html: &str) -> Vec<&str> {
        let mut nodes = Vec::new();
        let mut depth: usize = 0;
        let mut start = 0;
        let mut pos = 0;

        while pos < html.len() {
            let rest = &html[pos..];
            if rest.starts_with("<!--") {
                pos += rest.find("-->").map(|i| i + 3).unwrap_or(rest.len());
            } else if rest.starts_with('<') {
                let Some(close) = rest.find('>') else {
                    // Dangling '<': treat the remainder as text
                    pos = html.len();
                    break;
                };
                let body = &rest[1..close];
                let is_closing = body.starts_with('/');
                let is_self_closing =
                    body.ends_with('/') || VOID_ELEMENTS.contains(&Self::tag_name(body).as_str());
                if is_closing {
                    depth = depth.saturating_sub(1);
                } else if !is_self_closing {
                    depth += 1;
                }
                pos += close + 1;
            } else {
                // Text run up to the next tag
                pos += rest.find('<').unwrap_or(rest.len());
            }
            if depth == 0 {
                nodes.push(&html[start..pos]);
                start = pos;
            }
        }
        if start < html.len() {
            nodes.push(&html[start..]);
        }
        nodes
    }
}

impl HtmlChunker for TagBoundaryChunker {
    fn split(&self, html: &str, max_chunk_size: usize) -> Vec<String> {
        if html.len() <= max_chunk_size {
            return vec![html.to_string()];
        }
        let mut chunks = Vec::new();
        let mut current = String::new();
        for node in Self::top_level_nodes(html) {
            if !current.is_empty() && current.len() + node.len() > max_chunk_size {
                chunks.push(std::mem::take(&mut current));
            }
            // An oversize single node still travels whole
            current.push_str(node);
        }
        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }

    fn merge(&self, chunks: &[String]) -> String {
        chunks.concat()
    }
}
