// src/extractor/links.rs
// =============================================================================
// This module is the heart of the crate: it extracts a bounded, de-duplicated
// list of safe outbound links from Markdown comment text.
//
// The pipeline, in order (order matters):
// 1. Parse the Markdown into a syntax tree (markdown::parse_tree)
// 2. Walk the tree depth-first in document order, pruning Spoiler subtrees -
//    nothing inside a spoiler is ever collected, at any nesting depth
// 3. Resolve each link/image URL against the base origin; unresolvable
//    candidates are dropped silently
// 4. Deduplicate by resolved URL, keeping the first in document order
// 5. Apply the URL safety policy; rejected candidates are dropped
// 6. Truncate to the first MAX_LINKS entries
//
// The whole thing is a pure function: no I/O, no caching, no shared state.
// Callers that recompute on every input change are expected to memoize.
// =============================================================================

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::markdown::{parse_tree, Node, NodeKind};

use super::sanitize::default_url_policy;

/// Maximum number of links surfaced from one comment.
pub const MAX_LINKS: usize = 4;

// Whether an entry came from a hyperlink or an image node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Link,
    Image,
}

// One extracted link, ready for display.
//
// `url` is always an absolute, policy-accepted URL, unique within one
// extraction result. `text` is the display text when the source node's first
// child was a plain text leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedLink {
    /// Whether the source node was a hyperlink or an image
    #[serde(rename = "type")]
    pub kind: LinkKind,
    /// Absolute URL, resolved against the base origin
    pub url: String,
    /// Display text, if the node had one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

// Errors the extractor can surface to callers.
//
// Only whole-input parse failure is fatal; per-candidate problems (bad URL,
// policy rejection) silently drop the candidate instead. The bundled
// CommonMark parser is total - it degrades unparseable spans to literal
// text - so with the default frontend this variant is never produced. It
// exists because "could not analyze this text" must stay distinguishable
// from "no links found", and alternate parser frontends may be fallible.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The Markdown parser could not produce a tree at all
    #[error("markdown could not be parsed: {0}")]
    Parse(String),
}

// Extracts up to MAX_LINKS outbound links from Markdown comment text.
//
// Parameters:
//   markdown: user-authored Markdown (may contain `::: spoiler` containers)
//   base_origin: scheme+host used to resolve relative URLs
//     (e.g. "https://lemmy.world"). If malformed, relative candidates fail
//     to resolve and are dropped; absolute ones still pass through.
//   include_images: when false, only hyperlink nodes are collected
//
// Returns the extracted links in document order of first occurrence.
// An empty Vec means "no links to show" and is not an error.
pub fn extract_links(
    markdown: &str,
    base_origin: &str,
    include_images: bool,
) -> Result<Vec<ExtractedLink>, ExtractError> {
    extract_links_with_policy(markdown, base_origin, include_images, default_url_policy)
}

// Like extract_links, but with a caller-supplied URL safety policy.
//
// The policy maps a resolved absolute URL to its accepted canonical form,
// or None to reject the candidate.
pub fn extract_links_with_policy<P>(
    markdown: &str,
    base_origin: &str,
    include_images: bool,
    policy: P,
) -> Result<Vec<ExtractedLink>, ExtractError>
where
    P: Fn(&str) -> Option<String>,
{
    let tree = parse_tree(markdown);

    // A malformed base origin is not fatal: absolute URLs in the source
    // don't need it, and relative ones just fail to resolve per-candidate
    let base = Url::parse(base_origin).ok();

    let candidates = collect_candidates(&tree, base.as_ref(), include_images);

    // Dedupe by resolved URL, first occurrence in document order wins
    let mut seen = HashSet::new();
    let deduped = candidates
        .into_iter()
        .filter(|c| seen.insert(c.url.clone()));

    // Safety filter, then truncate. The policy's canonical form replaces
    // the resolved URL in the output.
    let mut links = Vec::new();
    for mut candidate in deduped {
        let Some(canonical) = policy(&candidate.url) else {
            continue;
        };
        candidate.url = canonical;
        links.push(candidate);
        if links.len() == MAX_LINKS {
            break;
        }
    }

    Ok(links)
}

// Walks the tree depth-first in document order and collects candidates.
//
// This is a pruning traversal with an explicit stack: the prune decision is
// made before a node's children are pushed, so nothing inside a Spoiler
// subtree is ever visited.
fn collect_candidates(
    root: &Node,
    base: Option<&Url>,
    include_images: bool,
) -> Vec<ExtractedLink> {
    let mut candidates = Vec::new();
    let mut stack: Vec<&Node> = vec![root];

    while let Some(node) = stack.pop() {
        // Prune: don't collect from a spoiler, don't descend into it
        if node.kind == NodeKind::Spoiler {
            continue;
        }

        let candidate = match &node.kind {
            NodeKind::Link { url } => resolve(base, url).map(|url| ExtractedLink {
                kind: LinkKind::Link,
                url,
                text: first_text(node),
            }),
            NodeKind::Image { url } if include_images => {
                resolve(base, url).map(|url| ExtractedLink {
                    kind: LinkKind::Image,
                    url,
                    text: first_text(node),
                })
            }
            _ => None,
        };
        if let Some(candidate) = candidate {
            candidates.push(candidate);
        }

        // Push children in reverse so they pop in document order
        for child in node.children.iter().rev() {
            stack.push(child);
        }
    }

    candidates
}

// Resolves a possibly-relative URL to an absolute URL string.
//
// Absolute URLs pass through; relative and scheme-relative ones join
// against the base origin. Returns None when neither works (including
// "no usable base" for a relative URL).
fn resolve(base: Option<&Url>, raw: &str) -> Option<String> {
    match Url::parse(raw) {
        Ok(url) => Some(url.to_string()),
        Err(_) => base?.join(raw).ok().map(|url| url.to_string()),
    }
}

// The display text of a link/image node: the value of its first child,
// if that child is a plain text leaf.
fn first_text(node: &Node) -> Option<String> {
    match node.children.first() {
        Some(Node {
            kind: NodeKind::Text(text),
            ..
        }) => Some(text.clone()),
        _ => None,
    }
}
