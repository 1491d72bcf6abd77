// src/lib.rs
// =============================================================================
// linkpeek - extract a bounded list of safe outbound links from Markdown.
//
// Comment text on federated link aggregators is free-form Markdown, often
// with the `::: spoiler` container extension. This library parses that text,
// walks the syntax tree while refusing to enter spoiler sections, resolves
// every link and image URL against a base origin, drops duplicates and
// unsafe URLs, and returns at most four entries in document order.
//
// The entry point is a pure function - no I/O, no caching, no shared state:
//
//   let links = linkpeek::extract_links(markdown, "https://lemmy.world", false)?;
//
// Modules:
// - markdown: spoiler-aware Markdown-to-tree parsing
// - extractor: the extraction pipeline and the URL safety policy
// =============================================================================

pub mod extractor;
pub mod markdown;

// Re-export the main API at the crate root so embedders can just write
// `linkpeek::extract_links(...)`
pub use extractor::{
    default_url_policy, extract_links, extract_links_with_policy, ExtractError, ExtractedLink,
    LinkKind, MAX_LINKS,
};
