// src/extractor/mod.rs
// =============================================================================
// This module contains the link extraction pipeline.
//
// Submodules:
// - links: the extraction pipeline (walk, resolve, dedupe, filter, truncate)
// - sanitize: the default URL safety policy
//
// This file (mod.rs) is the module root - it re-exports the public API so
// callers write `extractor::extract_links()` and don't need to know about
// our internal organization.
// =============================================================================

// Declare submodules (tells Rust to include these files)
mod links;
mod sanitize;

// Re-export public items from submodules
pub use links::{
    extract_links, extract_links_with_policy, ExtractError, ExtractedLink, LinkKind, MAX_LINKS,
};
pub use sanitize::default_url_policy;
