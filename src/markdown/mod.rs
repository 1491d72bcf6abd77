// src/markdown/mod.rs
// =============================================================================
// This module owns the Markdown side of the pipeline.
//
// Submodules:
// - spoiler: scans raw source for `::: spoiler` regions (byte spans)
// - tree: parses Markdown into an explicit syntax tree with Spoiler nodes
//
// This file (mod.rs) is the module root - it re-exports the public API the
// extractor uses, so callers write `markdown::parse_tree()` instead of
// `markdown::tree::parse_tree()`.
// =============================================================================

// Declare submodules (tells Rust to include these files)
mod spoiler;
mod tree;

// Re-export public items from submodules
pub use tree::{parse_tree, Node, NodeKind};
