// src/markdown/spoiler.rs
// =============================================================================
// This module finds spoiler (collapsible) regions in raw Markdown source.
//
// Lemmy-style spoilers are a container extension, not part of CommonMark:
//
//   ::: spoiler click to reveal
//   hidden content, possibly with [links](https://example.com)
//   :::
//
// pulldown-cmark doesn't know this syntax - it just sees paragraphs of text.
// So before parsing, we scan the source line by line and record the byte
// ranges covered by spoilers. The tree builder then routes everything inside
// those ranges into a dedicated Spoiler node.
//
// Rules (matching the Lemmy remark plugin's grammar):
// - An opening fence is a line of 3+ colons, the lowercase keyword "spoiler",
//   then whitespace and a non-empty visible title
// - A closing fence is a line of 3+ colons and nothing else
// - Containers can nest; we track depth and only report the outermost spans
// - Blockquote markers (`>` plus optional space, repeatable) are stripped
//   before the fence checks, so spoilers inside blockquotes still count
// - Lines indented 4+ spaces (or a tab) are indented code, never fences,
//   and fence look-alikes inside fenced code blocks (``` or ~~~) are ignored
// - An unclosed spoiler extends to the end of the input (hidden stays hidden)
// =============================================================================

use std::ops::Range;

// Returns the byte spans of the outermost spoiler regions, in document order.
//
// Spans cover everything from the start of the opening fence line to the end
// of the closing fence line (or the end of input when unclosed). Offsets are
// into the original source, blockquote markers included.
pub fn spoiler_spans(markdown: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();

    // Byte offset of the start of the current line
    let mut line_start = 0;

    // Depth of nested spoiler containers; 0 = not inside a spoiler
    let mut depth: usize = 0;

    // Start offset of the outermost open spoiler
    let mut open_start = 0;

    // Are we inside a fenced code block? If so, which fence char opened it?
    let mut code_fence: Option<char> = None;

    for line in markdown.split_inclusive('\n') {
        let line_end = line_start + line.len();

        // Spoilers nest inside blockquotes, so `> ::: spoiler x` counts too
        let content = strip_blockquote_markers(line.trim_end_matches(['\n', '\r']));
        let trimmed = content.trim_start();

        if let Some(fence_char) = code_fence {
            // Only a matching closing fence ends the code block
            if is_code_fence(trimmed, Some(fence_char)) {
                code_fence = None;
            }
        } else if is_indented_code(content) {
            // A literal `::: spoiler x` in indented code is not a fence
        } else if let Some(fence_char) = code_fence_char(trimmed) {
            code_fence = Some(fence_char);
        } else if is_spoiler_open(trimmed) {
            if depth == 0 {
                open_start = line_start;
            }
            depth += 1;
        } else if depth > 0 && is_spoiler_close(trimmed) {
            depth -= 1;
            if depth == 0 {
                spans.push(open_start..line_end);
            }
        }

        line_start = line_end;
    }

    // Unclosed spoiler: hide everything through the end of input
    if depth > 0 {
        spans.push(open_start..markdown.len());
    }

    spans
}

// An opening fence: ":::" (3 or more colons), the lowercase keyword
// "spoiler", then whitespace and a non-empty visible title. This is the
// grammar Lemmy's spoiler plugin accepts; `::: Spoiler` or a title-less
// `::: spoiler` fall through as ordinary text.
fn is_spoiler_open(line: &str) -> bool {
    let Some(rest) = strip_colons(line) else {
        return false;
    };

    match rest.trim_start().strip_prefix("spoiler") {
        Some(title) => title.starts_with([' ', '\t']) && !title.trim().is_empty(),
        None => false,
    }
}

// A closing fence: a line of 3+ colons and nothing else.
fn is_spoiler_close(line: &str) -> bool {
    matches!(strip_colons(line), Some(rest) if rest.trim().is_empty())
}

// Strips a run of 3+ leading colons, returning the remainder.
// Returns None if the line doesn't start with at least 3 colons.
fn strip_colons(line: &str) -> Option<&str> {
    let stripped = line.trim_start_matches(':');
    let colons = line.len() - stripped.len();
    if colons >= 3 {
        Some(stripped)
    } else {
        None
    }
}

// Strips blockquote markers from the front of a line: up to 3 spaces of
// indentation, a '>', an optional following space - repeated for nested
// quotes. Returns the rest of the line, indentation intact when no marker
// was found (the indented-code check needs to see it).
fn strip_blockquote_markers(line: &str) -> &str {
    let mut rest = line;
    loop {
        let bytes = rest.as_bytes();
        let mut i = 0;
        while i < 3 && bytes.get(i) == Some(&b' ') {
            i += 1;
        }
        if bytes.get(i) == Some(&b'>') {
            rest = &rest[i + 1..];
            rest = rest.strip_prefix(' ').unwrap_or(rest);
        } else {
            return rest;
        }
    }
}

// A line indented 4+ spaces (or with a tab in the indentation) is an
// indented code block line, never a fence.
fn is_indented_code(line: &str) -> bool {
    let mut spaces = 0;
    for c in line.chars() {
        match c {
            ' ' => spaces += 1,
            '\t' => return true,
            _ => break,
        }
    }
    spaces >= 4
}

// Detects the opening of a fenced code block and returns its fence character.
fn code_fence_char(line: &str) -> Option<char> {
    if line.starts_with("```") {
        Some('`')
    } else if line.starts_with("~~~") {
        Some('~')
    } else {
        None
    }
}

// A closing code fence must use the same character as the opening one.
fn is_code_fence(line: &str, open_char: Option<char>) -> bool {
    match open_char {
        Some('`') => line.starts_with("```"),
        Some('~') => line.starts_with("~~~"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_spoilers() {
        assert!(spoiler_spans("just some *markdown* text").is_empty());
    }

    #[test]
    fn test_simple_spoiler_span() {
        let md = "before\n::: spoiler hidden\nsecret\n:::\nafter";
        let spans = spoiler_spans(md);
        assert_eq!(spans.len(), 1);
        let span = &spans[0];
        assert_eq!(&md[span.clone()], "::: spoiler hidden\nsecret\n:::\n");
    }

    #[test]
    fn test_nested_spoilers_merge_into_outer_span() {
        let md = "::: spoiler outer\n::: spoiler inner\ndeep\n:::\nstill hidden\n:::\nvisible";
        let spans = spoiler_spans(md);
        assert_eq!(spans.len(), 1);
        assert!(md[spans[0].clone()].contains("still hidden"));
        assert!(!md[spans[0].clone()].contains("visible"));
    }

    #[test]
    fn test_unclosed_spoiler_runs_to_end_of_input() {
        let md = "::: spoiler oops\nnever closed\n[link](https://example.com)";
        let spans = spoiler_spans(md);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].end, md.len());
    }

    #[test]
    fn test_two_sibling_spoilers() {
        let md = "::: spoiler a\nx\n:::\nmiddle\n::: spoiler b\ny\n:::";
        let spans = spoiler_spans(md);
        assert_eq!(spans.len(), 2);
        assert!(spans[0].end <= spans[1].start);
    }

    #[test]
    fn test_spoiler_inside_blockquote() {
        let md = "> ::: spoiler hidden\n> secret\n> :::\n\nafter";
        let spans = spoiler_spans(md);
        assert_eq!(spans.len(), 1);
        assert_eq!(&md[spans[0].clone()], "> ::: spoiler hidden\n> secret\n> :::\n");
    }

    #[test]
    fn test_spoiler_inside_nested_blockquote() {
        let md = "> > ::: spoiler deep\n> > secret\n> > :::";
        assert_eq!(spoiler_spans(md).len(), 1);
    }

    #[test]
    fn test_fence_inside_code_block_ignored() {
        let md = "```\n::: spoiler not real\n```\n[link](https://example.com)";
        assert!(spoiler_spans(md).is_empty());
    }

    #[test]
    fn test_fence_inside_indented_code_ignored() {
        let md = "    ::: spoiler sample\n\n[link](https://example.com)";
        assert!(spoiler_spans(md).is_empty());
    }

    #[test]
    fn test_tab_indented_fence_ignored() {
        let md = "\t::: spoiler sample\ntext";
        assert!(spoiler_spans(md).is_empty());
    }

    #[test]
    fn test_three_space_indent_still_opens() {
        // Up to 3 spaces of indentation is ordinary block syntax
        let md = "   ::: spoiler hidden\nsecret\n   :::";
        assert_eq!(spoiler_spans(md).len(), 1);
    }

    #[test]
    fn test_stray_close_fence_ignored() {
        let md = ":::\ntext\n[link](https://example.com)";
        assert!(spoiler_spans(md).is_empty());
    }

    #[test]
    fn test_requires_spoiler_keyword() {
        // A generic container without the keyword is not a spoiler
        let md = "::: warning\ntext\n:::";
        assert!(spoiler_spans(md).is_empty());
    }

    #[test]
    fn test_keyword_is_case_sensitive() {
        // The plugin grammar wants lowercase `spoiler`
        let md = "::: Spoiler title\nhidden?\n:::";
        assert!(spoiler_spans(md).is_empty());
    }

    #[test]
    fn test_title_is_required() {
        let md = "::: spoiler\nhidden?\n:::";
        assert!(spoiler_spans(md).is_empty());
    }

    #[test]
    fn test_keyword_must_be_whole_word() {
        let md = "::: spoilers ahead\ntext\n:::";
        assert!(spoiler_spans(md).is_empty());
    }
}
