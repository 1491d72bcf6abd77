// src/markdown/tree.rs
// =============================================================================
// This module turns Markdown source into an explicit syntax tree.
//
// We use the `pulldown-cmark` crate which:
// - Parses Markdown into a stream of events (Start/End/Text/...)
// - Follows the CommonMark specification
// - Degrades gracefully: unparseable spans become literal text
//
// pulldown-cmark is a streaming parser, but the extractor wants a tree it can
// walk with an explicit prune decision per node. So we rebuild the tree here:
// Start events push a node onto a stack, End events pop it and attach it to
// its parent, leaves attach directly.
//
// Spoilers are the twist. The parser doesn't know the `::: spoiler` container
// syntax, so we pre-scan the source for spoiler byte spans (see spoiler.rs)
// and use the parser's offset iterator to route every event that falls inside
// a span into a Spoiler node. The extractor then sees spoilers as ordinary
// subtrees it can refuse to enter.
// =============================================================================

use pulldown_cmark::{Event, Options, Parser, Tag};

use super::spoiler::spoiler_spans;

// The node kinds the extractor cares about. Everything that is neither a
// link, an image, a text leaf, nor a spoiler collapses into Block - the
// extractor only needs those containers for their children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document root
    Root,
    /// A collapsible/spoiler container; its children are hidden by default
    Spoiler,
    /// A hyperlink with its raw (unresolved) destination
    Link { url: String },
    /// An image with its raw (unresolved) source
    Image { url: String },
    /// A plain text leaf
    Text(String),
    /// Any other container (paragraph, heading, list, blockquote, ...)
    Block,
}

/// One node of the rebuilt syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            children: Vec::new(),
        }
    }
}

// A stack entry during tree construction.
//
// `spoiler_end` is Some for Spoiler frames and holds the byte offset where
// the spoiler span ends, so we know when to close it again.
struct Frame {
    node: Node,
    spoiler_end: Option<usize>,
}

impl Frame {
    fn new(kind: NodeKind) -> Self {
        Frame {
            node: Node::new(kind),
            spoiler_end: None,
        }
    }

    fn spoiler(end: usize) -> Self {
        Frame {
            node: Node::new(NodeKind::Spoiler),
            spoiler_end: Some(end),
        }
    }
}

// Parses Markdown into a tree rooted at a Root node.
//
// GFM extensions are enabled (tables, strikethrough, task lists, footnotes)
// because comment text in the wild uses them; their nodes all map to Block.
pub fn parse_tree(markdown: &str) -> Node {
    let spans = spoiler_spans(markdown);

    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let parser = Parser::new_ext(markdown, options);

    // Stack of open nodes; the bottom is the document root and is never
    // popped by an End event (Start/End events are balanced)
    let mut stack: Vec<Frame> = vec![Frame::new(NodeKind::Root)];

    // Index of the first spoiler span that hasn't ended yet
    let mut span_idx = 0;

    // Number of currently open Spoiler frames (0 or 1: spans are outermost)
    let mut open_spoilers: usize = 0;

    for (event, range) in parser.into_offset_iter() {
        // Close any spoiler frame whose span ended before this event.
        // Only the top of the stack can be a finished spoiler: blocks opened
        // inside a span always end at or before the span's closing fence.
        loop {
            let finished = matches!(
                stack.last().and_then(|frame| frame.spoiler_end),
                Some(end) if range.start >= end
            );
            if !finished {
                break;
            }
            close_top(&mut stack, &mut open_spoilers);
        }

        // Skip past spans that are entirely behind us
        while span_idx < spans.len() && spans[span_idx].end <= range.start {
            span_idx += 1;
        }

        // Open a spoiler frame when this event lies fully inside the current
        // span and no spoiler is open yet. An event that merely starts inside
        // but runs past the span's end (a block whose lazy continuation lines
        // follow the closing fence) is not routed in as a whole; its child
        // events inside the span will open the frame instead. End events are
        // excluded: their range starts back at their block's opening offset.
        let is_end = matches!(&event, Event::End(_));
        if !is_end
            && open_spoilers == 0
            && span_idx < spans.len()
            && range.start >= spans[span_idx].start
            && range.end <= spans[span_idx].end
        {
            stack.push(Frame::spoiler(spans[span_idx].end));
            open_spoilers += 1;
        }

        match event {
            Event::Start(tag) => {
                stack.push(Frame::new(kind_for_tag(tag)));
            }
            Event::End(_) => {
                // Pop until we've popped the frame this End matches. Spoiler
                // frames opened after it (mid-block fences) close first.
                loop {
                    let Some(frame) = stack.pop() else { break };
                    let was_spoiler = frame.spoiler_end.is_some();
                    if was_spoiler {
                        open_spoilers -= 1;
                    }
                    attach(&mut stack, frame.node);
                    if !was_spoiler {
                        break;
                    }
                }
            }
            Event::Text(text) => {
                attach(&mut stack, Node::new(NodeKind::Text(text.to_string())));
            }
            Event::Code(text) => {
                // Inline code inside link text still counts as display text
                attach(&mut stack, Node::new(NodeKind::Text(text.to_string())));
            }
            // Breaks, rules, raw HTML, footnote refs and task markers carry
            // no link information
            _ => {}
        }
    }

    // Close anything still open (e.g. a spoiler that runs to end of input)
    while stack.len() > 1 {
        close_top(&mut stack, &mut open_spoilers);
    }

    match stack.pop() {
        Some(frame) => frame.node,
        None => Node::new(NodeKind::Root),
    }
}

// Pops the top frame and attaches its node to the new top.
fn close_top(stack: &mut Vec<Frame>, open_spoilers: &mut usize) {
    let Some(frame) = stack.pop() else { return };
    if frame.spoiler_end.is_some() {
        *open_spoilers -= 1;
    }
    attach(stack, frame.node);
}

fn attach(stack: &mut [Frame], node: Node) {
    if let Some(parent) = stack.last_mut() {
        parent.node.children.push(node);
    }
}

fn kind_for_tag(tag: Tag<'_>) -> NodeKind {
    match tag {
        Tag::Link(_link_type, dest_url, _title) => NodeKind::Link {
            url: dest_url.to_string(),
        },
        Tag::Image(_link_type, dest_url, _title) => NodeKind::Image {
            url: dest_url.to_string(),
        },
        _ => NodeKind::Block,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Walks the whole tree (spoilers included) collecting link URLs
    fn all_link_urls(node: &Node) -> Vec<String> {
        let mut urls = Vec::new();
        if let NodeKind::Link { url } = &node.kind {
            urls.push(url.clone());
        }
        for child in &node.children {
            urls.extend(all_link_urls(child));
        }
        urls
    }

    fn find_spoiler(node: &Node) -> Option<&Node> {
        if node.kind == NodeKind::Spoiler {
            return Some(node);
        }
        node.children.iter().find_map(find_spoiler)
    }

    #[test]
    fn test_link_node_with_text_child() {
        let tree = parse_tree("see [Rust](https://www.rust-lang.org)");
        let urls = all_link_urls(&tree);
        assert_eq!(urls, vec!["https://www.rust-lang.org"]);

        // paragraph -> [text, link(text)]
        let paragraph = &tree.children[0];
        let link = paragraph
            .children
            .iter()
            .find(|n| matches!(n.kind, NodeKind::Link { .. }))
            .unwrap();
        assert_eq!(link.children[0].kind, NodeKind::Text("Rust".to_string()));
    }

    #[test]
    fn test_image_node() {
        let tree = parse_tree("![alt text](https://example.com/cat.png)");
        let paragraph = &tree.children[0];
        assert!(paragraph.children.iter().any(|n| matches!(
            &n.kind,
            NodeKind::Image { url } if url == "https://example.com/cat.png"
        )));
    }

    #[test]
    fn test_spoiler_content_lands_under_spoiler_node() {
        let md = "::: spoiler hidden\n[secret](https://x.com/s)\n:::\n\n[visible](https://x.com/v)";
        let tree = parse_tree(md);

        let spoiler = find_spoiler(&tree).expect("spoiler node present");
        assert_eq!(all_link_urls(spoiler), vec!["https://x.com/s"]);

        // The visible link is outside the spoiler subtree
        let urls = all_link_urls(&tree);
        assert!(urls.contains(&"https://x.com/v".to_string()));
    }

    #[test]
    fn test_multi_paragraph_spoiler() {
        let md = "::: spoiler hidden\nfirst\n\n[secret](https://x.com/s)\n\n:::\n\nafter";
        let tree = parse_tree(md);
        let spoiler = find_spoiler(&tree).expect("spoiler node present");
        assert_eq!(all_link_urls(spoiler), vec!["https://x.com/s"]);
    }

    #[test]
    fn test_no_spoiler_node_without_fences() {
        let tree = parse_tree("plain [a](https://x.com/1) text");
        assert!(find_spoiler(&tree).is_none());
    }

    #[test]
    fn test_unclosed_spoiler_swallows_rest_of_document() {
        let md = "::: spoiler oops\n[secret](https://x.com/s)\n\n[also hidden](https://x.com/t)";
        let tree = parse_tree(md);
        let spoiler = find_spoiler(&tree).expect("spoiler node present");
        assert_eq!(
            all_link_urls(spoiler),
            vec!["https://x.com/s", "https://x.com/t"]
        );
    }

    #[test]
    fn test_gfm_table_does_not_break_tree() {
        let md = "| a | b |\n|---|---|\n| [x](https://x.com/1) | y |";
        let tree = parse_tree(md);
        assert_eq!(all_link_urls(&tree), vec!["https://x.com/1"]);
    }
}
