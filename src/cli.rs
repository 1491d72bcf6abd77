// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// linkpeek has a single job, so there are no subcommands - just a struct
// with the input file and a few flags.
// =============================================================================

use std::path::PathBuf;

use clap::Parser;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "linkpeek",
    version = "0.1.0",
    about = "Extract a bounded list of safe outbound links from Markdown",
    long_about = "linkpeek parses Markdown comment text, skips spoiler sections, resolves \
                  relative links against a base origin, and prints up to four de-duplicated, \
                  safety-filtered links. Reads a file or stdin, prints a table or JSON."
)]
pub struct Cli {
    /// Markdown file to read (reads stdin when omitted)
    ///
    /// This is a positional argument; `linkpeek comment.md` or `cat x | linkpeek`
    pub file: Option<PathBuf>,

    /// Base origin used to resolve relative links (e.g. https://lemmy.world)
    ///
    /// Absolute links in the input don't need it; relative ones are resolved
    /// against this origin the way a browser would
    #[arg(long)]
    pub origin: String,

    /// Also collect image nodes, not just hyperlinks
    ///
    /// This is an optional flag: --include-images
    #[arg(long)]
    pub include_images: bool,

    /// Output results in JSON format instead of a table
    ///
    /// This is an optional flag: --json
    #[arg(long)]
    pub json: bool,
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Option<PathBuf> for the file?
//    - The positional argument is optional
//    - None means "no file given", and we fall back to reading stdin
//    - PathBuf is an owned filesystem path (like String, but for paths)
//
// 2. What are derive macros?
//    - #[derive(...)] automatically generates code for common operations
//    - Parser: generates CLI parsing logic
//    - Debug: generates code to print the struct for debugging
//
// 3. Where do --help texts come from?
//    - The /// doc comments on each field become the help output
//    - First line = short help, the rest = long help (--help)
// -----------------------------------------------------------------------------
