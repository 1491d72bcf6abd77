// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Read the Markdown input (file or stdin)
// 3. Run the extractor from the library crate
// 4. Print the results (table or JSON)
// 5. Exit with proper code (0 = success, 2 = error)
//
// Everything interesting lives in the library (src/lib.rs); this binary is
// just I/O glue around the pure extract_links() function.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing

// Import items we need
use std::io::Read;
use std::path::Path;

use clap::Parser; // Parser trait enables the parse() method
use cli::Cli;

// anyhow::Result is like std::result::Result but simpler for applications
// It lets us return any error type with the ? operator
use anyhow::{Context, Result};

use linkpeek::{extract_links, ExtractedLink, LinkKind};

fn main() {
    // Run our application logic and capture the exit code
    // std::process::exit() terminates the program with the given code
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = extraction succeeded (an empty result is still a success)
//   Err = could not read input or analyze the text
fn run() -> Result<i32> {
    // Parse command-line arguments into our Cli struct
    // This will automatically handle --help, --version, etc.
    let cli = Cli::parse();

    let markdown = read_input(cli.file.as_deref())?;

    // The extractor is a pure function: same inputs, same output
    let links = extract_links(&markdown, &cli.origin, cli.include_images)
        .context("could not analyze the Markdown input")?;

    print_results(&links, cli.json)?;

    Ok(0)
}

// Reads the Markdown input from a file, or from stdin when no file is given
fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("could not read stdin")?;
            Ok(buffer)
        }
    }
}

// Prints the results either as a table or JSON
// Parameters:
//   links: slice of ExtractedLink structs
//   json: whether to output JSON format
fn print_results(links: &[ExtractedLink], json: bool) -> Result<()> {
    if json {
        // Serialize results to JSON and print
        // JSON mode always prints, even when empty, so pipelines can rely
        // on the output being valid JSON
        let json_output = serde_json::to_string_pretty(links)?;
        println!("{}", json_output);
    } else if links.is_empty() {
        // A legitimate outcome, not an error
        println!("✅ No links to show");
    } else {
        // Print human-readable table
        print_table(links);
    }
    Ok(())
}

// Prints results as a human-readable table in the terminal
fn print_table(links: &[ExtractedLink]) {
    // Print table header
    println!("{:<8} {:<60} {:<30}", "TYPE", "URL", "TEXT");
    println!("{}", "=".repeat(100));

    // Print each link
    for link in links {
        let kind_display = match link.kind {
            LinkKind::Link => "🔗 link",
            LinkKind::Image => "🖼 image",
        };
        let text = link.text.as_deref().unwrap_or("");

        // Truncate URL if too long for display
        let url_display = if link.url.len() > 57 {
            format!("{}...", &link.url[..57])
        } else {
            link.url.clone()
        };

        println!("{:<8} {:<60} {:<30}", kind_display, url_display, text);
    }

    println!();

    // Print summary
    let image_count = links
        .iter()
        .filter(|l| matches!(l.kind, LinkKind::Image))
        .count();
    let link_count = links.len() - image_count;

    println!("📊 Summary:");
    println!("   🔗 Links: {}", link_count);
    println!("   🖼 Images: {}", image_count);
    println!("   📋 Total: {}", links.len());
}
