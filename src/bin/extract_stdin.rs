//! Simple CLI that reads HTML from stdin and outputs JSON to stdout.
//!
//! Usage: `extract_stdin <page-url> < page.html`
//!
//! The URL selects the site profile and resolves relative chapter links.

use rs_chapter_extract::{extract_bytes, Options};
use serde::Serialize;
use std::io::{self, Read};

#[derive(Serialize)]
struct Output {
    title: String,
    content: String,
    previous: Option<String>,
    next: Option<String>,
    elapsed_ms: u128,
    trace: Vec<String>,
}

fn main() {
    let Some(url) = std::env::args().nth(1) else {
        eprintln!("Usage: extract_stdin <page-url> < page.html");
        std::process::exit(2);
    };

    // Read raw bytes so non UTF-8 pages can be transcoded
    let mut html = Vec::new();
    if io::stdin().read_to_end(&mut html).is_err() {
        eprintln!("Failed to read from stdin");
        std::process::exit(1);
    }

    let result = match extract_bytes(&html, None, &url, &Options::default()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let output = Output {
        title: result.title,
        content: result.content,
        previous: result.navigation.previous,
        next: result.navigation.next,
        elapsed_ms: result.elapsed.as_millis(),
        trace: result.trace.entries().to_vec(),
    };

    println!("{}", serde_json::to_string(&output).unwrap_or_default());
}
