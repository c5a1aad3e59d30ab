//! Fetches a chapter page over HTTP and prints the extraction as JSON.
//!
//! Usage: `fetch_chapter <url> [timeout-secs]`
//!
//! Set `RUST_LOG=rs_chapter_extract=debug` to follow the pipeline's
//! decisions on stderr.

use std::process::ExitCode;
use std::time::Duration;

use rs_chapter_extract::{extract_with_options, HttpFetcher, Options};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(url) = args.next() else {
        eprintln!("Usage: fetch_chapter <url> [timeout-secs]");
        return ExitCode::from(2);
    };

    let mut options = Options::default();
    if let Some(secs) = args.next() {
        match secs.parse::<u64>() {
            Ok(secs) => options.timeout = Duration::from_secs(secs),
            Err(_) => {
                eprintln!("Invalid timeout: {secs}");
                return ExitCode::from(2);
            }
        }
    }

    match extract_with_options(&url, &HttpFetcher::new(), &options) {
        Ok(result) => match serde_json::to_string_pretty(&result) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to serialize result: {e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            tracing::error!(url = %url, error = %e, "extraction failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
