#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::cell::RefCell;
use std::time::Duration;

use rs_chapter_extract::{
    extract, extract_bytes, extract_html, extract_with_options, Error, FetchError, FetchRequest, FetchedPage,
    Options, PageFetcher, NO_CONTENT_TITLE,
};

const S1: &str = "The rain had not stopped for three days, and the river below the old mill was rising faster than anyone in the village could remember.";
const S2: &str = "Mei stood at the window with her grandmother's lantern, watching the water swallow the lowest steps of the stone bridge one by one.";
const S3: &str = "\"We should leave before nightfall,\" her brother said from the doorway, though he made no move to pick up the bundles at his feet.";
const S4: &str = "She did not answer him, because somewhere beyond the curtain of rain a bell had begun to ring, slow and steady, from the drowned temple.";

fn chapter_page() -> String {
    format!(
        r#"<html>
        <head><title>Chapter 3: Rain - Example Novels</title><script>var tracker = 1;</script></head>
        <body>
            <header><a href="/">Home</a> <a href="/login">Login</a></header>
            <nav><a href="/novels">Novels</a></nav>
            <div class="chapter-content">
                <h2>Chapter 3: Rain</h2>
                <p>{S1}</p>
                <p>{S2}</p>
                <p>{S3}</p>
                <p>{S4}</p>
            </div>
            <div class="chapter-nav">
                <a class="prev" href="/novel/rain/chapter-2">Previous</a>
                <a class="next" href="/novel/rain/chapter-4">Next</a>
            </div>
            <footer>Copyright 2024 Example Novels</footer>
        </body>
        </html>"#
    )
}

/// Serves one page and records every request it receives.
struct StubFetcher {
    html: String,
    final_url: Option<String>,
    reject_verified_tls: bool,
    requests: RefCell<Vec<FetchRequest>>,
}

impl StubFetcher {
    fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            final_url: None,
            reject_verified_tls: false,
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl PageFetcher for StubFetcher {
    fn fetch(&self, request: &FetchRequest) -> Result<FetchedPage, FetchError> {
        self.requests.borrow_mut().push(request.clone());
        if self.reject_verified_tls && request.verify_tls {
            return Err(FetchError::Tls("certificate has expired".into()));
        }
        Ok(FetchedPage {
            html: self.html.clone(),
            final_url: self.final_url.clone().unwrap_or_else(|| request.url.clone()),
        })
    }
}

struct FailingFetcher(fn() -> FetchError);

impl PageFetcher for FailingFetcher {
    fn fetch(&self, _request: &FetchRequest) -> Result<FetchedPage, FetchError> {
        Err((self.0)())
    }
}

#[test]
fn extracts_chapter_text_and_links() {
    let fetcher = StubFetcher::new(chapter_page());
    let result = extract("https://example.com/novel/rain/chapter-3", &fetcher).expect("extraction");

    assert_eq!(result.title, "Chapter 3: Rain");
    assert!(result.content.starts_with("Chapter 3: Rain"));
    for sentence in [S1, S2, S3, S4] {
        assert!(result.content.contains(sentence), "missing: {sentence}");
    }
    assert!(!result.content.contains("Copyright"));
    assert!(!result.content.contains("Novels"));
    assert!(!result.content.contains("tracker"));

    assert_eq!(
        result.navigation.previous.as_deref(),
        Some("https://example.com/novel/rain/chapter-2")
    );
    assert_eq!(result.navigation.next.as_deref(), Some("https://example.com/novel/rain/chapter-4"));
    assert!(!result.trace.is_empty());
}

#[test]
fn paragraphs_are_separated_by_blank_lines() {
    let result = extract_html(&chapter_page(), "https://example.com/c/3", &Options::default()).unwrap();
    let paragraphs: Vec<&str> = result.content.split("\n\n").collect();
    assert_eq!(paragraphs, vec!["Chapter 3: Rain", S1, S2, S3, S4]);
}

#[test]
fn invalid_url_is_rejected_before_fetching() {
    let fetcher = StubFetcher::new(chapter_page());
    let err = extract("not a url", &fetcher).unwrap_err();
    assert!(matches!(err, Error::InvalidUrl(_)));
    assert!(fetcher.requests.borrow().is_empty());

    let err = extract_html("<p>x</p>", "/relative/path", &Options::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidUrl(_)));
}

#[test]
fn fetch_errors_propagate() {
    let err = extract("https://example.com/c/1", &FailingFetcher(|| FetchError::Status(404))).unwrap_err();
    assert!(matches!(err, Error::Fetch(FetchError::Status(404))));

    let err = extract("https://example.com/c/1", &FailingFetcher(|| FetchError::Timeout("read".into()))).unwrap_err();
    assert!(matches!(err, Error::Fetch(FetchError::Timeout(_))));
}

#[test]
fn tls_failure_is_retried_once_without_verification() {
    let fetcher = StubFetcher {
        reject_verified_tls: true,
        ..StubFetcher::new(chapter_page())
    };
    let result = extract("https://example.com/novel/rain/chapter-3", &fetcher).expect("retry succeeds");

    let requests = fetcher.requests.borrow();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].verify_tls);
    assert!(!requests[1].verify_tls);
    assert!(result.trace.mentions("retrying once without verification"));
    assert!(result.content.contains(S1));
}

#[test]
fn persistent_tls_failure_is_terminal() {
    let err = extract("https://example.com/c/1", &FailingFetcher(|| FetchError::Tls("bad chain".into()))).unwrap_err();
    assert!(matches!(err, Error::Fetch(FetchError::Tls(_))));
}

#[test]
fn slow_host_gets_timeout_floor_and_unverified_tls() {
    let fetcher = StubFetcher::new(chapter_page());
    let options = Options {
        timeout: Duration::from_secs(5),
        ..Options::default()
    };
    extract_with_options("https://truyensextv.com/truyen/a/chuong-2", &fetcher, &options).unwrap();

    let requests = fetcher.requests.borrow();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].verify_tls);
    assert_eq!(requests[0].connect_timeout, Duration::from_secs(45));
    assert_eq!(requests[0].read_timeout, Duration::from_secs(30));
}

#[test]
fn generic_host_timeout_is_floored() {
    let fetcher = StubFetcher::new(chapter_page());
    let options = Options {
        timeout: Duration::from_secs(1),
        ..Options::default()
    };
    extract_with_options("https://example.com/c/1", &fetcher, &options).unwrap();

    let requests = fetcher.requests.borrow();
    assert!(requests[0].verify_tls);
    assert_eq!(requests[0].connect_timeout, Duration::from_secs(30));
}

#[test]
fn links_resolve_against_redirect_target() {
    let fetcher = StubFetcher {
        final_url: Some("https://mirror.example.org/novel/rain/chapter-3".to_string()),
        ..StubFetcher::new(chapter_page())
    };
    let result = extract("https://example.com/novel/rain/chapter-3", &fetcher).unwrap();
    assert_eq!(
        result.navigation.next.as_deref(),
        Some("https://mirror.example.org/novel/rain/chapter-4")
    );
}

#[test]
fn links_keep_non_default_port() {
    let result = extract_html(&chapter_page(), "http://localhost:8080/novel/rain/chapter-3", &Options::default()).unwrap();
    assert_eq!(
        result.navigation.previous.as_deref(),
        Some("http://localhost:8080/novel/rain/chapter-2")
    );
    assert_eq!(result.navigation.next.as_deref(), Some("http://localhost:8080/novel/rain/chapter-4"));
}

#[test]
fn empty_page_yields_sentinel_without_links() {
    let html = r#"<html><body>
        <p>Too short.</p>
        <a class="next" href="/c/2">Next</a>
    </body></html>"#;
    let result = extract_html(html, "https://example.com/c/1", &Options::default()).unwrap();

    assert!(result.is_empty());
    assert_eq!(result.title, NO_CONTENT_TITLE);
    assert_eq!(result.navigation.previous, None);
    assert_eq!(result.navigation.next, None);
}

#[test]
fn bytes_are_transcoded_before_extraction() {
    let page = chapter_page().replace("Mei", "Ren\u{e9}e");
    let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(&page);
    let result = extract_bytes(
        &bytes,
        Some("text/html; charset=windows-1252"),
        "https://example.com/c/3",
        &Options::default(),
    )
    .unwrap();
    assert!(result.content.contains("Ren\u{e9}e stood at the window"));
}

#[test]
fn result_serializes_to_json() {
    let result = extract_html(&chapter_page(), "https://example.com/c/3", &Options::default()).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["title"], "Chapter 3: Rain");
    assert_eq!(json["navigation"]["next"], "https://example.com/novel/rain/chapter-4");
}
