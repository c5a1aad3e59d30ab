//! Specialized Site Extractor
//!
//! metruyencv.com renders its settings panel, lock notice and rating bar
//! inside the chapter container, where density heuristics cannot tell them
//! apart from the text. This extractor locates the container directly,
//! slices the text between the chapter title and the first footer phrase,
//! and filters the remaining lines against the host's UI vocabulary.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

use crate::dom::{self, char_len, Document, Selection};
use crate::patterns::{special_char_count, CHAPTER_TITLE_LINE, HEX_COLOR, LINE_SPECIAL_CHARS};
use crate::result::CleaningTrace;

/// Containers tried in order.
const CONTAINER_SELECTORS: &[&str] = &["#article.chapter-content", ".nh-read__content", ".chapter-c", "article.chapter"];

/// Candidates inside `<main>` when no known container exists.
const MAIN_CANDIDATES: &str = ".content, .chapter-content, .chapter, article";

/// UI sub-elements removed from the container before reading its text.
const UI_ELEMENTS: &str = ".chapter-nav, .chapter-header, .chapter-footer, .ads, .ad-container, .js-button, \
    .button, .btn, .config-panel, .navigate, .nav, .setting, .rating, .comment, .comment-section, .lock-content, \
    div[id^=\"ads-\"], div[class*=\"rating\"], div[class*=\"config\"], div[class*=\"setting\"], \
    div[class*=\"navigate\"], div[class*=\"header\"], div[class*=\"footer\"], div[class*=\"button\"]";

/// Phrases that start the footer after the chapter text.
const END_MARKERS: &[&str] = &[
    "Vui lòng đăng nhập",
    "Chương Bị Khóa",
    "Chương trước",
    "Chấm điểm",
    "Tặng quà",
    "Báo cáo",
    "Đề cử",
    "Chương sau",
];

/// A line containing one of these (any case) is UI.
const UI_SUBSTRINGS: &[&str] = &[
    "Cấu hình",
    "Mục lục",
    "Đánh dấu",
    "Cài đặt đọc truyện",
    "Close",
    "Màu nền",
    "Màu chữ",
    "Font chữ",
    "Cỡ chữ",
    "Chiều cao dòng",
    "Canh chữ",
    "Mặc định",
    "CấuhìnhMụclụcĐánhdấuCàiđặtđọctruyệnClose",
    "MàunềnMàuchữFontchữCỡchữChiềucaodòngCanhchữ",
    "chữđượctrìnhbàytrênmộtcột",
];

/// Settings-panel renderings matched verbatim.
const PANEL_RUNS: &[&str] = &[
    "Cấu hìnhMục lụcĐánh dấuCài đặt đọc truyệnClose",
    "CấuhìnhMụclụcĐánhdấuCàiđặtđọctruyệnClose",
    "Màu nền [ngày]#F8FAFC#f4f4f4#e9ebee#d5d8dc#f4f4e4#f5ebcd#eae4d3#f2f2f2#c2b49b#272729#232323#1e293b",
    "Màu chữ [ngày]Màu nền [đêm]#F8FAFC#f4f4f4#e9ebee#d5d8dc#f4f4e4#f5ebcd#eae4d3#f2f2f2#c2b49b#272729#232323#1e293bMàu chữ [đêm]",
    "Font chữAvenir NextBookerlySegoe UILiterataBaskervilleArialCourier NewTahomaPalatino LinotypeGeorgiaVerdanaTimes New RomanSource Sans Pro",
    "Cỡ chữChiều cao dòngCanh chữCanh tráiCanh đềuCanh giữaCanh phảiMặc định",
];

/// Fragments of settings labels; very short lines holding one are UI.
const SHORT_UI_WORDS: &[&str] = &["cấu", "hình", "màu", "font", "chữ", "nền", "đóng", "close"];

/// Shorter variant of [`SHORT_UI_WORDS`] used by the raw-text fallback.
const RAW_UI_WORDS: &[&str] = &["cấu", "hình", "màu", "font", "chữ"];

/// Labels that disqualify a `<p>` in the paragraph fallback.
const PARAGRAPH_UI_LABELS: &[&str] = &["cấu hình", "mục lục", "đánh dấu", "cài đặt", "màu nền", "màu chữ"];

/// Settings-panel blocks cut out of raw text in the last fallback.
static PANEL_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        Regex::new(r"(?is)Cấu\s*hình.*?Mặc\s*định").expect("config panel regex"),
        Regex::new(r"(?is)Màu\s*nền.*?#[A-Fa-f0-9]{3,6}.*?#[A-Fa-f0-9]{3,6}").expect("palette regex"),
        Regex::new(r"(?is)Font\s*chữ.*?Source\s*Sans\s*Pro").expect("font list regex"),
        Regex::new(r"(?is)Vui\s*lòng\s*đăng\s*nhập.*?Chương\s*sau").expect("login notice regex"),
    ]
});

/// Lines must be longer than this before content is considered started.
const CONTENT_START_MIN_CHARS: usize = 30;
/// Lines shorter than this are checked against [`SHORT_UI_WORDS`].
const SHORT_UI_LINE_CHARS: usize = 10;
/// Lines with more special characters than this are UI.
const MAX_SPECIAL_CHARS: usize = 5;
/// Paragraph and `<main>` fallbacks keep lines longer than this.
const MIN_FALLBACK_LINE_CHARS: usize = 20;
/// The regex fallback drops UI-word lines shorter than this.
const REGEX_FALLBACK_SHORT_LINE: usize = 20;

/// Output of the specialized extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecializedExtraction {
    /// Title from the page, if one was found.
    pub title: Option<String>,
    /// Extracted chapter text, paragraphs separated by a blank line.
    pub content: String,
}

/// Locates the chapter container.
pub type ContainerStrategy = for<'a> fn(&'a Document) -> Option<Selection<'a>>;

/// Produces content from a stripped container and its text.
pub type ContentStrategy = fn(&Selection, &str, &mut CleaningTrace) -> Option<String>;

/// Container strategies in order.
pub static CONTAINER_STRATEGIES: &[ContainerStrategy] = &[known_container, largest_main_candidate];

/// Content strategies in order.
pub static CONTENT_STRATEGIES: &[ContentStrategy] = &[title_sliced, paragraph_elements, panel_stripped];

/// Runs the specialized extractor.
///
/// Returns `None` when no strategy produced any text. Removes UI elements
/// from the located container.
#[must_use]
pub fn extract_specialized(doc: &Document, trace: &mut CleaningTrace) -> Option<SpecializedExtraction> {
    trace.push("Using specialized metruyencv extractor");
    let title = chapter_page_title(doc);

    let Some(container) = CONTAINER_STRATEGIES.iter().find_map(|strategy| strategy(doc)) else {
        trace.push("Could not find content container, trying <main> text");
        let content = main_text(doc, trace)?;
        return Some(SpecializedExtraction { title, content });
    };

    let removed = dom::remove_matching(&container, UI_ELEMENTS);
    trace.push(format!("Removed {removed} UI element(s) from the chapter container"));

    let raw_text = dom::stripped_lines(&dom::block_text(&container));
    let content = CONTENT_STRATEGIES
        .iter()
        .find_map(|strategy| strategy(&container, &raw_text, trace))?;

    Some(SpecializedExtraction { title, content })
}

/// Title from `h1.txt-primary`, else the page `<title>` before " - ".
#[must_use]
pub fn chapter_page_title(doc: &Document) -> Option<String> {
    let heading = doc.select("h1.txt-primary");
    if heading.exists() {
        let text = heading.text().trim().to_string();
        if !text.is_empty() {
            return Some(text);
        }
    }
    dom::page_title(doc)
}

/// First element matched by the known container selectors.
pub fn known_container(doc: &Document) -> Option<Selection<'_>> {
    CONTAINER_SELECTORS.iter().find_map(|selector| {
        doc.select(selector)
            .nodes()
            .first()
            .map(|node| Selection::from(*node))
    })
}

/// The candidate inside `<main>` with the most text.
pub fn largest_main_candidate(doc: &Document) -> Option<Selection<'_>> {
    let mut best: Option<(usize, Selection)> = None;
    for node in doc.select("main").select(MAIN_CANDIDATES).nodes() {
        let sel = Selection::from(*node);
        let len = char_len(sel.text().trim());
        if len > 0 && best.as_ref().is_none_or(|(n, _)| len > *n) {
            best = Some((len, sel));
        }
    }
    best.map(|(_, sel)| sel)
}

/// Whole `<main>` text after the chapter title, lines over 20 characters.
fn main_text(doc: &Document, trace: &mut CleaningTrace) -> Option<String> {
    let main = doc.select("main");
    if !main.exists() {
        return None;
    }
    let raw = dom::stripped_lines(&dom::block_text(&main));
    let found = CHAPTER_TITLE_LINE.find(&raw)?;
    let chapter_title = found.as_str().trim();

    let paragraphs: Vec<&str> = raw[found.end()..]
        .lines()
        .map(str::trim)
        .filter(|l| char_len(l) > MIN_FALLBACK_LINE_CHARS)
        .collect();
    if paragraphs.is_empty() {
        return None;
    }
    trace.push(format!("Extracted chapter \"{chapter_title}\" from <main> text"));
    Some(format!("{chapter_title}\n\n{}", paragraphs.join("\n\n")))
}

/// Whether a line of container text is UI rather than story.
fn is_ui_line(line: &str) -> bool {
    let lowered = line.to_lowercase();
    if UI_SUBSTRINGS.iter().any(|ui| lowered.contains(&ui.to_lowercase())) {
        return true;
    }
    if PANEL_RUNS.iter().any(|run| line.contains(run)) {
        return true;
    }
    if HEX_COLOR.is_match(line) || special_char_count(line, LINE_SPECIAL_CHARS) > MAX_SPECIAL_CHARS {
        return true;
    }
    char_len(line) < SHORT_UI_LINE_CHARS && SHORT_UI_WORDS.iter().any(|w| lowered.contains(w))
}

/// Text between the chapter title and the first footer phrase, filtered.
pub fn title_sliced(_container: &Selection, raw_text: &str, trace: &mut CleaningTrace) -> Option<String> {
    let found = CHAPTER_TITLE_LINE.find(raw_text)?;
    let chapter_title = found.as_str().trim();
    trace.push(format!("Found chapter title: {chapter_title}"));

    let start = found.end();
    let end = END_MARKERS
        .iter()
        .filter_map(|marker| raw_text[start..].find(marker).map(|i| start + i))
        .min()
        .unwrap_or(raw_text.len());

    let mut started = false;
    let mut lines = Vec::new();
    for line in raw_text[start..end].lines().map(str::trim).filter(|l| !l.is_empty()) {
        if is_ui_line(line) {
            continue;
        }
        if !started && char_len(line) > CONTENT_START_MIN_CHARS {
            started = true;
        }
        if started {
            lines.push(line);
        }
    }

    if lines.is_empty() {
        return None;
    }
    Some(format!("{chapter_title}\n\n{}", lines.join("\n\n")))
}

/// Raw `<p>` text, skipping short and settings paragraphs.
pub fn paragraph_elements(container: &Selection, _raw_text: &str, trace: &mut CleaningTrace) -> Option<String> {
    let paragraphs: Vec<String> = container
        .select("p")
        .nodes()
        .iter()
        .map(|node| node.text().trim().to_string())
        .filter(|text| char_len(text) > MIN_FALLBACK_LINE_CHARS)
        .filter(|text| {
            let lowered = text.to_lowercase();
            !PARAGRAPH_UI_LABELS.iter().any(|ui| lowered.contains(ui))
        })
        .collect();

    if paragraphs.is_empty() {
        return None;
    }
    trace.push(format!("No chapter title found, using {} <p> element(s)", paragraphs.len()));
    Some(paragraphs.join("\n\n"))
}

/// Raw text with known settings-panel blocks cut out.
pub fn panel_stripped(_container: &Selection, raw_text: &str, trace: &mut CleaningTrace) -> Option<String> {
    let mut text = raw_text.to_string();
    for pattern in PANEL_PATTERNS.iter() {
        text = pattern.replace_all(&text, "").into_owned();
    }

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter(|l| {
            let lowered = l.to_lowercase();
            !(char_len(l) < REGEX_FALLBACK_SHORT_LINE && RAW_UI_WORDS.iter().any(|w| lowered.contains(w)))
        })
        .collect();

    if lines.is_empty() {
        return None;
    }
    trace.push("Falling back to raw container text with panel blocks removed");
    Some(lines.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROSE: &str = "Trời vừa hửng sáng, Lâm Phong đã rời khỏi khách điếm, men theo con đường đá xanh.";

    #[test]
    fn test_title_prefers_heading() {
        let doc = dom::parse("<html><head><title>Trang - Site</title></head><body><h1 class='txt-primary'> Truyện A </h1></body></html>");
        assert_eq!(chapter_page_title(&doc).as_deref(), Some("Truyện A"));

        let doc = dom::parse("<html><head><title>Trang - Site</title></head><body></body></html>");
        assert_eq!(chapter_page_title(&doc).as_deref(), Some("Trang"));
    }

    #[test]
    fn test_slices_between_title_and_footer() {
        let html = format!(
            r#"<div id="article" class="chapter-content">
                <div class="config-panel">Cấu hìnhMục lụcĐánh dấuCài đặt đọc truyệnClose</div>
                <div>Chương 12: Gặp lại</div>
                <div>Màu nền [ngày]#F8FAFC#f4f4f4</div>
                <div>Ngắn</div>
                <div>{PROSE}</div>
                <div>Ừ.</div>
                <div>{PROSE}</div>
                <div>Chương sau</div>
                <div>{PROSE} phần thừa</div>
            </div>"#
        );
        let doc = dom::parse(&html);
        let mut trace = CleaningTrace::new();
        let out = extract_specialized(&doc, &mut trace).expect("content");

        assert_eq!(out.content, format!("Chương 12: Gặp lại\n\n{PROSE}\n\nỪ.\n\n{PROSE}"));
        assert!(trace.mentions("Chương 12"));
    }

    #[test]
    fn test_paragraph_fallback_without_title() {
        let html = format!(
            r#"<div class="nh-read__content"><p>Cài đặt màu nền cho trang đọc</p><p>{PROSE}</p><p>ngắn</p></div>"#
        );
        let doc = dom::parse(&html);
        let out = extract_specialized(&doc, &mut CleaningTrace::new()).expect("content");
        assert_eq!(out.content, PROSE);
    }

    #[test]
    fn test_main_candidates_pick_largest() {
        let html = format!(
            r#"<main><div class="content">short text here</div><article>{PROSE} {PROSE}</article></main>"#
        );
        let doc = dom::parse(&html);
        let container = largest_main_candidate(&doc).expect("candidate");
        assert_eq!(dom::tag_name(&container).as_deref(), Some("article"));
    }

    #[test]
    fn test_main_text_fallback() {
        let html = format!("<main><span>Menu</span><h2>Chương 3: Xuống núi</h2><p>{PROSE}</p><p>ok</p></main>");
        let doc = dom::parse(&html);
        let out = extract_specialized(&doc, &mut CleaningTrace::new()).expect("content");
        // <main> holds no known container and no candidate class
        assert_eq!(out.content, format!("Chương 3: Xuống núi\n\n{PROSE}"));
    }

    #[test]
    fn test_panel_patterns_removed() {
        let raw = format!("Cấu hình\nMục lục\nMặc định\n{PROSE}\nVui lòng đăng nhập để đọc\nChương sau");
        let doc = dom::parse("<div></div>");
        let sel = doc.select("div");
        let out = panel_stripped(&sel, &raw, &mut CleaningTrace::new()).expect("content");
        assert_eq!(out, PROSE);
    }

    #[test]
    fn test_nothing_found() {
        let doc = dom::parse("<div>plain page</div>");
        assert!(extract_specialized(&doc, &mut CleaningTrace::new()).is_none());
    }
}
