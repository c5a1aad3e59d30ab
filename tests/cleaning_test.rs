#![allow(clippy::expect_used, clippy::unwrap_used)]

use rs_chapter_extract::cleaning::deep::minimal_strip;
use rs_chapter_extract::cleaning::vietnamese::strip_noise_phrases;
use rs_chapter_extract::cleaning::{clean_vietnamese, deep_clean, is_well_formed};
use rs_chapter_extract::line_filter::filter_lines;
use rs_chapter_extract::paragraphs::reconstruct;
use rs_chapter_extract::{CleaningTrace, Options};

const PROSE: &str = "Ánh trăng lạnh lẽo rọi xuống mặt hồ, gió đêm thổi qua khiến mặt nước gợn lên những vòng sóng nhỏ.";
const PROSE_EN: &str = "The caravan crossed the dunes at dawn, its bells ringing softly over the cold grey sand.";

fn deep(text: &str) -> String {
    deep_clean(text, &Options::default(), &mut CleaningTrace::new())
}

fn vietnamese(text: &str) -> String {
    clean_vietnamese(text, &Options::default(), &mut CleaningTrace::new())
}

#[test]
fn headings_survive_every_pass() {
    let heading = "Chương 42: Mục lục bí ẩn";
    let text = format!("{heading}\nCấu hình\n{PROSE}\nChương sau\n{PROSE}\n#FFF");
    let options = Options::default();
    let mut trace = CleaningTrace::new();

    let lines = filter_lines(&text, true, &options, &mut trace);
    assert!(lines.iter().any(|l| l == heading));

    let content = reconstruct(&lines, true, &options, &mut trace);
    let content = deep_clean(&content, &options, &mut trace);
    assert!(content.contains(heading));
    let content = clean_vietnamese(&content, &options, &mut trace);
    assert!(content.contains(heading));
    assert!(!content.contains("#FFF"));
}

#[test]
fn well_structured_input_only_loses_exact_labels_and_colors() {
    let para = format!("{PROSE} {PROSE}");
    let text = format!(
        "Chương 3: Đêm trăng\n\n{para}\n\nMục lục\n\n{para}\n\nMàu nền #f4f4f4\n\n{para}\n\nGhi chú (tác giả) @ [1]"
    );
    assert!(is_well_formed(&text));
    assert!(text.chars().count() > 600);

    let cleaned = deep(&text);
    assert!(!cleaned.contains("Mục lục"));
    assert!(!cleaned.contains("#f4f4f4"));
    // Symbol-heavy but not a label: kept in this mode
    assert!(cleaned.contains("Ghi chú (tác giả) @ [1]"));
    assert_eq!(cleaned.matches(PROSE).count(), 6);
}

#[test]
fn deep_clean_is_stable_on_its_output() {
    let text = format!(
        "Chapter 8\n{PROSE_EN}\nLogin\nMenu\n{PROSE_EN}\n<<>>\nClose\n{PROSE_EN}\nFont chữ\n{PROSE_EN}"
    );
    let once = deep(&text);
    let twice = deep(&once);
    let (a, b) = (once.chars().count() as f64, twice.chars().count() as f64);
    assert!((a - b).abs() <= a * 0.05);
}

#[test]
fn deep_revert_returns_fallback() {
    let mut text = String::new();
    for _ in 0..120 {
        text.push_str("[*] {@} <|>\n");
    }
    text.push_str("Font chữAvenir NextBookerly\n");
    let mut trace = CleaningTrace::new();
    let cleaned = deep_clean(&text, &Options::default(), &mut trace);

    assert!(trace.mentions("reverting"));
    let fallback = minimal_strip(&text);
    assert!(cleaned.chars().count() >= fallback.chars().count());
    assert!(!cleaned.contains("Avenir"));
}

#[test]
fn vietnamese_full_mode_regroups_paragraphs() {
    let text = format!(
        "Cài đặt đọc truyện\nMàu chữ\n{PROSE}\nĐề cử\nFont size\n{PROSE}\nĐánh dấu\n{PROSE}\nCanh giữa\n{PROSE}"
    );
    let cleaned = vietnamese(&text);
    assert_eq!(cleaned, [PROSE; 4].join("\n\n"));
}

#[test]
fn vietnamese_revert_strips_phrases_in_place() {
    let mut text = String::new();
    for _ in 0..80 {
        text.push_str("Tặng quà\nBáo cáo\nChấm điểm\n");
    }
    text.push_str("Hắn cười lớn Đề cử rồi quay người bỏ đi\n");
    let mut trace = CleaningTrace::new();
    let cleaned = clean_vietnamese(&text, &Options::default(), &mut trace);

    assert!(trace.mentions("reverting"));
    assert_eq!(cleaned, strip_noise_phrases(&text));
    assert!(cleaned.contains("Hắn cười lớn rồi quay người bỏ đi"));
}

#[test]
fn short_content_is_left_alone() {
    let text = "Cấu hình\nMục lục";
    assert_eq!(deep(text), text);
    assert_eq!(vietnamese(text), text);
}

#[test]
fn vietnamese_well_formed_drops_standalone_nav_and_rating() {
    let para = format!("{PROSE} {PROSE}");
    let text = format!(
        "Chương 3: Đêm trăng\n\n{para}\n\nChấm điểm\n\n{para}\n\nChương sau\n\n{para}\n\nĐề cử\n\n{para}"
    );
    assert!(is_well_formed(&text));

    let cleaned = vietnamese(&text);
    assert!(cleaned.starts_with("Chương 3: Đêm trăng"));
    assert!(!cleaned.contains("Chấm điểm"));
    assert!(!cleaned.contains("Chương sau"));
    assert!(!cleaned.contains("Đề cử"));
    assert_eq!(cleaned.matches(PROSE).count(), 8);
}
