//! Performance benchmarks for rs-chapter-extract.
//!
//! Run with: `cargo bench`
//!
//! Benchmarks include:
//! - A small English chapter page on a generic host
//! - A Vietnamese chapter page on a profiled host (specialized extractor)
//! - Synthetic chapters of growing length for throughput

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rs_chapter_extract::{extract_html, Options};

const SAMPLE_HTML: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Chapter 12: The Silent Gate - Example Novels</title>
</head>
<body>
    <nav>
        <a href="/">Home</a>
        <a href="/novels">Novels</a>
    </nav>
    <div class="chapter-content">
        <h2>Chapter 12: The Silent Gate</h2>
        <p>The gate had not opened in three hundred years, yet tonight its hinges groaned
        as if a giant were leaning against the other side.</p>
        <p>"Stay behind me," Lin said, drawing the old sword her grandfather had left her.
        Its edge caught the moonlight and threw it back in a thin silver line.</p>
        <p>Wei did not answer. He was counting the runes carved into the stone, lips moving
        silently, the way he always did when he was afraid.</p>
        <p>When the last rune flared, the wind stopped. Every insect in the valley fell quiet,
        and the gate swung inward without a sound.</p>
    </div>
    <div class="chapter-nav">
        <a href="/novel/silent-gate/chapter-11" rel="prev">Previous Chapter</a>
        <a href="/novel/silent-gate/chapter-13" rel="next">Next Chapter</a>
    </div>
    <footer>
        <p>Copyright 2024</p>
    </footer>
</body>
</html>
"#;

const METRUYENCV_HTML: &str = r#"
<html>
<head><title>Chương 5: Vào núi - Metruyencv</title></head>
<body>
    <h1 class="txt-primary">Chương 5: Vào núi</h1>
    <div class="chapter-nav">
        <a href="/truyen/tien-lo/chuong-4">Chương trước</a>
        <a href="/truyen/tien-lo/chuong-6">Chương sau</a>
    </div>
    <div id="article" class="chapter-content">
        <div class="settings">Cấu hình Mục lục Đánh dấu</div>
        Chương 5: Vào núi
        <p>Sáng sớm, sương mù còn phủ kín sơn cốc, Lâm Phong đã khoác tay nải lên vai bước ra khỏi thôn.</p>
        <p>Con đường mòn dẫn lên núi quanh co, hai bên là rừng trúc xanh thẫm lay động trong gió lạnh.</p>
        <p>Hắn dừng lại bên bờ suối, vốc nước rửa mặt, ngẩng đầu nhìn đỉnh núi mờ ảo phía xa.</p>
        <p>Nghe nói trên đỉnh núi kia có một tòa đạo quán cổ, nơi từng có tiên nhân đắc đạo phi thăng.</p>
        Chấm điểm
    </div>
</body>
</html>
"#;

fn bench_generic_chapter(c: &mut Criterion) {
    let options = Options::default();
    c.bench_function("generic_chapter", |b| {
        b.iter(|| extract_html(black_box(SAMPLE_HTML), "https://example.com/novel/silent-gate/chapter-12", &options));
    });
}

fn bench_specialized_chapter(c: &mut Criterion) {
    let options = Options::default();
    c.bench_function("metruyencv_chapter", |b| {
        b.iter(|| {
            extract_html(
                black_box(METRUYENCV_HTML),
                "https://metruyencv.com/truyen/tien-lo/chuong-5",
                &options,
            )
        });
    });
}

fn synthetic_chapter(paragraphs: usize) -> String {
    let mut html = String::from("<html><head><title>Chapter 1</title></head><body><div class=\"menu\">Home | Login</div><article>");
    for i in 0..paragraphs {
        html.push_str(&format!(
            "<p>Paragraph {i}: the rain kept falling on the tiled roofs of the old capital while the lamps burned low.</p>"
        ));
    }
    html.push_str("</article><div class=\"comments\">Comments</div></body></html>");
    html
}

/// Throughput over chapters of growing length
fn bench_chapter_length(c: &mut Criterion) {
    let options = Options::default();
    let mut group = c.benchmark_group("chapter_length");

    for paragraphs in [10, 100, 1000] {
        let html = synthetic_chapter(paragraphs);
        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(paragraphs), &html, |b, html| {
            b.iter(|| extract_html(black_box(html), "https://example.com/chapter-1", &options));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generic_chapter, bench_specialized_chapter, bench_chapter_length);
criterion_main!(benches);
