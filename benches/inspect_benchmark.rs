//! Benchmarks for pdfscope page inspection.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic PDFs whose pages carry a text table.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pdfscope::{BoundingBox, MarkdownTableOptions, TableGrid};

/// Creates a synthetic PDF with one page holding a `rows` x 4 table.
fn create_table_pdf(rows: usize) -> Vec<u8> {
    let mut stream = String::from("BT /F1 18 Tf 72 750 Td (Benchmark Report) Tj ET\n");
    for row in 0..rows {
        let y = 700 - (row as i32) * 14;
        for (col, x) in [72, 180, 290, 400].iter().enumerate() {
            stream.push_str(&format!(
                "BT /F1 10 Tf {} {} Td (r{}c{}) Tj ET\n",
                x, y, row, col
            ));
        }
    }

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        format!(
            "<< /Length {} >>\nstream\n{}endstream",
            stream.len(),
            stream
        ),
    ];

    let mut content = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(content.len());
        content.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }

    let xref_offset = content.len();
    content.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    content.push_str("0000000000 65535 f \n");
    for offset in offsets {
        content.push_str(&format!("{:010} 00000 n \n", offset));
    }
    content.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));

    content.into_bytes()
}

/// Benchmark header detection.
fn bench_header_detection(c: &mut Criterion) {
    let pdf_data = create_table_pdf(1);
    let non_pdf_data = b"Not a PDF file at all, just random text content";

    c.bench_function("detect_valid_pdf", |b| {
        b.iter(|| pdfscope::detect_header(black_box(&pdf_data)).unwrap());
    });

    c.bench_function("detect_non_pdf", |b| {
        b.iter(|| pdfscope::detect_header(black_box(non_pdf_data)).is_err());
    });
}

/// Benchmark the whole-page inventory at various table sizes.
fn bench_analyze_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_page");

    for rows in [5, 20, 40].iter() {
        let data = create_table_pdf(*rows);

        group.bench_function(format!("{}_rows", rows), |b| {
            b.iter(|| {
                let options = pdfscope::InspectOptions::default().lenient();
                let _ = pdfscope::analyze_page_with_options(black_box(&data), 0, &options);
            });
        });
    }

    group.finish();
}

/// Benchmark clip extraction on an already opened document.
fn bench_extract_table(c: &mut Criterion) {
    let data = create_table_pdf(20);
    let Ok(inspection) = pdfscope::Inspector::new().lenient().open(&data) else {
        return;
    };
    let clip = BoundingBox::new(60.0, 80.0, 500.0, 400.0);

    c.bench_function("extract_table_20_rows", |b| {
        b.iter(|| {
            let _ = inspection.extract_table(0, black_box(&clip));
        });
    });
}

/// Benchmark markdown rendering of a wide grid.
fn bench_markdown(c: &mut Criterion) {
    let grid = TableGrid::from_strings((0..100).map(|r| {
        (0..6)
            .map(|c| format!("row {} | col {}", r, c))
            .collect::<Vec<_>>()
    }));
    let plain = MarkdownTableOptions::default();
    let escaped = MarkdownTableOptions::new().with_escape_pipes(true);

    c.bench_function("markdown_100x6", |b| {
        b.iter(|| pdfscope::render::to_markdown_table(black_box(&grid), &plain).unwrap());
    });

    c.bench_function("markdown_100x6_escaped", |b| {
        b.iter(|| pdfscope::render::to_markdown_table(black_box(&grid), &escaped).unwrap());
    });
}

criterion_group!(
    benches,
    bench_header_detection,
    bench_analyze_page,
    bench_extract_table,
    bench_markdown,
);
criterion_main!(benches);
