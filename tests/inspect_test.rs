//! End-to-end tests against PDFs assembled with lopdf.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use pdfscope::{
    analyze_page, extract_table, inspect_document, BoundingBox, Error, Inspector, OverlapPolicy,
    PageElement, TableSelection,
};

fn text(font_size: i64, x: i64, y: i64, content: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), font_size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(content)]),
        Operation::new("ET", vec![]),
    ]
}

/// Page 1: a title, a 3x3 price table, a closing note and one image.
/// Page 2: empty, with a CropBox smaller than the MediaBox.
fn sample_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 40,
            "Height" => 20,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        vec![0u8; 40 * 20 * 3],
    ));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
        "XObject" => dictionary! { "Im1" => image_id },
    });

    let mut operations = text(18, 72, 740, "Quarterly Report");
    let rows = [
        (600, ["Item", "Qty", "Price"]),
        (585, ["Apples", "3", "1.20"]),
        (570, ["Pears", "5", "0.80"]),
    ];
    for (y, cells) in rows {
        for (x, cell) in [72, 200, 320].into_iter().zip(cells) {
            operations.extend(text(10, x, y, cell));
        }
    }
    operations.extend(text(10, 72, 400, "Prices exclude tax."));
    operations.extend([
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![100.into(), 0.into(), 0.into(), 50.into(), 400.into(), 650.into()],
        ),
        Operation::new("Do", vec!["Im1".into()]),
        Operation::new("Q", vec![]),
    ]);

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let first_page = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    });

    let empty_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
    let second_page = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => empty_id,
        "CropBox" => vec![0.into(), 0.into(), 300.into(), 400.into()],
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![first_page.into(), second_page.into()],
            "Count" => 2,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

fn table_region() -> BoundingBox {
    BoundingBox::new(60.0, 170.0, 400.0, 240.0)
}

#[test]
fn test_document_info() {
    let info = inspect_document(&sample_pdf()).unwrap();
    assert_eq!(info.version, "1.5");
    assert_eq!(info.page_count, 2);
    assert_eq!((info.pages[0].width, info.pages[0].height), (612.0, 792.0));
    assert_eq!((info.pages[1].width, info.pages[1].height), (300.0, 400.0));
}

#[test]
fn test_analyze_page_inventory() {
    let result = analyze_page(&sample_pdf(), 0).unwrap();
    assert_eq!(result.page_index, 0);
    assert!(result.page_width > 0.0 && result.page_height > 0.0);

    // 1 title + 9 cells + 1 note
    assert_eq!(result.text_spans().count(), 11);
    assert_eq!(result.images().count(), 1);
    assert_eq!(result.tables().count(), 1);

    let first_image = result.elements.iter().position(|e| e.is_image()).unwrap();
    let first_table = result.elements.iter().position(|e| e.is_table()).unwrap();
    let last_text = result.elements.iter().rposition(|e| e.is_text()).unwrap();
    assert!(last_text < first_image && first_image < first_table);
}

#[test]
fn test_title_span_geometry() {
    let result = analyze_page(&sample_pdf(), 0).unwrap();
    let title = result
        .elements
        .iter()
        .find(|e| matches!(e, PageElement::TextSpan { text, .. } if text == "Quarterly Report"))
        .unwrap();

    match title {
        PageElement::TextSpan {
            bbox,
            font_name,
            font_size,
            ..
        } => {
            assert_eq!(font_name, "Helvetica");
            assert_eq!(*font_size, 18.0);
            assert!((bbox.x0() - 72.0).abs() < 0.01);
            // Near the top of the page in a y-down space
            assert!(bbox.y0() < 60.0);
            assert!(bbox.y0() < bbox.y1());
        }
        _ => unreachable!(),
    }
}

#[test]
fn test_image_placement() {
    let result = analyze_page(&sample_pdf(), 0).unwrap();
    match result.images().next().unwrap() {
        PageElement::Image {
            bbox,
            width,
            height,
            color_space,
            ..
        } => {
            assert_eq!((*width, *height), (40, 20));
            assert_eq!(color_space.as_deref(), Some("DeviceRGB"));
            assert!((bbox.x0() - 400.0).abs() < 0.01);
            assert!((bbox.x1() - 500.0).abs() < 0.01);
            assert!((bbox.y0() - 92.0).abs() < 0.01);
            assert!((bbox.y1() - 142.0).abs() < 0.01);
        }
        _ => unreachable!(),
    };
}

#[test]
fn test_table_element_summary() {
    let result = analyze_page(&sample_pdf(), 0).unwrap();
    match result.tables().next().unwrap() {
        PageElement::Table {
            bbox,
            row_count,
            col_count,
        } => {
            assert_eq!((*row_count, *col_count), (3, 3));
            assert!(table_region().contains(bbox));
        }
        _ => unreachable!(),
    };
}

#[test]
fn test_exclude_table_text() {
    let inspection = Inspector::new()
        .with_overlap_policy(OverlapPolicy::ExcludeTableText)
        .open(&sample_pdf())
        .unwrap();
    let result = inspection.analyze_page(0).unwrap();
    assert_eq!(result.text_spans().count(), 2);
    assert_eq!(result.tables().count(), 1);
}

#[test]
fn test_extract_table_markdown() {
    let table = extract_table(&sample_pdf(), 0, table_region()).unwrap();
    assert_eq!(
        table.markdown,
        "|Item|Qty|Price|\n|---|---|---|\n|Apples|3|1.20|\n|Pears|5|0.80|\n"
    );
    assert_eq!(table.grid.row_count(), 3);
    assert_eq!(table.grid.cell(2, 0), Some("Pears"));
    assert_eq!(table.candidate_count, 1);
}

#[test]
fn test_extract_table_require_single() {
    let inspection = Inspector::new()
        .with_table_selection(TableSelection::RequireSingle)
        .open(&sample_pdf())
        .unwrap();
    let table = inspection.extract_table(0, &table_region()).unwrap();
    assert_eq!(table.grid.column_count(), 3);
}

#[test]
fn test_extract_table_no_table_in_clip() {
    let clip = BoundingBox::new(60.0, 30.0, 300.0, 60.0);
    let result = extract_table(&sample_pdf(), 0, clip);
    assert!(matches!(result, Err(Error::NoTableFound)));
}

#[test]
fn test_empty_page() {
    let result = analyze_page(&sample_pdf(), 1).unwrap();
    assert_eq!((result.page_width, result.page_height), (300.0, 400.0));
    assert!(result.elements.is_empty());
}

#[test]
fn test_page_out_of_range() {
    let data = sample_pdf();
    assert!(matches!(
        analyze_page(&data, 2),
        Err(Error::PageOutOfRange {
            index: 2,
            page_count: 2
        })
    ));
    assert!(matches!(
        extract_table(&data, 2, table_region()),
        Err(Error::PageOutOfRange {
            index: 2,
            page_count: 2
        })
    ));
    assert!(matches!(
        extract_table(&data, 5, table_region()),
        Err(Error::PageOutOfRange { index: 5, .. })
    ));
}

#[test]
fn test_file_entry_points() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.pdf");
    std::fs::write(&path, sample_pdf()).unwrap();

    let info = pdfscope::inspect_file(&path).unwrap();
    assert_eq!(info.page_count, 2);

    let analysis = pdfscope::analyze_page_file(&path, 0).unwrap();
    assert_eq!(analysis.tables().count(), 1);

    let table = pdfscope::extract_table_file(&path, 0, table_region()).unwrap();
    assert!(table.markdown.starts_with("|Item|Qty|Price|\n"));
}

#[test]
fn test_result_json() {
    let result = analyze_page(&sample_pdf(), 0).unwrap();
    let json = pdfscope::render::to_json(&result, pdfscope::JsonFormat::Compact).unwrap();
    assert!(json.contains("\"pageWidth\":612.0"));
    assert!(json.contains("\"type\":\"table\""));
    assert!(json.contains("\"rowCount\":3"));
}

#[cfg(feature = "async")]
#[tokio::test]
async fn test_async_variants() {
    let data = sample_pdf();
    let options = pdfscope::InspectOptions::default();

    let analysis = pdfscope::analyze_page_async(data.clone(), 0, options.clone())
        .await
        .unwrap();
    assert_eq!(analysis.images().count(), 1);

    let table = pdfscope::extract_table_async(data, 0, table_region(), options)
        .await
        .unwrap();
    assert_eq!(table.grid.row_count(), 3);
}
