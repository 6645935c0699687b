//! PDF extraction against documents generated with lopdf.

#![cfg(feature = "pdf")]

use std::sync::{Arc, Mutex};

use docproc::{
    DocumentProcessor, ExtractError, ExtractionCategory, Extractor, PdfExtractor, ProcessorConfig,
    ProgressCallback, ProgressEvent, ProgressStage,
};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build a PDF with one line of text per page and an optional title.
fn build_pdf(lines: &[&str], title: Option<&str>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for line in lines {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*line)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if let Some(title) = title {
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
            "Producer" => Object::string_literal("docproc tests"),
        });
        doc.trailer.set("Info", info_id);
    }

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[tokio::test]
async fn test_pdf_pages_text_and_info() {
    let pdf = build_pdf(&["Hello from page one", "Second page here", "Third"], Some("Quarterly Report"));

    let result = PdfExtractor::new().extract(pdf, "report.pdf", None).await.unwrap();

    assert_eq!(result.category, ExtractionCategory::Pdf);
    assert_eq!(result.file_name, "report.pdf");
    assert!(result.text.contains("Hello"));
    assert!(result.text.contains("Third"));
    assert!(!result.text.contains("oneSecond"));
    assert!(!result.text.contains("hereThird"));
    assert_eq!(result.word_count(), 9);

    let meta = result.pdf().unwrap();
    assert_eq!(meta.pages, 3);
    assert_eq!(meta.info.get("Title").map(String::as_str), Some("Quarterly Report"));
    assert_eq!(meta.info.get("Producer").map(String::as_str), Some("docproc tests"));
}

#[tokio::test]
async fn test_pdf_without_info_has_empty_map() {
    let pdf = build_pdf(&["Only page"], None);

    let result = PdfExtractor::new().extract(pdf, "plain.pdf", None).await.unwrap();

    let meta = result.pdf().unwrap();
    assert_eq!(meta.pages, 1);
    assert!(meta.info.is_empty());

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["metadata"]["pages"], 1);
    assert!(json["metadata"]["info"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn test_pdf_reports_progress() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let callback: ProgressCallback = Arc::new(move |event: ProgressEvent| sink.lock().unwrap().push(event.stage));

    PdfExtractor::new()
        .extract(build_pdf(&["Progress"], None), "p.pdf", Some(callback))
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.first(), Some(&ProgressStage::ParsingDocument));
    assert_eq!(seen.last(), Some(&ProgressStage::Done));
}

#[tokio::test]
async fn test_truncated_pdf_fails() {
    let mut pdf = build_pdf(&["Cut short"], None);
    pdf.truncate(20);

    let result = PdfExtractor::new().extract(pdf, "broken.pdf", None).await;
    assert!(matches!(result, Err(ExtractError::PdfProcessingFailed)));
}

#[tokio::test]
async fn test_pdf_through_processor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/file/botpdf-token/documents/file_7.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(build_pdf(&["Hello", "World"], Some("Memo"))))
        .expect(1)
        .mount(&server)
        .await;

    let config = ProcessorConfig::new("pdf-token").with_api_base_url(server.uri());
    let processor = DocumentProcessor::from_config(config).unwrap();

    let result = processor
        .process_file("documents/file_7.pdf", "Memo.PDF")
        .await
        .unwrap();

    assert_eq!(result.category, ExtractionCategory::Pdf);
    assert_eq!(result.file_name, "Memo.PDF");
    assert_eq!(result.pdf().unwrap().pages, 2);
    assert_eq!(result.word_count(), 2);
    assert_eq!(result.pdf().unwrap().info["Title"], "Memo");
}
