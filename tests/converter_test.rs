//! Integration tests for the document converter.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use unscan::error::{Error, Result};
use unscan::model::{BBox, Conversion, OcrStats, Rotation};
use unscan::ocr::{RecognitionEngine, SpellDictionary};
use unscan::parser::{
    ConvertOptions, LinkAnnotation, PageInfo, PageRef, PdfSource, RawBlock, RawLine, RawSpan,
};
use unscan::render::{to_text, RenderOptions};
use unscan::storage::{MemoryStore, ObjectStore};
use unscan::Converter;

const GOOD_TEXT: &str = "The quarterly results were reviewed by the board.";
const GARBAGE_TEXT: &str = "~~ ## @@ !! ?? ** %% ^^";

/// Mock page content.
#[derive(Clone)]
struct MockPage {
    info: PageInfo,
    blocks: Vec<RawBlock>,
    links: Vec<LinkAnnotation>,
}

impl MockPage {
    fn new(blocks: Vec<RawBlock>) -> Self {
        Self {
            info: PageInfo::default(),
            blocks,
            links: Vec::new(),
        }
    }

    fn rotated(rotation: Rotation, blocks: Vec<RawBlock>) -> Self {
        Self {
            info: PageInfo::new(612.0, 792.0, rotation),
            blocks,
            links: Vec::new(),
        }
    }
}

/// Mock document source.
struct MockSource {
    name: String,
    pages: Vec<MockPage>,
}

impl MockSource {
    fn new(pages: Vec<MockPage>) -> Self {
        Self {
            name: "/tmp/scans/report.pdf".to_string(),
            pages,
        }
    }

    fn page(&self, index: usize) -> Result<&MockPage> {
        self.pages
            .get(index)
            .ok_or(Error::PageOutOfRange(index, self.pages.len()))
    }
}

impl PdfSource for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_info(&self, index: usize) -> Result<PageInfo> {
        Ok(self.page(index)?.info)
    }

    fn page_content(&self, index: usize) -> Result<Vec<RawBlock>> {
        Ok(self.page(index)?.blocks.clone())
    }

    fn page_links(&self, index: usize) -> Result<Vec<LinkAnnotation>> {
        Ok(self.page(index)?.links.clone())
    }
}

/// Engine that records the pages it was asked to recognize.
#[derive(Default)]
struct RecordingEngine {
    calls: Mutex<Vec<usize>>,
    empty_pages: Vec<usize>,
    failing_pages: Vec<usize>,
}

impl RecordingEngine {
    fn recognized(&self) -> BTreeSet<usize> {
        self.calls.lock().unwrap().iter().copied().collect()
    }
}

impl RecognitionEngine for RecordingEngine {
    fn recognize(
        &self,
        page: &PageRef<'_>,
        language: &str,
        _dictionary: Option<&dyn SpellDictionary>,
    ) -> Result<Vec<RawBlock>> {
        assert_eq!(language, "eng");
        self.calls.lock().unwrap().push(page.index);

        // Later pages finish first
        thread::sleep(Duration::from_millis(2 * (8 - page.index.min(8)) as u64));

        if self.failing_pages.contains(&page.index) {
            return Err(Error::Recognition("engine crashed".to_string()));
        }
        if self.empty_pages.contains(&page.index) {
            return Ok(Vec::new());
        }
        Ok(vec![text_block(
            &format!("ocr page {}", page.index),
            BBox::new(50.0, 50.0, 300.0, 70.0),
        )])
    }
}

/// Store that rejects every upload.
struct FailingStore;

impl ObjectStore for FailingStore {
    fn put(&self, key: &str, _data: &[u8], _content_type: &str) -> Result<()> {
        Err(Error::Storage(format!("bucket unavailable for {}", key)))
    }

    fn url(&self, key: &str) -> Result<String> {
        Err(Error::Storage(format!("bucket unavailable for {}", key)))
    }
}

fn text_block(text: &str, bbox: BBox) -> RawBlock {
    RawBlock::Text {
        bbox,
        lines: vec![RawLine {
            bbox,
            spans: vec![RawSpan {
                text: text.to_string(),
                bbox,
                font: "Helvetica".to_string(),
                flags: 0,
                color: 0,
                ascender: 0.9,
                descender: -0.2,
            }],
        }],
    }
}

fn png_block(bbox: BBox) -> RawBlock {
    RawBlock::Image {
        bbox,
        ext: "png".to_string(),
        image: vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0],
    }
}

fn text_page(text: &str) -> MockPage {
    MockPage::new(vec![text_block(text, BBox::new(72.0, 72.0, 540.0, 90.0))])
}

/// Pages 0 and 4 carry real text, pages 1 to 3 a garbage text layer.
fn scanned_report() -> MockSource {
    MockSource::new(vec![
        text_page(GOOD_TEXT),
        text_page(GARBAGE_TEXT),
        text_page(GARBAGE_TEXT),
        text_page(GARBAGE_TEXT),
        text_page(GOOD_TEXT),
    ])
}

fn textless(pages: usize) -> MockSource {
    MockSource::new((0..pages).map(|_| MockPage::new(Vec::new())).collect())
}

fn convert_with(
    source: &MockSource,
    engine: Arc<RecordingEngine>,
    options: ConvertOptions,
) -> Result<Conversion> {
    Converter::builder()
        .shared_engine(engine)
        .store(MemoryStore::new())
        .options(options)
        .build()?
        .convert(source)
}

fn texts(conversion: &Conversion, page: usize) -> Vec<String> {
    conversion.pages[page]
        .blocks
        .iter()
        .map(|b| b.plain_text())
        .collect()
}

#[test]
fn test_scanned_pages_recognized_at_every_factor() {
    for parallel in [1, 2, 8] {
        let source = scanned_report();
        let engine = Arc::new(RecordingEngine::default());
        let options = ConvertOptions::default()
            .with_min_ocr_page(0)
            .with_parallel(parallel);
        let conversion = convert_with(&source, Arc::clone(&engine), options).unwrap();

        assert_eq!(engine.recognized(), BTreeSet::from([1, 2, 3]), "factor {}", parallel);
        assert_eq!(
            conversion.ocr_stats,
            OcrStats {
                pages_ocr_attempted: 3,
                ocr_success: 3,
                ocr_failed: 0,
            }
        );
        assert_eq!(texts(&conversion, 0), vec![GOOD_TEXT]);
        assert_eq!(texts(&conversion, 2), vec!["ocr page 2"]);
        assert_eq!(texts(&conversion, 4), vec![GOOD_TEXT]);
    }
}

#[test]
fn test_page_order_preserved() {
    for parallel in [1, 2, 8] {
        let source = textless(12);
        let engine = Arc::new(RecordingEngine::default());
        let options = ConvertOptions::default()
            .with_ocr_all_pages(true)
            .with_parallel(parallel);
        let conversion = convert_with(&source, engine, options).unwrap();

        let numbers: Vec<usize> = conversion.pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, (0..12).collect::<Vec<_>>());
        for (index, page) in conversion.pages.iter().enumerate() {
            assert_eq!(page.blocks[0].plain_text(), format!("ocr page {}", index));
            assert!(page.blocks.iter().all(|b| b.page == index));
        }
    }
}

#[test]
fn test_ocr_page_gate() {
    let source = textless(6);
    let engine = Arc::new(RecordingEngine::default());
    let options = ConvertOptions::default().with_min_ocr_page(2);
    let conversion = convert_with(&source, Arc::clone(&engine), options).unwrap();

    assert_eq!(engine.recognized(), BTreeSet::from([3, 4]));
    assert_eq!(conversion.ocr_stats.pages_ocr_attempted, 2);
}

#[test]
fn test_ocr_all_pages_override() {
    let source = scanned_report();
    let engine = Arc::new(RecordingEngine::default());
    let options = ConvertOptions::default()
        .with_min_ocr_page(10)
        .with_ocr_all_pages(true);
    let conversion = convert_with(&source, Arc::clone(&engine), options).unwrap();

    assert_eq!(engine.recognized(), (0..5).collect::<BTreeSet<_>>());
    assert_eq!(conversion.ocr_stats.ocr_success, 5);
}

#[test]
fn test_disable_ocr() {
    let source = scanned_report();
    let engine = Arc::new(RecordingEngine::default());
    let options = ConvertOptions::default().with_min_ocr_page(0).without_ocr();
    let conversion = convert_with(&source, Arc::clone(&engine), options).unwrap();

    assert!(engine.recognized().is_empty());
    assert_eq!(conversion.ocr_stats, OcrStats::none());
    assert_eq!(texts(&conversion, 2), vec![GARBAGE_TEXT]);
}

#[test]
fn test_recognition_failures_counted() {
    let source = scanned_report();
    let engine = Arc::new(RecordingEngine {
        empty_pages: vec![2],
        failing_pages: vec![3],
        ..Default::default()
    });
    let options = ConvertOptions::default().with_min_ocr_page(0);
    let conversion = convert_with(&source, engine, options).unwrap();

    assert_eq!(
        conversion.ocr_stats,
        OcrStats {
            pages_ocr_attempted: 3,
            ocr_success: 1,
            ocr_failed: 2,
        }
    );
    // Failed pages keep the empty result
    assert!(conversion.pages[2].blocks.is_empty());
    assert!(conversion.pages[3].blocks.is_empty());
}

#[test]
fn test_page_cap_keeps_document_length_for_gate() {
    let source = textless(5);
    let engine = Arc::new(RecordingEngine::default());
    let options = ConvertOptions::default()
        .with_min_ocr_page(0)
        .with_max_pages(3);
    let conversion = convert_with(&source, Arc::clone(&engine), options).unwrap();

    assert_eq!(conversion.page_count(), 3);
    assert_eq!(engine.recognized(), BTreeSet::from([1, 2]));
}

#[test]
fn test_unrotated_page_keeps_source_order() {
    let source = MockSource::new(vec![MockPage::new(vec![
        text_block("right", BBox::new(300.0, 100.0, 400.0, 110.0)),
        text_block("left", BBox::new(100.0, 100.0, 200.0, 110.0)),
    ])]);
    let conversion = convert_with(
        &source,
        Arc::new(RecordingEngine::default()),
        ConvertOptions::default(),
    )
    .unwrap();

    assert_eq!(texts(&conversion, 0), vec!["right", "left"]);
}

#[test]
fn test_rotated_page_reflowed() {
    // Displayed origins (300, 100), (100, 102), (200, 100) on a page turned
    // upside down; raw rectangles are the 180 degree preimages.
    let upside_down = |x0: f32, y0: f32| {
        BBox::new(612.0 - (x0 + 50.0), 792.0 - (y0 + 10.0), 612.0 - x0, 792.0 - y0)
    };
    let mut page = MockPage::rotated(
        Rotation::Clockwise180,
        vec![
            text_block("third", upside_down(300.0, 100.0)),
            text_block("first", upside_down(100.0, 102.0)),
            text_block("second", upside_down(200.0, 100.0)),
        ],
    );
    page.links.push(LinkAnnotation::new(
        upside_down(100.0, 102.0),
        "https://example.com/first",
    ));
    let source = MockSource::new(vec![page]);

    let conversion = convert_with(
        &source,
        Arc::new(RecordingEngine::default()),
        ConvertOptions::default(),
    )
    .unwrap();

    let page = &conversion.pages[0];
    assert_eq!(page.rotation, Rotation::Clockwise180);
    assert_eq!(texts(&conversion, 0), vec!["first", "second", "third"]);
    assert_eq!(page.blocks[0].bbox, BBox::new(100.0, 102.0, 150.0, 112.0));
    assert_eq!(
        page.blocks[0].lines[0].spans[0].link.as_deref(),
        Some("https://example.com/first")
    );
    assert!(page.blocks[1..]
        .iter()
        .flat_map(|b| b.spans())
        .all(|s| s.link.is_none()));
}

#[test]
fn test_images_uploaded_and_rendered() {
    let source = MockSource::new(vec![MockPage::new(vec![
        text_block("Figure 1", BBox::new(72.0, 72.0, 200.0, 84.0)),
        png_block(BBox::new(72.0, 100.0, 272.0, 300.0)),
    ])]);
    let store = Arc::new(MemoryStore::new());
    let converter = Converter::builder()
        .engine(NoOcrEngine)
        .shared_store(store.clone())
        .build()
        .unwrap();
    let conversion = converter.convert(&source).unwrap();

    let keys = store.keys();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].starts_with("report.pdf-"));
    assert!(keys[0].ends_with("/image_0_1.png"));
    assert_eq!(store.get(&keys[0]).unwrap().content_type, "image/png");

    let image = &conversion.pages[0].blocks[1];
    assert!(image.is_image());
    assert_eq!(image.lines.len(), 1);
    let span = &image.lines[0].spans[0];
    assert_eq!(span.id, "image_0_1");
    assert_eq!(span.font.family, "Arial");
    assert_eq!(span.asset().map(|a| a.key.as_str()), Some(keys[0].as_str()));

    let text = to_text(&conversion, store.as_ref(), &RenderOptions::default()).unwrap();
    assert_eq!(text, format!("Figure 1\n\n![image](memory://{})", keys[0]));
}

#[test]
fn test_images_share_one_document_token() {
    for parallel in [1, 4] {
        let source = MockSource::new(
            (0..4)
                .map(|_| MockPage::new(vec![png_block(BBox::new(0.0, 0.0, 100.0, 100.0))]))
                .collect(),
        );
        let store = Arc::new(MemoryStore::new());
        let converter = Converter::builder()
            .engine(NoOcrEngine)
            .shared_store(store.clone())
            .options(ConvertOptions::default().with_parallel(parallel))
            .build()
            .unwrap();
        converter.convert(&source).unwrap();

        let keys = store.keys();
        assert_eq!(keys.len(), 4);
        let prefixes: BTreeSet<&str> = keys
            .iter()
            .map(|key| key.split('/').next().unwrap())
            .collect();
        assert_eq!(prefixes.len(), 1, "keys: {:?}", keys);
        assert!(prefixes.iter().all(|p| p.starts_with("report.pdf-")));
    }
}

#[test]
fn test_link_over_image_is_rendered() {
    let mut page = MockPage::new(vec![
        text_block("Figure 1", BBox::new(72.0, 72.0, 200.0, 84.0)),
        png_block(BBox::new(10.0, 100.0, 110.0, 200.0)),
    ]);
    page.links.push(LinkAnnotation::new(
        BBox::new(10.0, 100.0, 110.0, 200.0),
        "https://target.example",
    ));
    let source = MockSource::new(vec![page]);
    let store = Arc::new(MemoryStore::new());
    let converter = Converter::builder()
        .engine(NoOcrEngine)
        .shared_store(store.clone())
        .build()
        .unwrap();
    let conversion = converter.convert(&source).unwrap();

    let span = &conversion.pages[0].blocks[1].lines[0].spans[0];
    assert!(span.is_image());
    assert_eq!(span.link.as_deref(), Some("https://target.example"));

    let key = store.keys().remove(0);
    let text = to_text(&conversion, store.as_ref(), &RenderOptions::default()).unwrap();
    assert_eq!(
        text,
        format!(
            "Figure 1\n\n[![image](memory://{})](https://target.example)",
            key
        )
    );
}

/// Engine for documents that never need recognition.
struct NoOcrEngine;

impl RecognitionEngine for NoOcrEngine {
    fn recognize(
        &self,
        page: &PageRef<'_>,
        _language: &str,
        _dictionary: Option<&dyn SpellDictionary>,
    ) -> Result<Vec<RawBlock>> {
        panic!("page {} should not be recognized", page.index);
    }
}

#[test]
fn test_storage_failure_is_fatal() {
    for parallel in [1, 4] {
        let source = MockSource::new(vec![
            text_page(GOOD_TEXT),
            MockPage::new(vec![png_block(BBox::new(0.0, 0.0, 100.0, 100.0))]),
            text_page(GOOD_TEXT),
        ]);
        let converter = Converter::builder()
            .engine(NoOcrEngine)
            .store(FailingStore)
            .options(ConvertOptions::default().with_parallel(parallel))
            .build()
            .unwrap();

        assert!(matches!(converter.convert(&source), Err(Error::Storage(_))));
    }
}

#[test]
fn test_converter_not_ready() {
    let result = Converter::builder()
        .engine(NoOcrEngine)
        .options(ConvertOptions::default())
        .build();
    assert!(matches!(result, Err(Error::NotReady(_))));
}

#[test]
fn test_empty_document() {
    let conversion = convert_with(
        &textless(0),
        Arc::new(RecordingEngine::default()),
        ConvertOptions::default().with_parallel(4),
    )
    .unwrap();
    assert!(conversion.is_empty());
    assert_eq!(conversion.ocr_stats, OcrStats::none());
}
