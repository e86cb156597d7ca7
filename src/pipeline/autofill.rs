//! The autofill pipeline: rasterize a target document, OCR each page, plan
//! fill instructions against the stored profile, and overlay the values.
//!
//! Pages are processed one at a time; a page whose OCR fails or returns
//! malformed data is skipped with a warning and the remaining pages still
//! fill.

use crate::core::{FillResult, PipelineConfig};
use crate::fill::{FillEvent, FillInstruction, TextStyle, fill_page};
use crate::llm::FieldMatcher;
use crate::ocr::OcrEngine;
use crate::pipeline::pages::{PageRasterizer, save_filled_pages};
use crate::pipeline::stats::FillStats;
use image::RgbImage;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// The outcome of one fill run: the filled page images, every fill event,
/// and the aggregate counters.
#[derive(Debug)]
pub struct FillReport {
    /// Filled pages, in document order.
    pub pages: Vec<RgbImage>,
    /// One event per value drawn.
    pub events: Vec<FillEvent>,
    /// Run counters.
    pub stats: FillStats,
}

/// Fills target documents using an OCR engine and a page rasterizer.
pub struct AutofillPipeline<O, R> {
    ocr: O,
    rasterizer: R,
    style: TextStyle,
}

impl<O: OcrEngine, R: PageRasterizer> AutofillPipeline<O, R> {
    pub fn new(ocr: O, rasterizer: R, style: TextStyle) -> Self {
        Self {
            ocr,
            rasterizer,
            style,
        }
    }

    /// Builds a pipeline from configuration, probing for a system font.
    pub fn from_config(config: &PipelineConfig, ocr: O, rasterizer: R) -> FillResult<Self> {
        let style = match &config.fill.font_path {
            Some(path) => TextStyle::with_font_path(path, config.fill.font_size)?,
            None => TextStyle::with_system_font(config.fill.font_size),
        };
        Ok(Self::new(ocr, rasterizer, style))
    }

    /// Fills already rasterized pages in place.
    pub fn fill_images(
        &self,
        mut pages: Vec<RgbImage>,
        instructions: &[FillInstruction],
    ) -> FillReport {
        let mut events = Vec::new();
        let mut stats = FillStats::new();

        for (page_index, page) in pages.iter_mut().enumerate() {
            let index = match self.ocr.recognize_words(page) {
                Ok(index) => index,
                Err(e) => {
                    warn!("page {}: OCR unusable, skipping: {}", page_index + 1, e);
                    stats.record_failed_page();
                    continue;
                }
            };

            let page_events = fill_page(page, &index, instructions, &self.style, page_index);
            let drawn = page_events.iter().filter(|e| e.drawn).count();
            stats.record_page(instructions.len(), page_events.len(), drawn);
            events.extend(page_events);
        }

        info!(
            "fill run complete: {} values drawn over {} pages",
            events.len(),
            pages.len()
        );
        FillReport {
            pages,
            events,
            stats,
        }
    }

    /// Rasterizes a document and fills it.
    pub fn fill_document(
        &self,
        path: &Path,
        instructions: &[FillInstruction],
    ) -> FillResult<FillReport> {
        let pages = self.rasterizer.rasterize(path)?;
        Ok(self.fill_images(pages, instructions))
    }

    /// Plans fill instructions for a document: discover its fillable fields
    /// from OCR text, then match them against the profile map.
    pub fn plan_instructions(
        &self,
        matcher: &FieldMatcher,
        document_text: &str,
        profile_map: &BTreeMap<String, String>,
    ) -> FillResult<Vec<FillInstruction>> {
        let fillable = matcher.extract_fillable_fields(document_text)?;
        let matched = matcher.match_profile_fields(&fillable, profile_map)?;
        Ok(matcher.to_instructions(&matched))
    }

    /// The full flow for one target document: rasterize, OCR, plan against
    /// the profile, fill, and write numbered PNGs to `output_dir`.
    pub fn autofill_document(
        &self,
        matcher: &FieldMatcher,
        path: &Path,
        profile_map: &BTreeMap<String, String>,
        output_dir: &Path,
    ) -> FillResult<(FillReport, Vec<PathBuf>)> {
        let pages = self.rasterizer.rasterize(path)?;

        let mut page_texts = Vec::with_capacity(pages.len());
        for (i, page) in pages.iter().enumerate() {
            match self.ocr.recognize_text(page) {
                Ok(text) => page_texts.push(text),
                Err(e) => warn!("page {}: text OCR failed: {}", i + 1, e),
            }
        }
        let document_text = page_texts.join("\n\n");

        let instructions = self.plan_instructions(matcher, &document_text, profile_map)?;
        info!(
            "planned {} instructions for {}",
            instructions.len(),
            path.display()
        );

        let report = self.fill_images(pages, &instructions);

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document");
        let written = save_filled_pages(&report.pages, output_dir, stem)?;
        Ok((report, written))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FormFillError;
    use crate::ocr::WordBoxIndex;

    struct FixedOcr {
        words: Vec<(String, i32, i32, i32, i32)>,
        fail: bool,
    }

    impl OcrEngine for FixedOcr {
        fn recognize_words(&self, _page: &RgbImage) -> FillResult<WordBoxIndex> {
            if self.fail {
                return Err(FormFillError::ocr_engine("no engine"));
            }
            let (mut text, mut left, mut top, mut width, mut height) =
                (Vec::new(), Vec::new(), Vec::new(), Vec::new(), Vec::new());
            for (t, l, tp, w, h) in &self.words {
                text.push(t.clone());
                left.push(*l);
                top.push(*tp);
                width.push(*w);
                height.push(*h);
            }
            WordBoxIndex::from_parallel(text, left, top, width, height)
        }

        fn recognize_text(&self, _page: &RgbImage) -> FillResult<String> {
            Ok(self
                .words
                .iter()
                .map(|(t, ..)| t.as_str())
                .collect::<Vec<_>>()
                .join(" "))
        }
    }

    struct NoRasterizer;

    impl PageRasterizer for NoRasterizer {
        fn rasterize(&self, _path: &Path) -> FillResult<Vec<RgbImage>> {
            Ok(vec![RgbImage::new(300, 200)])
        }
    }

    fn name_page_ocr() -> FixedOcr {
        FixedOcr {
            words: vec![("Name:".to_string(), 10, 20, 55, 20)],
            fail: false,
        }
    }

    #[test]
    fn test_fill_images_counts_events_and_skips() {
        let pipeline = AutofillPipeline::new(name_page_ocr(), NoRasterizer, TextStyle::default());
        let instructions = vec![
            FillInstruction::new("Name", "John"),
            FillInstruction::new("Email", "j@example.com"),
        ];

        let report = pipeline.fill_images(vec![RgbImage::new(300, 200)], &instructions);
        assert_eq!(report.events.len(), 1);
        assert_eq!(report.stats.fields_filled, 1);
        assert_eq!(report.stats.fields_skipped, 1);
        assert_eq!(report.stats.pages_processed, 1);
        // Default style carries no font, so nothing was inked.
        assert_eq!(report.stats.fields_drawn, 0);
        assert!(!report.events[0].drawn);
    }

    #[test]
    fn test_failed_ocr_skips_page_not_run() {
        let failing = FixedOcr {
            words: Vec::new(),
            fail: true,
        };
        let pipeline = AutofillPipeline::new(failing, NoRasterizer, TextStyle::default());
        let instructions = vec![FillInstruction::new("Name", "John")];

        let report = pipeline.fill_images(
            vec![RgbImage::new(300, 200), RgbImage::new(300, 200)],
            &instructions,
        );
        assert_eq!(report.stats.pages_failed, 2);
        assert!(report.events.is_empty());
        assert_eq!(report.pages.len(), 2);
    }

    #[test]
    fn test_from_config_without_font_path() {
        let config = PipelineConfig::default();
        let ocr = FixedOcr {
            words: Vec::new(),
            fail: false,
        };
        let pipeline = AutofillPipeline::from_config(&config, ocr, NoRasterizer).unwrap();
        assert!((pipeline.style.scale - config.fill.font_size).abs() < f32::EPSILON);
    }
}
