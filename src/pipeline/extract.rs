//! Source-document ingestion: OCR a scanned document, extract biodata via
//! the LLM, merge it into the profile store, and refresh the CSV mirror.

use crate::core::FillResult;
use crate::llm::FieldMatcher;
use crate::ocr::OcrEngine;
use crate::pipeline::pages::PageRasterizer;
use crate::profile::{Profile, ProfileStore, write_profile_csv};
use std::path::Path;
use tracing::{info, warn};

/// Ingests source documents into the profile store.
pub struct BiodataExtractor<O, R> {
    ocr: O,
    rasterizer: R,
    matcher: FieldMatcher,
}

impl<O: OcrEngine, R: PageRasterizer> BiodataExtractor<O, R> {
    pub fn new(ocr: O, rasterizer: R, matcher: FieldMatcher) -> Self {
        Self {
            ocr,
            rasterizer,
            matcher,
        }
    }

    /// Reads the full OCR text of a document, pages joined by blank lines.
    pub fn document_text(&self, path: &Path) -> FillResult<String> {
        let pages = self.rasterizer.rasterize(path)?;
        let mut texts = Vec::with_capacity(pages.len());
        for (i, page) in pages.iter().enumerate() {
            match self.ocr.recognize_text(page) {
                Ok(text) => texts.push(text),
                Err(e) => warn!("page {}: text OCR failed: {}", i + 1, e),
            }
        }
        Ok(texts.join("\n\n"))
    }

    /// Processes one source document end to end: OCR, biodata extraction,
    /// merge into the store, CSV mirror refresh.
    ///
    /// Returns the updated profile, or `None` when no biodata could be
    /// extracted (the store is left untouched in that case).
    pub fn process_document(
        &self,
        path: &Path,
        store: &mut ProfileStore,
        csv_path: &Path,
    ) -> FillResult<Option<Profile>> {
        let text = self.document_text(path)?;
        if text.trim().is_empty() {
            warn!("no OCR text in {}; nothing to extract", path.display());
            return Ok(None);
        }

        let Some(biodata) = self.matcher.extract_biodata(&text)? else {
            return Ok(None);
        };

        let changed = store.merge_update(&biodata)?;
        let profile = store.load()?;
        if changed {
            write_profile_csv(&profile, csv_path)?;
        }
        info!(
            "processed {}: profile {}",
            path.display(),
            if changed { "updated" } else { "unchanged" }
        );
        Ok(Some(profile))
    }
}
