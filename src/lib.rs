//! # FormFill
//!
//! A Rust library that fills scanned forms automatically. It OCRs source
//! documents to extract personal biodata into a local profile, then places
//! the profile's values onto blank fields of target forms by matching field
//! labels in the OCR word boxes and overlaying text at resolved pixel
//! positions.
//!
//! ## Features
//!
//! - Word-level OCR via the Tesseract CLI (TSV parsing, word boxes)
//! - LLM-driven biodata extraction and semantic field matching (Groq,
//!   OpenAI-compatible chat completions)
//! - Single-row SQLite profile store with merge-only updates and a CSV
//!   mirror
//! - Label matching with variant priority and gap-tolerant multi-word
//!   windows
//! - Rule-based fill-position resolution (colon suffixes, underscore runs,
//!   indicator lookahead)
//! - PDF rasterization through `pdftoppm`; filled pages written as PNGs
//!
//! ## Modules
//!
//! * [`core`] - Configuration and error handling
//! * [`ocr`] - The OCR engine trait, Tesseract CLI driver, and word-box index
//! * [`fill`] - Label variants, matching, position resolution, and rendering
//! * [`llm`] - Chat client, JSON recovery, prompts, and the field matcher
//! * [`profile`] - The SQLite profile store and CSV export
//! * [`pipeline`] - Page rasterization and the end-to-end flows
//! * [`utils`] - Image loading and tracing setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use formfill::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::default();
//!
//! // Extract biodata from a source document into the profile store.
//! let client = LlmClient::new(config.llm.clone())?;
//! let matcher = FieldMatcher::new(client);
//! let ocr = TesseractCli::new(config.ocr.clone());
//! let rasterizer = PdftoppmCli::new(config.fill.dpi);
//!
//! let mut store = ProfileStore::open(&config.db_path)?;
//! let extractor = BiodataExtractor::new(ocr, rasterizer.clone(), matcher);
//! extractor.process_document(
//!     Path::new("aadhar_card.jpg"),
//!     &mut store,
//!     &config.csv_path,
//! )?;
//!
//! // Fill a target form from the stored profile.
//! let client = LlmClient::new(config.llm.clone())?;
//! let matcher = FieldMatcher::new(client);
//! let ocr = TesseractCli::new(config.ocr.clone());
//! let pipeline = AutofillPipeline::from_config(&config, ocr, rasterizer)?;
//!
//! let profile_map = store.load()?.to_field_map();
//! let (report, written) = pipeline.autofill_document(
//!     &matcher,
//!     Path::new("application_form.pdf"),
//!     &profile_map,
//!     Path::new("filled"),
//! )?;
//! println!("{}", report.stats);
//! println!("wrote {} pages", written.len());
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod fill;
pub mod llm;
pub mod ocr;
pub mod pipeline;
pub mod profile;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use formfill::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{
        FillConfig, FillResult, FormFillError, LlmConfig, OcrConfig, PipelineConfig,
    };
    pub use crate::fill::{
        FillEvent, FillInstruction, FillPosition, FillRule, LabelVariantSet, TextStyle, fill_page,
        find_label, measure_value_width, resolve_fill_position,
    };
    pub use crate::llm::{FieldMatcher, FillableField, LlmClient, MatchedField};
    pub use crate::ocr::{OcrEngine, TesseractCli, Word, WordBox, WordBoxIndex};
    pub use crate::pipeline::{
        AutofillPipeline, BiodataExtractor, FillReport, FillStats, PageRasterizer, PdftoppmCli,
    };
    pub use crate::profile::{Biodata, Profile, ProfileStore, write_profile_csv};
    pub use crate::utils::{init_tracing, load_rgb_image};
}
