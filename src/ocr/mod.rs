//! OCR integration: the word-box index over per-page OCR output and the
//! tesseract CLI engine that produces it.

pub mod tesseract;
pub mod word_index;

pub use tesseract::{OcrEngine, TesseractCli, parse_tsv_words};
pub use word_index::{Word, WordBox, WordBoxIndex};
