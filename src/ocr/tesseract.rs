//! Tesseract CLI OCR engine.
//!
//! Runs the `tesseract` binary as a subprocess (it must be installed and on
//! PATH, or pointed at via [`OcrConfig::tesseract_path`]). Word boxes come
//! from tesseract's TSV output, plain text from its default stdout mode.
//!
//! The TSV stream contains structural rows (page/block/paragraph/line) with
//! no text as well as word rows; all rows are kept, so gaps between words
//! survive as empty tokens in the [`WordBoxIndex`] the way the matcher
//! expects them.

use crate::core::{FillResult, FormFillError, OcrConfig};
use crate::ocr::WordBoxIndex;
use image::RgbImage;
use std::process::Command;
use tracing::{debug, warn};

/// Abstraction over a per-page OCR engine.
///
/// The pipeline only needs two capabilities: word boxes for the fill pass
/// and plain text for the biodata-extraction pass.
pub trait OcrEngine {
    /// Recognizes words with pixel bounding boxes on one page image.
    fn recognize_words(&self, image: &RgbImage) -> FillResult<WordBoxIndex>;

    /// Recognizes the page as plain text in reading order.
    fn recognize_text(&self, image: &RgbImage) -> FillResult<String>;
}

/// OCR engine backed by the tesseract command-line binary.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    config: OcrConfig,
}

impl TesseractCli {
    /// Creates an engine with the given settings.
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Returns true if the configured tesseract binary can be executed.
    pub fn is_available(&self) -> bool {
        Command::new(&self.config.tesseract_path)
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    /// Writes the image to a scratch file and runs tesseract with the given
    /// output mode argument (empty for plain text, "tsv" for word data).
    fn run(&self, image: &RgbImage, output_mode: Option<&str>) -> FillResult<String> {
        let dir = tempfile::tempdir()?;
        let input_path = dir.path().join("page.png");
        image
            .save(&input_path)
            .map_err(|e| FormFillError::ocr_engine(format!("failed to write page image: {}", e)))?;

        let mut command = Command::new(&self.config.tesseract_path);
        command
            .arg(&input_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.config.language)
            .arg("--psm")
            .arg(self.config.page_seg_mode.to_string());
        if let Some(mode) = output_mode {
            command.arg(mode);
        }

        let output = command.output().map_err(|e| {
            FormFillError::ocr_engine(format!(
                "failed to run tesseract (is it installed? path='{}'): {}",
                self.config.tesseract_path, e
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FormFillError::ocr_engine(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl OcrEngine for TesseractCli {
    fn recognize_words(&self, image: &RgbImage) -> FillResult<WordBoxIndex> {
        let tsv = self.run(image, Some("tsv"))?;
        let index = parse_tsv_words(&tsv)?;
        debug!("tesseract recognized {} tokens", index.len());
        Ok(index)
    }

    fn recognize_text(&self, image: &RgbImage) -> FillResult<String> {
        self.run(image, None)
    }
}

/// Parses tesseract TSV output into a [`WordBoxIndex`].
///
/// TSV columns: level, page_num, block_num, par_num, line_num, word_num,
/// left, top, width, height, conf, text. The first line is the header.
/// Structural rows carry no text and become empty tokens.
pub fn parse_tsv_words(tsv: &str) -> FillResult<WordBoxIndex> {
    let mut text = Vec::new();
    let mut left = Vec::new();
    let mut top = Vec::new();
    let mut width = Vec::new();
    let mut height = Vec::new();

    for (line_no, line) in tsv.lines().enumerate() {
        if line_no == 0 || line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 10 {
            warn!("skipping short TSV row {}: {:?}", line_no, line);
            continue;
        }

        let parse = |s: &str, name: &str| -> FillResult<i32> {
            s.parse::<i32>().map_err(|_| {
                FormFillError::malformed_ocr_data(format!(
                    "TSV row {} has non-numeric {}: {:?}",
                    line_no, name, s
                ))
            })
        };

        left.push(parse(fields[6], "left")?);
        top.push(parse(fields[7], "top")?);
        width.push(parse(fields[8], "width")?);
        height.push(parse(fields[9], "height")?);
        text.push(fields.get(11).unwrap_or(&"").to_string());
    }

    WordBoxIndex::from_parallel(text, left, top, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    #[test]
    fn test_parse_tsv_words() {
        let tsv = format!(
            "{}\n1\t1\t0\t0\t0\t0\t0\t0\t800\t600\t-1\t\n5\t1\t1\t1\t1\t1\t10\t20\t60\t18\t96.5\tName:\n5\t1\t1\t1\t1\t2\t80\t20\t50\t18\t95.0\tJohn\n",
            HEADER
        );
        let index = parse_tsv_words(&tsv).unwrap();
        assert_eq!(index.len(), 3);
        // structural page row survives as an empty gap token
        assert_eq!(index.text(0), Some(""));
        assert_eq!(index.text(1), Some("Name:"));
        assert_eq!(index.bbox(2).unwrap().left, 80);
    }

    #[test]
    fn test_parse_tsv_rejects_non_numeric_geometry() {
        let tsv = format!("{}\n5\t1\t1\t1\t1\t1\tten\t20\t60\t18\t96.5\tName\n", HEADER);
        assert!(matches!(
            parse_tsv_words(&tsv),
            Err(FormFillError::MalformedOcrData { .. })
        ));
    }

    #[test]
    fn test_parse_tsv_word_row_without_text_field() {
        // Some builds omit the trailing text field entirely on gap rows.
        let tsv = format!("{}\n4\t1\t1\t1\t1\t0\t10\t20\t700\t18\t-1\n", HEADER);
        let index = parse_tsv_words(&tsv).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.text(0), Some(""));
    }

    #[test]
    fn test_unavailable_binary_probe() {
        let engine = TesseractCli::new(OcrConfig {
            tesseract_path: "/nonexistent/tesseract".to_string(),
            ..OcrConfig::default()
        });
        assert!(!engine.is_available());
    }
}
