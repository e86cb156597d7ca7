//! Word-level OCR output for one page.
//!
//! OCR engines emit per-word results as index-aligned parallel arrays
//! (text, left, top, width, height). [`WordBoxIndex`] validates those arrays
//! once at construction and then exposes them as a single immutable sequence
//! of [`Word`]s in reading order. All downstream matching and placement
//! logic queries this index instead of touching raw arrays.

use crate::core::{FillResult, FormFillError};
use serde::{Deserialize, Serialize};

/// Pixel bounding box of one recognized word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordBox {
    /// Left edge in pixels.
    pub left: i32,
    /// Top edge in pixels.
    pub top: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl WordBox {
    /// Creates a new word box.
    #[inline]
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// X coordinate just past the right edge.
    #[inline]
    pub fn right(&self) -> i32 {
        self.left + self.width
    }
}

/// One OCR-recognized token on a page.
///
/// The text may be empty: OCR engines emit empty tokens for structural gaps
/// between words, and the matcher treats those as skippable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    /// Recognized text, trimmed. May be empty for gaps.
    pub text: String,
    /// Pixel bounding box.
    pub bbox: WordBox,
    /// Position in the page's reading-order sequence.
    pub index: usize,
}

/// Immutable reading-order sequence of recognized words for one page.
#[derive(Debug, Clone, Default)]
pub struct WordBoxIndex {
    words: Vec<Word>,
}

impl WordBoxIndex {
    /// Builds an index from the OCR engine's parallel arrays.
    ///
    /// Word text is trimmed; boxes are taken as-is. The arrays must all have
    /// the same length.
    ///
    /// # Errors
    ///
    /// Returns `FormFillError::MalformedOcrData` if any array length differs
    /// from the text array's length.
    pub fn from_parallel(
        text: Vec<String>,
        left: Vec<i32>,
        top: Vec<i32>,
        width: Vec<i32>,
        height: Vec<i32>,
    ) -> FillResult<Self> {
        let n = text.len();
        for (name, len) in [
            ("left", left.len()),
            ("top", top.len()),
            ("width", width.len()),
            ("height", height.len()),
        ] {
            if len != n {
                return Err(FormFillError::malformed_ocr_data(format!(
                    "text has {} entries but {} has {}",
                    n, name, len
                )));
            }
        }

        let words = text
            .into_iter()
            .enumerate()
            .map(|(index, t)| Word {
                text: t.trim().to_string(),
                bbox: WordBox::new(left[index], top[index], width[index], height[index]),
                index,
            })
            .collect();

        Ok(Self { words })
    }

    /// Number of words (including empty gap tokens).
    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if the page produced no words at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Word text at the given reading-order index.
    pub fn text(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(|w| w.text.as_str())
    }

    /// Bounding box at the given reading-order index.
    pub fn bbox(&self, index: usize) -> Option<WordBox> {
        self.words.get(index).map(|w| w.bbox)
    }

    /// Full word record at the given index.
    pub fn get(&self, index: usize) -> Option<&Word> {
        self.words.get(index)
    }

    /// Iterates over words in ascending reading order.
    pub fn iter(&self) -> impl Iterator<Item = &Word> {
        self.words.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> WordBoxIndex {
        WordBoxIndex::from_parallel(
            vec!["Name:".to_string(), " John ".to_string(), String::new()],
            vec![10, 80, 150],
            vec![20, 20, 20],
            vec![60, 50, 5],
            vec![18, 18, 18],
        )
        .unwrap()
    }

    #[test]
    fn test_from_parallel_trims_and_indexes() {
        let index = sample_index();
        assert_eq!(index.len(), 3);
        assert_eq!(index.text(0), Some("Name:"));
        assert_eq!(index.text(1), Some("John"));
        assert_eq!(index.text(2), Some(""));
        assert_eq!(index.bbox(1), Some(WordBox::new(80, 20, 50, 18)));
        let indices: Vec<usize> = index.iter().map(|w| w.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_mismatched_arrays_are_rejected() {
        let result = WordBoxIndex::from_parallel(
            vec!["a".to_string(), "b".to_string()],
            vec![0],
            vec![0, 0],
            vec![1, 1],
            vec![1, 1],
        );
        match result {
            Err(FormFillError::MalformedOcrData { message }) => {
                assert!(message.contains("left"));
            }
            other => panic!("expected MalformedOcrData, got {:?}", other.map(|i| i.len())),
        }
    }

    #[test]
    fn test_out_of_range_lookups_return_none() {
        let index = sample_index();
        assert!(index.text(3).is_none());
        assert!(index.bbox(99).is_none());
    }
}
