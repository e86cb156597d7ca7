//! Overlay rendering of fill values onto page images.
//!
//! For each fill instruction the renderer matches the label on the page,
//! resolves a pixel position, and draws the value there with a fixed-size
//! font. Work is best-effort: an instruction whose label is not found is
//! skipped with a diagnostic, and nothing aborts the page.
//!
//! Re-running the renderer over the same page draws the values again on top
//! of the first pass. There is no "already filled" detection; callers own
//! idempotence if they need it.

use crate::fill::{FillPosition, LabelVariantSet, find_label, resolve_fill_position};
use crate::ocr::WordBoxIndex;

use ab_glyph::FontVec;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use std::path::Path;
use tracing::{debug, info, warn};

const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// Estimated glyph width as a fraction of the font scale, used when no font
/// is available for measurement.
const FALLBACK_CHAR_WIDTH_FACTOR: f32 = 0.6;

/// One field to place on a page: the label to look for, the value to draw,
/// and the candidate spellings of the label.
///
/// Instructions are produced by the semantic field matcher and consumed
/// unchanged, once per field per page.
#[derive(Debug, Clone)]
pub struct FillInstruction {
    /// The field label as it appears on the document.
    pub label: String,
    /// The value to draw.
    pub value: String,
    /// Candidate spellings, in priority order.
    pub variants: LabelVariantSet,
}

impl FillInstruction {
    /// Creates an instruction with the standard derived variant set.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        let label = label.into();
        let variants = LabelVariantSet::derive(&label);
        Self {
            label,
            value: value.into(),
            variants,
        }
    }

    /// Creates an instruction with externally supplied variants.
    pub fn with_variants(
        label: impl Into<String>,
        value: impl Into<String>,
        variants: Vec<String>,
    ) -> Self {
        let label = label.into();
        let variants = LabelVariantSet::from_variants(&label, variants);
        Self {
            label,
            value: value.into(),
            variants,
        }
    }
}

/// The observable record of one fill: where a value was placed, and why.
/// Used for fill counts and diagnostics; not persisted.
#[derive(Debug, Clone)]
pub struct FillEvent {
    /// Zero-based page index within the document.
    pub page_index: usize,
    /// The instruction's field label.
    pub label: String,
    /// The resolved draw position.
    pub position: FillPosition,
    /// The value placed at the position.
    pub value: String,
    /// Whether ink was actually laid down. False in the fontless
    /// degradation, where values are matched and positioned but not drawn.
    pub drawn: bool,
}

/// Font and styling for drawn values.
///
/// The font size is fixed for a whole fill pass. When no font can be
/// loaded, values are still matched and positioned (widths fall back to a
/// character-count estimate) but nothing is drawn.
pub struct TextStyle {
    /// The font used for measuring and drawing. None skips drawing.
    pub font: Option<FontVec>,
    /// Fixed font scale in pixels.
    pub scale: f32,
    /// Ink color.
    pub color: Rgb<u8>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: None,
            scale: 22.0,
            color: TEXT_COLOR,
        }
    }
}

impl TextStyle {
    /// Loads a font from the given path.
    ///
    /// # Errors
    ///
    /// Returns `FormFillError::Font` if the file cannot be read or parsed.
    pub fn with_font_path(font_path: &Path, scale: f32) -> crate::core::FillResult<Self> {
        let font_data = std::fs::read(font_path)?;
        let font = FontVec::try_from_vec(font_data).map_err(|_| {
            crate::core::FormFillError::font(format!(
                "failed to parse font file: {}",
                font_path.display()
            ))
        })?;

        Ok(Self {
            font: Some(font),
            scale,
            color: TEXT_COLOR,
        })
    }

    /// Probes common system font locations, falling back to a fontless
    /// style if none can be loaded.
    pub fn with_system_font(scale: f32) -> Self {
        let font_paths = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/System/Library/Fonts/Arial.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
        ];

        for path in &font_paths {
            if let Ok(font_data) = std::fs::read(path) {
                if let Ok(font) = FontVec::try_from_vec(font_data) {
                    info!("Loaded system font: {}", path);
                    return Self {
                        font: Some(font),
                        scale,
                        color: TEXT_COLOR,
                    };
                }
            }
        }

        warn!("No system font found; values will be positioned but not drawn");
        Self {
            scale,
            ..Self::default()
        }
    }
}

/// Measures the pixel width of a value at the style's scale.
///
/// Sums per-glyph advance widths when a font is loaded. Without a font the
/// width degrades to `char count x scale x 0.6`, which keeps underscore
/// centering usable.
pub fn measure_value_width(text: &str, style: &TextStyle) -> i32 {
    match &style.font {
        Some(font) => {
            use ab_glyph::{Font, ScaleFont};

            let scaled_font = font.as_scaled(style.scale);
            let width: f32 = text
                .chars()
                .map(|ch| {
                    let glyph = scaled_font.scaled_glyph(ch);
                    scaled_font.h_advance(glyph.id)
                })
                .sum();
            width.round() as i32
        }
        None => {
            (text.chars().count() as f32 * style.scale * FALLBACK_CHAR_WIDTH_FACTOR).round() as i32
        }
    }
}

/// Fills one page: for every instruction, match the label, resolve a
/// position, and draw the value. Returns the page's fill events; the fill
/// count is their length.
///
/// Instructions whose label does not occur on the page are skipped with a
/// diagnostic. No failure aborts the remaining instructions.
pub fn fill_page(
    page: &mut RgbImage,
    index: &WordBoxIndex,
    instructions: &[FillInstruction],
    style: &TextStyle,
    page_index: usize,
) -> Vec<FillEvent> {
    let mut events = Vec::new();

    for instruction in instructions {
        let value = instruction.value.trim();
        if value.is_empty() {
            debug!("skipping '{}': empty value", instruction.label);
            continue;
        }

        let Some(terminal) = find_label(index, &instruction.variants) else {
            debug!(
                "label '{}' (all {} variants) not found on page {}",
                instruction.label,
                instruction.variants.len(),
                page_index + 1
            );
            continue;
        };
        // The matcher only returns indices it read from the same sequence.
        let Some(terminal_word) = index.get(terminal) else {
            continue;
        };

        let value_width = measure_value_width(value, style);
        let position = resolve_fill_position(index, terminal_word, value_width);

        let drawn = style.font.is_some();
        if let Some(font) = &style.font {
            draw_text_mut(
                page,
                style.color,
                position.x,
                position.y,
                style.scale,
                font,
                value,
            );
        }

        debug!(
            "{} '{}' = '{}' at ({}, {}) via {:?}",
            if drawn { "filled" } else { "positioned" },
            instruction.label,
            value,
            position.x,
            position.y,
            position.rule
        );

        events.push(FillEvent {
            page_index,
            label: instruction.label.clone(),
            position,
            value: value.to_string(),
            drawn,
        });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fill::FillRule;

    fn page_index() -> WordBoxIndex {
        WordBoxIndex::from_parallel(
            vec![
                "Name:".to_string(),
                "Phone".to_string(),
                ":".to_string(),
                "____".to_string(),
            ],
            vec![10, 10, 70, 100],
            vec![20, 60, 60, 100],
            vec![55, 55, 8, 80],
            vec![20, 20, 20, 20],
        )
        .unwrap()
    }

    #[test]
    fn test_fill_page_records_events_per_instruction() {
        let index = page_index();
        let mut page = RgbImage::new(400, 200);
        let style = TextStyle::default();
        let instructions = vec![
            FillInstruction::new("Name", "John Smith"),
            FillInstruction::new("Phone", "+1-234-567-8900"),
            FillInstruction::new("Email", "john@example.com"),
        ];

        let events = fill_page(&mut page, &index, &instructions, &style, 0);
        // "Email" does not occur on the page and is skipped, not an error.
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].label, "Name");
        assert_eq!(events[0].position.rule, FillRule::AfterLabelColon);
        assert_eq!(events[1].label, "Phone");
        assert_eq!(events[1].position.rule, FillRule::AfterIndicator);
    }

    fn bundled_font_style() -> TextStyle {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/fonts/DejaVuSans.ttf");
        TextStyle::with_font_path(&path, 22.0).unwrap()
    }

    #[test]
    fn test_fill_page_is_not_idempotent() {
        // Two passes over the same page produce two full sets of events;
        // values are drawn twice by design (no already-filled detection).
        let index = page_index();
        let mut page = RgbImage::from_pixel(400, 200, Rgb([255, 255, 255]));
        let style = bundled_font_style();
        let instructions = vec![FillInstruction::new("Name", "John Smith")];

        let blank = page.clone();
        let first = fill_page(&mut page, &index, &instructions, &style, 0);
        let after_first = page.clone();
        let second = fill_page(&mut page, &index, &instructions, &style, 0);

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert!(first[0].drawn && second[0].drawn);
        assert_eq!(first[0].position, second[0].position);

        // The first pass inks the page, and anti-aliased glyphs drawn over
        // themselves darken the blend, so the second pass changes pixels
        // rather than being a no-op.
        assert_ne!(blank.as_raw(), after_first.as_raw());
        assert_ne!(after_first.as_raw(), page.as_raw());
    }

    #[test]
    fn test_fontless_events_are_tagged_not_drawn() {
        let index = page_index();
        let mut page = RgbImage::new(400, 200);
        let untouched = page.clone();
        let style = TextStyle::default();
        let instructions = vec![FillInstruction::new("Name", "John Smith")];

        let events = fill_page(&mut page, &index, &instructions, &style, 0);
        assert_eq!(events.len(), 1);
        assert!(!events[0].drawn);
        assert_eq!(untouched.as_raw(), page.as_raw());
    }

    #[test]
    fn test_empty_value_is_skipped() {
        let index = page_index();
        let mut page = RgbImage::new(400, 200);
        let style = TextStyle::default();
        let instructions = vec![FillInstruction::new("Name", "   ")];

        let events = fill_page(&mut page, &index, &instructions, &style, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_measure_width_fallback_estimate() {
        let style = TextStyle::default();
        assert_eq!(measure_value_width("abcd", &style), (4.0 * 22.0 * 0.6) as i32);
        assert_eq!(measure_value_width("", &style), 0);
    }
}
