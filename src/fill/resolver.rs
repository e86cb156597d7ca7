//! Fill-position resolution.
//!
//! Once a label's terminal word is known, the resolver decides where on the
//! page the value should be drawn. The decision logic is an explicit
//! priority-ordered rule list rather than nested conditionals: rules are
//! evaluated top to bottom and the first applicable rule produces the
//! position. The final rule is unconditional, so resolution always succeeds.
//!
//! Rules, in order:
//!
//! 1. The terminal word itself ends with a colon: place just after it.
//! 2. The terminal word is an underscore run: center the value over it.
//! 3. Look ahead up to three words for a fill indicator (a token starting
//!    with `:`, `.` or `_`, or consisting only of `_ : . -`). Underscore
//!    indicators center the value; colon/period indicators place it just
//!    after. Ordinary alphanumeric text aborts the lookahead: it is the
//!    start of something else, not a blank.
//! 4. Fallback: place just after the terminal word.

use crate::ocr::{Word, WordBox, WordBoxIndex};
use once_cell::sync::Lazy;
use regex::Regex;

/// Horizontal gap after a label's own trailing colon.
const AFTER_LABEL_GAP: i32 = 10;

/// Horizontal gap after a standalone colon/period indicator.
const AFTER_INDICATOR_GAP: i32 = 5;

/// How many words past the terminal word are inspected for an indicator.
const LOOKAHEAD_WORDS: usize = 3;

/// Tokens made only of blank-line punctuation (underscores, colons, periods,
/// dashes).
static INDICATOR_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[_:.\-]+$").expect("valid regex"));

/// Ordinary text: the start of the next field or sentence, not a blank.
static PLAIN_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\s]+$").expect("valid regex"));

/// Which rule produced a fill position. Kept on the position for
/// diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillRule {
    /// The label's terminal word ends with a colon.
    AfterLabelColon,
    /// The label's terminal word is itself an underscore run.
    CenteredOnLabel,
    /// A lookahead underscore run was found; the value is centered over it.
    CenteredOnIndicator,
    /// A lookahead colon/period indicator was found; the value goes after it.
    AfterIndicator,
    /// No indicator anywhere; the value goes right after the terminal word.
    FallbackAfterLabel,
}

/// A resolved pixel position for drawing a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillPosition {
    /// X pixel coordinate of the draw origin.
    pub x: i32,
    /// Y pixel coordinate of the draw origin.
    pub y: i32,
    /// The rule that produced this position.
    pub rule: FillRule,
}

/// Computes where to draw a value for a matched label.
///
/// `terminal` is the label's terminal word as returned by the matcher, and
/// `value_width` the measured pixel width of the value to draw (used only
/// for centering over underscore runs). This function never fails; the
/// fallback rule guarantees a position.
pub fn resolve_fill_position(
    index: &WordBoxIndex,
    terminal: &Word,
    value_width: i32,
) -> FillPosition {
    // Rule 1: the label carries its own colon.
    if terminal.text.ends_with(':') {
        return after_box(terminal.bbox, AFTER_LABEL_GAP, FillRule::AfterLabelColon);
    }

    // Rule 2: the label word is an underscore run (a pre-printed blank that
    // OCR glued onto the label token).
    if terminal.text.contains('_') && terminal.text.len() > 1 {
        return centered_on_box(terminal.bbox, value_width, FillRule::CenteredOnLabel);
    }

    // Rule 3: short lookahead for a fill indicator.
    for offset in 1..=LOOKAHEAD_WORDS {
        let Some(word) = index.get(terminal.index + offset) else {
            break;
        };
        let token = word.text.as_str();
        if token.is_empty() {
            continue;
        }

        if is_fill_indicator(token) {
            if token.contains('_') && token.len() > 1 {
                return centered_on_box(word.bbox, value_width, FillRule::CenteredOnIndicator);
            }
            return after_box(word.bbox, AFTER_INDICATOR_GAP, FillRule::AfterIndicator);
        }

        if PLAIN_TEXT.is_match(token) {
            // Ordinary text: the blank (if any) is elsewhere.
            break;
        }
    }

    // Rule 4: unconditional fallback.
    after_box(terminal.bbox, AFTER_LABEL_GAP, FillRule::FallbackAfterLabel)
}

/// Returns true if a token signals the start of a blank to fill.
fn is_fill_indicator(token: &str) -> bool {
    token.starts_with(':')
        || token.starts_with('.')
        || token.starts_with('_')
        || INDICATOR_RUN.is_match(token)
}

/// Position just past the right edge of a box, nudged down by 20% of its
/// height to sit on the writing line.
fn after_box(bbox: WordBox, gap: i32, rule: FillRule) -> FillPosition {
    FillPosition {
        x: bbox.right() + gap,
        y: bbox.top + frac_of_height(bbox.height, 0.2),
        rule,
    }
}

/// Position centered horizontally over a box (clamped so the value never
/// starts left of the box), nudged down by 10% of the box height.
fn centered_on_box(bbox: WordBox, value_width: i32, rule: FillRule) -> FillPosition {
    FillPosition {
        x: bbox.left + ((bbox.width - value_width) / 2).max(0),
        y: bbox.top + frac_of_height(bbox.height, 0.1),
        rule,
    }
}

fn frac_of_height(height: i32, frac: f32) -> i32 {
    (height as f32 * frac).round() as i32
}
