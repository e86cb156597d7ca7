//! Label matching over a page's word sequence.
//!
//! Given a [`LabelVariantSet`] and a [`WordBoxIndex`], finds the terminal
//! word of the first occurrence of the label in reading order. This is a
//! pure function over the immutable word sequence; "not found" is a normal
//! `None` outcome, not an error.
//!
//! Matching policy:
//!
//! - Variants are tried in the set's fixed order, and each variant is
//!   searched to exhaustion before the next is considered. The first variant
//!   that matches anywhere wins, even if a later variant occurs earlier on
//!   the page (spelling priority over position).
//! - Single-word variants match under three equivalence rules: exact,
//!   case-insensitive, case-insensitive with trailing colons stripped from
//!   both sides. The page is scanned once and all three rules are tried at
//!   each word; the first index any rule satisfies wins.
//! - Multi-word variants match windows of consecutive words under the
//!   colon-stripped case-insensitive rule. Empty tokens inside the window
//!   are gaps and are skipped, except that a gap cannot stand in for the
//!   final expected token. Any other mismatch aborts the window.
//! - No fuzzy or edit-distance matching of any kind.

use crate::fill::LabelVariantSet;
use crate::ocr::WordBoxIndex;

/// Finds the first occurrence of any variant of a label.
///
/// Returns the reading-order index of the matched occurrence's terminal
/// word (the last non-empty word of the matched window), or `None` if no
/// variant matches anywhere on the page.
pub fn find_label(index: &WordBoxIndex, variants: &LabelVariantSet) -> Option<usize> {
    for variant in variants.iter() {
        let tokens: Vec<&str> = variant.split_whitespace().collect();
        let terminal = match tokens.len() {
            0 => None,
            1 => find_single_word(index, tokens[0]),
            _ => find_multi_word(index, &tokens),
        };
        if terminal.is_some() {
            return terminal;
        }
    }
    None
}

/// Scans for a single-word variant.
///
/// One pass over the page; at each word all three equivalence rules are
/// tried, so the earliest occurrence wins no matter which rule it matches
/// under.
fn find_single_word(index: &WordBoxIndex, variant: &str) -> Option<usize> {
    index
        .iter()
        .find(|w| {
            let word = w.text.as_str();
            word == variant
                || word.to_lowercase() == variant.to_lowercase()
                || normalize(word) == normalize(variant)
        })
        .map(|w| w.index)
}

/// Scans windows of consecutive words for a multi-word variant. The first
/// (lowest start index) matching window wins.
fn find_multi_word(index: &WordBoxIndex, expected: &[&str]) -> Option<usize> {
    let n = index.len();
    for start in 0..n {
        if let Some(end) = match_window(index, start, expected) {
            // Terminal is the last non-empty token of the window.
            let terminal = (start..=end)
                .rev()
                .find(|&i| !index.text(i).unwrap_or("").is_empty());
            if terminal.is_some() {
                return terminal;
            }
        }
    }
    None
}

/// Attempts to match every expected token against consecutive words starting
/// at `start`. Returns the index of the last word consumed on success.
fn match_window(index: &WordBoxIndex, start: usize, expected: &[&str]) -> Option<usize> {
    let mut pos = start;
    let mut matched = 0;

    while matched < expected.len() {
        let actual = index.text(pos)?;
        if normalize(actual) == normalize(expected[matched]) {
            matched += 1;
            pos += 1;
        } else if actual.is_empty() && matched < expected.len() - 1 {
            // Gap between words; it cannot stand in for the final token.
            pos += 1;
        } else {
            return None;
        }
    }

    Some(pos - 1)
}

/// The colon-stripped case-insensitive normal form used for token equality.
fn normalize(token: &str) -> String {
    token.trim_end_matches(':').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(words: &[&str]) -> WordBoxIndex {
        let n = words.len();
        WordBoxIndex::from_parallel(
            words.iter().map(|w| w.to_string()).collect(),
            (0..n as i32).map(|i| i * 100).collect(),
            vec![0; n],
            vec![80; n],
            vec![20; n],
        )
        .unwrap()
    }

    #[test]
    fn test_single_word_colon_stripped_match() {
        let index = index_of(&["Name:", "John"]);
        let variants = LabelVariantSet::from_variants(
            "Name",
            vec!["Name".to_string(), "Name:".to_string()],
        );
        assert_eq!(find_label(&index, &variants), Some(0));
    }

    #[test]
    fn test_single_word_case_insensitive_match() {
        let index = index_of(&["Phone", "NAME"]);
        let variants = LabelVariantSet::derive("name");
        assert_eq!(find_label(&index, &variants), Some(1));
    }

    #[test]
    fn test_multi_word_match_terminal_is_last_label_word() {
        let index = index_of(&["Date", "of", "Birth", ":"]);
        let variants = LabelVariantSet::from_variants("Date of Birth", vec![]);
        assert_eq!(find_label(&index, &variants), Some(2));
    }

    #[test]
    fn test_multi_word_skips_interior_gap() {
        let index = index_of(&["Date", "", "of", "Birth", ":"]);
        let variants = LabelVariantSet::from_variants("Date of Birth", vec![]);
        assert_eq!(find_label(&index, &variants), Some(3));
    }

    #[test]
    fn test_gap_cannot_stand_for_final_token() {
        // "Birth" never appears; the trailing gap must not satisfy it.
        let index = index_of(&["Date", "of", ""]);
        let variants = LabelVariantSet::from_variants("Date of Birth", vec![]);
        assert_eq!(find_label(&index, &variants), None);
    }

    #[test]
    fn test_single_word_earliest_index_wins_across_rules() {
        // "name:" at index 0 only matches under colon stripping, while the
        // later "NAME" matches case-insensitively; the earlier index still
        // wins because all rules are tried at each word in one scan.
        let index = index_of(&["name:", "NAME"]);
        let variants = LabelVariantSet::from_variants("NAME", vec![]);
        assert_eq!(find_label(&index, &variants), Some(0));
    }

    #[test]
    fn test_single_word_looser_rule_does_not_lose_to_later_exact() {
        let index = index_of(&["Name:", "Smith", "Name", "_____"]);
        let variants = LabelVariantSet::from_variants(
            "Name",
            vec!["Name".to_string(), "Name:".to_string()],
        );
        // The colon-stripped match at index 0 beats the exact one at 2.
        assert_eq!(find_label(&index, &variants), Some(0));
    }

    #[test]
    fn test_distinct_spellings_respect_listing_order() {
        // "Sex:" appears before "Gender" on the page, but "Gender" is listed
        // first in the variant set and must win.
        let variants = LabelVariantSet::from_variants(
            "Gender",
            vec!["Gender".to_string(), "Sex:".to_string()],
        );
        let page = index_of(&["Sex:", "M", "Gender", ":"]);
        assert_eq!(find_label(&page, &variants), Some(2));
    }

    #[test]
    fn test_not_found() {
        let index = index_of(&["Address", ":", "Elm", "Street"]);
        let variants = LabelVariantSet::derive("Phone");
        assert_eq!(find_label(&index, &variants), None);
    }

    #[test]
    fn test_first_window_wins_on_repeated_labels() {
        let index = index_of(&["Full", "Name", ":", "Full", "Name", ":"]);
        let variants = LabelVariantSet::from_variants("Full Name", vec![]);
        assert_eq!(find_label(&index, &variants), Some(1));
    }
}
