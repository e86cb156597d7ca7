//! Label variant sets.
//!
//! A field label printed on a form may appear with or without a trailing
//! colon and in different casing. A [`LabelVariantSet`] is the ordered list
//! of candidate spellings tried by the matcher. Order matters: the first
//! variant that matches anywhere on a page wins, even if a later variant
//! would match earlier in reading order.

use itertools::Itertools;

/// Ordered, de-duplicated candidate spellings for one logical field label.
///
/// Invariant: the literal label is always present, duplicates are removed,
/// and the original derivation order is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelVariantSet {
    variants: Vec<String>,
}

impl LabelVariantSet {
    /// Derives the standard variant list for a label: the literal spelling,
    /// the colon-stripped spelling, colon-stripped plus a colon, and the
    /// lowercase forms of the latter two.
    pub fn derive(label: &str) -> Self {
        let stripped = label.trim_end_matches(':');
        let variants = [
            label.to_string(),
            stripped.to_string(),
            format!("{}:", stripped),
            stripped.to_lowercase(),
            format!("{}:", stripped.to_lowercase()),
        ]
        .into_iter()
        .filter(|v| !v.trim().is_empty())
        .unique()
        .collect();

        Self { variants }
    }

    /// Builds a set from externally supplied variants, still guaranteeing
    /// de-duplication and the presence of the literal label.
    pub fn from_variants(label: &str, variants: Vec<String>) -> Self {
        let variants = std::iter::once(label.to_string())
            .chain(variants)
            .filter(|v| !v.trim().is_empty())
            .unique()
            .collect();
        Self { variants }
    }

    /// Variants in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(String::as_str)
    }

    /// Number of distinct variants.
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// A variant set derived from a non-empty label is never empty.
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_order_and_dedup() {
        let set = LabelVariantSet::derive("Name:");
        let variants: Vec<&str> = set.iter().collect();
        assert_eq!(variants, vec!["Name:", "Name", "name", "name:"]);
    }

    #[test]
    fn test_derive_lowercase_label_collapses() {
        let set = LabelVariantSet::derive("email");
        let variants: Vec<&str> = set.iter().collect();
        assert_eq!(variants, vec!["email", "email:"]);
    }

    #[test]
    fn test_literal_label_always_first() {
        let set = LabelVariantSet::from_variants(
            "Date of Birth",
            vec!["date of birth".to_string(), "Date of Birth".to_string()],
        );
        let variants: Vec<&str> = set.iter().collect();
        assert_eq!(variants, vec!["Date of Birth", "date of birth"]);
    }

    #[test]
    fn test_blank_variants_are_dropped() {
        let set = LabelVariantSet::from_variants("Age", vec!["  ".to_string(), "age".to_string()]);
        let variants: Vec<&str> = set.iter().collect();
        assert_eq!(variants, vec!["Age", "age"]);
    }
}
