//! Fill-run statistics.

use std::fmt;

/// Aggregate counters for one autofill run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillStats {
    /// Pages the run attempted.
    pub pages_processed: usize,
    /// Pages skipped because OCR failed or returned malformed data.
    pub pages_failed: usize,
    /// Values matched and positioned (one per fill event).
    pub fields_filled: usize,
    /// Values actually inked. Lags `fields_filled` only in the fontless
    /// degradation, where positions are resolved but nothing is drawn.
    pub fields_drawn: usize,
    /// Instructions skipped because their label was not found or their
    /// value was empty.
    pub fields_skipped: usize,
}

impl FillStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one page's outcome.
    pub fn record_page(&mut self, instructions: usize, filled: usize, drawn: usize) {
        self.pages_processed += 1;
        self.fields_filled += filled;
        self.fields_drawn += drawn;
        self.fields_skipped += instructions.saturating_sub(filled);
    }

    /// Records a page whose OCR could not be used.
    pub fn record_failed_page(&mut self) {
        self.pages_processed += 1;
        self.pages_failed += 1;
    }

    /// Fraction of attempted fields that were actually drawn, as a
    /// percentage (0.0 to 100.0).
    pub fn fill_rate(&self) -> f64 {
        let attempted = self.fields_filled + self.fields_skipped;
        if attempted == 0 {
            0.0
        } else {
            (self.fields_filled as f64 / attempted as f64) * 100.0
        }
    }
}

impl fmt::Display for FillStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Fill Statistics:")?;
        writeln!(f, "  Pages processed: {}", self.pages_processed)?;
        writeln!(f, "  Pages failed: {}", self.pages_failed)?;
        writeln!(
            f,
            "  Fields filled: {} ({:.1}%)",
            self.fields_filled,
            self.fill_rate()
        )?;
        if self.fields_drawn < self.fields_filled {
            writeln!(
                f,
                "  Fields drawn: {} (no font for the rest)",
                self.fields_drawn
            )?;
        }
        writeln!(f, "  Fields skipped: {}", self.fields_skipped)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_page_accumulates() {
        let mut stats = FillStats::new();
        stats.record_page(5, 3, 3);
        stats.record_page(5, 5, 5);
        stats.record_failed_page();

        assert_eq!(stats.pages_processed, 3);
        assert_eq!(stats.pages_failed, 1);
        assert_eq!(stats.fields_filled, 8);
        assert_eq!(stats.fields_drawn, 8);
        assert_eq!(stats.fields_skipped, 2);
        assert!((stats.fill_rate() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_fontless_pages_report_drawn_shortfall() {
        let mut stats = FillStats::new();
        stats.record_page(4, 3, 0);
        assert_eq!(stats.fields_filled, 3);
        assert_eq!(stats.fields_drawn, 0);
        let text = stats.to_string();
        assert!(text.contains("Fields drawn: 0"));
    }

    #[test]
    fn test_empty_stats_display() {
        let stats = FillStats::new();
        assert!((stats.fill_rate() - 0.0).abs() < f64::EPSILON);
        let text = stats.to_string();
        assert!(text.contains("Pages processed: 0"));
    }
}
