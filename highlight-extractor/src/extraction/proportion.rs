//! Highlighted-to-total text ratio.

/// Character count of recognized text, ignoring leading and trailing whitespace.
///
/// Counts Unicode scalar values, not bytes.
pub fn text_length(text: &str) -> usize {
    text.trim().chars().count()
}

/// Percentage of recognized characters that came from highlighted regions.
///
/// Defined as exactly 0 when no text was recognized at all. The result is not
/// clamped: recognition noise on the masked raster can push it above 100.
pub fn proportion(total_length: usize, highlighted_length: usize) -> f64 {
    if total_length == 0 {
        return 0.0;
    }
    highlighted_length as f64 / total_length as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_length_trims_whitespace() {
        assert_eq!(text_length("  ABCDE\n\n"), 5);
        assert_eq!(text_length("AB CD"), 5);
        assert_eq!(text_length("\u{c}\n \t"), 0);
        assert_eq!(text_length(""), 0);
    }

    #[test]
    fn test_text_length_counts_characters_not_bytes() {
        assert_eq!(text_length("naïve"), 5);
        assert_eq!(text_length("日本語"), 3);
    }

    #[test]
    fn test_half_highlighted() {
        assert_eq!(proportion(10, 5), 50.0);
    }

    #[test]
    fn test_nothing_highlighted() {
        assert_eq!(proportion(42, 0), 0.0);
    }

    #[test]
    fn test_empty_total_is_zero() {
        assert_eq!(proportion(0, 0), 0.0);
        assert_eq!(proportion(0, 7), 0.0);
    }

    #[test]
    fn test_not_clamped_above_hundred() {
        assert_eq!(proportion(4, 5), 125.0);
    }

    #[test]
    fn test_non_negative_for_any_lengths() {
        for total in 0..20 {
            for highlighted in 0..20 {
                let p = proportion(total, highlighted);
                assert!(p >= 0.0 && p.is_finite(), "{} / {} gave {}", highlighted, total, p);
            }
        }
    }
}
