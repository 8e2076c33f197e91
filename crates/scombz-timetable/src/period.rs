//! Period number extraction from a timetable row header.
//!
//! The LMS renders the row header in several shapes ("１", "1限", "第1時限",
//! "<span>1</span>"), so the period is resolved by trying each strategy of
//! [`PeriodStrategy::CHAIN`] in order. The first one yielding a non-zero
//! digit wins.

use tracing::debug;

/// Distance between a full-width digit (U+FF10..) and its ASCII form.
const FULLWIDTH_OFFSET: u32 = 0xFEE0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodStrategy {
    /// First character of the header markup.
    LeadingChar,
    /// Last character of the header markup.
    TrailingChar,
    /// First digit anywhere in the header's text content.
    FirstDigitInText,
}

impl PeriodStrategy {
    pub const CHAIN: [PeriodStrategy; 3] = [
        PeriodStrategy::LeadingChar,
        PeriodStrategy::TrailingChar,
        PeriodStrategy::FirstDigitInText,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PeriodStrategy::LeadingChar => "leading-char",
            PeriodStrategy::TrailingChar => "trailing-char",
            PeriodStrategy::FirstDigitInText => "first-digit-in-text",
        }
    }

    fn extract(self, markup: &str, text: &str) -> Option<i32> {
        match self {
            PeriodStrategy::LeadingChar => markup.chars().next().and_then(digit_value),
            PeriodStrategy::TrailingChar => markup.chars().next_back().and_then(digit_value),
            PeriodStrategy::FirstDigitInText => text.chars().find_map(digit_value),
        }
    }
}

/// Resolve the period from a header cell's inner markup and text content.
///
/// Returns the period together with the strategy that produced it, or `None`
/// when every strategy failed.
pub fn resolve_period(markup: &str, text: &str) -> Option<(i32, PeriodStrategy)> {
    let markup = markup.trim();
    for strategy in PeriodStrategy::CHAIN {
        match strategy.extract(markup, text) {
            Some(period) => {
                debug!(strategy = strategy.name(), period, "period resolved");
                return Some((period, strategy));
            }
            None => debug!(strategy = strategy.name(), header = markup, "period strategy missed"),
        }
    }
    None
}

/// Map a half- or full-width digit to its value. Zero counts as a miss.
pub fn digit_value(c: char) -> Option<i32> {
    let c = if ('０'..='９').contains(&c) {
        char::from_u32(c as u32 - FULLWIDTH_OFFSET)?
    } else {
        c
    };
    c.to_digit(10).filter(|&d| d != 0).map(|d| d as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fullwidth_digits_are_normalised() {
        assert_eq!(digit_value('２'), Some(2));
        assert_eq!(digit_value('９'), Some(9));
        assert_eq!(digit_value('7'), Some(7));
    }

    #[test]
    fn zero_and_non_digits_miss() {
        assert_eq!(digit_value('0'), None);
        assert_eq!(digit_value('０'), None);
        assert_eq!(digit_value('限'), None);
        assert_eq!(digit_value(' '), None);
    }

    #[test]
    fn leading_char_wins_when_present() {
        assert_eq!(
            resolve_period("２", "２"),
            Some((2, PeriodStrategy::LeadingChar))
        );
        assert_eq!(
            resolve_period("3限", "3限"),
            Some((3, PeriodStrategy::LeadingChar))
        );
    }

    #[test]
    fn trailing_char_fallback() {
        assert_eq!(
            resolve_period("第4", "第4"),
            Some((4, PeriodStrategy::TrailingChar))
        );
        assert_eq!(
            resolve_period("  時限５ ", "時限５"),
            Some((5, PeriodStrategy::TrailingChar))
        );
    }

    #[test]
    fn text_fallback_for_wrapped_markup() {
        assert_eq!(
            resolve_period("<span>6限</span>", "6限"),
            Some((6, PeriodStrategy::FirstDigitInText))
        );
    }

    #[test]
    fn all_strategies_miss() {
        assert_eq!(resolve_period("", ""), None);
        assert_eq!(resolve_period("集中", "集中"), None);
    }
}
