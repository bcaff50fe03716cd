// Lenient text codec for lap and finish times

use std::fmt;

/// Placeholder shown wherever a time is missing, zero or unreadable.
pub const UNSET_DISPLAY: &str = "--:--.---";

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60_000;

/// A duration in whole milliseconds.
///
/// Parsing never fails: anything that cannot be read as a time collapses to
/// [`TimeValue::UNSET`], which is also what a genuine zero looks like. Callers
/// test [`TimeValue::is_set`] instead of handling an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeValue(u64);

impl TimeValue {
    pub const UNSET: TimeValue = TimeValue(0);

    pub fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    pub fn millis(self) -> u64 {
        self.0
    }

    pub fn is_set(self) -> bool {
        self.0 > 0
    }

    /// Parse `M:SS.mmm` or `SS.mmm`.
    ///
    /// The fraction is taken as a literal millisecond count, so `"1.5"` is
    /// 1005 ms, not 1500 ms. More than one `:` makes the whole value unset;
    /// any other unreadable component counts as zero.
    pub fn parse(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::UNSET;
        }

        let parts: Vec<&str> = text.split(':').collect();
        let (minutes, seconds_and_fraction) = match parts.as_slice() {
            [seconds] => (0, *seconds),
            [minutes, seconds] => (leading_int(minutes), *seconds),
            _ => return Self::UNSET,
        };

        let mut fields = seconds_and_fraction.split('.');
        let seconds = fields.next().map(leading_int).unwrap_or(0);
        let fraction = fields.next().map(leading_int).unwrap_or(0);

        Self(
            minutes
                .saturating_mul(MS_PER_MINUTE)
                .saturating_add(seconds.saturating_mul(MS_PER_SECOND))
                .saturating_add(fraction),
        )
    }

    /// Display form: the placeholder when unset, the raw form otherwise.
    pub fn display(self) -> String {
        if self.is_set() {
            self.to_string()
        } else {
            UNSET_DISPLAY.to_string()
        }
    }

    pub fn checked_sub(self, other: TimeValue) -> Option<TimeValue> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_add(self, other: TimeValue) -> TimeValue {
        Self(self.0.saturating_add(other.0))
    }
}

/// Raw form. Zero renders as `0.000`, never as the placeholder.
impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "0.000");
        }
        let minutes = self.0 / MS_PER_MINUTE;
        let seconds = (self.0 % MS_PER_MINUTE) / MS_PER_SECOND;
        let millis = self.0 % MS_PER_SECOND;
        if minutes > 0 {
            write!(f, "{minutes}:{seconds:02}.{millis:03}")
        } else {
            write!(f, "{seconds}.{millis:03}")
        }
    }
}

/// Format a stored time string for display, mapping anything that does not
/// parse to a positive value onto [`UNSET_DISPLAY`].
pub fn display_time(text: &str) -> String {
    TimeValue::parse(text).display()
}

/// Leading decimal digits after optional whitespace; anything else is zero.
fn leading_int(text: &str) -> u64 {
    let digits = text.trim_start();
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_minutes_and_seconds() {
        assert_eq!(TimeValue::parse("1:30.000").millis(), 90_000);
        assert_eq!(TimeValue::parse("1:05.250").millis(), 65_250);
        assert_eq!(TimeValue::parse("2:00").millis(), 120_000);
    }

    #[test]
    fn test_parse_seconds_only() {
        assert_eq!(TimeValue::parse("1.500").millis(), 1_500);
        assert_eq!(TimeValue::parse("20.000").millis(), 20_000);
        assert_eq!(TimeValue::parse("42").millis(), 42_000);
    }

    #[test]
    fn test_fraction_is_not_scaled() {
        assert_eq!(TimeValue::parse("1.5").millis(), 1_005);
        assert_eq!(TimeValue::parse("1.50").millis(), 1_050);
        assert_eq!(TimeValue::parse("0:10.7").millis(), 10_007);
    }

    #[test]
    fn test_parse_blank_is_unset() {
        assert_eq!(TimeValue::parse(""), TimeValue::UNSET);
        assert_eq!(TimeValue::parse("   "), TimeValue::UNSET);
        assert_eq!(TimeValue::parse("\t\n"), TimeValue::UNSET);
    }

    #[test]
    fn test_parse_too_many_colons_is_unset() {
        assert_eq!(TimeValue::parse("1:02:03.456"), TimeValue::UNSET);
        assert_eq!(TimeValue::parse("::"), TimeValue::UNSET);
    }

    #[test]
    fn test_parse_non_numeric_components_are_zero() {
        assert_eq!(TimeValue::parse("abc"), TimeValue::UNSET);
        assert_eq!(TimeValue::parse("x:30.000").millis(), 30_000);
        assert_eq!(TimeValue::parse("1:xx.250").millis(), 60_250);
        assert_eq!(TimeValue::parse("1:30.abc").millis(), 90_000);
        assert_eq!(TimeValue::parse("-5.000"), TimeValue::UNSET);
    }

    #[test]
    fn test_parse_ignores_trailing_garbage() {
        assert_eq!(TimeValue::parse("12s.3ms").millis(), 12_003);
        assert_eq!(TimeValue::parse(" 1: 05.100").millis(), 65_100);
        assert_eq!(TimeValue::parse("1.2.3").millis(), 1_002);
    }

    #[test]
    fn test_parse_saturates_instead_of_overflowing() {
        let huge = TimeValue::parse("99999999999999999999999:00.000");
        assert_eq!(huge.millis(), u64::MAX);
    }

    #[test]
    fn test_raw_format() {
        assert_eq!(TimeValue::from_millis(90_000).to_string(), "1:30.000");
        assert_eq!(TimeValue::from_millis(1_500).to_string(), "1.500");
        assert_eq!(TimeValue::from_millis(25_000).to_string(), "25.000");
        assert_eq!(TimeValue::from_millis(61_005).to_string(), "1:01.005");
        assert_eq!(TimeValue::from_millis(7).to_string(), "0.007");
    }

    #[test]
    fn test_raw_format_zero() {
        assert_eq!(TimeValue::UNSET.to_string(), "0.000");
    }

    #[test]
    fn test_display_placeholder() {
        assert_eq!(display_time(""), UNSET_DISPLAY);
        assert_eq!(display_time("0"), UNSET_DISPLAY);
        assert_eq!(display_time("0:00.000"), UNSET_DISPLAY);
        assert_eq!(display_time("garbage"), UNSET_DISPLAY);
        assert_eq!(display_time("1:2:3"), UNSET_DISPLAY);
        assert_eq!(TimeValue::UNSET.display(), UNSET_DISPLAY);
    }

    #[test]
    fn test_display_normalizes_input() {
        assert_eq!(display_time("1:30.000"), "1:30.000");
        assert_eq!(display_time("90.000"), "1:30.000");
        assert_eq!(display_time("1.5"), "1.005");
        assert_eq!(display_time("0:45.123"), "45.123");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_raw_format_parses_back(ms in 1u64..100_000_000u64) {
            // The raw formatter always pads the fraction to three digits, so
            // reading those digits literally reproduces the leftover millis.
            let text = TimeValue::from_millis(ms).to_string();
            prop_assert_eq!(TimeValue::parse(&text).millis(), ms);
        }

        #[test]
        fn prop_display_never_shows_zero(text in "[0:. ]{0,8}") {
            prop_assert_eq!(display_time(&text), UNSET_DISPLAY);
        }

        #[test]
        fn prop_parse_never_panics(text in ".{0,32}") {
            let _ = TimeValue::parse(&text);
        }
    }
}
