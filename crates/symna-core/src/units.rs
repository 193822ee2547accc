//! Engineering units and SI prefix handling.

/// Multipliers for the recognized suffixes, longest match first.
const SUFFIXES: &[(&str, f64)] = &[
    ("MEG", 1e6),
    ("MIL", 25.4e-6),
    ("T", 1e12),
    ("G", 1e9),
    ("K", 1e3),
    ("M", 1e-3),
    ("U", 1e-6),
    ("N", 1e-9),
    ("P", 1e-12),
    ("F", 1e-15),
];

/// Parse a netlist value with an optional engineering suffix.
///
/// The mantissa is an optional sign, digits with an optional decimal point,
/// and an optional exponent. The letters right after it form the suffix,
/// compared case-insensitively against:
/// - T (tera, 1e12)
/// - G (giga, 1e9)
/// - MEG (mega, 1e6)
/// - K (kilo, 1e3)
/// - M (milli, 1e-3)
/// - MIL (25.4e-6)
/// - U (micro, 1e-6)
/// - N (nano, 1e-9)
/// - P (pico, 1e-12)
/// - F (femto, 1e-15)
///
/// Any other suffix multiplies by 1. Returns `None` when there is no
/// mantissa or it is not a number.
pub fn parse_value(s: &str) -> Option<f64> {
    let s = s.trim().to_uppercase();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
        end += 1;
    }
    if end == digits_start {
        return None;
    }

    // An exponent needs at least one digit, otherwise the `E` is a suffix.
    if end < bytes.len() && bytes[end] == b'E' {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    let mantissa: f64 = s[..end].parse().ok()?;
    let suffix_len = s[end..]
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(s.len() - end);
    let suffix = &s[end..end + suffix_len];

    Some(mantissa * multiplier(suffix))
}

fn multiplier(suffix: &str) -> f64 {
    SUFFIXES
        .iter()
        .find(|(name, _)| *name == suffix)
        .map_or(1.0, |(_, factor)| *factor)
}

/// Format a value with appropriate SI prefix.
pub fn format_value(value: f64) -> String {
    let abs_value = value.abs();

    let (scaled, suffix) = if abs_value >= 1e12 {
        (value / 1e12, "T")
    } else if abs_value >= 1e9 {
        (value / 1e9, "G")
    } else if abs_value >= 1e6 {
        (value / 1e6, "MEG")
    } else if abs_value >= 1e3 {
        (value / 1e3, "k")
    } else if abs_value >= 1.0 || abs_value == 0.0 {
        (value, "")
    } else if abs_value >= 1e-3 {
        (value * 1e3, "m")
    } else if abs_value >= 1e-6 {
        (value * 1e6, "u")
    } else if abs_value >= 1e-9 {
        (value * 1e9, "n")
    } else if abs_value >= 1e-12 {
        (value * 1e12, "p")
    } else if abs_value >= 1e-15 {
        (value * 1e15, "f")
    } else {
        (value, "")
    };

    let text = format!("{:.4}", scaled);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{text}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|v| (v - b).abs() < b.abs() * 1e-10 + 1e-20)
    }

    #[test]
    fn test_parse_plain_number() {
        assert_eq!(parse_value("1.5"), Some(1.5));
        assert_eq!(parse_value("-2.5"), Some(-2.5));
        assert_eq!(parse_value("1e-3"), Some(1e-3));
        assert_eq!(parse_value("1000"), Some(1000.0));
    }

    #[test]
    fn test_parse_with_suffix() {
        assert!(approx_eq(parse_value("1k"), 1e3));
        assert!(approx_eq(parse_value("4.7K"), 4.7e3));
        assert!(approx_eq(parse_value("10M"), 10e-3));
        assert!(approx_eq(parse_value("10meg"), 10e6));
        assert!(approx_eq(parse_value("2MIL"), 50.8e-6));
        assert!(approx_eq(parse_value("100n"), 100e-9));
        assert!(approx_eq(parse_value("1u"), 1e-6));
        assert!(approx_eq(parse_value("10p"), 10e-12));
        assert!(approx_eq(parse_value("3f"), 3e-15));
        assert!(approx_eq(parse_value("2T"), 2e12));
        assert!(approx_eq(parse_value("2g"), 2e9));
    }

    #[test]
    fn test_unknown_suffix_is_unity() {
        assert_eq!(parse_value("5X"), Some(5.0));
        // The whole letter run is the suffix.
        assert_eq!(parse_value("10UF"), Some(10.0));
        // A bare E without exponent digits is an unknown suffix.
        assert_eq!(parse_value("2E"), Some(2.0));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_value("abc"), None);
        assert_eq!(parse_value("K"), None);
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("1.2.3"), None);
        assert_eq!(parse_value("-"), None);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(1000.0), "1k");
        assert_eq!(format_value(4700.0), "4.7k");
        assert_eq!(format_value(0.001), "1m");
        assert_eq!(format_value(1e-9), "1n");
        assert_eq!(format_value(2.2e6), "2.2MEG");
        assert_eq!(format_value(0.0), "0");
    }
}
