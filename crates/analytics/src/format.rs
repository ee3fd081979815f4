//! The display formatter for metric values.
//!
//! A format spec is a short pattern from the config (`",d"`, `"$,.2f"`, `"0.0%"`,
//! `"0.0x"`, `"0.00"`). [`FormatKind::classify`] maps it onto a closed set of
//! kinds in a fixed precedence order; [`FormatKind::render`] turns a finite value
//! into the display string for that kind. [`format_value`] combines the two and
//! never fails.

use core_types::value::float_repr;

/// What is shown for a missing or non-finite value.
pub const MISSING: &str = "-";

/// Precision above this is treated as a broken spec rather than honoured.
const MAX_DECIMALS: usize = 20;

/// Currency specs without an explicit precision show cents.
const DEFAULT_CURRENCY_DECIMALS: usize = 2;

/// The rendering rule selected by a format spec.
///
/// A `decimals` of `None` means the spec asked for a precision that cannot be
/// used; the value is then rendered as plain text (with the currency sign for
/// `Currency`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    /// No spec: the plain numeric text, e.g. `1234.0`.
    Plain,
    /// `",d"`: rounded to an integer with thousands separators.
    GroupedInteger,
    /// Leading `$`: always grouped.
    Currency { decimals: Option<usize> },
    /// Trailing `%`: the value is scaled by 100.
    Percent { decimals: Option<usize>, grouped: bool },
    /// Trailing `x`, for multiples such as ROAS.
    Multiplier { decimals: Option<usize>, grouped: bool },
    /// Only digits, `.` and `,`.
    Fixed { decimals: Option<usize>, grouped: bool },
    /// Anything unrecognised.
    Fallback,
}

impl FormatKind {
    /// Classifies a spec. The order of the checks is the precedence: a spec
    /// starting with `$` is currency even if it would also match a later rule.
    pub fn classify(spec: Option<&str>) -> FormatKind {
        let Some(spec) = spec.filter(|s| !s.is_empty()) else {
            return FormatKind::Plain;
        };

        if spec == ",d" {
            FormatKind::GroupedInteger
        } else if let Some(rest) = spec.strip_prefix('$') {
            FormatKind::Currency {
                decimals: decimals_of(rest, DEFAULT_CURRENCY_DECIMALS),
            }
        } else if let Some(prefix) = spec.strip_suffix('%') {
            FormatKind::Percent {
                decimals: decimals_of(prefix, 0),
                grouped: prefix.contains(','),
            }
        } else if let Some(prefix) = spec.strip_suffix('x') {
            FormatKind::Multiplier {
                decimals: decimals_of(prefix, 0),
                grouped: prefix.contains(','),
            }
        } else if spec.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
            FormatKind::Fixed {
                decimals: decimals_of(spec, 0),
                grouped: spec.contains(','),
            }
        } else {
            FormatKind::Fallback
        }
    }

    /// Renders a finite value.
    pub fn render(self, value: f64) -> String {
        match self {
            FormatKind::Plain | FormatKind::Fallback => float_repr(value),
            FormatKind::GroupedInteger => {
                // Adding 0.0 turns a rounded -0.0 into 0.0.
                let rounded = value.round_ties_even() + 0.0;
                group_thousands(&format!("{rounded:.0}"))
            }
            FormatKind::Currency { decimals } => match decimals {
                Some(decimals) => format!("${}", fixed(value, decimals, true)),
                None => format!("${}", float_repr(value)),
            },
            FormatKind::Percent { decimals, grouped } => match decimals {
                Some(decimals) => format!("{}%", fixed(value * 100.0, decimals, grouped)),
                None => float_repr(value),
            },
            FormatKind::Multiplier { decimals, grouped } => match decimals {
                Some(decimals) => format!("{}x", fixed(value, decimals, grouped)),
                None => float_repr(value),
            },
            FormatKind::Fixed { decimals, grouped } => match decimals {
                Some(decimals) => fixed(value, decimals, grouped),
                None => float_repr(value),
            },
        }
    }
}

/// Formats a metric value for display. Total: every input yields a string.
pub fn format_value(value: Option<f64>, spec: Option<&str>) -> String {
    match value {
        Some(v) if v.is_finite() => FormatKind::classify(spec).render(v),
        _ => MISSING.to_string(),
    }
}

/// Reads the precision from the part of a spec after its first `.`.
///
/// A precision-style fragment (`"2f"`) gives its number; a pattern-style fragment
/// (`"00"`) gives its digit count. No `.` yields `default`.
fn decimals_of(fragment: &str, default: usize) -> Option<usize> {
    let Some((_, after)) = fragment.split_once('.') else {
        return Some(default);
    };

    let decimals = match after.strip_suffix('f') {
        Some(digits) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
            digits.parse::<usize>().ok()?
        }
        _ => after.chars().filter(char::is_ascii_digit).count(),
    };

    (decimals <= MAX_DECIMALS).then_some(decimals)
}

fn fixed(value: f64, decimals: usize, grouped: bool) -> String {
    let text = format!("{value:.decimals$}");
    if grouped { group_thousands(&text) } else { text }
}

/// Inserts `,` between each group of three digits of the integer part.
fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(number.len() + int_part.len() / 3);
    grouped.push_str(sign);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}
