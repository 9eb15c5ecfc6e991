//! Display formatting shared by every renderer.
//!
//! Fixed-decimal output rounds exact ties half away from zero (`0.125` → `0.13`
//! at two places), which is what dashboard readers expect. Non-tie values use
//! the correctly rounded std formatting.

const TIE_GUARD_DIGITS: usize = 24;

/// Format `x` with exactly `digits` decimals.
pub fn to_fixed(x: f64, digits: usize) -> String {
    if !x.is_finite() {
        return x.to_string();
    }
    // -0.0 prints as "0"
    let x = if x == 0.0 { 0.0 } else { x };

    let wide = format!("{:.*}", digits + TIE_GUARD_DIGITS, x.abs());
    let (head, tail) = wide.split_at(wide.len() - TIE_GUARD_DIGITS);
    let is_tie = tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0');
    if !is_tie {
        return format!("{:.*}", digits, x);
    }

    let head = head.strip_suffix('.').unwrap_or(head);
    let up = increment_decimal(head);
    if x < 0.0 { format!("-{up}") } else { up }
}

/// Add one unit in the last place of a plain decimal string ("0.129" → "0.130").
fn increment_decimal(s: &str) -> String {
    let mut chars: Vec<char> = s.chars().collect();
    for ch in chars.iter_mut().rev() {
        match *ch {
            '.' => continue,
            '9' => *ch = '0',
            d => {
                *ch = char::from_digit(d.to_digit(10).unwrap_or(0) + 1, 10).unwrap_or('0');
                return chars.into_iter().collect();
            }
        }
    }
    let mut out = String::with_capacity(chars.len() + 1);
    out.push('1');
    out.extend(chars);
    out
}

/// Probability → percent string, e.g. `pct(0.4, 1)` → `"40.0%"`.
pub fn pct(x: f64, digits: usize) -> String {
    format!("{}%", to_fixed(x * 100.0, digits))
}

/// Group an integer with `sep` every three digits.
pub fn fmt_int_sep(n: u128, sep: char) -> String {
    let digits = n.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * sep.len_utf8());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

/// Locale-style grouped count (`5000` → `"5,000"`).
pub fn fmt_int(n: u64) -> String {
    fmt_int_sep(u128::from(n), ',')
}

/// Round to the nearest whole number (half away from zero) and group.
pub fn fmt_rounded(x: f64) -> String {
    if !x.is_finite() {
        return x.to_string();
    }
    let r = x.round();
    // `as` saturates for values beyond u128
    let grouped = fmt_int_sep(r.abs() as u128, ',');
    if r < 0.0 { format!("-{grouped}") } else { grouped }
}

/// Currency with no decimals, e.g. `currency_0dp(156.25, "$")` → `"$156"`.
pub fn currency_0dp(x: f64, symbol: &str) -> String {
    let s = fmt_rounded(x);
    match s.strip_prefix('-') {
        Some(rest) => format!("-{symbol}{rest}"),
        None => format!("{symbol}{s}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_decimals_pad_and_round() {
        assert_eq!(to_fixed(0.2, 3), "0.200");
        assert_eq!(to_fixed(1.5, 3), "1.500");
        assert_eq!(to_fixed(0.123456, 3), "0.123");
        assert_eq!(to_fixed(0.0006, 3), "0.001");
    }

    #[test]
    fn exact_ties_round_away_from_zero() {
        assert_eq!(to_fixed(0.25, 1), "0.3");
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(9.95, 1), "9.9"); // 9.95 is stored below the tie
        assert_eq!(to_fixed(99.5, 0), "100");
        assert_eq!(to_fixed(-0.25, 1), "-0.3");
    }

    #[test]
    fn negative_zero_and_non_finite() {
        assert_eq!(to_fixed(-0.0, 1), "0.0");
        assert_eq!(to_fixed(f64::INFINITY, 1), "inf");
    }

    #[test]
    fn percents_use_one_decimal() {
        assert_eq!(pct(0.4, 1), "40.0%");
        assert_eq!(pct(0.05, 1), "5.0%");
        assert_eq!(pct(1.0, 1), "100.0%");
    }

    #[test]
    fn integers_are_grouped() {
        assert_eq!(fmt_int(0), "0");
        assert_eq!(fmt_int(999), "999");
        assert_eq!(fmt_int(5000), "5,000");
        assert_eq!(fmt_int(1_234_567), "1,234,567");
        assert_eq!(fmt_int_sep(1_000_000, '\u{202F}'), "1\u{202F}000\u{202F}000");
    }

    #[test]
    fn currency_has_no_decimals() {
        assert_eq!(currency_0dp(156.25, "$"), "$156");
        assert_eq!(currency_0dp(0.5, "$"), "$1");
        assert_eq!(currency_0dp(1234.5, "$"), "$1,235");
        assert_eq!(currency_0dp(0.0, "€"), "€0");
        assert_eq!(currency_0dp(-12.0, "$"), "-$12");
    }

    #[test]
    fn rounded_units() {
        assert_eq!(fmt_rounded(125.0), "125");
        assert_eq!(fmt_rounded(124.5), "125");
        assert_eq!(fmt_rounded(1_000_000.4), "1,000,000");
    }
}
