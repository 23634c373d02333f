use log::debug;

/// Parses a funds cell such as `"3.165,00"`, `"9,178.38"`, `"3165.00 HBD"`
/// or `"$ 1,5"` into an amount.
///
/// Everything but digits, `.`, `,` and `-` is dropped first. Then:
/// - both `.` and `,` present: the one written last is the decimal
///   separator and the other one groups thousands (`1.200,50`, `1,200.50`)
/// - only `,` present: it is the decimal separator
/// - otherwise `.` is the decimal separator
///
/// The longest numeric prefix of what remains is read. Missing or
/// unreadable input gives `0.0`; the result is always finite.
pub fn parse_funds(input: Option<&str>) -> f64 {
    let raw = match input {
        Some(s) => s,
        None => return 0.0,
    };
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();

    let has_dot = kept.contains('.');
    let has_comma = kept.contains(',');
    let canonical = if has_dot && has_comma {
        if kept.rfind(',') > kept.rfind('.') {
            let no_dots: String = kept.chars().filter(|c| *c != '.').collect();
            replace_last_comma(&no_dots)
        } else {
            kept.chars().filter(|c| *c != ',').collect()
        }
    } else if has_comma {
        kept.replacen(',', ".", 1)
    } else {
        kept
    };

    let res = numeric_prefix(&canonical)
        .and_then(|p| p.parse::<f64>().ok())
        .filter(|x| x.is_finite())
        .unwrap_or(0.0);
    debug!("parse_funds: {:?} -> {:?} -> {}", raw, canonical, res);
    res
}

fn replace_last_comma(s: &str) -> String {
    match s.rfind(',') {
        Some(idx) => format!("{}.{}", &s[..idx], &s[idx + 1..]),
        None => s.to_string(),
    }
}

// Optional sign, digits, then optionally a dot and more digits. At least one
// digit must be present.
fn numeric_prefix(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start || digits > 0 {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        None
    } else {
        Some(&s[..end])
    }
}

/// A non-negative count read from a cell; `0` when absent or unreadable.
///
/// Only the leading run of digits is read. A `.` or `,` inside it is skipped
/// when exactly three digits follow (`"1.200"` is 1200); any other character
/// ends the count (`"3,5"` is 3, `"1e3"` is 1).
pub fn parse_count(input: &str) -> u64 {
    let bytes = input.trim().as_bytes();
    let mut digits = String::new();
    let mut idx = 0;
    while idx < bytes.len() {
        let b = bytes[idx];
        if b.is_ascii_digit() {
            digits.push(b as char);
        } else {
            let grouping = matches!(b, b'.' | b',')
                && !digits.is_empty()
                && is_digit_group(&bytes[idx + 1..]);
            if !grouping {
                break;
            }
        }
        idx += 1;
    }
    digits.parse::<u64>().unwrap_or(0)
}

// Three digits, not followed by a fourth.
fn is_digit_group(rest: &[u8]) -> bool {
    rest.len() >= 3
        && rest[..3].iter().all(u8::is_ascii_digit)
        && rest.get(3).map_or(true, |b| !b.is_ascii_digit())
}
