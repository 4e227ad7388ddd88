//! Sexagesimal coordinate text: `DDDMM.mmmH`.
//!
//! | Part   | Meaning                                              |
//! |--------|------------------------------------------------------|
//! | `DDD`  | whole degrees, one or more digits                    |
//! | `MM`   | whole minutes, exactly two digits, `< 60`            |
//! | `.mmm` | optional fractional minutes                          |
//! | `H`    | hemisphere letter `N`, `S`, `E` or `W` (any case)    |
//!
//! `S` and `W` produce negative degrees.  Examples: `"2330.5S"` is
//! −23.508333…, `"04636W"` is −46.6.

/// Parse a sexagesimal value with any hemisphere letter.
///
/// Returns `None` when the text does not match `DDDMM.mmmH`, when the
/// minutes are 60 or more, or when the degrees exceed the range for the
/// hemisphere's axis (90 for `N`/`S`, 180 for `E`/`W`).
pub fn parse_sexagesimal(text: &str) -> Option<f64> {
    parse_with(text, &['N', 'S', 'E', 'W'])
}

/// Like [`parse_sexagesimal`] but only accepts `N` or `S`.
pub fn parse_latitude(text: &str) -> Option<f64> {
    parse_with(text, &['N', 'S'])
}

/// Like [`parse_sexagesimal`] but only accepts `E` or `W`.
pub fn parse_longitude(text: &str) -> Option<f64> {
    parse_with(text, &['E', 'W'])
}

fn parse_with(text: &str, hemispheres: &[char]) -> Option<f64> {
    let text = text.trim();
    let hemisphere = text.chars().last()?.to_ascii_uppercase();
    if !hemispheres.contains(&hemisphere) {
        return None;
    }
    let body = &text[..text.len() - 1];

    let (whole, fraction) = match body.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (body, None),
    };
    // At least one degree digit plus two minute digits.
    if whole.len() < 3 || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Some(f) = fraction {
        if f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }

    let (deg_text, min_text) = whole.split_at(whole.len() - 2);
    let degrees: f64 = deg_text.parse().ok()?;
    let mut minutes: f64 = min_text.parse().ok()?;
    if let Some(f) = fraction {
        minutes += format!("0.{f}").parse::<f64>().ok()?;
    }
    if minutes >= 60.0 {
        return None;
    }

    let max = if matches!(hemisphere, 'N' | 'S') { 90.0 } else { 180.0 };
    let value = degrees + minutes / 60.0;
    if value > max {
        return None;
    }

    Some(if matches!(hemisphere, 'S' | 'W') { -value } else { value })
}
