//! Numeric cleanup for locale-formatted rate cells.

/// Parses a number the way the SEB pages print them: non-breaking or regular
/// spaces as thousands separators and a comma as decimal point.
///
/// Empty cells and placeholder dashes yield `None` rather than an error, so a
/// malformed cell degrades to a missing value instead of failing the run.
pub fn parse_locale_number(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '\u{A0}' | ' ' | '\t'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// The spot feed sometimes delivers a rate scaled by 1000 (e.g. `10523` for
/// 10.523 SEK/USD). There is no documented upstream contract for this, so any
/// magnitude above 100 is assumed scaled. Kept as a single named function so
/// the heuristic can be adjusted without touching parsing logic.
pub fn descale_rate(raw: f64) -> f64 {
    if raw > 100.0 { raw / 1000.0 } else { raw }
}
