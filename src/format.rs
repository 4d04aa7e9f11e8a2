//! Locale-aware number formatting for CLI and GUI output.

use num_format::{Locale, ToFormattedString};

/// Map a user-provided locale tag to a num-format Locale and decimal separator.
/// Supported tags (case-insensitive): "en", "us", "en_US", "de", "de_DE", "german", "fr", "es", "it", "pt", "nl", "ko"
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        "ko" | "ko_kr" => (&Locale::ko, '.'),
        _ => (&Locale::en, '.'),
    }
}

/// Format `v` with thousands separators and `decimals` fraction digits.
pub fn format_number(v: f64, decimals: usize, locale_tag: &str) -> String {
    if !v.is_finite() {
        return "NA".to_string();
    }
    let (locale, dec_sep) = map_locale(locale_tag);
    let fixed = format!("{:.*}", decimals, v.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let grouped = int_part
        .parse::<u64>()
        .map(|n| n.to_formatted_string(locale))
        .unwrap_or_else(|_| int_part.to_string());
    let sign = if v < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{sign}{grouped}{dec_sep}{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Percentage with one decimal, e.g. `71.0%`.
pub fn format_share(v: f64) -> String {
    format!("{:.1}%", v)
}

/// Up to 4 decimals with trailing zeros trimmed; `NA` for missing values.
pub fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}
