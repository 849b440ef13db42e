//! Date helper functions

use chrono::{DateTime, Locale, TimeZone, Utc};
use chrono_tz::Tz;

/// Format a date using Moment.js-compatible format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "YYYY-MM-DD") // -> "2024-01-15"
/// ```
pub fn format_date<Z: TimeZone>(date: &DateTime<Z>, format: &str) -> String
where
    Z::Offset: std::fmt::Display,
{
    let chrono_format = moment_to_chrono_format(format);
    date.format(&chrono_format).to_string()
}

/// Format a UTC timestamp in the site timezone with localized month/day names
///
/// # Examples
/// ```ignore
/// format_date_localized(&date, "DD MMM YYYY", "America/Sao_Paulo", "pt-BR") // -> "15 mar 2021"
/// ```
pub fn format_date_localized(
    date: &DateTime<Utc>,
    format: &str,
    timezone: &str,
    language: &str,
) -> String {
    let chrono_format = moment_to_chrono_format(format);
    let locale = locale_for(language);

    match parse_timezone(timezone) {
        Some(tz) => date
            .with_timezone(&tz)
            .format_localized(&chrono_format, locale)
            .to_string(),
        None => date.format_localized(&chrono_format, locale).to_string(),
    }
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml<Z: TimeZone>(date: &DateTime<Z>) -> String
where
    Z::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()
}

/// Resolve an IANA timezone name; empty means UTC
pub fn parse_timezone(name: &str) -> Option<Tz> {
    if name.trim().is_empty() {
        return None;
    }
    match name.parse::<Tz>() {
        Ok(tz) => Some(tz),
        Err(e) => {
            tracing::warn!("Unknown timezone {:?}, using UTC: {}", name, e);
            None
        }
    }
}

/// Map a site language code to a chrono locale
pub fn locale_for(language: &str) -> Locale {
    let normalized = language.replace('-', "_").to_lowercase();
    match normalized.as_str() {
        "pt_br" | "pt" => Locale::pt_BR,
        "pt_pt" => Locale::pt_PT,
        "es" | "es_es" => Locale::es_ES,
        "fr" | "fr_fr" => Locale::fr_FR,
        "de" | "de_de" => Locale::de_DE,
        "it" | "it_it" => Locale::it_IT,
        "en_gb" => Locale::en_GB,
        _ => Locale::en_US,
    }
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest tokens first within each category
    let replacements = [
        // Year
        ("YYYY", "%Y"),
        ("YY", "%y"),
        // Month (uppercase M)
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        // Day of month (uppercase D)
        ("DDDD", "%j"),
        ("DD", "%d"),
        // Hour 24h
        ("HH", "%H"),
        // Hour 12h
        ("hh", "%I"),
        // Minute (lowercase m after MM is gone)
        ("mm", "%M"),
        ("ss", "%S"),
        // Day of week
        ("dddd", "%A"),
        ("ddd", "%a"),
        ("ZZ", "%z"),
        ("SSS", "%3f"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}
