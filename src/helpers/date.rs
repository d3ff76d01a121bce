//! Date helper functions

use chrono::{Locale, NaiveDate, NaiveTime};

/// Default long date format, e.g. "February 15, 2024"
pub const LONG_DATE_FORMAT: &str = "%B %-d, %Y";

/// Resolve a language tag such as `en_US`, `en-US` or `de_DE` to a chrono
/// locale, falling back to `en_US`.
pub fn resolve_locale(language: &str) -> Locale {
    let tag = language.trim().replace('-', "_");
    match Locale::try_from(tag.as_str()) {
        Ok(locale) => locale,
        Err(_) => {
            tracing::warn!("Unknown locale {:?}, falling back to en_US", language);
            Locale::en_US
        }
    }
}

/// Format a date with localized month and weekday names
pub fn localized_date(date: NaiveDate, format: &str, locale: Locale) -> String {
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .format_localized(format, locale)
        .to_string()
}
