use std::sync::OnceLock;

use time::Date;
use time::format_description::{self, OwnedFormatItem};

/// Placeholder used wherever a record needs a date and none was found.
pub const UNKNOWN_DATE: &str = "Unknown";

fn iso_format() -> &'static OwnedFormatItem {
    static FORMAT: OnceLock<OwnedFormatItem> = OnceLock::new();
    FORMAT.get_or_init(|| {
        format_description::parse_owned::<2>("[year]-[month]-[day]")
            .expect("iso date format should compile")
    })
}

fn dotted_format() -> &'static OwnedFormatItem {
    static FORMAT: OnceLock<OwnedFormatItem> = OnceLock::new();
    FORMAT.get_or_init(|| {
        format_description::parse_owned::<2>("[day].[month].[year]")
            .expect("dotted date format should compile")
    })
}

/// Normalizes a diary date to canonical `YYYY-MM-DD`.
///
/// Diary exports carry either ISO dates or the dotted `DD.MM.YYYY`
/// convention; anything else is left to the caller.
#[must_use]
pub fn normalize_date(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parsed = Date::parse(trimmed, iso_format())
        .or_else(|_| Date::parse(trimmed, dotted_format()))
        .ok()?;

    parsed.format(iso_format()).ok()
}
