use serde_json::Value;

/// Upper bound of every therapeutic rating scale in the record model.
pub const SCALE_MAX: u8 = 10;

/// Clamps an integer rating into the canonical 0..=10 range.
///
/// Every construction site goes through this (or one of the coercion
/// helpers below); out-of-range upstream values saturate instead of
/// propagating.
#[must_use]
pub fn clamp_scale(value: i64) -> u8 {
    value.clamp(0, i64::from(SCALE_MAX)) as u8
}

#[must_use]
pub fn clamp_scale_f64(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    clamp_scale(value.round() as i64)
}

/// Coerces a loosely-typed JSON value into a 0..=10 rating.
///
/// Accepts numbers and numeric strings; everything else maps to 0.
#[must_use]
pub fn coerce_scale(value: &Value) -> u8 {
    match value {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                clamp_scale(int)
            } else {
                clamp_scale_f64(number.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(text) => parse_scale(text).unwrap_or(0),
        _ => 0,
    }
}

/// Parses a rating from text, tolerating an `/10` suffix.
#[must_use]
pub fn parse_scale(text: &str) -> Option<u8> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_suffix("/10")
        .map_or(trimmed, str::trim_end)
        .trim();
    digits.parse::<i64>().ok().map(clamp_scale)
}
