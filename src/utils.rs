/// Formats a Unix timestamp as a UTC calendar date: `YYYY-MM-DD`.
///
/// Any time of day maps to the date it falls on in UTC, so every timestamp
/// between `2021-01-01 00:00:00` and `2021-01-01 23:59:59` yields `"2021-01-01"`.
///
/// # Arguments
/// * `ts` - Unix timestamp in seconds, negative values included.
///
/// # Returns
/// * `Option<String>` - Formatted date, or `None` if the year falls outside `1..=9999`
///   and so has no four-digit `YYYY` form.
///
/// # Examples
///
/// ```
/// let date = timestamp_to_date(1609459200).unwrap();
/// assert_eq!(date, "2021-01-01");
/// ```
pub fn timestamp_to_date(ts: i64) -> Option<String> {
    use chrono::Datelike;

    let dt = chrono::DateTime::from_timestamp(ts, 0)?;
    if !(1..=9999).contains(&dt.year()) {
        return None;
    }
    Some(dt.format("%Y-%m-%d").to_string())
}

/// Parses an epoch-seconds field, tolerating whitespace around the integer.
pub fn parse_timestamp(field: &str) -> Result<i64, std::num::ParseIntError> {
    field.trim().parse::<i64>()
}
