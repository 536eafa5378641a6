use crate::csv_processor;
use crate::error::JoinError;
use crate::utils;

pub const SOURCE_NAME: &str = "price";
pub const DELIMITER: u8 = b';';

/// Prices keyed by UTC calendar date (`YYYY-MM-DD`).
///
/// Built once by [`load_prices`] and read-only afterwards. Prices are kept as the
/// raw tokens found in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceSeries {
    by_date: std::collections::HashMap<String, String>,
}

impl PriceSeries {
    pub fn get(&self, date: &str) -> Option<&str> {
        self.by_date.get(date).map(String::as_str)
    }

    /// Number of distinct dates.
    pub fn len(&self) -> usize {
        self.by_date.len()
    }
}

/// Later pairs overwrite earlier ones with the same date.
impl FromIterator<(String, String)> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        PriceSeries {
            by_date: iter.into_iter().collect(),
        }
    }
}

/// Loads a `<unix_timestamp>;<price>` series into a [`PriceSeries`].
///
/// This function:
/// 1. Splits every non-empty line on `;` after stripping trailing whitespace.
/// 2. Parses the first field as epoch seconds and converts it to a UTC date.
/// 3. Stores the price token under that date, so the last line for a date wins.
///
/// # Arguments
/// * `reader` - Source of the price file.
/// * `policy` - Whether malformed lines abort the load or are skipped.
///
/// # Returns
/// * `Result<Loaded<PriceSeries>, JoinError>` - The series plus line count and skipped lines.
///
/// # Errors
/// * `JoinError::FieldCount` if a line does not hold exactly two fields.
/// * `JoinError::InvalidTimestamp` if the first field is not an integer.
/// * `JoinError::TimestampOutOfRange` if the timestamp has no calendar date.
/// * `JoinError::Csv` if the input cannot be read.
pub fn load_prices<R: std::io::Read>(
    reader: R,
    policy: csv_processor::MalformedPolicy,
) -> Result<csv_processor::Loaded<PriceSeries>, JoinError> {
    let mut by_date = std::collections::HashMap::new();
    let mut skipped = Vec::new();
    let mut lines_read = 0;

    for result in csv_processor::read_pairs(reader, DELIMITER, SOURCE_NAME) {
        let pair = match result {
            Ok(pair) => pair,
            Err(e) => {
                if e.is_malformed() {
                    lines_read += 1;
                }
                csv_processor::handle_error(policy, e, &mut skipped)?;
                continue;
            }
        };
        lines_read += 1;

        match price_date(&pair) {
            Ok(date) => {
                by_date.insert(date, pair.value);
            }
            Err(e) => csv_processor::handle_error(policy, e, &mut skipped)?,
        }
    }

    Ok(csv_processor::Loaded {
        value: PriceSeries { by_date },
        lines_read,
        skipped,
    })
}

fn price_date(pair: &csv_processor::RawPair) -> Result<String, JoinError> {
    let ts = utils::parse_timestamp(&pair.key).map_err(|reason| JoinError::InvalidTimestamp {
        source_name: SOURCE_NAME,
        line: pair.line,
        value: pair.key.clone(),
        reason,
    })?;
    utils::timestamp_to_date(ts).ok_or(JoinError::TimestampOutOfRange {
        source_name: SOURCE_NAME,
        line: pair.line,
        value: ts,
    })
}
