use crate::csv_processor;
use crate::error::JoinError;
use crate::price_loader::PriceSeries;

pub const SOURCE_NAME: &str = "search";
pub const DELIMITER: u8 = b',';

/// One row of the search file. The date is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRecord {
    pub date: String,
    pub index: String,
}

/// A search row matched with the price for its date.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CompositeRecord {
    pub date: String,
    pub price: String,
    pub index: String,
}

/// Reads the `<date>,<index>` rows of the search file in file order.
///
/// Duplicates are kept; each row later makes its own join attempt.
///
/// # Errors
/// * `JoinError::FieldCount` for a line without exactly two fields (unless skipped).
/// * `JoinError::Csv` if the input cannot be read.
pub fn read_index_records<R: std::io::Read>(
    reader: R,
    policy: csv_processor::MalformedPolicy,
) -> Result<csv_processor::Loaded<Vec<IndexRecord>>, JoinError> {
    let mut records = Vec::new();
    let mut skipped = Vec::new();
    let mut lines_read = 0;

    for result in csv_processor::read_pairs(reader, DELIMITER, SOURCE_NAME) {
        match result {
            Ok(pair) => {
                lines_read += 1;
                records.push(IndexRecord {
                    date: pair.key,
                    index: pair.value,
                });
            }
            Err(e) => {
                if e.is_malformed() {
                    lines_read += 1;
                }
                csv_processor::handle_error(policy, e, &mut skipped)?;
            }
        }
    }

    Ok(csv_processor::Loaded {
        value: records,
        lines_read,
        skipped,
    })
}

/// Inner-joins search rows against the price series.
///
/// Rows whose date has no price are dropped without error; the rest keep their
/// relative order.
pub fn join<I>(prices: &PriceSeries, records: I) -> Vec<CompositeRecord>
where
    I: IntoIterator<Item = IndexRecord>,
{
    records
        .into_iter()
        .filter_map(|record| {
            let price = prices.get(&record.date)?;
            Some(CompositeRecord {
                price: price.to_string(),
                date: record.date,
                index: record.index,
            })
        })
        .collect()
}
