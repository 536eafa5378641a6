use crate::error::JoinError;
use crate::joiner::CompositeRecord;

pub const HEADER: [&str; 3] = ["date", "price", "index"];

/// Writes the header and the composite rows as comma-separated text.
///
/// The header is written even when `records` is empty. Fields are written
/// unquoted and each line ends with `\n`, so identical input always produces
/// identical bytes.
///
/// # Arguments
/// * `writer` - Destination; flushed before returning.
/// * `records` - Rows in output order.
///
/// # Errors
/// * `JoinError::Csv` if serialization or the underlying write fails.
pub fn write_composite<W: std::io::Write>(writer: W, records: &[CompositeRecord]) -> Result<(), JoinError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(HEADER)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(records: &[CompositeRecord]) -> String {
        let mut buf = Vec::new();
        write_composite(&mut buf, records).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_join_writes_header_only() {
        assert_eq!(render(&[]), "date,price,index\n");
    }

    #[test]
    fn rows_follow_header_in_order() {
        let records = vec![
            CompositeRecord {
                date: "2021-01-02".into(),
                price: "200".into(),
                index: "9".into(),
            },
            CompositeRecord {
                date: "2021-01-01".into(),
                price: "100".into(),
                index: "5".into(),
            },
        ];
        assert_eq!(render(&records), "date,price,index\n2021-01-02,200,9\n2021-01-01,100,5\n");
    }

    #[test]
    fn tokens_are_written_unquoted() {
        let records = vec![CompositeRecord {
            date: "2021-01-01".into(),
            price: "\"1 000\"".into(),
            index: "5".into(),
        }];
        assert_eq!(render(&records), "date,price,index\n2021-01-01,\"1 000\",5\n");
    }
}
