use crate::error::JoinError;

/// How a reader reacts to a line that cannot be split or parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Abort on the first malformed line.
    #[default]
    FailFast,
    /// Drop the line, keep the error as a diagnostic and continue.
    Skip,
}

/// One delimited line split into its two fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPair {
    pub line: u64,
    pub key: String,
    pub value: String,
}

/// Result of reading one input: the parsed value plus bookkeeping.
#[derive(Debug)]
pub struct Loaded<T> {
    pub value: T,
    /// Number of non-empty lines consumed, malformed ones included.
    pub lines_read: usize,
    /// Malformed-line errors dropped under [`MalformedPolicy::Skip`].
    pub skipped: Vec<JoinError>,
}

/// Counts physical lines in the bytes handed to the csv reader.
///
/// The csv crate's own line counter lags behind on CRLF endings and skipped blank
/// lines, so newline offsets are recorded here and looked up per record.
#[derive(Debug)]
pub struct LineTracker<R> {
    inner: R,
    offset: u64,
    newlines: std::collections::VecDeque<u64>,
    passed: u64,
}

impl<R> LineTracker<R> {
    pub fn new(inner: R) -> Self {
        LineTracker {
            inner,
            offset: 0,
            newlines: std::collections::VecDeque::new(),
            passed: 0,
        }
    }

    /// 1-based line holding the byte at offset `pos`. Offsets must not decrease
    /// between calls.
    pub fn line_at(&mut self, pos: u64) -> u64 {
        while self.newlines.front().is_some_and(|&nl| nl < pos) {
            self.newlines.pop_front();
            self.passed += 1;
        }
        self.passed + 1
    }
}

impl<R: std::io::Read> std::io::Read for LineTracker<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        for (i, b) in buf[..n].iter().enumerate() {
            if *b == b'\n' {
                self.newlines.push_back(self.offset + i as u64);
            }
        }
        self.offset += n as u64;
        Ok(n)
    }
}

/// Builds a headerless reader that splits on `delimiter` only.
///
/// Quoting is disabled so tokens pass through untouched, and records may have any
/// length so that the field count can be reported per line instead of failing
/// inside the csv crate.
pub fn pair_reader<R: std::io::Read>(reader: R, delimiter: u8) -> csv::Reader<LineTracker<R>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .quoting(false)
        .flexible(true)
        .from_reader(LineTracker::new(reader))
}

/// Iterator over the `(key, value)` pairs of a delimited source.
///
/// Trailing whitespace of each line is stripped before the field count is
/// checked, and blank lines are ignored. Each item is either a pair, a
/// malformed-line error (`JoinError::FieldCount`) or a fatal csv error.
pub struct PairReader<R> {
    rdr: csv::Reader<LineTracker<R>>,
    record: csv::StringRecord,
    delimiter: u8,
    source_name: &'static str,
}

/// Reads `(key, value)` pairs from a delimited source.
///
/// # Arguments
/// * `reader` - Source of the delimited text.
/// * `delimiter` - Field separator, `b';'` or `b','`.
/// * `source_name` - Name used in error messages ("price", "search").
pub fn read_pairs<R: std::io::Read>(reader: R, delimiter: u8, source_name: &'static str) -> PairReader<R> {
    PairReader {
        rdr: pair_reader(reader, delimiter),
        record: csv::StringRecord::new(),
        delimiter,
        source_name,
    }
}

impl<R: std::io::Read> PairReader<R> {
    fn split_record(&self, line: u64) -> Option<Result<RawPair, JoinError>> {
        let mut fields: Vec<&str> = self.record.iter().collect();
        if let Some(last) = fields.last_mut() {
            *last = last.trim_end();
        }
        if fields.len() == 1 && fields[0].is_empty() {
            return None;
        }
        if fields.len() != 2 {
            let separator = char::from(self.delimiter).to_string();
            return Some(Err(JoinError::FieldCount {
                source_name: self.source_name,
                line,
                delimiter: char::from(self.delimiter),
                found: fields.len(),
                text: fields.join(separator.as_str()),
            }));
        }
        Some(Ok(RawPair {
            line,
            key: fields[0].to_string(),
            value: fields[1].to_string(),
        }))
    }
}

impl<R: std::io::Read> Iterator for PairReader<R> {
    type Item = Result<RawPair, JoinError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.rdr.read_record(&mut self.record) {
                Ok(true) => {}
                Ok(false) => return None,
                Err(e) => return Some(Err(JoinError::from(e))),
            }
            // The position now sits just past the record's terminator (or at EOF),
            // so its last consumed byte is on the record's own line.
            let end = self.rdr.position().byte();
            let line = self.rdr.get_mut().line_at(end.saturating_sub(1));
            if let Some(item) = self.split_record(line) {
                return Some(item);
            }
        }
    }
}

/// Applies `policy` to an error met while reading.
///
/// Fatal errors are always returned. Malformed-line errors are returned under
/// `FailFast` and pushed onto `skipped` under `Skip`.
pub fn handle_error(
    policy: MalformedPolicy,
    err: JoinError,
    skipped: &mut Vec<JoinError>,
) -> Result<(), JoinError> {
    if policy == MalformedPolicy::Skip && err.is_malformed() {
        skipped.push(err);
        Ok(())
    } else {
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str, delimiter: u8) -> Vec<Result<RawPair, JoinError>> {
        read_pairs(input.as_bytes(), delimiter, "test").collect()
    }

    #[test]
    fn splits_lines_and_tracks_line_numbers() {
        let pairs: Vec<RawPair> = collect("a;1\nb;2\n", b';')
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(
            pairs,
            vec![
                RawPair { line: 1, key: "a".into(), value: "1".into() },
                RawPair { line: 2, key: "b".into(), value: "2".into() },
            ]
        );
    }

    #[test]
    fn strips_trailing_whitespace_and_crlf() {
        let pairs: Vec<RawPair> = collect("2021-01-01,5  \r\n2021-01-02,6\t\r\n", b',')
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(pairs[0].value, "5");
        assert_eq!(pairs[1].value, "6");
    }

    #[test]
    fn ignores_blank_lines() {
        let results = collect("a,1\n\n   \nb,2\n", b',');
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.is_ok()));
    }

    #[test]
    fn quotes_are_kept_verbatim() {
        let pairs: Vec<RawPair> = collect("\"a\";\"1\"\n", b';')
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(pairs[0].key, "\"a\"");
        assert_eq!(pairs[0].value, "\"1\"");
    }

    #[test]
    fn wrong_field_count_is_reported_with_line() {
        let results = collect("a;1\nb\nc;2;3\n", b';');
        assert!(results[0].is_ok());
        match &results[1] {
            Err(JoinError::FieldCount { line, found, .. }) => {
                assert_eq!(*line, 2);
                assert_eq!(*found, 1);
            }
            other => panic!("unexpected: {other:?}"),
        }
        match &results[2] {
            Err(JoinError::FieldCount { line, found, text, .. }) => {
                assert_eq!(*line, 3);
                assert_eq!(*found, 3);
                assert_eq!(text, "c;2;3");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    fn malformed_lines(input: &str) -> Vec<u64> {
        collect(input, b';')
            .into_iter()
            .filter_map(|r| match r {
                Err(JoinError::FieldCount { line, .. }) => Some(line),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn crlf_lines_are_numbered_physically() {
        assert_eq!(malformed_lines("a;1\r\nbad\r\n"), vec![2]);
        assert_eq!(malformed_lines("a;1\r\nb;2\r\nc;3\r\nbad\r\n"), vec![4]);
        assert_eq!(malformed_lines("a;1\r\n\r\nbad\r\nc;3\r\nworse"), vec![3, 5]);
    }

    #[test]
    fn blank_lines_before_a_bad_line_are_counted() {
        assert_eq!(malformed_lines("a;1\n\n\n\nbad\n"), vec![5]);
        assert_eq!(malformed_lines("\n\nbad\n  \n\nx;1;2"), vec![3, 6]);
    }

    #[test]
    fn pair_lines_skip_over_blank_lines() {
        let lines: Vec<u64> = collect("\na;1\n\n\r\nb;2", b';')
            .into_iter()
            .map(|r| r.unwrap().line)
            .collect();
        assert_eq!(lines, vec![2, 5]);
    }

    #[test]
    fn line_tracker_counts_newlines_across_reads() {
        use std::io::Read;

        let mut tracker = LineTracker::new("x\ny\n\nz".as_bytes());
        let mut buf = [0u8; 3];
        while tracker.read(&mut buf).unwrap() > 0 {}
        assert_eq!(tracker.line_at(0), 1);
        assert_eq!(tracker.line_at(1), 1);
        assert_eq!(tracker.line_at(2), 2);
        assert_eq!(tracker.line_at(4), 3);
        assert_eq!(tracker.line_at(5), 4);
    }

    #[test]
    fn skip_policy_only_swallows_malformed_lines() {
        let mut skipped = Vec::new();
        let malformed = JoinError::FieldCount {
            source_name: "test",
            line: 1,
            delimiter: ',',
            found: 1,
            text: "x".into(),
        };
        assert!(handle_error(MalformedPolicy::Skip, malformed, &mut skipped).is_ok());
        assert_eq!(skipped.len(), 1);

        let fatal = JoinError::from(std::io::Error::other("boom"));
        assert!(handle_error(MalformedPolicy::Skip, fatal, &mut skipped).is_err());
        assert_eq!(skipped.len(), 1);
    }

    #[test]
    fn fail_fast_returns_malformed_errors() {
        let mut skipped = Vec::new();
        let malformed = JoinError::FieldCount {
            source_name: "test",
            line: 1,
            delimiter: ',',
            found: 3,
            text: "a,b,c".into(),
        };
        assert!(handle_error(MalformedPolicy::FailFast, malformed, &mut skipped).is_err());
        assert!(skipped.is_empty());
    }
}
