use crate::csv_processor;
use crate::error::JoinError;
use crate::file_processing;
use crate::joiner;
use crate::price_loader;
use crate::writer;

/// Paths and policy for one run.
#[derive(Debug, Clone)]
pub struct JoinConfig {
    pub price_path: std::path::PathBuf,
    pub search_path: std::path::PathBuf,
    pub output_path: std::path::PathBuf,
    pub on_malformed: csv_processor::MalformedPolicy,
}

/// Counts collected during a run, plus any malformed lines that were skipped.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub price_lines: usize,
    pub price_dates: usize,
    pub search_rows: usize,
    pub joined: usize,
    pub unmatched: usize,
    pub skipped: Vec<JoinError>,
}

/// Loads prices, reads the search rows, joins them and writes the composite file.
///
/// Each file is opened, fully read or written, and closed before the next one is
/// touched. The output file is only created once both inputs were read, so a
/// failed load leaves an existing output untouched.
///
/// # Arguments
/// * `config` - Input/output paths and the malformed-line policy.
///
/// # Returns
/// * `Result<RunSummary, JoinError>` - Counts for reporting, or the first fatal error.
pub fn run(config: &JoinConfig) -> Result<RunSummary, JoinError> {
    file_processing::check_path(&config.price_path)?;
    file_processing::check_path(&config.search_path)?;

    let prices = {
        let reader = file_processing::open_input(&config.price_path)?;
        price_loader::load_prices(reader, config.on_malformed)?
    };

    let search = {
        let reader = file_processing::open_input(&config.search_path)?;
        joiner::read_index_records(reader, config.on_malformed)?
    };
    let search_rows = search.value.len();

    let composite = joiner::join(&prices.value, search.value);

    {
        let out = file_processing::create_output(&config.output_path)?;
        writer::write_composite(out, &composite)?;
    }

    let mut skipped = prices.skipped;
    skipped.extend(search.skipped);

    Ok(RunSummary {
        price_lines: prices.lines_read,
        price_dates: prices.value.len(),
        search_rows,
        joined: composite.len(),
        unmatched: search_rows - composite.len(),
        skipped,
    })
}
