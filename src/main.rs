mod cli;
mod csv_processor;
mod error;
mod file_processing;
mod joiner;
mod pipeline;
mod price_loader;
mod utils;
mod writer;

use anyhow::Context;

/// Main entry point of the application.
///
/// This function orchestrates the entire workflow:
/// 1. Parses command-line arguments.
/// 2. Loads the price series and the search index rows.
/// 3. Joins them on their date and writes the composite CSV.
/// 4. Prints a summary and a warning for every skipped malformed line.
///
/// # Returns
///
/// * `anyhow::Result<()>` - Success or the first fatal error, which exits nonzero.
fn main() -> anyhow::Result<()> {
    let total_start = std::time::Instant::now();
    let args = cli::Args::parse();
    let config = args.into_config();
    println!(
        "Start join: {} + {} -> {}",
        config.price_path.display(),
        config.search_path.display(),
        config.output_path.display()
    );

    let summary = pipeline::run(&config).with_context(|| {
        format!(
            "failed to build {} from {} and {}",
            config.output_path.display(),
            config.price_path.display(),
            config.search_path.display()
        )
    })?;

    for diagnostic in &summary.skipped {
        println!("⚠️ Skipped malformed line: {}", diagnostic);
    }
    if summary.price_dates == 0 {
        println!("⚠️ Warning: no prices loaded, output holds the header only");
    }

    println!(
        "📈 Prices: {} line(s), {} distinct date(s)",
        summary.price_lines, summary.price_dates
    );
    println!(
        "🔎 Search rows: {}, joined: {}, unmatched: {}",
        summary.search_rows, summary.joined, summary.unmatched
    );
    println!(
        "✅ Join completed in {:?} seconds",
        total_start.elapsed().as_secs_f64()
    );

    anyhow::Ok(())
}
