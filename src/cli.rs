use crate::csv_processor;
use crate::pipeline;

pub const DEFAULT_PRICE_PATH: &str = "price.csv";
pub const DEFAULT_SEARCH_PATH: &str = "search.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "composite.csv";

/// Structure representing command-line arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub price: std::path::PathBuf,
    pub search: std::path::PathBuf,
    pub output: std::path::PathBuf,
    pub skip_malformed: bool,
}

/// Command-line arguments parser using Clap.
///
/// Every path has a default relative to the working directory, so running the
/// binary with no arguments joins `price.csv` and `search.csv` into `composite.csv`.
impl Args {
    /// Parses the process arguments.
    ///
    /// Exits with clap's usage message on invalid input.
    pub fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }

    fn from_matches(matches: &clap::ArgMatches) -> Self {
        let path = |id: &str, default: &str| {
            matches
                .get_one::<std::path::PathBuf>(id)
                .cloned()
                .unwrap_or_else(|| std::path::PathBuf::from(default))
        };
        Args {
            price: path("price", DEFAULT_PRICE_PATH),
            search: path("search", DEFAULT_SEARCH_PATH),
            output: path("output", DEFAULT_OUTPUT_PATH),
            skip_malformed: matches.get_flag("skip-malformed"),
        }
    }

    /// Converts the arguments into a run configuration.
    pub fn into_config(self) -> pipeline::JoinConfig {
        let on_malformed = if self.skip_malformed {
            csv_processor::MalformedPolicy::Skip
        } else {
            csv_processor::MalformedPolicy::FailFast
        };
        pipeline::JoinConfig {
            price_path: self.price,
            search_path: self.search,
            output_path: self.output,
            on_malformed,
        }
    }
}

fn command() -> clap::Command {
    clap::Command::new("composite_join")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Join a daily price series and a search index series on their UTC date")
        .arg(
            clap::Arg::new("price")
                .short('p')
                .long("price")
                .help("Path to the price file: <unix_timestamp>;<price> per line")
                .default_value(DEFAULT_PRICE_PATH)
                .value_parser(clap::value_parser!(std::path::PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("search")
            .short('s')
            .long("search")
            .help("Path to the search index file: <YYYY-MM-DD>,<index> per line")
            .default_value(DEFAULT_SEARCH_PATH)
            .value_parser(clap::value_parser!(std::path::PathBuf))
            .num_args(1),
        )
        .arg(
            clap::Arg::new("output")
            .short('o')
            .long("output")
            .help("Path of the composite CSV to write (overwritten if it exists)")
            .default_value(DEFAULT_OUTPUT_PATH)
            .value_parser(clap::value_parser!(std::path::PathBuf))
            .num_args(1),
        )
        .arg(
            clap::Arg::new("skip-malformed")
            .long("skip-malformed")
            .help("Skip malformed lines with a warning instead of aborting")
            .required(false)
            .action(clap::ArgAction::SetTrue)
        )
}
