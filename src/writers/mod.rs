pub mod result_formatter;

pub use result_formatter::{OutputFormat, ResultFormatter, StationSummary};
