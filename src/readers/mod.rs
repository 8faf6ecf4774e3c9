pub mod alignment;
pub mod line_decoder;
pub mod range_scanner;
pub mod scan_stats;

pub use alignment::{find_line_start, find_line_start_in};
pub use line_decoder::{DecodedLine, LineDecoder, LineRejection};
pub use range_scanner::{RangeScanner, RangeSummary};
pub use scan_stats::ScanStats;
