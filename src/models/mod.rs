pub mod aggregate;
pub mod config;
pub mod measurement;
pub mod range;
pub mod table;

pub use aggregate::Aggregate;
pub use config::{EngineConfig, NamePolicy};
pub use measurement::{Measurement, ParseMeasurementError};
pub use range::ByteRange;
pub use table::AggregateTable;
