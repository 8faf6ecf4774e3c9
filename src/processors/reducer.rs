use crate::error::{ProcessingError, Result};
use crate::models::AggregateTable;
use crate::readers::{RangeSummary, ScanStats};

/// Final fold of every range's partial table.
#[derive(Debug, Clone)]
pub struct Reduction {
    pub table: AggregateTable,
    pub stats: ScanStats,
}

/// Folds exactly one partial table per assigned range.
pub struct Reducer {
    expected: usize,
}

impl Reducer {
    pub fn new(expected: usize) -> Self {
        Self { expected }
    }

    /// Refuses to fold anything but the complete set of partials, so a lost
    /// range can never yield a plausible but incomplete table.
    pub fn reduce(&self, partials: Vec<RangeSummary>) -> Result<Reduction> {
        if partials.len() != self.expected {
            return Err(ProcessingError::IncompleteReduction {
                expected: self.expected,
                received: partials.len(),
            });
        }

        let mut table = AggregateTable::new();
        let mut stats = ScanStats::default();
        for partial in partials {
            table.merge(partial.table);
            stats += partial.stats;
        }

        Ok(Reduction { table, stats })
    }
}
