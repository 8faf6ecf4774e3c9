use std::collections::HashMap;

use crate::models::{Aggregate, Measurement};
use crate::utils::constants::INITIAL_TABLE_CAPACITY;

/// Station name bytes to running aggregate.
///
/// Keys are the exact name bytes, so two distinct stations can never be
/// folded together. The same type serves as a per-range partial table and as
/// the final reduced table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateTable {
    stations: HashMap<Box<[u8]>, Aggregate>,
}

impl AggregateTable {
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_TABLE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            stations: HashMap::with_capacity(capacity),
        }
    }

    pub fn observe(&mut self, name: &[u8], value: Measurement) {
        // Look up by borrowed bytes first; only a new station allocates.
        if let Some(aggregate) = self.stations.get_mut(name) {
            aggregate.observe(value);
        } else {
            self.stations.insert(name.into(), Aggregate::new(value));
        }
    }

    /// Fold another table into this one, consuming it.
    pub fn merge(&mut self, other: AggregateTable) {
        for (name, partial) in other.stations {
            self.stations
                .entry(name)
                .and_modify(|aggregate| aggregate.merge(&partial))
                .or_insert(partial);
        }
    }

    pub fn get(&self, name: &[u8]) -> Option<&Aggregate> {
        self.stations.get(name)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Total number of observations across all stations.
    pub fn observation_count(&self) -> u64 {
        self.stations.values().map(|a| a.count).sum()
    }

    /// Stations in ascending byte-lexicographic name order.
    pub fn sorted(&self) -> Vec<(&[u8], &Aggregate)> {
        let mut entries: Vec<(&[u8], &Aggregate)> = self
            .stations
            .iter()
            .map(|(name, aggregate)| (name.as_ref(), aggregate))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl Default for AggregateTable {
    fn default() -> Self {
        Self::new()
    }
}
