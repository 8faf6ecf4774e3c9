use serde::{Deserialize, Serialize};

use crate::models::Measurement;

/// Running min/max/sum/count for one station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregate {
    pub min: Measurement,
    pub max: Measurement,
    pub sum: Measurement,
    pub count: u64,
}

impl Aggregate {
    /// State after the first observation of a station.
    pub fn new(value: Measurement) -> Self {
        Self {
            min: value,
            max: value,
            sum: value,
            count: 1,
        }
    }

    pub fn observe(&mut self, value: Measurement) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
        self.count += 1;
    }

    /// Associative and commutative combine of two partial aggregates.
    pub fn merge(&mut self, other: &Aggregate) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
        self.count += other.count;
    }

    pub fn mean(&self) -> f64 {
        self.sum.to_f64() / self.count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(tenths: i64) -> Measurement {
        Measurement::from_tenths(tenths)
    }

    #[test]
    fn test_observe_tracks_extremes() {
        let mut agg = Aggregate::new(m(100));
        agg.observe(m(-25));
        agg.observe(m(200));

        assert_eq!(agg.min, m(-25));
        assert_eq!(agg.max, m(200));
        assert_eq!(agg.sum, m(275));
        assert_eq!(agg.count, 3);
    }

    #[test]
    fn test_merge_matches_sequential_observation() {
        let values = [m(12), m(-7), m(40), m(3), m(-19)];

        let mut sequential = Aggregate::new(values[0]);
        for &v in &values[1..] {
            sequential.observe(v);
        }

        let mut left = Aggregate::new(values[0]);
        left.observe(values[1]);
        let mut right = Aggregate::new(values[2]);
        right.observe(values[3]);
        right.observe(values[4]);

        let mut merged = left;
        merged.merge(&right);
        assert_eq!(merged, sequential);

        let mut reversed = right;
        reversed.merge(&left);
        assert_eq!(reversed, sequential);
    }

    #[test]
    fn test_mean() {
        let mut agg = Aggregate::new(m(100));
        agg.observe(m(200));
        assert!((agg.mean() - 15.0).abs() < f64::EPSILON);
    }
}
