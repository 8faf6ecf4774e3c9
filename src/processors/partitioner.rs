use std::fs::File;
use std::path::Path;
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::ByteRange;
use crate::readers::find_line_start;
use crate::utils::constants::DEFAULT_ALIGNMENT_LOOKAHEAD;

/// Splits a file into one contiguous byte range per worker.
pub struct Partitioner {
    workers: usize,
    lookahead: u64,
}

impl Partitioner {
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            lookahead: DEFAULT_ALIGNMENT_LOOKAHEAD,
        }
    }

    pub fn with_lookahead(mut self, lookahead: u64) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Equal-width nominal ranges; the last one absorbs the remainder.
    pub fn plan(&self, file_size: u64) -> Result<Vec<ByteRange>> {
        if self.workers == 0 {
            return Err(ProcessingError::Config(
                "worker count must be at least 1".to_string(),
            ));
        }

        let workers = self.workers as u64;
        let block = file_size / workers;
        let ranges = (0..workers)
            .map(|i| {
                let start = i * block;
                let len = if i + 1 == workers {
                    file_size - start
                } else {
                    block
                };
                ByteRange::new(start, len)
            })
            .collect();

        Ok(ranges)
    }

    /// Move every range start forward to a line start, keeping the ranges
    /// contiguous over `[0, file_size)`.
    ///
    /// Each returned range begins and ends on a line boundary (or at end of
    /// file), so scanning it involves no overscan.
    pub fn align(&self, path: &Path, nominal: &[ByteRange]) -> Result<Vec<ByteRange>> {
        let mut file = File::open(path)?;
        let file_size = file.metadata()?.len();

        let mut starts = Vec::with_capacity(nominal.len());
        for range in nominal {
            let aligned = if range.start == 0 {
                0
            } else {
                find_line_start(&mut file, range.start, self.lookahead)?
            };
            starts.push(aligned.min(file_size));
        }

        let aligned: Vec<ByteRange> = starts
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                let end = starts.get(i + 1).copied().unwrap_or(file_size).max(start);
                ByteRange::new(start, end - start)
            })
            .collect();

        debug!(ranges = aligned.len(), file_size, "aligned byte ranges");
        Ok(aligned)
    }

    /// Nominal plan followed by alignment.
    pub fn plan_aligned(&self, path: &Path, file_size: u64) -> Result<Vec<ByteRange>> {
        let nominal = self.plan(file_size)?;
        self.align(path, &nominal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &[u8] = b"Tokyo;10.0\nParis;-2.5\nTokyo;20.0\nLima;18.3\nOslo;-7.0\n";

    fn write_temp(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    fn assert_covers(ranges: &[ByteRange], size: u64) {
        let mut expected_start = 0;
        for range in ranges {
            assert_eq!(range.start, expected_start, "gap or overlap in {:?}", ranges);
            expected_start = range.end();
        }
        assert_eq!(expected_start, size);
    }

    #[test]
    fn test_plan_equal_width_with_remainder() {
        let ranges = Partitioner::new(3).plan(10).unwrap();
        assert_eq!(
            ranges,
            vec![ByteRange::new(0, 3), ByteRange::new(3, 3), ByteRange::new(6, 4)]
        );
    }

    #[test]
    fn test_plan_single_worker() {
        assert_eq!(Partitioner::new(1).plan(42).unwrap(), vec![ByteRange::new(0, 42)]);
    }

    #[test]
    fn test_plan_rejects_zero_workers() {
        assert!(matches!(
            Partitioner::new(0).plan(10),
            Err(ProcessingError::Config(_))
        ));
    }

    #[test]
    fn test_plan_covers_file_for_every_worker_count() {
        let size = 97;
        for workers in 1..=size as usize {
            let ranges = Partitioner::new(workers).plan(size).unwrap();
            assert_eq!(ranges.len(), workers);
            assert_covers(&ranges, size);
        }
    }

    #[test]
    fn test_aligned_ranges_cover_file_for_every_worker_count() {
        let file = write_temp(SAMPLE);
        let size = SAMPLE.len() as u64;

        for workers in 1..=SAMPLE.len() {
            let ranges = Partitioner::new(workers)
                .plan_aligned(file.path(), size)
                .unwrap();
            assert_eq!(ranges.len(), workers);
            assert_covers(&ranges, size);

            for range in ranges.iter().filter(|r| r.start > 0) {
                assert_eq!(SAMPLE[range.start as usize - 1], b'\n');
            }
        }
    }

    #[test]
    fn test_align_moves_start_past_partial_line() {
        let file = write_temp(SAMPLE);
        let size = SAMPLE.len() as u64;
        let nominal = vec![ByteRange::new(0, 15), ByteRange::new(15, size - 15)];

        let aligned = Partitioner::new(2).align(file.path(), &nominal).unwrap();
        assert_eq!(aligned, vec![ByteRange::new(0, 22), ByteRange::new(22, size - 22)]);
    }

    #[test]
    fn test_align_fails_beyond_lookahead() {
        let mut data = vec![b'A'; 1000];
        data.extend_from_slice(b";1.0\n");
        let file = write_temp(&data);

        let result = Partitioner::new(4)
            .with_lookahead(64)
            .plan_aligned(file.path(), data.len() as u64);
        assert!(matches!(result, Err(ProcessingError::LineAlignment { .. })));
    }
}
