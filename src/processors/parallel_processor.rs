use rayon::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::models::{AggregateTable, ByteRange, EngineConfig, NamePolicy};
use crate::processors::{Partitioner, Reducer};
use crate::readers::{RangeScanner, RangeSummary, ScanStats};
use crate::utils::progress::ProgressReporter;

/// Result of a complete run over one file.
#[derive(Debug, Clone)]
pub struct ProcessingOutcome {
    pub table: AggregateTable,
    pub stats: ScanStats,
    pub ranges: Vec<ByteRange>,
    pub file_size: u64,
    pub elapsed: Duration,
}

/// How a file would be divided among workers.
#[derive(Debug, Clone)]
pub struct FilePlan {
    pub file_size: u64,
    pub nominal: Vec<ByteRange>,
    pub aligned: Vec<ByteRange>,
}

pub struct ParallelProcessor {
    config: EngineConfig,
}

impl ParallelProcessor {
    pub fn new(max_workers: usize) -> Self {
        Self {
            config: EngineConfig {
                workers: max_workers,
                ..EngineConfig::default()
            },
        }
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.config.buffer_size = buffer_size;
        self
    }

    pub fn with_lookahead(mut self, lookahead: u64) -> Self {
        self.config.lookahead = lookahead;
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.config.use_mmap = use_mmap;
        self
    }

    pub fn with_name_policy(mut self, policy: NamePolicy) -> Self {
        self.config.name_policy = policy;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute nominal and aligned ranges without scanning.
    pub fn plan(&self, path: &Path) -> Result<FilePlan> {
        self.config.validate()?;
        let file_size = input_file_size(path)?;

        let partitioner = Partitioner::new(self.config.workers).with_lookahead(self.config.lookahead);
        let nominal = partitioner.plan(file_size)?;
        let aligned = partitioner.align(path, &nominal)?;

        Ok(FilePlan {
            file_size,
            nominal,
            aligned,
        })
    }

    /// Partition, scan every range on its own worker, then reduce.
    pub fn process_file(
        &self,
        path: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<ProcessingOutcome> {
        let started = Instant::now();
        let plan = self.plan(path)?;

        info!(
            path = %path.display(),
            file_size = plan.file_size,
            workers = self.config.workers,
            "processing file"
        );
        if let Some(p) = progress {
            p.set_message(&format!("Scanning {} byte ranges...", plan.aligned.len()));
        }

        let partials = self.scan_ranges(path, &plan.aligned, progress)?;

        if let Some(p) = progress {
            p.set_message("Merging partial results...");
        }
        let reduction = Reducer::new(plan.aligned.len()).reduce(partials)?;

        let elapsed = started.elapsed();
        info!(
            stations = reduction.table.len(),
            lines = reduction.stats.lines_scanned,
            elapsed_ms = elapsed.as_millis() as u64,
            "aggregation complete"
        );
        if reduction.stats.has_format_errors() {
            warn!(
                missing_separator = reduction.stats.missing_separator,
                malformed_value = reduction.stats.malformed_value,
                "skipped malformed lines"
            );
        }

        if let Some(p) = progress {
            p.finish_with_message(&format!("Aggregated {} stations", reduction.table.len()));
        }

        Ok(ProcessingOutcome {
            table: reduction.table,
            stats: reduction.stats,
            ranges: plan.aligned,
            file_size: plan.file_size,
            elapsed,
        })
    }

    /// One job per range on a pool of exactly `workers` threads. The collect is
    /// the only barrier and stops at the first failed range.
    fn scan_ranges(
        &self,
        path: &Path,
        ranges: &[ByteRange],
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<RangeSummary>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let scanner = RangeScanner::from_config(&self.config);
        let completed = AtomicUsize::new(0);

        pool.install(|| {
            ranges
                .par_iter()
                .map(|&range| {
                    let result = scanner.scan(path, range);

                    let count = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(p) = progress {
                        p.update(count as u64);
                    }

                    result
                })
                .collect()
        })
    }
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

fn input_file_size(path: &Path) -> Result<u64> {
    let metadata = std::fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(ProcessingError::InvalidInput(format!(
            "{} is not a regular file",
            path.display()
        )));
    }
    Ok(metadata.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Measurement;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    fn generated_input(lines: usize) -> String {
        let names = ["Abha", "Bergen", "Cairo", "Dakar", "Évora", "Fresno", "Ürümqi"];
        (0..lines)
            .map(|i| {
                let tenths = (i as i64 * 37 % 1999) - 999;
                format!("{};{}\n", names[i % names.len()], Measurement::from_tenths(tenths))
            })
            .collect()
    }

    #[test]
    fn test_worker_count_does_not_change_result() {
        let input = generated_input(5_000);
        let file = write_temp(input.as_bytes());

        let baseline = ParallelProcessor::new(1).process_file(file.path(), None).unwrap();
        assert_eq!(baseline.stats.lines_accepted, 5_000);
        assert_eq!(baseline.table.observation_count(), 5_000);

        for workers in [2, 3, 4, 7, 16] {
            for use_mmap in [false, true] {
                let outcome = ParallelProcessor::new(workers)
                    .with_mmap(use_mmap)
                    .process_file(file.path(), None)
                    .unwrap();
                assert_eq!(outcome.table, baseline.table, "workers={}", workers);
                assert_eq!(outcome.ranges.len(), workers);
            }
        }
    }

    #[test]
    fn test_more_workers_than_lines() {
        let file = write_temp(b"Tokyo;10.0\nParis;-2.5\n");
        let outcome = ParallelProcessor::new(8).process_file(file.path(), None).unwrap();
        assert_eq!(outcome.table.len(), 2);
        assert_eq!(outcome.stats.lines_accepted, 2);
    }

    #[test]
    fn test_empty_file() {
        let file = write_temp(b"");
        let outcome = ParallelProcessor::new(4).process_file(file.path(), None).unwrap();
        assert!(outcome.table.is_empty());
        assert_eq!(outcome.file_size, 0);
    }

    #[test]
    fn test_zero_workers_rejected_before_io() {
        let dir = tempfile::tempdir().unwrap();
        let result = ParallelProcessor::new(0).process_file(&dir.path().join("absent.txt"), None);
        assert!(matches!(result, Err(ProcessingError::Validation(_))));
    }

    #[test]
    fn test_directory_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let result = ParallelProcessor::new(2).process_file(dir.path(), None);
        assert!(matches!(result, Err(ProcessingError::InvalidInput(_))));
    }

    #[test]
    fn test_alignment_failure_aborts_run() {
        let mut data = b"Tokyo;10.0\n".to_vec();
        data.extend(std::iter::repeat(b'A').take(4096));
        data.extend_from_slice(b";1.0\n");
        let file = write_temp(&data);

        let result = ParallelProcessor::new(4)
            .with_lookahead(128)
            .process_file(file.path(), None);
        assert!(matches!(result, Err(ProcessingError::LineAlignment { .. })));
    }

    #[test]
    fn test_plan_reports_both_range_sets() {
        let file = write_temp(b"Tokyo;10.0\nParis;-2.5\nTokyo;20.0\n");
        let plan = ParallelProcessor::new(2).plan(file.path()).unwrap();
        assert_eq!(plan.file_size, 33);
        assert_eq!(plan.nominal, vec![ByteRange::new(0, 16), ByteRange::new(16, 17)]);
        assert_eq!(plan.aligned, vec![ByteRange::new(0, 22), ByteRange::new(22, 11)]);
    }
}
