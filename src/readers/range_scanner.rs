use memmap2::Mmap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, trace};

use crate::error::Result;
use crate::models::{AggregateTable, ByteRange, EngineConfig, NamePolicy};
use crate::readers::alignment::{find_line_start, find_line_start_in};
use crate::readers::{LineDecoder, ScanStats};
use crate::utils::constants::{
    CARRIAGE_RETURN, DEFAULT_ALIGNMENT_LOOKAHEAD, DEFAULT_BUFFER_SIZE, LINE_TERMINATOR,
};

/// Partial result of scanning one byte range.
#[derive(Debug, Clone)]
pub struct RangeSummary {
    pub range: ByteRange,
    pub aligned_start: u64,
    pub table: AggregateTable,
    pub stats: ScanStats,
}

impl RangeSummary {
    fn empty(range: ByteRange) -> Self {
        Self {
            range,
            aligned_start: range.start,
            table: AggregateTable::new(),
            stats: ScanStats::default(),
        }
    }
}

/// Scans every line whose first byte lies inside a byte range.
///
/// A range that starts mid-line skips forward to the next line start; the last
/// line that begins inside the range is read to completion even when it ends
/// past the range. Together these attribute every record to exactly one range.
pub struct RangeScanner {
    decoder: LineDecoder,
    buffer_size: usize,
    lookahead: u64,
    use_mmap: bool,
}

impl RangeScanner {
    pub fn new() -> Self {
        Self {
            decoder: LineDecoder::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            lookahead: DEFAULT_ALIGNMENT_LOOKAHEAD,
            use_mmap: false,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            decoder: LineDecoder::new(config.name_policy),
            buffer_size: config.buffer_size,
            lookahead: config.lookahead,
            use_mmap: config.use_mmap,
        }
    }

    pub fn with_name_policy(mut self, policy: NamePolicy) -> Self {
        self.decoder = LineDecoder::new(policy);
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_lookahead(mut self, lookahead: u64) -> Self {
        self.lookahead = lookahead;
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    /// Scan `range` of the file at `path` into a fresh partial table.
    pub fn scan(&self, path: &Path, range: ByteRange) -> Result<RangeSummary> {
        let file = File::open(path)?;
        if range.is_empty() {
            return Ok(RangeSummary::empty(range));
        }

        debug!(start = range.start, len = range.len, "scanning range");
        let summary = if self.use_mmap {
            self.scan_mmap(file, range)?
        } else {
            self.scan_buffered(file, range)?
        };
        debug!(
            start = range.start,
            aligned_start = summary.aligned_start,
            stations = summary.table.len(),
            lines = summary.stats.lines_scanned,
            "range scanned"
        );

        Ok(summary)
    }

    /// Sequential reads through a buffered reader
    fn scan_buffered(&self, mut file: File, range: ByteRange) -> Result<RangeSummary> {
        let aligned_start = find_line_start(&mut file, range.start, self.lookahead)?;
        let mut reader = BufReader::with_capacity(self.buffer_size, file);

        let mut table = AggregateTable::new();
        let mut stats = ScanStats::default();
        let mut line = Vec::with_capacity(128);
        let mut position = aligned_start;

        while position < range.end() {
            line.clear();
            let read = reader.read_until(LINE_TERMINATOR, &mut line)?;
            if read == 0 {
                break;
            }
            position += read as u64;
            self.process_line(&line, &mut table, &mut stats);
        }

        Ok(RangeSummary {
            range,
            aligned_start,
            table,
            stats,
        })
    }

    /// Walks the range directly in a read-only mapping of the file
    fn scan_mmap(&self, file: File, range: ByteRange) -> Result<RangeSummary> {
        // Files that change during a run are not supported.
        let mmap = unsafe { Mmap::map(&file)? };
        let data = &mmap[..];

        let aligned_start = find_line_start_in(data, range.start, self.lookahead)?;
        let end = range.end().min(data.len() as u64) as usize;

        let mut table = AggregateTable::new();
        let mut stats = ScanStats::default();
        let mut position = aligned_start as usize;

        while position < end {
            let rest = &data[position..];
            let (line, next) = match rest.iter().position(|&b| b == LINE_TERMINATOR) {
                Some(i) => (&rest[..=i], position + i + 1),
                None => (rest, data.len()),
            };
            self.process_line(line, &mut table, &mut stats);
            position = next;
        }

        Ok(RangeSummary {
            range,
            aligned_start,
            table,
            stats,
        })
    }

    fn process_line(&self, raw: &[u8], table: &mut AggregateTable, stats: &mut ScanStats) {
        let line = strip_terminator(raw);
        stats.lines_scanned += 1;

        if line.is_empty() {
            stats.blank_lines += 1;
            return;
        }

        match self.decoder.decode(line) {
            Ok(decoded) => {
                table.observe(decoded.name, decoded.value);
                stats.lines_accepted += 1;
            }
            Err(rejection) => {
                trace!(
                    %rejection,
                    line = %String::from_utf8_lossy(line),
                    "skipping line"
                );
                stats.record_rejection(&rejection);
            }
        }
    }
}

impl Default for RangeScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(&[LINE_TERMINATOR]).unwrap_or(line);
    line.strip_suffix(&[CARRIAGE_RETURN]).unwrap_or(line)
}
