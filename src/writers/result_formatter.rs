use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::models::{Aggregate, AggregateTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `{name=min/mean/max, ...}` on one line
    #[default]
    Text,
    /// JSON array of per-station objects
    Json,
}

/// One station's final statistics, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSummary {
    pub station: String,
    pub min: f64,
    pub mean: f64,
    pub max: f64,
    pub count: u64,
}

impl StationSummary {
    fn new(name: &[u8], aggregate: &Aggregate) -> Self {
        Self {
            station: String::from_utf8_lossy(name).into_owned(),
            min: aggregate.min.to_f64(),
            mean: aggregate.mean(),
            max: aggregate.max.to_f64(),
            count: aggregate.count,
        }
    }
}

pub struct ResultFormatter {
    format: OutputFormat,
}

impl ResultFormatter {
    pub fn new() -> Self {
        Self {
            format: OutputFormat::Text,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Stations sorted ascending by name bytes.
    pub fn summaries(&self, table: &AggregateTable) -> Vec<StationSummary> {
        table
            .sorted()
            .into_iter()
            .map(|(name, aggregate)| StationSummary::new(name, aggregate))
            .collect()
    }

    pub fn format(&self, table: &AggregateTable) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(format_text(table)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&self.summaries(table))?),
        }
    }

    pub fn write_to(&self, table: &AggregateTable, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{}", self.format(table)?)?;
        writer.flush()?;
        Ok(())
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn format_text(table: &AggregateTable) -> String {
    let entries: Vec<String> = table
        .sorted()
        .into_iter()
        .map(|(name, aggregate)| {
            format!(
                "{}={}/{:.1}/{}",
                String::from_utf8_lossy(name),
                aggregate.min,
                aggregate.mean(),
                aggregate.max
            )
        })
        .collect();

    format!("{{{}}}", entries.join(", "))
}
