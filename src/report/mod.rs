//! Row-per-domain report output.

mod error;

pub use error::EmitError;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::posture::PostureReport;

pub const COLUMNS: [&str; 6] = [
    "domain",
    "hasMX",
    "hasSPF",
    "spfRecord",
    "hasDMARC",
    "dmarcRecord",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// `a, b, c` rows, fields written as-is without quoting.
    #[default]
    Legacy,
    Csv,
    Ndjson,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Csv => "csv",
            Self::Ndjson => "ndjson",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" => Ok(Self::Legacy),
            "csv" => Ok(Self::Csv),
            "ndjson" => Ok(Self::Ndjson),
            other => Err(format!("unknown format '{other}', use: legacy|csv|ndjson")),
        }
    }
}

enum Sink<W: Write> {
    Plain(W),
    #[cfg(feature = "with-csv")]
    Csv(csv::Writer<W>),
    #[cfg(feature = "with-serde")]
    Ndjson(W),
}

/// Writes the header once, then one row per report in call order.
pub struct ReportWriter<W: Write> {
    sink: Sink<W>,
    header_written: bool,
    rows: usize,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W, format: ReportFormat) -> Result<Self, EmitError> {
        let sink = match format {
            ReportFormat::Legacy => Sink::Plain(out),
            #[cfg(feature = "with-csv")]
            ReportFormat::Csv => Sink::Csv(
                csv::WriterBuilder::new()
                    .has_headers(false)
                    .terminator(csv::Terminator::Any(b'\n'))
                    .from_writer(out),
            ),
            #[cfg(not(feature = "with-csv"))]
            ReportFormat::Csv => {
                return Err(EmitError::FormatUnavailable {
                    format: "csv",
                    feature: "with-csv",
                });
            }
            #[cfg(feature = "with-serde")]
            ReportFormat::Ndjson => Sink::Ndjson(out),
            #[cfg(not(feature = "with-serde"))]
            ReportFormat::Ndjson => {
                return Err(EmitError::FormatUnavailable {
                    format: "ndjson",
                    feature: "with-serde",
                });
            }
        };
        Ok(Self {
            sink,
            header_written: false,
            rows: 0,
        })
    }

    /// Writes the column header. Later calls do nothing.
    pub fn write_header(&mut self) -> Result<(), EmitError> {
        if self.header_written {
            return Ok(());
        }
        self.header_written = true;
        match &mut self.sink {
            Sink::Plain(out) => writeln!(out, "{}", COLUMNS.join(","))?,
            #[cfg(feature = "with-csv")]
            Sink::Csv(wtr) => wtr.write_record(COLUMNS)?,
            #[cfg(feature = "with-serde")]
            Sink::Ndjson(_) => {}
        }
        Ok(())
    }

    pub fn write_report(&mut self, report: &PostureReport) -> Result<(), EmitError> {
        self.write_header()?;
        match &mut self.sink {
            Sink::Plain(out) => writeln!(
                out,
                "{}, {}, {}, {}, {}, {}",
                report.domain,
                report.has_mx,
                report.has_spf,
                report.spf_record,
                report.has_dmarc,
                report.dmarc_record
            )?,
            #[cfg(feature = "with-csv")]
            Sink::Csv(wtr) => wtr.write_record([
                report.domain.as_str(),
                bool_str(report.has_mx),
                bool_str(report.has_spf),
                report.spf_record.as_str(),
                bool_str(report.has_dmarc),
                report.dmarc_record.as_str(),
            ])?,
            #[cfg(feature = "with-serde")]
            Sink::Ndjson(out) => {
                serde_json::to_writer(&mut *out, report)?;
                out.write_all(b"\n")?;
            }
        }
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn flush(&mut self) -> Result<(), EmitError> {
        match &mut self.sink {
            Sink::Plain(out) => out.flush()?,
            #[cfg(feature = "with-csv")]
            Sink::Csv(wtr) => wtr.flush()?,
            #[cfg(feature = "with-serde")]
            Sink::Ndjson(out) => out.flush()?,
        }
        Ok(())
    }

    /// Flushes and hands back the underlying writer.
    pub fn into_inner(self) -> Result<W, EmitError> {
        match self.sink {
            Sink::Plain(mut out) => {
                out.flush()?;
                Ok(out)
            }
            #[cfg(feature = "with-csv")]
            Sink::Csv(wtr) => wtr
                .into_inner()
                .map_err(|err| EmitError::from(err.into_error())),
            #[cfg(feature = "with-serde")]
            Sink::Ndjson(mut out) => {
                out.flush()?;
                Ok(out)
            }
        }
    }
}

#[cfg(feature = "with-csv")]
fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

#[cfg(test)]
mod tests;
