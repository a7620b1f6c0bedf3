//! Batch driver: input stream in, one report row per domain out.
//!
//! Up to [`BatchOptions::concurrency`] domains are verified at once. Rows are
//! emitted strictly in input order by the single task that owns the writer.

use std::io::{self, Write};

use futures::stream::{Stream, StreamExt};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::posture::{DnsLookup, LookupOptions, verify_domain};
use crate::report::{EmitError, ReportWriter};

const DEFAULT_CONCURRENCY: usize = 1;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("reading input failed after {rows} rows: {source}")]
    Input {
        rows: usize,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Emit(#[from] EmitError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    concurrency: usize,
    lookup: LookupOptions,
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Domains verified at the same time. Clamped to at least one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_lookup_options(mut self, lookup: LookupOptions) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn lookup_options(&self) -> &LookupOptions {
        &self.lookup
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            lookup: LookupOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub rows: usize,
    pub interrupted: bool,
}

/// Verifies every domain from `domains` and writes one row each.
///
/// The header goes out before anything is read. Once `cancel` fires no more
/// input is consumed; lookups already started still complete and are
/// written. Input and output failures end the batch after flushing the rows
/// produced so far.
pub async fn run_batch<R, S, W>(
    resolver: &R,
    domains: S,
    writer: &mut ReportWriter<W>,
    options: &BatchOptions,
    cancel: &CancellationToken,
) -> Result<BatchSummary, BatchError>
where
    R: DnsLookup + ?Sized,
    S: Stream<Item = io::Result<String>>,
    W: Write,
{
    writer.write_header()?;

    let lookup = &options.lookup;
    let results = domains
        .take_until(cancel.cancelled())
        .map(|line| async move {
            let domain = line?;
            Ok::<_, io::Error>(verify_domain(resolver, &domain, lookup).await)
        })
        .buffered(options.concurrency);
    futures::pin_mut!(results);

    // the writer may already hold rows from an earlier batch
    let first_row = writer.rows();
    while let Some(result) = results.next().await {
        let report = match result {
            Ok(report) => report,
            Err(source) => {
                writer.flush()?;
                let rows = writer.rows() - first_row;
                return Err(BatchError::Input { rows, source });
            }
        };
        writer.write_report(&report)?;
    }
    writer.flush()?;

    let summary = BatchSummary {
        rows: writer.rows() - first_row,
        interrupted: cancel.is_cancelled(),
    };
    info!(rows = summary.rows, interrupted = summary.interrupted, "batch finished");
    Ok(summary)
}
