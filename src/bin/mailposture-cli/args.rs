use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, anyhow};
use clap::Parser;
use mailposture_lib::{BatchOptions, LookupOptions, ReportFormat};

#[derive(Parser)]
#[command(name = "mailposture-cli")]
#[command(about = "Reports MX, SPF and DMARC presence for each domain, one row per domain")]
pub struct Cli {
    /// domains to check; without any, one domain per line is read from stdin
    pub domains: Vec<String>,

    /// read domains from this file instead of stdin
    #[arg(long, conflicts_with = "domains")]
    pub input: Option<PathBuf>,

    /// format: legacy|csv|ndjson
    #[arg(long, default_value = "legacy")]
    pub format: String,

    /// domains verified at the same time (output keeps input order)
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,

    /// timeout of a single DNS query (ms)
    #[arg(long = "timeout-ms", default_value_t = 5_000)]
    pub timeout_ms: u64,

    /// tries per DNS query for transient failures, first one included
    #[arg(long, default_value_t = 3)]
    pub attempts: usize,

    /// delay before the first retry, doubled on each further retry (ms)
    #[arg(long = "retry-delay-ms", default_value_t = 200)]
    pub retry_delay_ms: u64,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn parsed_format(&self) -> Result<ReportFormat> {
        self.format.parse().map_err(|msg: String| anyhow!(msg))
    }

    pub fn lookup_options(&self) -> LookupOptions {
        LookupOptions::new()
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_attempts(self.attempts)
            .with_retry_delay(Duration::from_millis(self.retry_delay_ms))
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions::new()
            .with_concurrency(self.concurrency)
            .with_lookup_options(self.lookup_options())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clap::Parser;
    use mailposture_lib::ReportFormat;

    use super::Cli;

    #[test]
    fn flags_build_batch_options() {
        let cli = Cli::try_parse_from([
            "mailposture-cli",
            "--format",
            "legacy",
            "--concurrency",
            "4",
            "--timeout-ms",
            "750",
            "--retry-delay-ms",
            "0",
            "a.example",
            "b.example",
        ])
        .expect("valid arguments");
        assert_eq!(cli.domains, ["a.example", "b.example"]);
        assert_eq!(cli.parsed_format().expect("known format"), ReportFormat::Legacy);

        let options = cli.batch_options();
        assert_eq!(options.concurrency(), 4);
        assert_eq!(options.lookup_options().timeout(), Duration::from_millis(750));
        assert_eq!(options.lookup_options().attempts(), 3);
        assert_eq!(options.lookup_options().retry_delay(), Duration::ZERO);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let cli = Cli::try_parse_from(["mailposture-cli", "--format", "xml"]).expect("parses");
        assert!(cli.parsed_format().is_err());
    }

    #[test]
    fn input_file_conflicts_with_positional_domains() {
        let parsed = Cli::try_parse_from(["mailposture-cli", "--input", "list.txt", "a.example"]);
        assert!(parsed.is_err());
    }
}
