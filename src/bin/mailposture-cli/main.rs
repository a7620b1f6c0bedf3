mod args;
mod logging;
mod shutdown;

use std::io;

use anyhow::{Context, Result};
use futures::stream::{self, BoxStream, StreamExt};
use mailposture_lib::{ReportWriter, build_resolver, domain_lines, run_batch};
use tokio::fs::File;
use tokio::io::BufReader;

use crate::args::Cli;

// exit codes: 0 ok, 1 fatal, 130 interrupted
const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging();
    let cli = Cli::parse();

    let format = cli.parsed_format()?;
    let options = cli.batch_options();
    let mut writer = ReportWriter::new(io::stdout(), format)?;
    let resolver =
        build_resolver(options.lookup_options()).context("initialize DNS resolver")?;

    let domains: BoxStream<'static, io::Result<String>> = if !cli.domains.is_empty() {
        stream::iter(cli.domains.clone().into_iter().map(Ok)).boxed()
    } else if let Some(path) = &cli.input {
        let file = File::open(path)
            .await
            .with_context(|| format!("open {}", path.display()))?;
        domain_lines(BufReader::new(file)).boxed()
    } else {
        domain_lines(BufReader::new(tokio::io::stdin())).boxed()
    };

    let cancel = shutdown::cancel_on_interrupt();
    let summary = run_batch(&resolver, domains, &mut writer, &options, &cancel)
        .await
        .context("could not complete batch")?;

    if summary.interrupted {
        std::process::exit(EXIT_INTERRUPTED);
    }
    Ok(())
}
