//! Per-domain MX/SPF/DMARC verification.
//!
//! [`verify_domain`] runs the three lookups against any [`DnsLookup`]
//! implementation and always returns a complete [`PostureReport`]; lookup
//! failures are logged and reported as absent records.

mod classify;
mod error;
mod resolver;
mod types;

pub use classify::{Classification, DMARC_PREFIX, SPF_PREFIX, classify};
pub use error::LookupError;
pub use resolver::{DnsLookup, build_resolver};
pub use types::{LookupOptions, MxRecord, PostureReport};

use tokio_retry::RetryIf;
use tracing::{debug, warn};

use resolver::{fqdn, normalize_domain};

/// Verifies one domain with a resolver built from the system configuration.
pub async fn check_domain(domain: &str) -> Result<PostureReport, LookupError> {
    let options = LookupOptions::default();
    let resolver = build_resolver(&options)?;
    Ok(verify_domain(&resolver, domain, &options).await)
}

pub async fn verify_domain<R>(resolver: &R, domain: &str, options: &LookupOptions) -> PostureReport
where
    R: DnsLookup + ?Sized,
{
    let ascii = match normalize_domain(domain) {
        Ok(ascii) => ascii,
        Err(err) => {
            warn!(domain, error = %err, "skipping lookups");
            return PostureReport::absent(domain);
        }
    };
    let dmarc_name = fqdn("_dmarc", &ascii);

    let (mx, spf, dmarc) = tokio::join!(
        lookup_with_retry(options, &ascii, || resolver.lookup_mx(&ascii)),
        lookup_with_retry(options, &ascii, || resolver.lookup_txt(&ascii)),
        lookup_with_retry(options, &dmarc_name, || resolver.lookup_txt(&dmarc_name)),
    );

    let has_mx = !records_or_empty(mx, "MX", &ascii).is_empty();
    let spf = classify(&records_or_empty(spf, "TXT", &ascii), SPF_PREFIX);
    let dmarc = classify(&records_or_empty(dmarc, "TXT", &dmarc_name), DMARC_PREFIX);

    PostureReport {
        domain: domain.to_string(),
        has_mx,
        has_spf: spf.matched,
        spf_record: spf.record,
        has_dmarc: dmarc.matched,
        dmarc_record: dmarc.record,
    }
}

fn records_or_empty<T>(result: Result<Vec<T>, LookupError>, kind: &str, name: &str) -> Vec<T> {
    match result {
        Ok(records) => {
            if records.is_empty() {
                debug!(name, kind, "no records");
            }
            records
        }
        Err(err) => {
            warn!(name, kind, error = %err, "lookup failed");
            Vec::new()
        }
    }
}

/// Runs `query` under the per-query timeout, retrying transient failures.
async fn lookup_with_retry<T, F, Fut>(
    options: &LookupOptions,
    name: &str,
    mut query: F,
) -> Result<T, LookupError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LookupError>>,
{
    let timeout = options.timeout();
    let attempt = || {
        let pending = query();
        async move {
            match tokio::time::timeout(timeout, pending).await {
                Ok(result) => result,
                Err(_) => Err(LookupError::timeout(name)),
            }
        }
    };
    let retryable = |err: &LookupError| {
        let transient = err.is_transient();
        if transient {
            debug!(name, error = %err, "transient lookup failure");
        }
        transient
    };
    RetryIf::start(options.retry_strategy(), attempt, retryable).await
}
