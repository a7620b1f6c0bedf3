use async_trait::async_trait;
use trust_dns_resolver::{
    TokioAsyncResolver,
    error::{ResolveError, ResolveErrorKind},
    lookup::{MxLookup, TxtLookup},
    proto::op::ResponseCode,
    system_conf,
};

use super::{LookupError, LookupOptions, MxRecord};

/// DNS queries the verifier depends on.
///
/// An answer without records must be reported as an empty list, not as an
/// error.
#[async_trait]
pub trait DnsLookup: Send + Sync {
    async fn lookup_mx(&self, name: &str) -> Result<Vec<MxRecord>, LookupError>;
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, LookupError>;
}

/// Builds a resolver from the system configuration.
///
/// The per-query timeout comes from `options`; the resolver itself tries each
/// query once since retries are driven by the verifier.
pub fn build_resolver(options: &LookupOptions) -> Result<TokioAsyncResolver, LookupError> {
    let (config, mut opts) = system_conf::read_system_conf()
        .map_err(|err| LookupError::resolver_init(std::io::Error::from(err)))?;
    opts.timeout = options.timeout();
    opts.attempts = 1;
    Ok(TokioAsyncResolver::tokio(config, opts))
}

pub(crate) fn normalize_domain(domain: &str) -> Result<String, LookupError> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(LookupError::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(LookupError::idna)
}

pub(crate) fn fqdn(label: &str, domain: &str) -> String {
    let trimmed = label.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        domain.to_string()
    } else {
        format!("{}.{}", trimmed.to_ascii_lowercase(), domain)
    }
}

pub(crate) fn normalize_exchange(exchange: String) -> String {
    let trimmed = exchange.trim_end_matches('.');
    trimmed.to_ascii_lowercase()
}

#[async_trait]
impl DnsLookup for TokioAsyncResolver {
    async fn lookup_mx(&self, name: &str) -> Result<Vec<MxRecord>, LookupError> {
        match self.mx_lookup(name).await {
            Ok(lookup) => Ok(collect_mx_records(&lookup)),
            Err(err) if should_treat_as_empty(&err) => Ok(Vec::new()),
            Err(err) => Err(LookupError::resolve(name, err)),
        }
    }

    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, LookupError> {
        match self.txt_lookup(name).await {
            Ok(lookup) => Ok(collect_txt_records(&lookup)),
            Err(err) if should_treat_as_empty(&err) => Ok(Vec::new()),
            Err(err) => Err(LookupError::resolve(name, err)),
        }
    }
}

fn collect_mx_records(lookup: &MxLookup) -> Vec<MxRecord> {
    lookup
        .iter()
        .map(|mx| MxRecord::new(mx.preference(), normalize_exchange(mx.exchange().to_utf8())))
        .collect()
}

fn collect_txt_records(lookup: &TxtLookup) -> Vec<String> {
    let mut records = Vec::new();
    for txt in lookup.iter() {
        let mut record = String::new();
        for piece in txt.txt_data().iter() {
            record.push_str(&String::from_utf8_lossy(piece));
        }
        records.push(record);
    }
    records
}

// NXDOMAIN and NODATA both mean "nothing published". Any other rcode
// (SERVFAIL, REFUSED, NOTIMP..) is a failure.
pub(crate) fn should_treat_as_empty(err: &ResolveError) -> bool {
    matches!(
        err.kind(),
        ResolveErrorKind::NoRecordsFound { response_code, .. }
            if matches!(response_code, ResponseCode::NXDomain | ResponseCode::NoError)
    )
}
