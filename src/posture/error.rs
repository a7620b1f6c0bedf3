use thiserror::Error;
use trust_dns_resolver::{
    error::{ResolveError, ResolveErrorKind},
    proto::op::ResponseCode,
};

/// Errors raised by a single DNS lookup.
///
/// None of these abort a batch: the verifier logs them and reports the
/// affected record as absent.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("domain is empty")]
    EmptyDomain,
    #[error("domain IDNA conversion failed")]
    IdnaConversion {
        #[source]
        source: idna::Errors,
    },
    #[error("resolver initialization failed: {source}")]
    ResolverInit {
        #[source]
        source: std::io::Error,
    },
    #[error("lookup for {name} timed out")]
    Timeout { name: String },
    #[error("lookup failed for {name}: {source}")]
    Resolve {
        name: String,
        #[source]
        source: ResolveError,
    },
}

impl LookupError {
    pub(crate) fn idna(source: idna::Errors) -> Self {
        Self::IdnaConversion { source }
    }

    pub(crate) fn resolver_init(source: std::io::Error) -> Self {
        Self::ResolverInit { source }
    }

    pub(crate) fn timeout(name: impl Into<String>) -> Self {
        Self::Timeout { name: name.into() }
    }

    pub(crate) fn resolve(name: impl Into<String>, source: ResolveError) -> Self {
        Self::Resolve {
            name: name.into(),
            source,
        }
    }

    /// Whether retrying the same query may plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Resolve { source, .. } => match source.kind() {
                ResolveErrorKind::Timeout
                | ResolveErrorKind::NoConnections
                | ResolveErrorKind::Io(_)
                | ResolveErrorKind::Proto(_) => true,
                ResolveErrorKind::NoRecordsFound { response_code, .. } => {
                    *response_code == ResponseCode::ServFail
                }
                _ => false,
            },
            Self::EmptyDomain | Self::IdnaConversion { .. } | Self::ResolverInit { .. } => false,
        }
    }
}
