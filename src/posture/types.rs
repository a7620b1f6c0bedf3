use std::time::Duration;

use tokio_retry::strategy::ExponentialBackoff;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_ATTEMPTS: usize = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(200);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(2);

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MxRecord {
    pub preference: u16,
    pub exchange: String,
}

impl MxRecord {
    pub fn new(preference: u16, exchange: impl Into<String>) -> Self {
        Self {
            preference,
            exchange: exchange.into(),
        }
    }
}

/// Mail-authentication posture of one domain.
///
/// Every field is always set: a failed lookup leaves its flag `false` and its
/// record empty.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostureReport {
    pub domain: String,
    #[cfg_attr(feature = "with-serde", serde(rename = "hasMX"))]
    pub has_mx: bool,
    #[cfg_attr(feature = "with-serde", serde(rename = "hasSPF"))]
    pub has_spf: bool,
    #[cfg_attr(feature = "with-serde", serde(rename = "spfRecord"))]
    pub spf_record: String,
    #[cfg_attr(feature = "with-serde", serde(rename = "hasDMARC"))]
    pub has_dmarc: bool,
    #[cfg_attr(feature = "with-serde", serde(rename = "dmarcRecord"))]
    pub dmarc_record: String,
}

impl PostureReport {
    /// Report for a domain with nothing published.
    pub fn absent(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Self::default()
        }
    }
}

/// Timeout and retry knobs applied to every DNS query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupOptions {
    timeout: Duration,
    attempts: usize,
    retry_delay: Duration,
}

impl LookupOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total tries per query, first one included. Clamped to at least one.
    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Delays between attempts: `retry_delay`, then doubling, capped.
    pub(crate) fn retry_strategy(&self) -> impl Iterator<Item = Duration> + use<> {
        // ExponentialBackoff::from_millis(2) yields 2, 4, 8.. ms; halved, that is
        // the multiplier applied to `retry_delay` (1, 2, 4..).
        let delay = self.retry_delay;
        ExponentialBackoff::from_millis(2)
            .map(move |step| {
                let multiplier = u32::try_from(step.as_millis() / 2).unwrap_or(u32::MAX);
                delay.saturating_mul(multiplier).min(MAX_RETRY_DELAY)
            })
            .take(self.attempts.saturating_sub(1))
    }
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            attempts: DEFAULT_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}
