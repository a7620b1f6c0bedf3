pub const SPF_PREFIX: &str = "v=spf1";
pub const DMARC_PREFIX: &str = "v=DMARC1";

/// Outcome of scanning a TXT record set for a policy signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub matched: bool,
    pub record: String,
}

/// Returns the first record starting with `prefix`, compared byte for byte.
///
/// Records are scanned in the order the DNS answer listed them; nothing is
/// trimmed, case-folded, sorted or deduplicated.
pub fn classify(records: &[String], prefix: &str) -> Classification {
    records
        .iter()
        .find(|record| record.starts_with(prefix))
        .map(|record| Classification {
            matched: true,
            record: record.clone(),
        })
        .unwrap_or_default()
}
