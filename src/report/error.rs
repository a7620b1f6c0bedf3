use thiserror::Error;

/// Failures of the report sink. Always fatal for a batch.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("writing report failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[cfg(feature = "with-csv")]
    #[error("writing CSV row failed: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },
    #[cfg(feature = "with-serde")]
    #[error("serializing report failed: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("format '{format}' requires the '{feature}' feature")]
    FormatUnavailable {
        format: &'static str,
        feature: &'static str,
    },
}
