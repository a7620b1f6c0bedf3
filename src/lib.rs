#![forbid(unsafe_code)]
//! mailposture_lib — MX/SPF/DMARC posture of a list of domains

pub mod batch;
pub mod input;
pub mod posture;
pub mod report;

pub use batch::{BatchError, BatchOptions, BatchSummary, run_batch};
pub use input::domain_lines;
pub use posture::{
    Classification, DMARC_PREFIX, DnsLookup, LookupError, LookupOptions, MxRecord,
    PostureReport, SPF_PREFIX, build_resolver, check_domain, classify, verify_domain,
};
pub use report::{COLUMNS, EmitError, ReportFormat, ReportWriter};
