use super::{ReportFormat, ReportWriter};
use crate::posture::PostureReport;

fn spf_only() -> PostureReport {
    PostureReport {
        domain: "example.com".to_string(),
        has_mx: true,
        has_spf: true,
        spf_record: "v=spf1 -all".to_string(),
        has_dmarc: false,
        dmarc_record: String::new(),
    }
}

fn with_commas() -> PostureReport {
    PostureReport {
        domain: "example.org".to_string(),
        has_mx: false,
        has_spf: true,
        spf_record: "v=spf1 ip4:192.0.2.1,192.0.2.2 -all".to_string(),
        has_dmarc: true,
        dmarc_record: "v=DMARC1; p=reject".to_string(),
    }
}

fn render(format: ReportFormat, reports: &[PostureReport]) -> String {
    let mut writer = ReportWriter::new(Vec::new(), format).expect("format available");
    writer.write_header().expect("header written");
    for report in reports {
        writer.write_report(report).expect("row written");
    }
    let bytes = writer.into_inner().expect("flush succeeds");
    String::from_utf8(bytes).expect("utf-8 output")
}

#[test]
fn legacy_rows_use_comma_space_layout() {
    let out = render(ReportFormat::Legacy, &[spf_only()]);
    assert_eq!(
        out,
        "domain,hasMX,hasSPF,spfRecord,hasDMARC,dmarcRecord\n\
         example.com, true, true, v=spf1 -all, false, \n"
    );
}

#[test]
fn legacy_rows_do_not_escape_commas() {
    let out = render(ReportFormat::Legacy, &[with_commas()]);
    let row = out.lines().nth(1).expect("data row");
    assert_eq!(
        row,
        "example.org, false, true, v=spf1 ip4:192.0.2.1,192.0.2.2 -all, true, v=DMARC1; p=reject"
    );
}

#[test]
fn header_is_written_once() {
    let mut writer = ReportWriter::new(Vec::new(), ReportFormat::Legacy).expect("legacy");
    writer.write_header().expect("header");
    writer.write_header().expect("header again");
    writer.write_report(&spf_only()).expect("row");
    assert_eq!(writer.rows(), 1);
    let out = String::from_utf8(writer.into_inner().expect("flush")).expect("utf-8");
    assert_eq!(out.matches("domain,hasMX").count(), 1);
}

#[test]
fn first_row_writes_missing_header() {
    let mut writer = ReportWriter::new(Vec::new(), ReportFormat::Legacy).expect("legacy");
    writer.write_report(&spf_only()).expect("row");
    let out = String::from_utf8(writer.into_inner().expect("flush")).expect("utf-8");
    assert!(out.starts_with("domain,hasMX,hasSPF,spfRecord,hasDMARC,dmarcRecord\n"));
}

#[test]
fn format_names_round_trip() {
    for format in [ReportFormat::Legacy, ReportFormat::Csv, ReportFormat::Ndjson] {
        assert_eq!(format.as_str().parse::<ReportFormat>(), Ok(format));
    }
    assert!("json".parse::<ReportFormat>().is_err());
}

#[cfg(feature = "with-csv")]
#[test]
fn csv_quotes_fields_with_commas() {
    let out = render(ReportFormat::Csv, &[spf_only(), with_commas()]);
    insta::assert_snapshot!(out.trim_end(), @r###"
    domain,hasMX,hasSPF,spfRecord,hasDMARC,dmarcRecord
    example.com,true,true,v=spf1 -all,false,
    example.org,false,true,"v=spf1 ip4:192.0.2.1,192.0.2.2 -all",true,v=DMARC1; p=reject
    "###);
}

#[cfg(not(feature = "with-csv"))]
#[test]
fn csv_requires_feature() {
    assert!(ReportWriter::new(Vec::new(), ReportFormat::Csv).is_err());
}

#[cfg(feature = "with-serde")]
#[test]
fn ndjson_uses_column_names_and_no_header() {
    let out = render(ReportFormat::Ndjson, &[spf_only()]);
    assert_eq!(out.lines().count(), 1);
    let value: serde_json::Value = serde_json::from_str(out.trim_end()).expect("valid json");
    assert_eq!(value["domain"], "example.com");
    assert_eq!(value["hasMX"], true);
    assert_eq!(value["spfRecord"], "v=spf1 -all");
    assert_eq!(value["hasDMARC"], false);
    assert_eq!(value["dmarcRecord"], "");
}
