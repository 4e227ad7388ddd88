//! Unit tests for trk-perf.

#[cfg(test)]
mod helpers {
    use crate::PerformanceDocument;

    pub const AMX: [(&str, &str); 20] = [
        ("nPrf", "A1"),
        ("descricao", "AMX"),
        ("esteira", "M"),
        ("tetosv", "420"),
        ("faixa", "420"),
        ("veldec", "125"),
        ("velsbdec", "190"),
        ("velapx", "160"),
        ("velcruz", "440"),
        ("velmxcrz", "540"),
        ("rzsubdec", "1300"),
        ("rzmxsbdec", "3500"),
        ("rzsbcrz", "1900"),
        ("rzmxsbcrz", "3500"),
        ("rzdescapx", "2500"),
        ("rzmxdesapx", "4000"),
        ("rzdescrz", "2000"),
        ("rzmxdescrz", "3500"),
        ("razvarvel", "45"),
        ("rzmxvarvel", "60"),
    ];

    pub fn document() -> PerformanceDocument {
        PerformanceDocument::signed().with_record(AMX)
    }
}

#[cfg(test)]
mod table {
    use super::helpers::{AMX, document};
    use crate::{PerfError, PerfIssue, PerformanceDocument, PerformanceTable, WakeCategory};

    #[test]
    fn loads_typed_record() {
        let (table, report) = PerformanceTable::from_document(&document()).unwrap();
        assert_eq!(report.loaded, 1);
        assert!(report.skipped.is_empty());
        assert!(table.contains("A1"));

        let amx = table.get("A1").unwrap();
        assert_eq!(amx.description, "AMX");
        assert_eq!(amx.wake, WakeCategory::Medium);
        assert_eq!(amx.ceiling_fl, 420.0);
        assert_eq!(amx.cruise_speed, 440.0);
        assert_eq!(amx.max_speed_change_rate, 60.0);
        assert!(amx.validate().is_empty());
    }

    #[test]
    fn signature_checks_in_order() {
        let mut doc = document();
        doc.root = "fixes".into();
        doc.format = "OTHER".into();
        assert!(matches!(
            PerformanceTable::from_document(&doc),
            Err(PerfError::NotAPerformanceFile(r)) if r == "fixes"
        ));

        let mut doc = document();
        doc.format = "OTHER".into();
        assert!(matches!(PerformanceTable::from_document(&doc), Err(PerfError::UnsupportedFormat(_))));

        let mut doc = document();
        doc.code = "2001".into();
        assert!(matches!(PerformanceTable::from_document(&doc), Err(PerfError::BadSignature(_))));
    }

    #[test]
    fn record_without_designator_is_skipped() {
        let doc = PerformanceDocument::signed()
            .with_record([("descricao", "orphan"), ("tetosv", "100")])
            .with_record(AMX)
            .with_record([("nPrf", "  "), ("tetosv", "100")]);
        let (table, report) = PerformanceTable::from_document(&doc).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(report.skipped, vec![0, 2]);
    }

    #[test]
    fn unparsable_number_is_invalid_field() {
        let doc = PerformanceDocument::signed().with_record([("nPrf", "B7"), ("velcruz", "fast")]);
        match PerformanceTable::from_document(&doc) {
            Err(PerfError::InvalidField { designator, field, value }) => {
                assert_eq!(designator, "B7");
                assert_eq!(field, "velcruz");
                assert_eq!(value, "fast");
            }
            other => panic!("expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_designator_replaces() {
        let doc = document().with_record([("nPrf", "A1"), ("descricao", "AMX-T"), ("tetosv", "400")]);
        let (table, report) = PerformanceTable::from_document(&doc).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(report.replaced, vec!["A1".to_string()]);
        assert_eq!(table.get("A1").unwrap().description, "AMX-T");
    }

    #[test]
    fn designators_are_sorted() {
        let doc = PerformanceDocument::signed()
            .with_record([("nPrf", "C3"), ("tetosv", "1")])
            .with_record([("nPrf", "A1"), ("tetosv", "1")])
            .with_record([("nPrf", "B2"), ("tetosv", "1")]);
        let (table, _) = PerformanceTable::from_document(&doc).unwrap();
        assert_eq!(table.designators().collect::<Vec<_>>(), ["A1", "B2", "C3"]);
    }

    #[test]
    fn validate_reports_inconsistent_bands() {
        let doc = PerformanceDocument::signed().with_record([
            ("nPrf", "X1"),
            ("velcruz", "500"),
            ("velmxcrz", "450"),
            ("rzdescrz", "3000"),
            ("rzmxdescrz", "2000"),
        ]);
        let (table, _) = PerformanceTable::from_document(&doc).unwrap();
        let issues = table.get("X1").unwrap().validate();
        assert!(issues.contains(&PerfIssue::NonPositiveCeiling(0.0)));
        assert!(issues.contains(&PerfIssue::AboveMaximum {
            field:   "cruise_speed",
            value:   500.0,
            maximum: 450.0,
        }));
        assert!(issues.iter().any(|i| matches!(i, PerfIssue::AboveMaximum { field: "cruise_descent_rate", .. })));
        assert_eq!(issues.len(), 3);
    }
}

#[cfg(test)]
mod document {
    use std::io::{Cursor, Write};

    use crate::{PerfError, PerformanceTable, load_performance_json, load_performance_reader};

    const JSON: &str = r#"{
        "root": "performances", "format": "NEWTON", "code": "1961", "version": "0001",
        "records": [
            { "nPrf": "A1", "descricao": "AMX", "esteira": "m", "tetosv": "420" },
            { "descricao": "no designator" }
        ]
    }"#;

    #[test]
    fn loads_json_reader() {
        let doc = load_performance_reader(Cursor::new(JSON)).unwrap();
        let (table, report) = PerformanceTable::from_document(&doc).unwrap();
        assert_eq!(table.version(), Some("0001"));
        assert_eq!(table.len(), 1);
        assert_eq!(report.skipped, vec![1]);
    }

    #[test]
    fn loads_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("performances.json");
        std::fs::File::create(&path).unwrap().write_all(JSON.as_bytes()).unwrap();
        let doc = load_performance_json(&path).unwrap();
        assert_eq!(doc.records.len(), 2);
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            load_performance_reader(Cursor::new("{ not json")),
            Err(PerfError::Parse(_))
        ));
    }
}
