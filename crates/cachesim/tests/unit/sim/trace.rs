use std::io::Write;

use cachesim::SimError;
use cachesim::sim::trace::{Operation, Trace, TraceEntry};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_parse_in_order() {
    let trace = Trace::parse("r 400341a0\nw 7fffed80\nr 0\n", 32).unwrap();
    assert_eq!(
        trace.entries(),
        &[
            TraceEntry::read(0x4003_41a0),
            TraceEntry::write(0x7fff_ed80),
            TraceEntry::read(0),
        ]
    );
    assert_eq!(trace.count(Operation::Read), 2);
    assert_eq!(trace.count(Operation::Write), 1);
}

#[test]
fn test_parse_skips_blank_lines_and_trims() {
    let trace = Trace::parse("\nr 10\n   \n\tw   20  \r\n\n", 32).unwrap();
    assert_eq!(trace.len(), 2);
    assert_eq!(trace.entries()[1], TraceEntry::write(0x20));
}

#[test]
fn test_parse_empty_text() {
    let trace = Trace::parse("", 32).unwrap();
    assert!(trace.is_empty());
}

#[rstest]
#[case("r", 1)]
#[case("r 10\nw", 2)]
#[case("x 10", 1)]
#[case("R 10", 1)]
#[case("read 10", 1)]
#[case("r 10 20", 1)]
#[case("r 10\n\nr zz", 3)]
#[case("w 0x10", 1)]
#[case("r 100000000", 1)]
fn test_parse_reports_bad_line(#[case] text: &str, #[case] line: usize) {
    match Trace::parse(text, 32) {
        Err(SimError::TraceFormat { line: got, .. }) => assert_eq!(got, line),
        other => panic!("expected a trace format error, got {:?}", other),
    }
}

#[test]
fn test_parse_error_message() {
    let err = Trace::parse("r 10\nq 20", 32).unwrap_err();
    assert_eq!(
        err.to_string(),
        "trace format error at line 2: unknown operation 'q' (expected 'r' or 'w')"
    );
}

#[test]
fn test_address_width_applies() {
    assert!(Trace::parse("r 7fffffff", 31).is_ok());
    assert!(Trace::parse("r 80000000", 31).is_err());
}

#[test]
fn test_load_from_file() {
    crate::init_logging();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "w 10").unwrap();
    writeln!(file, "r 10").unwrap();
    writeln!(file, "r 30").unwrap();

    let trace = Trace::load(file.path(), 32).unwrap();
    assert_eq!(trace.len(), 3);
    assert_eq!(trace.entries()[0].op, Operation::Write);
}

#[test]
fn test_load_rejects_non_utf8_line() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"r 10\nw 2\xff0\nr 30\n").unwrap();

    match Trace::load(file.path(), 32) {
        Err(SimError::TraceFormat { line, reason }) => {
            assert_eq!(line, 2);
            assert_eq!(reason, "invalid UTF-8");
        }
        other => panic!("expected a trace format error, got {:?}", other),
    }
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.txt");

    match Trace::load(&path, 32) {
        Err(SimError::Io { path: got, .. }) => assert_eq!(got, path),
        other => panic!("expected an I/O error, got {:?}", other),
    }
}

#[test]
fn test_clone_shares_entries() {
    let trace: Trace = (0..4).map(|i| TraceEntry::read(i * 16)).collect();
    let copy = trace.clone();
    assert_eq!(copy, trace);
    assert_eq!(copy.iter().count(), 4);
}
