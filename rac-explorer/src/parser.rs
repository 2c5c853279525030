//! Parsers for the `key : value` block format printed by `rac`.
//!
//! These are pure functions over string input. Malformed lines are skipped
//! without error since the tool's output varies between platform versions.

use std::collections::HashMap;

/// One textual block, field name to value, both trimmed
pub type RawRecord = HashMap<String, String>;

/// Parses a single block.
///
/// Only lines containing exactly one `:` produce a field. Lines with none or
/// several (timestamps, for instance) are ignored. A repeated key keeps the
/// last value.
pub fn parse_record(text: &str) -> RawRecord {
    parse_lines(text.lines())
}

/// Parses a multi-block listing.
///
/// Every empty line closes the current segment, so `n` blank lines yield
/// `n + 1` records in input order. Segments with no fields (for instance the
/// one after a trailing blank line) come back as empty records.
pub fn parse_multi_record(text: &str) -> Vec<RawRecord> {
    let mut records = Vec::new();
    let mut block = Vec::new();

    for line in text.lines() {
        if line.is_empty() {
            records.push(parse_lines(block.drain(..)));
        } else {
            block.push(line);
        }
    }
    records.push(parse_lines(block));

    records
}

fn parse_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> RawRecord {
    let mut record = RawRecord::new();
    for line in lines {
        let mut parts = line.split(':');
        if let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) {
            record.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROCESS_LIST: &str = "\
process              : 1b3fa7d4-0b9e-4a3e-9c55-2f3d5a1c6e01
host                 : srv-app-01
port                 : 1560
pid                  : 4521
started-at           : 2024-03-11T08:15:42
available-perfomance : 154

process              : 7c2e91aa-4f10-4d8b-b1a2-9e6f0c3d2b77
host                 : srv-app-02
port                 : 1561
pid                  : 3310
available-perfomance : 98

";

    #[test]
    fn test_parse_record_trims_and_skips_multi_colon_lines() {
        let record = parse_record("  host :  srv-app-01  \nstarted-at : 2024-03-11T08:15:42\nno separator here");
        assert_eq!(record.len(), 1);
        assert_eq!(record["host"], "srv-app-01");
        assert!(!record.contains_key("started-at"));
    }

    #[test]
    fn test_parse_record_last_duplicate_wins() {
        let record = parse_record("host: a\nhost: b");
        assert_eq!(record["host"], "b");
    }

    #[test]
    fn test_parse_record_keeps_empty_values() {
        let record = parse_record("descr :\n: orphan");
        assert_eq!(record["descr"], "");
        assert_eq!(record[""], "orphan");
    }

    #[test]
    fn test_parse_record_handles_crlf() {
        let record = parse_record("host : srv\r\nport : 1560\r\n");
        assert_eq!(record["host"], "srv");
        assert_eq!(record["port"], "1560");
    }

    #[test]
    fn test_parse_record_reserialize_is_stable() {
        let record = parse_record(PROCESS_LIST.split("\n\n").next().unwrap());
        let serialized: String = record
            .iter()
            .map(|(key, value)| format!("{key}: {value}\n"))
            .collect();
        assert_eq!(parse_record(&serialized), record);
    }

    #[test]
    fn test_parse_multi_record_keeps_order_and_trailing_segment() {
        let records = parse_multi_record(PROCESS_LIST);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["host"], "srv-app-01");
        assert_eq!(records[0]["available-perfomance"], "154");
        assert_eq!(records[1]["host"], "srv-app-02");
        assert!(records[2].is_empty());
    }

    #[test]
    fn test_parse_multi_record_counts_every_blank_line() {
        assert_eq!(parse_multi_record("").len(), 1);
        assert_eq!(parse_multi_record("a: 1").len(), 1);
        assert_eq!(parse_multi_record("a: 1\n").len(), 1);
        assert_eq!(parse_multi_record("\na: 1").len(), 2);
        assert_eq!(parse_multi_record("a: 1\n\n\nb: 2").len(), 3);

        let records = parse_multi_record("a: 1\n\n\nb: 2");
        assert_eq!(records[0]["a"], "1");
        assert!(records[1].is_empty());
        assert_eq!(records[2]["b"], "2");
    }

    #[test]
    fn test_parse_multi_record_whitespace_line_is_not_a_boundary() {
        let records = parse_multi_record("a: 1\n   \nb: 2");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["a"], "1");
        assert_eq!(records[0]["b"], "2");
    }
}
