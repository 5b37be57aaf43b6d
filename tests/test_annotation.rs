mod common;
use common::{block, summary_header};
use ictal::annotation::parse_summary;
use ictal::{SeizureEvent, Skip};

#[test]
fn three_seizure_block_yields_three_events() {
    let text = block("chb01_04.edf", "3", &[(1467, 1494), (1732, 1772), (3001, 3030)]);
    let parsed = parse_summary(&text);

    let events: Vec<SeizureEvent> = parsed
        .seizure_records
        .iter()
        .flat_map(|r| r.seizure_events.iter().copied())
        .collect();
    assert_eq!(
        events,
        vec![
            SeizureEvent::new(1467, 1494).unwrap(),
            SeizureEvent::new(1732, 1772).unwrap(),
            SeizureEvent::new(3001, 3030).unwrap(),
        ]
    );
    assert_eq!(parsed.seizure_records.len(), 3);
    assert!(parsed.seizure_records.iter().all(|r| r.seizure_events.len() == 1));
    assert!(parsed.seizure_records.iter().all(|r| r.file_id == "chb01_04.edf"));
    assert!(parsed.non_seizure_records.is_empty());
    assert!(parsed.diagnostics.is_empty());
}

#[test]
fn two_seizure_block() {
    let text = block("chb02_16.edf", "2", &[(130, 212), (2972, 3053)]);
    let parsed = parse_summary(&text);
    assert_eq!(parsed.seizure_records.len(), 2);
    assert_eq!(parsed.seizure_records[1].seizure_events[0], SeizureEvent::new(2972, 3053).unwrap());
}

#[test]
fn zero_count_is_non_seizure() {
    let text = block("chb01_01.edf", "0", &[]);
    let parsed = parse_summary(&text);
    assert!(parsed.seizure_records.is_empty());
    assert_eq!(parsed.non_seizure_records.len(), 1);
    assert_eq!(parsed.non_seizure_records[0].file_id, "chb01_01.edf");
    assert!(!parsed.non_seizure_records[0].is_seizure());
}

#[test]
fn unrecognised_counts_are_non_seizure_not_dropped() {
    let mut text = block("a.edf", "4", &[(1, 2), (3, 4), (5, 6), (7, 8)]);
    text += &block("b.edf", "many", &[]);
    let parsed = parse_summary(&text);
    let ids: Vec<&str> = parsed.non_seizure_records.iter().map(|r| r.file_id.as_str()).collect();
    assert_eq!(ids, vec!["a.edf", "b.edf"]);
    assert!(parsed.seizure_records.is_empty());
}

#[test]
fn full_summary_with_header_and_mixed_blocks() {
    let mut text = summary_header();
    text += &block("chb01_01.edf", "0", &[]);
    text += &block("chb01_03.edf", "1", &[(2996, 3036)]);
    text += &block("chb01_05.edf", "0", &[]);
    text += &block("chb01_18.edf", "2", &[(1720, 1810), (2500, 2560)]);

    let parsed = parse_summary(&text);
    let seizure_ids: Vec<&str> = parsed.seizure_records.iter().map(|r| r.file_id.as_str()).collect();
    let non_ids: Vec<&str> = parsed.non_seizure_records.iter().map(|r| r.file_id.as_str()).collect();
    assert_eq!(seizure_ids, vec!["chb01_03.edf", "chb01_18.edf", "chb01_18.edf"]);
    assert_eq!(non_ids, vec!["chb01_01.edf", "chb01_05.edf"]);
    assert!(parsed.diagnostics.is_empty());
}

#[test]
fn crlf_and_trailing_whitespace_tolerated() {
    let unix = block("chb03_01.edf", "1", &[(362, 414)]);
    let windows = unix.replace('\n', "  \r\n");
    assert_eq!(parse_summary(&unix), parse_summary(&windows));
}

#[test]
fn malformed_end_line_skips_only_that_event() {
    let text = "File Name: chb05_06.edf\n\
                File Start Time: 08:00:00\n\
                File End Time: 09:00:00\n\
                Number of Seizures in File: 2\n\
                Seizure 1 Start Time: 417 seconds\n\
                Seizure 1 End Time: ??? seconds\n\
                Seizure 2 Start Time: 1086 seconds\n\
                Seizure 2 End Time: 1196 seconds\n";
    let parsed = parse_summary(text);
    assert_eq!(parsed.seizure_records.len(), 1);
    assert_eq!(parsed.seizure_records[0].seizure_events[0], SeizureEvent::new(1086, 1196).unwrap());
    assert_eq!(parsed.diagnostics.len(), 1);
    assert!(matches!(parsed.diagnostics[0], Skip::Parse { line: 5, .. }));
}

#[test]
fn end_before_start_is_a_parse_skip() {
    let text = block("x.edf", "1", &[(500, 400)]);
    let parsed = parse_summary(&text);
    assert!(parsed.seizure_records.is_empty());
    assert!(parsed.non_seizure_records.is_empty());
    assert_eq!(parsed.diagnostics.len(), 1);
}

#[test]
fn truncated_counted_block_is_dropped_whole() {
    // Count says 2 but the input ends after the first pair.
    let text = "File Name: chb07_12.edf\n\
                File Start Time: 08:00:00\n\
                File End Time: 09:00:00\n\
                Number of Seizures in File: 2\n\
                Seizure 1 Start Time: 4920 seconds\n\
                Seizure 1 End Time: 5006 seconds";
    let parsed = parse_summary(text);
    assert!(parsed.seizure_records.is_empty());
    assert!(parsed.non_seizure_records.is_empty());
    assert_eq!(parsed.diagnostics.len(), 1);
}

#[test]
fn later_blocks_survive_a_bad_one() {
    let mut text = block("bad.edf", "1", &[(10, 5)]);
    text += &block("good.edf", "1", &[(600, 700)]);
    let parsed = parse_summary(&text);
    assert_eq!(parsed.seizure_records.len(), 1);
    assert_eq!(parsed.seizure_records[0].file_id, "good.edf");
}

#[test]
fn empty_input() {
    let parsed = parse_summary("");
    assert!(parsed.seizure_records.is_empty());
    assert!(parsed.non_seizure_records.is_empty());
    assert!(parsed.diagnostics.is_empty());
}
