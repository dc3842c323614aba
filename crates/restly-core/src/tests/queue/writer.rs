use crate::{
    Action, Command, CommandQueue, NO_PARAMS, QueueError, SessionParams,
    tests::queue::{FixedClock, SteppingClock, fixed_instant, read_records},
};

use std::collections::BTreeMap;

use chrono::{DateTime, Timelike};
use serde_json::{Map, Value, json};
use tempfile::tempdir;

const FIXED_TS: &str = "2026-10-18T09:30:00+00:00";

fn fixed_queue(path: &std::path::Path) -> CommandQueue {
    CommandQueue::new(path)
        .with_clock(FixedClock(fixed_instant()))
        .with_sync_on_write(false)
}

/// WHAT: set_session record carries ts, action and params exactly
/// WHY: The consumer starts a 45-minute deep work session from this line
#[test]
#[allow(clippy::unwrap_used)]
fn given_set_session_params_when_enqueued_then_last_line_matches_scenario() {
    // Given: A queue in an empty temp dir
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");
    let queue = fixed_queue(&path);

    // When: Enqueueing the deep work session
    queue
        .enqueue(
            "set_session",
            Some(&json!({"duration_minutes": 45, "type": "deep_work"})),
        )
        .unwrap();

    // Then: The last line holds exactly ts, action and params
    let records = read_records(&path);
    let last = records.last().unwrap();
    assert_eq!(last.as_object().unwrap().len(), 3);
    assert_eq!(last["ts"], FIXED_TS);
    assert_eq!(last["action"], "set_session");
    assert_eq!(last["params"], json!({"duration_minutes": 45, "type": "deep_work"}));
}

/// WHAT: Parameterless actions have no params key at all
/// WHY: The consumer distinguishes "absent" from null or empty
#[test]
#[allow(clippy::unwrap_used)]
fn given_toggle_pause_when_enqueued_then_params_key_absent() {
    // Given: A queue in an empty temp dir
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");
    let queue = fixed_queue(&path);

    // When: Enqueueing toggle_pause without params
    queue.enqueue("toggle_pause", NO_PARAMS).unwrap();

    // Then: Only ts and action are present
    let raw = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        raw,
        format!("{{\"ts\":\"{FIXED_TS}\",\"action\":\"toggle_pause\"}}\n")
    );
}

/// WHAT: Natural-language text survives byte-for-byte
/// WHY: The text is forwarded to the backend without interpretation
#[test]
#[allow(clippy::unwrap_used)]
fn given_nl_text_when_enqueued_then_text_preserved_verbatim() {
    // Given: Text with spaces and punctuation
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");
    let queue = fixed_queue(&path);
    let text = "Reschedule my break for after this Zoom call";

    // When: Enqueueing it as nl_command
    queue.enqueue("nl_command", Some(&json!({"text": text}))).unwrap();

    // Then: Parsed text equals the input and appears literally in the line
    let records = read_records(&path);
    assert_eq!(records[0]["params"]["text"], text);
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains(text));
}

/// WHAT: Non-ASCII text is written as raw UTF-8
/// WHY: The queue file is UTF-8 JSONL, not ASCII-escaped JSON
#[test]
#[allow(clippy::unwrap_used)]
fn given_non_ascii_text_when_enqueued_then_written_unescaped() {
    // Given: Text with accents and an emoji
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");
    let queue = fixed_queue(&path);
    let text = "Pause für 10 Minuten ☕";

    // When: Enqueueing it
    queue.submit(&Command::nl(text)).unwrap();

    // Then: The raw bytes contain the text unescaped
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains(text));
    assert!(!raw.starts_with('\u{feff}'));
}

/// WHAT: Embedded newlines do not split a record
/// WHY: One record per line is the framing the consumer relies on
#[test]
#[allow(clippy::unwrap_used)]
fn given_text_with_newline_when_enqueued_then_single_line_written() {
    // Given: Multi-line text
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");
    let queue = fixed_queue(&path);

    // When: Enqueueing it
    queue.submit(&Command::nl("first\nsecond\r\nthird")).unwrap();

    // Then: Exactly one line exists and the text round-trips
    let raw = std::fs::read_to_string(&path).unwrap();
    assert_eq!(raw.lines().count(), 1);
    assert_eq!(read_records(&path)[0]["params"]["text"], "first\nsecond\r\nthird");
}

/// WHAT: Missing queue directories are created on first enqueue
/// WHY: A fresh user profile has no ~/.config/restly/commands yet
#[test]
#[allow(clippy::unwrap_used)]
fn given_missing_directory_when_enqueued_then_directory_created_with_one_record() {
    // Given: A path several levels below a non-existent directory
    let dir = tempdir().unwrap();
    let path = dir.path().join("restly").join("commands").join("queue.jsonl");
    let queue = fixed_queue(&path);
    assert!(!path.parent().unwrap().exists());

    // When: Enqueueing once
    queue.enqueue("summarize_day", NO_PARAMS).unwrap();

    // Then: Directory exists and holds exactly one record
    assert!(path.parent().unwrap().is_dir());
    assert_eq!(read_records(&path).len(), 1);
}

/// WHAT: N sequential calls produce N lines in call order
/// WHY: File order is the only ordering the consumer sees
#[test]
#[allow(clippy::unwrap_used)]
fn given_sequence_of_commands_when_enqueued_then_lines_in_call_order() {
    // Given: A queue and a mixed sequence of commands
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");
    let queue = fixed_queue(&path);
    let commands = [
        Command::SetSession(SessionParams::default()),
        Command::TogglePause,
        Command::nl("one"),
        Command::TogglePause,
        Command::SummarizeDay,
        Command::nl("two"),
    ];

    // When: Submitting them one after another
    for command in &commands {
        queue.submit(command).unwrap();
    }

    // Then: One parseable line per command, in order
    let records = read_records(&path);
    assert_eq!(records.len(), commands.len());
    for (record, command) in records.iter().zip(&commands) {
        assert_eq!(record["action"], command.action().as_str());
    }
    assert_eq!(records[2]["params"]["text"], "one");
    assert_eq!(records[5]["params"]["text"], "two");
}

/// WHAT: Existing queue content is kept when appending
/// WHY: The queue is append-only; records are never rewritten
#[test]
#[allow(clippy::unwrap_used)]
fn given_existing_records_when_enqueued_then_previous_lines_untouched() {
    // Given: A queue file with an unread record from earlier
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");
    let earlier = "{\"ts\":\"2026-10-17T08:00:00+00:00\",\"action\":\"toggle_pause\"}\n";
    std::fs::write(&path, earlier).unwrap();
    let queue = fixed_queue(&path);

    // When: Enqueueing a new record
    queue.enqueue("summarize_day", NO_PARAMS).unwrap();

    // Then: The earlier line is intact and the new one follows it
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.starts_with(earlier));
    assert_eq!(raw.lines().count(), 2);
}

/// WHAT: ts is whole-second UTC ISO-8601
/// WHY: Consumers parse ts with a fixed format
#[test]
#[allow(clippy::unwrap_used)]
fn given_system_clock_when_enqueued_then_ts_has_no_fraction_and_utc_offset() {
    // Given: A queue stamped by the real clock
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");
    let queue = CommandQueue::new(&path);

    // When: Enqueueing once
    queue.enqueue(Action::TogglePause, NO_PARAMS).unwrap();

    // Then: ts parses as RFC 3339, has zero nanoseconds and a +00:00 offset
    let records = read_records(&path);
    let ts = records[0]["ts"].as_str().unwrap();
    assert!(ts.ends_with("+00:00"));
    assert!(!ts.contains('.'));
    let parsed = DateTime::parse_from_rfc3339(ts).unwrap();
    assert_eq!(parsed.nanosecond(), 0);
    assert_eq!(parsed.offset().local_minus_utc(), 0);
}

/// WHAT: Fractional seconds from the clock are truncated, not rounded
/// WHY: A record must never be stamped later than the moment it was issued
#[test]
#[allow(clippy::unwrap_used)]
fn given_clock_with_millis_when_enqueued_then_ts_truncated_to_second() {
    // Given: A clock at 09:30:00.750
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");
    let queue = fixed_queue(&path);

    // When: Enqueueing
    queue.enqueue(Action::SummarizeDay, NO_PARAMS).unwrap();

    // Then: ts reads 09:30:00
    assert_eq!(read_records(&path)[0]["ts"], FIXED_TS);
}

/// WHAT: ts is non-decreasing across consecutive calls
/// WHY: Within one process file order and time order must agree
#[test]
#[allow(clippy::unwrap_used)]
fn given_advancing_clock_when_enqueued_repeatedly_then_ts_non_decreasing() {
    // Given: A clock advancing 400ms per call, so truncation collides seconds
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");
    let queue = CommandQueue::new(&path)
        .with_clock(SteppingClock::new(super::FIXED_MILLIS, 400))
        .with_sync_on_write(false);

    // When: Enqueueing ten records
    for _ in 0..10 {
        queue.enqueue(Action::TogglePause, NO_PARAMS).unwrap();
    }

    // Then: Parsed timestamps never go backwards
    let stamps: Vec<_> = read_records(&path)
        .iter()
        .map(|r| DateTime::parse_from_rfc3339(r["ts"].as_str().unwrap()).unwrap())
        .collect();
    assert_eq!(stamps.len(), 10);
    assert!(stamps.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(stamps.first() < stamps.last());
}

/// WHAT: Real-clock timestamps are non-decreasing too
/// WHY: Guards against stamping from anything but the call moment
#[test]
#[allow(clippy::unwrap_used)]
fn given_system_clock_when_enqueued_repeatedly_then_ts_non_decreasing() {
    // Given: A queue stamped by the real clock
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");
    let queue = CommandQueue::new(&path).with_sync_on_write(false);

    // When: Enqueueing twenty records back to back
    for i in 0..20 {
        queue.submit(&Command::nl(format!("command {i}"))).unwrap();
    }

    // Then: Timestamps are ordered
    let stamps: Vec<_> = read_records(&path)
        .iter()
        .map(|r| DateTime::parse_from_rfc3339(r["ts"].as_str().unwrap()).unwrap())
        .collect();
    assert!(stamps.windows(2).all(|pair| pair[0] <= pair[1]));
}

/// WHAT: Unserializable params fail before any write
/// WHY: A failed call must never leave a partial line behind
#[test]
#[allow(clippy::unwrap_used)]
fn given_unserializable_params_when_enqueued_then_serialization_error_and_file_unchanged() {
    // Given: An existing queue file and params with non-string map keys
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");
    let earlier = "{\"ts\":\"2026-10-17T08:00:00+00:00\",\"action\":\"toggle_pause\"}\n";
    std::fs::write(&path, earlier).unwrap();
    let queue = fixed_queue(&path);
    let mut params = BTreeMap::new();
    params.insert((1u8, 2u8), "tuple keys have no JSON form");

    // When: Enqueueing with those params
    let result = queue.enqueue("nl_command", Some(&params));

    // Then: SerializationFailed and the file is byte-identical
    assert!(matches!(result, Err(QueueError::SerializationFailed { .. })));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), earlier);
}

/// WHAT: Serialization failure does not create the queue file
/// WHY: Nothing on disk may change when the record cannot be built
#[test]
#[allow(clippy::unwrap_used)]
fn given_unserializable_params_and_no_file_when_enqueued_then_nothing_created() {
    // Given: No queue directory yet
    let dir = tempdir().unwrap();
    let path = dir.path().join("commands").join("queue.jsonl");
    let queue = fixed_queue(&path);
    let mut params = BTreeMap::new();
    params.insert(vec![1u8], 1u8);

    // When: Enqueueing with unserializable params
    let result = queue.enqueue("set_session", Some(&params));

    // Then: Error, and neither directory nor file exists
    assert!(matches!(result, Err(QueueError::SerializationFailed { .. })));
    assert!(!path.exists());
    assert!(!path.parent().unwrap().exists());
}

/// WHAT: NaN params fail instead of being written as null
/// WHY: A record must read back exactly as it was enqueued
#[test]
#[allow(clippy::unwrap_used)]
fn given_nan_param_when_enqueued_then_serialization_error_and_file_unchanged() {
    // Given: An existing queue file and a NaN value
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");
    let earlier = "{\"ts\":\"2026-10-17T08:00:00+00:00\",\"action\":\"toggle_pause\"}\n";
    std::fs::write(&path, earlier).unwrap();
    let queue = fixed_queue(&path);
    let mut params = BTreeMap::new();
    params.insert("ratio", f64::NAN);

    // When: Enqueueing it
    let result = queue.enqueue("set_session", Some(&params));

    // Then: SerializationFailed, file byte-identical
    assert!(matches!(result, Err(QueueError::SerializationFailed { .. })));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), earlier);
}

/// WHAT: Infinities nested in lists are rejected too
/// WHY: Non-finite numbers have no JSON form at any depth
#[test]
#[allow(clippy::unwrap_used)]
fn given_nested_infinity_when_enqueued_then_serialization_error() {
    // Given: A queue and params with an infinite f32 inside a list
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");
    let queue = fixed_queue(&path);
    let mut params = BTreeMap::new();
    params.insert("weights", vec![Some(0.5f32), None, Some(f32::NEG_INFINITY)]);

    // When: Enqueueing it
    let result = queue.enqueue("set_session", Some(&params));

    // Then: SerializationFailed, no file
    assert!(matches!(result, Err(QueueError::SerializationFailed { .. })));
    assert!(!path.exists());
}

/// WHAT: Finite floats are written unchanged
/// WHY: Only NaN and infinity are refused
#[test]
#[allow(clippy::unwrap_used)]
fn given_finite_float_when_enqueued_then_value_written() {
    // Given: A queue
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");
    let queue = fixed_queue(&path);
    let mut params = BTreeMap::new();
    params.insert("ratio", 0.25f64);

    // When: Enqueueing it
    queue.enqueue("set_session", Some(&params)).unwrap();

    // Then: The number survives the round trip
    let records = read_records(&path);
    assert_eq!(records[0]["params"], json!({"ratio": 0.25}));
}

/// WHAT: Params that are not a JSON object are rejected
/// WHY: params is a mapping on the wire
#[test]
#[allow(clippy::unwrap_used)]
fn given_scalar_params_when_enqueued_then_params_not_an_object_error() {
    // Given: A queue
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");
    let queue = fixed_queue(&path);

    // When: Enqueueing a bare number as params
    let result = queue.enqueue("set_session", Some(&45));

    // Then: ParamsNotAnObject, file untouched
    assert!(matches!(
        result,
        Err(QueueError::ParamsNotAnObject { ref action, .. }) if action == "set_session"
    ));
    assert!(!path.exists());
}

/// WHAT: An empty params mapping is omitted
/// WHY: params is present only when the action carries arguments
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_params_when_enqueued_then_params_key_absent() {
    // Given: A queue and an empty mapping
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");
    let queue = fixed_queue(&path);
    let params: Map<String, Value> = Map::new();

    // When: Enqueueing with it
    queue.enqueue("summarize_day", Some(&params)).unwrap();

    // Then: No params key
    let records = read_records(&path);
    assert!(records[0].get("params").is_none());
}

/// WHAT: Unknown action tags are written as given
/// WHY: The writer does not validate the vocabulary
#[test]
#[allow(clippy::unwrap_used)]
fn given_unknown_action_when_enqueued_then_written_as_is() {
    // Given: A queue
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");
    let queue = fixed_queue(&path);

    // When: Enqueueing an action outside the vocabulary
    queue
        .enqueue("reschedule_break", Some(&json!({"delay_minutes": 15})))
        .unwrap();

    // Then: The record carries it unchanged
    let records = read_records(&path);
    assert_eq!(records[0]["action"], "reschedule_break");
    assert_eq!(records[0]["params"]["delay_minutes"], 15);
}

/// WHAT: Directory creation failure is reported as CreateDirFailed
/// WHY: Callers need to tell setup failures from write failures
#[test]
#[allow(clippy::unwrap_used)]
fn given_parent_is_a_file_when_enqueued_then_create_dir_failed() {
    // Given: A regular file where the queue directory should be
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("restly");
    std::fs::write(&blocker, "not a directory").unwrap();
    let path = blocker.join("commands").join("queue.jsonl");
    let queue = fixed_queue(&path);

    // When: Enqueueing
    let result = queue.enqueue("toggle_pause", NO_PARAMS);

    // Then: CreateDirFailed
    assert!(matches!(result, Err(QueueError::CreateDirFailed { .. })));
}

/// WHAT: An unopenable queue path is reported as WriteFailed
/// WHY: IO failures propagate instead of being swallowed
#[test]
#[allow(clippy::unwrap_used)]
fn given_queue_path_is_directory_when_enqueued_then_write_failed() {
    // Given: A directory at the queue file path
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");
    std::fs::create_dir(&path).unwrap();
    let queue = fixed_queue(&path);

    // When: Enqueueing
    let result = queue.enqueue("toggle_pause", NO_PARAMS);

    // Then: WriteFailed naming the path
    assert!(matches!(
        result,
        Err(QueueError::WriteFailed { path: ref failed, .. }) if *failed == path
    ));
}

/// WHAT: submit maps typed commands onto the wire shape
/// WHY: The tray only speaks in typed commands
#[test]
#[allow(clippy::unwrap_used)]
fn given_typed_session_when_submitted_then_type_key_renamed() {
    // Given: A typed set_session command
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.jsonl");
    let queue = fixed_queue(&path);

    // When: Submitting it
    queue
        .submit(&Command::SetSession(SessionParams::new(25, "admin")))
        .unwrap();

    // Then: params use duration_minutes and type
    let records = read_records(&path);
    assert_eq!(records[0]["action"], "set_session");
    assert_eq!(records[0]["params"], json!({"duration_minutes": 25, "type": "admin"}));
}
