// Dweve RCS Stream - Streaming parser for RCS history files
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Integration tests for rcs-stream

use rcs_stream::{
    parse, parse_with_config, BranchList, Event, EventKind, EventLog, NullObserver, ParserConfig,
    RevisionInfo, RevisionRecord, StreamError, Tag, TraceObserver,
};
use rcs_test::fixtures;
use rcs_test::fixtures::errors::{empty_samples, invalid_rcs_samples};
use std::io::{Cursor, Write};

fn parse_str(input: &str) -> EventLog {
    let mut log = EventLog::new();
    parse(Cursor::new(input), &mut log).unwrap();
    log
}

fn parse_with_buffer(input: &str, buffer_size: usize) -> EventLog {
    let config = ParserConfig {
        buffer_size,
        ..Default::default()
    };
    let mut log = EventLog::new();
    parse_with_config(Cursor::new(input), &mut log, config).unwrap();
    log
}

fn revision(
    revision: &str,
    timestamp: i64,
    author: &str,
    state: &str,
    branches: &[&str],
    next: Option<&str>,
) -> Event {
    Event::Revision(RevisionRecord {
        revision: revision.to_string(),
        timestamp,
        author: author.to_string(),
        state: state.to_string(),
        branches: branches.iter().map(|b| b.to_string()).collect::<BranchList>(),
        next: next.map(str::to_string),
    })
}

fn info(revision: &str, log: &str, text: &str) -> Event {
    Event::RevisionInfo(RevisionInfo {
        revision: revision.to_string(),
        log: log.to_string(),
        text: text.to_string(),
    })
}

fn tag(name: &str, revision: &str) -> Event {
    Event::Tag(Tag {
        name: name.to_string(),
        revision: revision.to_string(),
    })
}

/// Position of an event kind in the fixed phase order.
fn phase(kind: EventKind) -> u8 {
    match kind {
        EventKind::HeadRevision
        | EventKind::PrincipalBranch
        | EventKind::Tag
        | EventKind::Comment
        | EventKind::Expansion => 0,
        EventKind::Revision => 1,
        EventKind::TreeCompleted => 2,
        EventKind::Description => 3,
        EventKind::RevisionInfo => 4,
        EventKind::ParseCompleted => 5,
    }
}

fn assert_phase_order(log: &EventLog) {
    let kinds = log.kinds();
    for pair in kinds.windows(2) {
        assert!(
            phase(pair[0]) <= phase(pair[1]),
            "{} delivered after {}",
            pair[1],
            pair[0]
        );
    }
    for once in [
        EventKind::TreeCompleted,
        EventKind::Description,
        EventKind::ParseCompleted,
    ] {
        assert_eq!(kinds.iter().filter(|k| **k == once).count(), 1, "{}", once);
    }
}

// ==================== Fixture Tests ====================

#[test]
fn test_minimal() {
    let log = parse_str(&fixtures::minimal());

    assert_eq!(
        log.events(),
        &[
            Event::HeadRevision("1.1".to_string()),
            Event::Comment("# ".to_string()),
            revision("1.1", 1_705_311_000, "alice", "Exp", &[], None),
            Event::TreeCompleted,
            Event::Description(String::new()),
            info("1.1", "Initial revision\n", "hello\n"),
            Event::ParseCompleted,
        ]
    );
}

#[test]
fn test_no_revisions() {
    let log = parse_str(&fixtures::no_revisions());

    assert_eq!(
        log.events(),
        &[
            Event::Comment("# ".to_string()),
            Event::TreeCompleted,
            Event::Description("Placeholder".to_string()),
            Event::ParseCompleted,
        ]
    );
}

#[test]
fn test_linear_history() {
    let log = parse_str(&fixtures::linear_history());

    let tags: Vec<_> = log.tags().cloned().map(Event::Tag).collect();
    assert_eq!(tags, vec![tag("REL_1_1", "1.3"), tag("REL_1_0", "1.1")]);

    let revisions: Vec<_> = log.revisions().collect();
    assert_eq!(revisions.len(), 3);
    assert_eq!(revisions[0].revision, "1.3");
    assert_eq!(revisions[0].timestamp, 1_709_294_400);
    assert_eq!(revisions[0].author, "carol");
    assert_eq!(revisions[0].next.as_deref(), Some("1.2"));
    assert_eq!(revisions[1].next.as_deref(), Some("1.1"));
    assert_eq!(revisions[2].next, None);

    let infos: Vec<_> = log.revision_infos().collect();
    assert_eq!(infos[0].text, "line one\nline two\nline three\n");
    assert_eq!(infos[1].log, "Second\n");
    assert_eq!(infos[2].text, "d2 1\n");
    assert_phase_order(&log);
}

#[test]
fn test_branched() {
    let log = parse_str(&fixtures::branched());

    assert_eq!(log.events()[0], Event::HeadRevision("1.2".to_string()));
    assert_eq!(log.events()[1], Event::PrincipalBranch("1.1.1".to_string()));
    assert!(log.events().contains(&Event::Expansion("kv".to_string())));
    assert_eq!(log.tags().count(), 3);

    let tree: Vec<_> = log
        .events()
        .iter()
        .filter(|e| e.is_revision())
        .cloned()
        .collect();
    assert_eq!(
        tree,
        vec![
            revision("1.2", 1_714_636_800, "dev", "Exp", &["1.2.2.1"], Some("1.1")),
            revision("1.1", 1_714_550_400, "importer", "Exp", &["1.1.1.1"], None),
            revision("1.1.1.1", 1_714_550_400, "importer", "Exp", &[], None),
            revision("1.2.2.1", 1_714_723_200, "dev", "Exp", &[], None),
        ]
    );

    let branch_revisions: Vec<_> = log
        .revisions()
        .filter(|r| r.is_branch_revision())
        .map(|r| r.revision.as_str())
        .collect();
    assert_eq!(branch_revisions, vec!["1.1.1.1", "1.2.2.1"]);

    let last = log.revision_infos().last().unwrap();
    assert_eq!(last.revision, "1.1.1.1");
    assert_eq!(last.text, "");
}

#[test]
fn test_newphrases_are_skipped() {
    let log = parse_str(&fixtures::with_newphrases());

    let revisions: Vec<_> = log.revisions().collect();
    assert_eq!(revisions.len(), 2);
    assert_eq!(revisions[0].author, "John Doe");
    assert_eq!(revisions[0].next.as_deref(), Some("1.1"));
    assert_eq!(revisions[1].author, "jdoe");
    assert_eq!(revisions[1].state, "dead");

    let infos: Vec<_> = log.revision_infos().collect();
    assert_eq!(infos[0].log, "Address @jdoe review\n");
    assert_eq!(infos[0].text, "mail: jdoe@example.com\n");
    assert_phase_order(&log);
}

#[test]
fn test_comprehensive() {
    let log = parse_str(&fixtures::comprehensive());

    assert_eq!(
        &log.events()[..7],
        &[
            Event::HeadRevision("1.3".to_string()),
            Event::PrincipalBranch("1.3.1".to_string()),
            tag("release-2", "1.3"),
            tag("release-1", "1.2"),
            tag("start", "1.1"),
            Event::Comment(" * ".to_string()),
            Event::Expansion("o".to_string()),
        ]
    );

    let revisions: Vec<_> = log.revisions().collect();
    assert_eq!(revisions.len(), 5);
    assert_eq!(revisions[0].timestamp, 1_000_217_716);
    assert_eq!(revisions[0].state, "Stab");
    assert_eq!(revisions[1].timestamp, 946_684_799);
    assert_eq!(
        revisions[1].branches.as_slice(),
        &["1.2.2.1".to_string(), "1.2.4.1".to_string()]
    );
    assert_eq!(revisions[2].timestamp, 883_612_800);
    assert_eq!(revisions[3].timestamp, 946_684_800);
    assert_eq!(revisions[4].timestamp, 949_363_200);

    assert!(log
        .events()
        .contains(&Event::Description("Description with ; and : and @ inside.\n".to_string())));

    let infos: Vec<_> = log.revision_infos().collect();
    assert_eq!(infos.len(), 5);
    assert_eq!(infos[0].log, "Release two; finally.\n");
    assert!(infos[0].text.contains("int main(void) { return 0; }"));
    assert_eq!(infos[4].revision, "1.2.4.1");
    assert_phase_order(&log);
}

#[test]
fn test_all_fixtures_complete() {
    for (name, fixture) in fixtures::all() {
        let mut log = EventLog::new();
        parse(Cursor::new(fixture()), &mut log)
            .unwrap_or_else(|e| panic!("fixture {} failed: {}", name, e));
        assert!(log.is_complete(), "fixture {}", name);
        assert_phase_order(&log);
    }
}

// ==================== Buffer Size Tests ====================

#[test]
fn test_buffer_size_does_not_change_events() {
    for (name, fixture) in fixtures::all() {
        let input = fixture();
        let expected = parse_str(&input).into_events();

        for buffer_size in [1, 2, 3, 7, 16, 64, 1000] {
            let events = parse_with_buffer(&input, buffer_size).into_events();
            assert_eq!(events, expected, "fixture {} with buffer {}", name, buffer_size);
        }
    }
}

#[test]
fn test_large_text_body() {
    let body: String = (0..20_000).map(|i| format!("line {} @ ; :\n", i)).collect();
    let input = format!(
        "head 1.1; comment @@;\n         1.1 date 2024.01.01.00.00.00; author a; state Exp; branches; next ;\n         desc @@\n         1.1 log @big@ text @{}@\n",
        body.replace('@', "@@")
    );
    assert!(input.len() > rcs_stream::DEFAULT_BUFFER_SIZE * 10);

    let log = parse_str(&input);
    let info = log.revision_infos().next().unwrap();
    assert_eq!(info.text, body);
}

// ==================== Source Tests ====================

#[test]
fn test_parse_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(fixtures::linear_history().as_bytes()).unwrap();
    file.flush().unwrap();

    let mut log = EventLog::new();
    parse(std::fs::File::open(file.path()).unwrap(), &mut log).unwrap();
    assert_eq!(log.revisions().count(), 3);
    assert!(log.is_complete());
}

#[test]
fn test_parse_with_boxed_observer() {
    let mut observer: Box<dyn rcs_stream::Observer> = Box::new(NullObserver);
    parse(Cursor::new(fixtures::comprehensive()), &mut observer).unwrap();
}

#[test]
fn test_trace_observer() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("trace"))
        .with_test_writer()
        .try_init();

    parse(Cursor::new(fixtures::branched()), &mut TraceObserver).unwrap();
}

// ==================== Error Tests ====================

#[test]
fn test_empty_input() {
    for input in empty_samples() {
        let mut log = EventLog::new();
        let err = parse(Cursor::new(input), &mut log).unwrap_err();
        assert!(err.is_empty_input());
        assert!(log.is_empty());
    }
}

#[test]
fn test_whitespace_only_is_syntax_error() {
    let mut log = EventLog::new();
    let err = parse(Cursor::new(" \n\t\n"), &mut log).unwrap_err();
    assert!(err.is_syntax(), "{}", err);
    assert!(log.is_empty());
}

#[test]
fn test_invalid_samples() {
    for (name, input) in invalid_rcs_samples() {
        let mut log = EventLog::new();
        let err = parse(Cursor::new(input), &mut log).unwrap_err();
        assert!(err.is_syntax(), "sample {}: {}", name, err);
        assert!(!log.is_complete(), "sample {}", name);
        assert!(err.offset().unwrap() <= input.len() as u64, "sample {}", name);
    }
}

#[test]
fn test_invalid_samples_keep_delivered_prefix() {
    for (name, input) in invalid_rcs_samples() {
        let mut log = EventLog::new();
        let _ = parse(Cursor::new(input), &mut log);
        assert_phase_prefix(&log, name);
    }
}

fn assert_phase_prefix(log: &EventLog, name: &str) {
    let kinds = log.kinds();
    for pair in kinds.windows(2) {
        assert!(phase(pair[0]) <= phase(pair[1]), "sample {}", name);
    }
}

#[test]
fn test_bad_date_message() {
    let input = "head 1.1; comment @@;\n                 1.1 date 2024.13.01.00.00.00; author a; state Exp; branches; next ;\n                 desc @@";
    let mut log = EventLog::new();
    let err = parse(Cursor::new(input), &mut log).unwrap_err();

    match err {
        StreamError::Syntax { offset, message } => {
            assert_eq!(offset, input.find("2024.13").unwrap() as u64);
            assert!(message.contains("1.1"), "{}", message);
        }
        other => panic!("expected syntax error, got {:?}", other),
    }
}

#[test]
fn test_invalid_utf8() {
    let mut input = b"head 1.1; comment @@;\ndesc @".to_vec();
    input.extend_from_slice(&[0xE9, b't', 0xE9]);
    input.extend_from_slice(b"@\n");

    let mut log = EventLog::new();
    let err = parse(Cursor::new(input.clone()), &mut log).unwrap_err();
    assert!(matches!(err, StreamError::Utf8 { .. }), "{:?}", err);

    let config = ParserConfig {
        lossy_utf8: true,
        ..Default::default()
    };
    let mut log = EventLog::new();
    parse_with_config(Cursor::new(input), &mut log, config).unwrap();
    assert!(log
        .events()
        .contains(&Event::Description("\u{FFFD}t\u{FFFD}".to_string())));
}

#[test]
fn test_max_token_length() {
    let config = ParserConfig {
        max_token_length: 16,
        ..Default::default()
    };
    let input = format!(
        "head ; comment @@; desc @@ 1.1 log @l@ text @{}@",
        "x".repeat(100)
    );

    let mut log = EventLog::new();
    let err = parse_with_config(Cursor::new(input), &mut log, config).unwrap_err();
    assert!(matches!(err, StreamError::TokenTooLong { .. }), "{:?}", err);
    assert_eq!(log.revision_infos().count(), 0);
}
