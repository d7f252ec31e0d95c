//! Shared blackboard behaviour through the public context API.

use super::helpers::{Coordination, agent, coordination, task};
use chrono::TimeDelta;
use concord::blackboard::{
    domain::WriteOptions,
    services::{BlackboardError, TRUNCATION_MARKER},
};
use rstest::rstest;
use serde_json::{Value, json};

#[rstest]
fn latest_write_wins(coordination: Coordination) {
    let board = coordination.context.blackboard();
    board
        .write(
            "key1",
            "first",
            agent("MARS"),
            task("task-001"),
            WriteOptions::new(),
        )
        .expect("first write");
    coordination.clock.advance(TimeDelta::seconds(1));
    board
        .write(
            "key1",
            "second",
            agent("VENUS"),
            task("task-001"),
            WriteOptions::new(),
        )
        .expect("second write");

    let latest = board
        .read("key1", &task("task-001"))
        .expect("read")
        .expect("entry present");
    assert_eq!(latest.value(), &Value::from("second"));
    assert_eq!(latest.agent(), &agent("VENUS"));
    assert_eq!(
        board
            .history("key1", &task("task-001"))
            .expect("history")
            .len(),
        2
    );
}

#[rstest]
fn read_all_ranks_by_confidence(coordination: Coordination) {
    let board = coordination.context.blackboard();
    for (key, confidence) in [("a", 0.5), ("b", 0.9), ("c", 0.7)] {
        board
            .write(
                key,
                key,
                agent("MARS"),
                task("task-001"),
                WriteOptions::new().with_confidence(confidence),
            )
            .expect("write");
    }

    let scores: Vec<f64> = board
        .read_all(&task("task-001"), None)
        .expect("read all")
        .iter()
        .map(|entry| entry.confidence().value())
        .collect();
    assert_eq!(scores, vec![0.9, 0.7, 0.5]);
}

#[rstest]
fn tag_filter_matches_any_requested_tag(coordination: Coordination) {
    let board = coordination.context.blackboard();
    board
        .write(
            "schema",
            json!({"table": "users"}),
            agent("MARS"),
            task("task-001"),
            WriteOptions::new().with_tag("database"),
        )
        .expect("write");
    board
        .write(
            "layout",
            "grid",
            agent("VENUS"),
            task("task-001"),
            WriteOptions::new().with_tag("ui"),
        )
        .expect("write");

    let tagged = board
        .read_all(&task("task-001"), Some(&["database", "security"][..]))
        .expect("filtered read");
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged.first().map(|entry| entry.key()), Some("schema"));
}

#[rstest]
fn supersede_keeps_the_old_entry_for_audit(coordination: Coordination) {
    let board = coordination.context.blackboard();
    let original = board
        .write(
            "port",
            8080,
            agent("MARS"),
            task("task-001"),
            WriteOptions::new(),
        )
        .expect("write");
    coordination.clock.advance(TimeDelta::seconds(1));
    let replacement = board
        .supersede(original.id(), "port", 9090, agent("SATURN"))
        .expect("supersede");

    assert_eq!(replacement.supersedes(), Some(original.id()));
    assert_eq!(replacement.task_id(), &task("task-001"));
    assert_eq!(
        board
            .read("port", &task("task-001"))
            .expect("read")
            .map(|entry| entry.id()),
        Some(replacement.id())
    );
    assert!(board.get(original.id()).expect("get").is_some());
    let chain: Vec<_> = board
        .supersession_chain(replacement.id())
        .expect("chain")
        .iter()
        .map(concord::blackboard::domain::BlackboardEntry::id)
        .collect();
    assert_eq!(chain, vec![replacement.id(), original.id()]);
}

#[rstest]
fn superseding_an_unknown_entry_fails(coordination: Coordination) {
    let board = coordination.context.blackboard();
    let missing = concord::blackboard::domain::EntryId::new();
    let result = board.supersede(missing, "port", 1, agent("MARS"));
    assert!(matches!(result, Err(BlackboardError::EntryNotFound(id)) if id == missing));
}

#[rstest]
fn prompt_block_respects_the_token_budget(coordination: Coordination) {
    let board = coordination.context.blackboard();
    for n in 0..20 {
        board
            .write(
                format!("finding-{n}"),
                "x".repeat(120),
                agent("MARS"),
                task("task-001"),
                WriteOptions::new().with_confidence(0.9),
            )
            .expect("write");
    }

    let block = board
        .format_for_prompt(&task("task-001"), 50)
        .expect("format");
    let chars = block.chars().count();
    assert!(chars < 300);
    assert!(block.ends_with(TRUNCATION_MARKER));
    assert!(chars <= 4 * 50 + TRUNCATION_MARKER.chars().count());
}

#[rstest]
fn snapshot_and_clear_are_scoped_to_one_task(coordination: Coordination) {
    let board = coordination.context.blackboard();
    board
        .write(
            "k",
            "one",
            agent("MARS"),
            task("task-001"),
            WriteOptions::new(),
        )
        .expect("write");
    board
        .write(
            "k",
            "two",
            agent("MARS"),
            task("task-002"),
            WriteOptions::new(),
        )
        .expect("write");

    assert_eq!(board.clear(&task("task-001")).expect("clear"), 1);

    assert!(
        board
            .snapshot(&task("task-001"))
            .expect("snapshot")
            .is_empty()
    );
    let other = board.snapshot(&task("task-002")).expect("snapshot");
    assert_eq!(
        other.get("k").map(|entry| entry.value().clone()),
        Some(Value::from("two"))
    );
}
