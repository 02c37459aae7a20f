use chrono::{Duration, Utc};
use lens_protocol::{RunStatus, StreamChunkParams};
use lens_state::{StreamBufferStore, STREAM_CHUNK_CAP};

fn chunk(log_id: &str, text: &str) -> StreamChunkParams {
    StreamChunkParams {
        task_id: "task-1".into(),
        stage_id: None,
        stage_name: None,
        log_id: log_id.into(),
        tool_call_id: None,
        chunk: text.into(),
        finished: false,
        status: None,
    }
}

#[test]
fn test_no_replay_of_history() {
    let mut store = StreamBufferStore::new();
    let t = Utc::now();
    store.subscribe("log-1", t);

    store.append(&chunk("log-1", "X"), t - Duration::seconds(1));
    assert!(store.snapshot("log-1").unwrap().chunks.is_empty(), "pre-subscription chunk must be dropped");

    store.append(&chunk("log-1", "Y"), t + Duration::seconds(1));
    assert_eq!(store.snapshot("log-1").unwrap().chunks, vec!["Y"]);
}

#[test]
fn test_chunk_at_subscription_instant_is_kept() {
    let mut store = StreamBufferStore::new();
    let t = Utc::now();
    store.subscribe("log-1", t);
    store.append(&chunk("log-1", "X"), t);
    assert_eq!(store.snapshot("log-1").unwrap().chunks, vec!["X"]);
}

#[test]
fn test_unsubscribed_append_is_a_noop() {
    let mut store = StreamBufferStore::new();
    store.append(&chunk("log-1", "X"), Utc::now());
    assert!(store.snapshot("log-1").is_none(), "unwatched logs must not be buffered");
    assert!(store.is_empty());
}

#[test]
fn test_ring_keeps_most_recent_2000() {
    let mut store = StreamBufferStore::new();
    let t = Utc::now();
    store.subscribe("log-1", t);
    for i in 0..2500 {
        store.append(&chunk("log-1", &format!("c{i}")), t + Duration::seconds(1));
    }
    let snapshot = store.snapshot("log-1").unwrap();
    assert_eq!(snapshot.chunks.len(), STREAM_CHUNK_CAP);
    assert_eq!(snapshot.chunks.first().unwrap(), "c500");
    assert_eq!(snapshot.chunks.last().unwrap(), "c2499");
}

#[test]
fn test_unsubscribe_stops_appends_but_keeps_chunks() {
    let mut store = StreamBufferStore::new();
    let t = Utc::now();
    store.subscribe("log-1", t);
    store.append(&chunk("log-1", "A"), t);

    store.unsubscribe("log-1");
    store.append(&chunk("log-1", "B"), t + Duration::seconds(1));

    let snapshot = store.snapshot("log-1").unwrap();
    assert_eq!(snapshot.chunks, vec!["A"], "append after unsubscribe must not take effect");
    assert!(!snapshot.subscribed);
}

#[test]
fn test_resubscribe_preserves_chunks_and_timestamp() {
    let mut store = StreamBufferStore::new();
    let t = Utc::now();
    store.subscribe("log-1", t);
    store.append(&chunk("log-1", "A"), t);

    // Re-subscribe later without clearing: the original instant stays, so a
    // chunk between the two subscribe calls is still in-window.
    store.subscribe("log-1", t + Duration::seconds(10));
    store.append(&chunk("log-1", "B"), t + Duration::seconds(5));

    assert_eq!(store.snapshot("log-1").unwrap().chunks, vec!["A", "B"]);
}

#[test]
fn test_clear_resets_to_empty_running() {
    let mut store = StreamBufferStore::new();
    let t = Utc::now();
    store.subscribe("log-1", t);
    let mut finished = chunk("log-1", "A");
    finished.finished = true;
    store.append(&finished, t);
    assert_eq!(store.snapshot("log-1").unwrap().status, RunStatus::Success);

    store.clear("log-1");
    let snapshot = store.snapshot("log-1").unwrap();
    assert!(snapshot.chunks.is_empty());
    assert_eq!(snapshot.status, RunStatus::Running);
}

#[test]
fn test_status_precedence_on_append() {
    let mut store = StreamBufferStore::new();
    let t = Utc::now();
    store.subscribe("log-1", t);

    // Neither status nor finished: stays running.
    store.append(&chunk("log-1", "A"), t);
    assert_eq!(store.snapshot("log-1").unwrap().status, RunStatus::Running);

    // finished without explicit status: success.
    let mut finished = chunk("log-1", "B");
    finished.finished = true;
    store.append(&finished, t);
    assert_eq!(store.snapshot("log-1").unwrap().status, RunStatus::Success);

    // Explicit status wins over finished.
    let mut failed = chunk("log-1", "C");
    failed.finished = true;
    failed.status = Some(RunStatus::Failed);
    store.append(&failed, t);
    assert_eq!(store.snapshot("log-1").unwrap().status, RunStatus::Failed);
}

#[test]
fn test_empty_chunk_updates_status_only() {
    let mut store = StreamBufferStore::new();
    let t = Utc::now();
    store.subscribe("log-1", t);
    let mut terminal = chunk("log-1", "");
    terminal.status = Some(RunStatus::Cancelled);
    store.append(&terminal, t);

    let snapshot = store.snapshot("log-1").unwrap();
    assert!(snapshot.chunks.is_empty(), "empty chunks are not buffered");
    assert_eq!(snapshot.status, RunStatus::Cancelled);
}

#[test]
fn test_set_status_reconciles_polled_state() {
    let mut store = StreamBufferStore::new();
    store.subscribe("log-1", Utc::now());
    store.set_status("log-1", RunStatus::Failed);
    assert_eq!(store.snapshot("log-1").unwrap().status, RunStatus::Failed);

    // Unknown log id: nothing created.
    store.set_status("log-9", RunStatus::Failed);
    assert!(store.snapshot("log-9").is_none());
}

#[test]
fn test_logs_are_partitioned() {
    let mut store = StreamBufferStore::new();
    let t = Utc::now();
    store.subscribe("log-1", t);
    store.subscribe("log-2", t);
    store.append(&chunk("log-1", "one"), t);
    store.append(&chunk("log-2", "two"), t);

    assert_eq!(store.snapshot("log-1").unwrap().chunks, vec!["one"]);
    assert_eq!(store.snapshot("log-2").unwrap().chunks, vec!["two"]);
    assert_eq!(store.len(), 2);
}
