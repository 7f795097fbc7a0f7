//! Tests for metrics emitted by the wrap boundary and the settings store.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use serde_json::{Value, json};

use mimir::settings::MODULE_NAME;
use mimir::telemetry;
use mimir::{
    ConnectionProfile, MemoryBackend, Mimir, RequestSender, SendRequest, SettingsBackend,
    SettingsStore,
};

// ============================================================================
// Mock sender
// ============================================================================

struct EchoSender;

#[async_trait]
impl RequestSender for EchoSender {
    type Response = Value;
    type Error = String;

    async fn send_request(&self, request: SendRequest) -> Result<Value, String> {
        Ok(Value::Object(request.override_payload))
    }
}

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Sum counter values for `name` carrying `label = value`.
fn labelled_total(snapshot: &SnapshotVec, name: &str, label: &str, value: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| {
            key.kind() == MetricKind::Counter
                && key.key().name() == name
                && key
                    .key()
                    .labels()
                    .any(|l| l.key() == label && l.value() == value)
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

fn profiles() -> HashMap<String, ConnectionProfile> {
    let mut profiles = HashMap::new();
    profiles.insert(
        "claude".to_string(),
        ConnectionProfile::new("claude-3-5-sonnet", "https://nano-gpt.com/api/v1"),
    );
    profiles.insert(
        "gpt".to_string(),
        ConnectionProfile::new("gpt-4o", "https://api.openai.com/v1"),
    );
    profiles
}

/// Send one request per profile id through a layer over `store`.
async fn send_all(store: SettingsStore, ids: &[&str]) {
    let sender = Mimir::builder()
        .settings(Arc::new(store))
        .profiles(profiles())
        .build()
        .wrap(EchoSender);
    for id in ids {
        sender
            .send_request(SendRequest::new(*id, "hi"))
            .await
            .unwrap();
    }
}

// ============================================================================
// Tests
// ============================================================================

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` ensures the sync `with_local_recorder` closure stays
/// on the current thread while `block_on` drives the inner async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn decisions_record_attach_and_skip_counters() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                send_all(SettingsStore::ephemeral(), &["claude", "gpt", "claude"]).await;
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::DIRECTIVES_ATTACHED_TOTAL), 2);
    assert_eq!(
        labelled_total(&snapshot, telemetry::DIRECTIVES_SKIPPED_TOTAL, "reason", "model"),
        1
    );
    assert_eq!(counter_total(&snapshot, telemetry::POLICY_ERRORS_TOTAL), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn malformed_settings_record_policy_error() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let backend = MemoryBackend::new();
    backend.write(MODULE_NAME, &json!({"enabled": 1})).unwrap();
    let store = SettingsStore::new(Arc::new(backend));

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                send_all(store, &["claude"]).await;
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::POLICY_ERRORS_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::DIRECTIVES_ATTACHED_TOTAL), 0);
}

#[test]
fn backfill_records_one_counter_per_field() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let backend = MemoryBackend::new();
    backend
        .write(MODULE_NAME, &json!({"enabled": true, "ttl": "5m", "onlyClaude": true}))
        .unwrap();
    let store = SettingsStore::new(Arc::new(backend));

    metrics::with_local_recorder(&recorder, || {
        store.load();
        store.load();
    });

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::SETTINGS_BACKFILLED_TOTAL), 2);
    assert_eq!(
        labelled_total(
            &snapshot,
            telemetry::SETTINGS_BACKFILLED_TOTAL,
            "field",
            "urlSubstring"
        ),
        1
    );
}

#[test]
fn failed_save_records_counter() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();
    let store = SettingsStore::new(Arc::new(mimir::JsonFileBackend::new(&path)));

    metrics::with_local_recorder(&recorder, || store.save());

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(
        counter_total(&snapshot, telemetry::SETTINGS_SAVE_FAILURES_TOTAL),
        1
    );
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    send_all(SettingsStore::ephemeral(), &["claude", "gpt"]).await;
}
