#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{as_output, ScriptedOutput};
use gridlog_core::{
    AppenderRegistry, ErrorKind, FileAppender, FileOutput, GridLogError, IdentityAware, NodeId,
};
use std::sync::{Arc, Barrier};
use std::thread;
use uuid::Uuid;

fn node(s: &str) -> NodeId {
    NodeId::from_uuid(Uuid::parse_str(s).unwrap())
}

#[test]
fn test_partial_failure_names_only_failed_output() {
    let reg = AppenderRegistry::new();
    let alpha = ScriptedOutput::new("alpha");
    let flaky = ScriptedOutput::failing("flaky");
    let gamma = ScriptedOutput::new("gamma");
    for output in [&alpha, &flaky, &gamma] {
        reg.add(as_output(output)).unwrap();
    }
    let id = node("3f2504e0-4f89-11d3-9a0c-0305e82c3301");

    let err = reg.propagate_identity(id).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PartialPropagationFailure);
    assert_eq!(err.code(), "ERR_PARTIAL_PROPAGATION");
    assert_eq!(err.failed_outputs(), vec!["flaky"]);

    assert_eq!(alpha.identity(), Some(id));
    assert_eq!(gamma.identity(), Some(id));
    for output in [&alpha, &flaky, &gamma] {
        assert_eq!(output.activations(), 1);
    }
    assert!(reg.list_paths().contains(&"alpha-3f2504e0.log".to_string()));
}

#[test]
fn test_failure_reason_carries_output_error() {
    let reg = AppenderRegistry::new();
    reg.add(as_output(&ScriptedOutput::failing("ro"))).unwrap();

    let err = reg
        .propagate_identity(node("0b3a5e9c-2d4f-4e61-8a7b-9c0d1e2f3a4b"))
        .unwrap_err();

    match err {
        GridLogError::PartialPropagation { failed } => {
            assert_eq!(failed.len(), 1);
            assert!(failed[0].reason.contains("read-only file system"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_plain_outputs_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let plain_path = dir.path().join("plain.log");
    let reg = AppenderRegistry::new();
    let plain: Arc<dyn FileOutput> = Arc::new(FileAppender::new("plain", &plain_path));
    let aware = ScriptedOutput::new("aware");
    reg.add(plain).unwrap();
    reg.add(as_output(&aware)).unwrap();

    reg.propagate_identity(NodeId::new()).unwrap();

    assert_eq!(aware.activations(), 1);
    assert!(reg
        .list_paths()
        .contains(&plain_path.to_string_lossy().into_owned()));
}

#[test]
fn test_node_aware_file_appender_follows_identity() {
    let dir = tempfile::tempdir().unwrap();
    let reg = AppenderRegistry::new();
    let file: Arc<dyn FileOutput> =
        Arc::new(FileAppender::node_aware("main", dir.path().join("grid.log")));
    reg.add(file.clone()).unwrap();

    reg.propagate_identity(node("3f2504e0-4f89-11d3-9a0c-0305e82c3301"))
        .unwrap();

    let expected = dir.path().join("grid-3f2504e0.log");
    assert_eq!(reg.list_paths(), vec![expected.to_string_lossy().into_owned()]);
    assert!(expected.exists());
}

#[test]
fn test_repropagation_reactivates_outputs() {
    let reg = AppenderRegistry::new();
    let out = ScriptedOutput::new("again");
    reg.add(as_output(&out)).unwrap();

    reg.propagate_identity(NodeId::new()).unwrap();
    let second = NodeId::new();
    reg.propagate_identity(second).unwrap();

    assert_eq!(out.activations(), 2);
    assert_eq!(out.identity(), Some(second));
}

#[test]
fn test_empty_registry_propagation_succeeds() {
    let reg = AppenderRegistry::new();
    assert!(reg.propagate_identity(NodeId::new()).is_ok());
}

#[test]
fn test_removed_output_does_not_receive_identity() {
    let reg = AppenderRegistry::new();
    let kept = ScriptedOutput::new("kept");
    let gone = ScriptedOutput::new("gone");
    reg.add(as_output(&kept)).unwrap();
    reg.add(as_output(&gone)).unwrap();

    assert!(reg.remove(&as_output(&gone)));
    reg.propagate_identity(NodeId::new()).unwrap();

    assert_eq!(kept.activations(), 1);
    assert_eq!(gone.activations(), 0);
    assert_eq!(gone.identity(), None);
}

#[test]
fn test_concurrent_add_remove_and_propagate() {
    const WRITERS: usize = 8;
    let reg = Arc::new(AppenderRegistry::new());
    let stable = ScriptedOutput::new("stable");
    reg.add(as_output(&stable)).unwrap();
    let barrier = Arc::new(Barrier::new(WRITERS + 1));

    let writers: Vec<_> = (0..WRITERS)
        .map(|i| {
            let reg = reg.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                for round in 0..50 {
                    let out = as_output(&ScriptedOutput::new(&format!("w{i}-{round}")));
                    reg.add(out.clone()).unwrap();
                    let _ = reg.list_paths();
                    assert!(reg.remove(&out));
                }
            })
        })
        .collect();

    let propagator = {
        let reg = reg.clone();
        let barrier = barrier.clone();
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..50 {
                reg.propagate_identity(NodeId::new()).unwrap();
            }
        })
    };

    for writer in writers {
        writer.join().unwrap();
    }
    propagator.join().unwrap();

    assert_eq!(reg.len(), 1);
    assert_eq!(stable.activations(), 50);
}
