//! Integration tests for top-level CLI behavior.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

const EVENTS: &str = r#"{"event":"initialized","schema_address":"http://127.0.0.1:8081/schema.yaml","operations_count":2}
{"event":"before_execution","method":"GET","path":"/success"}
{"event":"after_execution","status":"success","elapsed_time":0.2,"result":{"method":"GET","path":"/success","interactions":[{"request":{"method":"GET","uri":"http://127.0.0.1:8081/api/success","headers":{"User-Agent":["netcassette/0.1.0"]}},"response":{"status_code":200,"message":"OK","body":"{\"success\": true}"}},{"request":{"method":"GET","uri":"http://127.0.0.1:8081/api/success"},"response":{"status_code":200,"message":"OK"}}]}}
{"event":"before_execution","method":"POST","path":"/upload_file"}
{"event":"after_execution","status":"failure","elapsed_time":0.3,"result":{"method":"POST","path":"/upload_file","interactions":[{"request":{"method":"POST","uri":"http://127.0.0.1:8081/api/upload_file","body":"--boundary\r\n"},"response":{"status_code":500,"message":"Internal Server Error"}}]}}
{"event":"finished","passed_count":1,"failed_count":1,"errored_count":0,"running_time":0.5}
"#;

fn netcassette(args: &[&str]) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_netcassette"));
    command.args(args).env_remove("NETCASSETTE_CASSETTE_MODE").env_remove("NETCASSETTE_EVENTS");
    command
}

fn load(path: &Path) -> serde_yaml::Value {
    serde_yaml::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn record_writes_cassette_from_events_file() {
    let dir = tempfile::tempdir().unwrap();
    let events = dir.path().join("events.jsonl");
    std::fs::write(&events, EVENTS).unwrap();
    let store = dir.path().join("output.yaml");

    let output = netcassette(&[
        "record",
        "--events",
        events.to_str().unwrap(),
        "--store-network-log",
        store.to_str().unwrap(),
    ])
    .output()
    .expect("failed to run netcassette binary");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let cassette = load(&store);
    assert!(cassette["meta"]["start_time"].as_str().is_some());
    let interactions = cassette["interactions"].as_sequence().unwrap();
    assert_eq!(interactions.len(), 3);
    assert_eq!(interactions[0]["id"].as_str(), Some("0"));
    assert_eq!(interactions[0]["status"].as_str(), Some("SUCCESS"));
    assert_eq!(interactions[2]["id"].as_str(), Some("2"));
    assert_eq!(interactions[2]["status"].as_str(), Some("FAILURE"));
    assert_eq!(interactions[2]["request"]["body"].as_str(), Some("--boundary\r\n"));
}

#[test]
fn buffered_mode_matches_streaming_content() {
    let dir = tempfile::tempdir().unwrap();
    let events = dir.path().join("events.jsonl");
    std::fs::write(&events, EVENTS).unwrap();

    let mut documents = Vec::new();
    for mode in ["streaming", "buffered"] {
        let store = dir.path().join(format!("{mode}.yaml"));
        let status = netcassette(&[
            "record",
            "--events",
            events.to_str().unwrap(),
            "--store-network-log",
            store.to_str().unwrap(),
            "--cassette-mode",
            mode,
        ])
        .status()
        .unwrap();
        assert!(status.success());
        documents.push(load(&store)["interactions"].clone());
    }
    assert_eq!(documents[0], documents[1]);
}

#[test]
fn record_reads_stdin_and_writes_stdout() {
    let mut child = netcassette(&["record", "--store-network-log", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(EVENTS.as_bytes()).unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let cassette: serde_yaml::Value = serde_yaml::from_slice(&output.stdout).unwrap();
    assert_eq!(cassette["interactions"].as_sequence().unwrap().len(), 3);
}

#[test]
fn malformed_event_reports_incomplete_cassette() {
    let dir = tempfile::tempdir().unwrap();
    let events = dir.path().join("events.jsonl");
    std::fs::write(&events, "{\"event\":\"interrupted\"}\n{not json}\n").unwrap();
    let store = dir.path().join("output.yaml");

    let output = netcassette(&[
        "record",
        "--events",
        events.to_str().unwrap(),
        "--store-network-log",
        store.to_str().unwrap(),
    ])
    .output()
    .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("incomplete or invalid"));
    assert!(stderr.contains("line 2"));
}

#[test]
fn missing_store_option_exits_with_error() {
    let output =
        netcassette(&["record"]).env_remove("NETCASSETTE_STORE_NETWORK_LOG").output().unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("--store-network-log"));
}

#[test]
fn invalid_subcommand_exits_with_error() {
    let output = netcassette(&["nonsense"]).output().unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("unrecognized subcommand"));
}
