use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("wfq-rs-{prefix}-{}-{nanos}", std::process::id()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn run_wfq(stdin: &str, extra_args: &[&str]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_wfq"))
        .args(extra_args)
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn wfq");
    child
        .stdin
        .as_mut()
        .expect("child stdin")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("run wfq")
}

#[test]
fn schedules_weighted_trace_from_stdin() {
    let input = "0 A a B b 100 2.00\n\
                 0 C c D d 100 1.00\n\
                 0 A a B b 100\n\
                 0 C c D d 100\n\
                 0 A a B b 100\n\
                 0 C c D d 100\n";
    let output = run_wfq(input, &[]);
    assert!(
        output.status.success(),
        "wfq failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "0: 0 A a B b 100 2.00\n\
         100: 0 A a B b 100\n\
         200: 0 C c D d 100 1.00\n\
         300: 0 A a B b 100\n\
         400: 0 C c D d 100\n\
         500: 0 C c D d 100\n"
    );
}

#[test]
fn empty_input_exits_zero_with_no_output() {
    let output = run_wfq("", &[]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn malformed_line_exits_nonzero_and_names_the_line() {
    let output = run_wfq("0 A a B b 100\nthis is not a packet\n", &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("bad input line 2"),
        "missing diagnostic, stderr={stderr}"
    );
}

#[test]
fn trace_file_matches_stdin_run() {
    let dir = unique_temp_dir("trace-file");
    let input = "0 A a B b 10\n100 C c D d 10\n";
    let trace = dir.join("trace.txt");
    fs::write(&trace, input).expect("write trace file");

    let from_file = run_wfq("", &["--trace", trace.to_str().expect("utf8 path")]);
    let from_stdin = run_wfq(input, &[]);
    assert!(from_file.status.success());
    assert_eq!(from_file.stdout, from_stdin.stdout);
    assert_eq!(
        String::from_utf8_lossy(&from_file.stdout),
        "0: 0 A a B b 10\n100: 100 C c D d 10\n"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn stats_json_reports_per_channel_service() {
    let dir = unique_temp_dir("stats-json");
    let stats_path = dir.join("stats.json");

    let input = "0 A a B b 100 2.00\n0 C c D d 60\n";
    let output = run_wfq(
        input,
        &["--stats-json", stats_path.to_str().expect("utf8 path")],
    );
    assert!(
        output.status.success(),
        "wfq failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let raw = fs::read_to_string(&stats_path).expect("read stats.json");
    let v: Value = serde_json::from_str(&raw).expect("parse stats.json");
    let arr = v.as_array().expect("stats.json must be a JSON array");
    assert_eq!(arr.len(), 2);

    assert_eq!(arr[0].get("conn").and_then(|c| c.as_str()), Some("A a B b"));
    assert_eq!(arr[0].get("index").and_then(|i| i.as_u64()), Some(0));
    assert_eq!(arr[0].get("served_pkts").and_then(|p| p.as_u64()), Some(1));
    assert_eq!(
        arr[0].get("served_bytes").and_then(|b| b.as_u64()),
        Some(100)
    );
    assert_eq!(arr[1].get("conn").and_then(|c| c.as_str()), Some("C c D d"));
    assert_eq!(arr[1].get("first_tx").and_then(|t| t.as_u64()), Some(100));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn stats_flag_prints_summary_to_stderr_only() {
    let input = "0 A a B b 100\n";
    let output = run_wfq(input, &["--stats"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "0: 0 A a B b 100\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("channel_stats"),
        "missing summary, stderr={stderr}"
    );
}
