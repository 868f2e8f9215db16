#![cfg(feature = "cli")]

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn qpxap(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_qpxap"))
        .args(["--log-level", "error"])
        .args(args)
        .env_remove("QPXAP_SCREEN_WIDTH")
        .env_remove("QPXAP_SCREEN_HEIGHT")
        .output()
        .expect("qpxap should run")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

fn frame_hex(line: &str) -> String {
    let value: serde_json::Value = serde_json::from_str(line).expect("json line should parse");
    value["frame"]
        .as_str()
        .expect("frame should be a string")
        .to_string()
}

fn temp_script(tag: &str, body: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("qpxap-{tag}-{}.qp", std::process::id()));
    std::fs::write(&path, body).expect("script should be writable");
    path
}

#[test]
fn version_prints_package_version() {
    let output = qpxap(&["version"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        format!("qpxap {}", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn version_extended_reports_protocol() {
    let output = qpxap(&["version", "--extended"]);
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("protocol: token=4242 frame=64 max_payload=61"));
    assert!(text.contains("usage_page=0xff51"));
}

#[test]
fn encode_rect_prints_one_full_frame() {
    let output = qpxap(&[
        "--format",
        "json",
        "encode",
        "rect",
        "display=0",
        "left=0",
        "top=0",
        "right=480",
        "bottom=320",
        "color=[0, 0, 0]",
        "filled=yes",
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 1);
    let hex = frame_hex(&lines[0]);
    assert_eq!(hex.split(' ').count(), 64);
    assert!(hex.starts_with("42 42 10 02 02 04 00 00 00 00 00 e0 01 40 01 00 00 00 01 00"));
}

#[test]
fn encode_clear_is_two_frames() {
    let output = qpxap(&["--format", "json", "encode", "clear", "display=2"]);
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 2);
    assert!(frame_hex(&lines[0]).starts_with("42 42 04 02 02 01 02 00"));
    assert!(frame_hex(&lines[1]).starts_with("42 42 10 02 02 04 02"));
}

#[test]
fn encode_uses_screen_size_setting() {
    let output = qpxap(&[
        "--format",
        "json",
        "--screen-width",
        "240",
        "--screen-height",
        "135",
        "encode",
        "clear",
        "display=0",
    ]);
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert!(frame_hex(&lines[1]).starts_with("42 42 10 02 02 04 00 00 00 00 00 f0 00 87 00"));
}

#[test]
fn encode_raw_writes_binary_frames() {
    let output = qpxap(&[
        "--format",
        "raw",
        "encode",
        "setpixel",
        "display=0",
        "x=1",
        "y=2",
        "color=3,4,5",
    ]);
    assert!(output.status.success());
    assert_eq!(output.stdout.len(), 64);
    assert_eq!(
        &output.stdout[..14],
        &[0x42, 0x42, 11, 2, 2, 2, 0, 1, 0, 2, 0, 3, 4, 5]
    );
}

#[test]
fn encode_overlong_text_exits_data_invalid() {
    let text = format!("text={}", "x".repeat(60));
    let output = qpxap(&["encode", "drawtext", "display=0", "x=0", "y=0", "font=0", &text]);
    assert_eq!(output.status.code(), Some(60));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("payload"));
}

#[test]
fn encode_text_above_latin1_exits_data_invalid() {
    let output = qpxap(&[
        "encode",
        "drawtext",
        "display=0",
        "x=0",
        "y=0",
        "font=0",
        "text=\u{141}\u{20ac}",
    ]);
    assert_eq!(output.status.code(), Some(60));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("U+00FF"));
}

#[test]
fn encode_bad_color_exits_data_invalid() {
    let output = qpxap(&["encode", "setpixel", "display=0", "x=0", "y=0", "color=1,2"]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn encode_unexpected_argument_exits_usage() {
    let output = qpxap(&["encode", "clear", "display=0", "color=1,2,3"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn encode_script_file() {
    let path = temp_script(
        "encode",
        "# demo\nclear display=0\ndrawtext display=0 x=1 y=1 font=0 text=\"Hi there\"\n",
    );
    let output = qpxap(&[
        "--format",
        "json",
        "encode",
        "--script",
        path.to_str().expect("temp path should be utf-8"),
    ]);
    let _ = std::fs::remove_file(&path);
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 3);
    assert!(lines[2].contains("\"op\":\"drawtext\""));
    assert!(frame_hex(&lines[2]).starts_with("42 42 11 02 02 0b 00 01 00 01 00 00 48 69 20"));
}

#[test]
fn encode_script_from_stdin() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_qpxap"))
        .args(["--log-level", "error", "--format", "json", "encode", "--script", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("qpxap should start");
    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(b"animate display=1 x=0 y=0 img=3\n")
        .expect("script should be written");
    let output = child.wait_with_output().expect("qpxap should finish");

    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 1);
    assert!(frame_hex(&lines[0]).starts_with("42 42 09 02 02 09 01 00 00 00 00 03"));
}

#[test]
fn encode_script_error_names_line() {
    let path = temp_script("bad", "clear display=0\n\nline display=0 x0=1\n");
    let output = qpxap(&[
        "encode",
        "--script",
        path.to_str().expect("temp path should be utf-8"),
    ]);
    let _ = std::fs::remove_file(&path);

    assert_eq!(output.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&output.stderr).contains("line 3"));
}

#[test]
fn run_missing_script_fails_before_device() {
    let output = qpxap(&["run", "/nonexistent/qpxap/script.qp"]);
    assert_eq!(output.status.code(), Some(4));
}
