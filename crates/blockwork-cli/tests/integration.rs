//! Integration tests for the `blockwork` binary.
//!
//! Each test runs the built binary and checks its exit status, its stdout,
//! and for `process` the rendered WAV file.

use blockwork_io::{WavFormat, WavSpec, read_wav, read_wav_info, write_wav};
use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

/// Helper to get the path to the `blockwork` binary built by cargo.
fn blockwork_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_blockwork"))
}

fn run(args: &[&str]) -> Output {
    blockwork_bin()
        .args(args)
        .output()
        .expect("failed to run blockwork")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn wav_path(file: &NamedTempFile) -> &str {
    file.path().to_str().unwrap()
}

// ---------------------------------------------------------------------------
// blockwork plan
// ---------------------------------------------------------------------------

#[test]
fn plan_ring_reports_closing_edge() {
    let output = run(&["plan", "0:1", "1:2", "2:0"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Nodes:    3"), "{text}");
    assert!(text.contains("Order:    0 1 2"), "{text}");
    assert!(text.contains("Feedback: 2 -> 0"), "{text}");
}

#[test]
fn plan_dag_has_no_feedback() {
    let output = run(&["plan", "--nodes", "4", "2:3", "0:1"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Order:    0 1 2 3"), "{text}");
    assert!(text.contains("Feedback: none"), "{text}");
}

#[test]
fn plan_rejects_out_of_range_edges() {
    let output = run(&["plan", "--nodes", "2", "0:5"]);
    assert!(!output.status.success());
}

#[test]
fn plan_rejects_largest_node_index() {
    let output = run(&["plan", "18446744073709551615:0"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("too large"));
}

#[test]
fn plan_rejects_malformed_edges() {
    let output = run(&["plan", "0-1"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("FROM:TO"));
}

// ---------------------------------------------------------------------------
// blockwork info
// ---------------------------------------------------------------------------

#[test]
fn info_describes_default_echo() {
    let output = run(&["info"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Patch:       echo"), "{text}");
    assert!(text.contains("38400 samples at 48000 Hz"), "{text}");
    assert!(text.contains("8 blocks, 9 connections"), "{text}");
    assert!(
        text.contains("delay_splitter.out1 -> feedback_gain.in0  (feedback)"),
        "{text}"
    );
    assert!(text.contains("in[0]  = input_splitter.in0"), "{text}");
    assert!(text.contains("out[0] = output_adder.out0"), "{text}");
    assert_eq!(text.matches("(feedback)").count(), 1);
}

#[test]
fn info_reads_preset_and_flags() {
    let mut preset = NamedTempFile::new().unwrap();
    writeln!(preset, "name = \"slapback\"\ntime = 0.12\nfeedback = 0.1").unwrap();

    let output = run(&[
        "info",
        "--preset",
        preset.path().to_str().unwrap(),
        "--time",
        "0.5",
        "--sample-rate",
        "1000",
    ]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Patch:       slapback"), "{text}");
    assert!(text.contains("feedback 0.10"), "{text}");
    assert!(text.contains("500 samples at 1000 Hz"), "{text}");
}

#[test]
fn info_rejects_negative_time() {
    let output = run(&["info", "--time=-1"]);
    assert!(!output.status.success());
}

// ---------------------------------------------------------------------------
// blockwork process
// ---------------------------------------------------------------------------

#[test]
fn process_renders_echo_with_tail() {
    let input = NamedTempFile::new().unwrap();
    let output_file = NamedTempFile::new().unwrap();
    let mut impulse = vec![0.0; 50];
    impulse[0] = 1.0;
    write_wav(input.path(), &impulse, WavSpec::mono(100)).unwrap();

    let output = run(&[
        "process",
        wav_path(&input),
        wav_path(&output_file),
        "--time",
        "0.1",
        "--tail",
        "0.5",
        "--block-size",
        "7",
    ]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let (rendered, spec) = read_wav(output_file.path()).unwrap();
    assert_eq!(spec.sample_rate, 100);
    assert_eq!(rendered.len(), 100);
    assert!((rendered[0] - 0.6).abs() < 1e-6);
    assert!((rendered[10] - 0.4).abs() < 1e-6);
    assert!((rendered[21] - 0.12).abs() < 1e-6);
}

#[test]
fn process_writes_requested_bit_depth() {
    let input = NamedTempFile::new().unwrap();
    let output_file = NamedTempFile::new().unwrap();
    write_wav(input.path(), &[0.25; 16], WavSpec::mono(8000)).unwrap();

    let output = run(&[
        "process",
        wav_path(&input),
        wav_path(&output_file),
        "--bit-depth",
        "16",
    ]);
    assert!(output.status.success());

    let info = read_wav_info(output_file.path()).unwrap();
    assert_eq!(info.spec.bits_per_sample, 16);
    assert_eq!(info.spec.format, WavFormat::Pcm);
    assert_eq!(info.num_frames, 16);
}

#[test]
fn process_missing_input_fails() {
    let output_file = NamedTempFile::new().unwrap();
    let output = run(&[
        "process",
        "/nonexistent/input.wav",
        wav_path(&output_file),
    ]);
    assert!(!output.status.success());
}
