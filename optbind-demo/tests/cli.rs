//! Runs the demo binary and checks its output and exit codes.

use std::process::{Command, Output};

fn demo(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_optbind-demo"))
        .args(args)
        .output()
        .expect("failed to run optbind-demo")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn reports_sizes() {
    let output = demo(&["-d", "a=1", "--define", "b=2", "--unit", "kB"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "a: 1 kB\nb: 2 kB\ntotal: 3 kB\n");
}

#[test]
fn scales_and_tags() {
    let output = demo(&["-t", "{urn:x}size", "--scale", "10", "-d", "a=3"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout(&output),
        "tag: {urn:x}size\na: 30 bytes\ntotal: 30 bytes\n"
    );
}

#[test]
fn help_prints_usage_and_exits() {
    let output = demo(&["-d", "a=1", "--help"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).starts_with("usage: optbind-demo [options]\n"));
    assert!(stderr(&output).contains(" -h --help                    Print help and exit"));
}

#[test]
fn unknown_options_exit_with_the_input_code() {
    let output = demo(&["--bogus"]);

    assert_eq!(output.status.code(), Some(100));
    assert!(stderr(&output).contains("error: unknown option: --bogus"));
    assert!(stderr(&output).contains("usage: optbind-demo [options]"));
}

#[test]
fn quiet_and_verbose_conflict() {
    let output = demo(&["-q", "-v", "-d", "a=1"]);

    assert_eq!(output.status.code(), Some(101));
    assert!(stderr(&output).contains("cannot set both 'quiet' and 'verbose' switches"));
}

#[test]
fn exit_option_codes() {
    assert_eq!(demo(&["--validate"]).status.code(), Some(2));
    assert_eq!(demo(&["-d", "a=1", "--validate"]).status.code(), Some(0));
}

#[test]
fn entry_point_failures_exit_with_one() {
    let output = demo(&[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("nothing to report"));
}

#[test]
fn redefinitions_fail_in_the_action() {
    let output = demo(&["-d", "a=1", "-d", "a=2"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("error: option --define failed"));
    assert!(stderr(&output).contains("a is defined more than once"));
}
