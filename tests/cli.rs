use assert_cmd::Command;
use assert_fs::prelude::*;
use insta::assert_snapshot;
use predicates::prelude::*;
use regex::Regex;
use rstest::rstest;
use std::path::Path;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.env_remove("PIPE_RUN_SHELL")
        .env_remove("PIPE_RUN_TEMP_DIR")
        .env_remove("RUST_LOG");
    cmd
}

/// Runs the binary with its artifacts confined to `dir`.
fn cmd_in(dir: &Path) -> Command {
    let mut cmd = cmd();
    cmd.arg("--temp-dir").arg(dir);
    cmd
}

/// Replaces the version number (e.g., "0.1.0") in a string with a static placeholder.
fn redact_version(text: &str) -> String {
    let re = Regex::new(r"\d+\.\d+\.\d+").unwrap();
    re.replace_all(text, "[VERSION]").to_string()
}

fn is_empty_dir(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}

#[test]
fn version_flag() {
    let output = cmd().arg("--version").output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert_snapshot!(redact_version(&stdout), @"pipe-run [VERSION]");
}

#[test]
fn help_flag_describes_placeholders() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("%in"))
        .stdout(predicate::str::contains("%out"))
        .stdout(predicate::str::contains("--temp-dir"))
        .stdout(predicate::str::contains("--shell"));
}

#[test]
fn uppercases_piped_input() {
    let temp = assert_fs::TempDir::new().unwrap();

    cmd_in(temp.path())
        .arg("tr a-z A-Z < %in > %out")
        .write_stdin("hello")
        .assert()
        .success()
        .stdout(predicate::str::diff("HELLO"));

    assert!(is_empty_dir(temp.path()));
}

#[test]
fn joins_separate_words_into_one_template() {
    let temp = assert_fs::TempDir::new().unwrap();

    cmd_in(temp.path())
        .args(["tr", "a-z", "A-Z", "<", "%in", ">", "%out"])
        .write_stdin("split words")
        .assert()
        .success()
        .stdout(predicate::str::diff("SPLIT WORDS"));
}

#[test]
fn hyphenated_words_belong_to_the_template() {
    let temp = assert_fs::TempDir::new().unwrap();

    cmd_in(temp.path())
        .args(["sort", "-r", "-o", "%out", "%in"])
        .write_stdin("a\nc\nb\n")
        .assert()
        .success()
        .stdout(predicate::str::diff("c\nb\na\n"));
}

#[rstest]
#[case::empty(Vec::new())]
#[case::text(b"line one\nline two\n".to_vec())]
#[case::binary(vec![0, 159, 146, 150, 0, 0, 255, 10, 0])]
fn cat_round_trips_bytes(#[case] input: Vec<u8>) {
    let temp = assert_fs::TempDir::new().unwrap();

    let output = cmd_in(temp.path())
        .arg("cat %in > %out")
        .write_stdin(input.clone())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(output.stdout, input);
    assert!(is_empty_dir(temp.path()));
}

#[test]
fn repeated_input_placeholder_uses_one_path() {
    let temp = assert_fs::TempDir::new().unwrap();

    cmd_in(temp.path())
        .arg("diff %in %in && echo identical > %out")
        .write_stdin("same\n")
        .assert()
        .success()
        .stdout(predicate::str::diff("identical\n"));
}

#[test]
fn template_without_placeholders_is_a_usage_error() {
    let temp = assert_fs::TempDir::new().unwrap();
    let marker = temp.child("marker");

    cmd_in(temp.path())
        .current_dir(temp.path())
        .arg("touch marker; echo no placeholders here")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("neither %in nor %out"));

    marker.assert(predicate::path::missing());
    assert!(is_empty_dir(temp.path()));
}

#[test]
fn missing_template_is_a_usage_error() {
    cmd()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No command template was given"));
}

#[rstest]
#[case::unknown_flag(&["--bogus", "cat %in > %out"])]
#[case::leading_hyphen_word(&["-x", "%in"])]
fn rejected_arguments_exit_with_usage_code(#[case] args: &[&str]) {
    let temp = assert_fs::TempDir::new().unwrap();

    cmd_in(temp.path())
        .args(args)
        .write_stdin("hi")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("error:"));

    assert!(is_empty_dir(temp.path()));
}

#[test]
fn empty_stdin_does_not_hang() {
    let temp = assert_fs::TempDir::new().unwrap();

    cmd_in(temp.path())
        .arg("wc -c < %in > %out")
        .write_stdin("")
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\s*0\s*$").unwrap());
}

#[test]
fn false_with_unwritten_output_propagates_its_exit_code() {
    let temp = assert_fs::TempDir::new().unwrap();

    cmd_in(temp.path())
        .arg("false %out")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());

    assert!(is_empty_dir(temp.path()));
}

#[rstest]
#[case(2)]
#[case(7)]
#[case(42)]
fn nonzero_exit_code_is_propagated_without_output(#[case] code: i32) {
    let temp = assert_fs::TempDir::new().unwrap();

    cmd_in(temp.path())
        .arg(format!("cat %in > %out; exit {code}"))
        .write_stdin("never relayed")
        .assert()
        .code(code)
        .stdout(predicate::str::is_empty());

    assert!(is_empty_dir(temp.path()));
}

#[test]
fn unwritten_output_is_silently_empty() {
    let temp = assert_fs::TempDir::new().unwrap();

    cmd_in(temp.path())
        .arg("true %out")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
}

#[test]
fn command_stdout_is_discarded_and_stderr_passes_through() {
    let temp = assert_fs::TempDir::new().unwrap();

    cmd_in(temp.path())
        .arg("echo chatter; echo warning >&2; cat %in > %out")
        .write_stdin("payload")
        .assert()
        .success()
        .stdout(predicate::str::diff("payload"))
        .stderr(predicate::str::contains("warning"));
}

#[test]
fn temp_dir_can_come_from_the_environment() {
    let temp = assert_fs::TempDir::new().unwrap();
    let dir = temp.path().to_string_lossy().into_owned();

    cmd()
        .env("PIPE_RUN_TEMP_DIR", temp.path())
        .arg("echo %in > %out")
        .write_stdin("x")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!("{dir}/pipe-in-")))
        .stdout(predicate::str::ends_with(".tmp\n"));

    assert!(is_empty_dir(temp.path()));
}

#[test]
fn unknown_shell_is_reported() {
    let temp = assert_fs::TempDir::new().unwrap();

    cmd_in(temp.path())
        .args(["--shell", "/nonexistent/pipe-run-shell", "cat %in > %out"])
        .write_stdin("x")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Failed to start '/nonexistent/pipe-run-shell'"));

    assert!(is_empty_dir(temp.path()));
}
