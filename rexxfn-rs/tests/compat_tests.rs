/// Batch-mode tests: pipe command scripts to the `rexxfn` binary and check
/// its stdout and exit status.
///
/// Every run passes `-f` so a user's `~/.rexxfnrc` cannot change the policy
/// under test.  Files live in a fresh temp directory per test; scripts use
/// `{dir}` as a placeholder for that directory's path.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn rust_binary() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_BIN_EXE_rexxfn"))
}

struct Run {
    stdout: Vec<String>,
    stderr: String,
    code: i32,
}

fn run_rexxfn(flags: &[&str], dir: &Path, script: &str) -> Run {
    let script = script.replace("{dir}", &dir.display().to_string());
    let mut child = Command::new(rust_binary())
        .arg("-f")
        .args(flags)
        .env_remove("REXXFN_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn rexxfn binary");
    {
        let stdin = child.stdin.as_mut().expect("stdin not open");
        stdin.write_all(script.as_bytes()).expect("write to stdin");
    }
    let out = child.wait_with_output().expect("wait failed");
    Run {
        stdout: String::from_utf8_lossy(&out.stdout).lines().map(str::to_owned).collect(),
        stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        code: out.status.code().unwrap_or(-1),
    }
}

fn fixture(lines: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("in.txt"), lines).expect("write fixture");
    dir
}

// ── String functions ──────────────────────────────────────────────────────────

#[test]
fn string_functions() {
    let dir = fixture("");
    let r = run_rexxfn(
        &[],
        dir.path(),
        "SUBSTR HELLO 2 3\n\
         WORD \"one two three\" 2\n\
         WORDS \"one two three\"\n\
         TRANSLATE abc\n\
         STRIP \"  hi  \"\n\
         POS b abcb 3\n\
         DATATYPE 12 W\n\
         VERIFY 12a 0123456789\n\
         CHANGESTR a o banana\n\
         DELSTR abcdef 2 2\n\
         COMPARE ab ac\n\
         LEFT ab 4 *\n\
         RIGHT 7 3 0\n\
         COPIES - 3\n\
         DELWORD \"one two three four\" 2\n\
         INSERT _0000 file.txt 5\n",
    );
    assert_eq!(
        r.stdout,
        [
            "ELL", "two", "3", "ABC", "hi", "4", "1", "3", "bonono", "adef", "2", "ab**", "007",
            "---", "one three four", "file_0000.txt",
        ]
    );
    assert_eq!(r.code, 0);
}

#[test]
fn usage_error_exits_2_but_keeps_going() {
    let dir = fixture("");
    let r = run_rexxfn(&[], dir.path(), "SUBSTR abc 0\nCOPIES x 9223372036854775807\nCOPIES x 2\n");
    assert_eq!(r.stdout, ["xx"]);
    assert!(r.stderr.contains("rexxfn: line 2: invalid argument: COPIES"), "{}", r.stderr);
    assert!(r.stderr.contains("rexxfn: line 1: invalid argument"), "{}", r.stderr);
    assert_eq!(r.code, 2);
}

// ── LINEIN ────────────────────────────────────────────────────────────────────

#[test]
fn sequential_reads_then_clean_exit_at_eof() {
    let dir = fixture("alpha\nbeta\n");
    let r = run_rexxfn(
        &[],
        dir.path(),
        "LINEIN {dir}/in.txt\nLINEIN {dir}/in.txt\nLINEIN {dir}/in.txt\nCOPIES unreached 1\n",
    );
    assert_eq!(r.stdout, ["alpha", "beta"]);
    assert_eq!(r.code, 0);
}

#[test]
fn eof_signal_prints_sentinel_and_restarts() {
    let dir = fixture("alpha\n");
    let r = run_rexxfn(
        &[],
        dir.path(),
        "LINEIN {dir}/in.txt * SIGNAL\nLINEIN {dir}/in.txt * SIGNAL\nLINEIN {dir}/in.txt * SIGNAL\n",
    );
    assert_eq!(r.stdout, ["alpha", "4294967295", "alpha"]);
    assert_eq!(r.code, 0);
}

#[test]
fn positional_read_leaves_sequence_alone() {
    let dir = fixture("a\nb\nc\n");
    let r = run_rexxfn(
        &[],
        dir.path(),
        "LINEIN {dir}/in.txt\nLINEIN {dir}/in.txt 3\nLINEIN {dir}/in.txt\nLINEIN {dir}/in.txt 9 SIGNAL\n",
    );
    assert_eq!(r.stdout, ["a", "c", "b", "4294967295"]);
    assert_eq!(r.code, 0);
}

#[test]
fn spellings_share_one_cursor() {
    let dir = fixture("a\nb\n");
    let r = run_rexxfn(&[], dir.path(), "LINEIN {dir}/in.txt\nLINEIN {dir}/./in.txt\n");
    assert_eq!(r.stdout, ["a", "b"]);
}

#[test]
fn reset_restarts_sequence() {
    let dir = fixture("a\nb\n");
    let r = run_rexxfn(&[], dir.path(), "LINEIN {dir}/in.txt\nRESET {dir}/in.txt\nLINEIN {dir}/in.txt\n");
    assert_eq!(r.stdout, ["a", "a"]);
}

#[test]
fn missing_file_terminates_with_failure() {
    let dir = fixture("");
    let r = run_rexxfn(&[], dir.path(), "LINEIN {dir}/absent.txt\nCOPIES unreached 1\n");
    assert!(r.stdout.is_empty());
    assert!(r.stderr.contains("File does not exist: "), "{}", r.stderr);
    assert_eq!(r.code, 1);
}

#[test]
fn missing_file_quiet_prints_nothing() {
    let dir = fixture("");
    let r = run_rexxfn(&["-q"], dir.path(), "LINEIN {dir}/absent.txt\n");
    assert!(r.stdout.is_empty());
    assert_eq!(r.stderr, "");
    assert_eq!(r.code, 1);
}

#[test]
fn keep_going_returns_sentinels() {
    let dir = fixture("");
    let r = run_rexxfn(&["-kq"], dir.path(), "LINEIN {dir}/absent.txt\nLINEIN {dir}/in.txt\nCOPIES ok 1\n");
    assert_eq!(r.stdout, ["4008636142", "4294967295", "ok"]);
    assert_eq!(r.stderr, "");
    assert_eq!(r.code, 0);
}

// ── LINEOUT / RM / RECORDS ────────────────────────────────────────────────────

#[test]
fn lineout_records_rm() {
    let dir = fixture("");
    let r = run_rexxfn(
        &["-q"],
        dir.path(),
        "LINEOUT {dir}/out.txt one\n\
         LINEOUT {dir}/out.txt \"two words\" 1\n\
         RECORDS {dir}/out.txt\n\
         RM {dir}/out.txt\n\
         RM {dir}/out.txt\n",
    );
    assert_eq!(r.stdout, ["0", "0", "one", "two words", "0", "4008636142"]);
    assert_eq!(r.code, 0);
    assert!(!dir.path().join("out.txt").exists());
}

#[test]
fn rm_reports_on_stderr_when_verbose() {
    let dir = fixture("x\n");
    let r = run_rexxfn(&[], dir.path(), "RM {dir}/in.txt\n");
    assert_eq!(r.stdout, ["0"]);
    assert!(r.stderr.contains("File successfully deleted: "), "{}", r.stderr);
}

// ── Config and flags ──────────────────────────────────────────────────────────

#[test]
fn explicit_rc_file_sets_policy() {
    let dir = fixture("");
    let rc = dir.path().join("test.rc");
    fs::write(&rc, "; keep going\n/set terminate_on_error=off\n/set verbose=0\n").unwrap();
    let flag = format!("-f{}", rc.display());
    let r = run_rexxfn(&[&flag], dir.path(), "LINEIN {dir}/absent.txt\n");
    assert_eq!(r.stdout, ["4008636142"]);
    assert_eq!(r.stderr, "");
    assert_eq!(r.code, 0);
}

#[test]
fn single_command_flag() {
    let dir = fixture("");
    let r = run_rexxfn(&["-c", "RIGHT 42 5 0"], dir.path(), "");
    assert_eq!(r.stdout, ["00042"]);
    assert_eq!(r.code, 0);
}

#[test]
fn script_file_argument() {
    let dir = fixture("line\n");
    let script = dir.path().join("job.txt");
    fs::write(&script, format!("LINEIN {}/in.txt\n", dir.path().display())).unwrap();
    let path = script.display().to_string();
    let r = run_rexxfn(&[&path], dir.path(), "");
    assert_eq!(r.stdout, ["line"]);
}

#[test]
fn unknown_option_is_usage_failure() {
    let dir = fixture("");
    let r = run_rexxfn(&["-z"], dir.path(), "");
    assert!(r.stderr.contains("unknown option: -z"));
    assert_eq!(r.code, 1);
}
