use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn sheetwise_bin() -> &'static str {
    env!("CARGO_BIN_EXE_sheetwise")
}

fn base_command(home: &Path) -> Command {
    let mut cmd = Command::new(sheetwise_bin());
    cmd.current_dir(home)
        .env("SHEETWISE_HOME", home.join(".sheetwise"))
        .env("RUST_LOG", "error")
        .env_remove("OPENAI_API_KEY")
        .env_remove("SHEETWISE_DB")
        .env_remove("SHEETWISE_ERROR_LOG");
    cmd
}

fn run_cli(home: &Path, args: &[&str]) -> Output {
    base_command(home)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .expect("failed to execute sheetwise CLI")
}

fn run_shell(home: &Path, script: &str) -> Output {
    let mut child = base_command(home)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn sheetwise shell");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(script.as_bytes())
        .expect("write script");
    child.wait_with_output().expect("wait for shell")
}

fn assert_cli_success(output: &Output, what: &str) {
    assert!(
        output.status.success(),
        "{} failed\nstdout:\n{}\nstderr:\n{}",
        what,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_shell_session_uses_default_files() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join("cities.csv"), "city,pop\nOslo,709000\nBergen,291000\n").unwrap();

    let output = run_shell(
        home.path(),
        "load cities.csv cities\nquery SELECT city FROM cities ORDER BY pop DESC\nbogus\nexit\n",
    );
    assert_cli_success(&output, "shell");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Table 'cities' created"), "stdout:\n{}", stdout);
    assert!(stdout.contains("Oslo"));
    assert!(stdout.contains("Unknown command"));

    assert!(home.path().join("my_database.db").exists());
    // Unknown commands are not errors.
    assert!(!home.path().join("error_log.txt").exists());
}

#[test]
fn test_one_shot_commands_and_exit_codes() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join("scores.tsv"), "name\tscore\nann\t3\nbo\t4\n").unwrap();

    let output = run_cli(home.path(), &["load", "scores.tsv", "scores"]);
    assert_cli_success(&output, "load");

    let output = run_cli(home.path(), &["query", "SELECT SUM(score) AS total FROM scores"]);
    assert_cli_success(&output, "query");
    assert!(String::from_utf8_lossy(&output.stdout).contains('7'));

    let output = run_cli(home.path(), &["tables"]);
    assert_cli_success(&output, "tables");
    assert!(String::from_utf8_lossy(&output.stdout).contains("- scores"));

    let output = run_cli(home.path(), &["query", "SELECT * FROM nowhere"]);
    assert_eq!(output.status.code(), Some(1));

    let log = fs::read_to_string(home.path().join("error_log.txt")).unwrap();
    assert_eq!(log.lines().count(), 1);
    assert!(log.starts_with("[ExecutionError] Query failed"));
}

#[test]
fn test_one_shot_load_conflict_policy() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join("a.csv"), "x\n1\n").unwrap();
    fs::write(home.path().join("b.csv"), "y\n2\n").unwrap();

    assert_cli_success(&run_cli(home.path(), &["load", "a.csv", "t"]), "first load");

    let output = run_cli(home.path(), &["load", "b.csv", "t", "--on-conflict", "skip"]);
    assert_cli_success(&output, "skip load");
    let output = run_cli(home.path(), &["query", "SELECT * FROM t"]);
    assert!(String::from_utf8_lossy(&output.stdout).contains('x'));

    let output = run_cli(home.path(), &["load", "b.csv", "t", "--on-conflict", "overwrite"]);
    assert_cli_success(&output, "overwrite load");
    let output = run_cli(home.path(), &["query", "SELECT y FROM t"]);
    assert_cli_success(&output, "query after overwrite");
}

#[test]
fn test_ask_without_api_key_fails_cleanly() {
    let home = TempDir::new().unwrap();

    let output = run_cli(home.path(), &["ask", "how", "many", "tables"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("OPENAI_API_KEY"));

    let log = fs::read_to_string(home.path().join("error_log.txt")).unwrap();
    assert!(log.starts_with("[TranslationError]"));
}
