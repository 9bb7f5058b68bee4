use assert_cmd::cargo::cargo_bin_cmd;

#[test]
fn insert_delete_scenario() {
    cargo_bin_cmd!("mway-set")
        .write_stdin("i 5\ni 3\ni 8\nd 3\ni 3\nd 9\n")
        .assert()
        .success()
        .stdout("{5}\n{3,5}\n{3,5,8}\n{5,8}\n{3,5,8}\n")
        .stderr("d 9: The key does not exist\n");
}

#[test]
fn duplicate_insert_reports_and_continues() {
    cargo_bin_cmd!("mway-set")
        .write_stdin("i 7\ni 7\ni -2\n")
        .assert()
        .success()
        .stdout("{7}\n{-2,7}\n")
        .stderr("i 7: The key already exists\n");
}

#[test]
fn invalid_command_exits_with_failure() {
    cargo_bin_cmd!("mway-set")
        .write_stdin("i 1\nx 2\ni 3\n")
        .assert()
        .code(1)
        .stdout("{1}\n")
        .stderr("Invalid command: x\n");
}

#[test]
fn invalid_command_stderr_is_only_the_diagnostic() {
    cargo_bin_cmd!("mway-set")
        .args(["--log-level", "warn"])
        .write_stdin("i 2\nq 7\n")
        .assert()
        .code(1)
        .stdout("{2}\n")
        .stderr("Invalid command: q\n");
}

#[test]
fn commands_before_undecodable_bytes_are_applied() {
    cargo_bin_cmd!("mway-set")
        .write_stdin(&b"i 1 i 2 \xff 3\ni 4\n"[..])
        .assert()
        .success()
        .stdout("{1}\n{1,2}\n")
        .stderr("");
}

#[test]
fn malformed_key_ends_input() {
    cargo_bin_cmd!("mway-set")
        .write_stdin("i 1\ni abc\ni 2\n")
        .assert()
        .success()
        .stdout("{1}\n")
        .stderr("");
}

#[test]
fn tokens_need_no_separator() {
    cargo_bin_cmd!("mway-set")
        .write_stdin("i5 i3\n\n   d5")
        .assert()
        .success()
        .stdout("{5}\n{3,5}\n{3}\n");
}

#[test]
fn empty_input_prints_nothing() {
    cargo_bin_cmd!("mway-set").write_stdin("").assert().success().stdout("").stderr("");
}

#[test]
fn deleting_everything_prints_empty_set() {
    cargo_bin_cmd!("mway-set")
        .write_stdin("i 1\ni 2\nd 1\nd 2\n")
        .assert()
        .success()
        .stdout("{1}\n{1,2}\n{2}\n{}\n");
}

#[test]
fn debug_log_level_traces_commands() {
    let output = cargo_bin_cmd!("mway-set")
        .args(["--log-level", "debug"])
        .write_stdin("i 4\n")
        .assert()
        .success()
        .stdout("{4}\n")
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8(output).expect("utf-8 stderr");
    assert!(stderr.contains("inserted"), "stderr was: {stderr}");
}

#[test]
fn bad_log_level_is_rejected() {
    let output = cargo_bin_cmd!("mway-set")
        .args(["--log-level", "mway_set=loud"])
        .write_stdin("i 4\n")
        .assert()
        .code(2)
        .stdout("")
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8(output).expect("utf-8 stderr");
    assert!(stderr.contains("invalid log level"), "stderr was: {stderr}");
}
