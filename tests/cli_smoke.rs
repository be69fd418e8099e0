use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;
use pretty_assertions::assert_eq;

fn hcdriver(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hcdriver").expect("hcdriver binary should build");
    cmd.env("NO_COLOR", "1")
        .env("HOME", home.path())
        .env_remove("RUST_LOG")
        .env_remove("HCDRIVER_SHARED_PATH")
        .env_remove("HCDRIVER_EXECUTABLE_PATH");
    cmd
}

fn workspace_with(config: &str) -> TempDir {
    let workspace = TempDir::new().expect("temp dir");
    workspace
        .child("hcdriver.toml")
        .write_str(config)
        .expect("write config");
    workspace
}

const SCENARIO: &str = r#"
[engine]
shared_path = "/usr/local/share/hashcat"

[job]
hash_type = 0
attack_mode = 0
potfile_disable = true
session_name = "s1"
input_file = "deadbeef"
"#;

#[test]
fn hcdriver_help_command_succeeds() {
    let home = TempDir::new().expect("home");
    hcdriver(&home).arg("--help").assert().success();
}

#[test]
fn args_prints_marshaled_job() {
    let home = TempDir::new().expect("home");
    let workspace = workspace_with(SCENARIO);

    hcdriver(&home)
        .arg("--workspace")
        .arg(workspace.path())
        .arg("args")
        .assert()
        .success()
        .stdout("--hash-type=0\n--attack-mode=0\n--session=s1\n--potfile-disable\ndeadbeef\n");
}

#[test]
fn args_json_applies_set_overrides() {
    let home = TempDir::new().expect("home");
    let workspace = workspace_with(SCENARIO);

    let output = hcdriver(&home)
        .arg("--workspace")
        .arg(workspace.path())
        .args(["args", "--json", "--set", "job.hash_type=1000", "--set", "job.force=true"])
        .output()
        .expect("run hcdriver");
    assert!(output.status.success());

    let args: Vec<String> = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(
        args,
        [
            "--hash-type=1000",
            "--attack-mode=0",
            "--force",
            "--session=s1",
            "--potfile-disable",
            "deadbeef",
        ]
    );
}

#[test]
fn args_without_input_file_fails() {
    let home = TempDir::new().expect("home");
    let workspace = workspace_with("[job]\nhash_type = 0\n");

    hcdriver(&home)
        .arg("--workspace")
        .arg(workspace.path())
        .arg("args")
        .assert()
        .failure()
        .stderr(predicate::str::contains("input_file"));
}

#[test]
fn parse_prints_job_table() {
    let home = TempDir::new().expect("home");

    hcdriver(&home)
        .args(["parse", "--", "--hash-type=0 --potfile-disable deadbeef"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[job]"))
        .stdout(predicate::str::contains("hash_type = 0"))
        .stdout(predicate::str::contains("potfile_disable = true"))
        .stdout(predicate::str::contains("input_file = \"deadbeef\""))
        .stdout(predicate::str::contains("attack_mode").not());
}

#[test]
fn parse_rejects_unknown_switch() {
    let home = TempDir::new().expect("home");

    hcdriver(&home)
        .args(["parse", "--", "--nonexistent-flag=1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nonexistent-flag"));
}

#[test]
fn schema_lists_switches_in_order() {
    let home = TempDir::new().expect("home");

    let output = hcdriver(&home)
        .args(["schema", "--json"])
        .output()
        .expect("run hcdriver");
    assert!(output.status.success());

    let rows: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(rows[0]["argument"], "--hash-type");
    assert_eq!(rows[0]["kind"], "integer");
    let last = rows.last().expect("rows");
    assert_eq!(last["field"], "dictionary_mask_directory_input");
    assert_eq!(last["argument"], serde_json::Value::Null);
}

#[test]
fn check_rejects_missing_shared_path() {
    let home = TempDir::new().expect("home");
    let workspace = workspace_with("[job]\ninput_file = \"deadbeef\"\n");

    hcdriver(&home)
        .arg("--workspace")
        .arg(workspace.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("shared resource"));
}

#[test]
fn check_accepts_environment_shared_path() {
    let home = TempDir::new().expect("home");
    let workspace = workspace_with("[job]\ninput_file = \"deadbeef\"\n");

    hcdriver(&home)
        .env("HCDRIVER_SHARED_PATH", "/opt/hashcat")
        .arg("--workspace")
        .arg(workspace.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("/opt/hashcat"));
}

#[test]
fn dry_run_prints_engine_command_line() {
    let home = TempDir::new().expect("home");
    let workspace = workspace_with(SCENARIO);

    hcdriver(&home)
        .arg("--workspace")
        .arg(workspace.path())
        .arg("dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "--hash-type=0 --attack-mode=0 --session=s1 --potfile-disable deadbeef",
        ));
}

#[test]
fn dry_run_can_print_versioned_json_events() {
    let home = TempDir::new().expect("home");
    let workspace = workspace_with(SCENARIO);

    let output = hcdriver(&home)
        .arg("--workspace")
        .arg(workspace.path())
        .args(["dry-run", "--json-events"])
        .output()
        .expect("run hcdriver");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let mut lines = stdout.lines();
    let event: serde_json::Value =
        serde_json::from_str(lines.next().expect("event line")).expect("json event");
    assert_eq!(event["schema_version"], "0.1.0");
    assert_eq!(event["event"]["type"], "task_information");
    assert_eq!(event["event"]["session"], "s1");
    assert_eq!(event["event"]["hash_type"], 0);
    assert!(
        lines
            .next()
            .expect("command line")
            .ends_with("--hash-type=0 --attack-mode=0 --session=s1 --potfile-disable deadbeef")
    );
}

#[test]
fn set_keeps_numeric_session_name_as_text() {
    let home = TempDir::new().expect("home");
    let workspace = workspace_with(SCENARIO);

    hcdriver(&home)
        .arg("--workspace")
        .arg(workspace.path())
        .args(["args", "--set", "job.session_name=2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--session=2024\n"));
}
