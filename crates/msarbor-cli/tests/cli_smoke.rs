use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(name: &str) -> PathBuf {
    let path = repo_root().join("fixtures").join(name);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

fn cli() -> Command {
    Command::new(assert_cmd::cargo_bin!("msarbor-cli"))
}

fn stdout_of(cmd: &mut Command) -> String {
    let out = cmd.output().expect("run msarbor-cli");
    assert!(
        out.status.success(),
        "msarbor-cli failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8(out.stdout).expect("utf-8 stdout")
}

#[test]
fn cli_solves_a_fixture_file() {
    let out = stdout_of(cli().arg(fixture("scenario_a.txt")));
    assert_eq!(out, "3\t6\n2 0\n");
}

#[test]
fn cli_reads_stdin_when_no_path_is_given() {
    let text = fs::read_to_string(fixture("scenario_b.txt")).expect("read fixture");
    cli().write_stdin(text).assert().success().stdout("4\t16\n3 0 0\n");
}

#[test]
fn cli_reads_stdin_for_dash() {
    cli()
        .arg("-")
        .write_stdin("2\n0\n42\n")
        .assert()
        .success()
        .stdout("2\t42\n1\n");
}

#[test]
fn cli_prints_the_auxiliary_tree_with_duals() {
    let out = stdout_of(cli().args(["--duals", "--check"]).arg(fixture("scenario_b.txt")));
    assert_eq!(out, "4\t16\n3 0 0\naux 6\n4 4 5 - 5 -\n1 1 5 0 4 5\n");
}

#[test]
fn cli_prints_reduced_costs_per_head() {
    let out = stdout_of(cli().arg("--reduced-costs").arg(fixture("scenario_b.txt")));
    assert_eq!(out, "4\t16\n3 0 0\n- 0 0 0\n0 - 0 0\n0 1 - 0\n");
}

#[test]
fn cli_emits_json() {
    let out = stdout_of(cli().arg("--json").arg(fixture("scenario_a.txt")));
    let value: serde_json::Value = serde_json::from_str(&out).expect("valid JSON");

    assert_eq!(value["nodes"], 3);
    assert_eq!(value["root"], 2);
    assert_eq!(value["objective"], 6);
    assert_eq!(value["feasible"], true);
    assert_eq!(value["predecessors"], serde_json::json!([2, 0]));
    assert!(value.get("missing_arc_heads").is_none());
    assert!(value.get("duals").is_none());
}

#[test]
fn cli_emits_pretty_json_with_duals() {
    let out = stdout_of(
        cli()
            .args(["--json", "--pretty", "--duals"])
            .arg(fixture("scenario_b.txt")),
    );
    assert!(out.contains("\n  \"objective\": 16"), "not pretty: {out}");

    let value: serde_json::Value = serde_json::from_str(&out).expect("valid JSON");
    assert_eq!(value["duals"]["aux_nodes"], 6);
    assert_eq!(
        value["duals"]["parents"],
        serde_json::json!([4, 4, 5, null, 5, null])
    );
    assert_eq!(value["duals"]["values"], serde_json::json!([1, 1, 5, 0, 4, 5]));
}

#[test]
fn cli_reports_forced_missing_arcs() {
    let out = stdout_of(
        cli()
            .args(["--json", "--check"])
            .arg(fixture("forced_missing.txt")),
    );
    let value: serde_json::Value = serde_json::from_str(&out).expect("valid JSON");

    assert_eq!(value["feasible"], false);
    assert_eq!(value["objective"], 2_147_483_649i64);
    assert_eq!(value["predecessors"], serde_json::json!([2, 0]));
    assert_eq!(value["missing_arc_heads"], serde_json::json!([0]));
}

#[test]
fn cli_rejects_a_truncated_instance() {
    let out = cli()
        .arg(fixture("truncated.txt"))
        .output()
        .expect("run msarbor-cli");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("missing cost for arc (2, 1)"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn cli_reports_a_missing_input_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let missing = tmp.path().join("nope.txt");

    cli().arg(&missing).assert().code(1);
}

#[test]
fn cli_solves_an_instance_written_to_a_temp_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("ties.txt");
    fs::write(&path, "3\n0 1\n1 0\n1 1\n").expect("write instance");

    let out = stdout_of(cli().arg(&path));
    assert_eq!(out, "3\t2\n2 2\n");
}

#[test]
fn cli_usage_errors_exit_with_2() {
    cli().arg("--bogus").assert().code(2);
    cli().arg("--log-level").assert().code(2);
    cli().args(["--log-level", "loud"]).assert().code(2);
    cli().args(["a.txt", "b.txt"]).assert().code(2);
    cli().arg("--help").assert().code(2);
}

