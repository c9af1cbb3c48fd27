use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn converts_markdown_to_pandoc_on_stdout() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.md");
    fs::write(&input, "# Title\n\nhello *world*\n").unwrap();

    let mut cmd = cargo_bin_cmd!("podoc");
    cmd.current_dir(dir.path())
        .arg(input.as_os_str())
        .arg("--to")
        .arg("pandoc");

    let output = cmd.assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["pandoc-api-version"], serde_json::json!([1, 23]));
    assert_eq!(json["blocks"][0]["t"], "Header");
    assert_eq!(json["blocks"][1]["t"], "Para");
}

#[test]
fn detects_target_from_output_extension() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.md");
    let output = dir.path().join("doc.json");
    fs::write(&input, "hello *world*").unwrap();

    let mut cmd = cargo_bin_cmd!("podoc");
    cmd.current_dir(dir.path())
        .arg(input.as_os_str())
        .arg("-o")
        .arg(output.as_os_str());
    cmd.assert().success().stdout(predicate::str::is_empty());

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("\"Emph\""));

    // And back again
    let round_trip = dir.path().join("back.md");
    let mut cmd = cargo_bin_cmd!("podoc");
    cmd.current_dir(dir.path())
        .arg(output.as_os_str())
        .arg("-o")
        .arg(round_trip.as_os_str());
    cmd.assert().success();
    assert_eq!(fs::read_to_string(&round_trip).unwrap(), "hello *world*");
}

#[test]
fn reads_stdin_with_explicit_source() {
    let dir = tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("podoc");
    cmd.current_dir(dir.path())
        .args(["--from", "markdown", "--to", "ast"])
        .write_stdin("hello *world*");

    cmd.assert().success().stdout(
        predicate::str::starts_with("root")
            .and(predicate::str::contains("└─ Para"))
            .and(predicate::str::contains("└─ Emph")),
    );
}

#[test]
fn stdin_without_source_fails() {
    let dir = tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("podoc");
    cmd.current_dir(dir.path())
        .args(["--to", "pandoc"])
        .write_stdin("hello");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("requires --from"));
}

#[test]
fn same_language_passes_through() {
    let dir = tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("podoc");
    cmd.current_dir(dir.path())
        .args(["-f", "markdown", "-t", "markdown"])
        .write_stdin("* not rewritten");

    cmd.assert().success().stdout("* not rewritten");
}

#[test]
fn unknown_language_fails() {
    let dir = tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("podoc");
    cmd.current_dir(dir.path())
        .args(["--from", "markdown", "--to", "docx"])
        .write_stdin("hello");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("docx"));
}

#[test]
fn shows_conversion_path() {
    let dir = tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("podoc");
    cmd.current_dir(dir.path())
        .args(["--from", "markdown", "--to", "pandoc", "--show-path"]);

    cmd.assert()
        .success()
        .stdout("markdown -> ast -> pandoc\n");
}

#[test]
fn inspect_prints_tree() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.md");
    fs::write(&input, "- a\n- b\n").unwrap();

    let mut cmd = cargo_bin_cmd!("podoc");
    cmd.current_dir(dir.path()).arg("inspect").arg(input.as_os_str());

    cmd.assert().success().stdout(
        predicate::str::contains("BulletList")
            .and(predicate::str::contains("ListItem"))
            .and(predicate::str::contains("Plain")),
    );
}
