//! CLI integration tests
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::cargo::cargo_bin_cmd!("precis")
}

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

#[test]
fn test_cli_file_input() {
    cmd()
        .arg(get_fixture_path("article.html"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Offshore wind farm clears final planning hurdle\n"))
        .stdout(predicate::str::contains("Keywords: "));
}

#[test]
fn test_cli_stdin_input() {
    let html = std::fs::read_to_string(get_fixture_path("article.html")).unwrap();
    cmd()
        .arg("-")
        .write_stdin(html)
        .assert()
        .success()
        .stdout(predicate::str::contains("Northgate"));
}

#[test]
fn test_cli_markdown_format() {
    cmd()
        .args(["-f", "markdown", &get_fixture_path("article.html")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# Offshore wind farm clears final planning hurdle"))
        .stdout(predicate::str::contains("## Keywords"));
}

#[test]
fn test_cli_frontmatter() {
    cmd()
        .args(["-f", "md", "--frontmatter", &get_fixture_path("article.html")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("+++"));
}

#[test]
fn test_cli_json_format() {
    let output = cmd()
        .args(["-f", "json", "--keywords", "5", &get_fixture_path("article.html")])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["kind"], "article");
    assert_eq!(value["title"], "Offshore wind farm clears final planning hurdle");
    assert!(value["keywords"].as_array().unwrap().len() <= 5);
    assert!(value["key_points"].as_array().unwrap().len() <= 15);
}

#[test]
fn test_cli_source_url_selects_topic_strategy() {
    let output = cmd()
        .args([
            "-f",
            "json",
            "--url",
            "https://www.coastalherald.example/topic/world-cup",
            &get_fixture_path("topic.html"),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["page_kind"], "topic_listing");
    assert_eq!(value["url"], "https://www.coastalherald.example/topic/world-cup");
    assert!(value["summary"].as_str().unwrap().starts_with("Overview: "));
}

#[test]
fn test_cli_output_file() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("digest.txt");

    cmd()
        .args(["-o", output.to_str().unwrap()])
        .arg(get_fixture_path("article.html"))
        .assert()
        .success();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("Offshore wind farm"));
}

#[test]
fn test_cli_thin_page_exits_with_error_digest() {
    cmd()
        .arg(get_fixture_path("thin.html"))
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Could not extract meaningful content"));
}

#[test]
fn test_cli_error_digest_json() {
    let output = cmd()
        .args(["-f", "json", &get_fixture_path("thin.html")])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["kind"], "error");
    assert_eq!(value["title"], "Error");
}

#[test]
fn test_cli_rules_file() {
    let tmp = TempDir::new().unwrap();
    let rules = tmp.path().join("domains.json");
    std::fs::write(
        &rules,
        r#"{"difficult": [{"host": "app.example.com", "guidance": "Use the exported PDF instead."}]}"#,
    )
    .unwrap();

    cmd()
        .args(["--rules", rules.to_str().unwrap()])
        .args(["--url", "https://app.example.com/dashboard"])
        .arg(get_fixture_path("thin.html"))
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Use the exported PDF instead."));
}

#[test]
fn test_cli_malformed_rules_file() {
    let tmp = TempDir::new().unwrap();
    let rules = tmp.path().join("domains.json");
    std::fs::write(&rules, "{ not json").unwrap();

    cmd()
        .args(["--rules", rules.to_str().unwrap(), &get_fixture_path("article.html")])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load domain rules"));
}

#[test]
fn test_cli_invalid_file() {
    cmd().arg("nonexistent.html").assert().code(1);
}

#[test]
fn test_cli_invalid_format() {
    cmd()
        .args(["-f", "html", &get_fixture_path("article.html")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid format"));
}

#[test]
fn test_cli_width() {
    let output = cmd()
        .args(["--width", "60", &get_fixture_path("article.html")])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let before_keywords = stdout.split("Keywords:").next().unwrap();
    assert!(before_keywords.lines().all(|line| line.chars().count() <= 60 || !line.contains(' ')));
}

#[test]
fn test_cli_verbose() {
    cmd()
        .args(["-v", &get_fixture_path("article.html")])
        .assert()
        .success()
        .stderr(predicate::str::contains("Precis"))
        .stderr(predicate::str::contains("Digest Details"));
}

#[test]
fn test_cli_completions() {
    cmd()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("precis"));
}

#[test]
fn test_cli_requires_input() {
    cmd().assert().failure();
}
