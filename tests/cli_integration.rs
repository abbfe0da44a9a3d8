//! CLI integration tests for kbx
//!
//! These tests verify the complete workflow from initialization through
//! entity management and cross-referencing, ensuring commands work together
//! correctly.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command instance for the kbx binary
fn kbx_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("kbx"));
    cmd.env_remove("KBX_PROJECT");
    cmd
}

/// Create a temporary directory and initialize a knowledge base
fn setup_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    kbx_cmd().arg("init").arg(dir.path()).assert().success();
    dir
}

/// Run a command in the project with JSON output and parse stdout
fn json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let output = kbx_cmd()
        .current_dir(dir)
        .args(args)
        .args(["--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    serde_json::from_str(&stdout).unwrap()
}

/// Add an entity and return its id
fn add(dir: &Path, args: &[&str]) -> String {
    json(dir, args)["id"].as_str().unwrap().to_string()
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[test]
fn test_init_creates_structure() {
    let dir = TempDir::new().unwrap();

    kbx_cmd()
        .arg("init")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized knowledge base"));

    assert!(dir.path().join(".kb").is_dir());
    assert!(dir.path().join(".kb/config.toml").is_file());
    assert!(dir.path().join(".kb/.gitignore").is_file());
    for pool in ["procedures", "systems", "scripts", "articles"] {
        assert!(dir.path().join(format!(".kb/{}.jsonl", pool)).is_file());
    }
}

#[test]
fn test_init_is_idempotent() {
    let dir = setup_project();

    kbx_cmd()
        .current_dir(dir.path())
        .args(["procedure", "add", "Onboarding"])
        .assert()
        .success();

    kbx_cmd().arg("init").arg(dir.path()).assert().success();

    // Existing data survives a second init
    kbx_cmd()
        .current_dir(dir.path())
        .args(["procedure", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Onboarding"));
}

#[test]
fn test_commands_outside_project_fail() {
    let dir = TempDir::new().unwrap();

    kbx_cmd()
        .current_dir(dir.path())
        .args(["procedure", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("kbx init"));
}

#[test]
fn test_project_env_overrides_current_dir() {
    let dir = setup_project();
    let elsewhere = TempDir::new().unwrap();

    kbx_cmd()
        .current_dir(elsewhere.path())
        .env("KBX_PROJECT", dir.path())
        .args(["system", "add", "CRM"])
        .assert()
        .success();

    kbx_cmd()
        .current_dir(dir.path())
        .args(["system", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CRM"));
}

// =============================================================================
// Entity Tests
// =============================================================================

#[test]
fn test_procedure_lifecycle() {
    let dir = setup_project();

    let id = add(
        dir.path(),
        &[
            "procedure",
            "add",
            "Onboarding",
            "--content",
            "Open the CRM first",
            "--version",
            "2.0",
        ],
    );
    assert!(id.starts_with("p-"));

    let edited = json(dir.path(), &["procedure", "edit", &id, "--version", "2.1"]);
    assert_eq!(edited["version"], "2.1");

    kbx_cmd()
        .current_dir(dir.path())
        .args(["procedure", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Onboarding"))
        .stdout(predicate::str::contains("Open the CRM first"));

    kbx_cmd()
        .current_dir(dir.path())
        .args(["procedure", "edit", &id, "--title", "Customer onboarding"])
        .assert()
        .success();

    kbx_cmd()
        .current_dir(dir.path())
        .args(["procedure", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Customer onboarding"));

    kbx_cmd()
        .current_dir(dir.path())
        .args(["procedure", "remove", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed procedure"));

    kbx_cmd()
        .current_dir(dir.path())
        .args(["procedure", "show", &id])
        .assert()
        .failure();
}

#[test]
fn test_system_list_sorted_by_name() {
    let dir = setup_project();
    add(dir.path(), &["system", "add", "Zendesk"]);
    add(dir.path(), &["system", "add", "Billing"]);
    add(dir.path(), &["system", "add", "CRM"]);

    let systems = json(dir.path(), &["system", "list"]);
    let names: Vec<_> = systems
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();

    assert_eq!(names, vec!["Billing", "CRM", "Zendesk"]);
}

#[test]
fn test_script_list_filters_by_tag() {
    let dir = setup_project();
    add(dir.path(), &["script", "add", "Greeting", "--tags", "sales,intro"]);
    add(dir.path(), &["script", "add", "Escalation", "--tags", "support"]);

    kbx_cmd()
        .current_dir(dir.path())
        .args(["script", "list", "--tag", "support"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Escalation"))
        .stdout(predicate::str::contains("Greeting").not());
}

#[test]
fn test_article_list_hides_drafts() {
    let dir = setup_project();
    add(dir.path(), &["article", "add", "Returns FAQ", "--category", "faq"]);
    add(dir.path(), &["article", "add", "Half written", "--status", "draft"]);

    kbx_cmd()
        .current_dir(dir.path())
        .args(["article", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Returns FAQ"))
        .stdout(predicate::str::contains("Half written").not());

    kbx_cmd()
        .current_dir(dir.path())
        .args(["article", "list", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Half written"));
}

#[test]
fn test_show_lists_referenced_items() {
    let dir = setup_project();
    let crm = add(dir.path(), &["system", "add", "CRM"]);
    let id = add(
        dir.path(),
        &["procedure", "add", "Onboarding", "--content", "Register the customer in מערכת CRM"],
    );

    let shown = json(dir.path(), &["procedure", "show", &id]);
    let referenced = shown["referenced_items"].as_array().unwrap();

    assert_eq!(referenced.len(), 1);
    assert_eq!(referenced[0]["type"], "system");
    assert_eq!(referenced[0]["id"], crm.as_str());
    assert_eq!(shown["entity"]["title"], "Onboarding");
}

#[test]
fn test_version_flag() {
    kbx_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("kbx"));
}

// =============================================================================
// Search Tests
// =============================================================================

#[test]
fn test_search_across_pools() {
    let dir = setup_project();
    add(dir.path(), &["system", "add", "CRM", "--keywords", "customers"]);
    add(dir.path(), &["article", "add", "Returns", "--content", "How customers return items"]);
    add(dir.path(), &["procedure", "add", "Refunds"]);

    let hits = json(dir.path(), &["search", "CUSTOMERS"]);
    let types: Vec<_> = hits
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["system", "article"]);

    kbx_cmd()
        .current_dir(dir.path())
        .args(["search", "customers", "--type", "article"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Returns"))
        .stdout(predicate::str::contains("CRM").not());
}

#[test]
fn test_stats_counts_pools() {
    let dir = setup_project();
    add(dir.path(), &["procedure", "add", "Onboarding"]);
    add(dir.path(), &["procedure", "add", "Refunds", "--status", "draft"]);
    add(dir.path(), &["system", "add", "CRM"]);
    add(dir.path(), &["article", "add", "Returns FAQ"]);
    add(dir.path(), &["article", "add", "Half written", "--status", "draft"]);

    let stats = json(dir.path(), &["stats"]);
    assert_eq!(stats["procedures"]["total"], 2);
    assert_eq!(stats["procedures"]["draft"], 1);
    assert_eq!(stats["systems"], 1);
    assert_eq!(stats["scripts"], 0);
    assert_eq!(stats["articles"]["total"], 2);
    assert_eq!(stats["articles"]["published"], 1);
    assert_eq!(stats["linkable"], 4);

    kbx_cmd()
        .current_dir(dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Procedures: 2 total"));
}

// =============================================================================
// Cross-Reference Tests
// =============================================================================

fn onboarding_project() -> (TempDir, String, String) {
    let dir = setup_project();
    let p1 = add(dir.path(), &["procedure", "add", "Onboarding"]);
    let s1 = add(dir.path(), &["system", "add", "CRM"]);
    (dir, p1, s1)
}

#[test]
fn test_detect_from_store() {
    let (dir, p1, s1) = onboarding_project();

    let references = json(
        dir.path(),
        &["detect", "--text", "Follow Onboarding, then open CRM."],
    );
    let references = references.as_array().unwrap();

    assert_eq!(references.len(), 2);
    assert_eq!(references[0]["type"], "procedure");
    assert_eq!(references[0]["id"], p1.as_str());
    assert_eq!(references[0]["matched_text"], "Onboarding");
    assert_eq!(references[1]["type"], "system");
    assert_eq!(references[1]["id"], s1.as_str());
}

#[test]
fn test_annotate_from_stdin() {
    let (dir, p1, s1) = onboarding_project();

    kbx_cmd()
        .current_dir(dir.path())
        .arg("annotate")
        .write_stdin("Follow Onboarding, then open CRM.")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            r#"<a href="/procedures?id={p1}" class="smart-link smart-link-procedure" data-type="procedure" data-id="{p1}">Onboarding</a>"#
        )))
        .stdout(predicate::str::contains(format!(
            r#"<a href="/systems?id={s1}" class="smart-link smart-link-system" data-type="system" data-id="{s1}">CRM</a>"#
        )));
}

#[test]
fn test_annotate_links_inside_comparison_prose() {
    let (dir, _, s1) = onboarding_project();

    let annotated = json(dir.path(), &["annotate", "--text", "if x<y then open CRM> now"]);
    assert_eq!(annotated["links"], 1);
    assert!(annotated["text"]
        .as_str()
        .unwrap()
        .contains(&format!(r#"data-id="{}">CRM</a>"#, s1)));
}

#[test]
fn test_annotate_twice_is_stable() {
    let (dir, _, _) = onboarding_project();

    let once = json(dir.path(), &["annotate", "--text", "Open CRM after Onboarding"]);
    assert_eq!(once["links"], 2);

    let text = once["text"].as_str().unwrap();
    let twice = json(dir.path(), &["annotate", "--text", text]);
    assert_eq!(twice["links"], 0);
    assert_eq!(twice["text"], once["text"]);
}

#[test]
fn test_refs_of_entity_excludes_itself() {
    let dir = setup_project();
    let crm = add(dir.path(), &["system", "add", "CRM", "--instructions", "Log in to CRM"]);
    let article = add(
        dir.path(),
        &["article", "add", "CRM", "--content", "See the CRM guide"],
    );

    let items = json(dir.path(), &["refs", "--of", &format!("article:{}", article)]);
    let items = items.as_array().unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], crm.as_str());
}

#[test]
fn test_refs_with_exclude() {
    let (dir, p1, s1) = onboarding_project();

    kbx_cmd()
        .current_dir(dir.path())
        .args([
            "refs",
            "--text",
            "Follow Onboarding, then open CRM.",
            "--exclude",
            &format!("system:{}", s1),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(p1.as_str()))
        .stdout(predicate::str::contains(s1.as_str()).not());
}

#[test]
fn test_detect_from_json_snapshot() {
    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("snapshot.json");
    fs::write(
        &snapshot,
        r#"{
            "procedures": [{"id": "p1", "title": "Onboarding"}],
            "systems": [{"id": "s1", "name": "CRM"}],
            "scripts": [],
            "articles": []
        }"#,
    )
    .unwrap();

    kbx_cmd()
        .current_dir(dir.path())
        .args(["refs", "--snapshot"])
        .arg(&snapshot)
        .args(["--text", "Follow Onboarding, then open CRM."])
        .assert()
        .success()
        .stdout("procedure\tp1\tOnboarding\nsystem\ts1\tCRM\n");
}

#[test]
fn test_annotate_from_yaml_snapshot_and_file() {
    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("snapshot.yaml");
    fs::write(
        &snapshot,
        "procedures:\n  - id: p1\n    title: Alpha\n",
    )
    .unwrap();
    let text = dir.path().join("answer.txt");
    fs::write(&text, "ראה נוהל Alpha\n").unwrap();

    kbx_cmd()
        .current_dir(dir.path())
        .arg("annotate")
        .arg("--snapshot")
        .arg(&snapshot)
        .arg("--file")
        .arg(&text)
        .assert()
        .success()
        .stdout(predicate::str::contains(">נוהל Alpha</a>"))
        .stdout(predicate::str::contains(r#"data-id="p1""#));
}

#[test]
fn test_unknown_snapshot_format_fails() {
    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("snapshot.csv");
    fs::write(&snapshot, "p1,Onboarding\n").unwrap();

    kbx_cmd()
        .current_dir(dir.path())
        .args(["detect", "--text", "Onboarding", "--snapshot"])
        .arg(&snapshot)
        .assert()
        .failure();
}

#[test]
fn test_verbose_goes_to_stderr() {
    let (dir, _, _) = onboarding_project();

    kbx_cmd()
        .current_dir(dir.path())
        .args(["--verbose", "detect", "--text", "CRM", "--format", "json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[verbose:detect]"))
        .stdout(predicate::str::contains("[verbose").not());
}
