/// End-to-end tests for the CLI, run offline against a local store
use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Binary running inside `dir` with no backend settings leaking in from the environment
fn portal(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("audit-portal");
    cmd.current_dir(dir)
        .env_remove("AUDIT_PORTAL_URL")
        .env_remove("AUDIT_PORTAL_API_KEY")
        .env_remove("AUDIT_PORTAL_ACCESS_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

fn store(dir: &Path) -> String {
    dir.join("store.json").display().to_string()
}

fn import_fixture(dir: &Path) {
    portal(dir)
        .args(["import", &fixture("incidents.csv").display().to_string()])
        .args(["--store", &store(dir)])
        .assert()
        .success();
}

fn list_json(dir: &Path, extra: &[&str]) -> serde_json::Value {
    let output = portal(dir)
        .args(["list", "-f", "json", "--store", &store(dir)])
        .args(extra)
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

fn incident_id(view: &serde_json::Value, sample_id: &str) -> String {
    view["incidents"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["sample_id"] == sample_id)
        .and_then(|i| i["id"].as_str())
        .unwrap()
        .to_string()
}

// ============================================================================
// Exit codes
// ============================================================================

mod exit_code_tests {
    use super::*;

    /// Exit code 0: --help should return success
    #[test]
    fn test_exit_code_help() {
        cargo_bin_cmd!("audit-portal").arg("--help").assert().code(0);
    }

    /// Exit code 0: --version should return success
    #[test]
    fn test_exit_code_version() {
        cargo_bin_cmd!("audit-portal").arg("--version").assert().code(0);
    }

    /// Exit code 2: Invalid arguments
    #[test]
    fn test_exit_code_invalid_argument() {
        cargo_bin_cmd!("audit-portal")
            .args(["list", "--invalid-option"])
            .assert()
            .code(2);
    }

    /// Exit code 2: Invalid format value
    #[test]
    fn test_exit_code_invalid_format() {
        cargo_bin_cmd!("audit-portal")
            .args(["dashboard", "-f", "pdf"])
            .assert()
            .code(2);
    }

    /// Exit code 3: no backend configured and not offline
    #[test]
    fn test_exit_code_missing_backend() {
        let dir = TempDir::new().unwrap();
        portal(dir.path())
            .arg("dashboard")
            .assert()
            .code(3)
            .stderr(predicate::str::contains("No backend_url"));
    }

    /// Exit code 3: spreadsheet does not exist
    #[test]
    fn test_exit_code_missing_spreadsheet() {
        let dir = TempDir::new().unwrap();
        portal(dir.path())
            .args(["import", "missing.xlsx", "--store", &store(dir.path())])
            .assert()
            .code(3);
    }

    /// Exit code 1: --strict with rows outside the worklist
    #[test]
    fn test_exit_code_strict_warnings() {
        let dir = TempDir::new().unwrap();
        portal(dir.path())
            .args(["import", &fixture("incidents.csv").display().to_string()])
            .args(["--store", &store(dir.path()), "--strict"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("# Import Summary"));
    }
}

// ============================================================================
// Import
// ============================================================================

#[test]
fn test_import_summary() {
    let dir = TempDir::new().unwrap();
    portal(dir.path())
        .args(["import", &fixture("incidents.csv").display().to_string()])
        .args(["--store", &store(dir.path())])
        .assert()
        .success()
        .stdout(predicate::str::contains("| Rows read | 5 |"))
        .stdout(predicate::str::contains("| Blank rows discarded | 1 |"))
        .stdout(predicate::str::contains("| Duplicates collapsed | 1 |"))
        .stdout(predicate::str::contains("| Upserted | 4 |"));

    assert!(dir.path().join("store.json").exists());
}

#[test]
fn test_reimport_is_idempotent() {
    let dir = TempDir::new().unwrap();
    import_fixture(dir.path());
    import_fixture(dir.path());

    let view = list_json(dir.path(), &[]);
    assert_eq!(view["loaded"], 3);
}

#[test]
fn test_dry_run_leaves_no_store() {
    let dir = TempDir::new().unwrap();
    portal(dir.path())
        .args(["import", &fixture("incidents.csv").display().to_string()])
        .args(["--store", &store(dir.path()), "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Import Preview (dry run)"));

    assert!(!dir.path().join("store.json").exists());
}

#[test]
fn test_compliant_only_sheet_warns() {
    let dir = TempDir::new().unwrap();
    portal(dir.path())
        .args(["import", &fixture("compliant_only.csv").display().to_string()])
        .args(["--store", &store(dir.path())])
        .assert()
        .success()
        .stderr(predicate::str::contains("No \"NÃO ADERENTE\" rows found"));
}

// ============================================================================
// Audit, reports and feedback
// ============================================================================

#[test]
fn test_audit_then_report() {
    let dir = TempDir::new().unwrap();
    import_fixture(dir.path());

    let view = list_json(dir.path(), &["--status", "pending"]);
    let id = incident_id(&view, "1001");

    portal(dir.path())
        .args(["audit", &id, "--corrected", "true", "--reason", "Wrong closing code"])
        .args(["--offender", "jsilva", "--store", &store(dir.path())])
        .assert()
        .success();

    let view = list_json(dir.path(), &["--status", "treated"]);
    assert_eq!(view["incidents"].as_array().unwrap().len(), 1);
    assert_eq!(view["incidents"][0]["audit"]["auditor_login"], "LOCAL");

    std::fs::write(
        dir.path().join("audit-portal.config.yml"),
        format!(
            "collaborators_file: {}\n",
            fixture("collaborators.toml").display()
        ),
    )
    .unwrap();

    portal(dir.path())
        .args(["report", "--store", &store(dir.path())])
        .assert()
        .success()
        .stdout(predicate::str::contains("| 1 | JSILVA | João Silva | 1 | WRONG CLOSING CODE |"))
        .stdout(predicate::str::contains("mailto:joao.silva@example.com?"));

    portal(dir.path())
        .args(["dashboard", "-f", "json", "--store", &store(dir.path())])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"treated\": 1"));
}

#[test]
fn test_incomplete_audit_is_rejected() {
    let dir = TempDir::new().unwrap();
    import_fixture(dir.path());
    let id = incident_id(&list_json(dir.path(), &[]), "1002");

    portal(dir.path())
        .args(["audit", &id, "--corrected", "false", "--store", &store(dir.path())])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Audit is incomplete: missing reason"));

    let view = list_json(dir.path(), &["--status", "treated"]);
    assert!(view["incidents"].as_array().unwrap().is_empty());
}

#[test]
fn test_feedback_flags_offender_incidents() {
    let dir = TempDir::new().unwrap();
    import_fixture(dir.path());
    let id = incident_id(&list_json(dir.path(), &[]), "1003");

    portal(dir.path())
        .args(["audit", &id, "--corrected", "false", "--reason", "Late closing"])
        .args(["--offender", "msouza", "--store", &store(dir.path())])
        .assert()
        .success();

    portal(dir.path())
        .args(["feedback", "msouza", "--store", &store(dir.path())])
        .assert()
        .success();

    let output = portal(dir.path())
        .args(["report", "-f", "json", "--store", &store(dir.path())])
        .output()
        .unwrap();
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["kpis"]["feedback_sent"], 1);
    assert_eq!(report["kpis"]["feedback_percentage"], "100.0");
}

#[test]
fn test_output_to_file() {
    let dir = TempDir::new().unwrap();
    import_fixture(dir.path());
    let output_path = dir.path().join("dashboard.md");

    portal(dir.path())
        .args(["dashboard", "--store", &store(dir.path())])
        .args(["-o", &output_path.display().to_string()])
        .assert()
        .success();

    let markdown = std::fs::read_to_string(output_path).unwrap();
    assert!(markdown.contains("# Quality Dashboard"));
    assert!(markdown.contains("| 4 | 4 | 0 |"));
}

// ============================================================================
// Accounts
// ============================================================================

#[test]
fn test_create_user_offline() {
    let dir = TempDir::new().unwrap();

    portal(dir.path())
        .args(["create-user", "newuser", "--password", "secret"])
        .args(["--store", &store(dir.path())])
        .assert()
        .success()
        .stderr(predicate::str::contains("User NEWUSER created successfully"));

    portal(dir.path())
        .args(["create-user", "NewUser", "--password", "secret"])
        .args(["--store", &store(dir.path())])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("already exists"));
}
