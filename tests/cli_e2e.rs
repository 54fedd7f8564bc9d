//! End-to-end CLI tests for supportpack.
//!
//! These tests run the actual binary inside a temporary working directory,
//! so the default `support.tsv` input and `support.db` database resolve there.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test cli_e2e
//! ```

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::{TempDir, tempdir};

// ============================================================================
// Test Fixtures
// ============================================================================

const HEADER: &str = "id,url,date,month,elapse_time(hours),time_to_first(hours),interactions(total),customer_interactions,support_interactions,interaction_ratio,word_ratio,user_last,person,channel,withlink,withlinktodoc,totalword,support_level";

/// A working directory with a `support.tsv` transcript.
fn setup_workdir(transcript: &str) -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("support.tsv"), transcript).unwrap();
    dir
}

fn basic_transcript() -> String {
    [
        "[C100] A (B) <2020-01-01T10:00:00.000Z>\tu\tcustomer\t2020-01-01T10:00:00.000Z\thello there",
        "[C100] A (B) <2020-01-01T10:00:00.000Z>\tu\tana\t2020-01-01T12:00:00.000Z\thi, see https://docs.bitnami.com/x",
        "[4521] Billing\thttps://zendesk/4521\tbob\t2020-01-02T09:00:00.000Z\torphan reply",
    ]
    .join("\n")
}

fn supportpack_cmd(dir: &TempDir) -> Command {
    let cmd = std::process::Command::new(env!("CARGO_BIN_EXE_supportpack"));
    let mut cmd = Command::from_std(cmd);
    cmd.current_dir(dir.path())
        .env_remove("SUPPORT_DB")
        .env_remove("SUPPORT_INPUT")
        .env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Commands
// ============================================================================

mod commands {
    use super::*;

    #[test]
    fn test_import_then_count() {
        let dir = setup_workdir(&basic_transcript());

        supportpack_cmd(&dir).arg("import").assert().success();
        assert!(dir.path().join("support.db").exists());

        supportpack_cmd(&dir)
            .arg("count")
            .assert()
            .success()
            .stdout(predicate::str::contains("chats:  1"))
            .stdout(predicate::str::contains("entries:  2"));
    }

    #[test]
    fn test_chatreport() {
        let dir = setup_workdir(&basic_transcript());
        supportpack_cmd(&dir).arg("import").assert().success();

        let expected = format!(
            "{}\nC100,u,01/01/2020,01/2020,2,2,2,1,1,1.00,3.50,0,ana,community,1,1,9,level1\n",
            HEADER
        );
        supportpack_cmd(&dir)
            .arg("chatreport")
            .assert()
            .success()
            .stdout(expected);
    }

    #[test]
    fn test_chatreport_is_idempotent() {
        let dir = setup_workdir(&basic_transcript());
        supportpack_cmd(&dir).arg("import").assert().success();

        let first = supportpack_cmd(&dir).arg("chatreport").output().unwrap();
        let second = supportpack_cmd(&dir).arg("chatreport").output().unwrap();
        assert!(first.status.success());
        assert_eq!(first.stdout, second.stdout);
    }

    #[test]
    fn test_chatreport_empty_database() {
        let dir = setup_workdir("");
        supportpack_cmd(&dir)
            .arg("chatreport")
            .assert()
            .success()
            .stdout(format!("{}\n", HEADER));
    }

    #[test]
    fn test_print_chat() {
        let dir = setup_workdir(&basic_transcript());
        supportpack_cmd(&dir).arg("import").assert().success();

        supportpack_cmd(&dir)
            .args(["print", "C100"])
            .assert()
            .success()
            .stdout(predicate::str::contains("chat_id: \"C100\""))
            .stdout(predicate::str::contains("customer_interactions: 1"))
            .stdout(predicate::str::contains("\"ana\""));
    }

    #[test]
    fn test_print_unknown_chat_fails() {
        let dir = setup_workdir(&basic_transcript());
        supportpack_cmd(&dir).arg("import").assert().success();

        supportpack_cmd(&dir)
            .args(["print", "nope"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No chat found with id 'nope'"));
    }

    #[test]
    fn test_custom_paths() {
        let dir = setup_workdir("");
        fs::write(dir.path().join("march.tsv"), basic_transcript()).unwrap();

        supportpack_cmd(&dir)
            .args(["--db", "data/march.db", "--input", "march.tsv", "import"])
            .assert()
            .success();
        assert!(dir.path().join("data").join("march.db").exists());

        supportpack_cmd(&dir)
            .args(["count", "--db", "data/march.db"])
            .assert()
            .success()
            .stdout(predicate::str::contains("chats:  1"));
    }

    #[test]
    fn test_db_from_env() {
        let dir = setup_workdir(&basic_transcript());
        supportpack_cmd(&dir)
            .env("SUPPORT_DB", "env.db")
            .arg("import")
            .assert()
            .success();
        assert!(dir.path().join("env.db").exists());
        assert!(!dir.path().join("support.db").exists());
    }
}

// ============================================================================
// Error Handling
// ============================================================================

mod error_handling {
    use super::*;

    #[test]
    fn test_missing_input_file() {
        let dir = tempdir().unwrap();
        supportpack_cmd(&dir)
            .arg("import")
            .assert()
            .failure()
            .stderr(predicate::str::contains("IO error"));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let transcript = format!(
            "{}\njust garbage\n[C100] t\tu\tana\tlater\tbad time\n",
            basic_transcript()
        );
        let dir = setup_workdir(&transcript);

        supportpack_cmd(&dir)
            .arg("import")
            .assert()
            .success()
            .stderr(predicate::str::contains("Malformed line"));

        supportpack_cmd(&dir)
            .arg("count")
            .assert()
            .success()
            .stdout(predicate::str::contains("entries:  2"));
    }

    #[test]
    fn test_missing_chat_id_aborts() {
        let transcript = format!(
            "no brackets\tu\tcustomer\t2020-01-01T10:00:00.000Z\thi\n{}",
            basic_transcript()
        );
        let dir = setup_workdir(&transcript);

        supportpack_cmd(&dir)
            .arg("import")
            .assert()
            .failure()
            .stderr(predicate::str::contains("no brackets"));

        supportpack_cmd(&dir)
            .arg("count")
            .assert()
            .success()
            .stdout(predicate::str::contains("entries:  0"));
    }

    #[test]
    fn test_no_subcommand() {
        let dir = tempdir().unwrap();
        supportpack_cmd(&dir).assert().failure();
    }

    #[test]
    fn test_help() {
        let dir = tempdir().unwrap();
        supportpack_cmd(&dir)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("chatreport"))
            .stdout(predicate::str::contains("import"));
    }
}
