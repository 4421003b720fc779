use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;

fn get_test_dir() -> PathBuf {
    let dir = PathBuf::from("target/tmp/tests");
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_cli_reports_epochs_and_test_score() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("linkgcn")?;
    cmd.args([
        "--nodes", "60", "--edges", "180", "--epochs", "40", "--log-every", "20", "--seed", "3",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::is_match(r"Epoch: 20, Loss: \d+\.\d{4}, train f1: \d\.\d{4}, val f1: \d\.\d{4}")?)
        .stdout(predicate::str::contains("Epoch: 40,"))
        .stdout(predicate::str::is_match(r"Test Accuracy: \d\.\d{4}")?);
    Ok(())
}

#[test]
fn test_cli_seeded_runs_match() -> Result<(), Box<dyn std::error::Error>> {
    let run = || -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        let output = Command::cargo_bin("linkgcn")?
            .args(["--nodes", "40", "--edges", "100", "--epochs", "10", "--log-every", "5", "--seed", "11"])
            .output()?;
        assert!(output.status.success());
        Ok(output.stdout)
    };
    assert_eq!(run()?, run()?);
    Ok(())
}

#[test]
fn test_cli_config_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = get_test_dir();
    let file = dir.join("experiment.json");
    fs::write(
        &file,
        r#"{"num_nodes": 30, "num_edges": 90, "epochs": 6, "log_every": 3, "seed": 5, "loss": "probabilities"}"#,
    )?;

    let mut cmd = Command::cargo_bin("linkgcn")?;
    cmd.arg("--config").arg(&file);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Epoch: 3,"))
        .stdout(predicate::str::contains("Epoch: 6,"))
        .stdout(predicate::str::contains("Test Accuracy:"));

    fs::remove_file(file)?;
    Ok(())
}

#[test]
fn test_cli_empty_validation_reported() -> Result<(), Box<dyn std::error::Error>> {
    // 5 edges split 4 / 0 / 1.
    let mut cmd = Command::cargo_bin("linkgcn")?;
    cmd.args(["--nodes", "4", "--edges", "5", "--epochs", "2", "--log-every", "1", "--seed", "1"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("val f1: n/a"));
    Ok(())
}

#[test]
fn test_cli_rejects_bad_ratios() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("linkgcn")?;
    cmd.args(["--train-ratio", "0.9", "--val-ratio", "0.2", "--test-ratio", "0.1"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid split ratios"));
    Ok(())
}

#[test]
fn test_cli_rejects_uncoverable_graph() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("linkgcn")?;
    cmd.args(["--nodes", "100", "--edges", "10", "--epochs", "1"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot touch all"));
    Ok(())
}
