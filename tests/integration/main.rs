//! Integration tests for revscout

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Binary with its config isolated in `home`
    fn revscout(home: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("revscout");
        cmd.env("REVSCOUT_CONFIG", home.path().join("config.toml"))
            .env_remove("RUST_LOG");
        cmd
    }

    fn write_project(dir: &std::path::Path, name: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(
            dir.join("Cargo.toml"),
            format!("[package]\nname = \"{}\"\nversion = \"0.1.0\"\n", name),
        )
        .unwrap();
    }

    #[test]
    fn help_displays() {
        let home = TempDir::new().unwrap();
        revscout(&home)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("find local Cargo projects"));
    }

    #[test]
    fn version_displays() {
        let home = TempDir::new().unwrap();
        revscout(&home)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("revscout"));
    }

    #[test]
    fn config_path() {
        let home = TempDir::new().unwrap();
        revscout(&home)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let home = TempDir::new().unwrap();
        revscout(&home)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[scan]"))
            .stdout(predicate::str::contains("max_depth = 4"));
    }

    #[test]
    fn config_init_then_show() {
        let home = TempDir::new().unwrap();
        revscout(&home).args(["config", "init"]).assert().success();
        assert!(home.path().join("config.toml").exists());

        fs::write(home.path().join("config.toml"), "[scan]\nmax_depth = 7\n").unwrap();
        revscout(&home)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("max_depth = 7"));
    }

    #[test]
    fn invalid_config_fails() {
        let home = TempDir::new().unwrap();
        fs::write(home.path().join("config.toml"), "[scan\n").unwrap();
        revscout(&home)
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn scan_finds_projects() {
        let home = TempDir::new().unwrap();
        let tree = TempDir::new().unwrap();
        write_project(&tree.path().join("alpha"), "alpha");
        write_project(&tree.path().join("group").join("beta"), "beta");
        write_project(&tree.path().join("node_modules").join("gamma"), "gamma");

        revscout(&home)
            .args(["scan", "--format", "plain"])
            .arg(tree.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("alpha"))
            .stdout(predicate::str::contains("beta"))
            .stdout(predicate::str::contains("gamma").not());
    }

    #[test]
    fn scan_respects_depth() {
        let home = TempDir::new().unwrap();
        let tree = TempDir::new().unwrap();
        write_project(&tree.path().join("alpha"), "alpha");
        write_project(&tree.path().join("group").join("beta"), "beta");

        revscout(&home)
            .args(["scan", "--depth", "1", "--format", "plain"])
            .arg(tree.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("alpha"))
            .stdout(predicate::str::contains("beta").not());
    }

    #[test]
    fn scan_json_output() {
        let home = TempDir::new().unwrap();
        let tree = TempDir::new().unwrap();
        write_project(&tree.path().join("alpha"), "alpha");

        revscout(&home)
            .args(["scan", "--format", "json"])
            .arg(tree.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("\"declared_name\": \"alpha\""));
    }

    #[test]
    fn scan_missing_root_is_empty() {
        let home = TempDir::new().unwrap();
        revscout(&home)
            .args(["scan", "--format", "json", "/definitely/not/here"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[]"));
    }

    #[test]
    fn stale_without_manifest_fails() {
        let home = TempDir::new().unwrap();
        let empty = TempDir::new().unwrap();
        revscout(&home)
            .arg("stale")
            .arg(empty.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Manifest not found"));
    }

    #[test]
    fn stale_without_lockfile_fails() {
        let home = TempDir::new().unwrap();
        let tree = TempDir::new().unwrap();
        write_project(tree.path(), "solo");
        revscout(&home)
            .arg("stale")
            .arg(tree.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Lockfile not found"));
    }

    #[test]
    fn stale_with_no_git_deps() {
        let home = TempDir::new().unwrap();
        let tree = TempDir::new().unwrap();
        write_project(tree.path(), "solo");
        fs::write(
            tree.path().join("Cargo.lock"),
            "version = 3\n\n[[package]]\nname = \"solo\"\nversion = \"0.1.0\"\n",
        )
        .unwrap();

        revscout(&home)
            .args(["stale", "--format", "json"])
            .arg(tree.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("[]"));
    }

    #[test]
    fn warm_pass_reports_unconfigured_tasks() {
        let home = TempDir::new().unwrap();
        revscout(&home)
            .arg("warm")
            .timeout(Duration::from_secs(60))
            .assert()
            .success()
            .stdout(predicate::str::contains("seed-refs"))
            .stdout(predicate::str::contains("nothing configured"))
            .stdout(predicate::str::contains("already warm").not());
    }

    #[test]
    fn timed_warm_ends_with_stop_line() {
        let home = TempDir::new().unwrap();
        revscout(&home)
            .args(["warm", "--duration", "1"])
            .timeout(Duration::from_secs(60))
            .assert()
            .success()
            .stdout(predicate::str::contains("[OK] Warmer stopped"));
    }

    #[test]
    fn stale_missing_path_fails() {
        let home = TempDir::new().unwrap();
        revscout(&home)
            .args(["stale", "/definitely/not/here"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Path not found"));
    }
}
