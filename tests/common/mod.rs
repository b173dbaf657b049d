//! Shared testing harness for k6-runner integration tests.
#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SINGLE_SCENARIO: &str = include_str!("../fixtures/k6_single_scenario.txt");
pub const MULTIPLE_SCENARIOS: &str = include_str!("../fixtures/k6_multiple_scenarios.txt");
pub const THRESHOLD_FAILURE: &str = include_str!("../fixtures/k6_threshold_failure.txt");
pub const INVALID_FLAG: &str = include_str!("../fixtures/k6_invalid_flag.txt");

/// Isolated data directory plus a scripted stand-in for the `k6` binary.
pub struct TestContext {
    root: TempDir,
    data_dir: PathBuf,
    bin_dir: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let data_dir = root.path().join("data");
        let bin_dir = root.path().join("bin");
        fs::create_dir_all(&data_dir).expect("Failed to create data directory");
        fs::create_dir_all(&bin_dir).expect("Failed to create bin directory");
        Self { root, data_dir, bin_dir }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Install a fake k6 that records its argv, cwd and `TARGET_HOSTNAME`,
    /// prints `output` and exits with `exit_code`. Returns its path.
    pub fn install_fake_k6(&self, output: &str, exit_code: i32) -> PathBuf {
        let fixture = self.bin_dir.join("k6-output.txt");
        fs::write(&fixture, output).expect("Failed to write fake k6 output");

        let script = self.bin_dir.join("k6");
        let body = format!(
            "#!/bin/sh\n\
             printf '%s\\n' \"$@\" > '{bin}/argv.txt'\n\
             pwd > '{bin}/cwd.txt'\n\
             printf '%s' \"$TARGET_HOSTNAME\" > '{bin}/target_hostname.txt'\n\
             cat '{fixture}'\n\
             exit {code}\n",
            bin = self.bin_dir.display(),
            fixture = fixture.display(),
            code = exit_code,
        );
        fs::write(&script, body).expect("Failed to write fake k6");
        let mut perms = fs::metadata(&script).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&script, perms).expect("Failed to chmod fake k6");
        script
    }

    /// Arguments the fake k6 was last invoked with.
    pub fn recorded_args(&self) -> Vec<String> {
        fs::read_to_string(self.bin_dir.join("argv.txt"))
            .expect("fake k6 was not invoked")
            .lines()
            .map(String::from)
            .collect()
    }

    pub fn recorded_cwd(&self) -> PathBuf {
        PathBuf::from(fs::read_to_string(self.bin_dir.join("cwd.txt")).unwrap().trim())
    }

    pub fn recorded_target_hostname(&self) -> String {
        fs::read_to_string(self.bin_dir.join("target_hostname.txt")).unwrap()
    }

    pub fn was_invoked(&self) -> bool {
        self.bin_dir.join("argv.txt").exists()
    }

    /// Write a request JSON file and return its path.
    pub fn write_request(&self, json: &serde_json::Value) -> PathBuf {
        let path = self.root().join("request.json");
        fs::write(&path, serde_json::to_string(json).unwrap()).unwrap();
        path
    }

    /// Build a command for invoking the compiled `k6-runner` binary.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("k6-runner").expect("Failed to locate k6-runner binary");
        cmd.current_dir(self.root()).env_remove("RUNNER_DATADIR").env_remove("RUNNER_K6_BINARY");
        cmd
    }

    /// Create a git repository with one commit on `main` holding `files`.
    pub fn init_script_repository(&self, files: &[(&str, &str)]) -> PathBuf {
        let repo = self.root().join("scripts-repo");
        fs::create_dir_all(&repo).unwrap();
        git(&repo, &["init", "--initial-branch=main"]);
        git(&repo, &["config", "user.name", "Test User"]);
        git(&repo, &["config", "user.email", "test@example.com"]);
        for (path, content) in files {
            let file = repo.join(path);
            fs::create_dir_all(file.parent().unwrap()).unwrap();
            fs::write(file, content).unwrap();
        }
        git(&repo, &["add", "."]);
        git(&repo, &["commit", "-m", "add k6 scripts"]);
        repo
    }
}

pub fn git(repo_dir: &Path, args: &[&str]) {
    let output = std::process::Command::new("git")
        .args(args)
        .current_dir(repo_dir)
        .output()
        .expect("git command failed to start");
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
}
