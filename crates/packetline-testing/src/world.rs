//! TestWorld pattern for CLI integration tests.
//!
//! Provides an isolated temp directory holding packet logs and a config file,
//! and runs the `packetline` binary against it.

use anyhow::Result;
use assert_cmd::Command;
use packetline_types::Packet;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::fixtures::{LogFormat, write_log_values, write_packet_log};

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use packetline_testing::TestWorld;
/// use packetline_testing::fixtures::LogFormat;
/// use packetline_testing::packets;
///
/// let world = TestWorld::new()
///     .with_log("session", &packets::scenario_packets(), LogFormat::JsonLines)
///     .unwrap();
///
/// let result = world.run(&["replay", "session.jsonl"]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    config_path: PathBuf,
    env_vars: HashMap<String, String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");

        Self {
            temp_dir,
            config_path,
            env_vars: HashMap::new(),
        }
    }

    /// Get the temp directory root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the config file path passed to every command.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Write a packet log under the temp root.
    pub fn with_log(self, stem: &str, packets: &[Packet], format: LogFormat) -> Result<Self> {
        write_packet_log(self.root(), stem, packets, format)?;
        Ok(self)
    }

    /// Write raw packet values (any envelope shape) under the temp root.
    pub fn with_raw_log(self, stem: &str, values: &[Value], format: LogFormat) -> Result<Self> {
        write_log_values(self.root(), stem, values, format)?;
        Ok(self)
    }

    /// Write a file verbatim under the temp root.
    pub fn with_file(self, relative: &str, contents: &str) -> Result<Self> {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(self)
    }

    /// Write the config file used by every command.
    pub fn with_config(self, toml: &str) -> Result<Self> {
        std::fs::write(&self.config_path, toml)?;
        Ok(self)
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Configure a CLI command with this test environment's settings.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--config").arg(&self.config_path);
        cmd.current_dir(self.root());
        cmd.env_remove("RUST_LOG");

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Execute the `packetline` binary with `args` and capture its output.
    ///
    /// # Note
    /// Uses `Command::cargo_bin()`, which requires the binary to be built
    /// (cargo test does this for the CLI crate's integration tests).
    #[allow(deprecated)]
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("packetline")
            .map_err(|e| anyhow::anyhow!("Failed to find packetline binary: {}", e))?;

        self.configure_command(&mut cmd);
        cmd.args(args);

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    /// Check if the command succeeded.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    /// Parse stdout as JSON lines.
    pub fn json_lines(&self) -> Result<Vec<Value>> {
        self.stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| Ok(serde_json::from_str(line)?))
            .collect()
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}
