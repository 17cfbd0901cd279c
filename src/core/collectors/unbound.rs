//! `unbound-control stats` invocation.
//!
//! The command line is derived from [`InstanceConfig`] at call time:
//!
//! ```text
//! {control_path}unbound-control[-mock] stats[_noreset] [-c <cfgfile>] [-s <server>]
//! ```
//!
//! Option values are joined with single spaces and split back on whitespace
//! when the process is spawned, so values containing whitespace are not
//! supported.

use std::{fmt, process::Stdio, time::Duration};

use tracing::{debug, trace};

use super::{error::CollectorError, traits::DataProducer, types::CollectorResult};
use crate::config::instance::InstanceConfig;

/// Base name of the Unbound remote control binary.
pub const CONTROL_BINARY: &str = "unbound-control";

/// Appended to [`CONTROL_BINARY`] when `mock = true`.
pub const MOCK_SUFFIX: &str = "-mock";

/// A fully resolved `unbound-control` command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlCommand {
    program: String,
    argument_line: String,
    timeout: Duration,
}

impl ControlCommand {
    pub fn from_config(cfg: &InstanceConfig) -> Self {
        let mut binary = String::from(CONTROL_BINARY);
        if cfg.mock {
            binary.push_str(MOCK_SUFFIX);
        }
        let program = format!("{}{}", cfg.control_path, binary);

        let mut argument_line = String::from(if cfg.resets_counters() {
            "stats"
        } else {
            "stats_noreset"
        });
        if !cfg.cfgfile.trim().is_empty() {
            argument_line.push_str(" -c ");
            argument_line.push_str(&cfg.cfgfile);
        }
        if !cfg.server.trim().is_empty() {
            argument_line.push_str(" -s ");
            argument_line.push_str(&cfg.server);
        }

        Self {
            program,
            argument_line,
            timeout: Duration::from_secs(cfg.timeout_secs),
        }
    }

    /// Overrides the deadline derived from `timeout_secs`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Space-joined argument string, e.g. `stats -c /etc/unbound.conf`.
    pub fn argument_line(&self) -> &str {
        &self.argument_line
    }

    /// Arguments as passed to the process.
    pub fn args(&self) -> impl Iterator<Item = &str> {
        self.argument_line.split_whitespace()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.program, self.argument_line)
    }
}

/// Captured result of a finished `unbound-control` run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlOutput {
    /// Standard output, decoded lossily as UTF-8.
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl ControlOutput {
    /// Output of a successful run that printed `stdout`.
    pub fn success_with(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(0),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Describes an unsuccessful exit as a `CollectorError`, `None` on success.
    pub fn failure(&self, command: &str) -> Option<CollectorError> {
        if self.success() {
            return None;
        }
        let status = match self.exit_code {
            Some(code) => format!("exit code {}", code),
            None => "termination by signal".to_string(),
        };
        Some(CollectorError::CommandFailed {
            command: command.to_string(),
            status,
            stderr: self.stderr.trim().to_string(),
        })
    }
}

/// Collector that runs `unbound-control` and captures its output.
#[derive(Debug, Clone)]
pub struct UnboundControl {
    command: ControlCommand,
}

impl UnboundControl {
    pub fn new(command: ControlCommand) -> Self {
        Self { command }
    }

    pub fn from_config(cfg: &InstanceConfig) -> Self {
        Self::new(ControlCommand::from_config(cfg))
    }

    pub fn command(&self) -> &ControlCommand {
        &self.command
    }
}

/// Spawns the command, waits for it up to the deadline and captures both streams.
///
/// On timeout the pending wait is dropped, which kills the child
/// (`kill_on_drop`), and whatever it printed so far is discarded.
#[async_trait::async_trait]
impl DataProducer for UnboundControl {
    type Output = ControlOutput;

    async fn produce(&self) -> CollectorResult<Self::Output> {
        use tokio::process::Command;

        let command = self.command.to_string();
        debug!("Executing `{}` (timeout: {:?})", command, self.command.timeout());

        let child = Command::new(self.command.program())
            .args(self.command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CollectorError::CommandExecution {
                command: command.clone(),
                source,
            })?;

        let output = tokio::time::timeout(self.command.timeout(), child.wait_with_output())
            .await
            .map_err(|_| CollectorError::Timeout {
                command: command.clone(),
                timeout: self.command.timeout(),
            })?
            .map_err(|source| CollectorError::CommandExecution {
                command: command.clone(),
                source,
            })?;

        trace!(
            "`{}` finished with {:?}, {} bytes on stdout",
            command,
            output.status,
            output.stdout.len()
        );

        Ok(ControlOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }
}
