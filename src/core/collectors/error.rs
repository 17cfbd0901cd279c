use std::time::Duration;

use thiserror::Error;

/// Errors raised while running `unbound-control` or reading its output.
///
/// Every variant is recoverable from the pipeline's point of view: the
/// failure is logged and a best-effort payload is still emitted.
#[derive(Error, Debug)]
pub enum CollectorError {
    /// The control binary could not be started (missing, not executable, ...).
    #[error("Failed to execute command: {command}")]
    CommandExecution {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran but exited unsuccessfully.
    #[error("Command `{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// The command did not finish before the deadline and was killed.
    #[error("Command `{command}` timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    /// A metric value could not be converted to a finite floating point number.
    #[error("Failed to parse {metric} from {location}: {reason}")]
    ParseError {
        metric: String,
        location: String,
        reason: String,
    },

    /// A line did not have the `name=value` shape.
    #[error("Invalid format in {location}: {reason}")]
    InvalidFormat { location: String, reason: String },
}
