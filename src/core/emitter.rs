//! JSON rendering of the payload onto standard output.

use std::{fmt, io};

use serde::Serialize;
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::core::payload::Payload;

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write payload: {0}")]
    Write(#[from] io::Error),
}

/// JSON layout of the rendered payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Single line.
    #[default]
    Compact,
    /// Two-space indentation.
    Pretty,
}

impl OutputFormat {
    /// `debug = true` in the instance settings selects indented output.
    pub fn from_debug(debug: bool) -> Self {
        if debug {
            OutputFormat::Pretty
        } else {
            OutputFormat::Compact
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Compact => write!(f, "compact"),
            OutputFormat::Pretty => write!(f, "pretty"),
        }
    }
}

/// Serializes payloads and writes them, newline-terminated, to a sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct Emitter {
    format: OutputFormat,
}

impl Emitter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn render<T: Serialize>(&self, value: &T) -> Result<String, EmitError> {
        let rendered = match self.format {
            OutputFormat::Compact => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        Ok(rendered)
    }

    /// Renders the payload first, so nothing is written if serialization fails.
    pub async fn emit<W>(&self, payload: &Payload, writer: &mut W) -> Result<(), EmitError>
    where
        W: AsyncWrite + Unpin,
    {
        let mut rendered = self.render(payload)?;
        rendered.push('\n');

        writer.write_all(rendered.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }

    pub async fn emit_stdout(&self, payload: &Payload) -> Result<(), EmitError> {
        let mut stdout = tokio::io::stdout();
        self.emit(payload, &mut stdout).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::ser::{Error as _, Serializer};

    use super::*;
    use crate::{
        config::instance::InstanceConfig,
        core::payload::{Metric, Payload},
    };

    fn payload() -> Payload {
        let cfg = InstanceConfig {
            entity_name: "resolver-1".into(),
            display_name: "resolver".into(),
            metadata: crate::config::instance::Metadata::Table(BTreeMap::from([(
                "env".to_string(),
                "prod".to_string(),
            )])),
            ..Default::default()
        };
        let mut payload = Payload::for_instance(&cfg);
        payload.extend_metrics([
            Metric::cumulative_count("total.num.queries", 42.0),
            Metric::cumulative_count("total.recursion.time.avg", 0.25),
        ]);
        payload
    }

    fn strip_whitespace(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn debug_flag_selects_pretty() {
        assert_eq!(OutputFormat::from_debug(true), OutputFormat::Pretty);
        assert_eq!(OutputFormat::from_debug(false), OutputFormat::Compact);
    }

    #[test]
    fn compact_output_is_a_single_line() {
        let json = Emitter::new(OutputFormat::Compact).render(&payload()).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.starts_with("{\"protocol_version\":\"4\""));
    }

    #[test]
    fn pretty_output_uses_two_space_indent() {
        let json = Emitter::new(OutputFormat::Pretty).render(&payload()).unwrap();
        assert!(json.contains("\n  \"protocol_version\": \"4\""));
    }

    #[test]
    fn pretty_and_compact_differ_only_in_whitespace() {
        let payload = payload();
        let compact = Emitter::new(OutputFormat::Compact).render(&payload).unwrap();
        let pretty = Emitter::new(OutputFormat::Pretty).render(&payload).unwrap();

        assert_ne!(compact, pretty);
        assert_eq!(strip_whitespace(&pretty), compact);

        let a: serde_json::Value = serde_json::from_str(&compact).unwrap();
        let b: serde_json::Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn emit_writes_newline_terminated_json() {
        let mut sink: Vec<u8> = Vec::new();
        Emitter::default().emit(&payload(), &mut sink).await.unwrap();

        let text = String::from_utf8(sink).unwrap();
        assert!(text.ends_with("}\n"));
        assert_eq!(text.lines().count(), 1);
        let parsed: Payload = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(parsed, payload());
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("refusing to serialize"))
        }
    }

    #[test]
    fn serialization_failure_is_surfaced() {
        let err = Emitter::default().render(&Unserializable).unwrap_err();
        assert!(matches!(err, EmitError::Serialization(_)));
        assert!(err.to_string().contains("refusing to serialize"));
    }
}
