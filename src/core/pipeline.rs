//! One collection pass: build the payload, run the producer, parse its output.
//!
//! Collection failures never abort the pass. They are logged and reported in
//! the returned [`Collection`] while the payload keeps whatever metrics could
//! be parsed.

use tracing::{debug, error, info, warn};

use super::{
    collectors::{
        error::CollectorError,
        parser::parse_stats,
        traits::DataProducer,
        unbound::{ControlOutput, UnboundControl},
    },
    payload::Payload,
};
use crate::config::instance::InstanceConfig;

/// Outcome of a pass.
#[derive(Debug)]
pub struct Collection {
    pub payload: Payload,
    /// Lines of producer output that could not be turned into metrics.
    pub skipped_lines: usize,
    /// Set when the command failed to run, timed out, or exited unsuccessfully.
    pub command_error: Option<CollectorError>,
}

impl Collection {
    pub fn is_complete(&self) -> bool {
        self.command_error.is_none() && self.skipped_lines == 0
    }
}

pub struct Pipeline<P> {
    settings: InstanceConfig,
    producer: P,
    label: String,
}

impl Pipeline<UnboundControl> {
    /// Pipeline that runs the real (or `-mock`) `unbound-control` binary.
    pub fn unbound(settings: InstanceConfig) -> Self {
        let producer = UnboundControl::from_config(&settings);
        let label = producer.command().to_string();
        Self {
            settings,
            producer,
            label,
        }
    }
}

impl<P> Pipeline<P>
where
    P: DataProducer<Output = ControlOutput>,
{
    /// `label` names the producer in log messages and errors.
    pub fn new(settings: InstanceConfig, producer: P, label: impl Into<String>) -> Self {
        Self {
            settings,
            producer,
            label: label.into(),
        }
    }

    pub async fn run(&self) -> Collection {
        let mut payload = Payload::for_instance(&self.settings);
        debug!(
            "Collecting for entity '{}' ({})",
            self.settings.entity_name, self.settings.entity_type
        );

        let output = match self.producer.produce().await {
            Ok(output) => output,
            Err(e) => {
                error!("Collection failed, emitting payload without metrics: {}", e);
                return Collection {
                    payload,
                    skipped_lines: 0,
                    command_error: Some(e),
                };
            }
        };

        let command_error = output.failure(&self.label);
        if let Some(e) = &command_error {
            error!("{}; parsing whatever was printed", e);
        }

        let parsed = parse_stats(&output.stdout);
        if parsed.skipped > 0 {
            warn!("Skipped {} malformed line(s) of output", parsed.skipped);
        }
        info!("Collected {} metric(s)", parsed.metrics.len());
        payload.extend_metrics(parsed.metrics);

        Collection {
            payload,
            skipped_lines: parsed.skipped,
            command_error,
        }
    }
}
