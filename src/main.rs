use std::process::ExitCode;

use nri_unbound::{
    config::Config,
    core::{
        emitter::{Emitter, OutputFormat},
        error::RunError,
        pipeline::Pipeline,
    },
    logger::LoggerManager,
    print_error,
};
use tracing::{debug, info, warn};

async fn run() -> Result<(), RunError> {
    let cfg = Config::new()?;

    LoggerManager::new(cfg.logger.clone())?.init()?;
    info!("Starting nri-unbound version {}...", env!("CARGO_PKG_VERSION"));
    debug!("{:#?}", cfg.instances);

    let emitter = Emitter::new(OutputFormat::from_debug(cfg.instances.debug));
    let pipeline = Pipeline::unbound(cfg.instances);

    let collection = pipeline.run().await;
    if !collection.is_complete() {
        warn!("Emitting best-effort payload");
    }

    emitter.emit_stdout(&collection.payload).await?;
    debug!("Payload written ({} format)", emitter.format());

    match collection.command_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error!("{}", e);
            ExitCode::from(&e)
        }
    }
}
