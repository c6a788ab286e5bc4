//! Labeler entry point

use clap::Parser;
use shared::logging;

use labeler::{build_store, core::ReviewService, Args, Labeler, LabelerConfig, LabelerResult};

#[tokio::main]
async fn main() -> LabelerResult<()> {
    let args = Args::parse();
    logging::init_tracing_with_level(Some(&args.log_level));

    let config = LabelerConfig::from_args(args).map_err(|e| {
        logging::log_error("Configuration", &e);
        e
    })?;
    logging::log_startup(&format!("labeler on {} ({:?})", config.bind_address, config.store));

    let store = build_store(&config.store)?;
    let service = ReviewService::new(store, config.roster.clone(), Some(config.data_dir.clone()));
    let labeler = Labeler::new(service, config.session_idle);

    labeler.run(config.bind_address).await?;

    logging::log_success("Labeler stopped gracefully");
    Ok(())
}
