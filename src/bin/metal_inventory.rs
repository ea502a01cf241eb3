use clap::Parser;
use metal_provision::core::inventory::write_report;
use metal_provision::utils::error::report_and_exit;
use metal_provision::utils::{logger, validation::Validate};
use metal_provision::{Inventory, InventoryArgs, InventoryConfig, MetalClient};

#[tokio::main]
async fn main() {
    let args = InventoryArgs::parse();

    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting metal-inventory");

    let config = match InventoryConfig::from_env().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => report_and_exit(e),
    };

    let client = match MetalClient::new(&config.api) {
        Ok(client) => client,
        Err(e) => report_and_exit(e),
    };
    let inventory = Inventory::new(client);

    let report = match inventory.collect(&config.project_id).await {
        Ok(report) => report,
        Err(e) => report_and_exit(e),
    };

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = write_report(&mut stdout, &report) {
        report_and_exit(e);
    }

    tracing::info!(
        "✅ Dumped {} projects and {} devices",
        report.projects.len(),
        report.devices.len()
    );
}
