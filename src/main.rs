use clap::Parser;
use metal_provision::core::provisioner::{build_request, write_dry_run, write_result};
use metal_provision::utils::error::report_and_exit;
use metal_provision::utils::{logger, validation::Validate};
use metal_provision::{MetalClient, ProvisionArgs, ProvisionConfig, Provisioner};

#[tokio::main]
async fn main() {
    let args = ProvisionArgs::parse();

    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting metal-provision");

    // Configuration errors surface here, before any network call.
    let config = match ProvisionConfig::from_env().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => report_and_exit(e),
    };
    tracing::debug!("Provision config: {:?}", config);

    let mut stdout = std::io::stdout().lock();

    if args.dry_run {
        tracing::info!("Dry run: no device will be created");
        if let Err(e) = write_dry_run(&mut stdout, &build_request(&config)) {
            report_and_exit(e);
        }
        return;
    }

    let client = match MetalClient::new(&config.api) {
        Ok(client) => client,
        Err(e) => report_and_exit(e),
    };
    let provisioner = Provisioner::new(client);

    match provisioner.provision(&config).await {
        Ok(result) => {
            if let Err(e) = write_result(&mut stdout, &result) {
                report_and_exit(e);
            }
            tracing::info!("✅ Device {} requested", result.device_id);
        }
        Err(e) => report_and_exit(e),
    }
}
