use clap::Parser;

/// Flags only. Every provisioning parameter comes from the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "metal-provision")]
#[command(about = "Provision one Equinix Metal device from environment variables")]
pub struct ProvisionArgs {
    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON on stderr")]
    pub json_logs: bool,

    /// Print the request that would be sent and exit without calling the API
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "metal-inventory")]
#[command(about = "Dump Equinix Metal projects and the devices of PROJECT_ID as JSON")]
pub struct InventoryArgs {
    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON on stderr")]
    pub json_logs: bool,
}
