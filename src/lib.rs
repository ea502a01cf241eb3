pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{InventoryArgs, ProvisionArgs};

pub use adapters::metal::MetalClient;
pub use config::{ApiConfig, InventoryConfig, ProvisionConfig};
pub use core::{inventory::Inventory, provisioner::Provisioner};
pub use utils::error::{ProvisionError, Result};
