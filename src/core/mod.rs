pub mod inventory;
pub mod provisioner;

pub use crate::domain::model::{
    CreatedDevice, Device, InventoryReport, Project, ProvisioningRequest, ProvisioningResult,
};
pub use crate::domain::ports::MetalApi;
pub use crate::utils::error::Result;
