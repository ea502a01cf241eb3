use crate::domain::model::{CreatedDevice, Device, Project, ProvisioningRequest};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The slice of the Equinix Metal API these tools use.
#[async_trait]
pub trait MetalApi: Send + Sync {
    async fn create_device(&self, request: &ProvisioningRequest) -> Result<CreatedDevice>;
    async fn list_projects(&self) -> Result<Vec<Project>>;
    async fn list_devices(&self, project_id: &str) -> Result<Vec<Device>>;
    async fn get_device(&self, device_id: &str) -> Result<Device>;
}
