use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /projects/{id}/devices`. The project id travels in the path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningRequest {
    #[serde(skip)]
    pub project_id: String,
    pub hostname: String,
    pub plan: String,
    pub metro: String,
    pub operating_system: String,
}

/// The single line a successful provisioning run prints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningResult {
    #[serde(rename = "deviceid")]
    pub device_id: String,
}

/// Only the `id` of a create response is decoded; everything else is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedDevice {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    #[serde(default)]
    pub short_id: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub plan: Option<PlanRef>,
    #[serde(default)]
    pub metro: Option<MetroRef>,
    #[serde(default)]
    pub operating_system: Option<OperatingSystemRef>,
    #[serde(default)]
    pub ip_addresses: Vec<IpAddress>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRef {
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetroRef {
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingSystemRef {
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpAddress {
    pub address: String,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub address_family: Option<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryReport {
    pub projects: Vec<Project>,
    pub devices: Vec<Device>,
}
