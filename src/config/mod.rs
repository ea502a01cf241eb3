#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_required_field, validate_url, Validate,
};
use std::env;

pub const ENV_TOKEN: &str = "EQUINIX_METAL_TOKEN";
pub const ENV_PROJECT_ID: &str = "PROJECT_ID";
pub const ENV_NAME_PREFIX: &str = "DEVICE_NAME_PREFIX";
pub const ENV_COUNT: &str = "DEVICE_COUNT";
pub const ENV_PLAN: &str = "EQUINIX_PLAN";
pub const ENV_METRO: &str = "EQUINIX_METRO";
pub const ENV_OS: &str = "DEVICE_OS";
pub const ENV_API_URL: &str = "EQUINIX_METAL_API_URL";

pub const DEFAULT_NAME_PREFIX: &str = "direktiv";
pub const DEFAULT_PLAN: &str = "c3.small.x86";
pub const DEFAULT_METRO: &str = "sv";
pub const DEFAULT_OS: &str = "ubuntu_20_04";
pub const DEFAULT_API_URL: &str = "https://api.equinix.com/metal/v1";

/// Reads `key` through `lookup`. Empty and whitespace-only values count as unset;
/// anything else is passed through verbatim.
fn lookup_var<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn require_var<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    validate_required_field(key, &lookup_var(lookup, key)).cloned()
}

/// Connection settings shared by both binaries.
#[derive(Clone)]
pub struct ApiConfig {
    pub auth_token: String,
    pub base_url: String,
}

impl ApiConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            auth_token: require_var(lookup, ENV_TOKEN)?,
            base_url: lookup_var(lookup, ENV_API_URL)
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }
}

// Hand-written so the token never reaches a log line.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("auth_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Validate for ApiConfig {
    fn validate(&self) -> Result<()> {
        validate_url(ENV_API_URL, &self.base_url)
    }
}

/// Everything a provisioning run needs, resolved from the environment.
#[derive(Debug, Clone)]
pub struct ProvisionConfig {
    pub api: ApiConfig,
    pub project_id: String,
    pub name_prefix: String,
    pub device_count: Option<String>,
    pub plan: String,
    pub metro: String,
    pub operating_system: String,
}

impl ProvisionConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            api: ApiConfig::from_lookup(&lookup)?,
            project_id: require_var(&lookup, ENV_PROJECT_ID)?,
            name_prefix: lookup_var(&lookup, ENV_NAME_PREFIX)
                .unwrap_or_else(|| DEFAULT_NAME_PREFIX.to_string()),
            device_count: lookup_var(&lookup, ENV_COUNT),
            plan: lookup_var(&lookup, ENV_PLAN).unwrap_or_else(|| DEFAULT_PLAN.to_string()),
            metro: lookup_var(&lookup, ENV_METRO).unwrap_or_else(|| DEFAULT_METRO.to_string()),
            operating_system: lookup_var(&lookup, ENV_OS)
                .unwrap_or_else(|| DEFAULT_OS.to_string()),
        })
    }

    /// `prefix-count`, or the bare prefix when no count is configured.
    pub fn hostname(&self) -> String {
        match &self.device_count {
            Some(count) => format!("{}-{}", self.name_prefix, count),
            None => self.name_prefix.clone(),
        }
    }
}

impl Validate for ProvisionConfig {
    fn validate(&self) -> Result<()> {
        self.api.validate()?;
        validate_non_empty_string(ENV_NAME_PREFIX, &self.name_prefix)?;

        tracing::debug!("Provisioning configuration validation passed");
        Ok(())
    }
}

/// Inputs of the inventory dump.
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    pub api: ApiConfig,
    pub project_id: String,
}

impl InventoryConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            api: ApiConfig::from_lookup(&lookup)?,
            project_id: require_var(&lookup, ENV_PROJECT_ID)?,
        })
    }
}

impl Validate for InventoryConfig {
    fn validate(&self) -> Result<()> {
        self.api.validate()
    }
}
