use crate::config::ProvisionConfig;
use crate::core::{MetalApi, ProvisioningRequest, ProvisioningResult};
use crate::utils::error::Result;
use std::io::Write;

/// Single-shot device creation. Not idempotent: every call creates a device.
pub struct Provisioner<A: MetalApi> {
    api: A,
}

impl<A: MetalApi> Provisioner<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub async fn provision(&self, config: &ProvisionConfig) -> Result<ProvisioningResult> {
        let request = build_request(config);
        tracing::info!(
            "Creating device {} (plan: {}, metro: {}, os: {}) in project {}",
            request.hostname,
            request.plan,
            request.metro,
            request.operating_system,
            request.project_id
        );

        let device = self.api.create_device(&request).await?;
        tracing::info!("Device {} created", device.id);

        Ok(ProvisioningResult {
            device_id: device.id,
        })
    }
}

pub fn build_request(config: &ProvisionConfig) -> ProvisioningRequest {
    ProvisioningRequest {
        project_id: config.project_id.clone(),
        hostname: config.hostname(),
        plan: config.plan.clone(),
        metro: config.metro.clone(),
        operating_system: config.operating_system.clone(),
    }
}

/// Writes the result as one line of JSON.
pub fn write_result<W: Write>(out: &mut W, result: &ProvisioningResult) -> Result<()> {
    serde_json::to_writer(&mut *out, result)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Writes the request a real run would send, for `--dry-run`.
pub fn write_dry_run<W: Write>(out: &mut W, request: &ProvisioningRequest) -> Result<()> {
    let body = serde_json::json!({
        "project_id": request.project_id,
        "request": request,
    });
    serde_json::to_writer_pretty(&mut *out, &body)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CreatedDevice, Device, Project};
    use crate::utils::error::ProvisionError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct RecordingApi {
        created: Mutex<Vec<ProvisioningRequest>>,
        fail_with: Option<u16>,
    }

    impl RecordingApi {
        fn new() -> Self {
            Self {
                created: Mutex::new(Vec::new()),
                fail_with: None,
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                created: Mutex::new(Vec::new()),
                fail_with: Some(status),
            }
        }
    }

    #[async_trait]
    impl MetalApi for RecordingApi {
        async fn create_device(&self, request: &ProvisioningRequest) -> Result<CreatedDevice> {
            let mut created = self.created.lock().unwrap();
            created.push(request.clone());

            if let Some(status) = self.fail_with {
                return Err(ProvisionError::ApiStatusError {
                    status,
                    message: "rejected".to_string(),
                });
            }

            Ok(CreatedDevice {
                id: format!("dev-{}", created.len()),
            })
        }

        async fn list_projects(&self) -> Result<Vec<Project>> {
            Ok(Vec::new())
        }

        async fn list_devices(&self, _project_id: &str) -> Result<Vec<Device>> {
            Ok(Vec::new())
        }

        async fn get_device(&self, device_id: &str) -> Result<Device> {
            Err(ProvisionError::ApiStatusError {
                status: 404,
                message: format!("{} not found", device_id),
            })
        }
    }

    fn config(pairs: &[(&str, &str)]) -> ProvisionConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ProvisionConfig::from_lookup(|key| env.get(key).cloned()).unwrap()
    }

    #[test]
    fn test_build_request_uses_defaults() {
        let config = config(&[
            ("EQUINIX_METAL_TOKEN", "tok"),
            ("PROJECT_ID", "p1"),
            ("DEVICE_COUNT", "3"),
        ]);
        let request = build_request(&config);

        assert_eq!(request.project_id, "p1");
        assert_eq!(request.hostname, "direktiv-3");
        assert_eq!(request.plan, "c3.small.x86");
        assert_eq!(request.metro, "sv");
        assert_eq!(request.operating_system, "ubuntu_20_04");
    }

    #[tokio::test]
    async fn test_provision_returns_device_id() {
        let config = config(&[
            ("EQUINIX_METAL_TOKEN", "tok"),
            ("PROJECT_ID", "p1"),
            ("DEVICE_COUNT", "1"),
        ]);
        let provisioner = Provisioner::new(RecordingApi::new());

        let result = provisioner.provision(&config).await.unwrap();
        assert_eq!(result.device_id, "dev-1");

        let created = provisioner.api.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].hostname, "direktiv-1");
    }

    #[tokio::test]
    async fn test_provision_is_not_idempotent() {
        let config = config(&[("EQUINIX_METAL_TOKEN", "tok"), ("PROJECT_ID", "p1")]);
        let provisioner = Provisioner::new(RecordingApi::new());

        let first = provisioner.provision(&config).await.unwrap();
        let second = provisioner.provision(&config).await.unwrap();

        assert_ne!(first.device_id, second.device_id);
        assert_eq!(provisioner.api.created.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_provision_propagates_api_failure() {
        let config = config(&[("EQUINIX_METAL_TOKEN", "tok"), ("PROJECT_ID", "p1")]);
        let provisioner = Provisioner::new(RecordingApi::failing(422));

        let err = provisioner.provision(&config).await.unwrap_err();
        assert!(matches!(err, ProvisionError::ApiStatusError { status: 422, .. }));
        // one attempt, no retry
        assert_eq!(provisioner.api.created.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_write_result_is_single_json_line() {
        let mut out = Vec::new();
        write_result(
            &mut out,
            &ProvisioningResult {
                device_id: "abc123".to_string(),
            },
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\"deviceid\":\"abc123\"}\n");
    }

    #[test]
    fn test_write_dry_run_includes_project() {
        let config = config(&[("EQUINIX_METAL_TOKEN", "tok"), ("PROJECT_ID", "p1")]);
        let mut out = Vec::new();
        write_dry_run(&mut out, &build_request(&config)).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["project_id"], "p1");
        assert_eq!(value["request"]["hostname"], "direktiv");
        assert_eq!(value["request"]["plan"], "c3.small.x86");
    }
}
