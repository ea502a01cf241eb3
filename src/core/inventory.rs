use crate::core::{InventoryReport, MetalApi};
use crate::utils::error::Result;
use std::io::Write;

pub struct Inventory<A: MetalApi> {
    api: A,
}

impl<A: MetalApi> Inventory<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Lists every project, then fetches each device of `project_id` in full.
    pub async fn collect(&self, project_id: &str) -> Result<InventoryReport> {
        let projects = self.api.list_projects().await?;
        tracing::info!("Found {} projects", projects.len());

        let listed = self.api.list_devices(project_id).await?;
        tracing::info!("Found {} devices in project {}", listed.len(), project_id);

        let mut devices = Vec::with_capacity(listed.len());
        for device in &listed {
            tracing::debug!("Fetching device {}", device.id);
            devices.push(self.api.get_device(&device.id).await?);
        }

        Ok(InventoryReport { projects, devices })
    }
}

pub fn write_report<W: Write>(out: &mut W, report: &InventoryReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CreatedDevice, Device, Project, ProvisioningRequest};
    use crate::utils::error::ProvisionError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn device(id: &str, state: &str) -> Device {
        Device {
            id: id.to_string(),
            short_id: None,
            hostname: Some(format!("host-{}", id)),
            state: Some(state.to_string()),
            created_at: None,
            updated_at: None,
            plan: None,
            metro: None,
            operating_system: None,
            ip_addresses: Vec::new(),
        }
    }

    struct StaticApi {
        fetched: Mutex<Vec<String>>,
        missing: Option<&'static str>,
    }

    #[async_trait]
    impl MetalApi for StaticApi {
        async fn create_device(&self, _request: &ProvisioningRequest) -> Result<CreatedDevice> {
            unreachable!("inventory never creates devices")
        }

        async fn list_projects(&self) -> Result<Vec<Project>> {
            Ok(vec![Project {
                id: "p1".to_string(),
                name: Some("ci".to_string()),
                created_at: None,
                updated_at: None,
            }])
        }

        async fn list_devices(&self, project_id: &str) -> Result<Vec<Device>> {
            assert_eq!(project_id, "p1");
            Ok(vec![device("d1", "queued"), device("d2", "queued")])
        }

        async fn get_device(&self, device_id: &str) -> Result<Device> {
            self.fetched.lock().unwrap().push(device_id.to_string());
            if self.missing == Some(device_id) {
                return Err(ProvisionError::ApiStatusError {
                    status: 404,
                    message: "Not found".to_string(),
                });
            }
            Ok(device(device_id, "active"))
        }
    }

    #[test]
    fn test_collect_refetches_each_device() {
        let inventory = Inventory::new(StaticApi {
            fetched: Mutex::new(Vec::new()),
            missing: None,
        });

        let report = tokio_test::block_on(inventory.collect("p1")).unwrap();

        assert_eq!(report.projects.len(), 1);
        assert_eq!(report.devices.len(), 2);
        assert!(report
            .devices
            .iter()
            .all(|d| d.state.as_deref() == Some("active")));
        assert_eq!(*inventory.api.fetched.lock().unwrap(), vec!["d1", "d2"]);
    }

    #[test]
    fn test_collect_stops_on_first_failure() {
        let inventory = Inventory::new(StaticApi {
            fetched: Mutex::new(Vec::new()),
            missing: Some("d1"),
        });

        let err = tokio_test::block_on(inventory.collect("p1")).unwrap_err();

        assert!(matches!(err, ProvisionError::ApiStatusError { status: 404, .. }));
        assert_eq!(*inventory.api.fetched.lock().unwrap(), vec!["d1"]);
    }

    #[test]
    fn test_write_report_is_json() {
        let report = InventoryReport {
            projects: Vec::new(),
            devices: vec![device("d1", "active")],
        };
        let mut out = Vec::new();
        write_report(&mut out, &report).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["devices"][0]["id"], "d1");
        assert_eq!(value["projects"], serde_json::json!([]));
    }
}
