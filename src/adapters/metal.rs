use crate::config::{ApiConfig, ENV_API_URL, ENV_TOKEN};
use crate::domain::model::{CreatedDevice, Device, Project, ProvisioningRequest};
use crate::domain::ports::MetalApi;
use crate::utils::error::{ProvisionError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

const AUTH_HEADER: &str = "X-Auth-Token";
const USER_AGENT: &str = concat!("metal-provision/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageMeta {
    #[serde(default)]
    next: Option<serde_json::Value>,
}

trait Paged: DeserializeOwned {
    type Item;

    fn into_parts(self) -> (Vec<Self::Item>, Option<PageMeta>);
}

#[derive(Debug, Deserialize)]
struct ProjectPage {
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    meta: Option<PageMeta>,
}

impl Paged for ProjectPage {
    type Item = Project;

    fn into_parts(self) -> (Vec<Project>, Option<PageMeta>) {
        (self.projects, self.meta)
    }
}

#[derive(Debug, Deserialize)]
struct DevicePage {
    #[serde(default)]
    devices: Vec<Device>,
    #[serde(default)]
    meta: Option<PageMeta>,
}

impl Paged for DevicePage {
    type Item = Device;

    fn into_parts(self) -> (Vec<Device>, Option<PageMeta>) {
        (self.devices, self.meta)
    }
}

/// Pulls a readable message out of an error response body.
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        let mut messages = parsed.errors;
        messages.extend(parsed.error);
        if !messages.is_empty() {
            return messages.join("; ");
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

/// HTTP client for the Equinix Metal REST API.
#[derive(Debug, Clone)]
pub struct MetalClient {
    client: Client,
    base_url: Url,
}

impl MetalClient {
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let mut token = HeaderValue::from_str(&api.auth_token).map_err(|_| {
            ProvisionError::InvalidConfigValueError {
                field: ENV_TOKEN.to_string(),
                value: "<redacted>".to_string(),
                reason: "contains characters not allowed in an HTTP header".to_string(),
            }
        })?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTH_HEADER, token);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        let base_url = Url::parse(&api.base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ProvisionError::InvalidConfigValueError {
                field: ENV_API_URL.to_string(),
                value: api.base_url.clone(),
                reason: "not usable as a base URL".to_string(),
            })?;

        Ok(Self { client, base_url })
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProvisionError::ApiStatusError {
                status: status.as_u16(),
                message: error_message(&body, status),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ProvisionError::ResponseError {
            message: format!("could not decode response body: {}", e),
        })
    }

    async fn list_all<P: Paged>(&self, path: Url) -> Result<Vec<P::Item>> {
        let mut items = Vec::new();
        let mut page: u32 = 1;

        loop {
            tracing::debug!("Fetching {} page {}", path, page);
            let request = self.client.get(path.clone()).query(&[("page", page)]);
            let (batch, meta) = self.send::<P>(request).await?.into_parts();

            let has_next = meta
                .and_then(|m| m.next)
                .is_some_and(|next| !next.is_null());
            let exhausted = batch.is_empty();
            items.extend(batch);

            if !has_next || exhausted {
                break;
            }
            page += 1;
        }

        Ok(items)
    }
}

#[async_trait]
impl MetalApi for MetalClient {
    async fn create_device(&self, request: &ProvisioningRequest) -> Result<CreatedDevice> {
        let url = self.endpoint(&["projects", request.project_id.as_str(), "devices"]);
        tracing::debug!("POST {}", url);
        let builder = self.client.post(url).json(request);
        self.send(builder).await
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        self.list_all::<ProjectPage>(self.endpoint(&["projects"]))
            .await
    }

    async fn list_devices(&self, project_id: &str) -> Result<Vec<Device>> {
        self.list_all::<DevicePage>(self.endpoint(&["projects", project_id, "devices"]))
            .await
    }

    async fn get_device(&self, device_id: &str) -> Result<Device> {
        let builder = self.client.get(self.endpoint(&["devices", device_id]));
        self.send(builder).await
    }
}
