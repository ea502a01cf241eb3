use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    ApiStatusError { status: u16, message: String },

    #[error("Unexpected API response: {message}")]
    ResponseError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// The two failure kinds a run can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A required input is absent or unusable. Raised before any network call.
    Configuration,
    /// The remote call failed or its result could not be reported.
    Provisioning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ProvisionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ProvisionError::MissingConfigError { .. }
            | ProvisionError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            _ => ErrorCategory::Provisioning,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ProvisionError::ApiError(e) if e.is_connect() || e.is_timeout() => {
                ErrorSeverity::Medium
            }
            ProvisionError::IoError(_) | ProvisionError::SerializationError(_) => {
                ErrorSeverity::Critical
            }
            _ => ErrorSeverity::High,
        }
    }

    /// Process exit status for this error. Always nonzero.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ProvisionError::ApiStatusError {
                status: 401 | 403,
                ..
            }
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ProvisionError::MissingConfigError { field } => {
                format!("Environment variable {} is not set", field)
            }
            ProvisionError::InvalidConfigValueError { field, reason, .. } => {
                format!("{} is invalid: {}", field, reason)
            }
            ProvisionError::ApiStatusError { .. } if self.is_auth_failure() => {
                "Equinix Metal rejected the auth token".to_string()
            }
            ProvisionError::ApiStatusError { status, message } => {
                format!("Equinix Metal API error ({}): {}", status, message)
            }
            ProvisionError::ApiError(_) => "Could not reach the Equinix Metal API".to_string(),
            ProvisionError::ResponseError { message } => {
                format!("Unexpected response from Equinix Metal: {}", message)
            }
            ProvisionError::IoError(e) => format!("Could not write output: {}", e),
            ProvisionError::SerializationError(e) => format!("Could not encode output: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ProvisionError::MissingConfigError { .. } => {
                "Export the variable before running, e.g. EQUINIX_METAL_TOKEN and PROJECT_ID"
            }
            ProvisionError::InvalidConfigValueError { .. } => {
                "Fix or unset the offending environment variable"
            }
            ProvisionError::ApiStatusError { .. } if self.is_auth_failure() => {
                "Check that EQUINIX_METAL_TOKEN is valid and has access to the project"
            }
            ProvisionError::ApiStatusError { .. } => {
                "Check the plan, metro and OS slugs and the project's capacity and quota"
            }
            ProvisionError::ApiError(_) => "Check network connectivity and EQUINIX_METAL_API_URL",
            ProvisionError::ResponseError { .. } => "Check EQUINIX_METAL_API_URL points at the Metal API",
            ProvisionError::IoError(_) | ProvisionError::SerializationError(_) => {
                "Make sure stdout is writable"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;

/// Logs `err`, prints it for the operator on stderr and exits nonzero.
pub fn report_and_exit(err: ProvisionError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        err,
        err.category(),
        err.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", err.recovery_suggestion());

    eprintln!("❌ {}", err.user_friendly_message());
    eprintln!("💡 {}", err.recovery_suggestion());

    std::process::exit(err.exit_code());
}
