//! ERP connection configuration.
//!
//! Built once at application start and passed down explicitly; nothing in
//! this workspace holds a global client.

use std::env;

use crate::error::ErpError;

/// Connection parameters for the iDempiere REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErpConfig {
    /// Base URL without a trailing slash, e.g. `https://erp.school.edu`.
    pub base_url: String,
    /// Login scope: client (tenant), role, organization, warehouse.
    pub client_id: i32,
    pub role_id: i32,
    pub organization_id: i32,
    pub warehouse_id: i32,
    pub language: String,
}

impl ErpConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client_id: 0,
            role_id: 0,
            organization_id: 0,
            warehouse_id: 0,
            language: "en_US".to_string(),
        }
    }

    /// Read the configuration from `ERP_*` environment variables.
    ///
    /// `ERP_BASE_URL` is required; scope ids default to 0 (iDempiere's
    /// "System"/"*" records) and `ERP_LANGUAGE` defaults to `en_US`.
    pub fn from_env() -> Result<Self, ErpError> {
        let base_url = env::var("ERP_BASE_URL")
            .map_err(|_| ErpError::Config("ERP_BASE_URL is not set".to_string()))?;

        let mut config = Self::new(base_url);
        config.client_id = env_i32("ERP_CLIENT_ID")?.unwrap_or(0);
        config.role_id = env_i32("ERP_ROLE_ID")?.unwrap_or(0);
        config.organization_id = env_i32("ERP_ORGANIZATION_ID")?.unwrap_or(0);
        config.warehouse_id = env_i32("ERP_WAREHOUSE_ID")?.unwrap_or(0);
        if let Ok(lang) = env::var("ERP_LANGUAGE") {
            config.language = lang;
        }
        Ok(config)
    }

    pub(crate) fn api(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn env_i32(name: &'static str) -> Result<Option<i32>, ErpError> {
    match env::var(name) {
        Err(_) => Ok(None),
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| ErpError::Config(format!("{name} must be an integer: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_stripped() {
        let config = ErpConfig::new("https://erp.school.edu//");
        assert_eq!(config.base_url, "https://erp.school.edu");
        assert_eq!(
            config.api("models/c_bpartner"),
            "https://erp.school.edu/api/v1/models/c_bpartner"
        );
    }

    #[test]
    fn api_path_tolerates_leading_slash() {
        let config = ErpConfig::new("http://localhost:8080");
        assert_eq!(
            config.api("/auth/tokens"),
            "http://localhost:8080/api/v1/auth/tokens"
        );
    }
}
