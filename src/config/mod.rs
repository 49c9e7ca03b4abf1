//! Configuration loading and management

use crate::core::pluralize::Pluralizer;
use crate::core::query::{DEFAULT_PAGE_SIZE, SortSpec};
use anyhow::{Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "BIZLIST_API_URL";

fn default_timeout_secs() -> u64 {
    30
}

/// Connection settings for the REST backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every resource path is appended to (e.g., "https://api.example.com/api")
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// HTTP method used for updates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMethod {
    #[default]
    Patch,
    Put,
}

/// Per-resource settings
///
/// Every field except `name` is optional; defaults follow REST conventions
/// (`path` and list envelope are the plural of `name`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Singular resource name (e.g., "lead", "category")
    pub name: String,

    /// Path relative to the base URL (default: plural of `name`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Key the backend wraps list responses in, when not the plural
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envelope: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,

    /// Initial sort, as `field` or `field:asc|desc`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sort: Option<String>,

    /// Fields searched by free text (default: the resource's own list)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_fields: Option<Vec<String>>,

    #[serde(default)]
    pub update_method: UpdateMethod,
}

impl ResourceConfig {
    /// Configuration with every default applied
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            envelope: None,
            page_size: None,
            default_sort: None,
            search_fields: None,
            update_method: UpdateMethod::default(),
        }
    }

    pub fn plural(&self) -> String {
        Pluralizer::pluralize(&self.name)
    }

    pub fn path(&self) -> String {
        self.path.clone().unwrap_or_else(|| self.plural())
    }

    pub fn page_size(&self) -> usize {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }

    pub fn default_sort(&self) -> Result<Option<SortSpec>> {
        self.default_sort
            .as_deref()
            .map(|s| {
                s.parse::<SortSpec>()
                    .map_err(|e| anyhow!("resource '{}': {}", self.name, e))
            })
            .transpose()
    }
}

/// Complete client configuration
///
/// # Example
/// ```yaml
/// api:
///   base_url: https://crm.example.com/api
///   timeout_secs: 15
/// resources:
///   - name: lead
///     envelope: leads
///     default_sort: created_at:desc
///   - name: transaction
///     page_size: 25
///     update_method: put
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api: ApiConfig,

    #[serde(default)]
    pub resources: Vec<ResourceConfig>,
}

impl ClientConfig {
    /// Configuration for a backend at `base_url` with all resource defaults
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.into(),
                timeout_secs: default_timeout_secs(),
            },
            resources: Vec::new(),
        }
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("failed to read config file '{path}': {e}"))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides (`BIZLIST_API_URL`)
    pub fn with_env_overrides(self) -> Self {
        let base_url = std::env::var(API_URL_ENV).ok();
        self.with_base_url_override(base_url)
    }

    /// Replace the base URL when an override is present and non-empty
    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            tracing::debug!(base_url = %url, "base URL overridden");
            self.api.base_url = url;
        }
        self
    }

    /// Settings for a resource, falling back to defaults when not configured
    pub fn resource(&self, name: &str) -> ResourceConfig {
        self.resources
            .iter()
            .find(|r| r.name == name)
            .cloned()
            .unwrap_or_else(|| ResourceConfig::named(name))
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            bail!("api.base_url must be an http(s) URL, got '{url}'");
        }

        let mut seen = HashSet::new();
        for resource in &self.resources {
            if resource.name.trim().is_empty() {
                bail!("resource name must not be empty");
            }
            if !seen.insert(resource.name.as_str()) {
                bail!("resource '{}' configured twice", resource.name);
            }
            if resource.page_size == Some(0) {
                bail!("resource '{}': page_size must be at least 1", resource.name);
            }
            resource.default_sort()?;
        }

        Ok(())
    }
}
