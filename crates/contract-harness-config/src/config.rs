// crates/contract-harness-config/src/config.rs
// ============================================================================
// Module: Contract Harness Configuration
// Description: Configuration loading and validation for contract resolution.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: contract-harness-core, log, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The `[discovery]` section names declarations to drop before the registry
//! is built and the package prefixes reports cover; the `[reports.*]`
//! sections drive [`crate::ReportPolicy`]. Validation runs before any
//! scanning: a configuration without packages aborts the whole run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use contract_harness_core::ContractInventory;
use contract_harness_core::SkipList;
use contract_harness_core::TypeName;
use log::debug;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "contracts.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "CONTRACTS_CONFIG";
/// Environment variable holding extra comma-separated skip classes.
pub const SKIP_CLASSES_ENV_VAR: &str = "CONTRACTS_SKIP_CLASSES";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of package prefixes.
pub(crate) const MAX_PACKAGES: usize = 256;
/// Maximum number of skipped declarations.
pub(crate) const MAX_SKIP_CLASSES: usize = 1024;
/// Maximum length of a package prefix or type name.
pub(crate) const MAX_NAME_LENGTH: usize = 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Contract harness configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractsConfig {
    /// Discovery configuration.
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    /// Report configuration.
    #[serde(default)]
    pub reports: ReportsConfig,
}

/// Discovery configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Declaring types dropped before the registry is built.
    #[serde(default)]
    pub skip_classes: Vec<String>,
    /// Package prefixes reports are scoped to.
    #[serde(default)]
    pub packages: Vec<String>,
}

/// Per-section report configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Capabilities without any suite.
    #[serde(default)]
    pub untested: ReportConfig,
    /// Capabilities whose suites never run.
    #[serde(default)]
    pub unimplemented: ReportConfig,
    /// Declaration and resolution errors.
    #[serde(default)]
    pub errors: ReportConfig,
}

/// Settings of one report section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Emit the section when it is non-empty.
    #[serde(default = "default_report")]
    pub report: bool,
    /// Fail the run when the section is non-empty.
    #[serde(default)]
    pub fail_on_error: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            report: default_report(),
            fail_on_error: false,
        }
    }
}

/// Reports are emitted unless disabled.
const fn default_report() -> bool {
    true
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl ContractsConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Skip classes from `CONTRACTS_SKIP_CLASSES` are merged before
    /// validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config = Self::parse(content)?;
        if let Ok(extra) = env::var(SKIP_CLASSES_ENV_VAR) {
            config.merge_skip_classes(&extra);
        }
        config.validate()?;
        Ok(config)
    }

    /// Parses TOML without validating it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the TOML is malformed.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Merges a comma-separated list of declaring types into the skip list.
    ///
    /// Blank segments and names already present are ignored.
    pub fn merge_skip_classes(&mut self, raw: &str) {
        for name in raw.split(',').map(str::trim).filter(|name| !name.is_empty()) {
            if !self.discovery.skip_classes.iter().any(|existing| existing.trim() == name) {
                debug!("skip class {name}");
                self.discovery.skip_classes.push(name.to_string());
            }
        }
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.discovery.validate()
    }

    /// Returns the skip list applied while building the registry.
    #[must_use]
    pub fn skip_list(&self) -> SkipList {
        self.discovery.skip_classes.iter().map(|name| TypeName::new(name.trim())).collect()
    }

    /// Returns an inventory scoped to the configured packages.
    #[must_use]
    pub fn inventory(&self) -> ContractInventory {
        ContractInventory::new(self.discovery.packages.iter().map(|package| package.trim()))
    }
}

impl DiscoveryConfig {
    /// Validates discovery configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.packages.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one package must be specified".to_string(),
            ));
        }
        if self.packages.len() > MAX_PACKAGES {
            return Err(ConfigError::Invalid("discovery.packages exceeds max entries".to_string()));
        }
        if self.skip_classes.len() > MAX_SKIP_CLASSES {
            return Err(ConfigError::Invalid(
                "discovery.skip_classes exceeds max entries".to_string(),
            ));
        }
        for package in &self.packages {
            validate_name("discovery.packages", package)?;
        }
        for name in &self.skip_classes {
            validate_name("discovery.skip_classes", name)?;
            TypeName::parse(name).map_err(|err| {
                ConfigError::Invalid(format!("discovery.skip_classes entry {name}: {err}"))
            })?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from an explicit argument or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a package prefix or type name.
fn validate_name(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} entries must be non-empty")));
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} entry exceeds max length")));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(ConfigError::Invalid(format!("{field} entry {trimmed} contains whitespace")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
