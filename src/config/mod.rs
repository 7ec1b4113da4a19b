//! Curated reference data loaded from TOML
//!
//! Roles, their signal sources and thresholds, the service catalog, the
//! bot/system account exclusions and the revenue map are configuration,
//! not code: adding a role or an excluded account needs no recompilation.

mod role;

pub use role::{Precedence, RoleDefinition, SignalKind, SignalSourceSpec, Thresholds};

use crate::error::{AnalyticsError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

/// Run-wide tuning values
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Ticket volume beyond which a carrier's score stops growing
    pub volume_cap: usize,
    /// Maximum carriers reported per role
    pub max_carriers: usize,
    /// Services/projects attached to each carrier for explainability
    pub top_context: usize,
    /// Minimum overlapping months for a temporal correlation pair
    pub min_overlap_months: usize,
    /// Share of a customer's tickets the primary service must hold
    pub min_primary_share: f64,
    /// Minimum customers following a primary→secondary pattern
    pub min_chain_customers: usize,
    /// z-score at which a customer's service breadth counts as unusual
    pub breadth_zscore: f64,
    /// Services listed per customer in the breadth view
    pub breadth_top_services: usize,
    /// Free-form label of the data refresh, echoed in the report
    pub snapshot: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume_cap: 5000,
            max_carriers: 20,
            top_context: 2,
            min_overlap_months: 6,
            min_primary_share: 0.4,
            min_chain_customers: 2,
            breadth_zscore: 1.0,
            breadth_top_services: 5,
            snapshot: String::new(),
        }
    }
}

/// Bot and system accounts that never count as people
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExclusionSpec {
    /// Exact account names (case-insensitive)
    #[serde(default)]
    pub accounts: Vec<String>,
    /// Regular expressions matched against the account name
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// A catalog service and its match aliases
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceEntry {
    pub name: String,
    /// Additional regex patterns that identify the service in ticket text
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Valid service names and project keys
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServiceCatalog {
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default, rename = "service")]
    pub services: Vec<ServiceEntry>,
}

impl ServiceCatalog {
    pub fn has_service(&self, name: &str) -> bool {
        self.services.iter().any(|s| s.name == name)
    }

    pub fn has_project(&self, key: &str) -> bool {
        self.projects.iter().any(|p| p == key)
    }
}

/// Rules for pulling customer names out of summary prefixes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CustomerRules {
    /// Prefixes produced by monitoring or other systems, not customers
    pub system_prefixes: Vec<String>,
    /// Longer prefixes are sentences, not names
    pub max_prefix_len: usize,
}

impl Default for CustomerRules {
    fn default() -> Self {
        Self {
            system_prefixes: Vec::new(),
            max_prefix_len: 25,
        }
    }
}

/// Complete curated configuration for one batch run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub exclusions: ExclusionSpec,
    #[serde(default)]
    pub catalog: ServiceCatalog,
    #[serde(default, rename = "role")]
    pub roles: Vec<RoleDefinition>,
    /// Cost group → catalog service
    #[serde(default)]
    pub revenue_map: BTreeMap<String, String>,
    #[serde(default)]
    pub customers: CustomerRules,
}

impl AnalyticsConfig {
    /// Load and validate configuration from a TOML file
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| AnalyticsError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AnalyticsError::parse("configuration", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Embedded defaults for zero-config runs
    pub fn embedded_default() -> Result<Self> {
        const DEFAULT_TOML: &str = include_str!("../../rolemine-default.toml");
        Self::from_toml_str(DEFAULT_TOML)
    }

    /// Check structural invariants that would make the run meaningless
    pub fn validate(&self) -> Result<()> {
        let s = &self.settings;
        if s.volume_cap == 0 {
            return Err(invalid("settings.volume_cap must be > 0"));
        }
        if s.max_carriers == 0 {
            return Err(invalid("settings.max_carriers must be > 0"));
        }
        if s.min_overlap_months < 3 {
            return Err(invalid(format!(
                "settings.min_overlap_months must be >= 3 for a correlation, got {}",
                s.min_overlap_months
            )));
        }
        if !(0.0..=1.0).contains(&s.min_primary_share) {
            return Err(invalid(format!(
                "settings.min_primary_share must be in [0, 1], got {}",
                s.min_primary_share
            )));
        }

        for pattern in &self.exclusions.patterns {
            Regex::new(pattern).map_err(|source| AnalyticsError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
        }

        let mut service_names = HashSet::new();
        for service in &self.catalog.services {
            if !service_names.insert(service.name.as_str()) {
                return Err(invalid(format!(
                    "Duplicate service '{}' in catalog",
                    service.name
                )));
            }
        }

        let mut role_ids = HashSet::new();
        for role in &self.roles {
            if !role_ids.insert(role.id.as_str()) {
                return Err(invalid(format!("Duplicate role id '{}'", role.id)));
            }
            if !role.observable {
                continue;
            }
            let Some(thresholds) = role.thresholds else {
                return Err(invalid(format!(
                    "Observable role '{}' has no thresholds",
                    role.id
                )));
            };
            if !(0.0..=1.0).contains(&thresholds.min_coverage) {
                return Err(invalid(format!(
                    "Role '{}': min_coverage must be in [0, 1], got {}",
                    role.id, thresholds.min_coverage
                )));
            }
        }

        for (cost_group, service) in &self.revenue_map {
            if !self.catalog.has_service(service) {
                return Err(invalid(format!(
                    "Revenue map: cost group '{}' targets unknown service '{}'",
                    cost_group, service
                )));
            }
        }

        Ok(())
    }

    pub fn role(&self, id: &str) -> Option<&RoleDefinition> {
        self.roles.iter().find(|r| r.id == id)
    }
}

fn invalid(message: impl Into<String>) -> AnalyticsError {
    AnalyticsError::InvalidConfig(message.into())
}
