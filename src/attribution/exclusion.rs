// Bot and system account exclusion
//
// One named set consulted before scoring; adding an account is a
// configuration change, never a per-role one.

use crate::config::ExclusionSpec;
use crate::error::{AnalyticsError, Result};
use regex::Regex;
use std::collections::BTreeSet;

/// Accounts that never count as people
#[derive(Debug, Clone, Default)]
pub struct ExclusionList {
    /// Trimmed, lowercased exact names
    accounts: BTreeSet<String>,
    patterns: Vec<Regex>,
}

impl ExclusionList {
    pub fn from_spec(spec: &ExclusionSpec) -> Result<Self> {
        let accounts = spec
            .accounts
            .iter()
            .map(|a| a.trim().to_lowercase())
            .filter(|a| !a.is_empty())
            .collect();

        let patterns = spec
            .patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|source| AnalyticsError::InvalidPattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { accounts, patterns })
    }

    /// Exact name (case-insensitive) or pattern match
    pub fn is_excluded(&self, name: &str) -> bool {
        let name = name.trim();
        self.accounts.contains(&name.to_lowercase())
            || self.patterns.iter().any(|re| re.is_match(name))
    }

    pub fn len(&self) -> usize {
        self.accounts.len() + self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
