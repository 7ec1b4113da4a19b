use crate::config::ServiceCatalog;
use crate::error::{AnalyticsError, Result};
use regex::{Regex, RegexBuilder};

/// Matches ticket text against catalog services
///
/// Every service contributes its escaped exact name plus its alias
/// patterns, all case-insensitive. Patterns are tried longest first and
/// the first hit wins, so specific names beat generic aliases
/// ("managed.backup für M365" before "backup").
#[derive(Debug, Clone)]
pub struct ServiceMatcher {
    patterns: Vec<(String, Regex)>,
}

impl ServiceMatcher {
    pub fn from_catalog(catalog: &ServiceCatalog) -> Result<Self> {
        let mut patterns = Vec::new();
        for service in &catalog.services {
            patterns.push((service.name.clone(), compile(&regex::escape(&service.name))?));
            for alias in &service.aliases {
                patterns.push((service.name.clone(), compile(alias)?));
            }
        }

        // Longest pattern first; name and pattern text make the order total
        patterns.sort_by(|(name_a, re_a), (name_b, re_b)| {
            re_b.as_str()
                .len()
                .cmp(&re_a.as_str().len())
                .then_with(|| name_a.cmp(name_b))
                .then_with(|| re_a.as_str().cmp(re_b.as_str()))
        });

        Ok(Self { patterns })
    }

    /// Service whose highest-priority pattern matches `text`
    pub fn match_text(&self, text: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(name, _)| name.as_str())
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| AnalyticsError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}
