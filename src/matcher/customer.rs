use crate::config::CustomerRules;
use regex::Regex;
use std::sync::OnceLock;

fn host_name() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9]+-[A-Za-z]+-\d+$").expect("static regex is valid")
    })
}

/// Extracts customer names from summary prefixes like `"ACME: Exchange migration"`
#[derive(Debug, Clone)]
pub struct CustomerExtractor {
    system_prefixes: Vec<String>,
    max_prefix_len: usize,
}

impl CustomerExtractor {
    pub fn new(rules: &CustomerRules) -> Self {
        Self {
            system_prefixes: rules
                .system_prefixes
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
            max_prefix_len: rules.max_prefix_len,
        }
    }

    /// Customer name from the summary prefix, if it looks like one
    pub fn extract(&self, summary: &str) -> Option<String> {
        let (prefix, rest) = summary.split_once(':')?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }

        let prefix = prefix.trim();
        if prefix.is_empty() || prefix.chars().count() > self.max_prefix_len {
            return None;
        }

        let lowered = prefix.to_lowercase();
        if self
            .system_prefixes
            .iter()
            .any(|system| lowered.starts_with(system.as_str()))
        {
            return None;
        }

        if host_name().is_match(prefix) {
            return None;
        }

        Some(prefix.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> CustomerExtractor {
        CustomerExtractor::new(&CustomerRules {
            system_prefixes: vec!["Check_MK".to_string(), "levigo-Mon".to_string()],
            max_prefix_len: 25,
        })
    }

    #[test]
    fn test_extracts_prefix() {
        assert_eq!(
            extractor().extract("BARESEL: Migration Exchange"),
            Some("BARESEL".to_string())
        );
    }

    #[test]
    fn test_requires_whitespace_after_colon() {
        assert_eq!(extractor().extract("https://example.org down"), None);
        assert_eq!(extractor().extract("no prefix here"), None);
    }

    #[test]
    fn test_rejects_system_prefixes() {
        assert_eq!(extractor().extract("check_mk: host down"), None);
        assert_eq!(extractor().extract("levigo-Mon-02: disk full"), None);
    }

    #[test]
    fn test_rejects_host_names() {
        assert_eq!(extractor().extract("a-esx-01: datastore latency"), None);
    }

    #[test]
    fn test_rejects_long_prefixes() {
        assert_eq!(
            extractor().extract("Please could you have a look at this: thanks"),
            None
        );
    }
}
