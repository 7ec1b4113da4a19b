use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A name with its ticket count, used for explainability context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameCount {
    pub name: String,
    pub count: usize,
}

/// The `n` largest entries, ties broken by name
pub fn top_counts(counts: &BTreeMap<String, usize>, n: usize) -> Vec<NameCount> {
    let mut entries: Vec<(&String, &usize)> = counts.iter().filter(|(_, c)| **c > 0).collect();
    entries.sort_by(|(name_a, a), (name_b, b)| b.cmp(a).then_with(|| name_a.cmp(name_b)));
    entries
        .into_iter()
        .take(n)
        .map(|(name, count)| NameCount {
            name: name.clone(),
            count: *count,
        })
        .collect()
}
