use crate::ledger::TicketLedger;
use serde::Serialize;
use std::collections::BTreeMap;

/// Customers whose dominant service is followed by the same runner-up
///
/// A conditional-frequency count: correlation, not causation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyChain {
    pub primary: String,
    pub secondary: String,
    pub customers: usize,
}

/// Primary→secondary chains shared by at least `min_customers` customers
///
/// Only customers using two or more services whose primary service holds
/// at least `min_primary_share` of their matched tickets take part.
pub fn dependency_chains(
    ledger: &TicketLedger,
    min_primary_share: f64,
    min_customers: usize,
) -> Vec<DependencyChain> {
    let mut usage: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
    for ticket in ledger.tickets() {
        if let (Some(customer), Some(service)) = (&ticket.customer, &ticket.service) {
            *usage
                .entry(customer.as_str())
                .or_default()
                .entry(service.as_str())
                .or_default() += 1;
        }
    }

    let mut chains: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for services in usage.values() {
        if services.len() < 2 {
            continue;
        }
        let mut ranked: Vec<(&str, usize)> = services.iter().map(|(s, c)| (*s, *c)).collect();
        ranked.sort_by(|(name_a, a), (name_b, b)| b.cmp(a).then_with(|| name_a.cmp(name_b)));

        let total: usize = ranked.iter().map(|(_, c)| c).sum();
        let (primary, primary_count) = ranked[0];
        if (primary_count as f64 / total as f64) < min_primary_share {
            continue;
        }
        let (secondary, _) = ranked[1];
        *chains.entry((primary, secondary)).or_default() += 1;
    }

    let mut out: Vec<DependencyChain> = chains
        .into_iter()
        .filter(|(_, customers)| *customers >= min_customers)
        .map(|((primary, secondary), customers)| DependencyChain {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
            customers,
        })
        .collect();

    out.sort_by(|a, b| {
        b.customers
            .cmp(&a.customers)
            .then_with(|| a.primary.cmp(&b.primary))
            .then_with(|| a.secondary.cmp(&b.secondary))
    });
    out
}
