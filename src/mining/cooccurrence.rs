use crate::ledger::TicketLedger;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Two services sharing customers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CooccurrenceEdge {
    /// Lexicographically smaller service
    pub source: String,
    pub target: String,
    /// Distinct customers with tickets against both services
    pub customers: usize,
}

/// Customers per service, from tickets carrying both tags
fn customers_by_service(ledger: &TicketLedger) -> BTreeMap<&str, BTreeSet<&str>> {
    let mut map: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for ticket in ledger.tickets() {
        if let (Some(service), Some(customer)) = (&ticket.service, &ticket.customer) {
            map.entry(service.as_str()).or_default().insert(customer.as_str());
        }
    }
    map
}

/// Shared-customer edges between every pair of services
///
/// Sorted by shared customers descending, then by service names. Pairs
/// without a shared customer are not emitted.
pub fn service_cooccurrence(ledger: &TicketLedger) -> Vec<CooccurrenceEdge> {
    let by_service = customers_by_service(ledger);
    let services: Vec<(&str, &BTreeSet<&str>)> =
        by_service.iter().map(|(s, c)| (*s, c)).collect();

    let mut edges = Vec::new();
    for (i, (source, customers_a)) in services.iter().enumerate() {
        for (target, customers_b) in &services[i + 1..] {
            let shared = customers_a.intersection(customers_b).count();
            if shared > 0 {
                edges.push(CooccurrenceEdge {
                    source: source.to_string(),
                    target: target.to_string(),
                    customers: shared,
                });
            }
        }
    }

    edges.sort_by(|a, b| {
        b.customers
            .cmp(&a.customers)
            .then_with(|| a.source.cmp(&b.source))
            .then_with(|| a.target.cmp(&b.target))
    });
    edges
}
