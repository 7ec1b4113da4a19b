use crate::ledger::{top_counts, NameCount, TicketLedger};
use serde::Serialize;
use std::collections::BTreeMap;
use trueno::Vector;

/// Service footprint of one customer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerBreadth {
    pub customer: String,
    /// Distinct services with at least one ticket
    pub services_count: usize,
    /// All tickets of the customer, matched or not
    pub total_tickets: usize,
    pub top_services: Vec<NameCount>,
    /// Standard score of `services_count` across all customers
    pub z_score: f64,
    pub unusually_wide: bool,
}

#[derive(Default)]
struct Footprint {
    tickets: usize,
    services: BTreeMap<String, usize>,
}

/// Breadth per customer, widest first
///
/// Ties are broken by total tickets descending, then by name.
pub fn customer_breadth(
    ledger: &TicketLedger,
    zscore_threshold: f64,
    top_services: usize,
) -> Vec<CustomerBreadth> {
    let mut footprints: BTreeMap<&str, Footprint> = BTreeMap::new();
    for ticket in ledger.tickets() {
        let Some(customer) = &ticket.customer else {
            continue;
        };
        let footprint = footprints.entry(customer.as_str()).or_default();
        footprint.tickets += 1;
        if let Some(service) = &ticket.service {
            *footprint.services.entry(service.clone()).or_default() += 1;
        }
    }

    let counts: Vec<f32> = footprints
        .values()
        .map(|f| f.services.len() as f32)
        .collect();
    let (mean, stddev) = if counts.is_empty() {
        (0.0, 0.0)
    } else {
        let v = Vector::from_slice(&counts);
        (
            f64::from(v.mean().unwrap_or(0.0)),
            f64::from(v.stddev().unwrap_or(0.0)),
        )
    };

    let mut out: Vec<CustomerBreadth> = footprints
        .into_iter()
        .map(|(customer, footprint)| {
            let services_count = footprint.services.len();
            let z_score = if stddev > 0.0 {
                round_z((services_count as f64 - mean) / stddev)
            } else {
                0.0
            };
            CustomerBreadth {
                customer: customer.to_string(),
                services_count,
                total_tickets: footprint.tickets,
                top_services: top_counts(&footprint.services, top_services),
                z_score,
                unusually_wide: stddev > 0.0 && z_score >= zscore_threshold,
            }
        })
        .collect();

    out.sort_by(|a, b| {
        b.services_count
            .cmp(&a.services_count)
            .then_with(|| b.total_tickets.cmp(&a.total_tickets))
            .then_with(|| a.customer.cmp(&b.customer))
    });
    out
}

/// Round to six decimals
fn round_z(z: f64) -> f64 {
    (z * 1e6).round() / 1e6
}
