use crate::ledger::{RevenueRecord, TicketLedger};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Revenue and margin of one service against its operational load
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRevenue {
    pub service: String,
    /// Cost groups mapped onto the service that have revenue rows
    pub cost_groups: Vec<String>,
    pub revenue: f64,
    pub margin: f64,
    /// Tickets matched to the service
    pub tickets: usize,
    /// `None` when the service has no tickets
    pub revenue_per_ticket: Option<f64>,
    pub margin_per_ticket: Option<f64>,
}

/// Outcome of joining the revenue ledger onto services
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RevenueLinkage {
    pub services: Vec<ServiceRevenue>,
    /// Distinct cost groups with revenue but no mapping
    pub unmapped_cost_groups: usize,
}

#[derive(Default)]
struct Totals {
    cost_groups: BTreeSet<String>,
    revenue: f64,
    margin: f64,
}

/// Aggregate revenue per mapped service and divide by ticket volume
///
/// Every service targeted by `revenue_map` is reported, also when no
/// revenue row reaches it. Sorted by revenue descending, then service.
pub fn revenue_linkage(
    ledger: &TicketLedger,
    records: &[RevenueRecord],
    revenue_map: &BTreeMap<String, String>,
) -> RevenueLinkage {
    let mut totals: BTreeMap<&str, Totals> = revenue_map
        .values()
        .map(|service| (service.as_str(), Totals::default()))
        .collect();

    let mut unmapped = BTreeSet::new();
    for record in records {
        let cost_group = record.cost_group.trim();
        match revenue_map.get(cost_group) {
            Some(service) => {
                let entry = totals.entry(service.as_str()).or_default();
                entry.cost_groups.insert(cost_group.to_string());
                entry.revenue += record.revenue;
                entry.margin += record.margin;
            }
            None => {
                unmapped.insert(cost_group);
            }
        }
    }

    let mut tickets: BTreeMap<&str, usize> = BTreeMap::new();
    for ticket in ledger.tickets() {
        if let Some(service) = &ticket.service {
            if totals.contains_key(service.as_str()) {
                *tickets.entry(service.as_str()).or_default() += 1;
            }
        }
    }

    let mut services: Vec<ServiceRevenue> = totals
        .into_iter()
        .map(|(service, totals)| {
            let count = tickets.get(service).copied().unwrap_or(0);
            let per_ticket = |value: f64| (count > 0).then(|| value / count as f64);
            ServiceRevenue {
                service: service.to_string(),
                cost_groups: totals.cost_groups.into_iter().collect(),
                revenue: totals.revenue,
                margin: totals.margin,
                tickets: count,
                revenue_per_ticket: per_ticket(totals.revenue),
                margin_per_ticket: per_ticket(totals.margin),
            }
        })
        .collect();

    services.sort_by(|a, b| {
        b.revenue
            .total_cmp(&a.revenue)
            .then_with(|| a.service.cmp(&b.service))
    });

    RevenueLinkage {
        services,
        unmapped_cost_groups: unmapped.len(),
    }
}
