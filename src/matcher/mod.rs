//! Ticket enrichment: service matching and customer extraction
//!
//! Source records may already carry a service or customer; those values
//! are kept. Everything else is derived from the ticket text here, before
//! any attribution or mining runs.

mod customer;
mod service;

pub use customer::CustomerExtractor;
pub use service::ServiceMatcher;

use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::ledger::{Ticket, TicketLedger};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Outcome counts of one enrichment pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichStats {
    /// Tickets carrying a service after enrichment
    pub tickets_matched: usize,
    /// Services filled in by text matching
    pub services_inferred: usize,
    /// Customers filled in from summary prefixes
    pub customers_inferred: usize,
}

/// Fills missing service and customer fields
#[derive(Debug, Clone)]
pub struct Enricher {
    services: ServiceMatcher,
    customers: CustomerExtractor,
}

impl Enricher {
    pub fn new(config: &AnalyticsConfig) -> Result<Self> {
        Ok(Self {
            services: ServiceMatcher::from_catalog(&config.catalog)?,
            customers: CustomerExtractor::new(&config.customers),
        })
    }

    /// Produce an enriched copy of the ledger
    pub fn enrich(&self, ledger: &TicketLedger) -> (TicketLedger, EnrichStats) {
        let enriched: Vec<(Ticket, bool, bool)> = ledger
            .tickets()
            .par_iter()
            .map(|ticket| self.enrich_ticket(ticket))
            .collect();

        let mut stats = EnrichStats::default();
        let mut tickets = Vec::with_capacity(enriched.len());
        for (ticket, service_inferred, customer_inferred) in enriched {
            stats.services_inferred += service_inferred as usize;
            stats.customers_inferred += customer_inferred as usize;
            stats.tickets_matched += ticket.service.is_some() as usize;
            tickets.push(ticket);
        }

        info!(
            matched = stats.tickets_matched,
            total = tickets.len(),
            patterns = self.services.pattern_count(),
            "Enriched ticket ledger"
        );

        (ledger.with_tickets(tickets), stats)
    }

    fn enrich_ticket(&self, ticket: &Ticket) -> (Ticket, bool, bool) {
        let mut out = ticket.clone();
        let mut service_inferred = false;
        let mut customer_inferred = false;

        if out.service.is_none() {
            if let Some(name) = self.services.match_text(&ticket.text()) {
                out.service = Some(name.to_string());
                service_inferred = true;
            }
        }
        if out.customer.is_none() {
            if let Some(name) = self.customers.extract(&ticket.summary) {
                out.customer = Some(name);
                customer_inferred = true;
            }
        }

        (out, service_inferred, customer_inferred)
    }
}
