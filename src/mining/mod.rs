//! Relationship Mining over the enriched ticket ledger
//!
//! Six independent views, each a pure reduction over immutable input:
//!
//! - service cooccurrence (shared customers)
//! - temporal correlation of monthly volumes
//! - team overlap (shared assignees)
//! - customer breadth
//! - dependency chains (primary → secondary service)
//! - revenue linkage (revenue per unit of operational load)
//!
//! None of them shares mutable state, so they run concurrently.

mod breadth;
mod cooccurrence;
mod dependency;
mod revenue;
mod team;
mod temporal;

pub use breadth::{customer_breadth, CustomerBreadth};
pub use cooccurrence::{service_cooccurrence, CooccurrenceEdge};
pub use dependency::{dependency_chains, DependencyChain};
pub use revenue::{revenue_linkage, RevenueLinkage, ServiceRevenue};
pub use team::{team_overlap, TeamOverlap};
pub use temporal::{negative, pearson, positive, temporal_correlations, Band, TemporalCorrelation};

use crate::attribution::ExclusionList;
use crate::config::Settings;
use crate::ledger::{RevenueRecord, TicketLedger};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Sizes of the mined views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiningStats {
    pub cooccurrence_edges: usize,
    pub team_overlap_pairs: usize,
    pub customers_analyzed: usize,
    pub temporal_correlations: usize,
    pub dependency_chains: usize,
    /// Services with at least one revenue row
    pub revenue_linked: usize,
    pub unmapped_cost_groups: usize,
}

/// All relationship views of one run
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossReferences {
    pub service_cooccurrence: Vec<CooccurrenceEdge>,
    pub temporal_correlations: Vec<TemporalCorrelation>,
    pub team_overlap: Vec<TeamOverlap>,
    pub customer_breadth: Vec<CustomerBreadth>,
    pub dependency_chains: Vec<DependencyChain>,
    pub revenue_enriched: Vec<ServiceRevenue>,
    /// Cost group → service, as configured
    pub revenue_service_map: BTreeMap<String, String>,
    pub stats: MiningStats,
}

/// Computes every relationship view over one ledger
#[derive(Debug, Clone, Copy)]
pub struct RelationshipMiner<'a> {
    ledger: &'a TicketLedger,
    exclusions: &'a ExclusionList,
    settings: &'a Settings,
    revenue: &'a [RevenueRecord],
    revenue_map: &'a BTreeMap<String, String>,
}

impl<'a> RelationshipMiner<'a> {
    pub fn new(
        ledger: &'a TicketLedger,
        exclusions: &'a ExclusionList,
        settings: &'a Settings,
        revenue: &'a [RevenueRecord],
        revenue_map: &'a BTreeMap<String, String>,
    ) -> Self {
        Self {
            ledger,
            exclusions,
            settings,
            revenue,
            revenue_map,
        }
    }

    pub fn mine(&self) -> CrossReferences {
        let s = self.settings;
        let ((cooccurrence, temporal), ((team, breadth), (chains, revenue))) = rayon::join(
            || {
                rayon::join(
                    || service_cooccurrence(self.ledger),
                    || temporal_correlations(self.ledger, s.min_overlap_months),
                )
            },
            || {
                rayon::join(
                    || {
                        rayon::join(
                            || team_overlap(self.ledger, self.exclusions),
                            || {
                                customer_breadth(
                                    self.ledger,
                                    s.breadth_zscore,
                                    s.breadth_top_services,
                                )
                            },
                        )
                    },
                    || {
                        rayon::join(
                            || {
                                dependency_chains(
                                    self.ledger,
                                    s.min_primary_share,
                                    s.min_chain_customers,
                                )
                            },
                            || revenue_linkage(self.ledger, self.revenue, self.revenue_map),
                        )
                    },
                )
            },
        );

        let stats = MiningStats {
            cooccurrence_edges: cooccurrence.len(),
            team_overlap_pairs: team.len(),
            customers_analyzed: breadth.len(),
            temporal_correlations: temporal.len(),
            dependency_chains: chains.len(),
            revenue_linked: revenue
                .services
                .iter()
                .filter(|r| !r.cost_groups.is_empty())
                .count(),
            unmapped_cost_groups: revenue.unmapped_cost_groups,
        };

        info!(
            cooccurrence = stats.cooccurrence_edges,
            temporal = stats.temporal_correlations,
            team = stats.team_overlap_pairs,
            customers = stats.customers_analyzed,
            chains = stats.dependency_chains,
            revenue = stats.revenue_linked,
            "Mined cross references"
        );

        CrossReferences {
            service_cooccurrence: cooccurrence,
            temporal_correlations: temporal,
            team_overlap: team,
            customer_breadth: breadth,
            dependency_chains: chains,
            revenue_enriched: revenue.services,
            revenue_service_map: self.revenue_map.clone(),
            stats,
        }
    }
}
