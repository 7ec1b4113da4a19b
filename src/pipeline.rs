//! One batch run: enrich → resolve signals → rank roles → mine → assemble
//!
//! Pure over already loaded inputs; all reading and writing happens in
//! the caller.

use crate::attribution::{AttributionEngine, ExclusionList};
use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::ledger::{LoadStats, RevenueRecord, StaffMember, TicketLedger};
use crate::matcher::Enricher;
use crate::mining::RelationshipMiner;
use crate::report::{AnalyticsReport, ConfigurationError, Meta, FORMAT};
use crate::signal::{ResolvedRole, SignalResolver};
use tracing::{info, warn};

/// Everything a run needs, loaded up front
#[derive(Debug, Clone, Default)]
pub struct BatchInput {
    pub ledger: TicketLedger,
    pub revenue: Vec<RevenueRecord>,
    pub revenue_stats: LoadStats,
    pub staff: Vec<StaffMember>,
    pub staff_stats: LoadStats,
    pub config: AnalyticsConfig,
    /// Digest of the raw ticket input; taken from the ledger when empty
    pub input_digest: String,
}

impl BatchInput {
    pub fn new(ledger: TicketLedger, config: AnalyticsConfig) -> Self {
        Self {
            input_digest: ledger.digest().to_string(),
            ledger,
            config,
            ..Self::default()
        }
    }
}

/// Compute the complete analytics document
///
/// Fails only when the configuration cannot be compiled (invalid
/// patterns); per-role signal problems end up in
/// `meta.configurationErrors` instead.
pub fn run(input: &BatchInput) -> Result<AnalyticsReport> {
    let config = &input.config;
    let (ledger, enrich_stats) = Enricher::new(config)?.enrich(&input.ledger);
    let exclusions = ExclusionList::from_spec(&config.exclusions)?;

    let resolver = SignalResolver::new(&config.catalog);
    let mut configuration_errors = Vec::new();
    let resolved: Vec<ResolvedRole> = config
        .roles
        .iter()
        .map(|role| {
            let resolution = resolver.resolve(role);
            if !resolution.issues.is_empty() {
                let message = resolution
                    .issues
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                warn!(role = %role.id, %message, "Role signal configuration problem");
                configuration_errors.push(ConfigurationError {
                    role: role.id.clone(),
                    message,
                });
            }
            resolution.resolved
        })
        .collect();

    let engine = AttributionEngine::new(&ledger, &exclusions, &input.staff, &config.settings);
    let historic_roles = engine.report_all(&config.roles, &resolved);

    let cross_references = RelationshipMiner::new(
        &ledger,
        &exclusions,
        &config.settings,
        &input.revenue,
        &config.revenue_map,
    )
    .mine();

    let load = input.ledger.stats();
    let input_digest = if input.input_digest.is_empty() {
        input.ledger.digest().to_string()
    } else {
        input.input_digest.clone()
    };

    info!(
        roles = historic_roles.len(),
        configuration_errors = configuration_errors.len(),
        "Batch run complete"
    );

    Ok(AnalyticsReport {
        meta: Meta {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: FORMAT.to_string(),
            snapshot: config.settings.snapshot.clone(),
            input_digest,
            tickets_read: load.records_read,
            tickets_skipped: load.records_skipped,
            tickets_matched: enrich_stats.tickets_matched,
            revenue_skipped: input.revenue_stats.records_skipped,
            staff_skipped: input.staff_stats.records_skipped,
            configuration_errors,
        },
        historic_roles,
        cross_references,
    })
}
