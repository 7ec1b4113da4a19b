//! Property-based tests for attribution and mining invariants
//!
//! Random ledgers over a small vocabulary of people, services, customers
//! and months, so that pairs, ties and exclusions actually occur.
//!
//! Invariants covered:
//! 1. Coverage stays within [0, 1]
//! 2. Rankings are capped and non-increasing by score
//! 3. Excluded accounts never appear in a ranking
//! 4. Team overlap ratio ≤ 1 and shared ≤ smaller team
//! 5. Correlations lie in [-1, 1]
//! 6. Identical input gives identical output

use chrono::NaiveDate;
use proptest::prelude::*;
use rolemine::attribution::{AttributionEngine, ExclusionList};
use rolemine::config::{
    AnalyticsConfig, ExclusionSpec, Precedence, RoleDefinition, ServiceCatalog, ServiceEntry,
    Settings, SignalKind, SignalSourceSpec, Thresholds,
};
use rolemine::ledger::{Ticket, TicketLedger};
use rolemine::mining::{pearson, team_overlap, temporal_correlations};
use rolemine::pipeline::{run, BatchInput};
use rolemine::signal::{ResolvedRole, SignalResolver};

const PEOPLE: &[&str] = &["ada", "bob", "cy", "dee", "ops-bot", "System"];
const SERVICES: &[&str] = &["Backup", "Firewall", "VPN", "Mail"];
const CUSTOMERS: &[&str] = &["ACME", "Globex", "Initech"];

fn arb_ticket() -> impl Strategy<Value = Ticket> {
    (
        0..PEOPLE.len(),
        0..SERVICES.len(),
        prop::option::of(0..CUSTOMERS.len()),
        0u32..18,
        any::<u16>(),
    )
        .prop_map(|(person, service, customer, month, id)| Ticket {
            id: format!("T-{}", id),
            assignee: Some(PEOPLE[person].to_string()),
            service: Some(SERVICES[service].to_string()),
            customer: customer.map(|c| CUSTOMERS[c].to_string()),
            project: Some("SD".to_string()),
            kind: "Task".to_string(),
            created: NaiveDate::from_ymd_opt(2022 + (month / 12) as i32, month % 12 + 1, 1)
                .unwrap(),
            summary: String::new(),
            description: String::new(),
        })
}

fn arb_ledger() -> impl Strategy<Value = TicketLedger> {
    prop::collection::vec(arb_ticket(), 0..200).prop_map(TicketLedger::from_tickets)
}

fn catalog() -> ServiceCatalog {
    ServiceCatalog {
        projects: vec!["SD".to_string()],
        services: SERVICES
            .iter()
            .map(|s| ServiceEntry {
                name: s.to_string(),
                aliases: vec![],
            })
            .collect(),
    }
}

fn exclusion_spec() -> ExclusionSpec {
    ExclusionSpec {
        accounts: vec!["System".to_string()],
        patterns: vec!["(?i)-bot$".to_string()],
    }
}

fn role(min_coverage: f64, min_absolute_tickets: usize) -> RoleDefinition {
    RoleDefinition {
        id: "firewall-engineer".to_string(),
        name: "Firewall Engineer".to_string(),
        unit: String::new(),
        description: String::new(),
        observable: true,
        precedence: Precedence::Union,
        thresholds: Some(Thresholds {
            min_coverage,
            min_absolute_tickets,
        }),
        signals: vec![SignalSourceSpec {
            kind: SignalKind::Services,
            values: vec!["Firewall".to_string(), "VPN".to_string()],
        }],
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_coverage_within_unit_interval(ledger in arb_ledger()) {
        let exclusions = ExclusionList::from_spec(&exclusion_spec()).unwrap();
        let settings = Settings::default();
        let engine = AttributionEngine::new(&ledger, &exclusions, &[], &settings);
        let catalog = catalog();
        let ResolvedRole::Observable(signal) = SignalResolver::new(&catalog).resolve(&role(0.0, 0)).resolved else {
            panic!("role should be observable");
        };

        for activity in engine.activity(&signal) {
            prop_assert!(activity.role_tickets <= activity.total_tickets);
            let coverage = activity.coverage().unwrap();
            prop_assert!((0.0..=1.0).contains(&coverage));
        }
    }

    #[test]
    fn prop_rankings_capped_sorted_and_bot_free(
        ledger in arb_ledger(),
        min_coverage in 0.0f64..0.6,
        min_absolute in 0usize..5,
        max_carriers in 1usize..6,
    ) {
        let exclusions = ExclusionList::from_spec(&exclusion_spec()).unwrap();
        let settings = Settings { max_carriers, ..Settings::default() };
        let engine = AttributionEngine::new(&ledger, &exclusions, &[], &settings);
        let catalog = catalog();
        let definition = role(min_coverage, min_absolute);
        let report = engine.report(&definition, &SignalResolver::new(&catalog).resolve(&definition).resolved);

        let carriers = &report.historic_carriers;
        prop_assert!(carriers.len() <= max_carriers);
        prop_assert!(carriers.windows(2).all(|w| w[0].score >= w[1].score));
        for carrier in carriers {
            prop_assert!(carrier.person != "ops-bot" && carrier.person != "System");
            prop_assert!(carrier.coverage >= min_coverage);
            prop_assert!(carrier.role_tickets >= min_absolute);
        }
    }

    #[test]
    fn prop_team_overlap_bounded(ledger in arb_ledger()) {
        let exclusions = ExclusionList::from_spec(&exclusion_spec()).unwrap();
        for pair in team_overlap(&ledger, &exclusions) {
            prop_assert!(pair.overlap_ratio > 0.0 && pair.overlap_ratio <= 1.0);
            prop_assert!(pair.shared_members <= pair.members_a.min(pair.members_b));
            prop_assert!(pair.service_a < pair.service_b);
        }
    }

    #[test]
    fn prop_correlations_bounded(ledger in arb_ledger(), min_months in 3usize..12) {
        let correlations = temporal_correlations(&ledger, min_months);
        for c in &correlations {
            prop_assert!((-1.0..=1.0).contains(&c.correlation));
            prop_assert!(c.months >= min_months);
        }
        prop_assert!(correlations.windows(2).all(|w| w[0].correlation >= w[1].correlation));
    }

    #[test]
    fn prop_pearson_of_scaled_series_is_one(
        xs in prop::collection::vec(0.0f64..1000.0, 3..24),
        scale in 0.5f64..10.0,
        offset in 0.0f64..100.0,
    ) {
        let ys: Vec<f64> = xs.iter().map(|x| x * scale + offset).collect();
        if let Some(r) = pearson(&xs, &ys) {
            prop_assert!((r - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn prop_run_is_deterministic(ledger in arb_ledger()) {
        let config = AnalyticsConfig {
            exclusions: exclusion_spec(),
            catalog: catalog(),
            roles: vec![role(0.1, 1)],
            ..AnalyticsConfig::default()
        };
        let input = BatchInput::new(ledger, config);
        let first = run(&input).unwrap().to_json(false).unwrap();
        let second = run(&input).unwrap().to_json(false).unwrap();
        prop_assert_eq!(first, second);
    }
}
