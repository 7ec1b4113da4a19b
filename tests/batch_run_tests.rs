//! End-to-end batch runs over the fixture data in tests/data

use rolemine::config::AnalyticsConfig;
use rolemine::ledger::{self, TicketLedger};
use rolemine::pipeline::{run, BatchInput};
use rolemine::report::AnalyticsReport;

fn data(name: &str) -> String {
    format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn fixture_report() -> AnalyticsReport {
    let config = AnalyticsConfig::from_toml(data("roles.toml")).unwrap();
    let ledger = TicketLedger::from_json_path(data("tickets.json")).unwrap();
    let (revenue, revenue_stats) = ledger::load_revenue(data("revenue.json")).unwrap();
    let (staff, staff_stats) = ledger::load_staff(data("staff.json")).unwrap();

    let mut input = BatchInput::new(ledger, config);
    input.revenue = revenue;
    input.revenue_stats = revenue_stats;
    input.staff = staff;
    input.staff_stats = staff_stats;
    run(&input).unwrap()
}

fn carriers(report: &AnalyticsReport, role_id: &str) -> Vec<String> {
    report
        .historic_roles
        .iter()
        .find(|r| r.id == role_id)
        .unwrap()
        .historic_carriers
        .iter()
        .map(|c| c.person.clone())
        .collect()
}

#[test]
fn test_meta_counts() {
    let report = fixture_report();
    let meta = &report.meta;
    assert_eq!(meta.format, "rolemine-json-v1");
    assert_eq!(meta.snapshot, "2023-Q2");
    assert_eq!(meta.tickets_read, 16);
    assert_eq!(meta.tickets_skipped, 1);
    assert_eq!(meta.tickets_matched, 15);
    assert_eq!(meta.revenue_skipped, 1);
    assert_eq!(meta.staff_skipped, 0);
    assert_eq!(meta.input_digest.len(), 64);
}

#[test]
fn test_service_role_ranking() {
    let report = fixture_report();
    assert_eq!(carriers(&report, "firewall-engineer"), vec!["Ada", "Bob"]);

    let role = &report.historic_roles[0];
    assert_eq!(role.current_occupants, vec!["Ada"]);
    let ada = &role.historic_carriers[0];
    assert_eq!((ada.total_tickets, ada.role_tickets), (4, 3));
    assert!((ada.score - 3.0).abs() < 1e-9);
    assert_eq!(ada.coverage_pct, 75.0);
    assert!(ada.is_current);
    assert_eq!(ada.top_services[0].name, "Managed Firewall");
}

#[test]
fn test_most_specific_signal_drops_broad_project() {
    let report = fixture_report();
    // Bob's firewall ticket in the security project does not count
    assert_eq!(carriers(&report, "isms-advisor"), vec!["Cy"]);

    let role = report
        .historic_roles
        .iter()
        .find(|r| r.id == "isms-advisor")
        .unwrap();
    let signal = role.signal.as_ref().unwrap();
    assert_eq!(signal.active.len(), 1);
    assert_eq!(signal.suppressed.len(), 1);
    assert_eq!(role.current_occupants, vec!["Dana"]);
}

#[test]
fn test_non_observable_roles() {
    let report = fixture_report();
    for id in ["unit-lead", "legacy-operator"] {
        let role = report.historic_roles.iter().find(|r| r.id == id).unwrap();
        assert!(!role.observable, "{} should not be observable", id);
        assert!(role.historic_carriers.is_empty());
        assert!(role.signal.is_none());
    }

    let errors = &report.meta.configuration_errors;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].role, "legacy-operator");
    assert!(errors[0].message.contains("Decommissioned Mainframe"));
}

#[test]
fn test_bots_absent_from_all_rankings() {
    let report = fixture_report();
    for role in &report.historic_roles {
        for carrier in &role.historic_carriers {
            assert_ne!(carrier.person, "Automation for Jira");
            assert_ne!(carrier.person, "deploy-bot");
        }
    }
}

#[test]
fn test_cross_references() {
    let report = fixture_report();
    let refs = &report.cross_references;

    assert_eq!(refs.service_cooccurrence.len(), 1);
    let edge = &refs.service_cooccurrence[0];
    assert_eq!(
        (edge.source.as_str(), edge.target.as_str(), edge.customers),
        ("Managed Backup", "Managed Firewall", 3)
    );

    assert_eq!(refs.team_overlap.len(), 1);
    assert_eq!(refs.team_overlap[0].shared_members, 2);

    assert_eq!(refs.stats.customers_analyzed, 3);
    assert_eq!(refs.dependency_chains.len(), 1);
    assert_eq!(refs.dependency_chains[0].primary, "Managed Backup");
    assert_eq!(refs.dependency_chains[0].customers, 3);

    // ISMS volume is flat, so only the firewall/backup pair correlates
    assert_eq!(refs.temporal_correlations.len(), 1);
    let r = refs.temporal_correlations[0].correlation;
    assert!((-1.0..=1.0).contains(&r));

    assert_eq!(refs.stats.revenue_linked, 2);
    assert_eq!(refs.stats.unmapped_cost_groups, 1);
    let firewall = refs
        .revenue_enriched
        .iter()
        .find(|r| r.service == "Managed Firewall")
        .unwrap();
    assert_eq!(firewall.revenue, 1000.0);
    assert_eq!(firewall.tickets, 8);
    assert_eq!(firewall.revenue_per_ticket, Some(125.0));
    assert_eq!(refs.revenue_service_map.len(), 2);
}

#[test]
fn test_repeated_runs_are_identical() {
    let first = fixture_report().to_json(true).unwrap();
    let second = fixture_report().to_json(true).unwrap();
    assert_eq!(first, second);
}
