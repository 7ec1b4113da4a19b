use super::*;
use crate::config::{RoleDefinition, ServiceCatalog, ServiceEntry, SignalSourceSpec};
use chrono::NaiveDate;

fn catalog() -> ServiceCatalog {
    ServiceCatalog {
        projects: vec!["SD".to_string(), "SEC".to_string()],
        services: vec![
            ServiceEntry {
                name: "Managed Firewall".to_string(),
                aliases: vec![],
            },
            ServiceEntry {
                name: "Service Desk".to_string(),
                aliases: vec![],
            },
        ],
    }
}

fn source(kind: SignalKind, values: &[&str]) -> SignalSourceSpec {
    SignalSourceSpec {
        kind,
        values: values.iter().map(|v| v.to_string()).collect(),
    }
}

fn role(precedence: Precedence, signals: Vec<SignalSourceSpec>) -> RoleDefinition {
    RoleDefinition {
        id: "isms-advisor".to_string(),
        name: "ISMS Advisor".to_string(),
        unit: String::new(),
        description: String::new(),
        observable: true,
        precedence,
        thresholds: Some(Thresholds {
            min_coverage: 0.01,
            min_absolute_tickets: 3,
        }),
        signals,
    }
}

fn ticket(project: &str, service: Option<&str>, summary: &str) -> Ticket {
    Ticket {
        id: "T-1".to_string(),
        assignee: Some("ada".to_string()),
        service: service.map(str::to_string),
        customer: None,
        project: Some(project.to_string()),
        kind: "Task".to_string(),
        created: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        summary: summary.to_string(),
        description: String::new(),
    }
}

#[test]
fn test_curated_non_observable_role() {
    let catalog = catalog();
    let mut definition = role(Precedence::Union, vec![]);
    definition.observable = false;
    let resolution = SignalResolver::new(&catalog).resolve(&definition);

    assert!(!resolution.resolved.is_observable());
    assert!(resolution.issues.is_empty());
    match resolution.resolved {
        ResolvedRole::NonObservable { reason } => {
            assert_eq!(reason, NonObservableReason::Curated)
        }
        ResolvedRole::Observable(_) => panic!("expected non-observable role"),
    }
}

#[test]
fn test_union_matches_any_source() {
    let catalog = catalog();
    let definition = role(
        Precedence::Union,
        vec![
            source(SignalKind::Services, &["Managed Firewall"]),
            source(SignalKind::Keywords, &["ISMS"]),
        ],
    );
    let resolution = SignalResolver::new(&catalog).resolve(&definition);
    let signal = resolution.resolved.signal().unwrap();

    assert!(signal.matches(&ticket("SD", Some("Managed Firewall"), "rule change")));
    assert!(signal.matches(&ticket("SD", None, "isms audit preparation")));
    assert!(!signal.matches(&ticket("SD", Some("Service Desk"), "printer")));
    assert_eq!(
        signal.summary().active,
        vec![SignalKind::Services, SignalKind::Keywords]
    );
    assert!(signal.summary().suppressed.is_empty());
}

#[test]
fn test_most_specific_suppresses_broad_project() {
    let catalog = catalog();
    let definition = role(
        Precedence::MostSpecific,
        vec![
            source(SignalKind::Keywords, &["ISMS", "ISO ?27001"]),
            source(SignalKind::Projects, &["SEC"]),
        ],
    );
    let resolution = SignalResolver::new(&catalog).resolve(&definition);
    let signal = resolution.resolved.signal().unwrap();

    // A security-project ticket without the keyword no longer counts
    assert!(!signal.matches(&ticket("SEC", None, "Firewall rule review")));
    assert!(signal.matches(&ticket("SEC", None, "ISO 27001 surveillance audit")));
    assert_eq!(signal.summary().active, vec![SignalKind::Keywords]);
    assert_eq!(signal.summary().suppressed, vec![SignalKind::Projects]);
}

#[test]
fn test_most_specific_falls_back_to_next_resolvable_source() {
    let catalog = catalog();
    let definition = role(
        Precedence::MostSpecific,
        vec![
            source(SignalKind::Services, &["Retired Service"]),
            source(SignalKind::Projects, &["SEC"]),
        ],
    );
    let resolution = SignalResolver::new(&catalog).resolve(&definition);
    let signal = resolution.resolved.signal().unwrap();

    assert_eq!(signal.summary().active, vec![SignalKind::Projects]);
    assert!(resolution
        .issues
        .contains(&SignalIssue::UnknownService("Retired Service".to_string())));
}

#[test]
fn test_unresolvable_signal_is_non_observable() {
    let catalog = catalog();
    let definition = role(
        Precedence::Union,
        vec![
            source(SignalKind::Services, &["Nonexistent"]),
            source(SignalKind::Projects, &["NOPE"]),
        ],
    );
    let resolution = SignalResolver::new(&catalog).resolve(&definition);

    assert!(!resolution.resolved.is_observable());
    assert!(resolution.issues.contains(&SignalIssue::NoSignal));
    assert!(resolution
        .issues
        .contains(&SignalIssue::UnknownProject("NOPE".to_string())));
    let ResolvedRole::NonObservable { reason } = resolution.resolved else {
        panic!("expected non-observable role");
    };
    assert!(reason.describe().contains("unknown service 'Nonexistent'"));
}

#[test]
fn test_invalid_keyword_dropped_not_fatal() {
    let catalog = catalog();
    let definition = role(
        Precedence::Union,
        vec![source(SignalKind::Keywords, &["(unclosed", "VPN"])],
    );
    let resolution = SignalResolver::new(&catalog).resolve(&definition);
    let signal = resolution.resolved.signal().unwrap();

    assert!(signal.matches(&ticket("SD", None, "vpn tunnel down")));
    assert!(matches!(
        resolution.issues.as_slice(),
        [SignalIssue::InvalidKeyword { pattern, .. }] if pattern == "(unclosed"
    ));
}

#[test]
fn test_role_without_sources_is_non_observable() {
    let catalog = catalog();
    let resolution = SignalResolver::new(&catalog).resolve(&role(Precedence::Union, vec![]));
    assert!(!resolution.resolved.is_observable());
    assert_eq!(resolution.issues, vec![SignalIssue::NoSignal]);
}

#[test]
fn test_missing_thresholds_reported_distinctly() {
    let catalog = catalog();
    let definition = RoleDefinition {
        thresholds: None,
        ..role(
            Precedence::Union,
            vec![source(SignalKind::Projects, &["SEC"])],
        )
    };
    let resolution = SignalResolver::new(&catalog).resolve(&definition);

    assert!(!resolution.resolved.is_observable());
    assert_eq!(resolution.issues, vec![SignalIssue::MissingThresholds]);
    let ResolvedRole::NonObservable { reason } = resolution.resolved else {
        panic!("expected non-observable role");
    };
    assert!(reason.describe().contains("no thresholds"));
    assert!(!reason.describe().contains("no resolvable signal source"));
}
