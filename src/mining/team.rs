use crate::attribution::ExclusionList;
use crate::ledger::TicketLedger;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Assignee overlap between two services
///
/// Absolute and relative overlap are reported together: the count is
/// collaboration volume, the ratio is how far the smaller team is
/// contained in the larger one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamOverlap {
    pub service_a: String,
    pub service_b: String,
    pub shared_members: usize,
    pub members_a: usize,
    pub members_b: usize,
    /// `shared_members / min(members_a, members_b)`
    pub overlap_ratio: f64,
}

/// Team overlap for every service pair with at least one shared member
///
/// Excluded accounts are not team members. Sorted by shared members
/// descending, ratio descending, then names.
pub fn team_overlap(ledger: &TicketLedger, exclusions: &ExclusionList) -> Vec<TeamOverlap> {
    let mut members: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for ticket in ledger.tickets() {
        if let (Some(service), Some(assignee)) = (&ticket.service, &ticket.assignee) {
            if !exclusions.is_excluded(assignee) {
                members
                    .entry(service.as_str())
                    .or_default()
                    .insert(assignee.as_str());
            }
        }
    }

    let services: Vec<(&str, &BTreeSet<&str>)> = members.iter().map(|(s, m)| (*s, m)).collect();
    let mut out = Vec::new();
    for (i, (name_a, team_a)) in services.iter().enumerate() {
        for (name_b, team_b) in &services[i + 1..] {
            let shared = team_a.intersection(team_b).count();
            if shared == 0 {
                continue;
            }
            let smaller = team_a.len().min(team_b.len());
            out.push(TeamOverlap {
                service_a: name_a.to_string(),
                service_b: name_b.to_string(),
                shared_members: shared,
                members_a: team_a.len(),
                members_b: team_b.len(),
                overlap_ratio: shared as f64 / smaller as f64,
            });
        }
    }

    out.sort_by(|x, y| {
        y.shared_members
            .cmp(&x.shared_members)
            .then_with(|| y.overlap_ratio.total_cmp(&x.overlap_ratio))
            .then_with(|| x.service_a.cmp(&y.service_a))
            .then_with(|| x.service_b.cmp(&y.service_b))
    });
    out
}
