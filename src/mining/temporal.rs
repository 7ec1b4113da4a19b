// Temporal correlation of monthly ticket volumes
//
// Each service gets a monthly series over calendar months. A pair is
// compared only over the window both services were active in; months
// without tickets inside that window count as zero.

use crate::ledger::TicketLedger;
use serde::Serialize;
use std::collections::BTreeMap;

/// Descriptive interpretation band of a correlation coefficient
///
/// Bands describe results; they never filter them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    /// r > 0.5
    Strong,
    /// 0.3 ≤ r ≤ 0.5
    Moderate,
    /// -0.3 ≤ r < 0.3
    Weak,
    /// r < -0.3
    Substitutive,
}

impl Band {
    pub fn classify(r: f64) -> Self {
        if r > 0.5 {
            Band::Strong
        } else if r >= 0.3 {
            Band::Moderate
        } else if r >= -0.3 {
            Band::Weak
        } else {
            Band::Substitutive
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalCorrelation {
    pub service_a: String,
    pub service_b: String,
    /// Pearson r in [-1, 1]
    pub correlation: f64,
    /// Months in the overlap window
    pub months: usize,
    pub band: Band,
}

/// Correlations with r > 0
pub fn positive(correlations: &[TemporalCorrelation]) -> Vec<&TemporalCorrelation> {
    correlations.iter().filter(|c| c.correlation > 0.0).collect()
}

/// Correlations with r < 0, most negative first
pub fn negative(correlations: &[TemporalCorrelation]) -> Vec<&TemporalCorrelation> {
    let mut out: Vec<&TemporalCorrelation> =
        correlations.iter().filter(|c| c.correlation < 0.0).collect();
    out.reverse();
    out
}

/// Monthly ticket counts of one service, keyed by month index
#[derive(Debug, Clone, Default)]
struct MonthlySeries {
    counts: BTreeMap<i64, usize>,
}

impl MonthlySeries {
    fn first(&self) -> Option<i64> {
        self.counts.keys().next().copied()
    }

    fn last(&self) -> Option<i64> {
        self.counts.keys().next_back().copied()
    }

    /// Zero-filled values over `[from, to]`
    fn window(&self, from: i64, to: i64) -> Vec<f64> {
        (from..=to)
            .map(|m| self.counts.get(&m).copied().unwrap_or(0) as f64)
            .collect()
    }
}

fn monthly_series(ledger: &TicketLedger) -> BTreeMap<&str, MonthlySeries> {
    let mut series: BTreeMap<&str, MonthlySeries> = BTreeMap::new();
    for ticket in ledger.tickets() {
        if let Some(service) = &ticket.service {
            *series
                .entry(service.as_str())
                .or_default()
                .counts
                .entry(ticket.month().index())
                .or_default() += 1;
        }
    }
    series
}

/// Pearson correlation coefficient
///
/// `None` for mismatched or empty inputs and when either series is
/// constant (zero variance).
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.is_empty() {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Correlations for every service pair with enough overlapping months
///
/// Sorted by correlation descending, then by service names.
pub fn temporal_correlations(
    ledger: &TicketLedger,
    min_overlap_months: usize,
) -> Vec<TemporalCorrelation> {
    let series = monthly_series(ledger);
    let services: Vec<(&str, &MonthlySeries)> = series.iter().map(|(s, m)| (*s, m)).collect();

    let mut out = Vec::new();
    for (i, (name_a, a)) in services.iter().enumerate() {
        for (name_b, b) in &services[i + 1..] {
            let (Some(first_a), Some(last_a), Some(first_b), Some(last_b)) =
                (a.first(), a.last(), b.first(), b.last())
            else {
                continue;
            };
            let from = first_a.max(first_b);
            let to = last_a.min(last_b);
            if to < from {
                continue;
            }
            let months = (to - from + 1) as usize;
            if months < min_overlap_months {
                continue;
            }

            if let Some(r) = pearson(&a.window(from, to), &b.window(from, to)) {
                out.push(TemporalCorrelation {
                    service_a: name_a.to_string(),
                    service_b: name_b.to_string(),
                    correlation: r,
                    months,
                    band: Band::classify(r),
                });
            }
        }
    }

    out.sort_by(|x, y| {
        y.correlation
            .total_cmp(&x.correlation)
            .then_with(|| x.service_a.cmp(&y.service_a))
            .then_with(|| x.service_b.cmp(&y.service_b))
    });
    out
}
