//! Output document consumed by the presentation layer
//!
//! One JSON document per refresh. Every list is sorted with total
//! tie-breaks and every map is ordered, so identical input produces
//! byte-identical output.

use crate::attribution::RoleReport;
use crate::error::{AnalyticsError, Result};
use crate::mining::{negative, positive, CrossReferences};
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Identifier of the document layout
pub const FORMAT: &str = "rolemine-json-v1";

/// A role whose signal could not be resolved, reported once
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationError {
    pub role: String,
    pub message: String,
}

/// Run statistics and provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub version: String,
    pub format: String,
    pub snapshot: String,
    /// SHA-256 of the raw ticket input
    pub input_digest: String,
    pub tickets_read: usize,
    pub tickets_skipped: usize,
    /// Tickets carrying a service after enrichment
    pub tickets_matched: usize,
    pub revenue_skipped: usize,
    pub staff_skipped: usize,
    pub configuration_errors: Vec<ConfigurationError>,
}

/// The complete analytics document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub meta: Meta,
    pub historic_roles: Vec<RoleReport>,
    pub cross_references: CrossReferences,
}

impl AnalyticsReport {
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let text = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        let mut text = text.map_err(|e| AnalyticsError::parse("report", e))?;
        text.push('\n');
        Ok(text)
    }

    /// Human-readable summary
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let meta = &self.meta;
        let _ = writeln!(out, "rolemine {} ({})", meta.version, meta.format);
        if !meta.snapshot.is_empty() {
            let _ = writeln!(out, "Snapshot: {}", meta.snapshot);
        }
        let _ = writeln!(
            out,
            "Tickets: {} read, {} skipped, {} matched to a service",
            meta.tickets_read, meta.tickets_skipped, meta.tickets_matched
        );
        for error in &meta.configuration_errors {
            let _ = writeln!(out, "Configuration error in {}: {}", error.role, error.message);
        }

        let _ = writeln!(out, "\nHistoric roles:");
        for role in &self.historic_roles {
            if !role.observable {
                let _ = writeln!(
                    out,
                    "  {} ({}): not observable{}",
                    role.role,
                    role.unit,
                    role.non_observable_reason
                        .as_deref()
                        .map(|r| format!(" - {}", r))
                        .unwrap_or_default()
                );
                continue;
            }
            let _ = writeln!(
                out,
                "  {} ({}): {} carriers",
                role.role,
                role.unit,
                role.historic_carriers.len()
            );
            for carrier in &role.historic_carriers {
                let _ = writeln!(out, "    {}", carrier);
            }
        }

        let refs = &self.cross_references;
        let stats = &refs.stats;
        let _ = writeln!(out, "\nCross references:");
        let _ = writeln!(out, "  Cooccurrence edges:    {}", stats.cooccurrence_edges);
        let _ = writeln!(
            out,
            "  Temporal correlations: {} ({} positive, {} negative)",
            stats.temporal_correlations,
            positive(&refs.temporal_correlations).len(),
            negative(&refs.temporal_correlations).len()
        );
        let _ = writeln!(out, "  Team overlap pairs:    {}", stats.team_overlap_pairs);
        let _ = writeln!(out, "  Customers analyzed:    {}", stats.customers_analyzed);
        let _ = writeln!(out, "  Dependency chains:     {}", stats.dependency_chains);
        let _ = writeln!(
            out,
            "  Revenue linked:        {} services ({} unmapped cost groups)",
            stats.revenue_linked, stats.unmapped_cost_groups
        );
        out
    }
}

/// Replace `path` with the serialized report
///
/// The document is fully serialized first and written to a temporary file
/// next to the target, which is then renamed over it. On any failure the
/// previous document stays untouched.
pub fn write_atomic(report: &AnalyticsReport, path: &Path, pretty: bool) -> Result<()> {
    let text = report.to_json(pretty)?;
    replace_file(path, &text)?;
    info!(path = %path.display(), bytes = text.len(), "Wrote analytics report");
    Ok(())
}

/// Write `contents` to a temporary file beside `path` and rename it over `path`
pub fn replace_file(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let write_err = |message: String| AnalyticsError::Write {
        path: path.to_path_buf(),
        message,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| write_err(e.to_string()))?;
    tmp.write_all(contents.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| write_err(e.to_string()))?;
    tmp.persist(path).map_err(|e| write_err(e.error.to_string()))?;
    Ok(())
}
