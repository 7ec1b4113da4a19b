use super::{ActiveSource, NonObservableReason, ResolvedRole, RoleSignal, SignalIssue};
use crate::config::{
    Precedence, RoleDefinition, ServiceCatalog, SignalKind, SignalSourceSpec,
};
use regex::{Regex, RegexSetBuilder};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Outcome of resolving one role, with every problem found on the way
#[derive(Debug, Clone)]
pub struct Resolution {
    pub resolved: ResolvedRole,
    pub issues: Vec<SignalIssue>,
}

/// Compiles curated signal sources into executable role signals
#[derive(Debug, Clone, Copy)]
pub struct SignalResolver<'a> {
    catalog: &'a ServiceCatalog,
}

impl<'a> SignalResolver<'a> {
    pub fn new(catalog: &'a ServiceCatalog) -> Self {
        Self { catalog }
    }

    /// Decide observability of `role` and compile its signal
    ///
    /// Roles curated as not observable resolve without a signal. For the
    /// rest, unknown services/projects and invalid keyword patterns are
    /// dropped and reported; a role left without any usable source is
    /// non-observable.
    pub fn resolve(&self, role: &RoleDefinition) -> Resolution {
        if !role.observable {
            return Resolution {
                resolved: ResolvedRole::NonObservable {
                    reason: NonObservableReason::Curated,
                },
                issues: Vec::new(),
            };
        }

        let mut issues = Vec::new();
        let mut resolved: Vec<ActiveSource> = Vec::new();
        for spec in &role.signals {
            if let Some(source) = self.compile_source(spec, &mut issues) {
                resolved.push(source);
            }
        }

        let thresholds = match role.thresholds {
            Some(t) if !resolved.is_empty() => t,
            thresholds => {
                if resolved.is_empty() {
                    issues.push(SignalIssue::NoSignal);
                }
                if thresholds.is_none() {
                    issues.push(SignalIssue::MissingThresholds);
                }
                warn!(role = %role.id, issues = issues.len(), "Role has no resolvable signal");
                return Resolution {
                    resolved: ResolvedRole::NonObservable {
                        reason: NonObservableReason::Unresolvable(issues.clone()),
                    },
                    issues,
                };
            }
        };

        let (active, suppressed) = match role.precedence {
            Precedence::Union => (resolved, Vec::new()),
            Precedence::MostSpecific => {
                let mut rest = resolved;
                let first = rest.remove(0);
                let suppressed = rest.iter().map(ActiveSource::kind).collect();
                (vec![first], suppressed)
            }
        };

        debug!(
            role = %role.id,
            active = active.len(),
            suppressed = suppressed.len(),
            "Resolved role signal"
        );

        Resolution {
            resolved: ResolvedRole::Observable(RoleSignal::new(
                active,
                suppressed,
                role.precedence,
                thresholds,
            )),
            issues,
        }
    }

    fn compile_source(
        &self,
        spec: &SignalSourceSpec,
        issues: &mut Vec<SignalIssue>,
    ) -> Option<ActiveSource> {
        let values = spec
            .values
            .iter()
            .map(|v| v.trim())
            .filter(|v| !v.is_empty());

        let source = match spec.kind {
            SignalKind::Services => {
                let mut known = BTreeSet::new();
                for name in values {
                    if self.catalog.has_service(name) {
                        known.insert(name.to_string());
                    } else {
                        issues.push(SignalIssue::UnknownService(name.to_string()));
                    }
                }
                (!known.is_empty()).then_some(ActiveSource::Services(known))
            }
            SignalKind::Projects => {
                let mut known = BTreeSet::new();
                for key in values {
                    if self.catalog.has_project(key) {
                        known.insert(key.to_string());
                    } else {
                        issues.push(SignalIssue::UnknownProject(key.to_string()));
                    }
                }
                (!known.is_empty()).then_some(ActiveSource::Projects(known))
            }
            SignalKind::Keywords => {
                let mut valid = Vec::new();
                for pattern in values {
                    match Regex::new(pattern) {
                        Ok(_) => valid.push(pattern.to_string()),
                        Err(e) => issues.push(SignalIssue::InvalidKeyword {
                            pattern: pattern.to_string(),
                            message: e.to_string(),
                        }),
                    }
                }
                if valid.is_empty() {
                    None
                } else {
                    match RegexSetBuilder::new(&valid).case_insensitive(true).build() {
                        Ok(set) => Some(ActiveSource::Keywords {
                            patterns: valid,
                            set,
                        }),
                        Err(e) => {
                            issues.push(SignalIssue::InvalidKeyword {
                                pattern: valid.join("|"),
                                message: e.to_string(),
                            });
                            None
                        }
                    }
                }
            }
        };

        if source.is_none() {
            issues.push(SignalIssue::EmptySource(spec.kind));
        }
        source
    }
}
