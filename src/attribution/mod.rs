// Historic Role Attribution
//
// Infers who acted in an organizational role before the role existed
// formally, from the share of their ticket activity that matches the
// role's signal.
//
// Scoring: score = coverage × min(totalTickets, volume_cap), filtered by
// per-role minimum coverage and minimum role tickets.

mod engine;
mod exclusion;

pub use engine::{AttributionEngine, Carrier, PersonActivity, RoleReport};
pub use exclusion::ExclusionList;
