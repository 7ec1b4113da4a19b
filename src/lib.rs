//! rolemine - historic role attribution and relationship mining
//!
//! A batch transform over one analytics snapshot. It infers which people
//! historically acted in an organizational role before the role existed
//! formally, and mines relationships between services, customers and
//! revenue groups from ticket activity.
//!
//! ```no_run
//! use rolemine::config::AnalyticsConfig;
//! use rolemine::ledger::TicketLedger;
//! use rolemine::pipeline::{run, BatchInput};
//!
//! let config = AnalyticsConfig::embedded_default()?;
//! let ledger = TicketLedger::from_json_path("tickets.json")?;
//! let report = run(&BatchInput::new(ledger, config))?;
//! println!("{}", report.render_text());
//! # Ok::<(), rolemine::error::AnalyticsError>(())
//! ```

pub mod attribution;
pub mod cli;
pub mod config;
pub mod error;
pub mod ledger;
pub mod matcher;
pub mod mining;
pub mod pipeline;
pub mod report;
pub mod signal;
