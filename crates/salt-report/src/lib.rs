//! # salt-report — Session Summaries
//!
//! Sums engine outputs into session-level summaries for display and
//! export. Totals are grouped per jurisdiction in a `BTreeMap`, so line
//! items come out in a deterministic order, and are rounded to display
//! precision (2 dp) here — the stored row amounts keep their 4 dp.

pub mod summary;

pub use summary::{summarize, JurisdictionTotals, SessionStatus, SessionSummary};
