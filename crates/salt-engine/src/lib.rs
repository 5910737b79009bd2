//! # salt-engine — Jurisdiction Tax Calculation Engine
//!
//! The core of the SALT stack: takes one parsed [`Distribution`] row plus a
//! versioned [`RuleSet`](salt_rules::RuleSet) and deterministically derives
//! composite and withholding tax amounts through an ordered
//! exemption → composite → withholding pipeline, producing both the updated
//! row and a full [`TaxCalculationAudit`] record.
//!
//! ## Pipeline stages
//!
//! 1. **Exemption check** — evaluated independently per tax type. An
//!    explicit legacy exemption flag, or a mismatch between the row's
//!    jurisdiction and the investor's tax residency, exempts that tax type
//!    and short-circuits its remaining steps.
//!
//! 2. **Composite tax** — single inclusive income-threshold gate, bypassed
//!    entirely where the state mandates composite filing.
//!
//! 3. **Withholding tax** — double inclusive gate: the row amount must
//!    reach the income threshold AND the computed tax must reach the tax
//!    threshold.
//!
//! ## Determinism
//!
//! The engine is a pure function of `(row, rule set, timestamp)`: no
//! internal state, no I/O, no locking. Identical inputs always yield
//! identical outputs, which is what makes a past session re-derivable from
//! its archived rule set for audit review. Batches are embarrassingly
//! parallel — every row only reads the shared, immutable rule set.
//!
//! ## Failure model
//!
//! Rule-missing is not an error; it is recorded as "not applicable".
//! Arithmetic failure (decimal overflow) is fatal for that row only: batch
//! processing flags the row in its audit record and continues with the
//! rest.

pub mod audit;
pub mod distribution;
pub mod engine;
pub mod legacy;
pub mod outcome;

// Re-export primary types.
pub use audit::{CompositeStep, TaxCalculationAudit, WithholdingStep};
pub use distribution::Distribution;
pub use engine::{calculate, calculate_at, calculate_batch, BatchCalculation, EngineError, RowCalculation};
pub use legacy::apply_legacy_exemptions;
pub use outcome::TaxOutcome;
