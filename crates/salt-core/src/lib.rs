//! # salt-core — Foundational Types for the SALT Calculation Stack
//!
//! This crate is the bedrock of the SALT (state and local tax) stack. It
//! defines the type-system primitives every other crate in the workspace
//! builds on; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `RuleSetId`,
//!    `DistributionId`, `SessionId`, `InvestorId`, `AuditId`, `Jurisdiction`
//!    — all newtypes with validated constructors. No bare strings or raw
//!    UUIDs for identifiers.
//!
//! 2. **Closed entity-type taxonomy.** One `EntityType` enum, exhaustive
//!    `match` everywhere. Adding an entity type forces every consumer to
//!    handle it.
//!
//! 3. **Exact decimal arithmetic.** All monetary amounts, rates, and
//!    thresholds are `rust_decimal::Decimal`. Binary floating point never
//!    touches money. Rounding happens only through the [`money`] module's
//!    two policies (4 dp stored, 2 dp displayed), never mid-calculation.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `salt-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod error;
pub mod identity;
pub mod jurisdiction;
pub mod money;

// Re-export primary types for ergonomic imports.
pub use error::SaltError;
pub use identity::{AuditId, DistributionId, InvestorId, RuleSetId, SessionId};
pub use jurisdiction::{EntityType, Jurisdiction};
pub use money::{round_display, round_internal};
