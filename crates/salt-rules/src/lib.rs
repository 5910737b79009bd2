//! # salt-rules — Versioned Jurisdiction Tax Rules
//!
//! Models the rule side of the SALT calculation pipeline:
//!
//! - [`WithholdingRule`] and [`CompositeRule`] — one rule of each kind at
//!   most per `(jurisdiction, entity type)` key, held in `BTreeMap`s so
//!   iteration order is deterministic.
//!
//! - [`RuleSet`] — an immutable, versioned snapshot of both rule tables.
//!   Rules can only be added while the set is a draft; publishing freezes
//!   it permanently.
//!
//! - [`RuleSetRepository`] — holds every known rule-set version and
//!   enforces the invariant that exactly one set is active at a time.
//!   Publishing a draft archives its predecessor in the same step, and
//!   archived sets stay retrievable forever so any past session's
//!   calculation can be re-derived against the set that was active when it
//!   ran.

pub mod repository;
pub mod rule;
pub mod ruleset;

// Re-export primary types.
pub use repository::RuleSetRepository;
pub use rule::{CompositeRule, RuleKey, WithholdingRule};
pub use ruleset::{RuleSet, RuleSetError, RuleSetStatus};
