//! # Rule-Set Snapshots
//!
//! A [`RuleSet`] is a versioned snapshot of every jurisdiction tax rule in
//! force at a point in time. Its lifecycle is linear:
//!
//! ```text
//! Draft ──▶ Active ──▶ Archived (terminal)
//! ```
//!
//! Rules can be added only while the set is a draft. Publishing and
//! archiving are driven by the repository; after publish the set is never
//! mutated again, which is what makes a past session's calculation
//! re-derivable from its recorded `rule_set_id`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use salt_core::RuleSetId;

use crate::rule::{CompositeRule, RuleKey, WithholdingRule};

/// Lifecycle status of a rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSetStatus {
    /// Under construction; rules may still be added.
    Draft,
    /// The single rule set calculations run against.
    Active,
    /// Superseded; retained for audit reproducibility.
    Archived,
}

impl RuleSetStatus {
    /// Return the string representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

impl std::fmt::Display for RuleSetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by rule-set construction and lifecycle transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleSetError {
    /// A rule already exists for the key within this set.
    #[error("duplicate {kind} rule for {key} in rule set version {version}")]
    DuplicateRule {
        /// "withholding" or "composite".
        kind: &'static str,
        /// The colliding key, rendered as `ST/entity_type`.
        key: String,
        /// The rule-set version.
        version: u32,
    },

    /// The set is no longer a draft and cannot be modified.
    #[error("rule set version {version} is {status}, not draft; published sets are immutable")]
    NotDraft {
        /// The rule-set version.
        version: u32,
        /// The set's current status.
        status: RuleSetStatus,
    },

    /// An invalid lifecycle transition was attempted.
    #[error("invalid rule set transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: RuleSetStatus,
        /// Attempted target status.
        to: RuleSetStatus,
    },

    /// No rule set with the given identifier exists.
    #[error("rule set {id} not found")]
    NotFound {
        /// The identifier that was looked up.
        id: String,
    },
}

/// A versioned, immutable snapshot of withholding and composite tax rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    /// Unique identifier of this snapshot.
    pub id: RuleSetId,
    /// Monotonic version number assigned by the uploader.
    pub version: u32,
    /// The date the snapshot's rates take effect.
    pub effective_date: NaiveDate,
    /// Lifecycle status.
    status: RuleSetStatus,
    /// Withholding rules, at most one per key.
    withholding: BTreeMap<RuleKey, WithholdingRule>,
    /// Composite rules, at most one per key.
    composite: BTreeMap<RuleKey, CompositeRule>,
}

impl RuleSet {
    /// Create a new empty draft.
    pub fn draft(version: u32, effective_date: NaiveDate) -> Self {
        Self {
            id: RuleSetId::new(),
            version,
            effective_date,
            status: RuleSetStatus::Draft,
            withholding: BTreeMap::new(),
            composite: BTreeMap::new(),
        }
    }

    /// The set's lifecycle status.
    pub fn status(&self) -> RuleSetStatus {
        self.status
    }

    /// Add a withholding rule to a draft.
    ///
    /// Rejects duplicates for the rule's key and any mutation of a
    /// non-draft set.
    pub fn add_withholding_rule(&mut self, rule: WithholdingRule) -> Result<(), RuleSetError> {
        self.require_draft()?;
        let key = rule.key();
        if self.withholding.contains_key(&key) {
            return Err(RuleSetError::DuplicateRule {
                kind: "withholding",
                key: key.to_string(),
                version: self.version,
            });
        }
        self.withholding.insert(key, rule);
        Ok(())
    }

    /// Add a composite rule to a draft.
    ///
    /// Rejects duplicates for the rule's key and any mutation of a
    /// non-draft set.
    pub fn add_composite_rule(&mut self, rule: CompositeRule) -> Result<(), RuleSetError> {
        self.require_draft()?;
        let key = rule.key();
        if self.composite.contains_key(&key) {
            return Err(RuleSetError::DuplicateRule {
                kind: "composite",
                key: key.to_string(),
                version: self.version,
            });
        }
        self.composite.insert(key, rule);
        Ok(())
    }

    /// Look up the withholding rule for a key, if any.
    pub fn withholding_rule(&self, key: &RuleKey) -> Option<&WithholdingRule> {
        self.withholding.get(key)
    }

    /// Look up the composite rule for a key, if any.
    pub fn composite_rule(&self, key: &RuleKey) -> Option<&CompositeRule> {
        self.composite.get(key)
    }

    /// Total number of rules across both tables.
    pub fn rule_count(&self) -> usize {
        self.withholding.len() + self.composite.len()
    }

    /// Whether the set contains no rules.
    pub fn is_empty(&self) -> bool {
        self.withholding.is_empty() && self.composite.is_empty()
    }

    /// Transition `Draft → Active`. Called by the repository on publish.
    pub(crate) fn activate(&mut self) -> Result<(), RuleSetError> {
        match self.status {
            RuleSetStatus::Draft => {
                self.status = RuleSetStatus::Active;
                Ok(())
            }
            from => Err(RuleSetError::InvalidTransition {
                from,
                to: RuleSetStatus::Active,
            }),
        }
    }

    /// Transition `Active → Archived`. Called by the repository when a
    /// successor is published.
    pub(crate) fn archive(&mut self) -> Result<(), RuleSetError> {
        match self.status {
            RuleSetStatus::Active => {
                self.status = RuleSetStatus::Archived;
                Ok(())
            }
            from => Err(RuleSetError::InvalidTransition {
                from,
                to: RuleSetStatus::Archived,
            }),
        }
    }

    fn require_draft(&self) -> Result<(), RuleSetError> {
        if self.status != RuleSetStatus::Draft {
            return Err(RuleSetError::NotDraft {
                version: self.version,
                status: self.status,
            });
        }
        Ok(())
    }
}
