//! # Tax Calculation Audit Records
//!
//! One [`TaxCalculationAudit`] is produced per distribution row per
//! calculation pass, atomically with the row's tax outputs, and is
//! immutable once written. It records, per step, whether the step applied,
//! which rule row (if any) was matched, the rate used, each threshold check
//! performed and its verdict, and the resulting amount — enough for a
//! compliance reviewer to re-derive the calculation by hand.
//!
//! A matched rule is referenced by `(rule_set_id, key)`: rule sets hold at
//! most one rule of each kind per key, so the pair addresses the exact rule
//! row.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use salt_core::{AuditId, DistributionId, RuleSetId};
use salt_rules::RuleKey;

use crate::outcome::TaxOutcome;

/// Audit record for the composite-tax step.
///
/// `computed_amount` is recorded whenever a rule matched, regardless of
/// whether the threshold gate let it apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeStep {
    /// The rule that matched, if any.
    pub rule_matched: Option<RuleKey>,
    /// The matched rule's rate.
    pub rate: Option<Decimal>,
    /// The matched rule's mandatory-filing flag.
    pub mandatory_filing: Option<bool>,
    /// Verdict of `amount ≥ income_threshold` (inclusive).
    pub income_threshold_met: Option<bool>,
    /// The computed amount (4 dp), recorded even when the gate failed.
    pub computed_amount: Option<Decimal>,
    /// Final outcome for this tax type.
    pub outcome: TaxOutcome,
}

impl CompositeStep {
    /// A step that never reached rule lookup (exempt or unrecognized row).
    pub fn skipped(outcome: TaxOutcome) -> Self {
        Self {
            rule_matched: None,
            rate: None,
            mandatory_filing: None,
            income_threshold_met: None,
            computed_amount: None,
            outcome,
        }
    }
}

/// Audit record for the withholding-tax step.
///
/// The income gate short-circuits: when it fails, no tax amount is computed
/// and `tax_threshold_met` stays `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithholdingStep {
    /// The rule that matched, if any.
    pub rule_matched: Option<RuleKey>,
    /// The matched rule's rate.
    pub rate: Option<Decimal>,
    /// Verdict of `amount ≥ income_threshold` (inclusive).
    pub income_threshold_met: Option<bool>,
    /// Verdict of `computed tax ≥ tax_threshold` (inclusive); `None` when
    /// the income gate short-circuited.
    pub tax_threshold_met: Option<bool>,
    /// The computed amount (4 dp), when the income gate passed.
    pub computed_amount: Option<Decimal>,
    /// Final outcome for this tax type.
    pub outcome: TaxOutcome,
}

impl WithholdingStep {
    /// A step that never reached rule lookup (exempt or unrecognized row).
    pub fn skipped(outcome: TaxOutcome) -> Self {
        Self {
            rule_matched: None,
            rate: None,
            income_threshold_met: None,
            tax_threshold_met: None,
            computed_amount: None,
            outcome,
        }
    }
}

/// The itemized audit trail for one row's calculation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxCalculationAudit {
    /// Record identifier, derived deterministically from the pass inputs
    /// so an identical pass reproduces an identical record.
    pub audit_id: AuditId,
    /// The row this record belongs to (one-to-one per pass).
    pub distribution_id: DistributionId,
    /// The rule set the calculation ran against.
    pub rule_set_id: Option<RuleSetId>,
    /// Step 2 record.
    pub composite: CompositeStep,
    /// Step 3 record.
    pub withholding: WithholdingStep,
    /// Set when the row failed with a system error (overflow); the batch
    /// continues without it.
    pub error: Option<String>,
    /// When the calculation was performed.
    pub calculated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_steps_carry_only_the_outcome() {
        let step = CompositeStep::skipped(TaxOutcome::ExemptByFlag);
        assert_eq!(step.rule_matched, None);
        assert_eq!(step.rate, None);
        assert_eq!(step.computed_amount, None);
        assert_eq!(step.outcome, TaxOutcome::ExemptByFlag);

        let step = WithholdingStep::skipped(TaxOutcome::NotApplicable);
        assert_eq!(step.tax_threshold_met, None);
        assert_eq!(step.outcome, TaxOutcome::NotApplicable);
    }
}
