//! # The Calculation Pipeline
//!
//! Free functions rather than an engine object: the rule set arrives as an
//! explicit parameter on every call, never as process-wide state, so tests
//! can inject rule sets deterministically and concurrent sessions can run
//! against different archived versions safely.
//!
//! The engine does not inspect the rule set's lifecycle status. Archived
//! sets must be replayable byte-for-byte for audit reproducibility;
//! answering "which set is active" is the repository's job, not the
//! engine's.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use salt_core::{round_internal, AuditId, DistributionId};
use salt_rules::{RuleKey, RuleSet};

use crate::audit::{CompositeStep, TaxCalculationAudit, WithholdingStep};
use crate::distribution::Distribution;
use crate::outcome::TaxOutcome;

/// Errors the engine can raise for a single row.
///
/// Business conditions (missing rules, unmet thresholds, exemptions) are
/// outcomes, not errors; only system-level arithmetic failure lands here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Decimal multiplication overflowed.
    #[error("decimal overflow computing {context} for {distribution_id}")]
    Arithmetic {
        /// Which product overflowed.
        context: &'static str,
        /// The row being calculated.
        distribution_id: DistributionId,
    },
}

/// The engine's output for one row: the updated distribution and its audit
/// record, produced atomically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowCalculation {
    /// The row with tax outputs populated.
    pub distribution: Distribution,
    /// The itemized audit trail for this pass.
    pub audit: TaxCalculationAudit,
}

/// The result of processing a batch of rows against one rule set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchCalculation {
    /// Per-row results, in input order. Failed rows are present with their
    /// error flagged in the audit record and the distribution unmodified.
    pub rows: Vec<RowCalculation>,
    /// Number of rows that failed with a system error.
    pub error_count: usize,
}

impl BatchCalculation {
    /// Whether any row failed with a system error.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

/// Calculate one row against a rule set, stamping the current time.
pub fn calculate(row: &Distribution, rule_set: &RuleSet) -> Result<RowCalculation, EngineError> {
    calculate_at(row, rule_set, Utc::now())
}

/// Calculate one row against a rule set at an explicit timestamp.
///
/// Pure function of its inputs: identical `(row, rule_set, now)` yield
/// byte-identical outputs.
pub fn calculate_at(
    row: &Distribution,
    rule_set: &RuleSet,
    now: DateTime<Utc>,
) -> Result<RowCalculation, EngineError> {
    if !row.jurisdiction.is_recognized() {
        tracing::warn!(
            distribution = %row.id,
            jurisdiction = %row.jurisdiction,
            "unrecognized jurisdiction code; no rules applicable"
        );
    }

    let composite = evaluate_composite(row, rule_set)?;
    let withholding = evaluate_withholding(row, rule_set)?;

    tracing::debug!(
        distribution = %row.id,
        composite = %composite.outcome,
        withholding = %withholding.outcome,
        "calculated distribution row"
    );

    let mut updated = row.clone();
    updated.composite_tax = composite.outcome.amount();
    updated.withholding_tax = withholding.outcome.amount();
    updated.tax_calculation_applied =
        composite.outcome.is_calculated() || withholding.outcome.is_calculated();
    updated.exemption_reason = exemption_reason(row, &composite.outcome, &withholding.outcome);
    updated.calculation_timestamp = Some(now);
    updated.rule_set_id = Some(rule_set.id);

    let audit = TaxCalculationAudit {
        audit_id: audit_id_for_pass(row, rule_set, now),
        distribution_id: row.id,
        rule_set_id: Some(rule_set.id),
        composite,
        withholding,
        error: None,
        calculated_at: now,
    };

    Ok(RowCalculation {
        distribution: updated,
        audit,
    })
}

/// Derive the audit id for one pass from `(row, rule set, timestamp)`.
///
/// Identical passes must reproduce the original audit record byte for
/// byte; a randomly minted id would make every replay differ.
fn audit_id_for_pass(row: &Distribution, rule_set: &RuleSet, now: DateTime<Utc>) -> AuditId {
    let mut material = Vec::with_capacity(40);
    material.extend_from_slice(row.id.as_uuid().as_bytes());
    material.extend_from_slice(rule_set.id.as_uuid().as_bytes());
    material.extend_from_slice(&now.timestamp_nanos_opt().unwrap_or_default().to_be_bytes());
    AuditId::derive(&material)
}

/// Process a batch of rows with per-row failure isolation.
///
/// A row that fails with a system error is flagged in its audit record and
/// passed through unmodified; the remaining rows continue. Rows are
/// independent, so callers may equally shard a batch across threads — each
/// invocation only reads the shared immutable rule set.
pub fn calculate_batch(rows: &[Distribution], rule_set: &RuleSet) -> BatchCalculation {
    let now = Utc::now();
    let mut out = Vec::with_capacity(rows.len());
    let mut error_count = 0;

    for row in rows {
        match calculate_at(row, rule_set, now) {
            Ok(result) => out.push(result),
            Err(err) => {
                tracing::warn!(
                    distribution = %row.id,
                    error = %err,
                    "row failed with system error; continuing batch"
                );
                error_count += 1;
                out.push(RowCalculation {
                    distribution: row.clone(),
                    audit: TaxCalculationAudit {
                        audit_id: audit_id_for_pass(row, rule_set, now),
                        distribution_id: row.id,
                        rule_set_id: Some(rule_set.id),
                        composite: CompositeStep::skipped(TaxOutcome::NotApplicable),
                        withholding: WithholdingStep::skipped(TaxOutcome::NotApplicable),
                        error: Some(err.to_string()),
                        calculated_at: now,
                    },
                });
            }
        }
    }

    BatchCalculation {
        rows: out,
        error_count,
    }
}

/// Step 1 + 2: exemption check, then composite tax.
///
/// Exemption precedence: the explicit legacy flag is checked before the
/// computed jurisdiction-mismatch; when both could apply, the flag is the
/// recorded reason.
fn evaluate_composite(row: &Distribution, rule_set: &RuleSet) -> Result<CompositeStep, EngineError> {
    if row.composite_exemption {
        return Ok(CompositeStep::skipped(TaxOutcome::ExemptByFlag));
    }
    if row.jurisdiction != row.tax_residency {
        return Ok(CompositeStep::skipped(TaxOutcome::ExemptByJurisdictionMismatch));
    }

    // Recognition only gates rule lookup; exemptions above still apply to
    // rows carrying unrecognized codes.
    if !row.jurisdiction.is_recognized() {
        return Ok(CompositeStep::skipped(TaxOutcome::NotApplicable));
    }

    let key = RuleKey::new(row.jurisdiction, row.entity_type);
    let Some(rule) = rule_set.composite_rule(&key) else {
        return Ok(CompositeStep::skipped(TaxOutcome::NotApplicable));
    };

    // Computed on full precision, rounded once at the storage boundary.
    // The amount is recorded in the audit step whether or not the gate
    // lets it apply.
    let computed = row
        .amount
        .checked_mul(rule.tax_rate)
        .map(round_internal)
        .ok_or(EngineError::Arithmetic {
            context: "composite tax",
            distribution_id: row.id,
        })?;

    let income_threshold_met = row.amount >= rule.income_threshold;
    let applies = rule.mandatory_filing || income_threshold_met;
    let outcome = if applies {
        TaxOutcome::Calculated(computed)
    } else {
        TaxOutcome::NotApplicable
    };

    Ok(CompositeStep {
        rule_matched: Some(key),
        rate: Some(rule.tax_rate),
        mandatory_filing: Some(rule.mandatory_filing),
        income_threshold_met: Some(income_threshold_met),
        computed_amount: Some(computed),
        outcome,
    })
}

/// Step 1 + 3: exemption check, then withholding tax.
///
/// Double inclusive gate: `amount ≥ income_threshold` AND
/// `amount × rate ≥ tax_threshold`. The income gate short-circuits before
/// the tax amount is computed.
fn evaluate_withholding(
    row: &Distribution,
    rule_set: &RuleSet,
) -> Result<WithholdingStep, EngineError> {
    if row.withholding_exemption {
        return Ok(WithholdingStep::skipped(TaxOutcome::ExemptByFlag));
    }
    if row.jurisdiction != row.tax_residency {
        return Ok(WithholdingStep::skipped(TaxOutcome::ExemptByJurisdictionMismatch));
    }

    if !row.jurisdiction.is_recognized() {
        return Ok(WithholdingStep::skipped(TaxOutcome::NotApplicable));
    }

    let key = RuleKey::new(row.jurisdiction, row.entity_type);
    let Some(rule) = rule_set.withholding_rule(&key) else {
        return Ok(WithholdingStep::skipped(TaxOutcome::NotApplicable));
    };

    let income_threshold_met = row.amount >= rule.income_threshold;
    if !income_threshold_met {
        return Ok(WithholdingStep {
            rule_matched: Some(key),
            rate: Some(rule.tax_rate),
            income_threshold_met: Some(false),
            tax_threshold_met: None,
            computed_amount: None,
            outcome: TaxOutcome::NotApplicable,
        });
    }

    let computed = row
        .amount
        .checked_mul(rule.tax_rate)
        .map(round_internal)
        .ok_or(EngineError::Arithmetic {
            context: "withholding tax",
            distribution_id: row.id,
        })?;

    let tax_threshold_met = computed >= rule.tax_threshold;
    let outcome = if tax_threshold_met {
        TaxOutcome::Calculated(computed)
    } else {
        TaxOutcome::NotApplicable
    };

    Ok(WithholdingStep {
        rule_matched: Some(key),
        rate: Some(rule.tax_rate),
        income_threshold_met: Some(true),
        tax_threshold_met: Some(tax_threshold_met),
        computed_amount: Some(computed),
        outcome,
    })
}

fn exemption_reason(
    row: &Distribution,
    composite: &TaxOutcome,
    withholding: &TaxOutcome,
) -> Option<String> {
    let mut parts = Vec::new();
    for (label, outcome) in [("composite", composite), ("withholding", withholding)] {
        match outcome {
            TaxOutcome::ExemptByFlag => {
                parts.push(format!("{label}: legacy exemption flag"));
            }
            TaxOutcome::ExemptByJurisdictionMismatch => {
                parts.push(format!(
                    "{label}: jurisdiction {} does not match tax residency {}",
                    row.jurisdiction, row.tax_residency
                ));
            }
            TaxOutcome::NotApplicable | TaxOutcome::Calculated(_) => {}
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}
