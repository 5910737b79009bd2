//! # Session Summary Aggregation

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use salt_core::{round_display, Jurisdiction, SessionId};
use salt_engine::RowCalculation;

/// Per-jurisdiction totals for a session, at display precision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionTotals {
    /// Sum of composite tax across the jurisdiction's rows.
    pub composite_total: Decimal,
    /// Sum of withholding tax across the jurisdiction's rows.
    pub withholding_total: Decimal,
    /// Number of rows sourced to the jurisdiction.
    pub row_count: usize,
}

/// The user-facing disposition of a calculation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Every row processed without a system error.
    FullyCalculated,
    /// Some rows failed with system errors; the rest were calculated.
    CalculatedWithErrors {
        /// Number of failed rows.
        failed_rows: usize,
    },
    /// No row produced a calculated amount.
    NothingCalculated,
}

/// A session-level rollup of engine outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// The session being summarized.
    pub session_id: SessionId,
    /// Total rows in the session.
    pub row_count: usize,
    /// Rows where at least one tax amount was calculated.
    pub calculated_count: usize,
    /// Rows with at least one recorded exemption.
    pub exempt_count: usize,
    /// Rows that failed with a system error.
    pub error_count: usize,
    /// Per-jurisdiction totals, display-rounded, in code order.
    pub jurisdictions: BTreeMap<Jurisdiction, JurisdictionTotals>,
    /// Grand total of composite tax, display-rounded.
    pub composite_total: Decimal,
    /// Grand total of withholding tax, display-rounded.
    pub withholding_total: Decimal,
    /// User-facing session disposition.
    pub status: SessionStatus,
}

/// Summarize a session's engine outputs.
///
/// `error_count` comes from the batch result; failed rows are present in
/// `rows` with their audit error flagged and contribute to counts but not
/// totals (their tax fields are null).
pub fn summarize(session_id: SessionId, rows: &[RowCalculation], error_count: usize) -> SessionSummary {
    let mut jurisdictions: BTreeMap<Jurisdiction, JurisdictionTotals> = BTreeMap::new();
    let mut calculated_count = 0;
    let mut exempt_count = 0;
    let mut composite_total = Decimal::ZERO;
    let mut withholding_total = Decimal::ZERO;

    for row in rows {
        let d = &row.distribution;
        let entry = jurisdictions.entry(d.jurisdiction).or_default();
        entry.row_count += 1;

        if let Some(tax) = d.composite_tax {
            entry.composite_total += tax;
            composite_total += tax;
        }
        if let Some(tax) = d.withholding_tax {
            entry.withholding_total += tax;
            withholding_total += tax;
        }
        if d.tax_calculation_applied {
            calculated_count += 1;
        }
        if row.audit.composite.outcome.is_exempt() || row.audit.withholding.outcome.is_exempt() {
            exempt_count += 1;
        }
    }

    // Rounding happens once, after summation, so per-row 4 dp amounts
    // cannot drift the session totals.
    for totals in jurisdictions.values_mut() {
        totals.composite_total = round_display(totals.composite_total);
        totals.withholding_total = round_display(totals.withholding_total);
    }

    let status = if error_count > 0 {
        SessionStatus::CalculatedWithErrors {
            failed_rows: error_count,
        }
    } else if calculated_count == 0 {
        SessionStatus::NothingCalculated
    } else {
        SessionStatus::FullyCalculated
    };

    SessionSummary {
        session_id,
        row_count: rows.len(),
        calculated_count,
        exempt_count,
        error_count,
        jurisdictions,
        composite_total: round_display(composite_total),
        withholding_total: round_display(withholding_total),
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use salt_core::{EntityType, InvestorId};
    use salt_engine::{calculate_batch, Distribution};
    use salt_rules::{CompositeRule, RuleSet, WithholdingRule};

    fn j(code: &str) -> Jurisdiction {
        Jurisdiction::parse(code).unwrap()
    }

    fn rule_set() -> RuleSet {
        let mut set = RuleSet::draft(1, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        set.add_composite_rule(CompositeRule {
            jurisdiction: j("TX"),
            entity_type: EntityType::Partnership,
            tax_rate: dec!(0.07),
            income_threshold: dec!(50000),
            mandatory_filing: false,
        })
        .unwrap();
        set.add_withholding_rule(WithholdingRule {
            jurisdiction: j("TX"),
            entity_type: EntityType::Partnership,
            tax_rate: dec!(0.05),
            income_threshold: dec!(25000),
            tax_threshold: dec!(1000),
        })
        .unwrap();
        set.add_composite_rule(CompositeRule {
            jurisdiction: j("CA"),
            entity_type: EntityType::Partnership,
            tax_rate: dec!(0.093),
            income_threshold: dec!(0),
            mandatory_filing: true,
        })
        .unwrap();
        set
    }

    fn row(session: SessionId, state: &str, amount: Decimal) -> Distribution {
        Distribution::new(
            session,
            InvestorId::new(),
            j(state),
            EntityType::Partnership,
            amount,
            j(state),
        )
    }

    #[test]
    fn summary_groups_totals_by_jurisdiction() {
        let session = SessionId::new();
        let rows = vec![
            row(session, "TX", dec!(100000.00)),
            row(session, "TX", dec!(60000.00)),
            row(session, "CA", dec!(10000.00)),
        ];
        let batch = calculate_batch(&rows, &rule_set());
        let summary = summarize(session, &batch.rows, batch.error_count);

        assert_eq!(summary.row_count, 3);
        assert_eq!(summary.calculated_count, 3);
        assert_eq!(summary.error_count, 0);
        assert_eq!(summary.status, SessionStatus::FullyCalculated);
        assert_eq!(summary.jurisdictions.len(), 2);

        let tx = &summary.jurisdictions[&j("TX")];
        // Composite: 7,000 + 4,200; withholding: 5,000 + 3,000.
        assert_eq!(tx.composite_total, dec!(11200.00));
        assert_eq!(tx.withholding_total, dec!(8000.00));
        assert_eq!(tx.row_count, 2);

        let ca = &summary.jurisdictions[&j("CA")];
        assert_eq!(ca.composite_total, dec!(930.00));
        assert_eq!(ca.withholding_total, dec!(0));
    }

    #[test]
    fn jurisdiction_totals_sum_to_session_totals() {
        let session = SessionId::new();
        let rows = vec![
            row(session, "TX", dec!(100000.00)),
            row(session, "CA", dec!(25000.00)),
            row(session, "TX", dec!(75000.00)),
        ];
        let batch = calculate_batch(&rows, &rule_set());
        let summary = summarize(session, &batch.rows, batch.error_count);

        let composite_sum: Decimal = summary
            .jurisdictions
            .values()
            .map(|t| t.composite_total)
            .sum();
        let withholding_sum: Decimal = summary
            .jurisdictions
            .values()
            .map(|t| t.withholding_total)
            .sum();
        assert_eq!(summary.composite_total, composite_sum);
        assert_eq!(summary.withholding_total, withholding_sum);
    }

    #[test]
    fn empty_session_summarizes_to_zero() {
        let session = SessionId::new();
        let summary = summarize(session, &[], 0);
        assert_eq!(summary.row_count, 0);
        assert_eq!(summary.composite_total, dec!(0));
        assert_eq!(summary.withholding_total, dec!(0));
        assert!(summary.jurisdictions.is_empty());
        assert_eq!(summary.status, SessionStatus::NothingCalculated);
    }

    #[test]
    fn exempt_rows_are_counted_but_not_totalled() {
        let session = SessionId::new();
        let exempt = row(session, "TX", dec!(100000.00)).with_legacy_exemptions(true, true);
        let taxable = row(session, "TX", dec!(100000.00));
        let batch = calculate_batch(&[exempt, taxable], &rule_set());
        let summary = summarize(session, &batch.rows, batch.error_count);

        assert_eq!(summary.exempt_count, 1);
        assert_eq!(summary.calculated_count, 1);
        let tx = &summary.jurisdictions[&j("TX")];
        assert_eq!(tx.composite_total, dec!(7000.00));
        assert_eq!(tx.row_count, 2);
    }

    #[test]
    fn summary_serializes_with_jurisdiction_string_keys() {
        let session = SessionId::new();
        let rows = vec![row(session, "TX", dec!(100000.00))];
        let batch = calculate_batch(&rows, &rule_set());
        let summary = summarize(session, &batch.rows, batch.error_count);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["jurisdictions"]["TX"]["composite_total"], "7000.00");
        assert_eq!(json["status"], "fully_calculated");
    }

    #[test]
    fn error_rows_surface_in_the_status() {
        let session = SessionId::new();
        let rows = vec![row(session, "TX", dec!(100000.00))];
        let batch = calculate_batch(&rows, &rule_set());
        // Simulate a batch where two other rows failed upstream.
        let summary = summarize(session, &batch.rows, 2);
        assert_eq!(
            summary.status,
            SessionStatus::CalculatedWithErrors { failed_rows: 2 }
        );
    }
}
