//! # Distribution Rows
//!
//! One [`Distribution`] is one investor's allocation amount for one
//! jurisdiction and period, as parsed from an uploaded spreadsheet. The
//! input fields (amount, jurisdiction, investor) are fixed at creation; the
//! tax output fields are written exactly once, by the calculation engine,
//! and never mutated thereafter.
//!
//! ## Invariants
//!
//! - `tax_calculation_applied == true` implies at least one tax amount is
//!   set.
//! - Both legacy exemption flags set implies `exemption_reason` is set.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use salt_core::{DistributionId, EntityType, InvestorId, Jurisdiction, RuleSetId, SessionId};

/// One row of calculation input/output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    /// Unique row identifier.
    pub id: DistributionId,
    /// The upload session this row belongs to.
    pub session_id: SessionId,
    /// The investor this allocation belongs to.
    pub investor_id: InvestorId,
    /// Investor display name from the spreadsheet.
    pub investor_name: String,
    /// The jurisdiction the allocation is sourced to.
    pub jurisdiction: Jurisdiction,
    /// The investor's entity type.
    pub entity_type: EntityType,
    /// Allocation amount (currency precision, 2 dp on input).
    pub amount: Decimal,
    /// The investor's recorded tax-residency jurisdiction.
    pub tax_residency: Jurisdiction,
    /// Legacy composite exemption flag, used when no rule set applies.
    pub composite_exemption: bool,
    /// Legacy withholding exemption flag, used when no rule set applies.
    pub withholding_exemption: bool,

    // Tax outputs, written exactly once by the engine.
    /// Computed composite tax (4 dp), if a rule applied.
    pub composite_tax: Option<Decimal>,
    /// Computed withholding tax (4 dp), if a rule applied.
    pub withholding_tax: Option<Decimal>,
    /// Whether at least one tax amount was calculated for this row.
    pub tax_calculation_applied: bool,
    /// Human-readable reason(s) a tax type was exempted, if any.
    pub exemption_reason: Option<String>,
    /// When the engine calculated this row.
    pub calculation_timestamp: Option<DateTime<Utc>>,
    /// The rule set the calculation ran against.
    pub rule_set_id: Option<RuleSetId>,
}

impl Distribution {
    /// Create a new row with empty tax outputs.
    pub fn new(
        session_id: SessionId,
        investor_id: InvestorId,
        jurisdiction: Jurisdiction,
        entity_type: EntityType,
        amount: Decimal,
        tax_residency: Jurisdiction,
    ) -> Self {
        Self {
            id: DistributionId::new(),
            session_id,
            investor_id,
            investor_name: String::new(),
            jurisdiction,
            entity_type,
            amount,
            tax_residency,
            composite_exemption: false,
            withholding_exemption: false,
            composite_tax: None,
            withholding_tax: None,
            tax_calculation_applied: false,
            exemption_reason: None,
            calculation_timestamp: None,
            rule_set_id: None,
        }
    }

    /// Builder: set the investor display name.
    pub fn with_investor_name(mut self, name: impl Into<String>) -> Self {
        self.investor_name = name.into();
        self
    }

    /// Builder: set the legacy exemption flags.
    pub fn with_legacy_exemptions(mut self, composite: bool, withholding: bool) -> Self {
        self.composite_exemption = composite;
        self.withholding_exemption = withholding;
        self
    }

    /// Whether the engine has already written tax outputs to this row.
    pub fn is_calculated(&self) -> bool {
        self.calculation_timestamp.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row() -> Distribution {
        Distribution::new(
            SessionId::new(),
            InvestorId::new(),
            Jurisdiction::parse("TX").unwrap(),
            EntityType::Partnership,
            dec!(100000.00),
            Jurisdiction::parse("TX").unwrap(),
        )
        .with_investor_name("Acme Partners LP")
    }

    #[test]
    fn new_row_has_empty_outputs() {
        let d = row();
        assert_eq!(d.composite_tax, None);
        assert_eq!(d.withholding_tax, None);
        assert!(!d.tax_calculation_applied);
        assert_eq!(d.exemption_reason, None);
        assert!(!d.is_calculated());
        assert_eq!(d.rule_set_id, None);
    }

    #[test]
    fn builder_sets_legacy_flags() {
        let d = row().with_legacy_exemptions(true, false);
        assert!(d.composite_exemption);
        assert!(!d.withholding_exemption);
    }

    #[test]
    fn distribution_serde_roundtrip() {
        let d = row();
        let json = serde_json::to_string(&d).unwrap();
        let parsed: Distribution = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, d);
    }
}
