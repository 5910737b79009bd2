//! # Tagged Tax Outcomes
//!
//! One tax type on one row ends in exactly one of four ways. The legacy
//! boolean exemption flags and the newer rule-driven computation coexist in
//! the data model; collapsing their results into a single boolean would
//! leave audit records ambiguous, so the outcome is a tagged enum instead.
//!
//! `NotApplicable` and `Calculated(0)` are deliberately distinct: a matched
//! rule whose gates pass with a zero rate *was* calculated, with amount
//! zero; a missing rule or an unmet threshold leaves the tax field null.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The outcome of evaluating one tax type for one distribution row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "amount", rename_all = "snake_case")]
pub enum TaxOutcome {
    /// Exempt because the row's legacy exemption flag is set.
    ExemptByFlag,
    /// Exempt because the row's jurisdiction differs from the investor's
    /// recorded tax residency.
    ExemptByJurisdictionMismatch,
    /// No rule matched, or a matched rule's threshold gate was not met.
    NotApplicable,
    /// A matched rule applied; the computed amount (4 dp, may be zero).
    Calculated(Decimal),
}

impl TaxOutcome {
    /// Whether this outcome produced a stored tax amount.
    pub fn is_calculated(&self) -> bool {
        matches!(self, Self::Calculated(_))
    }

    /// Whether this outcome is an exemption of either kind.
    pub fn is_exempt(&self) -> bool {
        matches!(self, Self::ExemptByFlag | Self::ExemptByJurisdictionMismatch)
    }

    /// The calculated amount, if any.
    pub fn amount(&self) -> Option<Decimal> {
        match self {
            Self::Calculated(amount) => Some(*amount),
            _ => None,
        }
    }

    /// Return the tag string for this outcome.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExemptByFlag => "exempt_by_flag",
            Self::ExemptByJurisdictionMismatch => "exempt_by_jurisdiction_mismatch",
            Self::NotApplicable => "not_applicable",
            Self::Calculated(_) => "calculated",
        }
    }
}

impl std::fmt::Display for TaxOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Calculated(amount) => write!(f, "calculated({amount})"),
            other => f.write_str(other.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn calculated_zero_is_not_exempt() {
        let outcome = TaxOutcome::Calculated(dec!(0));
        assert!(outcome.is_calculated());
        assert!(!outcome.is_exempt());
        assert_eq!(outcome.amount(), Some(dec!(0)));
    }

    #[test]
    fn not_applicable_has_no_amount() {
        assert_eq!(TaxOutcome::NotApplicable.amount(), None);
        assert!(!TaxOutcome::NotApplicable.is_calculated());
    }

    #[test]
    fn exemption_variants_are_distinguishable() {
        assert!(TaxOutcome::ExemptByFlag.is_exempt());
        assert!(TaxOutcome::ExemptByJurisdictionMismatch.is_exempt());
        assert_ne!(
            TaxOutcome::ExemptByFlag.as_str(),
            TaxOutcome::ExemptByJurisdictionMismatch.as_str()
        );
    }

    #[test]
    fn display_carries_the_amount() {
        assert_eq!(TaxOutcome::Calculated(dec!(7000.0000)).to_string(), "calculated(7000.0000)");
        assert_eq!(TaxOutcome::NotApplicable.to_string(), "not_applicable");
    }
}
