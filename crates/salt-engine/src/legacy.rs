//! # Legacy Exemption-Flag Processing
//!
//! Sessions calculated before rule sets existed carry only the boolean
//! exemption flags. When no active rule set exists, the caller routes rows
//! here instead of the engine — the engine itself is never invoked without
//! a rule set; that decision belongs to the caller.
//!
//! The legacy path never computes a tax amount: every tax field stays null
//! and `tax_calculation_applied` stays false. Its only output is the
//! recorded exemption reason derived from the flags.

use crate::distribution::Distribution;

/// Apply legacy exemption flags to a row, without rule-based calculation.
pub fn apply_legacy_exemptions(row: &Distribution) -> Distribution {
    let mut updated = row.clone();
    updated.composite_tax = None;
    updated.withholding_tax = None;
    updated.tax_calculation_applied = false;
    updated.rule_set_id = None;

    let mut parts = Vec::new();
    if row.composite_exemption {
        parts.push("composite: legacy exemption flag");
    }
    if row.withholding_exemption {
        parts.push("withholding: legacy exemption flag");
    }
    updated.exemption_reason = if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    };

    updated
}
