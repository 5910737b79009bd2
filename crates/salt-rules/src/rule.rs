//! # Rule Rows
//!
//! Plain-data rule definitions. The engine consumes these through keyed
//! lookup — no trait objects, no dispatch hierarchy. A rule row is uniquely
//! addressed by its [`RuleKey`] within a rule set; the pair
//! `(rule_set_id, key)` is how audit records reference the exact rule that
//! was matched.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use salt_core::{EntityType, Jurisdiction};

/// The lookup key for both rule tables: one jurisdiction, one entity type.
///
/// Serializes as `"ST/entity_type"` (the `Display` form), so it can key
/// JSON maps and reads naturally in audit records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleKey {
    /// The state the rule applies in.
    pub jurisdiction: Jurisdiction,
    /// The investor entity type the rule applies to.
    pub entity_type: EntityType,
}

impl RuleKey {
    /// Construct a key.
    pub fn new(jurisdiction: Jurisdiction, entity_type: EntityType) -> Self {
        Self {
            jurisdiction,
            entity_type,
        }
    }
}

impl std::fmt::Display for RuleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.jurisdiction, self.entity_type)
    }
}

impl Serialize for RuleKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RuleKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let (state, entity) = text
            .split_once('/')
            .ok_or_else(|| serde::de::Error::custom(format!("invalid rule key: {text:?}")))?;
        let jurisdiction = Jurisdiction::parse(state).map_err(serde::de::Error::custom)?;
        let entity_type = entity
            .parse::<EntityType>()
            .map_err(serde::de::Error::custom)?;
        Ok(Self {
            jurisdiction,
            entity_type,
        })
    }
}

/// A withholding-tax rule for one `(jurisdiction, entity type)` pair.
///
/// Withholding is gated by a double threshold: the row amount must reach
/// `income_threshold` AND the computed tax (`amount × tax_rate`) must reach
/// `tax_threshold`. Both comparisons are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingRule {
    /// The state the rule applies in.
    pub jurisdiction: Jurisdiction,
    /// The investor entity type the rule applies to.
    pub entity_type: EntityType,
    /// Tax rate as a decimal fraction (e.g. `0.05` for 5%).
    pub tax_rate: Decimal,
    /// Per-partner income threshold (inclusive) for withholding to apply.
    pub income_threshold: Decimal,
    /// Per-partner withholding-tax threshold (inclusive) on the computed
    /// tax amount.
    pub tax_threshold: Decimal,
}

impl WithholdingRule {
    /// The lookup key this rule is addressed by.
    pub fn key(&self) -> RuleKey {
        RuleKey::new(self.jurisdiction, self.entity_type)
    }
}

/// A composite-tax rule for one `(jurisdiction, entity type)` pair.
///
/// Composite tax is gated by a single income threshold, except where the
/// state mandates composite filing — then it applies at any amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeRule {
    /// The state the rule applies in.
    pub jurisdiction: Jurisdiction,
    /// The investor entity type the rule applies to.
    pub entity_type: EntityType,
    /// Tax rate as a decimal fraction (e.g. `0.07` for 7%).
    pub tax_rate: Decimal,
    /// Income threshold (inclusive) for composite tax to apply.
    pub income_threshold: Decimal,
    /// Whether the state mandates composite filing regardless of amount.
    pub mandatory_filing: bool,
}

impl CompositeRule {
    /// The lookup key this rule is addressed by.
    pub fn key(&self) -> RuleKey {
        RuleKey::new(self.jurisdiction, self.entity_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tx() -> Jurisdiction {
        Jurisdiction::parse("TX").unwrap()
    }

    #[test]
    fn rule_key_display_is_readable() {
        let key = RuleKey::new(tx(), EntityType::Partnership);
        assert_eq!(key.to_string(), "TX/partnership");
    }

    #[test]
    fn rule_key_orders_by_jurisdiction_then_entity_type() {
        let ca = Jurisdiction::parse("CA").unwrap();
        let a = RuleKey::new(ca, EntityType::Trust);
        let b = RuleKey::new(tx(), EntityType::Individual);
        assert!(a < b);
    }

    #[test]
    fn rule_key_serializes_as_its_display_form() {
        let key = RuleKey::new(tx(), EntityType::SCorporation);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"TX/s_corporation\"");
        let parsed: RuleKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn rule_key_deserialization_rejects_malformed_text() {
        assert!(serde_json::from_str::<RuleKey>("\"TX\"").is_err());
        assert!(serde_json::from_str::<RuleKey>("\"TX/llc\"").is_err());
        assert!(serde_json::from_str::<RuleKey>("\"tx/partnership\"").is_err());
    }

    #[test]
    fn rules_expose_their_key() {
        let rule = CompositeRule {
            jurisdiction: tx(),
            entity_type: EntityType::Partnership,
            tax_rate: dec!(0.07),
            income_threshold: dec!(50000),
            mandatory_filing: false,
        };
        assert_eq!(rule.key(), RuleKey::new(tx(), EntityType::Partnership));
    }
}
