//! # Jurisdiction and Entity-Type Primitives
//!
//! A [`Jurisdiction`] is a two-letter U.S. state code. The constructor
//! validates the *format* (two ASCII uppercase letters); whether the code
//! names a state the platform knows is a separate question answered by
//! [`Jurisdiction::is_recognized`]. A well-formed but unrecognized code is
//! representable on purpose: such rows are never matched to a rule and
//! leave their tax fields null rather than erroring.
//!
//! [`EntityType`] is the closed taxonomy of investor entity types that tax
//! rules are keyed on.

use serde::{Deserialize, Serialize};

use crate::error::SaltError;

/// The 50 U.S. states plus the District of Columbia.
const RECOGNIZED_STATES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DC", "DE", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

/// A two-letter state jurisdiction code.
///
/// Ordered and hashable so it can key `BTreeMap`s for deterministic rule
/// lookup and aggregation order. Serializes as the bare code string (`"TX"`),
/// which also lets it key JSON maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Jurisdiction([u8; 2]);

impl Jurisdiction {
    /// Parse a jurisdiction code, validating the two-uppercase-letter format.
    pub fn parse(code: &str) -> Result<Self, SaltError> {
        let bytes = code.as_bytes();
        if bytes.len() != 2 || !bytes.iter().all(|b| b.is_ascii_uppercase()) {
            return Err(SaltError::InvalidJurisdiction {
                code: code.to_string(),
            });
        }
        Ok(Self([bytes[0], bytes[1]]))
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        // Invariant: constructed only from two ASCII uppercase bytes.
        std::str::from_utf8(&self.0).unwrap_or("??")
    }

    /// Whether this code names one of the 50 states or DC.
    ///
    /// Unrecognized codes never match a tax rule but are not an error.
    pub fn is_recognized(&self) -> bool {
        RECOGNIZED_STATES.contains(&self.as_str())
    }
}

impl std::str::FromStr for Jurisdiction {
    type Err = SaltError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Jurisdiction {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Jurisdiction {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Self::parse(&code).map_err(serde::de::Error::custom)
    }
}

/// The entity type of an investor, as recorded on a distribution row.
///
/// Tax rules are keyed on `(Jurisdiction, EntityType)`; the enumeration is
/// closed so rule tables can never reference an entity type the rest of the
/// system does not handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// A natural person.
    Individual,
    /// A partnership (including LPs and LLPs).
    Partnership,
    /// An S-corporation.
    SCorporation,
    /// A C-corporation.
    Corporation,
    /// A trust.
    Trust,
    /// An estate.
    Estate,
    /// A tax-exempt organization.
    ExemptOrganization,
    /// An individual retirement account.
    Ira,
}

impl EntityType {
    /// Return the string representation of this entity type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Partnership => "partnership",
            Self::SCorporation => "s_corporation",
            Self::Corporation => "corporation",
            Self::Trust => "trust",
            Self::Estate => "estate",
            Self::ExemptOrganization => "exempt_organization",
            Self::Ira => "ira",
        }
    }

    /// Return all entity-type variants.
    pub fn all() -> &'static [EntityType] {
        &[
            Self::Individual,
            Self::Partnership,
            Self::SCorporation,
            Self::Corporation,
            Self::Trust,
            Self::Estate,
            Self::ExemptOrganization,
            Self::Ira,
        ]
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityType {
    type Err = SaltError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| SaltError::UnknownEntityType {
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_valid_codes() {
        let tx = Jurisdiction::parse("TX").unwrap();
        assert_eq!(tx.as_str(), "TX");
        assert!(tx.is_recognized());
    }

    #[test]
    fn parse_rejects_malformed_codes() {
        assert!(Jurisdiction::parse("tx").is_err());
        assert!(Jurisdiction::parse("TEX").is_err());
        assert!(Jurisdiction::parse("T").is_err());
        assert!(Jurisdiction::parse("").is_err());
        assert!(Jurisdiction::parse("T1").is_err());
    }

    #[test]
    fn wellformed_unknown_code_is_representable_but_unrecognized() {
        let zz = Jurisdiction::parse("ZZ").unwrap();
        assert_eq!(zz.as_str(), "ZZ");
        assert!(!zz.is_recognized());
    }

    #[test]
    fn all_fifty_states_plus_dc_are_recognized() {
        assert_eq!(RECOGNIZED_STATES.len(), 51);
        for code in RECOGNIZED_STATES {
            assert!(Jurisdiction::parse(code).unwrap().is_recognized());
        }
    }

    #[test]
    fn entity_type_from_str_roundtrip() {
        for et in EntityType::all() {
            let parsed: EntityType = et.as_str().parse().unwrap();
            assert_eq!(parsed, *et);
        }
    }

    #[test]
    fn entity_type_from_str_rejects_unknown() {
        let err = "llc".parse::<EntityType>();
        assert!(err.is_err());
    }

    #[test]
    fn jurisdiction_ordering_is_lexicographic() {
        let ca = Jurisdiction::parse("CA").unwrap();
        let tx = Jurisdiction::parse("TX").unwrap();
        assert!(ca < tx);
    }

    #[test]
    fn jurisdiction_serializes_as_the_bare_code() {
        let nm = Jurisdiction::parse("NM").unwrap();
        let json = serde_json::to_string(&nm).unwrap();
        assert_eq!(json, "\"NM\"");
        let parsed: Jurisdiction = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, nm);
    }

    #[test]
    fn jurisdiction_deserialization_validates() {
        assert!(serde_json::from_str::<Jurisdiction>("\"tx\"").is_err());
        assert!(serde_json::from_str::<Jurisdiction>("\"TEX\"").is_err());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_two_uppercase_letters_parse_and_roundtrip(
                a in proptest::char::range('A', 'Z'),
                b in proptest::char::range('A', 'Z'),
            ) {
                let code = format!("{a}{b}");
                let j = Jurisdiction::parse(&code).unwrap();
                prop_assert_eq!(j.as_str(), code.as_str());
            }
        }
    }
}
