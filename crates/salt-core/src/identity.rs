//! # Domain Identity Newtypes
//!
//! Newtype wrappers for all domain identifiers in the SALT stack. These
//! prevent accidental identifier confusion — you cannot pass a
//! `DistributionId` where a `RuleSetId` is expected, and a session's rows
//! can never be attributed to the wrong rule-set version by a type slip.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a versioned rule-set snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleSetId(pub Uuid);

/// Unique identifier for one distribution row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DistributionId(pub Uuid);

/// Unique identifier for an upload/calculation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

/// Unique identifier for an investor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvestorId(pub Uuid);

/// Unique identifier for a tax-calculation audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuditId(pub Uuid);

macro_rules! impl_id {
    ($ty:ident, $prefix:literal) => {
        impl $ty {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

impl_id!(RuleSetId, "ruleset");
impl_id!(DistributionId, "distribution");
impl_id!(SessionId, "session");
impl_id!(InvestorId, "investor");
impl_id!(AuditId, "audit");

/// Namespace for derived audit identifiers (see [`AuditId::derive`]).
const AUDIT_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c9e2a_4b3d_4e5f_8a70_2d9c1b4e6a58);

impl AuditId {
    /// Derive an audit id from the byte material identifying one
    /// calculation pass (UUID v5). The same material always derives the
    /// same id, so replaying a pass with identical inputs reproduces the
    /// original audit record byte for byte.
    pub fn derive(material: &[u8]) -> Self {
        Self(Uuid::new_v5(&AUDIT_ID_NAMESPACE, material))
    }
}
