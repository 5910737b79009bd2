//! # Rule-Set Repository
//!
//! Holds every known rule-set version and enforces the single-active
//! invariant: publishing a draft activates it and archives the previous
//! active set in the same operation, so at no observable point are two sets
//! active. Archived sets are retained indefinitely — re-running a past
//! session requires the exact set that was active when it was calculated.
//!
//! The repository hands out shared references only; published sets are
//! immutable by construction (see [`crate::ruleset`]).

use std::collections::BTreeMap;

use salt_core::RuleSetId;

use crate::ruleset::{RuleSet, RuleSetError, RuleSetStatus};

/// In-memory store of rule-set versions with exactly one active set.
#[derive(Debug, Clone, Default)]
pub struct RuleSetRepository {
    sets: BTreeMap<RuleSetId, RuleSet>,
    active: Option<RuleSetId>,
}

impl RuleSetRepository {
    /// Create an empty repository with no active set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a validated draft.
    ///
    /// Only drafts may be inserted; activation goes through [`publish`].
    ///
    /// [`publish`]: RuleSetRepository::publish
    pub fn insert_draft(&mut self, set: RuleSet) -> Result<RuleSetId, RuleSetError> {
        if set.status() != RuleSetStatus::Draft {
            return Err(RuleSetError::InvalidTransition {
                from: set.status(),
                to: RuleSetStatus::Draft,
            });
        }
        let id = set.id;
        self.sets.insert(id, set);
        Ok(id)
    }

    /// Publish a draft: `Draft → Active`, archiving the previous active set.
    pub fn publish(&mut self, id: RuleSetId) -> Result<(), RuleSetError> {
        // Validate the target before touching the current active set, so a
        // failed publish leaves the repository unchanged.
        match self.sets.get(&id) {
            None => {
                return Err(RuleSetError::NotFound { id: id.to_string() });
            }
            Some(set) if set.status() != RuleSetStatus::Draft => {
                return Err(RuleSetError::InvalidTransition {
                    from: set.status(),
                    to: RuleSetStatus::Active,
                });
            }
            Some(_) => {}
        }

        if let Some(previous_id) = self.active.take() {
            if let Some(previous) = self.sets.get_mut(&previous_id) {
                previous.archive()?;
                tracing::info!(rule_set = %previous_id, "archived superseded rule set");
            }
        }

        // Checked above; the set exists and is a draft.
        if let Some(set) = self.sets.get_mut(&id) {
            set.activate()?;
            tracing::info!(rule_set = %id, version = set.version, "published rule set");
        }
        self.active = Some(id);
        Ok(())
    }

    /// The currently active rule set, if any.
    ///
    /// When this returns `None` the caller must fall back to legacy
    /// exemption-flag-only processing — the engine is never invoked without
    /// a rule set.
    pub fn active(&self) -> Option<&RuleSet> {
        self.active.and_then(|id| self.sets.get(&id))
    }

    /// Fetch any rule set by id, including archived ones.
    pub fn get(&self, id: RuleSetId) -> Option<&RuleSet> {
        self.sets.get(&id)
    }

    /// Number of rule sets held, across all statuses.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Whether the repository holds no rule sets.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draft(version: u32) -> RuleSet {
        RuleSet::draft(version, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
    }

    #[test]
    fn empty_repository_has_no_active_set() {
        let repo = RuleSetRepository::new();
        assert!(repo.active().is_none());
        assert!(repo.is_empty());
    }

    #[test]
    fn publish_activates_the_draft() {
        let mut repo = RuleSetRepository::new();
        let id = repo.insert_draft(draft(1)).unwrap();
        assert!(repo.active().is_none(), "inserting a draft does not activate it");

        repo.publish(id).unwrap();
        let active = repo.active().unwrap();
        assert_eq!(active.id, id);
        assert_eq!(active.status(), RuleSetStatus::Active);
    }

    #[test]
    fn publish_archives_the_predecessor() {
        let mut repo = RuleSetRepository::new();
        let v1 = repo.insert_draft(draft(1)).unwrap();
        let v2 = repo.insert_draft(draft(2)).unwrap();

        repo.publish(v1).unwrap();
        repo.publish(v2).unwrap();

        assert_eq!(repo.active().unwrap().id, v2);
        assert_eq!(repo.get(v1).unwrap().status(), RuleSetStatus::Archived);
        // The archived set is still retrievable for reproducibility.
        assert_eq!(repo.get(v1).unwrap().version, 1);
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn publish_unknown_id_fails_and_changes_nothing() {
        let mut repo = RuleSetRepository::new();
        let v1 = repo.insert_draft(draft(1)).unwrap();
        repo.publish(v1).unwrap();

        let err = repo.publish(RuleSetId::new()).unwrap_err();
        assert!(matches!(err, RuleSetError::NotFound { .. }));
        // The active set is untouched.
        assert_eq!(repo.active().unwrap().id, v1);
        assert_eq!(repo.active().unwrap().status(), RuleSetStatus::Active);
    }

    #[test]
    fn publish_twice_is_rejected() {
        let mut repo = RuleSetRepository::new();
        let id = repo.insert_draft(draft(1)).unwrap();
        repo.publish(id).unwrap();

        let err = repo.publish(id).unwrap_err();
        assert!(matches!(
            err,
            RuleSetError::InvalidTransition {
                from: RuleSetStatus::Active,
                to: RuleSetStatus::Active,
            }
        ));
    }

    #[test]
    fn insert_rejects_non_draft() {
        let mut repo = RuleSetRepository::new();
        let mut set = draft(1);
        set.activate().unwrap();
        assert!(repo.insert_draft(set).is_err());
    }
}
