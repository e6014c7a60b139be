//! Collaborator rules: naming, ordering and deletion guard.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tally_shared::types::{CollaboratorId, UserId};

use super::error::CollaboratorError;
use super::types::Collaborator;

/// Collaborator service.
pub struct CollaboratorService;

impl CollaboratorService {
    /// Trims `name` and checks it against the owner's other collaborators.
    ///
    /// `exclude` skips the collaborator being renamed.
    pub fn validate_name(
        name: &str,
        existing: &[Collaborator],
        exclude: Option<CollaboratorId>,
    ) -> Result<String, CollaboratorError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CollaboratorError::EmptyName);
        }
        let lowered = trimmed.to_lowercase();
        let taken = existing
            .iter()
            .filter(|c| Some(c.id) != exclude)
            .any(|c| c.name.to_lowercase() == lowered);
        if taken {
            return Err(CollaboratorError::DuplicateName(trimmed.to_string()));
        }
        Ok(trimmed.to_string())
    }

    /// Creates a collaborator placed after the owner's existing ones.
    pub fn create(
        owner_id: UserId,
        name: &str,
        existing: &[Collaborator],
        now: DateTime<Utc>,
    ) -> Result<Collaborator, CollaboratorError> {
        let name = Self::validate_name(name, existing, None)?;
        let order_index = existing
            .iter()
            .filter_map(|c| c.order_index)
            .max()
            .map_or(0, |max| max.saturating_add(1));

        Ok(Collaborator {
            id: CollaboratorId::new(),
            owner_id,
            name,
            order_index: Some(order_index),
            created_at: now,
        })
    }

    /// Renames `collaborator`. `existing` may include it.
    pub fn rename(
        collaborator: &mut Collaborator,
        name: &str,
        existing: &[Collaborator],
    ) -> Result<(), CollaboratorError> {
        collaborator.name = Self::validate_name(name, existing, Some(collaborator.id))?;
        Ok(())
    }

    /// Assigns `order_index = position in ids` to every collaborator.
    ///
    /// `ids` must be a permutation of the collaborators' ids. Nothing changes
    /// on error.
    pub fn reorder(
        collaborators: &mut [Collaborator],
        ids: &[CollaboratorId],
    ) -> Result<(), CollaboratorError> {
        if ids.len() != collaborators.len() {
            return Err(CollaboratorError::InvalidOrder);
        }
        let mut seen = HashSet::with_capacity(ids.len());
        if !ids.iter().all(|id| seen.insert(*id)) {
            return Err(CollaboratorError::InvalidOrder);
        }
        if !collaborators.iter().all(|c| seen.contains(&c.id)) {
            return Err(CollaboratorError::InvalidOrder);
        }

        for collaborator in collaborators.iter_mut() {
            let position = ids.iter().position(|id| *id == collaborator.id);
            collaborator.order_index = position.and_then(|p| i32::try_from(p).ok());
        }
        collaborators.sort_by_key(|c| c.order_index);
        Ok(())
    }

    /// Rejects deletion while `referencing_records` expense records use it.
    pub fn ensure_deletable(referencing_records: usize) -> Result<(), CollaboratorError> {
        if referencing_records > 0 {
            return Err(CollaboratorError::InUse {
                count: referencing_records,
            });
        }
        Ok(())
    }
}
