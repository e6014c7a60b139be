//! Per-user dashboard view preferences.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tally_shared::types::CollaboratorId;

/// How collaborator groups are ordered in a monthly summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// By the owner's manual order index, then name.
    #[default]
    Manual,
    /// Alphabetically, ignoring case.
    Name,
    /// Largest monthly total first.
    TotalDesc,
}

/// Dashboard display settings for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewPreferences {
    /// Group ordering.
    pub sort: SortOrder,
    /// Collaborators left out of summaries entirely.
    pub hidden_collaborators: BTreeSet<CollaboratorId>,
    /// Collaborators shown folded.
    pub collapsed_collaborators: BTreeSet<CollaboratorId>,
}

impl ViewPreferences {
    /// Whether the collaborator is hidden.
    #[must_use]
    pub fn is_hidden(&self, id: CollaboratorId) -> bool {
        self.hidden_collaborators.contains(&id)
    }

    /// Whether the collaborator is collapsed.
    #[must_use]
    pub fn is_collapsed(&self, id: CollaboratorId) -> bool {
        self.collapsed_collaborators.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_document() {
        let prefs: ViewPreferences = serde_json::from_str("{}").unwrap();
        assert_eq!(prefs, ViewPreferences::default());
        assert_eq!(prefs.sort, SortOrder::Manual);
    }

    #[test]
    fn test_partial_document() {
        let id = CollaboratorId::new();
        let prefs: ViewPreferences = serde_json::from_value(serde_json::json!({
            "sort": "total_desc",
            "hidden_collaborators": [id],
        }))
        .unwrap();

        assert_eq!(prefs.sort, SortOrder::TotalDesc);
        assert!(prefs.is_hidden(id));
        assert!(!prefs.is_collapsed(id));
    }
}
