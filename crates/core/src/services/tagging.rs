//! Tagging service.
//!
//! Tags attach to content entities through polymorphic assignment rows.
//! Reconciliation is a set symmetric difference over tag names: assignments
//! whose name is no longer wanted are removed, missing names are
//! find-or-created and attached, and names in both sets are left alone so a
//! surviving tag row is never churned.

use campus_common::AppResult;
use campus_db::repositories::TagRepository;
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};

/// Tag list as it arrives from clients.
///
/// Accepted shapes: a JSON array of names, a JSON-array-encoded string, or a
/// comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagInput {
    /// Already an array of names.
    List(Vec<String>),
    /// Raw text, parsed leniently.
    Text(String),
}

impl TagInput {
    /// Normalize to a list of trimmed, non-empty names.
    #[must_use]
    pub fn into_names(self) -> Vec<String> {
        match self {
            Self::List(names) => clean(names),
            Self::Text(text) => {
                // A JSON-encoded array wins; anything else is treated as
                // comma-separated.
                if let Ok(names) = serde_json::from_str::<Vec<String>>(&text) {
                    clean(names)
                } else {
                    clean(text.split(',').map(str::to_string).collect())
                }
            }
        }
    }
}

fn clean(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}

/// A tag as it appears in API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    /// Tag ID.
    pub id: String,
    /// Tag name.
    pub name: String,
}

/// Plan which names to unassign and which to attach.
///
/// Names present in both sets are untouched.
fn plan_reconcile(existing: &[String], desired: &[String]) -> (Vec<String>, Vec<String>) {
    let to_remove = existing
        .iter()
        .filter(|name| !desired.contains(name))
        .cloned()
        .collect();
    let to_add = desired
        .iter()
        .filter(|name| !existing.contains(name))
        .cloned()
        .collect();
    (to_remove, to_add)
}

/// Tagging service for polymorphic tag assignment.
#[derive(Clone)]
pub struct TaggingService {
    tag_repo: TagRepository,
}

impl TaggingService {
    /// Create a new tagging service.
    #[must_use]
    pub const fn new(tag_repo: TagRepository) -> Self {
        Self { tag_repo }
    }

    /// Reconcile the assignments of an entity against a desired name list.
    pub async fn reconcile<C: ConnectionTrait>(
        &self,
        db: &C,
        taggable_type: &str,
        taggable_id: &str,
        desired: &[String],
    ) -> AppResult<()> {
        let assignments = self
            .tag_repo
            .assignments_for(db, taggable_type, taggable_id)
            .await?;

        let existing: Vec<String> = assignments
            .iter()
            .filter_map(|(_, tag)| tag.as_ref().map(|t| t.name.clone()))
            .collect();

        let (to_remove, to_add) = plan_reconcile(&existing, desired);

        for (assignment, tag) in &assignments {
            if let Some(tag) = tag
                && to_remove.contains(&tag.name)
            {
                self.tag_repo.delete_assignment(db, &assignment.id).await?;
            }
        }

        for name in &to_add {
            let tag = self.tag_repo.find_or_create(db, name).await?;
            self.tag_repo
                .create_assignment(db, &tag.id, taggable_type, taggable_id)
                .await?;
        }

        Ok(())
    }

    /// Tags attached to an entity.
    pub async fn tags_for<C: ConnectionTrait>(
        &self,
        db: &C,
        taggable_type: &str,
        taggable_id: &str,
    ) -> AppResult<Vec<TagResponse>> {
        let assignments = self
            .tag_repo
            .assignments_for(db, taggable_type, taggable_id)
            .await?;

        Ok(assignments
            .into_iter()
            .filter_map(|(_, tag)| tag)
            .map(|t| TagResponse {
                id: t.id,
                name: t.name,
            })
            .collect())
    }

    /// Remove every assignment of an entity (owner delete cleanup).
    pub async fn clear<C: ConnectionTrait>(
        &self,
        db: &C,
        taggable_type: &str,
        taggable_id: &str,
    ) -> AppResult<()> {
        self.tag_repo
            .delete_assignments_for(db, taggable_type, taggable_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_tag_input_list() {
        let input = TagInput::List(names(&[" rust ", "", "web"]));
        assert_eq!(input.into_names(), names(&["rust", "web"]));
    }

    #[test]
    fn test_tag_input_json_string() {
        let input = TagInput::Text(r#"["a","b"]"#.to_string());
        assert_eq!(input.into_names(), names(&["a", "b"]));
    }

    #[test]
    fn test_tag_input_comma_string() {
        let input = TagInput::Text("a, b ,,c".to_string());
        assert_eq!(input.into_names(), names(&["a", "b", "c"]));
    }

    #[test]
    fn test_tag_input_json_object_falls_back_to_comma() {
        // Not an array: the whole text is treated as comma-separated.
        let input = TagInput::Text(r#"{"tag":"name"}"#.to_string());
        assert_eq!(input.into_names(), names(&[r#"{"tag":"name"}"#]));
    }

    #[test]
    fn test_plan_reconcile_symmetric_difference() {
        let existing = names(&["a", "b"]);
        let desired = names(&["b", "c"]);

        let (to_remove, to_add) = plan_reconcile(&existing, &desired);
        assert_eq!(to_remove, names(&["a"]));
        assert_eq!(to_add, names(&["c"]));
    }

    #[test]
    fn test_plan_reconcile_no_changes() {
        let existing = names(&["a", "b"]);
        let (to_remove, to_add) = plan_reconcile(&existing, &existing.clone());
        assert!(to_remove.is_empty());
        assert!(to_add.is_empty());
    }

    #[test]
    fn test_plan_reconcile_from_empty() {
        let (to_remove, to_add) = plan_reconcile(&[], &names(&["x"]));
        assert!(to_remove.is_empty());
        assert_eq!(to_add, names(&["x"]));
    }
}
