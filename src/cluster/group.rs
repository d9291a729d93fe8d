//! Clustering output models.

use std::collections::HashSet;

use serde::Serialize;

use crate::cluster::conventional::CommitType;

/// Weak pointer from a commit group back to one hunk of a parsed diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HunkRef {
    pub file_path: String,
    pub hunk_id: String,
}

/// One proposed atomic commit: a set of hunks that belong together.
///
/// Created fresh by each clustering call; the commit message is filled in by
/// a downstream collaborator, never by the clustering engine.
#[derive(Debug, Clone, Serialize)]
pub struct CommitGroup {
    pub id: String,
    pub hunks: Vec<HunkRef>,
    /// File paths in insertion order. May contain duplicates; see
    /// [`CommitGroup::file_count`].
    pub files: Vec<String>,
    pub suggested_type: Option<CommitType>,
    pub suggested_scope: Option<String>,
    pub reasoning: String,
    pub commit_message: Option<String>,
}

impl CommitGroup {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hunks: Vec::new(),
            files: Vec::new(),
            suggested_type: None,
            suggested_scope: None,
            reasoning: String::new(),
            commit_message: None,
        }
    }

    /// Number of distinct files in the group (duplicates collapse).
    pub fn file_count(&self) -> usize {
        self.files
            .iter()
            .map(String::as_str)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Number of hunk references in the group. Deliberately not deduplicated
    /// by file path, unlike [`CommitGroup::file_count`].
    pub fn hunk_count(&self) -> usize {
        self.hunks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_count_deduplicates() {
        let mut group = CommitGroup::new("dir-src");
        group.files.push("src/a.rs".to_string());
        group.files.push("src/a.rs".to_string());
        group.files.push("src/b.rs".to_string());
        assert_eq!(group.file_count(), 2);
    }

    #[test]
    fn test_hunk_count_does_not_deduplicate() {
        let mut group = CommitGroup::new("dir-src");
        group.hunks.push(HunkRef {
            file_path: "src/a.rs".to_string(),
            hunk_id: "src/a.rs:0".to_string(),
        });
        group.hunks.push(HunkRef {
            file_path: "src/a.rs".to_string(),
            hunk_id: "src/a.rs:1".to_string(),
        });
        assert_eq!(group.hunk_count(), 2);
    }

    #[test]
    fn test_serializes_for_downstream_consumers() {
        let mut group = CommitGroup::new("conv-feat");
        group.files.push("src/a.rs".to_string());
        group.suggested_type = Some(CommitType::Feat);
        group.reasoning = "Changes classified as 'feat'".to_string();

        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(json["id"], "conv-feat");
        assert_eq!(json["suggested_type"], "feat");
        assert!(json["commit_message"].is_null());
    }
}
