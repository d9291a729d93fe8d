//! Directory-based clustering.

use async_trait::async_trait;

use crate::cluster::ClusteringStrategy;
use crate::cluster::group::{CommitGroup, HunkRef};
use crate::diff::model::ParsedDiff;
use crate::error::ClusterError;

/// Groups files by the leading segments of their parent directory.
///
/// Needs no external capability. Increasing `max_depth` can only split
/// existing groups further, never merge them.
pub struct DirectoryStrategy {
    max_depth: usize,
}

impl DirectoryStrategy {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// First `max_depth` segments of the parent directory, `"root"` for
    /// files with no parent.
    fn directory_key(&self, path: &str) -> String {
        let normalized = path.replace('\\', "/");
        let segments: Vec<&str> = normalized.split('/').collect();
        let parents = &segments[..segments.len().saturating_sub(1)];

        if parents.is_empty() {
            return "root".to_string();
        }
        parents[..parents.len().min(self.max_depth)].join("/")
    }
}

impl Default for DirectoryStrategy {
    fn default() -> Self {
        Self::new(2)
    }
}

#[async_trait]
impl ClusteringStrategy for DirectoryStrategy {
    fn name(&self) -> &'static str {
        "directory"
    }

    async fn cluster(&self, diff: &ParsedDiff) -> Result<Vec<CommitGroup>, ClusterError> {
        // First-seen order of directory keys is the group order
        let mut keys: Vec<String> = Vec::new();
        let mut groups: Vec<CommitGroup> = Vec::new();

        for file in &diff.files {
            let key = self.directory_key(&file.path);

            let group = match keys.iter().position(|k| *k == key) {
                Some(idx) => &mut groups[idx],
                None => {
                    let mut group =
                        CommitGroup::new(format!("dir-{}", key.replace(['/', '\\'], "-")));
                    group.suggested_scope = (key != "root").then(|| key.clone());
                    group.reasoning = format!("Files in {key}/ directory");
                    keys.push(key);
                    groups.push(group);
                    groups.last_mut().unwrap()
                }
            };

            group.files.push(file.path.clone());
            for hunk in &file.hunks {
                group.hunks.push(HunkRef {
                    file_path: file.path.clone(),
                    hunk_id: hunk.id.clone(),
                });
            }
        }

        Ok(groups)
    }
}
