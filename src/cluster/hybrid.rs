//! Hybrid clustering: directory grouping refined by semantic and
//! conventional passes.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::classify::Classifier;
use crate::cluster::ClusteringStrategy;
use crate::cluster::conventional::ConventionalStrategy;
use crate::cluster::directory::DirectoryStrategy;
use crate::cluster::group::CommitGroup;
use crate::cluster::semantic::{SemanticConfig, SemanticStrategy};
use crate::diff::model::ParsedDiff;
use crate::embed::EmbeddingClient;
use crate::error::ClusterError;

/// Directory groups larger than this are re-clustered semantically.
const REFINE_HUNK_THRESHOLD: usize = 3;

/// Composes the directory, semantic and conventional strategies.
///
/// Directory grouping runs first; oversized groups are split semantically
/// when an embedder is available; every resulting group is then summarized
/// with a single conventional type.
///
/// Each refinement numbers its splits from `semantic-0`, so when several
/// directory groups are refined the output can contain repeated group ids.
/// Consumers needing unique keys should pair the id with its position.
pub struct HybridStrategy {
    embedder: Option<Arc<dyn EmbeddingClient>>,
    directory: DirectoryStrategy,
    conventional: ConventionalStrategy,
}

impl HybridStrategy {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        embedder: Option<Arc<dyn EmbeddingClient>>,
    ) -> Self {
        Self {
            embedder,
            directory: DirectoryStrategy::default(),
            conventional: ConventionalStrategy::new(classifier),
        }
    }

    fn subdiff_for(diff: &ParsedDiff, group: &CommitGroup) -> ParsedDiff {
        let paths: HashSet<&str> = group.files.iter().map(String::as_str).collect();
        diff.restricted_to(&paths)
    }
}

#[async_trait]
impl ClusteringStrategy for HybridStrategy {
    fn name(&self) -> &'static str {
        "hybrid"
    }

    async fn cluster(&self, diff: &ParsedDiff) -> Result<Vec<CommitGroup>, ClusterError> {
        let dir_groups = self.directory.cluster(diff).await?;

        // Oversized directory groups get replaced by their semantic split
        let mut refined: Vec<CommitGroup> = Vec::new();
        for group in dir_groups {
            match &self.embedder {
                Some(embedder) if group.hunks.len() > REFINE_HUNK_THRESHOLD => {
                    debug!(group = %group.id, hunks = group.hunks.len(), "refining semantically");
                    let sub_diff = Self::subdiff_for(diff, &group);
                    let semantic =
                        SemanticStrategy::new(Arc::clone(embedder), SemanticConfig::default());
                    refined.extend(semantic.cluster(&sub_diff).await?);
                }
                _ => refined.push(group),
            }
        }

        // Summarize each group with a single conventional type. When a group
        // spans several types, only the first sub-group's type is surfaced.
        for group in &mut refined {
            let sub_diff = Self::subdiff_for(diff, group);
            if sub_diff.files.is_empty() {
                continue;
            }
            let type_groups = self.conventional.cluster(&sub_diff).await?;
            if let Some(first) = type_groups.first() {
                group.suggested_type = first.suggested_type;
            }
        }

        Ok(refined)
    }
}
