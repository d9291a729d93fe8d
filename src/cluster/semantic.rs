//! Embedding-based semantic clustering.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::cluster::ClusteringStrategy;
use crate::cluster::group::{CommitGroup, HunkRef};
use crate::cluster::linkage::cluster_by_threshold;
use crate::diff::model::{FileDiff, Hunk, ParsedDiff};
use crate::embed::EmbeddingClient;
use crate::error::{ClusterError, EmbeddingError};

/// Tuning for the semantic strategy.
#[derive(Debug, Clone, Copy)]
pub struct SemanticConfig {
    /// Cosine similarity above which hunks are considered related. The
    /// dendrogram is cut at distance `1 - similarity_threshold`.
    pub similarity_threshold: f32,
    /// Upper bound carried in the config; the threshold cut decides the
    /// actual cluster count.
    pub max_clusters: usize,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.5,
            max_clusters: 10,
        }
    }
}

/// Groups hunks whose embedded content is semantically similar.
///
/// One batched embedding call per `cluster` invocation; embedding failure
/// aborts the call with no fallback.
pub struct SemanticStrategy {
    embedder: Arc<dyn EmbeddingClient>,
    config: SemanticConfig,
}

impl SemanticStrategy {
    pub fn new(embedder: Arc<dyn EmbeddingClient>, config: SemanticConfig) -> Self {
        Self { embedder, config }
    }

    fn single_group(all_hunks: &[(&FileDiff, &Hunk)]) -> Vec<CommitGroup> {
        if all_hunks.is_empty() {
            return Vec::new();
        }

        let mut group = CommitGroup::new("semantic-0");
        group.reasoning = "Single change group".to_string();
        for (file, hunk) in all_hunks {
            group.hunks.push(HunkRef {
                file_path: file.path.clone(),
                hunk_id: hunk.id.clone(),
            });
            if !group.files.contains(&file.path) {
                group.files.push(file.path.clone());
            }
        }
        vec![group]
    }
}

/// The text embedded for one hunk: path, section header, then content.
fn hunk_text(file: &FileDiff, hunk: &Hunk) -> String {
    format!("File: {}\n{}\n{}", file.path, hunk.section_header, hunk.content())
}

#[async_trait]
impl ClusteringStrategy for SemanticStrategy {
    fn name(&self) -> &'static str {
        "semantic"
    }

    async fn cluster(&self, diff: &ParsedDiff) -> Result<Vec<CommitGroup>, ClusterError> {
        let all_hunks: Vec<(&FileDiff, &Hunk)> = diff.all_hunks().collect();

        // Nothing to relate; skip the embedding call entirely
        if all_hunks.len() <= 1 {
            return Ok(Self::single_group(&all_hunks));
        }

        let texts: Vec<String> = all_hunks
            .iter()
            .map(|(file, hunk)| hunk_text(file, hunk))
            .collect();

        let vectors = self.embedder.embed_texts(&texts).await?;
        if vectors.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                actual: vectors.len(),
            }
            .into());
        }

        // A ragged response would silently truncate cosine distances, so
        // every vector must share the first one's dimension
        let dims = vectors.first().map_or(0, Vec::len);
        if let Some((index, vector)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dims) {
            return Err(EmbeddingError::DimensionMismatch {
                index,
                expected: dims,
                actual: vector.len(),
            }
            .into());
        }

        let distance_threshold = 1.0 - self.config.similarity_threshold;
        let labels = cluster_by_threshold(&vectors, distance_threshold);
        debug!(
            hunks = all_hunks.len(),
            clusters = labels.iter().max().map_or(0, |m| m + 1),
            "semantic clustering complete"
        );

        // One group per label, in label order (labels are numbered by first
        // appearance in hunk order)
        let mut groups: Vec<CommitGroup> = Vec::new();
        for (idx, (file, hunk)) in all_hunks.iter().enumerate() {
            let label = labels[idx];

            if label == groups.len() {
                let mut group = CommitGroup::new(format!("semantic-{label}"));
                group.reasoning = format!("Semantically similar changes (cluster {label})");
                groups.push(group);
            }
            let group = &mut groups[label];

            group.hunks.push(HunkRef {
                file_path: file.path.clone(),
                hunk_id: hunk.id.clone(),
            });
            if !group.files.contains(&file.path) {
                group.files.push(file.path.clone());
            }
        }

        Ok(groups)
    }
}
