//! Clustering strategies: partitioning a parsed diff into commit groups.
//!
//! Four strategies implement the same contract. Every hunk of the input diff
//! ends up in exactly one group, whichever strategy runs.

pub mod conventional;
pub mod directory;
pub mod group;
pub mod hybrid;
pub mod linkage;
pub mod semantic;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::classify::Classifier;
use crate::diff::model::ParsedDiff;
use crate::embed::EmbeddingClient;
use crate::error::ClusterError;

pub use conventional::{CommitType, ConventionalStrategy};
pub use directory::DirectoryStrategy;
pub use group::{CommitGroup, HunkRef};
pub use hybrid::HybridStrategy;
pub use semantic::{SemanticConfig, SemanticStrategy};

/// Common contract: partition a parsed diff into an ordered list of commit
/// groups. Strategies never mutate the input diff.
#[async_trait]
pub trait ClusteringStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn cluster(&self, diff: &ParsedDiff) -> Result<Vec<CommitGroup>, ClusterError>;
}

/// The supported strategies, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Directory,
    Semantic,
    Conventional,
    Hybrid,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Directory => "directory",
            StrategyKind::Semantic => "semantic",
            StrategyKind::Conventional => "conventional",
            StrategyKind::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = ClusterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "directory" => Ok(Self::Directory),
            "semantic" => Ok(Self::Semantic),
            "conventional" => Ok(Self::Conventional),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(ClusterError::UnknownStrategy(other.to_string())),
        }
    }
}

/// A configured strategy, dispatched as a tagged union rather than open
/// dynamic lookup.
pub enum Strategy {
    Directory(DirectoryStrategy),
    Semantic(SemanticStrategy),
    Conventional(ConventionalStrategy),
    Hybrid(HybridStrategy),
}

impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Directory(_) => "Directory",
            Self::Semantic(_) => "Semantic",
            Self::Conventional(_) => "Conventional",
            Self::Hybrid(_) => "Hybrid",
        })
    }
}

/// Capability handles available when configuring a strategy.
#[derive(Default)]
pub struct Capabilities {
    pub embedder: Option<Arc<dyn EmbeddingClient>>,
    pub classifier: Option<Arc<dyn Classifier>>,
}

impl Strategy {
    /// Build a strategy of the given kind from the available capabilities.
    ///
    /// Fails fast when a required capability is missing; a strategy never
    /// silently degrades to a simpler one.
    pub fn configure(kind: StrategyKind, caps: &Capabilities) -> Result<Self, ClusterError> {
        match kind {
            StrategyKind::Directory => Ok(Strategy::Directory(DirectoryStrategy::default())),
            StrategyKind::Semantic => {
                let embedder = caps.embedder.clone().ok_or(ClusterError::MissingEmbedder {
                    strategy: kind.as_str(),
                })?;
                Ok(Strategy::Semantic(SemanticStrategy::new(
                    embedder,
                    SemanticConfig::default(),
                )))
            }
            StrategyKind::Conventional => {
                let classifier =
                    caps.classifier
                        .clone()
                        .ok_or(ClusterError::MissingClassifier {
                            strategy: kind.as_str(),
                        })?;
                Ok(Strategy::Conventional(ConventionalStrategy::new(classifier)))
            }
            StrategyKind::Hybrid => {
                let classifier =
                    caps.classifier
                        .clone()
                        .ok_or(ClusterError::MissingClassifier {
                            strategy: kind.as_str(),
                        })?;
                Ok(Strategy::Hybrid(HybridStrategy::new(
                    classifier,
                    caps.embedder.clone(),
                )))
            }
        }
    }
}

#[async_trait]
impl ClusteringStrategy for Strategy {
    fn name(&self) -> &'static str {
        match self {
            Strategy::Directory(s) => s.name(),
            Strategy::Semantic(s) => s.name(),
            Strategy::Conventional(s) => s.name(),
            Strategy::Hybrid(s) => s.name(),
        }
    }

    async fn cluster(&self, diff: &ParsedDiff) -> Result<Vec<CommitGroup>, ClusterError> {
        match self {
            Strategy::Directory(s) => s.cluster(diff).await,
            Strategy::Semantic(s) => s.cluster(diff).await,
            Strategy::Conventional(s) => s.cluster(diff).await,
            Strategy::Hybrid(s) => s.cluster(diff).await,
        }
    }
}
