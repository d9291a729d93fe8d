//! schisma - partitions a unified git diff into atomic commit groups.
//!
//! # Overview
//!
//! schisma parses raw `git diff` text into a structural model (files, hunks,
//! lines) and partitions the hunks into semantically coherent commit groups
//! using one of four strategies: directory-based, embedding-based semantic,
//! LLM-assisted conventional-type classification, or a hybrid of the three.
//! Callers turn each group into a commit via their own tooling; schisma only
//! proposes the partition.
//!
//! The embedding and classification capabilities are injected trait objects,
//! so the engine stays free of transport concerns and tests can substitute
//! deterministic fakes.

pub mod classify;
pub mod cluster;
pub mod diff;
pub mod embed;
pub mod error;

// Re-export commonly used types
pub use classify::Classifier;
pub use cluster::{
    Capabilities, ClusteringStrategy, CommitGroup, CommitType, ConventionalStrategy,
    DirectoryStrategy, HunkRef, HybridStrategy, SemanticConfig, SemanticStrategy, Strategy,
    StrategyKind,
};
pub use diff::{ChangeType, FileDiff, Hunk, Line, LineKind, ParsedDiff, parse};
pub use embed::EmbeddingClient;
pub use error::{ClassificationError, ClusterError, DiffParseError, EmbeddingError};
