//! Error types for schisma modules using thiserror.

use thiserror::Error;

/// Errors from parsing unified diff text.
#[derive(Error, Debug)]
pub enum DiffParseError {
    #[error("Malformed hunk header '{header}' in section for '{path}'")]
    MalformedHunkHeader { path: String, header: String },

    #[error("Could not determine file path for diff section: {section}")]
    MissingFilePath { section: String },

    #[error("Unparseable line '{line}' inside hunk '{hunk_id}'")]
    UnexpectedLine { hunk_id: String, line: String },
}

/// Errors from the embedding capability.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("Embedding request failed: {0}")]
    RequestFailed(String),

    #[error("Embedding provider returned {actual} vectors for {expected} texts")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Embedding vector {index} has {actual} dimensions, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
}

/// Errors from the text-classification capability.
#[derive(Error, Debug)]
pub enum ClassificationError {
    #[error("Classification request failed: {0}")]
    RequestFailed(String),

    #[error("Classification response was not a JSON object mapping paths to types: {0}")]
    InvalidResponse(String),
}

/// Errors from running a clustering strategy.
#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("The '{strategy}' strategy requires an embedding client but none was configured")]
    MissingEmbedder { strategy: &'static str },

    #[error("The '{strategy}' strategy requires a classifier but none was configured")]
    MissingClassifier { strategy: &'static str },

    #[error("Unknown clustering strategy: {0}")]
    UnknownStrategy(String),

    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Classification failed: {0}")]
    Classification(#[from] ClassificationError),
}
