//! Conventional-commit type clustering.
//!
//! Classifies every file in a single batched request (one prompt listing all
//! files, expecting a path → type mapping back) rather than one request per
//! file, to bound request volume on large diffs.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classify::{Classifier, extract_json};
use crate::cluster::ClusteringStrategy;
use crate::cluster::group::{CommitGroup, HunkRef};
use crate::diff::model::{FileDiff, ParsedDiff};
use crate::error::{ClassificationError, ClusterError};

/// Maximum characters of the first hunk shown per file in the prompt.
const PREVIEW_LENGTH: usize = 500;

/// Conventional commit types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Style,
    Refactor,
    Perf,
    Test,
    Build,
    Ci,
    Chore,
}

impl CommitType {
    /// The full fixed vocabulary, in prompt order.
    pub const ALL: [CommitType; 10] = [
        CommitType::Feat,
        CommitType::Fix,
        CommitType::Docs,
        CommitType::Style,
        CommitType::Refactor,
        CommitType::Perf,
        CommitType::Test,
        CommitType::Build,
        CommitType::Ci,
        CommitType::Chore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Docs => "docs",
            CommitType::Style => "style",
            CommitType::Refactor => "refactor",
            CommitType::Perf => "perf",
            CommitType::Test => "test",
            CommitType::Build => "build",
            CommitType::Ci => "ci",
            CommitType::Chore => "chore",
        }
    }
}

impl std::fmt::Display for CommitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "feat" => Ok(Self::Feat),
            "fix" => Ok(Self::Fix),
            "docs" => Ok(Self::Docs),
            "style" => Ok(Self::Style),
            "refactor" => Ok(Self::Refactor),
            "perf" => Ok(Self::Perf),
            "test" => Ok(Self::Test),
            "build" => Ok(Self::Build),
            "ci" => Ok(Self::Ci),
            "chore" => Ok(Self::Chore),
            _ => Err(format!("Unknown commit type: {}", s)),
        }
    }
}

/// Groups files by the conventional commit type an LLM assigns them.
pub struct ConventionalStrategy {
    classifier: Arc<dyn Classifier>,
}

impl ConventionalStrategy {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    async fn classify_files(
        &self,
        diff: &ParsedDiff,
    ) -> Result<HashMap<String, CommitType>, ClusterError> {
        let prompt = build_classification_prompt(diff);
        debug!(files = diff.files.len(), "requesting batched classification");

        let response = self.classifier.classify(&prompt).await?;
        let json_str = extract_json(&response);

        let raw: HashMap<String, String> = serde_json::from_str(&json_str).map_err(|e| {
            ClassificationError::InvalidResponse(format!(
                "{e}: {}",
                json_str.chars().take(200).collect::<String>()
            ))
        })?;

        let mut classifications = HashMap::new();
        for file in &diff.files {
            let commit_type = match raw.get(&file.path) {
                Some(label) => label.parse::<CommitType>().unwrap_or_else(|_| {
                    warn!(path = %file.path, label = %label, "label outside vocabulary, defaulting to chore");
                    CommitType::Chore
                }),
                None => {
                    warn!(path = %file.path, "path missing from classification, defaulting to chore");
                    CommitType::Chore
                }
            };
            classifications.insert(file.path.clone(), commit_type);
        }

        Ok(classifications)
    }
}

#[async_trait]
impl ClusteringStrategy for ConventionalStrategy {
    fn name(&self) -> &'static str {
        "conventional"
    }

    async fn cluster(&self, diff: &ParsedDiff) -> Result<Vec<CommitGroup>, ClusterError> {
        if diff.files.is_empty() {
            return Ok(Vec::new());
        }

        let classifications = self.classify_files(diff).await?;

        // Groups form in file order, keyed by type
        let mut groups: Vec<CommitGroup> = Vec::new();
        for file in &diff.files {
            let commit_type = classifications[&file.path];

            let idx = match groups
                .iter()
                .position(|g| g.suggested_type == Some(commit_type))
            {
                Some(idx) => idx,
                None => {
                    let mut group = CommitGroup::new(format!("conv-{commit_type}"));
                    group.suggested_type = Some(commit_type);
                    group.reasoning = format!("Changes classified as '{commit_type}'");
                    groups.push(group);
                    groups.len() - 1
                }
            };
            let group = &mut groups[idx];

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

/// Build the single batched classification prompt.
///
/// Lists every file with its change type and a short preview of its first
/// hunk; asks for one JSON object mapping each path to a type.
pub fn build_classification_prompt(diff: &ParsedDiff) -> String {
    let files_section: String = diff
        .files
        .iter()
        .map(format_file_entry)
        .collect::<Vec<_>>()
        .join("\n");

    let vocabulary = CommitType::ALL
        .iter()
        .map(CommitType::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Classify each changed file into ONE conventional commit type.

## Changed Files
{files_section}

## Rules
1. Available types: {vocabulary}
2. Every file path must appear in the response exactly once
3. Use the file path, change type and preview to judge the intent of the change

Respond with ONLY a JSON object mapping each file path to its type (no markdown, no explanation):
{{"path/to/file.rs": "feat"}}"#
    )
}

fn format_file_entry(file: &FileDiff) -> String {
    let preview: String = file
        .hunks
        .first()
        .map(|h| h.content().chars().take(PREVIEW_LENGTH).collect())
        .unwrap_or_default();

    if preview.is_empty() {
        format!("- {} ({})", file.path, file.change_type)
    } else {
        format!("- {} ({})\n```\n{}\n```", file.path, file.change_type, preview)
    }
}
