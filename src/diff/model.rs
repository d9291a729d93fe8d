//! Structural model of a parsed unified diff.
//!
//! A [`ParsedDiff`] contains [`FileDiff`]s, each containing [`Hunk`]s, each
//! containing [`Line`]s. Instances are built once by the parser and read-only
//! afterwards; clustering strategies never mutate them, though they may build
//! smaller sub-diffs via [`ParsedDiff::restricted_to`].

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

/// Kind of change for a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Added,
    Removed,
    Context,
}

/// A single physical line inside a hunk, prefix stripped.
#[derive(Debug, Clone, Serialize)]
pub struct Line {
    pub content: String,
    pub kind: LineKind,
    /// Line number in the pre-image (None for added lines).
    pub source_line_no: Option<u32>,
    /// Line number in the post-image (None for removed lines).
    pub target_line_no: Option<u32>,
}

/// A contiguous change block within one file, bounded by an `@@` header.
#[derive(Debug, Clone, Serialize)]
pub struct Hunk {
    /// Unique identifier: `{file_path}:{hunk_index}`.
    pub id: String,
    pub source_start: u32,
    pub source_length: u32,
    pub target_start: u32,
    pub target_length: u32,
    /// Text following the `@@` header, often a function or class name.
    pub section_header: String,
    pub lines: Vec<Line>,
    pub added_count: u32,
    pub removed_count: u32,
}

impl Hunk {
    /// Raw hunk content: line contents joined by newlines.
    ///
    /// This is the unit of text handed to the embedding capability.
    pub fn content(&self) -> String {
        let mut out = String::new();
        for (idx, line) in self.lines.iter().enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            out.push_str(&line.content);
        }
        out
    }
}

/// Kind of change for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Modified,
    Deleted,
    Renamed,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeType::Added => write!(f, "added"),
            ChangeType::Modified => write!(f, "modified"),
            ChangeType::Deleted => write!(f, "deleted"),
            ChangeType::Renamed => write!(f, "renamed"),
        }
    }
}

/// One file entry in a diff.
#[derive(Debug, Clone, Serialize)]
pub struct FileDiff {
    pub path: String,
    pub change_type: ChangeType,
    /// Empty for binary files.
    pub hunks: Vec<Hunk>,
    pub is_binary: bool,
    /// Pre-rename path, populated only when `change_type` is Renamed.
    pub old_path: Option<String>,
}

impl FileDiff {
    /// Parent directory of the path, `"."` for files at the repo root.
    pub fn directory(&self) -> String {
        match self.path.rsplit_once('/') {
            Some((dir, _)) => dir.to_string(),
            None => ".".to_string(),
        }
    }

    /// File extension including the dot, empty if none.
    pub fn extension(&self) -> String {
        let name = self.path.rsplit('/').next().unwrap_or(&self.path);
        match name.rfind('.') {
            Some(idx) if idx > 0 => name[idx..].to_string(),
            _ => String::new(),
        }
    }
}

/// The complete parsed diff.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedDiff {
    pub files: Vec<FileDiff>,
    /// Sum of added lines across all hunks of all files.
    pub total_added: u32,
    /// Sum of removed lines across all hunks of all files.
    pub total_removed: u32,
}

impl ParsedDiff {
    /// Flatten all hunks with their parent file, in file order then hunk
    /// order. Every strategy that works at hunk granularity iterates this.
    pub fn all_hunks(&self) -> impl Iterator<Item = (&FileDiff, &Hunk)> {
        self.files
            .iter()
            .flat_map(|file| file.hunks.iter().map(move |hunk| (file, hunk)))
    }

    /// Build a sub-diff restricted to the given file paths.
    ///
    /// Totals are recomputed from the included files' hunks, never copied
    /// from the parent diff.
    pub fn restricted_to(&self, paths: &HashSet<&str>) -> ParsedDiff {
        let files: Vec<FileDiff> = self
            .files
            .iter()
            .filter(|f| paths.contains(f.path.as_str()))
            .cloned()
            .collect();

        let total_added = files
            .iter()
            .flat_map(|f| f.hunks.iter())
            .map(|h| h.added_count)
            .sum();
        let total_removed = files
            .iter()
            .flat_map(|f| f.hunks.iter())
            .map(|h| h.removed_count)
            .sum();

        ParsedDiff {
            files,
            total_added,
            total_removed,
        }
    }
}
