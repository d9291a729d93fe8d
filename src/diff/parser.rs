//! Unified diff text parsing.
//!
//! Converts raw `git diff` output into a [`ParsedDiff`]. Sections that cannot
//! be tokenized fail the whole parse with a [`DiffParseError`]; the parser
//! never silently skips an unparseable file.

use regex_lite::Regex;
use tracing::debug;

use crate::diff::model::{ChangeType, FileDiff, Hunk, Line, LineKind, ParsedDiff};
use crate::error::DiffParseError;

/// Parse raw unified-diff text into a [`ParsedDiff`].
///
/// Empty or whitespace-only input yields an empty diff with zero totals.
pub fn parse(text: &str) -> Result<ParsedDiff, DiffParseError> {
    if text.trim().is_empty() {
        return Ok(ParsedDiff::default());
    }

    let lines: Vec<&str> = text.lines().map(|l| l.strip_suffix('\r').unwrap_or(l)).collect();

    // Section boundaries on `diff --git`. Anything before the first boundary
    // (commit headers, prose) is preamble and ignored.
    let starts: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.starts_with("diff --git "))
        .map(|(idx, _)| idx)
        .collect();

    let mut diff = ParsedDiff::default();

    for (section_no, &start) in starts.iter().enumerate() {
        let end = starts.get(section_no + 1).copied().unwrap_or(lines.len());
        let file = parse_file_section(&lines[start..end])?;

        for hunk in &file.hunks {
            diff.total_added += hunk.added_count;
            diff.total_removed += hunk.removed_count;
        }
        diff.files.push(file);
    }

    debug!(
        files = diff.files.len(),
        added = diff.total_added,
        removed = diff.total_removed,
        "parsed diff"
    );

    Ok(diff)
}

/// Parsed extended-header metadata for one file section.
#[derive(Default)]
struct SectionMeta {
    is_new_file: bool,
    is_deleted_file: bool,
    rename_from: Option<String>,
    rename_to: Option<String>,
    is_binary: bool,
    old_header_path: Option<String>,
    new_header_path: Option<String>,
}

fn parse_file_section(section: &[&str]) -> Result<FileDiff, DiffParseError> {
    // First line is `diff --git a/X b/Y`; capture fallback paths from it.
    let git_line = section[0];
    let git_re = Regex::new(r"^diff --git a/(.+) b/(.+)$").unwrap();
    let (git_old, git_new) = match git_re.captures(git_line) {
        Some(caps) => (
            Some(caps.get(1).unwrap().as_str().to_string()),
            Some(caps.get(2).unwrap().as_str().to_string()),
        ),
        None => (None, None),
    };

    // Scan extended headers up to the first hunk.
    let mut meta = SectionMeta::default();
    let mut body_start = section.len();

    for (idx, line) in section.iter().enumerate().skip(1) {
        if line.starts_with("@@ ") || (*line == "@@") {
            body_start = idx;
            break;
        }
        if line.starts_with("new file mode") {
            meta.is_new_file = true;
        } else if line.starts_with("deleted file mode") {
            meta.is_deleted_file = true;
        } else if let Some(path) = line.strip_prefix("rename from ") {
            meta.rename_from = Some(path.to_string());
        } else if let Some(path) = line.strip_prefix("rename to ") {
            meta.rename_to = Some(path.to_string());
        } else if line.starts_with("Binary files ") || line.starts_with("GIT binary patch") {
            meta.is_binary = true;
        } else if let Some(path) = line.strip_prefix("--- ") {
            meta.old_header_path = strip_prefix_marker(path);
        } else if let Some(path) = line.strip_prefix("+++ ") {
            meta.new_header_path = strip_prefix_marker(path);
        }
        // index/mode/similarity lines carry nothing the model needs
    }

    let change_type = if meta.is_new_file {
        ChangeType::Added
    } else if meta.is_deleted_file {
        ChangeType::Deleted
    } else if meta.rename_from.is_some() || meta.rename_to.is_some() {
        ChangeType::Renamed
    } else {
        ChangeType::Modified
    };

    // The post-image header names the file, except for deletions where only
    // the pre-image exists. Renames carry their own explicit path pair.
    let path = match change_type {
        ChangeType::Renamed => meta.rename_to.clone().or(git_new),
        ChangeType::Deleted => meta.old_header_path.clone().or(git_old),
        _ => meta
            .new_header_path
            .clone()
            .or(meta.old_header_path.clone())
            .or(git_new),
    }
    .ok_or_else(|| DiffParseError::MissingFilePath {
        section: git_line.to_string(),
    })?;

    let old_path = match change_type {
        ChangeType::Renamed => meta.rename_from.clone(),
        _ => None,
    };

    let hunks = if meta.is_binary {
        Vec::new()
    } else {
        parse_hunks(&path, &section[body_start..])?
    };

    Ok(FileDiff {
        path,
        change_type,
        hunks,
        is_binary: meta.is_binary,
        old_path,
    })
}

/// Strip the `a/` or `b/` prefix from a `---`/`+++` header path.
///
/// Returns None for `/dev/null` (no file on that side).
fn strip_prefix_marker(path: &str) -> Option<String> {
    if path == "/dev/null" {
        return None;
    }
    let stripped = path
        .strip_prefix("a/")
        .or_else(|| path.strip_prefix("b/"))
        .unwrap_or(path);
    Some(stripped.to_string())
}

fn parse_hunks(path: &str, body: &[&str]) -> Result<Vec<Hunk>, DiffParseError> {
    let header_re = Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@(.*)$").unwrap();

    let mut hunks: Vec<Hunk> = Vec::new();

    for &line in body {
        if line.starts_with("@@") {
            let caps = header_re
                .captures(line)
                .ok_or_else(|| DiffParseError::MalformedHunkHeader {
                    path: path.to_string(),
                    header: line.to_string(),
                })?;

            // Omitted lengths in the `@@` header default to 1
            let source_start: u32 = caps[1].parse().unwrap_or(0);
            let source_length: u32 = caps.get(2).map_or(1, |m| m.as_str().parse().unwrap_or(1));
            let target_start: u32 = caps[3].parse().unwrap_or(0);
            let target_length: u32 = caps.get(4).map_or(1, |m| m.as_str().parse().unwrap_or(1));
            let section_header = caps.get(5).map_or("", |m| m.as_str()).trim().to_string();

            let index = hunks.len();
            hunks.push(Hunk {
                id: format!("{path}:{index}"),
                source_start,
                source_length,
                target_start,
                target_length,
                section_header,
                lines: Vec::new(),
                added_count: 0,
                removed_count: 0,
            });
            continue;
        }

        let Some(hunk) = hunks.last_mut() else {
            // Content before the first hunk header cannot be classified
            return Err(DiffParseError::UnexpectedLine {
                hunk_id: format!("{path}:?"),
                line: line.to_string(),
            });
        };

        // Position within the pre/post image derived from what the hunk has
        // consumed so far: context advances both sides, added only the
        // target, removed only the source.
        let source_no = hunk.source_start + hunk.removed_count + context_count(hunk);
        let target_no = hunk.target_start + hunk.added_count + context_count(hunk);

        if let Some(content) = line.strip_prefix('+') {
            hunk.lines.push(Line {
                content: content.to_string(),
                kind: LineKind::Added,
                source_line_no: None,
                target_line_no: Some(target_no),
            });
            hunk.added_count += 1;
        } else if let Some(content) = line.strip_prefix('-') {
            hunk.lines.push(Line {
                content: content.to_string(),
                kind: LineKind::Removed,
                source_line_no: Some(source_no),
                target_line_no: None,
            });
            hunk.removed_count += 1;
        } else if let Some(content) = line.strip_prefix(' ') {
            hunk.lines.push(Line {
                content: content.to_string(),
                kind: LineKind::Context,
                source_line_no: Some(source_no),
                target_line_no: Some(target_no),
            });
        } else if line.is_empty() {
            // Some tools strip the trailing space from blank context lines
            hunk.lines.push(Line {
                content: String::new(),
                kind: LineKind::Context,
                source_line_no: Some(source_no),
                target_line_no: Some(target_no),
            });
        } else if line.starts_with('\\') {
            // "\ No newline at end of file" — metadata, not content
        } else {
            return Err(DiffParseError::UnexpectedLine {
                hunk_id: hunk.id.clone(),
                line: line.to_string(),
            });
        }
    }

    Ok(hunks)
}

/// Count of context lines recorded so far in a hunk.
fn context_count(hunk: &Hunk) -> u32 {
    hunk.lines.len() as u32 - hunk.added_count - hunk.removed_count
}
