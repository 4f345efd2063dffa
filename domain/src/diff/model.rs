//! Addressable diff model
//!
//! A [`Diff`] is the normalized form of a unified diff. Every added or context
//! line carries its line number in the new file, which is the coordinate the
//! code host uses to anchor inline review comments.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// How a file was changed by the pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Modified => "modified",
            ChangeKind::Deleted => "deleted",
            ChangeKind::Renamed => "renamed",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tag of a single hunk line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Context,
    Added,
    Removed,
}

impl LineKind {
    /// Unified diff prefix character
    pub fn prefix(&self) -> char {
        match self {
            LineKind::Context => ' ',
            LineKind::Added => '+',
            LineKind::Removed => '-',
        }
    }
}

/// One line of a hunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub kind: LineKind,
    pub content: String,
    /// Line number in the old file (absent for added lines)
    pub old_line: Option<u32>,
    /// Line number in the new file (absent for removed lines)
    pub new_line: Option<u32>,
}

impl DiffLine {
    /// Whether an inline comment may be anchored on this line
    pub fn is_anchor(&self) -> bool {
        matches!(self.kind, LineKind::Added | LineKind::Context)
    }
}

/// A contiguous block of changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
    /// Text after the closing `@@` (usually the enclosing function)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub section: String,
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    /// Get a summary of changes in this hunk as (additions, deletions)
    pub fn summary(&self) -> (usize, usize) {
        let adds = self
            .lines
            .iter()
            .filter(|l| l.kind == LineKind::Added)
            .count();
        let removes = self
            .lines
            .iter()
            .filter(|l| l.kind == LineKind::Removed)
            .count();
        (adds, removes)
    }

    /// Inclusive new-file range covered by this hunk, if it covers any line
    pub fn new_range(&self) -> Option<(u32, u32)> {
        let mut anchors = self.lines.iter().filter_map(|l| l.new_line);
        let first = anchors.next()?;
        let last = anchors.last().unwrap_or(first);
        Some((first, last))
    }
}

/// One file touched by the diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    /// Path in the new tree (old path for deleted files)
    pub path: String,
    /// Previous path, present for renames
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_path: Option<String>,
    pub kind: ChangeKind,
    #[serde(default)]
    pub binary: bool,
    pub hunks: Vec<Hunk>,
}

impl FileChange {
    pub fn new(path: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            old_path: None,
            kind,
            binary: false,
            hunks: Vec::new(),
        }
    }

    /// Lines that can carry an inline comment, in new-file order
    pub fn anchor_lines(&self) -> impl Iterator<Item = u32> + '_ {
        self.hunks
            .iter()
            .flat_map(|h| h.lines.iter())
            .filter(|l| l.is_anchor())
            .filter_map(|l| l.new_line)
    }

    /// Get total additions and deletions
    pub fn stats(&self) -> (usize, usize) {
        self.hunks.iter().fold((0, 0), |acc, h| {
            let (a, r) = h.summary();
            (acc.0 + a, acc.1 + r)
        })
    }
}

/// Normalized diff of a pull request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diff {
    pub files: Vec<FileChange>,
}

impl Diff {
    pub fn file(&self, path: &str) -> Option<&FileChange> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.path.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total (additions, deletions) across all files
    pub fn stats(&self) -> (usize, usize) {
        self.files.iter().fold((0, 0), |acc, f| {
            let (a, r) = f.stats();
            (acc.0 + a, acc.1 + r)
        })
    }

    /// Build the coordinate space used for inline comment placement
    pub fn anchors(&self) -> AnchorIndex {
        let mut by_path: BTreeMap<String, BTreeSet<u32>> = BTreeMap::new();
        for file in &self.files {
            let lines: BTreeSet<u32> = file.anchor_lines().collect();
            if !lines.is_empty() {
                by_path.entry(file.path.clone()).or_default().extend(lines);
            }
        }
        AnchorIndex { by_path }
    }
}

/// Set of valid `(path, new-line)` anchors in a diff
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorIndex {
    by_path: BTreeMap<String, BTreeSet<u32>>,
}

impl AnchorIndex {
    pub fn contains(&self, path: &str, line: u32) -> bool {
        self.by_path
            .get(path)
            .is_some_and(|lines| lines.contains(&line))
    }

    pub fn has_file(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }

    /// Number of anchorable lines across all files
    pub fn len(&self) -> usize {
        self.by_path.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }
}
