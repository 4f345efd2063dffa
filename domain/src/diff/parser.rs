//! Unified diff normalization
//!
//! Parsing is driven by the line counts declared in each hunk header, so a
//! removed line whose content starts with `--` or an added line starting with
//! `++` is never mistaken for a file header. Any disagreement between the
//! declared counts and the actual hunk body is reported as
//! [`DomainError::MalformedDiff`]; a best-effort parse would shift line numbers
//! and misplace inline comments.

use super::model::{ChangeKind, Diff, DiffLine, FileChange, Hunk, LineKind};
use crate::core::error::DomainError;

/// Parse raw unified diff text (as produced by `git diff` or a code host)
pub fn parse_unified_diff(text: &str) -> Result<Diff, DomainError> {
    let lines: Vec<&str> = text.lines().collect();
    let mut files: Vec<FileChange> = Vec::new();
    let mut pending: Option<PendingFile> = None;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let lineno = i + 1;

        if let Some(rest) = line.strip_prefix("diff --git ") {
            flush(&mut files, pending.take());
            pending = Some(PendingFile::from_git_header(rest));
            i += 1;
            continue;
        }

        if let Some(old) = line.strip_prefix("--- ")
            && let Some(new) = lines.get(i + 1).and_then(|n| n.strip_prefix("+++ "))
        {
            let old_path = header_path(old);
            let new_path = header_path(new);
            match pending.as_mut() {
                Some(file) if file.git && !file.has_paths && file.change.hunks.is_empty() => {
                    file.set_paths(old_path, new_path);
                }
                _ => {
                    flush(&mut files, pending.take());
                    let mut file = PendingFile::plain();
                    file.set_paths(old_path, new_path);
                    pending = Some(file);
                }
            }
            i += 2;
            continue;
        }

        if line.starts_with("@@") {
            let Some(file) = pending.as_mut() else {
                return Err(DomainError::malformed(
                    lineno,
                    "hunk header outside of a file section",
                ));
            };
            let (hunk, consumed) = parse_hunk(&lines, i)?;
            file.push_hunk(hunk, lineno)?;
            i += consumed;
            continue;
        }

        if let Some(file) = pending.as_mut() {
            if file.git && file.change.hunks.is_empty() && file.apply_extended_header(line) {
                i += 1;
                continue;
            }
            if line.starts_with('+') || line.starts_with('-') || line.starts_with(' ') {
                return Err(DomainError::malformed(
                    lineno,
                    "change line outside of any hunk (declared hunk length too short?)",
                ));
            }
        }

        // Preamble text, blank separators and `\ No newline` markers
        i += 1;
    }

    flush(&mut files, pending.take());
    Ok(Diff { files })
}

/// Validate an already-structured diff supplied by the host collaborator
///
/// Applies the same consistency rules as [`parse_unified_diff`]: declared hunk
/// counts must match the line entries, line numbers must follow the hunk
/// header arithmetic, and new-file line numbers must increase across hunks.
pub fn validate_files(files: Vec<FileChange>) -> Result<Diff, DomainError> {
    for (file_idx, file) in files.iter().enumerate() {
        let position = file_idx + 1;
        if file.path.trim().is_empty() {
            return Err(DomainError::malformed(position, "file change without a path"));
        }
        let mut last_new: Option<u32> = None;
        let mut last_old: Option<u32> = None;
        for hunk in &file.hunks {
            let mut old_no = hunk.old_start;
            let mut new_no = hunk.new_start;
            let (mut old_seen, mut new_seen) = (0u32, 0u32);
            for entry in &hunk.lines {
                let (expect_old, expect_new) = match entry.kind {
                    LineKind::Context => (Some(old_no), Some(new_no)),
                    LineKind::Added => (None, Some(new_no)),
                    LineKind::Removed => (Some(old_no), None),
                };
                if entry.old_line != expect_old || entry.new_line != expect_new {
                    return Err(DomainError::malformed(
                        position,
                        format!(
                            "{}: line numbering disagrees with hunk header @@ -{},{} +{},{} @@",
                            file.path, hunk.old_start, hunk.old_count, hunk.new_start, hunk.new_count
                        ),
                    ));
                }
                if expect_old.is_some() {
                    old_no = advance(old_no, position)?;
                    old_seen += 1;
                }
                if expect_new.is_some() {
                    new_no = advance(new_no, position)?;
                    new_seen += 1;
                }
            }
            if old_seen != hunk.old_count || new_seen != hunk.new_count {
                return Err(DomainError::malformed(
                    position,
                    format!(
                        "{}: hunk declares -{} +{} lines but contains -{} +{}",
                        file.path, hunk.old_count, hunk.new_count, old_seen, new_seen
                    ),
                ));
            }
            check_monotonic(&mut last_old, &mut last_new, hunk, position)?;
        }
    }
    Ok(Diff { files })
}

struct PendingFile {
    change: FileChange,
    /// Section opened by a `diff --git` line (extended headers allowed)
    git: bool,
    has_paths: bool,
    last_old: Option<u32>,
    last_new: Option<u32>,
}

impl PendingFile {
    fn plain() -> Self {
        Self {
            change: FileChange::new(String::new(), ChangeKind::Modified),
            git: false,
            has_paths: false,
            last_old: None,
            last_new: None,
        }
    }

    fn from_git_header(rest: &str) -> Self {
        let mut file = Self::plain();
        file.git = true;
        if let Some((old, new)) = split_git_header(rest) {
            file.change.path = new.clone();
            if old != new {
                file.change.old_path = Some(old);
                file.change.kind = ChangeKind::Renamed;
            }
        }
        file
    }

    fn set_paths(&mut self, old: Option<String>, new: Option<String>) {
        self.has_paths = true;
        match (old, new) {
            (None, Some(new)) => {
                self.change.path = new;
                self.change.kind = ChangeKind::Added;
                self.change.old_path = None;
            }
            (Some(old), None) => {
                self.change.path = old;
                self.change.kind = ChangeKind::Deleted;
                self.change.old_path = None;
            }
            (Some(old), Some(new)) => {
                if old != new {
                    self.change.old_path = Some(old);
                    self.change.kind = ChangeKind::Renamed;
                } else if self.change.kind == ChangeKind::Renamed {
                    self.change.old_path = None;
                    self.change.kind = ChangeKind::Modified;
                }
                self.change.path = new;
            }
            (None, None) => {}
        }
    }

    /// Apply a git extended header line; returns false when the line is not one
    fn apply_extended_header(&mut self, line: &str) -> bool {
        if line.starts_with("new file mode") {
            self.change.kind = ChangeKind::Added;
            self.change.old_path = None;
        } else if line.starts_with("deleted file mode") {
            self.change.kind = ChangeKind::Deleted;
            self.change.old_path = None;
        } else if let Some(from) = line.strip_prefix("rename from ") {
            self.change.old_path = Some(unquote(from));
            self.change.kind = ChangeKind::Renamed;
        } else if let Some(to) = line.strip_prefix("rename to ") {
            self.change.path = unquote(to);
            self.change.kind = ChangeKind::Renamed;
        } else if line.starts_with("Binary files ") || line.starts_with("GIT binary patch") {
            self.change.binary = true;
        } else if self.change.binary && !line.is_empty() {
            // Base85 payload of a `GIT binary patch` section
        } else if !(line.starts_with("index ")
            || line.starts_with("similarity index")
            || line.starts_with("dissimilarity index")
            || line.starts_with("old mode")
            || line.starts_with("new mode")
            || line.starts_with("copy from")
            || line.starts_with("copy to"))
        {
            return false;
        }
        true
    }

    fn push_hunk(&mut self, hunk: Hunk, lineno: usize) -> Result<(), DomainError> {
        if self.change.path.is_empty() {
            return Err(DomainError::malformed(lineno, "hunk before any file path"));
        }
        check_monotonic(&mut self.last_old, &mut self.last_new, &hunk, lineno)?;
        self.change.hunks.push(hunk);
        Ok(())
    }
}

fn flush(files: &mut Vec<FileChange>, pending: Option<PendingFile>) {
    if let Some(file) = pending
        && !file.change.path.is_empty()
    {
        files.push(file.change);
    }
}

fn check_monotonic(
    last_old: &mut Option<u32>,
    last_new: &mut Option<u32>,
    hunk: &Hunk,
    lineno: usize,
) -> Result<(), DomainError> {
    for entry in &hunk.lines {
        if let Some(new) = entry.new_line {
            if last_new.is_some_and(|last| new <= last) {
                return Err(DomainError::malformed(
                    lineno,
                    format!("new-file line {} is not after line {}", new, last_new.unwrap_or(0)),
                ));
            }
            *last_new = Some(new);
        }
        if let Some(old) = entry.old_line {
            if last_old.is_some_and(|last| old <= last) {
                return Err(DomainError::malformed(
                    lineno,
                    format!("old-file line {} is not after line {}", old, last_old.unwrap_or(0)),
                ));
            }
            *last_old = Some(old);
        }
    }
    Ok(())
}

/// Parse one hunk starting at `start` (the `@@` line).
///
/// Returns the hunk and the number of input lines consumed.
fn parse_hunk(lines: &[&str], start: usize) -> Result<(Hunk, usize), DomainError> {
    let header_lineno = start + 1;
    let (old_start, old_count, new_start, new_count, section) =
        parse_hunk_header(lines[start]).ok_or_else(|| {
            DomainError::malformed(
                header_lineno,
                format!("unparsable hunk header: {}", lines[start]),
            )
        })?;

    let mut hunk = Hunk {
        old_start,
        old_count,
        new_start,
        new_count,
        section,
        lines: Vec::new(),
    };

    let (mut old_left, mut new_left) = (old_count, new_count);
    let (mut old_no, mut new_no) = (old_start, new_start);
    let mut idx = start + 1;

    while old_left > 0 || new_left > 0 {
        let Some(&raw) = lines.get(idx) else {
            return Err(DomainError::malformed(
                header_lineno,
                format!(
                    "hunk truncated: {} old and {} new lines missing",
                    old_left, new_left
                ),
            ));
        };
        let lineno = idx + 1;
        idx += 1;

        if raw.starts_with('\\') {
            continue;
        }

        let (kind, content) = match raw.chars().next() {
            None => (LineKind::Context, ""),
            Some(' ') => (LineKind::Context, &raw[1..]),
            Some('+') => (LineKind::Added, &raw[1..]),
            Some('-') => (LineKind::Removed, &raw[1..]),
            Some(_) => {
                return Err(DomainError::malformed(
                    lineno,
                    format!(
                        "hunk body ended early: {} old and {} new lines missing",
                        old_left, new_left
                    ),
                ));
            }
        };

        let consumes_old = kind != LineKind::Added;
        let consumes_new = kind != LineKind::Removed;
        if (consumes_old && old_left == 0) || (consumes_new && new_left == 0) {
            return Err(DomainError::malformed(
                lineno,
                "hunk contains more lines than its header declares",
            ));
        }

        hunk.lines.push(DiffLine {
            kind,
            content: content.to_string(),
            old_line: consumes_old.then_some(old_no),
            new_line: consumes_new.then_some(new_no),
        });

        if consumes_old {
            old_left -= 1;
            old_no = advance(old_no, lineno)?;
        }
        if consumes_new {
            new_left -= 1;
            new_no = advance(new_no, lineno)?;
        }
    }

    while lines.get(idx).is_some_and(|l| l.starts_with('\\')) {
        idx += 1;
    }

    Ok((hunk, idx - start))
}

/// Next line number, rejecting numbering past `u32::MAX`
fn advance(line_no: u32, position: usize) -> Result<u32, DomainError> {
    line_no
        .checked_add(1)
        .ok_or_else(|| DomainError::malformed(position, "line number overflow"))
}

/// Parse `@@ -a[,b] +c[,d] @@ section`
fn parse_hunk_header(line: &str) -> Option<(u32, u32, u32, u32, String)> {
    let trimmed = line.strip_prefix("@@ ")?;
    let (ranges, section) = trimmed.split_once(" @@")?;
    let mut parts = ranges.split_whitespace();
    let (old_start, old_count) = parse_range(parts.next()?.strip_prefix('-')?)?;
    let (new_start, new_count) = parse_range(parts.next()?.strip_prefix('+')?)?;
    if parts.next().is_some() {
        return None;
    }
    // Line numbers are 1-based; 0 is only valid for an empty side
    if (old_start == 0 && old_count > 0) || (new_start == 0 && new_count > 0) {
        return None;
    }
    Some((
        old_start,
        old_count,
        new_start,
        new_count,
        section.trim().to_string(),
    ))
}

/// Parse a range like "10,5" or "10" into (start, count)
fn parse_range(s: &str) -> Option<(u32, u32)> {
    match s.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((s.parse().ok()?, 1)),
    }
}

/// Path from a `---`/`+++` header; `None` for `/dev/null`
fn header_path(raw: &str) -> Option<String> {
    let raw = raw.split('\t').next().unwrap_or(raw).trim_end();
    let raw = unquote(raw);
    if raw == "/dev/null" {
        return None;
    }
    Some(strip_side_prefix(&raw).to_string())
}

/// Split `a/<old> b/<new>` from a `diff --git` line
fn split_git_header(rest: &str) -> Option<(String, String)> {
    let rest = rest.trim();
    if rest.starts_with('"') {
        let (old, new) = rest.split_once("\" ")?;
        let old = unquote(&format!("{}\"", old));
        let new = unquote(new);
        return Some((
            strip_side_prefix(&old).to_string(),
            strip_side_prefix(&new).to_string(),
        ));
    }
    // Unchanged path: "a/X b/X" has an unambiguous midpoint even with spaces
    if rest.len() > 5 && (rest.len() - 5) % 2 == 0 {
        let half = (rest.len() - 5) / 2;
        if let (Some(old), Some(sep), Some(new)) = (
            rest.get(2..2 + half),
            rest.get(2 + half..5 + half),
            rest.get(5 + half..),
        ) && rest.starts_with("a/")
            && sep == " b/"
            && old == new
        {
            return Some((old.to_string(), new.to_string()));
        }
    }
    let split = rest.rfind(" b/")?;
    Some((
        strip_side_prefix(&rest[..split]).to_string(),
        strip_side_prefix(&rest[split + 1..]).to_string(),
    ))
}

fn strip_side_prefix(path: &str) -> &str {
    path.strip_prefix("a/")
        .or_else(|| path.strip_prefix("b/"))
        .unwrap_or(path)
}

fn unquote(s: &str) -> String {
    let s = s.trim();
    match s.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(inner) => inner.replace("\\\"", "\"").replace("\\\\", "\\"),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODIFIED: &str = "diff --git a/src/auth.py b/src/auth.py
index 3b18e51..a9c2f10 100644
--- a/src/auth.py
+++ b/src/auth.py
@@ -10,6 +10,7 @@ def login(user, password):
     if not user:
         return None
-    query = \"SELECT * FROM users WHERE name='%s'\" % user
+    query = \"SELECT * FROM users WHERE name=%s\"
+    params = (user,)
     row = db.execute(query)
     if row is None:
         return None
@@ -40,3 +41,4 @@ def logout(session):
     session.clear()
+    audit.log(\"logout\")
     return True

";

    #[test]
    fn test_parse_modified_file() {
        let diff = parse_unified_diff(MODIFIED).unwrap();
        assert_eq!(diff.files.len(), 1);
        let file = &diff.files[0];
        assert_eq!(file.path, "src/auth.py");
        assert_eq!(file.kind, ChangeKind::Modified);
        assert_eq!(file.hunks.len(), 2);
        assert_eq!(file.hunks[0].section, "def login(user, password):");

        let first = &file.hunks[0];
        assert_eq!(first.lines.len(), 8);
        assert_eq!(first.lines[2].kind, LineKind::Removed);
        assert_eq!(first.lines[2].old_line, Some(12));
        assert_eq!(first.lines[2].new_line, None);
        assert_eq!(first.lines[3].kind, LineKind::Added);
        assert_eq!(first.lines[3].new_line, Some(12));
        assert_eq!(first.lines[4].new_line, Some(13));
        assert_eq!(first.lines[7].new_line, Some(16));

        let second = &file.hunks[1];
        assert_eq!(second.lines[1].kind, LineKind::Added);
        assert_eq!(second.lines[1].new_line, Some(42));
        // Trailing context line with empty content
        assert_eq!(second.lines[3].new_line, Some(44));
    }

    #[test]
    fn test_anchor_coordinates() {
        let diff = parse_unified_diff(MODIFIED).unwrap();
        let anchors = diff.anchors();
        assert!(anchors.contains("src/auth.py", 12));
        assert!(anchors.contains("src/auth.py", 42));
        assert!(!anchors.contains("src/auth.py", 20));
        assert!(!anchors.contains("src/other.py", 12));
    }

    #[test]
    fn test_normalizing_twice_is_identical() {
        let first = parse_unified_diff(MODIFIED).unwrap();
        let second = parse_unified_diff(MODIFIED).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.anchors(), second.anchors());
    }

    #[test]
    fn test_new_and_deleted_files() {
        let text = "diff --git a/a.py b/a.py
new file mode 100644
index 0000000..e69de29
--- /dev/null
+++ b/a.py
@@ -0,0 +1,2 @@
+import os
+print(os.getcwd())
diff --git a/old.txt b/old.txt
deleted file mode 100644
--- a/old.txt
+++ /dev/null
@@ -1 +0,0 @@
-bye
";
        let diff = parse_unified_diff(text).unwrap();
        assert_eq!(diff.files.len(), 2);
        assert_eq!(diff.files[0].kind, ChangeKind::Added);
        assert_eq!(diff.files[0].path, "a.py");
        assert_eq!(diff.files[0].hunks[0].lines[1].new_line, Some(2));
        assert_eq!(diff.files[1].kind, ChangeKind::Deleted);
        assert_eq!(diff.files[1].path, "old.txt");
        assert_eq!(diff.files[1].anchor_lines().count(), 0);
    }

    #[test]
    fn test_rename_and_binary_have_no_hunks() {
        let text = "diff --git a/docs/old.md b/docs/new.md
similarity index 100%
rename from docs/old.md
rename to docs/new.md
diff --git a/logo.png b/logo.png
index 1111111..2222222 100644
Binary files a/logo.png and b/logo.png differ
";
        let diff = parse_unified_diff(text).unwrap();
        assert_eq!(diff.files.len(), 2);
        assert_eq!(diff.files[0].kind, ChangeKind::Renamed);
        assert_eq!(diff.files[0].path, "docs/new.md");
        assert_eq!(diff.files[0].old_path.as_deref(), Some("docs/old.md"));
        assert!(diff.files[0].hunks.is_empty());
        assert!(diff.files[1].binary);
        assert!(diff.files[1].hunks.is_empty());
        assert!(diff.anchors().is_empty());
    }

    #[test]
    fn test_removed_line_that_looks_like_header() {
        let text = "--- a/notes.md
+++ b/notes.md
@@ -1,2 +1,2 @@
--- old separator
+++ new separator
 tail
";
        let diff = parse_unified_diff(text).unwrap();
        let lines = &diff.files[0].hunks[0].lines;
        assert_eq!(lines[0].kind, LineKind::Removed);
        assert_eq!(lines[0].content, "-- old separator");
        assert_eq!(lines[1].kind, LineKind::Added);
        assert_eq!(lines[1].new_line, Some(1));
    }

    #[test]
    fn test_plain_multi_file_diff() {
        let text = "--- a/x.rs
+++ b/x.rs
@@ -1 +1 @@
-a
+b
--- a/y.rs
+++ b/y.rs
@@ -3 +3,2 @@
 c
+d
";
        let diff = parse_unified_diff(text).unwrap();
        assert_eq!(diff.paths().collect::<Vec<_>>(), vec!["x.rs", "y.rs"]);
        assert!(diff.anchors().contains("y.rs", 4));
    }

    #[test]
    fn test_no_newline_marker() {
        let text = "--- a/x.txt
+++ b/x.txt
@@ -1 +1 @@
-old
\\ No newline at end of file
+new
\\ No newline at end of file
";
        let diff = parse_unified_diff(text).unwrap();
        assert_eq!(diff.files[0].hunks[0].lines.len(), 2);
    }

    #[test]
    fn test_count_mismatch_too_many_lines() {
        let text = "--- a/x.txt
+++ b/x.txt
@@ -1,1 +1,1 @@
-old
+new
+extra
";
        let err = parse_unified_diff(text).unwrap_err();
        assert!(matches!(err, DomainError::MalformedDiff { line: 6, .. }));
    }

    #[test]
    fn test_count_mismatch_truncated() {
        let text = "--- a/x.txt
+++ b/x.txt
@@ -1,3 +1,3 @@
 one
";
        let err = parse_unified_diff(text).unwrap_err();
        assert!(matches!(err, DomainError::MalformedDiff { line: 3, .. }));
    }

    #[test]
    fn test_unparsable_hunk_header() {
        let text = "--- a/x.txt
+++ b/x.txt
@@ -a,b +1 @@
";
        assert!(matches!(
            parse_unified_diff(text),
            Err(DomainError::MalformedDiff { .. })
        ));
    }

    #[test]
    fn test_hunk_outside_file() {
        let err = parse_unified_diff("@@ -1 +1 @@\n-a\n+b\n").unwrap_err();
        assert!(matches!(err, DomainError::MalformedDiff { line: 1, .. }));
    }

    #[test]
    fn test_overlapping_hunks_rejected() {
        let text = "--- a/x.txt
+++ b/x.txt
@@ -5,1 +5,1 @@
-a
+b
@@ -3,1 +3,1 @@
-c
+d
";
        assert!(matches!(
            parse_unified_diff(text),
            Err(DomainError::MalformedDiff { line: 6, .. })
        ));
    }

    #[test]
    fn test_line_number_overflow_is_malformed() {
        let text = "--- a/x.txt
+++ b/x.txt
@@ -4294967295,2 +1,1 @@
-a
-b
+c
";
        assert!(matches!(
            parse_unified_diff(text),
            Err(DomainError::MalformedDiff { line: 4, .. })
        ));
    }

    #[test]
    fn test_structured_line_number_overflow_is_malformed() {
        let mut file = FileChange::new("x.txt", ChangeKind::Modified);
        file.hunks.push(Hunk {
            old_start: u32::MAX,
            old_count: 1,
            new_start: 1,
            new_count: 1,
            section: String::new(),
            lines: vec![DiffLine {
                kind: LineKind::Context,
                content: "a".to_string(),
                old_line: Some(u32::MAX),
                new_line: Some(1),
            }],
        });
        assert!(matches!(
            validate_files(vec![file]),
            Err(DomainError::MalformedDiff { line: 1, .. })
        ));
    }

    #[test]
    fn test_validate_structured_files() {
        let diff = parse_unified_diff(MODIFIED).unwrap();
        let validated = validate_files(diff.files.clone()).unwrap();
        assert_eq!(validated, diff);

        let mut broken = diff.files.clone();
        broken[0].hunks[0].new_count += 1;
        assert!(validate_files(broken).is_err());

        let mut shifted = diff.files;
        shifted[0].hunks[1].lines[1].new_line = Some(43);
        assert!(validate_files(shifted).is_err());
    }

    #[test]
    fn test_git_header_with_spaces() {
        assert_eq!(
            split_git_header("a/my file.txt b/my file.txt"),
            Some(("my file.txt".to_string(), "my file.txt".to_string()))
        );
        assert_eq!(
            split_git_header("a/x.rs b/y.rs"),
            Some(("x.rs".to_string(), "y.rs".to_string()))
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_unified_diff("").unwrap().is_empty());
    }
}
