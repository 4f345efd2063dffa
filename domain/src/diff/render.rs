//! Rendering of the normalized diff
//!
//! [`to_unified`] produces git-style unified text that normalizes back to the
//! same [`Diff`]; [`annotated`] produces the prompt form shown to review agents,
//! with the new-file line number in a gutter so that agents cite coordinates
//! that map directly onto inline comment anchors.

use super::model::{ChangeKind, Diff, FileChange, LineKind};
use std::fmt::Write;

/// Render the diff as git-style unified diff text
pub fn to_unified(diff: &Diff) -> String {
    let mut out = String::new();
    for file in &diff.files {
        let old = file.old_path.as_deref().unwrap_or(&file.path);
        let _ = writeln!(out, "diff --git a/{} b/{}", old, file.path);
        match file.kind {
            ChangeKind::Added => out.push_str("new file mode 100644\n"),
            ChangeKind::Deleted => out.push_str("deleted file mode 100644\n"),
            ChangeKind::Renamed => {
                let _ = writeln!(out, "rename from {}", old);
                let _ = writeln!(out, "rename to {}", file.path);
            }
            ChangeKind::Modified => {}
        }
        if file.binary {
            let _ = writeln!(out, "Binary files a/{} and b/{} differ", old, file.path);
            continue;
        }
        if file.hunks.is_empty() {
            continue;
        }
        let (minus, plus) = match file.kind {
            ChangeKind::Added => ("/dev/null".to_string(), format!("b/{}", file.path)),
            ChangeKind::Deleted => (format!("a/{}", file.path), "/dev/null".to_string()),
            _ => (format!("a/{}", old), format!("b/{}", file.path)),
        };
        let _ = writeln!(out, "--- {}", minus);
        let _ = writeln!(out, "+++ {}", plus);
        for hunk in &file.hunks {
            let _ = write!(
                out,
                "@@ -{},{} +{},{} @@",
                hunk.old_start, hunk.old_count, hunk.new_start, hunk.new_count
            );
            if !hunk.section.is_empty() {
                let _ = write!(out, " {}", hunk.section);
            }
            out.push('\n');
            for line in &hunk.lines {
                out.push(line.kind.prefix());
                out.push_str(&line.content);
                out.push('\n');
            }
        }
    }
    out
}

/// Render the diff for a review prompt
///
/// Each file gets a `### path (kind, +A -R)` heading; hunk lines are prefixed
/// with their new-file line number, removed lines with a blank gutter.
pub fn annotated(diff: &Diff) -> String {
    let mut out = String::new();
    for file in &diff.files {
        render_file_heading(&mut out, file);
        if file.binary {
            out.push_str("(binary file, no textual changes)\n\n");
            continue;
        }
        if file.hunks.is_empty() {
            out.push_str("(no content changes)\n\n");
            continue;
        }
        for hunk in &file.hunks {
            let _ = write!(
                out,
                "@@ -{},{} +{},{} @@",
                hunk.old_start, hunk.old_count, hunk.new_start, hunk.new_count
            );
            if !hunk.section.is_empty() {
                let _ = write!(out, " {}", hunk.section);
            }
            out.push('\n');
            for line in &hunk.lines {
                match (line.kind, line.new_line) {
                    (LineKind::Removed, _) | (_, None) => {
                        let _ = writeln!(out, "{:>6} {}{}", "", line.kind.prefix(), line.content);
                    }
                    (_, Some(n)) => {
                        let _ = writeln!(out, "{:>6} {}{}", n, line.kind.prefix(), line.content);
                    }
                }
            }
        }
        out.push('\n');
    }
    out
}

fn render_file_heading(out: &mut String, file: &FileChange) {
    let (adds, removes) = file.stats();
    match &file.old_path {
        Some(old) => {
            let _ = writeln!(
                out,
                "### {} (renamed from {}, +{} -{})",
                file.path, old, adds, removes
            );
        }
        None => {
            let _ = writeln!(
                out,
                "### {} ({}, +{} -{})",
                file.path, file.kind, adds, removes
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::parser::parse_unified_diff;

    const SAMPLE: &str = "diff --git a/src/main.rs b/src/main.rs
index 1111111..2222222 100644
--- a/src/main.rs
+++ b/src/main.rs
@@ -1,3 +1,4 @@ fn main() {
 fn main() {
-    println!(\"hi\");
+    let name = std::env::args().nth(1);
+    println!(\"hi {:?}\", name);
 }
diff --git a/new.txt b/new.txt
new file mode 100644
--- /dev/null
+++ b/new.txt
@@ -0,0 +1 @@
+hello
diff --git a/a.md b/b.md
similarity index 100%
rename from a.md
rename to b.md
diff --git a/img.png b/img.png
Binary files a/img.png and b/img.png differ
";

    #[test]
    fn test_unified_rendering_normalizes_to_same_model() {
        let diff = parse_unified_diff(SAMPLE).unwrap();
        let rendered = to_unified(&diff);
        let reparsed = parse_unified_diff(&rendered).unwrap();
        assert_eq!(diff, reparsed);
    }

    #[test]
    fn test_annotated_gutter() {
        let diff = parse_unified_diff(SAMPLE).unwrap();
        let text = annotated(&diff);
        assert!(text.contains("### src/main.rs (modified, +2 -1)"));
        assert!(text.contains("     2 +    let name = std::env::args().nth(1);"));
        assert!(text.contains("       -    println!(\"hi\");"));
        assert!(text.contains("### b.md (renamed from a.md, +0 -0)"));
        assert!(text.contains("(binary file, no textual changes)"));
    }
}
