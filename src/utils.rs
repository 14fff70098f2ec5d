use rustpython_ast::TextSize;
use std::path::Path;

/// A utility struct to convert byte offsets to line numbers.
///
/// The parser reports node positions as byte offsets, but the report
/// records human-readable 1-indexed line numbers.
pub struct LineIndex {
    /// Stores the byte index of the start of each line.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Creates a new `LineIndex` by scanning the source code for newlines.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, ch) in source.char_indices() {
            if ch == '\n' {
                // Record the start of the next line (current newline index + 1)
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Converts a `TextSize` (byte offset) to a 1-indexed line number.
    pub fn line_index(&self, offset: TextSize) -> usize {
        let offset = offset.to_usize();
        // Binary search to find which line range the offset falls into.
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }
}

/// Renders a file path relative to the analyzed root, with `/` separators
/// regardless of platform, so module keys are stable across runs and hosts.
pub fn relative_display(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_line_index_maps_offsets() {
        let source = "a = 1\nb = 2\nc = 3\n";
        let index = LineIndex::new(source);

        assert_eq!(index.line_index(TextSize::from(0)), 1);
        assert_eq!(index.line_index(TextSize::from(6)), 2);
        assert_eq!(index.line_index(TextSize::from(12)), 3);
    }

    #[test]
    fn test_relative_display_strips_root() {
        let root = PathBuf::from("/tmp/project");
        let file = root.join("pkg").join("mod.py");
        assert_eq!(relative_display(&file, &root), "pkg/mod.py");
    }

    #[test]
    fn test_relative_display_foreign_path_unchanged() {
        let root = PathBuf::from("/tmp/project");
        let file = PathBuf::from("elsewhere/mod.py");
        assert_eq!(relative_display(&file, &root), "elsewhere/mod.py");
    }
}
