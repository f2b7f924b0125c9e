//! Project tree previews

use crate::listing::{Entry, EntryKind, ListingProvider};

/// One row of a rendered tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    pub depth: usize,
    pub name: String,
    pub kind: EntryKind,
}

impl TreeLine {
    /// Plain text rendering with two spaces of indent per level
    pub fn render(&self) -> String {
        let marker = match self.kind {
            EntryKind::Directory => "[DIR] ",
            EntryKind::File => "- ",
        };
        format!("{}{}{}", "  ".repeat(self.depth), marker, self.name)
    }
}

/// Walk everything below `dir` in listing order
pub async fn build_tree<P: ListingProvider>(provider: &P, dir: &str) -> Vec<TreeLine> {
    let mut lines = Vec::new();
    let mut pending: Vec<(usize, Entry)> = provider
        .list(dir)
        .await
        .into_iter()
        .rev()
        .map(|e| (0, e))
        .collect();

    while let Some((depth, entry)) = pending.pop() {
        if entry.is_dir() {
            let children = provider.list(&entry.path).await;
            pending.extend(children.into_iter().rev().map(|c| (depth + 1, c)));
        }
        lines.push(TreeLine {
            depth,
            name: entry.name,
            kind: entry.kind,
        });
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::memory::MemoryProvider;

    #[tokio::test]
    async fn test_tree_order_and_indent() {
        let provider = MemoryProvider::new()
            .with_file("demo/README.md", "")
            .with_file("demo/src/app.py", "")
            .with_file("demo/src/static/site.css", "")
            .with_file("demo/zeta.txt", "");

        let rendered: Vec<String> = build_tree(&provider, "demo")
            .await
            .iter()
            .map(TreeLine::render)
            .collect();

        assert_eq!(
            rendered,
            vec![
                "- README.md",
                "[DIR] src",
                "  - app.py",
                "  [DIR] static",
                "    - site.css",
                "- zeta.txt",
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_directory_has_no_lines() {
        let provider = MemoryProvider::new();
        assert!(build_tree(&provider, "demo").await.is_empty());
    }
}
