//! Browse session state: navigation cursor, selection set and input handling

use crate::listing::{join_path, parent_path, Entry};
use std::collections::HashSet;

/// Ordered, deduplicated set of chosen file identifiers
///
/// Identifiers are kept in insertion order. The set remembers the browse
/// root it was collected under so downloads can be laid out relative to it.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    base: String,
    items: Vec<String>,
    seen: HashSet<String>,
}

impl SelectionSet {
    /// Create an empty selection collected under `base`
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: normalize(&base.into()),
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Add an identifier; returns false if it was already present
    pub fn insert(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        if self.seen.contains(&path) {
            return false;
        }
        self.seen.insert(path.clone());
        self.items.push(path);
        true
    }

    pub fn contains(&self, path: &str) -> bool {
        self.seen.contains(path)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Identifiers in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    /// Browse root the selection was collected under
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Identifier relative to the browse root
    pub fn relative<'a>(&self, path: &'a str) -> &'a str {
        if self.base.is_empty() {
            return path;
        }
        path.strip_prefix(self.base.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(path)
    }
}

/// Currently displayed directory, clamped at the browse root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationCursor {
    root: String,
    current: String,
}

impl NavigationCursor {
    pub fn new(root: &str) -> Self {
        let root = normalize(root);
        Self {
            current: root.clone(),
            root,
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn is_at_root(&self) -> bool {
        self.current == self.root
    }

    /// Path of the current directory below the root, for display
    pub fn display_path(&self) -> String {
        if self.root.is_empty() {
            format!("/{}", self.current)
        } else {
            let rest = self
                .current
                .strip_prefix(self.root.as_str())
                .unwrap_or_default();
            format!("{}{}", self.root, if rest.is_empty() { "/" } else { rest })
        }
    }

    /// Move into `dir`; ignored when `dir` lies outside the root
    pub fn enter(&mut self, dir: &str) {
        let dir = normalize(dir);
        if is_within(&self.root, &dir) {
            self.current = dir;
        }
    }

    /// Move to the parent directory; a no-op at the root
    pub fn up(&mut self) {
        if !self.is_at_root() {
            self.current = parent_path(&self.current).to_string();
        }
    }
}

/// One parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionCommand {
    /// Empty input: finish browsing and download
    Confirm,
    /// `0`: go to the parent directory
    Up,
    /// Comma separated 1-based indices; tokens that are not numbers are dropped
    Pick(Vec<usize>),
}

impl SelectionCommand {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return Self::Confirm;
        }
        if input == "0" {
            return Self::Up;
        }
        Self::Pick(
            input
                .split(',')
                .filter_map(|token| token.trim().parse::<usize>().ok())
                .collect(),
        )
    }
}

/// Where a session stands after applying one input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseState {
    /// Awaiting input at the current cursor
    Browsing,
    /// A pick was merged; browsing continues at the resulting cursor
    Selecting { added: usize },
    /// Browsing finished; the selection is ready for download
    Done,
}

/// State of one browse-and-select session
#[derive(Debug, Clone)]
pub struct BrowseSession {
    cursor: NavigationCursor,
    selection: SelectionSet,
}

impl BrowseSession {
    /// Start a fresh session at `root` with an empty selection
    pub fn new(root: &str) -> Self {
        Self {
            cursor: NavigationCursor::new(root),
            selection: SelectionSet::new(root),
        }
    }

    pub fn cursor(&self) -> &NavigationCursor {
        &self.cursor
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn into_selection(self) -> SelectionSet {
        self.selection
    }

    /// Apply one line of input against the entries currently shown
    ///
    /// Directory picks move the cursor in the order given, so when several
    /// directories are picked at once the last one wins. File picks join the
    /// selection. Indices outside `1..=entries.len()` are ignored.
    pub fn apply(&mut self, input: &str, entries: &[Entry]) -> BrowseState {
        match SelectionCommand::parse(input) {
            SelectionCommand::Confirm => BrowseState::Done,
            SelectionCommand::Up => {
                self.cursor.up();
                BrowseState::Browsing
            }
            SelectionCommand::Pick(indices) => {
                let mut added = 0;
                for index in indices {
                    let Some(entry) = index.checked_sub(1).and_then(|i| entries.get(i)) else {
                        continue;
                    };
                    if entry.is_dir() {
                        self.cursor.enter(&entry.path);
                    } else if self.selection.insert(entry.path.clone()) {
                        added += 1;
                    }
                }
                BrowseState::Selecting { added }
            }
        }
    }
}

fn normalize(path: &str) -> String {
    path.trim_matches('/').to_string()
}

fn is_within(root: &str, path: &str) -> bool {
    root.is_empty() || path == root || path.starts_with(&join_path(root, ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_entries() -> Vec<Entry> {
        vec![Entry::file("a.txt", "a.txt"), Entry::dir("sub", "sub")]
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(SelectionCommand::parse(""), SelectionCommand::Confirm);
        assert_eq!(SelectionCommand::parse("   "), SelectionCommand::Confirm);
        assert_eq!(SelectionCommand::parse("0"), SelectionCommand::Up);
        assert_eq!(SelectionCommand::parse(" 0 "), SelectionCommand::Up);
        assert_eq!(
            SelectionCommand::parse("1, 3,x,,-2, 7"),
            SelectionCommand::Pick(vec![1, 3, 7])
        );
    }

    #[test]
    fn test_selection_set_dedups_in_order() {
        let mut set = SelectionSet::new("");
        assert!(set.insert("b.txt"));
        assert!(set.insert("a.txt"));
        assert!(!set.insert("b.txt"));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["b.txt", "a.txt"]);
    }

    #[test]
    fn test_selection_relative_to_base() {
        let set = SelectionSet::new("demo");
        assert_eq!(set.relative("demo/sub/c.py"), "sub/c.py");
        assert_eq!(set.relative("other/c.py"), "other/c.py");
        assert_eq!(SelectionSet::new("").relative("demo/a.txt"), "demo/a.txt");
    }

    #[test]
    fn test_repeated_indices_select_once() {
        let entries = vec![
            Entry::file("a.txt", "a.txt"),
            Entry::file("b.txt", "b.txt"),
            Entry::file("c.txt", "c.txt"),
        ];
        let mut session = BrowseSession::new("");

        let state = session.apply("1,1,3,3,1", &entries);
        assert_eq!(state, BrowseState::Selecting { added: 2 });
        assert_eq!(
            session.selection().iter().collect::<Vec<_>>(),
            vec!["a.txt", "c.txt"]
        );

        let state = session.apply("3", &entries);
        assert_eq!(state, BrowseState::Selecting { added: 0 });
        assert_eq!(session.selection().len(), 2);
    }

    #[test]
    fn test_invalid_tokens_are_ignored() {
        let entries = vec![Entry::file("a.txt", "a.txt"), Entry::file("b.txt", "b.txt")];
        let mut session = BrowseSession::new("");

        session.apply("abc, 9, 2, 0, -1", &entries);
        assert_eq!(session.selection().iter().collect::<Vec<_>>(), vec!["b.txt"]);
        assert!(session.cursor().is_at_root());

        let before = session.clone();
        let state = session.apply("x,,42", &entries);
        assert_eq!(state, BrowseState::Selecting { added: 0 });
        assert_eq!(session.selection().len(), before.selection().len());
        assert_eq!(session.cursor(), before.cursor());
    }

    #[test]
    fn test_up_from_root_is_idempotent() {
        let mut session = BrowseSession::new("");
        session.apply("0", &root_entries());
        session.apply("0", &root_entries());
        assert_eq!(session.cursor().current(), "");

        let mut rooted = NavigationCursor::new("demo");
        rooted.up();
        rooted.up();
        assert_eq!(rooted.current(), "demo");
    }

    #[test]
    fn test_up_returns_to_parent() {
        let mut cursor = NavigationCursor::new("demo");
        cursor.enter("demo/sub/deep");
        cursor.up();
        assert_eq!(cursor.current(), "demo/sub");
        cursor.up();
        assert_eq!(cursor.current(), "demo");
    }

    #[test]
    fn test_cursor_never_leaves_root() {
        let mut cursor = NavigationCursor::new("demo");
        cursor.enter("other");
        assert_eq!(cursor.current(), "demo");
        cursor.enter("demolition");
        assert_eq!(cursor.current(), "demo");
        cursor.enter("demo/sub");
        assert_eq!(cursor.current(), "demo/sub");
    }

    #[test]
    fn test_file_then_directory_scenario() {
        let mut session = BrowseSession::new("");

        session.apply("1", &root_entries());
        assert_eq!(session.selection().iter().collect::<Vec<_>>(), vec!["a.txt"]);
        assert_eq!(session.cursor().current(), "");

        session.apply("2", &root_entries());
        assert_eq!(session.cursor().current(), "sub");

        assert_eq!(session.apply("", &[]), BrowseState::Done);
        assert_eq!(session.selection().len(), 1);
    }

    #[test]
    fn test_multiple_directories_last_one_wins() {
        let entries = vec![
            Entry::dir("one", "one"),
            Entry::file("a.txt", "a.txt"),
            Entry::dir("two", "two"),
        ];
        let mut session = BrowseSession::new("");

        session.apply("3,2,1", &entries);
        assert_eq!(session.cursor().current(), "one");
        assert_eq!(session.selection().iter().collect::<Vec<_>>(), vec!["a.txt"]);

        let mut session = BrowseSession::new("");
        session.apply("1,3", &entries);
        assert_eq!(session.cursor().current(), "two");
    }

    #[test]
    fn test_selection_only_holds_files() {
        let mut session = BrowseSession::new("");
        session.apply("1,2", &root_entries());
        assert!(session.selection().contains("a.txt"));
        assert!(!session.selection().contains("sub"));
    }

    #[test]
    fn test_display_path() {
        let mut cursor = NavigationCursor::new("");
        assert_eq!(cursor.display_path(), "/");
        cursor.enter("sub/deep");
        assert_eq!(cursor.display_path(), "/sub/deep");

        let mut rooted = NavigationCursor::new("demo");
        assert_eq!(rooted.display_path(), "demo/");
        rooted.enter("demo/sub");
        assert_eq!(rooted.display_path(), "demo/sub");
    }
}
