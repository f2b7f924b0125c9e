//! Browse loop driving a session against a listing provider

use super::session::{BrowseSession, BrowseState, NavigationCursor, SelectionSet};
use crate::listing::{Entry, ListingProvider};
use anyhow::Result;

/// Source of selection input for a browse session
///
/// The TUI renders the listing and reads a line from the terminal; tests
/// replay scripted lines.
pub trait SelectionInput {
    /// Present `entries` at `cursor` and return one line of input
    fn read_selection(
        &mut self,
        cursor: &NavigationCursor,
        entries: &[Entry],
        selection: &SelectionSet,
    ) -> Result<String>;

    /// Called after a pick was merged into the selection
    fn on_selected(&mut self, _added: usize, _selection: &SelectionSet) -> Result<()> {
        Ok(())
    }
}

/// Run a browse session rooted at `root` until the user confirms
///
/// The listing is fetched fresh for every screen. Returns the accumulated
/// selection, which may be empty.
pub async fn run_session<P, I>(provider: &P, root: &str, input: &mut I) -> Result<SelectionSet>
where
    P: ListingProvider,
    I: SelectionInput,
{
    let mut session = BrowseSession::new(root);

    loop {
        let entries = provider.list(session.cursor().current()).await;
        let line = input.read_selection(session.cursor(), &entries, session.selection())?;

        match session.apply(&line, &entries) {
            BrowseState::Done => break,
            BrowseState::Selecting { added } => input.on_selected(added, session.selection())?,
            BrowseState::Browsing => {}
        }
    }

    Ok(session.into_selection())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::memory::MemoryProvider;
    use std::collections::VecDeque;

    /// Replays scripted lines and records every cursor it was shown
    struct Scripted {
        lines: VecDeque<&'static str>,
        visited: Vec<String>,
    }

    impl Scripted {
        fn new(lines: &[&'static str]) -> Self {
            Self {
                lines: lines.iter().copied().collect(),
                visited: Vec::new(),
            }
        }
    }

    impl SelectionInput for Scripted {
        fn read_selection(
            &mut self,
            cursor: &NavigationCursor,
            _entries: &[Entry],
            _selection: &SelectionSet,
        ) -> Result<String> {
            self.visited.push(cursor.current().to_string());
            self.lines
                .pop_front()
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("script exhausted"))
        }
    }

    fn provider() -> MemoryProvider {
        MemoryProvider::new()
            .with_file("a.txt", "a")
            .with_file("sub/b.txt", "b")
            .with_file("sub/deep/c.txt", "c")
    }

    #[tokio::test]
    async fn test_scenario_select_file_enter_dir_confirm() {
        let mut input = Scripted::new(&["1", "2", ""]);

        let selection = run_session(&provider(), "", &mut input).await.unwrap();

        assert_eq!(selection.iter().collect::<Vec<_>>(), vec!["a.txt"]);
        assert_eq!(input.visited, vec!["", "", "sub"]);
    }

    #[tokio::test]
    async fn test_navigation_across_levels() {
        // sub listing: b.txt, deep
        let mut input = Scripted::new(&["2", "1", "2", "1", "0", "0", "0", ""]);

        let selection = run_session(&provider(), "", &mut input).await.unwrap();

        assert_eq!(
            selection.iter().collect::<Vec<_>>(),
            vec!["sub/b.txt", "sub/deep/c.txt"]
        );
        assert_eq!(
            input.visited,
            vec!["", "sub", "sub", "sub/deep", "sub/deep", "sub", "", ""]
        );
    }

    #[tokio::test]
    async fn test_immediate_confirm_yields_empty_selection() {
        let mut input = Scripted::new(&[""]);

        let selection = run_session(&provider(), "", &mut input).await.unwrap();

        assert!(selection.is_empty());
    }

    #[tokio::test]
    async fn test_session_rooted_in_subdirectory() {
        let mut input = Scripted::new(&["0", "1", ""]);

        let selection = run_session(&provider(), "sub", &mut input).await.unwrap();

        assert_eq!(selection.iter().collect::<Vec<_>>(), vec!["sub/b.txt"]);
        assert_eq!(selection.base(), "sub");
        assert_eq!(input.visited, vec!["sub", "sub", "sub"]);
    }

    #[tokio::test]
    async fn test_input_errors_propagate() {
        let mut input = Scripted::new(&["1"]);

        assert!(run_session(&provider(), "", &mut input).await.is_err());
    }
}
