//! Interactive hierarchical browse-and-select
//!
//! A session walks a collection one directory at a time. Each screen lists
//! the entries under the cursor; input picks files into the selection,
//! enters directories, goes up with `0` or finishes with an empty line.

pub mod controller;
pub mod session;

pub use controller::{run_session, SelectionInput};
pub use session::{BrowseSession, BrowseState, NavigationCursor, SelectionCommand, SelectionSet};
