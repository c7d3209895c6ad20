//! Page state definitions for tracking traversal progress
//!
//! Every URL moves through `Unvisited -> Visiting -> (VisitedOk | VisitedError)`
//! at most once per run.

use std::fmt;

/// Represents the current state of a page in the traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    /// Page has not been admitted for fetching
    Unvisited,

    /// Page won admission and its fetch is in progress
    Visiting,

    // ===== Terminal States =====
    /// Page was fetched, parsed and its links registered
    VisitedOk,

    /// Page fetch failed or was abandoned; an error was recorded
    VisitedError,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::VisitedOk | Self::VisitedError)
    }

    /// Returns true if this page has been admitted (in any state past Unvisited)
    pub fn is_admitted(&self) -> bool {
        !matches!(self, Self::Unvisited)
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::VisitedOk)
    }

    /// Returns true if this represents an error state
    pub fn is_error(&self) -> bool {
        matches!(self, Self::VisitedError)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: PageState) -> bool {
        matches!(
            (self, next),
            (Self::Unvisited, Self::Visiting)
                | (Self::Visiting, Self::VisitedOk)
                | (Self::Visiting, Self::VisitedError)
        )
    }

    /// Returns the lowercase name used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unvisited => "unvisited",
            Self::Visiting => "visiting",
            Self::VisitedOk => "visited_ok",
            Self::VisitedError => "visited_error",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Unvisited,
            Self::Visiting,
            Self::VisitedOk,
            Self::VisitedError,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
