//! Client side of the domain search: input state, debounced requests and
//! the view the user sees.

use crate::models::DomainSuggestion;

pub mod client;
pub mod session;

pub use client::{ProxyClient, SuggestionSource};
pub use session::{DEBOUNCE, SearchSession};

/// Where the last issued search stands. Only one of these holds at a time,
/// so "loading with an error" cannot be represented.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchState {
    #[default]
    Idle,
    Loading,
    Success(Vec<DomainSuggestion>),
    Error(String),
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading)
    }

    pub fn results(&self) -> &[DomainSuggestion] {
        match self {
            SearchState::Success(results) => results,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SearchState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Snapshot of everything the UI renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchView {
    pub query: String,
    /// Empty means no TLD filter.
    pub tld: String,
    pub state: SearchState,
    /// Id of the latest issued search. Responses carrying an older id are dropped.
    pub generation: u64,
}
