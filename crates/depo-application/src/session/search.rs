use depo_core::dependency::{DependencyRecord, SearchResult};
use depo_core::error::{DepoError, Result};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Where the add flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    #[default]
    Idle,
    Searching,
    Results,
    Selected,
}

/// Identifies one issued search; only the latest ticket may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

#[derive(Debug, Default)]
struct SearchState {
    phase: SearchPhase,
    results: SearchResult,
    selection: Option<DependencyRecord>,
    latest: u64,
}

impl SearchState {
    fn settled_phase(&self) -> SearchPhase {
        if self.selection.is_some() {
            SearchPhase::Selected
        } else if self.results.is_empty() {
            SearchPhase::Idle
        } else {
            SearchPhase::Results
        }
    }
}

/// Transient search-and-pick flow that feeds the add intent.
///
/// Results are replaced wholesale by each successful search and are never
/// merged into the dependency snapshot.
pub struct SearchWorkflow {
    state: Mutex<SearchState>,
}

impl SearchWorkflow {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SearchState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn phase(&self) -> SearchPhase {
        self.lock().phase
    }

    pub fn results(&self) -> SearchResult {
        self.lock().results.clone()
    }

    pub fn selection(&self) -> Option<DependencyRecord> {
        self.lock().selection.clone()
    }

    /// Starts a new search. Any previous selection is dropped, previous
    /// results stay visible until the new ones arrive.
    pub fn begin(&self) -> SearchTicket {
        let mut state = self.lock();
        state.latest += 1;
        state.selection = None;
        state.phase = SearchPhase::Searching;
        SearchTicket(state.latest)
    }

    /// Applies the result of the search identified by `ticket`.
    ///
    /// Returns false, leaving everything untouched, if a newer search has
    /// been issued or the flow was closed since.
    pub fn complete(&self, ticket: SearchTicket, results: SearchResult) -> bool {
        let mut state = self.lock();
        if ticket.0 != state.latest {
            return false;
        }
        state.results = results;
        state.selection = None;
        state.phase = SearchPhase::Results;
        true
    }

    /// Ends the search identified by `ticket` without touching the results.
    pub fn fail(&self, ticket: SearchTicket) -> bool {
        let mut state = self.lock();
        if ticket.0 != state.latest {
            return false;
        }
        state.phase = state.settled_phase();
        true
    }

    /// Picks a candidate by case-insensitive name.
    ///
    /// A non-blank `constraint` overrides the candidate's own constraint.
    pub fn select(&self, name: &str, constraint: Option<&str>) -> Result<DependencyRecord> {
        let mut state = self.lock();
        if state.results.is_empty() {
            return Err(DepoError::NoSearchResults);
        }

        let mut chosen = state
            .results
            .find_ignore_case(name.trim())
            .cloned()
            .ok_or_else(|| DepoError::CandidateNotFound(name.to_string()))?;

        if let Some(constraint) = constraint.map(str::trim).filter(|c| !c.is_empty()) {
            chosen.version_constraint = Some(constraint.to_string());
        }

        state.selection = Some(chosen.clone());
        state.phase = SearchPhase::Selected;
        Ok(chosen)
    }

    /// Returns the record the add intent should send.
    ///
    /// # Errors
    ///
    /// - `DependencyNotSelected` if nothing is selected
    /// - `InvariantViolation` if the selection is no longer among the results
    pub fn confirmed_selection(&self) -> Result<DependencyRecord> {
        let state = self.lock();
        let selection = state
            .selection
            .clone()
            .ok_or(DepoError::DependencyNotSelected)?;
        if state.results.find_ignore_case(&selection.name).is_none() {
            return Err(DepoError::invariant(format!(
                "selected candidate '{}' is not in the current search results",
                selection.name
            )));
        }
        Ok(selection)
    }

    /// Ticket of the most recently issued search.
    pub fn current_ticket(&self) -> SearchTicket {
        SearchTicket(self.lock().latest)
    }

    /// Closes the flow only if no search has been issued since `ticket`.
    pub fn close_if(&self, ticket: SearchTicket) -> bool {
        let mut state = self.lock();
        if ticket.0 != state.latest {
            return false;
        }
        Self::reset(&mut state);
        true
    }

    /// Closes the flow: results and selection are discarded and in-flight
    /// searches can no longer apply.
    pub fn close(&self) {
        Self::reset(&mut self.lock());
    }

    fn reset(state: &mut SearchState) {
        state.latest += 1;
        state.results = SearchResult::default();
        state.selection = None;
        state.phase = SearchPhase::Idle;
    }
}

impl Default for SearchWorkflow {
    fn default() -> Self {
        Self::new()
    }
}
