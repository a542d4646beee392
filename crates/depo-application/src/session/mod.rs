//! Session state components.
//!
//! Each component owns one piece of the session: the active project, the
//! dependency snapshot, the search/selection flow and the last failure.
//! `DependencySession` composes them.

mod error_surface;
mod project;
mod search;
mod store;

pub use error_surface::ErrorSurface;
pub use project::{ActiveProject, ProjectState};
pub use search::{SearchPhase, SearchTicket, SearchWorkflow};
pub use store::DependencyStore;
