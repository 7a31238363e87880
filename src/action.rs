//! Actions demonstrating category inference and async patterns

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::{EvolutionChain, Pokemon};

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    /// Kick off the first page load on startup
    Init,

    // ===== Page category =====
    /// Intent: load the next page of the catalog (triggers async fan-out)
    PageFetch,

    /// Result: a full page arrived, in ascending-ID order
    PageDidLoad(Vec<Pokemon>),

    /// Result: the page load failed as a whole
    PageDidError(String),

    // ===== Search category (local filter) =====
    /// Open the filter input
    SearchOpen,

    /// Close the filter input and clear the query
    SearchClose,

    /// Filter query text changed
    SearchQueryChange(String),

    /// Apply the filter and leave input mode
    SearchSubmit(String),

    // ===== Lookup category (direct remote fetch) =====
    /// Open the ID/name lookup prompt
    LookupOpen,

    /// Close the lookup prompt
    LookupClose,

    /// Lookup query text changed
    LookupQueryChange(String),

    /// Fetch a single entity by ID or name
    LookupSubmit(String),

    /// Result: lookup resolved, open its details
    LookupDidLoad(Pokemon),

    /// Result: lookup failed (not found or transport error)
    LookupDidError(String),

    // ===== Selection category =====
    /// Move the grid selection by a card delta
    SelectionMove(i16),

    /// Move the grid selection by a row delta
    SelectionRow(i16),

    /// Jump the grid selection to an index
    GridSelect(usize),

    // ===== Detail category =====
    /// Open details for the selected entity
    DetailOpen,

    /// Close the details modal
    DetailClose,

    // ===== Evolution category =====
    /// Result: evolution chain resolved for the open details view
    EvolutionDidLoad(EvolutionChain),

    /// Result: evolution chain failed; details stay up without it
    EvolutionDidError(String),

    // ===== UI category =====
    UiTerminalResize(u16, u16),

    /// Force a re-render (for cursor movement, etc.)
    Render,

    // ===== Uncategorized (global) =====
    /// Periodic tick for the loading animation
    Tick,

    /// Exit the application
    Quit,
}
