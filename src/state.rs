//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

/// Entities fetched per page load.
pub const PAGE_SIZE: u32 = 20;

/// Card cell geometry for the grid.
pub const CARD_WIDTH: u16 = 22;
pub const CARD_HEIGHT: u16 = 4;

/// Loading animation tick interval.
pub const LOADING_ANIM_TICK_MS: u64 = 90;

/// A single catalog record from PokeAPI. Immutable after fetch;
/// identity is the numeric `id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    pub types: Vec<String>,
    pub stats: Vec<PokemonStat>,
    pub abilities: Vec<String>,
    /// Decimeters.
    pub height: u16,
    /// Hectograms.
    pub weight: u16,
    /// Absent for some alternate forms.
    pub base_experience: Option<u16>,
    pub species_url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonStat {
    pub name: String,
    pub value: u16,
}

/// Flattened evolution line, base form first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EvolutionChain {
    pub stages: Vec<String>,
}

/// Accumulated entities plus the page cursor.
///
/// Entries are kept in fetch order with ascending IDs inside each page.
/// Direct lookups bypass the catalog entirely, so under normal operation
/// `entries.len() == (page - 1) * PAGE_SIZE`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Catalog {
    pub entries: Vec<Pokemon>,
    /// Next page to fetch, 1-based.
    pub page: u32,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            page: 1,
        }
    }
}

impl Catalog {
    /// Inclusive ID range covered by the next page.
    pub fn next_page_range(&self) -> (u32, u32) {
        let first = (self.page - 1) * PAGE_SIZE + 1;
        (first, first + PAGE_SIZE - 1)
    }

    /// Number of entries belonging to completed pages.
    pub fn paginated_len(&self) -> usize {
        (((self.page - 1) * PAGE_SIZE) as usize).min(self.entries.len())
    }

    pub fn append_page(&mut self, batch: Vec<Pokemon>) {
        self.entries.extend(batch);
        self.page += 1;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LookupState {
    pub active: bool,
    pub query: String,
    pub error: Option<String>,
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    #[debug(skip)]
    pub terminal_size: (u16, u16),

    /// Accumulated catalog + page cursor
    #[debug(skip)]
    pub catalog: Catalog,

    /// Whether a page load is in flight
    #[debug(section = "Catalog", label = "Loading")]
    pub page_loading: bool,

    /// Indices into `catalog.entries` for the current filtered view
    #[debug(skip)]
    pub filtered_indices: Vec<usize>,

    /// Grid selection, an index into `filtered_indices`
    #[debug(section = "Catalog", label = "Selected", debug_fmt)]
    pub selected_index: usize,

    #[debug(skip)]
    pub search: SearchState,

    #[debug(skip)]
    pub lookup: LookupState,

    /// Entity shown in the details modal
    #[debug(skip)]
    pub detail: Option<Pokemon>,

    /// Evolution chain lifecycle for the open details view
    #[debug(skip)]
    pub evolution: DataResource<EvolutionChain>,

    /// Transient status message slot
    #[debug(section = "Status", label = "Message", debug_fmt)]
    pub message: Option<String>,

    #[debug(skip)]
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            terminal_size: (80, 24),
            catalog: Catalog::default(),
            page_loading: false,
            filtered_indices: Vec::new(),
            selected_index: 0,
            search: SearchState::default(),
            lookup: LookupState::default(),
            detail: None,
            evolution: DataResource::Empty,
            message: None,
            tick: 0,
        }
    }
}

impl AppState {
    /// Recompute the filtered view from the catalog and the search query.
    ///
    /// An empty query resets to the paginated view; otherwise entries match
    /// by case-insensitive name substring or exact ID string. Purely local,
    /// catalog order preserved.
    pub fn rebuild_filtered(&mut self) {
        let query = self.search.query.trim().to_lowercase();
        if query.is_empty() {
            self.filtered_indices = (0..self.catalog.paginated_len()).collect();
        } else {
            self.filtered_indices = self
                .catalog
                .entries
                .iter()
                .enumerate()
                .filter(|(_, entry)| {
                    entry.name.to_lowercase().contains(&query) || entry.id.to_string() == query
                })
                .map(|(idx, _)| idx)
                .collect();
        }

        if self.selected_index >= self.filtered_indices.len() {
            self.selected_index = 0;
        }
    }

    pub fn set_selected_index(&mut self, index: usize) -> bool {
        if self.filtered_indices.is_empty() {
            self.selected_index = 0;
            return false;
        }
        let bounded = index.min(self.filtered_indices.len() - 1);
        if bounded != self.selected_index {
            self.selected_index = bounded;
            return true;
        }
        false
    }

    pub fn selected_pokemon(&self) -> Option<&Pokemon> {
        self.filtered_indices
            .get(self.selected_index)
            .and_then(|idx| self.catalog.entries.get(*idx))
    }

    /// Grid columns that fit the current terminal width.
    pub fn grid_columns(&self) -> usize {
        let usable = self.terminal_size.0.saturating_sub(2);
        (usable / CARD_WIDTH).max(1) as usize
    }
}
