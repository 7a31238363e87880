//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, Pokemon};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Page actions =====
        Action::Init | Action::PageFetch => {
            // One page load at a time; re-entry is a no-op
            if state.page_loading {
                return DispatchResult::unchanged();
            }
            state.page_loading = true;
            state.message = None;
            let (first, last) = state.catalog.next_page_range();
            DispatchResult::changed_with(Effect::FetchPage { first, last })
        }

        Action::PageDidLoad(batch) => {
            state.catalog.append_page(batch);
            state.page_loading = false;
            state.rebuild_filtered();
            DispatchResult::changed()
        }

        Action::PageDidError(error) => {
            // Whole batch failed; the catalog was never touched
            state.page_loading = false;
            state.message = Some(format!("Page load error: {error}"));
            DispatchResult::changed()
        }

        // ===== Search actions =====
        Action::SearchOpen => {
            state.search.active = true;
            state.search.query.clear();
            state.rebuild_filtered();
            DispatchResult::changed()
        }

        Action::SearchClose => {
            if !state.search.active && state.search.query.is_empty() {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            state.search.query.clear();
            state.rebuild_filtered();
            DispatchResult::changed()
        }

        Action::SearchQueryChange(query) => {
            state.search.query = query;
            state.rebuild_filtered();
            DispatchResult::changed()
        }

        Action::SearchSubmit(query) => {
            state.search.query = query.trim().to_string();
            state.search.active = false;
            state.rebuild_filtered();
            DispatchResult::changed()
        }

        // ===== Lookup actions =====
        Action::LookupOpen => {
            state.lookup.active = true;
            state.lookup.query.clear();
            state.lookup.error = None;
            DispatchResult::changed()
        }

        Action::LookupClose => {
            if !state.lookup.active {
                return DispatchResult::unchanged();
            }
            state.lookup.active = false;
            state.lookup.query.clear();
            state.lookup.error = None;
            DispatchResult::changed()
        }

        Action::LookupQueryChange(query) => {
            state.lookup.query = query;
            state.lookup.error = None;
            DispatchResult::changed()
        }

        Action::LookupSubmit(query) => {
            let query = query.trim().to_lowercase();
            if query.is_empty() {
                return DispatchResult::unchanged();
            }
            state.lookup.error = None;
            DispatchResult::changed_with(Effect::Lookup { query })
        }

        Action::LookupDidLoad(pokemon) => {
            state.lookup.active = false;
            state.lookup.query.clear();
            state.lookup.error = None;
            open_detail(state, pokemon)
        }

        Action::LookupDidError(error) => {
            state.lookup.error = Some(error);
            DispatchResult::changed()
        }

        // ===== Selection actions =====
        Action::SelectionMove(delta) => move_selection(state, delta as i32),

        Action::SelectionRow(delta) => {
            let columns = state.grid_columns() as i32;
            move_selection(state, delta as i32 * columns)
        }

        Action::GridSelect(index) => {
            if !state.set_selected_index(index) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        // ===== Detail actions =====
        Action::DetailOpen => {
            let Some(pokemon) = state.selected_pokemon().cloned() else {
                return DispatchResult::unchanged();
            };
            open_detail(state, pokemon)
        }

        Action::DetailClose => {
            if state.detail.is_none() {
                return DispatchResult::unchanged();
            }
            state.detail = None;
            state.evolution = DataResource::Empty;
            DispatchResult::changed()
        }

        // ===== Evolution actions =====
        Action::EvolutionDidLoad(chain) => {
            state.evolution = DataResource::Loaded(chain);
            DispatchResult::changed()
        }

        Action::EvolutionDidError(error) => {
            // Fails soft: the details view stays up without the chain
            state.evolution = DataResource::Failed(error);
            DispatchResult::changed()
        }

        // ===== UI actions =====
        Action::UiTerminalResize(width, height) => {
            if state.terminal_size == (width, height) {
                return DispatchResult::unchanged();
            }
            state.terminal_size = (width, height);
            DispatchResult::changed()
        }

        Action::Render => DispatchResult::changed(),

        // ===== Global actions =====
        Action::Tick => {
            if state.page_loading {
                state.tick = state.tick.wrapping_add(1);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn open_detail(state: &mut AppState, pokemon: Pokemon) -> DispatchResult<Effect> {
    let species_url = pokemon.species_url.clone();
    state.detail = Some(pokemon);
    state.evolution = DataResource::Loading;
    DispatchResult::changed_with(Effect::FetchEvolution { species_url })
}

fn move_selection(state: &mut AppState, delta: i32) -> DispatchResult<Effect> {
    let index = (state.selected_index as i32 + delta).max(0) as usize;
    if !state.set_selected_index(index) {
        return DispatchResult::unchanged();
    }
    DispatchResult::changed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PAGE_SIZE;

    fn entity(id: u32, name: &str) -> Pokemon {
        Pokemon {
            id,
            name: name.to_string(),
            types: vec!["normal".to_string()],
            stats: Vec::new(),
            abilities: Vec::new(),
            height: 7,
            weight: 69,
            base_experience: Some(64),
            species_url: format!("https://pokeapi.co/api/v2/pokemon-species/{id}/"),
        }
    }

    fn page(first: u32) -> Vec<Pokemon> {
        (first..first + PAGE_SIZE)
            .map(|id| entity(id, &format!("mon-{id}")))
            .collect()
    }

    #[test]
    fn test_page_fetch_sets_loading_and_computes_range() {
        let mut state = AppState::default();

        let result = reducer(&mut state, Action::PageFetch);

        assert!(result.changed);
        assert!(state.page_loading);
        assert_eq!(result.effects.len(), 1);
        assert_eq!(result.effects[0], Effect::FetchPage { first: 1, last: 20 });
    }

    #[test]
    fn test_page_fetch_while_loading_is_a_no_op() {
        let mut state = AppState::default();
        reducer(&mut state, Action::PageFetch);

        let result = reducer(&mut state, Action::PageFetch);

        assert!(!result.changed);
        assert!(result.effects.is_empty());
    }

    #[test]
    fn test_page_did_load_appends_and_advances_cursor() {
        let mut state = AppState::default();
        reducer(&mut state, Action::PageFetch);

        let result = reducer(&mut state, Action::PageDidLoad(page(1)));

        assert!(result.changed);
        assert!(!state.page_loading);
        assert_eq!(state.catalog.entries.len(), PAGE_SIZE as usize);
        assert_eq!(state.catalog.page, 2);
        assert_eq!(state.filtered_indices.len(), PAGE_SIZE as usize);
    }

    #[test]
    fn test_page_did_error_leaves_catalog_untouched() {
        let mut state = AppState::default();
        reducer(&mut state, Action::PageFetch);

        let result = reducer(&mut state, Action::PageDidError("timeout".into()));

        assert!(result.changed);
        assert!(!state.page_loading);
        assert_eq!(state.catalog.entries.len(), 0);
        assert_eq!(state.catalog.page, 1);
        assert!(state.message.as_deref().unwrap().contains("timeout"));
    }

    #[test]
    fn test_evolution_error_keeps_details_open() {
        let mut state = AppState::default();
        reducer(&mut state, Action::PageFetch);
        reducer(&mut state, Action::PageDidLoad(page(1)));
        reducer(&mut state, Action::DetailOpen);

        let result = reducer(&mut state, Action::EvolutionDidError("boom".into()));

        assert!(result.changed);
        assert!(state.detail.is_some());
        assert!(state.evolution.is_failed());
    }

    #[test]
    fn test_tick_only_rerenders_while_loading() {
        let mut state = AppState::default();

        let result = reducer(&mut state, Action::Tick);
        assert!(!result.changed);

        reducer(&mut state, Action::PageFetch);
        let result = reducer(&mut state, Action::Tick);
        assert!(result.changed);
        assert_eq!(state.tick, 1);
    }
}
