//! Tests using the EffectStoreTestHarness
//!
//! These tests demonstrate the integrated testing pattern where
//! store dispatch and simulated async completion are combined.

use pokegrid::{
    action::Action,
    effect::Effect,
    reducer::reducer,
    state::{AppState, PAGE_SIZE, Pokemon},
};
use tui_dispatch::testing::*;

/// Helper to create a mock entity
fn entity(id: u32, name: &str) -> Pokemon {
    Pokemon {
        id,
        name: name.to_string(),
        types: vec!["grass".to_string()],
        stats: Vec::new(),
        abilities: Vec::new(),
        height: 7,
        weight: 69,
        base_experience: Some(64),
        species_url: format!("https://pokeapi.co/api/v2/pokemon-species/{id}/"),
    }
}

/// Helper to create one full page starting at `first`
fn page(first: u32) -> Vec<Pokemon> {
    (first..first + PAGE_SIZE)
        .map(|id| entity(id, &format!("mon-{id}")))
        .collect()
}

// ============================================================================
// EffectStoreTestHarness Tests
// ============================================================================

#[test]
fn test_page_load_flow_with_harness() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    // Trigger fetch - should set loading and emit effect
    harness.dispatch_collect(Action::PageFetch);
    harness.assert_state(|s| s.page_loading);

    // Verify effect was emitted
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::FetchPage { first: 1, last: 20 }));

    // Simulate async completion
    harness.complete_action(Action::PageDidLoad(page(1)));
    let (changed, total) = harness.process_emitted();

    assert_eq!(total, 1, "Should have processed 1 action");
    assert_eq!(changed, 1, "Action should have changed state");

    harness.assert_state(|s| !s.page_loading);
    harness.assert_state(|s| s.catalog.entries.len() == PAGE_SIZE as usize);
    harness.assert_state(|s| s.catalog.page == 2);
}

#[test]
fn test_page_error_flow() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::PageFetch);
    harness.assert_state(|s| s.page_loading);

    // Simulate whole-batch failure
    harness.complete_action(Action::PageDidError("dns failure".into()));
    harness.process_emitted();

    harness.assert_state(|s| !s.page_loading);
    harness.assert_state(|s| s.catalog.entries.is_empty());
    harness.assert_state(|s| s.catalog.page == 1);
    harness.assert_state(|s| s.message.as_deref().unwrap().contains("dns failure"));
}

#[test]
fn test_loading_guard_with_harness() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::PageFetch);
    harness.dispatch_collect(Action::PageFetch);

    // Only the first fetch produced an effect
    let effects = harness.drain_effects();
    effects.effects_count(1);
}

#[test]
fn test_lookup_not_found_flow() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::LookupOpen);
    harness.dispatch_collect(Action::LookupSubmit("missingno".into()));

    let effects = harness.drain_effects();
    effects.effects_first_matches(|e| matches!(e, Effect::Lookup { .. }));

    harness.complete_action(Action::LookupDidError("No Pokémon found for 'missingno'".into()));
    harness.process_emitted();

    // The prompt stays open with a user-visible message
    harness.assert_state(|s| s.lookup.active);
    harness.assert_state(|s| s.lookup.error.is_some());
    harness.assert_state(|s| s.detail.is_none());
}

#[test]
fn test_evolution_degrade_flow() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::PageFetch);
    harness.complete_action(Action::PageDidLoad(page(1)));
    harness.process_emitted();
    harness.drain_effects();

    harness.dispatch_collect(Action::DetailOpen);
    harness.assert_state(|s| s.evolution.is_loading());

    let effects = harness.drain_effects();
    effects.effects_first_matches(|e| matches!(e, Effect::FetchEvolution { .. }));

    // Chain resolution fails; details must survive it
    harness.complete_action(Action::EvolutionDidError("species fetch failed".into()));
    harness.process_emitted();

    harness.assert_state(|s| s.detail.is_some());
    harness.assert_state(|s| s.evolution.is_failed());
}

#[test]
fn test_lookup_success_opens_details() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::LookupOpen);
    harness.dispatch_collect(Action::LookupSubmit("25".into()));
    harness.complete_action(Action::LookupDidLoad(entity(25, "pikachu")));
    harness.process_emitted();

    harness.assert_state(|s| !s.lookup.active);
    harness.assert_state(|s| s.detail.as_ref().map(|p| p.id) == Some(25));
    // Direct lookups never append to the paginated catalog
    harness.assert_state(|s| s.catalog.entries.is_empty());
}
