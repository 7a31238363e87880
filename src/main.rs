//! Pokegrid TUI - paginated Pokedex browser

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext,
};
use tui_dispatch_components::centered_rect;
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokegrid::action::Action;
use pokegrid::api::{self, ApiError};
use pokegrid::components::{
    CardGrid, CardGridProps, Component, DetailModal, DetailModalProps, LookupPrompt,
    LookupPromptProps, SearchBar, SearchBarProps,
};
use pokegrid::effect::Effect;
use pokegrid::reducer::reducer;
use pokegrid::state::{AppState, LOADING_ANIM_TICK_MS};

/// Pokegrid TUI - browse the PokeAPI catalog as a card grid
#[derive(Parser, Debug)]
#[command(name = "pokegrid")]
#[command(about = "A paginated Pokedex card grid for the terminal")]
struct Args {
    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum GridComponentId {
    Grid,
    Search,
    Lookup,
    Detail,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum GridContext {
    Grid,
    Search,
    Lookup,
    Detail,
}

impl EventRoutingState<GridComponentId, GridContext> for AppState {
    fn focused(&self) -> Option<GridComponentId> {
        if self.lookup.active {
            return Some(GridComponentId::Lookup);
        }
        if self.detail.is_some() {
            return Some(GridComponentId::Detail);
        }
        if self.search.active {
            return Some(GridComponentId::Search);
        }
        Some(GridComponentId::Grid)
    }

    fn modal(&self) -> Option<GridComponentId> {
        if self.lookup.active {
            Some(GridComponentId::Lookup)
        } else if self.detail.is_some() {
            Some(GridComponentId::Detail)
        } else {
            None
        }
    }

    fn binding_context(&self, id: GridComponentId) -> GridContext {
        match id {
            GridComponentId::Grid => GridContext::Grid,
            GridComponentId::Search => GridContext::Search,
            GridComponentId::Lookup => GridContext::Lookup,
            GridComponentId::Detail => GridContext::Detail,
        }
    }

    fn default_context(&self) -> GridContext {
        GridContext::Grid
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args { debug: debug_args } = Args::parse();

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(|| async { Ok::<AppState, io::Error>(AppState::default()) })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

struct GridUi {
    grid: CardGrid,
    search: SearchBar,
    lookup: LookupPrompt,
    detail: DetailModal,
}

impl GridUi {
    fn new() -> Self {
        Self {
            grid: CardGrid::new(),
            search: SearchBar::new(),
            lookup: LookupPrompt::new(),
            detail: DetailModal::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<GridComponentId>,
    ) {
        let search_visible = state.search.active || !state.search.query.trim().is_empty();
        let (bar_area, grid_area) = if search_visible {
            let chunks = Layout::vertical([
                Constraint::Length(3), // Filter input
                Constraint::Min(1),    // Grid
            ])
            .split(area);
            (Some(chunks[0]), chunks[1])
        } else {
            (None, area)
        };

        let modal_open = state.lookup.active || state.detail.is_some();

        event_ctx.set_component_area(GridComponentId::Grid, grid_area);
        self.grid.render(
            frame,
            grid_area,
            CardGridProps {
                state,
                is_focused: render_ctx.is_focused() && !modal_open && !state.search.active,
            },
        );

        self.search.set_active(state.search.active);
        if let Some(bar_area) = bar_area {
            event_ctx.set_component_area(GridComponentId::Search, bar_area);
            self.search.render(
                frame,
                bar_area,
                SearchBarProps {
                    query: &state.search.query,
                    is_active: state.search.active,
                    match_count: state.filtered_indices.len(),
                    on_change: Action::SearchQueryChange,
                    on_submit: Action::SearchSubmit,
                },
            );
        } else {
            event_ctx.component_areas.remove(&GridComponentId::Search);
        }

        if let Some(pokemon) = &state.detail {
            let modal_area = centered_rect(56, 18, area);
            event_ctx.set_component_area(GridComponentId::Detail, modal_area);
            self.detail.render(
                frame,
                area,
                DetailModalProps {
                    pokemon,
                    evolution: &state.evolution,
                    is_focused: render_ctx.is_focused() && !state.lookup.active,
                },
            );
        } else {
            event_ctx.component_areas.remove(&GridComponentId::Detail);
        }

        self.lookup.set_open(state.lookup.active);
        if state.lookup.active {
            let modal_area = centered_rect(46, 8, area);
            event_ctx.set_component_area(GridComponentId::Lookup, modal_area);
            self.lookup.render(
                frame,
                area,
                LookupPromptProps {
                    query: &state.lookup.query,
                    error: state.lookup.error.as_deref(),
                    is_focused: render_ctx.is_focused(),
                    on_change: Action::LookupQueryChange,
                    on_submit: Action::LookupSubmit,
                },
            );
        } else {
            event_ctx.component_areas.remove(&GridComponentId::Lookup);
        }
    }

    fn handle_grid_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = CardGridProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.grid.handle_event(event, props).into_iter().collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }

    fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        self.search.set_active(state.search.active);
        let props = SearchBarProps {
            query: &state.search.query,
            is_active: state.search.active,
            match_count: state.filtered_indices.len(),
            on_change: Action::SearchQueryChange,
            on_submit: Action::SearchSubmit,
        };
        let actions: Vec<_> = self.search.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }

    fn handle_lookup_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        self.lookup.set_open(state.lookup.active);
        let props = LookupPromptProps {
            query: &state.lookup.query,
            error: state.lookup.error.as_deref(),
            is_focused: true,
            on_change: Action::LookupQueryChange,
            on_submit: Action::LookupSubmit,
        };
        let actions: Vec<_> = self.lookup.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }

    fn handle_detail_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let Some(pokemon) = &state.detail else {
            return HandlerResponse::ignored();
        };
        let props = DetailModalProps {
            pokemon,
            evolution: &state.evolution,
            is_focused: true,
        };
        let actions: Vec<_> = self.detail.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(GridUi::new()));
    let mut bus: EventBus<AppState, Action, GridComponentId, GridContext> = EventBus::new();
    let keybindings: Keybindings<GridContext> = Keybindings::new();

    let ui_grid = Rc::clone(&ui);
    bus.register(GridComponentId::Grid, move |event, state| {
        ui_grid.borrow_mut().handle_grid_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(GridComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    let ui_lookup = Rc::clone(&ui);
    bus.register(GridComponentId::Lookup, move |event, state| {
        ui_lookup
            .borrow_mut()
            .handle_lookup_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(GridComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    // Track terminal size for grid geometry
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(LOADING_ANIM_TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::FetchPage { first, last } => {
            ctx.tasks().spawn("page", async move {
                match api::fetch_page(first, last).await {
                    Ok(batch) => Action::PageDidLoad(batch),
                    Err(err) => Action::PageDidError(err.to_string()),
                }
            });
        }
        Effect::Lookup { query } => {
            ctx.tasks().spawn("lookup", async move {
                match api::fetch_pokemon(&query).await {
                    Ok(pokemon) => Action::LookupDidLoad(pokemon),
                    Err(ApiError::NotFound(_)) => {
                        Action::LookupDidError(format!("No Pokémon found for '{query}'"))
                    }
                    Err(err) => Action::LookupDidError(err.to_string()),
                }
            });
        }
        Effect::FetchEvolution { species_url } => {
            ctx.tasks().spawn("evolution", async move {
                match api::fetch_evolution_chain(&species_url).await {
                    Ok(chain) => Action::EvolutionDidLoad(chain),
                    Err(err) => Action::EvolutionDidError(err.to_string()),
                }
            });
        }
    }
}
