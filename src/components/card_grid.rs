//! Card grid - the paginated catalog view

use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::Component;
use crate::action::Action;
use crate::state::{AppState, CARD_HEIGHT, CARD_WIDTH, Pokemon};

/// Props for CardGrid - read-only view of state
pub struct CardGridProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// The paginated card grid plus the footer status bar
pub struct CardGrid {
    first_row: usize,
    status_bar: StatusBar,
}

impl Default for CardGrid {
    fn default() -> Self {
        Self {
            first_row: 0,
            status_bar: StatusBar::new(),
        }
    }
}

impl CardGrid {
    pub fn new() -> Self {
        Self::default()
    }

    fn render_grid(&mut self, frame: &mut Frame, area: Rect, state: &AppState, is_focused: bool) {
        if state.filtered_indices.is_empty() {
            self.first_row = 0;
            render_empty(frame, area, state);
            return;
        }

        let columns = state.grid_columns();
        let rows_visible = (area.height / CARD_HEIGHT).max(1) as usize;
        let selected_row = state.selected_index / columns;
        if selected_row < self.first_row {
            self.first_row = selected_row;
        }
        if selected_row >= self.first_row + rows_visible {
            self.first_row = selected_row + 1 - rows_visible;
        }

        for (slot, entry_idx) in state
            .filtered_indices
            .iter()
            .enumerate()
            .skip(self.first_row * columns)
            .take(rows_visible * columns)
        {
            let Some(pokemon) = state.catalog.entries.get(*entry_idx) else {
                continue;
            };
            let row = slot / columns - self.first_row;
            let col = slot % columns;
            let x = area.x + (col as u16) * CARD_WIDTH;
            let y = area.y + (row as u16) * CARD_HEIGHT;
            if x + CARD_WIDTH > area.x + area.width || y + CARD_HEIGHT > area.y + area.height {
                continue;
            }
            let cell = Rect::new(x, y, CARD_WIDTH, CARD_HEIGHT);
            render_card(frame, cell, pokemon, slot == state.selected_index, is_focused);
        }
    }

    fn render_footer(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let hints = [
            StatusBarHint::new("n", "next page"),
            StatusBarHint::new("/", "filter"),
            StatusBarHint::new("g", "lookup"),
            StatusBarHint::new("enter", "details"),
            StatusBarHint::new("q", "quit"),
        ];
        let status = status_text(state);
        let status_items = [StatusBarItem::span(Span::styled(
            status,
            Style::default().fg(Color::Yellow),
        ))];

        let props = StatusBarProps {
            left: StatusBarSection::hints(&hints).with_separator("  "),
            center: StatusBarSection::empty(),
            right: StatusBarSection::items(&status_items).with_separator("  "),
            style: StatusBarStyle::default(),
            is_focused: false,
        };
        Component::<Action>::render(&mut self.status_bar, frame, area, props);
    }
}

impl Component<Action> for CardGrid {
    type Props<'a> = CardGridProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Left | KeyCode::Char('h') => Some(Action::SelectionMove(-1)),
                KeyCode::Right | KeyCode::Char('l') => Some(Action::SelectionMove(1)),
                KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectionRow(-1)),
                KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectionRow(1)),
                KeyCode::Enter => Some(Action::DetailOpen),
                KeyCode::Char('n') | KeyCode::PageDown => Some(Action::PageFetch),
                KeyCode::Char('/') => Some(Action::SearchOpen),
                KeyCode::Char('g') => Some(Action::LookupOpen),
                KeyCode::Esc => Some(Action::SearchClose),
                KeyCode::Char('q') => Some(Action::Quit),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: CardGridProps<'_>) {
        let chunks = Layout::vertical([
            Constraint::Min(1),    // Grid
            Constraint::Length(1), // Footer
        ])
        .split(area);

        self.render_grid(frame, chunks[0], props.state, props.is_focused);
        self.render_footer(frame, chunks[1], props.state);
    }
}

fn render_card(frame: &mut Frame, area: Rect, pokemon: &Pokemon, selected: bool, focused: bool) {
    let accent = type_accent(&pokemon.types);
    let border_style = if selected {
        let style = Style::default().fg(accent);
        if focused {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default().borders(Borders::ALL).border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let number = format!("#{:03}", pokemon.id);
    let lines = vec![
        Line::from(vec![
            Span::styled(number, Style::default().fg(Color::DarkGray)),
            Span::raw(" "),
            Span::styled(
                pokemon.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            pokemon.types.join("/"),
            Style::default().fg(accent),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_empty(frame: &mut Frame, area: Rect, state: &AppState) {
    let text = if state.page_loading {
        let dots = ".".repeat((state.tick % 4) as usize);
        format!("Loading page {}{dots}", state.catalog.page)
    } else if !state.search.query.trim().is_empty() {
        "No Pokémon found.".to_string()
    } else {
        "Catalog is empty. Press n to load a page.".to_string()
    };

    let block = Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .block(block),
        area,
    );
}

fn status_text(state: &AppState) -> String {
    if let Some(message) = &state.message {
        return message.clone();
    }
    if state.page_loading {
        let dots = ".".repeat((state.tick % 4) as usize);
        return format!("Loading page {}{dots}", state.catalog.page);
    }
    format!("{} loaded", state.catalog.entries.len())
}

/// Accent color by the first recognized type tag.
fn type_accent(types: &[String]) -> Color {
    types
        .iter()
        .find_map(|name| match name.as_str() {
            "fire" => Some(Color::Rgb(253, 223, 223)),
            "grass" => Some(Color::Rgb(222, 253, 224)),
            "electric" => Some(Color::Rgb(252, 247, 222)),
            "water" => Some(Color::Rgb(222, 243, 253)),
            "ground" => Some(Color::Rgb(244, 231, 218)),
            "rock" => Some(Color::Rgb(213, 213, 212)),
            "fairy" => Some(Color::Rgb(252, 234, 255)),
            "poison" => Some(Color::Rgb(152, 215, 165)),
            "bug" => Some(Color::Rgb(248, 213, 163)),
            "dragon" => Some(Color::Rgb(151, 179, 230)),
            "psychic" => Some(Color::Rgb(234, 237, 161)),
            "flying" => Some(Color::Rgb(245, 245, 245)),
            "fighting" => Some(Color::Rgb(230, 224, 212)),
            "normal" => Some(Color::Rgb(245, 245, 245)),
            _ => None,
        })
        .unwrap_or(Color::Rgb(245, 245, 245))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_dispatch::testing::*;

    #[test]
    fn test_handle_event_next_page() {
        let mut component = CardGrid::new();
        let state = AppState::default();
        let props = CardGridProps {
            state: &state,
            is_focused: true,
        };

        let actions: Vec<_> = component
            .handle_event(&EventKind::Key(key("n")), props)
            .into_iter()
            .collect();
        actions.assert_count(1);
        actions.assert_first(Action::PageFetch);
    }

    #[test]
    fn test_handle_event_opens_filter_and_lookup() {
        let mut component = CardGrid::new();
        let state = AppState::default();

        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(key("/")),
                CardGridProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::SearchOpen);

        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(key("g")),
                CardGridProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::LookupOpen);
    }

    #[test]
    fn test_handle_event_unfocused_ignores() {
        let mut component = CardGrid::new();
        let state = AppState::default();
        let props = CardGridProps {
            state: &state,
            is_focused: false,
        };

        let actions: Vec<_> = component
            .handle_event(&EventKind::Key(key("n")), props)
            .into_iter()
            .collect();
        actions.assert_empty();
    }
}
