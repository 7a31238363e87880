//! Filter input - live local search over fetched entities

use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};
use tui_dispatch::EventKind;
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{BaseStyle, Padding, TextInput, TextInputProps, TextInputStyle};

use super::Component;
use crate::action::Action;

pub struct SearchBar {
    input: TextInput,
    was_active: bool,
}

pub struct SearchBarProps<'a> {
    pub query: &'a str,
    pub is_active: bool,
    pub match_count: usize,
    // Action constructors
    pub on_change: fn(String) -> Action,
    pub on_submit: fn(String) -> Action,
}

impl Default for SearchBar {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
            was_active: false,
        }
    }
}

impl SearchBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_active(&mut self, is_active: bool) {
        if is_active && !self.was_active {
            self.input = TextInput::new();
        }
        self.was_active = is_active;
    }
}

fn input_style() -> TextInputStyle {
    TextInputStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(Color::DarkGray),
                focused_style: Some(Style::default().fg(Color::Cyan)),
            }),
            padding: Padding::xy(1, 0),
            bg: None,
            fg: None,
        },
        placeholder_style: None,
        cursor_style: None,
    }
}

impl Component<Action> for SearchBar {
    type Props<'a> = SearchBarProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_active {
            return Vec::new();
        }

        if let EventKind::Key(key) = event {
            if key.code == KeyCode::Esc {
                return vec![Action::SearchClose];
            }
        }

        let input_props = TextInputProps {
            value: props.query,
            placeholder: "Filter by name or ID...",
            is_focused: true,
            style: input_style(),
            on_change: props.on_change,
            on_submit: props.on_submit,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input
            .handle_event(event, input_props)
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if props.is_active {
            let input_props = TextInputProps {
                value: props.query,
                placeholder: "Filter by name or ID...",
                is_focused: true,
                style: input_style(),
                on_change: props.on_change,
                on_submit: props.on_submit,
                on_cursor_move: Some(|_| Action::Render),
            };
            self.input.render(frame, area, input_props);
            return;
        }

        // Inactive but a filter is applied: show it with the match count
        let summary = format!(
            "Filter: {}  ({} match{})  Esc clears",
            props.query,
            props.match_count,
            if props.match_count == 1 { "" } else { "es" },
        );
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        frame.render_widget(
            Paragraph::new(summary)
                .style(Style::default().fg(Color::Gray))
                .block(block),
            area,
        );
    }
}
