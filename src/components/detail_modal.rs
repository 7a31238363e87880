//! Details modal - stats, abilities and evolution line for one entity

use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use tui_dispatch::{DataResource, EventKind};
use tui_dispatch_components::{
    BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding, centered_rect,
};

use super::Component;
use crate::action::Action;
use crate::state::{EvolutionChain, Pokemon, PokemonStat};

pub struct DetailModal {
    modal: Modal,
}

pub struct DetailModalProps<'a> {
    pub pokemon: &'a Pokemon,
    pub evolution: &'a DataResource<EvolutionChain>,
    pub is_focused: bool,
}

impl Default for DetailModal {
    fn default() -> Self {
        Self {
            modal: Modal::new(),
        }
    }
}

impl DetailModal {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for DetailModal {
    type Props<'a> = DetailModalProps<'a>;

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
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => Some(Action::DetailClose),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width < 30 || area.height < 12 {
            return;
        }

        let lines = detail_lines(props.pokemon, props.evolution);
        let modal_area = centered_rect(56, 18, area);
        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            frame.render_widget(
                Paragraph::new(lines.clone()).wrap(Wrap { trim: true }),
                content_area,
            );
        };

        self.modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area,
                style: ModalStyle {
                    base: BaseStyle {
                        bg: Some(Color::Rgb(35, 35, 45)),
                        padding: Padding::all(1),
                        border: None,
                        fg: None,
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::DetailClose,
                render_content: &mut render_content,
            },
        );
    }
}

fn detail_lines(pokemon: &Pokemon, evolution: &DataResource<EvolutionChain>) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("#{:03} {}", pokemon.id, pokemon.name),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Type: {}", pokemon.types.join(", "))),
        Line::from(format!("Abilities: {}", pokemon.abilities.join(", "))),
        Line::default(),
    ];

    for stat in &pokemon.stats {
        lines.push(Line::from(stat_line(stat)));
    }

    let base_experience = pokemon
        .base_experience
        .map(|exp| exp.to_string())
        .unwrap_or_else(|| "-".to_string());
    lines.push(Line::default());
    lines.push(Line::from(format!(
        "HT {} dm   WT {} hg   EXP {base_experience}",
        pokemon.height, pokemon.weight
    )));

    lines.push(Line::default());
    lines.push(evolution_line(evolution));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Esc to close",
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

fn evolution_line(evolution: &DataResource<EvolutionChain>) -> Line<'static> {
    match evolution {
        DataResource::Empty => Line::default(),
        DataResource::Loading => Line::from(Span::styled(
            "Evolution: ...",
            Style::default().fg(Color::DarkGray),
        )),
        DataResource::Loaded(chain) => {
            Line::from(format!("Evolution: {}", chain.stages.join(" > ")))
        }
        DataResource::Failed(_) => Line::from(Span::styled(
            "Evolution: unavailable",
            Style::default().fg(Color::DarkGray),
        )),
    }
}

fn stat_line(stat: &PokemonStat) -> String {
    let label = shorten_stat(&stat.name);
    let bar_len = (stat.value as usize / 10).clamp(1, 20);
    let bar = "#".repeat(bar_len);
    format!("{label:>4} {value:>3} {bar}", value = stat.value)
}

fn shorten_stat(name: &str) -> String {
    match name {
        "hp" => " HP".to_string(),
        "attack" => "ATK".to_string(),
        "defense" => "DEF".to_string(),
        "special-attack" => "SAT".to_string(),
        "special-defense" => "SDF".to_string(),
        "speed" => "SPD".to_string(),
        _ => name.to_ascii_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity() -> Pokemon {
        Pokemon {
            id: 25,
            name: "pikachu".to_string(),
            types: vec!["electric".to_string()],
            stats: vec![PokemonStat {
                name: "speed".to_string(),
                value: 90,
            }],
            abilities: vec!["static".to_string()],
            height: 4,
            weight: 60,
            base_experience: Some(112),
            species_url: "https://pokeapi.co/api/v2/pokemon-species/25/".to_string(),
        }
    }

    #[test]
    fn test_detail_lines_include_identity_and_stats() {
        let lines = detail_lines(&entity(), &DataResource::Loading);
        let text: Vec<String> = lines.iter().map(|line| line.to_string()).collect();

        assert!(text[0].contains("#025 pikachu"));
        assert!(text.iter().any(|line| line.contains("electric")));
        assert!(text.iter().any(|line| line.contains("SPD")));
        assert!(text.iter().any(|line| line.contains("Evolution: ...")));
    }

    #[test]
    fn test_failed_chain_degrades_without_hiding_stats() {
        let lines = detail_lines(&entity(), &DataResource::Failed("boom".to_string()));
        let text: Vec<String> = lines.iter().map(|line| line.to_string()).collect();

        assert!(text.iter().any(|line| line.contains("Evolution: unavailable")));
        assert!(text.iter().any(|line| line.contains("SPD")));
        assert!(!text.iter().any(|line| line.contains("boom")));
    }

    #[test]
    fn test_missing_base_experience_renders_dash() {
        let mut pokemon = entity();
        pokemon.base_experience = None;
        let lines = detail_lines(&pokemon, &DataResource::Empty);
        let text: Vec<String> = lines.iter().map(|line| line.to_string()).collect();

        assert!(text.iter().any(|line| line.contains("EXP -")));
    }
}
