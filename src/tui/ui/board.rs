//! Card grid rendering.

use super::super::input::GRID_WIDTH;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};
use strictly_codenames::{Card, CardId, RevealCause, Team, TurnView};

/// Renders the 5x5 card grid with cursor highlight.
pub fn render_board(f: &mut Frame, area: Rect, view: &TurnView, cursor: CardId) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, GRID_WIDTH as u32); GRID_WIDTH])
        .split(area);

    for (row_area, cards) in rows.iter().zip(view.board.cards().chunks(GRID_WIDTH)) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, GRID_WIDTH as u32); GRID_WIDTH])
            .split(*row_area);
        for (cell, card) in cols.iter().zip(cards) {
            render_card(f, *cell, card, card.id() == cursor, view.controls.cards);
        }
    }
}

fn render_card(f: &mut Frame, area: Rect, card: &Card, selected: bool, enabled: bool) {
    let mut style = match card.revealed_by() {
        None => Style::default().fg(Color::White),
        Some(cause) => {
            let style = Style::default().fg(Color::Black).bg(team_color(card.team()));
            if cause == RevealCause::Endgame {
                style.add_modifier(Modifier::DIM)
            } else {
                style.add_modifier(Modifier::BOLD)
            }
        }
    };
    if !enabled {
        style = style.add_modifier(Modifier::DIM);
    }

    let border = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let paragraph = Paragraph::new(card.word())
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(border));
    f.render_widget(paragraph, area);
}

fn team_color(team: Team) -> Color {
    match team {
        Team::Blue => Color::Blue,
        Team::Red => Color::Red,
        Team::Neutral => Color::Gray,
        Team::Assassin => Color::DarkGray,
    }
}
