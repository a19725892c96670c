//! UI rendering using ratatui.

mod board;

use super::app::App;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
};
use strictly_codenames::{Team, TurnView};

pub use board::render_board;

/// Draws the main UI.
pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("Strictly Games - Codenames")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(60), Constraint::Length(34)])
        .split(chunks[1]);

    if let Some(view) = app.view() {
        render_board(f, body[0], view, app.cursor());
        render_sidebar(f, body[1], view, app);
    }

    let status = Paragraph::new(app.status_message())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, chunks[2]);

    let help = Paragraph::new(
        "Arrows: Move | Enter: Reveal | 1-3: Clue size | E: End turn | D: Difficulty | R: Retry | Q: Quit",
    )
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);
}

fn render_sidebar(f: &mut Frame, area: Rect, view: &TurnView, app: &App) {
    let board = &view.board;
    let unpicked = board.unpicked();

    let mut lines = vec![
        Line::from(format!("Phase: {}", board.phase())),
        Line::from(format!(
            "Clue: {}",
            board
                .clue()
                .map(|c| format!("{} ({})", c.word, c.target_count))
                .unwrap_or_else(|| "-".to_string())
        )),
        Line::from(format!("Guesses left: {}", board.remaining_guesses())),
        Line::from(format!("Difficulty: {}", board.difficulty())),
        Line::from(""),
    ];
    lines.extend(
        [Team::Blue, Team::Red, Team::Neutral, Team::Assassin]
            .into_iter()
            .map(|team| Line::from(format!("{:<9} {}", team, unpicked.get(team)))),
    );
    lines.push(Line::from(""));
    lines.extend(app.history().map(|entry| Line::from(entry.to_string())));

    let sidebar = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Game"));
    f.render_widget(sidebar, area);
}
