//! Fighter selection menu

use crate::app::App;
use crate::ui::centered_rect;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let panel = centered_rect(60, 14, area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Title
            Constraint::Length(3), // Name input
            Constraint::Min(0),    // Hint
        ])
        .split(panel);

    let title = vec![
        Line::from(""),
        Line::from(Span::styled(
            "🥕  VEGGIE GARDEN BRAWL  🥦",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Pick a vegetable. Its nutrients decide how it fights.",
            Style::default().fg(Color::Gray),
        )),
    ];
    f.render_widget(Paragraph::new(title).alignment(Alignment::Center), chunks[0]);

    let input = Paragraph::new(Line::from(vec![
        Span::styled(app.name_input.clone(), Style::default().fg(Color::White)),
        Span::styled("▏", Style::default().fg(Color::Yellow)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Your vegetable "),
    );
    f.render_widget(input, chunks[1]);

    let hint = Paragraph::new("e.g. Spicy Jalapeno, Iron Spinach, Angry Potato")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(hint, chunks[2]);
}
