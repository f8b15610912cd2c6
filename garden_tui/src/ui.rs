//! UI rendering

mod battle_view;
mod garden_view;
mod menu_view;

use crate::app::App;
use garden_core::{FighterStats, LogCategory, Screen};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status message
            Constraint::Length(3), // Keybindings footer
        ])
        .split(f.area());

    match app.game.screen() {
        Screen::Menu => menu_view::draw(f, app, chunks[0]),
        Screen::Exploration => garden_view::draw(f, app, chunks[0]),
        Screen::Battle | Screen::Victory | Screen::Defeat => battle_view::draw(f, app, chunks[0]),
    }

    draw_status(f, app, chunks[1]);
    draw_keybindings(f, app, chunks[2]);
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    if let Some(message) = &app.status {
        let paragraph = Paragraph::new(Span::styled(
            format!(" {}", message),
            Style::default().fg(Color::LightYellow),
        ));
        f.render_widget(paragraph, area);
    }
}

fn draw_keybindings(f: &mut Frame, app: &App, area: Rect) {
    let screen_keys: Vec<(&str, &str)> = match app.game.screen() {
        Screen::Menu => vec![("Enter", "Grow fighter"), ("Tab", "Suggest name"), ("Esc", "Quit")],
        Screen::Exploration if app.game.dialog_npc().is_some() => vec![("f", "Fight"), ("Esc", "Goodbye")],
        Screen::Exploration => vec![("←↑↓→", "Walk"), ("t", "Talk"), ("q", "Quit")],
        Screen::Battle => vec![("a", "Attack"), ("u", "Ultimate"), ("h", "Heal"), ("r", "Flee")],
        Screen::Victory | Screen::Defeat => vec![("Enter", "Return to garden"), ("q", "Quit")],
    };

    let mut spans: Vec<Span> = Vec::new();
    for (i, (key, desc)) in screen_keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(
            format!("[{}]", key),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(" {}", desc), Style::default().fg(Color::White)));
    }
    spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
    spans.push(Span::styled("[Ctrl-C]", Style::default().fg(Color::Cyan)));
    spans.push(Span::styled(" Exit", Style::default().fg(Color::Gray)));

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Keys "))
        .alignment(Alignment::Center);

    f.render_widget(paragraph, area);
}

/// Green above half, yellow above a quarter, red below
pub fn hp_color(stats: &FighterStats) -> Color {
    let percent = stats.hp_fraction();
    if percent > 0.5 {
        Color::Green
    } else if percent > 0.25 {
        Color::Yellow
    } else {
        Color::Red
    }
}

pub fn hp_bar(stats: &FighterStats, width: u16) -> Line<'static> {
    let percent = stats.hp_fraction();
    let filled = ((percent * width as f64) as usize).min(width as usize);
    let empty = width as usize - filled;

    Line::from(Span::styled(
        format!("{}{}", "█".repeat(filled), "░".repeat(empty)),
        Style::default().fg(hp_color(stats)),
    ))
}

pub fn log_style(category: LogCategory) -> Style {
    match category {
        LogCategory::Info => Style::default().fg(Color::Gray),
        LogCategory::Damage => Style::default().fg(Color::Red),
        LogCategory::Heal => Style::default().fg(Color::Green),
        LogCategory::Win => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        LogCategory::Loss => Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
        LogCategory::Effect => Style::default().fg(Color::Magenta),
    }
}

/// A rectangle of the given size centered in `area`
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
