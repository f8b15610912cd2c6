//! Garden exploration view: map, player card and NPC dialog

use crate::app::App;
use crate::ui::battle_view::fighter_lines;
use crate::ui::centered_rect;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::canvas::{Canvas, Circle},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(40),    // Map
            Constraint::Length(36), // Side panel
        ])
        .split(area);

    draw_map(f, app, chunks[0]);
    draw_side_panel(f, app, chunks[1]);

    if app.game.dialog_npc().is_some() {
        draw_dialog(f, app, area);
    }
}

fn draw_map(f: &mut Frame, app: &App, area: Rect) {
    let garden = app.game.garden();
    let config = garden.config();
    let size = config.map_size;
    let player = garden.player_position();
    let player_emoji = app.game.player().map(|p| p.emoji.as_str()).unwrap_or("🥬");

    // Canvas y grows upward, map y grows downward
    let flip = move |y: f64| size - y;

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(" The Garden "))
        .marker(Marker::Braille)
        .x_bounds([0.0, size])
        .y_bounds([0.0, size])
        .paint(move |ctx| {
            ctx.draw(&Circle {
                x: player.x,
                y: flip(player.y),
                radius: config.talk_radius,
                color: Color::DarkGray,
            });
            ctx.layer();

            for npc in garden.npcs() {
                let style = if npc.aggressive {
                    Style::default().fg(Color::LightRed)
                } else {
                    Style::default().fg(Color::LightGreen)
                };
                ctx.print(
                    npc.position.x,
                    flip(npc.position.y),
                    Span::styled(format!("{} {}", npc.emoji, npc.name), style),
                );
            }

            ctx.print(
                player.x,
                flip(player.y),
                Span::styled(
                    format!("{} You", player_emoji),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
            );
        });

    f.render_widget(canvas, area);
}

fn draw_side_panel(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(11), // Fighter card
            Constraint::Min(0),     // Nearest NPC
        ])
        .split(area);

    if let Some(player) = app.game.player() {
        let card = Paragraph::new(fighter_lines(player, chunks[0].width.saturating_sub(4)))
            .block(Block::default().borders(Borders::ALL).title(" Your Fighter "));
        f.render_widget(card, chunks[0]);
    }

    let garden = app.game.garden();
    let mut lines = Vec::new();
    if let Some((npc, distance)) = garden.nearest_npc() {
        lines.push(Line::from(Span::styled(
            format!("{} {}", npc.emoji, npc.name),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("{:.0} steps away", distance),
            Style::default().fg(Color::Gray),
        )));
        let reach = if distance <= garden.config().talk_radius {
            Span::styled("Within earshot", Style::default().fg(Color::Green))
        } else {
            Span::styled("Press t to walk over", Style::default().fg(Color::DarkGray))
        };
        lines.push(Line::from(reach));
        if npc.aggressive {
            lines.push(Line::from(Span::styled(
                "Looks ready for a fight",
                Style::default().fg(Color::LightRed),
            )));
        }
    }

    let position = garden.player_position();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Position: ({:.0}, {:.0})", position.x, position.y),
        Style::default().fg(Color::DarkGray),
    )));

    let nearest = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Nearby "));
    f.render_widget(nearest, chunks[1]);
}

fn draw_dialog(f: &mut Frame, app: &App, area: Rect) {
    let Some(npc) = app.game.dialog_npc() else {
        return;
    };

    let popup = centered_rect(52, 8, area);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("\"{}\"", npc.dialog),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[f]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::styled(" Fight   ", Style::default().fg(Color::White)),
            Span::styled("[Esc]", Style::default().fg(Color::Cyan)),
            Span::styled(" Goodbye", Style::default().fg(Color::Gray)),
        ]),
    ];

    let dialog = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(format!(" {} {} ", npc.emoji, npc.name)),
        );

    f.render_widget(Clear, popup);
    f.render_widget(dialog, popup);
}
