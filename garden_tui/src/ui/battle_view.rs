//! Battle view: fighter cards, turn banner, battle log and result popup

use crate::app::App;
use crate::ui::{centered_rect, hp_bar, hp_color, log_style};
use garden_core::{ActionKind, BattlePhase, BattleSession, Fighter, Side};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let Some(battle) = app.game.battle() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Turn banner
            Constraint::Length(12), // Fighter cards
            Constraint::Min(0),     // Battle log
        ])
        .split(area);

    draw_banner(f, battle, chunks[0]);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    draw_card(f, battle, Side::Enemy, cards[0]);
    draw_card(f, battle, Side::Player, cards[1]);

    draw_log(f, battle, chunks[2]);

    if battle.is_over() {
        draw_result(f, battle, area);
    }
}

fn draw_banner(f: &mut Frame, battle: &BattleSession, area: Rect) {
    let (text, color) = match battle.phase() {
        BattlePhase::PlayerTurn if battle.player().is_stunned() => ("You are stunned...", Color::Magenta),
        BattlePhase::PlayerTurn => ("Your turn", Color::Green),
        BattlePhase::EnemyTurn => ("Enemy is thinking...", Color::Red),
        BattlePhase::Victory => ("Victory!", Color::Yellow),
        BattlePhase::Defeat => ("Defeat", Color::DarkGray),
    };

    let line = Line::from(vec![
        Span::styled(format!("Turn {}", battle.turn().number), Style::default().fg(Color::Gray)),
        Span::raw("   "),
        Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ]);
    let banner = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(banner, area);
}

/// Name, hp bar, stats, ultimate and status effects of a fighter
pub fn fighter_lines(fighter: &Fighter, bar_width: u16) -> Vec<Line<'static>> {
    let stats = &fighter.stats;
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} {}", fighter.emoji, fighter.name),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("HP ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}/{}", stats.hp(), stats.max_hp()),
                Style::default()
                    .fg(hp_color(stats))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        hp_bar(stats, bar_width),
        Line::from(Span::styled(
            format!("ATK {:>3}  DEF {:>3}  SPD {:>3}", stats.attack, stats.defense, stats.speed),
            Style::default().fg(Color::Gray),
        )),
        Line::from(vec![
            Span::styled("Ultimate: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{} (x{:.1})", fighter.ultimate.name, fighter.ultimate.multiplier),
                Style::default().fg(Color::Yellow),
            ),
        ]),
    ];

    if !fighter.nutritional_highlight.is_empty() {
        lines.push(Line::from(Span::styled(
            fighter.nutritional_highlight.clone(),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let effects: Vec<Span> = fighter
        .status_effects()
        .iter()
        .map(|e| {
            let color = if e.effect_type.is_debuff() {
                Color::Magenta
            } else {
                Color::Cyan
            };
            // Dimmed on its last turn
            let style = if e.is_expiring() {
                Style::default().fg(color).add_modifier(Modifier::DIM)
            } else {
                Style::default().fg(color)
            };
            Span::styled(format!("{} {} ({}) ", e.icon(), e.name(), e.duration), style)
        })
        .collect();
    if !effects.is_empty() {
        lines.push(Line::from(effects));
    }

    lines
}

fn draw_card(f: &mut Frame, battle: &BattleSession, side: Side, area: Rect) {
    let fighter = battle.fighter(side);
    let active = battle.phase().active_side() == Some(side);

    // Flash the card hit by (or healed by) the latest action
    let cue = battle.turn().last_action.filter(|a| a.target == side);
    let border = match cue.map(|a| a.kind) {
        Some(ActionKind::Heal) => Style::default().fg(Color::Green),
        Some(ActionKind::Ultimate) => Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        Some(ActionKind::Hit) => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        None if active => Style::default().fg(Color::Yellow),
        None => Style::default().fg(Color::DarkGray),
    };
    let title = match side {
        Side::Player => " You ",
        Side::Enemy => " Opponent ",
    };

    let card = Paragraph::new(fighter_lines(fighter, area.width.saturating_sub(4)))
        .block(Block::default().borders(Borders::ALL).border_style(border).title(title));
    f.render_widget(card, area);
}

fn draw_log(f: &mut Frame, battle: &BattleSession, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let entries = battle.log().entries();
    let start = entries.len().saturating_sub(visible);

    let items: Vec<ListItem> = entries[start..]
        .iter()
        .map(|entry| ListItem::new(Line::from(Span::styled(entry.text.clone(), log_style(entry.category)))))
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Battle Log "));
    f.render_widget(list, area);
}

fn draw_result(f: &mut Frame, battle: &BattleSession, area: Rect) {
    let popup = centered_rect(44, 7, area);
    let (title, message, color) = match battle.phase() {
        BattlePhase::Victory => (
            "🏆 VICTORY 🏆",
            format!("{} has been composted.", battle.enemy().name),
            Color::Yellow,
        ),
        _ => (
            "💀 DEFEAT 💀",
            format!("{} has withered.", battle.player().name),
            Color::Gray,
        ),
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(title, Style::default().fg(color).add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(message, Style::default().fg(Color::White))),
        Line::from(Span::styled(
            "Enter: back to the garden",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let result = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)));

    f.render_widget(Clear, popup);
    f.render_widget(result, popup);
}
