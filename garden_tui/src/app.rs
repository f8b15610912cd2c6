//! Application state

use crossterm::event::{KeyCode, KeyEvent};
use garden_core::generate::{generate_fighter, random_vegetable_name, FighterGenerator};
use garden_core::{Action, BattlePhase, GameError, GameEvent, GameSession, Interaction, Screen, Side};
use std::time::Duration;
use tokio::runtime::Runtime;

/// Distance walked per arrow key press
const STEP: f64 = 50.0;
/// Longest fighter name accepted on the menu
const MAX_NAME_LEN: usize = 24;

pub struct App {
    pub game: GameSession,
    /// Fighter name typed on the menu
    pub name_input: String,
    /// One-line message shown above the key bar
    pub status: Option<String>,
    pub should_quit: bool,
    generator: Box<dyn FighterGenerator>,
    runtime: Runtime,
}

impl App {
    pub fn new(game: GameSession, generator: Box<dyn FighterGenerator>, runtime: Runtime) -> Self {
        App {
            game,
            name_input: String::new(),
            status: Some("Name a vegetable to grow your fighter.".to_string()),
            should_quit: false,
            generator,
            runtime,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        match self.game.screen() {
            Screen::Menu => self.on_menu_key(key),
            Screen::Exploration => self.on_garden_key(key),
            Screen::Battle => self.on_battle_key(key),
            Screen::Victory | Screen::Defeat => self.on_result_key(key),
        }
    }

    fn on_menu_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter => self.start_game(),
            KeyCode::Tab => self.suggest_name(),
            KeyCode::Backspace => {
                self.name_input.pop();
            }
            KeyCode::Char(c) if self.name_input.chars().count() < MAX_NAME_LEN => self.name_input.push(c),
            _ => {}
        }
    }

    fn on_garden_key(&mut self, key: KeyEvent) {
        if self.game.dialog_npc().is_some() {
            match key.code {
                KeyCode::Char('f') => self.fight(),
                KeyCode::Esc => {
                    if let Err(err) = self.game.close_dialog() {
                        self.report(err);
                    }
                }
                _ => {}
            }
            return;
        }

        let step = match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some((0.0, -STEP)),
            KeyCode::Down | KeyCode::Char('j') => Some((0.0, STEP)),
            KeyCode::Left | KeyCode::Char('h') => Some((-STEP, 0.0)),
            KeyCode::Right | KeyCode::Char('l') => Some((STEP, 0.0)),
            _ => None,
        };
        if let Some((dx, dy)) = step {
            match self.game.step_player(dx, dy) {
                Ok(_) => self.status = None,
                Err(err) => self.report(err),
            }
            return;
        }

        match key.code {
            KeyCode::Char('t') => self.talk_to_nearest(),
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn on_battle_key(&mut self, key: KeyEvent) {
        let action = match key.code {
            KeyCode::Char('a') => Action::Attack,
            KeyCode::Char('u') => Action::Ultimate,
            KeyCode::Char('h') => Action::Heal,
            KeyCode::Char('r') => {
                match self.game.flee() {
                    Ok(()) => self.status = Some("You ran back to the garden.".to_string()),
                    Err(err) => self.report(err),
                }
                return;
            }
            _ => return,
        };

        match self.game.player_action(action) {
            Ok(events) => events.into_iter().for_each(|event| self.on_event(event)),
            Err(err) => self.report(err),
        }
    }

    fn on_result_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => match self.game.return_to_garden() {
                Ok(()) => self.status = Some("Back in the garden. You feel a little better.".to_string()),
                Err(err) => self.report(err),
            },
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    /// Feed elapsed time to the game and react to what fired
    pub fn tick(&mut self, elapsed: Duration) {
        for event in self.game.tick(elapsed) {
            self.on_event(event);
        }
    }

    fn on_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::DialogOpened { .. } => self.status = None,
            GameEvent::BattleEnded(BattlePhase::Victory) => {
                self.status = Some("Victory! Press Enter to return to the garden.".to_string())
            }
            GameEvent::BattleEnded(_) => {
                self.status = Some("Defeated... Press Enter to return to the garden.".to_string())
            }
            GameEvent::TurnResolved(_) | GameEvent::ActionCueCleared => {}
        }
    }

    fn start_game(&mut self) {
        let name = self.name_input.trim().to_string();
        if name.is_empty() {
            self.status = Some("Type a vegetable name first (Tab for a suggestion).".to_string());
            return;
        }

        let fighter = self
            .runtime
            .block_on(generate_fighter(&*self.generator, &name, Side::Player));
        match self.game.start_game(fighter) {
            Ok(()) => self.status = Some("Arrows to walk, t to talk to the nearest vegetable.".to_string()),
            Err(err) => self.report(err),
        }
    }

    fn suggest_name(&mut self) {
        let name = self.runtime.block_on(random_vegetable_name(&*self.generator));
        self.name_input = name.chars().take(MAX_NAME_LEN).collect();
    }

    fn talk_to_nearest(&mut self) {
        let Some(npc_id) = self.game.garden().nearest_npc().map(|(npc, _)| npc.id.clone()) else {
            self.status = Some("Nobody lives in this garden.".to_string());
            return;
        };

        match self.game.interact(&npc_id) {
            Ok(Interaction::Immediate) => self.status = None,
            Ok(Interaction::WalkThenTalk { .. }) => {
                let name = self
                    .game
                    .garden()
                    .npc(&npc_id)
                    .map(|n| n.name.clone())
                    .unwrap_or_default();
                self.status = Some(format!("Walking over to {}...", name));
            }
            Err(err) => self.report(err),
        }
    }

    fn fight(&mut self) {
        let Some(npc_name) = self.game.dialog_npc().map(|n| n.name.clone()) else {
            return;
        };

        let enemy = self
            .runtime
            .block_on(generate_fighter(&*self.generator, &npc_name, Side::Enemy));
        match self.game.start_battle(enemy) {
            Ok(()) => self.status = None,
            Err(err) => self.report(err),
        }
    }

    fn report(&mut self, err: GameError) {
        tracing::debug!(error = %err, "command rejected");
        self.status = Some(err.to_string());
    }
}
