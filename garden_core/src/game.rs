//! GameSession - Screens, exploration and battles tied together
//!
//! The session is driven by two kinds of input: player commands
//! (`move_player`, `interact`, `player_action`, ...) and the passage of time
//! (`tick`). Delayed work goes through a [`Scheduler`] keyed by an [`Epoch`]
//! that is bumped whenever the player's context changes, so a delayed enemy
//! turn can never land in a battle that was already abandoned.

use crate::battle::{Action, BattleError, BattlePhase, BattleSession, ResolvedAction, TurnReport};
use crate::config::{BattleConstants, GardenConfig};
use crate::explore::{Garden, Interaction, Npc, Position};
use crate::fighter::Fighter;
use crate::rng::RandomSource;
use crate::schedule::{Epoch, Scheduler, TaskId};
use crate::types::Side;
use std::time::Duration;
use thiserror::Error;

/// Which screen the game is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Choosing a fighter
    Menu,
    Exploration,
    Battle,
    Victory,
    Defeat,
}

/// Work waiting on the scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameTask {
    /// The enemy finishes thinking and acts on this turn
    EnemyTurn { turn: u32 },
    /// A stunned player's turn is skipped
    StunnedPlayerTurn { turn: u32 },
    /// The walk to an NPC is over
    OpenDialog { npc_id: String },
    ClearActionCue,
}

/// Something that happened during [`GameSession::tick`] or [`GameSession::player_action`]
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    TurnResolved(TurnReport),
    DialogOpened { npc_id: String },
    ActionCueCleared,
    BattleEnded(BattlePhase),
}

/// Rejected game commands. The session is unchanged after any of them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error("no fighter has been chosen yet")]
    NoFighter,
    #[error("a battle is already in progress")]
    BattleInProgress,
    #[error("there is no battle")]
    NoBattle,
    #[error("no dialog is open")]
    NoDialog,
    #[error("not possible on the {0:?} screen")]
    WrongScreen(Screen),
    #[error("unknown npc '{0}'")]
    UnknownNpc(String),
    #[error(transparent)]
    Battle(#[from] BattleError),
}

/// The whole game: menu, garden and at most one battle
pub struct GameSession {
    screen: Screen,
    /// The player's fighter while not in battle
    player: Option<Fighter>,
    garden: Garden,
    /// Id of the NPC whose dialog is open
    dialog: Option<String>,
    battle: Option<BattleSession>,
    constants: BattleConstants,
    scheduler: Scheduler<GameTask>,
    epoch: Epoch,
    cue_task: Option<TaskId>,
    rng: Box<dyn RandomSource>,
}

impl GameSession {
    pub fn new(constants: BattleConstants, garden: GardenConfig, rng: Box<dyn RandomSource>) -> Self {
        GameSession {
            screen: Screen::Menu,
            player: None,
            garden: Garden::new(garden),
            dialog: None,
            battle: None,
            constants,
            scheduler: Scheduler::new(),
            epoch: Epoch::default(),
            cue_task: None,
            rng,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// The player's fighter, wherever it currently lives
    pub fn player(&self) -> Option<&Fighter> {
        match &self.battle {
            Some(battle) => Some(battle.player()),
            None => self.player.as_ref(),
        }
    }

    pub fn garden(&self) -> &Garden {
        &self.garden
    }

    pub fn battle(&self) -> Option<&BattleSession> {
        self.battle.as_ref()
    }

    pub fn constants(&self) -> &BattleConstants {
        &self.constants
    }

    /// The NPC whose dialog is open
    pub fn dialog_npc(&self) -> Option<&Npc> {
        self.dialog.as_deref().and_then(|id| self.garden.npc(id))
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    /// Enter the garden with a freshly generated fighter
    pub fn start_game(&mut self, mut fighter: Fighter) -> Result<(), GameError> {
        self.require_screen(Screen::Menu)?;

        fighter.side = Side::Player;
        fighter.clear_status_effects();
        tracing::info!(name = %fighter.name, "game started");

        self.player = Some(fighter);
        self.garden.respawn();
        self.dialog = None;
        self.bump_epoch();
        self.screen = Screen::Exploration;
        Ok(())
    }

    /// Walk somewhere. Closes any open dialog and cancels a pending one.
    pub fn move_player(&mut self, target: Position) -> Result<Position, GameError> {
        self.require_screen(Screen::Exploration)?;
        self.dialog = None;
        self.bump_epoch();
        Ok(self.garden.move_player(target))
    }

    /// Walk by an offset
    pub fn step_player(&mut self, dx: f64, dy: f64) -> Result<Position, GameError> {
        let current = self.garden.player_position();
        self.move_player(Position::new(current.x + dx, current.y + dy))
    }

    /// Talk to an NPC, walking over first when it is out of reach
    pub fn interact(&mut self, npc_id: &str) -> Result<Interaction, GameError> {
        self.require_screen(Screen::Exploration)?;
        if self.garden.npc(npc_id).is_none() {
            return Err(GameError::UnknownNpc(npc_id.to_string()));
        }

        self.dialog = None;
        self.bump_epoch();
        let interaction = self
            .garden
            .interact(npc_id)
            .ok_or_else(|| GameError::UnknownNpc(npc_id.to_string()))?;

        match interaction {
            Interaction::Immediate => self.dialog = Some(npc_id.to_string()),
            Interaction::WalkThenTalk { .. } => {
                self.scheduler.schedule(
                    self.epoch,
                    self.constants.timing.walk_then_talk(),
                    GameTask::OpenDialog {
                        npc_id: npc_id.to_string(),
                    },
                );
            }
        }
        Ok(interaction)
    }

    pub fn close_dialog(&mut self) -> Result<(), GameError> {
        self.dialog.take().map(|_| ()).ok_or(GameError::NoDialog)
    }

    /// Fight the NPC whose dialog is open
    ///
    /// The only way into a battle. The enemy takes the NPC's map sprite.
    pub fn start_battle(&mut self, mut enemy: Fighter) -> Result<(), GameError> {
        if self.battle.is_some() {
            return Err(GameError::BattleInProgress);
        }
        self.require_screen(Screen::Exploration)?;
        let npc_emoji = self.dialog_npc().ok_or(GameError::NoDialog)?.emoji.clone();
        let player = self.player.take().ok_or(GameError::NoFighter)?;

        enemy.side = Side::Enemy;
        enemy.emoji = npc_emoji;
        self.dialog = None;
        self.bump_epoch();

        let battle = BattleSession::start(player, enemy, self.constants.clone(), self.rng.as_mut());
        self.battle = Some(battle);
        self.screen = Screen::Battle;
        self.schedule_follow_up();
        Ok(())
    }

    /// Resolve the player's chosen action
    ///
    /// Yields the resolved turn, followed by `BattleEnded` when the action
    /// finished the battle.
    pub fn player_action(&mut self, action: Action) -> Result<Vec<GameEvent>, GameError> {
        let battle = self.battle.as_mut().ok_or(GameError::NoBattle)?;
        let report = battle.apply_player_action(action, self.rng.as_mut())?;

        self.schedule_cue_clear();
        self.schedule_follow_up();

        let mut events = vec![GameEvent::TurnResolved(report)];
        if let Some(phase) = self.sync_outcome() {
            events.push(GameEvent::BattleEnded(phase));
        }
        Ok(events)
    }

    /// Advance time, firing every scheduled task that came due
    pub fn tick(&mut self, elapsed: Duration) -> Vec<GameEvent> {
        let tasks = self.scheduler.tick(elapsed, self.epoch);
        let mut events = Vec::new();

        for task in tasks {
            match task {
                GameTask::EnemyTurn { turn } => {
                    if let Some(report) = self.run_scheduled_turn(turn, Side::Enemy) {
                        events.push(GameEvent::TurnResolved(report));
                    }
                }
                GameTask::StunnedPlayerTurn { turn } => {
                    if let Some(report) = self.run_scheduled_turn(turn, Side::Player) {
                        events.push(GameEvent::TurnResolved(report));
                    }
                }
                GameTask::OpenDialog { npc_id } => {
                    if self.screen == Screen::Exploration {
                        self.dialog = Some(npc_id.clone());
                        events.push(GameEvent::DialogOpened { npc_id });
                    }
                }
                GameTask::ClearActionCue => {
                    self.cue_task = None;
                    if let Some(battle) = self.battle.as_mut() {
                        battle.clear_last_action();
                        events.push(GameEvent::ActionCueCleared);
                    }
                }
            }

            if let Some(phase) = self.sync_outcome() {
                events.push(GameEvent::BattleEnded(phase));
            }
        }

        events
    }

    /// Run away from the current battle
    pub fn flee(&mut self) -> Result<(), GameError> {
        if self.battle.is_none() {
            return Err(GameError::NoBattle);
        }
        tracing::info!("player fled");
        self.return_to_garden()
    }

    /// Leave the battle (or its result screen) and go back to exploring
    ///
    /// The player's fighter gets a partial heal and loses all effects; the
    /// enemy is discarded.
    pub fn return_to_garden(&mut self) -> Result<(), GameError> {
        let battle = self.battle.take().ok_or(GameError::NoBattle)?;
        let (mut player, enemy) = battle.into_fighters();

        player.restore_after_battle(self.constants.healing.post_battle_restore);
        tracing::info!(player_hp = player.stats.hp(), enemy = %enemy.name, "returned to garden");

        self.player = Some(player);
        self.cue_task = None;
        self.bump_epoch();
        self.screen = Screen::Exploration;
        Ok(())
    }

    fn require_screen(&self, expected: Screen) -> Result<(), GameError> {
        if self.screen == expected {
            Ok(())
        } else {
            Err(GameError::WrongScreen(self.screen))
        }
    }

    /// Invalidate everything scheduled so far
    fn bump_epoch(&mut self) {
        let stale = self.epoch;
        self.scheduler.cancel_epoch(stale);
        self.epoch = stale.next();
    }

    /// Resolve a delayed turn if the battle is still where it was scheduled
    fn run_scheduled_turn(&mut self, turn: u32, side: Side) -> Option<TurnReport> {
        let battle = self.battle.as_mut()?;
        if battle.turn().number != turn || battle.phase().active_side() != Some(side) {
            tracing::debug!(turn, ?side, "scheduled turn no longer current");
            return None;
        }

        match battle.advance(self.rng.as_mut()) {
            Ok(report) => {
                if report.action != ResolvedAction::Stunned {
                    self.schedule_cue_clear();
                }
                self.schedule_follow_up();
                Some(report)
            }
            Err(err) => {
                tracing::debug!(error = %err, "scheduled turn rejected");
                None
            }
        }
    }

    /// Queue whatever the battle needs next without player input
    fn schedule_follow_up(&mut self) {
        let Some(battle) = self.battle.as_ref() else {
            return;
        };
        let turn = battle.turn().number;
        let phase = battle.phase();
        let player_stunned = battle.player().is_stunned();

        match phase {
            BattlePhase::EnemyTurn => {
                let delay = self.constants.timing.ai_think();
                self.scheduler.schedule(self.epoch, delay, GameTask::EnemyTurn { turn });
            }
            BattlePhase::PlayerTurn if player_stunned => {
                let delay = self.constants.timing.stun_skip();
                self.scheduler
                    .schedule(self.epoch, delay, GameTask::StunnedPlayerTurn { turn });
            }
            BattlePhase::PlayerTurn | BattlePhase::Victory | BattlePhase::Defeat => {}
        }
    }

    /// Restart the cue timer after a new action
    fn schedule_cue_clear(&mut self) {
        if let Some(id) = self.cue_task.take() {
            self.scheduler.cancel(id);
        }
        let id = self
            .scheduler
            .schedule(self.epoch, self.constants.timing.action_cue(), GameTask::ClearActionCue);
        self.cue_task = Some(id);
    }

    /// Mirror a finished battle into the result screens
    ///
    /// Returns the phase the first time the battle is seen as finished.
    fn sync_outcome(&mut self) -> Option<BattlePhase> {
        let phase = self.battle.as_ref()?.phase();
        let screen = match phase {
            BattlePhase::Victory => Screen::Victory,
            BattlePhase::Defeat => Screen::Defeat,
            _ => return None,
        };
        if self.screen == screen {
            return None;
        }
        self.screen = screen;
        Some(phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::fallback_fighter;
    use crate::rng::SequenceRandom;
    use crate::types::StatusType;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn make_game() -> GameSession {
        GameSession::new(
            BattleConstants::default(),
            GardenConfig::default(),
            Box::new(SequenceRandom::constant(0.5)),
        )
    }

    /// In the garden, next to Private Potato with its dialog open
    fn game_at_potato() -> GameSession {
        let mut game = make_game();
        game.start_game(fallback_fighter("Carrot", Side::Player)).unwrap();
        game.move_player(Position::new(1150.0, 1150.0)).unwrap();
        assert_eq!(game.interact("2").unwrap(), Interaction::Immediate);
        game
    }

    fn fast_enemy() -> Fighter {
        let mut enemy = fallback_fighter("Private Potato", Side::Enemy);
        enemy.stats.speed = 20;
        enemy
    }

    #[test]
    fn test_start_game() {
        let mut game = make_game();
        assert_eq!(game.screen(), Screen::Menu);
        assert_eq!(
            game.move_player(Position::new(0.0, 0.0)),
            Err(GameError::WrongScreen(Screen::Menu))
        );

        game.start_game(fallback_fighter("Carrot", Side::Enemy)).unwrap();
        assert_eq!(game.screen(), Screen::Exploration);
        assert_eq!(game.player().unwrap().side, Side::Player);
        assert_eq!(game.garden().player_position(), Position::new(1000.0, 1000.0));
    }

    #[test]
    fn test_walk_then_talk() {
        let mut game = make_game();
        game.start_game(fallback_fighter("Carrot", Side::Player)).unwrap();

        let interaction = game.interact("2").unwrap();
        assert!(matches!(interaction, Interaction::WalkThenTalk { .. }));
        assert!(game.dialog_npc().is_none());

        assert!(game.tick(ms(499)).is_empty());
        let events = game.tick(ms(1));
        assert_eq!(
            events,
            vec![GameEvent::DialogOpened {
                npc_id: "2".to_string()
            }]
        );
        assert_eq!(game.dialog_npc().unwrap().name, "Private Potato");
    }

    #[test]
    fn test_moving_cancels_pending_dialog() {
        let mut game = make_game();
        game.start_game(fallback_fighter("Carrot", Side::Player)).unwrap();
        game.interact("2").unwrap();
        game.step_player(10.0, 0.0).unwrap();

        assert!(game.tick(ms(1000)).is_empty());
        assert!(game.dialog_npc().is_none());
    }

    #[test]
    fn test_start_battle_requires_dialog() {
        let mut game = make_game();
        game.start_game(fallback_fighter("Carrot", Side::Player)).unwrap();
        assert_eq!(
            game.start_battle(fast_enemy()),
            Err(GameError::NoDialog)
        );
        assert_eq!(game.close_dialog(), Err(GameError::NoDialog));
    }

    #[test]
    fn test_start_battle() {
        let mut game = game_at_potato();
        game.start_battle(fallback_fighter("Private Potato", Side::Player)).unwrap();

        assert_eq!(game.screen(), Screen::Battle);
        let battle = game.battle().unwrap();
        assert_eq!(battle.enemy().emoji, "🥔");
        assert_eq!(battle.enemy().side, Side::Enemy);
        assert!(game.dialog_npc().is_none());

        assert_eq!(
            game.start_battle(fast_enemy()),
            Err(GameError::BattleInProgress)
        );
    }

    #[test]
    fn test_enemy_turn_after_thinking() {
        let mut game = game_at_potato();
        game.start_battle(fast_enemy()).unwrap();
        assert_eq!(game.battle().unwrap().phase(), BattlePhase::EnemyTurn);

        assert!(game.tick(ms(1499)).is_empty());
        let events = game.tick(ms(1));
        assert!(matches!(events.as_slice(), [GameEvent::TurnResolved(r)] if r.actor == Side::Enemy));
        assert_eq!(game.battle().unwrap().phase(), BattlePhase::PlayerTurn);
    }

    #[test]
    fn test_player_action_then_enemy_reply() {
        let mut game = game_at_potato();
        game.start_battle(fallback_fighter("Private Potato", Side::Enemy)).unwrap();

        let events = game.player_action(Action::Attack).unwrap();
        assert!(matches!(events.as_slice(), [GameEvent::TurnResolved(r)] if r.actor == Side::Player));
        assert!(game.battle().unwrap().turn().last_action.is_some());
        assert_eq!(
            game.player_action(Action::Attack),
            Err(GameError::Battle(BattleError::NotPlayersTurn))
        );

        let events = game.tick(ms(500));
        assert_eq!(events, vec![GameEvent::ActionCueCleared]);
        assert!(game.battle().unwrap().turn().last_action.is_none());

        let events = game.tick(ms(1000));
        assert!(matches!(events.as_slice(), [GameEvent::TurnResolved(r)] if r.actor == Side::Enemy));
    }

    #[test]
    fn test_flee_cancels_enemy_turn() {
        let mut game = game_at_potato();
        game.start_battle(fast_enemy()).unwrap();
        assert!(game.pending_tasks() > 0);

        game.flee().unwrap();
        assert_eq!(game.screen(), Screen::Exploration);
        assert!(game.battle().is_none());
        assert!(game.tick(ms(5000)).is_empty());
        assert_eq!(game.flee(), Err(GameError::NoBattle));
    }

    #[test]
    fn test_victory_and_return() {
        let mut game = game_at_potato();
        let mut enemy = fallback_fighter("Private Potato", Side::Enemy);
        enemy.stats.set_hp(5);
        game.start_battle(enemy).unwrap();

        let events = game.player_action(Action::Attack).unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], GameEvent::TurnResolved(r) if r.phase == BattlePhase::Victory));
        assert_eq!(events[1], GameEvent::BattleEnded(BattlePhase::Victory));
        assert_eq!(game.screen(), Screen::Victory);
        assert!(game.tick(ms(5000)).iter().all(|e| !matches!(e, GameEvent::BattleEnded(_))));
        assert_eq!(
            game.player_action(Action::Attack),
            Err(GameError::Battle(BattleError::BattleOver(BattlePhase::Victory)))
        );

        game.return_to_garden().unwrap();
        assert_eq!(game.screen(), Screen::Exploration);
        let player = game.player().unwrap();
        assert_eq!(player.stats.hp(), 100);
        assert!(player.status_effects().is_empty());
    }

    #[test]
    fn test_enemy_turn_reports_defeat() {
        let mut game = make_game();
        let mut carrot = fallback_fighter("Carrot", Side::Player);
        carrot.stats.set_hp(5);
        game.start_game(carrot).unwrap();
        game.move_player(Position::new(1150.0, 1150.0)).unwrap();
        game.interact("2").unwrap();
        game.start_battle(fast_enemy()).unwrap();

        // Roll 0.5 picks a plain attack for 15 damage
        let events = game.tick(ms(1500));
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], GameEvent::TurnResolved(r) if r.phase == BattlePhase::Defeat));
        assert_eq!(events[1], GameEvent::BattleEnded(BattlePhase::Defeat));
        assert_eq!(game.screen(), Screen::Defeat);
        assert_eq!(game.pending_tasks(), 1);
    }

    #[test]
    fn test_stunned_enemy_turn_reports_victory() {
        let mut log = crate::log::BattleLog::new();
        let mut enemy = fast_enemy();
        enemy.stats.set_hp(2);
        let enemy = crate::status::apply_status_effect(&enemy, StatusType::Stun, 1, None, &mut log);
        let enemy = crate::status::apply_status_effect(&enemy, StatusType::Poison, 2, None, &mut log);

        let mut game = game_at_potato();
        game.start_battle(enemy).unwrap();
        assert_eq!(game.battle().unwrap().phase(), BattlePhase::EnemyTurn);

        // The skipped turn's poison tick finishes the enemy
        let events = game.tick(ms(1500));
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            GameEvent::TurnResolved(r) if r.action == ResolvedAction::Stunned && r.phase == BattlePhase::Victory
        ));
        assert_eq!(events[1], GameEvent::BattleEnded(BattlePhase::Victory));
        assert_eq!(game.screen(), Screen::Victory);
    }

    /// Enemy moves first and lands a stunning ultimate
    fn game_with_stunned_player() -> GameSession {
        // initiative x2, ai roll, variance, status chance, stun
        let rolls = vec![0.5, 0.5, 0.9, 0.5, 0.1, 0.9];
        let mut game = GameSession::new(
            BattleConstants::default(),
            GardenConfig::default(),
            Box::new(SequenceRandom::new(rolls)),
        );
        game.start_game(fallback_fighter("Carrot", Side::Player)).unwrap();
        game.move_player(Position::new(1150.0, 1150.0)).unwrap();
        game.interact("2").unwrap();
        game.start_battle(fast_enemy()).unwrap();

        let events = game.tick(ms(1500));
        assert!(matches!(
            events.as_slice(),
            [GameEvent::TurnResolved(r)] if r.action == ResolvedAction::Ultimate { damage: 25, inflicted: Some(StatusType::Stun) }
        ));
        let battle = game.battle().unwrap();
        assert_eq!(battle.phase(), BattlePhase::PlayerTurn);
        assert!(battle.player().is_stunned());
        assert!(!battle.needs_player_input());
        game
    }

    #[test]
    fn test_stunned_player_turn_is_skipped() {
        let mut game = game_with_stunned_player();
        assert_eq!(
            game.player_action(Action::Attack),
            Err(GameError::Battle(BattleError::PlayerStunned))
        );

        // Only the action cue fires before the skip delay is over
        assert_eq!(game.tick(ms(999)), vec![GameEvent::ActionCueCleared]);
        assert!(game.battle().unwrap().player().is_stunned());

        let events = game.tick(ms(1));
        assert!(matches!(
            events.as_slice(),
            [GameEvent::TurnResolved(r)] if r.actor == Side::Player && r.action == ResolvedAction::Stunned
        ));
        let battle = game.battle().unwrap();
        assert!(!battle.player().is_stunned());
        assert_eq!(battle.phase(), BattlePhase::EnemyTurn);
        assert_eq!(battle.turn().number, 3);
    }

    #[test]
    fn test_flee_cancels_stun_skip() {
        let mut game = game_with_stunned_player();
        game.flee().unwrap();

        assert!(game.tick(ms(5000)).is_empty());
        assert_eq!(game.screen(), Screen::Exploration);
        assert!(game.player().unwrap().status_effects().is_empty());
    }

    #[test]
    fn test_return_restores_hp() {
        let mut game = game_at_potato();
        game.start_battle(fast_enemy()).unwrap();
        game.tick(ms(1500));
        let hp_after_hit = game.player().unwrap().stats.hp();
        assert!(hp_after_hit < 100);

        game.return_to_garden().unwrap();
        assert_eq!(game.player().unwrap().stats.hp(), (hp_after_hit + 20).min(100));
    }
}
