//! BattleSession - The turn resolution state machine
//!
//! A session owns both fighters, the turn state and the narration log. Each
//! call resolves at most one turn and returns the transition it caused, so
//! "turn switched" and "battle ended" can never race each other:
//!
//! 1. A stunned active fighter skips its action but still runs its
//!    end-of-turn tick.
//! 2. Otherwise it performs exactly one action.
//! 3. The end-of-turn tick runs on the fighter whose turn it is.
//! 4. Win/loss is checked after the action and after the tick; a terminal
//!    phase suppresses the turn switch.
//! 5. Otherwise the turn passes and the counter goes up by one.

use super::{Action, BattleError, BattlePhase, LastAction, ResolvedAction, TickSummary, TurnReport, TurnState};
use crate::ai;
use crate::config::BattleConstants;
use crate::damage::{apply_heal, calculate_damage, initiative};
use crate::fighter::Fighter;
use crate::log::{BattleLog, BattleLogEntry, LogCategory};
use crate::rng::RandomSource;
use crate::status::{apply_status_effect, process_turn_end_effects, TurnEndResult};
use crate::types::{Side, StatusType};
use serde::Serialize;

/// A single battle between the player's fighter and one enemy
#[derive(Debug, Clone)]
pub struct BattleSession {
    player: Fighter,
    enemy: Fighter,
    phase: BattlePhase,
    turn: TurnState,
    log: BattleLog,
    constants: BattleConstants,
}

/// Read-only view of a session for presentation
#[derive(Debug, Clone, Serialize)]
pub struct BattleView<'a> {
    pub player: &'a Fighter,
    pub enemy: &'a Fighter,
    pub phase: BattlePhase,
    pub turn: &'a TurnState,
    pub log: &'a [BattleLogEntry],
}

fn pick<'a>(player: &'a Fighter, enemy: &'a Fighter, side: Side) -> &'a Fighter {
    match side {
        Side::Player => player,
        Side::Enemy => enemy,
    }
}

fn pick_mut<'a>(player: &'a mut Fighter, enemy: &'a mut Fighter, side: Side) -> &'a mut Fighter {
    match side {
        Side::Player => player,
        Side::Enemy => enemy,
    }
}

impl BattleSession {
    /// Set up a fresh battle and roll initiative
    ///
    /// The player's status effects are cleared. Initiative is speed plus a
    /// random bonus; ties go to the player. Draws two values from `rng`
    /// (player first).
    pub fn start(
        mut player: Fighter,
        mut enemy: Fighter,
        constants: BattleConstants,
        rng: &mut dyn RandomSource,
    ) -> Self {
        player.side = Side::Player;
        enemy.side = Side::Enemy;
        player.clear_status_effects();

        let player_init = initiative(&player, &constants, rng);
        let enemy_init = initiative(&enemy, &constants, rng);
        let first = if player_init >= enemy_init {
            Side::Player
        } else {
            Side::Enemy
        };

        let mut log = BattleLog::new();
        log.push("Battle start!", LogCategory::Info);
        log.push(
            format!(
                "{} (HP: {}) vs {} (HP: {})",
                player.name,
                player.stats.hp(),
                enemy.name,
                enemy.stats.hp()
            ),
            LogCategory::Info,
        );
        log.push(
            format!("{} is faster and strikes first!", pick(&player, &enemy, first).name),
            LogCategory::Info,
        );

        tracing::info!(
            player = %player.name,
            enemy = %enemy.name,
            player_init,
            enemy_init,
            first = ?first,
            "battle started"
        );

        let mut session = BattleSession {
            player,
            enemy,
            phase: BattlePhase::turn_of(first),
            turn: TurnState::default(),
            log,
            constants,
        };
        session.check_outcome();
        session
    }

    pub fn player(&self) -> &Fighter {
        &self.player
    }

    pub fn enemy(&self) -> &Fighter {
        &self.enemy
    }

    pub fn fighter(&self, side: Side) -> &Fighter {
        pick(&self.player, &self.enemy, side)
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    pub fn constants(&self) -> &BattleConstants {
        &self.constants
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Snapshot of everything presentation needs
    pub fn state(&self) -> BattleView<'_> {
        BattleView {
            player: &self.player,
            enemy: &self.enemy,
            phase: self.phase,
            turn: &self.turn,
            log: self.log.entries(),
        }
    }

    /// True when only a player choice can move the battle forward
    pub fn needs_player_input(&self) -> bool {
        self.phase == BattlePhase::PlayerTurn && !self.player.is_stunned()
    }

    /// Drop the transient action cue
    pub fn clear_last_action(&mut self) {
        self.turn.last_action = None;
    }

    /// Give back both fighters, ending the session
    pub fn into_fighters(self) -> (Fighter, Fighter) {
        (self.player, self.enemy)
    }

    /// Resolve the player's chosen action for this turn
    pub fn apply_player_action(
        &mut self,
        action: Action,
        rng: &mut dyn RandomSource,
    ) -> Result<TurnReport, BattleError> {
        match self.phase {
            BattlePhase::PlayerTurn => {}
            BattlePhase::EnemyTurn => return Err(BattleError::NotPlayersTurn),
            phase => return Err(BattleError::BattleOver(phase)),
        }
        if self.player.is_stunned() {
            return Err(BattleError::PlayerStunned);
        }

        Ok(self.resolve_action(Side::Player, action, rng))
    }

    /// Resolve a turn that needs no player input
    ///
    /// Handles the enemy's turn (AI decision) and any stunned turn. Returns
    /// `AwaitingPlayerInput` on a player turn where the player can act.
    pub fn advance(&mut self, rng: &mut dyn RandomSource) -> Result<TurnReport, BattleError> {
        let side = self
            .phase
            .active_side()
            .ok_or(BattleError::BattleOver(self.phase))?;

        if self.fighter(side).is_stunned() {
            return Ok(self.resolve_stunned(side));
        }

        match side {
            Side::Enemy => {
                let decision = ai::choose_action(&self.enemy, &self.constants.ai, rng);
                Ok(self.resolve_action(Side::Enemy, decision.action(), rng))
            }
            Side::Player => Err(BattleError::AwaitingPlayerInput),
        }
    }

    fn resolve_stunned(&mut self, side: Side) -> TurnReport {
        let turn = self.turn.number;
        let message = format!("{} is stunned and cannot act!", self.fighter(side).name);
        self.log.push(message, LogCategory::Effect);

        // Stun does not pause decay or poison
        let tick = self.end_turn(side);
        let phase = match self.check_outcome() {
            Some(phase) => phase,
            None => self.pass_turn(side),
        };

        tracing::debug!(turn, actor = ?side, ?phase, "stunned turn skipped");
        TurnReport {
            turn,
            actor: side,
            action: ResolvedAction::Stunned,
            tick: Some(tick),
            phase,
        }
    }

    fn resolve_action(&mut self, actor: Side, action: Action, rng: &mut dyn RandomSource) -> TurnReport {
        let turn = self.turn.number;
        let resolved = self.perform(actor, action, rng);

        if let Some(phase) = self.check_outcome() {
            return TurnReport {
                turn,
                actor,
                action: resolved,
                tick: None,
                phase,
            };
        }

        let tick = self.end_turn(actor);
        let phase = match self.check_outcome() {
            Some(phase) => phase,
            None => self.pass_turn(actor),
        };

        tracing::debug!(turn, ?actor, ?resolved, ?phase, "turn resolved");
        TurnReport {
            turn,
            actor,
            action: resolved,
            tick: Some(tick),
            phase,
        }
    }

    fn perform(&mut self, actor: Side, action: Action, rng: &mut dyn RandomSource) -> ResolvedAction {
        let target = actor.opponent();
        let actor_name = self.fighter(actor).name.clone();

        match action {
            Action::Attack => {
                let damage = self.strike(actor, 1.0, rng);
                self.log.push(
                    format!("{} attacks! Deals {} damage.", actor_name, damage),
                    LogCategory::Damage,
                );
                self.set_cue(actor, target, action);
                ResolvedAction::Attack { damage }
            }
            Action::Ultimate => {
                let ultimate = self.fighter(actor).ultimate.clone();
                let damage = self.strike(actor, ultimate.multiplier, rng);
                self.log.push(
                    format!("{} unleashes {}! Deals {} damage!", actor_name, ultimate.name, damage),
                    LogCategory::Damage,
                );
                let inflicted = self.roll_ultimate_status(target, rng);
                self.set_cue(actor, target, action);
                ResolvedAction::Ultimate { damage, inflicted }
            }
            Action::Heal => {
                let ratio = match actor {
                    Side::Player => self.constants.healing.player_ratio,
                    Side::Enemy => self.constants.healing.enemy_ratio,
                };
                let (healed, amount) = apply_heal(self.fighter(actor), ratio);
                *pick_mut(&mut self.player, &mut self.enemy, actor) = healed;
                self.log.push(
                    format!(
                        "{} absorbs nutrients, restoring {} HP and raising defense.",
                        actor_name, amount
                    ),
                    LogCategory::Heal,
                );

                let duration = self.constants.healing.defense_up_duration;
                let guarded = apply_status_effect(
                    pick(&self.player, &self.enemy, actor),
                    StatusType::DefenseUp,
                    duration,
                    None,
                    &mut self.log,
                );
                *pick_mut(&mut self.player, &mut self.enemy, actor) = guarded;
                self.set_cue(actor, actor, action);
                ResolvedAction::Heal { amount }
            }
        }
    }

    /// Roll damage from `actor` against its opponent and apply it
    fn strike(&mut self, actor: Side, multiplier: f64, rng: &mut dyn RandomSource) -> u32 {
        let target = actor.opponent();
        let damage = calculate_damage(
            pick(&self.player, &self.enemy, actor),
            pick(&self.player, &self.enemy, target),
            multiplier,
            &self.constants.damage,
            rng,
        );
        pick_mut(&mut self.player, &mut self.enemy, target)
            .stats
            .take_damage(damage);
        damage
    }

    /// Chance roll, then a coin flip between poison and stun
    fn roll_ultimate_status(&mut self, target: Side, rng: &mut dyn RandomSource) -> Option<StatusType> {
        let chance = self.constants.ultimate.status_chance;
        if rng.next_f64() >= chance {
            return None;
        }

        let (kind, duration) = if rng.next_f64() < 0.5 {
            (StatusType::Poison, self.constants.ultimate.poison_duration)
        } else {
            (StatusType::Stun, self.constants.ultimate.stun_duration)
        };

        let afflicted = apply_status_effect(
            pick(&self.player, &self.enemy, target),
            kind,
            duration,
            None,
            &mut self.log,
        );
        *pick_mut(&mut self.player, &mut self.enemy, target) = afflicted;
        Some(kind)
    }

    fn end_turn(&mut self, side: Side) -> TickSummary {
        let TurnEndResult {
            fighter,
            poison_damage,
            expired,
            changed,
        } = process_turn_end_effects(
            pick(&self.player, &self.enemy, side),
            &self.constants.poison,
            &mut self.log,
        );
        if changed {
            *pick_mut(&mut self.player, &mut self.enemy, side) = fighter;
        }
        TickSummary { poison_damage, expired }
    }

    /// Move to a terminal phase if either fighter is down
    fn check_outcome(&mut self) -> Option<BattlePhase> {
        if self.phase.is_terminal() {
            return Some(self.phase);
        }

        let outcome = if !self.enemy.is_alive() {
            self.log
                .push(format!("{} was defeated!", self.enemy.name), LogCategory::Win);
            BattlePhase::Victory
        } else if !self.player.is_alive() {
            self.log
                .push(format!("{} has withered...", self.player.name), LogCategory::Loss);
            BattlePhase::Defeat
        } else {
            return None;
        };

        self.phase = outcome;
        tracing::info!(?outcome, turn = self.turn.number, "battle finished");
        Some(outcome)
    }

    fn pass_turn(&mut self, from: Side) -> BattlePhase {
        self.turn.number += 1;
        self.phase = BattlePhase::turn_of(from.opponent());
        self.phase
    }

    fn set_cue(&mut self, source: Side, target: Side, action: Action) {
        self.turn.last_action = Some(LastAction {
            source,
            target,
            kind: action.kind(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fighter::{FighterStats, UltimateMove};
    use crate::rng::SequenceRandom;
    use crate::types::ActionKind;

    fn make_player() -> Fighter {
        Fighter::new(
            Side::Player,
            "Carrot",
            FighterStats::new(100, 20, 10, 10),
            UltimateMove::new("Carotene Cannon", 2.0),
        )
    }

    fn make_enemy() -> Fighter {
        Fighter::new(
            Side::Enemy,
            "Private Potato",
            FighterStats::new(100, 15, 5, 8),
            UltimateMove::new("Starch Slam", 1.5),
        )
    }

    /// Player (speed 10) beats enemy (speed 8) with equal jitter
    fn player_first() -> BattleSession {
        let mut rng = SequenceRandom::constant(0.5);
        BattleSession::start(make_player(), make_enemy(), BattleConstants::default(), &mut rng)
    }

    fn enemy_first() -> BattleSession {
        let mut enemy = make_enemy();
        enemy.stats.speed = 20;
        let mut rng = SequenceRandom::constant(0.5);
        BattleSession::start(make_player(), enemy, BattleConstants::default(), &mut rng)
    }

    #[test]
    fn test_start_logs_and_initiative() {
        let session = player_first();
        assert_eq!(session.phase(), BattlePhase::PlayerTurn);
        assert_eq!(session.turn().number, 1);
        assert_eq!(session.log().len(), 3);
        assert!(session.log().entries()[2].text.contains("Carrot"));
    }

    #[test]
    fn test_initiative_tie_goes_to_player() {
        let mut enemy = make_enemy();
        enemy.stats.speed = 10;
        let mut rng = SequenceRandom::new(vec![0.3, 0.3]);
        let session = BattleSession::start(make_player(), enemy, BattleConstants::default(), &mut rng);
        assert_eq!(session.phase(), BattlePhase::PlayerTurn);
    }

    #[test]
    fn test_jitter_can_flip_initiative() {
        // Player 10 + 0.0 vs enemy 8 + 4.5
        let mut rng = SequenceRandom::new(vec![0.0, 0.9]);
        let session = BattleSession::start(make_player(), make_enemy(), BattleConstants::default(), &mut rng);
        assert_eq!(session.phase(), BattlePhase::EnemyTurn);
    }

    #[test]
    fn test_start_clears_player_effects() {
        let mut log = BattleLog::new();
        let player = apply_status_effect(&make_player(), StatusType::Poison, 3, None, &mut log);
        let mut rng = SequenceRandom::constant(0.5);
        let session = BattleSession::start(player, make_enemy(), BattleConstants::default(), &mut rng);
        assert!(session.player().status_effects().is_empty());
    }

    #[test]
    fn test_player_attack_scenario() {
        let mut session = player_first();
        let mut rng = SequenceRandom::constant(0.5);

        let report = session.apply_player_action(Action::Attack, &mut rng).unwrap();

        assert_eq!(report.action, ResolvedAction::Attack { damage: 17 });
        assert_eq!(session.enemy().stats.hp(), 83);
        assert_eq!(report.phase, BattlePhase::EnemyTurn);
        assert_eq!(session.turn().number, 2);
        assert_eq!(
            session.turn().last_action,
            Some(LastAction {
                source: Side::Player,
                target: Side::Enemy,
                kind: ActionKind::Hit,
            })
        );
    }

    #[test]
    fn test_player_heal_scenario() {
        let mut session = player_first();
        session.player.stats.set_hp(50);
        let mut rng = SequenceRandom::constant(0.5);

        let report = session.apply_player_action(Action::Heal, &mut rng).unwrap();

        assert_eq!(report.action, ResolvedAction::Heal { amount: 20 });
        assert_eq!(session.player().stats.hp(), 70);
        assert!(session
            .log()
            .entries()
            .iter()
            .any(|e| e.text.contains("gained Defense Up")));
        // Applied at 2, then the healer's own end-of-turn tick
        assert_eq!(session.player().status(StatusType::DefenseUp).unwrap().duration, 1);
        assert_eq!(
            session.turn().last_action.map(|a| a.target),
            Some(Side::Player)
        );
    }

    #[test]
    fn test_ultimate_inflicts_poison() {
        let mut session = player_first();
        // variance, status chance (hit), status kind (poison)
        let mut rng = SequenceRandom::new(vec![0.5, 0.1, 0.2]);

        let report = session.apply_player_action(Action::Ultimate, &mut rng).unwrap();

        // floor(20 * 2.0 - 5 * 0.5) = 37
        assert_eq!(
            report.action,
            ResolvedAction::Ultimate {
                damage: 37,
                inflicted: Some(StatusType::Poison),
            }
        );
        assert_eq!(session.enemy().status(StatusType::Poison).unwrap().duration, 3);
    }

    #[test]
    fn test_ultimate_inflicts_stun() {
        let mut session = player_first();
        let mut rng = SequenceRandom::new(vec![0.5, 0.1, 0.7]);

        session.apply_player_action(Action::Ultimate, &mut rng).unwrap();

        assert_eq!(session.enemy().status(StatusType::Stun).unwrap().duration, 1);
    }

    #[test]
    fn test_ultimate_status_can_miss() {
        let mut session = player_first();
        let mut rng = SequenceRandom::new(vec![0.5, 0.9]);

        let report = session.apply_player_action(Action::Ultimate, &mut rng).unwrap();

        assert!(matches!(report.action, ResolvedAction::Ultimate { inflicted: None, .. }));
        assert!(session.enemy().status_effects().is_empty());
        assert_eq!(rng.draws(), 2);
    }

    #[test]
    fn test_out_of_turn_action_is_noop() {
        let mut session = enemy_first();
        let before_log = session.log().len();
        let before_player = session.player().clone();
        let before_enemy = session.enemy().clone();

        let result = session.apply_player_action(Action::Attack, &mut SequenceRandom::constant(0.5));

        assert_eq!(result, Err(BattleError::NotPlayersTurn));
        assert_eq!(session.log().len(), before_log);
        assert_eq!(session.player(), &before_player);
        assert_eq!(session.enemy(), &before_enemy);
        assert_eq!(session.turn().number, 1);
    }

    #[test]
    fn test_advance_waits_for_player() {
        let mut session = player_first();
        let result = session.advance(&mut SequenceRandom::constant(0.5));
        assert_eq!(result, Err(BattleError::AwaitingPlayerInput));
        assert!(session.needs_player_input());
    }

    #[test]
    fn test_enemy_turn_attack() {
        let mut session = enemy_first();
        // AI roll 0.5 -> attack, then variance 0.5
        let report = session.advance(&mut SequenceRandom::constant(0.5)).unwrap();

        // floor(15 - 10 * 0.5) = 10
        assert_eq!(report.action, ResolvedAction::Attack { damage: 10 });
        assert_eq!(session.player().stats.hp(), 90);
        assert_eq!(session.phase(), BattlePhase::PlayerTurn);
        assert_eq!(session.turn().number, 2);
    }

    #[test]
    fn test_enemy_heal_defend_branch() {
        let mut session = enemy_first();
        session.enemy.stats.set_hp(40);

        let report = session.advance(&mut SequenceRandom::constant(0.1)).unwrap();

        assert_eq!(report.action, ResolvedAction::Heal { amount: 15 });
        assert_eq!(session.enemy().stats.hp(), 55);
        assert!(session.enemy().has_status(StatusType::DefenseUp));
        assert_eq!(session.player().stats.hp(), 100);
    }

    #[test]
    fn test_stun_does_not_freeze_decay() {
        let mut session = enemy_first();
        // Enemy attacks first so the player's effects are applied mid-battle
        session.advance(&mut SequenceRandom::constant(0.5)).unwrap();
        let mut log = BattleLog::new();
        let player = apply_status_effect(&session.player, StatusType::Stun, 1, None, &mut log);
        session.player = apply_status_effect(&player, StatusType::Poison, 2, None, &mut log);
        let hp_before = session.player().stats.hp();
        let turn_before = session.turn().number;

        assert!(!session.needs_player_input());
        assert_eq!(
            session.apply_player_action(Action::Attack, &mut SequenceRandom::constant(0.5)),
            Err(BattleError::PlayerStunned)
        );

        let report = session.advance(&mut SequenceRandom::constant(0.5)).unwrap();

        assert_eq!(report.action, ResolvedAction::Stunned);
        assert!(!session.player().is_stunned());
        assert_eq!(session.player().status(StatusType::Poison).unwrap().duration, 1);
        assert_eq!(session.player().stats.hp(), hp_before - 6);
        assert_eq!(session.phase(), BattlePhase::EnemyTurn);
        assert_eq!(session.turn().number, turn_before + 1);
    }

    #[test]
    fn test_tick_applies_to_actor_not_target() {
        let mut session = player_first();
        let mut log = BattleLog::new();
        session.enemy = apply_status_effect(&session.enemy, StatusType::Poison, 3, None, &mut log);

        session
            .apply_player_action(Action::Attack, &mut SequenceRandom::constant(0.5))
            .unwrap();

        // Enemy poison untouched by the player's turn end
        assert_eq!(session.enemy().status(StatusType::Poison).unwrap().duration, 3);
        assert_eq!(session.enemy().stats.hp(), 83);
    }

    #[test]
    fn test_victory_is_terminal() {
        let mut session = player_first();
        session.enemy.stats.set_hp(5);
        let mut rng = SequenceRandom::constant(0.5);

        let report = session.apply_player_action(Action::Attack, &mut rng).unwrap();

        assert_eq!(report.phase, BattlePhase::Victory);
        assert!(report.tick.is_none());
        assert_eq!(session.turn().number, 1);
        assert_eq!(session.log().last().unwrap().category, LogCategory::Win);

        let log_len = session.log().len();
        assert_eq!(
            session.apply_player_action(Action::Attack, &mut rng),
            Err(BattleError::BattleOver(BattlePhase::Victory))
        );
        assert_eq!(session.advance(&mut rng), Err(BattleError::BattleOver(BattlePhase::Victory)));
        assert_eq!(session.turn().number, 1);
        assert_eq!(session.log().len(), log_len);
    }

    #[test]
    fn test_poison_on_own_turn_causes_defeat() {
        let mut session = player_first();
        session.player.stats.set_hp(3);
        let mut log = BattleLog::new();
        session.player = apply_status_effect(&session.player, StatusType::Poison, 2, None, &mut log);

        let report = session
            .apply_player_action(Action::Attack, &mut SequenceRandom::constant(0.5))
            .unwrap();

        assert_eq!(report.phase, BattlePhase::Defeat);
        assert_eq!(report.tick.unwrap().poison_damage, 6);
        assert_eq!(session.turn().number, 1);
        assert_eq!(session.log().last().unwrap().category, LogCategory::Loss);
    }

    #[test]
    fn test_stunned_enemy_dies_to_poison() {
        let mut session = enemy_first();
        session.enemy.stats.set_hp(2);
        let mut log = BattleLog::new();
        let enemy = apply_status_effect(&session.enemy, StatusType::Stun, 1, None, &mut log);
        session.enemy = apply_status_effect(&enemy, StatusType::Poison, 3, None, &mut log);

        let report = session.advance(&mut SequenceRandom::constant(0.5)).unwrap();

        assert_eq!(report.action, ResolvedAction::Stunned);
        assert_eq!(report.phase, BattlePhase::Victory);
        assert_eq!(session.turn().number, 1);
    }

    #[test]
    fn test_clear_last_action() {
        let mut session = player_first();
        session
            .apply_player_action(Action::Attack, &mut SequenceRandom::constant(0.5))
            .unwrap();
        assert!(session.turn().last_action.is_some());
        session.clear_last_action();
        assert!(session.state().turn.last_action.is_none());
    }
}
