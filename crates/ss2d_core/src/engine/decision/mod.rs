//! Per-cycle decision state machine
//!
//! The family is recomputed from scratch every cycle from the keeper flag and
//! the play mode. The only state that survives between cycles is the small
//! [`AgentMemory`] owned by each agent:
//!
//! - keeper role overrides everything, including the shoot-out
//! - penalty modes go to the shoot-out routine
//! - play-on splits on whether self can kick the ball
//! - everything else is a dead-ball restart

pub mod no_ball;

use serde::{Deserialize, Serialize};

use super::action_queue::{fallback_actions, Action, ActionQueue};
use super::behaviors::{Behavior, GoalieBehavior, KickPlanner};
use super::config::TacticsConfig;
use super::context::DecisionContext;
use super::penalty::{PenaltyKick, DRIBBLE_STREAK};
use super::reach::InterceptTable;
use super::setplay::{GoalieFreeKick, SetPlayBehavior};
use super::strategy::PositionStrategy;
use crate::models::player_type::PlayerTypeTable;
use crate::models::server_param::ServerParam;
use crate::models::world::{GameModeType, WorldSnapshot};

/// Which tactic family handles the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TacticFamily {
    Goalkeeper,
    OpenPlayWithBall,
    OpenPlayWithoutBall,
    DeadBallRestart,
    PenaltyKick,
}

impl TacticFamily {
    pub fn classify(wm: &WorldSnapshot) -> Self {
        if wm.me.is_goalie {
            TacticFamily::Goalkeeper
        } else if wm.game_mode.kind.is_penalty_kick_mode() {
            TacticFamily::PenaltyKick
        } else if wm.game_mode.kind == GameModeType::PlayOn {
            if wm.me.is_kickable {
                TacticFamily::OpenPlayWithBall
            } else {
                TacticFamily::OpenPlayWithoutBall
            }
        } else {
            TacticFamily::DeadBallRestart
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TacticFamily::Goalkeeper => "goalkeeper",
            TacticFamily::OpenPlayWithBall => "open_play_with_ball",
            TacticFamily::OpenPlayWithoutBall => "open_play_without_ball",
            TacticFamily::DeadBallRestart => "dead_ball_restart",
            TacticFamily::PenaltyKick => "penalty_kick",
        }
    }
}

/// Per-agent flags carried from one cycle to the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentMemory {
    /// Dash conservatively until stamina recovers.
    pub recover_mode: bool,
    /// Shoot-out dribble side streak; the sign picks the side.
    pub penalty_dribble_count: i32,
}

impl Default for AgentMemory {
    fn default() -> Self {
        Self { recover_mode: false, penalty_dribble_count: DRIBBLE_STREAK }
    }
}

/// Outcome of one decision pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub family: TacticFamily,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionMaker;

impl DecisionMaker {
    pub fn decide(&self, ctx: &DecisionContext, memory: &mut AgentMemory) -> Decision {
        let wm = ctx.wm;
        let family = TacticFamily::classify(wm);
        let proposed = match family {
            TacticFamily::Goalkeeper => Self::goalkeeper(ctx, memory),
            TacticFamily::PenaltyKick => Some(PenaltyKick.decide(ctx, memory)),
            TacticFamily::OpenPlayWithBall => KickPlanner.evaluate(ctx),
            TacticFamily::OpenPlayWithoutBall => Some(no_ball::decide(ctx, memory)),
            TacticFamily::DeadBallRestart => SetPlayBehavior.evaluate(ctx),
        };

        let mut queue = ActionQueue::from(proposed.unwrap_or_default());
        if !queue.has_body_action() {
            log::warn!("cycle {}: {} produced no body action, using fallback", wm.cycle, family.label());
            queue = ActionQueue::from(fallback_actions());
        } else if !queue.has_neck_action() {
            queue.push(Action::NeckTurnToBallOrScan { count_threshold: 0 });
        }
        log::debug!("cycle {}: {} -> {} actions", wm.cycle, family.label(), queue.len());
        Decision { family, actions: queue.into_vec() }
    }

    fn goalkeeper(ctx: &DecisionContext, memory: &mut AgentMemory) -> Option<Vec<Action>> {
        let kind = ctx.wm.game_mode.kind;
        if kind.is_penalty_kick_mode() {
            Some(PenaltyKick.decide(ctx, memory))
        } else if kind == GameModeType::PlayOn {
            GoalieBehavior.evaluate(ctx)
        } else {
            GoalieFreeKick.evaluate(ctx)
        }
    }
}

/// Build the intercept table, refresh the formation and decide.
pub fn run_cycle(
    wm: &WorldSnapshot,
    sp: &ServerParam,
    types: &PlayerTypeTable,
    config: &TacticsConfig,
    strategy: &mut dyn PositionStrategy,
    memory: &mut AgentMemory,
) -> Decision {
    let intercept = InterceptTable::build(wm, sp, types, &config.reach);
    strategy.update(wm, sp, &intercept);
    let ctx = DecisionContext { wm, sp, types, intercept: &intercept, strategy: &*strategy, config };
    DecisionMaker.decide(&ctx, memory)
}

// ========== Tests ==========
