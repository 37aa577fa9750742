//! World snapshot delivered once per cycle
//!
//! A snapshot is built at the boundary, handed to the decision pass by shared
//! reference, and dropped at cycle end. Nothing in the core mutates it.

use crate::engine::geom::{AngleDeg, Vec2};
use crate::error::{DecisionError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
    #[default]
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    #[default]
    NoCard,
    Yellow,
    Red,
}

/// Referee play modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameModeType {
    BeforeKickOff,
    TimeOver,
    #[default]
    PlayOn,
    KickOff,
    KickIn,
    FreeKick,
    CornerKick,
    GoalKick,
    AfterGoal,
    OffSide,
    BackPass,
    FreeKickFault,
    CatchFault,
    IndFreeKick,
    FoulCharge,
    FoulPush,
    GoalieCatch,
    PenaltySetup,
    PenaltyReady,
    PenaltyTaken,
    PenaltyMiss,
    PenaltyScore,
    PenaltyOnfield,
    PenaltyFoul,
}

impl GameModeType {
    pub fn is_penalty_kick_mode(self) -> bool {
        matches!(
            self,
            GameModeType::PenaltySetup
                | GameModeType::PenaltyReady
                | GameModeType::PenaltyTaken
                | GameModeType::PenaltyMiss
                | GameModeType::PenaltyScore
                | GameModeType::PenaltyOnfield
                | GameModeType::PenaltyFoul
        )
    }
}

/// Current play mode and the side it favors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GameMode {
    #[serde(rename = "type")]
    pub kind: GameModeType,
    #[serde(default)]
    pub side: Side,
}

impl GameMode {
    pub fn new(kind: GameModeType, side: Side) -> Self {
        Self { kind, side }
    }
}

/// The agent's own body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfState {
    pub unum: u8,
    pub player_type_id: i32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub body_direction: AngleDeg,
    pub stamina: f64,
    pub stamina_capacity: f64,
    pub recovery: f64,
    pub effort: f64,
    pub kick_rate: f64,
    pub is_kickable: bool,
    pub is_goalie: bool,
    pub card: CardType,
    pub tackle_probability: f64,
    pub foul_probability: f64,
}

impl Default for SelfState {
    fn default() -> Self {
        Self {
            unum: 1,
            player_type_id: 0,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            body_direction: AngleDeg::new(0.0),
            stamina: 8000.0,
            stamina_capacity: 130_600.0,
            recovery: 1.0,
            effort: 1.0,
            kick_rate: 0.027,
            is_kickable: false,
            is_goalie: false,
            card: CardType::NoCard,
            tackle_probability: 0.0,
            foul_probability: 0.0,
        }
    }
}

/// Another player as last observed. Counters are cycles since each field was seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerObject {
    /// Negative when the uniform number has not been identified.
    pub unum: i32,
    pub player_type_id: i32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub body_direction: AngleDeg,
    pub pos_count: u32,
    pub seen_pos_count: u32,
    pub vel_count: u32,
    pub body_direction_count: u32,
    pub is_goalie: bool,
    pub is_tackling: bool,
    pub is_kickable: bool,
}

impl Default for PlayerObject {
    fn default() -> Self {
        Self {
            unum: -1,
            player_type_id: 0,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            body_direction: AngleDeg::new(0.0),
            pos_count: 0,
            seen_pos_count: 0,
            vel_count: 0,
            body_direction_count: 0,
            is_goalie: false,
            is_tackling: false,
            is_kickable: false,
        }
    }
}

impl PlayerObject {
    pub fn has_unum(&self) -> bool {
        self.unum > 0
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BallState {
    pub position: Vec2,
    pub velocity: Vec2,
    pub pos_count: u32,
    pub vel_count: u32,
}

/// Shoot-out bookkeeping supplied by the referee stream.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyKickState {
    pub current_taker_side: Side,
    pub is_kick_taker: bool,
    /// Cycle at which the current penalty phase started.
    pub cycle: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSnapshot {
    pub cycle: u32,
    pub our_side: Side,
    pub game_mode: GameMode,
    #[serde(rename = "self")]
    pub me: SelfState,
    pub ball: BallState,
    pub teammates: Vec<PlayerObject>,
    pub opponents: Vec<PlayerObject>,
    pub offside_line_x: f64,
    pub our_defense_line_x: f64,
    pub set_play_count: u32,
    pub last_set_play_start_time: u32,
    pub see_time: u32,
    pub our_score: u32,
    pub their_score: u32,
    pub penalty_kick_state: PenaltyKickState,
}

impl Default for WorldSnapshot {
    fn default() -> Self {
        Self {
            cycle: 0,
            our_side: Side::Left,
            game_mode: GameMode::default(),
            me: SelfState::default(),
            ball: BallState::default(),
            teammates: Vec::new(),
            opponents: Vec::new(),
            offside_line_x: 0.0,
            our_defense_line_x: 0.0,
            set_play_count: 0,
            last_set_play_start_time: 0,
            see_time: 0,
            our_score: 0,
            their_score: 0,
            penalty_kick_state: PenaltyKickState::default(),
        }
    }
}

impl WorldSnapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: WorldSnapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Reject snapshots whose own or ball kinematics are not finite.
    /// Other players with bad data are filtered by the evaluators instead.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("self.position", self.me.position),
            ("self.velocity", self.me.velocity),
            ("ball.position", self.ball.position),
            ("ball.velocity", self.ball.velocity),
        ];
        for (field, v) in checks {
            if !v.is_finite() {
                return Err(DecisionError::InvalidSnapshot {
                    reason: format!("{} is not finite", field),
                });
            }
        }
        Ok(())
    }

    pub fn is_our_set_play(&self) -> bool {
        self.game_mode.side == self.our_side
    }

    pub fn ball_dist_from_self(&self) -> f64 {
        self.me.position.dist(self.ball.position)
    }

    pub fn ball_angle_from_self(&self) -> AngleDeg {
        (self.ball.position - self.me.position).th()
    }

    /// Teammates with usable data, excluding self.
    pub fn valid_teammates(&self) -> impl Iterator<Item = &PlayerObject> {
        let me = self.me.unum as i32;
        self.teammates
            .iter()
            .filter(move |p| p.unum != me && p.position.is_finite())
    }

    pub fn valid_opponents(&self) -> impl Iterator<Item = &PlayerObject> {
        self.opponents.iter().filter(|p| p.position.is_finite())
    }

    pub fn kickable_teammate_exists(&self) -> bool {
        self.valid_teammates().any(|p| p.is_kickable)
    }

    pub fn kickable_opponent_exists(&self) -> bool {
        self.valid_opponents().any(|p| p.is_kickable)
    }

    pub fn their_goalie(&self) -> Option<&PlayerObject> {
        self.valid_opponents().find(|p| p.is_goalie)
    }

    /// Opponent closest to self and its distance.
    pub fn nearest_opponent_to_self(&self) -> Option<(&PlayerObject, f64)> {
        nearest(self.valid_opponents(), self.me.position)
    }

    /// Opponent closest to the ball and its distance.
    pub fn nearest_opponent_to_ball(&self) -> Option<(&PlayerObject, f64)> {
        nearest(self.valid_opponents(), self.ball.position)
    }

    pub fn nearest_teammate_to_self(&self) -> Option<(&PlayerObject, f64)> {
        nearest(self.valid_teammates(), self.me.position)
    }

    pub fn teammate(&self, unum: i32) -> Option<&PlayerObject> {
        self.valid_teammates().find(|p| p.unum == unum)
    }
}

fn nearest<'a>(players: impl Iterator<Item = &'a PlayerObject>, from: Vec2) -> Option<(&'a PlayerObject, f64)> {
    players
        .map(|p| (p, p.position.dist(from)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}
